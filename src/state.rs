use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

pub const NBA_HOME_TEAM: &str = "Lakers";
pub const NBA_AWAY_TEAM: &str = "Mavericks";
pub const NBA_MATCHUP: &str = "Lakers vs Mavericks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Player,
    Team,
    OverByOver,
    Venue,
    Nba,
}

impl SlideKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SlideKind::Player => "player",
            SlideKind::Team => "team",
            SlideKind::OverByOver => "overbyover",
            SlideKind::Venue => "venue",
            SlideKind::Nba => "nba",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "player" => Some(SlideKind::Player),
            "team" => Some(SlideKind::Team),
            "overbyover" | "over-by-over" => Some(SlideKind::OverByOver),
            "venue" => Some(SlideKind::Venue),
            "nba" => Some(SlideKind::Nba),
            _ => None,
        }
    }

    pub fn title_prefix(self) -> &'static str {
        match self {
            SlideKind::Player => "Player Analysis",
            SlideKind::Team => "Opposition Analysis",
            SlideKind::OverByOver => "Over-by-Over Analysis",
            SlideKind::Venue => "Venue Analysis",
            SlideKind::Nba => "NBA Matchup",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub kind: SlideKind,
    pub data: String,
    pub title: String,
    /// 1-based position in the deck it was assembled into.
    pub index: usize,
}

impl Slide {
    pub fn new(kind: SlideKind, data: impl Into<String>, index: usize) -> Self {
        let data = data.into();
        Self {
            title: format!("{}: {}", kind.title_prefix(), data),
            kind,
            data,
            index,
        }
    }

    /// Stable identifier used for analyst notes, e.g. `player_MS Dhoni`.
    pub fn slide_id(&self) -> String {
        format!("{}_{}", self.kind.as_str(), self.data)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    #[serde(default, deserialize_with = "vec_or_default")]
    pub ai_insights: Vec<String>,
    #[serde(default, deserialize_with = "vec_or_default")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "vec_or_default")]
    pub areas_for_improvement: Vec<String>,
}

impl Insights {
    pub fn is_empty(&self) -> bool {
        self.ai_insights.is_empty() && self.strengths.is_empty() && self.areas_for_improvement.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedStat {
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub strike_rate: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub runs: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub balls: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub average: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub boundary_pct: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub dot_pct: f64,
}

/// Performance split by bowling type. Map-shaped JSON objects keep the
/// backend's key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BowlingStats {
    #[serde(default, deserialize_with = "string_or_default")]
    pub player: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub team: String,
    #[serde(default, deserialize_with = "ordered_f64_entries")]
    pub bowling_stats: Vec<(String, f64)>,
    #[serde(default, deserialize_with = "ordered_f64_entries")]
    pub overall_averages: Vec<(String, f64)>,
    #[serde(default, deserialize_with = "ordered_detail_entries")]
    pub detailed_stats: Vec<(String, DetailedStat)>,
}

impl BowlingStats {
    pub fn has_data(&self) -> bool {
        !self.bowling_stats.is_empty() && !self.overall_averages.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    #[serde(default, deserialize_with = "string_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "f64_or_none")]
    pub first_innings_avg: Option<f64>,
    #[serde(default, deserialize_with = "f64_or_none")]
    pub second_innings_avg: Option<f64>,
    #[serde(default, deserialize_with = "f64_or_none")]
    pub first_innings_sr: Option<f64>,
    #[serde(default, deserialize_with = "f64_or_none")]
    pub second_innings_sr: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DismissalLocation {
    #[serde(default, deserialize_with = "string_or_default")]
    pub position: String,
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DismissalData {
    #[serde(default, deserialize_with = "string_or_default")]
    pub player: String,
    #[serde(default, deserialize_with = "vec_or_default")]
    pub dismissal_locations: Vec<DismissalLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WagonZone {
    #[serde(default, deserialize_with = "string_or_default")]
    pub field_zone: String,
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub n_boundaries: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WagonSummary {
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub zones_with_data: u32,
    #[serde(default)]
    pub most_productive_zone: Option<String>,
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub most_productive_boundaries: u32,
    #[serde(default)]
    pub least_productive_zone: Option<String>,
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub least_productive_boundaries: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WagonWheelData {
    #[serde(default, deserialize_with = "vec_or_default")]
    pub zones: Vec<WagonZone>,
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub total_boundaries: u32,
    #[serde(default)]
    pub summary: WagonSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeRateZone {
    #[serde(default, deserialize_with = "string_or_default")]
    pub line_bin: String,
    #[serde(default, deserialize_with = "string_or_default")]
    pub length_bin: String,
    #[serde(rename = "SR", default, deserialize_with = "f64_or_zero")]
    pub sr: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeRateZonesData {
    #[serde(default, deserialize_with = "vec_or_default")]
    pub zones: Vec<StrikeRateZone>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverBowler {
    #[serde(default, deserialize_with = "string_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub overs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverEntry {
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub over: u32,
    #[serde(default, deserialize_with = "vec_or_default")]
    pub bowlers: Vec<OverBowler>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PacerSpinnerOver {
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub over: u32,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub pacer_overs: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub spinner_overs: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub total_overs: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TossDecision {
    #[serde(default, deserialize_with = "string_or_default")]
    pub toss: String,
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub batted_first: u32,
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub bowled_first: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TossSituation {
    #[serde(default, deserialize_with = "string_or_default")]
    pub situation: String,
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub wins: u32,
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub losses: u32,
    #[serde(default, deserialize_with = "u32_or_zero")]
    pub no_result: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NbaTeamStats {
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub games_played: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_pts_h1: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_pts_h2: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_pts_conc_h1: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_diff_q1: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_diff_q2: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_diff_q3: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_diff_q4: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_win_margin: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_loss_margin: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub wins_when_leading_q1: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub wins_when_trailing_q1: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NbaPlayerStats {
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub games_played_window: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_points_first_half_per_game: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_points_second_half_per_game: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_points_q1_per_game: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_points_q2_per_game: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_points_q3_per_game: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub avg_points_q4_per_game: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub points_per_game_last5: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub points_per_game_last10: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub rebounds_per_game_last5: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub assists_per_game_last5: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub threes_made_per_game_last5: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerBundle {
    pub insights: Insights,
    pub bowling: Option<BowlingStats>,
    pub scatter: Vec<ScatterPoint>,
    pub dismissals: Option<DismissalData>,
    pub strike_zones: Option<StrikeRateZonesData>,
    pub wagon_wheel: Option<WagonWheelData>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamBundle {
    pub insights: Insights,
    pub bowling: Option<BowlingStats>,
    pub scatter: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverByOverBundle {
    pub overs: Vec<OverEntry>,
    pub pacer_spinner: Vec<PacerSpinnerOver>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueBundle {
    pub insights: Vec<String>,
    pub toss_decisions: Vec<TossDecision>,
    pub situations: Vec<TossSituation>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NbaBundle {
    pub home_players: Vec<String>,
    pub away_players: Vec<String>,
    pub home_stats: Option<NbaTeamStats>,
    pub away_stats: Option<NbaTeamStats>,
    pub home_selected: Vec<(String, NbaPlayerStats)>,
    pub away_selected: Vec<(String, NbaPlayerStats)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlideData {
    Player(PlayerBundle),
    Team(TeamBundle),
    OverByOver(OverByOverBundle),
    Venue(VenueBundle),
    Nba(NbaBundle),
}

impl SlideData {
    pub fn empty(kind: SlideKind) -> Self {
        match kind {
            SlideKind::Player => SlideData::Player(PlayerBundle::default()),
            SlideKind::Team => SlideData::Team(TeamBundle::default()),
            SlideKind::OverByOver => SlideData::OverByOver(OverByOverBundle::default()),
            SlideKind::Venue => SlideData::Venue(VenueBundle::default()),
            SlideKind::Nba => SlideData::Nba(NbaBundle::default()),
        }
    }

    pub fn kind(&self) -> SlideKind {
        match self {
            SlideData::Player(_) => SlideKind::Player,
            SlideData::Team(_) => SlideKind::Team,
            SlideData::OverByOver(_) => SlideKind::OverByOver,
            SlideData::Venue(_) => SlideKind::Venue,
            SlideData::Nba(_) => SlideKind::Nba,
        }
    }
}

/// Slide whose reads have all resolved (successfully or not). Rendering and
/// capture only ever see this type, never a pending slide.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadySlide {
    pub slide: Slide,
    pub data: SlideData,
    pub opposition: Option<String>,
    pub notes: Option<String>,
    pub errors: Vec<String>,
}

impl ReadySlide {
    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn vec_or_default<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

fn string_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let rendered = match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(rendered)
}

fn f64_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_f64(&value))
}

fn f64_or_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(f64_or_none(deserializer)?.unwrap_or(0.0))
}

fn u32_or_zero<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64_or_none(deserializer)?.unwrap_or(0.0);
    if value.is_finite() && value > 0.0 {
        Ok(value.round().min(u32::MAX as f64) as u32)
    } else {
        Ok(0)
    }
}

fn value_to_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn ordered_f64_entries<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<(String, serde_json::Value)> = ordered_entries(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| (key, value_to_f64(&value).unwrap_or(0.0)))
        .collect())
}

fn ordered_detail_entries<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, DetailedStat)>, D::Error>
where
    D: Deserializer<'de>,
{
    ordered_entries(deserializer)
}

fn ordered_entries<'de, D, T>(deserializer: D) -> std::result::Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(std::marker::PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JSON object or null")
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::new();
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                out.push((key, value));
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(EntriesVisitor(std::marker::PhantomData))
}
