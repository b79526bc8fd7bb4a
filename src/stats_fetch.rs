use anyhow::{Context, Result};
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::http_client::{http_client, presentation_client};
use crate::state::{
    BowlingStats, DismissalData, Insights, NbaPlayerStats, NbaTeamStats, OverEntry,
    PacerSpinnerOver, ScatterPoint, Slide, SlideKind, StrikeRateZonesData, TossDecision,
    TossSituation, WagonWheelData,
};

const PRESENTATION_PATH: &str = "generate-screenshot-ppt";

/// Every backend read the planner performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    Teams,
    Venues,
    Players,
    PlayerInsights(String),
    PlayerBowlingStats(String),
    PlayerDismissals(String),
    PlayerWagonWheel(String),
    PlayerStrikeRateZones(String),
    ScatterPlot { selected_players: Vec<String> },
    TeamInsights(String),
    TeamBowlingStats(String),
    TeamOverByOver(String),
    TeamPacerSpinner(String),
    TeamScatterPlot,
    VenueInsights(String),
    VenueTossDecisions(String),
    VenueTossSituations(String),
    NbaTeamPlayers(String),
    NbaTeamStats(String),
    NbaPlayerStats(String),
}

impl Endpoint {
    pub fn path_segments(&self) -> Vec<String> {
        let nested = |root: &str, name: &str, leaf: &str| {
            vec![root.to_string(), name.to_string(), leaf.to_string()]
        };
        match self {
            Endpoint::Health => Vec::new(),
            Endpoint::Teams => vec!["teams".to_string()],
            Endpoint::Venues => vec!["venues".to_string()],
            Endpoint::Players => vec!["players".to_string()],
            Endpoint::PlayerInsights(p) => nested("player", p, "insights"),
            Endpoint::PlayerBowlingStats(p) => nested("player", p, "bowling-stats"),
            Endpoint::PlayerDismissals(p) => nested("player", p, "dismissal-locations"),
            Endpoint::PlayerWagonWheel(p) => nested("player", p, "wagon-wheel"),
            Endpoint::PlayerStrikeRateZones(p) => nested("player", p, "strike-rate-zones"),
            Endpoint::ScatterPlot { .. } => vec!["scatter-plot-data".to_string()],
            Endpoint::TeamInsights(t) => nested("team", t, "insights"),
            Endpoint::TeamBowlingStats(t) => nested("team", t, "bowling-stats"),
            Endpoint::TeamOverByOver(t) => nested("team", t, "over-by-over"),
            Endpoint::TeamPacerSpinner(t) => nested("team", t, "pacer-spinner-breakdown"),
            Endpoint::TeamScatterPlot => vec!["team-scatter-plot-data".to_string()],
            Endpoint::VenueInsights(v) => nested("venue", v, "insights"),
            Endpoint::VenueTossDecisions(v) => nested("venue", v, "toss-decisions"),
            Endpoint::VenueTossSituations(v) => nested("venue", v, "toss-situation-details"),
            Endpoint::NbaTeamPlayers(t) => {
                vec!["nba".to_string(), "team".to_string(), t.clone(), "players".to_string()]
            }
            Endpoint::NbaTeamStats(t) => {
                vec!["nba".to_string(), "team".to_string(), t.clone(), "stats".to_string()]
            }
            Endpoint::NbaPlayerStats(p) => {
                vec!["nba".to_string(), "player".to_string(), p.clone(), "stats".to_string()]
            }
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::ScatterPlot { selected_players } => {
                vec![("selected_players", selected_players.join(","))]
            }
            _ => Vec::new(),
        }
    }

    /// Per-slide stat reads carry a `t` parameter so intermediaries never
    /// serve a stale body. List and health reads do not.
    pub fn cache_bust(&self) -> bool {
        !matches!(
            self,
            Endpoint::Health | Endpoint::Teams | Endpoint::Venues | Endpoint::Players
        )
    }

    /// Query pairs sent with the read, cache-bust stamp last.
    pub fn request_query(&self, now_millis: i64) -> Vec<(&'static str, String)> {
        let mut query = self.query();
        if self.cache_bust() {
            query.push(("t", now_millis.to_string()));
        }
        query
    }

    pub fn label(&self) -> String {
        let path = self.path_segments().join("/");
        if path.is_empty() { "/".to_string() } else { path }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationSlide {
    #[serde(rename = "type")]
    pub kind: SlideKind,
    pub player_name: Option<String>,
    pub team_name: Option<String>,
    pub venue_name: Option<String>,
    pub opposition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationRequest {
    pub slides: Vec<PresentationSlide>,
}

impl PresentationRequest {
    pub fn from_slides(slides: &[Slide], opposition: Option<&str>) -> Self {
        let slides = slides
            .iter()
            .map(|slide| {
                let data = Some(slide.data.clone());
                PresentationSlide {
                    kind: slide.kind,
                    player_name: data.clone().filter(|_| slide.kind == SlideKind::Player),
                    team_name: data.clone().filter(|_| {
                        matches!(slide.kind, SlideKind::Team | SlideKind::OverByOver)
                    }),
                    venue_name: data.filter(|_| slide.kind == SlideKind::Venue),
                    opposition: opposition.map(str::to_string),
                }
            })
            .collect();
        Self { slides }
    }
}

/// Read access to the stats backend. Implementations must be shareable
/// across the fetch pool.
pub trait StatsApi: Sync {
    fn get(&self, endpoint: &Endpoint) -> Result<String>;

    /// Asks the backend to render its own screenshot deck; returns the pptx bytes.
    fn post_presentation(&self, request: &PresentationRequest) -> Result<Vec<u8>>;

    fn fetch_parallelism(&self) -> usize {
        6
    }
}

pub struct HttpStatsApi {
    config: ApiConfig,
    client: &'static Client,
}

impl HttpStatsApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = http_client(&config)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

impl StatsApi for HttpStatsApi {
    fn get(&self, endpoint: &Endpoint) -> Result<String> {
        let query = endpoint.request_query(chrono::Utc::now().timestamp_millis());
        let url = self.config.endpoint_url(&endpoint.path_segments(), &query)?;
        debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request failed: {}", endpoint.label()))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("http {} for {}: {}", status, endpoint.label(), body));
        }
        Ok(body)
    }

    fn post_presentation(&self, request: &PresentationRequest) -> Result<Vec<u8>> {
        let client = presentation_client(&self.config)?;
        let url = self
            .config
            .endpoint_url(&[PRESENTATION_PATH.to_string()], &[])?;
        debug!("POST {url} ({} slides)", request.slides.len());
        let resp = client
            .post(url)
            .json(request)
            .send()
            .context("presentation request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(anyhow::anyhow!("http {}: {}", status, body));
        }
        let bytes = resp.bytes().context("failed reading presentation body")?;
        if bytes.is_empty() {
            return Err(anyhow::anyhow!("empty presentation response"));
        }
        Ok(bytes.to_vec())
    }

    fn fetch_parallelism(&self) -> usize {
        self.config.fetch_parallelism
    }
}

/// Runs `action` on a dedicated rayon pool sized for network fan-out.
pub fn with_fetch_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads.clamp(2, 32))
        .build()
    {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

pub fn check_api_health(api: &dyn StatsApi) -> Result<()> {
    api.get(&Endpoint::Health).map(|_| ())
}

pub fn fetch_teams(api: &dyn StatsApi) -> Result<Vec<String>> {
    parse_name_list(&api.get(&Endpoint::Teams)?, "teams")
}

pub fn fetch_venues(api: &dyn StatsApi) -> Result<Vec<String>> {
    parse_name_list(&api.get(&Endpoint::Venues)?, "venues")
}

pub fn fetch_players(api: &dyn StatsApi) -> Result<Vec<String>> {
    parse_name_list(&api.get(&Endpoint::Players)?, "players")
}

/// Teams, venues and the roster are independent; a failed list stays empty.
pub struct StartupLists {
    pub teams: Vec<String>,
    pub venues: Vec<String>,
    pub players: Vec<String>,
    pub errors: Vec<String>,
}

pub fn fetch_startup_lists(api: &dyn StatsApi) -> StartupLists {
    let mut errors = Vec::new();
    let mut take = |label: &str, res: Result<Vec<String>>| match res {
        Ok(list) => list,
        Err(err) => {
            errors.push(format!("{label} fetch failed: {err:#}"));
            Vec::new()
        }
    };
    let teams = take("teams", fetch_teams(api));
    let venues = take("venues", fetch_venues(api));
    let players = take("players", fetch_players(api));
    StartupLists {
        teams,
        venues,
        players,
        errors,
    }
}

fn parse_body(raw: &str, what: &str) -> Result<serde_json::Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty {what} response"));
    }
    serde_json::from_str(trimmed).with_context(|| format!("invalid {what} json"))
}

fn parse_field<T>(raw: &str, field: &str, what: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let value = parse_body(raw, what)?;
    match value.get(field) {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(inner) => T::deserialize(inner).with_context(|| format!("invalid {what}.{field}")),
    }
}

fn parse_whole<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T> {
    let value = parse_body(raw, what)?;
    T::deserialize(&value).with_context(|| format!("invalid {what} json"))
}

/// `{ "<field>": ["a", "b"] }`; entries may also be objects with a `name`.
pub fn parse_name_list(raw: &str, field: &str) -> Result<Vec<String>> {
    let values: Vec<serde_json::Value> = parse_field(raw, field, field)?;
    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => map
                .get("name")
                .and_then(|n| n.as_str())
                .map(str::to_string),
            _ => None,
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

pub fn parse_insights(raw: &str) -> Result<Insights> {
    parse_field(raw, "insights", "insights")
}

/// Venue insights arrive as `{insights: {insights: [..]}}` or a bare list.
pub fn parse_venue_insights(raw: &str) -> Result<Vec<String>> {
    let value: serde_json::Value = parse_field(raw, "insights", "venue insights")?;
    let list = match value {
        serde_json::Value::Object(mut map) => map.remove("insights").unwrap_or_default(),
        other => other,
    };
    Ok(match list {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    })
}

pub fn parse_bowling_stats(raw: &str) -> Result<BowlingStats> {
    parse_whole(raw, "bowling stats")
}

pub fn parse_scatter(raw: &str, field: &str) -> Result<Vec<ScatterPoint>> {
    parse_field(raw, field, "scatter")
}

pub fn parse_dismissals(raw: &str) -> Result<DismissalData> {
    parse_whole(raw, "dismissal locations")
}

pub fn parse_wagon_wheel(raw: &str) -> Result<WagonWheelData> {
    parse_whole(raw, "wagon wheel")
}

pub fn parse_strike_rate_zones(raw: &str) -> Result<StrikeRateZonesData> {
    parse_whole(raw, "strike rate zones")
}

pub fn parse_over_by_over(raw: &str) -> Result<Vec<OverEntry>> {
    parse_field(raw, "overs_data", "over-by-over")
}

pub fn parse_pacer_spinner(raw: &str) -> Result<Vec<PacerSpinnerOver>> {
    parse_field(raw, "overs_data", "pacer-spinner breakdown")
}

pub fn parse_toss_decisions(raw: &str) -> Result<Vec<TossDecision>> {
    parse_field(raw, "toss_decisions", "toss decisions")
}

pub fn parse_toss_situations(raw: &str) -> Result<Vec<TossSituation>> {
    parse_field(raw, "situation_details", "toss situations")
}

pub fn parse_nba_team_stats(raw: &str) -> Result<NbaTeamStats> {
    parse_whole(raw, "nba team stats")
}

pub fn parse_nba_player_stats(raw: &str) -> Result<NbaPlayerStats> {
    parse_whole(raw, "nba player stats")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(
            Endpoint::TeamPacerSpinner("Mumbai Indians".to_string()).label(),
            "team/Mumbai Indians/pacer-spinner-breakdown"
        );
        assert_eq!(Endpoint::Health.label(), "/");
        assert!(!Endpoint::Teams.cache_bust());
        assert!(Endpoint::VenueInsights("Eden Gardens".to_string()).cache_bust());
        let scatter = Endpoint::ScatterPlot {
            selected_players: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(scatter.query(), vec![("selected_players", "A,B".to_string())]);
    }

    #[test]
    fn stat_reads_carry_t_stamp() {
        let scatter = Endpoint::ScatterPlot {
            selected_players: vec!["P1".to_string()],
        };
        assert_eq!(
            scatter.request_query(1_700_000_000_000),
            vec![
                ("selected_players", "P1".to_string()),
                ("t", "1700000000000".to_string()),
            ]
        );
        assert!(Endpoint::Players.request_query(42).is_empty());
    }

    #[test]
    fn presentation_payload_names_fields_by_kind() {
        let slides = vec![
            Slide::new(SlideKind::Player, "MS Dhoni", 1),
            Slide::new(SlideKind::OverByOver, "Chennai Super Kings", 2),
        ];
        let req = PresentationRequest::from_slides(&slides, Some("Chennai Super Kings"));
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json["slides"][0]["type"], "player");
        assert_eq!(json["slides"][0]["player_name"], "MS Dhoni");
        assert!(json["slides"][0]["team_name"].is_null());
        assert_eq!(json["slides"][1]["type"], "overbyover");
        assert_eq!(json["slides"][1]["team_name"], "Chennai Super Kings");
    }

    #[test]
    fn empty_body_is_an_error() {
        assert!(parse_insights("  ").is_err());
        assert!(parse_insights("null").is_err());
        assert!(parse_insights("{}").expect("defaults").is_empty());
    }
}
