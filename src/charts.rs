use crate::cell_tone::prettify_label;
use crate::state::{BowlingStats, OverEntry, PacerSpinnerOver, ScatterPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScatterMetric {
    #[default]
    Average,
    StrikeRate,
}

impl ScatterMetric {
    pub fn toggle(self) -> Self {
        match self {
            ScatterMetric::Average => ScatterMetric::StrikeRate,
            ScatterMetric::StrikeRate => ScatterMetric::Average,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScatterMetric::Average => "Average",
            ScatterMetric::StrikeRate => "Strike Rate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatterScope {
    Player,
    Team,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterDot {
    pub name: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterView {
    pub metric: ScatterMetric,
    pub dots: Vec<ScatterDot>,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    /// Quadrant reference lines; `None` when a player plot has no points.
    pub reference: Option<(f64, f64)>,
}

/// First innings on x, second innings on y. Team plots use fixed league
/// axes; player plots centre their reference lines on the dataset mean,
/// counting missing values as zero.
pub fn scatter_view(
    points: &[ScatterPoint],
    metric: ScatterMetric,
    scope: ScatterScope,
    highlight: &str,
) -> ScatterView {
    let dots: Vec<ScatterDot> = points
        .iter()
        .map(|p| {
            let (x, y) = match metric {
                ScatterMetric::Average => (p.first_innings_avg, p.second_innings_avg),
                ScatterMetric::StrikeRate => (p.first_innings_sr, p.second_innings_sr),
            };
            ScatterDot {
                name: p.name.clone(),
                x,
                y,
                selected: p.name == highlight,
            }
        })
        .collect();

    let mean = |f: fn(&ScatterDot) -> Option<f64>| {
        dots.iter().map(|d| f(d).unwrap_or(0.0)).sum::<f64>() / dots.len() as f64
    };
    let data_reference = if dots.is_empty() {
        None
    } else {
        Some((mean(|d: &ScatterDot| d.x), mean(|d: &ScatterDot| d.y)))
    };

    let (x_domain, y_domain, x_ticks, y_ticks, reference) = match (scope, metric) {
        (ScatterScope::Team, ScatterMetric::Average) => (
            (155.0, 175.0),
            (145.0, 165.0),
            ticks(155.0, 175.0, 5.0),
            ticks(145.0, 165.0, 5.0),
            Some((167.42, 155.18)),
        ),
        (ScatterScope::Team, ScatterMetric::StrikeRate) => (
            (130.0, 156.0),
            (130.0, 170.0),
            ticks(130.0, 155.0, 5.0),
            ticks(130.0, 170.0, 5.0),
            Some((140.0, 138.0)),
        ),
        (ScatterScope::Player, ScatterMetric::Average) => (
            (20.0, 60.0),
            (15.0, 85.0),
            ticks(20.0, 60.0, 10.0),
            ticks(15.0, 85.0, 10.0),
            data_reference,
        ),
        (ScatterScope::Player, ScatterMetric::StrikeRate) => (
            (100.0, 200.0),
            (100.0, 200.0),
            ticks(100.0, 200.0, 20.0),
            ticks(100.0, 200.0, 20.0),
            data_reference,
        ),
    };

    ScatterView {
        metric,
        dots,
        x_domain,
        y_domain,
        x_ticks,
        y_ticks,
        reference,
    }
}

fn ticks(from: f64, to: f64, step: f64) -> Vec<f64> {
    let count = ((to - from) / step).round() as usize;
    (0..=count).map(|i| from + step * i as f64).collect()
}

pub const RADAR_MAX: f64 = 200.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RadarAxis {
    pub label: String,
    pub entity: f64,
    pub overall: f64,
}

/// One spoke per bowling type in the overall averages, minus right-arm pace.
pub fn radar_axes(stats: &BowlingStats) -> Vec<RadarAxis> {
    if !stats.has_data() {
        return Vec::new();
    }
    stats
        .overall_averages
        .iter()
        .filter(|(key, _)| !key.to_lowercase().contains("right arm pace"))
        .map(|(key, overall)| RadarAxis {
            label: prettify_label(key),
            entity: crate::bowler_table::lookup(&stats.bowling_stats, key)
                .copied()
                .unwrap_or(0.0),
            overall: *overall,
        })
        .collect()
}

pub const BOWLER_PALETTE: [&str; 20] = [
    "#14b8a6", "#f59e0b", "#ef4444", "#8b5cf6", "#10b981", "#f97316", "#06b6d4", "#84cc16",
    "#ec4899", "#6366f1", "#22d3ee", "#fbbf24", "#fb7185", "#a78bfa", "#4ade80", "#facc15",
    "#f472b6", "#60a5fa", "#34d399", "#fcd34d",
];
pub const PACER_COLOR: &str = "#ef4444";
pub const SPINNER_COLOR: &str = "#14b8a6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverMode {
    #[default]
    Bowlers,
    PacerSpinner,
}

impl OverMode {
    pub fn toggle(self) -> Self {
        match self {
            OverMode::Bowlers => OverMode::PacerSpinner,
            OverMode::PacerSpinner => OverMode::Bowlers,
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            OverMode::Bowlers => "Bowling Distribution Across Overs",
            OverMode::PacerSpinner => "Pacer vs Spinner Breakdown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackSegment {
    pub name: String,
    pub overs: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverStack {
    pub over: u32,
    pub segments: Vec<StackSegment>,
    pub total: f64,
}

/// Bowlers in first-appearance order; colours follow that order.
pub fn bowler_order(overs: &[OverEntry]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for entry in overs {
        for bowler in &entry.bowlers {
            if !names.contains(&bowler.name) {
                names.push(bowler.name.clone());
            }
        }
    }
    names
}

pub fn bowler_color(index: usize) -> &'static str {
    BOWLER_PALETTE[index % BOWLER_PALETTE.len()]
}

pub fn bowler_stacks(overs: &[OverEntry]) -> Vec<OverStack> {
    let order = bowler_order(overs);
    overs
        .iter()
        .map(|entry| {
            let mut segments: Vec<StackSegment> = Vec::new();
            for (idx, name) in order.iter().enumerate() {
                let overs_bowled: f64 = entry
                    .bowlers
                    .iter()
                    .filter(|b| &b.name == name)
                    .map(|b| b.overs)
                    .sum();
                if overs_bowled > 0.0 {
                    segments.push(StackSegment {
                        name: name.clone(),
                        overs: overs_bowled,
                        color: bowler_color(idx),
                    });
                }
            }
            OverStack {
                over: entry.over,
                total: entry.bowlers.iter().map(|b| b.overs).sum(),
                segments,
            }
        })
        .collect()
}

pub fn pacer_spinner_stacks(overs: &[PacerSpinnerOver]) -> Vec<OverStack> {
    overs
        .iter()
        .map(|entry| OverStack {
            over: entry.over,
            segments: vec![
                StackSegment {
                    name: "Pacer".to_string(),
                    overs: entry.pacer_overs,
                    color: PACER_COLOR,
                },
                StackSegment {
                    name: "Spinner".to_string(),
                    overs: entry.spinner_overs,
                    color: SPINNER_COLOR,
                },
            ],
            total: entry.total_overs,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::OverBowler;

    fn point(name: &str, avg: (Option<f64>, Option<f64>)) -> ScatterPoint {
        ScatterPoint {
            name: name.to_string(),
            first_innings_avg: avg.0,
            second_innings_avg: avg.1,
            ..ScatterPoint::default()
        }
    }

    #[test]
    fn player_reference_is_mean_with_missing_as_zero() {
        let pts = vec![point("A", (Some(40.0), Some(30.0))), point("B", (None, Some(50.0)))];
        let view = scatter_view(&pts, ScatterMetric::Average, ScatterScope::Player, "B");
        assert_eq!(view.reference, Some((20.0, 40.0)));
        assert!(view.dots[1].selected);
        assert_eq!(view.x_ticks, vec![20.0, 30.0, 40.0, 50.0, 60.0]);
    }

    #[test]
    fn team_axes_are_fixed() {
        let view = scatter_view(&[], ScatterMetric::StrikeRate, ScatterScope::Team, "");
        assert_eq!(view.reference, Some((140.0, 138.0)));
        assert_eq!(view.x_domain, (130.0, 156.0));
        assert_eq!(view.x_ticks.last(), Some(&155.0));
    }

    #[test]
    fn radar_drops_right_arm_pace() {
        let stats = BowlingStats {
            bowling_stats: vec![("off spin".to_string(), 125.0)],
            overall_averages: vec![
                ("Right arm pace".to_string(), 140.0),
                ("off spin".to_string(), 118.0),
                ("leg spin".to_string(), 121.0),
            ],
            ..BowlingStats::default()
        };
        let axes = radar_axes(&stats);
        assert_eq!(axes.len(), 2);
        assert_eq!(axes[0].label, "Off spin");
        assert_eq!(axes[0].entity, 125.0);
        assert_eq!(axes[1].entity, 0.0);
    }

    #[test]
    fn stacks_keep_first_seen_colours() {
        let overs = vec![
            OverEntry {
                over: 1,
                bowlers: vec![OverBowler { name: "X".to_string(), overs: 3.0 }],
            },
            OverEntry {
                over: 2,
                bowlers: vec![
                    OverBowler { name: "Y".to_string(), overs: 2.0 },
                    OverBowler { name: "X".to_string(), overs: 1.0 },
                ],
            },
        ];
        let stacks = bowler_stacks(&overs);
        assert_eq!(bowler_order(&overs), vec!["X", "Y"]);
        assert_eq!(stacks[1].segments[0].name, "X");
        assert_eq!(stacks[1].segments[1].color, BOWLER_PALETTE[1]);
        assert_eq!(stacks[1].total, 3.0);
    }
}
