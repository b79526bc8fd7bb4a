use crate::cell_tone::{Direction, Tone, prettify_label, rank_tone};
use crate::state::{BowlingStats, DetailedStat};

#[derive(Debug, Clone, PartialEq)]
pub struct BowlerRow {
    pub bowling_type: String,
    pub balls: f64,
    pub strike_rate: f64,
    pub average: f64,
    pub dot_pct: f64,
    pub boundary_pct: f64,
    pub overall_avg: f64,
    pub strike_rate_tone: Tone,
    pub average_tone: Tone,
    pub dot_pct_tone: Tone,
    pub boundary_pct_tone: Tone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BowlerTable {
    pub subject: String,
    pub rows: Vec<BowlerRow>,
}

pub const BOWLER_TABLE_HEADERS: [&str; 6] = [
    "Bowler Type",
    "Balls Faced",
    "Strike Rate",
    "Average",
    "Dot Ball %",
    "Boundary %",
];

/// One row per bowling type in backend order. The detailed strike rate wins
/// over the summary value unless it is zero.
pub fn bowler_table(stats: &BowlingStats) -> Option<BowlerTable> {
    if !stats.has_data() {
        return None;
    }

    let mut rows: Vec<BowlerRow> = stats
        .bowling_stats
        .iter()
        .map(|(key, summary_sr)| {
            let detail = lookup(&stats.detailed_stats, key).copied().unwrap_or_default();
            let overall_avg = lookup(&stats.overall_averages, key).copied().unwrap_or(0.0);
            row_from(key, *summary_sr, &detail, overall_avg)
        })
        .collect();

    let column = |f: fn(&BowlerRow) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
    let sr = column(|r: &BowlerRow| r.strike_rate);
    let avg = column(|r: &BowlerRow| r.average);
    let dot = column(|r: &BowlerRow| r.dot_pct);
    let boundary = column(|r: &BowlerRow| r.boundary_pct);

    for row in &mut rows {
        row.strike_rate_tone = rank_tone(row.strike_rate, &sr, Direction::HigherIsBetter);
        row.average_tone = rank_tone(row.average, &avg, Direction::HigherIsBetter);
        row.dot_pct_tone = rank_tone(row.dot_pct, &dot, Direction::LowerIsBetter);
        row.boundary_pct_tone = rank_tone(row.boundary_pct, &boundary, Direction::HigherIsBetter);
    }

    let subject = if stats.player.is_empty() {
        stats.team.clone()
    } else {
        stats.player.clone()
    };
    Some(BowlerTable { subject, rows })
}

impl BowlerRow {
    pub fn cells(&self) -> [String; 6] {
        [
            self.bowling_type.clone(),
            format!("{}", self.balls),
            format!("{:.1}", self.strike_rate),
            format!("{:.1}", self.average),
            format!("{:.1}%", self.dot_pct),
            format!("{:.1}%", self.boundary_pct),
        ]
    }

    /// Tone per cell; the first two columns are plain.
    pub fn tones(&self) -> [Option<Tone>; 6] {
        [
            None,
            None,
            Some(self.strike_rate_tone),
            Some(self.average_tone),
            Some(self.dot_pct_tone),
            Some(self.boundary_pct_tone),
        ]
    }
}

fn row_from(key: &str, summary_sr: f64, detail: &DetailedStat, overall_avg: f64) -> BowlerRow {
    let strike_rate = if detail.strike_rate != 0.0 {
        detail.strike_rate
    } else {
        summary_sr
    };
    BowlerRow {
        bowling_type: prettify_label(key),
        balls: detail.balls,
        strike_rate,
        average: detail.average,
        dot_pct: detail.dot_pct,
        boundary_pct: detail.boundary_pct,
        overall_avg,
        strike_rate_tone: Tone::Neutral,
        average_tone: Tone::Neutral,
        dot_pct_tone: Tone::Neutral,
        boundary_pct_tone: Tone::Neutral,
    }
}

pub(crate) fn lookup<'a, T>(entries: &'a [(String, T)], key: &str) -> Option<&'a T> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> BowlingStats {
        let types = ["right arm pace", "left arm pace", "off spin", "leg spin", "left arm orthodox"];
        let srs = [150.0, 130.0, 120.0, 110.0, 100.0];
        BowlingStats {
            player: "Test Player".to_string(),
            team: String::new(),
            bowling_stats: types.iter().zip(srs).map(|(t, s)| (t.to_string(), s)).collect(),
            overall_averages: types.iter().map(|t| (t.to_string(), 130.0)).collect(),
            detailed_stats: vec![(
                "off spin".to_string(),
                DetailedStat {
                    strike_rate: 0.0,
                    balls: 60.0,
                    dot_pct: 30.0,
                    ..DetailedStat::default()
                },
            )],
        }
    }

    #[test]
    fn top_two_and_bottom_two() {
        let table = bowler_table(&stats()).expect("table");
        let tones: Vec<Tone> = table.rows.iter().map(|r| r.strike_rate_tone).collect();
        assert_eq!(
            tones,
            vec![Tone::Favorable, Tone::Favorable, Tone::Neutral, Tone::Unfavorable, Tone::Unfavorable]
        );
        assert_eq!(table.rows[2].strike_rate, 120.0);
        assert_eq!(table.rows[2].balls, 60.0);
        assert_eq!(table.subject, "Test Player");
    }

    #[test]
    fn missing_averages_means_no_table() {
        let mut s = stats();
        s.overall_averages.clear();
        assert!(bowler_table(&s).is_none());
    }
}
