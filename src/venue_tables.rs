use crate::cell_tone::Tone;
use crate::state::{TossDecision, TossSituation};

#[derive(Debug, Clone, PartialEq)]
pub struct SituationRow {
    pub situation: String,
    pub wins: u32,
    pub losses: u32,
    pub no_result: u32,
    pub win_pct: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRow {
    pub toss: String,
    pub batted_first: u32,
    pub bowled_first: u32,
    pub batted_tone: Tone,
    pub bowled_tone: Tone,
}

pub const SITUATION_HEADERS: [&str; 5] = ["Situation", "Wins", "Losses", "No Result", "Win %"];
pub const DECISION_HEADERS: [&str; 3] = ["Toss", "Batted First", "Bowled First"];

/// Win share over decided games, two decimals; `0.00` with nothing decided.
pub fn win_percentage(wins: u32, losses: u32) -> String {
    let decided = wins + losses;
    if decided == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", wins as f64 / decided as f64 * 100.0)
}

pub fn situation_rows(situations: &[TossSituation]) -> Vec<SituationRow> {
    situations
        .iter()
        .map(|s| SituationRow {
            situation: s.situation.clone(),
            wins: s.wins,
            losses: s.losses,
            no_result: s.no_result,
            win_pct: win_percentage(s.wins, s.losses),
        })
        .collect()
}

pub fn decision_rows(decisions: &[TossDecision]) -> Vec<DecisionRow> {
    decisions
        .iter()
        .map(|d| DecisionRow {
            toss: d.toss.clone(),
            batted_first: d.batted_first,
            bowled_first: d.bowled_first,
            batted_tone: compare(d.batted_first, d.bowled_first),
            bowled_tone: compare(d.bowled_first, d.batted_first),
        })
        .collect()
}

fn compare(this: u32, other: u32) -> Tone {
    match this.cmp(&other) {
        std::cmp::Ordering::Greater => Tone::Favorable,
        std::cmp::Ordering::Less => Tone::Unfavorable,
        std::cmp::Ordering::Equal => Tone::Neutral,
    }
}

impl SituationRow {
    pub fn cells(&self) -> [String; 5] {
        [
            self.situation.clone(),
            self.wins.to_string(),
            self.losses.to_string(),
            self.no_result.to_string(),
            format!("{}%", self.win_pct),
        ]
    }
}

impl DecisionRow {
    pub fn cells(&self) -> [String; 3] {
        [
            self.toss.clone(),
            self.batted_first.to_string(),
            self.bowled_first.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages() {
        assert_eq!(win_percentage(0, 0), "0.00");
        assert_eq!(win_percentage(2, 1), "66.67");
        assert_eq!(win_percentage(5, 0), "100.00");
    }

    #[test]
    fn decision_tones_mirror() {
        let rows = decision_rows(&[TossDecision {
            toss: "Won".to_string(),
            batted_first: 3,
            bowled_first: 7,
        }]);
        assert_eq!(rows[0].batted_tone, Tone::Unfavorable);
        assert_eq!(rows[0].bowled_tone, Tone::Favorable);
    }
}
