use crate::state::{NbaPlayerStats, NbaTeamStats};

/// Rule-based read of one team or player. Strengths and weaknesses always
/// carry at least one entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NbaInsights {
    pub ai_insights: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

fn signed(v: f64) -> String {
    format!("{v:+.1}")
}

fn one(v: f64) -> String {
    format!("{v:.1}")
}

pub fn team_insights(team: &str, s: &NbaTeamStats) -> NbaInsights {
    let mut out = NbaInsights::default();

    out.ai_insights.push(format!(
        "{team} averages {} points in the first half and {} in the second half over {} games",
        one(s.avg_pts_h1),
        one(s.avg_pts_h2),
        s.games_played
    ));
    if s.avg_diff_q1 > 0.0 {
        out.ai_insights.push(format!(
            "Strong Q1 performance with {} average point differential",
            signed(s.avg_diff_q1)
        ));
    } else {
        out.ai_insights.push(format!(
            "Q1 performance shows {} average point differential",
            one(s.avg_diff_q1)
        ));
    }
    out.ai_insights.push(format!(
        "Win margin of {} points when victorious, loss margin of {} when defeated",
        one(s.avg_win_margin),
        one(s.avg_loss_margin.abs())
    ));

    if s.avg_diff_q1 > 2.0 {
        out.strengths.push(format!(
            "Excellent first quarter starts ({} avg differential)",
            signed(s.avg_diff_q1)
        ));
    }
    if s.avg_diff_q3 > 2.0 {
        out.strengths.push(format!(
            "Dominant third quarter performance ({} avg differential)",
            signed(s.avg_diff_q3)
        ));
    }
    if s.wins_when_leading_q1 > s.wins_when_trailing_q1 * 1.5 {
        out.strengths.push(format!(
            "Strong ability to protect early leads ({} wins when leading Q1)",
            s.wins_when_leading_q1
        ));
    }
    if s.avg_pts_h2 > s.avg_pts_h1 {
        out.strengths.push(format!(
            "Better second half scoring ({} vs {} pts)",
            one(s.avg_pts_h2),
            one(s.avg_pts_h1)
        ));
    }
    let quarters = [s.avg_diff_q1, s.avg_diff_q2, s.avg_diff_q3, s.avg_diff_q4];
    if out.strengths.is_empty() {
        let (q, v) = extreme_quarter(&quarters, f64::max);
        let text = match q {
            1 => "Competitive first quarter play with {} point differential",
            2 => "Solid second quarter performance with {} point differential",
            3 => "Strong third quarter execution with {} point differential",
            _ => "Resilient fourth quarter play with {} point differential",
        };
        out.strengths.push(text.replace("{}", &one(v)));
    }

    if s.avg_diff_q4 < -1.0 {
        out.weaknesses.push(format!(
            "Struggles in fourth quarter ({} avg differential)",
            one(s.avg_diff_q4)
        ));
    }
    if s.avg_pts_conc_h1 > s.avg_pts_h1 {
        out.weaknesses.push(format!(
            "First half defensive issues (conceding {} pts vs scoring {} pts)",
            one(s.avg_pts_conc_h1),
            one(s.avg_pts_h1)
        ));
    }
    if s.wins_when_trailing_q1 < s.wins_when_leading_q1 * 0.3 {
        out.weaknesses.push(format!(
            "Difficulty recovering from slow starts (only {} wins when trailing Q1)",
            s.wins_when_trailing_q1
        ));
    }
    if s.avg_loss_margin.abs() > s.avg_win_margin * 1.2 {
        out.weaknesses.push(format!(
            "Larger loss margins ({} pts) compared to win margins ({} pts)",
            one(s.avg_loss_margin.abs()),
            one(s.avg_win_margin)
        ));
    }
    if out.weaknesses.is_empty() {
        let (q, v) = extreme_quarter(&quarters, f64::min);
        let text = match q {
            1 => "Room for improvement in first quarter ({} point differential)",
            2 => "Second quarter needs attention ({} point differential)",
            3 => "Third quarter requires focus ({} point differential)",
            _ => "Fourth quarter closing needs work ({} point differential)",
        };
        out.weaknesses.push(text.replace("{}", &one(v)));
    }

    out
}

pub fn player_insights(player: &str, s: &NbaPlayerStats) -> NbaInsights {
    let mut out = NbaInsights::default();

    out.ai_insights.push(format!(
        "{player} averages {} pts in first half and {} pts in second half",
        one(s.avg_points_first_half_per_game),
        one(s.avg_points_second_half_per_game)
    ));
    if s.points_per_game_last5 > 0.0 {
        out.ai_insights.push(format!(
            "Recent form: {} PPG, {} RPG, {} APG in last 5 games",
            one(s.points_per_game_last5),
            one(s.rebounds_per_game_last5),
            one(s.assists_per_game_last5)
        ));
    } else {
        out.ai_insights.push(format!(
            "Played {} games with varied performance across quarters",
            s.games_played_window
        ));
    }
    out.ai_insights.push(format!(
        "Quarter-by-quarter scoring: Q1 {}, Q2 {}, Q3 {}, Q4 {} PPG",
        one(s.avg_points_q1_per_game),
        one(s.avg_points_q2_per_game),
        one(s.avg_points_q3_per_game),
        one(s.avg_points_q4_per_game)
    ));

    let quarters = [
        s.avg_points_q1_per_game,
        s.avg_points_q2_per_game,
        s.avg_points_q3_per_game,
        s.avg_points_q4_per_game,
    ];
    let (max_q, max_v) = extreme_quarter(&quarters, f64::max);
    if max_v > 3.0 && s.avg_points_q1_per_game == max_v {
        out.strengths.push(format!(
            "Strong first quarter scorer ({} PPG in Q1)",
            one(s.avg_points_q1_per_game)
        ));
    } else if max_v > 3.0 && s.avg_points_q4_per_game == max_v {
        out.strengths.push(format!(
            "Clutch fourth quarter performer ({} PPG in Q4)",
            one(s.avg_points_q4_per_game)
        ));
    }
    if s.points_per_game_last5 > s.points_per_game_last10 {
        out.strengths.push(format!(
            "Improving recent form ({} PPG last 5 vs {} PPG last 10)",
            one(s.points_per_game_last5),
            one(s.points_per_game_last10)
        ));
    }
    if s.assists_per_game_last5 > 3.0 {
        out.strengths.push(format!(
            "Excellent playmaker ({} APG in last 5 games)",
            one(s.assists_per_game_last5)
        ));
    }
    if s.threes_made_per_game_last5 > 2.0 {
        out.strengths.push(format!(
            "Reliable three-point shooter ({} 3PM per game)",
            one(s.threes_made_per_game_last5)
        ));
    }
    if out.strengths.is_empty() {
        let text = match max_q {
            1 => "Consistent first quarter contributor ({} PPG in Q1)",
            2 => "Solid second quarter production ({} PPG in Q2)",
            3 => "Effective third quarter play ({} PPG in Q3)",
            _ => "Reliable fourth quarter option ({} PPG in Q4)",
        };
        out.strengths.push(text.replace("{}", &one(max_v)));
    }

    let (min_q, min_v) = extreme_quarter(&quarters, f64::min);
    if s.avg_points_q2_per_game == min_v && min_v < 2.0 {
        out.weaknesses.push(format!(
            "Low second quarter production ({} PPG in Q2)",
            one(s.avg_points_q2_per_game)
        ));
    }
    if s.points_per_game_last5 < s.points_per_game_last10 * 0.8 {
        out.weaknesses.push(format!(
            "Recent scoring decline ({} PPG last 5 vs {} PPG last 10)",
            one(s.points_per_game_last5),
            one(s.points_per_game_last10)
        ));
    }
    if s.rebounds_per_game_last5 < 2.0 {
        out.weaknesses.push(format!(
            "Limited rebounding contribution ({} RPG)",
            one(s.rebounds_per_game_last5)
        ));
    }
    if s.avg_points_second_half_per_game < s.avg_points_first_half_per_game * 0.7 {
        out.weaknesses.push(format!(
            "Second half scoring drop-off ({} vs {} pts)",
            one(s.avg_points_second_half_per_game),
            one(s.avg_points_first_half_per_game)
        ));
    }
    if out.weaknesses.is_empty() {
        let text = match min_q {
            1 => "First quarter scoring needs improvement ({} PPG in Q1)",
            2 => "Second quarter production could be better ({} PPG in Q2)",
            3 => "Third quarter impact needs work ({} PPG in Q3)",
            _ => "Fourth quarter scoring requires attention ({} PPG in Q4)",
        };
        out.weaknesses.push(text.replace("{}", &one(min_v)));
    }

    out
}

/// 1-based quarter holding the extreme value; the earliest quarter wins ties.
fn extreme_quarter(values: &[f64; 4], pick: fn(f64, f64) -> f64) -> (usize, f64) {
    let target = values.iter().copied().fold(values[0], pick);
    let idx = values.iter().position(|v| *v == target).unwrap_or(0);
    (idx + 1, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_team_still_gets_strength_and_weakness() {
        let stats = NbaTeamStats {
            games_played: 10.0,
            avg_pts_h1: 55.0,
            avg_pts_h2: 55.0,
            avg_pts_conc_h1: 50.0,
            avg_diff_q2: 1.5,
            avg_diff_q4: -0.5,
            avg_win_margin: 8.0,
            avg_loss_margin: -6.0,
            wins_when_leading_q1: 3.0,
            wins_when_trailing_q1: 3.0,
            ..NbaTeamStats::default()
        };
        let insights = team_insights("Lakers", &stats);
        assert_eq!(insights.ai_insights.len(), 3);
        assert_eq!(
            insights.strengths,
            vec!["Solid second quarter performance with 1.5 point differential"]
        );
        assert_eq!(
            insights.weaknesses,
            vec!["Fourth quarter closing needs work (-0.5 point differential)"]
        );
        assert!(insights.ai_insights[0].contains("over 10 games"));
    }

    #[test]
    fn hot_player() {
        let stats = NbaPlayerStats {
            avg_points_first_half_per_game: 14.0,
            avg_points_second_half_per_game: 12.0,
            avg_points_q1_per_game: 8.0,
            avg_points_q2_per_game: 6.0,
            avg_points_q3_per_game: 7.0,
            avg_points_q4_per_game: 5.0,
            points_per_game_last5: 28.0,
            points_per_game_last10: 25.0,
            rebounds_per_game_last5: 7.0,
            assists_per_game_last5: 8.0,
            threes_made_per_game_last5: 1.0,
            ..NbaPlayerStats::default()
        };
        let insights = player_insights("Star", &stats);
        assert_eq!(insights.strengths.len(), 3);
        assert!(insights.strengths[0].starts_with("Strong first quarter scorer"));
        assert_eq!(
            insights.weaknesses,
            vec!["Fourth quarter scoring requires attention (5.0 PPG in Q4)"]
        );
    }
}
