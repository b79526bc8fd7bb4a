mod common;

use common::read_fixture;
use opposition_planner::bowler_table::bowler_table;
use opposition_planner::cell_tone::{Direction, Tone, rank_tone};
use opposition_planner::charts::{
    ScatterMetric, ScatterScope, bowler_stacks, bowler_color, pacer_spinner_stacks, radar_axes,
    scatter_view,
};
use opposition_planner::field_maps::{UNMAPPED_POSITION, WAGON_CANVAS, pitch_dots, wagon_view};
use opposition_planner::nba_insights::{player_insights, team_insights};
use opposition_planner::stats_fetch::{
    parse_bowling_stats, parse_dismissals, parse_nba_player_stats, parse_nba_team_stats,
    parse_over_by_over, parse_pacer_spinner, parse_scatter, parse_strike_rate_zones,
    parse_toss_decisions, parse_toss_situations, parse_wagon_wheel,
};
use opposition_planner::strike_zones::zone_grid;
use opposition_planner::venue_tables::{decision_rows, situation_rows};

#[test]
fn rank_tone_marks_top_and_bottom_two() {
    let values = [10.0, 20.0, 30.0, 40.0, 50.0, 50.0];
    let tones: Vec<Tone> = values
        .iter()
        .map(|v| rank_tone(*v, &values, Direction::HigherIsBetter))
        .collect();
    assert_eq!(
        tones,
        vec![
            Tone::Unfavorable,
            Tone::Unfavorable,
            Tone::Neutral,
            Tone::Favorable,
            Tone::Favorable,
            Tone::Favorable,
        ]
    );
    assert_eq!(rank_tone(10.0, &values, Direction::LowerIsBetter), Tone::Favorable);
    assert_eq!(rank_tone(50.0, &values, Direction::LowerIsBetter), Tone::Unfavorable);
}

#[test]
fn bowler_table_from_fixture() {
    let stats = parse_bowling_stats(&read_fixture("bowling_stats.json")).expect("stats");
    let table = bowler_table(&stats).expect("table");
    assert_eq!(table.subject, "P1");
    let names: Vec<&str> = table.rows.iter().map(|r| r.bowling_type.as_str()).collect();
    assert_eq!(
        names,
        vec!["Right arm pace", "Left arm pace", "Off spin", "Leg spin", "Left arm orthodox"]
    );

    let sr: Vec<Tone> = table.rows.iter().map(|r| r.strike_rate_tone).collect();
    assert_eq!(
        sr,
        vec![Tone::Favorable, Tone::Favorable, Tone::Unfavorable, Tone::Unfavorable, Tone::Neutral]
    );
    let dots: Vec<Tone> = table.rows.iter().map(|r| r.dot_pct_tone).collect();
    assert_eq!(
        dots,
        vec![Tone::Favorable, Tone::Favorable, Tone::Unfavorable, Tone::Unfavorable, Tone::Neutral]
    );
    assert_eq!(table.rows[1].cells()[4], "29.5%");
}

#[test]
fn radar_uses_summary_rates_against_overall() {
    let stats = parse_bowling_stats(&read_fixture("bowling_stats.json")).expect("stats");
    let axes = radar_axes(&stats);
    assert_eq!(axes.len(), 4);
    assert_eq!(axes[0].label, "Left arm pace");
    assert_eq!(axes[0].entity, 152.0);
    assert_eq!(axes[0].overall, 134.2);
}

#[test]
fn strike_zone_heatmap_from_fixture() {
    let zones = parse_strike_rate_zones(&read_fixture("strike_rate_zones.json")).expect("zones");
    let grid = zone_grid(&zones);
    let lengths: Vec<&str> = grid.rows.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(
        lengths,
        vec!["Bouncer", "Short", "Back of length", "Length", "Full", "Yorker"]
    );

    let full = &grid.rows[4].1;
    let rates: Vec<i64> = full.iter().map(|c| c.strike_rate).collect();
    assert_eq!(rates, vec![162, 149, 171]);
    assert!(full.iter().all(|c| c.tone == Tone::Favorable));

    assert_eq!(grid.rows[2].1[0].tone, Tone::Empty);
    assert_eq!(grid.rows[3].1[0].tone, Tone::Favorable);
    assert_eq!(grid.rows[3].1[1].tone, Tone::Neutral);
    assert_eq!(grid.rows[5].1[1].strike_rate, 63);
    assert_eq!(grid.rows[5].1[1].tone, Tone::Neutral);
}

#[test]
fn pitch_map_from_fixture() {
    let data = parse_dismissals(&read_fixture("dismissals.json")).expect("dismissals");
    let dots = pitch_dots(&data);
    assert_eq!(dots.len(), 4);

    assert!(dots[0].mapped);
    assert_eq!((dots[0].x, dots[0].y), (300.0, 120.0));
    assert_eq!(dots[0].radius, 16.0);
    assert_eq!(dots[0].color, "#ef4444");

    assert_eq!(dots[1].radius, 10.0);
    assert_eq!(dots[1].color, "#eab308");

    let unmapped = &dots[3];
    assert!(!unmapped.mapped);
    assert_eq!((unmapped.x, unmapped.y), UNMAPPED_POSITION);
    assert!(unmapped.label.ends_with("Silly Point Behind The Umpire"));
    assert_eq!(unmapped.color, "#06b6d4");
}

#[test]
fn wagon_wheel_from_fixture() {
    let data = parse_wagon_wheel(&read_fixture("wagon_wheel.json")).expect("wagon");
    let view = wagon_view(&data);
    assert_eq!(view.lines.len(), 20);
    assert_eq!(view.top_zones[0], ("Mid-wicket".to_string(), 10));
    assert_eq!(view.most_productive, Some(("Mid-wicket".to_string(), 10)));
    assert_eq!(view.least_productive, Some(("Third Man".to_string(), 1)));

    let center = WAGON_CANVAS / 2.0;
    for line in &view.lines {
        let inner = ((line.x1 - center).powi(2) + (line.y1 - center).powi(2)).sqrt();
        let outer = ((line.x2 - center).powi(2) + (line.y2 - center).powi(2)).sqrt();
        assert!((inner - 40.0).abs() < 1e-6);
        assert!((outer - 200.0).abs() < 1e-6);
    }
    let midwicket: Vec<_> = view.lines.iter().filter(|l| l.zone == "Midwicket").collect();
    assert!(midwicket.iter().all(|l| l.color == "#10B981"));
    assert!(midwicket.iter().all(|l| (l.angle - 210.0).abs() <= 10.0));
}

#[test]
fn scatter_highlights_selected_player() {
    let points = parse_scatter(&read_fixture("scatter.json"), "scatter_data").expect("scatter");
    let view = scatter_view(&points, ScatterMetric::Average, ScatterScope::Player, "P2");
    assert!(view.dots[1].selected);
    assert!(!view.dots[0].selected);
    assert_eq!(view.dots[2].x, None);
    let (rx, ry) = view.reference.expect("reference lines");
    assert!((rx - 56.2 / 3.0).abs() < 1e-9);
    assert!((ry - 89.1 / 3.0).abs() < 1e-9);

    let team = parse_scatter(&read_fixture("team_scatter.json"), "team_scatter_data").expect("team");
    let view = scatter_view(&team, ScatterMetric::StrikeRate, ScatterScope::Team, "Team A");
    assert_eq!(view.x_domain, (130.0, 156.0));

    let empty = scatter_view(&[], ScatterMetric::Average, ScatterScope::Player, "P1");
    assert_eq!(empty.reference, None);
}

#[test]
fn over_stacks_from_fixture() {
    let overs = parse_over_by_over(&read_fixture("over_by_over.json")).expect("overs");
    let stacks = bowler_stacks(&overs);
    assert_eq!(stacks.len(), 3);
    assert_eq!(stacks[0].segments.len(), 2);
    assert_eq!(stacks[0].segments[1].name, "Bowler B");
    assert_eq!(stacks[1].segments[0].color, bowler_color(1));
    assert_eq!(stacks[1].segments[1].color, bowler_color(2));
    assert!((stacks[0].total - 1.0).abs() < 1e-9);

    let split = parse_pacer_spinner(&read_fixture("pacer_spinner.json")).expect("split");
    let stacks = pacer_spinner_stacks(&split);
    assert_eq!(stacks[2].segments[1].name, "Spinner");
    assert_eq!(stacks[2].segments[1].overs, 0.7);
}

#[test]
fn venue_tables_from_fixture() {
    let situations = parse_toss_situations(&read_fixture("toss_situations.json")).expect("sits");
    let rows = situation_rows(&situations);
    let pct: Vec<&str> = rows.iter().map(|r| r.win_pct.as_str()).collect();
    assert_eq!(pct, vec!["41.67", "63.33", "0.00"]);
    assert_eq!(rows[1].cells()[4], "63.33%");

    let decisions = parse_toss_decisions(&read_fixture("toss_decisions.json")).expect("toss");
    let rows = decision_rows(&decisions);
    assert_eq!(rows[0].batted_tone, Tone::Unfavorable);
    assert_eq!(rows[0].bowled_tone, Tone::Favorable);
    assert_eq!(rows[1].batted_tone, Tone::Favorable);
}

#[test]
fn nba_insights_are_never_empty() {
    let team = parse_nba_team_stats(&read_fixture("nba_team_stats.json")).expect("team");
    let read = team_insights("Lakers", &team);
    assert!(!read.ai_insights.is_empty());
    assert!(!read.strengths.is_empty());
    assert!(!read.weaknesses.is_empty());
    assert!(read.ai_insights[0].starts_with("Lakers averages"));

    let player = parse_nba_player_stats(&read_fixture("nba_player_stats.json")).expect("player");
    let read = player_insights("Player One", &player);
    assert!(!read.strengths.is_empty());
    assert!(!read.weaknesses.is_empty());
}
