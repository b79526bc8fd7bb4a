mod common;

use common::read_fixture;
use opposition_planner::stats_fetch::{
    parse_bowling_stats, parse_dismissals, parse_insights, parse_name_list, parse_nba_player_stats,
    parse_nba_team_stats, parse_over_by_over, parse_pacer_spinner, parse_scatter,
    parse_strike_rate_zones, parse_toss_decisions, parse_toss_situations, parse_venue_insights,
    parse_wagon_wheel,
};

#[test]
fn parses_name_lists_with_mixed_entries() {
    let teams = parse_name_list(&read_fixture("teams.json"), "teams").expect("teams should parse");
    assert_eq!(teams, vec!["Team A", "Team B", "Mumbai Indians"]);

    let nba = parse_name_list(&read_fixture("nba_team_players.json"), "players").expect("players");
    assert_eq!(nba, vec!["Player One", "Player Two", "Player Three"]);
}

#[test]
fn missing_list_field_is_empty() {
    assert!(parse_name_list(r#"{"other": []}"#, "teams").expect("parse").is_empty());
}

#[test]
fn parses_insights_fixture() {
    let insights = parse_insights(&read_fixture("insights.json")).expect("fixture should parse");
    assert_eq!(insights.ai_insights.len(), 2);
    assert_eq!(insights.strengths.len(), 1);
    assert!(insights.areas_for_improvement.is_empty());
}

#[test]
fn bowling_stats_keep_backend_key_order() {
    let stats = parse_bowling_stats(&read_fixture("bowling_stats.json")).expect("fixture should parse");
    let keys: Vec<&str> = stats.bowling_stats.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        keys,
        vec!["right arm pace", "left arm pace", "off spin", "leg spin", "left arm orthodox"]
    );
    assert!(stats.has_data());
    let (_, leg_spin) = &stats.detailed_stats[3];
    assert_eq!(leg_spin.balls, 200.0);
    assert_eq!(leg_spin.average, 0.0);
}

#[test]
fn scatter_keeps_nulls_as_none() {
    let points = parse_scatter(&read_fixture("scatter.json"), "scatter_data").expect("scatter");
    assert_eq!(points.len(), 3);
    assert_eq!(points[2].first_innings_avg, None);
    assert_eq!(points[2].second_innings_avg, Some(18.0));

    let team = parse_scatter(&read_fixture("team_scatter.json"), "team_scatter_data").expect("team");
    assert_eq!(team[1].name, "Team B");
}

#[test]
fn parses_player_visual_fixtures() {
    let dismissals = parse_dismissals(&read_fixture("dismissals.json")).expect("dismissals");
    assert_eq!(dismissals.dismissal_locations.len(), 4);
    assert_eq!(dismissals.dismissal_locations[0].count, 6);

    let wagon = parse_wagon_wheel(&read_fixture("wagon_wheel.json")).expect("wagon wheel");
    assert_eq!(wagon.total_boundaries, 20);
    assert_eq!(wagon.summary.most_productive_zone.as_deref(), Some("Midwicket"));

    let zones = parse_strike_rate_zones(&read_fixture("strike_rate_zones.json")).expect("zones");
    assert_eq!(zones.zones.len(), 10);
    assert_eq!(zones.zones[0].sr, 162.4);
}

#[test]
fn parses_team_and_venue_fixtures() {
    let overs = parse_over_by_over(&read_fixture("over_by_over.json")).expect("overs");
    assert_eq!(overs.len(), 3);
    assert_eq!(overs[1].bowlers[0].name, "Bowler B");

    let split = parse_pacer_spinner(&read_fixture("pacer_spinner.json")).expect("split");
    assert_eq!(split[2].spinner_overs, 0.7);

    let insights = parse_venue_insights(&read_fixture("venue_insights.json")).expect("venue");
    assert_eq!(insights.len(), 2);
    let flat = parse_venue_insights(r#"{"insights": ["one"]}"#).expect("flat list");
    assert_eq!(flat, vec!["one"]);

    let decisions = parse_toss_decisions(&read_fixture("toss_decisions.json")).expect("toss");
    assert_eq!(decisions[0].bowled_first, 31);
    let situations = parse_toss_situations(&read_fixture("toss_situations.json")).expect("sits");
    assert_eq!(situations[2].no_result, 2);
}

#[test]
fn parses_nba_fixtures() {
    let team = parse_nba_team_stats(&read_fixture("nba_team_stats.json")).expect("team stats");
    assert_eq!(team.games_played, 40.0);
    let player = parse_nba_player_stats(&read_fixture("nba_player_stats.json")).expect("player");
    assert_eq!(player.points_per_game_last5, 27.4);
}

#[test]
fn malformed_json_is_an_error() {
    assert!(parse_over_by_over("{not json").is_err());
    assert!(parse_bowling_stats("").is_err());
}
