mod common;

use common::FixtureApi;
use opposition_planner::capture::{CAPTURE_COLS, CAPTURE_ROWS, CELL_HEIGHT, CELL_WIDTH};
use opposition_planner::export_route::{RouteSurface, parse_route_query};
use opposition_planner::notes::{MemoryNotes, NotesStore, comment_key};
use opposition_planner::slide_loader::{LoadContext, load_slide};
use opposition_planner::state::{NBA_MATCHUP, Slide, SlideData, SlideKind};
use opposition_planner::stats_fetch::fetch_startup_lists;

fn ctx(players: &[&str]) -> LoadContext {
    LoadContext {
        opposition: Some("Team A".to_string()),
        selected_players: players.iter().map(|s| s.to_string()).collect(),
        ..LoadContext::default()
    }
}

#[test]
fn player_slide_loads_every_group() {
    let api = FixtureApi::default();
    let slide = Slide::new(SlideKind::Player, "P1", 1);
    let ready = load_slide(&api, &slide, &ctx(&["P1", "P2"]));

    assert!(!ready.is_degraded());
    assert_eq!(ready.opposition.as_deref(), Some("Team A"));
    let SlideData::Player(bundle) = &ready.data else {
        panic!("expected player data");
    };
    assert_eq!(bundle.insights.ai_insights.len(), 2);
    assert!(bundle.bowling.is_some());
    assert_eq!(bundle.scatter.len(), 3);
    assert!(bundle.dismissals.is_some());
    assert!(bundle.strike_zones.is_some());
    assert!(bundle.wagon_wheel.is_some());

    let calls = api.calls();
    assert_eq!(calls.len(), 6);
    assert!(calls.contains(&"player/P1/strike-rate-zones".to_string()));
    assert!(calls.contains(&"scatter-plot-data".to_string()));
}

#[test]
fn failing_read_drops_only_its_group() {
    let api = FixtureApi::failing(&["dismissal-locations"]);
    let slide = Slide::new(SlideKind::Player, "P1", 1);
    let ready = load_slide(&api, &slide, &ctx(&["P1"]));

    assert!(ready.is_degraded());
    assert_eq!(ready.errors.len(), 1);
    assert!(ready.errors[0].starts_with("player overview"));
    let SlideData::Player(bundle) = &ready.data else {
        panic!("expected player data");
    };
    assert!(bundle.insights.is_empty());
    assert!(bundle.bowling.is_none());
    assert!(bundle.scatter.is_empty());
    assert!(bundle.dismissals.is_none());
    assert!(bundle.strike_zones.is_some());
    assert!(bundle.wagon_wheel.is_some());
}

#[test]
fn independent_groups_fail_alone() {
    let api = FixtureApi::failing(&["wagon-wheel"]);
    let slide = Slide::new(SlideKind::Player, "P1", 1);
    let ready = load_slide(&api, &slide, &ctx(&["P1"]));
    let SlideData::Player(bundle) = &ready.data else {
        panic!("expected player data");
    };
    assert_eq!(ready.errors.len(), 1);
    assert!(bundle.bowling.is_some());
    assert!(bundle.strike_zones.is_some());
    assert!(bundle.wagon_wheel.is_none());
}

#[test]
fn team_overbyover_and_venue_slides() {
    let api = FixtureApi::default();
    let team = load_slide(&api, &Slide::new(SlideKind::Team, "Team A", 3), &ctx(&[]));
    let SlideData::Team(bundle) = &team.data else {
        panic!("expected team data");
    };
    assert_eq!(bundle.scatter.len(), 2);

    let overs = load_slide(&api, &Slide::new(SlideKind::OverByOver, "Team A", 4), &ctx(&[]));
    let SlideData::OverByOver(bundle) = &overs.data else {
        panic!("expected over-by-over data");
    };
    assert_eq!(bundle.overs.len(), 3);
    assert_eq!(bundle.pacer_spinner.len(), 3);

    let venue = load_slide(&api, &Slide::new(SlideKind::Venue, "Venue X", 5), &ctx(&[]));
    let SlideData::Venue(bundle) = &venue.data else {
        panic!("expected venue data");
    };
    assert_eq!(bundle.insights.len(), 2);
    assert_eq!(bundle.toss_decisions.len(), 2);
    assert_eq!(bundle.situations.len(), 3);
}

#[test]
fn nba_player_stats_need_picks_on_both_sides() {
    let api = FixtureApi::default();
    let slide = Slide::new(SlideKind::Nba, NBA_MATCHUP, 6);

    let one_sided = LoadContext {
        nba_home_players: vec!["Player One".to_string()],
        ..LoadContext::default()
    };
    let ready = load_slide(&api, &slide, &one_sided);
    let SlideData::Nba(bundle) = &ready.data else {
        panic!("expected nba data");
    };
    assert_eq!(bundle.home_players.len(), 3);
    assert!(bundle.home_stats.is_some());
    assert!(bundle.home_selected.is_empty());
    assert!(!api.calls().iter().any(|c| c.starts_with("nba/player")));

    let both = LoadContext {
        nba_home_players: vec!["Player One".to_string()],
        nba_away_players: vec!["Player Two".to_string(), "Player Three".to_string()],
        ..LoadContext::default()
    };
    let ready = load_slide(&api, &slide, &both);
    let SlideData::Nba(bundle) = &ready.data else {
        panic!("expected nba data");
    };
    assert_eq!(bundle.home_selected.len(), 1);
    assert_eq!(bundle.away_selected.len(), 2);
    assert_eq!(bundle.away_selected[1].0, "Player Three");
}

#[test]
fn startup_lists_survive_a_failed_list() {
    let api = FixtureApi::failing(&["venues"]);
    let lists = fetch_startup_lists(&api);
    assert_eq!(lists.teams.len(), 3);
    assert!(lists.venues.is_empty());
    assert_eq!(lists.players, vec!["P1", "P2", "P3"]);
    assert_eq!(lists.errors.len(), 1);
}

#[test]
fn route_surface_reports_ready_after_render() {
    let api = FixtureApi::default();
    let notes = MemoryNotes::default();
    let request = parse_route_query("type=venue&venue=Venue%20X").expect("query");
    notes
        .set(&comment_key(&request.slide()), "Bowl first here")
        .expect("save note");

    let surface = RouteSurface::default();
    assert!(!surface.is_ready());
    let capture = surface
        .render(&api, Some(&notes as &dyn NotesStore), &request)
        .expect("render");
    assert!(surface.is_ready());
    assert_eq!(capture.width(), CAPTURE_COLS as u32 * CELL_WIDTH);
    assert_eq!(capture.height(), CAPTURE_ROWS as u32 * CELL_HEIGHT);
    assert_eq!(capture.width(), 1920);
    assert_eq!(capture.height(), 1080);
}

#[test]
fn route_player_slide_loads_named_player() {
    let api = FixtureApi::default();
    let request = parse_route_query("type=player&player=P2").expect("query");
    RouteSurface::default()
        .render(&api, None, &request)
        .expect("render");
    let calls = api.calls();
    assert!(calls.contains(&"player/P2/insights".to_string()));
}
