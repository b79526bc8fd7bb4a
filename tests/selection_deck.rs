use std::collections::HashSet;

use opposition_planner::cli::PlannerArgs;
use opposition_planner::notes::comment_key;
use opposition_planner::selection::{Deck, Selection, assemble_slides, preset_roster};
use opposition_planner::state::{NBA_MATCHUP, SlideKind};

fn selection(players: &[&str], opposition: Option<&str>, venue: Option<&str>) -> Selection {
    let mut sel = Selection::default();
    sel.set_opposition(opposition.map(str::to_string));
    sel.selected_players.clear();
    for p in players {
        sel.toggle_player(p);
    }
    sel.set_venue(venue.map(str::to_string));
    sel
}

#[test]
fn end_to_end_slide_order() {
    let sel = selection(&["P1", "P2"], Some("Team A"), Some("Venue X"));
    let slides = assemble_slides(&sel);
    let ids: Vec<String> = slides.iter().map(|s| s.slide_id()).collect();
    assert_eq!(
        ids,
        vec![
            "player_P1",
            "player_P2",
            "team_Team A",
            "overbyover_Team A",
            "venue_Venue X",
            "nba_Lakers vs Mavericks",
        ]
    );
    let indices: Vec<usize> = slides.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(slides[0].title, "Player Analysis: P1");
    assert_eq!(slides[2].title, "Opposition Analysis: Team A");
    assert_eq!(slides[3].title, "Over-by-Over Analysis: Team A");
    assert_eq!(slides[4].title, "Venue Analysis: Venue X");
    assert_eq!(slides[5].title, format!("NBA Matchup: {NBA_MATCHUP}"));
}

#[test]
fn slide_count_matches_selection() {
    let cases: [(&[&str], Option<&str>, Option<&str>); 4] = [
        (&[], None, None),
        (&["P1"], None, Some("V")),
        (&["P1", "P2", "P3"], Some("Team A"), None),
        (&["P1", "P2"], Some("Team A"), Some("V")),
    ];
    for (players, opp, venue) in cases {
        let sel = selection(players, opp, venue);
        let expected = sel.selected_players.len()
            + if opp.is_some() { 2 } else { 0 }
            + if venue.is_some() { 1 } else { 0 }
            + 1;
        let slides = assemble_slides(&sel);
        assert_eq!(slides.len(), expected);

        let unique: HashSet<(SlideKind, String)> =
            slides.iter().map(|s| (s.kind, s.data.clone())).collect();
        assert_eq!(unique.len(), slides.len());

        let keys: HashSet<String> = slides.iter().map(comment_key).collect();
        assert_eq!(keys.len(), slides.len());
    }
}

#[test]
fn empty_selection_still_has_nba_slide() {
    let slides = assemble_slides(&Selection::default());
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0].kind, SlideKind::Nba);
    assert_eq!(slides[0].data, NBA_MATCHUP);
}

#[test]
fn preset_roster_replaces_and_clears() {
    let mut sel = Selection::default();
    sel.toggle_player("Someone Else");
    sel.set_opposition(Some("Mumbai Indians".to_string()));
    let roster = preset_roster("Mumbai Indians").expect("preset");
    assert_eq!(sel.selected_players, roster);
    assert_eq!(sel.team_players, roster);

    sel.set_opposition(Some("Team A".to_string()));
    assert!(sel.selected_players.is_empty());
    assert!(sel.team_players.is_empty());

    sel.set_opposition(Some("Chennai Super Kings".to_string()));
    sel.set_opposition(None);
    assert!(sel.selected_players.is_empty());
    assert!(sel.team_players.is_empty());
    assert_eq!(sel.opposition, None);
}

#[test]
fn preset_roster_is_idempotent() {
    let mut once = Selection::default();
    once.set_opposition(Some("Chennai Super Kings".to_string()));
    let mut twice = once.clone();
    twice.set_opposition(Some("Chennai Super Kings".to_string()));
    assert_eq!(once, twice);
    assert_eq!(assemble_slides(&once), assemble_slides(&twice));
}

#[test]
fn fetched_roster_drops_stale_picks() {
    let mut sel = Selection::default();
    sel.set_opposition(Some("Team A".to_string()));
    sel.toggle_player("P1");
    sel.toggle_player("P9");
    sel.set_team_players(vec!["P1".to_string(), " P2 ".to_string(), "P1".to_string()]);
    assert_eq!(sel.team_players, vec!["P1", "P2"]);
    assert_eq!(sel.selected_players, vec!["P1"]);
}

#[test]
fn blank_inputs_are_treated_as_unset() {
    let mut sel = Selection::default();
    sel.set_venue(Some("   ".to_string()));
    sel.set_opposition(Some(String::new()));
    assert_eq!(assemble_slides(&sel).len(), 1);
    assert!(!sel.toggle_player("  "));
}

#[test]
fn deck_navigation_and_label() {
    let sel = selection(&["P1", "P2"], Some("Team A"), None);
    let mut deck = Deck::from_selection(&sel);
    assert_eq!(deck.len(), 5);
    assert_eq!(deck.position_label(), "Slide 1 of 5");
    deck.prev();
    assert_eq!(deck.current_index(), 4);
    deck.next();
    assert_eq!(deck.current_index(), 0);
    assert!(deck.go_to(3));
    assert!(!deck.go_to(5));
    assert_eq!(deck.current().map(|s| s.kind), Some(SlideKind::OverByOver));
    assert_eq!(Deck::default().position_label(), "No slides");
}

#[test]
fn own_team_is_never_the_opposition() {
    let mut sel = Selection::default();
    sel.set_team(Some("Mumbai Indians".to_string()));
    sel.set_opposition(Some(" Mumbai Indians ".to_string()));
    assert_eq!(sel.opposition, None);
    assert!(sel.selected_players.is_empty());
    assert_eq!(assemble_slides(&sel).len(), 1);

    sel.set_opposition(Some("Chennai Super Kings".to_string()));
    assert_eq!(sel.selected_players.len(), 4);
    sel.set_team(Some("Chennai Super Kings".to_string()));
    assert_eq!(sel.opposition, None);
    assert!(sel.team_players.is_empty());
    assert!(sel.selected_players.is_empty());
}

#[test]
fn cli_rejects_own_team_as_opposition() {
    let raw = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let err = PlannerArgs::parse(raw(&[
        "--team",
        "Mumbai Indians",
        "--opposition",
        "Mumbai Indians",
    ]))
    .expect_err("same team on both sides");
    assert!(err.to_string().contains("--opposition must differ from --team"));

    let sel = PlannerArgs::parse(raw(&[
        "--team",
        "Mumbai Indians",
        "--opposition",
        "Chennai Super Kings",
    ]))
    .expect("parse")
    .selection();
    assert_ne!(sel.team, sel.opposition);
    assert!(!assemble_slides(&sel)
        .iter()
        .any(|s| s.data == "Mumbai Indians"));
}

#[test]
fn cycling_opposition_skips_own_team_and_wraps_to_none() {
    let teams: Vec<String> = ["Mumbai Indians", "Chennai Super Kings", "Team A"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut sel = Selection::default();
    sel.set_team(Some("Mumbai Indians".to_string()));

    assert_eq!(sel.cycle_opposition(&teams), Some("Chennai Super Kings"));
    assert_eq!(sel.selected_players.len(), 4);
    assert_eq!(sel.cycle_opposition(&teams), Some("Team A"));
    assert!(sel.selected_players.is_empty());
    assert_eq!(sel.cycle_opposition(&teams), None);
    assert_eq!(sel.cycle_opposition(&teams), Some("Chennai Super Kings"));
    assert_eq!(Selection::default().cycle_opposition(&[]), None);
}

#[test]
fn deck_rebuild_after_opposition_change_keeps_matchup_slide() {
    let teams = vec!["Team A".to_string(), "Chennai Super Kings".to_string()];
    let mut sel = selection(&["P1"], Some("Team A"), None);
    let mut deck = Deck::from_selection(&sel);
    deck.prev();
    assert_eq!(deck.current().map(|s| s.kind), Some(SlideKind::Nba));

    sel.cycle_opposition(&teams);
    sel.set_team_players(vec!["Ravindra Jadeja".to_string()]);
    deck.rebuild(&sel);
    assert_eq!(sel.selected_players, vec!["Ravindra Jadeja"]);
    assert_eq!(deck.len(), 4);
    assert_eq!(deck.current().map(|s| s.kind), Some(SlideKind::Nba));
    assert_eq!(deck.current_index(), 3);
}
