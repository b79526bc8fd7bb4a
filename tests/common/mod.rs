#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use opposition_planner::stats_fetch::{Endpoint, PresentationRequest, StatsApi};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_name(endpoint: &Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Health => "health.json",
        Endpoint::Teams => "teams.json",
        Endpoint::Venues => "venues.json",
        Endpoint::Players => "players.json",
        Endpoint::PlayerInsights(_) | Endpoint::TeamInsights(_) => "insights.json",
        Endpoint::PlayerBowlingStats(_) | Endpoint::TeamBowlingStats(_) => "bowling_stats.json",
        Endpoint::PlayerDismissals(_) => "dismissals.json",
        Endpoint::PlayerWagonWheel(_) => "wagon_wheel.json",
        Endpoint::PlayerStrikeRateZones(_) => "strike_rate_zones.json",
        Endpoint::ScatterPlot { .. } => "scatter.json",
        Endpoint::TeamScatterPlot => "team_scatter.json",
        Endpoint::TeamOverByOver(_) => "over_by_over.json",
        Endpoint::TeamPacerSpinner(_) => "pacer_spinner.json",
        Endpoint::VenueInsights(_) => "venue_insights.json",
        Endpoint::VenueTossDecisions(_) => "toss_decisions.json",
        Endpoint::VenueTossSituations(_) => "toss_situations.json",
        Endpoint::NbaTeamPlayers(_) => "nba_team_players.json",
        Endpoint::NbaTeamStats(_) => "nba_team_stats.json",
        Endpoint::NbaPlayerStats(_) => "nba_player_stats.json",
    }
}

/// Serves the JSON fixtures for every endpoint. Reads whose label contains
/// one of `failing` return an error instead.
#[derive(Default)]
pub struct FixtureApi {
    pub failing: Vec<String>,
    pub presentation: Option<Vec<u8>>,
    pub calls: Mutex<Vec<String>>,
    pub presentation_requests: Mutex<Vec<PresentationRequest>>,
}

impl FixtureApi {
    pub fn failing(labels: &[&str]) -> Self {
        Self {
            failing: labels.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl StatsApi for FixtureApi {
    fn get(&self, endpoint: &Endpoint) -> Result<String> {
        let label = endpoint.label();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(label.clone());
        }
        if self.failing.iter().any(|f| label.contains(f.as_str())) {
            return Err(anyhow!("http 500 for {label}"));
        }
        Ok(read_fixture(fixture_name(endpoint)))
    }

    fn post_presentation(&self, request: &PresentationRequest) -> Result<Vec<u8>> {
        if let Ok(mut seen) = self.presentation_requests.lock() {
            seen.push(request.clone());
        }
        self.presentation
            .clone()
            .ok_or_else(|| anyhow!("presentation service unavailable"))
    }

    fn fetch_parallelism(&self) -> usize {
        2
    }
}
