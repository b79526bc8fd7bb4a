use std::fs;
use std::path::PathBuf;

use anyhow::{Context, anyhow};

use opposition_planner::cli::PlannerArgs;
use opposition_planner::config::ApiConfig;
use opposition_planner::export_route::{RouteSurface, parse_route_query};
use opposition_planner::notes::open_notes_store;
use opposition_planner::stats_fetch::HttpStatsApi;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = PlannerArgs::parse(std::env::args().skip(1))?;
    let query = args
        .query
        .as_deref()
        .ok_or_else(|| anyhow!("--query is required, e.g. --query 'type=venue&venue=Wankhede Stadium'"))?;
    let request = parse_route_query(query)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", request.slide().slide_id().replace(' ', "_"))));

    let api = HttpStatsApi::new(ApiConfig::from_env())?;
    let notes = open_notes_store(args.notes_backend)?;
    let surface = RouteSurface::default();
    let capture = surface.render(&api, Some(notes.as_ref()), &request)?;
    if !surface.is_ready() {
        return Err(anyhow!("slide did not finish rendering"));
    }
    fs::write(&output, capture.png()?)
        .with_context(|| format!("write {}", output.display()))?;
    println!(
        "{} -> {} ({}x{})",
        request.slide().title,
        output.display(),
        capture.width(),
        capture.height()
    );
    Ok(())
}
