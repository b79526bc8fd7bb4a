use anyhow::Context;
use log::info;

use opposition_planner::capture::BufferCapturer;
use opposition_planner::cli::PlannerArgs;
use opposition_planner::config::ApiConfig;
use opposition_planner::deck_export::{EXPORT_FAILED_MESSAGE, ExportServices, export_deck};
use opposition_planner::notes::open_notes_store;
use opposition_planner::render::ViewOptions;
use opposition_planner::selection::Deck;
use opposition_planner::stats_fetch::HttpStatsApi;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = PlannerArgs::parse(std::env::args().skip(1))?;
    let selection = args.selection();
    let mut deck = Deck::from_selection(&selection);
    let config = ApiConfig::from_env();
    info!("stats api {} ({:?})", config.base_url, config.source);
    let api = HttpStatsApi::new(config)?;
    let notes = open_notes_store(args.notes_backend).context("open analyst notes")?;
    let capturer = BufferCapturer::default();
    let services = ExportServices {
        api: &api,
        notes: notes.as_ref(),
        capturer: &capturer,
    };

    println!(
        "exporting {} slide(s) as {}",
        deck.len(),
        args.format.extension()
    );
    let result = export_deck(
        &mut deck,
        &selection,
        args.format,
        &args.out_dir,
        &services,
        &ViewOptions::default(),
        |progress| println!("{}", progress.message),
    );

    match result {
        Ok(report) => {
            for err in &report.errors {
                println!("slide error: {err}");
            }
            println!("wrote {}", report.path.display());
            Ok(())
        }
        Err(_) => {
            eprintln!("{EXPORT_FAILED_MESSAGE}");
            std::process::exit(1);
        }
    }
}
