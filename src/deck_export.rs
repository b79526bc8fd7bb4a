use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{error, info, warn};

use crate::capture::{Capture, Capturer};
use crate::deck_pdf::write_pdf;
use crate::deck_pptx::{DeckMeta, NativePage, write_native_pptx, write_screenshot_pptx};
use crate::notes::{NotesStore, notes_for};
use crate::render::ViewOptions;
use crate::selection::{Deck, Selection};
use crate::slide_loader::{LoadContext, load_slide};
use crate::state::ReadySlide;
use crate::stats_fetch::{PresentationRequest, StatsApi};
use crate::stats_workbook::write_workbook;

/// The only failure text shown to the user; details go to the log.
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to generate presentation. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Screenshot per slide, A4 portrait pages.
    Pdf,
    /// Screenshot per slide, 16:9 presentation.
    Pptx,
    /// Tables and text rebuilt from the stats, 16:9 presentation.
    Native,
    /// Presentation rendered by the backend.
    Server,
    Xlsx,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "pdf" => Some(ExportFormat::Pdf),
            "pptx" | "ppt" | "screenshot" => Some(ExportFormat::Pptx),
            "native" => Some(ExportFormat::Native),
            "server" => Some(ExportFormat::Server),
            "xlsx" | "workbook" => Some(ExportFormat::Xlsx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pptx | ExportFormat::Native | ExportFormat::Server => "pptx",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    Capturing { index: usize, total: usize },
    Assembling,
    Writing,
    Done,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ExportProgress {
    pub phase: ExportPhase,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub slides: usize,
    pub errors: Vec<String>,
}

/// One output page. A failed slide still occupies its position.
#[derive(Debug, Clone)]
pub enum DeckPage {
    Captured {
        title: String,
        capture: Capture,
        notes: Option<String>,
    },
    Failed {
        title: String,
    },
}

pub struct ExportServices<'a> {
    pub api: &'a dyn StatsApi,
    pub notes: &'a dyn NotesStore,
    pub capturer: &'a dyn Capturer,
}

/// `IPL_Opposition_Analysis_{Opposition}_{YYYY-MM-DD}.{ext}` with spaces in the
/// opposition name replaced by underscores.
pub fn export_filename(opposition: Option<&str>, date: NaiveDate, format: ExportFormat) -> String {
    let date = date.format("%Y-%m-%d");
    match opposition.map(str::trim).filter(|o| !o.is_empty()) {
        Some(opp) => format!(
            "IPL_Opposition_Analysis_{}_{date}.{}",
            opp.split_whitespace().collect::<Vec<_>>().join("_"),
            format.extension()
        ),
        None => format!("IPL_Opposition_Analysis_{date}.{}", format.extension()),
    }
}

/// Walks the deck slide by slide, writes the file into `out_dir` and puts the
/// deck back on the slide it started from. A failing slide becomes an error
/// page; anything else aborts the whole export.
pub fn export_deck(
    deck: &mut Deck,
    selection: &Selection,
    format: ExportFormat,
    out_dir: &Path,
    services: &ExportServices,
    opts: &ViewOptions,
    mut on_progress: impl FnMut(ExportProgress),
) -> Result<ExportReport> {
    let start = deck.current_index();
    let result = run_export(deck, selection, format, out_dir, services, opts, &mut on_progress);
    deck.go_to(start);

    match &result {
        Ok(report) => {
            info!(
                "exported {} slide(s) to {} ({} error(s))",
                report.slides,
                report.path.display(),
                report.errors.len()
            );
            on_progress(ExportProgress {
                phase: ExportPhase::Done,
                message: format!("Saved {}", report.path.display()),
            });
        }
        Err(err) => {
            error!("export failed: {err:#}");
            on_progress(ExportProgress {
                phase: ExportPhase::Failed,
                message: EXPORT_FAILED_MESSAGE.to_string(),
            });
        }
    }
    result
}

fn run_export(
    deck: &mut Deck,
    selection: &Selection,
    format: ExportFormat,
    out_dir: &Path,
    services: &ExportServices,
    opts: &ViewOptions,
    on_progress: &mut dyn FnMut(ExportProgress),
) -> Result<ExportReport> {
    if deck.is_empty() {
        anyhow::bail!("no slides to export");
    }
    let total = deck.len();
    let opposition = selection.opposition.as_deref();
    let ctx = LoadContext::from_selection(selection);
    let mut errors = Vec::new();
    let mut view = opts.clone();
    view.position_label = None;

    let bytes = match format {
        ExportFormat::Server => {
            on_progress(ExportProgress {
                phase: ExportPhase::Assembling,
                message: format!("Requesting server presentation for {total} slide(s)"),
            });
            let request = PresentationRequest::from_slides(deck.slides(), opposition);
            services
                .api
                .post_presentation(&request)
                .context("server-side presentation")?
        }
        ExportFormat::Pdf | ExportFormat::Pptx => {
            let mut pages = Vec::with_capacity(total);
            for_each_ready(deck, &ctx, services, on_progress, |ready| {
                let title = ready.slide.title.clone();
                match services.capturer.capture(&ready, &view) {
                    Ok(capture) => pages.push(DeckPage::Captured {
                        title,
                        capture,
                        notes: ready.notes,
                    }),
                    Err(err) => {
                        warn!("capture failed for {title}: {err:#}");
                        errors.push(format!("{title}: {err:#}"));
                        pages.push(DeckPage::Failed { title });
                    }
                }
            });
            on_progress(ExportProgress {
                phase: ExportPhase::Assembling,
                message: format!("Assembling {} page(s)", pages.len()),
            });
            if format == ExportFormat::Pdf {
                write_pdf(&pages)?
            } else {
                write_screenshot_pptx(&pages, &DeckMeta::new(opposition, chrono::Utc::now()))?
            }
        }
        ExportFormat::Native => {
            let mut pages = Vec::with_capacity(total);
            for_each_ready(deck, &ctx, services, on_progress, |ready| {
                if ready.is_degraded() {
                    let title = ready.slide.title.clone();
                    warn!("native export skipped data for {title}");
                    errors.extend(ready.errors.iter().map(|e| format!("{title}: {e}")));
                    pages.push(NativePage::Failed { title });
                } else {
                    pages.push(NativePage::Ready(ready));
                }
            });
            on_progress(ExportProgress {
                phase: ExportPhase::Assembling,
                message: format!("Assembling {} slide(s)", pages.len()),
            });
            write_native_pptx(&pages, &DeckMeta::new(opposition, chrono::Utc::now()))?
        }
        ExportFormat::Xlsx => {
            let mut slides = Vec::with_capacity(total);
            for_each_ready(deck, &ctx, services, on_progress, |ready| {
                let title = ready.slide.title.clone();
                errors.extend(ready.errors.iter().map(|e| format!("{title}: {e}")));
                slides.push(ready);
            });
            on_progress(ExportProgress {
                phase: ExportPhase::Assembling,
                message: "Building workbook".to_string(),
            });
            write_workbook(&slides)?
        }
    };

    on_progress(ExportProgress {
        phase: ExportPhase::Writing,
        message: format!("Writing {} bytes", bytes.len()),
    });
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create export dir {}", out_dir.display()))?;
    let name = export_filename(opposition, chrono::Local::now().date_naive(), format);
    let path = out_dir.join(name);
    fs::write(&path, &bytes).with_context(|| format!("write {}", path.display()))?;

    Ok(ExportReport {
        path,
        format,
        slides: total,
        errors,
    })
}

/// Makes each slide current in turn and hands over its fully loaded state.
fn for_each_ready(
    deck: &mut Deck,
    ctx: &LoadContext,
    services: &ExportServices,
    on_progress: &mut dyn FnMut(ExportProgress),
    mut handle: impl FnMut(ReadySlide),
) {
    let total = deck.len();
    for index in 0..total {
        deck.go_to(index);
        let Some(slide) = deck.current().cloned() else {
            continue;
        };
        on_progress(ExportProgress {
            phase: ExportPhase::Capturing { index, total },
            message: format!("Capturing slide {} of {total}: {}", index + 1, slide.title),
        });
        let mut ready = load_slide(services.api, &slide, ctx);
        ready.notes = notes_for(services.notes, &slide);
        handle(ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_replaces_spaces() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 12).expect("date");
        assert_eq!(
            export_filename(Some("Chennai Super Kings"), date, ExportFormat::Pdf),
            "IPL_Opposition_Analysis_Chennai_Super_Kings_2025-04-12.pdf"
        );
        assert_eq!(
            export_filename(None, date, ExportFormat::Native),
            "IPL_Opposition_Analysis_2025-04-12.pptx"
        );
    }

    #[test]
    fn format_names() {
        assert_eq!(ExportFormat::parse("PDF"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::parse("server").map(ExportFormat::extension), Some("pptx"));
        assert_eq!(ExportFormat::parse("docx"), None);
    }
}
