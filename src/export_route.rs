//! Single-slide surface addressed by a query string, used by the
//! server-side screenshot flow. It flips a readiness flag once the slide has
//! been fully loaded and drawn.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, anyhow};
use log::info;
use reqwest::Url;

use crate::capture::{BufferCapturer, Capture, Capturer};
use crate::notes::{NotesStore, notes_for};
use crate::render::ViewOptions;
use crate::slide_loader::{LoadContext, load_slide};
use crate::state::{NBA_MATCHUP, Slide, SlideKind};
use crate::stats_fetch::StatsApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub kind: SlideKind,
    pub data: String,
    pub opposition: Option<String>,
}

impl RouteRequest {
    pub fn slide(&self) -> Slide {
        Slide::new(self.kind, self.data.clone(), 1)
    }
}

/// Accepts `type=player&player=..`, a leading `?`, or a full URL.
pub fn parse_route_query(raw: &str) -> Result<RouteRequest> {
    let raw = raw.trim();
    let url = if raw.contains("://") {
        Url::parse(raw)
    } else {
        Url::parse(&format!(
            "http://localhost/export-slide?{}",
            raw.trim_start_matches('?')
        ))
    }
    .with_context(|| format!("invalid route query: {raw}"))?;

    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let kind_raw = param("type").ok_or_else(|| anyhow!("missing slide type"))?;
    let kind = SlideKind::parse(&kind_raw).ok_or_else(|| anyhow!("unknown slide type {kind_raw}"))?;
    let data = match kind {
        SlideKind::Player => param("player").ok_or_else(|| anyhow!("missing player"))?,
        SlideKind::Team | SlideKind::OverByOver => {
            param("team").ok_or_else(|| anyhow!("missing team"))?
        }
        SlideKind::Venue => param("venue").ok_or_else(|| anyhow!("missing venue"))?,
        SlideKind::Nba => NBA_MATCHUP.to_string(),
    };
    Ok(RouteRequest {
        kind,
        data,
        opposition: param("opposition"),
    })
}

pub struct RouteSurface {
    ready: AtomicBool,
    capturer: BufferCapturer,
}

impl Default for RouteSurface {
    fn default() -> Self {
        Self::new(BufferCapturer::default())
    }
}

impl RouteSurface {
    pub fn new(capturer: BufferCapturer) -> Self {
        Self {
            ready: AtomicBool::new(false),
            capturer,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Loads and draws one slide. The flag stays down until every read has
    /// resolved and the image exists.
    pub fn render(
        &self,
        api: &dyn StatsApi,
        notes: Option<&dyn NotesStore>,
        request: &RouteRequest,
    ) -> Result<Capture> {
        self.ready.store(false, Ordering::Release);
        let slide = request.slide();
        let ctx = LoadContext {
            opposition: request.opposition.clone(),
            selected_players: match request.kind {
                SlideKind::Player => vec![request.data.clone()],
                _ => Vec::new(),
            },
            ..LoadContext::default()
        };
        let mut ready = load_slide(api, &slide, &ctx);
        ready.notes = notes.and_then(|store| notes_for(store, &slide));
        let capture = self.capturer.capture(&ready, &ViewOptions::default())?;
        info!(
            "route surface ready: {} ({}x{})",
            slide.title,
            capture.width(),
            capture.height()
        );
        self.ready.store(true, Ordering::Release);
        Ok(capture)
    }
}
