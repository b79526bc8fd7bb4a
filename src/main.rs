use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{info, warn};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use opposition_planner::capture::BufferCapturer;
use opposition_planner::cli::PlannerArgs;
use opposition_planner::config::ApiConfig;
use opposition_planner::deck_export::{
    EXPORT_FAILED_MESSAGE, ExportFormat, ExportServices, export_deck,
};
use opposition_planner::notes::{NotesStore, comment_key, notes_for, open_notes_store};
use opposition_planner::render::{ViewOptions, render_slide};
use opposition_planner::selection::{Deck, Selection};
use opposition_planner::slide_loader::{LoadContext, load_slide};
use opposition_planner::state::{ReadySlide, Slide};
use opposition_planner::stats_fetch::{
    HttpStatsApi, StartupLists, check_api_health, fetch_startup_lists,
};

const MAX_LOGS: usize = 200;

enum ProviderCommand {
    Load { slide: Slide, ctx: LoadContext },
    Export {
        deck: Deck,
        selection: Selection,
        format: ExportFormat,
        view: ViewOptions,
    },
}

enum Delta {
    Health(Result<(), String>),
    Lists(StartupLists),
    Loaded(Box<ReadySlide>),
    ExportDone(Result<PathBuf, String>),
    Log(String),
}

struct App {
    selection: Selection,
    deck: Deck,
    view: ViewOptions,
    ctx: LoadContext,
    current: Option<ReadySlide>,
    notes: Arc<dyn NotesStore>,
    editing: Option<String>,
    exporting: bool,
    help_overlay: bool,
    logs: VecDeque<String>,
    teams: Vec<String>,
    venues: usize,
    players: Vec<String>,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(args: &PlannerArgs, notes: Arc<dyn NotesStore>, cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        let selection = args.selection();
        let deck = Deck::from_selection(&selection);
        let ctx = LoadContext::from_selection(&selection);
        let mut app = Self {
            selection,
            deck,
            view: ViewOptions::default(),
            ctx,
            current: None,
            notes,
            editing: None,
            exporting: false,
            help_overlay: false,
            logs: VecDeque::new(),
            teams: Vec::new(),
            venues: 0,
            players: Vec::new(),
            should_quit: false,
            cmd_tx,
        };
        app.push_log(format!("[INFO] Deck assembled with {} slide(s)", app.deck.len()));
        app.request_current();
        app
    }

    fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn request_current(&mut self) {
        let Some(slide) = self.deck.current().cloned() else {
            return;
        };
        self.current = None;
        let cmd = ProviderCommand::Load {
            slide,
            ctx: self.ctx.clone(),
        };
        if self.cmd_tx.send(cmd).is_err() {
            self.push_log("[WARN] Slide loader unavailable");
        }
    }

    fn refresh_deck(&mut self) {
        self.deck.rebuild(&self.selection);
        self.ctx = LoadContext::from_selection(&self.selection);
        self.push_log(format!("[INFO] Deck assembled with {} slide(s)", self.deck.len()));
        self.request_current();
    }

    /// Non-preset oppositions take the fetched player list as their roster.
    fn install_roster(&mut self) {
        if self.selection.opposition.is_some()
            && self.selection.team_players.is_empty()
            && !self.players.is_empty()
        {
            self.selection.set_team_players(self.players.clone());
        }
    }

    fn next_opposition(&mut self) {
        if self.exporting {
            self.push_log("[INFO] Export running; selection locked");
            return;
        }
        if self.teams.is_empty() {
            self.push_log("[WARN] Team list not loaded");
            return;
        }
        let teams = self.teams.clone();
        let label = self
            .selection
            .cycle_opposition(&teams)
            .unwrap_or("no opposition")
            .to_string();
        self.install_roster();
        self.push_log(format!("[INFO] Opposition: {label}"));
        self.refresh_deck();
    }

    fn request_export(&mut self, format: ExportFormat) {
        if self.exporting {
            self.push_log("[INFO] Export already running");
            return;
        }
        let cmd = ProviderCommand::Export {
            deck: self.deck.clone(),
            selection: self.selection.clone(),
            format,
            view: self.view.clone(),
        };
        if self.cmd_tx.send(cmd).is_err() {
            self.push_log("[WARN] Export worker unavailable");
            return;
        }
        self.exporting = true;
        self.push_log(format!("[INFO] Export started ({})", format.extension()));
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.editing.is_some() {
            self.on_edit_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.help_overlay = !self.help_overlay,
            KeyCode::Char('j') | KeyCode::Right | KeyCode::Down => {
                self.deck.next();
                self.request_current();
            }
            KeyCode::Char('k') | KeyCode::Left | KeyCode::Up => {
                self.deck.prev();
                self.request_current();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if self.deck.go_to(index) {
                    self.request_current();
                }
            }
            KeyCode::Char('r') => self.request_current(),
            KeyCode::Char('t') => self.next_opposition(),
            KeyCode::Char('m') => self.view.scatter_metric = self.view.scatter_metric.toggle(),
            KeyCode::Char('o') => self.view.over_mode = self.view.over_mode.toggle(),
            KeyCode::Char('c') => {
                if let Some(slide) = self.deck.current() {
                    let existing = notes_for(&*self.notes, slide).unwrap_or_default();
                    self.editing = Some(existing);
                }
            }
            KeyCode::Char('e') => self.request_export(ExportFormat::Pdf),
            KeyCode::Char('p') => self.request_export(ExportFormat::Pptx),
            KeyCode::Char('n') => self.request_export(ExportFormat::Native),
            KeyCode::Char('s') => self.request_export(ExportFormat::Server),
            KeyCode::Char('x') => self.request_export(ExportFormat::Xlsx),
            _ => {}
        }
    }

    /// Every keystroke is written through to the store.
    fn on_edit_key(&mut self, key: KeyEvent) {
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.editing = None;
                return;
            }
            KeyCode::Enter => buffer.push('\n'),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => return,
        }
        let text = buffer.clone();
        let Some(slide) = self.deck.current().cloned() else {
            return;
        };
        if let Err(err) = self.notes.set(&comment_key(&slide), &text) {
            self.push_log(format!("[WARN] Notes not saved: {err:#}"));
        }
        if let Some(current) = self.current.as_mut() {
            if current.slide.slide_id() == slide.slide_id() {
                current.notes = Some(text).filter(|t| !t.trim().is_empty());
            }
        }
    }

    fn apply(&mut self, delta: Delta) {
        match delta {
            Delta::Health(Ok(())) => self.push_log("[INFO] Stats API reachable"),
            Delta::Health(Err(err)) => self.push_log(format!("[WARN] Stats API unreachable: {err}")),
            Delta::Lists(lists) => {
                for err in &lists.errors {
                    self.push_log(format!("[WARN] {err}"));
                }
                self.push_log(format!(
                    "[INFO] {} teams, {} venues, {} players available",
                    lists.teams.len(),
                    lists.venues.len(),
                    lists.players.len()
                ));
                self.teams = lists.teams;
                self.venues = lists.venues.len();
                self.players = lists.players;
                if self.selection.selected_players.is_empty() && self.selection.team_players.is_empty() {
                    self.install_roster();
                    if !self.selection.team_players.is_empty() {
                        self.refresh_deck();
                    }
                }
            }
            Delta::Loaded(ready) => {
                let is_current = self
                    .deck
                    .current()
                    .is_some_and(|s| s.slide_id() == ready.slide.slide_id());
                if is_current {
                    for err in &ready.errors {
                        self.push_log(format!("[WARN] {err}"));
                    }
                    let mut ready = *ready;
                    ready.notes = notes_for(&*self.notes, &ready.slide);
                    self.current = Some(ready);
                }
            }
            Delta::ExportDone(result) => {
                self.exporting = false;
                match result {
                    Ok(path) => self.push_log(format!("[INFO] Exported {}", path.display())),
                    Err(msg) => self.push_log(format!("[WARN] {msg}")),
                }
            }
            Delta::Log(msg) => self.push_log(msg),
        }
    }
}

fn spawn_provider(
    api: Arc<HttpStatsApi>,
    notes: Arc<dyn NotesStore>,
    out_dir: PathBuf,
    tx: mpsc::Sender<Delta>,
    cmd_rx: mpsc::Receiver<ProviderCommand>,
) {
    thread::spawn(move || {
        let health = check_api_health(&*api).map_err(|err| format!("{err:#}"));
        let _ = tx.send(Delta::Health(health));
        let _ = tx.send(Delta::Lists(fetch_startup_lists(&*api)));

        let capturer = BufferCapturer::default();
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Load { slide, ctx } => {
                    let ready = load_slide(&*api, &slide, &ctx);
                    let _ = tx.send(Delta::Loaded(Box::new(ready)));
                }
                ProviderCommand::Export {
                    mut deck,
                    selection,
                    format,
                    view,
                } => {
                    let services = ExportServices {
                        api: &*api,
                        notes: &*notes,
                        capturer: &capturer,
                    };
                    let progress_tx = tx.clone();
                    let result = export_deck(
                        &mut deck,
                        &selection,
                        format,
                        &out_dir,
                        &services,
                        &view,
                        |progress| {
                            let _ = progress_tx.send(Delta::Log(format!("[INFO] {}", progress.message)));
                        },
                    );
                    let outcome = match result {
                        Ok(report) => {
                            for err in &report.errors {
                                let _ = tx.send(Delta::Log(format!("[WARN] {err}")));
                            }
                            Ok(report.path)
                        }
                        Err(_) => Err(EXPORT_FAILED_MESSAGE.to_string()),
                    };
                    let _ = tx.send(Delta::ExportDone(outcome));
                }
            }
        }
    });
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let args = PlannerArgs::parse(std::env::args().skip(1))?;
    let config = ApiConfig::from_env();
    info!("stats api {} ({:?})", config.base_url, config.source);
    let api = Arc::new(HttpStatsApi::new(config)?);
    let notes: Arc<dyn NotesStore> = Arc::from(open_notes_store(args.notes_backend)?);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(api, Arc::clone(&notes), args.out_dir.clone(), tx, cmd_rx);

    let mut app = App::new(&args, notes, cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        warn!("viewer exited with error: {err}");
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            app.apply(delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &app.current {
        Some(ready) => {
            let mut view = app.view.clone();
            view.position_label = Some(app.deck.position_label());
            render_slide(ready, &view, chunks[1], frame.buffer_mut());
        }
        None => {
            let text = if app.deck.is_empty() {
                "No slides. Pass --opposition, --venue or --player to build a deck."
            } else {
                "Loading slide..."
            };
            let body = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
            frame.render_widget(body, chunks[1]);
        }
    }

    let console = Paragraph::new(console_text(app))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(app));
    frame.render_widget(footer, chunks[3]);

    let area = frame.size();
    if let Some(buffer) = &app.editing {
        render_notes_editor(frame, area, buffer);
    } else if app.help_overlay {
        render_help_overlay(frame, area);
    }
}

fn header_text(app: &App) -> String {
    let opposition = app
        .selection
        .opposition
        .as_deref()
        .unwrap_or("no opposition");
    let venue = app.selection.venue.as_deref().unwrap_or("no venue");
    format!(
        "IPL OPPOSITION PLANNER | {opposition} | {venue} | {} | {} teams, {} venues{}",
        app.deck.position_label(),
        app.teams.len(),
        app.venues,
        if app.exporting { " | EXPORTING" } else { "" }
    )
}

fn footer_text(app: &App) -> String {
    if app.editing.is_some() {
        return "Type to edit | Enter newline | Backspace delete | Esc done".to_string();
    }
    "j/k Move | 1-9 Jump | t Opposition | m Metric | o Overs | c Notes | e PDF | p PPTX | n Native | s Server | x XLSX | ? Help | q Quit".to_string()
}

fn console_text(app: &App) -> String {
    if app.logs.is_empty() {
        return "No messages yet".to_string();
    }
    app.logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_notes_editor(frame: &mut Frame, area: Rect, buffer: &str) {
    let popup_area = centered_rect(60, 40, area);
    frame.render_widget(Clear, popup_area);
    let editor = Paragraph::new(format!("{buffer}_"))
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Analyst Comments").borders(Borders::ALL));
    frame.render_widget(editor, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "IPL Opposition Planner - Help",
        "",
        "Deck:",
        "  j/k or arrows  Next / previous slide (wraps)",
        "  1-9            Jump to slide",
        "  r              Reload slide",
        "  t              Next opposition (skips your team)",
        "  m              Scatter metric: average / strike rate",
        "  o              Over-by-over: bowlers / pacer vs spinner",
        "  c              Edit analyst comments",
        "",
        "Export:",
        "  e PDF   p PPTX   n Native PPTX   s Server PPTX   x Workbook",
        "",
        "  ?              Toggle help",
        "  q              Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text).block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
