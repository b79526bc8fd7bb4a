//! Draws a loaded slide into a ratatui buffer. The same drawing code feeds
//! the interactive viewer and the headless capture used by exports.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Points, Rectangle};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap};

use crate::bowler_table::{BOWLER_TABLE_HEADERS, bowler_table};
use crate::cell_tone::{Tone, hex_color, prettify_label};
use crate::charts::{
    OverMode, OverStack, RADAR_MAX, ScatterMetric, ScatterScope, bowler_stacks,
    pacer_spinner_stacks, radar_axes, scatter_view,
};
use crate::field_maps::{
    PITCH_CANVAS, UNMAPPED_POSITION, WAGON_CANVAS, WAGON_MAX_RADIUS, pitch_dots, wagon_view,
};
use crate::nba_insights::{NbaInsights, player_insights, team_insights};
use crate::state::{
    BowlingStats, Insights, NBA_AWAY_TEAM, NBA_HOME_TEAM, NbaBundle, NbaPlayerStats,
    NbaTeamStats, OverByOverBundle, PlayerBundle, ReadySlide, ScatterPoint, SlideData,
    TeamBundle, VenueBundle,
};
use crate::strike_zones::{LINES, zone_grid};
use crate::venue_tables::{DECISION_HEADERS, SITUATION_HEADERS, decision_rows, situation_rows};

pub const BACKGROUND: Color = Color::Rgb(17, 24, 39);
pub const PANEL_BORDER: Color = Color::Rgb(55, 65, 81);
pub const ACCENT: Color = Color::Rgb(79, 209, 199);
pub const TEXT: Color = Color::Rgb(229, 231, 235);
pub const MUTED: Color = Color::Rgb(156, 163, 175);
pub const WARN: Color = Color::Rgb(250, 204, 21);
const FIELD_GREEN: Color = Color::Rgb(22, 163, 74);
const FIELD_DARK: Color = Color::Rgb(21, 128, 61);
const PITCH_BROWN: Color = Color::Rgb(146, 64, 14);

/// View toggles that change what a slide shows without refetching.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub scatter_metric: ScatterMetric,
    pub over_mode: OverMode,
    /// "Slide i of n" shown in the header when set.
    pub position_label: Option<String>,
}

pub fn render_slide(ready: &ReadySlide, opts: &ViewOptions, area: Rect, buf: &mut Buffer) {
    Block::default()
        .style(Style::default().bg(BACKGROUND).fg(TEXT))
        .render(area, buf);

    let notes = ready.notes.as_deref().filter(|n| !n.trim().is_empty());
    let mut constraints = vec![Constraint::Length(2), Constraint::Min(4)];
    if notes.is_some() {
        constraints.push(Constraint::Length(5));
    }
    if ready.is_degraded() {
        constraints.push(Constraint::Length(1));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_header(ready, opts, chunks[0], buf);
    match &ready.data {
        SlideData::Player(bundle) => render_player(&ready.slide.data, bundle, opts, chunks[1], buf),
        SlideData::Team(bundle) => render_team(&ready.slide.data, bundle, opts, chunks[1], buf),
        SlideData::OverByOver(bundle) => {
            render_over_by_over(&ready.slide.data, bundle, opts, chunks[1], buf)
        }
        SlideData::Venue(bundle) => render_venue(bundle, chunks[1], buf),
        SlideData::Nba(bundle) => render_nba(bundle, chunks[1], buf),
    }

    let mut next = 2;
    if let Some(text) = notes {
        Paragraph::new(text.to_string())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(TEXT))
            .block(panel("Analyst Comments"))
            .render(chunks[next], buf);
        next += 1;
    }
    if ready.is_degraded() {
        let msg = format!(
            "Some data could not be loaded ({} read group(s) failed)",
            ready.errors.len()
        );
        Paragraph::new(msg)
            .style(Style::default().fg(WARN))
            .render(chunks[next], buf);
    }
}

fn render_header(ready: &ReadySlide, opts: &ViewOptions, area: Rect, buf: &mut Buffer) {
    let mut spans = vec![Span::styled(
        ready.slide.title.clone(),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )];
    if let Some(opp) = ready.opposition.as_deref() {
        spans.push(Span::styled(
            format!("   vs {opp}"),
            Style::default().fg(MUTED),
        ));
    }
    if let Some(label) = opts.position_label.as_deref() {
        spans.push(Span::styled(format!("   {label}"), Style::default().fg(MUTED)));
    }
    Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(PANEL_BORDER)))
        .render(area, buf);
}

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(PANEL_BORDER))
}

fn split(direction: Direction, constraints: &[Constraint], area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(direction)
        .constraints(constraints.to_vec())
        .split(area)
}

fn placeholder(title: &str, message: &str, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(message.to_string(), Style::default().fg(MUTED)))
        .alignment(ratatui::layout::Alignment::Center)
        .block(panel(title))
        .render(area, buf);
}

fn bullet_list(title: &str, items: &[String], bullet: &str, color: Color, area: Rect, buf: &mut Buffer) {
    if items.is_empty() {
        placeholder(title, "Nothing to show", area, buf);
        return;
    }
    let lines: Vec<Line> = items
        .iter()
        .map(|item| {
            Line::from(vec![
                Span::styled(format!("{bullet} "), Style::default().fg(color)),
                Span::styled(item.clone(), Style::default().fg(TEXT)),
            ])
        })
        .collect();
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(panel(title))
        .render(area, buf);
}

fn render_insights(insights: &Insights, area: Rect, buf: &mut Buffer) {
    let cols = split(
        Direction::Horizontal,
        &[
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ],
        area,
    );
    bullet_list("AI Insights", &insights.ai_insights, "•", ACCENT, cols[0], buf);
    bullet_list("Strengths", &insights.strengths, "✓", Tone::Favorable.color(), cols[1], buf);
    bullet_list(
        "Areas for Improvement",
        &insights.areas_for_improvement,
        "!",
        Tone::Unfavorable.color(),
        cols[2],
        buf,
    );
}

fn render_player(name: &str, bundle: &PlayerBundle, opts: &ViewOptions, area: Rect, buf: &mut Buffer) {
    let rows = split(
        Direction::Vertical,
        &[
            Constraint::Length(9),
            Constraint::Percentage(45),
            Constraint::Min(8),
        ],
        area,
    );
    render_insights(&bundle.insights, rows[0], buf);

    let middle = split(
        Direction::Horizontal,
        &[Constraint::Percentage(45), Constraint::Percentage(55)],
        rows[1],
    );
    render_scatter(&bundle.scatter, opts.scatter_metric, ScatterScope::Player, name, middle[0], buf);
    render_bowler_table(bundle.bowling.as_ref(), middle[1], buf);

    let bottom = split(
        Direction::Horizontal,
        &[
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ],
        rows[2],
    );
    render_pitch_map(name, bundle, bottom[0], buf);
    render_wagon_wheel(bundle, bottom[1], buf);
    render_strike_zones(name, bundle, bottom[2], buf);
}

fn render_team(name: &str, bundle: &TeamBundle, opts: &ViewOptions, area: Rect, buf: &mut Buffer) {
    let rows = split(
        Direction::Vertical,
        &[Constraint::Length(9), Constraint::Min(8)],
        area,
    );
    render_insights(&bundle.insights, rows[0], buf);
    let bottom = split(
        Direction::Horizontal,
        &[Constraint::Percentage(50), Constraint::Percentage(50)],
        rows[1],
    );
    render_scatter(&bundle.scatter, opts.scatter_metric, ScatterScope::Team, name, bottom[0], buf);
    render_radar(bundle.bowling.as_ref(), bottom[1], buf);
}

fn render_scatter(
    points: &[ScatterPoint],
    metric: ScatterMetric,
    scope: ScatterScope,
    highlight: &str,
    area: Rect,
    buf: &mut Buffer,
) {
    let title = match scope {
        ScatterScope::Player => format!("Performance Scatter Plot ({})", metric.label()),
        ScatterScope::Team => format!("Team Performance Scatter Plot ({})", metric.label()),
    };
    if points.is_empty() {
        placeholder(&title, "No scatter data available", area, buf);
        return;
    }
    let view = scatter_view(points, metric, scope, highlight);
    let plain: Vec<(f64, f64)> = view
        .dots
        .iter()
        .filter(|d| !d.selected)
        .filter_map(|d| Some((d.x?, d.y?)))
        .collect();
    let selected: Vec<(String, f64, f64)> = view
        .dots
        .iter()
        .filter(|d| d.selected)
        .filter_map(|d| Some((d.name.clone(), d.x?, d.y?)))
        .collect();
    let (x0, x1) = view.x_domain;
    let (y0, y1) = view.y_domain;

    Canvas::default()
        .block(panel(&title))
        .background_color(BACKGROUND)
        .marker(Marker::Braille)
        .x_bounds([x0, x1])
        .y_bounds([y0, y1])
        .paint(|ctx| {
            if let Some((rx, ry)) = view.reference {
                let dim = Color::Rgb(107, 114, 128);
                ctx.draw(&CanvasLine::new(rx, y0, rx, y1, dim));
                ctx.draw(&CanvasLine::new(x0, ry, x1, ry, dim));
            }
            ctx.draw(&Points {
                coords: &plain,
                color: Color::Rgb(56, 178, 172),
            });
            for (name, x, y) in &selected {
                ctx.draw(&Circle {
                    x: *x,
                    y: *y,
                    radius: (x1 - x0) / 60.0,
                    color: ACCENT,
                });
                ctx.print(*x, *y, Span::styled(format!(" {name}"), Style::default().fg(Color::White)));
            }
            for tick in &view.x_ticks {
                ctx.print(*tick, y0, Span::styled(format!("{tick}"), Style::default().fg(MUTED)));
            }
            for tick in &view.y_ticks {
                ctx.print(x0, *tick, Span::styled(format!("{tick}"), Style::default().fg(MUTED)));
            }
        })
        .render(area, buf);
}

fn render_bowler_table(stats: Option<&BowlingStats>, area: Rect, buf: &mut Buffer) {
    let Some(table) = stats.and_then(bowler_table) else {
        placeholder("Bowler Type Analysis", "No bowling statistics available", area, buf);
        return;
    };
    let header = Row::new(
        BOWLER_TABLE_HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(TEXT).add_modifier(Modifier::BOLD))),
    );
    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            let cells = row.cells().into_iter().zip(row.tones()).map(|(text, tone)| {
                let color = tone.map(Tone::color).unwrap_or(TEXT);
                Cell::from(text).style(Style::default().fg(color))
            });
            Row::new(cells)
        })
        .collect();
    let widths = [
        Constraint::Percentage(26),
        Constraint::Percentage(14),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
    ];
    let title = format!("Bowler Type Analysis: {}", table.subject);
    Table::new(rows, widths)
        .header(header)
        .block(panel(&title))
        .render(area, buf);
}

fn render_pitch_map(name: &str, bundle: &PlayerBundle, area: Rect, buf: &mut Buffer) {
    let title = "Pitch Map: Dismissal Location";
    let Some(data) = bundle
        .dismissals
        .as_ref()
        .filter(|d| !d.dismissal_locations.is_empty())
    else {
        placeholder(title, &format!("No dismissal data available for {name}"), area, buf);
        return;
    };
    let dots = pitch_dots(data);
    let flip = |y: f64| PITCH_CANVAS - y;

    Canvas::default()
        .block(panel(title))
        .background_color(BACKGROUND)
        .marker(Marker::Braille)
        .x_bounds([0.0, PITCH_CANVAS])
        .y_bounds([0.0, PITCH_CANVAS])
        .paint(|ctx| {
            ctx.draw(&Circle {
                x: 200.0,
                y: 200.0,
                radius: 190.0,
                color: FIELD_GREEN,
            });
            ctx.draw(&Circle {
                x: 200.0,
                y: 200.0,
                radius: 185.0,
                color: Color::White,
            });
            ctx.draw(&Circle {
                x: 200.0,
                y: 200.0,
                radius: 80.0,
                color: FIELD_DARK,
            });
            ctx.draw(&Rectangle {
                x: 190.0,
                y: flip(280.0),
                width: 20.0,
                height: 160.0,
                color: PITCH_BROWN,
            });
            ctx.layer();
            for dot in &dots {
                fill_circle(ctx, dot.x, flip(dot.y), dot.radius, hex_color(dot.color));
            }
            if dots.iter().any(|d| !d.mapped) {
                let (ux, uy) = UNMAPPED_POSITION;
                ctx.print(ux - 40.0, flip(uy) + 20.0, Span::styled("Unmapped", Style::default().fg(MUTED)));
            }
            ctx.print(60.0, 200.0, Span::styled("Off", Style::default().fg(Color::White)));
            ctx.print(300.0, 200.0, Span::styled("Leg", Style::default().fg(Color::White)));
        })
        .render(area, buf);
}

fn fill_circle(ctx: &mut Context, x: f64, y: f64, radius: f64, color: Color) {
    let mut r = radius;
    while r > 0.5 {
        ctx.draw(&Circle { x, y, radius: r, color });
        r -= 1.5;
    }
    ctx.draw(&Points {
        coords: &[(x, y)],
        color,
    });
}

fn render_wagon_wheel(bundle: &PlayerBundle, area: Rect, buf: &mut Buffer) {
    let title = "Wagon Wheel: Boundary Distribution";
    let Some(data) = bundle.wagon_wheel.as_ref().filter(|w| !w.zones.is_empty()) else {
        placeholder(title, "No wagon wheel data available", area, buf);
        return;
    };
    let view = wagon_view(data);
    let cols = split(
        Direction::Horizontal,
        &[Constraint::Percentage(60), Constraint::Percentage(40)],
        area,
    );
    let center = WAGON_CANVAS / 2.0;
    Canvas::default()
        .block(panel(title))
        .background_color(BACKGROUND)
        .marker(Marker::Braille)
        .x_bounds([0.0, WAGON_CANVAS])
        .y_bounds([0.0, WAGON_CANVAS])
        .paint(|ctx| {
            for frac in [1.0, 0.75, 0.5, 0.25] {
                ctx.draw(&Circle {
                    x: center,
                    y: center,
                    radius: WAGON_MAX_RADIUS * frac,
                    color: FIELD_DARK,
                });
            }
            ctx.layer();
            for line in &view.lines {
                ctx.draw(&CanvasLine::new(
                    line.x1,
                    WAGON_CANVAS - line.y1,
                    line.x2,
                    WAGON_CANVAS - line.y2,
                    hex_color(line.color),
                ));
            }
            fill_circle(ctx, center, center, 8.0, Color::White);
        })
        .render(cols[0], buf);

    let mut lines = vec![
        Line::from(format!("Total Boundaries: {}", view.total_boundaries)),
        Line::from(format!("Zones: {}", view.zones_with_data)),
    ];
    if let Some((zone, n)) = &view.most_productive {
        lines.push(Line::from(Span::styled(
            format!("Most: {zone} ({n})"),
            Style::default().fg(Tone::Favorable.color()),
        )));
    }
    if let Some((zone, n)) = &view.least_productive {
        lines.push(Line::from(Span::styled(
            format!("Least: {zone} ({n})"),
            Style::default().fg(Tone::Unfavorable.color()),
        )));
    }
    lines.push(Line::from(Span::styled("Top Zones", Style::default().add_modifier(Modifier::BOLD))));
    for (zone, n) in &view.top_zones {
        lines.push(Line::from(format!("{zone}: {n}")));
    }
    Paragraph::new(lines)
        .style(Style::default().fg(TEXT))
        .block(panel("Summary"))
        .render(cols[1], buf);
}

fn render_strike_zones(name: &str, bundle: &PlayerBundle, area: Rect, buf: &mut Buffer) {
    let title = format!("Strike Rate Zones: {name}");
    let Some(data) = bundle.strike_zones.as_ref() else {
        placeholder(&title, "Failed to load strike rate zones", area, buf);
        return;
    };
    let grid = zone_grid(data);
    let mut header_cells = vec![Cell::from("")];
    header_cells.extend(LINES.iter().map(|l| {
        Cell::from(prettify_label(l)).style(Style::default().add_modifier(Modifier::BOLD))
    }));
    let rows: Vec<Row> = grid
        .rows
        .iter()
        .map(|(length, cells)| {
            let mut row = vec![Cell::from(length.clone())];
            row.extend(cells.iter().map(|c| {
                Cell::from(format!("{:^5}", c.strike_rate)).style(
                    Style::default()
                        .bg(c.tone.color())
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            }));
            Row::new(row)
        })
        .collect();
    let widths = [
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
    ];
    Table::new(rows, widths)
        .header(Row::new(header_cells))
        .column_spacing(1)
        .block(panel(&title))
        .render(area, buf);
}

fn render_radar(stats: Option<&BowlingStats>, area: Rect, buf: &mut Buffer) {
    let title = "Strike Rate vs Overall Average";
    let axes = stats.map(radar_axes).unwrap_or_default();
    if axes.is_empty() {
        placeholder(title, "No bowling statistics available", area, buf);
        return;
    }
    let n = axes.len();
    let spoke = |i: usize, value: f64| {
        let theta = std::f64::consts::FRAC_PI_2 - (i as f64) * std::f64::consts::TAU / n as f64;
        let r = value.clamp(0.0, RADAR_MAX);
        (r * theta.cos(), r * theta.sin())
    };
    let bound = RADAR_MAX * 1.35;

    Canvas::default()
        .block(panel(title))
        .background_color(BACKGROUND)
        .marker(Marker::Braille)
        .x_bounds([-bound, bound])
        .y_bounds([-bound, bound])
        .paint(|ctx| {
            for ring in [50.0, 100.0, 150.0, 200.0] {
                polygon(ctx, (0..n).map(|i| spoke(i, ring)).collect(), PANEL_BORDER);
            }
            for i in 0..n {
                let (x, y) = spoke(i, RADAR_MAX);
                ctx.draw(&CanvasLine::new(0.0, 0.0, x, y, PANEL_BORDER));
            }
            ctx.layer();
            polygon(
                ctx,
                axes.iter().enumerate().map(|(i, a)| spoke(i, a.overall)).collect(),
                hex_color("#f59e0b"),
            );
            polygon(
                ctx,
                axes.iter().enumerate().map(|(i, a)| spoke(i, a.entity)).collect(),
                hex_color("#10b981"),
            );
            for (i, axis) in axes.iter().enumerate() {
                let (x, y) = spoke(i, RADAR_MAX);
                ctx.print(
                    x * 1.1,
                    y * 1.1,
                    Span::styled(axis.label.clone(), Style::default().fg(MUTED)),
                );
            }
        })
        .render(area, buf);
}

fn polygon(ctx: &mut Context, points: Vec<(f64, f64)>, color: Color) {
    if points.len() < 2 {
        return;
    }
    for (i, (x1, y1)) in points.iter().enumerate() {
        let (x2, y2) = points[(i + 1) % points.len()];
        ctx.draw(&CanvasLine::new(*x1, *y1, x2, y2, color));
    }
}

fn render_over_by_over(team: &str, bundle: &OverByOverBundle, opts: &ViewOptions, area: Rect, buf: &mut Buffer) {
    let stacks = match opts.over_mode {
        OverMode::Bowlers => bowler_stacks(&bundle.overs),
        OverMode::PacerSpinner => pacer_spinner_stacks(&bundle.pacer_spinner),
    };
    let title = format!("{team}: {}", opts.over_mode.heading());
    if stacks.is_empty() {
        placeholder(&title, "No over-by-over data available", area, buf);
        return;
    }

    let block = panel(&title);
    let inner = block.inner(area);
    block.render(area, buf);
    let rows = split(
        Direction::Vertical,
        &[Constraint::Min(4), Constraint::Length(1), Constraint::Length(3)],
        inner,
    );
    paint_stacks(&stacks, rows[0], buf);

    let slot = (rows[1].width as usize / stacks.len().max(1)).max(1);
    for (i, stack) in stacks.iter().enumerate() {
        let x = rows[1].x + (i * slot) as u16;
        if x < rows[1].right() {
            buf.set_string(x, rows[1].y, stack.over.to_string(), Style::default().fg(MUTED));
        }
    }

    let mut legend: Vec<(String, &'static str)> = Vec::new();
    for seg in stacks.iter().flat_map(|s| &s.segments) {
        if !legend.iter().any(|(name, _)| name == &seg.name) {
            legend.push((seg.name.clone(), seg.color));
        }
    }
    let spans: Vec<Span> = legend
        .into_iter()
        .flat_map(|(name, color)| {
            [
                Span::styled("■ ", Style::default().fg(hex_color(color))),
                Span::styled(format!("{name}   "), Style::default().fg(TEXT)),
            ]
        })
        .collect();
    Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .render(rows[2], buf);
}

/// Stacked columns drawn straight into the buffer, one slot per over.
fn paint_stacks(stacks: &[OverStack], area: Rect, buf: &mut Buffer) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let max_total = stacks
        .iter()
        .map(|s| s.segments.iter().map(|seg| seg.overs).sum::<f64>())
        .fold(0.0_f64, f64::max);
    if max_total <= 0.0 {
        return;
    }
    let slot = (area.width as usize / stacks.len()).max(1);
    let bar_width = slot.saturating_sub(1).max(1);
    let scale = area.height as f64 / max_total;

    for (i, stack) in stacks.iter().enumerate() {
        let x0 = area.x as usize + i * slot;
        let mut filled = 0.0_f64;
        for seg in &stack.segments {
            let from = (filled * scale).round() as u16;
            filled += seg.overs;
            let to = ((filled * scale).round() as u16).min(area.height);
            let color = hex_color(seg.color);
            for level in from..to {
                let y = area.bottom() - 1 - level;
                for dx in 0..bar_width {
                    let x = (x0 + dx) as u16;
                    if x < area.right() {
                        buf.get_mut(x, y).set_symbol("█").set_fg(color);
                    }
                }
            }
        }
    }
}

fn render_venue(bundle: &VenueBundle, area: Rect, buf: &mut Buffer) {
    let rows = split(
        Direction::Vertical,
        &[Constraint::Percentage(40), Constraint::Percentage(60)],
        area,
    );
    bullet_list("Venue Insights", &bundle.insights, "•", ACCENT, rows[0], buf);
    let cols = split(
        Direction::Horizontal,
        &[Constraint::Percentage(55), Constraint::Percentage(45)],
        rows[1],
    );

    let situations = situation_rows(&bundle.situations);
    if situations.is_empty() {
        placeholder("Toss Situation Details", "No situation details available", cols[0], buf);
    } else {
        let header = Row::new(SITUATION_HEADERS.iter().map(|h| Cell::from(*h)))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let body: Vec<Row> = situations
            .iter()
            .map(|row| {
                let [situation, wins, losses, no_result, pct] = row.cells();
                Row::new(vec![
                    Cell::from(situation),
                    Cell::from(wins).style(Style::default().fg(Tone::Favorable.color())),
                    Cell::from(losses).style(Style::default().fg(Tone::Unfavorable.color())),
                    Cell::from(no_result),
                    Cell::from(pct).style(Style::default().fg(ACCENT)),
                ])
            })
            .collect();
        Table::new(
            body,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(15),
                Constraint::Percentage(15),
                Constraint::Percentage(15),
                Constraint::Percentage(15),
            ],
        )
        .header(header)
        .block(panel("Toss Situation Details"))
        .render(cols[0], buf);
    }

    let decisions = decision_rows(&bundle.toss_decisions);
    if decisions.is_empty() {
        placeholder("Toss Decisions", "No toss decision data available", cols[1], buf);
    } else {
        let header = Row::new(DECISION_HEADERS.iter().map(|h| Cell::from(*h)))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let body: Vec<Row> = decisions
            .iter()
            .map(|row| {
                let [toss, batted, bowled] = row.cells();
                Row::new(vec![
                    Cell::from(toss),
                    Cell::from(batted).style(Style::default().fg(tone_or_text(row.batted_tone))),
                    Cell::from(bowled).style(Style::default().fg(tone_or_text(row.bowled_tone))),
                ])
            })
            .collect();
        Table::new(
            body,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ],
        )
        .header(header)
        .block(panel("Toss Decisions"))
        .render(cols[1], buf);
    }
}

fn tone_or_text(tone: Tone) -> Color {
    match tone {
        Tone::Neutral | Tone::Empty => TEXT,
        other => other.color(),
    }
}

fn render_nba(bundle: &NbaBundle, area: Rect, buf: &mut Buffer) {
    let cols = split(
        Direction::Horizontal,
        &[Constraint::Percentage(50), Constraint::Percentage(50)],
        area,
    );
    render_nba_side(
        NBA_HOME_TEAM,
        bundle.home_stats.as_ref(),
        &bundle.home_players,
        &bundle.home_selected,
        cols[0],
        buf,
    );
    render_nba_side(
        NBA_AWAY_TEAM,
        bundle.away_stats.as_ref(),
        &bundle.away_players,
        &bundle.away_selected,
        cols[1],
        buf,
    );
}

fn render_nba_side(
    team: &str,
    stats: Option<&NbaTeamStats>,
    roster: &[String],
    selected: &[(String, NbaPlayerStats)],
    area: Rect,
    buf: &mut Buffer,
) {
    let mut lines: Vec<Line> = Vec::new();
    let heading = |text: String| {
        Line::from(Span::styled(
            text,
            Style::default().fg(hex_color("#fb923c")).add_modifier(Modifier::BOLD),
        ))
    };
    match stats {
        Some(stats) => {
            lines.push(heading("Team Analysis".to_string()));
            push_nba_sections(&mut lines, &team_insights(team, stats));
        }
        None => lines.push(Line::from(Span::styled(
            "No team statistics available",
            Style::default().fg(MUTED),
        ))),
    }
    for (player, pstats) in selected {
        lines.push(Line::from(""));
        lines.push(heading(format!("Player Analysis: {player}")));
        push_nba_sections(&mut lines, &player_insights(player, pstats));
    }
    if selected.is_empty() && !roster.is_empty() {
        lines.push(Line::from(""));
        let preview: Vec<&str> = roster.iter().take(8).map(String::as_str).collect();
        lines.push(Line::from(Span::styled(
            format!("Roster: {}", preview.join(", ")),
            Style::default().fg(MUTED),
        )));
    }
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(panel(team))
        .render(area, buf);
}

fn push_nba_sections(lines: &mut Vec<Line<'static>>, insights: &NbaInsights) {
    for (title, items) in [
        ("AI Insights", &insights.ai_insights),
        ("Strengths", &insights.strengths),
        ("Weaknesses", &insights.weaknesses),
    ] {
        lines.push(Line::from(Span::styled(title, Style::default().fg(ACCENT))));
        for item in items {
            lines.push(Line::from(vec![
                Span::styled("• ", Style::default().fg(ACCENT)),
                Span::styled(item.clone(), Style::default().fg(TEXT)),
            ]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Slide, SlideKind};

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn degraded_slide_shows_warning_and_notes() {
        let slide = Slide::new(SlideKind::Venue, "Eden Gardens", 1);
        let ready = ReadySlide {
            slide,
            data: SlideData::empty(SlideKind::Venue),
            opposition: None,
            notes: Some("Bowl first here".to_string()),
            errors: vec!["venue overview: http 500".to_string()],
        };
        let area = Rect::new(0, 0, 160, 45);
        let mut buf = Buffer::empty(area);
        render_slide(&ready, &ViewOptions::default(), area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Venue Analysis: Eden Gardens"));
        assert!(text.contains("Bowl first here"));
        assert!(text.contains("Some data could not be loaded"));
        assert!(text.contains("No situation details available"));
    }
}
