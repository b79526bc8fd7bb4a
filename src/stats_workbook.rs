use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::bowler_table::bowler_table;
use crate::nba_insights::{NbaInsights, player_insights, team_insights};
use crate::state::{
    Insights, NBA_AWAY_TEAM, NBA_HOME_TEAM, ReadySlide, ScatterPoint, SlideData,
};
use crate::strike_zones::zone_grid;
use crate::venue_tables::{decision_rows, situation_rows};

fn header(cols: &[&str]) -> Vec<Vec<String>> {
    vec![cols.iter().map(|c| c.to_string()).collect()]
}

fn opt_to_string(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

/// Every table the deck shows, one sheet per table kind, rows tagged with
/// the slide they came from.
pub fn write_workbook(slides: &[ReadySlide]) -> Result<Vec<u8>> {
    let mut slide_rows = header(&["#", "Type", "Title", "Status", "Errors", "Analyst Comments"]);
    let mut insight_rows = header(&["Slide", "Section", "Text"]);
    let mut bowler_rows = header(&[
        "Slide",
        "Subject",
        "Bowling Type",
        "Balls",
        "Strike Rate",
        "Average",
        "Dot %",
        "Boundary %",
        "Overall Avg",
    ]);
    let mut scatter_rows = header(&[
        "Slide",
        "Name",
        "1st Inns Avg",
        "2nd Inns Avg",
        "1st Inns SR",
        "2nd Inns SR",
    ]);
    let mut zone_rows = header(&["Player", "Length", "Line", "Strike Rate"]);
    let mut dismissal_rows = header(&["Player", "Position", "Dismissals"]);
    let mut wagon_rows = header(&["Player", "Zone", "Boundaries"]);
    let mut over_rows = header(&["Team", "Over", "Bowler", "Overs"]);
    let mut pacer_rows = header(&["Team", "Over", "Pacer Overs", "Spinner Overs", "Total"]);
    let mut situation_sheet = header(&["Venue", "Situation", "Wins", "Losses", "No Result", "Win %"]);
    let mut decision_sheet = header(&["Venue", "Toss", "Batted First", "Bowled First"]);

    for ready in slides {
        let slide = &ready.slide;
        slide_rows.push(vec![
            slide.index.to_string(),
            slide.kind.as_str().to_string(),
            slide.title.clone(),
            if ready.is_degraded() {
                "partial".to_string()
            } else {
                "ok".to_string()
            },
            ready.errors.join("; "),
            ready.notes.clone().unwrap_or_default(),
        ]);

        match &ready.data {
            SlideData::Player(bundle) => {
                insight_rows.extend(insights_rows(&slide.title, &bundle.insights));
                if let Some(table) = bundle.bowling.as_ref().and_then(bowler_table) {
                    for row in &table.rows {
                        let mut cells = vec![slide.title.clone(), table.subject.clone()];
                        cells.extend(row.cells());
                        bowler_rows.push(cells);
                    }
                }
                scatter_rows.extend(scatter_sheet_rows(&slide.title, &bundle.scatter));
                if let Some(zones) = &bundle.strike_zones {
                    for (length, cells) in zone_grid(zones).rows {
                        for cell in cells {
                            zone_rows.push(vec![
                                slide.data.clone(),
                                length.clone(),
                                cell.line.to_string(),
                                cell.strike_rate.to_string(),
                            ]);
                        }
                    }
                }
                if let Some(dismissals) = &bundle.dismissals {
                    for loc in &dismissals.dismissal_locations {
                        dismissal_rows.push(vec![
                            slide.data.clone(),
                            loc.position.clone(),
                            loc.count.to_string(),
                        ]);
                    }
                }
                if let Some(wagon) = &bundle.wagon_wheel {
                    for zone in &wagon.zones {
                        wagon_rows.push(vec![
                            slide.data.clone(),
                            zone.field_zone.clone(),
                            zone.n_boundaries.to_string(),
                        ]);
                    }
                }
            }
            SlideData::Team(bundle) => {
                insight_rows.extend(insights_rows(&slide.title, &bundle.insights));
                if let Some(table) = bundle.bowling.as_ref().and_then(bowler_table) {
                    for row in &table.rows {
                        let mut cells = vec![slide.title.clone(), table.subject.clone()];
                        cells.extend(row.cells());
                        bowler_rows.push(cells);
                    }
                }
                scatter_rows.extend(scatter_sheet_rows(&slide.title, &bundle.scatter));
            }
            SlideData::OverByOver(bundle) => {
                for entry in &bundle.overs {
                    for bowler in &entry.bowlers {
                        over_rows.push(vec![
                            slide.data.clone(),
                            entry.over.to_string(),
                            bowler.name.clone(),
                            format!("{:.1}", bowler.overs),
                        ]);
                    }
                }
                for over in &bundle.pacer_spinner {
                    pacer_rows.push(vec![
                        slide.data.clone(),
                        over.over.to_string(),
                        format!("{:.1}", over.pacer_overs),
                        format!("{:.1}", over.spinner_overs),
                        format!("{:.1}", over.total_overs),
                    ]);
                }
            }
            SlideData::Venue(bundle) => {
                for text in &bundle.insights {
                    insight_rows.push(vec![
                        slide.title.clone(),
                        "Venue Insights".to_string(),
                        text.clone(),
                    ]);
                }
                for row in situation_rows(&bundle.situations) {
                    let mut cells = vec![slide.data.clone()];
                    cells.extend(row.cells());
                    situation_sheet.push(cells);
                }
                for row in decision_rows(&bundle.toss_decisions) {
                    let mut cells = vec![slide.data.clone()];
                    cells.extend(row.cells());
                    decision_sheet.push(cells);
                }
            }
            SlideData::Nba(bundle) => {
                for (team, stats, selected) in [
                    (NBA_HOME_TEAM, &bundle.home_stats, &bundle.home_selected),
                    (NBA_AWAY_TEAM, &bundle.away_stats, &bundle.away_selected),
                ] {
                    if let Some(stats) = stats {
                        insight_rows.extend(nba_rows(team, &team_insights(team, stats)));
                    }
                    for (player, pstats) in selected {
                        insight_rows.extend(nba_rows(player, &player_insights(player, pstats)));
                    }
                }
            }
        }
    }

    let mut workbook = Workbook::new();
    for (name, rows) in [
        ("Slides", &slide_rows),
        ("Insights", &insight_rows),
        ("BowlerTypes", &bowler_rows),
        ("Scatter", &scatter_rows),
        ("StrikeRateZones", &zone_rows),
        ("Dismissals", &dismissal_rows),
        ("WagonWheel", &wagon_rows),
        ("OverByOver", &over_rows),
        ("PacerSpinner", &pacer_rows),
        ("TossSituations", &situation_sheet),
        ("TossDecisions", &decision_sheet),
    ] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, rows)?;
    }

    workbook
        .save_to_buffer()
        .context("failed serializing workbook")
}

fn insights_rows(title: &str, insights: &Insights) -> Vec<Vec<String>> {
    let sections = [
        ("AI Insights", &insights.ai_insights),
        ("Strengths", &insights.strengths),
        ("Areas for Improvement", &insights.areas_for_improvement),
    ];
    sections
        .iter()
        .flat_map(|(section, items)| {
            items
                .iter()
                .map(move |text| vec![title.to_string(), section.to_string(), text.clone()])
        })
        .collect()
}

fn nba_rows(subject: &str, read: &NbaInsights) -> Vec<Vec<String>> {
    let sections = [
        ("AI Insights", &read.ai_insights),
        ("Strengths", &read.strengths),
        ("Weaknesses", &read.weaknesses),
    ];
    sections
        .iter()
        .flat_map(|(section, items)| {
            items
                .iter()
                .map(move |text| vec![subject.to_string(), section.to_string(), text.clone()])
        })
        .collect()
}

fn scatter_sheet_rows(title: &str, points: &[ScatterPoint]) -> Vec<Vec<String>> {
    points
        .iter()
        .map(|p| {
            vec![
                title.to_string(),
                p.name.clone(),
                opt_to_string(p.first_innings_avg),
                opt_to_string(p.second_innings_avg),
                opt_to_string(p.first_innings_sr),
                opt_to_string(p.second_innings_sr),
            ]
        })
        .collect()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
