//! Minimal OOXML presentation writer: one 16:9 slide per page, either a
//! captured screenshot or native text boxes and tables.

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::bowler_table::{BOWLER_TABLE_HEADERS, bowler_table};
use crate::cell_tone::Tone;
use crate::deck_export::DeckPage;
use crate::nba_insights::{player_insights, team_insights};
use crate::state::{NBA_AWAY_TEAM, NBA_HOME_TEAM, ReadySlide, SlideData};
use crate::venue_tables::{DECISION_HEADERS, SITUATION_HEADERS, decision_rows, situation_rows};

/// LAYOUT_WIDE, 13.333in x 7.5in.
pub const SLIDE_CX: i64 = 12_192_000;
pub const SLIDE_CY: i64 = 6_858_000;
const EMU_PER_INCH: f64 = 914_400.0;

pub const DECK_AUTHOR: &str = "IPL Opposition Planning Tool";
pub const DECK_COMPANY: &str = "Cricket Analytics";
pub const DECK_SUBJECT: &str = "Cricket Opposition Planning";

const TITLE_COLOR: &str = "0F766E";
const BODY_COLOR: &str = "1F2937";
const MUTED_COLOR: &str = "6B7280";
const ERROR_COLOR: &str = "DC2626";

#[derive(Debug, Clone)]
pub struct DeckMeta {
    pub title: String,
    pub created: String,
}

impl DeckMeta {
    pub fn new(opposition: Option<&str>, created: chrono::DateTime<chrono::Utc>) -> Self {
        let title = match opposition {
            Some(opp) => format!("IPL Opposition Analysis - {opp}"),
            None => "IPL Opposition Analysis".to_string(),
        };
        Self {
            title,
            created: created.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }
}

/// Slide content the native writer lays out from data instead of pixels.
#[derive(Debug, Clone)]
pub enum NativePage {
    Ready(ReadySlide),
    Failed { title: String },
}

struct SlidePart {
    xml: String,
    image: Option<Vec<u8>>,
}

pub fn write_screenshot_pptx(pages: &[DeckPage], meta: &DeckMeta) -> Result<Vec<u8>> {
    let total = pages.len();
    let mut parts = Vec::with_capacity(total);
    for (i, page) in pages.iter().enumerate() {
        let number = i + 1;
        let part = match page {
            DeckPage::Captured {
                title,
                capture,
                notes,
            } => {
                let mut shapes = ShapeTree::default();
                let png = capture.png().with_context(|| format!("encode slide {number}"))?;
                let note_height = if notes.is_some() { 0.9 } else { 0.0 };
                let avail_h = 7.5 - 0.35 - 0.45 - note_height;
                let mut w = 13.333 - 0.6;
                let mut h = w * capture.height() as f64 / capture.width().max(1) as f64;
                if h > avail_h {
                    h = avail_h;
                    w = h * capture.width() as f64 / capture.height().max(1) as f64;
                }
                shapes.picture(title, (13.333 - w) / 2.0, 0.35, w, h);
                if let Some(notes) = notes {
                    shapes.text_box(
                        0.3,
                        0.35 + h + 0.1,
                        12.7,
                        note_height,
                        &[Para::new(format!("Analyst Comments: {notes}"), 12, BODY_COLOR)],
                    );
                }
                shapes.slide_number(number, total);
                SlidePart {
                    xml: shapes.into_slide_xml(true),
                    image: Some(png),
                }
            }
            DeckPage::Failed { title } => SlidePart {
                xml: error_slide(title, number, total),
                image: None,
            },
        };
        parts.push(part);
    }
    package(&parts, meta)
}

pub fn write_native_pptx(pages: &[NativePage], meta: &DeckMeta) -> Result<Vec<u8>> {
    let total = pages.len();
    let parts: Vec<SlidePart> = pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let xml = match page {
                NativePage::Failed { title } => error_slide(title, i + 1, total),
                NativePage::Ready(ready) => native_slide(ready, i + 1, total),
            };
            SlidePart { xml, image: None }
        })
        .collect();
    package(&parts, meta)
}

fn error_slide(title: &str, number: usize, total: usize) -> String {
    let mut shapes = ShapeTree::default();
    shapes.text_box(
        0.5,
        3.0,
        12.3,
        0.6,
        &[Para::new(format!("Error loading slide: {title}"), 24, ERROR_COLOR).bold()],
    );
    shapes.text_box(
        0.5,
        3.7,
        12.3,
        0.5,
        &[Para::new(
            "Please try again or contact support if the issue persists.",
            14,
            MUTED_COLOR,
        )],
    );
    shapes.slide_number(number, total);
    shapes.into_slide_xml(false)
}

fn bullets(items: &[String], color: &'static str) -> Vec<Para> {
    items
        .iter()
        .map(|item| Para::new(format!("• {item}"), 12, color))
        .collect()
}

fn heading(text: &str) -> Para {
    Para::new(text, 14, TITLE_COLOR).bold()
}

fn native_slide(ready: &ReadySlide, number: usize, total: usize) -> String {
    let mut shapes = ShapeTree::default();
    shapes.text_box(
        0.4,
        0.25,
        12.5,
        0.6,
        &[Para::new(ready.slide.title.clone(), 26, TITLE_COLOR).bold()],
    );

    match &ready.data {
        SlideData::Player(bundle) => {
            insight_columns(&mut shapes, &bundle.insights);
            bowler_grid(&mut shapes, bundle.bowling.as_ref());
        }
        SlideData::Team(bundle) => {
            insight_columns(&mut shapes, &bundle.insights);
            bowler_grid(&mut shapes, bundle.bowling.as_ref());
        }
        SlideData::OverByOver(bundle) => {
            let mut rows = vec![vec![
                plain("Over"),
                plain("Pacer Overs"),
                plain("Spinner Overs"),
                plain("Total"),
            ]];
            rows.extend(bundle.pacer_spinner.iter().map(|o| {
                vec![
                    plain(o.over.to_string()),
                    plain(format!("{:.1}", o.pacer_overs)),
                    plain(format!("{:.1}", o.spinner_overs)),
                    plain(format!("{:.1}", o.total_overs)),
                ]
            }));
            if rows.len() > 1 {
                shapes.table(0.5, 1.1, 6.0, &rows);
            }
            let mut paras = vec![heading("Bowlers by Over")];
            for entry in &bundle.overs {
                let names: Vec<String> = entry
                    .bowlers
                    .iter()
                    .map(|b| format!("{} ({:.0})", b.name, b.overs))
                    .collect();
                paras.push(Para::new(
                    format!("Over {}: {}", entry.over, names.join(", ")),
                    10,
                    BODY_COLOR,
                ));
            }
            shapes.text_box(6.8, 1.1, 6.1, 5.6, &paras);
        }
        SlideData::Venue(bundle) => {
            let mut paras = vec![heading("Venue Insights")];
            paras.extend(bullets(&bundle.insights, BODY_COLOR));
            shapes.text_box(0.5, 1.0, 12.3, 1.8, &paras);

            let mut situations: Vec<Vec<TableCell>> = vec![SITUATION_HEADERS.iter().map(|h| plain(*h)).collect()];
            situations.extend(
                situation_rows(&bundle.situations)
                    .into_iter()
                    .map(|row| row.cells().into_iter().map(plain).collect()),
            );
            if situations.len() > 1 {
                shapes.table(0.5, 3.0, 7.0, &situations);
            }

            let mut decisions: Vec<Vec<TableCell>> = vec![DECISION_HEADERS.iter().map(|h| plain(*h)).collect()];
            decisions.extend(decision_rows(&bundle.toss_decisions).into_iter().map(|row| {
                let [toss, batted, bowled] = row.cells();
                vec![
                    plain(toss),
                    toned(batted, row.batted_tone),
                    toned(bowled, row.bowled_tone),
                ]
            }));
            if decisions.len() > 1 {
                shapes.table(7.8, 3.0, 5.0, &decisions);
            }
        }
        SlideData::Nba(bundle) => {
            for (x, team, stats, selected) in [
                (0.5, NBA_HOME_TEAM, bundle.home_stats.as_ref(), &bundle.home_selected),
                (6.9, NBA_AWAY_TEAM, bundle.away_stats.as_ref(), &bundle.away_selected),
            ] {
                let mut paras = vec![heading(team)];
                match stats {
                    Some(stats) => {
                        let read = team_insights(team, stats);
                        paras.extend(bullets(&read.ai_insights, BODY_COLOR));
                        paras.extend(bullets(&read.strengths, "15803D"));
                        paras.extend(bullets(&read.weaknesses, "B91C1C"));
                    }
                    None => paras.push(Para::new("No team statistics available", 12, MUTED_COLOR)),
                }
                for (player, pstats) in selected {
                    paras.push(heading(&format!("Player Analysis: {player}")));
                    let read = player_insights(player, pstats);
                    paras.extend(bullets(&read.ai_insights, BODY_COLOR));
                }
                shapes.text_box(x, 1.0, 5.9, 5.7, &paras);
            }
        }
    }

    if let Some(notes) = ready.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        shapes.text_box(
            0.5,
            6.55,
            11.5,
            0.6,
            &[Para::new(format!("Analyst Comments: {notes}"), 11, BODY_COLOR)],
        );
    }
    shapes.slide_number(number, total);
    shapes.into_slide_xml(false)
}

fn insight_columns(shapes: &mut ShapeTree, insights: &crate::state::Insights) {
    let mut left = vec![heading("AI Insights")];
    left.extend(bullets(&insights.ai_insights, BODY_COLOR));
    let mut middle = vec![heading("Strengths")];
    middle.extend(bullets(&insights.strengths, "15803D"));
    let mut right = vec![heading("Areas for Improvement")];
    right.extend(bullets(&insights.areas_for_improvement, "B91C1C"));
    shapes.text_box(0.5, 1.0, 4.0, 2.6, &left);
    shapes.text_box(4.65, 1.0, 4.0, 2.6, &middle);
    shapes.text_box(8.8, 1.0, 4.0, 2.6, &right);
}

fn bowler_grid(shapes: &mut ShapeTree, stats: Option<&crate::state::BowlingStats>) {
    let Some(table) = stats.and_then(bowler_table) else {
        shapes.text_box(
            0.5,
            3.8,
            12.3,
            0.5,
            &[Para::new("No bowling statistics available", 12, MUTED_COLOR)],
        );
        return;
    };
    let mut rows: Vec<Vec<TableCell>> = vec![BOWLER_TABLE_HEADERS.iter().map(|h| plain(*h)).collect()];
    rows.extend(table.rows.iter().map(|row| {
        row.cells()
            .into_iter()
            .zip(row.tones())
            .map(|(text, tone)| match tone {
                Some(tone) => toned(text, tone),
                None => plain(text),
            })
            .collect()
    }));
    shapes.table(0.5, 3.8, 12.3, &rows);
}

struct TableCell {
    text: String,
    color: Option<&'static str>,
}

fn plain(text: impl Into<String>) -> TableCell {
    TableCell {
        text: text.into(),
        color: None,
    }
}

fn toned(text: impl Into<String>, tone: Tone) -> TableCell {
    let color = match tone {
        Tone::Favorable => Some("15803D"),
        Tone::Unfavorable => Some("B91C1C"),
        Tone::Neutral => Some("A16207"),
        Tone::Empty => None,
    };
    TableCell {
        text: text.into(),
        color,
    }
}

struct Para {
    text: String,
    size: u32,
    color: &'static str,
    bold: bool,
}

impl Para {
    fn new(text: impl Into<String>, size: u32, color: &'static str) -> Self {
        Self {
            text: text.into(),
            size,
            color,
            bold: false,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn xml(&self) -> String {
        format!(
            r#"<a:p><a:r><a:rPr lang="en-US" sz="{}" b="{}" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
            self.size * 100,
            u8::from(self.bold),
            self.color,
            escape(self.text.as_str())
        )
    }
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

#[derive(Default)]
struct ShapeTree {
    body: String,
    next_id: u32,
}

impl ShapeTree {
    fn id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id + 1
    }

    fn text_box(&mut self, x: f64, y: f64, w: f64, h: f64, paras: &[Para]) {
        let id = self.id();
        let body: String = paras.iter().map(Para::xml).collect();
        self.body.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Text {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>{body}</p:txBody></p:sp>"#,
            emu(x),
            emu(y),
            emu(w),
            emu(h)
        ));
    }

    fn slide_number(&mut self, number: usize, total: usize) {
        self.text_box(
            12.0,
            7.05,
            1.1,
            0.35,
            &[Para::new(format!("{number} / {total}"), 10, MUTED_COLOR)],
        );
    }

    /// The picture always references relationship `rId2`.
    fn picture(&mut self, descr: &str, x: f64, y: f64, w: f64, h: f64) {
        let id = self.id();
        self.body.push_str(&format!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Slide Image {id}" descr="{}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
            escape(descr),
            emu(x),
            emu(y),
            emu(w),
            emu(h)
        ));
    }

    fn table(&mut self, x: f64, y: f64, w: f64, rows: &[Vec<TableCell>]) {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        if cols == 0 {
            return;
        }
        let id = self.id();
        let row_h = 0.32;
        let col_w = emu(w / cols as f64);
        let grid: String = (0..cols)
            .map(|_| format!(r#"<a:gridCol w="{col_w}"/>"#))
            .collect();
        let mut body = String::new();
        for (r, row) in rows.iter().enumerate() {
            body.push_str(&format!(r#"<a:tr h="{}">"#, emu(row_h)));
            for c in 0..cols {
                let cell = row.get(c);
                let text = cell.map(|c| c.text.as_str()).unwrap_or("");
                let color = cell.and_then(|c| c.color).unwrap_or(BODY_COLOR);
                let fill = if r == 0 { "E5E7EB" } else { "FFFFFF" };
                body.push_str(&format!(
                    r#"<a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US" sz="1100" b="{}" dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r></a:p></a:txBody><a:tcPr><a:solidFill><a:srgbClr val="{fill}"/></a:solidFill></a:tcPr></a:tc>"#,
                    u8::from(r == 0),
                    escape(text)
                ));
            }
            body.push_str("</a:tr>");
        }
        self.body.push_str(&format!(
            r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{id}" name="Table {id}"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr firstRow="1" bandRow="1"/><a:tblGrid>{grid}</a:tblGrid>{body}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#,
            emu(x),
            emu(y),
            emu(w),
            emu(row_h * rows.len() as f64)
        ));
    }

    fn into_slide_xml(self, dark: bool) -> String {
        let background = if dark { "111827" } else { "FFFFFF" };
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="{background}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            self.body
        )
    }
}

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const XML_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

fn package(parts: &[SlidePart], meta: &DeckMeta) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let put = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, bytes: &[u8]| -> Result<()> {
        zip.start_file(name, options)
            .with_context(|| format!("start pptx part {name}"))?;
        zip.write_all(bytes)
            .with_context(|| format!("write pptx part {name}"))?;
        Ok(())
    };

    put(&mut zip, "[Content_Types].xml", content_types(parts).as_bytes())?;
    put(&mut zip, "_rels/.rels", ROOT_RELS.as_bytes())?;
    put(&mut zip, "docProps/core.xml", core_props(meta).as_bytes())?;
    put(&mut zip, "docProps/app.xml", app_props(parts.len()).as_bytes())?;
    put(&mut zip, "ppt/presentation.xml", presentation_xml(parts.len()).as_bytes())?;
    put(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        presentation_rels(parts.len()).as_bytes(),
    )?;
    put(&mut zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER.as_bytes())?;
    put(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        rels(&[("rId1", REL_LAYOUT, "../slideLayouts/slideLayout1.xml"), ("rId2", REL_THEME, "../theme/theme1.xml")]).as_bytes(),
    )?;
    put(&mut zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes())?;
    put(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        rels(&[("rId1", REL_MASTER, "../slideMasters/slideMaster1.xml")]).as_bytes(),
    )?;
    put(&mut zip, "ppt/theme/theme1.xml", THEME.as_bytes())?;

    for (i, part) in parts.iter().enumerate() {
        let n = i + 1;
        put(&mut zip, &format!("ppt/slides/slide{n}.xml"), part.xml.as_bytes())?;
        let image_target = format!("../media/image{n}.png");
        let mut slide_rels = vec![("rId1", REL_LAYOUT, "../slideLayouts/slideLayout1.xml")];
        if part.image.is_some() {
            slide_rels.push(("rId2", REL_IMAGE, image_target.as_str()));
        }
        put(
            &mut zip,
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            rels(&slide_rels).as_bytes(),
        )?;
        if let Some(png) = &part.image {
            put(&mut zip, &format!("ppt/media/image{n}.png"), png)?;
        }
    }

    let cursor = zip.finish().context("finish pptx archive")?;
    Ok(cursor.into_inner())
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, kind, target)| {
            format!(r#"<Relationship Id="{id}" Type="{kind}" Target="{target}"/>"#)
        })
        .collect();
    format!(
        r#"{XML_HEAD}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{body}</Relationships>"#
    )
}

fn content_types(parts: &[SlidePart]) -> String {
    let slides: String = (1..=parts.len())
        .map(|n| {
            format!(
                r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
            )
        })
        .collect();
    format!(
        r#"{XML_HEAD}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>{slides}</Types>"#
    )
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

fn core_props(meta: &DeckMeta) -> String {
    format!(
        r#"{XML_HEAD}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:subject>{DECK_SUBJECT}</dc:subject><dc:creator>{DECK_AUTHOR}</dc:creator><cp:lastModifiedBy>{DECK_AUTHOR}</cp:lastModifiedBy><dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{created}</dcterms:modified></cp:coreProperties>"#,
        escape(meta.title.as_str()),
        created = meta.created
    )
}

fn app_props(slides: usize) -> String {
    format!(
        r#"{XML_HEAD}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>{DECK_AUTHOR}</Application><Company>{DECK_COMPANY}</Company><Slides>{slides}</Slides><PresentationFormat>Widescreen</PresentationFormat></Properties>"#
    )
}

fn presentation_xml(slides: usize) -> String {
    let ids: String = (1..=slides)
        .map(|n| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 2))
        .collect();
    let list = if ids.is_empty() {
        String::new()
    } else {
        format!("<p:sldIdLst>{ids}</p:sldIdLst>")
    };
    format!(
        r#"{XML_HEAD}
<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{list}<p:sldSz cx="{SLIDE_CX}" cy="{SLIDE_CY}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    )
}

fn presentation_rels(slides: usize) -> String {
    let mut entries: Vec<(String, &str, String)> = vec![
        ("rId1".to_string(), REL_MASTER, "slideMasters/slideMaster1.xml".to_string()),
        ("rId2".to_string(), REL_THEME, "theme/theme1.xml".to_string()),
    ];
    for n in 1..=slides {
        entries.push((format!("rId{}", n + 2), REL_SLIDE, format!("slides/slide{n}.xml")));
    }
    let borrowed: Vec<(&str, &str, &str)> = entries
        .iter()
        .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
        .collect();
    rels(&borrowed)
}

const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles></p:sldMaster>"#;

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Planner"><a:themeElements><a:clrScheme name="Planner"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="E5E7EB"/></a:lt2><a:accent1><a:srgbClr val="0F766E"/></a:accent1><a:accent2><a:srgbClr val="F59E0B"/></a:accent2><a:accent3><a:srgbClr val="EF4444"/></a:accent3><a:accent4><a:srgbClr val="8B5CF6"/></a:accent4><a:accent5><a:srgbClr val="10B981"/></a:accent5><a:accent6><a:srgbClr val="06B6D4"/></a:accent6><a:hlink><a:srgbClr val="2563EB"/></a:hlink><a:folHlink><a:srgbClr val="7C3AED"/></a:folHlink></a:clrScheme><a:fontScheme name="Planner"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Planner"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn slide_count(bytes: &[u8]) -> usize {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");
        archive
            .file_names()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .count()
    }

    #[test]
    fn error_slides_number_themselves() {
        let meta = DeckMeta::new(Some("Mumbai Indians"), chrono::Utc::now());
        let bytes = write_native_pptx(
            &[
                NativePage::Failed {
                    title: "Player Analysis: A & B".to_string(),
                },
                NativePage::Failed {
                    title: "Venue Analysis: X".to_string(),
                },
            ],
            &meta,
        )
        .expect("pptx");
        assert_eq!(slide_count(&bytes), 2);

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");
        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide1.xml")
            .expect("slide1")
            .read_to_string(&mut xml)
            .expect("read");
        assert!(xml.contains("Error loading slide: Player Analysis: A &amp; B"));
        assert!(xml.contains("1 / 2"));

        let mut core = String::new();
        archive
            .by_name("docProps/core.xml")
            .expect("core")
            .read_to_string(&mut core)
            .expect("read");
        assert!(core.contains("IPL Opposition Analysis - Mumbai Indians"));
        assert!(core.contains(DECK_AUTHOR));
    }
}
