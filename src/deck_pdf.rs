use std::io::Write;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::capture::Capture;
use crate::deck_export::DeckPage;

/// A4 portrait in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 28.0;
const NOTES_CHARS_PER_LINE: usize = 95;

pub fn write_pdf(pages: &[DeckPage]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let page_id = add_page(&mut doc, pages_id, font_id, bold_id, page)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).context("serialize pdf")?;
    Ok(out)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    bold_id: ObjectId,
    page: &DeckPage,
) -> Result<ObjectId> {
    let mut ops = Vec::new();
    let mut xobjects = Dictionary::new();

    match page {
        DeckPage::Captured {
            title,
            capture,
            notes,
        } => {
            let top = PAGE_HEIGHT - MARGIN;
            text(&mut ops, "F2", 14.0, MARGIN, top - 14.0, [0.1, 0.1, 0.1], title);

            let image_id = doc.add_object(image_stream(capture)?);
            xobjects.set("Im1", image_id);
            let width = PAGE_WIDTH - 2.0 * MARGIN;
            let height = width * capture.height() as f32 / capture.width().max(1) as f32;
            let y = top - 28.0 - height;
            ops.push(Operation::new("q", vec![]));
            ops.push(Operation::new(
                "cm",
                vec![
                    width.into(),
                    0i64.into(),
                    0i64.into(),
                    height.into(),
                    MARGIN.into(),
                    y.into(),
                ],
            ));
            ops.push(Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]));
            ops.push(Operation::new("Q", vec![]));

            if let Some(notes) = notes.as_deref().filter(|n| !n.trim().is_empty()) {
                let mut line_y = y - 26.0;
                text(&mut ops, "F2", 11.0, MARGIN, line_y, [0.1, 0.1, 0.1], "Analyst Comments");
                for line in wrap_text(notes, NOTES_CHARS_PER_LINE) {
                    line_y -= 14.0;
                    if line_y < MARGIN {
                        break;
                    }
                    text(&mut ops, "F1", 10.0, MARGIN, line_y, [0.2, 0.2, 0.2], &line);
                }
            }
        }
        DeckPage::Failed { title } => {
            let y = PAGE_HEIGHT / 2.0;
            text(
                &mut ops,
                "F2",
                16.0,
                MARGIN,
                y,
                [0.86, 0.15, 0.15],
                &format!("Error loading slide: {title}"),
            );
            text(
                &mut ops,
                "F1",
                11.0,
                MARGIN,
                y - 24.0,
                [0.4, 0.4, 0.4],
                "Please try again or contact support if the issue persists.",
            );
        }
    }

    let content = Content { operations: ops };
    let content_id = doc.add_object(Stream::new(
        Dictionary::new(),
        content.encode().context("encode pdf page content")?,
    ));
    let media_box: Vec<Object> = vec![
        0i64.into(),
        0i64.into(),
        PAGE_WIDTH.into(),
        PAGE_HEIGHT.into(),
    ];
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => media_box,
        "Resources" => dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
                "F2" => bold_id,
            },
            "XObject" => xobjects,
        },
    });
    Ok(page_id)
}

fn image_stream(capture: &Capture) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(capture.image.as_raw())
        .context("compress slide image")?;
    let compressed = encoder.finish().context("finish slide image")?;
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => capture.width() as i64,
        "Height" => capture.height() as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8i64,
        "Filter" => "FlateDecode",
    };
    Ok(Stream::new(dict, compressed))
}

fn text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, rgb: [f32; 3], body: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "rg",
        vec![rgb[0].into(), rgb[1].into(), rgb[2].into()],
    ));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), size.into()],
    ));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::string_literal(latin_only(body))],
    ));
    ops.push(Operation::new("ET", vec![]));
}

/// The standard Type1 fonts only cover Latin text.
fn latin_only(body: &str) -> String {
    body.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

pub fn wrap_text(body: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in body.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}
