//! Headless capture: renders a ready slide into an off-screen buffer and
//! rasterizes the cells into an RGB image.

use std::io::Cursor;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::render::{BACKGROUND, TEXT, ViewOptions, render_slide};
use crate::state::ReadySlide;

pub const CAPTURE_COLS: u16 = 160;
pub const CAPTURE_ROWS: u16 = 45;
pub const CELL_WIDTH: u32 = 12;
pub const CELL_HEIGHT: u32 = 24;

/// A rasterized slide. The default surface is 1920x1080.
#[derive(Debug, Clone)]
pub struct Capture {
    pub image: RgbImage,
}

impl Capture {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .context("encode png")?;
        Ok(bytes)
    }
}

pub trait Capturer {
    fn capture(&self, ready: &ReadySlide, opts: &ViewOptions) -> Result<Capture>;
}

#[derive(Debug, Clone, Copy)]
pub struct BufferCapturer {
    pub cols: u16,
    pub rows: u16,
}

impl Default for BufferCapturer {
    fn default() -> Self {
        Self {
            cols: CAPTURE_COLS,
            rows: CAPTURE_ROWS,
        }
    }
}

impl BufferCapturer {
    fn surface(&self) -> Buffer {
        Buffer::empty(Rect::new(0, 0, self.cols, self.rows))
    }
}

impl Capturer for BufferCapturer {
    fn capture(&self, ready: &ReadySlide, opts: &ViewOptions) -> Result<Capture> {
        if self.cols == 0 || self.rows == 0 {
            anyhow::bail!("capture surface has no area");
        }
        let mut buf = self.surface();
        let area = buf.area;
        render_slide(ready, opts, area, &mut buf);
        Ok(Capture {
            image: rasterize(&buf),
        })
    }
}

pub fn rasterize(buf: &Buffer) -> RgbImage {
    let area = buf.area;
    let width = area.width as u32 * CELL_WIDTH;
    let height = area.height as u32 * CELL_HEIGHT;
    let mut img = RgbImage::from_pixel(width, height, rgb(BACKGROUND, BACKGROUND));
    if area.width == 0 {
        return img;
    }
    for (i, cell) in buf.content().iter().enumerate() {
        let cx = (i as u32 % area.width as u32) * CELL_WIDTH;
        let cy = (i as u32 / area.width as u32) * CELL_HEIGHT;
        paint_cell(&mut img, cx, cy, cell);
    }
    img
}

fn rgb(color: Color, fallback: Color) -> Rgb<u8> {
    let [r, g, b] = match color {
        Color::Reset => return rgb(fallback, BACKGROUND),
        Color::Rgb(r, g, b) => [r, g, b],
        Color::Black => [0, 0, 0],
        Color::Red => [205, 49, 49],
        Color::Green => [13, 188, 121],
        Color::Yellow => [229, 229, 16],
        Color::Blue => [36, 114, 200],
        Color::Magenta => [188, 63, 188],
        Color::Cyan => [17, 168, 205],
        Color::Gray => [204, 204, 204],
        Color::DarkGray => [118, 118, 118],
        Color::LightRed => [241, 76, 76],
        Color::LightGreen => [35, 209, 139],
        Color::LightYellow => [245, 245, 67],
        Color::LightBlue => [59, 142, 234],
        Color::LightMagenta => [214, 112, 214],
        Color::LightCyan => [41, 184, 219],
        Color::White => [255, 255, 255],
        Color::Indexed(i) => [i, i, i],
    };
    Rgb([r, g, b])
}

fn fill(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for py in y..(y + h).min(img.height()) {
        for px in x..(x + w).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}

fn blend(a: Rgb<u8>, b: Rgb<u8>, t: f32) -> Rgb<u8> {
    let mix = |x: u8, y: u8| (x as f32 * (1.0 - t) + y as f32 * t).round() as u8;
    Rgb([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])])
}

/// Braille dot bit to (column, row) in the 2x4 dot grid.
const BRAILLE_DOTS: [(u32, u32); 8] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 1),
    (1, 2),
    (0, 3),
    (1, 3),
];

fn paint_cell(img: &mut RgbImage, x: u32, y: u32, cell: &Cell) {
    let bg = rgb(cell.bg, BACKGROUND);
    fill(img, x, y, CELL_WIDTH, CELL_HEIGHT, bg);
    let fg = rgb(cell.fg, TEXT);
    let Some(ch) = cell.symbol().chars().next() else {
        return;
    };
    let (mid_x, mid_y) = (x + CELL_WIDTH / 2, y + CELL_HEIGHT / 2);
    match ch {
        ' ' => {}
        '\u{2800}'..='\u{28FF}' => {
            let bits = ch as u32 - 0x2800;
            let (dot_w, dot_h) = (CELL_WIDTH / 2, CELL_HEIGHT / 4);
            for (bit, (col, row)) in BRAILLE_DOTS.iter().enumerate() {
                if bits & (1 << bit) != 0 {
                    fill(img, x + col * dot_w + 1, y + row * dot_h + 1, dot_w - 2, dot_h - 2, fg);
                }
            }
        }
        '█' => fill(img, x, y, CELL_WIDTH, CELL_HEIGHT, fg),
        '▀' => fill(img, x, y, CELL_WIDTH, CELL_HEIGHT / 2, fg),
        '▄' => fill(img, x, mid_y, CELL_WIDTH, CELL_HEIGHT / 2, fg),
        '─' | '━' => fill(img, x, mid_y - 1, CELL_WIDTH, 2, fg),
        '│' | '┃' => fill(img, mid_x - 1, y, 2, CELL_HEIGHT, fg),
        '┌' | '╭' => {
            fill(img, mid_x - 1, mid_y - 1, CELL_WIDTH / 2 + 1, 2, fg);
            fill(img, mid_x - 1, mid_y - 1, 2, CELL_HEIGHT / 2 + 1, fg);
        }
        '┐' | '╮' => {
            fill(img, x, mid_y - 1, CELL_WIDTH / 2 + 1, 2, fg);
            fill(img, mid_x - 1, mid_y - 1, 2, CELL_HEIGHT / 2 + 1, fg);
        }
        '└' | '╰' => {
            fill(img, mid_x - 1, mid_y - 1, CELL_WIDTH / 2 + 1, 2, fg);
            fill(img, mid_x - 1, y, 2, CELL_HEIGHT / 2 + 1, fg);
        }
        '┘' | '╯' => {
            fill(img, x, mid_y - 1, CELL_WIDTH / 2 + 1, 2, fg);
            fill(img, mid_x - 1, y, 2, CELL_HEIGHT / 2 + 1, fg);
        }
        '•' | '■' | '●' => fill(img, x + 3, mid_y - 3, CELL_WIDTH - 6, 6, fg),
        // Any other glyph is drawn as a text-height bar in its colour.
        _ => fill(img, x + 2, y + 7, CELL_WIDTH - 4, CELL_HEIGHT - 12, blend(bg, fg, 0.75)),
    }
}
