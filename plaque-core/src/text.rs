//! Font resolution, text measurement and glyph compositing.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use image::RgbaImage;
use rusttype::{Font, PositionedGlyph, Scale, point};

use crate::config::LayoutConfig;

/// Ordered font sources: the configured primary path, then each fallback
/// path, then the face embedded in the binary. The first usable source wins,
/// so resolution never fails and never surfaces an error.
pub struct FontResolver {
    candidates: Vec<PathBuf>,
}

impl FontResolver {
    pub fn from_config(config: &LayoutConfig) -> Self {
        let mut candidates = Vec::with_capacity(1 + config.fallback_font_paths.len());
        candidates.push(config.primary_font_path.clone());
        candidates.extend(config.fallback_font_paths.iter().cloned());
        Self { candidates }
    }

    /// First candidate that reads and parses as a font face; the embedded
    /// face when none does.
    pub fn resolve(&self) -> Arc<Font<'static>> {
        for path in &self.candidates {
            match fs::read(path) {
                Ok(bytes) => match Font::try_from_vec(bytes) {
                    Some(face) => {
                        log::debug!("using font {}", path.display());
                        return Arc::new(face);
                    }
                    None => log::debug!("font {} is not a usable face", path.display()),
                },
                Err(e) => log::debug!("font {} unavailable: {e}", path.display()),
            }
        }
        log::debug!("no configured font is usable, falling back to the embedded face");
        let face = Font::try_from_bytes(fonts::FONT_BYTES)
            .expect("embedded fallback font is not a valid TrueType face");
        Arc::new(face)
    }
}

/// A resolved face at a chosen integer point size.
#[derive(Clone)]
pub struct SizedFont {
    face: Arc<Font<'static>>,
    size: u32,
}

impl SizedFont {
    pub fn new(face: Arc<Font<'static>>, size_pt: f64) -> Self {
        Self {
            face,
            size: size_pt.round().max(1.0) as u32,
        }
    }

    /// The point size this handle was loaded at.
    pub fn size(&self) -> u32 {
        self.size
    }

    fn scale(&self) -> Scale {
        Scale::uniform(self.size as f32)
    }
}

/// Ink bounding box of `text`, in pixels: the width and height the string
/// occupies when drawn left-to-top anchored. Empty input and runs with no
/// inked glyph (whitespace) measure (0, 0).
pub fn measure_text(text: &str, font: &SizedFont) -> (u32, u32) {
    match ink_bounds(&layout_run(text, font)) {
        Some((min_x, min_y, max_x, max_y)) => ((max_x - min_x) as u32, (max_y - min_y) as u32),
        None => (0, 0),
    }
}

/// Composite `text` so the top-left corner of its ink box lands on `(x, y)`.
/// Pixels falling outside the canvas are discarded.
pub(crate) fn draw_text_at(
    canvas: &mut RgbaImage,
    x: i32,
    y: i32,
    text: &str,
    font: &SizedFont,
    color: [u8; 3],
) {
    let glyphs = layout_run(text, font);
    let Some((min_x, min_y, _, _)) = ink_bounds(&glyphs) else {
        return;
    };
    let (dx, dy) = (x - min_x, y - min_y);
    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x + dx;
                let py = gy as i32 + bb.min.y + dy;
                blend_px(canvas, px, py, color, coverage);
            });
        }
    }
}

fn layout_run(text: &str, font: &SizedFont) -> Vec<PositionedGlyph<'static>> {
    if text.is_empty() {
        return Vec::new();
    }
    let scale = font.scale();
    let ascent = font.face.v_metrics(scale).ascent;
    font.face.layout(text, scale, point(0.0, ascent)).collect()
}

fn ink_bounds(glyphs: &[PositionedGlyph<'static>]) -> Option<(i32, i32, i32, i32)> {
    let mut bounds: Option<(i32, i32, i32, i32)> = None;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            let b = bounds.get_or_insert((bb.min.x, bb.min.y, bb.max.x, bb.max.y));
            b.0 = b.0.min(bb.min.x);
            b.1 = b.1.min(bb.min.y);
            b.2 = b.2.max(bb.max.x);
            b.3 = b.3.max(bb.max.y);
        }
    }
    bounds
}

fn blend_px(canvas: &mut RgbaImage, x: i32, y: i32, color: [u8; 3], coverage: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= canvas.width() || y >= canvas.height() {
        return;
    }
    let a = (coverage * 255.0) as u8;
    if a == 0 {
        return;
    }
    let sa = a as f32 / 255.0;
    let inv = 1.0 - sa;
    let dst = canvas.get_pixel_mut(x, y);
    dst.0[0] = (color[0] as f32 * sa + dst.0[0] as f32 * inv) as u8;
    dst.0[1] = (color[1] as f32 * sa + dst.0[1] as f32 * inv) as u8;
    dst.0[2] = (color[2] as f32 * sa + dst.0[2] as f32 * inv) as u8;
    dst.0[3] = dst.0[3].max(a);
}
