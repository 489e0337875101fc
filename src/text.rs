use std::fs;
use std::path::PathBuf;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::logging;

pub mod fallback;

/// Text is rasterized at this multiple of the target size and downsampled,
/// which gives consistent anti-aliasing regardless of platform hinting.
pub const SUPERSAMPLE: u32 = 4;

/// Floor below which text becomes illegible on tiny widgets.
pub const MIN_TEXT_PX: u32 = 16;

/// Shadow offset in target-scale pixels.
const SHADOW_OFFSET: i32 = 2;

/// How a rendered text bitmap is positioned relative to its blit point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    LeftTop,
    MiddleTop,
    MiddleMiddle,
}

/// Bold and regular faces resolved from the host system, if any.
///
/// With no scalable face available every draw falls back to the fixed 5x7
/// bitmap font; output is blockier and smaller than requested, which is an
/// accepted degradation rather than an error.
pub struct FontStore {
    bold: Option<FontVec>,
    regular: Option<FontVec>,
}

fn bold_candidates() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/liberation-sans-fonts/LiberationSans-Bold.ttf",
        "C:\\Windows\\Fonts\\segoeuib.ttf",
        "C:\\Windows\\Fonts\\arialbd.ttf",
        "C:\\Windows\\Fonts\\calibrib.ttf",
        "/Library/Fonts/Arial Bold.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

fn regular_candidates() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/liberation-sans-fonts/LiberationSans-Regular.ttf",
        "C:\\Windows\\Fonts\\segoeui.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
        "C:\\Windows\\Fonts\\calibri.ttf",
        "/Library/Fonts/Arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

fn load_first(candidates: &[PathBuf]) -> Option<FontVec> {
    for path in candidates {
        if let Ok(bytes) = fs::read(path) {
            if let Ok(font) = FontVec::try_from_vec(bytes) {
                return Some(font);
            }
        }
    }
    None
}

impl FontStore {
    /// Scans well-known system font locations for bold and regular faces.
    pub fn discover() -> Self {
        let bold = load_first(&bold_candidates());
        let regular = load_first(&regular_candidates());
        if bold.is_none() && regular.is_none() {
            logging::log_event(serde_json::json!({
                "event": "font:fallback",
                "message": "no scalable font found, using fixed bitmap font",
            }));
        }
        Self { bold, regular }
    }

    /// Builds a store from raw font file bytes.
    pub fn from_font_data(bold: Option<Vec<u8>>, regular: Option<Vec<u8>>) -> Self {
        Self {
            bold: bold.and_then(|bytes| FontVec::try_from_vec(bytes).ok()),
            regular: regular.and_then(|bytes| FontVec::try_from_vec(bytes).ok()),
        }
    }

    /// A store with no scalable faces at all; every draw uses the bitmap
    /// fallback. Mostly useful in tests.
    pub fn bitmap_only() -> Self {
        Self {
            bold: None,
            regular: None,
        }
    }

    pub fn has_scalable(&self) -> bool {
        self.bold.is_some() || self.regular.is_some()
    }

    fn face(&self, bold: bool) -> Option<&FontVec> {
        if bold {
            self.bold.as_ref().or(self.regular.as_ref())
        } else {
            self.regular.as_ref().or(self.bold.as_ref())
        }
    }
}

/// Font size for a text element as a percentage of the containing widget's
/// height, scaled by the user's font scale and floored for legibility.
pub fn font_px(widget_height: u32, percent_of_height: f32, font_scale: f32) -> u32 {
    let px = widget_height as f32 * percent_of_height / 100.0 * font_scale;
    (px.round() as u32).max(MIN_TEXT_PX)
}

fn layout_width(font: &FontVec, text: &str, px: f32) -> f32 {
    let scaled = font.as_scaled(PxScale::from(px));
    let mut width = 0.0;
    let mut previous = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

/// Measures the bitmap `render_text` would produce, without rendering it.
pub fn measure(fonts: &FontStore, text: &str, pixel_size: u32, bold: bool) -> (u32, u32) {
    if text.is_empty() {
        return (1, 1);
    }
    match fonts.face(bold) {
        Some(font) => {
            let ss = (pixel_size * SUPERSAMPLE) as f32;
            let scaled = font.as_scaled(PxScale::from(ss));
            let width = layout_width(font, text, ss) / SUPERSAMPLE as f32;
            let height = (scaled.ascent() - scaled.descent()) / SUPERSAMPLE as f32;
            (
                (width.ceil() as u32).max(1) + 2 * margin(),
                (height.ceil() as u32).max(1) + 2 * margin(),
            )
        }
        None => {
            let scale = fallback::cell_scale(pixel_size);
            let cell = (fallback::GLYPH_WIDTH + fallback::GLYPH_SPACING) * scale;
            let width = cell * text.chars().count() as u32;
            let height = fallback::GLYPH_HEIGHT * scale;
            (width.max(1) + 2 * margin(), height + 2 * margin())
        }
    }
}

/// Average glyph advance at the given size, used for cheap fit estimates.
pub fn average_char_width(fonts: &FontStore, pixel_size: u32, bold: bool) -> f32 {
    const SAMPLE: &str = "abcdefghijklmnopqrstuvwxyz";
    let (width, _) = measure(fonts, SAMPLE, pixel_size, bold);
    (width.saturating_sub(2 * margin())) as f32 / SAMPLE.len() as f32
}

fn margin() -> u32 {
    (SHADOW_OFFSET as u32) + 1
}

fn blend_coverage(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = (coverage.clamp(0.0, 1.0) * color.0[3] as f32) as u8;
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    if alpha > pixel.0[3] || pixel.0[3] == 0 {
        *pixel = Rgba([color.0[0], color.0[1], color.0[2], alpha.max(pixel.0[3])]);
    }
}

fn draw_run_scalable(
    canvas: &mut RgbaImage,
    font: &FontVec,
    text: &str,
    px: f32,
    origin: (f32, f32),
    color: Rgba<u8>,
) {
    let scaled = font.as_scaled(PxScale::from(px));
    let mut caret = origin.0;
    let baseline = origin.1 + scaled.ascent();
    let mut previous = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(PxScale::from(px), ab_glyph::point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        if let Some(outlined) = scaled.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                blend_coverage(
                    canvas,
                    bounds.min.x as i64 + gx as i64,
                    bounds.min.y as i64 + gy as i64,
                    color,
                    coverage,
                );
            });
        }
    }
}

fn draw_run_bitmap(
    canvas: &mut RgbaImage,
    text: &str,
    scale: u32,
    origin: (i64, i64),
    color: Rgba<u8>,
) {
    let cell = ((fallback::GLYPH_WIDTH + fallback::GLYPH_SPACING) * scale) as i64;
    for (index, ch) in text.chars().enumerate() {
        let columns = fallback::glyph(ch);
        let glyph_x = origin.0 + index as i64 * cell;
        for (col, bits) in columns.iter().enumerate() {
            for row in 0..fallback::GLYPH_HEIGHT {
                if bits & (1 << row) == 0 {
                    continue;
                }
                for sx in 0..scale as i64 {
                    for sy in 0..scale as i64 {
                        blend_coverage(
                            canvas,
                            glyph_x + col as i64 * scale as i64 + sx,
                            origin.1 + row as i64 * scale as i64 + sy,
                            color,
                            1.0,
                        );
                    }
                }
            }
        }
    }
}

/// Renders anti-aliased text into a tightly cropped RGBA bitmap.
///
/// The run is drawn at [`SUPERSAMPLE`] times the target size and Lanczos
/// downsampled. With a shadow color set, four diagonally offset copies are
/// drawn behind the main run to keep the text legible over busy photos.
pub fn render_text(
    fonts: &FontStore,
    text: &str,
    pixel_size: u32,
    color: Rgba<u8>,
    bold: bool,
    shadow: Option<Rgba<u8>>,
) -> RgbaImage {
    if text.is_empty() {
        return RgbaImage::new(1, 1);
    }

    match fonts.face(bold) {
        Some(font) => {
            let ss_px = (pixel_size * SUPERSAMPLE) as f32;
            let scaled = font.as_scaled(PxScale::from(ss_px));
            let ss_margin = (margin() * SUPERSAMPLE) as f32;
            let ss_width = layout_width(font, text, ss_px).ceil() + 2.0 * ss_margin;
            let ss_height = (scaled.ascent() - scaled.descent()).ceil() + 2.0 * ss_margin;
            let mut canvas = RgbaImage::new(ss_width.max(1.0) as u32, ss_height.max(1.0) as u32);

            if let Some(shadow_color) = shadow {
                let offset = (SHADOW_OFFSET * SUPERSAMPLE as i32) as f32;
                for (dx, dy) in [
                    (-offset, -offset),
                    (offset, -offset),
                    (-offset, offset),
                    (offset, offset),
                ] {
                    draw_run_scalable(
                        &mut canvas,
                        font,
                        text,
                        ss_px,
                        (ss_margin + dx, ss_margin + dy),
                        shadow_color,
                    );
                }
            }
            draw_run_scalable(&mut canvas, font, text, ss_px, (ss_margin, ss_margin), color);

            let target_w = (canvas.width() / SUPERSAMPLE).max(1);
            let target_h = (canvas.height() / SUPERSAMPLE).max(1);
            imageops::resize(&canvas, target_w, target_h, FilterType::Lanczos3)
        }
        None => {
            let scale = fallback::cell_scale(pixel_size);
            let (width, height) = measure(fonts, text, pixel_size, bold);
            let mut canvas = RgbaImage::new(width, height);
            let origin = (margin() as i64, margin() as i64);

            if let Some(shadow_color) = shadow {
                let offset = SHADOW_OFFSET as i64;
                for (dx, dy) in [(-offset, -offset), (offset, -offset), (-offset, offset), (offset, offset)] {
                    draw_run_bitmap(
                        &mut canvas,
                        text,
                        scale,
                        (origin.0 + dx, origin.1 + dy),
                        shadow_color,
                    );
                }
            }
            draw_run_bitmap(&mut canvas, text, scale, origin, color);
            canvas
        }
    }
}

/// Alpha-composites a rendered text bitmap onto `dest`, shifting the blit
/// point by the bitmap's dimensions according to the anchor.
pub fn blit(dest: &mut RgbaImage, bitmap: &RgbaImage, x: i64, y: i64, anchor: Anchor) {
    let (bx, by) = match anchor {
        Anchor::LeftTop => (x, y),
        Anchor::MiddleTop => (x - bitmap.width() as i64 / 2, y),
        Anchor::MiddleMiddle => (
            x - bitmap.width() as i64 / 2,
            y - bitmap.height() as i64 / 2,
        ),
    };
    imageops::overlay(dest, bitmap, bx, by);
}
