use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::config::{Palette, WallpaperSettings};
use crate::geometry::WidgetRect;
use crate::text::{self, Anchor, FontStore};

pub mod calendar;
pub mod clock;
pub mod notes;
pub mod todo;

/// Font sizes as a percentage of widget height, per text class.
pub const LARGE_DATE_PERCENT: f32 = 27.0;
pub const HEADER_PERCENT: f32 = 6.8;
pub const BODY_PERCENT: f32 = 5.2;
pub const SECONDARY_PERCENT: f32 = 4.6;

/// Colors a widget actually draws with: the theme palette in solid mode,
/// the background-derived set in glass mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetColors {
    pub text: Rgba<u8>,
    pub secondary: Rgba<u8>,
    /// Present only when text needs a shadow to separate from the panel.
    pub shadow: Option<Rgba<u8>>,
    pub accent: Rgba<u8>,
    pub today: Rgba<u8>,
    pub border: Rgba<u8>,
}

/// Per-widget render bundle, alive for one widget's render call.
pub struct RenderContext<'a> {
    pub rect: WidgetRect,
    pub dpi: f32,
    pub fonts: &'a FontStore,
    pub palette: &'a Palette,
    pub settings: &'a WallpaperSettings,
    pub colors: WidgetColors,
    /// Effective font scale for this widget (global or override).
    pub font_scale: f32,
}

impl RenderContext<'_> {
    /// Inner padding between the panel edge and widget content.
    pub fn padding(&self) -> u32 {
        (18.0 * self.dpi).round() as u32
    }

    pub fn font_px(&self, percent_of_height: f32) -> u32 {
        text::font_px(self.rect.height, percent_of_height, self.font_scale)
    }
}

/// Draws a widget's title and the divider line below it, returning the y
/// cursor where content starts.
pub fn draw_header(ctx: &RenderContext, panel: &mut RgbaImage, title: &str) -> i64 {
    let padding = ctx.padding() as i64;
    let header_px = ctx.font_px(HEADER_PERCENT);
    let mut y = padding;

    let bitmap = text::render_text(
        ctx.fonts,
        title,
        header_px,
        ctx.colors.text,
        true,
        ctx.colors.shadow,
    );
    text::blit(panel, &bitmap, padding, y, Anchor::LeftTop);
    y += (header_px as f32 * 1.6) as i64;

    draw_divider(ctx, panel, y);
    y + (header_px as f32 * 0.5) as i64
}

pub fn draw_divider(ctx: &RenderContext, panel: &mut RgbaImage, y: i64) {
    let padding = ctx.padding() as f32;
    draw_line_segment_mut(
        panel,
        (padding, y as f32),
        (panel.width() as f32 - padding, y as f32),
        ctx.colors.border,
    );
}
