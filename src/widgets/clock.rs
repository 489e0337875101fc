use chrono::{NaiveDateTime, Timelike};
use image::RgbaImage;

use crate::text::{self, Anchor};
use crate::widgets::RenderContext;

/// Time text height as a fraction of the clock bar's height.
const TIME_PERCENT: f32 = 45.0;

pub fn format_time(now: NaiveDateTime) -> String {
    format!("{:02}:{:02}", now.hour(), now.minute())
}

/// Draws the current local time centered in the clock bar.
pub fn render(ctx: &RenderContext, panel: &mut RgbaImage, now: NaiveDateTime) {
    let time_px = ctx.font_px(TIME_PERCENT);
    let bitmap = text::render_text(
        ctx.fonts,
        &format_time(now),
        time_px,
        ctx.colors.text,
        true,
        ctx.colors.shadow,
    );
    text::blit(
        panel,
        &bitmap,
        panel.width() as i64 / 2,
        panel.height() as i64 / 2,
        Anchor::MiddleMiddle,
    );
}
