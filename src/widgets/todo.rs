use chrono::NaiveDate;
use image::RgbaImage;
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::models::Task;
use crate::text::{self, Anchor};
use crate::widgets::{draw_header, RenderContext, BODY_PERCENT};

/// Inclusive day-delta window for the list: yesterday through a week out.
pub const WINDOW_START: i64 = -1;
pub const WINDOW_END: i64 = 7;

/// Tasks inside the display window, sorted by day delta then title.
/// Malformed dates are skipped.
pub fn upcoming<'a>(tasks: &'a [Task], today: NaiveDate) -> Vec<(i64, &'a Task)> {
    let mut upcoming: Vec<(i64, &Task)> = tasks
        .iter()
        .filter_map(|task| {
            let date = task.parsed_date()?;
            let delta = date.signed_duration_since(today).num_days();
            (WINDOW_START..=WINDOW_END)
                .contains(&delta)
                .then_some((delta, task))
        })
        .collect();
    upcoming.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.title.cmp(&b.1.title)));
    upcoming
}

/// Shortens a title to roughly fit `max_width` pixels, estimated from the
/// average glyph advance at the row's text size.
pub fn truncate_title(
    title: &str,
    max_width: f32,
    average_char_width: f32,
) -> String {
    if average_char_width <= 0.0 {
        return title.to_string();
    }
    let max_chars = (max_width / average_char_width).floor() as usize;
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let keep = max_chars.saturating_sub(2);
    let mut shortened: String = title.chars().take(keep).collect();
    shortened.push_str("..");
    shortened
}

/// Draws the to-do list: header, divider, then one row per upcoming task
/// with its category dot, checkbox and title.
pub fn render(ctx: &RenderContext, panel: &mut RgbaImage, tasks: &[Task], today: NaiveDate) {
    let mut y = draw_header(ctx, panel, "To Do");

    let padding = ctx.padding() as i64;
    let body_px = ctx.font_px(BODY_PERCENT);
    let line_height = (body_px as f32 * 1.6) as i64;
    let bottom = panel.height() as i64 - padding;

    let upcoming = upcoming(tasks, today);
    if upcoming.is_empty() {
        let bitmap = text::render_text(
            ctx.fonts,
            "No tasks",
            body_px,
            ctx.colors.secondary,
            false,
            ctx.colors.shadow,
        );
        text::blit(panel, &bitmap, padding, y, Anchor::LeftTop);
        return;
    }

    let dot_radius = (body_px as i32 / 5).max(3);
    let checkbox_side = (body_px as f32 * 0.55) as u32;
    let avg_char = text::average_char_width(ctx.fonts, body_px, false);
    let text_x = padding + 2 * dot_radius as i64 + checkbox_side as i64 + padding;
    let max_text_width = (panel.width() as i64 - text_x - padding).max(0) as f32;

    for (_, task) in upcoming {
        if y + line_height > bottom {
            break;
        }

        let [r, g, b] = task.category.color();
        draw_filled_circle_mut(
            panel,
            ((padding + dot_radius as i64) as i32, (y + line_height / 2) as i32),
            dot_radius,
            image::Rgba([r, g, b, 255]),
        );

        let checkbox_x = padding + 2 * dot_radius as i64 + padding / 2;
        let checkbox_y = y + (line_height - checkbox_side as i64) / 2;
        draw_hollow_rect_mut(
            panel,
            Rect::at(checkbox_x as i32, checkbox_y as i32).of_size(checkbox_side, checkbox_side),
            ctx.colors.secondary,
        );

        let title = truncate_title(&task.title, max_text_width, avg_char);
        let bitmap = text::render_text(
            ctx.fonts,
            &title,
            body_px,
            ctx.colors.text,
            false,
            ctx.colors.shadow,
        );
        text::blit(
            panel,
            &bitmap,
            text_x,
            y + (line_height - bitmap.height() as i64) / 2,
            Anchor::LeftTop,
        );

        y += line_height;
    }
}
