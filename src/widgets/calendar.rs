use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use image::RgbaImage;
use imageproc::drawing::draw_filled_circle_mut;

use crate::config::WeekdayFormat;
use crate::models::Task;
use crate::text::{self, Anchor};
use crate::widgets::{
    draw_divider, RenderContext, BODY_PERCENT, HEADER_PERCENT, LARGE_DATE_PERCENT,
    SECONDARY_PERCENT,
};

const SINGLE_LETTER_WEEKDAYS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];
const SHORT_WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Maximum task dots drawn under one day cell.
const MAX_DOTS: usize = 2;

/// Sunday-first month grid. Each week holds day-of-month numbers with 0 for
/// cells outside the month; at most six rows.
pub fn month_weeks(year: i32, month: u32) -> Vec<[u32; 7]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let Some(next_month) = next_month else {
        return Vec::new();
    };
    let days_in_month = next_month.signed_duration_since(first).num_days() as u32;
    let offset = first.weekday().num_days_from_sunday();

    let mut weeks = Vec::new();
    let mut week = [0u32; 7];
    let mut column = offset as usize;
    for day in 1..=days_in_month {
        week[column] = day;
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [0; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    weeks.truncate(6);
    weeks
}

/// Buckets tasks by their `YYYY-MM-DD` date string.
pub fn tasks_by_date(tasks: &[Task]) -> HashMap<&str, Vec<&Task>> {
    let mut buckets: HashMap<&str, Vec<&Task>> = HashMap::new();
    for task in tasks {
        buckets.entry(task.date.as_str()).or_default().push(task);
    }
    buckets
}

/// Draws the calendar onto its panel: header (large-date or single-line),
/// divider, Sunday-first weekday row and the month grid with today circle,
/// weekend accents and per-task category dots.
pub fn render(ctx: &RenderContext, panel: &mut RgbaImage, tasks: &[Task], today: NaiveDate) {
    let style = ctx.settings.calendar_style.spec();
    let padding = ctx.padding() as i64;
    let width = panel.width() as i64;

    let month_name = MONTH_NAMES[(today.month0()) as usize];
    let mut y = padding;

    if style.show_large_date {
        let large_px = ctx.font_px(LARGE_DATE_PERCENT);
        let day_bitmap = text::render_text(
            ctx.fonts,
            &format!("{:02}", today.day()),
            large_px,
            ctx.colors.text,
            true,
            ctx.colors.shadow,
        );
        let day_width = day_bitmap.width() as i64;
        text::blit(panel, &day_bitmap, padding, y, Anchor::LeftTop);

        if style.show_month_name {
            let label_px = ctx.font_px(HEADER_PERCENT);
            let month_bitmap = text::render_text(
                ctx.fonts,
                month_name,
                label_px,
                ctx.colors.secondary,
                false,
                ctx.colors.shadow,
            );
            let year_bitmap = text::render_text(
                ctx.fonts,
                &today.year().to_string(),
                ctx.font_px(SECONDARY_PERCENT),
                ctx.colors.secondary,
                false,
                ctx.colors.shadow,
            );
            let label_x = padding + day_width + padding / 2;
            text::blit(panel, &month_bitmap, label_x, y + label_px as i64 / 2, Anchor::LeftTop);
            text::blit(
                panel,
                &year_bitmap,
                label_x,
                y + label_px as i64 / 2 + (label_px as f32 * 1.4) as i64,
                Anchor::LeftTop,
            );
        }
        y += day_bitmap.height() as i64 + padding / 3;
    } else {
        let header_px = ctx.font_px(HEADER_PERCENT);
        let header = format!("{} {:02}, {}", &month_name[..3], today.day(), today.year());
        let bitmap = text::render_text(
            ctx.fonts,
            &header,
            header_px,
            ctx.colors.text,
            true,
            ctx.colors.shadow,
        );
        text::blit(panel, &bitmap, width / 2, y, Anchor::MiddleTop);
        y += (header_px as f32 * 2.0) as i64;
    }

    draw_divider(ctx, panel, y);
    y += padding / 2;

    // Weekday row, Sunday first.
    let labels = match style.weekday_format {
        WeekdayFormat::Single => SINGLE_LETTER_WEEKDAYS,
        WeekdayFormat::Short => SHORT_WEEKDAYS,
    };
    let grid_left = padding;
    let cell_width = (width - 2 * padding) / 7;
    let weekday_px = ctx.font_px(SECONDARY_PERCENT);

    for (column, label) in labels.iter().enumerate() {
        let color = if column == 0 || column == 6 {
            ctx.colors.accent
        } else {
            ctx.colors.secondary
        };
        let bitmap = text::render_text(ctx.fonts, label, weekday_px, color, true, ctx.colors.shadow);
        let x = grid_left + column as i64 * cell_width + cell_width / 2;
        text::blit(panel, &bitmap, x, y, Anchor::MiddleTop);
    }
    y += (weekday_px as f32 * 1.8) as i64;

    // Month grid.
    let weeks = month_weeks(today.year(), today.month());
    let buckets = tasks_by_date(tasks);
    let day_px = ctx.font_px(BODY_PERCENT);
    let remaining = panel.height() as i64 - y - padding;
    let rows = weeks.len().max(1) as i64;
    let cell_height = (remaining / rows).max(day_px as i64 + 4);
    let circle_radius = ((day_px as f32 * 0.95) as i32).max(6);

    for (row, week) in weeks.iter().enumerate() {
        let row_y = y + row as i64 * cell_height;
        for (column, &day) in week.iter().enumerate() {
            if day == 0 {
                continue;
            }
            let x = grid_left + column as i64 * cell_width + cell_width / 2;
            let date_key = format!("{:04}-{:02}-{:02}", today.year(), today.month(), day);
            let day_tasks = buckets.get(date_key.as_str());

            let is_today = day == today.day();
            let color = if is_today {
                draw_filled_circle_mut(
                    panel,
                    (x as i32, (row_y + cell_height / 2) as i32 - 1),
                    circle_radius,
                    ctx.colors.today,
                );
                today_circle_text_color(ctx)
            } else if column == 0 || column == 6 {
                ctx.colors.accent
            } else {
                ctx.colors.text
            };

            let bitmap = text::render_text(
                ctx.fonts,
                &day.to_string(),
                day_px,
                color,
                false,
                if is_today { None } else { ctx.colors.shadow },
            );
            text::blit(
                panel,
                &bitmap,
                x,
                row_y + cell_height / 2,
                Anchor::MiddleMiddle,
            );

            if let Some(day_tasks) = day_tasks {
                if !is_today {
                    let dot_y = (row_y + cell_height / 2 + day_px as i64 / 2 + 4) as i32;
                    let count = day_tasks.len().min(MAX_DOTS);
                    for (index, task) in day_tasks.iter().take(count).enumerate() {
                        let [r, g, b] = task.category.color();
                        let dot_x = x as i32 - 4 + index as i32 * 8;
                        draw_filled_circle_mut(
                            panel,
                            (dot_x, dot_y),
                            2,
                            image::Rgba([r, g, b, 255]),
                        );
                    }
                }
            }
        }
    }
}

/// Text inside the today circle: white unless the circle color itself is
/// bright.
fn today_circle_text_color(ctx: &RenderContext) -> image::Rgba<u8> {
    let [r, g, b, _] = ctx.colors.today.0;
    if r as u32 + g as u32 + b as u32 >= 450 {
        image::Rgba([0, 0, 0, 255])
    } else {
        image::Rgba([255, 255, 255, 255])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskCategory;

    fn task(id: &str, date: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            date: date.to_string(),
            category: TaskCategory::Default,
            created_at: String::new(),
        }
    }

    #[test]
    fn february_2024_grid_is_sunday_first() {
        let weeks = month_weeks(2024, 2);
        // Feb 1 2024 is a Thursday, column 4 in a Sunday-first layout.
        assert_eq!(weeks[0], [0, 0, 0, 0, 1, 2, 3]);
        assert_eq!(weeks.last().expect("weeks")[4], 29);
    }

    #[test]
    fn task_marker_lands_in_expected_grid_cell() {
        let weeks = month_weeks(2024, 2);
        let first = NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date");
        let offset = first.weekday().num_days_from_sunday();
        let day = 15u32;
        let row = ((day + offset - 1) / 7) as usize;
        let column = ((day + offset - 1) % 7) as usize;
        assert_eq!(weeks[row][column], day);

        let tasks = [task("t1", "2024-02-15")];
        let buckets = tasks_by_date(&tasks);
        assert_eq!(buckets.get("2024-02-15").map(Vec::len), Some(1));
    }

    #[test]
    fn month_with_six_weeks_is_not_truncated_short() {
        // June 2024 starts on a Saturday and spans six Sunday-first rows.
        let weeks = month_weeks(2024, 6);
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0][6], 1);
        assert_eq!(weeks[5][0], 30);
    }

    #[test]
    fn bucketing_groups_multiple_tasks_per_day() {
        let tasks = [
            task("a", "2024-02-15"),
            task("b", "2024-02-15"),
            task("c", "2024-02-16"),
        ];
        let buckets = tasks_by_date(&tasks);
        assert_eq!(buckets.get("2024-02-15").map(Vec::len), Some(2));
        assert_eq!(buckets.get("2024-02-16").map(Vec::len), Some(1));
        assert!(buckets.get("2024-02-17").is_none());
    }
}
