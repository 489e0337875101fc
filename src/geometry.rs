use crate::config::WallpaperSettings;

/// Resolution the DPI scale is measured against.
pub const REFERENCE_WIDTH: f32 = 1920.0;

/// No widget may touch the canvas border.
pub const EDGE_PADDING: u32 = 24;

/// User-facing size slider range for square-ish widgets.
pub const SIZE_SLIDER_MIN: u32 = 15;
pub const SIZE_SLIDER_MAX: u32 = 45;

/// Per-widget pixel clamps at DPI scale 1.0.
const CALENDAR_MIN_W: f32 = 250.0;
const CALENDAR_MAX_W: f32 = 560.0;
const TODO_MIN: (f32, f32) = (180.0, 200.0);
const TODO_MAX: (f32, f32) = (400.0, 500.0);
const NOTES_MIN: (f32, f32) = (180.0, 150.0);
const NOTES_MAX: (f32, f32) = (400.0, 400.0);
const CLOCK_MIN_W: f32 = 200.0;
const CLOCK_MAX_W: f32 = 420.0;

const CALENDAR_ASPECT: f32 = 1.1;
const CLOCK_ASPECT: f32 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Calendar,
    Todo,
    Notes,
    Clock,
}

/// Widget placement in base-image pixel coordinates. Derived fresh every
/// render, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl WidgetRect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Scale factor keeping widget proportions consistent across resolutions.
pub fn dpi_scale(base_w: u32) -> f32 {
    (base_w as f32 / REFERENCE_WIDTH).clamp(0.8, 2.0)
}

/// Wider images get a smaller relative widget width.
fn width_factor(base_w: u32, base_h: u32) -> f32 {
    let aspect = base_w as f32 / base_h.max(1) as f32;
    if aspect > 2.0 {
        0.10
    } else if aspect > 1.7 {
        0.12
    } else if aspect > 1.5 {
        0.15
    } else {
        0.18
    }
}

/// Maps the 15-45 size slider linearly onto a 0.7-1.3 multiplier.
fn size_multiplier(user_size_percent: u32) -> f32 {
    let clamped = user_size_percent.clamp(SIZE_SLIDER_MIN, SIZE_SLIDER_MAX) as f32;
    0.7 + (clamped - SIZE_SLIDER_MIN as f32) / (SIZE_SLIDER_MAX - SIZE_SLIDER_MIN) as f32 * 0.6
}

fn clamp_to_canvas(side: f32, base_side: u32) -> u32 {
    let max_side = base_side.saturating_sub(2 * EDGE_PADDING).max(1);
    (side.round() as u32).clamp(1, max_side)
}

/// Computes a widget's pixel dimensions from the base image resolution and
/// the widget's size settings.
pub fn widget_size(
    base_w: u32,
    base_h: u32,
    kind: WidgetKind,
    settings: &WallpaperSettings,
) -> (u32, u32) {
    let dpi = dpi_scale(base_w);
    let factor = width_factor(base_w, base_h);

    let (width, height) = match kind {
        WidgetKind::Calendar => {
            let multiplier = size_multiplier(settings.calendar_size_percent);
            let w = (base_w as f32 * factor * multiplier)
                .clamp(CALENDAR_MIN_W * dpi, CALENDAR_MAX_W * dpi);
            (w, w * CALENDAR_ASPECT)
        }
        WidgetKind::Todo => {
            let w = (base_w as f32 * settings.todo_width_percent as f32 / 100.0)
                .clamp(TODO_MIN.0 * dpi, TODO_MAX.0 * dpi);
            let h = (base_h as f32 * settings.todo_height_percent as f32 / 100.0)
                .clamp(TODO_MIN.1 * dpi, TODO_MAX.1 * dpi);
            (w, h)
        }
        WidgetKind::Notes => {
            let w = (base_w as f32 * settings.notes_width_percent as f32 / 100.0)
                .clamp(NOTES_MIN.0 * dpi, NOTES_MAX.0 * dpi);
            let h = (base_h as f32 * settings.notes_height_percent as f32 / 100.0)
                .clamp(NOTES_MIN.1 * dpi, NOTES_MAX.1 * dpi);
            (w, h)
        }
        WidgetKind::Clock => {
            let multiplier = size_multiplier(settings.clock_size_percent);
            let w = (base_w as f32 * factor * multiplier)
                .clamp(CLOCK_MIN_W * dpi, CLOCK_MAX_W * dpi);
            (w, w * CLOCK_ASPECT)
        }
    };

    (
        clamp_to_canvas(width, base_w),
        clamp_to_canvas(height, base_h),
    )
}

/// Positions a widget inside the canvas. The percentages address the
/// *remaining* space after subtracting the widget's own size, so 100 puts
/// the widget flush against the far edge rather than off-canvas.
pub fn widget_position(
    base: (u32, u32),
    widget: (u32, u32),
    x_percent: u32,
    y_percent: u32,
) -> (u32, u32) {
    let place = |base_side: u32, widget_side: u32, percent: u32| -> u32 {
        let available = base_side.saturating_sub(widget_side);
        let raw = (available as f32 * percent.min(100) as f32 / 100.0) as u32;
        let upper = base_side
            .saturating_sub(widget_side)
            .saturating_sub(EDGE_PADDING)
            .max(EDGE_PADDING);
        raw.clamp(EDGE_PADDING, upper)
    };

    (
        place(base.0, widget.0, x_percent),
        place(base.1, widget.1, y_percent),
    )
}

/// Combined size + position for one widget.
pub fn widget_rect(
    base_w: u32,
    base_h: u32,
    kind: WidgetKind,
    settings: &WallpaperSettings,
) -> WidgetRect {
    let (width, height) = widget_size(base_w, base_h, kind, settings);
    let (x_percent, y_percent) = match kind {
        WidgetKind::Calendar => (settings.calendar_x_percent, settings.calendar_y_percent),
        WidgetKind::Todo => (settings.todo_x_percent, settings.todo_y_percent),
        WidgetKind::Notes => (settings.notes_x_percent, settings.notes_y_percent),
        WidgetKind::Clock => (settings.clock_x_percent, settings.clock_y_percent),
    };
    let (x, y) = widget_position((base_w, base_h), (width, height), x_percent, y_percent);
    WidgetRect {
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpi_scale_is_clamped_at_both_ends() {
        assert!((dpi_scale(1920) - 1.0).abs() < 1e-6);
        assert!((dpi_scale(640) - 0.8).abs() < 1e-6);
        assert!((dpi_scale(7680) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn wider_images_get_smaller_width_factors() {
        assert!(width_factor(5120, 1440) < width_factor(1920, 1080));
        assert!(width_factor(1920, 1080) < width_factor(1600, 1200));
    }

    #[test]
    fn size_slider_maps_linearly_to_multiplier() {
        assert!((size_multiplier(15) - 0.7).abs() < 1e-6);
        assert!((size_multiplier(45) - 1.3).abs() < 1e-6);
        assert!((size_multiplier(30) - 1.0).abs() < 1e-6);
        // Out-of-range input behaves like the nearest slider stop.
        assert!((size_multiplier(0) - 0.7).abs() < 1e-6);
        assert!((size_multiplier(200) - 1.3).abs() < 1e-6);
    }

    #[test]
    fn calendar_size_stays_within_pixel_clamps() {
        let settings = WallpaperSettings::default();
        for slider in [15, 28, 45] {
            let settings = WallpaperSettings {
                calendar_size_percent: slider,
                ..settings.clone()
            };
            let dpi = dpi_scale(1920);
            let (w, h) = widget_size(1920, 1080, WidgetKind::Calendar, &settings);
            assert!(w as f32 >= CALENDAR_MIN_W * dpi - 1.0);
            assert!(w as f32 <= CALENDAR_MAX_W * dpi + 1.0);
            assert!(h >= w, "calendar should be taller than wide");
        }
    }

    #[test]
    fn position_at_100_percent_is_flush_with_far_padding() {
        let (x, y) = widget_position((1920, 1080), (400, 440), 100, 100);
        assert_eq!(x, 1920 - 400 - EDGE_PADDING);
        assert_eq!(y, 1080 - 440 - EDGE_PADDING);
    }

    #[test]
    fn position_at_0_percent_clamps_to_edge_padding() {
        let (x, y) = widget_position((1920, 1080), (400, 440), 0, 0);
        assert_eq!((x, y), (EDGE_PADDING, EDGE_PADDING));
    }

    #[test]
    fn rect_is_contained_for_all_percent_corners() {
        let settings = WallpaperSettings::default();
        for kind in [
            WidgetKind::Calendar,
            WidgetKind::Todo,
            WidgetKind::Notes,
            WidgetKind::Clock,
        ] {
            for (x_pct, y_pct) in [(0, 0), (0, 100), (100, 0), (100, 100), (50, 50)] {
                let settings = WallpaperSettings {
                    calendar_x_percent: x_pct,
                    calendar_y_percent: y_pct,
                    todo_x_percent: x_pct,
                    todo_y_percent: y_pct,
                    notes_x_percent: x_pct,
                    notes_y_percent: y_pct,
                    clock_x_percent: x_pct,
                    clock_y_percent: y_pct,
                    ..settings.clone()
                };
                let rect = widget_rect(1280, 720, kind, &settings);
                assert!(rect.x >= EDGE_PADDING);
                assert!(rect.y >= EDGE_PADDING);
                assert!(rect.right() <= 1280 - EDGE_PADDING);
                assert!(rect.bottom() <= 720 - EDGE_PADDING);
            }
        }
    }
}
