use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use image::imageops;
use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::json;

use crate::analyze::{self, RegionAnalysis};
use crate::config::{BlendMode, Palette, WallpaperSettings};
use crate::geometry::{self, WidgetKind};
use crate::logging;
use crate::models::Task;
use crate::panel;
use crate::text::FontStore;
use crate::widgets::{calendar, clock, notes, todo, RenderContext, WidgetColors};

/// Well-known output name; the compositor always overwrites it whole.
pub const OUTPUT_FILENAME: &str = "wallpaper_with_calendar.png";

/// Z-order for overlapping widgets. Overlap is a user configuration
/// choice, not something the compositor corrects.
const WIDGET_ORDER: [WidgetKind; 4] = [
    WidgetKind::Calendar,
    WidgetKind::Todo,
    WidgetKind::Notes,
    WidgetKind::Clock,
];

/// One render invocation. Tasks, notes and settings are read-only inputs
/// owned by external collaborators.
pub struct RenderRequest<'a> {
    pub base_image: &'a Path,
    pub tasks: &'a [Task],
    pub notes: &'a str,
    pub settings: &'a WallpaperSettings,
    pub output: PathBuf,
    /// Frozen clock for deterministic output; `None` uses local time.
    pub now: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum GenerateError {
    Image(PathBuf, image::ImageError),
    Io(PathBuf, io::Error),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(path, err) => {
                write!(f, "failed to decode or encode {}: {}", path.display(), err)
            }
            Self::Io(path, err) => write!(f, "io error on {}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(_, err) => Some(err),
            Self::Io(_, err) => Some(err),
        }
    }
}

/// Renders every enabled widget onto a copy of the base photo and saves
/// the composite as a PNG at the requested output path.
///
/// The write is atomic: the composite is encoded to a sibling temp file
/// and renamed over the output only on full success, so a failed render
/// never leaves a partial file or damages the previous wallpaper.
pub fn generate(request: &RenderRequest) -> Result<PathBuf, GenerateError> {
    let now = request
        .now
        .unwrap_or_else(|| Local::now().naive_local());

    let base = image::open(request.base_image)
        .map_err(|err| GenerateError::Image(request.base_image.to_path_buf(), err))?
        .to_rgba8();

    logging::log_event(json!({
        "event": "render:start",
        "base": request.base_image.display().to_string(),
        "width": base.width(),
        "height": base.height(),
    }));

    let fonts = FontStore::discover();
    let result = compose(&base, request, &fonts, now);
    save_atomic(&result, &request.output)?;

    logging::log_event(json!({
        "event": "render:saved",
        "output": request.output.display().to_string(),
    }));
    Ok(request.output.clone())
}

/// Pure composition step: all widget rendering, no file output.
pub fn compose(
    base: &RgbaImage,
    request: &RenderRequest,
    fonts: &FontStore,
    now: NaiveDateTime,
) -> RgbaImage {
    let settings = request.settings;
    let palette = settings.theme.palette();
    // A glass-type theme forces frosted panels regardless of blend mode.
    let mode = if palette.blur {
        BlendMode::Glass
    } else {
        settings.blend_mode
    };

    let mut result = base.clone();
    let (base_w, base_h) = result.dimensions();
    let dpi = geometry::dpi_scale(base_w);

    for kind in WIDGET_ORDER {
        let (enabled, opacity, font_override) = match kind {
            WidgetKind::Calendar => (
                settings.calendar_enabled,
                settings.calendar_opacity,
                settings.calendar_font_scale,
            ),
            WidgetKind::Todo => (
                settings.todo_enabled,
                settings.todo_opacity,
                settings.todo_font_scale,
            ),
            WidgetKind::Notes => (
                settings.notes_enabled,
                settings.notes_opacity,
                settings.notes_font_scale,
            ),
            WidgetKind::Clock => (
                settings.clock_enabled,
                settings.clock_opacity,
                settings.clock_font_scale,
            ),
        };
        if !enabled {
            continue;
        }

        let rect = geometry::widget_rect(base_w, base_h, kind, settings);
        let analysis = analyze::analyze(&result, rect, mode == BlendMode::Glass);
        let colors = widget_colors(mode, palette, &analysis);
        let radius = corner_radius(kind, settings, dpi);

        let mut widget_panel =
            panel::render_panel(&result, rect, mode, palette, opacity, radius, &analysis);

        let ctx = RenderContext {
            rect,
            dpi,
            fonts,
            palette,
            settings,
            colors,
            font_scale: settings.font_scale_for(font_override),
        };

        match kind {
            WidgetKind::Calendar => {
                calendar::render(&ctx, &mut widget_panel, request.tasks, now.date())
            }
            WidgetKind::Todo => todo::render(&ctx, &mut widget_panel, request.tasks, now.date()),
            WidgetKind::Notes => notes::render(&ctx, &mut widget_panel, request.notes),
            WidgetKind::Clock => clock::render(&ctx, &mut widget_panel, now),
        }

        imageops::overlay(&mut result, &widget_panel, rect.x as i64, rect.y as i64);

        logging::log_event(json!({
            "event": "render:widget",
            "widget": widget_name(kind),
            "x": rect.x,
            "y": rect.y,
            "width": rect.width,
            "height": rect.height,
            "luminance": analysis.luminance,
        }));
    }

    result
}

fn widget_name(kind: WidgetKind) -> &'static str {
    match kind {
        WidgetKind::Calendar => "calendar",
        WidgetKind::Todo => "todo",
        WidgetKind::Notes => "notes",
        WidgetKind::Clock => "clock",
    }
}

fn corner_radius(kind: WidgetKind, settings: &WallpaperSettings, dpi: f32) -> u32 {
    let base = match kind {
        WidgetKind::Calendar => settings.calendar_style.spec().rounded_corners,
        _ => 15,
    };
    (base as f32 * dpi).round() as u32
}

/// Solid panels draw with the theme palette; glass panels use the colors
/// derived from the photo behind the widget.
fn widget_colors(mode: BlendMode, palette: &Palette, analysis: &RegionAnalysis) -> WidgetColors {
    match mode {
        BlendMode::Glass => WidgetColors {
            text: analysis.primary_text,
            secondary: analysis.secondary_text,
            shadow: Some(analysis.shadow),
            accent: analysis.accent,
            today: analysis.today_highlight,
            border: Rgba([255, 255, 255, 100]),
        },
        BlendMode::Solid => {
            let rgba = |rgb: [u8; 3]| Rgba([rgb[0], rgb[1], rgb[2], 255]);
            WidgetColors {
                text: rgba(palette.text),
                secondary: rgba(palette.text_secondary),
                shadow: None,
                accent: rgba(palette.weekend),
                today: rgba(palette.today),
                border: Rgba([palette.border[0], palette.border[1], palette.border[2], 100]),
            }
        }
    }
}

fn save_atomic(result: &RgbaImage, output: &Path) -> Result<(), GenerateError> {
    let mut temp = output.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    if let Err(err) = result.save_with_format(&temp, ImageFormat::Png) {
        let _ = fs::remove_file(&temp);
        return Err(GenerateError::Image(temp, err));
    }
    if let Err(err) = fs::rename(&temp, output) {
        let _ = fs::remove_file(&temp);
        return Err(GenerateError::Io(output.to_path_buf(), err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;

    fn analysis() -> RegionAnalysis {
        let image = RgbaImage::from_pixel(32, 32, Rgba([40, 90, 180, 255]));
        analyze::analyze(
            &image,
            geometry::WidgetRect {
                x: 0,
                y: 0,
                width: 32,
                height: 32,
            },
            true,
        )
    }

    #[test]
    fn glass_colors_come_from_the_analysis() {
        let analysis = analysis();
        let colors = widget_colors(BlendMode::Glass, Theme::Dark.palette(), &analysis);
        assert_eq!(colors.text, analysis.primary_text);
        assert!(colors.shadow.is_some());
    }

    #[test]
    fn solid_colors_come_from_the_palette() {
        let palette = Theme::Neon.palette();
        let colors = widget_colors(BlendMode::Solid, palette, &analysis());
        assert_eq!(colors.text.0[..3], palette.text[..]);
        assert!(colors.shadow.is_none());
    }

    #[test]
    fn glass_theme_forces_frosted_panels() {
        let settings = WallpaperSettings {
            theme: Theme::Glass,
            blend_mode: BlendMode::Solid,
            ..WallpaperSettings::default()
        };
        let palette = settings.theme.palette();
        assert!(palette.blur);
    }

    #[test]
    fn compose_only_touches_enabled_widget_regions() {
        let base = RgbaImage::from_pixel(1280, 720, Rgba([90, 120, 90, 255]));
        let settings = WallpaperSettings {
            calendar_enabled: false,
            todo_enabled: true,
            notes_enabled: false,
            clock_enabled: false,
            ..WallpaperSettings::default()
        }
        .normalized();
        let tasks = [Task {
            id: "t".to_string(),
            title: "water plants".to_string(),
            date: "2024-06-10".to_string(),
            category: crate::models::TaskCategory::Reminder,
            created_at: String::new(),
        }];
        let request = RenderRequest {
            base_image: Path::new("unused"),
            tasks: &tasks,
            notes: "",
            settings: &settings,
            output: PathBuf::from("unused.png"),
            now: Some(
                chrono::NaiveDate::from_ymd_opt(2024, 6, 10)
                    .expect("valid date")
                    .and_hms_opt(12, 0, 0)
                    .expect("valid time"),
            ),
        };
        let fonts = FontStore::bitmap_only();
        let now = request.now.expect("frozen clock");
        let result = compose(&base, &request, &fonts, now);

        let rect = geometry::widget_rect(1280, 720, WidgetKind::Todo, &settings);
        let mut outside_changed = 0u32;
        let mut inside_changed = 0u32;
        for (x, y, pixel) in result.enumerate_pixels() {
            if *pixel != *base.get_pixel(x, y) {
                if rect.contains(x, y) {
                    inside_changed += 1;
                } else {
                    outside_changed += 1;
                }
            }
        }
        assert_eq!(outside_changed, 0, "pixels outside the to-do rect changed");
        assert!(inside_changed > 0, "to-do widget should draw something");
    }
}
