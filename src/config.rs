use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

/// Named palette selected by the `theme` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Glass,
    Minimal,
    Aesthetic,
    Neon,
}

impl From<String> for Theme {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "dark" => Self::Dark,
            "light" => Self::Light,
            "glass" => Self::Glass,
            "minimal" => Self::Minimal,
            "aesthetic" => Self::Aesthetic,
            "neon" => Self::Neon,
            _ => Self::default(),
        }
    }
}

impl From<Theme> for &'static str {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Glass => "glass",
            Theme::Minimal => "minimal",
            Theme::Aesthetic => "aesthetic",
            Theme::Neon => "neon",
        }
    }
}

/// Immutable color set belonging to one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Rgb,
    pub header: Rgb,
    pub text: Rgb,
    pub text_secondary: Rgb,
    pub today: Rgb,
    pub weekend: Rgb,
    pub accent: Rgb,
    pub border: Rgb,
    /// Glass themes blur the background behind the panel.
    pub blur: bool,
}

impl Theme {
    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Dark => &Palette {
                bg: [25, 25, 35],
                header: [45, 45, 60],
                text: [255, 255, 255],
                text_secondary: [180, 180, 190],
                today: [100, 149, 237],
                weekend: [150, 150, 160],
                accent: [100, 149, 237],
                border: [60, 60, 80],
                blur: false,
            },
            Self::Light => &Palette {
                bg: [252, 250, 248],
                header: [240, 238, 235],
                text: [50, 45, 40],
                text_secondary: [120, 115, 110],
                today: [180, 130, 100],
                weekend: [150, 140, 130],
                accent: [180, 130, 100],
                border: [220, 215, 210],
                blur: false,
            },
            Self::Glass => &Palette {
                bg: [255, 255, 255],
                header: [255, 255, 255],
                text: [255, 255, 255],
                text_secondary: [220, 220, 220],
                today: [255, 200, 150],
                weekend: [200, 200, 200],
                accent: [255, 200, 150],
                border: [255, 255, 255],
                blur: true,
            },
            Self::Minimal => &Palette {
                bg: [15, 15, 20],
                header: [15, 15, 20],
                text: [255, 255, 255],
                text_secondary: [140, 140, 145],
                today: [255, 100, 100],
                weekend: [120, 120, 125],
                accent: [255, 100, 100],
                border: [40, 40, 50],
                blur: false,
            },
            Self::Aesthetic => &Palette {
                bg: [215, 200, 190],
                header: [200, 185, 175],
                text: [70, 60, 55],
                text_secondary: [120, 105, 95],
                today: [160, 100, 80],
                weekend: [140, 120, 110],
                accent: [160, 100, 80],
                border: [180, 165, 155],
                blur: false,
            },
            Self::Neon => &Palette {
                bg: [10, 10, 20],
                header: [20, 20, 40],
                text: [0, 255, 255],
                text_secondary: [100, 200, 200],
                today: [255, 0, 200],
                weekend: [150, 0, 200],
                accent: [255, 0, 200],
                border: [0, 255, 255],
                blur: false,
            },
        }
    }
}

/// How widget backdrops are produced: frosted crops of the photo or flat
/// themed rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum BlendMode {
    #[default]
    Glass,
    Solid,
}

impl From<String> for BlendMode {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "solid" => Self::Solid,
            _ => Self::Glass,
        }
    }
}

impl From<BlendMode> for &'static str {
    fn from(mode: BlendMode) -> Self {
        match mode {
            BlendMode::Glass => "glass",
            BlendMode::Solid => "solid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekdayFormat {
    Single,
    Short,
}

/// Immutable layout record belonging to one calendar style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarStyleSpec {
    pub show_large_date: bool,
    pub rounded_corners: u32,
    pub show_month_name: bool,
    pub weekday_format: WeekdayFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum CalendarStyle {
    #[default]
    Aesthetic,
    Compact,
    Minimal,
    Classic,
}

impl From<String> for CalendarStyle {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "aesthetic" => Self::Aesthetic,
            "compact" => Self::Compact,
            "minimal" => Self::Minimal,
            "classic" => Self::Classic,
            _ => Self::default(),
        }
    }
}

impl From<CalendarStyle> for &'static str {
    fn from(style: CalendarStyle) -> Self {
        match style {
            CalendarStyle::Aesthetic => "aesthetic",
            CalendarStyle::Compact => "compact",
            CalendarStyle::Minimal => "minimal",
            CalendarStyle::Classic => "classic",
        }
    }
}

impl CalendarStyle {
    pub fn spec(self) -> &'static CalendarStyleSpec {
        match self {
            Self::Aesthetic => &CalendarStyleSpec {
                show_large_date: true,
                rounded_corners: 20,
                show_month_name: true,
                weekday_format: WeekdayFormat::Single,
            },
            Self::Compact => &CalendarStyleSpec {
                show_large_date: false,
                rounded_corners: 15,
                show_month_name: true,
                weekday_format: WeekdayFormat::Single,
            },
            Self::Minimal => &CalendarStyleSpec {
                show_large_date: false,
                rounded_corners: 8,
                show_month_name: true,
                weekday_format: WeekdayFormat::Single,
            },
            Self::Classic => &CalendarStyleSpec {
                show_large_date: false,
                rounded_corners: 12,
                show_month_name: true,
                weekday_format: WeekdayFormat::Short,
            },
        }
    }
}

/// Resolved user settings with every field defaulted and clamped at load
/// time. Missing or malformed keys are never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallpaperSettings {
    pub theme: Theme,
    pub blend_mode: BlendMode,
    /// Global font scaling in percent, 50-150.
    pub font_scale: u32,

    pub calendar_enabled: bool,
    pub calendar_x_percent: u32,
    pub calendar_y_percent: u32,
    pub calendar_size_percent: u32,
    pub calendar_opacity: u32,
    pub calendar_style: CalendarStyle,
    pub calendar_font_scale: Option<u32>,

    pub todo_enabled: bool,
    pub todo_x_percent: u32,
    pub todo_y_percent: u32,
    pub todo_width_percent: u32,
    pub todo_height_percent: u32,
    pub todo_opacity: u32,
    pub todo_font_scale: Option<u32>,

    pub notes_enabled: bool,
    pub notes_x_percent: u32,
    pub notes_y_percent: u32,
    pub notes_width_percent: u32,
    pub notes_height_percent: u32,
    pub notes_opacity: u32,
    pub notes_font_scale: Option<u32>,

    pub clock_enabled: bool,
    pub clock_x_percent: u32,
    pub clock_y_percent: u32,
    pub clock_size_percent: u32,
    pub clock_opacity: u32,
    pub clock_font_scale: Option<u32>,
}

impl Default for WallpaperSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            blend_mode: BlendMode::Glass,
            font_scale: 100,

            calendar_enabled: true,
            calendar_x_percent: 0,
            calendar_y_percent: 0,
            calendar_size_percent: 28,
            calendar_opacity: 90,
            calendar_style: CalendarStyle::Aesthetic,
            calendar_font_scale: None,

            todo_enabled: true,
            todo_x_percent: 0,
            todo_y_percent: 55,
            todo_width_percent: 22,
            todo_height_percent: 40,
            todo_opacity: 85,
            todo_font_scale: None,

            notes_enabled: true,
            notes_x_percent: 75,
            notes_y_percent: 60,
            notes_width_percent: 22,
            notes_height_percent: 35,
            notes_opacity: 85,
            notes_font_scale: None,

            clock_enabled: false,
            clock_x_percent: 80,
            clock_y_percent: 5,
            clock_size_percent: 15,
            clock_opacity: 78,
            clock_font_scale: None,
        }
    }
}

fn clamp(value: u32, low: u32, high: u32) -> u32 {
    value.clamp(low, high)
}

impl WallpaperSettings {
    /// Clamps every percent field into its declared range. Called once at
    /// load so the render path never re-validates.
    pub fn normalized(mut self) -> Self {
        self.font_scale = clamp(self.font_scale, 50, 150);

        self.calendar_x_percent = clamp(self.calendar_x_percent, 0, 100);
        self.calendar_y_percent = clamp(self.calendar_y_percent, 0, 100);
        self.calendar_size_percent = clamp(self.calendar_size_percent, 15, 45);
        self.calendar_opacity = clamp(self.calendar_opacity, 0, 100);

        self.todo_x_percent = clamp(self.todo_x_percent, 0, 100);
        self.todo_y_percent = clamp(self.todo_y_percent, 0, 100);
        self.todo_width_percent = clamp(self.todo_width_percent, 10, 40);
        self.todo_height_percent = clamp(self.todo_height_percent, 15, 60);
        self.todo_opacity = clamp(self.todo_opacity, 0, 100);

        self.notes_x_percent = clamp(self.notes_x_percent, 0, 100);
        self.notes_y_percent = clamp(self.notes_y_percent, 0, 100);
        self.notes_width_percent = clamp(self.notes_width_percent, 10, 40);
        self.notes_height_percent = clamp(self.notes_height_percent, 15, 60);
        self.notes_opacity = clamp(self.notes_opacity, 0, 100);

        self.clock_x_percent = clamp(self.clock_x_percent, 0, 100);
        self.clock_y_percent = clamp(self.clock_y_percent, 0, 100);
        self.clock_size_percent = clamp(self.clock_size_percent, 15, 45);
        self.clock_opacity = clamp(self.clock_opacity, 0, 100);

        self.calendar_font_scale = self.calendar_font_scale.map(|v| clamp(v, 50, 150));
        self.todo_font_scale = self.todo_font_scale.map(|v| clamp(v, 50, 150));
        self.notes_font_scale = self.notes_font_scale.map(|v| clamp(v, 50, 150));
        self.clock_font_scale = self.clock_font_scale.map(|v| clamp(v, 50, 150));

        self
    }

    /// Effective font scale factor for one widget, honoring the per-widget
    /// override when present.
    pub fn font_scale_for(&self, override_scale: Option<u32>) -> f32 {
        override_scale.unwrap_or(self.font_scale) as f32 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_name_resolves_to_dark() {
        let settings: WallpaperSettings =
            serde_json::from_str(r#"{"theme":"vaporwave"}"#).expect("settings should parse");
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn missing_keys_take_documented_defaults() {
        let settings: WallpaperSettings =
            serde_json::from_str("{}").expect("empty settings should parse");
        assert_eq!(settings, WallpaperSettings::default());
        assert!(settings.calendar_enabled);
        assert!(!settings.clock_enabled);
        assert_eq!(settings.notes_x_percent, 75);
    }

    #[test]
    fn normalized_clamps_out_of_range_percents() {
        let settings = WallpaperSettings {
            font_scale: 400,
            calendar_size_percent: 99,
            todo_x_percent: 250,
            notes_width_percent: 1,
            ..WallpaperSettings::default()
        }
        .normalized();

        assert_eq!(settings.font_scale, 150);
        assert_eq!(settings.calendar_size_percent, 45);
        assert_eq!(settings.todo_x_percent, 100);
        assert_eq!(settings.notes_width_percent, 10);
    }

    #[test]
    fn glass_theme_requests_blur() {
        assert!(Theme::Glass.palette().blur);
        assert!(!Theme::Dark.palette().blur);
    }

    #[test]
    fn calendar_styles_expose_their_layout_records() {
        assert!(CalendarStyle::Aesthetic.spec().show_large_date);
        assert!(!CalendarStyle::Classic.spec().show_large_date);
        assert_eq!(
            CalendarStyle::Classic.spec().weekday_format,
            WeekdayFormat::Short
        );
        let style: CalendarStyle = serde_json::from_str("\"brutalist\"").expect("should parse");
        assert_eq!(style, CalendarStyle::Aesthetic);
    }

    #[test]
    fn widget_font_override_wins_over_global_scale() {
        let settings = WallpaperSettings {
            font_scale: 80,
            notes_font_scale: Some(120),
            ..WallpaperSettings::default()
        };
        assert!((settings.font_scale_for(settings.notes_font_scale) - 1.2).abs() < 1e-6);
        assert!((settings.font_scale_for(settings.todo_font_scale) - 0.8).abs() < 1e-6);
    }
}
