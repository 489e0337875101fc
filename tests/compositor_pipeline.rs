use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use image::{Rgba, RgbaImage};
use wallcal::compositor::{self, RenderRequest};
use wallcal::config::WallpaperSettings;
use wallcal::models::{Task, TaskCategory};
use wallcal::text::FontStore;

fn frozen_noon() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 10)
        .expect("valid date")
        .and_hms_opt(12, 30, 0)
        .expect("valid time")
}

fn sample_tasks() -> Vec<Task> {
    vec![
        Task {
            id: "1".to_string(),
            title: "dentist appointment".to_string(),
            date: "2024-06-12".to_string(),
            category: TaskCategory::Important,
            created_at: String::new(),
        },
        Task {
            id: "2".to_string(),
            title: "project deadline".to_string(),
            date: "2024-06-14".to_string(),
            category: TaskCategory::Deadline,
            created_at: String::new(),
        },
    ]
}

fn gradient_base(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let b = (y * 255 / height.max(1)) as u8;
        Rgba([r, 110, b, 255])
    })
}

fn request<'a>(
    base_image: &'a Path,
    tasks: &'a [Task],
    settings: &'a WallpaperSettings,
    output: &Path,
) -> RenderRequest<'a> {
    RenderRequest {
        base_image,
        tasks,
        notes: "buy milk\npick up parcel",
        settings,
        output: output.to_path_buf(),
        now: Some(frozen_noon()),
    }
}

#[test]
fn composing_twice_with_a_frozen_clock_is_deterministic() {
    let base = gradient_base(1280, 720);
    let settings = WallpaperSettings {
        clock_enabled: true,
        ..WallpaperSettings::default()
    }
    .normalized();
    let tasks = sample_tasks();
    let fonts = FontStore::bitmap_only();
    let req = request(Path::new("unused"), &tasks, &settings, Path::new("unused"));

    let first = compositor::compose(&base, &req, &fonts, frozen_noon());
    let second = compositor::compose(&base, &req, &fonts, frozen_noon());
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn generate_writes_a_png_matching_the_base_dimensions() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let base_path = dir.path().join("base.png");
    gradient_base(960, 540)
        .save(&base_path)
        .expect("base image should save");

    let settings = WallpaperSettings::default().normalized();
    let tasks = sample_tasks();
    let output = dir.path().join("wallpaper_with_calendar.png");
    let req = request(&base_path, &tasks, &settings, &output);

    let saved = compositor::generate(&req).expect("render should succeed");
    assert_eq!(saved, output);

    let (w, h) = image::image_dimensions(&output).expect("output should be a readable image");
    assert_eq!((w, h), (960, 540));

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .expect("tempdir should list")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp file left behind: {leftovers:?}");
}

#[test]
fn failed_render_leaves_the_previous_wallpaper_untouched() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let output = dir.path().join("wallpaper_with_calendar.png");
    fs::write(&output, b"previous wallpaper bytes").expect("previous output should write");

    let settings = WallpaperSettings::default().normalized();
    let tasks = sample_tasks();
    let missing = dir.path().join("no-such-photo.jpg");
    let req = request(&missing, &tasks, &settings, &output);

    compositor::generate(&req).expect_err("missing base image must fail the render");
    let bytes = fs::read(&output).expect("previous output should still exist");
    assert_eq!(bytes, b"previous wallpaper bytes");
}

#[test]
fn every_theme_and_style_renders_without_panicking() {
    use wallcal::config::{BlendMode, CalendarStyle, Theme};

    let base = gradient_base(800, 450);
    let tasks = sample_tasks();
    let fonts = FontStore::bitmap_only();

    for theme in [
        Theme::Dark,
        Theme::Light,
        Theme::Glass,
        Theme::Minimal,
        Theme::Aesthetic,
        Theme::Neon,
    ] {
        for blend_mode in [BlendMode::Glass, BlendMode::Solid] {
            for style in [
                CalendarStyle::Aesthetic,
                CalendarStyle::Compact,
                CalendarStyle::Minimal,
                CalendarStyle::Classic,
            ] {
                let settings = WallpaperSettings {
                    theme,
                    blend_mode,
                    calendar_style: style,
                    clock_enabled: true,
                    ..WallpaperSettings::default()
                }
                .normalized();
                let req = request(Path::new("unused"), &tasks, &settings, Path::new("unused"));
                let result = compositor::compose(&base, &req, &fonts, frozen_noon());
                assert_eq!(result.dimensions(), (800, 450));
            }
        }
    }
}
