use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::geometry::WidgetRect;

/// Luminance above which panels get dark text.
pub const LIGHT_BAND: f32 = 140.0;
/// Luminance below which shadows can stay light.
pub const DARK_BAND: f32 = 90.0;

/// Glass panels brighten dark regions and darken bright ones, so the text
/// color must be picked against the post-blur panel, not the raw photo.
const GLASS_DARK_CUTOFF: f32 = 90.0;
const GLASS_LIGHT_CUTOFF: f32 = 160.0;
const GLASS_EFFECTIVE_LIGHT: f32 = 200.0;
const GLASS_EFFECTIVE_DARK: f32 = 50.0;

const ACCENT_HUE_SHIFT: f32 = 0.45;
const TODAY_HUE_SHIFT: f32 = 0.30;
const ACCENT_SATURATION_BOOST: f32 = 1.35;

/// Background-derived colors and statistics for one widget region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionAnalysis {
    /// Mean grayscale luminance of the raw region, 0-255.
    pub luminance: f32,
    /// Luminance standard deviation; a proxy for visual busyness.
    pub busyness: f32,
    pub primary_text: Rgba<u8>,
    pub secondary_text: Rgba<u8>,
    pub shadow: Rgba<u8>,
    pub accent: Rgba<u8>,
    pub today_highlight: Rgba<u8>,
}

/// Samples the pixels behind a widget rectangle and derives contrasting
/// text colors plus background-related accent hues.
pub fn analyze(base: &RgbaImage, rect: WidgetRect, glass: bool) -> RegionAnalysis {
    let region = crop_region(base, rect);
    let (luminance, busyness) = luminance_stats(&region);

    let effective = effective_luminance(luminance, glass);
    let (primary_text, secondary_text, shadow) = contrast_profile(effective);

    let dominant = dominant_color(&region);
    let accent = rotate_hue(dominant, ACCENT_HUE_SHIFT);
    let today = rotate_hue(dominant, TODAY_HUE_SHIFT);

    RegionAnalysis {
        luminance,
        busyness,
        primary_text,
        secondary_text,
        shadow,
        accent: Rgba([accent[0], accent[1], accent[2], 255]),
        today_highlight: Rgba([today[0], today[1], today[2], 255]),
    }
}

/// Crops the widget region, clamped so the read never leaves image bounds.
pub fn crop_region(base: &RgbaImage, rect: WidgetRect) -> RgbaImage {
    let x = rect.x.min(base.width().saturating_sub(1));
    let y = rect.y.min(base.height().saturating_sub(1));
    let width = rect.width.min(base.width() - x).max(1);
    let height = rect.height.min(base.height() - y).max(1);
    imageops::crop_imm(base, x, y, width, height).to_image()
}

fn luminance_stats(region: &RgbaImage) -> (f32, f32) {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let count = (region.width() * region.height()) as f64;
    if count == 0.0 {
        return (128.0, 0.0);
    }

    for pixel in region.pixels() {
        let [r, g, b, _] = pixel.0;
        let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        sum += luma;
        sum_sq += luma * luma;
    }

    let mean = sum / count;
    let variance = (sum_sq / count - mean * mean).max(0.0);
    (mean as f32, variance.sqrt() as f32)
}

/// Remaps source luminance for glass panels, whose blur+brightness step
/// inverts the extremes of the underlying photo.
pub fn effective_luminance(luminance: f32, glass: bool) -> f32 {
    if !glass {
        return luminance;
    }
    if luminance < GLASS_DARK_CUTOFF {
        GLASS_EFFECTIVE_LIGHT
    } else if luminance > GLASS_LIGHT_CUTOFF {
        GLASS_EFFECTIVE_DARK
    } else {
        luminance
    }
}

/// Three disjoint luminance bands covering the full 0-255 range.
pub fn contrast_profile(luminance: f32) -> (Rgba<u8>, Rgba<u8>, Rgba<u8>) {
    if luminance > LIGHT_BAND {
        // Light background: dark text, soft light shadow.
        (
            Rgba([30, 30, 35, 255]),
            Rgba([70, 70, 80, 255]),
            Rgba([255, 255, 255, 110]),
        )
    } else if luminance >= DARK_BAND {
        // Mid-tone: white text needs a strong opaque shadow to separate.
        (
            Rgba([255, 255, 255, 255]),
            Rgba([225, 225, 230, 255]),
            Rgba([0, 0, 0, 200]),
        )
    } else {
        (
            Rgba([255, 255, 255, 255]),
            Rgba([210, 210, 218, 255]),
            Rgba([0, 0, 0, 120]),
        )
    }
}

/// Average color of the region after shrinking it to a small block, which
/// washes out texture and keeps the dominant hue.
pub fn dominant_color(region: &RgbaImage) -> [u8; 3] {
    let block = imageops::resize(region, 8, 8, FilterType::Triangle);
    let mut sums = [0u32; 3];
    for pixel in block.pixels() {
        sums[0] += pixel.0[0] as u32;
        sums[1] += pixel.0[1] as u32;
        sums[2] += pixel.0[2] as u32;
    }
    let count = (block.width() * block.height()).max(1);
    [
        (sums[0] / count) as u8,
        (sums[1] / count) as u8,
        (sums[2] / count) as u8,
    ]
}

/// Rotates a color's hue by `turns` (fraction of a full rotation) and
/// boosts saturation, producing an accent related to but distinct from the
/// dominant background color.
pub fn rotate_hue(rgb: [u8; 3], turns: f32) -> [u8; 3] {
    let (h, l, s) = rgb_to_hls(rgb);
    let rotated = (h + turns).fract();
    let boosted = (s * ACCENT_SATURATION_BOOST).clamp(0.25, 0.9);
    let settled = l.clamp(0.35, 0.75);
    hls_to_rgb(rotated, settled, boosted)
}

fn rgb_to_hls(rgb: [u8; 3]) -> (f32, f32, f32) {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f32::EPSILON {
        return (0.0, l, 0.0);
    }

    let delta = max - min;
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let h = if (max - r).abs() < f32::EPSILON {
        ((g - b) / delta).rem_euclid(6.0)
    } else if (max - g).abs() < f32::EPSILON {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    } / 6.0;

    (h, l, s)
}

fn hls_to_rgb(h: f32, l: f32, s: f32) -> [u8; 3] {
    if s <= 0.0 {
        let v = (l * 255.0).round() as u8;
        return [v, v, v];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let channel = |mut t: f32| -> u8 {
        t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
}
