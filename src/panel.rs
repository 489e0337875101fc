use image::imageops;
use image::{Rgba, RgbaImage};

use crate::analyze::{self, RegionAnalysis};
use crate::config::{BlendMode, Palette};
use crate::geometry::WidgetRect;

/// Gaussian blur radius bounds for glass panels. Bright or visually busy
/// regions get a heavier blur so the widget content stays readable.
const BLUR_RADIUS_BASE: f32 = 22.0;
const BLUR_RADIUS_MAX: f32 = 30.0;
const BUSY_STDDEV: f32 = 40.0;

const GLASS_BRIGHTEN_DARK: f32 = 1.3;
const GLASS_DIM_BRIGHT: f32 = 0.75;
const GLASS_SATURATION: f32 = 1.15;
const GLASS_TINT_ALPHA: f32 = 0.15;
const GLASS_BORDER_ALPHA: u8 = 90;

/// Produces the backdrop panel for one widget, sized to its rectangle and
/// already carrying the rounded-corner alpha mask.
pub fn render_panel(
    base: &RgbaImage,
    rect: WidgetRect,
    mode: BlendMode,
    palette: &Palette,
    opacity_percent: u32,
    corner_radius: u32,
    analysis: &RegionAnalysis,
) -> RgbaImage {
    let mut panel = match mode {
        BlendMode::Glass => glass_panel(base, rect, palette, analysis),
        BlendMode::Solid => solid_panel(rect, palette, opacity_percent),
    };
    stroke_border(&mut panel, mode, palette);
    apply_rounded_mask(&mut panel, corner_radius);
    panel
}

/// Frosted-glass backdrop: a blurred, brightness-normalized, tinted crop of
/// the photo behind the widget.
fn glass_panel(
    base: &RgbaImage,
    rect: WidgetRect,
    palette: &Palette,
    analysis: &RegionAnalysis,
) -> RgbaImage {
    let crop = analyze::crop_region(base, rect);

    let radius = blur_radius(analysis);
    let mut panel = imageops::blur(&crop, radius / 3.0);

    let brightness = if analysis.luminance < 90.0 {
        GLASS_BRIGHTEN_DARK
    } else if analysis.luminance > 150.0 {
        GLASS_DIM_BRIGHT
    } else {
        1.0
    };

    let tint = palette.bg;
    for pixel in panel.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let adjusted = [
            saturate_channel(r, g, b, 0, brightness),
            saturate_channel(r, g, b, 1, brightness),
            saturate_channel(r, g, b, 2, brightness),
        ];
        pixel.0 = [
            lerp_u8(adjusted[0], tint[0], GLASS_TINT_ALPHA),
            lerp_u8(adjusted[1], tint[1], GLASS_TINT_ALPHA),
            lerp_u8(adjusted[2], tint[2], GLASS_TINT_ALPHA),
            255,
        ];
    }

    // The crop may be short at image edges; pad to the full rect size.
    if panel.dimensions() != (rect.width, rect.height) {
        let mut full = RgbaImage::new(rect.width, rect.height);
        imageops::overlay(&mut full, &panel, 0, 0);
        full
    } else {
        panel
    }
}

fn blur_radius(analysis: &RegionAnalysis) -> f32 {
    let mut radius = BLUR_RADIUS_BASE;
    if analysis.luminance > 150.0 || analysis.busyness > BUSY_STDDEV {
        radius += 8.0;
    }
    radius.min(BLUR_RADIUS_MAX)
}

/// Applies the brightness factor and the glass saturation boost to one
/// channel, pushing it away from the pixel's gray value.
fn saturate_channel(r: u8, g: u8, b: u8, index: usize, brightness: f32) -> u8 {
    let gray = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    let value = [r, g, b][index] as f32;
    let saturated = gray + (value - gray) * GLASS_SATURATION;
    (saturated * brightness).clamp(0.0, 255.0) as u8
}

fn lerp_u8(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t).round() as u8
}

/// Flat themed backdrop at the user-configured opacity. Never samples the
/// underlying photo.
fn solid_panel(rect: WidgetRect, palette: &Palette, opacity_percent: u32) -> RgbaImage {
    let alpha = (opacity_percent.min(100) * 255 / 100) as u8;
    let [r, g, b] = palette.bg;
    RgbaImage::from_pixel(rect.width, rect.height, Rgba([r, g, b, alpha]))
}

fn stroke_border(panel: &mut RgbaImage, mode: BlendMode, palette: &Palette) {
    let (width, height) = panel.dimensions();
    if width < 3 || height < 3 {
        return;
    }
    let color = match mode {
        BlendMode::Glass => [255, 255, 255],
        BlendMode::Solid => palette.border,
    };
    let alpha = match mode {
        BlendMode::Glass => GLASS_BORDER_ALPHA,
        BlendMode::Solid => 255,
    };

    for x in 0..width {
        blend_over(panel, x, 0, color, alpha);
        blend_over(panel, x, height - 1, color, alpha);
    }
    for y in 1..height - 1 {
        blend_over(panel, 0, y, color, alpha);
        blend_over(panel, width - 1, y, color, alpha);
    }
}

fn blend_over(panel: &mut RgbaImage, x: u32, y: u32, rgb: [u8; 3], alpha: u8) {
    let pixel = panel.get_pixel_mut(x, y);
    let t = alpha as f32 / 255.0;
    pixel.0 = [
        lerp_u8(pixel.0[0], rgb[0], t),
        lerp_u8(pixel.0[1], rgb[1], t),
        lerp_u8(pixel.0[2], rgb[2], t),
        pixel.0[3].max(alpha),
    ];
}

/// Zeroes alpha outside a rounded rectangle covering the whole panel, with
/// a one-pixel soft edge on the corner arcs. Applied last so every layer
/// below shares the same silhouette.
pub fn apply_rounded_mask(panel: &mut RgbaImage, radius: u32) {
    let (width, height) = panel.dimensions();
    let radius = radius.min(width / 2).min(height / 2) as f32;
    if radius <= 0.0 {
        return;
    }

    let corners = [
        (radius, radius),
        (width as f32 - radius, radius),
        (radius, height as f32 - radius),
        (width as f32 - radius, height as f32 - radius),
    ];

    for y in 0..height {
        for x in 0..width {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            let in_corner_zone = (px < radius || px > width as f32 - radius)
                && (py < radius || py > height as f32 - radius);
            if !in_corner_zone {
                continue;
            }

            let mut best = f32::MAX;
            for (cx, cy) in corners {
                let dx = px - cx;
                let dy = py - cy;
                best = best.min((dx * dx + dy * dy).sqrt());
            }

            let coverage = (radius - best + 0.5).clamp(0.0, 1.0);
            let pixel = panel.get_pixel_mut(x, y);
            pixel.0[3] = (pixel.0[3] as f32 * coverage) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyze;
    use crate::config::Theme;

    fn rect(w: u32, h: u32) -> WidgetRect {
        WidgetRect {
            x: 10,
            y: 10,
            width: w,
            height: h,
        }
    }

    fn photo(rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(200, 200, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn solid_panel_uses_theme_background_and_opacity() {
        let base = photo([0, 0, 0]);
        let r = rect(100, 80);
        let analysis = analyze(&base, r, false);
        let palette = Theme::Dark.palette();
        let panel = render_panel(&base, r, BlendMode::Solid, palette, 90, 0, &analysis);

        let center = panel.get_pixel(50, 40);
        assert_eq!(&center.0[..3], &palette.bg[..]);
        assert_eq!(center.0[3], (90 * 255 / 100) as u8);
    }

    #[test]
    fn glass_panel_brightens_dark_regions() {
        let base = photo([20, 20, 25]);
        let r = rect(100, 80);
        let analysis = analyze(&base, r, true);
        let panel = render_panel(
            &base,
            r,
            BlendMode::Glass,
            Theme::Glass.palette(),
            90,
            0,
            &analysis,
        );
        let center = panel.get_pixel(50, 40);
        let source_luma = 0.299 * 20.0 + 0.587 * 20.0 + 0.114 * 25.0;
        let panel_luma = 0.299 * center.0[0] as f32
            + 0.587 * center.0[1] as f32
            + 0.114 * center.0[2] as f32;
        assert!(panel_luma > source_luma);
    }

    #[test]
    fn glass_panel_dims_bright_regions() {
        let base = photo([240, 240, 240]);
        let r = rect(100, 80);
        let analysis = analyze(&base, r, true);
        let panel = render_panel(
            &base,
            r,
            BlendMode::Glass,
            Theme::Glass.palette(),
            90,
            0,
            &analysis,
        );
        let center = panel.get_pixel(50, 40);
        assert!(center.0[0] < 240);
    }

    #[test]
    fn rounded_mask_clears_corners_and_keeps_center() {
        let mut panel = RgbaImage::from_pixel(60, 60, Rgba([10, 10, 10, 255]));
        apply_rounded_mask(&mut panel, 16);
        assert_eq!(panel.get_pixel(0, 0).0[3], 0);
        assert_eq!(panel.get_pixel(59, 0).0[3], 0);
        assert_eq!(panel.get_pixel(0, 59).0[3], 0);
        assert_eq!(panel.get_pixel(59, 59).0[3], 0);
        assert_eq!(panel.get_pixel(30, 30).0[3], 255);
        // Edge midpoints sit outside the corner zones and stay opaque.
        assert_eq!(panel.get_pixel(30, 0).0[3], 255);
    }

    #[test]
    fn panel_matches_rect_size_even_at_image_edge() {
        let base = photo([90, 120, 90]);
        let r = WidgetRect {
            x: 150,
            y: 150,
            width: 100,
            height: 100,
        };
        let analysis = analyze(&base, r, true);
        let panel = render_panel(
            &base,
            r,
            BlendMode::Glass,
            Theme::Glass.palette(),
            90,
            12,
            &analysis,
        );
        assert_eq!(panel.dimensions(), (100, 100));
    }
}
