use image::RgbaImage;

use crate::text::{self, Anchor, FontStore};
use crate::widgets::{draw_header, RenderContext, BODY_PERCENT};

const EMPTY_PLACEHOLDER: &str = "Add notes in the app...";

/// Greedy word wrap against measured pixel width. Paragraph breaks are
/// preserved as empty lines; a single word wider than the limit gets a
/// line of its own rather than being split.
pub fn wrap_text(
    fonts: &FontStore,
    content: &str,
    pixel_size: u32,
    max_width: u32,
) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in content.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            let (width, _) = text::measure(fonts, &candidate, pixel_size, false);
            if width <= max_width || current.is_empty() {
                current = candidate;
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    // A trailing paragraph break would render as a stray blank line.
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Draws the notes widget: header, divider, wrapped free text truncated to
/// the lines that fit, or a placeholder when the notes are empty.
pub fn render(ctx: &RenderContext, panel: &mut RgbaImage, notes: &str) {
    let mut y = draw_header(ctx, panel, "Notes");

    let padding = ctx.padding() as i64;
    let body_px = ctx.font_px(BODY_PERCENT);
    let line_height = (body_px as f32 * 1.4) as i64;
    let bottom = panel.height() as i64 - padding;

    if notes.trim().is_empty() {
        let bitmap = text::render_text(
            ctx.fonts,
            EMPTY_PLACEHOLDER,
            body_px,
            ctx.colors.secondary,
            false,
            ctx.colors.shadow,
        );
        text::blit(panel, &bitmap, padding, y, Anchor::LeftTop);
        return;
    }

    let max_width = (panel.width() as i64 - 2 * padding).max(1) as u32;
    for line in wrap_text(ctx.fonts, notes, body_px, max_width) {
        if y + line_height > bottom {
            break;
        }
        if !line.is_empty() {
            let bitmap = text::render_text(
                ctx.fonts,
                &line,
                body_px,
                ctx.colors.text,
                false,
                ctx.colors.shadow,
            );
            text::blit(panel, &bitmap, padding, y, Anchor::LeftTop);
        }
        y += line_height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FontStore;

    #[test]
    fn wrapping_then_rejoining_reproduces_the_paragraph() {
        let fonts = FontStore::bitmap_only();
        let original = "the quick brown fox jumps over the lazy dog again and again";
        let lines = wrap_text(&fonts, original, 16, 220);
        assert!(lines.len() > 1, "text should wrap into multiple lines");

        let rejoined = lines.join(" ");
        let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(normalize(&rejoined), normalize(original));
    }

    #[test]
    fn paragraph_breaks_become_blank_lines() {
        let fonts = FontStore::bitmap_only();
        let lines = wrap_text(&fonts, "first\n\nsecond", 16, 4000);
        assert_eq!(lines, vec!["first".to_string(), String::new(), "second".to_string()]);
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let fonts = FontStore::bitmap_only();
        let lines = wrap_text(&fonts, "a superextraordinarilylongword b", 16, 80);
        assert!(lines.contains(&"superextraordinarilylongword".to_string()));
    }

    #[test]
    fn every_wrapped_line_fits_when_words_do() {
        let fonts = FontStore::bitmap_only();
        let max_width = 240;
        let lines = wrap_text(&fonts, "many small words fill this panel neatly", 16, max_width);
        for line in &lines {
            let (width, _) = crate::text::measure(&fonts, line, 16, false);
            assert!(width <= max_width, "line too wide: {line}");
        }
    }
}
