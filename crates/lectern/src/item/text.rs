use eframe::egui::{self, Pos2, Rect};

use crate::canvas::Canvas;
use crate::item::Drawable;
use crate::style::StyleEntry;

/// Plain text. Lines break on `\n` only; the item never wraps.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    level: u32,
    text: String,
}

impl TextItem {
    pub fn new(level: u32, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn lines(&self) -> impl Iterator<Item = &str> {
        // A blank line still takes up a row.
        self.text
            .split('\n')
            .map(|line| if line.is_empty() { " " } else { line })
    }
}

impl Drawable for TextItem {
    fn level(&self) -> u32 {
        self.level
    }

    fn footprint(&self, canvas: &dyn Canvas, scale: f32, style: &StyleEntry) -> Rect {
        let font = style.font(scale);
        let mut width: f32 = 0.0;
        let mut height = 0.0;
        if !self.text.is_empty() {
            for line in self.lines() {
                let size = canvas.measure_text(line, &font);
                width = width.max(size.x);
                height += size.y;
            }
        }
        Rect::from_min_size(
            egui::pos2(style.indent() * scale, 0.0),
            egui::vec2(width, style.leading() * scale + height),
        )
    }

    fn render(&self, canvas: &mut dyn Canvas, origin: Pos2, scale: f32, style: &StyleEntry) {
        if self.text.is_empty() {
            return;
        }
        let font = style.font(scale);
        let x = origin.x + style.indent() * scale;
        let mut y = origin.y + style.leading() * scale;
        for line in self.lines() {
            let height = canvas.measure_text(line, &font).y;
            canvas.draw_text(egui::pos2(x, y), line, &font, style.color());
            y += height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::RecordingCanvas;
    use crate::style::StyleTable;

    #[test]
    fn footprint_is_indented_and_includes_leading() {
        let styles = StyleTable::new();
        let style = styles.style(1).unwrap(); // indent 20, leading 36, 36pt bold
        let canvas = RecordingCanvas::new();
        let item = TextItem::new(1, "abcd");

        let rect = item.footprint(&canvas, 0.5, style);
        // font size 36 * 0.5 = 18, bold adds a point -> 19; advance is half the size per char.
        assert_eq!(rect.min, egui::pos2(10.0, 0.0));
        assert_eq!(rect.width(), 4.0 * 19.0 * 0.5);
        assert_eq!(rect.height(), 18.0 + 19.0);
    }

    #[test]
    fn multi_line_text_stacks_lines() {
        let styles = StyleTable::new();
        let style = styles.style(4).unwrap(); // 14pt regular, leading 14
        let mut canvas = RecordingCanvas::new();
        let item = TextItem::new(4, "ab\n\nabcdef");

        let rect = item.footprint(&canvas, 1.0, style);
        assert_eq!(rect.width(), 6.0 * 7.0);
        assert_eq!(rect.height(), 14.0 + 3.0 * 14.0);

        item.render(&mut canvas, egui::pos2(0.0, 100.0), 1.0, style);
        let texts = canvas.texts();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0], (egui::pos2(90.0, 114.0), "ab".to_string()));
        assert_eq!(texts[2], (egui::pos2(90.0, 142.0), "abcdef".to_string()));
    }

    #[test]
    fn empty_text_has_only_leading() {
        let styles = StyleTable::new();
        let style = styles.style(2).unwrap();
        let mut canvas = RecordingCanvas::new();
        let item = TextItem::new(2, "");

        let rect = item.footprint(&canvas, 1.0, style);
        assert_eq!(rect.width(), 0.0);
        assert_eq!(rect.height(), 24.0);
        item.render(&mut canvas, Pos2::ZERO, 1.0, style);
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn footprint_is_deterministic() {
        let styles = StyleTable::new();
        let style = styles.style(0).unwrap();
        let canvas = RecordingCanvas::new();
        let item = TextItem::new(0, "Title");
        assert_eq!(
            item.footprint(&canvas, 0.75, style),
            item.footprint(&canvas, 0.75, style)
        );
    }
}
