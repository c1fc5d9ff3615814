use eframe::egui::Color32;

use crate::canvas::{FontWeight, Typeface};
use crate::style::StyleEntry;

const ORANGE: Color32 = Color32::from_rgb(0xFF, 0xC8, 0x00);
const LIGHT_GRAY: Color32 = Color32::from_rgb(0xC0, 0xC0, 0xC0);

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub accent: Color32,
    /// Styles for levels `0..levels.len()`.
    pub levels: Vec<StyleEntry>,
    /// Style for any level without an entry.
    pub fallback: StyleEntry,
}

impl Theme {
    pub const NAMES: &'static [&'static str] = &["light", "dark"];

    pub fn light() -> Self {
        let black = Color32::BLACK;
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: black,
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            levels: outline_levels([Color32::RED, Color32::BLUE, black, black, black]),
            fallback: fallback_style(black),
        }
    }

    pub fn dark() -> Self {
        let foreground = Color32::from_rgb(0xC8, 0xC8, 0xC8);
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            foreground,
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            levels: outline_levels([
                ORANGE,
                Color32::YELLOW,
                Color32::WHITE,
                LIGHT_GRAY,
                LIGHT_GRAY,
            ]),
            fallback: fallback_style(foreground),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    pub fn is_known(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let [r, g, b, _] = color.to_srgba_unmultiplied();
        Color32::from_rgba_unmultiplied(r, g, b, (opacity.clamp(0.0, 1.0) * 255.0) as u8)
    }
}

/// Indent and leading per outline level; the title level is the largest.
fn outline_levels(colors: [Color32; 5]) -> Vec<StyleEntry> {
    const SHAPE: [(f32, f32); 5] = [(0.0, 48.0), (20.0, 36.0), (50.0, 24.0), (70.0, 18.0), (90.0, 14.0)];
    SHAPE
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(level, (&(indent, size), color))| {
            let weight = if level == 4 {
                FontWeight::Regular
            } else {
                FontWeight::Bold
            };
            StyleEntry::new(indent, size, color, Typeface::Proportional, size, weight)
        })
        .collect()
}

fn fallback_style(color: Color32) -> StyleEntry {
    StyleEntry::new(10.0, 20.0, color, Typeface::Proportional, 24.0, FontWeight::Bold)
}
