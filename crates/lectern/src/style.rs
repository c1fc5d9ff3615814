//! Level-based styling.
//!
//! A [`StyleTable`] maps an item's outline level to a [`StyleEntry`]. Lookup is exact match or
//! the designated default; there is no nearest-level fallback. The table is an ordinary value
//! passed to drawing code, so independent tables (and tests) never share state.

use std::collections::HashMap;

use eframe::egui::Color32;

use crate::canvas::{FontSpec, FontWeight, Typeface};
use crate::error::DeckError;
use crate::theme::Theme;

/// Visual attributes for one level. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleEntry {
    indent: f32,
    leading: f32,
    color: Color32,
    typeface: Typeface,
    font_size: f32,
    weight: FontWeight,
}

impl StyleEntry {
    pub const fn new(
        indent: f32,
        leading: f32,
        color: Color32,
        typeface: Typeface,
        font_size: f32,
        weight: FontWeight,
    ) -> Self {
        Self {
            indent,
            leading,
            color,
            typeface,
            font_size,
            weight,
        }
    }

    /// Horizontal offset in reference pixels.
    pub fn indent(&self) -> f32 {
        self.indent
    }

    /// Space above the item in reference pixels.
    pub fn leading(&self) -> f32 {
        self.leading
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn typeface(&self) -> Typeface {
        self.typeface
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// The font at `scale`.
    pub fn font(&self, scale: f32) -> FontSpec {
        FontSpec {
            typeface: self.typeface,
            size: self.font_size * scale,
            weight: self.weight,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StyleTable {
    entries: HashMap<u32, StyleEntry>,
    default: Option<StyleEntry>,
    theme_name: String,
    background: Color32,
    foreground: Color32,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleTable {
    /// A table populated with the default theme.
    pub fn new() -> Self {
        Self::from_theme(&Theme::light())
    }

    /// A table with no entries and no default; every lookup fails.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            default: None,
            theme_name: "none".to_string(),
            background: Color32::WHITE,
            foreground: Color32::BLACK,
        }
    }

    pub fn from_theme(theme: &Theme) -> Self {
        let entries = theme
            .levels
            .iter()
            .enumerate()
            .map(|(level, entry)| (level as u32, entry.clone()))
            .collect();
        Self {
            entries,
            default: Some(theme.fallback.clone()),
            theme_name: theme.name.clone(),
            background: theme.background,
            foreground: theme.foreground,
        }
    }

    /// Re-initialize with the default theme.
    pub fn create_styles(&mut self) {
        self.apply_theme(&Theme::light());
    }

    /// Replace the whole table with `theme`'s styles.
    pub fn apply_theme(&mut self, theme: &Theme) {
        let replacement = Self::from_theme(theme);
        *self = replacement;
        tracing::debug!(theme = %self.theme_name, "applied theme");
    }

    pub fn style(&self, level: u32) -> Result<&StyleEntry, DeckError> {
        self.entries
            .get(&level)
            .or(self.default.as_ref())
            .ok_or(DeckError::Configuration { level })
    }

    pub fn insert(&mut self, level: u32, entry: StyleEntry) -> Option<StyleEntry> {
        self.entries.insert(level, entry)
    }

    pub fn set_default(&mut self, entry: Option<StyleEntry>) {
        self.default = entry;
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Levels with an explicit entry, ascending.
    pub fn levels(&self) -> Vec<u32> {
        let mut levels: Vec<u32> = self.entries.keys().copied().collect();
        levels.sort_unstable();
        levels
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn foreground(&self) -> Color32 {
        self.foreground
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_level_wins() {
        let table = StyleTable::new();
        let style = table.style(1).unwrap();
        assert_eq!(style.indent(), 20.0);
        assert_eq!(style.color(), Color32::BLUE);
    }

    #[test]
    fn missing_level_uses_default_not_nearest() {
        let table = StyleTable::new();
        // Level 7 is above every explicit entry; the nearest (4) must not be used.
        let style = table.style(7).unwrap();
        assert_eq!(style.indent(), 10.0);
        assert_eq!(style.font_size(), 24.0);
    }

    #[test]
    fn empty_table_reports_configuration_error() {
        let table = StyleTable::empty();
        assert_eq!(
            table.style(0).unwrap_err(),
            DeckError::Configuration { level: 0 }
        );
    }

    #[test]
    fn explicit_entries_without_default() {
        let mut table = StyleTable::empty();
        let entry = StyleEntry::new(
            5.0,
            10.0,
            Color32::GREEN,
            Typeface::Monospace,
            12.0,
            FontWeight::Regular,
        );
        table.insert(2, entry.clone());
        assert_eq!(table.style(2).unwrap(), &entry);
        assert!(table.style(3).is_err());
        assert!(!table.has_default());
    }

    #[test]
    fn apply_theme_replaces_every_entry() {
        let mut table = StyleTable::new();
        table.insert(9, Theme::light().fallback);
        table.apply_theme(&Theme::dark());
        assert_eq!(table.theme_name(), "dark");
        assert_eq!(table.levels(), vec![0, 1, 2, 3, 4]);
        assert_eq!(table.style(0).unwrap().color(), Theme::dark().levels[0].color());
        assert_eq!(table.background(), Theme::dark().background);
    }

    #[test]
    fn create_styles_restores_default_theme() {
        let mut table = StyleTable::empty();
        table.create_styles();
        assert_eq!(table.theme_name(), "light");
        assert!(table.has_default());
        assert_eq!(table.style(0).unwrap().font_size(), 48.0);
    }

    #[test]
    fn font_scales_with_size() {
        let table = StyleTable::new();
        let font = table.style(1).unwrap().font(0.5);
        assert_eq!(font.size, 18.0);
        assert_eq!(font.weight, FontWeight::Bold);
    }
}
