use std::sync::atomic::{AtomicU64, Ordering};

use eframe::egui::{self, Rect};

use crate::canvas::Canvas;
use crate::error::DeckError;
use crate::item::{Drawable, SlideItem, TextItem};
use crate::raster::RasterId;
use crate::style::{StyleEntry, StyleTable};

/// Design-time slide width; drawing scales from this reference size.
pub const REFERENCE_WIDTH: f32 = 1200.0;
pub const REFERENCE_HEIGHT: f32 = 800.0;

static NEXT_SLIDE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique slide identity, stable across moves within a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlideId(u64);

impl SlideId {
    fn next() -> Self {
        Self(NEXT_SLIDE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A titled, ordered list of items.
#[derive(Debug)]
pub struct Slide {
    id: SlideId,
    title: String,
    items: Vec<SlideItem>,
}

impl Default for Slide {
    fn default() -> Self {
        Self::new("")
    }
}

impl Slide {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: SlideId::next(),
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> SlideId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn append(&mut self, item: impl Into<SlideItem>) {
        self.items.push(item.into());
    }

    /// Append a text item.
    pub fn append_text(&mut self, level: u32, text: impl Into<String>) {
        self.append(TextItem::new(level, text));
    }

    pub fn item(&self, index: usize) -> Result<&SlideItem, DeckError> {
        self.items.get(index).ok_or(DeckError::Index {
            index,
            len: self.items.len(),
        })
    }

    pub fn remove_item(&mut self, index: usize) -> Result<SlideItem, DeckError> {
        DeckError::check_index(index, self.items.len())?;
        Ok(self.items.remove(index))
    }

    pub fn items(&self) -> &[SlideItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids of every loaded image on the slide, nested ones included.
    pub fn raster_ids(&self) -> Vec<RasterId> {
        self.items.iter().flat_map(SlideItem::raster_ids).collect()
    }

    /// Uniform scale that fits the reference size into `area`.
    pub fn scale_for(area: Rect) -> f32 {
        (area.width() / REFERENCE_WIDTH).min(area.height() / REFERENCE_HEIGHT)
    }

    /// Draw the title then each item top to bottom inside `area`.
    ///
    /// Styles are resolved for every item before anything is drawn, so a configuration error
    /// leaves the canvas untouched.
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        area: Rect,
        styles: &StyleTable,
    ) -> Result<(), DeckError> {
        let scale = Self::scale_for(area);
        let title = SlideItem::from(TextItem::new(0, self.title.as_str()));
        let mut rows: Vec<(&SlideItem, &StyleEntry)> = Vec::with_capacity(self.items.len() + 1);
        rows.push((&title, styles.style(0)?));
        for item in &self.items {
            rows.push((item, styles.style(item.level())?));
        }

        let mut y = area.top();
        for (item, style) in rows {
            item.render(canvas, egui::pos2(area.left(), y), scale, style);
            y += item.footprint(&*canvas, scale, style).height();
        }
        Ok(())
    }
}
