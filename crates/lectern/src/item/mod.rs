//! Slide items.
//!
//! Items form a tree: leaves ([`TextItem`], [`ImageItem`], [`ShapeItem`]) and groups
//! ([`CompositeItem`]). Every node answers two questions through [`Drawable`]: which rectangle it
//! occupies at a given scale and style, and how to draw itself at an origin.

pub mod composite;
pub mod image;
pub mod shape;
pub mod text;

use eframe::egui::{Pos2, Rect};

use crate::canvas::Canvas;
use crate::raster::{Raster, RasterId};
use crate::style::StyleEntry;

pub use composite::{CompositeItem, union_footprints};
pub use image::ImageItem;
pub use shape::{ShapeItem, ShapeKind};
pub use text::TextItem;

pub trait Drawable {
    /// Outline level, used to select a style.
    fn level(&self) -> u32;

    /// The rectangle this item occupies relative to its drawing origin.
    ///
    /// Must be deterministic for identical inputs and must not mutate anything.
    fn footprint(&self, canvas: &dyn Canvas, scale: f32, style: &StyleEntry) -> Rect;

    fn render(&self, canvas: &mut dyn Canvas, origin: Pos2, scale: f32, style: &StyleEntry);
}

#[derive(Debug, Clone)]
pub enum LeafItem {
    Text(TextItem),
    Image(ImageItem),
    Shape(ShapeItem),
}

#[derive(Debug, Clone)]
pub enum SlideItem {
    Leaf(LeafItem),
    Composite(CompositeItem),
}

impl SlideItem {
    pub fn text(level: u32, text: impl Into<String>) -> Self {
        TextItem::new(level, text).into()
    }

    pub fn shape(level: u32, kind: ShapeKind, width: f32, height: f32) -> Self {
        ShapeItem::new(level, kind, width, height).into()
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Leaf(LeafItem::Text(_)) => "text",
            Self::Leaf(LeafItem::Image(_)) => "image",
            Self::Leaf(LeafItem::Shape(_)) => "shape",
            Self::Composite(_) => "group",
        }
    }

    pub fn as_text(&self) -> Option<&TextItem> {
        match self {
            Self::Leaf(LeafItem::Text(item)) => Some(item),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeItem> {
        match self {
            Self::Composite(group) => Some(group),
            Self::Leaf(_) => None,
        }
    }

    pub fn as_composite_mut(&mut self) -> Option<&mut CompositeItem> {
        match self {
            Self::Composite(group) => Some(group),
            Self::Leaf(_) => None,
        }
    }

    /// Ids of every loaded image in this subtree.
    pub fn raster_ids(&self) -> Vec<RasterId> {
        let mut ids = Vec::new();
        self.collect_raster_ids(&mut ids);
        ids
    }

    fn collect_raster_ids(&self, ids: &mut Vec<RasterId>) {
        match self {
            Self::Leaf(LeafItem::Image(image)) => ids.extend(image.raster().map(Raster::id)),
            Self::Leaf(_) => {}
            Self::Composite(group) => {
                for child in group.children() {
                    child.collect_raster_ids(ids);
                }
            }
        }
    }
}

impl From<TextItem> for SlideItem {
    fn from(item: TextItem) -> Self {
        Self::Leaf(LeafItem::Text(item))
    }
}

impl From<ImageItem> for SlideItem {
    fn from(item: ImageItem) -> Self {
        Self::Leaf(LeafItem::Image(item))
    }
}

impl From<ShapeItem> for SlideItem {
    fn from(item: ShapeItem) -> Self {
        Self::Leaf(LeafItem::Shape(item))
    }
}

impl From<CompositeItem> for SlideItem {
    fn from(item: CompositeItem) -> Self {
        Self::Composite(item)
    }
}

impl Drawable for LeafItem {
    fn level(&self) -> u32 {
        match self {
            Self::Text(item) => item.level(),
            Self::Image(item) => item.level(),
            Self::Shape(item) => item.level(),
        }
    }

    fn footprint(&self, canvas: &dyn Canvas, scale: f32, style: &StyleEntry) -> Rect {
        match self {
            Self::Text(item) => item.footprint(canvas, scale, style),
            Self::Image(item) => item.footprint(canvas, scale, style),
            Self::Shape(item) => item.footprint(canvas, scale, style),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, origin: Pos2, scale: f32, style: &StyleEntry) {
        match self {
            Self::Text(item) => item.render(canvas, origin, scale, style),
            Self::Image(item) => item.render(canvas, origin, scale, style),
            Self::Shape(item) => item.render(canvas, origin, scale, style),
        }
    }
}

impl Drawable for SlideItem {
    fn level(&self) -> u32 {
        match self {
            Self::Leaf(leaf) => leaf.level(),
            Self::Composite(group) => group.level(),
        }
    }

    fn footprint(&self, canvas: &dyn Canvas, scale: f32, style: &StyleEntry) -> Rect {
        match self {
            Self::Leaf(leaf) => leaf.footprint(canvas, scale, style),
            Self::Composite(group) => group.footprint(canvas, scale, style),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, origin: Pos2, scale: f32, style: &StyleEntry) {
        match self {
            Self::Leaf(leaf) => leaf.render(canvas, origin, scale, style),
            Self::Composite(group) => group.render(canvas, origin, scale, style),
        }
    }
}
