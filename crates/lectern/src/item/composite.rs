use eframe::egui::{Pos2, Rect};

use crate::canvas::Canvas;
use crate::error::DeckError;
use crate::item::{Drawable, SlideItem};
use crate::style::StyleEntry;

/// The smallest rectangle covering every input, or [`Rect::ZERO`] when there are none.
pub fn union_footprints(rects: impl IntoIterator<Item = Rect>) -> Rect {
    rects.into_iter().reduce(Rect::union).unwrap_or(Rect::ZERO)
}

/// A named group of items drawn as one.
///
/// Children share the group's origin, scale and style; the group's footprint is the union of
/// theirs.
#[derive(Debug, Clone)]
pub struct CompositeItem {
    level: u32,
    name: String,
    children: Vec<SlideItem>,
}

impl CompositeItem {
    pub fn new(level: u32, name: impl Into<String>) -> Self {
        Self {
            level,
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn push(&mut self, child: impl Into<SlideItem>) {
        self.children.push(child.into());
    }

    pub fn remove(&mut self, index: usize) -> Result<SlideItem, DeckError> {
        DeckError::check_index(index, self.children.len())?;
        Ok(self.children.remove(index))
    }

    pub fn child(&self, index: usize) -> Result<&SlideItem, DeckError> {
        self.children.get(index).ok_or(DeckError::Index {
            index,
            len: self.children.len(),
        })
    }

    pub fn children(&self) -> &[SlideItem] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Drawable for CompositeItem {
    fn level(&self) -> u32 {
        self.level
    }

    fn footprint(&self, canvas: &dyn Canvas, scale: f32, style: &StyleEntry) -> Rect {
        union_footprints(
            self.children
                .iter()
                .map(|child| child.footprint(canvas, scale, style)),
        )
    }

    fn render(&self, canvas: &mut dyn Canvas, origin: Pos2, scale: f32, style: &StyleEntry) {
        for child in &self.children {
            child.render(canvas, origin, scale, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{DrawOp, RecordingCanvas};
    use crate::item::ShapeKind;
    use crate::style::StyleTable;
    use eframe::egui;
    use proptest::prelude::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_min_size(egui::pos2(x, y), egui::vec2(w, h))
    }

    #[test]
    fn union_of_overlapping_rects() {
        let union = union_footprints([rect(0.0, 0.0, 10.0, 10.0), rect(5.0, 5.0, 20.0, 20.0)]);
        assert_eq!(union, rect(0.0, 0.0, 25.0, 25.0));
    }

    #[test]
    fn union_of_nothing_is_zero() {
        assert_eq!(union_footprints(std::iter::empty()), rect(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn empty_group_has_zero_footprint() {
        let styles = StyleTable::new();
        let canvas = RecordingCanvas::new();
        let group = CompositeItem::new(1, "empty");
        assert_eq!(
            group.footprint(&canvas, 1.0, styles.style(1).unwrap()),
            Rect::ZERO
        );
    }

    #[test]
    fn group_footprint_covers_largest_child() {
        let styles = StyleTable::new();
        let style = styles.style(0).unwrap(); // indent 0, leading 48
        let canvas = RecordingCanvas::new();
        let mut group = CompositeItem::new(0, "shapes");
        group.push(SlideItem::shape(0, ShapeKind::Rectangle, 10.0, 10.0));
        group.push(SlideItem::shape(0, ShapeKind::Ellipse, 30.0, 5.0));

        assert_eq!(
            group.footprint(&canvas, 1.0, style),
            rect(0.0, 0.0, 30.0, 58.0)
        );
    }

    #[test]
    fn nested_groups_aggregate_recursively() {
        let styles = StyleTable::new();
        let style = styles.style(0).unwrap();
        let canvas = RecordingCanvas::new();

        let mut inner = CompositeItem::new(0, "inner");
        inner.push(SlideItem::shape(0, ShapeKind::Line, 80.0, 2.0));
        let mut outer = CompositeItem::new(0, "outer");
        outer.push(SlideItem::shape(0, ShapeKind::Rectangle, 10.0, 100.0));
        outer.push(inner);

        assert_eq!(
            outer.footprint(&canvas, 1.0, style),
            rect(0.0, 0.0, 80.0, 148.0)
        );
    }

    #[test]
    fn render_draws_children_in_order_at_same_origin() {
        let styles = StyleTable::new();
        let style = styles.style(0).unwrap();
        let mut canvas = RecordingCanvas::new();
        let mut group = CompositeItem::new(0, "g");
        group.push(SlideItem::text(0, "first"));
        group.push(SlideItem::text(3, "second"));

        group.render(&mut canvas, egui::pos2(5.0, 7.0), 1.0, style);
        let texts = canvas.texts();
        assert_eq!(texts[0].1, "first");
        assert_eq!(texts[1].1, "second");
        assert_eq!(texts[0].0, texts[1].0);
        assert!(matches!(canvas.ops[0], DrawOp::Text { .. }));
    }

    #[test]
    fn child_access_is_bounds_checked() {
        let mut group = CompositeItem::new(1, "g");
        group.push(SlideItem::text(1, "a"));
        assert!(group.child(0).is_ok());
        assert_eq!(
            group.child(1).unwrap_err(),
            DeckError::Index { index: 1, len: 1 }
        );
        assert!(group.remove(3).is_err());
        assert!(group.remove(0).is_ok());
        assert!(group.is_empty());
    }

    #[test]
    fn rename() {
        let mut group = CompositeItem::new(1, "Group 1");
        group.set_name("Intro");
        assert_eq!(group.name(), "Intro");
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-500i32..500, -500i32..500, 0i32..400, 0i32..400)
            .prop_map(|(x, y, w, h)| rect(x as f32, y as f32, w as f32, h as f32))
    }

    proptest! {
        #[test]
        fn union_is_the_bounding_box(rects in proptest::collection::vec(arb_rect(), 1..12)) {
            let union = union_footprints(rects.clone());
            let left = rects.iter().map(|r| r.left()).fold(f32::INFINITY, f32::min);
            let top = rects.iter().map(|r| r.top()).fold(f32::INFINITY, f32::min);
            let right = rects.iter().map(|r| r.right()).fold(f32::NEG_INFINITY, f32::max);
            let bottom = rects.iter().map(|r| r.bottom()).fold(f32::NEG_INFINITY, f32::max);
            prop_assert_eq!(union, Rect::from_min_max(egui::pos2(left, top), egui::pos2(right, bottom)));
            for r in &rects {
                prop_assert!(union.contains_rect(*r));
            }
        }
    }
}
