use std::f32::consts::TAU;

use eframe::egui::{self, Pos2, Rect};

use crate::canvas::Canvas;
use crate::item::Drawable;
use crate::style::StyleEntry;

const STROKE_WIDTH: f32 = 2.0;
const ELLIPSE_SEGMENTS: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
    Triangle,
}

/// An outlined shape with a fixed box in reference pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeItem {
    level: u32,
    kind: ShapeKind,
    width: f32,
    height: f32,
}

impl ShapeItem {
    pub fn new(level: u32, kind: ShapeKind, width: f32, height: f32) -> Self {
        Self {
            level,
            kind,
            width,
            height,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Outline points inside `bounds`, and whether the path closes.
    fn outline(&self, bounds: Rect) -> (Vec<Pos2>, bool) {
        match self.kind {
            ShapeKind::Rectangle => (
                vec![
                    bounds.left_top(),
                    bounds.right_top(),
                    bounds.right_bottom(),
                    bounds.left_bottom(),
                ],
                true,
            ),
            ShapeKind::Ellipse => {
                let center = bounds.center();
                let radius = bounds.size() / 2.0;
                let points = (0..ELLIPSE_SEGMENTS)
                    .map(|i| {
                        let angle = TAU * i as f32 / ELLIPSE_SEGMENTS as f32;
                        center + egui::vec2(radius.x * angle.cos(), radius.y * angle.sin())
                    })
                    .collect();
                (points, true)
            }
            ShapeKind::Line => (vec![bounds.left_top(), bounds.right_bottom()], false),
            ShapeKind::Triangle => (
                vec![
                    bounds.left_bottom(),
                    egui::pos2(bounds.center().x, bounds.top()),
                    bounds.right_bottom(),
                ],
                true,
            ),
        }
    }
}

impl Drawable for ShapeItem {
    fn level(&self) -> u32 {
        self.level
    }

    fn footprint(&self, _canvas: &dyn Canvas, scale: f32, style: &StyleEntry) -> Rect {
        Rect::from_min_size(
            egui::pos2(style.indent() * scale, 0.0),
            egui::vec2(
                self.width * scale,
                style.leading() * scale + self.height * scale,
            ),
        )
    }

    fn render(&self, canvas: &mut dyn Canvas, origin: Pos2, scale: f32, style: &StyleEntry) {
        let min = origin + egui::vec2(style.indent() * scale, style.leading() * scale);
        let bounds = Rect::from_min_size(min, egui::vec2(self.width, self.height) * scale);
        let (points, closed) = self.outline(bounds);
        canvas.stroke_polyline(&points, closed, STROKE_WIDTH, style.color());
    }
}
