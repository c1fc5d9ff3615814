//! The built-in demo deck.

use eframe::egui::{self, Color32, Rect};

use crate::canvas::Canvas;
use crate::item::{CompositeItem, ImageItem, ShapeItem, ShapeKind, TextItem};
use crate::presentation::Presentation;
use crate::raster::{GlyphFonts, Raster, RasterCanvas};
use crate::slide::Slide;

pub const DEMO_TITLE: &str = "Demo Presentation";

/// Replace the contents of `presentation` with the demo deck. The selection is left alone.
pub fn load(presentation: &mut Presentation) {
    presentation.clear();
    presentation.set_title(DEMO_TITLE);
    for slide in slides() {
        presentation.append(slide);
    }
}

/// A fresh presentation holding the demo deck.
pub fn presentation() -> Presentation {
    let mut presentation = Presentation::new();
    load(&mut presentation);
    presentation
}

pub fn slides() -> Vec<Slide> {
    vec![introduction(), images(), groups(), shapes(), closing()]
}

fn introduction() -> Slide {
    let mut slide = Slide::new("Lectern");
    slide.append_text(1, "A slide presentation engine");
    slide.append_text(2, "Slides, nested items and animated transitions");
    slide.append_text(4, "Getting around:");
    slide.append_text(4, "Arrow keys, Page Up/Down and Space move between slides");
    slide.append_text(4, "T cycles the transition effect, D toggles the theme");
    slide.append_text(1, "This is the end of the introduction");
    slide
}

fn images() -> Slide {
    let mut slide = Slide::new("Images");
    slide.append_text(1, "A slide with an image");
    slide.append(ImageItem::from_raster(1, "badge.png", badge()));
    slide
}

fn groups() -> Slide {
    let mut group = CompositeItem::new(1, "Group 1");
    group.push(TextItem::new(2, "This text belongs to a group"));
    group.push(ShapeItem::new(2, ShapeKind::Rectangle, 100.0, 50.0));

    let mut slide = Slide::new("Grouped Items");
    slide.append_text(1, "Groups are measured and drawn as one item");
    slide.append(group);
    slide.append_text(1, "A group covers the area of all its children");
    slide
}

fn shapes() -> Slide {
    let mut slide = Slide::new("Shapes");
    slide.append_text(1, "Outlined shapes:");
    slide.append(ShapeItem::new(1, ShapeKind::Rectangle, 150.0, 100.0));
    slide.append(ShapeItem::new(1, ShapeKind::Ellipse, 120.0, 120.0));
    slide.append(ShapeItem::new(1, ShapeKind::Line, 200.0, 80.0));
    slide.append(ShapeItem::new(1, ShapeKind::Triangle, 150.0, 120.0));
    slide
}

fn closing() -> Slide {
    let mut slide = Slide::new("The Final Slide");
    slide.append_text(1, "Press H to list the keys");
    slide.append_text(2, "Q quits and F toggles fullscreen");
    slide.append_text(1, "lectern export saves every slide as a PNG");
    slide.append_text(1, "This is the end of the presentation");
    slide
}

/// A small generated picture, so the image slide needs no files on disk.
fn badge() -> Raster {
    let (width, height) = (240, 160);
    let mut canvas = RasterCanvas::new(width, height, GlyphFonts::none());
    canvas.clear(Color32::from_rgb(0x0F, 0x34, 0x60));
    let inner = Rect::from_min_size(egui::pos2(20.0, 20.0), egui::vec2(200.0, 120.0));
    canvas.fill_rect(inner, Color32::from_rgb(0x52, 0x94, 0xE2));
    canvas.stroke_polyline(
        &[
            egui::pos2(60.0, 120.0),
            egui::pos2(120.0, 40.0),
            egui::pos2(180.0, 120.0),
        ],
        true,
        4.0,
        Color32::WHITE,
    );
    canvas.into_raster()
}
