//! Drawing surfaces.
//!
//! Slide items never talk to a concrete backend. They draw through [`Canvas`], which is
//! implemented by the live egui painter ([`PainterCanvas`]) and by the software rasterizer
//! used for transition snapshots ([`crate::raster::RasterCanvas`]).

use std::collections::HashMap;

use eframe::egui::{self, Color32, Pos2, Rect, Stroke, Vec2};

use crate::raster::{Raster, RasterId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Typeface {
    Proportional,
    Monospace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// A resolved font request: face, point size and weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub typeface: Typeface,
    pub size: f32,
    pub weight: FontWeight,
}

impl FontSpec {
    /// The default fonts ship without a bold cut, so bold is rendered one point larger.
    pub fn effective_size(&self) -> f32 {
        match self.weight {
            FontWeight::Bold => self.size + 1.0,
            FontWeight::Regular => self.size,
        }
    }

    pub fn font_id(&self) -> egui::FontId {
        let family = match self.typeface {
            Typeface::Proportional => egui::FontFamily::Proportional,
            Typeface::Monospace => egui::FontFamily::Monospace,
        };
        egui::FontId::new(self.effective_size(), family)
    }
}

/// A 2D drawing surface.
pub trait Canvas {
    /// Size of a single line of text, without wrapping.
    fn measure_text(&self, text: &str, font: &FontSpec) -> Vec2;

    fn fill_rect(&mut self, rect: Rect, color: Color32);

    /// Draw a single line of text with its top-left corner at `pos`.
    fn draw_text(&mut self, pos: Pos2, text: &str, font: &FontSpec, color: Color32);

    fn stroke_polyline(&mut self, points: &[Pos2], closed: bool, width: f32, color: Color32);

    /// Draw `raster` stretched over `rect`, multiplied by `opacity` in `[0, 1]`.
    fn draw_raster(&mut self, raster: &Raster, rect: Rect, opacity: f32);
}

/// GPU textures for rasters drawn through a [`PainterCanvas`].
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<RasterId, egui::TextureHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture_id(&mut self, ctx: &egui::Context, raster: &Raster) -> egui::TextureId {
        self.textures
            .entry(raster.id())
            .or_insert_with(|| {
                let pixels = raster.pixels();
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [pixels.width() as usize, pixels.height() as usize],
                    pixels.as_raw(),
                );
                ctx.load_texture(
                    format!("raster-{}", raster.id().get()),
                    image,
                    egui::TextureOptions::LINEAR,
                )
            })
            .id()
    }

    /// Drop every texture whose raster is not in `live`.
    pub fn retain_only(&mut self, live: &[RasterId]) {
        self.textures.retain(|id, _| live.contains(id));
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Live drawing onto an egui painter.
pub struct PainterCanvas<'a> {
    painter: &'a egui::Painter,
    textures: &'a mut TextureCache,
}

impl<'a> PainterCanvas<'a> {
    pub fn new(painter: &'a egui::Painter, textures: &'a mut TextureCache) -> Self {
        Self { painter, textures }
    }
}

impl Canvas for PainterCanvas<'_> {
    fn measure_text(&self, text: &str, font: &FontSpec) -> Vec2 {
        if text.is_empty() {
            return Vec2::ZERO;
        }
        self.painter
            .layout_no_wrap(text.to_owned(), font.font_id(), Color32::WHITE)
            .size()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.painter.rect_filled(rect, 0.0, color);
    }

    fn draw_text(&mut self, pos: Pos2, text: &str, font: &FontSpec, color: Color32) {
        if text.is_empty() {
            return;
        }
        let galley = self
            .painter
            .layout_no_wrap(text.to_owned(), font.font_id(), color);
        self.painter.galley(pos, galley, color);
    }

    fn stroke_polyline(&mut self, points: &[Pos2], closed: bool, width: f32, color: Color32) {
        if points.len() < 2 {
            return;
        }
        let stroke = Stroke::new(width, color);
        let shape = if closed {
            egui::Shape::closed_line(points.to_vec(), stroke)
        } else {
            egui::Shape::line(points.to_vec(), stroke)
        };
        self.painter.add(shape);
    }

    fn draw_raster(&mut self, raster: &Raster, rect: Rect, opacity: f32) {
        let texture = self.textures.texture_id(self.painter.ctx(), raster);
        let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        let tint = Color32::WHITE.gamma_multiply(opacity.clamp(0.0, 1.0));
        self.painter.image(texture, rect, uv, tint);
    }
}
