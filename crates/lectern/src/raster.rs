//! Offscreen rasters and the software canvas that produces them.
//!
//! Transition snapshots and image items both hold a [`Raster`]: an immutable RGBA buffer with a
//! process-unique id, so a GPU-backed canvas can cache one texture per raster.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use eframe::egui::{self, Color32, Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage};

use crate::canvas::{Canvas, FontSpec, Typeface};
use crate::error::RasterError;
use crate::slide::Slide;
use crate::style::StyleTable;

/// Largest snapshot edge, in pixels.
pub const MAX_SNAPSHOT_SIDE: u32 = 8192;

static NEXT_RASTER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RasterId(u64);

impl RasterId {
    fn next() -> Self {
        Self(NEXT_RASTER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// An immutable RGBA pixel buffer (straight alpha).
#[derive(Debug, Clone)]
pub struct Raster {
    id: RasterId,
    pixels: Arc<RgbaImage>,
}

impl Raster {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            id: RasterId::next(),
            pixels: Arc::new(pixels),
        }
    }

    /// A raster filled with a single color.
    pub fn solid(width: u32, height: u32, color: Color32) -> Self {
        Self::new(RgbaImage::from_pixel(
            width,
            height,
            Rgba(color.to_srgba_unmultiplied()),
        ))
    }

    pub fn load(path: &Path) -> Result<Self, RasterError> {
        Ok(Self::new(image::open(path)?.into_rgba8()))
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RasterError> {
        self.pixels.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    pub fn id(&self) -> RasterId {
        self.id
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Vec2 {
        egui::vec2(self.width() as f32, self.height() as f32)
    }
}

/// An outline font plus the size tweak egui applies to it.
#[derive(Clone)]
struct GlyphFace {
    font: FontArc,
    tweak_scale: f32,
}

impl GlyphFace {
    /// egui sizes are em sizes while `PxScale` is the ascent-to-descent height, so convert the
    /// same way epaint does.
    fn px_scale(&self, size: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1.0);
        PxScale::from(size * self.tweak_scale * self.font.height_unscaled() / units_per_em)
    }
}

/// Outline fonts for software text rendering.
#[derive(Clone, Default)]
pub struct GlyphFonts {
    proportional: Option<GlyphFace>,
    monospace: Option<GlyphFace>,
}

impl GlyphFonts {
    /// The fonts egui ships with, so snapshots look like the live view.
    pub fn egui_defaults() -> Self {
        let definitions = egui::FontDefinitions::default();
        let load = |family: egui::FontFamily| {
            let name = definitions.families.get(&family)?.first()?;
            let data = definitions.font_data.get(name)?;
            let font = FontArc::try_from_vec(data.font.to_vec()).ok()?;
            Some(GlyphFace {
                font,
                tweak_scale: data.tweak.scale,
            })
        };
        let fonts = Self {
            proportional: load(egui::FontFamily::Proportional),
            monospace: load(egui::FontFamily::Monospace),
        };
        if fonts.proportional.is_none() {
            tracing::warn!("no default proportional font available; snapshot text will be blank");
        }
        fonts
    }

    /// No fonts: text is measured approximately and not drawn.
    pub fn none() -> Self {
        Self::default()
    }

    fn face(&self, typeface: Typeface) -> Option<&GlyphFace> {
        match typeface {
            Typeface::Proportional => self.proportional.as_ref(),
            Typeface::Monospace => self.monospace.as_ref().or(self.proportional.as_ref()),
        }
    }

    pub fn measure(&self, text: &str, font: &FontSpec) -> Vec2 {
        if text.is_empty() {
            return Vec2::ZERO;
        }
        let size = font.effective_size();
        let Some(face) = self.face(font.typeface) else {
            return egui::vec2(text.chars().count() as f32 * size * 0.5, size);
        };
        let scaled = face.font.as_scaled(face.px_scale(size));
        let mut width = 0.0;
        let mut previous = None;
        for ch in text.chars() {
            let glyph = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, glyph);
            }
            width += scaled.h_advance(glyph);
            previous = Some(glyph);
        }
        egui::vec2(width, scaled.height() + scaled.line_gap())
    }
}

/// A [`Canvas`] that draws into an owned RGBA buffer.
pub struct RasterCanvas {
    image: RgbaImage,
    fonts: GlyphFonts,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, fonts: GlyphFonts) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            fonts,
        }
    }

    pub fn clear(&mut self, color: Color32) {
        let pixel = Rgba(color.to_srgba_unmultiplied());
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn into_raster(self) -> Raster {
        Raster::new(self.image)
    }

    /// Integer pixel span covered by `rect`, clipped to the buffer.
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.min.x.round().max(0.0);
        let y0 = rect.min.y.round().max(0.0);
        let x1 = rect.max.x.round().min(self.image.width() as f32);
        let y1 = rect.max.y.round().min(self.image.height() as f32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn blend(&mut self, x: i64, y: i64, color: [u8; 4], coverage: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let src_a = color[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            *dst = Rgba([0, 0, 0, 0]);
            return;
        }
        for c in 0..3 {
            let value =
                (color[c] as f32 * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
            dst[c] = value.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round() as u8;
    }

    fn stamp(&mut self, center: Pos2, width: f32, color: [u8; 4]) {
        let half = (width / 2.0).max(0.5);
        let x0 = (center.x - half).floor() as i64;
        let x1 = (center.x + half).ceil() as i64;
        let y0 = (center.y - half).floor() as i64;
        let y1 = (center.y + half).ceil() as i64;
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color, 1.0);
            }
        }
    }
}

impl Canvas for RasterCanvas {
    fn measure_text(&self, text: &str, font: &FontSpec) -> Vec2 {
        self.fonts.measure(text, font)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let rgba = color.to_srgba_unmultiplied();
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x as i64, y as i64, rgba, 1.0);
            }
        }
    }

    fn draw_text(&mut self, pos: Pos2, text: &str, font: &FontSpec, color: Color32) {
        let Some(glyph_face) = self.fonts.face(font.typeface).cloned() else {
            return;
        };
        let rgba = color.to_srgba_unmultiplied();
        let scale = glyph_face.px_scale(font.effective_size());
        let face = glyph_face.font;
        let scaled = face.as_scaled(scale);
        let mut caret = point(pos.x, pos.y + scaled.ascent());
        let mut previous = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret.x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = face.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let (left, top) = (bounds.min.x as i64, bounds.min.y as i64);
                outlined.draw(|gx, gy, coverage| {
                    self.blend(left + gx as i64, top + gy as i64, rgba, coverage);
                });
            }
        }
    }

    fn stroke_polyline(&mut self, points: &[Pos2], closed: bool, width: f32, color: Color32) {
        if points.len() < 2 {
            return;
        }
        let rgba = color.to_srgba_unmultiplied();
        let mut segments: Vec<(Pos2, Pos2)> = points.windows(2).map(|w| (w[0], w[1])).collect();
        if closed {
            segments.push((points[points.len() - 1], points[0]));
        }
        for (a, b) in segments {
            let delta = b - a;
            let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as u32;
            for i in 0..=steps {
                let t = i as f32 / steps as f32;
                self.stamp(a + delta * t, width, rgba);
            }
        }
    }

    fn draw_raster(&mut self, raster: &Raster, rect: Rect, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 || rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let src = raster.pixels();
        let (src_w, src_h) = (src.width(), src.height());
        if src_w == 0 || src_h == 0 {
            return;
        }
        for y in y0..y1 {
            let v = ((y as f32 + 0.5 - rect.min.y) / rect.height() * src_h as f32) as u32;
            for x in x0..x1 {
                let u = ((x as f32 + 0.5 - rect.min.x) / rect.width() * src_w as f32) as u32;
                let texel = src.get_pixel(u.min(src_w - 1), v.min(src_h - 1)).0;
                self.blend(x as i64, y as i64, texel, opacity);
            }
        }
    }
}

/// Produces offscreen snapshots of slides.
pub trait Rasterize {
    fn rasterize(
        &self,
        slide: &Slide,
        styles: &StyleTable,
        viewport: Vec2,
    ) -> Result<Raster, RasterError>;
}

/// Software rasterizer: clears to the theme background and draws the slide through a
/// [`RasterCanvas`].
#[derive(Clone, Default)]
pub struct SlideRasterizer {
    fonts: GlyphFonts,
}

impl SlideRasterizer {
    pub fn new() -> Self {
        Self::with_fonts(GlyphFonts::egui_defaults())
    }

    pub fn with_fonts(fonts: GlyphFonts) -> Self {
        Self { fonts }
    }
}

impl Rasterize for SlideRasterizer {
    fn rasterize(
        &self,
        slide: &Slide,
        styles: &StyleTable,
        viewport: Vec2,
    ) -> Result<Raster, RasterError> {
        let (width, height) = snapshot_size(viewport)?;
        let mut canvas = RasterCanvas::new(width, height, self.fonts.clone());
        canvas.clear(styles.background());
        let area = Rect::from_min_size(Pos2::ZERO, egui::vec2(width as f32, height as f32));
        slide.draw(&mut canvas, area, styles)?;
        Ok(canvas.into_raster())
    }
}

/// Pixel dimensions for a snapshot of `viewport`.
pub fn snapshot_size(viewport: Vec2) -> Result<(u32, u32), RasterError> {
    // Written as a negated comparison so NaN sizes are rejected too.
    if !(viewport.x >= 1.0 && viewport.y >= 1.0) {
        return Err(RasterError::EmptyViewport {
            width: viewport.x,
            height: viewport.y,
        });
    }
    let width = viewport.x.round() as u32;
    let height = viewport.y.round() as u32;
    if width > MAX_SNAPSHOT_SIDE || height > MAX_SNAPSHOT_SIDE {
        return Err(RasterError::TooLarge {
            width,
            height,
            max: MAX_SNAPSHOT_SIDE,
        });
    }
    Ok((width, height))
}
