use std::path::{Path, PathBuf};

use eframe::egui::{self, Pos2, Rect};

use crate::canvas::Canvas;
use crate::item::Drawable;
use crate::raster::Raster;
use crate::style::StyleEntry;

/// Directory bare image names are resolved against.
pub const IMAGE_DIR: &str = "img";

/// A bitmap drawn at its pixel size times the slide scale.
///
/// An image that failed to load keeps its path for diagnostics, occupies no space and draws
/// nothing.
#[derive(Debug, Clone)]
pub struct ImageItem {
    level: u32,
    path: PathBuf,
    raster: Option<Raster>,
}

impl ImageItem {
    /// Load `name` relative to `base_dir`. A bare file name is looked up in `img/`.
    pub fn load(level: u32, name: &str, base_dir: &Path) -> Self {
        let path = resolve_image_path(name, base_dir);
        let raster = match Raster::load(&path) {
            Ok(raster) => Some(raster),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "image not loaded");
                None
            }
        };
        Self {
            level,
            path,
            raster,
        }
    }

    pub fn from_raster(level: u32, path: impl Into<PathBuf>, raster: Raster) -> Self {
        Self {
            level,
            path: path.into(),
            raster: Some(raster),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.raster.is_some()
    }
}

fn resolve_image_path(name: &str, base_dir: &Path) -> PathBuf {
    let candidate = Path::new(name);
    let has_dir = candidate
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty());
    if candidate.is_absolute() || has_dir {
        base_dir.join(candidate)
    } else {
        base_dir.join(IMAGE_DIR).join(candidate)
    }
}

impl Drawable for ImageItem {
    fn level(&self) -> u32 {
        self.level
    }

    fn footprint(&self, _canvas: &dyn Canvas, scale: f32, style: &StyleEntry) -> Rect {
        let Some(raster) = &self.raster else {
            return Rect::ZERO;
        };
        let size = raster.size() * scale;
        Rect::from_min_size(
            egui::pos2(style.indent() * scale, 0.0),
            egui::vec2(size.x, style.leading() * scale + size.y),
        )
    }

    fn render(&self, canvas: &mut dyn Canvas, origin: Pos2, scale: f32, style: &StyleEntry) {
        let Some(raster) = &self.raster else {
            return;
        };
        let min = origin + egui::vec2(style.indent() * scale, style.leading() * scale);
        canvas.draw_raster(raster, Rect::from_min_size(min, raster.size() * scale), 1.0);
    }
}
