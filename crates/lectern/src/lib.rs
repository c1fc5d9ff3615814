//! Lectern: a slide presentation engine.
//!
//! A [`Presentation`] holds an ordered deck of [`Slide`]s, each built from a tree of
//! [`SlideItem`]s, and tells every registered [`Observer`] about each change. The
//! [`SlideViewer`] observer draws the current slide and, when the selection moves, animates
//! between offscreen snapshots of the two slides with a [`TransitionEngine`].

pub mod canvas;
pub mod config;
pub mod demo;
pub mod error;
pub mod item;
pub mod observer;
pub mod presentation;
pub mod raster;
pub mod slide;
pub mod style;
pub mod theme;
pub mod transition;
pub mod view;

pub use canvas::{Canvas, FontSpec, FontWeight, PainterCanvas, TextureCache, Typeface};
pub use error::{DeckError, RasterError, TransitionError};
pub use item::{
    CompositeItem, Drawable, ImageItem, LeafItem, ShapeItem, ShapeKind, SlideItem, TextItem,
};
pub use observer::{Observer, ObserverHandle};
pub use presentation::Presentation;
pub use raster::{Raster, RasterId, Rasterize, SlideRasterizer};
pub use slide::{Slide, SlideId};
pub use style::{StyleEntry, StyleTable};
pub use theme::Theme;
pub use transition::{
    Effect, EffectLibrary, TickOutcome, TransitionEngine, TransitionStart, TransitionTiming,
};
pub use view::SlideViewer;
