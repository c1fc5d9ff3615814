use thiserror::Error;

/// Errors raised by the presentation data model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    /// A slide or item position outside the current bounds.
    #[error("index {index} out of bounds (len {len})")]
    Index { index: usize, len: usize },

    /// A slide number that cannot become the current slide.
    #[error("slide number {requested} out of range (deck has {len} slides)")]
    Range { requested: usize, len: usize },

    /// A style level the table cannot resolve, not even to a default entry.
    #[error("no style for level {level} and no default style installed")]
    Configuration { level: u32 },
}

impl DeckError {
    /// Bounds-check `index` against `len`.
    pub(crate) fn check_index(index: usize, len: usize) -> Result<(), DeckError> {
        if index < len {
            Ok(())
        } else {
            Err(DeckError::Index { index, len })
        }
    }
}

/// Errors raised while capturing an offscreen snapshot of a slide.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("viewport {width}x{height} has no area")]
    EmptyViewport { width: f32, height: f32 },

    #[error("viewport {width}x{height} exceeds the {max}px snapshot limit")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("slide could not be drawn: {0}")]
    Draw(#[from] DeckError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("unknown transition effect '{name}' (available: {available})")]
    UnknownEffect { name: String, available: String },
}
