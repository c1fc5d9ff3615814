use crate::error::DeckError;
use crate::observer::{ObserverHandle, ObserverSet};
use crate::slide::{Slide, SlideId};

pub const DEFAULT_TITLE: &str = "New Presentation";

/// An ordered deck of slides with a current position.
///
/// Every successful mutation runs exactly one synchronous notification pass over the registered
/// observers. Failed operations leave the deck untouched and notify nobody.
#[derive(Debug)]
pub struct Presentation {
    title: String,
    slides: Vec<Slide>,
    current: Option<usize>,
    observers: ObserverSet,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Presentation {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            slides: Vec::new(),
            current: None,
            observers: ObserverSet::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.notify_observers();
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slide(&self, index: usize) -> Result<&Slide, DeckError> {
        self.slides.get(index).ok_or(DeckError::Index {
            index,
            len: self.slides.len(),
        })
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_by_id(&self, id: SlideId) -> Option<&Slide> {
        self.slides.iter().find(|slide| slide.id() == id)
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.current.and_then(|index| self.slides.get(index))
    }

    /// Zero-based index of the current slide, `None` before the first selection.
    pub fn slide_number(&self) -> Option<usize> {
        self.current
    }

    pub fn append(&mut self, slide: Slide) {
        self.slides.push(slide);
        self.notify_observers();
    }

    /// Remove and return the slide at `index`.
    ///
    /// The current position follows the slide it pointed at. If that slide is the one removed,
    /// the position stays at `index` (or the new last slide), and becomes `None` once the deck
    /// is empty.
    pub fn remove_at(&mut self, index: usize) -> Result<Slide, DeckError> {
        DeckError::check_index(index, self.slides.len())?;
        let removed = self.slides.remove(index);
        self.current = match self.current {
            Some(current) if current == index => {
                self.slides.len().checked_sub(1).map(|last| index.min(last))
            }
            Some(current) if current > index => Some(current - 1),
            other => other,
        };
        self.notify_observers();
        Ok(removed)
    }

    /// Select a slide, or deselect with `None`. Observers are notified even if nothing changed.
    pub fn set_slide_number(&mut self, number: Option<usize>) -> Result<(), DeckError> {
        if let Some(requested) = number.filter(|&n| n >= self.slides.len()) {
            return Err(DeckError::Range {
                requested,
                len: self.slides.len(),
            });
        }
        self.current = number;
        self.notify_observers();
        Ok(())
    }

    /// Advance one slide. Returns `false` (and notifies nobody) at the last slide.
    pub fn next_slide(&mut self) -> bool {
        let next = match self.current {
            None if !self.slides.is_empty() => 0,
            Some(current) if current + 1 < self.slides.len() => current + 1,
            _ => return false,
        };
        self.current = Some(next);
        self.notify_observers();
        true
    }

    /// Go back one slide. Returns `false` (and notifies nobody) at the first slide.
    pub fn previous_slide(&mut self) -> bool {
        match self.current {
            Some(current) if current > 0 => {
                self.current = Some(current - 1);
                self.notify_observers();
                true
            }
            _ => false,
        }
    }

    /// Jump to the first slide; a no-op on an empty deck.
    pub fn first_slide(&mut self) -> bool {
        if self.slides.is_empty() || self.current == Some(0) {
            return false;
        }
        self.current = Some(0);
        self.notify_observers();
        true
    }

    /// Jump to the last slide; a no-op on an empty deck.
    pub fn last_slide(&mut self) -> bool {
        let Some(last) = self.slides.len().checked_sub(1) else {
            return false;
        };
        if self.current == Some(last) {
            return false;
        }
        self.current = Some(last);
        self.notify_observers();
        true
    }

    /// Drop every slide.
    pub fn clear(&mut self) {
        self.slides.clear();
        self.current = None;
        self.notify_observers();
    }

    /// Mutate one slide in place, then notify once.
    pub fn edit_slide<R>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut Slide) -> R,
    ) -> Result<R, DeckError> {
        let len = self.slides.len();
        let slide = self
            .slides
            .get_mut(index)
            .ok_or(DeckError::Index { index, len })?;
        let result = edit(slide);
        self.notify_observers();
        Ok(result)
    }

    /// Returns `false` if `observer` was already registered.
    pub fn add_observer(&mut self, observer: ObserverHandle) -> bool {
        self.observers.add(observer)
    }

    /// Returns `false` if `observer` was not registered.
    pub fn remove_observer(&mut self, observer: &ObserverHandle) -> bool {
        self.observers.remove(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Run one notification pass. Returns the number of observers that failed.
    pub fn notify_observers(&self) -> usize {
        tracing::debug!(
            current = ?self.current,
            slides = self.slides.len(),
            observers = self.observers.len(),
            "notifying observers"
        );
        self.observers.notify_all(self, self.current_slide())
    }
}
