//! The slide viewer: an observer that draws the current slide and animates between slides.

use std::time::Instant;

use eframe::egui::{self, Rect, Vec2};

use crate::canvas::{Canvas, FontSpec, FontWeight, Typeface};
use crate::error::{DeckError, TransitionError};
use crate::observer::Observer;
use crate::presentation::Presentation;
use crate::slide::{REFERENCE_HEIGHT, REFERENCE_WIDTH, Slide, SlideId};
use crate::style::StyleTable;
use crate::theme::Theme;
use crate::transition::{TickOutcome, TransitionEngine, TransitionStart};

/// Height of the strip above the slide that holds the slide counter.
pub const COUNTER_STRIP: f32 = 20.0;
/// Distance of the counter from the right edge.
const COUNTER_RIGHT_INSET: f32 = 100.0;
const COUNTER_FONT: FontSpec = FontSpec {
    typeface: Typeface::Proportional,
    size: 10.0,
    weight: FontWeight::Bold,
};

pub struct SlideViewer {
    styles: StyleTable,
    engine: TransitionEngine,
    shown: Option<SlideId>,
    viewport: Vec2,
}

impl Default for SlideViewer {
    fn default() -> Self {
        Self::new(StyleTable::new(), TransitionEngine::default())
    }
}

impl SlideViewer {
    pub fn new(styles: StyleTable, engine: TransitionEngine) -> Self {
        Self {
            styles,
            engine,
            shown: None,
            viewport: egui::vec2(REFERENCE_WIDTH, REFERENCE_HEIGHT),
        }
    }

    /// The part of `area` slides are drawn into, below the counter strip.
    pub fn slide_area(area: Rect) -> Rect {
        Rect::from_min_max(
            egui::pos2(area.left(), (area.top() + COUNTER_STRIP).min(area.bottom())),
            area.max,
        )
    }

    /// Physical pixel size of the slide area, for crisp snapshots on scaled displays.
    pub fn snapshot_viewport(area: Rect, pixels_per_point: f32) -> Vec2 {
        Self::slide_area(area).size() * pixels_per_point
    }

    /// Size future snapshots are taken at. Call whenever the slide area changes.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn engine(&self) -> &TransitionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TransitionEngine {
        &mut self.engine
    }

    /// Id of the slide the viewer last saw selected.
    pub fn shown(&self) -> Option<SlideId> {
        self.shown
    }

    pub fn is_animating(&self) -> bool {
        self.engine.is_running()
    }

    pub fn apply_theme(&mut self, theme: &Theme) {
        self.styles.apply_theme(theme);
    }

    /// Switch between the light and dark themes and return the new theme's name.
    pub fn toggle_theme(&mut self) -> &str {
        let next = Theme::from_name(self.styles.theme_name()).toggled();
        self.styles.apply_theme(&next);
        self.styles.theme_name()
    }

    pub fn cycle_effect(&mut self) -> &'static str {
        self.engine.cycle_effect()
    }

    pub fn select_effect(&mut self, name: &str) -> Result<(), TransitionError> {
        self.engine.select_effect(name)
    }

    /// Advance a running transition from the event loop.
    pub fn on_poll(&mut self, now: Instant) -> TickOutcome {
        self.engine.poll(now)
    }

    /// Draw the whole view. A running transition is drawn alone; otherwise the counter and the
    /// current slide.
    pub fn paint(
        &self,
        presentation: &Presentation,
        canvas: &mut dyn Canvas,
        area: Rect,
    ) -> Result<(), DeckError> {
        canvas.fill_rect(area, self.styles.background());
        let (Some(number), Some(slide)) =
            (presentation.slide_number(), presentation.current_slide())
        else {
            return Ok(());
        };

        let slide_area = Self::slide_area(area);
        // The counter would already name the destination while the old slide is on screen.
        if self.engine.is_running() {
            self.engine.draw_transition(canvas, slide_area);
            return Ok(());
        }

        let label = format!("Slide {} of {}", number + 1, presentation.len());
        canvas.draw_text(
            egui::pos2(area.right() - COUNTER_RIGHT_INSET, area.top()),
            &label,
            &COUNTER_FONT,
            self.styles.foreground(),
        );
        slide.draw(canvas, slide_area, &self.styles)
    }

    fn begin_transition(&mut self, from: &Slide, to: &Slide) {
        match self
            .engine
            .start_transition(from, to, &self.styles, self.viewport)
        {
            TransitionStart::Started => {
                tracing::debug!(from = from.title(), to = to.title(), "animating slide change");
            }
            TransitionStart::Completed | TransitionStart::Skipped(_) => {}
        }
    }
}

impl Observer for SlideViewer {
    fn notify(
        &mut self,
        presentation: &Presentation,
        current: Option<&Slide>,
    ) -> anyhow::Result<()> {
        let next = current.map(Slide::id);
        if next == self.shown {
            return Ok(());
        }
        let previous = self.shown.and_then(|id| presentation.slide_by_id(id));
        self.shown = next;

        // A change during a running transition lets it finish; the new slide is drawn after.
        if let (Some(from), Some(to), false) = (previous, current, self.engine.is_running()) {
            self.begin_transition(from, to);
        }
        Ok(())
    }
}
