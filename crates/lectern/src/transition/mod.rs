//! Slide transitions.
//!
//! A [`TransitionEngine`] owns two offscreen snapshots while a transition runs and advances
//! through a fixed number of steps, one per tick. The event loop drives it, either by calling
//! [`TransitionEngine::tick`] from its own timer or by handing the current time to
//! [`TransitionEngine::poll`] every frame.

pub mod effect;

use std::time::{Duration, Instant};

use eframe::egui::{Rect, Vec2};

use crate::canvas::Canvas;
use crate::error::{RasterError, TransitionError};
use crate::raster::{Raster, RasterId, Rasterize, SlideRasterizer};
use crate::slide::Slide;
use crate::style::StyleTable;

pub use effect::{Effect, EffectLibrary, Fade, Push, PushDirection};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(500);
pub const DEFAULT_STEPS: u32 = 20;

/// Total duration and step count of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    pub duration: Duration,
    pub steps: u32,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            steps: DEFAULT_STEPS,
        }
    }
}

impl TransitionTiming {
    pub fn new(duration: Duration, steps: u32) -> Self {
        Self { duration, steps }
    }

    /// Time between two ticks; zero when there are no steps.
    pub fn tick_interval(&self) -> Duration {
        if self.steps == 0 {
            Duration::ZERO
        } else {
            self.duration / self.steps
        }
    }
}

/// Result of asking the engine to start a transition.
#[derive(Debug)]
pub enum TransitionStart {
    /// Snapshots taken; the engine is running.
    Started,
    /// Zero steps configured; the engine is idle and the destination should be drawn directly.
    Completed,
    /// A snapshot could not be taken; the engine is idle.
    Skipped(RasterError),
}

impl TransitionStart {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No transition is running.
    Idle,
    /// Running, but no tick was due yet. Only returned by [`TransitionEngine::poll`].
    Pending,
    /// The transition advanced and the view should repaint.
    Repaint { progress: f32 },
    /// The last step was reached; the engine is idle again.
    Finished,
}

enum State {
    Idle,
    Running {
        from: Raster,
        to: Raster,
        step: u32,
        next_deadline: Option<Instant>,
    },
}

pub struct TransitionEngine {
    effects: EffectLibrary,
    current_effect: usize,
    timing: TransitionTiming,
    rasterizer: Box<dyn Rasterize>,
    state: State,
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new(Box::new(SlideRasterizer::new()))
    }
}

impl TransitionEngine {
    pub fn new(rasterizer: Box<dyn Rasterize>) -> Self {
        Self {
            effects: EffectLibrary::standard(),
            current_effect: 0,
            timing: TransitionTiming::default(),
            rasterizer,
            state: State::Idle,
        }
    }

    pub fn with_timing(mut self, timing: TransitionTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Replace the effect cycle. The first effect becomes current.
    pub fn with_effects(mut self, effects: EffectLibrary) -> Self {
        self.effects = effects;
        self.current_effect = 0;
        self
    }

    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    pub fn tick_interval(&self) -> Duration {
        self.timing.tick_interval()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    /// Fraction of the running transition completed, `None` when idle.
    pub fn progress(&self) -> Option<f32> {
        match &self.state {
            State::Running { step, .. } => Some(self.progress_at(*step)),
            State::Idle => None,
        }
    }

    fn progress_at(&self, step: u32) -> f32 {
        if self.timing.steps == 0 {
            1.0
        } else {
            step as f32 / self.timing.steps as f32
        }
    }

    /// Snapshot both slides at `viewport` size and start animating between them.
    ///
    /// A running transition is cancelled first, whatever the outcome.
    pub fn start_transition(
        &mut self,
        from: &Slide,
        to: &Slide,
        styles: &StyleTable,
        viewport: Vec2,
    ) -> TransitionStart {
        self.cancel();
        if self.timing.steps == 0 {
            return TransitionStart::Completed;
        }
        let snapshots = self
            .rasterizer
            .rasterize(from, styles, viewport)
            .and_then(|first| Ok((first, self.rasterizer.rasterize(to, styles, viewport)?)));
        match snapshots {
            Ok((from, to)) => self.start_with_rasters(from, to),
            Err(e) => {
                tracing::warn!(
                    from = from.title(),
                    to = to.title(),
                    error = %e,
                    "transition skipped"
                );
                TransitionStart::Skipped(e)
            }
        }
    }

    /// Start animating between two existing snapshots.
    pub fn start_with_rasters(&mut self, from: Raster, to: Raster) -> TransitionStart {
        self.cancel();
        if self.timing.steps == 0 {
            return TransitionStart::Completed;
        }
        tracing::debug!(
            effect = self.current_effect_name(),
            steps = self.timing.steps,
            "transition started"
        );
        self.state = State::Running {
            from,
            to,
            step: 0,
            next_deadline: None,
        };
        TransitionStart::Started
    }

    /// Stop any running transition and drop its snapshots. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = State::Idle;
        was_running
    }

    /// Advance one step.
    pub fn tick(&mut self) -> TickOutcome {
        let step = match &mut self.state {
            State::Running { step, .. } => {
                *step += 1;
                *step
            }
            State::Idle => return TickOutcome::Idle,
        };
        if step >= self.timing.steps {
            self.state = State::Idle;
            tracing::debug!("transition finished");
            TickOutcome::Finished
        } else {
            TickOutcome::Repaint {
                progress: self.progress_at(step),
            }
        }
    }

    /// Run every tick whose deadline is at or before `now`.
    ///
    /// The first poll after a start arms the clock.
    pub fn poll(&mut self, now: Instant) -> TickOutcome {
        let interval = self.timing.tick_interval();
        let mut deadline = match &mut self.state {
            State::Running { next_deadline, .. } => *next_deadline.get_or_insert(now + interval),
            State::Idle => return TickOutcome::Idle,
        };

        let mut outcome = TickOutcome::Pending;
        while now >= deadline {
            outcome = self.tick();
            if outcome == TickOutcome::Finished {
                return outcome;
            }
            deadline += interval;
        }
        if let State::Running { next_deadline, .. } = &mut self.state {
            *next_deadline = Some(deadline);
        }
        outcome
    }

    /// How long the event loop may sleep before the next [`poll`](Self::poll).
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        match &self.state {
            State::Running {
                next_deadline: Some(deadline),
                ..
            } => Some(deadline.saturating_duration_since(now)),
            State::Running { .. } => Some(self.tick_interval()),
            State::Idle => None,
        }
    }

    /// Draw the current frame of the transition. Draws nothing when idle.
    pub fn draw_transition(&self, canvas: &mut dyn Canvas, area: Rect) {
        let State::Running { from, to, step, .. } = &self.state else {
            return;
        };
        if let Some(effect) = self.effects.get(self.current_effect) {
            effect.composite(canvas, area, from, to, self.progress_at(*step));
        }
    }

    /// Ids of the snapshots currently held, for releasing textures of dropped ones.
    pub fn raster_ids(&self) -> Vec<RasterId> {
        match &self.state {
            State::Running { from, to, .. } => vec![from.id(), to.id()],
            State::Idle => Vec::new(),
        }
    }

    /// Move to the next effect in the cycle and return its name.
    pub fn cycle_effect(&mut self) -> &'static str {
        self.current_effect = (self.current_effect + 1) % self.effects.len().max(1);
        self.current_effect_name()
    }

    pub fn current_effect_name(&self) -> &'static str {
        self.effects
            .get(self.current_effect)
            .map_or("None", |effect| effect.name())
    }

    pub fn select_effect(&mut self, name: &str) -> Result<(), TransitionError> {
        self.current_effect = self.effects.position(name)?;
        Ok(())
    }

    pub fn effect_names(&self) -> Vec<&'static str> {
        self.effects.names()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::Cell;
    use std::rc::Rc;

    use eframe::egui::Color32;

    use super::*;

    /// Rasterizer double: returns solid snapshots, or fails on demand, and counts calls.
    #[derive(Clone, Default)]
    pub struct FakeRasterizer {
        pub calls: Rc<Cell<usize>>,
        pub fail: Rc<Cell<bool>>,
    }

    impl Rasterize for FakeRasterizer {
        fn rasterize(
            &self,
            _slide: &Slide,
            _styles: &StyleTable,
            viewport: Vec2,
        ) -> Result<Raster, RasterError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(RasterError::EmptyViewport {
                    width: viewport.x,
                    height: viewport.y,
                });
            }
            Ok(Raster::solid(4, 4, Color32::GRAY))
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{self, Color32};

    use super::testing::FakeRasterizer;
    use super::*;
    use crate::canvas::recording::RecordingCanvas;

    fn engine() -> (TransitionEngine, FakeRasterizer) {
        let rasterizer = FakeRasterizer::default();
        (TransitionEngine::new(Box::new(rasterizer.clone())), rasterizer)
    }

    fn viewport() -> Vec2 {
        egui::vec2(1200.0, 800.0)
    }

    fn area() -> Rect {
        Rect::from_min_size(egui::Pos2::ZERO, viewport())
    }

    fn raster() -> Raster {
        Raster::solid(2, 2, Color32::WHITE)
    }

    #[test]
    fn default_timing_is_twenty_steps_over_half_a_second() {
        let timing = TransitionTiming::default();
        assert_eq!(timing.steps, 20);
        assert_eq!(timing.tick_interval(), Duration::from_millis(25));
        assert_eq!(TransitionTiming::new(Duration::from_millis(500), 0).tick_interval(), Duration::ZERO);
    }

    #[test]
    fn runs_for_exactly_the_configured_steps() {
        let (mut engine, _) = engine();
        engine.start_with_rasters(raster(), raster());
        for step in 1..20 {
            assert_eq!(
                engine.tick(),
                TickOutcome::Repaint {
                    progress: step as f32 / 20.0
                }
            );
            assert!(engine.is_running());
        }
        assert_eq!(engine.tick(), TickOutcome::Finished);
        assert!(!engine.is_running());
        assert_eq!(engine.progress(), None);
        assert_eq!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn finished_engine_accepts_a_new_transition() {
        let (mut engine, rasterizer) = engine();
        let styles = StyleTable::new();
        let (a, b, c) = (Slide::new("A"), Slide::new("B"), Slide::new("C"));
        engine.start_transition(&a, &b, &styles, viewport());
        for _ in 1..20 {
            engine.tick();
        }
        assert_eq!(engine.tick(), TickOutcome::Finished);

        let start = engine.start_transition(&b, &c, &styles, viewport());
        assert!(matches!(start, TransitionStart::Started));
        assert!(engine.is_running());
        assert_eq!(engine.progress(), Some(0.0));
        assert_eq!(rasterizer.calls.get(), 4);
    }

    #[test]
    fn start_transition_snapshots_both_slides() {
        let (mut engine, rasterizer) = engine();
        let styles = StyleTable::new();
        let start = engine.start_transition(&Slide::new("A"), &Slide::new("B"), &styles, viewport());
        assert!(start.is_started());
        assert_eq!(rasterizer.calls.get(), 2);
        assert_eq!(engine.progress(), Some(0.0));
        assert_eq!(engine.raster_ids().len(), 2);
    }

    #[test]
    fn restart_replaces_snapshots_and_resets_progress() {
        let (mut engine, _) = engine();
        let (a, b, c) = (raster(), raster(), raster());
        engine.start_with_rasters(a, b.clone());
        engine.tick();
        engine.tick();

        engine.start_with_rasters(b.clone(), c.clone());
        assert_eq!(engine.progress(), Some(0.0));
        assert_eq!(engine.raster_ids(), vec![b.id(), c.id()]);

        let mut canvas = RecordingCanvas::new();
        engine.draw_transition(&mut canvas, area());
        let drawn: Vec<RasterId> = canvas.rasters().iter().map(|r| r.0).collect();
        assert_eq!(drawn, vec![b.id(), c.id()]);
    }

    #[test]
    fn rasterization_failure_leaves_engine_idle() {
        let (mut engine, rasterizer) = engine();
        engine.start_with_rasters(raster(), raster());
        rasterizer.fail.set(true);

        let styles = StyleTable::new();
        let start = engine.start_transition(&Slide::new("A"), &Slide::new("B"), &styles, viewport());
        assert!(matches!(start, TransitionStart::Skipped(RasterError::EmptyViewport { .. })));
        assert!(!engine.is_running());
        assert!(engine.raster_ids().is_empty());
    }

    #[test]
    fn zero_steps_completes_immediately() {
        let rasterizer = FakeRasterizer::default();
        let mut engine = TransitionEngine::new(Box::new(rasterizer.clone()))
            .with_timing(TransitionTiming::new(DEFAULT_DURATION, 0));

        assert!(matches!(
            engine.start_with_rasters(raster(), raster()),
            TransitionStart::Completed
        ));
        let styles = StyleTable::new();
        let start = engine.start_transition(&Slide::new("A"), &Slide::new("B"), &styles, viewport());
        assert!(matches!(start, TransitionStart::Completed));
        assert!(!engine.is_running());
        assert_eq!(rasterizer.calls.get(), 0);
    }

    #[test]
    fn draws_nothing_when_idle() {
        let (engine, _) = engine();
        let mut canvas = RecordingCanvas::new();
        engine.draw_transition(&mut canvas, area());
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn draw_uses_the_current_effect() {
        let (mut engine, _) = engine();
        let (from, to) = (raster(), raster());
        engine.start_with_rasters(from.clone(), to.clone());
        for _ in 0..10 {
            engine.tick();
        }

        let mut canvas = RecordingCanvas::new();
        engine.draw_transition(&mut canvas, area());
        assert_eq!(
            canvas.rasters(),
            vec![(from.id(), area(), 1.0), (to.id(), area(), 0.5)]
        );
    }

    #[test]
    fn poll_fires_due_ticks() {
        let (mut engine, _) = engine();
        let t0 = Instant::now();
        engine.start_with_rasters(raster(), raster());

        assert_eq!(engine.time_until_next_tick(t0), Some(Duration::from_millis(25)));
        assert_eq!(engine.poll(t0), TickOutcome::Pending);
        assert_eq!(
            engine.poll(t0 + Duration::from_millis(25)),
            TickOutcome::Repaint { progress: 0.05 }
        );
        assert_eq!(
            engine.time_until_next_tick(t0 + Duration::from_millis(30)),
            Some(Duration::from_millis(20))
        );
        assert_eq!(
            engine.poll(t0 + Duration::from_millis(80)),
            TickOutcome::Repaint { progress: 0.15 }
        );
        assert_eq!(engine.poll(t0 + Duration::from_secs(1)), TickOutcome::Finished);
        assert_eq!(engine.poll(t0 + Duration::from_secs(2)), TickOutcome::Idle);
        assert_eq!(engine.time_until_next_tick(t0), None);
    }

    #[test]
    fn effect_cycle_wraps() {
        let (mut engine, _) = engine();
        assert_eq!(engine.current_effect_name(), "Fade");
        assert_eq!(engine.cycle_effect(), "Slide Left");
        assert_eq!(engine.cycle_effect(), "Slide Right");
        assert_eq!(engine.cycle_effect(), "Fade");
    }

    #[test]
    fn select_effect_by_name() {
        let (mut engine, _) = engine();
        engine.select_effect("slide right").unwrap();
        assert_eq!(engine.current_effect_name(), "Slide Right");
        assert!(engine.select_effect("Dissolve").is_err());
        assert_eq!(engine.current_effect_name(), "Slide Right");
    }
}
