use eframe::egui::{self, Rect};

use crate::canvas::Canvas;
use crate::error::TransitionError;
use crate::raster::Raster;

/// A visual blend between two slide snapshots.
///
/// Effects are pure: the same inputs always produce the same draw calls, and they never keep
/// state between frames.
pub trait Effect {
    /// Display name, also used to select the effect from configuration.
    fn name(&self) -> &'static str;

    /// Draw the blend of `from` and `to` into `area` at `progress` in `[0, 1]`.
    fn composite(
        &self,
        canvas: &mut dyn Canvas,
        area: Rect,
        from: &Raster,
        to: &Raster,
        progress: f32,
    );
}

/// Cross-fade: the outgoing slide stays opaque and the incoming one fades in over it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fade;

impl Effect for Fade {
    fn name(&self) -> &'static str {
        "Fade"
    }

    fn composite(
        &self,
        canvas: &mut dyn Canvas,
        area: Rect,
        from: &Raster,
        to: &Raster,
        progress: f32,
    ) {
        canvas.draw_raster(from, area, 1.0);
        canvas.draw_raster(to, area, progress.clamp(0.0, 1.0));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushDirection {
    Left,
    Right,
}

/// The incoming slide pushes the outgoing one off screen horizontally.
#[derive(Debug, Clone, Copy)]
pub struct Push {
    direction: PushDirection,
}

impl Push {
    pub fn new(direction: PushDirection) -> Self {
        Self { direction }
    }

    pub fn left() -> Self {
        Self::new(PushDirection::Left)
    }

    pub fn right() -> Self {
        Self::new(PushDirection::Right)
    }

    pub fn direction(&self) -> PushDirection {
        self.direction
    }
}

impl Effect for Push {
    fn name(&self) -> &'static str {
        match self.direction {
            PushDirection::Left => "Slide Left",
            PushDirection::Right => "Slide Right",
        }
    }

    fn composite(
        &self,
        canvas: &mut dyn Canvas,
        area: Rect,
        from: &Raster,
        to: &Raster,
        progress: f32,
    ) {
        let w = area.width();
        let sign = match self.direction {
            PushDirection::Left => -1.0,
            PushDirection::Right => 1.0,
        };
        let from_offset = sign * progress.clamp(0.0, 1.0) * w;
        let to_offset = from_offset - sign * w;

        canvas.draw_raster(from, area.translate(egui::vec2(from_offset, 0.0)), 1.0);
        canvas.draw_raster(to, area.translate(egui::vec2(to_offset, 0.0)), 1.0);
    }
}

/// The ordered set of effects a transition engine cycles through.
pub struct EffectLibrary {
    effects: Vec<Box<dyn Effect>>,
}

impl Default for EffectLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

impl EffectLibrary {
    /// Fade, Slide Left, Slide Right.
    pub fn standard() -> Self {
        Self {
            effects: vec![Box::new(Fade), Box::new(Push::left()), Box::new(Push::right())],
        }
    }

    /// Append an effect to the end of the cycle.
    pub fn with(mut self, effect: Box<dyn Effect>) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Effect> {
        self.effects.get(index).map(|effect| effect.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|effect| effect.name()).collect()
    }

    /// Index of the effect called `name`, ignoring ASCII case. `-` and `_` match a space, so
    /// `slide-left` finds "Slide Left".
    pub fn position(&self, name: &str) -> Result<usize, TransitionError> {
        let wanted = name.replace(['-', '_'], " ");
        self.effects
            .iter()
            .position(|effect| effect.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| TransitionError::UnknownEffect {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::RecordingCanvas;
    use eframe::egui::Color32;

    fn area() -> Rect {
        Rect::from_min_size(egui::pos2(0.0, 20.0), egui::vec2(400.0, 300.0))
    }

    fn snapshots() -> (Raster, Raster) {
        (
            Raster::solid(4, 3, Color32::RED),
            Raster::solid(4, 3, Color32::BLUE),
        )
    }

    #[test]
    fn fade_at_half_draws_destination_half_transparent() {
        let (from, to) = snapshots();
        let mut canvas = RecordingCanvas::new();
        Fade.composite(&mut canvas, area(), &from, &to, 0.5);
        assert_eq!(
            canvas.rasters(),
            vec![(from.id(), area(), 1.0), (to.id(), area(), 0.5)]
        );
    }

    #[test]
    fn fade_endpoints() {
        let (from, to) = snapshots();
        let mut canvas = RecordingCanvas::new();
        Fade.composite(&mut canvas, area(), &from, &to, 0.0);
        Fade.composite(&mut canvas, area(), &from, &to, 1.0);
        let opacities: Vec<f32> = canvas.rasters().iter().map(|r| r.2).collect();
        assert_eq!(opacities, vec![1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn slide_left_moves_both_snapshots_left() {
        let (from, to) = snapshots();
        let mut canvas = RecordingCanvas::new();
        Push::left().composite(&mut canvas, area(), &from, &to, 0.25);
        let drawn = canvas.rasters();
        assert_eq!(drawn[0].1, area().translate(egui::vec2(-100.0, 0.0)));
        assert_eq!(drawn[1].1, area().translate(egui::vec2(300.0, 0.0)));
    }

    #[test]
    fn slide_right_moves_both_snapshots_right() {
        let (from, to) = snapshots();
        let mut canvas = RecordingCanvas::new();
        Push::right().composite(&mut canvas, area(), &from, &to, 0.25);
        let drawn = canvas.rasters();
        assert_eq!(drawn[0].1, area().translate(egui::vec2(100.0, 0.0)));
        assert_eq!(drawn[1].1, area().translate(egui::vec2(-300.0, 0.0)));
    }

    #[test]
    fn push_ends_with_destination_in_place() {
        let (from, to) = snapshots();
        let mut canvas = RecordingCanvas::new();
        Push::left().composite(&mut canvas, area(), &from, &to, 1.0);
        assert_eq!(canvas.rasters()[1].1, area());
    }

    #[test]
    fn standard_library_order() {
        assert_eq!(
            EffectLibrary::standard().names(),
            vec!["Fade", "Slide Left", "Slide Right"]
        );
    }

    struct Cut;

    impl Effect for Cut {
        fn name(&self) -> &'static str {
            "Cut"
        }

        fn composite(&self, canvas: &mut dyn Canvas, area: Rect, _: &Raster, to: &Raster, _: f32) {
            canvas.draw_raster(to, area, 1.0);
        }
    }

    #[test]
    fn custom_effects_join_the_cycle() {
        let library = EffectLibrary::standard().with(Box::new(Cut));
        assert_eq!(library.len(), 4);
        assert_eq!(library.position("cut").unwrap(), 3);
        assert_eq!(library.position("slide_right").unwrap(), 2);
    }

    #[test]
    fn unknown_effect_lists_alternatives() {
        let err = EffectLibrary::standard().position("Wipe").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown transition effect 'Wipe' (available: Fade, Slide Left, Slide Right)"
        );
    }
}
