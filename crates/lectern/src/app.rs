use eframe::egui;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use lectern::canvas::{PainterCanvas, TextureCache};
use lectern::config::Config;
use lectern::demo;
use lectern::presentation::Presentation;
use lectern::raster::RasterId;
use lectern::slide::Slide;
use lectern::style::StyleTable;
use lectern::theme::Theme;
use lectern::transition::{TickOutcome, TransitionEngine};
use lectern::view::SlideViewer;

const TOAST_DURATION: f32 = 1.5;
const TOAST_FADE_START: f32 = 1.0;
const DOUBLE_ESC_WINDOW: f32 = 1.0;

const HELP_LINES: &[(&str, &str)] = &[
    ("Right / PgDn / Space / N", "Next slide"),
    ("Left / PgUp / P", "Previous slide"),
    ("Home / End", "First / last slide"),
    ("T", "Cycle transition effect"),
    ("D", "Toggle light / dark theme"),
    ("F", "Toggle fullscreen"),
    ("H", "Show / hide this help"),
    ("Q / Esc Esc", "Quit"),
];

/// Viewer settings from the command line. Unset values fall back to the config file.
pub struct LaunchOptions {
    pub windowed: bool,
    pub slide: Option<usize>,
    pub theme: Option<String>,
    pub transition: Option<String>,
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        if elapsed < TOAST_FADE_START {
            1.0
        } else if elapsed < TOAST_DURATION {
            1.0 - (elapsed - TOAST_FADE_START) / (TOAST_DURATION - TOAST_FADE_START)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_DURATION
    }
}

struct ViewerApp {
    presentation: Presentation,
    viewer: Rc<RefCell<SlideViewer>>,
    textures: TextureCache,
    toast: Option<Toast>,
    last_esc: Option<Instant>,
    show_help: bool,
}

impl ViewerApp {
    fn new(mut presentation: Presentation, viewer: SlideViewer, start: Option<usize>) -> Self {
        let viewer = Rc::new(RefCell::new(viewer));
        presentation.add_observer(viewer.clone());
        if let Some(index) = start {
            // Selected after registration so the viewer starts on it without animating.
            if let Err(e) = presentation.set_slide_number(Some(index)) {
                tracing::warn!(error = %e, "start slide ignored");
            }
        } else {
            presentation.next_slide();
        }
        Self {
            presentation,
            viewer,
            textures: TextureCache::new(),
            toast: None,
            last_esc: None,
            show_help: false,
        }
    }

    fn cycle_transition(&mut self) {
        let name = self.viewer.borrow_mut().cycle_effect();
        self.toast = Some(Toast::new(format!("Transition: {name}")));
    }

    fn toggle_theme(&mut self) {
        let name = self.viewer.borrow_mut().toggle_theme().to_string();
        self.toast = Some(Toast::new(format!("Theme: {name}")));
    }

    /// Texture ids still in use: the running transition's snapshots and every deck image.
    fn live_rasters(&self) -> Vec<RasterId> {
        let mut live = self.viewer.borrow().engine().raster_ids();
        live.extend(self.presentation.slides().iter().flat_map(Slide::raster_ids));
        live
    }

    fn draw_toast(&self, painter: &egui::Painter, rect: egui::Rect, styles: &StyleTable) {
        let Some(ref toast) = self.toast else {
            return;
        };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let scale = Slide::scale_for(rect);
        let theme = Theme::from_name(styles.theme_name());
        let toast_color = Theme::with_opacity(styles.foreground(), opacity * 0.9);
        let toast_bg = Theme::with_opacity(theme.accent, opacity * 0.3);
        let galley = painter.layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(20.0 * scale),
            toast_color,
        );
        let padding = 16.0 * scale;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.bottom() - 80.0 * scale,
            ),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        painter.rect_filled(toast_rect, 8.0 * scale, toast_bg);
        let text_pos = egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding);
        painter.galley(text_pos, galley, toast_color);
    }

    fn draw_help(&self, painter: &egui::Painter, rect: egui::Rect, styles: &StyleTable) {
        let scale = Slide::scale_for(rect);
        let font = egui::FontId::proportional(18.0 * scale);
        let key_color = styles.foreground();
        let text_color = Theme::with_opacity(styles.foreground(), 0.7);
        let line_h = 30.0 * scale;
        let key_col = 260.0 * scale;
        let padding = 24.0 * scale;

        let panel = egui::Rect::from_center_size(
            rect.center(),
            egui::vec2(
                560.0 * scale,
                HELP_LINES.len() as f32 * line_h + padding * 2.0,
            ),
        );
        painter.rect_filled(panel, 8.0 * scale, Theme::with_opacity(styles.background(), 0.92));
        painter.rect_stroke(
            panel,
            8.0 * scale,
            egui::Stroke::new(1.0, Theme::with_opacity(styles.foreground(), 0.3)),
            egui::StrokeKind::Inside,
        );

        for (row, (keys, action)) in HELP_LINES.iter().enumerate() {
            let y = panel.top() + padding + row as f32 * line_h;
            painter.text(
                egui::pos2(panel.left() + padding, y),
                egui::Align2::LEFT_TOP,
                keys,
                font.clone(),
                key_color,
            );
            painter.text(
                egui::pos2(panel.left() + padding + key_col, y),
                egui::Align2::LEFT_TOP,
                action,
                font.clone(),
                text_color,
            );
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }

            // Double-tap to quit
            if i.key_pressed(egui::Key::Escape) {
                if self.show_help {
                    self.show_help = false;
                    return;
                }
                if let Some(last) = self.last_esc {
                    if last.elapsed().as_secs_f32() < DOUBLE_ESC_WINDOW {
                        viewport_cmds.push(egui::ViewportCommand::Close);
                        return;
                    }
                }
                self.last_esc = Some(Instant::now());
                self.toast = Some(Toast::new("Press Esc again to exit".to_string()));
                return;
            }

            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
                return;
            }

            if i.key_pressed(egui::Key::D) {
                self.toggle_theme();
                return;
            }

            if i.key_pressed(egui::Key::T) {
                self.cycle_transition();
                return;
            }

            if i.key_pressed(egui::Key::H) {
                self.show_help = !self.show_help;
            }

            if i.key_pressed(egui::Key::ArrowRight)
                || i.key_pressed(egui::Key::PageDown)
                || i.key_pressed(egui::Key::Space)
                || i.key_pressed(egui::Key::N)
            {
                self.presentation.next_slide();
            }
            if i.key_pressed(egui::Key::ArrowLeft)
                || i.key_pressed(egui::Key::PageUp)
                || i.key_pressed(egui::Key::P)
            {
                self.presentation.previous_slide();
            }
            if i.key_pressed(egui::Key::Home) {
                self.presentation.first_slide();
            }
            if i.key_pressed(egui::Key::End) {
                self.presentation.last_slide();
            }
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        // Advance the transition on its tick schedule
        let now = Instant::now();
        let outcome = self.viewer.borrow_mut().on_poll(now);
        if outcome == TickOutcome::Finished {
            let live = self.live_rasters();
            self.textures.retain_only(&live);
        }
        if let Some(wait) = self.viewer.borrow().engine().time_until_next_tick(now) {
            ctx.request_repaint_after(wait);
        }

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let background = self.viewer.borrow().styles().background();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(background).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let painter = ui.painter().with_clip_rect(rect);

                // Snapshots for the next transition match the current slide area
                let viewport = SlideViewer::snapshot_viewport(rect, ctx.pixels_per_point());
                self.viewer.borrow_mut().set_viewport(viewport);
                self.paint(&painter, rect);

                let viewer = self.viewer.borrow();
                self.draw_toast(&painter, rect, viewer.styles());
                if self.show_help {
                    self.draw_help(&painter, rect, viewer.styles());
                }
                if self.toast.is_some() {
                    ctx.request_repaint();
                }
            });
    }
}

impl ViewerApp {
    fn paint(&mut self, painter: &egui::Painter, rect: egui::Rect) {
        let viewer = self.viewer.borrow();
        let mut canvas = PainterCanvas::new(painter, &mut self.textures);
        if let Err(e) = viewer.paint(&self.presentation, &mut canvas, rect) {
            tracing::error!(error = %e, "slide could not be drawn");
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                e.to_string(),
                egui::FontId::proportional(18.0),
                viewer.styles().foreground(),
            );
        }
    }
}

pub fn run(options: LaunchOptions) -> anyhow::Result<()> {
    let config = Config::load_or_default();

    // CLI flags override config
    let theme_name = options
        .theme
        .or_else(|| config.theme())
        .unwrap_or_else(|| Theme::NAMES[0].to_string());
    if !Theme::is_known(&theme_name) {
        anyhow::bail!("Invalid theme: {theme_name}. Must be 'light' or 'dark'.");
    }

    let mut engine = TransitionEngine::default().with_timing(config.transition_timing());
    if let Some(name) = options.transition.or_else(|| config.transition()) {
        engine.select_effect(&name)?;
    }
    let viewer = SlideViewer::new(StyleTable::from_theme(&Theme::from_name(&theme_name)), engine);

    let presentation = demo::presentation();
    let start = options
        .slide
        .or_else(|| config.start_slide())
        .map(|n| n.saturating_sub(1).min(presentation.len().saturating_sub(1)));

    let title = format!("{} - lectern", presentation.title());
    tracing::info!(
        slides = presentation.len(),
        theme = %theme_name,
        transition = viewer.engine().current_effect_name(),
        "starting viewer"
    );

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 820.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(presentation, viewer, start)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
