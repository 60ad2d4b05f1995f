use crate::config::AppConfig;
use crate::field::ParticleField;
use crate::input::{CellMapper, PointerEvent};
use crate::pointer::PointerState;
use crate::surface::{PixelBuffer, Surface};
use ratatui::layout::Rect;
use std::path::PathBuf;

/// Focus state for parameter editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    ColorScheme,
    Fade,
    Return,
    Threshold,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::ColorScheme,
            Focus::ColorScheme => Focus::Fade,
            Focus::Fade => Focus::Return,
            Focus::Return => Focus::Threshold,
            Focus::Threshold => Focus::ColorScheme, // Loop back
        }
    }

    /// Shift+Tab cycles through parameters in reverse
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Threshold,
            Focus::ColorScheme => Focus::Threshold, // Loop back
            Focus::Fade => Focus::ColorScheme,
            Focus::Return => Focus::Fade,
            Focus::Threshold => Focus::Return,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state
pub struct App {
    pub field: ParticleField,
    pub pointer: PointerState,
    pub surface: PixelBuffer,
    pub mapper: CellMapper,
    pub config: AppConfig,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub paused: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    pub frames: u64,
    /// Last user-facing message (snapshot saved, config errors...)
    pub status_message: Option<String>,
    pub snapshot_dir: PathBuf,
}

impl App {
    pub fn new(canvas: Rect, config: AppConfig, seed: Option<u64>) -> Self {
        let settings = config.settings.clone();
        let mut pointer = PointerState::new(settings.compact_radius, settings.standard_radius);
        let mut field = match seed {
            Some(seed) => ParticleField::with_seed(settings, seed),
            None => ParticleField::new(settings),
        };

        let mapper = CellMapper::new(canvas, config.cell_width, config.cell_height);
        let (width, height) = mapper.surface_size();
        field.seed(width, height, &mut pointer);

        Self {
            field,
            pointer,
            surface: PixelBuffer::new(width, height),
            mapper,
            config,
            focus: Focus::Controls,
            fullscreen_mode: false,
            paused: false,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            frames: 0,
            status_message: None,
            snapshot_dir: PathBuf::from("."),
        }
    }

    pub fn surface_size(&self) -> (usize, usize) {
        (self.surface.width(), self.surface.height())
    }

    /// Run one simulation frame
    pub fn tick(&mut self) {
        if !self.paused {
            self.field.tick(&mut self.surface, &self.pointer);
            self.frames += 1;
        }
    }

    /// Terminal mouse position; leaving the canvas counts as pointer leave
    pub fn pointer_at(&mut self, column: u16, row: u16) {
        let event = self.mapper.event_at(column, row);
        self.pointer.apply(&event);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.apply(&PointerEvent::Left);
    }

    /// Resize the surface to a new canvas area and reseed
    pub fn resize(&mut self, canvas: Rect) {
        self.mapper.area = canvas;
        let (width, height) = self.mapper.surface_size();
        log::debug!("resize to {}x{} cells ({}x{} px)", canvas.width, canvas.height, width, height);
        self.surface.resize(width, height);
        self.field.seed(width, height, &mut self.pointer);
    }

    /// Reseed on the current surface
    pub fn reseed(&mut self) {
        let (width, height) = self.mapper.surface_size();
        self.field.seed(width, height, &mut self.pointer);
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Toggle fullscreen mode; the caller resizes afterwards
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Scroll controls box up
    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    /// Scroll controls box down
    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }

    /// Cycle color scheme; colors are fixed per particle so this reseeds
    pub fn cycle_color_scheme(&mut self) {
        self.field.settings.color_scheme = self.field.settings.color_scheme.next();
        self.reseed();
    }

    pub fn cycle_color_scheme_prev(&mut self) {
        self.field.settings.color_scheme = self.field.settings.color_scheme.prev();
        self.reseed();
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::ColorScheme => self.cycle_color_scheme(),
            Focus::Fade => self.field.settings.adjust_fade_alpha(0.02),
            Focus::Return => self.field.settings.adjust_return_divisor(1.0),
            Focus::Threshold => self.config.adjust_dot_threshold(0.02),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::ColorScheme => self.cycle_color_scheme_prev(),
            Focus::Fade => self.field.settings.adjust_fade_alpha(-0.02),
            Focus::Return => self.field.settings.adjust_return_divisor(-1.0),
            Focus::Threshold => self.config.adjust_dot_threshold(-0.02),
        }
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Current settings as a saveable config
    pub fn current_config(&self) -> AppConfig {
        AppConfig {
            settings: self.field.settings.clone(),
            ..self.config.clone()
        }
    }

    /// Write the current config to the default location
    pub fn save_config(&mut self) {
        let result = AppConfig::default_path()
            .ok_or_else(|| "Could not determine config directory".to_string())
            .and_then(|path| self.current_config().save_to_file(&path).map(|_| path));
        self.status_message = Some(match result {
            Ok(path) => {
                log::info!("config saved to {}", path.display());
                "Config saved".to_string()
            }
            Err(e) => {
                log::warn!("{}", e);
                e
            }
        });
    }

    /// Save the current frame as a PNG
    pub fn save_snapshot(&mut self) {
        let path = self
            .snapshot_dir
            .join(format!("particle-field-{:06}.png", self.frames));
        self.status_message = Some(match self.surface.save_png(&path) {
            Ok(()) => {
                log::info!("snapshot saved to {}", path.display());
                format!("Saved {}", path.display())
            }
            Err(e) => {
                log::warn!("{}", e);
                e
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::SurfaceClass;

    fn app(width: u16, height: u16) -> App {
        App::new(Rect::new(23, 1, width, height), AppConfig::default(), Some(9))
    }

    #[test]
    fn test_new_seeds_from_canvas_cells() {
        let app = app(50, 20);
        assert_eq!(app.surface_size(), (400, 320));
        assert_eq!(app.field.surface_class(), SurfaceClass::Compact);
        assert_eq!(app.field.particles().len(), 1200);
    }

    #[test]
    fn test_resize_reseeds() {
        let mut app = app(50, 20);
        app.resize(Rect::new(23, 1, 120, 40));
        assert_eq!(app.surface_size(), (960, 640));
        assert_eq!(app.field.surface_class(), SurfaceClass::Standard);
        assert_eq!(app.field.particles().len(), 2500);
        assert_eq!(app.pointer.radius(), 170.0);
        assert_eq!(app.field.generation(), 2);
    }

    #[test]
    fn test_pointer_follows_mouse_and_leaves() {
        let mut app = app(50, 20);
        app.pointer_at(24, 2);
        assert_eq!(app.pointer.position(), Some((12.0, 24.0)));
        // Over the sidebar
        app.pointer_at(5, 2);
        assert_eq!(app.pointer.position(), None);
        app.pointer_at(30, 10);
        app.pointer_left();
        assert_eq!(app.pointer.position(), None);
    }

    #[test]
    fn test_pause_stops_frames() {
        let mut app = app(20, 10);
        app.tick();
        app.toggle_pause();
        app.tick();
        assert_eq!(app.frames, 1);
    }

    #[test]
    fn test_color_scheme_cycle_reseeds() {
        let mut app = app(20, 10);
        let generation = app.field.generation();
        app.focus = Focus::ColorScheme;
        app.adjust_focused_up();
        assert_eq!(app.field.generation(), generation + 1);
        assert!(app.field.particles().iter().all(|p| p.color.hue >= 180.0 && p.color.hue < 230.0));
        app.adjust_focused_down();
        assert!(app.field.particles().iter().all(|p| p.color.hue >= 300.0));
    }

    #[test]
    fn test_focus_cycle() {
        let mut focus = Focus::Controls;
        for _ in 0..4 {
            focus = focus.next();
            assert!(focus.is_param());
            assert_eq!(focus.next().prev(), focus);
        }
        assert_eq!(focus.next(), Focus::ColorScheme);
    }

    #[test]
    fn test_snapshot_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(10, 5);
        app.snapshot_dir = dir.path().to_path_buf();
        app.tick();
        app.save_snapshot();
        assert!(dir.path().join("particle-field-000001.png").exists());
        assert!(app.status_message.unwrap().starts_with("Saved"));
    }
}
