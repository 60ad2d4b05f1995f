mod app;
mod braille;
mod color;
mod config;
mod field;
mod input;
mod particle;
mod pointer;
mod settings;
mod surface;
mod ui;

use app::{App, Focus};
use clap::Parser;
use color::ColorScheme;
use config::{AppConfig, MAX_CELL_SIZE, MIN_CELL_SIZE};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "particle-field")]
#[command(about = "Interactive particle field that scatters away from the mouse, in the terminal")]
struct Args {
    // === Config ===
    /// JSON config file (defaults to the user config dir if present)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Random seed for reproducible particle layouts
    #[arg(long)]
    seed: Option<u64>,

    // === Population ===
    /// Surfaces narrower than this many pixels are compact
    #[arg(long = "compact-threshold")]
    compact_threshold: Option<f32>,

    /// Particle count on compact surfaces
    #[arg(long = "compact-count")]
    compact_count: Option<usize>,

    /// Particle count on standard surfaces
    #[arg(long = "standard-count")]
    standard_count: Option<usize>,

    // === Pointer ===
    /// Influence radius on compact surfaces (10-1000)
    #[arg(long = "compact-radius")]
    compact_radius: Option<f32>,

    /// Influence radius on standard surfaces (10-1000)
    #[arg(long = "standard-radius")]
    standard_radius: Option<f32>,

    // === Visual ===
    /// Opacity of the per-frame black wash (0.02-1.0)
    #[arg(long)]
    fade: Option<f32>,

    /// Divisor of the home gap closed each frame (2-60)
    #[arg(long = "return-divisor")]
    return_divisor: Option<f32>,

    /// Color scheme (blossom, ocean, ember, forest, aurora)
    #[arg(long)]
    scheme: Option<String>,

    /// Logical pixels per terminal column
    #[arg(long = "cell-width")]
    cell_width: Option<f32>,

    /// Logical pixels per terminal row
    #[arg(long = "cell-height")]
    cell_height: Option<f32>,

    /// Brightness needed to light a Braille dot (0.0-0.9)
    #[arg(long = "dot-threshold")]
    dot_threshold: Option<f32>,

    // === Output ===
    /// Write logs to this file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Directory for PNG snapshots
    #[arg(long = "snapshot-dir", default_value = ".")]
    snapshot_dir: PathBuf,
}

fn init_logging(path: &Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    // stderr belongs to the TUI, so logs only go to a file
    if let Some(path) = path {
        let file = File::create(path)?;
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    Ok(())
}

/// Defaults, then the config file, then CLI flags
fn load_config(args: &Args) -> Result<AppConfig, String> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => match AppConfig::default_path().filter(|p| p.exists()) {
            Some(path) => AppConfig::load_from_file(&path)?,
            None => AppConfig::default(),
        },
    };

    let settings = &mut config.settings;
    if let Some(v) = args.compact_threshold {
        settings.compact_threshold = v;
    }
    if let Some(v) = args.compact_count {
        settings.compact_count = v;
    }
    if let Some(v) = args.standard_count {
        settings.standard_count = v;
    }
    if let Some(v) = args.compact_radius {
        settings.compact_radius = v;
    }
    if let Some(v) = args.standard_radius {
        settings.standard_radius = v;
    }
    if let Some(v) = args.fade {
        settings.fade_alpha = v;
    }
    if let Some(v) = args.return_divisor {
        settings.return_divisor = v;
    }
    if let Some(name) = &args.scheme {
        settings.color_scheme =
            ColorScheme::from_name(name).ok_or_else(|| format!("Unknown color scheme: {}", name))?;
    }
    settings.clamp_all();

    if let Some(v) = args.cell_width {
        config.cell_width = v.clamp(MIN_CELL_SIZE, MAX_CELL_SIZE);
    }
    if let Some(v) = args.cell_height {
        config.cell_height = v.clamp(MIN_CELL_SIZE, MAX_CELL_SIZE);
    }
    if let Some(v) = args.dot_threshold {
        config.dot_threshold = v;
    }
    config.adjust_dot_threshold(0.0);

    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = load_config(&args)?;
    log::info!("starting with {:?}", config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Get initial terminal size and create app
    let size = terminal.size()?;
    let frame_rect = Rect::new(0, 0, size.width, size.height);
    let mut app = App::new(ui::get_canvas_area(frame_rect, false), config, args.seed);
    app.snapshot_dir = args.snapshot_dir;

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::warn!("exited with error: {:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn canvas_for<B: ratatui::backend::Backend>(
    terminal: &Terminal<B>,
    fullscreen: bool,
) -> io::Result<Rect> {
    let size = terminal.size()?;
    Ok(ui::get_canvas_area(Rect::new(0, 0, size.width, size.height), fullscreen))
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    let mut next_frame = Instant::now() + FRAME_DURATION;
    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Drain input until the next frame is due; the last pointer position wins
        loop {
            let timeout = next_frame.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            if handle_event(terminal, app, event::read()?)? {
                return Ok(());
            }
        }
        next_frame = Instant::now() + FRAME_DURATION;

        // Run simulation tick
        app.tick();
    }
}

/// Apply one terminal event. Returns true when the user asked to quit.
fn handle_event<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event: Event,
) -> io::Result<bool> {
    match event {
        Event::Key(key) => {
            // Only process Press events
            if key.kind != KeyEventKind::Press {
                return Ok(false);
            }

            // Handle Ctrl+C
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(true);
            }

            match key.code {
                // System controls
                KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Char('r') | KeyCode::Char('R') => app.reseed(),
                KeyCode::Char('v') | KeyCode::Char('V') => {
                    app.toggle_fullscreen();
                    let canvas = canvas_for(terminal, app.fullscreen_mode)?;
                    app.resize(canvas);
                }
                KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    app.cycle_color_scheme();
                    app.focus = Focus::ColorScheme;
                }
                KeyCode::Char('p') | KeyCode::Char('P') => app.save_snapshot(),
                KeyCode::Char('w') | KeyCode::Char('W') => app.save_config(),

                // Navigation
                KeyCode::Tab => app.next_focus(),
                KeyCode::BackTab => app.prev_focus(),
                KeyCode::Up => {
                    if !app.show_help {
                        if app.focus.is_param() {
                            app.adjust_focused_up();
                        } else {
                            app.scroll_controls_up();
                        }
                    }
                }
                KeyCode::Down => {
                    if !app.show_help {
                        if app.focus.is_param() {
                            app.adjust_focused_down();
                        } else {
                            let term_size = terminal.size().unwrap_or_default();
                            let visible = ui::get_controls_visible_lines(term_size.height);
                            let max_scroll = ui::CONTROLS_CONTENT_LINES.saturating_sub(visible);
                            app.scroll_controls_down(max_scroll);
                        }
                    }
                }
                KeyCode::Esc => {
                    if app.show_help {
                        app.toggle_help();
                    } else if app.focus.is_param() {
                        app.focus = Focus::Controls;
                    }
                }
                KeyCode::Char('j') | KeyCode::Char('J') => {
                    if app.show_help {
                        app.scroll_help_down(ui::HELP_CONTENT_LINES);
                    }
                }
                KeyCode::Char('k') | KeyCode::Char('K') => {
                    if app.show_help {
                        app.scroll_help_up();
                    }
                }
                _ => {}
            }
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                app.pointer_at(mouse.column, mouse.row);
            }
            _ => {}
        },
        Event::FocusLost => app.pointer_left(),
        Event::Resize(width, height) => {
            let canvas = ui::get_canvas_area(Rect::new(0, 0, width, height), app.fullscreen_mode);
            app.resize(canvas);
        }
        _ => {}
    }
    Ok(false)
}
