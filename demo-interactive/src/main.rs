//! Interactive Liquid Surface Demo
//!
//! Live terminal view of raindrops falling on a liquid surface.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive -- 100 30
//! cargo run --package demo-interactive -- --model wave --cell-width 2
//! ```
//!
//! # Keys
//!
//! - `r` - Drop a random raindrop
//! - left click - Drop a raindrop on the clicked cell
//! - `space` - Pause / resume
//! - `n` - Single step while paused
//! - `c` - Switch between the hue map and the banded palette
//! - `x` - Clear the surface
//! - `q`, `Esc` - Quit
//!
//! Logs go to `/tmp/rane.log` (see `--log-file`, `RUST_LOG`).

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use rane_core::export::{log_dump, save_png, snapshot_path};
use rane_core::{
    ColorParams, Extrema, InjectionRequest, Simulation, SimulationConfig, Snapshot, SurfaceModel,
};
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Drop placed by a mouse click
const CLICK_RADIUS: i64 = 3;
const CLICK_STRENGTH: f64 = 1.0;

/// Banded palette, troughs to crests
const BAND_COUNT: u8 = 7;
const BANDS: [Color; BAND_COUNT as usize] = [
    Color::Blue,
    Color::LightBlue,
    Color::Cyan,
    Color::LightCyan,
    Color::Green,
    Color::LightGreen,
    Color::White,
];

/// Raindrops on a liquid surface, live in the terminal
#[derive(Parser, Debug)]
#[command(name = "rane")]
#[command(about = "Raindrops on a liquid surface, live in the terminal", long_about = None)]
struct Cli {
    /// Grid width in cells
    #[arg(value_name = "WIDTH", conflicts_with = "width")]
    width_arg: Option<usize>,

    /// Grid height in cells
    #[arg(value_name = "HEIGHT", conflicts_with = "height")]
    height_arg: Option<usize>,

    /// Terminal columns per cell
    #[arg(value_name = "CELL_WIDTH", conflicts_with = "cell_width")]
    cell_width_arg: Option<u16>,

    /// Terminal rows per cell
    #[arg(value_name = "CELL_HEIGHT", conflicts_with = "cell_height")]
    cell_height_arg: Option<u16>,

    /// Grid width in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Terminal columns per cell
    #[arg(long)]
    cell_width: Option<u16>,

    /// Terminal rows per cell
    #[arg(long)]
    cell_height: Option<u16>,

    /// Update model: radial or wave
    #[arg(short, long)]
    model: Option<SurfaceModel>,

    /// Wave velocity damping in (0, 1]
    #[arg(long)]
    damping: Option<f64>,

    /// Milliseconds between frames
    #[arg(long)]
    frame_ms: Option<u64>,

    /// RNG seed for reproducible rain
    #[arg(long)]
    seed: Option<u64>,

    /// YAML configuration file
    #[arg(short, long, default_value = "rane.yaml")]
    config: PathBuf,

    /// Log file (the terminal is taken by the view)
    #[arg(long, default_value = "/tmp/rane.log")]
    log_file: PathBuf,
}

impl Cli {
    fn resolve_config(&self) -> Result<SimulationConfig> {
        let mut config = SimulationConfig::load_or_default(&self.config);
        if let Some(width) = self.width_arg.or(self.width) {
            config.grid.width = width;
        }
        if let Some(height) = self.height_arg.or(self.height) {
            config.grid.height = height;
        }
        if let Some(cell_width) = self.cell_width_arg.or(self.cell_width) {
            config.display.cell_width = cell_width;
        }
        if let Some(cell_height) = self.cell_height_arg.or(self.cell_height) {
            config.display.cell_height = cell_height;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(damping) = self.damping {
            config.wave.damping = damping;
        }
        if let Some(frame_ms) = self.frame_ms {
            config.display.frame_interval_ms = frame_ms;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = cli.resolve_config()?;
    let mut app = App::new(&config)?;

    let mut terminal = ratatui::try_init().context("failed to initialize terminal")?;
    execute!(io::stdout(), EnableMouseCapture)?;
    let result = run(&mut terminal, &mut app);
    execute!(io::stdout(), DisableMouseCapture)?;
    ratatui::try_restore().context("failed to restore terminal")?;

    info!("Exiting after {} frames: {}", app.frame, app.sim.stats());
    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,rane::dump=debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// One tick per frame: input, pending drops, one step, draw, sleep.
fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.quit {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            app.handle_event(&event::read()?);
        }
        if app.quit {
            break;
        }

        if !app.paused || std::mem::take(&mut app.step_once) {
            app.advance();
        }
        terminal.draw(|frame| app.render(frame))?;

        if let Some(rest) = app.frame_interval.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Palette {
    /// Continuous hue map over the normalized field
    Hue,
    /// Seven discrete bands
    Banded,
}

impl Palette {
    fn toggle(self) -> Self {
        match self {
            Self::Hue => Self::Banded,
            Self::Banded => Self::Hue,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Hue => "hue",
            Self::Banded => "banded",
        }
    }
}

struct App {
    sim: Simulation,
    color: ColorParams,
    cell_width: u16,
    cell_height: u16,
    frame_interval: Duration,
    snapshot_every: u64,
    snapshot_dir: PathBuf,
    /// Where the field was last drawn, for mapping clicks to cells
    field_area: Rect,
    frame: u64,
    paused: bool,
    step_once: bool,
    palette: Palette,
    quit: bool,
}

impl App {
    fn new(config: &SimulationConfig) -> Result<Self> {
        let sim = Simulation::new(config).context("failed to create simulation")?;
        Ok(Self {
            sim,
            color: config.color,
            cell_width: config.display.cell_width,
            cell_height: config.display.cell_height,
            frame_interval: Duration::from_millis(config.display.frame_interval_ms),
            snapshot_every: config.display.snapshot_every,
            snapshot_dir: config.display.snapshot_dir.clone(),
            field_area: Rect::default(),
            frame: 0,
            paused: false,
            step_once: false,
            palette: Palette::Hue,
            quit: false,
        })
    }

    fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => self.click(column, row),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('r') => self.sim.submit(InjectionRequest::Random),
            KeyCode::Char(' ') => {
                self.paused = !self.paused;
                info!("{} at frame {}", if self.paused { "Paused" } else { "Resumed" }, self.frame);
            }
            KeyCode::Char('n') => self.step_once = self.paused,
            KeyCode::Char('c') => self.palette = self.palette.toggle(),
            KeyCode::Char('x') => self.sim.clear(),
            _ => {}
        }
    }

    fn click(&mut self, column: u16, row: u16) {
        if !self.field_area.contains(Position::new(column, row)) {
            return;
        }
        let x = i64::from((column - self.field_area.x) / self.cell_width);
        let y = i64::from((row - self.field_area.y) / self.cell_height);
        if self.sim.grid().contains(x, y) {
            self.sim
                .submit(InjectionRequest::drop(x, y, CLICK_RADIUS, CLICK_STRENGTH));
        }
    }

    /// Step once, then snapshot if this frame is on the cadence. Frame 0 is
    /// the state after the first step.
    fn advance(&mut self) {
        self.sim.tick();

        if self.frame.checked_rem(self.snapshot_every) == Some(0) {
            let snapshot = self.sim.snapshot();
            let path = snapshot_path(&self.snapshot_dir, self.frame);
            if let Err(e) = save_png(&snapshot, &path) {
                warn!("Snapshot {} failed: {}", path.display(), e);
            }
            log_dump(&snapshot);
        }
        self.frame += 1;
    }

    fn render(&mut self, frame: &mut Frame) {
        let [field_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
        self.field_area = field_area;

        let snapshot = self.sim.snapshot();
        frame.render_widget(Paragraph::new(self.field_lines(&snapshot, field_area)), field_area);
        frame.render_widget(self.status_line(), status_area);
    }

    /// Colored cells, clipped to whatever part of the grid fits in `area`
    fn field_lines(&self, snapshot: &Snapshot, area: Rect) -> Vec<Line<'static>> {
        let cols = usize::from(area.width / self.cell_width).min(snapshot.width());
        let rows = usize::from(area.height / self.cell_height).min(snapshot.height());
        let extrema = snapshot.extrema();
        let cell = " ".repeat(usize::from(self.cell_width));

        let mut lines = Vec::with_capacity(rows * usize::from(self.cell_height));
        for row in snapshot.rows().take(rows) {
            let spans: Vec<Span<'static>> = row[..cols]
                .iter()
                .map(|&v| Span::styled(cell.clone(), Style::default().bg(self.cell_color(&extrema, v))))
                .collect();
            let line = Line::from(spans);
            for _ in 0..self.cell_height {
                lines.push(line.clone());
            }
        }
        lines
    }

    fn cell_color(&self, extrema: &Extrema, value: f64) -> Color {
        match self.palette {
            Palette::Banded => BANDS[usize::from(extrema.level(value, BAND_COUNT) - 1)],
            Palette::Hue => {
                let rgb = self.color.map(extrema.normalize(value));
                Color::Rgb(rgb.r, rgb.g, rgb.b)
            }
        }
    }

    fn status_line(&self) -> Paragraph<'static> {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let state = if self.paused { "paused" } else { "running" };
        let palette = self.palette.name();

        let mut spans = vec![
            Span::styled(format!(" {} ", self.sim.model()), bold.fg(Color::Cyan)),
            Span::raw(format!("{} | {state} | {palette}   ", self.sim.stats())),
        ];
        for (key, action) in [
            ("q", "quit"),
            ("r", "rain"),
            ("space", "pause"),
            ("n", "step"),
            ("c", "palette"),
            ("x", "clear"),
            ("click", "drop"),
        ] {
            spans.push(Span::styled(key, bold));
            spans.push(Span::raw(format!(" {action}  ")));
        }
        Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::Gray))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshots_start_at_frame_zero() {
        let dir = std::env::temp_dir().join(format!("rane-interactive-{}", std::process::id()));
        let mut config = SimulationConfig::default();
        config.grid.width = 6;
        config.grid.height = 4;
        config.display.snapshot_every = 2;
        config.display.snapshot_dir.clone_from(&dir);
        let mut app = App::new(&config).unwrap();

        for _ in 0..5 {
            app.advance();
        }

        assert_eq!(app.frame, 5);
        assert_eq!(app.sim.step_count(), 5);
        for frame in [0, 2, 4] {
            assert!(snapshot_path(&dir, frame).exists(), "missing frame {frame}");
        }
        for frame in [1, 3, 5] {
            assert!(!snapshot_path(&dir, frame).exists(), "unexpected frame {frame}");
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_zero_cadence_disables_snapshots() {
        let dir = std::env::temp_dir().join(format!("rane-interactive-off-{}", std::process::id()));
        let mut config = SimulationConfig::default();
        config.grid.width = 4;
        config.grid.height = 4;
        config.display.snapshot_every = 0;
        config.display.snapshot_dir.clone_from(&dir);
        let mut app = App::new(&config).unwrap();

        app.advance();
        assert!(!dir.exists());
    }
}
