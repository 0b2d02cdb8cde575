pub mod config;
pub mod font;
pub mod presenter;
pub mod runtime;
pub mod typewriter;
pub mod ui;
pub mod words;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    font::{FontLoader, FontSource},
    presenter::{BannerEngine, GlyphStyle, TextPresenter},
    runtime::{CrosstermEventSource, FrameClock, LoopEvent},
    typewriter::Typewriter,
    words::{CyclePicker, RandomPicker, WordPicker},
};
use chrono::prelude::*;
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use directories::ProjectDirs;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    style::Color,
    Terminal,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin, Write},
    path::PathBuf,
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 33;

/// animated typewriter headline for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Renders a stacked headline with a typewriter-animated line that types, \
pauses, erases and retypes a rotating word, in block-letter typefaces with a blinking caret."
)]
pub struct Cli {
    /// fixed prefix typed before each rotating word
    #[clap(short = 'b', long)]
    base_text: Option<String>,

    /// rotating word; repeat the flag to build the pool
    #[clap(short = 'w', long = "word")]
    words: Vec<String>,

    /// name shown on its own banner line above the animated text
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// milliseconds between typed characters
    #[clap(long)]
    type_interval_ms: Option<u64>,

    /// milliseconds between erased characters (default: half the type interval)
    #[clap(long)]
    delete_interval_ms: Option<u64>,

    /// milliseconds to hold a fully typed word
    #[clap(long)]
    post_type_pause_ms: Option<u64>,

    /// milliseconds to hold the bare prefix before the next word
    #[clap(long)]
    post_delete_pause_ms: Option<u64>,

    /// caret blink period in milliseconds
    #[clap(long)]
    caret_blink_ms: Option<u64>,

    /// embedded banner typeface
    #[clap(short = 'f', long, value_enum)]
    font: Option<SupportedFont>,

    /// load a typeface from a json file instead of the embedded set
    #[clap(long)]
    font_file: Option<PathBuf>,

    /// cycle words in order instead of picking at random
    #[clap(long)]
    in_order: bool,

    /// exit automatically after this many seconds
    #[clap(short = 's', long)]
    seconds: Option<f64>,

    /// write the merged settings back to the config file
    #[clap(long)]
    save_config: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum SupportedFont {
    Standard,
    Plain,
}

impl Cli {
    /// Overlay the flags that were actually given onto the stored config.
    fn apply(&self, cfg: &mut Config) {
        if let Some(base) = &self.base_text {
            cfg.base_text = base.clone();
        }
        if !self.words.is_empty() {
            cfg.words = self.words.clone();
        }
        if let Some(name) = &self.name {
            cfg.name = Some(name.clone());
        }
        if let Some(ms) = self.type_interval_ms {
            cfg.type_interval_ms = ms;
        }
        if let Some(ms) = self.delete_interval_ms {
            cfg.delete_interval_ms = Some(ms);
        }
        if let Some(ms) = self.post_type_pause_ms {
            cfg.post_type_pause_ms = ms;
        }
        if let Some(ms) = self.post_delete_pause_ms {
            cfg.post_delete_pause_ms = ms;
        }
        if let Some(ms) = self.caret_blink_ms {
            cfg.caret_blink_ms = ms;
        }
        if let Some(font) = self.font {
            cfg.font = font.to_string().to_lowercase();
        }
        if self.in_order {
            cfg.in_order = true;
        }
    }
}

/// A static headline line with its own colour and presenter.
pub struct Billboard {
    pub text: String,
    pub color: Color,
    pub presenter: TextPresenter,
}

impl Billboard {
    fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
            presenter: TextPresenter::new(GlyphStyle::default()),
        }
    }
}

pub struct App {
    pub engine: BannerEngine,
    pub marquee: Typewriter,
    pub marquee_presenter: TextPresenter,
    pub billboards: Vec<Billboard>,
    pub status: Option<String>,
    pub font_failed: bool,
    pub seconds_remaining: Option<f64>,
    pub frames: u64,
}

impl App {
    pub fn new(font_file: Option<PathBuf>, config: &Config) -> Result<Self, Box<dyn Error>> {
        let source = match font_file {
            Some(path) => FontSource::File(path),
            None => FontSource::Embedded(config.font.clone()),
        };
        let engine = BannerEngine::new(FontLoader::spawn(source));

        let picker: Box<dyn WordPicker> = if config.in_order {
            Box::new(CyclePicker::new())
        } else {
            Box::new(RandomPicker)
        };
        let marquee = Typewriter::new(
            config.base_text.clone(),
            config.words.clone(),
            config.pacing(),
            picker,
        )?;

        let mut billboards = vec![Billboard::new("Hi there!", Color::White)];
        if let Some(name) = &config.name {
            billboards.push(Billboard::new("My name is", Color::White));
            billboards.push(Billboard::new(name.clone(), Color::Rgb(255, 165, 0)));
            billboards.push(Billboard::new("and I am a", Color::White));
        }

        Ok(Self {
            engine,
            marquee,
            marquee_presenter: TextPresenter::new(GlyphStyle::default()),
            billboards,
            status: None,
            font_failed: false,
            seconds_remaining: None,
            frames: 0,
        })
    }

    /// One frame: advance the session, refresh every presenter, drain
    /// warnings into the status line.
    pub fn on_tick(&mut self, dt: Duration) {
        self.frames += 1;
        self.marquee.advance(dt);
        self.marquee.blink(dt);

        let rendered = self.marquee.rendered_text();
        self.marquee_presenter.refresh(&mut self.engine, &rendered);
        for board in &mut self.billboards {
            board.presenter.refresh(&mut self.engine, &board.text);
        }

        if let Some(warning) = self.marquee_presenter.take_warning() {
            self.status = Some(warning);
        }
        for board in &mut self.billboards {
            if let Some(warning) = board.presenter.take_warning() {
                self.status = Some(warning);
            }
        }

        if !self.font_failed {
            if let Some(err) = self.engine.font_error() {
                self.status = Some(err.to_string());
                self.font_failed = true;
            }
        }

        if let Some(secs) = self.seconds_remaining.as_mut() {
            *secs -= dt.as_secs_f64();
        }
    }

    pub fn finished(&self) -> bool {
        matches!(self.seconds_remaining, Some(secs) if secs <= 0.0)
    }

    /// Release every retained geometry handle before the terminal is
    /// restored and the engine goes away.
    pub fn teardown(&mut self) {
        let engine = &mut self.engine;
        self.marquee_presenter.teardown(engine);
        for board in &mut self.billboards {
            board.presenter.teardown(engine);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply(&mut config);

    if let Err(err) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, err.to_string()).exit();
    }

    if cli.save_config {
        store.save(&config)?;
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(cli.font_file.clone(), &config)?;
    app.seconds_remaining = cli.seconds;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let started = Instant::now();
    let result = run_loop(&mut terminal, &mut app);

    app.teardown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let _ = save_run_summary(&app, started.elapsed().as_secs_f64());

    result
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let clock = FrameClock::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui::ui(app, f))?;

    loop {
        match clock.next() {
            LoopEvent::Tick => {
                app.on_tick(clock.frame_interval());
                if app.finished() {
                    break;
                }
                terminal.draw(|f| ui::ui(app, f))?;
            }
            LoopEvent::Resize => {
                terminal.draw(|f| ui::ui(app, f))?;
            }
            LoopEvent::Key(key) => {
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char('q') => break,
                    KeyCode::Char('r') => app.marquee.restart(),
                    _ => {}
                }
                terminal.draw(|f| ui::ui(app, f))?;
            }
        }
    }

    Ok(())
}

/// Append one line per run to log.csv under the project config dir.
fn save_run_summary(app: &App, elapsed_secs: f64) -> io::Result<()> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "marquee") {
        let config_dir = proj_dirs.config_dir();
        let log_path = config_dir.join("log.csv");

        std::fs::create_dir_all(config_dir)?;

        // If the log file doesn't exist, we need to emit a header
        let needs_header = !log_path.exists();

        let mut log_file = OpenOptions::new()
            .write(true)
            .append(true)
            .create(true)
            .open(log_path)?;

        if needs_header {
            writeln!(log_file, "date,elapsed_secs,frames,words_cycled,last_word")?;
        }

        writeln!(
            log_file,
            "{},{:.2},{},{},{}",
            Local::now().format("%c"),
            elapsed_secs,
            app.frames,
            app.marquee.cycles(),
            app.marquee.active_word(),
        )?;
    }

    Ok(())
}
