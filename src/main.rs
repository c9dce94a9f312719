pub mod clock;
pub mod config;
pub mod mapper;
pub mod quiz;
pub mod runtime;
pub mod ui;

use crate::{
    clock::{random_time, ClockState, HandMode, TimeOfDay},
    config::{Config, ConfigStore, FileConfigStore, ImageAsset},
    quiz::{QuestionDialog, QuizRound, ScoreTally},
    runtime::{ClockEvent, CrosstermEventSource, EventSource, Runner},
    ui::Theme,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

/// terminal analog clock with a time-reading quiz
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Renders an analog clock face in the terminal and quizzes you on reading it: \
                  type the displayed time, get scored, stop whenever you like."
)]
pub struct Cli {
    /// run the clock animation instead of the quiz
    #[clap(long)]
    pub animate: bool,

    /// stop the animation once this time is shown
    #[clap(long, value_name = "H:MM", requires = "animate")]
    pub stop_at: Option<TimeOfDay>,

    /// start the animation from the local wall clock
    #[clap(long, requires = "animate")]
    pub now: bool,

    /// show quiz times immediately instead of sweeping the minute hand up to them
    #[clap(long)]
    pub instant: bool,

    /// minute step for random quiz times
    #[clap(short = 'g', long, value_name = "MINUTES")]
    pub granularity: Option<u8>,

    /// snap the hands to whole hours and minutes
    #[clap(long)]
    pub easy: bool,

    /// event loop tick interval in milliseconds
    #[clap(long, value_name = "MS")]
    pub tick_ms: Option<u64>,
}

impl Cli {
    /// Stored config provides the baseline; explicit flags win.
    fn to_settings(&self, base: Config) -> Config {
        Config {
            granularity: self.granularity.unwrap_or(base.granularity).clamp(1, 60),
            easy: self.easy || base.easy,
            instant: self.instant || base.instant,
            tick_ms: self.tick_ms.unwrap_or(base.tick_ms).max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// Free-running animation, one minute per tick.
    Animate { stop_at: Option<TimeOfDay> },
    /// Random-question loop with a score tally.
    Quiz,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    /// The face is being displayed or swept toward the target.
    Showing,
    /// The question dialog is open and owns the keyboard.
    Asking,
    /// The correct/incorrect confirmation is up.
    Feedback,
    /// Final score screen; next key exits.
    Score,
}

#[derive(Debug)]
pub struct App {
    pub settings: Config,
    pub mode: Mode,
    pub state: AppState,
    pub clock: ClockState,
    pub target: TimeOfDay,
    pub round: u32,
    pub dialog: Option<QuestionDialog>,
    pub last_round: Option<QuizRound>,
    pub tally: ScoreTally,
    pub theme: Theme,
    pub image: ImageAsset,
}

impl App {
    pub fn new(cli: Cli, base: Config) -> Self {
        let settings = cli.to_settings(base);
        let mode = if cli.animate {
            Mode::Animate {
                stop_at: cli.stop_at,
            }
        } else {
            Mode::Quiz
        };
        let clock = if cli.animate && cli.now {
            ClockState::from_local()
        } else {
            ClockState::default()
        };

        let mut app = Self {
            settings,
            mode,
            state: AppState::Showing,
            clock,
            target: TimeOfDay::new(0, 0),
            round: 0,
            dialog: None,
            last_round: None,
            tally: ScoreTally::default(),
            theme: Theme::Plain,
            image: ImageAsset::detect(),
        };
        if app.mode == Mode::Quiz {
            app.next_round();
        }
        app
    }

    pub fn hand_mode(&self) -> HandMode {
        if self.settings.easy {
            HandMode::Easy
        } else {
            HandMode::Smooth
        }
    }

    /// Picks the next question and either shows it straight away or starts
    /// the minute-hand sweep up from the top of the hour.
    pub fn next_round(&mut self) {
        self.round += 1;
        self.last_round = None;
        self.target = random_time(&mut rand::thread_rng(), self.settings.granularity);
        if self.settings.instant {
            self.clock.set(self.target);
            self.open_dialog();
        } else {
            self.clock = ClockState::new(self.target.hour, 0, 0);
            self.state = AppState::Showing;
        }
    }

    fn open_dialog(&mut self) {
        self.dialog = Some(QuestionDialog::new(self.round, self.target));
        self.state = AppState::Asking;
    }

    /// One animation step. The stop check runs before the advance, so a
    /// sweep that starts on its target opens the dialog without moving.
    pub fn on_tick(&mut self) {
        match self.mode {
            Mode::Animate { stop_at } => {
                if stop_at != Some(self.clock.time()) {
                    self.clock.tick();
                }
            }
            Mode::Quiz => {
                if self.state == AppState::Showing {
                    if self.clock.time() == self.target {
                        self.open_dialog();
                    } else {
                        self.clock.tick();
                    }
                }
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        match self.mode {
            Mode::Animate { stop_at } => stop_at != Some(self.clock.time()),
            Mode::Quiz => self.state == AppState::Showing,
        }
    }

    /// Submit the dialog input; a rejected answer keeps the dialog open.
    pub fn submit_answer(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            if let Some(round) = dialog.submit() {
                self.tally.record(round.correct);
                self.last_round = Some(round);
                self.dialog = None;
                self.state = AppState::Feedback;
            }
        }
    }

    /// Cancelling the dialog ends the quiz loop without scoring the round.
    pub fn cancel_quiz(&mut self) {
        self.dialog = None;
        self.state = AppState::Score;
    }

    /// No-op unless the backdrop image asset was found at startup.
    pub fn toggle_backdrop(&mut self) {
        if self.image.present {
            self.theme = match self.theme {
                Theme::Plain => Theme::Backdrop,
                Theme::Backdrop => Theme::Plain,
            };
        }
    }

    pub fn toggle_easy(&mut self) {
        self.settings.easy = !self.settings.easy;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut app = App::new(cli, store.load());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(app.settings.tick_ms),
    );
    let result = start_tui(&mut terminal, &mut app, &runner, &store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    if app.state == AppState::Score {
        println!("{}", app.tally.summary());
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum KeyFlow {
    Continue,
    Quit,
}

fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
    store: &dyn ConfigStore,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step(app.is_animating()) {
            ClockEvent::Tick => {
                if app.is_animating() {
                    app.on_tick();
                }
            }
            // The mapper is rebuilt from the new frame size on the redraw.
            ClockEvent::Resize => {}
            ClockEvent::Key(key) => {
                if handle_key(app, key, store) == KeyFlow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent, store: &dyn ConfigStore) -> KeyFlow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyFlow::Quit;
    }

    match app.state {
        AppState::Asking => match key.code {
            KeyCode::Esc => app.cancel_quiz(),
            KeyCode::Enter => app.submit_answer(),
            KeyCode::Backspace => {
                if let Some(dialog) = app.dialog.as_mut() {
                    dialog.backspace();
                }
            }
            KeyCode::Char(c) => {
                if let Some(dialog) = app.dialog.as_mut() {
                    dialog.type_char(c);
                }
            }
            _ => {}
        },
        AppState::Feedback => app.next_round(),
        AppState::Score => return KeyFlow::Quit,
        AppState::Showing => match key.code {
            KeyCode::Esc => return KeyFlow::Quit,
            KeyCode::Char('i') => app.toggle_backdrop(),
            KeyCode::Char('e') => {
                app.toggle_easy();
                // Persist only the toggle; one-off CLI overrides like
                // --instant or -g must not become sticky defaults.
                let mut stored = store.load();
                stored.easy = app.settings.easy;
                let _ = store.save(&stored);
            }
            _ => {}
        },
    }

    KeyFlow::Continue
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
