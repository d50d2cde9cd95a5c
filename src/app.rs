//! Core application state and the real-time terminal loop.

use std::{
    io::stdout,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use ratatui::{
    crossterm::{
        event::{
            KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
        },
        execute,
        terminal::supports_keyboard_enhancement,
    },
    DefaultTerminal,
};
use tracing::{info, warn};

use crate::{
    events,
    game::{EndScreen, Game, StatusSink, TimerReadout},
    input::InputState,
    types::GameState,
    ui, Config,
};

/// Latest readouts emitted by the game, as shown on screen.
#[derive(Clone, Debug)]
pub(crate) struct Hud {
    /// Remaining time shown in the status line.
    pub timer: TimerReadout,
    /// End-of-game popup, visible while present.
    pub end_screen: Option<EndScreen>,
}

impl StatusSink for Hud {
    fn show_timer(&mut self, readout: TimerReadout) {
        self.timer = readout;
    }

    fn show_end_screen(&mut self, screen: EndScreen) {
        self.end_screen = Some(screen);
    }

    fn hide_end_screen(&mut self) {
        self.end_screen = None;
    }
}

/// Application state container for the maze-escape game.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui renders every frame and into which Crossterm events are written.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit the game but it starts off `false`.
    pub(crate) exit: bool,
    /// Game loop controller.
    ///
    /// This field owns the current session, including the maze shown on screen before the first
    /// start command.
    pub(crate) game: Game,
    /// Held directional keys.
    ///
    /// This field is written by the event handlers and read once per frame when the game advances.
    pub(crate) input: InputState,
    /// Readouts shown on screen.
    pub(crate) hud: Hud,
    /// Seed the maze generator was created with.
    pub(crate) seed: u64,
    /// How long a press counts as held when the terminal does not report releases.
    pub(crate) hold_latch: Duration,
    /// Instant the previous frame advanced the game.
    pub(crate) last_frame: Instant,
}

impl App {
    /// Creates the application in the idle state with a pre-generated maze.
    ///
    /// The maze generator is seeded from the configuration, or from the system's random source
    /// when no seed is given.
    ///
    /// # Errors
    ///
    /// This function returns an error if the configured maze dimensions are invalid.
    pub fn new(config: &Config) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let settings = config.settings();
        let game = Game::new(settings, Pcg32::seed_from_u64(seed))?;

        info!(seed, width = settings.width, height = settings.height, "created game");

        Ok(Self {
            exit: false,
            game,
            input: InputState::new(false, config.hold_latch()),
            hud: Hud {
                timer: TimerReadout::new(settings.time_limit),
                end_screen: None,
            },
            seed,
            hold_latch: config.hold_latch(),
            last_frame: Instant::now(),
        })
    }

    /// Runs the main loop of the application.
    ///
    /// Every iteration draws a frame, handles the input that arrives within the frame budget and
    /// advances the game by the real time elapsed since the previous iteration. The loop continues
    /// until the exit condition is `true`. Key release reporting is switched on for the duration of
    /// the loop when the terminal supports it.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
        if enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
        } else {
            warn!(
                latch_ms = self.hold_latch.as_millis(),
                "terminal does not report key releases, falling back to a hold latch"
            );
        }
        self.input = InputState::new(enhanced, self.hold_latch);

        let result = self.main_loop(terminal);

        if enhanced {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }

        result
    }

    /// Draws, handles events and advances the game until the exit flag is raised.
    fn main_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.last_frame = Instant::now();

        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame)
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))
            })?;
            events::handle_events(self)?;
            let _ = self.tick(Instant::now());
        }

        Ok(())
    }

    /// Starts or restarts the game.
    ///
    /// # Errors
    ///
    /// This function returns an error if the configured maze dimensions are invalid.
    pub(crate) fn start(&mut self) -> Result<()> {
        self.input.clear();
        self.game.start(&mut self.hud)?;
        self.last_frame = Instant::now();

        Ok(())
    }

    /// Advances the game by the time elapsed since the previous frame.
    pub(crate) fn tick(&mut self, now: Instant) -> GameState {
        let delta = now.saturating_duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        let held = self.input.held(now);
        self.game.advance(delta, &held, &mut self.hud)
    }
}
