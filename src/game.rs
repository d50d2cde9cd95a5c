//! Game session state and the per-frame loop controller.
//!
//! This module contains the `Game` controller that owns the current `Session`, drives the
//! Idle/Active/Won/Lost state machine and reports timer and end-of-game readouts to a
//! [`StatusSink`].

use color_eyre::eyre::Result;
use rand_pcg::Pcg32;
use tracing::{info, trace};

use crate::{
    maze::{Maze, START},
    motion,
    trail::Trail,
    types::{Direction, GameState, Position},
};

/// Remaining time below which the timer is flagged as running low, in seconds.
pub(crate) const LOW_TIME_THRESHOLD: f64 = 10.;

/// Tunable parameters of a game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Settings {
    /// Number of maze columns, odd.
    pub width: usize,
    /// Number of maze rows, odd.
    pub height: usize,
    /// Seconds on the clock at the start of every game.
    pub time_limit: f64,
    /// Distance covered per frame per held direction, in cells.
    pub speed: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 61,
            height: 61,
            time_limit: 30.,
            speed: 0.28,
        }
    }
}

/// Formatted remaining time, emitted once per active frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TimerReadout {
    /// Remaining time with one decimal and a unit suffix, e.g. `"12.3s"`.
    pub text: String,
    /// Whether less than [`LOW_TIME_THRESHOLD`] seconds remain.
    pub low: bool,
}

impl TimerReadout {
    /// Builds the readout for the given remaining time.
    pub(crate) fn new(time_left: f64) -> Self {
        Self {
            text: format!("{time_left:.1}s"),
            low: time_left < LOW_TIME_THRESHOLD,
        }
    }
}

/// Title and description shown when a game ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EndScreen {
    /// Headline of the popup.
    pub title: String,
    /// Body text of the popup.
    pub description: String,
}

impl EndScreen {
    /// Builds the end screen for a player that escaped with the given time left.
    pub(crate) fn victory(time_left: f64) -> Self {
        Self {
            title: "VICTORY!".to_owned(),
            description: format!("You escaped with {time_left:.1}s to spare."),
        }
    }

    /// Builds the end screen for a player that ran out of time.
    pub(crate) fn defeat() -> Self {
        Self {
            title: "OUT OF TIME".to_owned(),
            description: "The labyrinth has trapped you.".to_owned(),
        }
    }
}

/// Receiver of the readouts the controller emits for display.
pub(crate) trait StatusSink {
    /// Shows the remaining time.
    fn show_timer(&mut self, readout: TimerReadout);
    /// Shows the end-of-game popup.
    fn show_end_screen(&mut self, screen: EndScreen);
    /// Hides the end-of-game popup.
    fn hide_end_screen(&mut self);
}

/// State of a single game, re-created on every start.
#[derive(Clone, Debug)]
pub(crate) struct Session {
    /// Maze being played.
    maze: Maze,
    /// Continuous player position.
    player: Position,
    /// Centre of the exit cell.
    exit: Position,
    /// Recent player positions.
    trail: Trail,
    /// Seconds left on the clock.
    time_left: f64,
    /// Lifecycle state.
    state: GameState,
}

impl Session {
    /// Creates an idle session over the given maze with a full clock.
    pub(crate) fn new(maze: Maze, time_limit: f64) -> Self {
        Self {
            player: Position::from_cell(START),
            exit: Position::from_cell(maze.exit()),
            maze,
            trail: Trail::new(),
            time_left: time_limit,
            state: GameState::Idle,
        }
    }

    /// Returns the maze being played.
    pub(crate) const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Returns the continuous player position.
    pub(crate) const fn player(&self) -> Position {
        self.player
    }

    /// Returns the centre of the exit cell.
    pub(crate) const fn exit(&self) -> Position {
        self.exit
    }

    /// Returns the recent player positions.
    pub(crate) const fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Returns the seconds left on the clock.
    pub(crate) const fn time_left(&self) -> f64 {
        self.time_left
    }

    /// Returns the lifecycle state.
    pub(crate) const fn state(&self) -> GameState {
        self.state
    }
}

/// Game loop controller.
///
/// This structure owns the session along with the random source used to generate mazes. It is
/// driven from the outside: [`start`](Game::start) on every start or restart command and
/// [`advance`](Game::advance) once per displayed frame with the time elapsed since the previous
/// one.
#[derive(Clone, Debug)]
pub(crate) struct Game {
    /// Parameters applied on every start.
    settings: Settings,
    /// Random source for maze generation.
    rng: Pcg32,
    /// Current session.
    session: Session,
}

impl Game {
    /// Creates a controller in the idle state with a pre-generated maze to display.
    ///
    /// # Errors
    ///
    /// This function returns an error if the configured maze dimensions are invalid.
    pub(crate) fn new(settings: Settings, mut rng: Pcg32) -> Result<Self> {
        let maze = Maze::generate(settings.width, settings.height, &mut rng)?;

        Ok(Self {
            settings,
            rng,
            session: Session::new(maze, settings.time_limit),
        })
    }

    /// Returns the current session.
    pub(crate) const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the lifecycle state of the current session.
    pub(crate) const fn state(&self) -> GameState {
        self.session.state
    }

    /// Starts a new game from any state.
    ///
    /// This regenerates the maze, puts the player back on the start cell, clears the trail, refills
    /// the clock and hides the end-of-game popup before emitting the first timer readout.
    ///
    /// # Errors
    ///
    /// This function returns an error if the configured maze dimensions are invalid.
    pub(crate) fn start<S: StatusSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let maze = Maze::generate(self.settings.width, self.settings.height, &mut self.rng)?;

        self.session = Session::new(maze, self.settings.time_limit);
        self.session.state = GameState::Active;

        sink.hide_end_screen();
        sink.show_timer(TimerReadout::new(self.session.time_left()));

        info!(
            width = self.session.maze.width(),
            height = self.session.maze.height(),
            time_limit = self.settings.time_limit,
            "game started"
        );

        Ok(())
    }

    /// Advances the active game by one frame.
    ///
    /// The clock runs down by `delta` seconds first; a clock at or below zero is clamped and ends
    /// the game as lost. Otherwise the held directions move the player, the trail records the
    /// outcome and the timer readout is emitted. Reaching the exit ends the game as won within the
    /// same frame. Any state other than [`GameState::Active`] makes this a no-op.
    pub(crate) fn advance<S: StatusSink + ?Sized>(
        &mut self,
        delta: f64,
        held: &[Direction],
        sink: &mut S,
    ) -> GameState {
        if self.session.state != GameState::Active {
            return self.session.state;
        }

        self.session.time_left -= delta.max(0.);
        if self.session.time_left <= 0. {
            self.session.time_left = 0.;
            self.session.state = GameState::Lost;

            sink.show_timer(TimerReadout::new(0.));
            sink.show_end_screen(EndScreen::defeat());
            info!("time ran out");

            return self.session.state;
        }

        let step = motion::step(
            &self.session.maze,
            self.session.player,
            self.settings.speed,
            held,
        );
        self.session.player = step.position;
        self.session.trail.record(step.position, step.moved);
        trace!(
            x = step.position.x,
            y = step.position.y,
            trail = self.session.trail.len(),
            "frame advanced"
        );

        sink.show_timer(TimerReadout::new(self.session.time_left));

        if motion::reached_exit(self.session.player, self.session.exit) {
            self.session.state = GameState::Won;

            sink.show_end_screen(EndScreen::victory(self.session.time_left));
            info!(time_left = self.session.time_left, "player escaped");
        }

        self.session.state
    }
}
