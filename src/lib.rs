//! This crate contains the game logic and terminal front end of labyrun, a maze-escape game played
//! against the clock.
//!
//! Every game carves a fresh perfect maze, drops the player in its top-left corner and gives them
//! a fixed number of seconds to reach the exit in the opposite corner. The player glides through
//! the corridors with the arrow or `wasd` keys while the camera follows them.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
mod config;
mod events;
mod game;
mod input;
mod logging;
mod maze;
mod motion;
mod render;
mod surface;
mod trail;
mod types;
mod ui;

pub use app::App;
pub use config::Config;
pub use logging::init_logging;
