//! Event handling functions for user input and application state updates.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{types::GameState, App};

/// Target time between two frames.
///
/// Player speed is expressed per frame, so the loop waits for input until the budget of the current
/// frame is spent instead of returning on the first event.
pub(crate) const FRAME_BUDGET: Duration = Duration::from_millis(16);

/// Handles input events until the current frame's budget runs out.
///
/// This function polls for terminal events and dispatches every one of them to
/// [`handle_event`], so that a burst of key presses and releases within a single frame is applied
/// in order before the game advances.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    let deadline = app.last_frame + FRAME_BUDGET;

    while event::poll(deadline.saturating_duration_since(Instant::now()))? {
        handle_event(app, &event::read()?, Instant::now())?;
    }

    Ok(())
}

/// Applies a single terminal event.
///
/// Key events are handled by [`handle_key_event`]; every other event is ignored, since resizes are
/// picked up by the next redraw.
pub(crate) fn handle_event(app: &mut App, event: &Event, now: Instant) -> Result<()> {
    if let Event::Key(key) = event {
        handle_key_event(app, *key, now)?;
    }

    Ok(())
}

/// Handles key events.
///
/// Directional keys update the held-key map. On press, `Enter` and `Space` start a game unless one
/// is running, while `q`, `Esc` and `Ctrl-C` quit. Any other key is ignored.
pub(crate) fn handle_key_event(app: &mut App, key: KeyEvent, now: Instant) -> Result<()> {
    if app.input.apply(key, now) || key.kind == KeyEventKind::Release {
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.exit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.exit = true,
        KeyCode::Enter | KeyCode::Char(' ') => handle_start(app)?,
        _ => {}
    }

    Ok(())
}

/// Handles the start command.
///
/// This function starts a fresh game from the idle screen or from either end screen. While a game
/// is running the command is ignored.
pub(crate) fn handle_start(app: &mut App) -> Result<()> {
    let state = app.game.state();
    if state == GameState::Idle || state.is_over() {
        app.start()?;
    }

    Ok(())
}
