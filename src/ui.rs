//! User interface rendering functions for the game screen.

use color_eyre::eyre::Result;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Clear},
    Frame,
};

use crate::{
    render,
    surface::TerminalSurface,
    types::GameState,
    App,
};

/// Key bindings listed in the status line.
const HELP: &str = "(arrows/wasd) move / (enter) start / (q) quit ";

/// Updates the application UI based on the persistent state.
///
/// This function renders the status line at the top of the terminal and the maze below it, and
/// lays the idle or end-of-game popup over the maze when one applies.
///
/// # Errors
///
/// This function may return errors from data conversion failures while laying out popups.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let [status_area, maze_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(frame.area());

    status_line(app, frame, status_area);

    let mut surface = TerminalSurface::new(frame.buffer_mut(), maze_area);
    render::draw_scene(app.game.session(), &mut surface);

    if let Some(screen) = &app.hud.end_screen {
        let color = if app.game.state() == GameState::Won {
            Color::Green
        } else {
            Color::Red
        };
        popup(
            frame,
            maze_area,
            &screen.title,
            vec![Line::raw(screen.description.as_str())],
            "(enter) try again / (q) quit",
            color,
        )?;
    } else if app.game.state() == GameState::Idle {
        popup(
            frame,
            maze_area,
            "LABYRUN",
            vec![
                Line::raw("Reach the green exit before the clock runs out."),
                Line::raw(""),
                Line::raw("press enter to start"),
            ],
            "(q) quit",
            Color::Green,
        )?;
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Renders the timer, the seed and the key bindings on a single row.
///
/// The timer turns red once less than ten seconds remain.
pub(crate) fn status_line(app: &App, frame: &mut Frame, area: Rect) {
    let timer_style = if app.hud.timer.low {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    let status = Line::from(vec![
        Span::styled(format!(" {} ", app.hud.timer.text), timer_style),
        Span::styled(format!(" seed {} ", app.seed), Color::DarkGray),
    ]);
    let help = Line::styled(HELP, Color::DarkGray).right_aligned();

    frame.render_widget(help, area);
    frame.render_widget(status, area);
}

/// Renders a bordered popup centred over `area`.
///
/// The popup is sized to fit its title, body and hint, and is clipped to `area` on small
/// terminals.
///
/// # Errors
///
/// This function returns an error if the popup dimensions do not fit terminal coordinates.
pub(crate) fn popup(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    body: Vec<Line>,
    hint: &str,
    color: Color,
) -> Result<()> {
    let content_width = body
        .iter()
        .map(Line::width)
        .chain([title.len(), hint.len()])
        .max()
        .unwrap_or_default();
    let width = u16::try_from(content_width + 4)?.min(area.width);
    let height = u16::try_from(body.len() + 2)?.min(area.height);

    let x = rounded_div::i32(i32::from(area.width - width), 2);
    let y = rounded_div::i32(i32::from(area.height - height), 2);
    let space = Rect::new(
        area.x + u16::try_from(x)?,
        area.y + u16::try_from(y)?,
        width,
        height,
    )
    .intersection(area);

    let block = Block::bordered()
        .title(Line::styled(title, Style::default().add_modifier(Modifier::BOLD)))
        .title_bottom(hint)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(color).bg(Color::Black))
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(space);

    frame.render_widget(Clear, space);
    frame.render_widget(block, space);
    frame.render_widget(Text::from(body).centered(), inner_space);

    Ok(())
}
