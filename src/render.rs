//! Scene rendering in player-centred camera space.
//!
//! This module contains the [`Surface`] abstraction the game draws onto and the render pipeline
//! that paints the maze, the trail, the exit and the player on it every frame. Surface units are
//! abstract pixels; one maze cell spans [`CELL_SIZE`] of them.

use crate::{game::Session, types::Position};

/// Side of a maze cell in surface pixels.
pub(crate) const CELL_SIZE: f64 = 4.;

/// Margin around a trail square, in surface pixels.
const TRAIL_INSET: f64 = CELL_SIZE * 8. / 35.;

/// Margin around the exit and player squares, in surface pixels.
const MARKER_INSET: f64 = CELL_SIZE * 5. / 35.;

/// Opacity added per trail entry, from the oldest to the newest.
const TRAIL_ALPHA_STEP: f64 = 0.1;

/// Extent of the glow around highlighted squares, in surface pixels.
const GLOW_RADIUS: f64 = 1.;

/// Colour of the cleared surface.
pub(crate) const BACKGROUND: Rgba = Rgba::rgb(0x0f, 0x17, 0x2a);

/// Colour of wall cells.
pub(crate) const WALL: Rgba = Rgba::rgb(0x1e, 0x29, 0x3b);

/// Colour of the trail, before its per-entry opacity is applied.
pub(crate) const TRAIL: Rgba = Rgba::rgb(0x63, 0x66, 0xf1);

/// Colour of the exit square and its glow.
pub(crate) const EXIT: Rgba = Rgba::rgb(0x22, 0xc5, 0x5e);

/// Colour of the player square and its glow.
pub(crate) const PLAYER: Rgba = Rgba::rgb(0x63, 0x66, 0xf1);

/// Colour with straight alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rgba {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Opacity between `0.0` and `1.0`.
    pub alpha: f64,
}

impl Rgba {
    /// Builds an opaque colour.
    pub(crate) const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.,
        }
    }

    /// Returns the same colour with the given opacity, clamped to `0.0..=1.0`.
    #[must_use]
    pub(crate) fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0., 1.),
            ..self
        }
    }
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Bounds {
    /// Returns the square covering the cell at the given continuous position, shrunk by `inset`
    /// on every side.
    pub(crate) fn cell(position: Position, inset: f64) -> Self {
        Self {
            x: position.x.mul_add(CELL_SIZE, inset),
            y: position.y.mul_add(CELL_SIZE, inset),
            width: 2.0f64.mul_add(-inset, CELL_SIZE),
            height: 2.0f64.mul_add(-inset, CELL_SIZE),
        }
    }

    /// Returns the rectangle grown by `amount` on every side.
    #[must_use]
    pub(crate) fn expand(self, amount: f64) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            width: 2.0f64.mul_add(amount, self.width),
            height: 2.0f64.mul_add(amount, self.height),
        }
    }
}

/// Soft halo drawn around filled rectangles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Glow {
    /// Colour of the halo.
    pub color: Rgba,
    /// Extent of the halo beyond the rectangle, in surface pixels.
    pub radius: f64,
}

/// Two-dimensional drawing target.
///
/// Implementations keep a translation that applies to every subsequent [`fill_rect`] and an
/// optional glow painted beneath every subsequent fill.
///
/// [`fill_rect`]: Surface::fill_rect
pub(crate) trait Surface {
    /// Returns the current width and height in surface pixels.
    fn size(&self) -> (f64, f64);
    /// Paints the whole surface with a colour, ignoring the translation.
    fn clear(&mut self, color: Rgba);
    /// Adds an offset to the current translation.
    fn translate(&mut self, dx: f64, dy: f64);
    /// Drops the translation and the glow.
    fn reset_transform(&mut self);
    /// Sets or removes the glow applied to later fills.
    fn set_glow(&mut self, glow: Option<Glow>);
    /// Fills a translated rectangle, blending by the colour's opacity.
    fn fill_rect(&mut self, bounds: Bounds, color: Rgba);
}

/// Draws one frame of the session onto the surface.
///
/// The surface is cleared and translated so the player's continuous position sits at the centre
/// of the surface. Walls, trail, exit and player are then painted back to front; the exit and the
/// player glow in their own colour. The surface size is queried on every call so resizes apply
/// on the next frame.
pub(crate) fn draw_scene<S: Surface + ?Sized>(session: &Session, surface: &mut S) {
    let (width, height) = surface.size();
    let player = session.player();

    surface.clear(BACKGROUND);
    surface.translate(
        player.x.mul_add(-CELL_SIZE, width / 2.),
        player.y.mul_add(-CELL_SIZE, height / 2.),
    );

    for cell in session.maze().walls() {
        surface.fill_rect(Bounds::cell(Position::from_cell(cell), 0.), WALL);
    }

    let mut alpha = 0.;
    for &position in session.trail().iter() {
        alpha += TRAIL_ALPHA_STEP;
        surface.fill_rect(
            Bounds::cell(position, TRAIL_INSET),
            TRAIL.with_alpha(alpha),
        );
    }

    surface.set_glow(Some(Glow {
        color: EXIT,
        radius: GLOW_RADIUS,
    }));
    surface.fill_rect(Bounds::cell(session.exit(), MARKER_INSET), EXIT);

    surface.set_glow(Some(Glow {
        color: PLAYER,
        radius: GLOW_RADIUS,
    }));
    surface.fill_rect(Bounds::cell(player, MARKER_INSET), PLAYER);

    surface.reset_transform();
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{
        game::{EndScreen, Game, Settings, StatusSink, TimerReadout},
        types::Direction,
    };

    /// Drawing call captured by [`RecordingSurface`].
    #[derive(Clone, Debug, PartialEq)]
    enum Op {
        /// [`Surface::clear`].
        Clear(Rgba),
        /// [`Surface::translate`].
        Translate(f64, f64),
        /// [`Surface::reset_transform`].
        Reset,
        /// [`Surface::set_glow`].
        Glow(Option<Glow>),
        /// [`Surface::fill_rect`].
        Fill(Bounds, Rgba),
    }

    /// Surface recording every call for later inspection.
    struct RecordingSurface {
        /// Reported size.
        size: (f64, f64),
        /// Captured calls, in order.
        ops: Vec<Op>,
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (f64, f64) {
            self.size
        }

        fn clear(&mut self, color: Rgba) {
            self.ops.push(Op::Clear(color));
        }

        fn translate(&mut self, dx: f64, dy: f64) {
            self.ops.push(Op::Translate(dx, dy));
        }

        fn reset_transform(&mut self) {
            self.ops.push(Op::Reset);
        }

        fn set_glow(&mut self, glow: Option<Glow>) {
            self.ops.push(Op::Glow(glow));
        }

        fn fill_rect(&mut self, bounds: Bounds, color: Rgba) {
            self.ops.push(Op::Fill(bounds, color));
        }
    }

    /// Sink discarding every readout.
    struct NullSink;

    impl StatusSink for NullSink {
        fn show_timer(&mut self, _: TimerReadout) {}

        fn show_end_screen(&mut self, _: EndScreen) {}

        fn hide_end_screen(&mut self) {}
    }

    /// Creates a started game over a small maze.
    fn started_game() -> Game {
        let settings = Settings {
            width: 7,
            height: 7,
            speed: 0.05,
            ..Settings::default()
        };
        let mut game = Game::new(settings, Pcg32::seed_from_u64(3)).expect("settings are valid");
        game.start(&mut NullSink).expect("start should succeed");

        game
    }

    /// Renders the session and returns the captured calls.
    fn record(session: &Session, size: (f64, f64)) -> Vec<Op> {
        let mut surface = RecordingSurface {
            size,
            ops: Vec::new(),
        };
        draw_scene(session, &mut surface);

        surface.ops
    }

    /// Returns the colours of every fill, in order.
    fn fill_colors(ops: &[Op]) -> Vec<Rgba> {
        ops.iter()
            .filter_map(|op| match op {
                Op::Fill(_, color) => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_draw_scene_starts_with_clear_and_camera() {
        let game = started_game();

        let ops = record(game.session(), (80., 48.));

        assert_eq!(ops.first(), Some(&Op::Clear(BACKGROUND)));
        // Player at (1, 1) sits at pixel (4, 4), which moves to the centre (40, 24).
        assert_eq!(ops.get(1), Some(&Op::Translate(36., 20.)));
        assert_eq!(ops.last(), Some(&Op::Reset));
    }

    #[test]
    fn test_draw_scene_reads_size_every_frame() {
        let game = started_game();

        let small = record(game.session(), (20., 10.));
        let large = record(game.session(), (200., 100.));

        assert_eq!(small.get(1), Some(&Op::Translate(6., 1.)));
        assert_eq!(large.get(1), Some(&Op::Translate(96., 46.)));
    }

    #[test]
    fn test_draw_scene_paints_every_wall() {
        let game = started_game();

        let ops = record(game.session(), (80., 48.));
        let walls = fill_colors(&ops)
            .into_iter()
            .filter(|color| *color == WALL)
            .count();

        assert_eq!(walls, game.session().maze().walls().count());
    }

    #[test]
    fn test_draw_scene_order_without_trail() {
        let game = started_game();
        let walls = game.session().maze().walls().count();

        let ops = record(game.session(), (80., 48.));
        let tail: Vec<_> = ops.iter().skip(2 + walls).cloned().collect();

        assert_eq!(
            tail,
            vec![
                Op::Glow(Some(Glow {
                    color: EXIT,
                    radius: GLOW_RADIUS
                })),
                Op::Fill(
                    Bounds::cell(game.session().exit(), MARKER_INSET),
                    EXIT
                ),
                Op::Glow(Some(Glow {
                    color: PLAYER,
                    radius: GLOW_RADIUS
                })),
                Op::Fill(
                    Bounds::cell(game.session().player(), MARKER_INSET),
                    PLAYER
                ),
                Op::Reset,
            ]
        );
    }

    #[test]
    fn test_draw_scene_trail_fades_in() {
        let mut game = started_game();
        for _ in 0..3 {
            let _ = game.advance(0.01, &[Direction::Up, Direction::Left], &mut NullSink);
        }
        let trail_len = game.session().trail().len();
        assert_eq!(trail_len, 3, "the player should have moved inside the start cell");

        let ops = record(game.session(), (80., 48.));
        let trail: Vec<_> = fill_colors(&ops)
            .into_iter()
            .filter(|color| color.red == TRAIL.red && color.alpha < 1.)
            .collect();

        assert_eq!(trail.len(), trail_len);
        for pair in trail.windows(2) {
            if let [older, newer] = pair {
                assert!(older.alpha < newer.alpha, "trail opacity must increase");
            }
        }
        assert!(trail.first().is_some_and(|color| (color.alpha - 0.1).abs() < 1e-9));
    }

    #[test]
    fn test_bounds_cell_inset() {
        let bounds = Bounds::cell(Position::new(2., 3.), 1.);

        assert_eq!(
            bounds,
            Bounds {
                x: 9.,
                y: 13.,
                width: 2.,
                height: 2.,
            }
        );
    }

    #[test]
    fn test_bounds_expand() {
        let bounds = Bounds::cell(Position::new(0., 0.), 0.).expand(1.);

        assert_eq!(
            bounds,
            Bounds {
                x: -1.,
                y: -1.,
                width: 6.,
                height: 6.,
            }
        );
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert!((TRAIL.with_alpha(1.5).alpha - 1.).abs() < f64::EPSILON);
        assert!(TRAIL.with_alpha(-0.5).alpha.abs() < f64::EPSILON);
    }
}
