//! Terminal implementation of the drawing surface.
//!
//! This module maps the abstract pixels of a [`Surface`] onto the cells of a Ratatui [`Buffer`].
//! A terminal cell is roughly twice as tall as it is wide, so every cell covers one pixel
//! horizontally and [`PIXELS_PER_ROW`] pixels vertically. A cell is painted when its centre lies
//! inside the rectangle being filled.

use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use crate::render::{Bounds, Glow, Rgba, Surface};

/// Surface pixels covered by one terminal row.
pub(crate) const PIXELS_PER_ROW: f64 = 2.;

/// Opacity of a glow halo relative to its colour.
const GLOW_OPACITY: f64 = 0.35;

/// Drawing surface writing background colours into a terminal buffer.
pub(crate) struct TerminalSurface<'buf> {
    /// Buffer being painted.
    buffer: &'buf mut Buffer,
    /// Region of the buffer the surface covers.
    area: Rect,
    /// Current translation in surface pixels.
    offset: (f64, f64),
    /// Glow applied beneath fills.
    glow: Option<Glow>,
    /// Colour assumed under cells without an RGB background.
    backdrop: Rgba,
}

impl<'buf> TerminalSurface<'buf> {
    /// Creates a surface over the part of `area` that lies inside the buffer.
    pub(crate) fn new(buffer: &'buf mut Buffer, area: Rect) -> Self {
        let area = buffer.area.intersection(area);

        Self {
            buffer,
            area,
            offset: (0., 0.),
            glow: None,
            backdrop: Rgba::rgb(0, 0, 0),
        }
    }

    /// Blends a colour over every cell whose centre lies inside the untranslated bounds.
    fn paint(&mut self, bounds: Bounds, color: Rgba) {
        let half_row = PIXELS_PER_ROW / 2.;
        let first_col = to_cell(bounds.x - 0.5, self.area.width);
        let last_col = to_cell(bounds.x + bounds.width - 0.5, self.area.width);
        let first_row = to_cell((bounds.y - half_row) / PIXELS_PER_ROW, self.area.height);
        let last_row = to_cell(
            (bounds.y + bounds.height - half_row) / PIXELS_PER_ROW,
            self.area.height,
        );

        for row in first_row..last_row {
            for col in first_col..last_col {
                let position = (
                    self.area.x.saturating_add(col),
                    self.area.y.saturating_add(row),
                );
                if let Some(cell) = self.buffer.cell_mut(position) {
                    let under = match cell.bg {
                        Color::Rgb(red, green, blue) => Rgba::rgb(red, green, blue),
                        _ => self.backdrop,
                    };
                    let _ = cell.set_char(' ').set_bg(to_color(blend(color, under)));
                }
            }
        }
    }
}

impl Surface for TerminalSurface<'_> {
    fn size(&self) -> (f64, f64) {
        (
            f64::from(self.area.width),
            f64::from(self.area.height) * PIXELS_PER_ROW,
        )
    }

    fn clear(&mut self, color: Rgba) {
        self.backdrop = Rgba { alpha: 1., ..color };

        for row in 0..self.area.height {
            for col in 0..self.area.width {
                let position = (
                    self.area.x.saturating_add(col),
                    self.area.y.saturating_add(row),
                );
                if let Some(cell) = self.buffer.cell_mut(position) {
                    cell.reset();
                    let _ = cell.set_bg(to_color(self.backdrop));
                }
            }
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.offset.0 += dx;
        self.offset.1 += dy;
    }

    fn reset_transform(&mut self) {
        self.offset = (0., 0.);
        self.glow = None;
    }

    fn set_glow(&mut self, glow: Option<Glow>) {
        self.glow = glow;
    }

    fn fill_rect(&mut self, bounds: Bounds, color: Rgba) {
        let bounds = Bounds {
            x: bounds.x + self.offset.0,
            y: bounds.y + self.offset.1,
            ..bounds
        };

        if let Some(glow) = self.glow {
            let halo = glow.color.with_alpha(glow.color.alpha * GLOW_OPACITY);
            self.paint(bounds.expand(glow.radius), halo);
        }

        self.paint(bounds, color);
    }
}

/// Rounds a pixel boundary up to the first cell whose centre lies past it, clamped to `0..=limit`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is clamped to the u16 range before the conversion; NaN maps to zero."
)]
fn to_cell(value: f64, limit: u16) -> u16 {
    value.ceil().clamp(0., f64::from(limit)) as u16
}

/// Composites a colour over an opaque one.
fn blend(over: Rgba, under: Rgba) -> Rgba {
    Rgba::rgb(
        mix(over.red, under.red, over.alpha),
        mix(over.green, under.green, over.alpha),
        mix(over.blue, under.blue, over.alpha),
    )
}

/// Interpolates a single channel.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is rounded and clamped to the u8 range before the conversion."
)]
fn mix(over: u8, under: u8, alpha: f64) -> u8 {
    let over = f64::from(over);
    let under = f64::from(under);

    (over - under).mul_add(alpha, under).round().clamp(0., 255.) as u8
}

/// Converts a colour into a terminal colour, ignoring its opacity.
const fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.red, color.green, color.blue)
}
