//! Color helpers for presenting dots in a terminal.

use ratatui::style::Color;

/// An RGB tint that dots are painted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint(pub u8, pub u8, pub u8);

impl Tint {
    pub const WHITE: Tint = Tint(255, 255, 255);

    pub fn color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }
}

impl Default for Tint {
    fn default() -> Self {
        Tint::WHITE
    }
}

impl From<(u8, u8, u8)> for Tint {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Tint(r, g, b)
    }
}

/// `tint` at `alpha` composited over black.
pub fn shade(tint: Tint, alpha: f64) -> Color {
    let a = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
    let channel = |c: u8| (c as f64 * a).round() as u8;
    Color::Rgb(channel(tint.0), channel(tint.1), channel(tint.2))
}

/// Linear blend from `from` to `to` at `t` in `[0, 1]`.
pub fn blend(from: Tint, to: Tint, t: f64) -> Tint {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Tint(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}
