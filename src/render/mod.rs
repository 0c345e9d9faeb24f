//! Drawing backends.
//!
//! The layout engine only decides where things go. Once a format pass has
//! given every tickable its x, [`Score::draw_voice`](crate::score::Score::draw_voice)
//! hands them to a [`DrawContext`].

pub(crate) mod constants;
mod svg;

pub use svg::SvgContext;

use crate::tickable::Tickable;

pub trait DrawContext {
    /// Draw one tickable whose notehead column starts at `x`. Bar lines
    /// arrive through [`draw_bar_line`](Self::draw_bar_line) instead.
    fn draw_tickable(&mut self, tickable: &Tickable, x: f64);

    /// Draw a bar line at `x`.
    fn draw_bar_line(&mut self, x: f64);
}
