//! Width measurement.
//!
//! The formatter treats glyph metrics as an oracle behind
//! [`WidthMeasurer`]. [`GlyphMetrics`] is a fixed-size implementation
//! matching the SVG backend's noteheads and accidentals.

use serde::{Deserialize, Serialize};

use crate::pitch::Alteration;
use crate::render::constants::*;
use crate::tickable::{Tickable, TickableKind};

pub trait WidthMeasurer {
    /// Minimum horizontal footprint of the tickable's body.
    fn measure(&self, tickable: &Tickable) -> f64;

    /// Padding needed by modifiers, as `(left, right)`.
    fn modifier_padding(&self, _tickable: &Tickable) -> (f64, f64) {
        (0.0, 0.0)
    }
}

/// Fixed glyph sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphMetrics {
    pub notehead_width: f64,
    pub rest_width: f64,
    pub bar_line_width: f64,
    pub dot_width: f64,
    pub accidental_gap: f64,
    pub char_width: f64,
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self {
            notehead_width: NOTEHEAD_RX * 2.0,
            rest_width: REST_WIDTH,
            bar_line_width: BARLINE_WIDTH,
            dot_width: DOT_SPACING,
            accidental_gap: ACCIDENTAL_GAP,
            char_width: TEXT_CHAR_WIDTH,
        }
    }
}

impl GlyphMetrics {
    pub fn accidental_width(&self, alteration: Alteration) -> f64 {
        match alteration {
            Alteration::Flat | Alteration::Natural => KEY_SIG_FLAT_SPACE,
            Alteration::DoubleFlat => KEY_SIG_FLAT_SPACE * 1.75,
            Alteration::Sharp | Alteration::DoubleSharp => KEY_SIG_SHARP_SPACE,
            _ => KEY_SIG_SHARP_SPACE * 1.2,
        }
    }
}

impl WidthMeasurer for GlyphMetrics {
    fn measure(&self, tickable: &Tickable) -> f64 {
        match &tickable.kind {
            TickableKind::Note { .. } => self.notehead_width,
            TickableKind::Rest => self.rest_width,
            TickableKind::BarLine => self.bar_line_width,
            TickableKind::Marker { label } => label.chars().count() as f64 * self.char_width,
        }
    }

    fn modifier_padding(&self, tickable: &Tickable) -> (f64, f64) {
        // Accidentals in a chord stack in one column; the widest wins.
        let left = tickable
            .accidentals()
            .iter()
            .flatten()
            .map(|&a| self.accidental_width(a) + self.accidental_gap)
            .fold(0.0, f64::max);
        let right = tickable.dots() as f64 * self.dot_width;
        (left, right)
    }
}
