//! Stave furniture: how much of a stave's width the clef, key signature
//! and time signature take before the first note.

use serde::Serialize;

use crate::key_signature::KeySignature;
use crate::render::constants::*;
use crate::time_signature::TimeSignature;

const DEFAULT_PADDING: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stave {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    /// Whether a clef is drawn at the start
    pub clef: bool,
    pub key: Option<KeySignature>,
    pub time: Option<TimeSignature>,
}

impl Stave {
    pub fn new(x: f64, width: f64) -> Self {
        Self {
            x,
            y: STAFF_TOP,
            width,
            padding_left: DEFAULT_PADDING,
            padding_right: DEFAULT_PADDING,
            clef: false,
            key: None,
            time: None,
        }
    }

    pub fn with_clef(mut self) -> Self {
        self.clef = true;
        self
    }

    pub fn with_key(mut self, key: KeySignature) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_time(mut self, time: TimeSignature) -> Self {
        self.time = Some(time);
        self
    }

    /// Width of the key signature glyphs; flats pack tighter than sharps.
    pub fn key_signature_width(&self) -> f64 {
        match &self.key {
            Some(key) if key.fifths > 0 => key.accidental_count() as f64 * KEY_SIG_SHARP_SPACE,
            Some(key) => key.accidental_count() as f64 * KEY_SIG_FLAT_SPACE,
            None => 0.0,
        }
    }

    /// Clef + key signature + time signature.
    pub fn furniture_width(&self) -> f64 {
        let mut w = 0.0;
        if self.clef {
            w += CLEF_SPACE;
        }
        w += self.key_signature_width();
        if self.time.is_some() {
            w += TIME_SIG_SPACE;
        }
        w
    }

    /// Where the first timeline node may begin.
    pub fn note_start_x(&self) -> f64 {
        self.x + self.padding_left + self.furniture_width()
    }

    /// Horizontal space left for notes; never negative.
    pub fn justify_width(&self) -> f64 {
        (self.width - self.padding_left - self.padding_right - self.furniture_width()).max(0.0)
    }

    pub fn note_end_x(&self) -> f64 {
        self.x + self.width - self.padding_right
    }

    /// y of staff line `line` (0 = top line).
    pub fn line_y(&self, line: usize) -> f64 {
        self.y + line as f64 * STAFF_LINE_SPACING
    }

    pub fn bottom_y(&self) -> f64 {
        self.y + STAFF_HEIGHT
    }
}
