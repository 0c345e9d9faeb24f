//! Engine-wide constants and lookup tables.

use crate::error::{FormatError, Result};
use crate::fraction::Fraction;

/// Ticks per whole note.
pub const RESOLUTION: i64 = 16384;

/// Default softmax factor for justification. Higher values give long
/// notes a larger share of the extra width.
pub const SOFTMAX_FACTOR: f64 = 10.0;

// ── Duration codes ──────────────────────────────────────────────────

/// Duration code → ticks. A quarter note is `RESOLUTION / 4`.
const DURATIONS: &[(&str, i64)] = &[
    ("1/2", RESOLUTION * 2),
    ("1", RESOLUTION),
    ("2", RESOLUTION / 2),
    ("4", RESOLUTION / 4),
    ("8", RESOLUTION / 8),
    ("16", RESOLUTION / 16),
    ("32", RESOLUTION / 32),
    ("64", RESOLUTION / 64),
    ("128", RESOLUTION / 128),
    ("256", RESOLUTION / 256),
];

const DURATION_ALIASES: &[(&str, &str)] = &[("w", "1"), ("h", "2"), ("q", "4"), ("b", "256")];

/// Note-type codes accepted after the duration and dots.
pub const VALID_NOTE_TYPES: &[(&str, &str)] = &[
    ("n", "note"),
    ("r", "rest"),
    ("h", "harmonic"),
    ("m", "muted"),
    ("s", "slash"),
    ("g", "ghost"),
    ("d", "diamond"),
    ("x", "x"),
    ("ci", "circled"),
    ("cx", "circle x"),
    ("sf", "slashed"),
    ("sb", "slashed backward"),
    ("sq", "square"),
    ("tu", "triangle up"),
    ("td", "triangle down"),
];

/// Resolve aliases (`q` → `4`) and reject unknown durations.
pub fn sanitize_duration(duration: &str) -> Result<&'static str> {
    let resolved = DURATION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == duration)
        .map_or(duration, |(_, code)| *code);

    DURATIONS
        .iter()
        .find(|(code, _)| *code == resolved)
        .map(|(code, _)| *code)
        .ok_or_else(|| {
            FormatError::BadArguments(format!("the provided duration is not valid: {duration}"))
        })
}

/// Ticks of an undotted duration code.
pub fn duration_to_ticks(duration: &str) -> Result<i64> {
    let code = sanitize_duration(duration)?;
    DURATIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, ticks)| *ticks)
        .ok_or_else(|| FormatError::BadArguments(format!("invalid duration: {duration}")))
}

/// The duration as a fraction of a whole note (`"8"` → `1/8`).
pub fn duration_to_fraction(duration: &str) -> Result<Fraction> {
    let code = sanitize_duration(duration)?;
    match code.split_once('/') {
        // "1/2" is a breve: two whole notes.
        Some((n, d)) => code_part(d)?.divide(code_part(n)?),
        None => Fraction::new(1, code_part(code)?.numerator),
    }
}

fn code_part(s: &str) -> Result<Fraction> {
    s.parse::<Fraction>()
}

pub fn note_type_name(code: &str) -> Option<&'static str> {
    VALID_NOTE_TYPES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}
