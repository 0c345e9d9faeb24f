//! Shared glyph dimensions and colors (all in SVG user units).

// ── Staff dimensions ────────────────────────────────────────────────
pub(crate) const STAFF_LINE_SPACING: f64 = 10.0; // distance between staff lines
pub(crate) const STAFF_HEIGHT: f64 = 40.0; // 5 lines, 4 spaces
pub(crate) const STAFF_TOP: f64 = 30.0;

// ── Stave furniture ─────────────────────────────────────────────────
pub(crate) const CLEF_SPACE: f64 = 32.0; // horizontal space for clef at system start
pub(crate) const KEY_SIG_SHARP_SPACE: f64 = 10.0;
pub(crate) const KEY_SIG_FLAT_SPACE: f64 = 8.0;
pub(crate) const TIME_SIG_SPACE: f64 = 24.0;

// ── Note dimensions ─────────────────────────────────────────────────
pub(crate) const NOTEHEAD_RX: f64 = 5.5; // notehead ellipse x-radius
pub(crate) const NOTEHEAD_RY: f64 = 4.0; // notehead ellipse y-radius
pub(crate) const STEM_LENGTH: f64 = 30.0;
pub(crate) const STEM_WIDTH: f64 = 1.2;
pub(crate) const BARLINE_WIDTH: f64 = 1.0;
pub(crate) const STAFF_LINE_WIDTH: f64 = 0.8;
pub(crate) const DOT_SPACING: f64 = 6.0; // notehead edge to dot, dot included
pub(crate) const ACCIDENTAL_GAP: f64 = 3.0; // accidental to notehead
pub(crate) const REST_WIDTH: f64 = 10.0;
pub(crate) const TEXT_CHAR_WIDTH: f64 = 7.0;

// ── Colors ──────────────────────────────────────────────────────────
pub(crate) const NOTE_COLOR: &str = "#1a1a1a";
pub(crate) const STAFF_COLOR: &str = "#555555";
pub(crate) const BARLINE_COLOR: &str = "#333333";
pub(crate) const REST_COLOR: &str = "#1a1a1a";
