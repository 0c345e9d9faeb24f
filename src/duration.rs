//! Duration token parsing.
//!
//! A token is a duration code (`"4"`, `"q"`, `"1/2"`), any number of
//! dots (`d`), and an optional note-type code (`r` for rest, `h` for
//! harmonic, ...). Examples: `"8d"` is a dotted eighth, `"16r"` a
//! sixteenth rest, `"qdh"` a dotted quarter harmonic.

use serde::Serialize;

use crate::error::{FormatError, Result};
use crate::fraction::Fraction;
use crate::tables;

/// A parsed duration token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationSpec {
    /// Sanitized duration code ("4", "8", "1/2", ...)
    pub duration: String,
    /// Ticks of the undotted value
    pub base_ticks: i64,
    /// Number of augmentation dots
    pub dots: u32,
    /// Total ticks including dots
    pub ticks: Fraction,
    /// Note-type code ("n", "r", "h", ...)
    pub note_type: String,
}

impl DurationSpec {
    pub fn parse(token: &str) -> Result<Self> {
        let bad = |why: &str| FormatError::BadArguments(format!("invalid duration token '{token}': {why}"));

        let token = token.trim();
        if token.is_empty() {
            return Err(bad("empty"));
        }

        // Duration code: digits with an optional slash, or a single letter alias.
        let code_len = if token.starts_with(|c: char| c.is_ascii_digit()) {
            token
                .find(|c: char| !(c.is_ascii_digit() || c == '/'))
                .unwrap_or(token.len())
        } else {
            token.chars().next().map_or(0, |c| c.len_utf8())
        };
        let (code, rest) = token.split_at(code_len);
        let duration = tables::sanitize_duration(code)?;
        let base_ticks = tables::duration_to_ticks(duration)?;

        let type_start = rest.find(|c: char| c != 'd').unwrap_or(rest.len());
        let (dot_str, type_code) = rest.split_at(type_start);
        let dots = dot_str.len() as u32;

        let note_type = if type_code.is_empty() { "n" } else { type_code };
        if tables::note_type_name(note_type).is_none() {
            return Err(bad("unknown note type"));
        }

        let mut ticks = Fraction::from_integer(base_ticks);
        let mut current = Fraction::from_integer(base_ticks);
        for _ in 0..dots {
            if current.value() <= 1.0 {
                return Err(bad("too many dots"));
            }
            current = current.divide(Fraction::from_integer(2))?;
            ticks += current;
        }

        Ok(Self {
            duration: duration.to_string(),
            base_ticks,
            dots,
            ticks: ticks.simplify(),
            note_type: note_type.to_string(),
        })
    }

    /// Ratio of dotted to undotted length (`3/2` for one dot).
    pub fn dot_multiplier(&self) -> Result<Fraction> {
        self.ticks.divide(Fraction::from_integer(self.base_ticks))
    }

    pub fn is_rest(&self) -> bool {
        self.note_type == "r"
    }
}
