//! Time signatures and the tick budget they imply.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, Result};
use crate::fraction::Fraction;

/// Time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    /// Numerator (e.g., 3 in 3/4)
    pub num_beats: u32,
    /// Denominator (e.g., 4 in 3/4)
    pub beat_value: u32,
}

impl TimeSignature {
    pub const COMMON: TimeSignature = TimeSignature { num_beats: 4, beat_value: 4 };
    pub const CUT: TimeSignature = TimeSignature { num_beats: 2, beat_value: 2 };

    pub fn new(num_beats: u32, beat_value: u32) -> Result<Self> {
        if num_beats == 0 || beat_value == 0 {
            return Err(FormatError::BadTimeSignature(format!("{num_beats}/{beat_value}")));
        }
        Ok(Self { num_beats, beat_value })
    }

    /// Parse `"4/4"`, `"6/8"`, `"C"` (common time) or `"C|"` (cut time).
    pub fn parse(spec: &str) -> Result<Self> {
        let bad = || FormatError::BadTimeSignature(spec.to_string());
        match spec.trim() {
            "C" => Ok(Self::COMMON),
            "C|" => Ok(Self::CUT),
            s => {
                let (top, bottom) = s.split_once('/').ok_or_else(bad)?;
                let top = top.trim().parse::<u32>().map_err(|_| bad())?;
                let bottom = bottom.trim().parse::<u32>().map_err(|_| bad())?;
                Self::new(top, bottom).map_err(|_| bad())
            }
        }
    }

    /// `num_beats * (resolution / beat_value)` ticks.
    pub fn total_ticks(&self, resolution: i64) -> Fraction {
        Fraction {
            numerator: self.num_beats as i64 * resolution,
            denominator: self.beat_value as i64,
        }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::COMMON
    }
}

impl FromStr for TimeSignature {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        TimeSignature::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::RESOLUTION;

    #[test]
    fn parses_specs() {
        assert_eq!(TimeSignature::parse("6/8").unwrap(), TimeSignature { num_beats: 6, beat_value: 8 });
        assert_eq!(TimeSignature::parse("C").unwrap(), TimeSignature::COMMON);
        assert_eq!(TimeSignature::parse("C|").unwrap(), TimeSignature::CUT);
        for bad in ["", "4", "0/4", "4/0", "a/b"] {
            assert!(TimeSignature::parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn tick_budget() {
        assert_eq!(TimeSignature::COMMON.total_ticks(RESOLUTION), Fraction::from_integer(RESOLUTION));
        assert_eq!(
            TimeSignature::parse("3/8").unwrap().total_ticks(RESOLUTION),
            Fraction::from_integer(6144)
        );
    }
}
