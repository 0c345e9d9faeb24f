//! Key signatures: the default alteration of each diatonic letter.

use serde::Serialize;

use crate::error::{FormatError, Result};
use crate::pitch::{Alteration, Letter};

/// Key name → number of fifths (positive sharps, negative flats).
const KEY_SIGNATURES: &[(&str, i32)] = &[
    ("C", 0),
    ("Am", 0),
    ("F", -1),
    ("Dm", -1),
    ("Bb", -2),
    ("Gm", -2),
    ("Eb", -3),
    ("Cm", -3),
    ("Ab", -4),
    ("Fm", -4),
    ("Db", -5),
    ("Bbm", -5),
    ("Gb", -6),
    ("Ebm", -6),
    ("Cb", -7),
    ("Abm", -7),
    ("G", 1),
    ("Em", 1),
    ("D", 2),
    ("Bm", 2),
    ("A", 3),
    ("F#m", 3),
    ("E", 4),
    ("C#m", 4),
    ("B", 5),
    ("G#m", 5),
    ("F#", 6),
    ("D#m", 6),
    ("C#", 7),
    ("A#m", 7),
];

const SHARP_ORDER: [Letter; 7] = [
    Letter::F,
    Letter::C,
    Letter::G,
    Letter::D,
    Letter::A,
    Letter::E,
    Letter::B,
];

const FLAT_ORDER: [Letter; 7] = [
    Letter::B,
    Letter::E,
    Letter::A,
    Letter::D,
    Letter::G,
    Letter::C,
    Letter::F,
];

/// Extended `sharps_N` / `flats_N` forms go up to doubled alterations.
const MAX_EXTENDED: i32 = 14;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeySignature {
    /// Key name as given ("Bb", "C#m", "flats_8")
    pub name: String,
    /// Sharps (positive) or flats (negative)
    pub fifths: i32,
    defaults: [Alteration; 7],
}

impl KeySignature {
    /// Parse a key name. Accepts the named major/minor keys and the
    /// extended `sharps_N` / `flats_N` forms.
    pub fn parse(spec: &str) -> Result<Self> {
        let bad = || FormatError::BadKeySignature(spec.to_string());

        let fifths = if let Some(n) = spec.strip_prefix("sharps_") {
            n.parse::<u8>().map_err(|_| bad())? as i32
        } else if let Some(n) = spec.strip_prefix("flats_") {
            -(n.parse::<u8>().map_err(|_| bad())? as i32)
        } else {
            KEY_SIGNATURES
                .iter()
                .find(|(name, _)| *name == spec)
                .map(|(_, fifths)| *fifths)
                .ok_or_else(bad)?
        };

        if fifths.abs() > MAX_EXTENDED {
            return Err(bad());
        }
        let mut key = Self::from_fifths(fifths)?;
        key.name = spec.to_string();
        Ok(key)
    }

    /// Build from a fifths count, MusicXML style.
    pub fn from_fifths(fifths: i32) -> Result<Self> {
        if fifths.abs() > MAX_EXTENDED {
            return Err(FormatError::BadKeySignature(format!("fifths={fifths}")));
        }

        let mut defaults = [Alteration::Natural; 7];
        let (order, single, double) = if fifths >= 0 {
            (SHARP_ORDER, Alteration::Sharp, Alteration::DoubleSharp)
        } else {
            (FLAT_ORDER, Alteration::Flat, Alteration::DoubleFlat)
        };
        for i in 0..fifths.unsigned_abs() as usize {
            let letter = order[i % 7];
            defaults[letter.index()] = if i < 7 { single } else { double };
        }

        let name = KEY_SIGNATURES
            .iter()
            .find(|(name, f)| *f == fifths && !name.ends_with('m'))
            .map_or_else(
                || {
                    if fifths >= 0 {
                        format!("sharps_{fifths}")
                    } else {
                        format!("flats_{}", -fifths)
                    }
                },
                |(name, _)| name.to_string(),
            );

        Ok(Self { name, fifths, defaults })
    }

    /// Default alteration of a letter in this key, independent of octave.
    pub fn default_alteration(&self, letter: Letter) -> Alteration {
        self.defaults[letter.index()]
    }

    /// Number of accidental glyphs in the signature.
    pub fn accidental_count(&self) -> usize {
        self.fifths.unsigned_abs() as usize
    }

    pub fn has_key_signature(spec: &str) -> bool {
        KEY_SIGNATURES.iter().any(|(name, _)| *name == spec)
    }
}

impl Default for KeySignature {
    fn default() -> Self {
        Self {
            name: "C".to_string(),
            fifths: 0,
            defaults: [Alteration::Natural; 7],
        }
    }
}
