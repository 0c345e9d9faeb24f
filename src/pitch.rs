//! Pitch names: diatonic letters, written alterations and octaves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, Result};

/// Diatonic letter, ordered C..B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Diatonic index, C = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Semitones above C of the natural letter.
    pub fn semitone(self) -> i32 {
        [0, 2, 4, 5, 7, 9, 11][self.index()]
    }

    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn name(self) -> char {
        ['C', 'D', 'E', 'F', 'G', 'A', 'B'][self.index()]
    }
}

/// A written pitch alteration. Every variant is a distinct state:
/// a double sharp is never treated as its enharmonic natural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alteration {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
    QuarterSharp,
    ThreeQuarterSharp,
    QuarterFlat,
    ThreeQuarterFlat,
    KucukMucennebSharp,
    BuyukMucennebSharp,
    BakiyeFlat,
    BuyukMucennebFlat,
    Sori,
    Koron,
}

impl Alteration {
    /// Parse an accidental code (`#`, `bb`, `n`, `+`, `db`, ...).
    pub fn from_code(code: &str) -> Option<Alteration> {
        let alteration = match code {
            "bb" => Alteration::DoubleFlat,
            "b" => Alteration::Flat,
            "n" => Alteration::Natural,
            "#" => Alteration::Sharp,
            "##" => Alteration::DoubleSharp,
            "+" => Alteration::QuarterSharp,
            "++" => Alteration::ThreeQuarterSharp,
            "d" => Alteration::QuarterFlat,
            "db" => Alteration::ThreeQuarterFlat,
            "+-" => Alteration::KucukMucennebSharp,
            "bbs" | "++-" => Alteration::BuyukMucennebSharp,
            "bs" => Alteration::BakiyeFlat,
            "bss" => Alteration::BuyukMucennebFlat,
            "o" => Alteration::Sori,
            "k" => Alteration::Koron,
            _ => return None,
        };
        Some(alteration)
    }

    pub fn code(self) -> &'static str {
        match self {
            Alteration::DoubleFlat => "bb",
            Alteration::Flat => "b",
            Alteration::Natural => "n",
            Alteration::Sharp => "#",
            Alteration::DoubleSharp => "##",
            Alteration::QuarterSharp => "+",
            Alteration::ThreeQuarterSharp => "++",
            Alteration::QuarterFlat => "d",
            Alteration::ThreeQuarterFlat => "db",
            Alteration::KucukMucennebSharp => "+-",
            Alteration::BuyukMucennebSharp => "bbs",
            Alteration::BakiyeFlat => "bs",
            Alteration::BuyukMucennebFlat => "bss",
            Alteration::Sori => "o",
            Alteration::Koron => "k",
        }
    }

    /// Whole-semitone offset; `None` for microtonal symbols.
    pub fn semitones(self) -> Option<i32> {
        match self {
            Alteration::DoubleFlat => Some(-2),
            Alteration::Flat => Some(-1),
            Alteration::Natural => Some(0),
            Alteration::Sharp => Some(1),
            Alteration::DoubleSharp => Some(2),
            _ => None,
        }
    }

    pub fn is_microtonal(self) -> bool {
        self.semitones().is_none()
    }
}

impl fmt::Display for Alteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A pitch as written: letter, optional written accidental, octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub letter: Letter,
    /// Accidental in the source; `None` means none was written
    pub written: Option<Alteration>,
    /// Octave number (middle C = C4)
    pub octave: i32,
}

impl Pitch {
    pub fn new(letter: Letter, written: Option<Alteration>, octave: i32) -> Self {
        Self { letter, written, octave }
    }

    /// The alteration the note sounds with. A bare letter is natural.
    pub fn effective(&self) -> Alteration {
        self.written.unwrap_or(Alteration::Natural)
    }

    /// MIDI note number for whole-semitone alterations. Middle C = 60.
    pub fn to_midi(&self) -> Option<i32> {
        let alter = self.effective().semitones()?;
        Some((self.octave + 1) * 12 + self.letter.semitone() + alter)
    }

    /// Parse `"c#/4"` (engine key format) or `"C#4"` / `"cbb4"`.
    pub fn parse(s: &str) -> Result<Pitch> {
        let bad = || FormatError::BadArguments(format!("invalid note name: '{s}'"));

        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().and_then(Letter::from_char).ok_or_else(bad)?;
        let rest = chars.as_str();

        let (accidental, octave) = match rest.split_once('/') {
            Some((acc, oct)) => (acc, oct),
            None => split_short_form(rest).ok_or_else(bad)?,
        };

        let written = if accidental.is_empty() {
            None
        } else {
            Some(Alteration::from_code(&accidental.to_ascii_lowercase()).ok_or_else(bad)?)
        };
        let octave = octave.trim().parse::<i32>().map_err(|_| bad())?;

        Ok(Pitch { letter, written, octave })
    }
}

/// Split `"#4"`, `"+-4"` or `"b-1"` into accidental and octave. The octave
/// is the trailing digits; a `-` before them is its sign unless it belongs
/// to an accidental code (`+-`, `++-`). Use the slash form for a negative
/// octave after such a code.
fn split_short_form(rest: &str) -> Option<(&str, &str)> {
    let digits = rest.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == rest.len() {
        return None;
    }
    let head = &rest[..digits];
    match head.strip_suffix('-') {
        Some(acc) if Alteration::from_code(&head.to_ascii_lowercase()).is_none() => {
            Some((acc, &rest[acc.len()..]))
        }
        _ => Some((head, &rest[digits..])),
    }
}

impl FromStr for Pitch {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        Pitch::parse(s)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let acc = self.written.map_or("", |a| a.code());
        write!(f, "{}{}/{}", self.letter.name().to_ascii_lowercase(), acc, self.octave)
    }
}
