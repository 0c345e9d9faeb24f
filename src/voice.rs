//! Voices: one rhythmic line, an ordered run of tickables with a tick
//! budget.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{FormatError, Result};
use crate::fraction::Fraction;
use crate::score::TickableId;
use crate::tables::RESOLUTION;
use crate::time_signature::TimeSignature;

/// How a voice checks its tick budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceMode {
    /// Budget from a time signature; overflow fails on add, underflow on finalize
    Strict,
    /// Any total is accepted (glyph runs and other display-only sequences)
    Soft,
    /// Like `Strict`, but the budget is supplied by the caller
    Exact,
}

#[derive(Debug, Clone)]
pub struct Voice {
    mode: VoiceMode,
    time: Option<TimeSignature>,
    total_ticks: Fraction,
    ticks_used: Fraction,
    tickables: Vec<TickableId>,
    smallest_ticks: Option<Fraction>,
    resolution_multiplier: i64,
}

impl Voice {
    /// A strict voice whose budget comes from `time`.
    pub fn new(time: TimeSignature) -> Self {
        Self {
            mode: VoiceMode::Strict,
            time: Some(time),
            total_ticks: time.total_ticks(RESOLUTION).simplify(),
            ticks_used: Fraction::ZERO,
            tickables: Vec::new(),
            smallest_ticks: None,
            resolution_multiplier: 1,
        }
    }

    /// An exact voice with a caller-supplied budget.
    pub fn with_total_ticks(total_ticks: Fraction) -> Self {
        Self {
            mode: VoiceMode::Exact,
            time: None,
            total_ticks: total_ticks.simplify(),
            ticks_used: Fraction::ZERO,
            tickables: Vec::new(),
            smallest_ticks: None,
            resolution_multiplier: 1,
        }
    }

    /// A soft voice; never checks its budget.
    pub fn soft() -> Self {
        let mut voice = Self::new(TimeSignature::COMMON);
        voice.mode = VoiceMode::Soft;
        voice
    }

    pub fn set_mode(&mut self, mode: VoiceMode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> VoiceMode {
        self.mode
    }

    pub fn time_signature(&self) -> Option<TimeSignature> {
        self.time
    }

    pub fn total_ticks(&self) -> Fraction {
        self.total_ticks
    }

    pub fn ticks_used(&self) -> Fraction {
        self.ticks_used
    }

    pub fn tickables(&self) -> &[TickableId] {
        &self.tickables
    }

    pub fn len(&self) -> usize {
        self.tickables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickables.is_empty()
    }

    /// Shortest tick value added so far (zero-tick markers excluded).
    pub fn smallest_ticks(&self) -> Option<Fraction> {
        self.smallest_ticks
    }

    /// Least common multiple of the tick denominators seen so far; scaling
    /// offsets by it makes every start offset in the voice an integer.
    pub fn resolution_multiplier(&self) -> i64 {
        self.resolution_multiplier
    }

    pub fn is_complete(&self) -> bool {
        match self.mode {
            VoiceMode::Soft => true,
            VoiceMode::Strict | VoiceMode::Exact => self.ticks_used == self.total_ticks,
        }
    }

    /// Append a tickable of `ticks` duration. Strict and exact voices fail
    /// the moment the running total would exceed the budget.
    pub(crate) fn add_tickable(&mut self, id: TickableId, ticks: Fraction, ignore_ticks: bool) -> Result<()> {
        if !ignore_ticks {
            let next = (self.ticks_used + ticks).simplify();
            if next > self.total_ticks {
                if self.mode == VoiceMode::Soft {
                    warn!(
                        "soft voice over budget: {} > {} at tickable {}",
                        next,
                        self.total_ticks,
                        self.tickables.len()
                    );
                } else {
                    return Err(FormatError::TooManyTicks {
                        index: self.tickables.len(),
                        used: next.to_string(),
                        total: self.total_ticks.to_string(),
                    });
                }
            }
            self.ticks_used = next;

            if !ticks.is_zero() {
                let reduced = ticks.simplify();
                self.resolution_multiplier = Fraction::lcm(self.resolution_multiplier, reduced.denominator);
                match self.smallest_ticks {
                    Some(s) if s <= reduced => {}
                    _ => self.smallest_ticks = Some(reduced),
                }
            }
        }
        self.tickables.push(id);
        Ok(())
    }

    /// Check the budget once the voice is fully built.
    pub fn finalize(&self) -> Result<()> {
        if self.mode != VoiceMode::Soft && self.ticks_used < self.total_ticks {
            return Err(FormatError::TooFewTicks {
                used: self.ticks_used.to_string(),
                total: self.total_ticks.to_string(),
            });
        }
        debug!(
            "voice finalized: {} tickables, {} of {} ticks",
            self.tickables.len(),
            self.ticks_used,
            self.total_ticks
        );
        Ok(())
    }
}
