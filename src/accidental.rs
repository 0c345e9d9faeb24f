//! Accidental resolution.
//!
//! Walks the timeline in time order and decides, per notehead, whether an
//! accidental glyph is needed. The memory table is owned by the caller and
//! passed in, so the caller picks its lifetime: one bar, one system, or the
//! whole score. Memory is never reset implicitly; use
//! [`AccidentalMemory::reset`] or [`AccidentalOptions::reset_at_bar_lines`].

use std::collections::{HashMap, HashSet};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::key_signature::KeySignature;
use crate::pitch::{Alteration, Letter};
use crate::score::Score;
use crate::timeline::Timeline;

/// Current alteration of each (letter, octave) that has sounded.
#[derive(Debug, Clone)]
pub struct AccidentalMemory {
    key: KeySignature,
    table: HashMap<(Letter, i32), Alteration>,
}

impl AccidentalMemory {
    pub fn new(key: KeySignature) -> Self {
        Self { key, table: HashMap::new() }
    }

    pub fn key(&self) -> &KeySignature {
        &self.key
    }

    /// Forget everything; the key signature applies again everywhere.
    pub fn reset(&mut self) {
        self.table.clear();
    }

    /// Forget everything and switch to a new key.
    pub fn reset_with_key(&mut self, key: KeySignature) {
        self.key = key;
        self.table.clear();
    }

    /// Alteration in force for `letter` in `octave`.
    pub fn get(&self, letter: Letter, octave: i32) -> Alteration {
        self.table
            .get(&(letter, octave))
            .copied()
            .unwrap_or_else(|| self.key.default_alteration(letter))
    }

    fn lookup_or_seed(&mut self, letter: Letter, octave: i32) -> Alteration {
        let key = &self.key;
        *self
            .table
            .entry((letter, octave))
            .or_insert_with(|| key.default_alteration(letter))
    }

    fn remember(&mut self, letter: Letter, octave: i32, alteration: Alteration) {
        self.table.insert((letter, octave), alteration);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccidentalOptions {
    /// Clear the memory at every node holding a bar line
    pub reset_at_bar_lines: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AccidentalResolver {
    options: AccidentalOptions,
}

impl AccidentalResolver {
    pub fn new(options: AccidentalOptions) -> Self {
        Self { options }
    }

    /// Resolve every note on `timeline`, storing the decision on each
    /// tickable. Returns the number of accidentals attached.
    pub fn apply(&self, score: &mut Score, timeline: &Timeline, memory: &mut AccidentalMemory) -> Result<usize> {
        let mut attached = 0;

        for node in timeline.nodes() {
            let mut has_bar_line = false;
            for &id in node.tickables() {
                has_bar_line |= score.tickable(id)?.is_bar_line();
            }
            if self.options.reset_at_bar_lines && has_bar_line {
                trace!("bar line at {}: accidental memory reset", node.start());
                memory.reset();
            }

            // Pitches whose alteration changed at this tick; restating one
            // in another voice needs the glyph again.
            let mut modified: HashSet<(Letter, i32)> = HashSet::new();

            for &id in node.tickables() {
                let pitches = score.tickable(id)?.pitches().to_vec();
                for (i, pitch) in pitches.iter().enumerate() {
                    let slot = (pitch.letter, pitch.octave);
                    let written = pitch.effective();
                    let current = memory.lookup_or_seed(pitch.letter, pitch.octave);

                    let accidental = if written != current {
                        memory.remember(pitch.letter, pitch.octave, written);
                        modified.insert(slot);
                        Some(written)
                    } else if modified.contains(&slot) {
                        Some(written)
                    } else {
                        None
                    };

                    if accidental.is_some() {
                        attached += 1;
                    }
                    score.tickable_mut(id)?.set_accidental(i, accidental);
                }
            }
        }

        debug!("accidentals resolved: {} attached over {} nodes", attached, timeline.len());
        Ok(attached)
    }
}
