//! Timeline construction: merge N voices into one ordered run of nodes.
//!
//! Each voice keeps a cursor (next tickable, start offset). Every step picks
//! the smallest offset among unfinished voices and gathers into one node
//! whatever starts there. Tickables that ignore ticks (bar lines, clef
//! changes) never move their cursor, so they land in the node at the
//! voice's current offset.

use log::debug;
use serde::Serialize;

use crate::error::Result;
use crate::fraction::Fraction;
use crate::score::{NodeId, Score, VoiceId};
use crate::tick_context::TickContext;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Timeline {
    nodes: Vec<TickContext>,
    /// LCMM of the voices' resolution multipliers
    resolution_multiplier: i64,
    /// Latest end offset across voices
    total_ticks: Fraction,
}

impl Timeline {
    pub fn nodes(&self) -> &[TickContext] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [TickContext] {
        &mut self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&TickContext> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn resolution_multiplier(&self) -> i64 {
        self.resolution_multiplier
    }

    pub fn total_ticks(&self) -> Fraction {
        self.total_ticks
    }
}

struct Cursor {
    voice: VoiceId,
    next: usize,
    offset: Fraction,
}

pub struct TimelineBuilder;

impl TimelineBuilder {
    /// Build the timeline for `voices`. Node handles left on the score by a
    /// previous build are cleared first.
    pub fn build(score: &mut Score, voices: &[VoiceId]) -> Result<Timeline> {
        let mut multipliers = Vec::with_capacity(voices.len());
        for &v in voices {
            multipliers.push(score.voice(v)?.resolution_multiplier());
        }
        let resolution_multiplier = Fraction::lcmm(&multipliers).max(1);

        score.detach_all();

        let mut cursors: Vec<Cursor> = voices
            .iter()
            .map(|&voice| Cursor { voice, next: 0, offset: Fraction::ZERO })
            .collect();
        let mut nodes: Vec<TickContext> = Vec::new();

        loop {
            // Smallest offset among voices with tickables left
            let mut current: Option<Fraction> = None;
            for cursor in &cursors {
                if cursor.next >= score.voice(cursor.voice)?.len() {
                    continue;
                }
                match current {
                    Some(c) if c <= cursor.offset => {}
                    _ => current = Some(cursor.offset),
                }
            }
            let Some(start) = current else { break };

            let node_id = NodeId(nodes.len());
            let mut node = TickContext::new(start, tick_key(start, resolution_multiplier));

            for cursor in cursors.iter_mut().filter(|c| c.offset == start) {
                let ids = score.voice(cursor.voice)?.tickables().to_vec();
                while let Some(&id) = ids.get(cursor.next) {
                    cursor.next += 1;
                    let tickable = score.tickable_mut(id)?;
                    let ticks = tickable.ticks();
                    let ignore = tickable.should_ignore_ticks();
                    tickable.attach_node(node_id);
                    node.add_tickable(id, ticks, ignore);
                    if !ignore && !ticks.is_zero() {
                        cursor.offset = (cursor.offset + ticks).simplify();
                        break;
                    }
                }
            }
            nodes.push(node);
        }

        let total_ticks = cursors
            .iter()
            .map(|c| c.offset)
            .max()
            .unwrap_or(Fraction::ZERO);

        debug!(
            "timeline built: {} voices, {} nodes, {} ticks, resolution multiplier {}",
            voices.len(),
            nodes.len(),
            total_ticks,
            resolution_multiplier
        );

        Ok(Timeline { nodes, resolution_multiplier, total_ticks })
    }
}

/// Offset scaled to an integer key on the common resolution.
fn tick_key(offset: Fraction, resolution_multiplier: i64) -> i64 {
    let scaled = (offset * resolution_multiplier).simplify();
    scaled.numerator / scaled.denominator
}
