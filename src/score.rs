//! The tickable arena.
//!
//! A `Score` owns every tickable and voice. Voices and timeline nodes
//! refer to tickables by handle, so rebuilding the timeline is a matter
//! of clearing node handles rather than chasing references.

use serde::Serialize;

use crate::error::{FormatError, Result};
use crate::render::DrawContext;
use crate::tickable::{Tickable, TickableKind};
use crate::voice::Voice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TickableId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VoiceId(pub usize);

/// Index of a node in the current [`Timeline`](crate::timeline::Timeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Default)]
pub struct Score {
    tickables: Vec<Tickable>,
    voices: Vec<Voice>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_voice(&mut self, voice: Voice) -> VoiceId {
        self.voices.push(voice);
        VoiceId(self.voices.len() - 1)
    }

    /// Append `tickable` to `voice`. The voice checks its budget before
    /// the tickable enters the arena, so a rejected tickable leaves no trace.
    pub fn add_tickable(&mut self, voice: VoiceId, mut tickable: Tickable) -> Result<TickableId> {
        let id = TickableId(self.tickables.len());
        let v = self
            .voices
            .get_mut(voice.0)
            .ok_or(FormatError::UnknownVoice(voice.0))?;
        v.add_tickable(id, tickable.ticks(), tickable.should_ignore_ticks())?;
        tickable.set_voice(voice);
        self.tickables.push(tickable);
        Ok(id)
    }

    pub fn add_tickables<I>(&mut self, voice: VoiceId, tickables: I) -> Result<Vec<TickableId>>
    where
        I: IntoIterator<Item = Tickable>,
    {
        tickables
            .into_iter()
            .map(|t| self.add_tickable(voice, t))
            .collect()
    }

    pub fn voice(&self, id: VoiceId) -> Result<&Voice> {
        self.voices.get(id.0).ok_or(FormatError::UnknownVoice(id.0))
    }

    pub fn voice_mut(&mut self, id: VoiceId) -> Result<&mut Voice> {
        self.voices.get_mut(id.0).ok_or(FormatError::UnknownVoice(id.0))
    }

    pub fn voice_ids(&self) -> impl Iterator<Item = VoiceId> {
        (0..self.voices.len()).map(VoiceId)
    }

    pub fn tickable(&self, id: TickableId) -> Result<&Tickable> {
        self.tickables.get(id.0).ok_or(FormatError::UnknownTickable(id.0))
    }

    pub fn tickable_mut(&mut self, id: TickableId) -> Result<&mut Tickable> {
        self.tickables.get_mut(id.0).ok_or(FormatError::UnknownTickable(id.0))
    }

    pub fn tickables(&self) -> impl Iterator<Item = (TickableId, &Tickable)> {
        self.tickables.iter().enumerate().map(|(i, t)| (TickableId(i), t))
    }

    /// The tickables of one voice, in order.
    pub fn voice_tickables(&self, voice: VoiceId) -> Result<Vec<&Tickable>> {
        self.voice(voice)?
            .tickables()
            .iter()
            .map(|&id| self.tickable(id))
            .collect()
    }

    /// Drop every tickable's node handle, width and position.
    pub(crate) fn detach_all(&mut self) {
        for t in &mut self.tickables {
            t.detach_node();
        }
    }

    /// Hand each tickable of `voice` to the drawing backend at its final x.
    /// Bar lines go to [`DrawContext::draw_bar_line`].
    pub fn draw_voice(&self, voice: VoiceId, ctx: &mut dyn DrawContext) -> Result<()> {
        for &id in self.voice(voice)?.tickables() {
            let tickable = self.tickable(id)?;
            let x = tickable.x()?;
            match tickable.kind {
                TickableKind::BarLine => ctx.draw_bar_line(x),
                _ => ctx.draw_tickable(tickable, x),
            }
        }
        Ok(())
    }
}
