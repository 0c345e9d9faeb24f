//! Tickables: anything that occupies a span of musical time.
//!
//! A tickable is owned by the [`Score`](crate::score::Score) arena and
//! referenced by handle from exactly one voice and, once the timeline is
//! built, from exactly one timeline node.

use serde::Serialize;

use crate::duration::DurationSpec;
use crate::error::{FormatError, Result};
use crate::fraction::Fraction;
use crate::pitch::{Alteration, Pitch};
use crate::score::{NodeId, VoiceId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TickableKind {
    /// A note or chord; one pitch per notehead
    Note { pitches: Vec<Pitch> },
    Rest,
    /// Bar line marker (takes no time)
    BarLine,
    /// Clef change, glyph run entry, or any other zero-time marker
    Marker { label: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Tickable {
    pub kind: TickableKind,
    /// Parsed duration token (None for bar lines and markers)
    pub duration: Option<DurationSpec>,
    ticks: Fraction,
    intrinsic_ticks: Fraction,
    tick_multiplier: Fraction,
    ignore_ticks: bool,
    #[serde(skip)]
    voice: Option<VoiceId>,
    #[serde(skip)]
    node: Option<NodeId>,
    width: Option<f64>,
    left_modifier_width: f64,
    right_modifier_width: f64,
    /// Resolved accidental per pitch (None = no glyph)
    accidentals: Vec<Option<Alteration>>,
    x: Option<f64>,
    /// Horizontal offset from the node position
    pub x_shift: f64,
}

impl Tickable {
    fn with_ticks(kind: TickableKind, duration: Option<DurationSpec>, ticks: Fraction) -> Self {
        let accidentals = match &kind {
            TickableKind::Note { pitches } => vec![None; pitches.len()],
            _ => Vec::new(),
        };
        Self {
            kind,
            duration,
            ticks,
            intrinsic_ticks: ticks,
            tick_multiplier: Fraction::ONE,
            ignore_ticks: false,
            voice: None,
            node: None,
            width: None,
            left_modifier_width: 0.0,
            right_modifier_width: 0.0,
            accidentals,
            x: None,
            x_shift: 0.0,
        }
    }

    /// A note from a duration token and key names (`"c#/4"`, `"Bb4"`).
    /// A rest token (`"8r"`) yields a rest and the keys are ignored.
    pub fn note(duration: &str, keys: &[&str]) -> Result<Self> {
        let spec = DurationSpec::parse(duration)?;
        let ticks = spec.ticks;
        if spec.is_rest() {
            return Ok(Self::with_ticks(TickableKind::Rest, Some(spec), ticks));
        }
        if keys.is_empty() {
            return Err(FormatError::BadArguments("a note needs at least one key".to_string()));
        }
        let pitches = keys.iter().map(|k| Pitch::parse(k)).collect::<Result<Vec<_>>>()?;
        Ok(Self::with_ticks(TickableKind::Note { pitches }, Some(spec), ticks))
    }

    /// A rest of the given duration (`"4"` and `"4r"` are equivalent).
    pub fn rest(duration: &str) -> Result<Self> {
        let spec = DurationSpec::parse(duration)?;
        let ticks = spec.ticks;
        Ok(Self::with_ticks(TickableKind::Rest, Some(spec), ticks))
    }

    pub fn bar_line() -> Self {
        let mut t = Self::with_ticks(TickableKind::BarLine, None, Fraction::ZERO);
        t.ignore_ticks = true;
        t
    }

    /// A zero-time marker such as a clef change.
    pub fn marker(label: &str) -> Self {
        let mut t = Self::with_ticks(
            TickableKind::Marker { label: label.to_string() },
            None,
            Fraction::ZERO,
        );
        t.ignore_ticks = true;
        t
    }

    /// A glyph-run entry with an explicit tick value, for soft voices.
    pub fn glyph(label: &str, ticks: Fraction) -> Self {
        Self::with_ticks(TickableKind::Marker { label: label.to_string() }, None, ticks)
    }

    // ── Time ────────────────────────────────────────────────────────

    pub fn ticks(&self) -> Fraction {
        self.ticks
    }

    pub fn intrinsic_ticks(&self) -> Fraction {
        self.intrinsic_ticks
    }

    pub fn tick_multiplier(&self) -> Fraction {
        self.tick_multiplier
    }

    pub fn should_ignore_ticks(&self) -> bool {
        self.ignore_ticks
    }

    pub fn set_ignore_ticks(&mut self, flag: bool) -> &mut Self {
        self.ignore_ticks = flag;
        self
    }

    /// Scale the duration, e.g. `(2, 3)` for a triplet. Multipliers stack.
    pub fn apply_tick_multiplier(&mut self, numerator: i64, denominator: i64) -> Result<()> {
        let m = Fraction::new(numerator, denominator)?;
        self.tick_multiplier = (self.tick_multiplier * m).simplify();
        self.ticks = (self.intrinsic_ticks * self.tick_multiplier).simplify();
        Ok(())
    }

    pub fn clear_tuplets(&mut self) {
        self.tick_multiplier = Fraction::ONE;
        self.ticks = self.intrinsic_ticks;
    }

    // ── Ownership ───────────────────────────────────────────────────

    pub fn voice(&self) -> Option<VoiceId> {
        self.voice
    }

    pub(crate) fn set_voice(&mut self, voice: VoiceId) {
        self.voice = Some(voice);
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub(crate) fn attach_node(&mut self, node: NodeId) {
        self.node = Some(node);
        self.width = None;
        self.x = None;
    }

    pub(crate) fn detach_node(&mut self) {
        self.node = None;
        self.width = None;
        self.x = None;
    }

    // ── Measurement and position ────────────────────────────────────

    /// Minimum width. Reading it before the measurement pass is an error.
    pub fn width(&self) -> Result<f64> {
        self.width.ok_or(FormatError::UnformattedWidth)
    }

    pub fn is_pre_formatted(&self) -> bool {
        self.width.is_some()
    }

    pub(crate) fn set_measurement(&mut self, width: f64, left: f64, right: f64) {
        self.width = Some(width);
        self.left_modifier_width = left;
        self.right_modifier_width = right;
    }

    /// Space taken by modifiers (accidentals) left of the notehead.
    pub fn left_modifier_width(&self) -> f64 {
        self.left_modifier_width
    }

    /// Space taken by modifiers (dots) right of the notehead.
    pub fn right_modifier_width(&self) -> f64 {
        self.right_modifier_width
    }

    /// Width plus modifier padding on both sides.
    pub fn footprint(&self) -> Result<f64> {
        Ok(self.left_modifier_width + self.width()? + self.right_modifier_width)
    }

    pub(crate) fn set_x(&mut self, x: f64) {
        self.x = Some(x);
    }

    /// Resolved horizontal position, including `x_shift`.
    pub fn x(&self) -> Result<f64> {
        self.x.map(|x| x + self.x_shift).ok_or(FormatError::NoTimelineNode)
    }

    // ── Notes and accidentals ───────────────────────────────────────

    pub fn pitches(&self) -> &[Pitch] {
        match &self.kind {
            TickableKind::Note { pitches } => pitches,
            _ => &[],
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self.kind, TickableKind::Note { .. })
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.kind, TickableKind::Rest)
    }

    pub fn is_bar_line(&self) -> bool {
        matches!(self.kind, TickableKind::BarLine)
    }

    /// Accidental glyph decision per pitch.
    pub fn accidentals(&self) -> &[Option<Alteration>] {
        &self.accidentals
    }

    pub fn has_accidental(&self, index: usize) -> bool {
        self.accidentals.get(index).is_some_and(|a| a.is_some())
    }

    pub(crate) fn set_accidental(&mut self, index: usize, accidental: Option<Alteration>) {
        if let Some(slot) = self.accidentals.get_mut(index) {
            *slot = accidental;
            self.width = None;
        }
    }

    pub fn dots(&self) -> u32 {
        self.duration.as_ref().map_or(0, |d| d.dots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_before_measurement_is_an_error() {
        let t = Tickable::note("4", &["c/4"]).unwrap();
        assert_eq!(t.width(), Err(FormatError::UnformattedWidth));
        assert_eq!(t.x(), Err(FormatError::NoTimelineNode));
    }

    #[test]
    fn triplet_multiplier() {
        let mut t = Tickable::note("8", &["c/4"]).unwrap();
        t.apply_tick_multiplier(2, 3).unwrap();
        assert_eq!(t.ticks() * 3, Fraction::from_integer(4096));
        t.clear_tuplets();
        assert_eq!(t.ticks(), Fraction::from_integer(2048));
    }

    #[test]
    fn markers_ignore_ticks() {
        assert!(Tickable::bar_line().should_ignore_ticks());
        assert!(Tickable::marker("clef:bass").should_ignore_ticks());
        assert!(Tickable::rest("4").unwrap().is_rest());
        assert!(Tickable::note("8r", &[]).unwrap().is_rest());
        assert!(Tickable::note("8", &[]).is_err());
    }
}
