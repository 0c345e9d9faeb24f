//! Timeline nodes: every tickable, across all voices, that starts at one
//! instant.

use log::trace;
use serde::Serialize;

use crate::error::Result;
use crate::fraction::Fraction;
use crate::metrics::WidthMeasurer;
use crate::score::{Score, TickableId};

#[derive(Debug, Clone, Serialize)]
pub struct TickContext {
    tickables: Vec<TickableId>,
    /// Start offset in ticks from the beginning of the voices
    start: Fraction,
    /// `start` scaled by the timeline's resolution multiplier
    tick_key: i64,
    min_ticks: Option<Fraction>,
    max_ticks: Fraction,
    x: f64,
    width: f64,
    left_padding: f64,
    /// Widest left modifier column; noteheads line up after it
    modifier_left: f64,
    extra: f64,
    pre_formatted: bool,
}

impl TickContext {
    pub(crate) fn new(start: Fraction, tick_key: i64) -> Self {
        Self {
            tickables: Vec::new(),
            start,
            tick_key,
            min_ticks: None,
            max_ticks: Fraction::ZERO,
            x: 0.0,
            width: 0.0,
            left_padding: 0.0,
            modifier_left: 0.0,
            extra: 0.0,
            pre_formatted: false,
        }
    }

    pub(crate) fn add_tickable(&mut self, id: TickableId, ticks: Fraction, ignore_ticks: bool) {
        self.tickables.push(id);
        self.pre_formatted = false;
        if ignore_ticks || ticks.is_zero() {
            return;
        }
        match self.min_ticks {
            Some(m) if m <= ticks => {}
            _ => self.min_ticks = Some(ticks),
        }
        if ticks > self.max_ticks {
            self.max_ticks = ticks;
        }
    }

    pub fn tickables(&self) -> &[TickableId] {
        &self.tickables
    }

    pub fn start(&self) -> Fraction {
        self.start
    }

    pub fn tick_key(&self) -> i64 {
        self.tick_key
    }

    /// Shortest event starting here; zero when only markers start here.
    pub fn ticks(&self) -> Fraction {
        self.min_ticks.unwrap_or(Fraction::ZERO)
    }

    pub fn max_ticks(&self) -> Fraction {
        self.max_ticks
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn left_padding(&self) -> f64 {
        self.left_padding
    }

    /// Justification space given to this node by the last format pass.
    pub fn extra(&self) -> f64 {
        self.extra
    }

    pub fn is_pre_formatted(&self) -> bool {
        self.pre_formatted
    }

    /// Measure every member. Simultaneous events share one horizontal
    /// slot, so the node is as wide as its widest member, not the sum.
    /// Noteheads of all members align, so the widest left modifiers, body
    /// and right modifiers are combined.
    pub fn pre_format(&mut self, score: &mut Score, measurer: &dyn WidthMeasurer, padding: f64) -> Result<()> {
        if self.pre_formatted {
            return Ok(());
        }

        let (mut left_px, mut body_px, mut right_px) = (0.0_f64, 0.0_f64, 0.0_f64);
        for &id in &self.tickables {
            let (body, (left, right)) = {
                let t = score.tickable(id)?;
                (measurer.measure(t), measurer.modifier_padding(t))
            };
            let tickable = score.tickable_mut(id)?;
            tickable.set_measurement(body, left, right);
            body_px = body_px.max(tickable.width()?);
            left_px = left_px.max(tickable.left_modifier_width());
            right_px = right_px.max(tickable.right_modifier_width());
        }

        self.modifier_left = left_px;
        self.width = left_px + body_px + right_px;
        self.left_padding = padding;
        self.pre_formatted = true;
        trace!(
            "node @{}: {} tickables, width {:.1}",
            self.start,
            self.tickables.len(),
            self.width
        );
        Ok(())
    }

    /// Raise the node width to at least `min`.
    pub(crate) fn widen_to(&mut self, min: f64) {
        if self.width < min {
            self.width = min;
        }
    }

    pub(crate) fn set_extra(&mut self, extra: f64) {
        self.extra = extra;
    }

    /// Place the node and, through it, every member. Members sit right of
    /// the shared modifier column.
    pub fn set_x(&mut self, x: f64, score: &mut Score) -> Result<()> {
        self.x = x;
        for &id in &self.tickables {
            score.tickable_mut(id)?.set_x(x + self.modifier_left);
        }
        Ok(())
    }
}
