//! Horizontal layout: measure the timeline, then justify it to a width.
//!
//! Spare width is handed out with a softmax over node durations, so a
//! half note stretches more than the sixteenths around it and the
//! `softmax_factor` decides by how much.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{FormatError, Result};
use crate::metrics::{GlyphMetrics, WidthMeasurer};
use crate::score::{Score, VoiceId};
use crate::stave::Stave;
use crate::tables::SOFTMAX_FACTOR;
use crate::timeline::{Timeline, TimelineBuilder};

/// Space between consecutive nodes.
const DEFAULT_PADDING: f64 = 10.0;

// ═══════════════════════════════════════════════════════════════════════
// Options
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterOptions {
    /// Higher values give long notes more of the spare width
    pub softmax_factor: f64,
    /// Left padding of every node
    pub padding: f64,
    /// Floor on the measured width of a node
    pub min_node_width: f64,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            softmax_factor: SOFTMAX_FACTOR,
            padding: DEFAULT_PADDING,
            min_node_width: 0.0,
        }
    }
}

impl FormatterOptions {
    /// Load options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Layout snapshot
// ═══════════════════════════════════════════════════════════════════════

/// Resolved position of one timeline node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub start: String,
    pub tick_key: i64,
    pub ticks: String,
    pub x: f64,
    pub width: f64,
    pub left_padding: f64,
    pub extra: f64,
    pub tickables: Vec<usize>,
}

/// Result of a format pass, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedLayout {
    pub justify_width: f64,
    pub min_total_width: f64,
    pub extra: f64,
    pub resolution_multiplier: i64,
    pub nodes: Vec<NodeLayout>,
}

impl FormattedLayout {
    fn capture(timeline: &Timeline, justify_width: f64, min_total_width: f64, extra: f64) -> Self {
        let nodes = timeline
            .nodes()
            .iter()
            .map(|n| NodeLayout {
                start: n.start().to_string(),
                tick_key: n.tick_key(),
                ticks: n.ticks().to_string(),
                x: n.x(),
                width: n.width(),
                left_padding: n.left_padding(),
                extra: n.extra(),
                tickables: n.tickables().iter().map(|id| id.0).collect(),
            })
            .collect();
        Self {
            justify_width,
            min_total_width,
            extra,
            resolution_multiplier: timeline.resolution_multiplier(),
            nodes,
        }
    }

    /// Σ (width + left padding + extra) over all nodes.
    pub fn used_width(&self) -> f64 {
        self.nodes.iter().map(|n| n.width + n.left_padding + n.extra).sum()
    }
}

/// Serialize a layout snapshot to pretty JSON.
pub fn layout_to_json(layout: &FormattedLayout) -> Result<String> {
    Ok(serde_json::to_string_pretty(layout)?)
}

// ═══════════════════════════════════════════════════════════════════════
// Formatter
// ═══════════════════════════════════════════════════════════════════════

pub struct Formatter {
    options: FormatterOptions,
    measurer: Box<dyn WidthMeasurer>,
    timeline: Option<Timeline>,
    min_total_width: Option<f64>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(FormatterOptions::default())
    }
}

impl Formatter {
    pub fn new(options: FormatterOptions) -> Self {
        Self::with_measurer(options, Box::new(GlyphMetrics::default()))
    }

    pub fn with_measurer(options: FormatterOptions, measurer: Box<dyn WidthMeasurer>) -> Self {
        Self {
            options,
            measurer,
            timeline: None,
            min_total_width: None,
        }
    }

    pub fn options(&self) -> &FormatterOptions {
        &self.options
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Merge `voices` into a fresh timeline. Earlier measurements are
    /// discarded.
    pub fn join_voices(&mut self, score: &mut Score, voices: &[VoiceId]) -> Result<&Timeline> {
        let timeline = TimelineBuilder::build(score, voices)?;
        self.min_total_width = None;
        let timeline: &Timeline = self.timeline.insert(timeline);
        Ok(timeline)
    }

    /// Join `voices`, measure every node and return the narrowest width the
    /// layout can take: Σ (width + left padding). A strict or exact voice
    /// short of its budget fails here with `TooFewTicks`.
    pub fn pre_calculate_min_total_width(&mut self, score: &mut Score, voices: &[VoiceId]) -> Result<f64> {
        for &voice in voices {
            score.voice(voice)?.finalize()?;
        }
        self.join_voices(score, voices)?;
        let timeline = self.timeline.as_mut().ok_or(FormatError::NoTimelineNode)?;

        let mut total = 0.0;
        for node in timeline.nodes_mut() {
            node.pre_format(score, self.measurer.as_ref(), self.options.padding)?;
            node.widen_to(self.options.min_node_width);
            total += node.width() + node.left_padding();
        }

        debug!("minimum total width {:.1} over {} nodes", total, timeline.len());
        self.min_total_width = Some(total);
        Ok(total)
    }

    /// Width computed by the last [`pre_calculate_min_total_width`](Self::pre_calculate_min_total_width).
    pub fn min_total_width(&self) -> Result<f64> {
        self.min_total_width.ok_or(FormatError::UnformattedWidth)
    }

    /// Lay out `voices` across `justify_width`, starting at x = 0.
    pub fn format(&mut self, score: &mut Score, voices: &[VoiceId], justify_width: f64) -> Result<FormattedLayout> {
        self.format_from(score, voices, justify_width, 0.0)
    }

    /// Lay out `voices` in the space a stave leaves after its clef, key and
    /// time signatures.
    pub fn format_to_stave(&mut self, score: &mut Score, voices: &[VoiceId], stave: &Stave) -> Result<FormattedLayout> {
        self.format_from(score, voices, stave.justify_width(), stave.note_start_x())
    }

    fn format_from(&mut self, score: &mut Score, voices: &[VoiceId], justify_width: f64, start_x: f64) -> Result<FormattedLayout> {
        let min_total_width = self.pre_calculate_min_total_width(score, voices)?;

        let mut extra = justify_width - min_total_width;
        if extra < 0.0 {
            warn!(
                "justify width {:.1} is below the minimum {:.1}; laying out at minimum width",
                justify_width, min_total_width
            );
            extra = 0.0;
        }

        let softmax_factor = self.options.softmax_factor;
        let timeline = self.timeline.as_mut().ok_or(FormatError::NoTimelineNode)?;
        let shares = softmax_shares(timeline, softmax_factor);
        if extra > 0.0 && shares.iter().all(|&s| s == 0.0) {
            warn!(
                "no node has a duration; {:.1} of extra width left unused",
                extra
            );
        }

        let mut cursor = start_x;
        for (node, share) in timeline.nodes_mut().iter_mut().zip(&shares) {
            let node_extra = extra * share;
            node.set_extra(node_extra);
            node.set_x(cursor + node.left_padding(), score)?;
            cursor += node.left_padding() + node.width() + node_extra;
        }

        debug!(
            "formatted {} nodes: justify width {:.1}, extra {:.1}, end x {:.1}",
            timeline.len(),
            justify_width,
            extra,
            cursor
        );

        Ok(FormattedLayout::capture(timeline, justify_width, min_total_width, extra))
    }

    /// Lay out one voice left to right with fixed `padding` after each
    /// tickable, ignoring durations. Meant for soft glyph-run voices.
    /// Returns the x just past the last tickable.
    pub fn simple_format(&self, score: &mut Score, voice: VoiceId, x: f64, padding: f64) -> Result<f64> {
        let ids = score.voice(voice)?.tickables().to_vec();
        let mut cursor = x;
        for id in ids {
            let (body, (left, right)) = {
                let t = score.tickable(id)?;
                (self.measurer.measure(t), self.measurer.modifier_padding(t))
            };
            let tickable = score.tickable_mut(id)?;
            tickable.set_measurement(body, left, right);
            tickable.set_x(cursor + left);
            cursor += tickable.footprint()? + padding;
        }
        Ok(cursor)
    }
}

/// Share of the spare width per node. Nodes with no duration get nothing;
/// the rest are weighted by exp(factor * ticks / total).
fn softmax_shares(timeline: &Timeline, softmax_factor: f64) -> Vec<f64> {
    let total = timeline.total_ticks().value();
    let exponents: Vec<Option<f64>> = timeline
        .nodes()
        .iter()
        .map(|n| {
            let ticks = n.ticks();
            if ticks.is_zero() || total <= 0.0 {
                None
            } else {
                Some(softmax_factor * ticks.value() / total)
            }
        })
        .collect();

    // Shifting every exponent by the max keeps exp() finite for large factors
    let max = exponents.iter().flatten().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![0.0; exponents.len()];
    }
    let weights: Vec<f64> = exponents.iter().map(|e| e.map_or(0.0, |e| (e - max).exp())).collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| w / sum).collect()
}
