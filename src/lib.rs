//! scoreform: horizontal layout and accidental resolution for music
//! notation.
//!
//! Voices of tickables (notes, rests, bar lines, markers) are merged into
//! a timeline of simultaneous events, measured, and justified to a target
//! width. Accidentals are decided against a key signature and a memory of
//! what has already sounded.
//!
//! # Example
//! ```
//! use scoreform::{Formatter, Score, Tickable, TimeSignature, Voice};
//!
//! let mut score = Score::new();
//! let voice = score.add_voice(Voice::new(TimeSignature::COMMON));
//! for key in ["c/4", "d/4", "e/4", "f/4"] {
//!     score.add_tickable(voice, Tickable::note("4", &[key]).unwrap()).unwrap();
//! }
//!
//! let layout = Formatter::default().format(&mut score, &[voice], 300.0).unwrap();
//! assert_eq!(layout.nodes.len(), 4);
//! ```

pub mod accidental;
pub mod duration;
pub mod error;
pub mod formatter;
pub mod fraction;
pub mod key_signature;
pub mod metrics;
pub mod pitch;
pub mod render;
pub mod score;
pub mod stave;
pub mod tables;
pub mod tick_context;
pub mod tickable;
pub mod time_signature;
pub mod timeline;
pub mod voice;

pub use accidental::{AccidentalMemory, AccidentalOptions, AccidentalResolver};
pub use error::{FormatError, Result};
pub use formatter::{layout_to_json, FormattedLayout, Formatter, FormatterOptions, NodeLayout};
pub use fraction::Fraction;
pub use key_signature::KeySignature;
pub use metrics::{GlyphMetrics, WidthMeasurer};
pub use pitch::{Alteration, Letter, Pitch};
pub use render::{DrawContext, SvgContext};
pub use score::{NodeId, Score, TickableId, VoiceId};
pub use stave::Stave;
pub use tickable::{Tickable, TickableKind};
pub use time_signature::TimeSignature;
pub use timeline::{Timeline, TimelineBuilder};
pub use voice::{Voice, VoiceMode};

/// Resolve accidentals for `voices` under `key`, then format them onto
/// `stave`. Convenience combining the two passes with default options.
pub fn format_voices(
    score: &mut Score,
    voices: &[VoiceId],
    stave: &Stave,
    key: &KeySignature,
) -> Result<FormattedLayout> {
    let timeline = TimelineBuilder::build(score, voices)?;
    let mut memory = AccidentalMemory::new(key.clone());
    AccidentalResolver::default().apply(score, &timeline, &mut memory)?;
    Formatter::default().format_to_stave(score, voices, stave)
}

/// Format `voices` onto `stave` and render them to an SVG string.
pub fn render_voices_to_svg(
    score: &mut Score,
    voices: &[VoiceId],
    stave: &Stave,
    key: &KeySignature,
) -> Result<String> {
    format_voices(score, voices, stave, key)?;
    let height = stave.bottom_y() + render::constants::STAFF_TOP;
    let mut ctx = SvgContext::new(stave.x + stave.width, height);
    ctx.draw_stave(stave);
    for &voice in voices {
        score.draw_voice(voice, &mut ctx)?;
    }
    Ok(ctx.build())
}
