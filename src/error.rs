//! Error taxonomy for the layout engine.
//!
//! Everything here is an input or programming error: the engine does no
//! I/O, so there are no transient failures to retry.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatError {
    /// A strict or exact voice received more ticks than it can hold.
    #[error("too many ticks: tickable {index} overflows the voice ({used} > {total})")]
    TooManyTicks {
        index: usize,
        used: String,
        total: String,
    },

    /// A strict or exact voice was finalized before it was full.
    #[error("too few ticks: voice holds {used} of {total}")]
    TooFewTicks { used: String, total: String },

    /// A width was read before the measurement pass ran.
    #[error("can't read the width of an unformatted tickable")]
    UnformattedWidth,

    /// A tickable was positioned before the timeline was built.
    #[error("tickable has no timeline node")]
    NoTimelineNode,

    #[error("unknown voice handle {0}")]
    UnknownVoice(usize),

    #[error("unknown tickable handle {0}")]
    UnknownTickable(usize),

    #[error("bad arguments: {0}")]
    BadArguments(String),

    #[error("bad key signature spec: '{0}'")]
    BadKeySignature(String),

    #[error("bad time signature spec: '{0}'")]
    BadTimeSignature(String),

    #[error("JSON serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, FormatError>;

impl From<serde_json::Error> for FormatError {
    fn from(e: serde_json::Error) -> Self {
        FormatError::Serialization(e.to_string())
    }
}
