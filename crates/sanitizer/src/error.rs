//! Errors surfaced to callers.
//!
//! Only failures that leave nothing to sanitize end up here. Garbled references,
//! missing attribute values, bad quoting and unknown constructs are recovered
//! from locally and never reported.

/// The input could not be tokenized at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The input exceeds [`crate::SanitizerConfig::max_input_bytes`].
    InputTooLarge { len: usize, limit: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InputTooLarge { len, limit } => {
                write!(f, "input of {len} bytes exceeds the {limit} byte limit")
            }
        }
    }
}

impl std::error::Error for ParseError {}
