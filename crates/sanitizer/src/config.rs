//! Sanitizer configuration.

/// Limits applied by [`crate::Sanitizer`].
#[derive(Clone, Debug)]
pub struct SanitizerConfig {
    /// Inputs longer than this (in bytes) are rejected with
    /// [`crate::ParseError::InputTooLarge`] before any event other than
    /// `open_document`.
    pub max_input_bytes: usize,
    /// Open elements nested deeper than this are dropped, together with their
    /// close tags.
    pub max_nesting_depth: usize,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 64 * 1024 * 1024,
            max_nesting_depth: 256,
        }
    }
}
