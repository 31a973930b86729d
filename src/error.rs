//! Caller errors.
//!
//! Markdown text itself is never an error; these only report misuse of the
//! API or configuration.

use thiserror::Error;

/// Errors reported to the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `Options::attributes_prefix` contains characters that cannot start an
    /// attribute key.
    #[error("invalid attributes prefix {0:?}: must not contain whitespace, quotes, '=', '{{' or '}}'")]
    InvalidAttributesPrefix(String),

    /// A text slice was requested outside the text or off a char boundary.
    #[error("slice {start}..{end} is out of range for text of length {len}")]
    SliceOutOfRange { start: usize, end: usize, len: usize },

    /// The input cannot be addressed by 32-bit spans.
    #[error("input of {len} bytes exceeds the 4GB span limit")]
    InputTooLarge { len: usize },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
