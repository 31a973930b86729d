//! Limits against pathological input.
//!
//! Constructs that would exceed a limit degrade to plain text instead of
//! failing, so every input still parses.

/// Maximum nesting depth for block containers (lists, blockquotes, containers).
pub const MAX_BLOCK_NESTING: usize = 32;

/// Maximum nesting depth for inline elements (emphasis, links).
pub const MAX_INLINE_NESTING: usize = 32;

/// Maximum entries on the inline delimiter stack; further runs stay literal.
pub const MAX_DELIMITER_STACK: usize = 4096;

/// Maximum backtick run length for code spans. Longer runs are literal.
pub const MAX_CODE_SPAN_BACKTICKS: usize = 32;

/// Maximum parentheses nesting in link destinations (CommonMark: 32).
pub const MAX_LINK_PAREN_DEPTH: usize = 32;

/// Maximum digits in an ordered list marker (CommonMark: 9).
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Maximum table columns.
pub const MAX_TABLE_COLUMNS: usize = 128;

/// Maximum link label length in bytes (CommonMark: 999).
pub const MAX_LINK_LABEL_LEN: usize = 999;
