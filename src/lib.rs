//! mdtree: Markdown to a position-tracked document tree
//!
//! This crate parses CommonMark, with GFM tables, strikethrough, task lists
//! and autolinks plus footnotes, math, custom containers and attributes,
//! into an owned tree where every node knows the exact source bytes it came
//! from.
//!
//! # Design Principles
//! - Two phases: a line-oriented block pass, then one inline batch
//! - No regex: pure byte-level scanning
//! - Spans into the input instead of copies wherever text is not rewritten
//! - Bounded nesting and delimiter stacks against pathological input
//!
//! # Example
//! ```
//! use mdtree::ast::{BlockKind, InlineKind};
//!
//! let doc = mdtree::parse("# Hello\n\nSome *text*.\n").unwrap();
//! assert!(matches!(doc.children[0].kind, BlockKind::Heading { level: 1, .. }));
//! assert_eq!(doc.children[1].inlines[1].kind, InlineKind::Emphasis);
//! ```

pub mod ast;
pub mod attributes;
pub mod block;
pub mod cursor;
pub mod emoji;
pub mod error;
pub mod escape;
pub mod footnote;
pub mod inline;
pub mod limits;
pub mod link_ref;
pub mod locator;
pub mod range;
pub mod resolve;
pub mod scratch;
pub mod slug;
pub mod text;

// Re-export primary types
pub use ast::{Block, BlockKind, Document, Inline, InlineKind, Visitor, Walk};
pub use block::BlockParser;
pub use error::{Error, Result};
pub use inline::InlineParser;
pub use link_ref::{LinkDefinition, LinkRefStore};
pub use locator::{LineLocator, Position};
pub use range::Span;
pub use resolve::{resolve, BlockTree, DeferredMaps};

/// Parsing options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// GFM pipe tables.
    pub use_table: bool,
    /// `$$` blocks and `$...$` spans.
    pub use_math: bool,
    /// Generate heading identifiers and let `[Heading text]` link to them.
    pub use_auto_identifier: bool,
    /// Trailing `{#id .class key=value}` on ATX headings.
    pub use_header_attributes: bool,
    /// Trailing attribute block in fenced code info strings.
    pub use_code_attributes: bool,
    /// Alphabetic, roman and greek ordered list markers.
    pub use_extra_list_style_type: bool,
    /// Prepended to attribute keys other than `id` and `class`.
    pub attributes_prefix: String,
    /// Fill in [`Position`] on every node.
    pub use_line_locator: bool,
    /// Bare `www.`, `http://`, `https://`, `ftp://` and `mailto:` links.
    pub use_autolinks: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            use_table: true,
            use_math: false,
            use_auto_identifier: true,
            use_header_attributes: false,
            use_code_attributes: false,
            use_extra_list_style_type: false,
            attributes_prefix: String::new(),
            use_line_locator: false,
            use_autolinks: true,
        }
    }
}

impl Options {
    pub fn with_table(mut self, on: bool) -> Self {
        self.use_table = on;
        self
    }

    pub fn with_math(mut self, on: bool) -> Self {
        self.use_math = on;
        self
    }

    pub fn with_auto_identifier(mut self, on: bool) -> Self {
        self.use_auto_identifier = on;
        self
    }

    pub fn with_header_attributes(mut self, on: bool) -> Self {
        self.use_header_attributes = on;
        self
    }

    pub fn with_code_attributes(mut self, on: bool) -> Self {
        self.use_code_attributes = on;
        self
    }

    pub fn with_extra_list_style_type(mut self, on: bool) -> Self {
        self.use_extra_list_style_type = on;
        self
    }

    pub fn with_attributes_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attributes_prefix = prefix.into();
        self
    }

    pub fn with_line_locator(mut self, on: bool) -> Self {
        self.use_line_locator = on;
        self
    }

    pub fn with_autolinks(mut self, on: bool) -> Self {
        self.use_autolinks = on;
        self
    }

    /// Check the options before any parsing.
    pub fn validate(&self) -> Result<()> {
        if !attributes::is_valid_prefix(&self.attributes_prefix) {
            return Err(Error::InvalidAttributesPrefix(self.attributes_prefix.clone()));
        }
        Ok(())
    }
}

/// Parse Markdown with default options.
///
/// # Example
/// ```
/// let doc = mdtree::parse("> quote\n").unwrap();
/// assert_eq!(doc.children[0].kind.name(), "block_quote");
/// ```
pub fn parse(input: &str) -> Result<Document> {
    parse_with_options(input, &Options::default())
}

/// Parse Markdown with the given options.
pub fn parse_with_options(input: &str, options: &Options) -> Result<Document> {
    let (tree, maps) = parse_blocks(input, options)?;
    Ok(resolve(tree, maps, options))
}

/// Run only the block pass. Inline content stays unparsed until the
/// result is handed to [`resolve`].
pub fn parse_blocks<'a>(input: &'a str, options: &'a Options) -> Result<(BlockTree<'a>, DeferredMaps)> {
    options.validate()?;
    if u32::try_from(input.len()).is_err() {
        return Err(Error::InputTooLarge { len: input.len() });
    }
    log::debug!("parsing {} bytes", input.len());
    Ok(BlockParser::new(input, options).parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert!(options.use_table);
        assert!(!options.use_math);
        assert!(options.use_auto_identifier);
        assert!(options.attributes_prefix.is_empty());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_invalid_prefix_fails_before_parsing() {
        let options = Options::default().with_attributes_prefix("data =");
        assert_eq!(
            parse_with_options("text", &options).unwrap_err(),
            Error::InvalidAttributesPrefix("data =".into())
        );
    }

    #[test]
    fn test_two_phases_match_one_call() {
        let input = "[a]\n\n[a]: /x\n";
        let options = Options::default();
        let (tree, maps) = parse_blocks(input, &options).unwrap();
        assert!(tree.children[0].inlines.is_empty());
        let doc = resolve(tree, maps, &options);
        let direct = parse(input).unwrap();
        assert_eq!(doc.children, direct.children);
    }

    #[test]
    fn test_empty_input() {
        let doc = parse("").unwrap();
        assert!(doc.children.is_empty());
        assert_eq!(doc.span, Span::new(0, 0));
    }
}
