//! Document tree.
//!
//! Every node carries the exact source [`Span`] it was parsed from and, when
//! [`Options::use_line_locator`](crate::Options::use_line_locator) is set,
//! its start [`Position`]. Block nodes own their children; inline content
//! lives on the leaf blocks that carry text (paragraphs, headings, table
//! cells) and is filled in by [`resolve`](crate::resolve).

use crate::attributes::Attributes;
use crate::footnote::FootnoteStore;
use crate::link_ref::{LinkDefinition, LinkRefStore};
use crate::locator::Position;
use crate::Span;

/// Root of a parsed document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub children: Vec<Block>,
    pub span: Span,
    /// Merged link definitions (explicit first, then heading references).
    pub link_definitions: LinkRefStore,
    /// Footnote definitions with their reference numbers.
    pub footnotes: FootnoteStore,
}

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub span: Span,
    pub position: Option<Position>,
    pub attributes: Option<Attributes>,
    pub children: Vec<Block>,
    pub inlines: Vec<Inline>,
    /// Index into the pending inline batch; `None` once resolved.
    #[doc(hidden)]
    pub pending: Option<u32>,
}

impl Block {
    pub fn new(kind: BlockKind, span: Span) -> Self {
        Self {
            kind,
            span,
            position: None,
            attributes: None,
            children: Vec::new(),
            inlines: Vec::new(),
            pending: None,
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading {
        level: u8,
        setext: bool,
        /// Explicit `{#id}` or generated identifier.
        id: Option<String>,
    },
    ThematicBreak,
    BlockQuote,
    List(ListInfo),
    ListItem {
        /// `Some(checked)` for task list items.
        task: Option<bool>,
    },
    CodeBlock(CodeBlock),
    HtmlBlock {
        /// Start condition 1 to 7.
        condition: u8,
        literal: String,
    },
    Table {
        alignments: Vec<Alignment>,
    },
    TableRow {
        header: bool,
    },
    TableCell {
        alignment: Alignment,
    },
    FootnoteDefinition {
        label: String,
        /// Number of the first reference, if referenced at all.
        order: Option<u32>,
    },
    CustomContainer {
        info: Option<String>,
    },
    MathBlock {
        literal: String,
    },
    LinkReferenceDefinition(LinkDefinition),
}

impl BlockKind {
    /// Short name, used in logs and debug output.
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading { .. } => "heading",
            BlockKind::ThematicBreak => "thematic_break",
            BlockKind::BlockQuote => "block_quote",
            BlockKind::List(_) => "list",
            BlockKind::ListItem { .. } => "list_item",
            BlockKind::CodeBlock(_) => "code_block",
            BlockKind::HtmlBlock { .. } => "html_block",
            BlockKind::Table { .. } => "table",
            BlockKind::TableRow { .. } => "table_row",
            BlockKind::TableCell { .. } => "table_cell",
            BlockKind::FootnoteDefinition { .. } => "footnote_definition",
            BlockKind::CustomContainer { .. } => "custom_container",
            BlockKind::MathBlock { .. } => "math_block",
            BlockKind::LinkReferenceDefinition(_) => "link_reference_definition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListInfo {
    pub kind: ListKind,
    /// No blank lines between items or between their children.
    pub tight: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Bullet list with its marker (`-`, `+` or `*`).
    Bullet(u8),
    Ordered {
        start: u32,
        /// `.` or `)`.
        delimiter: u8,
        style: ListStyle,
    },
}

/// Numbering style of an ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
    LowerGreek,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// `None` for indented code.
    pub fence: Option<Fence>,
    /// Content, one `\n` after every line.
    pub literal: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    /// `` ` `` or `~`.
    pub marker: u8,
    pub length: usize,
    /// Info string with escapes resolved (attribute block removed).
    pub info: Option<String>,
}

impl CodeBlock {
    /// First word of the info string.
    pub fn language(&self) -> Option<&str> {
        self.fence
            .as_ref()?
            .info
            .as_deref()?
            .split_ascii_whitespace()
            .next()
    }
}

/// Table column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// An inline node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inline {
    pub kind: InlineKind,
    pub span: Span,
    pub position: Option<Position>,
    pub children: Vec<Inline>,
}

impl Inline {
    pub fn new(kind: InlineKind, span: Span) -> Self {
        Self {
            kind,
            span,
            position: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineKind {
    /// Literal text with escapes and entities resolved.
    Text(String),
    SoftBreak,
    HardBreak,
    Code(String),
    Emphasis,
    Strong,
    Strikethrough,
    Link(LinkTarget),
    Image(LinkTarget),
    Autolink {
        url: String,
        is_email: bool,
    },
    FootnoteReference {
        label: String,
        order: u32,
    },
    Html(String),
    Math {
        literal: String,
        display: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub url: String,
    pub title: Option<String>,
    pub reference: LinkReference,
}

/// How a link found its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkReference {
    /// `[text](url)`
    Inline,
    /// `[text][label]`
    Full(String),
    /// `[label][]`
    Collapsed,
    /// `[label]`
    Shortcut,
    /// Shortcut or collapsed reference that matched a heading's text.
    Heading,
}

/// Whether to descend into a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    Skip,
}

/// Double-dispatch visitor over the tree.
///
/// Every method has a no-op default, so implementors only handle the nodes
/// they care about.
pub trait Visitor {
    fn visit_block(&mut self, _block: &Block) -> Walk {
        Walk::Continue
    }

    fn leave_block(&mut self, _block: &Block) {}

    fn visit_inline(&mut self, _inline: &Inline) -> Walk {
        Walk::Continue
    }

    fn leave_inline(&mut self, _inline: &Inline) {}
}

impl Document {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for block in &self.children {
            block.accept(visitor);
        }
    }
}

impl Block {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        if visitor.visit_block(self) == Walk::Continue {
            for child in &self.children {
                child.accept(visitor);
            }
            for inline in &self.inlines {
                inline.accept(visitor);
            }
        }
        visitor.leave_block(self);
    }
}

impl Inline {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        if visitor.visit_inline(self) == Walk::Continue {
            for child in &self.children {
                child.accept(visitor);
            }
        }
        visitor.leave_inline(self);
    }
}

/// Plain text of inline content: markup stripped, breaks as spaces and
/// emoji shortcodes replaced.
pub fn plain_text(inlines: &[Inline], out: &mut String) {
    struct PlainText<'a>(&'a mut String);

    impl Visitor for PlainText<'_> {
        fn visit_inline(&mut self, inline: &Inline) -> Walk {
            match &inline.kind {
                InlineKind::Text(text) => crate::emoji::substitute_into(self.0, text),
                InlineKind::Code(code) => self.0.push_str(code),
                InlineKind::Math { literal, .. } => self.0.push_str(literal),
                InlineKind::Autolink { url, .. } => self.0.push_str(url),
                InlineKind::SoftBreak | InlineKind::HardBreak => self.0.push(' '),
                _ => {}
            }
            Walk::Continue
        }
    }

    let mut visitor = PlainText(out);
    for inline in inlines {
        inline.accept(&mut visitor);
    }
}
