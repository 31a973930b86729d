//! Shared helpers for integration tests.
//!
//! [`outline`] renders a document as one line per block, indented by depth,
//! with the block's inline content after a colon. It is compact enough to
//! write expectations by hand and stable under span changes.

#![allow(dead_code)]

pub mod html;

use mdtree::ast::{Block, BlockKind, Inline, InlineKind, ListKind};
use mdtree::{Document, Options, Visitor, Walk};

pub fn parse(input: &str) -> Document {
    mdtree::parse(input).expect("default options are valid")
}

pub fn parse_with(input: &str, options: &Options) -> Document {
    mdtree::parse_with_options(input, options).expect("options are valid")
}

/// Outline of `input` parsed with default options.
pub fn outline_of(input: &str) -> String {
    outline(&parse(input))
}

pub fn outline(doc: &Document) -> String {
    let mut printer = Printer::default();
    doc.accept(&mut printer);
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Visitor for Printer {
    fn visit_block(&mut self, block: &Block) -> Walk {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(block.kind.name());
        self.out.push_str(&block_detail(&block.kind));
        if !block.inlines.is_empty() {
            self.out.push_str(": ");
            self.out.push_str(&inlines(&block.inlines));
        }
        self.out.push('\n');
        self.depth += 1;
        Walk::Continue
    }

    fn leave_block(&mut self, _block: &Block) {
        self.depth -= 1;
    }

    fn visit_inline(&mut self, _inline: &Inline) -> Walk {
        // rendered with the owning block
        Walk::Skip
    }
}

fn block_detail(kind: &BlockKind) -> String {
    match kind {
        BlockKind::Heading { level, id, .. } => match id {
            Some(id) => format!("(h{level} #{id})"),
            None => format!("(h{level})"),
        },
        BlockKind::List(info) => {
            let marker = match info.kind {
                ListKind::Bullet(marker) => format!("{}", marker as char),
                ListKind::Ordered { start, delimiter, .. } => format!("{start}{}", delimiter as char),
            };
            let spacing = if info.tight { "tight" } else { "loose" };
            format!("({marker} {spacing})")
        }
        BlockKind::ListItem { task: Some(checked) } => format!("(task {})", if *checked { "x" } else { " " }),
        BlockKind::CodeBlock(code) => match code.fence.as_ref().and_then(|f| f.info.as_deref()) {
            Some(info) => format!("({info}) {:?}", code.literal),
            None => format!(" {:?}", code.literal),
        },
        BlockKind::HtmlBlock { condition, literal } => format!("({condition}) {literal:?}"),
        BlockKind::TableCell { alignment } => format!("({alignment:?})"),
        BlockKind::TableRow { header: true } => "(header)".to_string(),
        BlockKind::FootnoteDefinition { label, order } => match order {
            Some(order) => format!("({label} {order})"),
            None => format!("({label})"),
        },
        BlockKind::CustomContainer { info: Some(info) } => format!("({info})"),
        BlockKind::MathBlock { literal } => format!(" {literal:?}"),
        BlockKind::LinkReferenceDefinition(def) => format!("([{}] {})", def.label, def.url),
        _ => String::new(),
    }
}

/// Inline nodes separated by spaces; containers list their children in
/// brackets.
pub fn inlines(nodes: &[Inline]) -> String {
    let parts: Vec<String> = nodes.iter().map(inline).collect();
    parts.join(" ")
}

fn inline(node: &Inline) -> String {
    let children = || inlines(&node.children);
    match &node.kind {
        InlineKind::Text(text) => format!("{text:?}"),
        InlineKind::SoftBreak => "soft".to_string(),
        InlineKind::HardBreak => "hard".to_string(),
        InlineKind::Code(code) => format!("code({code:?})"),
        InlineKind::Emphasis => format!("em[{}]", children()),
        InlineKind::Strong => format!("strong[{}]", children()),
        InlineKind::Strikethrough => format!("del[{}]", children()),
        InlineKind::Link(target) => format!("link({})[{}]", target.url, children()),
        InlineKind::Image(target) => format!("img({})[{}]", target.url, children()),
        InlineKind::Autolink { url, .. } => format!("auto({url})"),
        InlineKind::FootnoteReference { label, order } => format!("fn({label} {order})"),
        InlineKind::Html(html) => format!("html({html})"),
        InlineKind::Math { literal, display } => {
            if *display {
                format!("display_math({literal})")
            } else {
                format!("math({literal})")
            }
        }
    }
}
