//! Minimal HTML output for comparing against CommonMark examples.
//!
//! Only paragraphs and inline content are rendered; definitions render
//! nothing. URLs are percent-encoded the way the reference renderer does it.

use mdtree::ast::{Block, BlockKind, Inline, InlineKind, LinkTarget};
use mdtree::{Document, Visitor, Walk};

pub fn render(doc: &Document) -> String {
    let mut renderer = Renderer::default();
    doc.accept(&mut renderer);
    renderer.out
}

#[derive(Default)]
struct Renderer {
    out: String,
}

impl Visitor for Renderer {
    fn visit_block(&mut self, block: &Block) -> Walk {
        match &block.kind {
            BlockKind::Paragraph => {
                self.out.push_str("<p>");
                inlines(&mut self.out, &block.inlines);
                self.out.push_str("</p>\n");
            }
            BlockKind::LinkReferenceDefinition(_) => {}
            other => panic!("no HTML for {}", other.name()),
        }
        Walk::Skip
    }
}

fn inlines(out: &mut String, nodes: &[Inline]) {
    for node in nodes {
        inline(out, node);
    }
}

fn inline(out: &mut String, node: &Inline) {
    match &node.kind {
        InlineKind::Text(text) => escape(out, text),
        InlineKind::SoftBreak => out.push('\n'),
        InlineKind::HardBreak => out.push_str("<br />\n"),
        InlineKind::Code(code) => {
            out.push_str("<code>");
            escape(out, code);
            out.push_str("</code>");
        }
        InlineKind::Emphasis => wrap(out, "em", &node.children),
        InlineKind::Strong => wrap(out, "strong", &node.children),
        InlineKind::Strikethrough => wrap(out, "del", &node.children),
        InlineKind::Link(target) => {
            out.push_str("<a href=\"");
            escape(out, &encode_url(&target.url));
            out.push('"');
            title(out, target);
            out.push('>');
            inlines(out, &node.children);
            out.push_str("</a>");
        }
        InlineKind::Image(target) => {
            out.push_str("<img src=\"");
            escape(out, &encode_url(&target.url));
            out.push_str("\" alt=\"");
            let mut alt = String::new();
            plain_text(&mut alt, &node.children);
            escape(out, &alt);
            out.push('"');
            title(out, target);
            out.push_str(" />");
        }
        InlineKind::Autolink { url, is_email } => {
            let href = if *is_email { format!("mailto:{url}") } else { url.clone() };
            out.push_str("<a href=\"");
            escape(out, &encode_url(&href));
            out.push_str("\">");
            escape(out, url);
            out.push_str("</a>");
        }
        InlineKind::Html(html) => out.push_str(html),
        other => panic!("no HTML for {other:?}"),
    }
}

fn wrap(out: &mut String, tag: &str, children: &[Inline]) {
    out.push_str(&format!("<{tag}>"));
    inlines(out, children);
    out.push_str(&format!("</{tag}>"));
}

fn title(out: &mut String, target: &LinkTarget) {
    if let Some(title) = &target.title {
        out.push_str(" title=\"");
        escape(out, title);
        out.push('"');
    }
}

/// Text content only, as used for `alt`.
fn plain_text(out: &mut String, nodes: &[Inline]) {
    for node in nodes {
        match &node.kind {
            InlineKind::Text(text) | InlineKind::Code(text) => out.push_str(text),
            InlineKind::SoftBreak | InlineKind::HardBreak => out.push('\n'),
            InlineKind::Autolink { url, .. } => out.push_str(url),
            _ => plain_text(out, &node.children),
        }
    }
}

fn escape(out: &mut String, text: &str) {
    html_escape::encode_double_quoted_attribute_to_string(text, out);
}

/// Percent-encode everything outside the URL-safe set, keeping existing
/// `%XX` escapes.
fn encode_url(url: &str) -> String {
    const SAFE: &[u8] = b";/?:@&=+$,-_.!~*'()#";
    let bytes = url.as_bytes();
    let mut out = String::with_capacity(url.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let escaped = b == b'%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
        if b.is_ascii_alphanumeric() || SAFE.contains(&b) || escaped {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
        i += 1;
    }
    out
}
