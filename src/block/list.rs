//! Lists and list items.
//!
//! A list is a container of items that share a marker type; an item is
//! continued by lines indented at least as far as its content column.

use crate::ast::{Block, BlockKind, ListInfo, ListKind};
use crate::Span;

use super::line::BlockLine;
use super::parser::BlockParser;
use super::processor::{accepts_flow_child, container_end, BlockBuilder, CloseContext, Continuation, Processor, ProcessorKind};
use super::token::TokenKind;

#[derive(Debug)]
pub struct ListBuilder {
    kind: ListKind,
    start: u32,
    items: Vec<Block>,
}

impl ListBuilder {
    /// Whether an item with marker `kind` continues this list.
    fn accepts(&self, kind: &ListKind) -> bool {
        match (&self.kind, kind) {
            (ListKind::Bullet(a), ListKind::Bullet(b)) => a == b,
            (
                ListKind::Ordered { delimiter: d1, style: s1, .. },
                ListKind::Ordered { delimiter: d2, style: s2, .. },
            ) => d1 == d2 && s1 == s2,
            _ => false,
        }
    }

    /// A list is loose when a blank line separates two items, or two
    /// children of one item.
    fn is_tight(&self, ctx: &CloseContext<'_, '_>) -> bool {
        let separated = |blocks: &[Block]| {
            blocks
                .windows(2)
                .any(|pair| ctx.has_blank_between(pair[0].span.end, pair[1].span.start))
        };
        !separated(&self.items) && !self.items.iter().any(|item| separated(&item.children))
    }
}

impl BlockBuilder for ListBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::List
    }

    fn try_continue(&mut self, _line: &mut BlockLine<'_>) -> Continuation {
        // items decide
        Continuation::Continue
    }

    fn try_block_starts(&self) -> bool {
        true
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&self, child: ProcessorKind) -> bool {
        child == ProcessorKind::ListItem
    }

    fn add_node(&mut self, node: Block) {
        self.items.push(node);
    }

    fn close(self, _end: u32, ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        let end = container_end(self.start, &self.items);
        let tight = self.is_tight(ctx);
        let info = ListInfo { kind: self.kind, tight };
        Some(Block::new(BlockKind::List(info), Span::new(self.start, end)).with_children(self.items))
    }
}

#[derive(Debug)]
pub struct ListItemBuilder {
    start: u32,
    first_line_end: u32,
    /// Columns of indentation that continue the item.
    required: u32,
    task: Option<bool>,
    has_content: bool,
    children: Vec<Block>,
}

pub(crate) fn start(parser: &mut BlockParser<'_>, line: &mut BlockLine<'_>) -> bool {
    let indent = line.indent_width();
    let Some(token) = line.peek() else {
        return false;
    };
    let (kind, marker_width) = match token.kind {
        TokenKind::UnorderedListMarker => (ListKind::Bullet(token.marker), 1),
        TokenKind::DashLine if token.count == 1 => (ListKind::Bullet(b'-'), 1),
        TokenKind::OrderedListMarker => {
            let kind = ListKind::Ordered {
                start: token.count,
                delimiter: token.marker,
                style: token.style,
            };
            (kind, token.span.len())
        }
        _ => return false,
    };
    let empty = token.kind == TokenKind::DashLine || line.blank_after_peek();

    // interrupting a paragraph needs content and a list starting at one
    if !line.paragraph_skippable {
        if empty {
            return false;
        }
        if let ListKind::Ordered { start, .. } = kind {
            if start != 1 {
                return false;
            }
        }
    }

    let continues_list = matches!(parser.container(), Processor::List(list) if list.accepts(&kind));

    line.skip_all_indent();
    let start = line.offset();
    line.advance();
    let padding = if empty {
        line.skip_all_indent();
        marker_width + 1
    } else {
        let spaces = line.indent_width();
        if spaces >= 5 {
            // content is indented code: only one column belongs to the marker
            line.skip_indent(1);
            marker_width + 1
        } else {
            line.skip_all_indent();
            marker_width + spaces
        }
    };

    let mut task = None;
    if line.current().is_some_and(|t| t.kind == TokenKind::TaskListItemMarker) {
        task = line.advance().map(|t| t.marker != b' ');
        line.skip_all_indent();
    }

    if !continues_list {
        parser.open(Processor::List(ListBuilder {
            kind,
            start,
            items: Vec::new(),
        }));
    }
    parser.open(Processor::ListItem(ListItemBuilder {
        start,
        first_line_end: line.next,
        required: indent + padding,
        task,
        has_content: false,
        children: Vec::new(),
    }));
    true
}

impl BlockBuilder for ListItemBuilder {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::ListItem
    }

    fn try_continue(&mut self, line: &mut BlockLine<'_>) -> Continuation {
        if line.is_blank() {
            // an item can begin with at most one blank line
            if !self.has_content {
                return Continuation::None;
            }
            line.skip_all_indent();
            return Continuation::Continue;
        }
        if line.indent_width() >= self.required {
            line.skip_indent(self.required);
            Continuation::Continue
        } else {
            Continuation::None
        }
    }

    fn try_block_starts(&self) -> bool {
        true
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&self, child: ProcessorKind) -> bool {
        accepts_flow_child(child)
    }

    fn child_opened(&mut self) {
        self.has_content = true;
    }

    fn add_node(&mut self, node: Block) {
        self.children.push(node);
    }

    fn close(self, _end: u32, _ctx: &mut CloseContext<'_, '_>) -> Option<Block> {
        let end = container_end(self.first_line_end, &self.children);
        let kind = BlockKind::ListItem { task: self.task };
        Some(Block::new(kind, Span::new(self.start, end)).with_children(self.children))
    }
}
