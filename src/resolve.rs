//! Deferred resolution after the block pass.
//!
//! Link definitions, footnote definitions and heading texts are collected
//! while blocks are parsed, but references may point forward. Inline
//! content is therefore parsed only once the whole block tree exists:
//! headings first (they cannot link to other headings), then identifiers,
//! then everything else against the merged definitions.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::ast::{plain_text, Block, BlockKind, Document, Inline, InlineKind};
use crate::footnote::{normalize_footnote_label, FootnoteStore};
use crate::inline::{InlineContext, InlineParser};
use crate::link_ref::{DefinitionSource, LinkDefinition, LinkRefStore};
use crate::locator::LineLocator;
use crate::scratch::Scratch;
use crate::slug::{slugify_into, IdGenerator};
use crate::{Options, Span};

/// Inline content of one block, waiting for the resolve pass.
#[derive(Debug, Clone)]
pub struct PendingInline {
    /// Content spans, one per line, markers and indentation removed.
    pub lines: SmallVec<[Span; 2]>,
    pub is_heading: bool,
}

/// A heading that `[heading text]` may link to.
#[derive(Debug, Clone)]
pub struct HeadingReference {
    /// Normalized raw heading text.
    pub label: String,
    /// Pending slot of the heading.
    pub slot: u32,
}

/// Definitions gathered during the block pass.
#[derive(Debug, Default)]
pub struct DeferredMaps {
    pub link_definitions: LinkRefStore,
    pub heading_references: Vec<HeadingReference>,
    pub footnotes: FootnoteStore,
}

/// Output of the block pass: blocks without inline content.
#[derive(Debug)]
pub struct BlockTree<'a> {
    pub input: &'a str,
    pub children: Vec<Block>,
    pub span: Span,
    pub pending: Vec<PendingInline>,
}

/// Visit every block in document order.
fn for_each_block(blocks: &mut [Block], f: &mut impl FnMut(&mut Block)) {
    for block in blocks {
        f(block);
        for_each_block(&mut block.children, f);
    }
}

/// Visit every inline node in document order.
fn for_each_inline(inlines: &mut [Inline], f: &mut impl FnMut(&mut Inline)) {
    for inline in inlines {
        f(inline);
        for_each_inline(&mut inline.children, f);
    }
}

/// Finish a block tree: parse inline content, assign heading identifiers,
/// number footnotes and, if enabled, compute line positions.
pub fn resolve(tree: BlockTree<'_>, maps: DeferredMaps, options: &Options) -> Document {
    let BlockTree {
        input,
        mut children,
        span,
        pending,
    } = tree;
    let DeferredMaps {
        link_definitions: explicit,
        heading_references,
        mut footnotes,
    } = maps;
    let scratch = Scratch::new();

    parse_pending(input, &mut children, &pending, true, &explicit, &footnotes, options, &scratch);
    log::debug!("resolve: parsed {} heading(s)", heading_references.len());

    let ids = assign_ids(&mut children, options, &scratch);
    let link_definitions = merge_heading_references(explicit, &heading_references, &ids);
    log::debug!("resolve: {} link definition(s) after merge", link_definitions.len());

    parse_pending(input, &mut children, &pending, false, &link_definitions, &footnotes, options, &scratch);
    log::debug!("resolve: parsed {} inline block(s)", pending.len());

    number_footnotes(&mut children, &mut footnotes);

    if options.use_line_locator {
        let locator = LineLocator::new(input);
        set_positions(&mut children, &locator);
    }

    Document {
        children,
        span,
        link_definitions,
        footnotes,
    }
}

/// Parse the pending content of headings (`headings == true`) or of every
/// other inline-bearing block.
#[allow(clippy::too_many_arguments)]
fn parse_pending(
    input: &str,
    children: &mut [Block],
    pending: &[PendingInline],
    headings: bool,
    link_definitions: &LinkRefStore,
    footnotes: &FootnoteStore,
    options: &Options,
    scratch: &Scratch,
) {
    let mut parser = InlineParser::new(InlineContext {
        link_definitions,
        footnotes,
        options,
        scratch,
    });
    for_each_block(children, &mut |block| {
        let Some(slot) = block.pending else {
            return;
        };
        let Some(content) = pending.get(slot as usize) else {
            return;
        };
        if content.is_heading != headings {
            return;
        }
        block.inlines = parser.parse(input, &content.lines);
        block.pending = None;
        if headings {
            // keep the slot reachable for identifier assignment
            block.pending = Some(slot);
        }
    });
}

/// Give every heading an identifier. Explicit ids are reserved first so
/// generated ones never collide with them. Returns the id per pending slot.
fn assign_ids(children: &mut [Block], options: &Options, scratch: &Scratch) -> FxHashMap<u32, String> {
    let mut ids = FxHashMap::default();
    let mut generator = IdGenerator::new();

    for_each_block(children, &mut |block| {
        if let BlockKind::Heading { id: Some(id), .. } = &block.kind {
            if !generator.reserve(id) {
                log::trace!("duplicate explicit heading id {id:?}");
            }
        }
    });

    for_each_block(children, &mut |block| {
        let slot = block.pending.take();
        let BlockKind::Heading { id, .. } = &mut block.kind else {
            block.pending = slot;
            return;
        };
        if id.is_none() && options.use_auto_identifier {
            let mut text = scratch.string();
            plain_text(&block.inlines, &mut text);
            let mut slug = scratch.string();
            slugify_into(&mut slug, &text);
            *id = Some(generator.unique(&slug));
        }
        if let (Some(slot), Some(id)) = (slot, id.as_ref()) {
            ids.insert(slot, id.clone());
        }
    });

    ids
}

/// Add a `#id` definition for each heading whose label no explicit
/// definition claimed.
fn merge_heading_references(
    mut store: LinkRefStore,
    references: &[HeadingReference],
    ids: &FxHashMap<u32, String>,
) -> LinkRefStore {
    for reference in references {
        let Some(id) = ids.get(&reference.slot) else {
            continue;
        };
        let definition = LinkDefinition {
            label: reference.label.clone(),
            url: format!("#{id}"),
            title: None,
        };
        if !store.insert(reference.label.clone(), definition, DefinitionSource::HeadingReference) {
            log::trace!("heading reference {:?} shadowed by a definition", reference.label);
        }
    }
    store
}

/// Number footnotes in order of first reference and copy the numbers to
/// references and definitions.
fn number_footnotes(children: &mut [Block], footnotes: &mut FootnoteStore) {
    if footnotes.is_empty() {
        return;
    }
    for_each_block(children, &mut |block| {
        for_each_inline(&mut block.inlines, &mut |inline| {
            if let InlineKind::FootnoteReference { label, order } = &mut inline.kind {
                if let Some(number) = normalize_footnote_label(label).and_then(|key| footnotes.reference(&key)) {
                    *order = number;
                }
            }
        });
    });
    for_each_block(children, &mut |block| {
        if let BlockKind::FootnoteDefinition { label, order } = &mut block.kind {
            *order = normalize_footnote_label(label)
                .and_then(|key| footnotes.get(&key))
                .and_then(|entry| entry.order);
        }
    });
}

fn set_positions(children: &mut [Block], locator: &LineLocator<'_>) {
    for_each_block(children, &mut |block| {
        block.position = Some(locator.position(block.span.start));
        for_each_inline(&mut block.inlines, &mut |inline| {
            inline.position = Some(locator.position(inline.span.start));
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockParser;
    use crate::locator::Position;

    fn run(input: &str, options: &Options) -> Document {
        let (tree, maps) = BlockParser::new(input, options).parse();
        resolve(tree, maps, options)
    }

    fn heading_ids(doc: &Document) -> Vec<Option<String>> {
        doc.children
            .iter()
            .filter_map(|b| match &b.kind {
                BlockKind::Heading { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_duplicate_headings_get_suffixes() {
        let doc = run("# Heading\n\n# Heading\n", &Options::default());
        assert_eq!(
            heading_ids(&doc),
            vec![Some("heading".to_string()), Some("heading-1".to_string())]
        );
    }

    #[test]
    fn test_explicit_id_is_reserved() {
        let options = Options::default().with_header_attributes(true);
        let doc = run("# Intro\n\n# Other {#intro}\n", &options);
        assert_eq!(
            heading_ids(&doc),
            vec![Some("intro-1".to_string()), Some("intro".to_string())]
        );
    }

    #[test]
    fn test_no_ids_without_auto_identifier() {
        let options = Options::default().with_auto_identifier(false);
        let doc = run("# Heading\n", &options);
        assert_eq!(heading_ids(&doc), vec![None]);
    }

    #[test]
    fn test_heading_reference_link() {
        let doc = run("[Getting started]\n\n## Getting started\n", &Options::default());
        let paragraph = &doc.children[0];
        let InlineKind::Link(target) = &paragraph.inlines[0].kind else {
            panic!("expected a link, got {:?}", paragraph.inlines);
        };
        assert_eq!(target.url, "#getting-started");
    }

    #[test]
    fn test_explicit_definition_wins_over_heading() {
        let doc = run("# Setup\n\n[Setup]\n\n[setup]: /docs\n", &Options::default());
        let InlineKind::Link(target) = &doc.children[1].inlines[0].kind else {
            panic!("expected a link");
        };
        assert_eq!(target.url, "/docs");
    }

    #[test]
    fn test_footnotes_numbered_by_first_reference() {
        let input = "b[^b] a[^a] b[^b]\n\n[^a]: first\n\n[^b]: second\n";
        let doc = run(input, &Options::default());
        let orders: Vec<u32> = doc.children[0]
            .inlines
            .iter()
            .filter_map(|i| match i.kind {
                InlineKind::FootnoteReference { order, .. } => Some(order),
                _ => None,
            })
            .collect();
        assert_eq!(orders, vec![1, 2, 1]);
        let definitions: Vec<Option<u32>> = doc.children[1..]
            .iter()
            .filter_map(|b| match &b.kind {
                BlockKind::FootnoteDefinition { order, .. } => Some(*order),
                _ => None,
            })
            .collect();
        assert_eq!(definitions, vec![Some(2), Some(1)]);
    }

    #[test]
    fn test_positions() {
        let options = Options::default().with_line_locator(true);
        let doc = run("a\n\n> \tb\n", &options);
        assert_eq!(doc.children[0].position, Some(Position { line: 0, column: 0 }));
        let quote = &doc.children[1];
        assert_eq!(quote.position, Some(Position { line: 2, column: 0 }));
        assert_eq!(quote.children[0].inlines[0].position, Some(Position { line: 2, column: 4 }));
    }

    #[test]
    fn test_no_positions_by_default() {
        let doc = run("a\n", &Options::default());
        assert_eq!(doc.children[0].position, None);
    }
}
