//! Block structure tests.
//!
//! Each case compares the outline from `common::outline` with the expected
//! tree.

mod common;

use common::{outline_of, parse, parse_with};
use mdtree::ast::BlockKind;
use mdtree::{Options, Span};
use pretty_assertions::assert_eq;

// === Containers ===

/// An unmarked line continues the paragraph inside the quote.
#[test]
fn lazy_continuation_in_block_quote() {
    let expected = "block_quote\n  paragraph: \"foo\" soft \"bar\"\n";
    assert_eq!(outline_of("> foo\nbar\n"), expected);
}

/// A thematic break wins over a list item and splits the list.
#[test]
fn thematic_break_between_lists() {
    let expected = "\
list(* tight)
  list_item
    paragraph: \"Foo\"
thematic_break
list(* tight)
  list_item
    paragraph: \"Bar\"
";
    assert_eq!(outline_of("* Foo\n* * *\n* Bar\n"), expected);
}

#[test]
fn ordered_list() {
    let expected = "\
list(1. tight)
  list_item
    paragraph: \"one\"
  list_item
    paragraph: \"two\"
";
    assert_eq!(outline_of("1. one\n2. two\n"), expected);
}

/// A blank line between items makes the list loose.
#[test]
fn loose_list() {
    let expected = "\
list(- loose)
  list_item
    paragraph: \"a\"
  list_item
    paragraph: \"b\"
";
    assert_eq!(outline_of("- a\n\n- b\n"), expected);
}

/// Changing the bullet character starts a new list.
#[test]
fn bullet_change_starts_new_list() {
    let expected = "\
list(- tight)
  list_item
    paragraph: \"a\"
list(+ tight)
  list_item
    paragraph: \"b\"
";
    assert_eq!(outline_of("- a\n+ b\n"), expected);
}

#[test]
fn task_list_items() {
    let expected = "\
list(- tight)
  list_item(task  )
    paragraph: \"todo\"
  list_item(task x)
    paragraph: \"done\"
";
    assert_eq!(outline_of("- [ ] todo\n- [x] done\n"), expected);
}

#[test]
fn nested_markers_on_one_line() {
    let expected = "\
list(- tight)
  list_item
    list(- tight)
      list_item
        paragraph: \"foo\"
";
    assert_eq!(outline_of("- - foo\n"), expected);
}

/// An ordered list not starting at 1 cannot interrupt a paragraph.
#[test]
fn ordered_list_interrupting_paragraph() {
    assert_eq!(outline_of("text\n2. two\n"), "paragraph: \"text\" soft \"2. two\"\n");
    let expected = "\
paragraph: \"text\"
list(1. tight)
  list_item
    paragraph: \"one\"
";
    assert_eq!(outline_of("text\n1. one\n"), expected);
}

// === Leaves ===

#[test]
fn atx_and_setext_headings() {
    let expected = "\
heading(h1 #hello-world): \"Hello \" em[\"world\"]
heading(h2 #sub): \"Sub\"
";
    assert_eq!(outline_of("# Hello *world* #\nSub\n---\n"), expected);
}

#[test]
fn fenced_code() {
    let expected = "code_block(rust) \"fn main() {}\\n\"\n";
    assert_eq!(outline_of("```rust\nfn main() {}\n```\n"), expected);
}

/// An unclosed fence runs to the end of the document.
#[test]
fn unclosed_fence() {
    assert_eq!(outline_of("~~~\na\n\nb\n"), "code_block \"a\\n\\nb\\n\"\n");
}

#[test]
fn empty_fence_spans_its_line() {
    let doc = parse("```\n");
    assert_eq!(doc.children.len(), 1);
    assert_eq!(doc.children[0].span, Span::new(0, 4));
    let BlockKind::CodeBlock(code) = &doc.children[0].kind else {
        panic!("expected a code block");
    };
    assert_eq!(code.literal, "");
}

#[test]
fn indented_code() {
    assert_eq!(outline_of("    a\n\n    b\n"), "code_block \"a\\n\\nb\\n\"\n");
}

#[test]
fn html_block_until_blank_line() {
    let expected = "\
html_block(6) \"<div>\\n*hi*\\n</div>\\n\"
paragraph: \"after\"
";
    assert_eq!(outline_of("<div>\n*hi*\n</div>\n\nafter\n"), expected);
}

#[test]
fn html_comment_ends_on_its_line() {
    let expected = "\
html_block(2) \"<!-- note -->\\n\"
paragraph: \"text\"
";
    assert_eq!(outline_of("<!-- note -->\ntext\n"), expected);
}

// === Link reference definitions ===

/// The first definition wins; both stay in the tree.
#[test]
fn duplicate_definitions() {
    let expected = "\
link_reference_definition([foo] /url1)
link_reference_definition([foo] /url2)
paragraph: link(/url1)[\"bar\"]
";
    assert_eq!(outline_of("[foo]: /url1\n\n[foo]: /url2\n\n[bar][foo]\n"), expected);
}

#[test]
fn definition_followed_by_text() {
    let expected = "\
link_reference_definition([a] /x)
paragraph: \"text\"
";
    assert_eq!(outline_of("[a]: /x\ntext\n"), expected);
}

// === Extensions ===

#[test]
fn table_with_alignment() {
    let expected = "\
table
  table_row(header)
    table_cell(Left): \"a\"
    table_cell(Right): \"b\"
  table_row
    table_cell(Left): \"1\"
    table_cell(Right): \"2\"
";
    assert_eq!(outline_of("| a | b |\n| :-- | --: |\n| 1 | 2 |\n"), expected);
}

/// Missing body cells are empty, extra cells are dropped.
#[test]
fn table_rows_are_normalized() {
    let expected = "\
table
  table_row(header)
    table_cell(None): \"a\"
    table_cell(None): \"b\"
  table_row
    table_cell(None): \"1\"
    table_cell(None)
  table_row
    table_cell(None): \"1\"
    table_cell(None): \"2\"
";
    assert_eq!(outline_of("| a | b |\n| --- | --- |\n| 1 |\n| 1 | 2 | 3 |\n"), expected);
}

#[test]
fn table_needs_matching_header() {
    assert_eq!(
        outline_of("| a | b |\n| --- |\n"),
        "paragraph: \"| a | b |\" soft \"| --- |\"\n"
    );
}

#[test]
fn tables_can_be_disabled() {
    let doc = parse_with("| a |\n| --- |\n", &Options::default().with_table(false));
    assert_eq!(common::outline(&doc), "paragraph: \"| a |\" soft \"| --- |\"\n");
}

/// Numerals starting with a subtractive pair keep their value.
#[test]
fn roman_list_markers() {
    let options = Options::default().with_extra_list_style_type(true);
    let doc = parse_with("iv. four\nv. five\n", &options);
    let expected = "\
list(4. tight)
  list_item
    paragraph: \"four\"
  list_item
    paragraph: \"five\"
";
    assert_eq!(common::outline(&doc), expected);

    let doc = parse_with("IX) nine\n", &options);
    assert_eq!(common::outline(&doc), "list(9) tight)\n  list_item\n    paragraph: \"nine\"\n");

    let doc = parse_with("xl. forty\n", &options);
    assert_eq!(common::outline(&doc), "list(40. tight)\n  list_item\n    paragraph: \"forty\"\n");
}

#[test]
fn roman_markers_need_the_option() {
    assert_eq!(outline_of("iv. four\n"), "paragraph: \"iv. four\"\n");
}

#[test]
fn footnote_definition() {
    let expected = "\
paragraph: \"Text\" fn(n 1) \".\"
footnote_definition(n 1)
  paragraph: \"Note.\"
";
    assert_eq!(outline_of("Text[^n].\n\n[^n]: Note.\n"), expected);
}

#[test]
fn custom_container() {
    let expected = "\
custom_container(warning)
  paragraph: \"careful\"
";
    assert_eq!(outline_of("::: warning\ncareful\n:::\n"), expected);
}

/// A longer outer fence lets shorter fences nest.
#[test]
fn nested_custom_containers() {
    let expected = "\
custom_container(outer)
  custom_container(inner)
    paragraph: \"x\"
";
    assert_eq!(outline_of("::::: outer\n::: inner\nx\n:::\n:::::\n"), expected);
}

#[test]
fn math_block() {
    let options = Options::default().with_math(true);
    let doc = parse_with("$$\nx^2\n$$\n", &options);
    assert_eq!(common::outline(&doc), "math_block \"x^2\\n\"\n");
    let doc = parse("$$\nx^2\n$$\n");
    assert_eq!(common::outline(&doc), "paragraph: \"$$\" soft \"x^2\" soft \"$$\"\n");
}

#[test]
fn code_attributes() {
    let options = Options::default().with_code_attributes(true);
    let doc = parse_with("``` rust {.numbered}\nx\n```\n", &options);
    let block = &doc.children[0];
    let BlockKind::CodeBlock(code) = &block.kind else {
        panic!("expected a code block");
    };
    assert_eq!(code.language(), Some("rust"));
    assert_eq!(block.attributes.as_ref().map(|a| a.classes.clone()), Some(vec!["numbered".to_string()]));
}
