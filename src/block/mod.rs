//! Block-level parser.
//!
//! The block parser is line-oriented. Each line is tokenized, matched
//! against the stack of open blocks and then used to open new blocks or to
//! continue the innermost one. It handles:
//! - Paragraphs, ATX and setext headings, thematic breaks
//! - Indented and fenced code, math blocks, HTML blocks
//! - Blockquotes, lists, task list items
//! - Tables, footnote definitions, custom containers
//! - Link reference definitions

mod code;
mod container;
mod factory;
mod footnote;
mod heading;
mod html;
mod line;
mod list;
mod math;
mod paragraph;
mod parser;
mod processor;
mod quote;
mod table;
mod thematic_break;
pub mod token;

pub use line::{BlockLine, Indentation};
pub use parser::BlockParser;
pub use processor::{Continuation, ProcessorKind};
pub use token::{tokenize_line, Token, TokenKind};
