//! A CommonMark-style Markdown parser and formatter with dollar-delimited
//! math. `$...$` is inline math, `$$...$$` on one line is display math, and
//! `$$` fence lines delimit math blocks. Math nodes carry render hints for
//! downstream renderers, and the serializer emits a normalized form that
//! reparses to the same tree.
//!
//! The simplest interface is `markdown_to_commonmark`:
//!
//! ```
//! use mathdown::{markdown_to_commonmark, Options};
//!
//! let mut options = Options::default();
//! options.extension.math_dollars = true;
//!
//! let doc = "Euler: $e^{i\\pi}+1=0$\n\n$$\n\\int_0^1 x^2\\,dx\n$$\n";
//! assert_eq!(markdown_to_commonmark(doc, &options), doc);
//! ```
//!
//! For anything more involved, parse to an AST and work with the tree:
//!
//! ```
//! use mathdown::nodes::NodeValue;
//! use mathdown::{format_commonmark, parse_document, Arena, Options};
//!
//! let arena = Arena::new();
//! let mut options = Options::default();
//! options.extension.math_dollars = true;
//!
//! let root = parse_document(&arena, "Math $\\alpha$\n", &options);
//!
//! let mut found = vec![];
//! for node in root.descendants() {
//!     if let NodeValue::InlineMath(ref literal) = node.data.borrow().value {
//!         found.push(literal.clone());
//!     }
//! }
//! assert_eq!(found, vec!["\\alpha".to_string()]);
//! ```

mod annotate;
pub mod arena_tree;
mod cm;
mod ctype;
pub mod nodes;
mod parser;
mod scanners;
mod strings;

#[cfg(test)]
mod tests;

pub use crate::arena_tree::Node;
pub use crate::cm::format_document as format_commonmark;
pub use crate::parser::{parse_document, Extension, Options, Render};
pub use typed_arena::Arena;

use std::io::BufWriter;

/// Render Markdown back to normalized CommonMark, as a self-contained
/// convenience for the parse/format round trip.
pub fn markdown_to_commonmark(md: &str, options: &Options) -> String {
    let arena = Arena::new();
    let root = parse_document(&arena, md, options);
    let mut bw = BufWriter::new(Vec::new());
    format_commonmark(root, options, &mut bw).unwrap();
    String::from_utf8(bw.into_inner().unwrap()).unwrap()
}
