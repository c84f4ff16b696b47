use std::io::BufWriter;

use crate::nodes::{AstNode, NodeValue};
use crate::{format_commonmark, markdown_to_commonmark, parse_document, Arena, Options};

mod core;
mod math;
mod math_blocks;

pub fn math_options() -> Options {
    let mut options = Options::default();
    options.extension.math_dollars = true;
    options
}

#[track_caller]
pub fn commonmark_with(input: &str, expected: &str, options: &Options) {
    let arena = Arena::new();
    let root = parse_document(&arena, input, options);
    let mut output = BufWriter::new(Vec::new());
    format_commonmark(root, options, &mut output).unwrap();
    let actual = String::from_utf8(output.into_inner().unwrap()).unwrap();
    pretty_assertions::assert_eq!(actual, expected);
}

#[track_caller]
pub fn commonmark(input: &str, expected: &str) {
    commonmark_with(input, expected, &math_options());
}

/// Asserts the serializer's output is its own normal form: parsing it back
/// and serializing again changes nothing.
#[track_caller]
pub fn assert_roundtrip_stable(input: &str) {
    let options = math_options();
    let once = markdown_to_commonmark(input, &options);
    let twice = markdown_to_commonmark(&once, &options);
    pretty_assertions::assert_eq!(once, twice);
}

pub fn ast_with(input: &str, options: &Options) -> String {
    let arena = Arena::new();
    let root = parse_document(&arena, input, options);
    let mut out = String::new();
    write_ast(&mut out, root);
    out
}

#[track_caller]
pub fn assert_ast(input: &str, expected: &str) {
    pretty_assertions::assert_eq!(ast_with(input, &math_options()), expected);
}

fn write_ast<'a>(out: &mut String, node: &'a AstNode<'a>) {
    use std::fmt::Write;

    let ast = node.data.borrow();
    let name = ast.value.type_name();
    let literal = match ast.value {
        NodeValue::Text(ref l) | NodeValue::InlineMath(ref l) => Some(l.clone()),
        NodeValue::Math(ref nm) => Some(nm.literal.clone()),
        NodeValue::Code(ref code) => Some(code.literal.clone()),
        NodeValue::CodeBlock(ref ncb) => Some(ncb.literal.clone()),
        _ => None,
    };

    match literal {
        Some(l) => write!(out, "({} {:?})", name, l).unwrap(),
        None => {
            write!(out, "({}", name).unwrap();
            for ch in node.children() {
                out.push(' ');
                write_ast(out, ch);
            }
            out.push(')');
        }
    }
}
