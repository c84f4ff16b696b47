use super::*;
use ntest::test_case;

#[test_case(
    "hello\n\nworld\n",
    r#"(document (paragraph (text "hello")) (paragraph (text "world")))"#
)]
#[test_case(
    "hello\nworld\n",
    r#"(document (paragraph (text "hello") (softbreak) (text "world")))"#
)]
#[test_case(
    "foo  \nbar\n",
    r#"(document (paragraph (text "foo") (linebreak) (text "bar")))"#
)]
#[test_case(
    "a\\\nb\n",
    r#"(document (paragraph (text "a") (linebreak) (text "b")))"#
)]
fn paragraphs_and_breaks(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "\\*not emph\\*\n",
    r#"(document (paragraph (text "*not emph*")))"#
)]
#[test_case(
    "a \\x b\n",
    r#"(document (paragraph (text "a \\x b")))"#
)]
fn backslash_escapes(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "`2+2`\n",
    r#"(document (paragraph (code "2+2")))"#
)]
#[test_case(
    "` x `\n",
    r#"(document (paragraph (code "x")))"#
)]
#[test_case(
    "``a`b``\n",
    r#"(document (paragraph (code "a`b")))"#
)]
#[test_case(
    "`unclosed\n",
    r#"(document (paragraph (text "`unclosed")))"#
)]
fn code_spans(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "```rust\nfn main() {}\n```\n",
    r#"(document (code_block "fn main() {}\n"))"#
)]
#[test_case(
    "~~~\ntilde fence\n~~~\n",
    r#"(document (code_block "tilde fence\n"))"#
)]
fn fenced_code_blocks(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "> hi\n",
    r#"(document (block_quote (paragraph (text "hi"))))"#
)]
#[test_case(
    "> hi\nthere\n",
    r#"(document (block_quote (paragraph (text "hi") (softbreak) (text "there"))))"#
)]
#[test_case(
    "> > nested\n",
    r#"(document (block_quote (block_quote (paragraph (text "nested")))))"#
)]
fn block_quotes(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "- a\n- b\n",
    r#"(document (list (item (paragraph (text "a"))) (item (paragraph (text "b")))))"#
)]
#[test_case(
    "1. a\n1. b\n",
    r#"(document (list (item (paragraph (text "a"))) (item (paragraph (text "b")))))"#
)]
#[test_case(
    "- a\n  - b\n",
    r#"(document (list (item (paragraph (text "a")) (list (item (paragraph (text "b")))))))"#
)]
fn lists(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test]
fn empty_document() {
    assert_ast("", "(document)");
}

#[test]
fn code_block_info_string() {
    let arena = Arena::new();
    let root = parse_document(&arena, "```rust\nfn main() {}\n```\n", &math_options());
    let code = root.first_child().unwrap();
    match code.data.borrow().value {
        crate::nodes::NodeValue::CodeBlock(ref ncb) => {
            assert_eq!(ncb.info, "rust");
            assert_eq!(ncb.fence_char, b'`');
        }
        ref value => panic!("unexpected node: {:?}", value),
    };
}
