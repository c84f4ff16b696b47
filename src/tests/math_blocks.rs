use super::*;
use ntest::test_case;

#[test_case(
    "$$\n\\alpha\n$$\n",
    r#"(document (math "\\alpha"))"#
)]
#[test_case(
    "tango\n$$\n\\alpha\n$$\n",
    r#"(document (paragraph (text "tango")) (math "\\alpha"))"#
)]
#[test_case(
    "$$\n\\alpha\\$\n$$\n",
    r#"(document (math "\\alpha\\$"))"#
)]
#[test_case(
    "$$\n$$\n",
    r#"(document (math ""))"#
)]
#[test_case(
    "$$\n\n\\alpha\n\n$$\n",
    r#"(document (math "\n\\alpha\n"))"#
)]
fn math_blocks(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "$$  must\n\\alpha\n$$  be ignored\n",
    r#"(document (math "\\alpha"))"#
)]
#[test_case(
    "$$$\nx\n$$\n$$$\n",
    r#"(document (math "x\n$$"))"#
)]
#[test_case(
    "$$\nx\n$$$\n",
    r#"(document (math "x"))"#
)]
fn fence_matching(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "  $$$\n    \\alpha\n  $$$\n",
    r#"(document (math "  \\alpha"))"#
)]
#[test_case(
    "  $$\n x\n  $$\n",
    r#"(document (math "x"))"#
)]
#[test_case(
    "$$\n  x\n$$\n",
    r#"(document (math "  x"))"#
)]
fn fence_indent(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "$$\n\\alpha\n",
    r#"(document (math "\\alpha"))"#
)]
#[test_case(
    "$$\n",
    r#"(document (math ""))"#
)]
fn unterminated_blocks_close_at_eof(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "> $$\n> \\alpha\\beta\n> $$\n",
    r#"(document (block_quote (math "\\alpha\\beta")))"#
)]
#[test_case(
    "- $$\n  \\alpha\n  $$\n",
    r#"(document (list (item (math "\\alpha"))))"#
)]
#[test_case(
    "> tango\n> $$\n> \\alpha\n> $$\n",
    r#"(document (block_quote (paragraph (text "tango")) (math "\\alpha")))"#
)]
fn math_blocks_nest_in_containers(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test]
fn does_not_swallow_following_blocks() {
    assert_ast(
        "$$\n\\alpha\n$$\n```\ncode fence\n```\n",
        r#"(document (math "\\alpha") (code_block "code fence\n"))"#,
    );
}

#[test]
fn fences_are_plain_text_when_disabled() {
    pretty_assertions::assert_eq!(
        ast_with("$$\n\\alpha\n$$\n", &Options::default()),
        r#"(document (paragraph (text "$$") (softbreak) (text "\\alpha") (softbreak) (text "$$")))"#
    );
}
