use super::*;
use crate::nodes::RenderHint;
use ntest::test_case;

#[test_case(
    "Math $\\alpha$\n\n$$\n\\beta+\\gamma\n$$\n",
    r#"(document (paragraph (text "Math ") (inline_math "\\alpha")) (math "\\beta+\\gamma"))"#
)]
#[test_case(
    "$2+2$\n",
    r#"(document (paragraph (inline_math "2+2")))"#
)]
#[test_case(
    "$p(\\theta \\mid y) \\propto p(y \\mid \\theta) p(\\theta)$\n",
    r#"(document (paragraph (inline_math "p(\\theta \\mid y) \\propto p(y \\mid \\theta) p(\\theta)")))"#
)]
#[test_case(
    "$a\nb$\n",
    r#"(document (paragraph (inline_math "a\nb")))"#
)]
fn inline_math(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "$\\alpha\\$\n",
    r#"(document (paragraph (text "$\\alpha$")))"#
)]
#[test_case(
    "\\$\\alpha\\$\n",
    r#"(document (paragraph (text "$\\alpha$")))"#
)]
#[test_case(
    "\\\\$\\alpha$\n",
    r#"(document (paragraph (text "\\") (inline_math "\\alpha")))"#
)]
#[test_case(
    "$\\alpha\\$$\n",
    r#"(document (paragraph (inline_math "\\alpha\\$")))"#
)]
fn escaped_dollars(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "`$`\\alpha$\n",
    r#"(document (paragraph (code "$") (text "\\alpha$")))"#
)]
#[test_case(
    "$\\alpha`$` foo\n",
    r#"(document (paragraph (text "$\\alpha") (code "$") (text " foo")))"#
)]
#[test_case(
    "$`\\alpha`$\n",
    r#"(document (paragraph (inline_math "`\\alpha`")))"#
)]
#[test_case(
    "`$1+2$`\n",
    r#"(document (paragraph (code "$1+2$")))"#
)]
fn code_spans_claim_dollars(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "$$\\alpha$$\n",
    r#"(document (paragraph (math "\\alpha")))"#
)]
#[test_case(
    "$$20,000 and $$30,000\n",
    r#"(document (paragraph (math "20,000 and ") (text "30,000")))"#
)]
#[test_case(
    "$$$ not closed by $$\n",
    r#"(document (paragraph (math " not closed by ")))"#
)]
#[test_case(
    "$$   2+2  $$\n",
    r#"(document (paragraph (math "   2+2  ")))"#
)]
fn display_math_inline(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test_case(
    "$22 and $2+2$\n",
    r#"(document (paragraph (inline_math "22 and ") (text "2+2$")))"#
)]
#[test_case(
    "unclosed $ opener\n",
    r#"(document (paragraph (text "unclosed $ opener")))"#
)]
#[test_case(
    "a $$ b\n",
    r#"(document (paragraph (text "a $$ b")))"#
)]
fn delimiter_fallbacks(markdown: &str, expected: &str) {
    assert_ast(markdown, expected);
}

#[test]
fn disabled_by_default() {
    pretty_assertions::assert_eq!(
        ast_with("$x$ and $$y$$\n", &Options::default()),
        r#"(document (paragraph (text "$x$ and $$y$$")))"#
    );
}

#[test]
fn render_hints_attached() {
    let arena = Arena::new();
    let options = math_options();
    let root = parse_document(&arena, "$$\n\\alpha\n$$\n\nand $x$\n", &options);

    let mut hints = vec![];
    for node in root.descendants() {
        if let Some(ref hint) = node.data.borrow().render_hint {
            hints.push(hint.clone());
        }
    }

    pretty_assertions::assert_eq!(
        hints,
        vec![
            RenderHint {
                name: "div",
                properties: vec![("class".to_string(), "math".to_string())],
                children: vec![NodeValue::Text("\\alpha".to_string())],
            },
            RenderHint {
                name: "span",
                properties: vec![("class".to_string(), "inlineMath".to_string())],
                children: vec![NodeValue::Text("x".to_string())],
            },
        ]
    );
}
