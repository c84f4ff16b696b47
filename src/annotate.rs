//! Attaches render hints to math nodes, telling a downstream renderer which
//! element to produce without committing this crate to an output format.

use crate::nodes::{AstNode, NodeValue, RenderHint};

pub fn attach_render_hints<'a>(root: &'a AstNode<'a>) {
    for node in root.descendants() {
        let mut ast = node.data.borrow_mut();
        let hint = match ast.value {
            NodeValue::Math(ref nm) => Some(element("div", "math", &nm.literal)),
            NodeValue::InlineMath(ref literal) => Some(element("span", "inlineMath", literal)),
            _ => None,
        };
        if hint.is_some() {
            ast.render_hint = hint;
        }
    }
}

fn element(name: &'static str, class: &str, literal: &str) -> RenderHint {
    RenderHint {
        name,
        properties: vec![("class".to_string(), class.to_string())],
        children: vec![NodeValue::Text(literal.to_string())],
    }
}
