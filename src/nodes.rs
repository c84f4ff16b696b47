//! The document tree produced by parsing.

use std::cell::RefCell;

use crate::arena_tree::Node;

pub use crate::parser::math::NodeMath;

/// The core AST node enum.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    /// The root of every AST.
    Document,

    /// **Block**. A [block quote](https://github.github.com/gfm/#block-quotes).
    /// Contains other blocks.
    BlockQuote,

    /// **Block**. A [list](https://github.github.com/gfm/#lists). Contains
    /// list items.
    List(NodeList),

    /// **Block**. A list item. Contains other blocks.
    Item(NodeList),

    /// **Block**. A [fenced code block](https://github.github.com/gfm/#code-fence).
    CodeBlock(NodeCodeBlock),

    /// **Block**. A paragraph. Contains inlines.
    Paragraph,

    /// Dollar-fenced math. Created in block position by `$$` fence lines and
    /// in inline position by one-line `$$...$$` spans; the serializer emits
    /// the fenced form either way.
    Math(NodeMath),

    /// **Inline**. Literal text.
    Text(String),

    /// **Inline**. A soft line break in a paragraph.
    SoftBreak,

    /// **Inline**. A hard line break.
    LineBreak,

    /// **Inline**. A [code span](https://github.github.com/gfm/#code-spans).
    Code(NodeCode),

    /// **Inline**. Single-dollar math; the value is kept verbatim.
    InlineMath(String),
}

/// The metadata of a list or list item.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeList {
    /// Whether the list is bullet or ordered.
    pub list_type: ListType,

    /// The indent of the marker from the containing block's content start.
    pub marker_offset: usize,

    /// The space taken by the marker and its trailing spaces; continuation
    /// lines must indent at least this far.
    pub padding: usize,

    /// For ordered lists, the starting number.
    pub start: usize,

    /// For ordered lists, the delimiter after the number.
    pub delimiter: ListDelimType,

    /// For bullet lists, the marker character (`-`, `+`, or `*`).
    pub bullet_char: u8,

    /// Whether the list is [tight](https://github.github.com/gfm/#tight).
    pub tight: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    #[default]
    Bullet,
    Ordered,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ListDelimType {
    #[default]
    Period,
    Paren,
}

/// The metadata and content of a fenced code block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeCodeBlock {
    /// The fence character (`` ` `` or `~`).
    pub fence_char: u8,

    /// The length of the opening fence.
    pub fence_length: usize,

    /// The indent of the opening fence.
    pub fence_offset: usize,

    /// The info string, trimmed.
    pub info: String,

    /// The block's literal contents.
    pub literal: String,
}

/// The contents of an inline code span.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeCode {
    /// The length of the backtick run that delimited the span.
    pub num_backticks: usize,

    /// The span's contents, after CommonMark normalization.
    pub literal: String,
}

/// A renderer-facing annotation attached to math nodes: the HTML-ish element
/// a downstream renderer should produce for the node.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderHint {
    /// Element name, e.g. `div` or `span`.
    pub name: &'static str,

    /// Attribute key/value pairs.
    pub properties: Vec<(String, String)>,

    /// Replacement children for the rendered element.
    pub children: Vec<NodeValue>,
}

impl NodeValue {
    /// Whether the value has block semantics. Note `Math` is a block even
    /// when positioned inside a paragraph.
    pub fn block(&self) -> bool {
        matches!(
            self,
            NodeValue::Document
                | NodeValue::BlockQuote
                | NodeValue::List(..)
                | NodeValue::Item(..)
                | NodeValue::CodeBlock(..)
                | NodeValue::Paragraph
                | NodeValue::Math(..)
        )
    }

    pub fn contains_inlines(&self) -> bool {
        matches!(self, NodeValue::Paragraph)
    }

    pub fn text(&self) -> Option<&String> {
        match self {
            NodeValue::Text(ref t) => Some(t),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            NodeValue::Text(ref mut t) => Some(t),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            NodeValue::Document => "document",
            NodeValue::BlockQuote => "block_quote",
            NodeValue::List(..) => "list",
            NodeValue::Item(..) => "item",
            NodeValue::CodeBlock(..) => "code_block",
            NodeValue::Paragraph => "paragraph",
            NodeValue::Math(..) => "math",
            NodeValue::Text(..) => "text",
            NodeValue::SoftBreak => "softbreak",
            NodeValue::LineBreak => "linebreak",
            NodeValue::Code(..) => "code",
            NodeValue::InlineMath(..) => "inline_math",
        }
    }
}

/// A single node in the document tree.
#[derive(Debug, Clone)]
pub struct Ast {
    /// The node value itself.
    pub value: NodeValue,

    /// Raw content collected during the block phase, consumed by the inline
    /// phase or by block finalization.
    pub content: String,

    /// The line the block started on.
    pub start_line: usize,

    /// Whether the block is still accepting lines.
    pub open: bool,

    pub last_line_blank: bool,

    /// Attached by the annotation pass; `None` on non-math nodes.
    pub render_hint: Option<RenderHint>,
}

impl Ast {
    pub fn new(value: NodeValue, start_line: usize) -> Self {
        Ast {
            value,
            content: String::new(),
            start_line,
            open: true,
            last_line_blank: false,
            render_hint: None,
        }
    }
}

/// The type of the arena in which AST nodes are allocated.
pub type AstNode<'a> = Node<'a, RefCell<Ast>>;

pub fn can_contain_type<'a>(node: &'a AstNode<'a>, child: &NodeValue) -> bool {
    if matches!(child, NodeValue::Document) {
        return false;
    }

    match node.data.borrow().value {
        NodeValue::Document | NodeValue::BlockQuote | NodeValue::Item(..) => {
            child.block() && !matches!(child, NodeValue::Item(..))
        }
        NodeValue::List(..) => matches!(child, NodeValue::Item(..)),
        NodeValue::Paragraph => !child.block(),
        _ => false,
    }
}

pub fn last_child_is_open<'a>(node: &'a AstNode<'a>) -> bool {
    node.last_child().map_or(false, |n| n.data.borrow().open)
}

pub fn ends_with_blank_line<'a>(node: &'a AstNode<'a>) -> bool {
    let mut it = Some(node);
    while let Some(cur) = it {
        if cur.data.borrow().last_line_blank {
            return true;
        }
        match cur.data.borrow().value {
            NodeValue::List(..) | NodeValue::Item(..) => it = cur.last_child(),
            _ => it = None,
        }
    }
    false
}

/// The nearest enclosing node with block semantics, the node itself included.
pub fn containing_block<'a>(node: &'a AstNode<'a>) -> Option<&'a AstNode<'a>> {
    let mut ch = Some(node);
    while let Some(n) = ch {
        if n.data.borrow().value.block() {
            return Some(n);
        }
        ch = n.parent();
    }
    None
}
