//! The CommonMark serializer. Output is normalized: math always uses `$$`
//! fences of length two, bullets use the parsed marker, and anything that
//! would reparse differently is backslash-escaped.

use std::cmp::max;
use std::io::{self, Write};

use crate::ctype::isdigit;
use crate::nodes::{
    containing_block, AstNode, ListType, NodeCodeBlock, NodeMath, NodeValue,
};
use crate::parser::Options;

/// Serialize an AST as CommonMark, with the given options.
pub fn format_document<'a>(
    root: &'a AstNode<'a>,
    options: &Options,
    output: &mut dyn Write,
) -> io::Result<()> {
    let mut f = CommonMarkFormatter::new(options);
    f.format(root);
    if !f.v.is_empty() && f.v[f.v.len() - 1] != b'\n' {
        f.v.push(b'\n');
    }
    output.write_all(&f.v)
}

struct CommonMarkFormatter<'o> {
    options: &'o Options,
    v: Vec<u8>,
    prefix: Vec<u8>,
    column: usize,
    need_cr: u8,
    begin_line: bool,
    begin_content: bool,
    in_tight_list_item: bool,
}

#[derive(PartialEq, Clone, Copy)]
enum Escaping {
    /// Emit bytes as they are; used for code and math content.
    Literal,
    /// Escape anything that would reparse as syntax.
    Normal,
}

impl<'o> CommonMarkFormatter<'o> {
    fn new(options: &'o Options) -> Self {
        CommonMarkFormatter {
            options,
            v: vec![],
            prefix: vec![],
            column: 0,
            need_cr: 0,
            begin_line: true,
            begin_content: true,
            in_tight_list_item: false,
        }
    }

    fn output(&mut self, buf: &[u8], escaping: Escaping) {
        if self.in_tight_list_item && self.need_cr > 1 {
            self.need_cr = 1;
        }

        let mut k = self.v.len() as i32 - 1;
        while self.need_cr > 0 {
            if k < 0 || self.v[k as usize] == b'\n' {
                k -= 1;
            } else {
                self.v.push(b'\n');
                if self.need_cr > 1 {
                    self.v.extend(&self.prefix);
                }
            }
            self.column = 0;
            self.begin_line = true;
            self.begin_content = true;
            self.need_cr -= 1;
        }

        for &c in buf {
            if self.begin_line {
                self.v.extend(&self.prefix);
                self.column = self.prefix.len();
            }
            if c == b'\n' {
                self.v.push(c);
                self.begin_line = true;
                self.begin_content = true;
                self.column = 0;
            } else {
                self.outc(c, escaping);
                self.begin_line = false;
                self.begin_content = self.begin_content && isdigit(c);
            }
        }
    }

    fn outc(&mut self, c: u8, escaping: Escaping) {
        let follows_digit = !self.v.is_empty() && isdigit(self.v[self.v.len() - 1]);

        let needs_escaping = escaping == Escaping::Normal
            && (c == b'\\'
                || c == b'`'
                || c == b'$'
                || (self.begin_content
                    && matches!(c, b'-' | b'+' | b'*' | b'>' | b'#' | b'~'))
                || ((c == b'.' || c == b')') && follows_digit && self.begin_content));

        if needs_escaping {
            self.v.push(b'\\');
            self.v.push(c);
            self.column += 2;
        } else {
            self.v.push(c);
            self.column += 1;
        }
    }

    fn cr(&mut self) {
        self.need_cr = max(self.need_cr, 1);
    }

    fn blankline(&mut self) {
        self.need_cr = max(self.need_cr, 2);
    }

    fn format<'a>(&mut self, node: &'a AstNode<'a>) {
        let mut stack = vec![(node, false)];

        while let Some((node, exiting)) = stack.pop() {
            if exiting {
                self.format_node(node, false);
            } else {
                stack.push((node, true));
                self.format_node(node, true);
                for ch in node.reverse_children() {
                    stack.push((ch, false));
                }
            }
        }
    }

    fn format_node<'a>(&mut self, node: &'a AstNode<'a>, entering: bool) {
        self.in_tight_list_item = self.get_in_tight_list_item(node);

        match node.data.borrow().value {
            NodeValue::Document => (),
            NodeValue::BlockQuote => self.format_block_quote(entering),
            NodeValue::List(..) => self.format_list(node, entering),
            NodeValue::Item(..) => self.format_item(node, entering),
            NodeValue::Paragraph => self.format_paragraph(entering),
            NodeValue::CodeBlock(ref ncb) => self.format_code_block(node, ncb, entering),
            NodeValue::Math(ref nm) => self.format_math(node, nm, entering),
            NodeValue::Text(ref literal) => self.format_text(literal, entering),
            NodeValue::SoftBreak => self.format_soft_break(entering),
            NodeValue::LineBreak => self.format_line_break(entering),
            NodeValue::Code(ref code) => self.format_code(&code.literal, entering),
            NodeValue::InlineMath(ref literal) => self.format_inline_math(literal, entering),
        }
    }

    fn get_in_tight_list_item<'a>(&self, node: &'a AstNode<'a>) -> bool {
        let tmp = match containing_block(node) {
            Some(tmp) => tmp,
            None => return false,
        };

        if let NodeValue::Item(..) = tmp.data.borrow().value {
            if let Some(parent) = tmp.parent() {
                if let NodeValue::List(ref nl) = parent.data.borrow().value {
                    return nl.tight;
                }
            }
            return false;
        }

        let parent = match tmp.parent() {
            Some(parent) => parent,
            None => return false,
        };

        if let NodeValue::Item(..) = parent.data.borrow().value {
            if let Some(grandparent) = parent.parent() {
                if let NodeValue::List(ref nl) = grandparent.data.borrow().value {
                    return nl.tight;
                }
            }
        }

        false
    }

    fn format_block_quote(&mut self, entering: bool) {
        if entering {
            self.output(b"> ", Escaping::Literal);
            self.begin_content = true;
            self.prefix.extend(b"> ");
        } else {
            let new_len = self.prefix.len() - 2;
            self.prefix.truncate(new_len);
            self.blankline();
        }
    }

    fn format_list<'a>(&mut self, node: &'a AstNode<'a>, entering: bool) {
        if entering {
            return;
        }
        // a following code block or list would fuse with this one on reparse
        let needs_separator = node.next_sibling().map_or(false, |next| {
            matches!(
                next.data.borrow().value,
                NodeValue::CodeBlock(..) | NodeValue::List(..)
            )
        });
        if needs_separator {
            self.cr();
            self.output(b"<!-- end list -->", Escaping::Literal);
            self.blankline();
        }
    }

    fn format_item<'a>(&mut self, node: &'a AstNode<'a>, entering: bool) {
        let parent = match node.parent() {
            Some(parent) => parent,
            None => return,
        };
        let nl = match parent.data.borrow().value {
            NodeValue::List(nl) => nl,
            _ => return,
        };

        let marker = if nl.list_type == ListType::Bullet {
            let bullet_char = if nl.bullet_char == 0 {
                '-'
            } else {
                nl.bullet_char as char
            };
            format!("{} ", bullet_char)
        } else {
            let mut list_number = nl.start;
            let mut sibling = node.previous_sibling();
            while let Some(s) = sibling {
                list_number += 1;
                sibling = s.previous_sibling();
            }
            let delim = match nl.delimiter {
                crate::nodes::ListDelimType::Period => '.',
                crate::nodes::ListDelimType::Paren => ')',
            };
            format!("{}{} ", list_number, delim)
        };

        if entering {
            self.output(marker.as_bytes(), Escaping::Literal);
            self.begin_content = true;
            for _ in 0..marker.len() {
                self.prefix.push(b' ');
            }
        } else {
            let new_len = self.prefix.len() - marker.len();
            self.prefix.truncate(new_len);
            self.cr();
        }
    }

    fn format_paragraph(&mut self, entering: bool) {
        if !entering {
            self.blankline();
        }
    }

    fn format_code_block<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        ncb: &NodeCodeBlock,
        entering: bool,
    ) {
        if !entering {
            return;
        }

        let first_in_list_item = node.previous_sibling().is_none()
            && node.parent().map_or(false, |parent| {
                matches!(parent.data.borrow().value, NodeValue::Item(..))
            });

        if !first_in_list_item {
            self.blankline();
        }

        let info = ncb.info.as_bytes();
        let literal = ncb.literal.as_bytes();

        let fence_char = if info.contains(&b'`') { b'~' } else { b'`' };
        let numticks = max(3, longest_char_sequence(literal, fence_char) + 1);
        let fence = vec![fence_char; numticks];

        self.output(&fence, Escaping::Literal);
        if !info.is_empty() {
            self.output(b" ", Escaping::Literal);
            self.output(info, Escaping::Literal);
        }
        self.cr();
        self.output(literal, Escaping::Literal);
        self.cr();
        self.output(&fence, Escaping::Literal);
        self.blankline();
    }

    /// Math always serializes with `$$` fences of length two, the value on
    /// its own lines. Inside a paragraph no blank lines are introduced, so
    /// surrounding inlines stay attached.
    fn format_math<'a>(&mut self, node: &'a AstNode<'a>, nm: &NodeMath, entering: bool) {
        if !entering {
            return;
        }

        let in_paragraph = node.parent().map_or(false, |parent| {
            matches!(parent.data.borrow().value, NodeValue::Paragraph)
        });

        if !in_paragraph && node.previous_sibling().is_some() {
            self.blankline();
        }
        self.output(b"$$", Escaping::Literal);
        self.cr();
        self.output(nm.literal.as_bytes(), Escaping::Literal);
        self.cr();
        self.output(b"$$", Escaping::Literal);
        if !in_paragraph {
            self.blankline();
        }
    }

    fn format_inline_math(&mut self, literal: &str, entering: bool) {
        if !entering {
            return;
        }
        self.output(b"$", Escaping::Literal);
        self.output(literal.as_bytes(), Escaping::Literal);
        self.output(b"$", Escaping::Literal);
    }

    fn format_text(&mut self, literal: &str, entering: bool) {
        if entering {
            self.output(literal.as_bytes(), Escaping::Normal);
        }
    }

    fn format_soft_break(&mut self, entering: bool) {
        if entering {
            if self.options.render.hardbreaks {
                self.output(b"\\", Escaping::Literal);
            }
            self.cr();
        }
    }

    fn format_line_break(&mut self, entering: bool) {
        if entering {
            self.output(b"\\", Escaping::Literal);
            self.cr();
        }
    }

    fn format_code(&mut self, literal: &str, entering: bool) {
        if !entering {
            return;
        }

        let literal = literal.as_bytes();
        let numticks = shortest_unused_sequence(literal, b'`');
        let ticks = vec![b'`'; numticks];
        let pad = literal.is_empty()
            || literal[0] == b'`'
            || literal[literal.len() - 1] == b'`'
            || (literal[0] == b' ' && literal[literal.len() - 1] == b' ');

        self.output(&ticks, Escaping::Literal);
        if pad {
            self.output(b" ", Escaping::Literal);
        }
        self.output(literal, Escaping::Literal);
        if pad {
            self.output(b" ", Escaping::Literal);
        }
        self.output(&ticks, Escaping::Literal);
    }
}

fn longest_char_sequence(literal: &[u8], ch: u8) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &c in literal {
        if c == ch {
            current += 1;
        } else {
            longest = max(longest, current);
            current = 0;
        }
    }
    max(longest, current)
}

fn shortest_unused_sequence(literal: &[u8], f: u8) -> usize {
    let mut used = 1u32;
    let mut current = 0;
    for &c in literal {
        if c == f {
            current += 1;
        } else {
            if current < 32 {
                used |= 1 << current;
            }
            current = 0;
        }
    }
    if current < 32 {
        used |= 1 << current;
    }

    let mut i = 0;
    while i < 32 && used & (1 << i) != 0 {
        i += 1;
    }
    if i == 32 {
        longest_char_sequence(literal, f) + 1
    } else {
        i
    }
}
