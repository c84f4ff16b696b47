mod inlines;
pub mod math;
mod options;

use std::cell::RefCell;
use std::cmp::min;
use std::mem;

use typed_arena::Arena;

use crate::annotate;
use crate::arena_tree::Node;
use crate::ctype::{isdigit, isspace};
use crate::nodes::{
    can_contain_type, last_child_is_open, Ast, AstNode, ListDelimType, ListType, NodeCodeBlock,
    NodeList, NodeValue,
};
use crate::parser::math::NodeMath;
use crate::scanners;
use crate::strings;

pub use crate::parser::options::{Extension, Options, Render};

const TAB_STOP: usize = 4;
const CODE_INDENT: usize = 4;

/// Parse a Markdown document to an AST.
///
/// See the crate documentation for an example.
pub fn parse_document<'a>(
    arena: &'a Arena<AstNode<'a>>,
    buffer: &str,
    options: &Options,
) -> &'a AstNode<'a> {
    let root: &'a AstNode<'a> = arena.alloc(Node::new(RefCell::new(Ast::new(
        NodeValue::Document,
        1,
    ))));
    let mut parser = Parser::new(arena, root, options);
    parser.feed(buffer);
    parser.finish()
}

pub struct Parser<'a, 'o> {
    arena: &'a Arena<AstNode<'a>>,
    options: &'o Options,
    root: &'a AstNode<'a>,
    current: &'a AstNode<'a>,
    line_number: usize,
    offset: usize,
    column: usize,
    first_nonspace: usize,
    first_nonspace_column: usize,
    indent: usize,
    blank: bool,
    partially_consumed_tab: bool,
}

impl<'a, 'o> Parser<'a, 'o> {
    fn new(arena: &'a Arena<AstNode<'a>>, root: &'a AstNode<'a>, options: &'o Options) -> Self {
        Parser {
            arena,
            options,
            root,
            current: root,
            line_number: 0,
            offset: 0,
            column: 0,
            first_nonspace: 0,
            first_nonspace_column: 0,
            indent: 0,
            blank: false,
            partially_consumed_tab: false,
        }
    }

    fn feed(&mut self, s: &str) {
        let bytes = s.as_bytes();
        let mut i = 0;
        while i < s.len() {
            let end = match Self::find_line_end(&bytes[i..]) {
                Some(pos) => {
                    let mut e = i + pos + 1;
                    if bytes[i + pos] == b'\r' && bytes.get(e) == Some(&b'\n') {
                        e += 1;
                    }
                    e
                }
                None => s.len(),
            };
            self.process_line(&s[i..end]);
            i = end;
        }
    }

    fn find_line_end(s: &[u8]) -> Option<usize> {
        jetscii::bytes!(b'\r', b'\n').find(s)
    }

    fn process_line(&mut self, line: &str) {
        let mut owned_line;
        let line: &str = if line
            .as_bytes()
            .last()
            .map_or(true, |&c| !strings::is_line_end_char(c))
        {
            owned_line = line.to_string();
            owned_line.push('\n');
            &owned_line
        } else {
            line
        };

        self.offset = 0;
        self.column = 0;
        self.first_nonspace = 0;
        self.first_nonspace_column = 0;
        self.blank = false;
        self.partially_consumed_tab = false;
        self.line_number += 1;

        let mut all_matched = true;
        if let Some(last_matched_container) = self.check_open_blocks(line, &mut all_matched) {
            let mut container = last_matched_container;
            let current = self.current;
            self.open_new_blocks(&mut container, line);
            if current.same_node(self.current) {
                self.add_text_to_container(container, last_matched_container, line);
            }
        }
    }

    /// Matches the continuation prefixes of the open block stack against the
    /// line. Returns `None` when a fence close consumed the whole line.
    fn check_open_blocks(
        &mut self,
        line: &str,
        all_matched: &mut bool,
    ) -> Option<&'a AstNode<'a>> {
        let (new_all_matched, mut container) = self.check_open_blocks_inner(self.root, line)?;

        *all_matched = new_all_matched;
        if !new_all_matched {
            container = container.parent().unwrap();
        }

        Some(container)
    }

    fn check_open_blocks_inner(
        &mut self,
        mut container: &'a AstNode<'a>,
        line: &str,
    ) -> Option<(bool, &'a AstNode<'a>)> {
        while last_child_is_open(container) {
            container = container.last_child().unwrap();
            let mut ast_guard = container.data.borrow_mut();
            let ast = &mut *ast_guard;

            self.find_first_nonspace(line);

            match ast.value {
                NodeValue::BlockQuote => {
                    if !self.parse_block_quote_prefix(line) {
                        return Some((false, container));
                    }
                }
                NodeValue::Item(nl) => {
                    if !self.parse_node_item_prefix(line, container, &nl) {
                        return Some((false, container));
                    }
                }
                NodeValue::CodeBlock(..) => {
                    if !self.parse_code_block_prefix(line, container, ast)? {
                        return Some((false, container));
                    }
                }
                NodeValue::Math(..) => {
                    if !self.parse_math_block_prefix(line, container, ast)? {
                        return Some((false, container));
                    }
                }
                NodeValue::Paragraph => {
                    if self.blank {
                        return Some((false, container));
                    }
                }
                _ => {}
            }
        }

        Some((true, container))
    }

    fn find_first_nonspace(&mut self, line: &str) {
        let mut chars_to_tab = TAB_STOP - (self.column % TAB_STOP);

        if self.first_nonspace <= self.offset {
            self.first_nonspace = self.offset;
            self.first_nonspace_column = self.column;

            loop {
                let c = match line.as_bytes().get(self.first_nonspace) {
                    Some(&c) => c,
                    None => break,
                };
                match c {
                    b' ' => {
                        self.first_nonspace += 1;
                        self.first_nonspace_column += 1;
                        chars_to_tab -= 1;
                        if chars_to_tab == 0 {
                            chars_to_tab = TAB_STOP;
                        }
                    }
                    b'\t' => {
                        self.first_nonspace += 1;
                        self.first_nonspace_column += chars_to_tab;
                        chars_to_tab = TAB_STOP;
                    }
                    _ => break,
                }
            }
        }

        self.blank = line
            .as_bytes()
            .get(self.first_nonspace)
            .map_or(false, |&c| strings::is_line_end_char(c));
        self.indent = self.first_nonspace_column - self.column;
    }

    fn advance_offset(&mut self, line: &str, mut count: usize, columns: bool) {
        let bytes = line.as_bytes();
        while count > 0 {
            match bytes[self.offset] {
                b'\t' => {
                    let chars_to_tab = TAB_STOP - (self.column % TAB_STOP);
                    if columns {
                        self.partially_consumed_tab = chars_to_tab > count;
                        let chars_to_advance = min(count, chars_to_tab);
                        self.column += chars_to_advance;
                        self.offset += if self.partially_consumed_tab { 0 } else { 1 };
                        count -= chars_to_advance;
                    } else {
                        self.partially_consumed_tab = false;
                        self.column += chars_to_tab;
                        self.offset += 1;
                        count -= 1;
                    }
                }
                _ => {
                    self.partially_consumed_tab = false;
                    self.offset += 1;
                    self.column += 1;
                    count -= 1;
                }
            }
        }
    }

    fn parse_block_quote_prefix(&mut self, line: &str) -> bool {
        let indent = self.indent;
        if indent <= 3 && line.as_bytes().get(self.first_nonspace) == Some(&b'>') {
            self.advance_offset(line, indent + 1, true);

            if strings::is_space_or_tab(line.as_bytes()[self.offset]) {
                self.advance_offset(line, 1, true);
            }

            return true;
        }
        false
    }

    fn parse_node_item_prefix(
        &mut self,
        line: &str,
        container: &'a AstNode<'a>,
        nl: &NodeList,
    ) -> bool {
        if self.indent >= nl.marker_offset + nl.padding {
            self.advance_offset(line, nl.marker_offset + nl.padding, true);
            true
        } else if self.blank && container.first_child().is_some() {
            let offset = self.first_nonspace - self.offset;
            self.advance_offset(line, offset, false);
            true
        } else {
            false
        }
    }

    fn parse_code_block_prefix(
        &mut self,
        line: &str,
        container: &'a AstNode<'a>,
        ast: &mut Ast,
    ) -> Option<bool> {
        let (fence_char, fence_length, fence_offset) = match ast.value {
            NodeValue::CodeBlock(ref ncb) => (ncb.fence_char, ncb.fence_length, ncb.fence_offset),
            _ => unreachable!(),
        };

        if self.indent <= 3 && line.as_bytes().get(self.first_nonspace) == Some(&fence_char) {
            if let Some(matched) = scanners::close_code_fence(&line[self.first_nonspace..]) {
                if matched >= fence_length {
                    self.advance_offset(line, self.first_nonspace + matched - self.offset, false);
                    self.current = self.finalize_borrowed(container, ast).unwrap();
                    return None;
                }
            }
        }

        // skip opening fence's indent
        let mut i = fence_offset;
        while i > 0
            && self.offset < line.len()
            && strings::is_space_or_tab(line.as_bytes()[self.offset])
        {
            self.advance_offset(line, 1, true);
            i -= 1;
        }
        Some(true)
    }

    fn parse_math_block_prefix(
        &mut self,
        line: &str,
        container: &'a AstNode<'a>,
        ast: &mut Ast,
    ) -> Option<bool> {
        let (fence_length, fence_offset) = match ast.value {
            NodeValue::Math(ref nm) => (nm.fence_length, nm.fence_offset),
            _ => unreachable!(),
        };

        // the closing fence may not be indented deeper than the opening one;
        // anything after the run is ignored
        if self.indent <= fence_offset && line.as_bytes().get(self.first_nonspace) == Some(&b'$') {
            if let Some(matched) = scanners::close_math_fence(&line[self.first_nonspace..]) {
                if matched >= fence_length {
                    self.advance_offset(line, self.first_nonspace + matched - self.offset, false);
                    self.current = self.finalize_borrowed(container, ast).unwrap();
                    return None;
                }
            }
        }

        // dedent by up to the opening fence's indent, whatever is present
        let mut i = fence_offset;
        while i > 0
            && self.offset < line.len()
            && strings::is_space_or_tab(line.as_bytes()[self.offset])
        {
            self.advance_offset(line, 1, true);
            i -= 1;
        }
        Some(true)
    }

    fn open_new_blocks(&mut self, container: &mut &'a AstNode<'a>, line: &str) {
        while !matches!(
            container.data.borrow().value,
            NodeValue::CodeBlock(..) | NodeValue::Math(..)
        ) {
            self.find_first_nonspace(line);
            let indented = self.indent >= CODE_INDENT;

            if !indented && line.as_bytes().get(self.first_nonspace) == Some(&b'>') {
                self.handle_blockquote(container, line);
            } else if self.handle_math_fence(container, line) {
                // fenced: the rest of the line is content
                break;
            } else if !indented && self.handle_code_fence(container, line) {
                break;
            } else if (!indented || matches!(container.data.borrow().value, NodeValue::List(..)))
                && self.handle_list(container, line)
            {
                // continue; the item may begin with further blocks
            } else {
                break;
            }
        }
    }

    fn handle_blockquote(&mut self, container: &mut &'a AstNode<'a>, line: &str) {
        let offset = self.first_nonspace + 1 - self.offset;
        self.advance_offset(line, offset, false);
        if strings::is_space_or_tab(line.as_bytes()[self.offset]) {
            self.advance_offset(line, 1, true);
        }
        *container = self.add_child(container, NodeValue::BlockQuote);
    }

    fn handle_math_fence(&mut self, container: &mut &'a AstNode<'a>, line: &str) -> bool {
        if !self.options.extension.math_dollars {
            return false;
        }
        let matched = match scanners::open_math_fence(&line[self.first_nonspace..]) {
            Some(matched) => matched,
            None => return false,
        };

        let first_nonspace = self.first_nonspace;
        let offset = self.offset;
        let nm = NodeMath {
            fence_length: matched,
            fence_offset: first_nonspace - offset,
            literal: String::new(),
        };
        *container = self.add_child(container, NodeValue::Math(nm));
        self.advance_offset(line, first_nonspace + matched - offset, false);
        true
    }

    fn handle_code_fence(&mut self, container: &mut &'a AstNode<'a>, line: &str) -> bool {
        let matched = match scanners::open_code_fence(&line[self.first_nonspace..]) {
            Some(matched) => matched,
            None => return false,
        };

        let first_nonspace = self.first_nonspace;
        let offset = self.offset;
        let ncb = NodeCodeBlock {
            fence_char: line.as_bytes()[first_nonspace],
            fence_length: matched,
            fence_offset: first_nonspace - offset,
            info: String::new(),
            literal: String::new(),
        };
        *container = self.add_child(container, NodeValue::CodeBlock(ncb));
        self.advance_offset(line, first_nonspace + matched - offset, false);
        true
    }

    fn handle_list(&mut self, container: &mut &'a AstNode<'a>, line: &str) -> bool {
        let interrupts_paragraph =
            matches!(container.data.borrow().value, NodeValue::Paragraph);
        let (matched, mut nl) =
            match parse_list_marker(line, self.first_nonspace, interrupts_paragraph) {
                Some(result) => result,
                None => return false,
            };

        let offset = self.first_nonspace + matched - self.offset;
        self.advance_offset(line, offset, false);

        let (save_partially_consumed_tab, save_offset, save_column) =
            (self.partially_consumed_tab, self.offset, self.column);

        while self.column - save_column <= 5
            && strings::is_space_or_tab(line.as_bytes()[self.offset])
        {
            self.advance_offset(line, 1, true);
        }

        let i = self.column - save_column;
        if !(1..5).contains(&i) || strings::is_line_end_char(line.as_bytes()[self.offset]) {
            nl.padding = matched + 1;
            self.offset = save_offset;
            self.column = save_column;
            self.partially_consumed_tab = save_partially_consumed_tab;
            if i > 0 {
                self.advance_offset(line, 1, true);
            }
        } else {
            nl.padding = matched + i;
        }

        nl.marker_offset = self.indent;

        let is_matching_list = match container.data.borrow().value {
            NodeValue::List(ref mnl) => lists_match(mnl, &nl),
            _ => false,
        };
        if !is_matching_list {
            *container = self.add_child(container, NodeValue::List(nl));
        }
        *container = self.add_child(container, NodeValue::Item(nl));
        true
    }

    fn add_child(
        &mut self,
        mut parent: &'a AstNode<'a>,
        value: NodeValue,
    ) -> &'a AstNode<'a> {
        while !can_contain_type(parent, &value) {
            parent = self.finalize(parent).unwrap();
        }

        let child = Ast::new(value, self.line_number);
        let node = self.arena.alloc(Node::new(RefCell::new(child)));
        parent.append(node);
        node
    }

    fn add_text_to_container(
        &mut self,
        mut container: &'a AstNode<'a>,
        last_matched_container: &'a AstNode<'a>,
        line: &str,
    ) {
        self.find_first_nonspace(line);

        if self.blank {
            if let Some(last_child) = container.last_child() {
                last_child.data.borrow_mut().last_line_blank = true;
            }
        }

        let last_line_blank = self.blank
            && !matches!(
                container.data.borrow().value,
                NodeValue::BlockQuote | NodeValue::CodeBlock(..) | NodeValue::Math(..)
            )
            && !(matches!(container.data.borrow().value, NodeValue::Item(..))
                && container.first_child().is_none()
                && container.data.borrow().start_line == self.line_number);
        container.data.borrow_mut().last_line_blank = last_line_blank;

        if !self.current.same_node(last_matched_container)
            && container.same_node(last_matched_container)
            && !self.blank
            && matches!(self.current.data.borrow().value, NodeValue::Paragraph)
        {
            // lazy paragraph continuation
            self.add_line(self.current, line);
        } else {
            while !self.current.same_node(last_matched_container) {
                self.current = self.finalize(self.current).unwrap();
            }

            let literal = matches!(
                container.data.borrow().value,
                NodeValue::CodeBlock(..) | NodeValue::Math(..)
            );
            if literal {
                self.add_line(container, line);
            } else if !self.blank {
                container = self.add_child(container, NodeValue::Paragraph);
                let count = self.first_nonspace - self.offset;
                self.advance_offset(line, count, false);
                self.add_line(container, line);
            }

            self.current = container;
        }
    }

    fn add_line(&mut self, node: &'a AstNode<'a>, line: &str) {
        let mut ast = node.data.borrow_mut();
        assert!(ast.open);
        if self.partially_consumed_tab {
            self.offset += 1;
            let chars_to_tab = TAB_STOP - (self.column % TAB_STOP);
            for _ in 0..chars_to_tab {
                ast.content.push(' ');
            }
        }
        if self.offset < line.len() {
            ast.content.push_str(&line[self.offset..]);
        }
    }

    fn finalize(&mut self, node: &'a AstNode<'a>) -> Option<&'a AstNode<'a>> {
        self.finalize_borrowed(node, &mut node.data.borrow_mut())
    }

    fn finalize_borrowed(
        &mut self,
        node: &'a AstNode<'a>,
        ast: &mut Ast,
    ) -> Option<&'a AstNode<'a>> {
        assert!(ast.open);
        ast.open = false;

        let parent = node.parent();
        let content = &mut ast.content;

        match ast.value {
            NodeValue::Paragraph => {
                // content is consumed by the inline phase
            }
            NodeValue::CodeBlock(ref mut ncb) => {
                let mut tmp = mem::take(content);
                // the first buffered line is the opening fence's remainder,
                // which carries the info string
                let info_end = tmp
                    .bytes()
                    .position(strings::is_line_end_char)
                    .unwrap_or(tmp.len());
                let info = tmp[..info_end].trim().to_string();
                strings::remove_first_line(&mut tmp);
                ncb.info = info;
                ncb.literal = tmp;
            }
            NodeValue::Math(ref mut nm) => {
                let mut tmp = mem::take(content);
                // anything trailing the opening fence is ignored
                strings::remove_first_line(&mut tmp);
                strings::remove_trailing_line_end(&mut tmp);
                nm.literal = tmp;
            }
            NodeValue::List(ref mut nl) => {
                nl.tight = determine_list_tight(node);
            }
            _ => {}
        }

        parent
    }

    fn finish(&mut self) -> &'a AstNode<'a> {
        self.finalize_document();
        self.root
    }

    fn finalize_document(&mut self) {
        while !self.current.same_node(self.root) {
            self.current = self.finalize(self.current).unwrap();
        }
        self.finalize(self.root);
        self.process_inlines();
        self.postprocess_text_nodes();
        annotate::attach_render_hints(self.root);
    }

    fn process_inlines(&mut self) {
        for node in self.root.descendants() {
            if node.data.borrow().value.contains_inlines() {
                self.parse_inlines(node);
            }
        }
    }

    fn parse_inlines(&mut self, node: &'a AstNode<'a>) {
        let (content, start_line) = {
            let mut ast = node.data.borrow_mut();
            strings::rtrim(&mut ast.content);
            (mem::take(&mut ast.content), ast.start_line)
        };
        let mut subj = inlines::Subject::new(self.arena, self.options, content, start_line);
        while subj.parse_inline(node) {}
    }

    fn postprocess_text_nodes(&mut self) {
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            let mut nch = node.first_child();
            while let Some(n) = nch {
                let mut n_is_text = false;
                {
                    let mut ast = n.data.borrow_mut();
                    if let Some(text) = ast.value.text_mut() {
                        n_is_text = true;
                        // absorb all subsequent text siblings
                        while let Some(next) = n.next_sibling() {
                            let adj = match next.data.borrow().value {
                                NodeValue::Text(ref adj) => adj.clone(),
                                _ => break,
                            };
                            text.push_str(&adj);
                            next.detach();
                        }
                    }
                }
                if !n_is_text {
                    stack.push(n);
                }
                nch = n.next_sibling();
            }
        }
    }
}

fn parse_list_marker(
    line: &str,
    mut pos: usize,
    interrupts_paragraph: bool,
) -> Option<(usize, NodeList)> {
    let bytes = line.as_bytes();
    let mut c = bytes[pos];
    let startpos = pos;

    if c == b'*' || c == b'-' || c == b'+' {
        pos += 1;
        if !isspace(bytes[pos]) {
            return None;
        }

        if interrupts_paragraph {
            let mut i = pos;
            while strings::is_space_or_tab(bytes[i]) {
                i += 1;
            }
            if strings::is_line_end_char(bytes[i]) {
                return None;
            }
        }

        return Some((
            pos - startpos,
            NodeList {
                list_type: ListType::Bullet,
                marker_offset: 0,
                padding: 0,
                start: 1,
                delimiter: ListDelimType::Period,
                bullet_char: c,
                tight: false,
            },
        ));
    } else if isdigit(c) {
        let mut start: usize = 0;
        let mut digits = 0;

        loop {
            start = (10 * start) + (bytes[pos] - b'0') as usize;
            pos += 1;
            digits += 1;

            if !(digits < 9 && isdigit(bytes[pos])) {
                break;
            }
        }

        if interrupts_paragraph && start != 1 {
            return None;
        }

        c = bytes[pos];
        if c != b'.' && c != b')' {
            return None;
        }

        pos += 1;

        if !isspace(bytes[pos]) {
            return None;
        }

        if interrupts_paragraph {
            let mut i = pos;
            while strings::is_space_or_tab(bytes[i]) {
                i += 1;
            }
            if strings::is_line_end_char(bytes[i]) {
                return None;
            }
        }

        return Some((
            pos - startpos,
            NodeList {
                list_type: ListType::Ordered,
                marker_offset: 0,
                padding: 0,
                start,
                delimiter: if c == b'.' {
                    ListDelimType::Period
                } else {
                    ListDelimType::Paren
                },
                bullet_char: 0,
                tight: false,
            },
        ));
    }

    None
}

fn lists_match(list_data: &NodeList, item_data: &NodeList) -> bool {
    list_data.list_type == item_data.list_type
        && list_data.delimiter == item_data.delimiter
        && list_data.bullet_char == item_data.bullet_char
}

fn determine_list_tight<'a>(node: &'a AstNode<'a>) -> bool {
    let mut ch = node.first_child();
    while let Some(item) = ch {
        if item.data.borrow().last_line_blank && item.next_sibling().is_some() {
            return false;
        }

        let mut subch = item.first_child();
        while let Some(subitem) = subch {
            if crate::nodes::ends_with_blank_line(subitem)
                && (item.next_sibling().is_some() || subitem.next_sibling().is_some())
            {
                return false;
            }
            subch = subitem.next_sibling();
        }

        ch = item.next_sibling();
    }
    true
}
