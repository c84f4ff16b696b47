use std::cell::RefCell;

use typed_arena::Arena;

use crate::arena_tree::Node;
use crate::ctype::ispunct;
use crate::nodes::{Ast, AstNode, NodeCode, NodeValue};
use crate::parser::math::NodeMath;
use crate::parser::Options;
use crate::scanners;
use crate::strings;

pub struct Subject<'a, 'o> {
    arena: &'a Arena<AstNode<'a>>,
    options: &'o Options,
    input: String,
    line: usize,
    pub pos: usize,
    special_chars: [bool; 256],
}

impl<'a, 'o> Subject<'a, 'o> {
    pub fn new(
        arena: &'a Arena<AstNode<'a>>,
        options: &'o Options,
        input: String,
        line: usize,
    ) -> Self {
        let mut special_chars = [false; 256];
        for &c in &[b'\r', b'\n', b'\\', b'`', b'$'] {
            special_chars[c as usize] = true;
        }
        Subject {
            arena,
            options,
            input,
            line,
            pos: 0,
            special_chars,
        }
    }

    /// Parses the next inline out of the subject and appends it to `node`.
    /// Returns false once the subject is exhausted.
    pub fn parse_inline(&mut self, node: &'a AstNode<'a>) -> bool {
        let c = match self.peek_char() {
            None => return false,
            Some(&c) => c,
        };

        let new_inl = match c {
            b'\r' | b'\n' => self.handle_newline(),
            b'`' => self.handle_backticks(),
            b'\\' => self.handle_backslash(),
            b'$' => self.handle_dollars(),
            _ => {
                let endpos = self.find_special_char();
                let mut contents = self.input[self.pos..endpos].to_string();
                self.pos = endpos;

                if self
                    .peek_char()
                    .map_or(false, |&c| strings::is_line_end_char(c))
                {
                    strings::rtrim(&mut contents);
                }

                self.make_inline(NodeValue::Text(contents))
            }
        };

        node.append(new_inl);
        true
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek_char(&self) -> Option<&u8> {
        self.input.as_bytes().get(self.pos)
    }

    fn find_special_char(&self) -> usize {
        for n in self.pos..self.input.len() {
            if self.special_chars[self.input.as_bytes()[n] as usize] {
                return n;
            }
        }
        self.input.len()
    }

    fn take_while(&mut self, c: u8) -> usize {
        let start_pos = self.pos;
        while self.peek_char() == Some(&c) {
            self.pos += 1;
        }
        self.pos - start_pos
    }

    fn skip_spaces(&mut self) -> bool {
        let mut skipped = false;
        while self
            .peek_char()
            .map_or(false, |&c| c == b' ' || c == b'\t')
        {
            self.pos += 1;
            skipped = true;
        }
        skipped
    }

    fn skip_line_end(&mut self) -> bool {
        let old_pos = self.pos;
        if self.peek_char() == Some(&b'\r') {
            self.pos += 1;
        }
        if self.peek_char() == Some(&b'\n') {
            self.pos += 1;
        }
        self.pos > old_pos
    }

    fn handle_newline(&mut self) -> &'a AstNode<'a> {
        let nlpos = self.pos;
        let bytes = self.input.as_bytes();
        let hardbreak = nlpos > 1 && bytes[nlpos - 1] == b' ' && bytes[nlpos - 2] == b' ';
        self.skip_line_end();
        let inl = if hardbreak {
            self.make_inline(NodeValue::LineBreak)
        } else {
            self.make_inline(NodeValue::SoftBreak)
        };
        self.skip_spaces();
        inl
    }

    fn handle_backslash(&mut self) -> &'a AstNode<'a> {
        self.pos += 1;
        if self.peek_char().map_or(false, |&c| ispunct(c)) {
            self.pos += 1;
            let contents = self.input[self.pos - 1..self.pos].to_string();
            self.make_inline(NodeValue::Text(contents))
        } else if !self.eof() && self.skip_line_end() {
            let inl = self.make_inline(NodeValue::LineBreak);
            self.skip_spaces();
            inl
        } else {
            self.make_inline(NodeValue::Text("\\".to_string()))
        }
    }

    fn handle_backticks(&mut self) -> &'a AstNode<'a> {
        let startpos = self.pos;
        let openticks = self.take_while(b'`');

        match self.scan_to_closing_backticks(openticks) {
            None => {
                self.pos = startpos + openticks;
                self.make_inline(NodeValue::Text("`".repeat(openticks)))
            }
            Some(endpos) => {
                let literal =
                    strings::normalize_code(&self.input[startpos + openticks..endpos - openticks]);
                self.make_inline(NodeValue::Code(NodeCode {
                    num_backticks: openticks,
                    literal,
                }))
            }
        }
    }

    fn scan_to_closing_backticks(&mut self, openticks: usize) -> Option<usize> {
        loop {
            while self.peek_char().map_or(false, |&c| c != b'`') {
                self.pos += 1;
            }
            if self.eof() {
                return None;
            }
            let numticks = self.take_while(b'`');
            if numticks == openticks {
                return Some(self.pos);
            }
        }
    }

    /// `$` opens inline math; `$$` (or longer) opens a one-line display
    /// span. Either way the value is taken verbatim. An unclosed opener
    /// falls back to literal text and scanning resumes right after it.
    fn handle_dollars(&mut self) -> &'a AstNode<'a> {
        let startpos = self.pos;
        let opendollars = self.take_while(b'$');

        if !self.options.extension.math_dollars {
            return self.make_inline(NodeValue::Text("$".repeat(opendollars)));
        }

        let scanned = if opendollars == 1 {
            self.scan_to_closing_dollar()
        } else {
            self.scan_to_closing_display_dollars()
        };

        match scanned {
            Some(content_end) => {
                let literal = self.input[startpos + opendollars..content_end].to_string();
                if opendollars == 1 {
                    self.make_inline(NodeValue::InlineMath(literal))
                } else {
                    self.make_inline(NodeValue::Math(NodeMath {
                        fence_length: opendollars,
                        fence_offset: 0,
                        literal,
                    }))
                }
            }
            None => {
                self.pos = startpos + opendollars;
                self.make_inline(NodeValue::Text("$".repeat(opendollars)))
            }
        }
    }

    /// The closer for `$` is the next live dollar run of length exactly one.
    /// The scan crosses line breaks and skips over completed code spans,
    /// whose dollars are claimed.
    fn scan_to_closing_dollar(&mut self) -> Option<usize> {
        loop {
            while self
                .peek_char()
                .map_or(false, |&c| c != b'$' && c != b'`')
            {
                self.pos += 1;
            }
            match self.peek_char() {
                None => return None,
                Some(&b'`') => {
                    let openticks = self.take_while(b'`');
                    self.skip_claimed_code_span(openticks);
                }
                Some(_) => {
                    if !scanners::is_live_dollar(self.input.as_bytes(), self.pos) {
                        self.pos += 1;
                        continue;
                    }
                    let numdollars = self.take_while(b'$');
                    if numdollars == 1 {
                        return Some(self.pos - 1);
                    }
                }
            }
        }
    }

    /// The closer for `$$` is the next live dollar run of length two or more
    /// on the same line; the whole closing run is consumed.
    fn scan_to_closing_display_dollars(&mut self) -> Option<usize> {
        loop {
            while self.peek_char().map_or(false, |&c| {
                c != b'$' && c != b'`' && !strings::is_line_end_char(c)
            }) {
                self.pos += 1;
            }
            match self.peek_char() {
                None => return None,
                Some(&c) if strings::is_line_end_char(c) => return None,
                Some(&b'`') => {
                    let openticks = self.take_while(b'`');
                    self.skip_claimed_code_span(openticks);
                }
                Some(_) => {
                    if !scanners::is_live_dollar(self.input.as_bytes(), self.pos) {
                        self.pos += 1;
                        continue;
                    }
                    let numdollars = self.take_while(b'$');
                    if numdollars >= 2 {
                        return Some(self.pos - numdollars);
                    }
                }
            }
        }
    }

    /// Having consumed an opening backtick run, skips past the matching
    /// closer if the code span completes. Otherwise resumes right after the
    /// opening run, which then claims nothing.
    fn skip_claimed_code_span(&mut self, openticks: usize) {
        let resume = self.pos;
        loop {
            while self.peek_char().map_or(false, |&c| c != b'`') {
                self.pos += 1;
            }
            if self.eof() {
                self.pos = resume;
                return;
            }
            let numticks = self.take_while(b'`');
            if numticks == openticks {
                return;
            }
        }
    }

    fn make_inline(&self, value: NodeValue) -> &'a AstNode<'a> {
        let mut ast = Ast::new(value, self.line);
        ast.open = false;
        self.arena.alloc(Node::new(RefCell::new(ast)))
    }
}
