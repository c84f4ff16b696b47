use crate::ctype::isspace;

pub fn is_line_end_char(ch: u8) -> bool {
    matches!(ch, 10 | 13)
}

pub fn is_space_or_tab(ch: u8) -> bool {
    matches!(ch, 9 | 32)
}

pub fn rtrim(line: &mut String) {
    let spaces = line.bytes().rev().take_while(|&b| isspace(b)).count();
    let new_len = line.len() - spaces;
    line.truncate(new_len);
}

/// Drops everything up to and including the first line ending. Used to peel
/// the fence line's remainder off accumulated fenced-block content.
pub fn remove_first_line(content: &mut String) {
    let pos = match content.bytes().position(is_line_end_char) {
        Some(pos) => pos,
        None => {
            content.clear();
            return;
        }
    };
    let mut end = pos + 1;
    if content.as_bytes()[pos] == b'\r' && content.as_bytes().get(end) == Some(&b'\n') {
        end += 1;
    }
    content.drain(..end);
}

/// Strips one trailing line ending, if present.
pub fn remove_trailing_line_end(content: &mut String) {
    if content.ends_with('\n') {
        content.pop();
    }
    if content.ends_with('\r') {
        content.pop();
    }
}

pub fn normalize_code(s: &str) -> String {
    let mut r = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    let mut contains_nonspace = false;

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    r.push(' ');
                }
            }
            '\n' => r.push(' '),
            c => r.push(c),
        }
        if c != ' ' && c != '\r' && c != '\n' {
            contains_nonspace = true;
        }
    }

    if contains_nonspace && r.len() >= 2 && r.starts_with(' ') && r.ends_with(' ') {
        r.pop();
        r.remove(0);
    }

    r
}

#[cfg(test)]
pub mod tests {
    use super::{normalize_code, remove_first_line};

    #[test]
    fn normalize_code_handles_lone_newline() {
        assert_eq!(normalize_code("\n"), " ");
    }

    #[test]
    fn normalize_code_handles_lone_space() {
        assert_eq!(normalize_code(" "), " ");
    }

    #[test]
    fn normalize_code_trims_one_space_from_each_end() {
        assert_eq!(normalize_code(" $x$ "), "$x$");
        assert_eq!(normalize_code("  x  "), " x ");
    }

    #[test]
    fn remove_first_line_eats_the_line_end() {
        let mut s = "info\nbody\n".to_string();
        remove_first_line(&mut s);
        assert_eq!(s, "body\n");

        let mut s = "no line end".to_string();
        remove_first_line(&mut s);
        assert_eq!(s, "");
    }
}
