//! Hand-written scanners for the delimiter grammar. Each takes a slice
//! positioned where the construct may begin and answers without consuming.

use crate::strings::{is_line_end_char, is_space_or_tab};

/// A `$` is a live delimiter when the run of backslashes immediately before
/// it has even length. `\$` is escaped; `\\$` is a literal backslash followed
/// by a live dollar.
pub fn is_live_dollar(bytes: &[u8], pos: usize) -> bool {
    let mut backslashes = 0;
    while backslashes < pos && bytes[pos - backslashes - 1] == b'\\' {
        backslashes += 1;
    }
    backslashes % 2 == 0
}

/// Length of the maximal `$` run starting at `pos`.
pub fn dollar_run_length(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos;
    while i < bytes.len() && bytes[i] == b'$' {
        i += 1;
    }
    i - pos
}

/// Opening math fence: a leading `$` run of length >= 2. Declines when the
/// rest of the line holds another live run of length >= 2, since that makes
/// the line a one-line display span for the inline pass instead.
pub fn open_math_fence(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let len = dollar_run_length(bytes, 0);
    if len < 2 {
        return None;
    }
    let mut i = len;
    while i < bytes.len() && !is_line_end_char(bytes[i]) {
        if bytes[i] == b'$' && is_live_dollar(bytes, i) && dollar_run_length(bytes, i) >= 2 {
            return None;
        }
        i += 1;
    }
    Some(len)
}

/// Closing math fence: a leading `$` run of length >= 2. Anything after the
/// run is ignored, so the caller only needs the run length.
pub fn close_math_fence(line: &str) -> Option<usize> {
    let len = dollar_run_length(line.as_bytes(), 0);
    if len < 2 {
        return None;
    }
    Some(len)
}

/// Opening code fence: three or more backticks or tildes. The info string of
/// a backtick fence may not contain a backtick.
pub fn open_code_fence(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let c = match bytes.first() {
        Some(&c @ b'`') | Some(&c @ b'~') => c,
        _ => return None,
    };
    let mut i = 0;
    while i < bytes.len() && bytes[i] == c {
        i += 1;
    }
    if i < 3 {
        return None;
    }
    if c == b'`' {
        for &b in &bytes[i..] {
            if is_line_end_char(b) {
                break;
            }
            if b == b'`' {
                return None;
            }
        }
    }
    Some(i)
}

/// Closing code fence: a run of the fence character followed by nothing but
/// whitespace. The caller checks the character and minimum length.
pub fn close_code_fence(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let c = match bytes.first() {
        Some(&c @ b'`') | Some(&c @ b'~') => c,
        _ => return None,
    };
    let mut i = 0;
    while i < bytes.len() && bytes[i] == c {
        i += 1;
    }
    if i < 3 {
        return None;
    }
    if bytes[i..]
        .iter()
        .all(|&b| is_space_or_tab(b) || is_line_end_char(b))
    {
        Some(i)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_dollar_counts_preceding_backslashes() {
        assert!(is_live_dollar(b"$x$", 0));
        assert!(is_live_dollar(b"a$", 1));
        assert!(!is_live_dollar(b"\\$", 1));
        assert!(is_live_dollar(b"\\\\$", 2));
        assert!(!is_live_dollar(b"\\\\\\$", 3));
    }

    #[test]
    fn dollar_runs() {
        assert_eq!(dollar_run_length(b"$$$x", 0), 3);
        assert_eq!(dollar_run_length(b"x$$", 1), 2);
        assert_eq!(dollar_run_length(b"x", 0), 0);
    }

    #[test]
    fn math_fence_opens_on_a_bare_run() {
        assert_eq!(open_math_fence("$$\n"), Some(2));
        assert_eq!(open_math_fence("$$$\n"), Some(3));
        assert_eq!(open_math_fence("$$  trailing junk\n"), Some(2));
        assert_eq!(open_math_fence("$\n"), None);
    }

    #[test]
    fn math_fence_declines_one_line_spans() {
        assert_eq!(open_math_fence("$$x$$\n"), None);
        assert_eq!(open_math_fence("$$20,000 and $$30,000\n"), None);
        // An escaped second run is not live.
        assert_eq!(open_math_fence("$$ cost: \\$$\n"), Some(2));
    }

    #[test]
    fn math_fence_closes_with_trailing_content() {
        assert_eq!(close_math_fence("$$\n"), Some(2));
        assert_eq!(close_math_fence("$$  be ignored\n"), Some(2));
        assert_eq!(close_math_fence("$ x\n"), None);
    }

    #[test]
    fn code_fences() {
        assert_eq!(open_code_fence("```rust\n"), Some(3));
        assert_eq!(open_code_fence("~~~~\n"), Some(4));
        assert_eq!(open_code_fence("``x\n"), None);
        assert_eq!(close_code_fence("```\n"), Some(3));
        assert_eq!(close_code_fence("``` x\n"), None);
    }
}
