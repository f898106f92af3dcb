//! Width-aware word wrapping for canvas text.
//!
//! Widths are measured in terminal columns, so CJK text (two columns per
//! glyph) wraps at the same visual edge as ASCII.

use std::ops::Range;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Columns occupied by one char. Zero-width chars still take a cell since
/// the canvas stores one char per cell.
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0).max(1)
}

pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Wrap a single logical line (no `\n`) starting at char offset `offset`,
/// pushing one char range per visual row.
///
/// Wrapping happens at spaces; the space at the break point is consumed so
/// the next row never starts with a leading space. When no space exists
/// within the available width the line is hard-broken. A `width` of 0
/// disables wrapping. Empty lines produce a single empty row.
fn line_spans(chars: &[char], offset: usize, width: usize, out: &mut Vec<Range<usize>>) {
    if chars.is_empty() || width == 0 {
        out.push(offset..offset + chars.len());
        return;
    }

    let mut pos = 0usize;
    while pos < chars.len() {
        let mut used = 0usize;
        let mut end = pos;
        while end < chars.len() {
            let cw = char_width(chars[end]);
            if used + cw > width {
                break;
            }
            used += cw;
            end += 1;
        }
        // A glyph wider than the whole row still has to go somewhere.
        if end == pos {
            end = pos + 1;
        }
        if end >= chars.len() {
            out.push(offset + pos..offset + chars.len());
            return;
        }

        let (row_end, advance) = if chars[end] == ' ' {
            (end, end + 1)
        } else {
            match chars[pos..end].iter().rposition(|&c| c == ' ') {
                Some(sp) if sp > 0 => (pos + sp, pos + sp + 1),
                _ => (end, end),
            }
        };
        out.push(offset + pos..offset + row_end);
        pos = advance;

        while pos < chars.len() && chars[pos] == ' ' {
            pos += 1;
        }
    }
}

/// Char ranges of every visual row of `text`. Each `\n` starts a new row.
pub fn wrap_spans(text: &str, width: usize) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut offset = 0usize;
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        line_spans(&chars, offset, width, &mut spans);
        offset += chars.len() + 1;
    }
    spans
}

/// Wrap `text` to `width` columns, one `String` per visual row.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    wrap_spans(text, width)
        .into_iter()
        .map(|span| chars[span].iter().collect())
        .collect()
}

/// Number of visual rows `text` occupies at `width` columns.
pub fn row_count(text: &str, width: usize) -> usize {
    wrap_spans(text, width).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_line_is_untouched() {
        assert_eq!(wrap_text("hello", 10), vec!["hello"]);
    }

    #[test]
    fn breaks_at_last_space_and_drops_it() {
        assert_eq!(wrap_text("hello big world", 10), vec!["hello big", "world"]);
    }

    #[test]
    fn break_exactly_on_space() {
        assert_eq!(wrap_text("abcde fgh", 5), vec!["abcde", "fgh"]);
    }

    #[test]
    fn hard_breaks_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn wide_glyphs_count_two_columns() {
        assert_eq!(wrap_text("你好世界", 5), vec!["你好", "世界"]);
        assert_eq!(display_width("你好"), 4);
    }

    #[test]
    fn zero_width_disables_wrapping() {
        assert_eq!(wrap_text("a b c d", 0), vec!["a b c d"]);
    }

    #[test]
    fn newlines_start_new_rows() {
        assert_eq!(wrap_text("ab\n\ncd", 10), vec!["ab", "", "cd"]);
        assert_eq!(row_count("ab\n\ncd", 10), 3);
    }

    #[test]
    fn spans_index_into_the_whole_text() {
        assert_eq!(wrap_spans("ab cd\nef", 2), vec![0..2, 3..5, 6..8]);
    }

    #[test]
    fn empty_text_is_one_empty_row() {
        assert_eq!(wrap_text("", 4), vec![""]);
    }
}
