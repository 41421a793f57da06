use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to `width` display columns, ending in ".." when cut.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s
            .chars()
            .next()
            .filter(|ch| ch.width().unwrap_or(0) <= width)
            .map(String::from)
            .unwrap_or_default();
    }

    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

/// Collapse line breaks so a multi-line value fits on one list row.
pub(crate) fn single_line(s: &str) -> String {
    s.split(['\r', '\n']).filter(|p| !p.is_empty()).collect::<Vec<_>>().join(" ")
}
