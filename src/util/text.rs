use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended to truncated text.
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns.
///
/// CJK characters and most emoji take two columns, combining marks none.
///
/// ```
/// use appshelf::util::display_width;
///
/// assert_eq!(display_width("tools"), 5);
/// assert_eq!(display_width("工具"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncates a string to fit within `max_width` columns, appending "..."
/// when text was cut.
///
/// Widths too narrow for a character plus ellipsis (0-3) return as many
/// characters as fit, without an ellipsis. Returns `Cow::Borrowed` when the
/// string already fits.
///
/// ```
/// use appshelf::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("生产力工具", 7), "生产...");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width <= ELLIPSIS_WIDTH {
        max_width
    } else {
        max_width - ELLIPSIS_WIDTH
    };

    let mut used = 0;
    let mut cut = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        cut = idx + c.len_utf8();
    }

    if max_width <= ELLIPSIS_WIDTH {
        Cow::Owned(s[..cut].to_string())
    } else {
        Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
    }
}

/// Truncates, then right-pads with spaces to exactly `width` columns.
///
/// A wide character that would straddle the boundary is dropped, and the
/// gap filled with a space, so columns stay aligned in tables.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let fitted = truncate_to_width(s, width);
    let used = display_width(&fitted);
    let mut out = String::with_capacity(fitted.len() + width.saturating_sub(used));
    out.push_str(&fitted);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

/// Strip terminal control characters and ANSI escape sequences.
///
/// App names and descriptions come from imported files, so they are cleaned
/// before printing. Tab and newline survive; CSI (`ESC [ ... final`) and OSC
/// (`ESC ] ... BEL | ESC \`) sequences are removed whole.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    fn is_control(c: char) -> bool {
        c.is_control() && c != '\t' && c != '\n'
    }

    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_control(c) {
                out.push(c);
            }
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}
