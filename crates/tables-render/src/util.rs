//! Unicode-aware text helpers shared by the fit and render stages.
//!
//! All widths are terminal display columns (CJK characters count as 2),
//! never bytes or chars.

use console::{measure_text_width, pad_str, Alignment};
use deunicode::deunicode;
use unicode_width::UnicodeWidthChar;

use crate::layout::Justify;

/// Display width of `s` in terminal columns, ignoring ANSI escapes.
pub fn display_width(s: &str) -> usize {
    measure_text_width(s)
}

/// Replaces control characters (newlines, tabs, escapes) with spaces so a
/// value always occupies exactly one physical line of its cell.
///
/// ```rust
/// use tables_render::util::flatten_controls;
///
/// assert_eq!(flatten_controls("a\nb\tc"), "a b c");
/// assert_eq!(flatten_controls("plain"), "plain");
/// ```
pub fn flatten_controls(s: &str) -> String {
    if !s.chars().any(char::is_control) {
        return s.to_string();
    }
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Keeps the start of `s`, dropping whatever does not fit in `max_width`.
///
/// ```rust
/// use tables_render::util::clip_end;
///
/// assert_eq!(clip_end("Hello World", 5), "Hello");
/// assert_eq!(clip_end("Hi", 5), "Hi");
/// ```
pub fn clip_end(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out
}

/// Keeps the end of `s`, dropping leading characters that do not fit.
///
/// ```rust
/// use tables_render::util::clip_start;
///
/// assert_eq!(clip_start("Hello World", 5), "World");
/// ```
pub fn clip_start(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    let mut kept: Vec<char> = Vec::new();
    let mut used = 0;
    for c in s.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        kept.push(c);
        used += w;
    }
    kept.into_iter().rev().collect()
}

/// Drops characters evenly from both ends. When the excess is odd the
/// extra column comes off the end.
///
/// ```rust
/// use tables_render::util::clip_center;
///
/// assert_eq!(clip_center("abcdefgh", 4), "cdef");
/// assert_eq!(clip_center("abcdefg", 4), "bcde");
/// ```
pub fn clip_center(s: &str, max_width: usize) -> String {
    let width = display_width(s);
    if width <= max_width {
        return s.to_string();
    }
    let drop_front = (width - max_width) / 2;
    let tail = clip_start(s, width - drop_front);
    clip_end(&tail, max_width)
}

/// Clips `s` to `max_width` from the side implied by the justification:
/// left-justified text loses its tail, right-justified its head, centered
/// text both ends.
pub fn clip(s: &str, max_width: usize, justify: Justify) -> String {
    match justify {
        Justify::Left => clip_end(s, max_width),
        Justify::Right => clip_start(s, max_width),
        Justify::Center => clip_center(s, max_width),
    }
}

/// Pads `s` with spaces to exactly `width` columns (no clipping).
///
/// ```rust
/// use tables_render::layout::Justify;
/// use tables_render::util::justify;
///
/// assert_eq!(justify("ab", 5, Justify::Left), "ab   ");
/// assert_eq!(justify("ab", 5, Justify::Right), "   ab");
/// assert_eq!(justify("ab", 5, Justify::Center), " ab  ");
/// ```
pub fn justify(s: &str, width: usize, justify: Justify) -> String {
    let align = match justify {
        Justify::Left => Alignment::Left,
        Justify::Right => Alignment::Right,
        Justify::Center => Alignment::Center,
    };
    pad_str(s, width, align, None).into_owned()
}

/// Inserts `,` thousands separators into the integer part of a decimal
/// numeral. Signs and fractional parts are preserved; anything that is not
/// a plain numeral is returned unchanged.
///
/// ```rust
/// use tables_render::util::group_thousands;
///
/// assert_eq!(group_thousands("1234567"), "1,234,567");
/// assert_eq!(group_thousands("-1234.50"), "-1,234.50");
/// assert_eq!(group_thousands("999"), "999");
/// ```
pub fn group_thousands(numeral: &str) -> String {
    let (sign, unsigned) = match numeral.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", numeral),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return numeral.to_string();
    }

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*d as char);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Derives a column key from a header: transliterated to ASCII, lowercased,
/// runs of non-alphanumerics collapsed to a single `_`.
///
/// ```rust
/// use tables_render::util::slugify;
///
/// assert_eq!(slugify("CPU Usage (%)"), "cpu_usage");
/// assert_eq!(slugify("Café"), "cafe");
/// ```
pub fn slugify(header: &str) -> String {
    let transliterated = deunicode(header).to_lowercase();
    let mut slug = String::with_capacity(transliterated.len());
    let mut pending_sep = false;
    for c in transliterated.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Greedy word wrap at `width` display columns. Words longer than the
/// width are split hard. Always returns at least one (possibly empty) line.
///
/// ```rust
/// use tables_render::util::word_wrap;
///
/// assert_eq!(word_wrap("hello world foo bar", 11), vec!["hello world", "foo bar"]);
/// assert_eq!(word_wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
/// ```
pub fn word_wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = display_width(word);

        if word_width > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut rest = word.to_string();
            while display_width(&rest) > width {
                let head = clip_end(&rest, width);
                // A single glyph wider than the column would never shrink.
                if head.is_empty() {
                    break;
                }
                rest = rest[head.len()..].to_string();
                lines.push(head);
            }
            current_width = display_width(&rest);
            current = rest;
            continue;
        }

        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
