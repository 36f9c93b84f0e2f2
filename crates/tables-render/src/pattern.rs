//! printf-style format patterns for numeric columns.
//!
//! A column's `format` holds at most one conversion, optionally surrounded
//! by literal text: `"%.2f"`, `"%'d items"`, `"$%08.3f"`. Supported
//! conversions are `d i u f F e g s x` plus `%%`; supported flags are
//! `- + 0 ' space`. The `'` flag groups thousands with `,`.

use console::{pad_str, Alignment};

use crate::util::group_thousands;

/// A parsed format pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    prefix: String,
    spec: Option<Spec>,
    suffix: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Spec {
    left_align: bool,
    plus: bool,
    space: bool,
    zero_pad: bool,
    group: bool,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

impl Pattern {
    /// Parses a pattern. Text after the first conversion is literal, so
    /// `"%d of %d"` formats only the first placeholder.
    pub fn parse(pattern: &str) -> Self {
        let mut prefix = String::new();
        let mut chars = pattern.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            if c != '%' {
                prefix.push(c);
                continue;
            }
            if let Some(&(_, '%')) = chars.peek() {
                chars.next();
                prefix.push('%');
                continue;
            }
            if let Some((spec, consumed)) = Spec::parse(&pattern[idx + 1..]) {
                let rest = &pattern[idx + 1 + consumed..];
                return Pattern {
                    prefix,
                    spec: Some(spec),
                    suffix: rest.replace("%%", "%"),
                };
            }
            prefix.push('%');
        }

        Pattern {
            prefix,
            spec: None,
            suffix: String::new(),
        }
    }

    /// Formats `value` through the pattern. A numeric conversion applied to
    /// something that does not parse as a number returns `value` unchanged.
    pub fn apply(&self, value: &str) -> String {
        let Some(spec) = &self.spec else {
            return format!("{}{}", self.prefix, self.suffix);
        };
        match spec.render(value) {
            Some(body) => format!("{}{}{}", self.prefix, body, self.suffix),
            None => value.to_string(),
        }
    }
}

/// Convenience wrapper around [`Pattern::parse`] + [`Pattern::apply`].
///
/// ```rust
/// use tables_render::pattern::apply_pattern;
///
/// assert_eq!(apply_pattern("%.2f", "3.14159"), "3.14");
/// assert_eq!(apply_pattern("%'d", "1234567"), "1,234,567");
/// assert_eq!(apply_pattern("%5d|", "42"), "   42|");
/// assert_eq!(apply_pattern("%.1f", "n/a"), "n/a");
/// ```
pub fn apply_pattern(pattern: &str, value: &str) -> String {
    Pattern::parse(pattern).apply(value)
}

impl Spec {
    /// Parses the text after a `%`. Returns the conversion and the number of
    /// bytes consumed, or `None` when no valid conversion follows.
    fn parse(s: &str) -> Option<(Spec, usize)> {
        let bytes = s.as_bytes();
        let mut i = 0;
        let mut spec = Spec {
            left_align: false,
            plus: false,
            space: false,
            zero_pad: false,
            group: false,
            width: 0,
            precision: None,
            conversion: 'd',
        };

        while i < bytes.len() {
            match bytes[i] {
                b'-' => spec.left_align = true,
                b'+' => spec.plus = true,
                b' ' => spec.space = true,
                b'0' => spec.zero_pad = true,
                b'\'' => spec.group = true,
                _ => break,
            }
            i += 1;
        }

        let width_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i > width_start {
            spec.width = s[width_start..i].parse().ok()?;
        }

        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            let precision_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            spec.precision = Some(s[precision_start..i].parse().unwrap_or(0));
        }

        // Length modifiers carry no meaning here.
        while i < bytes.len() && matches!(bytes[i], b'l' | b'h' | b'q' | b'j' | b'z') {
            i += 1;
        }

        let conversion = *bytes.get(i)? as char;
        if !matches!(conversion, 'd' | 'i' | 'u' | 'f' | 'F' | 'e' | 'g' | 's' | 'x') {
            return None;
        }
        spec.conversion = conversion;
        Some((spec, i + 1))
    }

    fn render(&self, value: &str) -> Option<String> {
        let body = match self.conversion {
            's' => {
                let text = match self.precision {
                    Some(p) => value.chars().take(p).collect(),
                    None => value.to_string(),
                };
                return Some(self.pad(text));
            }
            'd' | 'i' | 'u' => {
                // Integers stay exact; anything else is rounded.
                let (negative, digits) = match value.trim().parse::<i128>() {
                    Ok(n) => (n < 0, n.unsigned_abs().to_string()),
                    Err(_) => {
                        let n = value.trim().parse::<f64>().ok()?;
                        (n < 0.0 && n.round() != 0.0, format!("{}", n.abs().round() as u128))
                    }
                };
                let digits = if self.group {
                    group_thousands(&digits)
                } else {
                    digits
                };
                self.signed(negative, digits)
            }
            'x' => {
                let n = value.trim().parse::<f64>().ok()?;
                self.signed(n < 0.0, format!("{:x}", n.abs().round() as u128))
            }
            'f' | 'F' => {
                let n = value.trim().parse::<f64>().ok()?;
                let digits = format!("{:.*}", self.precision.unwrap_or(6), n.abs());
                let digits = if self.group {
                    group_thousands(&digits)
                } else {
                    digits
                };
                self.signed(n.is_sign_negative() && n != 0.0, digits)
            }
            'e' => {
                let n = value.trim().parse::<f64>().ok()?;
                let digits = c_exponent(&format!("{:.*e}", self.precision.unwrap_or(6), n.abs()));
                self.signed(n < 0.0, digits)
            }
            'g' => {
                let n = value.trim().parse::<f64>().ok()?;
                self.signed(n < 0.0, format!("{}", n.abs()))
            }
            _ => return None,
        };
        Some(body)
    }

    fn signed(&self, negative: bool, digits: String) -> String {
        let sign = if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        };
        if self.zero_pad && !self.left_align {
            let fill = self.width.saturating_sub(sign.len() + digits.len());
            return format!("{}{}{}", sign, "0".repeat(fill), digits);
        }
        self.pad(format!("{}{}", sign, digits))
    }

    fn pad(&self, text: String) -> String {
        let align = if self.left_align {
            Alignment::Left
        } else {
            Alignment::Right
        };
        pad_str(&text, self.width, align, None).into_owned()
    }
}

/// Rust prints `1.5e3`; C prints `1.5e+03`.
fn c_exponent(rust: &str) -> String {
    match rust.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => rust.to_string(),
    }
}
