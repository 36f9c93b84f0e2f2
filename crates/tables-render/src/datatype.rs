//! Per-datatype validation, formatting and summary rules.
//!
//! | Datatype | Accepts               | Displays            | Summaries                      |
//! |----------|-----------------------|---------------------|--------------------------------|
//! | `text`   | anything but `null`   | as-is, limited      | count, unique                  |
//! | `int`    | `-?\d+`               | raw                 | sum, min, max, avg, count, unique |
//! | `num`    | `-?\d+(\.\d+)?`       | thousands-grouped   | all                            |
//! | `float`  | `-?\d+(\.\d+)?`       | raw                 | all                            |
//! | `kcpu`   | `\d+m`                | `1,500m`            | all                            |
//! | `kmem`   | `\d+[KMG]`, `\d+[KMG]i` | `1,500M`          | all                            |
//!
//! Binary memory suffixes map 1:1 onto their decimal counterparts (`Mi` is
//! shown and summed as `M`). That keeps the display compact at the cost of
//! a ~5% error per power of 1024.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::layout::{Column, WrapMode};
use crate::pattern::apply_pattern;
use crate::summary::SummaryKind;
use crate::util::{clip_end, group_thousands};

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+$").expect("valid regex"));
static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid regex"));
static KCPU: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)m$").expect("valid regex"));
static KMEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)([KMG])i?$").expect("valid regex"));

const TEXT_SUMMARIES: &[SummaryKind] = &[SummaryKind::Count, SummaryKind::Unique];
const NUMERIC_SUMMARIES: &[SummaryKind] = &[
    SummaryKind::Sum,
    SummaryKind::Min,
    SummaryKind::Max,
    SummaryKind::Avg,
    SummaryKind::Count,
    SummaryKind::Unique,
];

/// The fixed set of column datatypes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Datatype {
    #[default]
    Text,
    Int,
    Num,
    Float,
    /// Kubernetes CPU quantity in millicores, e.g. `250m`.
    Kcpu,
    /// Kubernetes memory quantity, e.g. `512Mi` or `2G`.
    Kmem,
}

impl Datatype {
    /// Parses a datatype name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Datatype::Text),
            "int" => Some(Datatype::Int),
            "num" => Some(Datatype::Num),
            "float" => Some(Datatype::Float),
            "kcpu" => Some(Datatype::Kcpu),
            "kmem" => Some(Datatype::Kmem),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Datatype::Text => "text",
            Datatype::Int => "int",
            Datatype::Num => "num",
            Datatype::Float => "float",
            Datatype::Kcpu => "kcpu",
            Datatype::Kmem => "kmem",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Datatype::Text)
    }

    /// Summary kinds this datatype can aggregate.
    pub fn allowed_summaries(&self) -> &'static [SummaryKind] {
        match self {
            Datatype::Text => TEXT_SUMMARIES,
            _ => NUMERIC_SUMMARIES,
        }
    }

    pub fn allows(&self, summary: SummaryKind) -> bool {
        summary == SummaryKind::None || self.allowed_summaries().contains(&summary)
    }

    /// Returns the value if it matches this datatype's grammar, otherwise
    /// an empty string.
    ///
    /// ```rust
    /// use tables_render::Datatype;
    ///
    /// assert_eq!(Datatype::Kmem.validate("512Mi"), "512Mi");
    /// assert_eq!(Datatype::Kmem.validate("512MB"), "");
    /// assert_eq!(Datatype::Int.validate("1.5"), "");
    /// ```
    pub fn validate(&self, raw: &str) -> String {
        let valid = match self {
            Datatype::Text => raw != "null",
            Datatype::Int => INTEGER.is_match(raw),
            Datatype::Num | Datatype::Float => DECIMAL.is_match(raw),
            Datatype::Kcpu => KCPU.is_match(raw),
            Datatype::Kmem => KMEM.is_match(raw),
        };
        if valid {
            raw.to_string()
        } else {
            String::new()
        }
    }

    /// Numeric magnitude of a validated value in the unit summaries are
    /// computed in: plain numbers as-is, `kcpu` in millicores, `kmem` in
    /// megabytes. `None` for text and for values that do not validate.
    ///
    /// ```rust
    /// use tables_render::Datatype;
    ///
    /// assert_eq!(Datatype::Kmem.magnitude("2G"), Some(2000.0));
    /// assert_eq!(Datatype::Kmem.magnitude("500Ki"), Some(0.5));
    /// assert_eq!(Datatype::Kcpu.magnitude("250m"), Some(250.0));
    /// ```
    pub fn magnitude(&self, value: &str) -> Option<f64> {
        match self {
            Datatype::Int if INTEGER.is_match(value) => value.parse().ok(),
            Datatype::Num | Datatype::Float if DECIMAL.is_match(value) => value.parse().ok(),
            Datatype::Text | Datatype::Int | Datatype::Num | Datatype::Float => None,
            Datatype::Kcpu => {
                let caps = KCPU.captures(value)?;
                caps[1].parse().ok()
            }
            Datatype::Kmem => {
                let caps = KMEM.captures(value)?;
                let n: f64 = caps[1].parse().ok()?;
                let scale = match &caps[2] {
                    "K" => 0.001,
                    "G" => 1000.0,
                    _ => 1.0,
                };
                Some(n * scale)
            }
        }
    }

    /// Exact integer value of a validated `int` or `kcpu` value (millicores
    /// for `kcpu`). `None` for the other datatypes and for integers that do
    /// not fit an `i128`.
    ///
    /// ```rust
    /// use tables_render::Datatype;
    ///
    /// assert_eq!(Datatype::Int.integral("9007199254740993"), Some(9007199254740993));
    /// assert_eq!(Datatype::Kcpu.integral("250m"), Some(250));
    /// assert_eq!(Datatype::Float.integral("2"), None);
    /// ```
    pub fn integral(&self, value: &str) -> Option<i128> {
        match self {
            Datatype::Int if INTEGER.is_match(value) => value.parse().ok(),
            Datatype::Kcpu => {
                let caps = KCPU.captures(value)?;
                caps[1].parse().ok()
            }
            _ => None,
        }
    }

    /// True for datatypes whose sums are kept exact.
    pub fn is_integral(&self) -> bool {
        matches!(self, Datatype::Int | Datatype::Kcpu)
    }

    /// True when a validated value is numerically zero.
    pub fn is_zero(&self, value: &str) -> bool {
        self.magnitude(value) == Some(0.0)
    }

    /// Formats a validated, non-empty value for display.
    pub fn format(&self, value: &str, column: &Column) -> String {
        let pattern = column.format.as_deref();
        match self {
            Datatype::Text => {
                if column.string_limit > 0 && column.wrap_mode == WrapMode::Clip {
                    clip_end(value, column.string_limit)
                } else {
                    value.to_string()
                }
            }
            Datatype::Int | Datatype::Float => match pattern {
                Some(p) => apply_pattern(p, value),
                None => value.to_string(),
            },
            Datatype::Num => match pattern {
                Some(p) => apply_pattern(p, value),
                None => group_thousands(value),
            },
            Datatype::Kcpu => match KCPU.captures(value) {
                Some(caps) => format!("{}m", format_numeral(&caps[1], pattern)),
                None => value.to_string(),
            },
            Datatype::Kmem => match KMEM.captures(value) {
                Some(caps) => format!("{}{}", format_numeral(&caps[1], pattern), &caps[2]),
                None => value.to_string(),
            },
        }
    }

    /// Formats an exact `int` or `kcpu` sum for the summary row.
    pub fn format_total(&self, total: i128, pattern: Option<&str>) -> String {
        let n = total.to_string();
        match self {
            Datatype::Kcpu => format!("{}m", group_thousands(&n)),
            _ => match pattern {
                Some(p) => apply_pattern(p, &n),
                None => n,
            },
        }
    }

    /// Formats an aggregated magnitude (a `sum` or `avg`) for display in the
    /// summary row, in the datatype's summary unit.
    pub fn format_aggregate(&self, value: f64, kind: SummaryKind, pattern: Option<&str>) -> String {
        let averaged = kind == SummaryKind::Avg;
        match self {
            Datatype::Text => trim_float(value),
            Datatype::Int => {
                let n = rounded(value);
                match pattern {
                    Some(p) => apply_pattern(p, &n),
                    None => n,
                }
            }
            Datatype::Num => match pattern {
                Some(p) => apply_pattern(p, &trim_float(value)),
                None if averaged => group_thousands(&format!("{:.2}", value)),
                None => group_thousands(&trim_float(value)),
            },
            Datatype::Float => match pattern {
                Some(p) => apply_pattern(p, &trim_float(value)),
                None if averaged => format!("{:.2}", value),
                None => trim_float(value),
            },
            Datatype::Kcpu => format!("{}m", group_thousands(&rounded(value))),
            Datatype::Kmem => format!("{}M", group_thousands(&rounded(value))),
        }
    }
}

fn format_numeral(digits: &str, pattern: Option<&str>) -> String {
    match pattern {
        Some(p) => apply_pattern(p, digits),
        None => group_thousands(digits),
    }
}

fn rounded(value: f64) -> String {
    format!("{}", value.round() as i128)
}

/// Shortest decimal rendering of `value`, with float noise below 1e-10
/// removed so `0.1 + 0.2` shows as `0.3`.
fn trim_float(value: f64) -> String {
    let cleaned = (value * 1e10).round() / 1e10;
    if cleaned == 0.0 {
        return "0".to_string();
    }
    format!("{}", cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(datatype: Datatype) -> Column {
        Column::new("Value").datatype(datatype)
    }

    #[test]
    fn parse_names() {
        assert_eq!(Datatype::parse("KMEM"), Some(Datatype::Kmem));
        assert_eq!(Datatype::parse(" float "), Some(Datatype::Float));
        assert_eq!(Datatype::parse("bool"), None);
    }

    #[test]
    fn text_rejects_literal_null_only() {
        assert_eq!(Datatype::Text.validate("null"), "");
        assert_eq!(Datatype::Text.validate("anything"), "anything");
        assert_eq!(Datatype::Text.validate("0"), "0");
    }

    #[test]
    fn numeric_grammars() {
        assert_eq!(Datatype::Int.validate("-42"), "-42");
        assert_eq!(Datatype::Int.validate("4x"), "");
        assert_eq!(Datatype::Num.validate("3.25"), "3.25");
        assert_eq!(Datatype::Float.validate("3."), "");
        assert_eq!(Datatype::Kcpu.validate("500m"), "500m");
        assert_eq!(Datatype::Kcpu.validate("500"), "");
        assert_eq!(Datatype::Kmem.validate("2G"), "2G");
        assert_eq!(Datatype::Kmem.validate("2Gi"), "2Gi");
        assert_eq!(Datatype::Kmem.validate("2T"), "");
    }

    #[test]
    fn allowed_summaries_by_type() {
        assert!(Datatype::Text.allows(SummaryKind::Count));
        assert!(Datatype::Text.allows(SummaryKind::Unique));
        assert!(!Datatype::Text.allows(SummaryKind::Sum));
        assert!(Datatype::Kmem.allows(SummaryKind::Avg));
        assert!(Datatype::Text.allows(SummaryKind::None));
    }

    #[test]
    fn kmem_binary_suffix_is_one_to_one() {
        assert_eq!(Datatype::Kmem.magnitude("1Gi"), Datatype::Kmem.magnitude("1G"));
        assert_eq!(Datatype::Kmem.magnitude("500M"), Some(500.0));
    }

    #[test]
    fn zero_detection() {
        assert!(Datatype::Int.is_zero("0"));
        assert!(Datatype::Float.is_zero("0.0"));
        assert!(Datatype::Kcpu.is_zero("0m"));
        assert!(Datatype::Kmem.is_zero("0Mi"));
        assert!(!Datatype::Text.is_zero("0"));
        assert!(!Datatype::Int.is_zero("7"));
    }

    #[test]
    fn format_int_and_float_pass_through() {
        assert_eq!(Datatype::Int.format("1234567", &column(Datatype::Int)), "1234567");
        assert_eq!(Datatype::Float.format("1234.5", &column(Datatype::Float)), "1234.5");
    }

    #[test]
    fn format_pattern_overrides() {
        let col = column(Datatype::Float).format("%.2f");
        assert_eq!(Datatype::Float.format("3.14159", &col), "3.14");
        let col = column(Datatype::Num).format("%d");
        assert_eq!(Datatype::Num.format("1234.4", &col), "1234");
    }

    #[test]
    fn format_num_groups() {
        assert_eq!(Datatype::Num.format("1234567.5", &column(Datatype::Num)), "1,234,567.5");
    }

    #[test]
    fn format_units() {
        assert_eq!(Datatype::Kcpu.format("1500m", &column(Datatype::Kcpu)), "1,500m");
        assert_eq!(Datatype::Kmem.format("2048Mi", &column(Datatype::Kmem)), "2,048M");
        assert_eq!(Datatype::Kmem.format("4G", &column(Datatype::Kmem)), "4G");
    }

    #[test]
    fn format_text_string_limit() {
        let col = column(Datatype::Text).string_limit(4);
        assert_eq!(Datatype::Text.format("abcdefgh", &col), "abcd");
        let col = col.wrap_mode(WrapMode::Wrap);
        assert_eq!(Datatype::Text.format("abcdefgh", &col), "abcdefgh");
    }

    #[test]
    fn aggregates_in_summary_units() {
        assert_eq!(Datatype::Kmem.format_aggregate(2500.0, SummaryKind::Sum, None), "2,500M");
        assert_eq!(Datatype::Kcpu.format_aggregate(1500.0, SummaryKind::Sum, None), "1,500m");
        assert_eq!(Datatype::Int.format_aggregate(8.0, SummaryKind::Sum, None), "8");
        assert_eq!(Datatype::Num.format_aggregate(1234.5, SummaryKind::Sum, None), "1,234.5");
        assert_eq!(Datatype::Float.format_aggregate(0.1 + 0.2, SummaryKind::Sum, None), "0.3");
    }

    #[test]
    fn exact_totals() {
        assert_eq!(
            Datatype::Int.format_total(i64::MAX as i128 + 1, None),
            "9223372036854775808"
        );
        assert_eq!(Datatype::Kcpu.format_total(1_500, None), "1,500m");
        assert_eq!(Datatype::Int.format_total(42, Some("%05d")), "00042");
    }

    #[test]
    fn averages_round_per_type() {
        assert_eq!(Datatype::Int.format_aggregate(2.5, SummaryKind::Avg, None), "3");
        assert_eq!(Datatype::Num.format_aggregate(1234.5, SummaryKind::Avg, None), "1,234.50");
        assert_eq!(Datatype::Float.format_aggregate(1.0 / 3.0, SummaryKind::Avg, None), "0.33");
        assert_eq!(
            Datatype::Float.format_aggregate(2.0, SummaryKind::Avg, Some("%.1f")),
            "2.0"
        );
    }
}
