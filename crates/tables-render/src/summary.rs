//! Summary row aggregation.
//!
//! Each column owns one [`Accumulator`]. It sees every row exactly once
//! during the fit stage and is finalized into the single string shown in
//! the summary row.

use std::collections::HashSet;

use crate::datatype::Datatype;
use crate::layout::Column;

/// Aggregate shown for a column in the summary row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SummaryKind {
    #[default]
    None,
    Sum,
    Min,
    Max,
    Avg,
    Count,
    Unique,
}

impl SummaryKind {
    /// Parses a summary name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(SummaryKind::None),
            "sum" => Some(SummaryKind::Sum),
            "min" => Some(SummaryKind::Min),
            "max" => Some(SummaryKind::Max),
            "avg" => Some(SummaryKind::Avg),
            "count" => Some(SummaryKind::Count),
            "unique" => Some(SummaryKind::Unique),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SummaryKind::None => "none",
            SummaryKind::Sum => "sum",
            SummaryKind::Min => "min",
            SummaryKind::Max => "max",
            SummaryKind::Avg => "avg",
            SummaryKind::Count => "count",
            SummaryKind::Unique => "unique",
        }
    }
}

/// Running aggregates for one column.
#[derive(Clone, Debug, Default)]
pub struct Accumulator {
    /// Sum of numeric magnitudes, in the datatype's summary unit.
    sum: f64,
    /// Exact sum for integral datatypes, `None` once a value or the total
    /// no longer fits.
    exact_sum: Option<i128>,
    /// Cells that were non-null and valid.
    count: usize,
    /// Cells that produced a numeric magnitude (the `avg` divisor).
    numeric_count: usize,
    min: Option<(f64, String)>,
    max: Option<(f64, String)>,
    unique: HashSet<String>,
}

impl Accumulator {
    pub fn new() -> Self {
        Accumulator {
            exact_sum: Some(0),
            ..Self::default()
        }
    }

    /// Records one cell. `raw` is `None` for null or missing cells;
    /// `validated` is the datatype's validation result (empty if invalid).
    pub fn observe(&mut self, datatype: Datatype, raw: Option<&str>, validated: &str) {
        let Some(raw) = raw else {
            return;
        };
        self.unique.insert(raw.to_string());

        if validated.is_empty() {
            return;
        }
        self.count += 1;

        let Some(magnitude) = datatype.magnitude(validated) else {
            return;
        };
        self.sum += magnitude;
        self.numeric_count += 1;
        if datatype.is_integral() {
            self.exact_sum = self
                .exact_sum
                .zip(datatype.integral(validated))
                .and_then(|(total, n)| total.checked_add(n));
        }

        if self.min.as_ref().map_or(true, |(m, _)| magnitude < *m) {
            self.min = Some((magnitude, validated.to_string()));
        }
        if self.max.as_ref().map_or(true, |(m, _)| magnitude > *m) {
            self.max = Some((magnitude, validated.to_string()));
        }
    }

    /// Mean of the numeric cells, if there were any.
    pub fn average(&self) -> Option<f64> {
        (self.numeric_count > 0).then(|| self.sum / self.numeric_count as f64)
    }

    /// Produces the display string for the column's summary kind. Empty
    /// when the kind is `none` or there was nothing to aggregate.
    pub fn finalize(&self, column: &Column) -> String {
        let datatype = column.datatype;
        let pattern = column.format.as_deref();
        match column.summary {
            SummaryKind::None => String::new(),
            SummaryKind::Count => self.count.to_string(),
            SummaryKind::Unique => self.unique.len().to_string(),
            SummaryKind::Sum => {
                if self.numeric_count == 0 {
                    return String::new();
                }
                match self.exact_sum {
                    Some(total) if datatype.is_integral() => datatype.format_total(total, pattern),
                    _ => datatype.format_aggregate(self.sum, SummaryKind::Sum, pattern),
                }
            }
            SummaryKind::Avg => match self.average() {
                Some(avg) => datatype.format_aggregate(avg, SummaryKind::Avg, pattern),
                None => String::new(),
            },
            SummaryKind::Min => self
                .min
                .as_ref()
                .map(|(_, raw)| datatype.format(raw, column))
                .unwrap_or_default(),
            SummaryKind::Max => self
                .max
                .as_ref()
                .map(|(_, raw)| datatype.format(raw, column))
                .unwrap_or_default(),
        }
    }
}
