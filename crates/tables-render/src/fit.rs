//! Layout fitting: display strings, column widths, row heights and
//! summaries.
//!
//! [`TableContext::fit`] walks every row once. For each cell it derives the
//! display string (validate, apply the null/zero policy, format), splits it
//! into wrap segments, feeds the column's summary accumulator, and grows
//! auto-sized columns to fit. Widths only ever grow. Explicit widths are
//! never touched by content; the render stage clips to them instead.

use crate::data::Row;
use crate::layout::{Column, Layout, WrapMode};
use crate::summary::Accumulator;
use crate::util::{display_width, flatten_controls, word_wrap};

/// Everything the render stage needs, computed fresh for one table.
#[derive(Clone, Debug)]
pub struct TableContext<'a> {
    pub layout: &'a Layout,
    pub rows: &'a [Row],
    /// Final width of every column (including padding), visible or not.
    pub widths: Vec<usize>,
    /// Wrap segments per row, per column.
    cells: Vec<Vec<Vec<String>>>,
    /// Physical line count of each row.
    pub row_heights: Vec<usize>,
    /// Finalized summary string per column (empty for `none`).
    pub summaries: Vec<String>,
}

impl<'a> TableContext<'a> {
    /// Computes widths, wrap segments and summaries for `rows`, which are
    /// expected to be sorted already.
    pub fn fit(layout: &'a Layout, rows: &'a [Row]) -> Self {
        let columns = &layout.columns;
        let explicit: Vec<bool> = columns.iter().map(Column::has_explicit_width).collect();
        let mut widths: Vec<usize> = columns.iter().map(initial_width).collect();
        let mut accumulators: Vec<Accumulator> = columns.iter().map(|_| Accumulator::new()).collect();
        let mut cells = Vec::with_capacity(rows.len());
        let mut row_heights = Vec::with_capacity(rows.len());

        for row in rows {
            let mut row_cells = Vec::with_capacity(columns.len());
            let mut height = 1;
            for (i, column) in columns.iter().enumerate() {
                let raw = row.raw(&column.key);
                let validated = raw
                    .as_deref()
                    .map(|r| column.datatype.validate(r))
                    .unwrap_or_default();
                accumulators[i].observe(column.datatype, raw.as_deref(), &validated);

                let display = display_string(column, raw.as_deref(), &validated);
                let segments = wrap_segments(column, &display);

                if column.visible {
                    if !explicit[i] {
                        let widest = segments.iter().map(|s| display_width(s)).max().unwrap_or(0);
                        widths[i] = widths[i].max(widest + 2 * column.padding);
                    }
                    height = height.max(segments.len());
                }
                row_cells.push(segments);
            }
            cells.push(row_cells);
            row_heights.push(height);
        }

        let summaries: Vec<String> = columns
            .iter()
            .zip(&accumulators)
            .map(|(column, acc)| acc.finalize(column))
            .collect();
        for (i, column) in columns.iter().enumerate() {
            if column.visible && !explicit[i] && !summaries[i].is_empty() {
                widths[i] = widths[i].max(display_width(&summaries[i]) + 2 * column.padding);
            }
        }

        tracing::debug!(
            columns = columns.len(),
            rows = rows.len(),
            widths = ?widths,
            "fitted table"
        );

        TableContext {
            layout,
            rows,
            widths,
            cells,
            row_heights,
            summaries,
        }
    }

    /// Indices of the visible columns, in layout order.
    pub fn visible(&self) -> Vec<usize> {
        self.layout.visible_columns().map(|(i, _)| i).collect()
    }

    /// Width of the table between its outer borders: visible column widths
    /// plus one separator between each pair.
    pub fn table_width(&self) -> usize {
        let visible = self.visible();
        if visible.is_empty() {
            return 0;
        }
        visible.iter().map(|&i| self.widths[i]).sum::<usize>() + visible.len() - 1
    }

    /// Wrap segments of one cell. Always at least one.
    pub fn segments(&self, row: usize, column: usize) -> &[String] {
        &self.cells[row][column]
    }

    /// True when any column declares a summary.
    pub fn has_summary(&self) -> bool {
        self.layout.has_summaries()
    }
}

fn initial_width(column: &Column) -> usize {
    let min = column.min_width();
    match column.width {
        Some(width) if width < min => {
            tracing::warn!(
                column = %column.header,
                width,
                minimum = min,
                "explicit width too small for padding, raising"
            );
            min
        }
        Some(width) => width,
        None => (display_width(&column.header) + 2 * column.padding).max(min),
    }
}

/// Display string of one cell: null policy for null/missing cells, empty
/// for values the datatype rejects, zero policy for numeric zeros, the
/// datatype's formatter otherwise.
pub fn display_string(column: &Column, raw: Option<&str>, validated: &str) -> String {
    let Some(raw) = raw else {
        return column.null_value.display().to_string();
    };
    if validated.is_empty() {
        if column.datatype.is_numeric() {
            tracing::warn!(
                column = %column.header,
                datatype = column.datatype.name(),
                value = raw,
                "value does not match datatype, shown empty"
            );
        }
        return String::new();
    }
    if column.datatype.is_numeric() && column.datatype.is_zero(validated) {
        return column.zero_value.display().to_string();
    }
    column.datatype.format(validated, column)
}

/// Splits a display string into the physical lines of a cell. Control
/// characters never reach a segment.
///
/// Only `wrap` columns split. A `wrap_char` splits on that delimiter;
/// otherwise the text splits on its own line breaks, and each line is
/// word-wrapped at `string_limit`, or at the content width of an
/// explicit-width column. An auto-width column without a limit keeps each
/// line whole.
pub fn wrap_segments(column: &Column, display: &str) -> Vec<String> {
    if column.wrap_mode != WrapMode::Wrap {
        return vec![flatten_controls(display)];
    }
    if let Some(delimiter) = &column.wrap_char {
        return display
            .split(delimiter.as_str())
            .map(|s| flatten_controls(s.trim()))
            .collect();
    }

    let limit = if column.string_limit > 0 {
        Some(column.string_limit)
    } else {
        column
            .width
            .map(|width| width.max(column.min_width()) - 2 * column.padding)
    };
    let mut segments: Vec<String> = display
        .lines()
        .flat_map(|line| {
            let line = flatten_controls(line);
            match limit {
                Some(width) => word_wrap(&line, width),
                None => vec![line],
            }
        })
        .collect();
    if segments.is_empty() {
        segments.push(String::new());
    }
    segments
}
