//! Row loading and sorting.
//!
//! The data document is a JSON array of flat objects. Only the fields named
//! by a column key are kept; a key missing from a row reads as null.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::{Number, Value};

use crate::error::{Document, Result, TableError};
use crate::layout::{Column, Layout, SortDirection};

/// A single cell value as loaded from the data document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellValue {
    Null,
    Text(String),
    Number(Number),
}

impl CellValue {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::String(s) => CellValue::Text(s),
            Value::Number(n) => CellValue::Number(n),
            Value::Bool(b) => CellValue::Text(b.to_string()),
            nested @ (Value::Array(_) | Value::Object(_)) => CellValue::Text(nested.to_string()),
        }
    }

    /// The value as text, or `None` for null. The string `"null"` is
    /// treated as null too.
    pub fn raw(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) if s == "null" => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(n.to_string()),
        }
    }
}

static NULL_CELL: CellValue = CellValue::Null;

/// One data row, keyed by column key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    values: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a cell; unknown keys read as null.
    pub fn get(&self, key: &str) -> &CellValue {
        self.values.get(key).unwrap_or(&NULL_CELL)
    }

    /// Raw text of a cell, `None` when null or missing.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.get(key).raw()
    }
}

/// Parses the data document, keeping only the fields named by `columns`.
pub fn load_rows(json: &str, columns: &[Column]) -> Result<Vec<Row>> {
    if json.trim().is_empty() {
        return Err(TableError::EmptyDocument {
            document: Document::Data,
        });
    }
    let document: Value = serde_json::from_str(json).map_err(|source| TableError::Json {
        document: Document::Data,
        source,
    })?;
    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(TableError::InvalidData(format!(
                "expected an array of objects, found {}",
                kind(&other)
            )))
        }
    };

    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let mut fields = match item {
            Value::Object(fields) => fields,
            other => {
                return Err(TableError::InvalidData(format!(
                    "row {index} is {}, expected an object",
                    kind(&other)
                )))
            }
        };
        let mut row = Row::new();
        for column in columns {
            if row.values.contains_key(&column.key) {
                continue;
            }
            let value = fields
                .remove(&column.key)
                .map(CellValue::from_json)
                .unwrap_or(CellValue::Null);
            row.values.insert(column.key.clone(), value);
        }
        rows.push(row);
    }
    tracing::debug!(rows = rows.len(), "loaded data");
    Ok(rows)
}

/// Stable sort by the first sort entry only. Values compare as opaque
/// strings; null sorts as the empty string.
pub fn sort_rows(rows: &mut [Row], layout: &Layout) {
    let Some(spec) = layout.sort.first() else {
        return;
    };
    if layout.sort.len() > 1 {
        tracing::debug!(
            ignored = layout.sort.len() - 1,
            "only the first sort entry is applied"
        );
    }
    if !layout.columns.iter().any(|c| c.key == spec.key) {
        tracing::warn!(key = %spec.key, "sort key names no column, keeping input order");
        return;
    }
    tracing::debug!(key = %spec.key, direction = ?spec.direction, priority = spec.priority, "sorting rows");

    rows.sort_by(|a, b| {
        let ordering = compare_raw(a.get(&spec.key), b.get(&spec.key));
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_raw(a: &CellValue, b: &CellValue) -> Ordering {
    a.raw().unwrap_or_default().cmp(&b.raw().unwrap_or_default())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![Column::new("Name"), Column::new("Count")]
    }

    fn names(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|r| r.raw("name").unwrap_or_default()).collect()
    }

    #[test]
    fn loads_declared_keys_only() {
        let rows = load_rows(r#"[{"name":"a","count":3,"extra":true}]"#, &columns()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].raw("name").as_deref(), Some("a"));
        assert_eq!(rows[0].raw("count").as_deref(), Some("3"));
        assert_eq!(rows[0].get("extra"), &CellValue::Null);
    }

    #[test]
    fn missing_keys_and_null_strings_read_as_null() {
        let rows = load_rows(r#"[{"name":"null"}]"#, &columns()).unwrap();
        assert_eq!(rows[0].raw("name"), None);
        assert_eq!(rows[0].get("count"), &CellValue::Null);
    }

    #[test]
    fn non_scalar_values_become_text() {
        let rows = load_rows(r#"[{"name":true,"count":[1,2]}]"#, &columns()).unwrap();
        assert_eq!(rows[0].raw("name").as_deref(), Some("true"));
        assert_eq!(rows[0].raw("count").as_deref(), Some("[1,2]"));
    }

    #[test]
    fn document_shape_errors() {
        assert!(matches!(
            load_rows("", &columns()),
            Err(TableError::EmptyDocument {
                document: Document::Data
            })
        ));
        assert!(matches!(
            load_rows(r#"{"name":"a"}"#, &columns()),
            Err(TableError::InvalidData(_))
        ));
        let err = load_rows(r#"[{"name":"a"}, 5]"#, &columns()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
        assert!(matches!(
            load_rows("[", &columns()),
            Err(TableError::Json {
                document: Document::Data,
                ..
            })
        ));
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(load_rows("[]", &columns()).unwrap().is_empty());
    }

    #[test]
    fn sorts_lexically_and_stably() {
        let layout = Layout::new(columns()).sort_by("count", SortDirection::Asc);
        let mut rows = load_rows(
            r#"[{"name":"a","count":10},{"name":"b","count":9},{"name":"c","count":10}]"#,
            &layout.columns,
        )
        .unwrap();
        sort_rows(&mut rows, &layout);
        // "10" < "9" as strings; equal keys keep input order.
        assert_eq!(names(&rows), vec!["a", "c", "b"]);
    }

    #[test]
    fn sorts_descending() {
        let layout = Layout::new(columns()).sort_by("name", SortDirection::Desc);
        let mut rows = load_rows(r#"[{"name":"a"},{"name":"c"},{"name":"b"}]"#, &layout.columns)
            .unwrap();
        sort_rows(&mut rows, &layout);
        assert_eq!(names(&rows), vec!["c", "b", "a"]);
    }

    #[test]
    fn only_first_sort_entry_applies() {
        let layout = Layout::new(columns())
            .sort_by("count", SortDirection::Asc)
            .sort_by("name", SortDirection::Desc);
        let mut rows = load_rows(
            r#"[{"name":"a","count":1},{"name":"b","count":1},{"name":"c","count":0}]"#,
            &layout.columns,
        )
        .unwrap();
        sort_rows(&mut rows, &layout);
        assert_eq!(names(&rows), vec!["c", "a", "b"]);
    }

    #[test]
    fn unknown_sort_key_keeps_order() {
        let layout = Layout::new(columns()).sort_by("missing", SortDirection::Asc);
        let mut rows = load_rows(r#"[{"name":"b"},{"name":"a"}]"#, &layout.columns).unwrap();
        sort_rows(&mut rows, &layout);
        assert_eq!(names(&rows), vec!["b", "a"]);
    }

    #[test]
    fn nulls_sort_first_ascending() {
        let layout = Layout::new(columns()).sort_by("name", SortDirection::Asc);
        let mut rows =
            load_rows(r#"[{"name":"a"},{"name":null}]"#, &layout.columns).unwrap();
        sort_rows(&mut rows, &layout);
        assert_eq!(rows[0].raw("name"), None);
    }
}
