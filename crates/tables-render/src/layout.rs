//! Layout model: columns, sort order, title/footer and theme.
//!
//! The layout document is deserialized into loose "raw" structs that keep
//! every enumerated field as free text, then validated into the typed
//! model. Unknown enum values, `null` and values of the wrong type never
//! fail the parse; they fall back to a default and log a warning. Only a
//! missing/empty `columns` array or a column without a header is fatal.
//!
//! ```rust
//! use tables_render::{Datatype, Justify, Layout, SummaryKind};
//!
//! let layout = Layout::from_json(r#"{
//!     "theme": "Blue",
//!     "title": "Pods",
//!     "title_position": "center",
//!     "columns": [
//!         { "header": "Pod Name" },
//!         { "header": "CPU", "datatype": "kcpu", "justification": "right", "summary": "sum" }
//!     ],
//!     "sort": [{ "key": "pod_name", "direction": "desc" }]
//! }"#).unwrap();
//!
//! assert_eq!(layout.columns[0].key, "pod_name");
//! assert_eq!(layout.columns[1].datatype, Datatype::Kcpu);
//! assert_eq!(layout.columns[1].justification, Justify::Right);
//! assert_eq!(layout.columns[1].summary, SummaryKind::Sum);
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::datatype::Datatype;
use crate::error::{Document, Result, TableError};
use crate::summary::SummaryKind;
use crate::theme::DEFAULT_THEME;
use crate::util::slugify;

/// Horizontal placement of cell content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Justify {
    #[default]
    Left,
    Right,
    Center,
}

impl Justify {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Justify::Left),
            "right" => Some(Justify::Right),
            "center" | "centre" => Some(Justify::Center),
            _ => None,
        }
    }
}

/// How a cell handles text longer than its column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// Truncate (text honours `string_limit`; everything is clipped to an
    /// explicit width).
    #[default]
    Clip,
    /// Split over several physical lines.
    Wrap,
}

impl WrapMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "clip" => Some(WrapMode::Clip),
            "wrap" => Some(WrapMode::Wrap),
            _ => None,
        }
    }
}

/// What to show for a null or zero cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayPolicy {
    /// An empty cell.
    #[default]
    Blank,
    /// The literal `0`.
    Zero,
    /// The word `Missing`.
    Missing,
}

impl DisplayPolicy {
    /// Accepts `"blank"`, `"0"`, `"missing"` or the number `0`.
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "blank" | "" => Some(DisplayPolicy::Blank),
                "0" | "zero" => Some(DisplayPolicy::Zero),
                "missing" => Some(DisplayPolicy::Missing),
                _ => None,
            },
            Value::Number(n) if n.as_f64() == Some(0.0) => Some(DisplayPolicy::Zero),
            Value::Null => Some(DisplayPolicy::Blank),
            _ => None,
        }
    }

    /// The text shown for a cell governed by this policy.
    pub fn display(&self) -> &'static str {
        match self {
            DisplayPolicy::Blank => "",
            DisplayPolicy::Zero => "0",
            DisplayPolicy::Missing => "Missing",
        }
    }
}

/// Placement of the title or footer box relative to the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    Left,
    Right,
    Center,
    /// Spans the whole table width.
    Full,
    /// Left-anchored, sized to the text regardless of the table width.
    #[default]
    None,
}

impl Position {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Position::Left),
            "right" => Some(Position::Right),
            "center" | "centre" => Some(Position::Center),
            "full" => Some(Position::Full),
            "none" | "" => Some(Position::None),
            _ => None,
        }
    }
}

/// A title or footer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caption {
    pub text: String,
    pub position: Position,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Asc),
            "desc" | "descending" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// One entry of the layout's `sort` array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
    pub priority: i64,
}

/// A validated column definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    /// Field name looked up in each data row.
    pub key: String,
    pub justification: Justify,
    pub datatype: Datatype,
    pub null_value: DisplayPolicy,
    pub zero_value: DisplayPolicy,
    /// printf-style pattern for numeric values.
    pub format: Option<String>,
    pub summary: SummaryKind,
    /// Emit a separator whenever this column's value changes between rows.
    pub break_on_change: bool,
    /// Maximum text length; 0 means unlimited.
    pub string_limit: usize,
    pub wrap_mode: WrapMode,
    pub wrap_char: Option<String>,
    pub padding: usize,
    pub visible: bool,
    /// Explicit width including padding. `None` sizes the column from its
    /// content.
    pub width: Option<usize>,
}

impl Column {
    /// Creates a visible, left-justified text column keyed by the slugified
    /// header.
    pub fn new(header: impl Into<String>) -> Self {
        let header = header.into();
        Column {
            key: slugify(&header),
            header,
            justification: Justify::Left,
            datatype: Datatype::Text,
            null_value: DisplayPolicy::Blank,
            zero_value: DisplayPolicy::Blank,
            format: None,
            summary: SummaryKind::None,
            break_on_change: false,
            string_limit: 0,
            wrap_mode: WrapMode::Clip,
            wrap_char: None,
            padding: 1,
            visible: true,
            width: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn justify(mut self, justification: Justify) -> Self {
        self.justification = justification;
        self
    }

    pub fn datatype(mut self, datatype: Datatype) -> Self {
        self.datatype = datatype;
        self
    }

    pub fn null_value(mut self, policy: DisplayPolicy) -> Self {
        self.null_value = policy;
        self
    }

    pub fn zero_value(mut self, policy: DisplayPolicy) -> Self {
        self.zero_value = policy;
        self
    }

    pub fn format(mut self, pattern: impl Into<String>) -> Self {
        self.format = Some(pattern.into());
        self
    }

    pub fn summary(mut self, summary: SummaryKind) -> Self {
        self.summary = summary;
        self
    }

    pub fn break_on_change(mut self, enabled: bool) -> Self {
        self.break_on_change = enabled;
        self
    }

    pub fn string_limit(mut self, limit: usize) -> Self {
        self.string_limit = limit;
        self
    }

    pub fn wrap_mode(mut self, mode: WrapMode) -> Self {
        self.wrap_mode = mode;
        self
    }

    pub fn wrap_char(mut self, delimiter: impl Into<String>) -> Self {
        self.wrap_char = Some(delimiter.into());
        self
    }

    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Smallest width that still leaves one column of content.
    pub fn min_width(&self) -> usize {
        2 * self.padding + 1
    }

    pub fn has_explicit_width(&self) -> bool {
        self.width.is_some()
    }
}

/// The validated layout document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Theme name as written in the layout (resolved at render time).
    pub theme: String,
    pub title: Option<Caption>,
    pub footer: Option<Caption>,
    pub columns: Vec<Column>,
    pub sort: Vec<SortSpec>,
}

impl Layout {
    pub fn new(columns: Vec<Column>) -> Self {
        Layout {
            theme: DEFAULT_THEME.to_string(),
            title: None,
            footer: None,
            columns,
            sort: Vec::new(),
        }
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn title(mut self, text: impl Into<String>, position: Position) -> Self {
        self.title = Some(Caption {
            text: text.into(),
            position,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>, position: Position) -> Self {
        self.footer = Some(Caption {
            text: text.into(),
            position,
        });
        self
    }

    pub fn sort_by(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        let priority = self.sort.len() as i64 + 1;
        self.sort.push(SortSpec {
            key: key.into(),
            direction,
            priority,
        });
        self
    }

    /// Parses and validates a layout document.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Err(TableError::EmptyDocument {
                document: Document::Layout,
            });
        }
        let raw: RawLayout = serde_json::from_str(json).map_err(|source| TableError::Json {
            document: Document::Layout,
            source,
        })?;
        raw.into_layout()
    }

    /// Checks the invariants a hand-built layout must satisfy: at least one
    /// column, non-empty headers, and summaries the datatype supports
    /// (unsupported ones are reset to `none`).
    pub fn validate(mut self) -> Result<Self> {
        if self.columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        for (index, column) in self.columns.iter_mut().enumerate() {
            if column.header.trim().is_empty() {
                return Err(TableError::EmptyHeader { index });
            }
            if !column.datatype.allows(column.summary) {
                tracing::warn!(
                    column = %column.header,
                    datatype = column.datatype.name(),
                    summary = column.summary.name(),
                    "summary not supported for datatype, using none"
                );
                column.summary = SummaryKind::None;
            }
        }
        Ok(self)
    }

    /// True when any column asks for a summary row.
    pub fn has_summaries(&self) -> bool {
        self.columns.iter().any(|c| c.summary != SummaryKind::None)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = (usize, &Column)> {
        self.columns.iter().enumerate().filter(|(_, c)| c.visible)
    }
}

// Every optional field is read as a raw JSON value so that `null` or a
// value of the wrong type degrades to the default instead of failing the
// whole document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLayout {
    theme: Option<Value>,
    title: Option<Value>,
    title_position: Option<Value>,
    footer: Option<Value>,
    footer_position: Option<Value>,
    columns: Option<Value>,
    sort: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawColumn {
    header: Option<Value>,
    key: Option<Value>,
    justification: Option<Value>,
    datatype: Option<Value>,
    null_value: Option<Value>,
    zero_value: Option<Value>,
    format: Option<Value>,
    summary: Option<Value>,
    #[serde(rename = "break")]
    break_on_change: Option<Value>,
    string_limit: Option<Value>,
    wrap_mode: Option<Value>,
    wrap_char: Option<Value>,
    padding: Option<Value>,
    visible: Option<Value>,
    width: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSort {
    key: Option<Value>,
    direction: Option<Value>,
    priority: Option<Value>,
}

impl RawLayout {
    fn into_layout(self) -> Result<Layout> {
        let raw_columns = match self.columns {
            Some(Value::Array(columns)) if !columns.is_empty() => columns,
            Some(Value::Array(_)) | None => return Err(TableError::NoColumns),
            Some(other) => {
                tracing::warn!(value = %other, "columns is not an array");
                return Err(TableError::NoColumns);
            }
        };

        let columns = raw_columns
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                // A column that is not an object has no header.
                let raw: RawColumn = serde_json::from_value(value)
                    .map_err(|_| TableError::EmptyHeader { index })?;
                raw.into_column(index)
            })
            .collect::<Result<Vec<_>>>()?;

        let layout = Layout {
            theme: text(self.theme, "theme")
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_THEME.to_string()),
            title: caption(
                text(self.title, "title"),
                text(self.title_position, "title_position").as_deref(),
                "title_position",
            ),
            footer: caption(
                text(self.footer, "footer"),
                text(self.footer_position, "footer_position").as_deref(),
                "footer_position",
            ),
            columns,
            sort: sort_entries(self.sort),
        };
        layout.validate()
    }
}

fn sort_entries(value: Option<Value>) -> Vec<SortSpec> {
    let entries = match value {
        None => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            tracing::warn!(value = %other, "sort is not an array, ignoring");
            return Vec::new();
        }
    };

    let mut sort = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let raw: RawSort = match serde_json::from_value(entry) {
            Ok(raw) => raw,
            Err(_) => {
                tracing::warn!(index = i, "sort entry is not an object, ignoring");
                continue;
            }
        };
        let Some(key) = text(raw.key, "sort key").filter(|k| !k.trim().is_empty()) else {
            tracing::warn!(index = i, "sort entry without a key, ignoring");
            continue;
        };
        sort.push(SortSpec {
            direction: parse_or_warn(
                text(raw.direction, "sort direction").as_deref(),
                SortDirection::parse,
                SortDirection::Asc,
                "sort direction",
            ),
            priority: integer(raw.priority, "sort priority").unwrap_or(i as i64 + 1),
            key,
        });
    }
    sort
}

impl RawColumn {
    fn into_column(self, index: usize) -> Result<Column> {
        let header = text(self.header, "header").unwrap_or_default();
        if header.trim().is_empty() {
            return Err(TableError::EmptyHeader { index });
        }

        let mut column = Column::new(header);
        if let Some(key) = text(self.key, "key").filter(|k| !k.trim().is_empty()) {
            column.key = key;
        }

        column.datatype = parse_or_warn(
            text(self.datatype, "datatype").as_deref(),
            Datatype::parse,
            Datatype::Text,
            "datatype",
        );
        column.justification = parse_or_warn(
            text(self.justification, "justification").as_deref(),
            Justify::parse,
            Justify::Left,
            "justification",
        );
        column.summary = parse_or_warn(
            text(self.summary, "summary").as_deref(),
            SummaryKind::parse,
            SummaryKind::None,
            "summary",
        );
        column.wrap_mode = parse_or_warn(
            text(self.wrap_mode, "wrap_mode").as_deref(),
            WrapMode::parse,
            WrapMode::Clip,
            "wrap_mode",
        );
        column.null_value = policy(self.null_value.as_ref(), "null_value");
        column.zero_value = policy(self.zero_value.as_ref(), "zero_value");

        column.format = text(self.format, "format").filter(|f| !f.is_empty());
        column.break_on_change = flag(self.break_on_change, "break").unwrap_or(false);
        column.string_limit = count(self.string_limit, "string_limit").unwrap_or(0);
        column.wrap_char = text(self.wrap_char, "wrap_char").filter(|c| !c.is_empty());
        column.padding = count(self.padding, "padding").unwrap_or(1);
        column.visible = flag(self.visible, "visible").unwrap_or(true);
        column.width = count(self.width, "width").filter(|w| *w > 0);
        Ok(column)
    }
}

/// A free-text field. Numbers and booleans are taken as their JSON text.
fn text(value: Option<Value>, field: &'static str) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        scalar @ (Value::Number(_) | Value::Bool(_)) => Some(scalar.to_string()),
        other => {
            tracing::warn!(field, value = %other, "expected text, ignoring");
            None
        }
    }
}

/// A non-negative integer, given as a number or a numeric string.
fn count(value: Option<Value>, field: &'static str) -> Option<usize> {
    let value = value?;
    let parsed = match &value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(field, value = %value, "expected a non-negative integer, using default");
    }
    parsed
}

fn integer(value: Option<Value>, field: &'static str) -> Option<i64> {
    let value = value?;
    let parsed = match &value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(field, value = %value, "expected an integer, using default");
    }
    parsed
}

/// A boolean, given as `true`/`false` or the same words as a string.
fn flag(value: Option<Value>, field: &'static str) -> Option<bool> {
    let value = value?;
    let parsed = match &value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(field, value = %value, "expected a boolean, using default");
    }
    parsed
}

fn parse_or_warn<T: Copy>(
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
    fallback: T,
    field: &'static str,
) -> T {
    let Some(value) = value else {
        return fallback;
    };
    match parse(value) {
        Some(parsed) => parsed,
        None => {
            tracing::warn!(field, value, "unsupported value, using default");
            fallback
        }
    }
}

fn policy(value: Option<&Value>, field: &'static str) -> DisplayPolicy {
    let Some(value) = value else {
        return DisplayPolicy::Blank;
    };
    DisplayPolicy::parse(value).unwrap_or_else(|| {
        tracing::warn!(field, value = %value, "unsupported display policy, using blank");
        DisplayPolicy::Blank
    })
}

fn caption(text: Option<String>, position: Option<&str>, field: &'static str) -> Option<Caption> {
    let text = text.filter(|t| !t.is_empty())?;
    Some(Caption {
        text,
        position: parse_or_warn(position, Position::parse, Position::None, field),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let layout = Layout::from_json(r#"{"columns":[{"header":"Free Memory"}]}"#).unwrap();
        let col = &layout.columns[0];
        assert_eq!(col.key, "free_memory");
        assert_eq!(col.datatype, Datatype::Text);
        assert_eq!(col.justification, Justify::Left);
        assert_eq!(col.null_value, DisplayPolicy::Blank);
        assert_eq!(col.zero_value, DisplayPolicy::Blank);
        assert_eq!(col.summary, SummaryKind::None);
        assert_eq!(col.wrap_mode, WrapMode::Clip);
        assert_eq!(col.padding, 1);
        assert!(col.visible);
        assert!(!col.break_on_change);
        assert_eq!(col.width, None);
        assert_eq!(layout.theme, "Red");
        assert!(layout.title.is_none());
        assert!(layout.sort.is_empty());
    }

    #[test]
    fn explicit_fields_are_kept() {
        let layout = Layout::from_json(
            r#"{"columns":[{
                "header":"Size","key":"bytes","datatype":"num","justification":"right",
                "null_value":"missing","zero_value":0,"format":"%.1f","summary":"max",
                "break":true,"string_limit":5,"wrap_mode":"wrap","wrap_char":",",
                "padding":2,"visible":false,"width":12
            }]}"#,
        )
        .unwrap();
        let col = &layout.columns[0];
        assert_eq!(col.key, "bytes");
        assert_eq!(col.datatype, Datatype::Num);
        assert_eq!(col.justification, Justify::Right);
        assert_eq!(col.null_value, DisplayPolicy::Missing);
        assert_eq!(col.zero_value, DisplayPolicy::Zero);
        assert_eq!(col.format.as_deref(), Some("%.1f"));
        assert_eq!(col.summary, SummaryKind::Max);
        assert!(col.break_on_change);
        assert_eq!(col.string_limit, 5);
        assert_eq!(col.wrap_mode, WrapMode::Wrap);
        assert_eq!(col.wrap_char.as_deref(), Some(","));
        assert_eq!(col.padding, 2);
        assert!(!col.visible);
        assert_eq!(col.width, Some(12));
    }

    #[test]
    fn unknown_values_fall_back() {
        let layout = Layout::from_json(
            r#"{"title":"T","title_position":"diagonal","columns":[
                {"header":"A","datatype":"complex","justification":"justified","summary":"median"}
            ]}"#,
        )
        .unwrap();
        let col = &layout.columns[0];
        assert_eq!(col.datatype, Datatype::Text);
        assert_eq!(col.justification, Justify::Left);
        assert_eq!(col.summary, SummaryKind::None);
        assert_eq!(layout.title.unwrap().position, Position::None);
    }

    #[test]
    fn unsupported_summary_for_datatype_is_reset() {
        let layout =
            Layout::from_json(r#"{"columns":[{"header":"Name","summary":"sum"}]}"#).unwrap();
        assert_eq!(layout.columns[0].summary, SummaryKind::None);

        let layout =
            Layout::from_json(r#"{"columns":[{"header":"Name","summary":"unique"}]}"#).unwrap();
        assert_eq!(layout.columns[0].summary, SummaryKind::Unique);
    }

    #[test]
    fn missing_or_empty_columns_is_fatal() {
        assert!(matches!(
            Layout::from_json(r#"{"theme":"Red"}"#),
            Err(TableError::NoColumns)
        ));
        assert!(matches!(
            Layout::from_json(r#"{"columns":[]}"#),
            Err(TableError::NoColumns)
        ));
    }

    #[test]
    fn empty_header_is_fatal() {
        let err = Layout::from_json(r#"{"columns":[{"header":"A"},{"header":"  "}]}"#).unwrap_err();
        assert!(matches!(err, TableError::EmptyHeader { index: 1 }));
        let err = Layout::from_json(r#"{"columns":[{"key":"a"}]}"#).unwrap_err();
        assert!(matches!(err, TableError::EmptyHeader { index: 0 }));
    }

    #[test]
    fn empty_and_malformed_documents() {
        assert!(matches!(
            Layout::from_json("  \n"),
            Err(TableError::EmptyDocument {
                document: Document::Layout
            })
        ));
        assert!(matches!(
            Layout::from_json("{not json"),
            Err(TableError::Json { .. })
        ));
    }

    #[test]
    fn sort_entries_default_direction_and_priority() {
        let layout = Layout::from_json(
            r#"{"columns":[{"header":"A"}],
                "sort":[{"key":"a"},{"key":"b","direction":"DESC","priority":7}]}"#,
        )
        .unwrap();
        assert_eq!(layout.sort[0].direction, SortDirection::Asc);
        assert_eq!(layout.sort[0].priority, 1);
        assert_eq!(layout.sort[1].direction, SortDirection::Desc);
        assert_eq!(layout.sort[1].priority, 7);
    }

    #[test]
    fn sort_entry_without_key_is_dropped() {
        let layout = Layout::from_json(
            r#"{"columns":[{"header":"A"}],"sort":[{"direction":"desc"},{"key":"a"}]}"#,
        )
        .unwrap();
        assert_eq!(layout.sort.len(), 1);
        assert_eq!(layout.sort[0].key, "a");
        assert_eq!(layout.sort[0].priority, 2);
    }

    #[test]
    fn captions_require_text() {
        let layout = Layout::from_json(
            r#"{"title":"","footer":"Total","footer_position":"right","columns":[{"header":"A"}]}"#,
        )
        .unwrap();
        assert!(layout.title.is_none());
        assert_eq!(
            layout.footer,
            Some(Caption {
                text: "Total".into(),
                position: Position::Right
            })
        );
    }

    #[test]
    fn null_optional_fields_use_defaults() {
        let layout = Layout::from_json(
            r#"{"theme":null,"title":null,"sort":null,"columns":[
                {"header":"A","break":null,"visible":null,"width":null,"datatype":null}
            ]}"#,
        )
        .unwrap();
        let col = &layout.columns[0];
        assert!(!col.break_on_change);
        assert!(col.visible);
        assert_eq!(col.width, None);
        assert_eq!(col.datatype, Datatype::Text);
        assert_eq!(layout.theme, "Red");
        assert!(layout.title.is_none());
        assert!(layout.sort.is_empty());
    }

    #[test]
    fn mistyped_fields_fall_back() {
        let layout = Layout::from_json(
            r#"{"columns":[
                {"header":"A","width":"10","padding":-1,"break":"yes","string_limit":[3]},
                {"header":"B","visible":"false","summary":{"kind":"sum"}}
            ],"sort":[5,{"key":"a","priority":"x"}]}"#,
        )
        .unwrap();
        let a = &layout.columns[0];
        assert_eq!(a.width, Some(10));
        assert_eq!(a.padding, 1);
        assert!(!a.break_on_change);
        assert_eq!(a.string_limit, 0);
        let b = &layout.columns[1];
        assert!(!b.visible);
        assert_eq!(b.summary, SummaryKind::None);
        assert_eq!(layout.sort.len(), 1);
        assert_eq!(layout.sort[0].key, "a");
        assert_eq!(layout.sort[0].priority, 2);
    }

    #[test]
    fn non_object_column_has_no_header() {
        assert!(matches!(
            Layout::from_json(r#"{"columns":[{"header":"A"},"B"]}"#),
            Err(TableError::EmptyHeader { index: 1 })
        ));
        assert!(matches!(
            Layout::from_json(r#"{"columns":"A"}"#),
            Err(TableError::NoColumns)
        ));
    }

    #[test]
    fn zero_width_means_auto() {
        let layout = Layout::from_json(r#"{"columns":[{"header":"A","width":0}]}"#).unwrap();
        assert!(!layout.columns[0].has_explicit_width());
    }

    #[test]
    fn builder_layout_validates() {
        let layout = Layout::new(vec![Column::new("Name").summary(SummaryKind::Avg)])
            .validate()
            .unwrap();
        assert_eq!(layout.columns[0].summary, SummaryKind::None);
        assert!(matches!(
            Layout::new(vec![]).validate(),
            Err(TableError::NoColumns)
        ));
    }

    #[test]
    fn display_policy_parsing() {
        assert_eq!(
            DisplayPolicy::parse(&Value::from("MISSING")),
            Some(DisplayPolicy::Missing)
        );
        assert_eq!(DisplayPolicy::parse(&Value::from(0)), Some(DisplayPolicy::Zero));
        assert_eq!(DisplayPolicy::parse(&Value::from(1)), None);
        assert_eq!(DisplayPolicy::Missing.display(), "Missing");
    }
}
