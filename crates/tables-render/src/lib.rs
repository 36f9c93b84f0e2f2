//! # Tables Render - JSON-driven Terminal Tables
//!
//! `tables-render` turns two JSON documents into a bordered, themed table
//! for the terminal: a *layout* describing columns, sort order, title,
//! footer and theme, and a *data* document holding the rows.
//!
//! This crate is the engine behind the `tables` command, but can be used
//! on its own by anything that needs the same output.
//!
//! ## Pipeline
//!
//! Every render runs the same stages, each usable on its own:
//!
//! 1. [`Layout::from_json`]: parse and validate the layout.
//! 2. [`data::load_rows`]: load the rows, keeping the fields columns name.
//! 3. [`data::sort_rows`]: stable sort by the first sort entry.
//! 4. [`TableContext::fit`]: display strings, widths, row heights, summaries.
//! 5. [`render::render_table`]: draw the table.
//!
//! ## Quick Start
//!
//! ```rust
//! use tables_render::{render_documents, RenderOptions};
//!
//! let layout = r#"{
//!     "columns": [
//!         { "header": "Name" },
//!         { "header": "Count", "datatype": "int", "summary": "sum" }
//!     ]
//! }"#;
//! let data = r#"[{"name": "a", "count": 3}, {"name": "bb", "count": 5}]"#;
//!
//! let table = render_documents(layout, data, &RenderOptions::plain()).unwrap();
//! assert_eq!(table, "\
//! ╭──────┬───────╮
//! │ Name │ Count │
//! ├──────┼───────┤
//! │ a    │ 3     │
//! │ bb   │ 5     │
//! ├──────┼───────┤
//! │      │ 8     │
//! ╰──────┴───────╯
//! ");
//! ```
//!
//! ## Datatypes
//!
//! Columns are `text`, `int`, `num`, `float`, `kcpu` (`250m`) or `kmem`
//! (`512Mi`, `2G`). See [`Datatype`] for what each accepts and how it is
//! displayed and summarized.
//!
//! ## Errors
//!
//! Only unreadable, empty or malformed documents, a layout without columns
//! and a column without a header are errors ([`TableError`]). Everything
//! else falls back to a default and logs a `tracing` warning.

pub mod data;
pub mod datatype;
mod error;
pub mod fit;
pub mod layout;
pub mod pattern;
pub mod render;
pub mod summary;
pub mod theme;
pub mod util;

use std::path::Path;

pub use data::{CellValue, Row};
pub use datatype::Datatype;
pub use error::{Document, Result, TableError};
pub use fit::TableContext;
pub use layout::{
    Caption, Column, DisplayPolicy, Justify, Layout, Position, SortDirection, SortSpec, WrapMode,
};
pub use summary::SummaryKind;
pub use theme::{Theme, DEFAULT_THEME};

/// Options for a full render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI colors.
    pub styled: bool,
    /// Theme name overriding the layout's `theme`.
    pub theme: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            styled: true,
            theme: None,
        }
    }
}

impl RenderOptions {
    /// Uncolored output.
    pub fn plain() -> Self {
        RenderOptions {
            styled: false,
            theme: None,
        }
    }

    pub fn theme(mut self, name: impl Into<String>) -> Self {
        self.theme = Some(name.into());
        self
    }
}

/// Runs the full pipeline on in-memory layout and data documents.
pub fn render_documents(layout_json: &str, data_json: &str, options: &RenderOptions) -> Result<String> {
    let layout = Layout::from_json(layout_json)?;
    tracing::debug!(columns = layout.columns.len(), theme = %layout.theme, "parsed layout");

    let mut rows = data::load_rows(data_json, &layout.columns)?;
    data::sort_rows(&mut rows, &layout);

    let ctx = TableContext::fit(&layout, &rows);
    let theme = theme::resolve(options.theme.as_deref().unwrap_or(&layout.theme));
    Ok(render::render_table(&ctx, theme, options.styled))
}

/// Reads both documents from disk and renders them.
pub fn render_files(
    layout_path: impl AsRef<Path>,
    data_path: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<String> {
    let layout = read_document(layout_path.as_ref(), Document::Layout)?;
    let data = read_document(data_path.as_ref(), Document::Data)?;
    render_documents(&layout, &data, options)
}

/// Reads one document from disk. A missing file and a whitespace-only file
/// are both errors.
pub fn read_document(path: &Path, document: Document) -> Result<String> {
    let contents = std::fs::read_to_string(path).map_err(|source| TableError::Read {
        document,
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Err(TableError::EmptyDocument { document });
    }
    Ok(contents)
}
