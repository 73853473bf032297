//! Column model.
//!
//! Turns the declarative column spec handed over by the application into the
//! normalized column list the rest of the engine works with.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigurationError;
use crate::options::TableOptions;
use crate::render::{CellContent, CellRenderFn, RendererRegistry};
use crate::source::Row;

/// Id of the synthetic selection column.
pub const SELECT_COLUMN_ID: &str = "hai-row-select";

const DEFAULT_SIZE: u32 = 180;
const DEFAULT_MIN_WIDTH: u32 = 40;
const SELECT_COLUMN_SIZE: u32 = 60;

// =============================================================================
// ColumnSpec
// =============================================================================

/// One entry of the application's column configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnSpec {
    /// Data field the column reads. Required.
    pub field: Option<String>,
    /// Header text.
    pub title: String,
    /// Footer text.
    pub footer: Option<String>,
    /// Renderer tag (`"counter"`, `"haiperlink"`, or a registered custom tag).
    #[serde(rename = "type")]
    pub cell_type: Option<String>,
    /// Start hidden.
    pub hidden: bool,
    pub size: Option<u32>,
    pub min_width: Option<u32>,
    pub sortable: Option<bool>,
    pub filterable: Option<bool>,
}

impl ColumnSpec {
    /// Create a spec for a field with a title.
    pub fn new(field: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the renderer tag.
    pub fn with_type(mut self, cell_type: impl Into<String>) -> Self {
        self.cell_type = Some(cell_type.into());
        self
    }

    /// Mark the column hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set a fixed size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the footer text.
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Exclude the column from sorting.
    pub fn unsortable(mut self) -> Self {
        self.sortable = Some(false);
        self
    }
}

// =============================================================================
// Column
// =============================================================================

/// Kind of column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// No backing data field (selection checkboxes, actions).
    Display,
    /// Reads a field of the row.
    Accessor,
    /// Groups other columns under one header.
    Group,
}

/// A normalized column.
#[derive(Clone)]
pub struct Column {
    /// Unique within the table.
    pub id: String,
    /// Field read from the row. `None` for display columns.
    pub accessor_key: Option<String>,
    /// Header text.
    pub header: String,
    pub footer: Option<String>,
    pub column_type: ColumnType,
    /// Renderer tag the column was declared with.
    pub cell_type: Option<String>,
    /// Declared hidden.
    pub hidden: bool,
    pub min_width: u32,
    pub size: u32,
    pub sortable: bool,
    pub filterable: bool,
    /// Header hosts a select-all checkbox.
    pub header_select_all: bool,
    renderer: CellRenderFn,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("accessor_key", &self.accessor_key)
            .field("header", &self.header)
            .field("column_type", &self.column_type)
            .field("cell_type", &self.cell_type)
            .field("hidden", &self.hidden)
            .field("size", &self.size)
            .field("sortable", &self.sortable)
            .finish_non_exhaustive()
    }
}

impl Column {
    /// The synthetic row selection column.
    pub fn select_column(header_select_all: bool) -> Self {
        Self {
            id: SELECT_COLUMN_ID.to_string(),
            accessor_key: None,
            header: String::new(),
            footer: None,
            column_type: ColumnType::Display,
            cell_type: None,
            hidden: false,
            min_width: SELECT_COLUMN_SIZE,
            size: SELECT_COLUMN_SIZE,
            sortable: false,
            filterable: false,
            header_select_all,
            renderer: RendererRegistry::empty().resolve(None),
        }
    }

    /// Whether the column is a display column.
    pub fn is_display(&self) -> bool {
        self.column_type == ColumnType::Display
    }

    /// Whether the global filter looks at this column.
    pub fn can_filter(&self) -> bool {
        self.filterable && self.column_type == ColumnType::Accessor
    }

    /// Whether the column can be sorted.
    pub fn can_sort(&self) -> bool {
        self.sortable && self.column_type == ColumnType::Accessor
    }

    /// Header text.
    pub fn render_header(&self) -> String {
        self.header.clone()
    }

    /// The row's value for this column.
    pub fn value<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        self.accessor_key.as_deref().and_then(|key| row.value(key))
    }

    /// Render this column's cell for a row.
    pub fn render_cell(&self, row: &Row) -> CellContent {
        (self.renderer)(self.value(row), row)
    }
}

// =============================================================================
// prepare
// =============================================================================

/// Build the column list with the built-in renderers.
pub fn prepare(
    options: &TableOptions,
    specs: &[ColumnSpec],
) -> Result<Vec<Column>, ConfigurationError> {
    prepare_with(options, specs, &RendererRegistry::default())
}

/// Build the column list, resolving renderer tags against `registry`.
pub fn prepare_with(
    options: &TableOptions,
    specs: &[ColumnSpec],
    registry: &RendererRegistry,
) -> Result<Vec<Column>, ConfigurationError> {
    let mut columns = Vec::with_capacity(specs.len() + 1);

    if options.enable_multi_row_selection {
        columns.push(Column::select_column(options.enable_select_all));
    }

    for (index, spec) in specs.iter().enumerate() {
        let field = match spec.field.as_deref() {
            Some(field) if !field.trim().is_empty() => field,
            _ => return Err(ConfigurationError::MissingField { index }),
        };

        columns.push(Column {
            id: field.to_string(),
            accessor_key: Some(field.to_string()),
            header: spec.title.clone(),
            footer: spec.footer.clone(),
            column_type: ColumnType::Accessor,
            cell_type: spec.cell_type.clone(),
            hidden: spec.hidden,
            min_width: spec.min_width.unwrap_or(DEFAULT_MIN_WIDTH),
            size: spec.size.unwrap_or(DEFAULT_SIZE),
            sortable: options.enable_sorting && spec.sortable.unwrap_or(true),
            filterable: spec.filterable.unwrap_or(true),
            header_select_all: false,
            renderer: registry.resolve(spec.cell_type.as_deref()),
        });
    }

    let mut seen = HashSet::with_capacity(columns.len());
    for column in &columns {
        if !seen.insert(column.id.as_str()) {
            return Err(ConfigurationError::DuplicateColumnId {
                id: column.id.clone(),
            });
        }
    }

    Ok(columns)
}

// =============================================================================
// ColumnVisibility
// =============================================================================

/// Per-column visibility flags. Columns without an entry are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    flags: HashMap<String, bool>,
}

impl ColumnVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the column is visible.
    pub fn is_visible(&self, column_id: &str) -> bool {
        self.flags.get(column_id).copied().unwrap_or(true)
    }

    /// Set a column's visibility.
    pub fn set(&mut self, column_id: impl Into<String>, visible: bool) {
        self.flags.insert(column_id.into(), visible);
    }

    /// Hide every column declared hidden.
    ///
    /// Sets rather than toggles, so applying it again changes nothing.
    pub fn hide_columns(&mut self, columns: &[Column]) {
        for column in columns.iter().filter(|c| c.hidden) {
            self.set(column.id.clone(), false);
        }
    }

    /// The columns that take part in header, body and footer passes.
    pub fn visible<'a>(&self, columns: &'a [Column]) -> Vec<&'a Column> {
        columns.iter().filter(|c| self.is_visible(&c.id)).collect()
    }
}
