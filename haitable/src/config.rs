//! Table configuration document.
//!
//! ```json
//! {
//!   "tableType": "HaiTable",
//!   "columns": [{ "field": "title", "title": "Title" }],
//!   "options": { "enablePagination": true },
//!   "rowsRef": "payload.tasks",
//!   "extraData": { "payload": { "tasks": [] } }
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::column::ColumnSpec;
use crate::error::ConfigurationError;
use crate::options::{TableOptions, TableType};
use crate::source::RowSource;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    table_type: TableType,
    #[serde(default)]
    columns: Vec<ColumnSpec>,
    #[serde(default)]
    options: TableOptions,
    rows: Option<Vec<Value>>,
    rows_ref: Option<String>,
    #[serde(default)]
    extra_data: Value,
}

/// Everything a table needs at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableConfig {
    pub table_type: TableType,
    pub columns: Vec<ColumnSpec>,
    pub options: TableOptions,
    pub source: RowSource,
}

impl TableConfig {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            ..Default::default()
        }
    }

    pub fn with_table_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_rows(mut self, rows: Vec<Value>) -> Self {
        self.source = RowSource::Rows(rows);
        self
    }

    pub fn with_rows_ref(mut self, path: impl Into<String>, extra_data: Value) -> Self {
        self.source = RowSource::reference(path, extra_data);
        self
    }

    /// Parse a configuration document.
    ///
    /// `rowsRef` takes precedence over `rows` when both are present.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        raw.options.validate()?;
        let source = match (raw.rows_ref, raw.rows) {
            (Some(path), _) => RowSource::reference(path, raw.extra_data),
            (None, Some(rows)) => RowSource::Rows(rows),
            (None, None) => RowSource::default(),
        };
        Ok(Self {
            table_type: raw.table_type,
            columns: raw.columns,
            options: raw.options,
            source,
        })
    }
}
