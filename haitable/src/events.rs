//! Pointer events and the handlers a table exposes outward.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::source::{Row, RowId};

/// Which pointer interaction happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Click,
    DoubleClick,
    Hover,
    Leave,
}

/// Where the pointer landed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PointerTarget {
    /// A row, outside any cell.
    Row(RowId),
    /// One cell. Also counts as the cell's row.
    Cell { row_id: RowId, column_id: String },
}

impl PointerTarget {
    pub fn cell(row_id: impl Into<RowId>, column_id: impl Into<String>) -> Self {
        PointerTarget::Cell {
            row_id: row_id.into(),
            column_id: column_id.into(),
        }
    }

    pub fn row(row_id: impl Into<RowId>) -> Self {
        PointerTarget::Row(row_id.into())
    }

    pub fn row_id(&self) -> &RowId {
        match self {
            PointerTarget::Row(row_id) | PointerTarget::Cell { row_id, .. } => row_id,
        }
    }

    pub fn column_id(&self) -> Option<&str> {
        match self {
            PointerTarget::Row(_) => None,
            PointerTarget::Cell { column_id, .. } => Some(column_id),
        }
    }
}

/// Metadata passed to every handler alongside the row data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub row_id: RowId,
    /// Index of the row in the source data.
    pub row_index: usize,
    /// Set for cell handlers.
    pub column_id: Option<String>,
}

/// A handler invoked with `(event, row data)`.
pub type Handler = Arc<dyn Fn(&PointerEvent, &Value) + Send + Sync>;

/// A certification handler invoked with `(state, selected rows)`.
pub type CertifyHandler = Arc<dyn Fn(&str, &[Row]) + Send + Sync>;

/// The outward event handlers of a table.
#[derive(Clone, Default)]
pub struct TableHandlers {
    pub on_cell_click: Option<Handler>,
    pub on_cell_double_click: Option<Handler>,
    pub on_cell_hover: Option<Handler>,
    pub on_cell_leave: Option<Handler>,
    pub on_row_click: Option<Handler>,
    pub on_row_double_click: Option<Handler>,
    pub on_row_hover: Option<Handler>,
    pub on_row_leave: Option<Handler>,
    pub on_certify_change: Option<CertifyHandler>,
}

impl fmt::Debug for TableHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableHandlers")
            .field("on_cell_click", &self.on_cell_click.is_some())
            .field("on_cell_double_click", &self.on_cell_double_click.is_some())
            .field("on_cell_hover", &self.on_cell_hover.is_some())
            .field("on_cell_leave", &self.on_cell_leave.is_some())
            .field("on_row_click", &self.on_row_click.is_some())
            .field("on_row_double_click", &self.on_row_double_click.is_some())
            .field("on_row_hover", &self.on_row_hover.is_some())
            .field("on_row_leave", &self.on_row_leave.is_some())
            .field("on_certify_change", &self.on_certify_change.is_some())
            .finish()
    }
}

macro_rules! handler_setter {
    ($name:ident) => {
        pub fn $name<F>(mut self, f: F) -> Self
        where
            F: Fn(&PointerEvent, &Value) + Send + Sync + 'static,
        {
            self.$name = Some(Arc::new(f));
            self
        }
    };
}

impl TableHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    handler_setter!(on_cell_click);
    handler_setter!(on_cell_double_click);
    handler_setter!(on_cell_hover);
    handler_setter!(on_cell_leave);
    handler_setter!(on_row_click);
    handler_setter!(on_row_double_click);
    handler_setter!(on_row_hover);
    handler_setter!(on_row_leave);

    pub fn on_certify_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &[Row]) + Send + Sync + 'static,
    {
        self.on_certify_change = Some(Arc::new(f));
        self
    }
}
