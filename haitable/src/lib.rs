//! HaiTable: a data-table engine.
//!
//! Columns and options are declared once; rows come inline or by reference
//! into a data document. The table owns sorting, filtering, pagination,
//! selection and visibility state, derives the visible rows from it, and
//! produces headless view models for whatever surface draws them.
//!
//! ```no_run
//! use haitable::{HaiTable, TableConfig};
//!
//! let config = TableConfig::from_json(r#"{
//!     "columns": [{ "field": "name", "title": "Name" }],
//!     "rows": [{ "name": "ada" }, { "name": "grace" }]
//! }"#)?;
//! let table = HaiTable::new(config)?;
//! table.sort_by("name", false);
//! let view = table.render();
//! assert_eq!(view.body.rows.len(), 2);
//! # Ok::<(), haitable::Error>(())
//! ```

pub mod column;
pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod interaction;
pub mod options;
pub mod render;
pub mod row_model;
pub mod selection;
pub mod sorting;
pub mod source;
pub mod state;
pub mod table;
pub mod timer;
pub mod views;
pub mod virtualize;

pub use column::{Column, ColumnSpec, ColumnType, SELECT_COLUMN_ID};
pub use config::TableConfig;
pub use error::{
    ConfigurationError, DataResolutionError, Error, TimerError, TransientFetchError,
};
pub use events::{CertifyHandler, PointerEvent, PointerEventKind, PointerTarget, TableHandlers};
pub use interaction::{ClickDisambiguator, ClickOutcome, InteractionKey, PendingClick};
pub use options::{GlobalFilterFn, SelectAllMode, TableOptions, TableType};
pub use render::{CellContent, RendererRegistry};
pub use selection::{Selection, SelectionMode};
pub use sorting::{SortDirection, SortKey};
pub use source::{Row, RowId, RowSource};
pub use state::{Pagination, TableEvent, TableState, TableStateMachine};
pub use table::{HaiTable, HaiTableBuilder, TableId};
pub use views::TableView;
pub use virtualize::{VirtualWindow, WindowConfig};
