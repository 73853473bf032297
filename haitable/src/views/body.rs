//! Body view: the materialized rows of the current page.

use crate::column::Column;
use crate::render::CellContent;
use crate::source::{Row, RowId};
use crate::state::TableStateMachine;
use crate::virtualize::{RowHeights, VirtualWindow, WindowConfig, compute_window_for};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyCellView {
    pub column_id: String,
    pub content: CellContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRowView {
    pub row_id: RowId,
    /// Position within the current page.
    pub position: usize,
    pub selected: bool,
    pub cells: Vec<BodyCellView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BodyView {
    pub rows: Vec<BodyRowView>,
    pub window: VirtualWindow,
    /// Number of rows on the page, materialized or not.
    pub page_row_count: usize,
}

impl BodyView {
    pub fn top_padding_px(&self) -> u64 {
        self.window.top_padding_px
    }

    pub fn bottom_padding_px(&self) -> u64 {
        self.window.bottom_padding_px
    }

    pub fn total_height_px(&self) -> u64 {
        self.window.total_content_height_px
    }

    /// No rows on the page.
    pub fn is_empty(&self) -> bool {
        self.page_row_count == 0
    }
}

fn cell(machine: &TableStateMachine, column: &Column, row: &Row) -> BodyCellView {
    let content = if column.is_display() {
        CellContent::Checkbox {
            checked: machine.is_row_selected(&row.id),
            indeterminate: false,
        }
    } else {
        column.render_cell(row)
    };
    BodyCellView {
        column_id: column.id.clone(),
        content,
    }
}

/// Build the body for a scroll position.
///
/// `measured` reports a row's measured height, if any.
pub fn build(
    machine: &TableStateMachine,
    config: &WindowConfig,
    scroll_top: u64,
    viewport_height: u64,
    measured: impl Fn(&RowId) -> Option<u32>,
) -> BodyView {
    let page = machine.visible_rows();
    let heights = RowHeights::measured(page.len(), config.row_height, |i| measured(&page[i].id));
    let window = compute_window_for(config, scroll_top, viewport_height, &heights);
    let columns = machine.visible_columns();

    let rows = page[window.range()]
        .iter()
        .enumerate()
        .map(|(offset, row)| BodyRowView {
            row_id: row.id.clone(),
            position: window.start_index + offset,
            selected: machine.is_row_selected(&row.id),
            cells: columns.iter().map(|c| cell(machine, c, row)).collect(),
        })
        .collect();

    BodyView {
        rows,
        window,
        page_row_count: page.len(),
    }
}
