//! Header row view.

use crate::column::Column;
use crate::options::SelectAllMode;
use crate::sorting::SortDirection;
use crate::state::TableStateMachine;

/// Tri-state checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckboxState {
    Unchecked,
    Checked,
    Indeterminate,
}

impl CheckboxState {
    fn from_flags(all: bool, some: bool) -> Self {
        if all {
            CheckboxState::Checked
        } else if some {
            CheckboxState::Indeterminate
        } else {
            CheckboxState::Unchecked
        }
    }
}

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCellView {
    pub column_id: String,
    pub label: String,
    pub size: u32,
    pub min_width: u32,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
    /// 1-based position in a multi-column sort.
    pub sort_index: Option<usize>,
    /// Present on the selection column when select-all is enabled.
    pub select_all: Option<CheckboxState>,
}

/// The header row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeadView {
    pub cells: Vec<HeaderCellView>,
}

/// State of the select-all checkbox under the configured mode.
pub fn select_all_state(machine: &TableStateMachine) -> CheckboxState {
    match machine.options().select_all_mode {
        SelectAllMode::Page => CheckboxState::from_flags(
            machine.is_all_page_rows_selected(),
            machine.is_some_page_rows_selected(),
        ),
        SelectAllMode::All => CheckboxState::from_flags(
            machine.is_all_rows_selected(),
            machine.is_some_rows_selected(),
        ),
    }
}

fn header_cell(machine: &TableStateMachine, column: &Column, multi_sorted: bool) -> HeaderCellView {
    HeaderCellView {
        column_id: column.id.clone(),
        label: column.render_header(),
        size: column.size,
        min_width: column.min_width,
        sortable: column.can_sort(),
        sort: machine.sort_direction(&column.id),
        sort_index: machine
            .sort_index(&column.id)
            .filter(|_| multi_sorted)
            .map(|i| i + 1),
        select_all: column
            .header_select_all
            .then(|| select_all_state(machine)),
    }
}

pub fn build(machine: &TableStateMachine) -> HeadView {
    let multi_sorted = machine.state().sorting.len() > 1;
    HeadView {
        cells: machine
            .visible_columns()
            .into_iter()
            .map(|column| header_cell(machine, column, multi_sorted))
            .collect(),
    }
}
