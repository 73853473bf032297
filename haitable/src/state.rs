//! Table state and the state machine that owns it.
//!
//! State transitions are a pure reducer, [`reduce`]. [`TableStateMachine`]
//! applies events in dispatch order, re-derives the row model from the
//! committed state, and clamps the page index afterwards.

use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnVisibility};
use crate::filter::FilterEngine;
use crate::options::{SelectAllMode, TableOptions};
use crate::row_model::{self, RowModel, clamp_page_index, derive_row_model, page_range};
use crate::selection::{Selection, SelectionMode};
use crate::sorting::{SortDirection, SortKey, cycle_sort};
use crate::source::{Row, RowId};

// =============================================================================
// TableState
// =============================================================================

/// Current page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

/// The single authoritative table state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub sorting: Vec<SortKey>,
    pub pagination: Pagination,
    pub row_selection: Selection<RowId>,
    pub global_filter: String,
    pub column_visibility: ColumnVisibility,
}

impl TableState {
    /// Initial state for the given options and columns.
    pub fn initial(options: &TableOptions, columns: &[Column]) -> Self {
        let mode = if options.enable_multi_row_selection {
            SelectionMode::Multi
        } else {
            SelectionMode::Single
        };
        let mut column_visibility = ColumnVisibility::new();
        column_visibility.hide_columns(columns);

        let sorting = options
            .initial_state
            .sorting
            .iter()
            .filter(|key| columns.iter().any(|c| c.id == key.id && c.can_sort()))
            .cloned()
            .collect();

        Self {
            sorting,
            pagination: Pagination {
                page_index: options.initial_state.pagination.page_index,
                page_size: options.pagination.page_size,
            },
            row_selection: Selection::new(mode),
            global_filter: options.initial_state.global_filter.clone(),
            column_visibility,
        }
    }
}

// =============================================================================
// Events and reducer
// =============================================================================

/// Every way the table state can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    SortBy { column_id: String, multi: bool },
    ClearSorting,
    SetPagination { page_index: usize, page_size: usize },
    SetGlobalFilter(String),
    ToggleRowSelection(RowId),
    ToggleAllRowsSelected(SelectAllMode),
    ResetSelection,
    SetColumnVisibility { column_id: String, visible: bool },
    HideColumns,
}

/// Read-only inputs the reducer consults.
#[derive(Debug, Clone, Copy)]
pub struct ReduceContext<'a> {
    pub columns: &'a [Column],
    pub rows: &'a [Row],
    pub options: &'a TableOptions,
    pub model: &'a RowModel,
}

impl ReduceContext<'_> {
    fn scope_ids(&self, state: &TableState, scope: SelectAllMode) -> Vec<RowId> {
        let range = match scope {
            SelectAllMode::Page => {
                let mut pagination = state.pagination;
                pagination.page_index = clamp_page_index(
                    pagination.page_index,
                    self.model.len(),
                    pagination.page_size,
                );
                page_range(self.model.len(), &pagination, self.options.enable_pagination)
            }
            SelectAllMode::All => 0..self.model.len(),
        };
        self.model.order[range]
            .iter()
            .map(|&i| self.rows[i].id.clone())
            .collect()
    }
}

/// Apply one event to a state.
///
/// Interactive input that makes no sense (sorting a display column, a zero
/// page size, an unknown row id) leaves the state unchanged.
pub fn reduce(state: &TableState, event: &TableEvent, cx: &ReduceContext<'_>) -> TableState {
    let mut next = state.clone();
    match event {
        TableEvent::SortBy { column_id, multi } => {
            let sortable = cx
                .columns
                .iter()
                .any(|c| c.id == *column_id && c.can_sort());
            if !sortable {
                log::debug!("Ignoring sort on unsortable column '{}'", column_id);
                return next;
            }
            let multi = *multi && cx.options.enable_multi_sort;
            next.sorting = cycle_sort(&state.sorting, column_id, multi);
        }
        TableEvent::ClearSorting => next.sorting.clear(),
        TableEvent::SetPagination {
            page_index,
            page_size,
        } => {
            if *page_size == 0 {
                return next;
            }
            if *page_size != state.pagination.page_size {
                let first_visible = state.pagination.page_index * state.pagination.page_size;
                next.pagination.page_index = first_visible / page_size;
            } else {
                next.pagination.page_index = *page_index;
            }
            next.pagination.page_size = *page_size;
        }
        TableEvent::SetGlobalFilter(text) => {
            if *text != state.global_filter {
                next.global_filter = text.clone();
                next.pagination.page_index = 0;
            }
        }
        TableEvent::ToggleRowSelection(id) => {
            if cx.rows.iter().any(|r| r.id == *id) {
                next.row_selection.toggle(id.clone());
            }
        }
        TableEvent::ToggleAllRowsSelected(scope) => {
            let ids = cx.scope_ids(state, *scope);
            let all_selected =
                !ids.is_empty() && ids.iter().all(|id| state.row_selection.is_selected(id));
            if all_selected {
                next.row_selection.deselect_all(&ids);
            } else {
                next.row_selection.select_all(&ids);
            }
        }
        TableEvent::ResetSelection => next.row_selection.clear(),
        TableEvent::SetColumnVisibility { column_id, visible } => {
            next.column_visibility.set(column_id.clone(), *visible);
        }
        TableEvent::HideColumns => next.column_visibility.hide_columns(cx.columns),
    }
    next
}

// =============================================================================
// TableStateMachine
// =============================================================================

/// Owns the table state and the row model derived from it.
#[derive(Debug)]
pub struct TableStateMachine {
    columns: Vec<Column>,
    rows: Vec<Row>,
    options: TableOptions,
    state: TableState,
    model: RowModel,
    filter: FilterEngine,
}

impl TableStateMachine {
    /// Create a state machine; declared-hidden columns start hidden.
    pub fn new(columns: Vec<Column>, rows: Vec<Row>, options: TableOptions) -> Self {
        let state = TableState::initial(&options, &columns);
        let filter = FilterEngine::new(options.global_filter_fn);
        let mut machine = Self {
            columns,
            rows,
            options,
            state,
            model: RowModel::default(),
            filter,
        };
        machine.recompute();
        machine
    }

    fn recompute(&mut self) {
        self.model = derive_row_model(
            &self.rows,
            &self.columns,
            &self.state,
            &self.options,
            &mut self.filter,
        );
        let pagination = &mut self.state.pagination;
        let clamped =
            clamp_page_index(pagination.page_index, self.model.len(), pagination.page_size);
        if clamped != pagination.page_index {
            log::debug!(
                "Clamping page index {} -> {} ({} rows)",
                pagination.page_index,
                clamped,
                self.model.len()
            );
            pagination.page_index = clamped;
        }
    }

    /// Apply an event and re-derive. Returns whether the state changed.
    pub fn dispatch(&mut self, event: TableEvent) -> bool {
        let cx = ReduceContext {
            columns: &self.columns,
            rows: &self.rows,
            options: &self.options,
            model: &self.model,
        };
        let next = reduce(&self.state, &event, &cx);
        if next == self.state {
            return false;
        }
        self.state = next;
        self.recompute();
        true
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    /// Cycle sorting on a column.
    pub fn sort_by(&mut self, column_id: &str, multi: bool) -> bool {
        self.dispatch(TableEvent::SortBy {
            column_id: column_id.to_string(),
            multi,
        })
    }

    pub fn clear_sorting(&mut self) -> bool {
        self.dispatch(TableEvent::ClearSorting)
    }

    /// Set page index and page size together.
    ///
    /// When `page_size` differs from the current size, `page_index` is
    /// ignored: the new page is the one holding the first row of the page
    /// shown before. A zero page size is ignored entirely.
    pub fn set_pagination(&mut self, page_index: usize, page_size: usize) -> bool {
        self.dispatch(TableEvent::SetPagination {
            page_index,
            page_size,
        })
    }

    pub fn set_page_index(&mut self, page_index: usize) -> bool {
        let page_size = self.state.pagination.page_size;
        self.set_pagination(page_index, page_size)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_index = self.state.pagination.page_index;
        self.set_pagination(page_index, page_size)
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_next_page() {
            return false;
        }
        self.set_page_index(self.state.pagination.page_index + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.can_previous_page() {
            return false;
        }
        self.set_page_index(self.state.pagination.page_index - 1)
    }

    pub fn first_page(&mut self) -> bool {
        self.options.enable_pagination && self.set_page_index(0)
    }

    pub fn last_page(&mut self) -> bool {
        self.options.enable_pagination && self.set_page_index(self.page_count() - 1)
    }

    pub fn set_global_filter(&mut self, text: &str) -> bool {
        self.dispatch(TableEvent::SetGlobalFilter(text.to_string()))
    }

    pub fn toggle_row_selection(&mut self, id: &RowId) -> bool {
        self.dispatch(TableEvent::ToggleRowSelection(id.clone()))
    }

    /// Tri-state select all over `scope`: partial or none -> all, all -> none.
    pub fn toggle_all_rows_selected(&mut self, scope: SelectAllMode) -> bool {
        self.dispatch(TableEvent::ToggleAllRowsSelected(scope))
    }

    /// Select all using the configured `selectAllMode`.
    pub fn toggle_select_all(&mut self) -> bool {
        self.toggle_all_rows_selected(self.options.select_all_mode)
    }

    pub fn reset_selection(&mut self) -> bool {
        self.dispatch(TableEvent::ResetSelection)
    }

    pub fn set_column_visibility(&mut self, column_id: &str, visible: bool) -> bool {
        self.dispatch(TableEvent::SetColumnVisibility {
            column_id: column_id.to_string(),
            visible,
        })
    }

    /// Hide every column declared hidden.
    pub fn hide_columns(&mut self) -> bool {
        self.dispatch(TableEvent::HideColumns)
    }

    /// Replace the rows. Selection keeps only ids still present.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        let rows = &self.rows;
        self.state
            .row_selection
            .retain(|id| rows.iter().any(|r| r.id == *id));
        self.recompute();
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    /// Columns that take part in render passes.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.state.column_visibility.visible(&self.columns)
    }

    /// All rows, unfiltered.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == *id)
    }

    pub fn row_model(&self) -> &RowModel {
        &self.model
    }

    /// Filtered and sorted rows across all pages.
    pub fn filtered_rows(&self) -> Vec<&Row> {
        self.model.order.iter().map(|&i| &self.rows[i]).collect()
    }

    pub fn filtered_row_count(&self) -> usize {
        self.model.len()
    }

    /// Rows of the current page, in display order.
    pub fn visible_rows(&self) -> Vec<&Row> {
        let range = page_range(
            self.model.len(),
            &self.state.pagination,
            self.options.enable_pagination,
        );
        self.model.order[range].iter().map(|&i| &self.rows[i]).collect()
    }

    pub fn page_count(&self) -> usize {
        if !self.options.enable_pagination {
            return 1;
        }
        row_model::page_count(self.model.len(), self.state.pagination.page_size)
    }

    pub fn can_previous_page(&self) -> bool {
        self.options.enable_pagination && self.state.pagination.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.options.enable_pagination && self.state.pagination.page_index + 1 < self.page_count()
    }

    pub fn selected_count(&self) -> usize {
        self.state.row_selection.len()
    }

    pub fn is_row_selected(&self, id: &RowId) -> bool {
        self.state.row_selection.is_selected(id)
    }

    /// Selected rows in data order.
    pub fn selected_rows(&self) -> Vec<&Row> {
        self.rows
            .iter()
            .filter(|r| self.state.row_selection.is_selected(&r.id))
            .collect()
    }

    fn count_selected<'a>(&self, rows: impl Iterator<Item = &'a Row>) -> (usize, usize) {
        rows.fold((0, 0), |(total, selected), row| {
            let hit = self.state.row_selection.is_selected(&row.id) as usize;
            (total + 1, selected + hit)
        })
    }

    /// Every filtered row is selected.
    pub fn is_all_rows_selected(&self) -> bool {
        let (total, selected) = self.count_selected(self.filtered_rows().into_iter());
        total > 0 && selected == total
    }

    /// Some, but not all, filtered rows are selected.
    pub fn is_some_rows_selected(&self) -> bool {
        let (total, selected) = self.count_selected(self.filtered_rows().into_iter());
        selected > 0 && selected < total
    }

    pub fn is_all_page_rows_selected(&self) -> bool {
        let (total, selected) = self.count_selected(self.visible_rows().into_iter());
        total > 0 && selected == total
    }

    pub fn is_some_page_rows_selected(&self) -> bool {
        let (total, selected) = self.count_selected(self.visible_rows().into_iter());
        selected > 0 && selected < total
    }

    /// Sort direction of a column, if it is part of the sort order.
    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.state
            .sorting
            .iter()
            .find(|k| k.id == column_id)
            .map(|k| {
                if k.desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                }
            })
    }

    /// Position of a column in the sort order.
    pub fn sort_index(&self, column_id: &str) -> Option<usize> {
        self.state.sorting.iter().position(|k| k.id == column_id)
    }
}
