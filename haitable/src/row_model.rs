//! Derived row model: raw rows -> global filter -> sort -> paginate.
//!
//! Everything here is a pure function of its inputs. The state machine calls
//! [`derive_row_model`] after each committed state change.

use std::collections::HashMap;
use std::ops::Range;

use crate::column::Column;
use crate::filter::{FilterEngine, auto_remove};
use crate::options::TableOptions;
use crate::sorting::compare_rows;
use crate::source::{Row, RowId};
use crate::state::{Pagination, TableState};

/// Filtered and sorted row order, before pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowModel {
    /// Indices into the raw rows, in display order.
    pub order: Vec<usize>,
    /// Filter rank of every row that passed an active filter.
    pub ranks: HashMap<RowId, u32>,
}

impl RowModel {
    /// Number of rows that passed the filter.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Filter rank of a row, if a filter was active and it passed.
    pub fn rank(&self, id: &RowId) -> Option<u32> {
        self.ranks.get(id).copied()
    }
}

/// Whether the global filter currently narrows the rows.
pub fn filter_active(state: &TableState, options: &TableOptions) -> bool {
    options.enable_global_filter && !state.global_filter.trim().is_empty()
}

/// Run the filter and sort stages.
pub fn derive_row_model(
    rows: &[Row],
    columns: &[Column],
    state: &TableState,
    options: &TableOptions,
    filter: &mut FilterEngine,
) -> RowModel {
    let active = filter_active(state, options);
    let mut ranks = HashMap::new();

    let mut order: Vec<usize> = if active {
        filter
            .rank_rows(rows, columns, &state.global_filter)
            .into_iter()
            .enumerate()
            .filter(|(_, rank)| !auto_remove(Some(rank), &state.global_filter))
            .map(|(i, rank)| {
                ranks.insert(rank.row_id, rank.rank);
                i
            })
            .collect()
    } else {
        (0..rows.len()).collect()
    };

    if !state.sorting.is_empty() {
        order.sort_by(|&a, &b| compare_rows(&rows[a], &rows[b], columns, &state.sorting));
    } else if active && options.enable_global_filter_ranked_results {
        order.sort_by(|&a, &b| {
            let ra = ranks.get(&rows[a].id).copied().unwrap_or(0);
            let rb = ranks.get(&rows[b].id).copied().unwrap_or(0);
            rb.cmp(&ra)
        });
    }

    RowModel { order, ranks }
}

/// Number of pages for `row_count` rows. Never less than one.
pub fn page_count(row_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    row_count.div_ceil(page_size).max(1)
}

/// Clamp a page index into `[0, page_count - 1]`.
pub fn clamp_page_index(page_index: usize, row_count: usize, page_size: usize) -> usize {
    page_index.min(page_count(row_count, page_size) - 1)
}

/// Positions within the row model shown on the current page.
pub fn page_range(row_count: usize, pagination: &Pagination, enabled: bool) -> Range<usize> {
    if !enabled || pagination.page_size == 0 {
        return 0..row_count;
    }
    let start = (pagination.page_index * pagination.page_size).min(row_count);
    let end = (start + pagination.page_size).min(row_count);
    start..end
}

/// The full pipeline in one call: the rows a table would show.
pub fn derive_visible_rows(
    rows: &[Row],
    columns: &[Column],
    state: &TableState,
    options: &TableOptions,
) -> Vec<Row> {
    let mut filter = FilterEngine::new(options.global_filter_fn);
    let model = derive_row_model(rows, columns, state, options, &mut filter);
    let mut pagination = state.pagination;
    pagination.page_index =
        clamp_page_index(pagination.page_index, model.len(), pagination.page_size);
    model.order[page_range(model.len(), &pagination, options.enable_pagination)]
        .iter()
        .map(|&i| rows[i].clone())
        .collect()
}
