//! Pagination controls.

use crate::state::TableStateMachine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    /// "11-20 of 57"
    pub range_label: String,
    pub can_previous: bool,
    pub can_next: bool,
    /// First/last page buttons, shown once there are more than two pages.
    pub show_first_last: bool,
}

pub(crate) fn range_label(page_index: usize, page_size: usize, total: usize) -> String {
    if total == 0 {
        return "0-0 of 0".to_string();
    }
    let start = page_index * page_size + 1;
    let end = ((page_index + 1) * page_size).min(total);
    format!("{}-{} of {}", start, end, total)
}

/// More than two pages of filtered rows.
fn show_first_last(total: usize, page_size: usize) -> bool {
    page_size > 0 && total > 2 * page_size
}

/// `None` when pagination is disabled.
pub fn build(machine: &TableStateMachine) -> Option<PaginationView> {
    let options = machine.options();
    if !options.enable_pagination {
        return None;
    }
    let pagination = machine.state().pagination;
    let total = machine.filtered_row_count();

    Some(PaginationView {
        page_index: pagination.page_index,
        page_count: machine.page_count(),
        page_size: pagination.page_size,
        page_size_options: options.pagination.page_size_options.clone(),
        range_label: range_label(pagination.page_index, pagination.page_size, total),
        can_previous: machine.can_previous_page(),
        can_next: machine.can_next_page(),
        show_first_last: show_first_last(total, pagination.page_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_label() {
        assert_eq!(range_label(0, 10, 0), "0-0 of 0");
        assert_eq!(range_label(0, 10, 57), "1-10 of 57");
        assert_eq!(range_label(5, 10, 57), "51-57 of 57");
    }

    #[test]
    fn test_show_first_last() {
        assert!(!show_first_last(10, 5));
        assert!(show_first_last(11, 5));
        assert!(!show_first_last(0, 5));
    }
}
