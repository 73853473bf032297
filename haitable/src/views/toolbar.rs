//! Top and bottom toolbars.
//!
//! The top toolbar carries the search box and, for certification tables, the
//! certification dropdown. The bottom toolbar carries the selection counter
//! and the pagination controls.

use crate::state::TableStateMachine;
use crate::views::pagination::{self, PaginationView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBoxView {
    /// Text as typed, possibly ahead of the applied filter.
    pub value: String,
    pub placeholder: String,
    /// A debounced filter update is waiting to be applied.
    pub pending: bool,
    /// The clear button does something.
    pub can_clear: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CertDropdownView {
    pub states: Vec<String>,
    /// Certifying acts on the selected rows, so it needs some.
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolbarTopView {
    pub search: Option<SearchBoxView>,
    pub cert_dropdown: Option<CertDropdownView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolbarBottomView {
    /// "2 of 57 total rows selected"
    pub selection_count: Option<String>,
    pub pagination: Option<PaginationView>,
}

/// Counter text over every row, filtered or not.
pub fn selection_count_label(selected: usize, total: usize) -> String {
    format!("{} of {} total rows selected", selected, total)
}

pub fn build_top(
    machine: &TableStateMachine,
    search_draft: &str,
    search_pending: bool,
) -> Option<ToolbarTopView> {
    let options = machine.options();
    if !options.enable_toolbar_top {
        return None;
    }
    let search = options.enable_global_filter.then(|| SearchBoxView {
        value: search_draft.to_string(),
        placeholder: "search".to_string(),
        pending: search_pending,
        can_clear: !search_draft.is_empty() || !machine.state().global_filter.is_empty(),
    });
    let cert_dropdown = options.cert_dropdown_enabled().then(|| CertDropdownView {
        states: options.cert_states.clone(),
        enabled: machine.selected_count() > 0,
    });
    Some(ToolbarTopView {
        search,
        cert_dropdown,
    })
}

pub fn build_bottom(machine: &TableStateMachine) -> Option<ToolbarBottomView> {
    let options = machine.options();
    if !options.enable_toolbar_bottom {
        return None;
    }
    let selected = machine.selected_count();
    let selection_count = (options.enable_selection_counts && selected > 0)
        .then(|| selection_count_label(selected, machine.rows().len()));
    Some(ToolbarBottomView {
        selection_count,
        pagination: pagination::build(machine),
    })
}
