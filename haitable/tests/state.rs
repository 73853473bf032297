//! Tests for the table state machine: sorting, pagination, selection.

use haitable::column::prepare;
use haitable::source::build_rows;
use haitable::sorting::SortDirection;
use haitable::{
    ColumnSpec, RowId, SelectAllMode, SortKey, TableOptions, TableStateMachine,
};
use serde_json::json;

/// Ten rows a page, single selection.
fn base() -> TableOptions {
    TableOptions::default()
        .with_page_size(10)
        .with_multi_row_selection(false)
}

fn machine(count: usize, options: TableOptions) -> TableStateMachine {
    let columns = prepare(
        &options,
        &[
            ColumnSpec::new("title", "Title"),
            ColumnSpec::new("points", "Points"),
            ColumnSpec::new("done", "Done").unsortable(),
        ],
    )
    .unwrap();
    let rows = build_rows(
        (0..count)
            .map(|i| json!({ "title": format!("task {}", i), "points": (i * 7) % 10, "done": i % 2 == 0 }))
            .collect(),
        None,
    );
    TableStateMachine::new(columns, rows, options)
}

fn visible_ids(machine: &TableStateMachine) -> Vec<String> {
    machine
        .visible_rows()
        .iter()
        .map(|r| r.id.to_string())
        .collect()
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn test_sort_cycles_asc_desc_none() {
    let mut m = machine(5, base());

    assert!(m.sort_by("title", false));
    assert_eq!(m.state().sorting, vec![SortKey::asc("title")]);
    assert!(m.sort_by("title", false));
    assert_eq!(m.state().sorting, vec![SortKey::desc("title")]);
    assert!(m.sort_by("title", false));
    assert!(m.state().sorting.is_empty());
}

#[test]
fn test_sort_orders_rows_naturally() {
    let mut m = machine(12, base().with_pagination(false));
    m.sort_by("title", false);
    let ids = visible_ids(&m);
    assert_eq!(&ids[..3], &["0", "1", "2"]);
    assert_eq!(ids.last().map(String::as_str), Some("11"));

    m.sort_by("title", false);
    assert_eq!(visible_ids(&m)[0], "11");
}

#[test]
fn test_single_sort_replaces_other_columns() {
    let mut m = machine(5, base());
    m.sort_by("title", false);
    m.sort_by("points", false);
    assert_eq!(m.state().sorting, vec![SortKey::asc("points")]);
}

#[test]
fn test_multi_sort_appends_and_reports_index() {
    let mut m = machine(5, base());
    m.sort_by("points", false);
    m.sort_by("title", true);
    assert_eq!(
        m.state().sorting,
        vec![SortKey::asc("points"), SortKey::asc("title")]
    );
    assert_eq!(m.sort_index("title"), Some(1));
    assert_eq!(m.sort_direction("points"), Some(SortDirection::Ascending));
}

#[test]
fn test_multi_sort_disabled_behaves_as_single() {
    let mut options = base();
    options.enable_multi_sort = false;
    let mut m = machine(5, options);
    m.sort_by("points", false);
    m.sort_by("title", true);
    assert_eq!(m.state().sorting, vec![SortKey::asc("title")]);
}

#[test]
fn test_sort_on_unsortable_or_display_column_is_noop() {
    let mut m = machine(5, base().with_multi_row_selection(true));
    assert!(!m.sort_by("done", false));
    assert!(!m.sort_by(haitable::SELECT_COLUMN_ID, false));
    assert!(!m.sort_by("nope", false));
    assert!(m.state().sorting.is_empty());
}

#[test]
fn test_null_values_sort_last_both_directions() {
    let options = base();
    let columns = prepare(&options, &[ColumnSpec::new("n", "N")]).unwrap();
    let rows = build_rows(
        vec![json!({ "n": null }), json!({ "n": 2 }), json!({}), json!({ "n": 1 })],
        None,
    );
    let mut m = TableStateMachine::new(columns, rows, options);

    m.sort_by("n", false);
    assert_eq!(visible_ids(&m), vec!["3", "1", "0", "2"]);
    m.sort_by("n", false);
    assert_eq!(visible_ids(&m), vec!["1", "3", "0", "2"]);
}

#[test]
fn test_initial_sorting_applies() {
    let mut options = base();
    options.initial_state.sorting = vec![SortKey::desc("points"), SortKey::asc("done")];
    let m = machine(5, options);
    assert_eq!(m.state().sorting, vec![SortKey::desc("points")]);
}

// =============================================================================
// Pagination
// =============================================================================

#[test]
fn test_page_slices_filtered_rows() {
    let mut m = machine(57, base());
    assert_eq!(m.page_count(), 6);
    assert_eq!(m.visible_rows().len(), 10);
    assert!(!m.can_previous_page());

    m.set_page_index(5);
    assert_eq!(m.visible_rows().len(), 7);
    assert!(!m.can_next_page());
    assert!(!m.next_page());
    assert!(m.previous_page());
    assert_eq!(m.state().pagination.page_index, 4);
}

#[test]
fn test_page_index_clamped_after_filter_shrinks_rows() {
    let mut m = machine(57, base());
    m.set_page_index(5);
    m.set_global_filter("task 1");
    assert_eq!(m.state().pagination.page_index, 0);

    m.set_global_filter("");
    m.set_page_index(5);
    m.set_rows(build_rows(vec![json!({ "title": "only" })], None));
    assert_eq!(m.state().pagination.page_index, 0);
    assert_eq!(m.page_count(), 1);
}

#[test]
fn test_out_of_range_page_index_is_clamped() {
    let mut m = machine(25, base());
    m.set_page_index(99);
    assert_eq!(m.state().pagination.page_index, 2);
}

#[test]
fn test_empty_table_has_one_page() {
    let m = machine(0, base());
    assert_eq!(m.page_count(), 1);
    assert_eq!(m.state().pagination.page_index, 0);
    assert!(m.visible_rows().is_empty());
}

#[test]
fn test_page_size_change_keeps_first_visible_row() {
    let mut m = machine(57, base());
    m.set_page_index(3);
    let first = m.visible_rows()[0].id.clone();

    m.set_page_size(25);
    assert_eq!(m.state().pagination.page_index, 1);
    assert!(m.visible_rows().iter().any(|r| r.id == first));
}

#[test]
fn test_set_pagination_ignores_index_when_size_changes() {
    let mut m = machine(57, base());
    m.set_page_index(2);
    assert!(m.set_pagination(0, 5));
    assert_eq!(m.state().pagination.page_index, 4);
    assert_eq!(m.state().pagination.page_size, 5);

    // Rows 20..25 were showing; at size 20 they live on page 1, not page 0.
    assert!(m.set_pagination(0, 20));
    assert_eq!(m.state().pagination.page_index, 1);
}

#[test]
fn test_default_page_size_is_five() {
    let m = machine(57, TableOptions::default());
    assert_eq!(m.state().pagination.page_size, 5);
    assert_eq!(m.page_count(), 12);
    assert_eq!(m.visible_rows().len(), 5);
}

#[test]
fn test_first_and_last_page() {
    let mut m = machine(57, base());
    assert!(m.last_page());
    assert_eq!(m.state().pagination.page_index, 5);
    assert!(!m.last_page());
    assert!(m.first_page());
    assert_eq!(m.state().pagination.page_index, 0);
    assert!(!m.first_page());
}

#[test]
fn test_zero_page_size_is_ignored() {
    let mut m = machine(57, base());
    assert!(!m.set_page_size(0));
    assert_eq!(m.state().pagination.page_size, 10);
}

#[test]
fn test_pagination_disabled_shows_every_row() {
    let m = machine(57, base().with_pagination(false));
    assert_eq!(m.visible_rows().len(), 57);
    assert_eq!(m.page_count(), 1);
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_single_selection_replaces() {
    let mut m = machine(5, base());
    m.toggle_row_selection(&RowId::from(1usize));
    m.toggle_row_selection(&RowId::from(2usize));
    assert_eq!(m.selected_count(), 1);
    assert!(m.is_row_selected(&RowId::from(2usize)));
}

#[test]
fn test_default_selection_is_multi() {
    let mut m = machine(5, TableOptions::default());
    m.toggle_row_selection(&RowId::from(1usize));
    m.toggle_row_selection(&RowId::from(2usize));
    assert_eq!(m.selected_count(), 2);
}

#[test]
fn test_select_all_counts_rows_with_duplicate_ids() {
    let options = TableOptions::default().with_row_id_field("id");
    let columns = prepare(&options, &[ColumnSpec::new("id", "Id")]).unwrap();
    let rows = build_rows(
        vec![json!({ "id": 1 }), json!({ "id": 1 }), json!({ "id": 2 })],
        options.row_id_field.as_deref(),
    );
    let mut m = TableStateMachine::new(columns, rows, options);
    m.toggle_all_rows_selected(SelectAllMode::All);
    assert_eq!(m.selected_count(), 3);
    assert!(m.is_all_rows_selected());
}

#[test]
fn test_toggle_unknown_row_is_noop() {
    let mut m = machine(5, base().with_multi_row_selection(true));
    assert!(!m.toggle_row_selection(&RowId::new("missing")));
}

#[test]
fn test_tri_state_select_all() {
    let mut m = machine(57, base().with_multi_row_selection(true));

    m.toggle_all_rows_selected(SelectAllMode::All);
    assert_eq!(m.selected_count(), 57);
    assert!(m.is_all_rows_selected());

    m.toggle_row_selection(&RowId::from(3usize));
    assert_eq!(m.selected_count(), 56);
    assert!(m.is_some_rows_selected());
    assert!(!m.is_all_rows_selected());

    m.toggle_all_rows_selected(SelectAllMode::All);
    assert_eq!(m.selected_count(), 57);

    m.toggle_all_rows_selected(SelectAllMode::All);
    assert_eq!(m.selected_count(), 0);
    assert!(!m.is_some_rows_selected());
}

#[test]
fn test_select_all_page_scope() {
    let mut m = machine(57, base().with_multi_row_selection(true));
    m.set_page_index(1);
    m.toggle_select_all();
    assert_eq!(m.selected_count(), 10);
    assert!(m.is_all_page_rows_selected());
    assert!(m.is_some_rows_selected());

    m.next_page();
    assert!(!m.is_some_page_rows_selected());
    assert_eq!(m.selected_count(), 10);
}

#[test]
fn test_set_rows_prunes_selection() {
    let mut m = machine(5, base().with_multi_row_selection(true));
    m.toggle_all_rows_selected(SelectAllMode::All);
    m.set_rows(build_rows(
        vec![json!({ "title": "a" }), json!({ "title": "b" })],
        None,
    ));
    assert_eq!(m.selected_count(), 2);
}

#[test]
fn test_reset_selection() {
    let mut m = machine(5, base().with_multi_row_selection(true));
    m.toggle_all_rows_selected(SelectAllMode::All);
    assert!(m.reset_selection());
    assert_eq!(m.selected_count(), 0);
    assert!(!m.reset_selection());
}

// =============================================================================
// Visibility
// =============================================================================

#[test]
fn test_column_visibility_filters_visible_columns() {
    let mut m = machine(1, base());
    m.set_column_visibility("points", false);
    let ids: Vec<&str> = m.visible_columns().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["title", "done"]);
    assert!(!m.hide_columns());
}
