//! Tests for global filter ranking and the filter stage of the row model.

use haitable::column::prepare;
use haitable::filter::{FilterEngine, FilterRank, auto_remove};
use haitable::row_model::derive_visible_rows;
use haitable::source::build_rows;
use haitable::{ColumnSpec, GlobalFilterFn, RowId, TableOptions, TableState};
use serde_json::json;

fn fixture() -> (Vec<haitable::Column>, Vec<haitable::Row>) {
    let columns = prepare(
        &TableOptions::default(),
        &[
            ColumnSpec::new("title", "Title"),
            ColumnSpec::new("owner", "Owner"),
            ColumnSpec::new("points", "Points"),
        ],
    )
    .unwrap();
    let rows = build_rows(
        vec![
            json!({ "title": "Fix login redirect", "owner": "ada", "points": 3 }),
            json!({ "title": "Certification export", "owner": "grace", "points": 8 }),
            json!({ "title": "Login page copy", "owner": "linus", "points": 1 }),
            json!({ "title": "Out-reason table", "owner": null, "points": 5 }),
        ],
        None,
    );
    (columns, rows)
}

fn with_filter(text: &str, options: &TableOptions, columns: &[haitable::Column]) -> TableState {
    let mut state = TableState::initial(options, columns);
    state.global_filter = text.to_string();
    state
}

fn ids(rows: &[haitable::Row]) -> Vec<String> {
    rows.iter().map(|r| r.id.to_string()).collect()
}

#[test]
fn test_empty_filter_is_identity() {
    let (columns, rows) = fixture();
    let options = TableOptions::default();
    let state = with_filter("   ", &options, &columns);
    let visible = derive_visible_rows(&rows, &columns, &state, &options);
    assert_eq!(ids(&visible), vec!["0", "1", "2", "3"]);
}

#[test]
fn test_filter_result_is_subset_in_data_order() {
    let (columns, rows) = fixture();
    let options = TableOptions::default();
    let state = with_filter("login", &options, &columns);
    let visible = derive_visible_rows(&rows, &columns, &state, &options);
    assert_eq!(ids(&visible), vec!["0", "2"]);
}

#[test]
fn test_filter_is_deterministic() {
    let (columns, rows) = fixture();
    let options = TableOptions::default();
    let state = with_filter("lgn", &options, &columns);
    let first = derive_visible_rows(&rows, &columns, &state, &options);
    let second = derive_visible_rows(&rows, &columns, &state, &options);
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn test_fuzzy_matches_subsequence() {
    let mut engine = FilterEngine::new(GlobalFilterFn::Fuzzy);
    assert!(engine.matches(Some(&json!("Certification export")), "crtexp").passed);
    assert!(!engine.matches(Some(&json!("Certification export")), "zzz").passed);
}

#[test]
fn test_numbers_and_booleans_are_matched_as_text() {
    let mut engine = FilterEngine::new(GlobalFilterFn::Contains);
    assert!(engine.matches(Some(&json!(1234)), "23").passed);
    assert!(engine.matches(Some(&json!(true)), "true").passed);
}

#[test]
fn test_null_missing_and_objects_never_match() {
    let mut engine = FilterEngine::new(GlobalFilterFn::Fuzzy);
    assert!(!engine.matches(None, "a").passed);
    assert!(!engine.matches(Some(&json!(null)), "null").passed);
    assert!(!engine.matches(Some(&json!({ "a": "a" })), "a").passed);
    assert!(!engine.matches(Some(&json!(["a"])), "a").passed);
}

#[test]
fn test_contains_ranks_exact_over_prefix_over_infix() {
    let mut engine = FilterEngine::new(GlobalFilterFn::Contains);
    let exact = engine.matches(Some(&json!("Login")), "login").rank;
    let prefix = engine.matches(Some(&json!("Login page")), "login").rank;
    let infix = engine.matches(Some(&json!("Fix login")), "login").rank;
    assert!(exact > prefix);
    assert!(prefix > infix);
}

#[test]
fn test_row_passes_if_any_column_passes() {
    let (columns, rows) = fixture();
    let mut engine = FilterEngine::new(GlobalFilterFn::Contains);
    let rank = engine.rank_row(&rows[1], &columns, "grace");
    assert!(rank.passed);
    assert_eq!(rank.row_id, RowId::from(1usize));
}

#[test]
fn test_unfilterable_columns_are_skipped() {
    let columns = prepare(
        &TableOptions::default(),
        &[ColumnSpec {
            filterable: Some(false),
            ..ColumnSpec::new("secret", "Secret")
        }],
    )
    .unwrap();
    let rows = build_rows(vec![json!({ "secret": "needle" })], None);
    let mut engine = FilterEngine::default();
    assert!(!engine.rank_row(&rows[0], &columns, "needle").passed);
}

#[test]
fn test_auto_remove() {
    let passing = FilterRank {
        row_id: RowId::new("a"),
        passed: true,
        rank: 1,
    };
    let failing = FilterRank {
        passed: false,
        ..passing.clone()
    };
    assert!(!auto_remove(None, ""));
    assert!(!auto_remove(Some(&failing), ""));
    assert!(auto_remove(None, "x"));
    assert!(auto_remove(Some(&failing), "x"));
    assert!(!auto_remove(Some(&passing), "x"));
}

#[test]
fn test_ranked_results_order_by_rank_without_sorting() {
    let columns = prepare(&TableOptions::default(), &[ColumnSpec::new("title", "Title")]).unwrap();
    let rows = build_rows(
        vec![
            json!({ "title": "fix login" }),
            json!({ "title": "login" }),
            json!({ "title": "login page" }),
        ],
        None,
    );
    let options = TableOptions::default()
        .with_global_filter_fn(GlobalFilterFn::Contains)
        .with_ranked_results(true);
    let state = with_filter("login", &options, &columns);
    let visible = derive_visible_rows(&rows, &columns, &state, &options);
    assert_eq!(ids(&visible), vec!["1", "2", "0"]);
}

#[test]
fn test_disabled_global_filter_ignores_text() {
    let (columns, rows) = fixture();
    let options = TableOptions::default().with_global_filter(false);
    let state = with_filter("login", &options, &columns);
    let visible = derive_visible_rows(&rows, &columns, &state, &options);
    assert_eq!(visible.len(), 4);
}
