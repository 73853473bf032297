//! Tests for configuration parsing.

use std::time::Duration;

use haitable::{
    ConfigurationError, GlobalFilterFn, RowSource, SelectAllMode, TableConfig, TableOptions,
    TableType,
};
use serde_json::json;

#[test]
fn test_option_defaults() {
    let options = TableOptions::default();
    assert!(options.enable_toolbar_top);
    assert!(options.enable_toolbar_bottom);
    assert!(options.enable_table_head);
    assert!(options.enable_table_footer);
    assert!(options.enable_global_filter);
    assert!(options.enable_pagination);
    assert!(options.enable_row_virtualization);
    assert!(options.enable_multi_row_selection);
    assert!(options.enable_select_all);
    assert!(options.enable_selection_counts);
    assert_eq!(options.enable_cert_dropdown, None);
    assert_eq!(options.select_all_mode, SelectAllMode::Page);
    assert_eq!(options.pagination.page_size, 5);
    assert_eq!(options.pagination.page_size_options, vec![5, 25, 50, 100]);
    assert_eq!(options.row_virtualizer_options.estimate_size, 36);
    assert_eq!(options.row_virtualizer_options.overscan, 15);
    assert_eq!(options.click_delay(), Duration::from_millis(250));
    assert_eq!(options.search_debounce(), Duration::from_millis(250));
}

#[test]
fn test_table_type_presets() {
    assert!(!TableOptions::default().merged(TableType::HaiTable).cert_dropdown_enabled());
    assert!(TableOptions::default().merged(TableType::CertTable).cert_dropdown_enabled());
    assert!(TableOptions::default().merged(TableType::OutreasonTable).cert_dropdown_enabled());
}

#[test]
fn test_table_type_from_json() {
    let config = TableConfig::from_json(
        r#"{
            "tableType": "CertTable",
            "options": { "certStates": ["certified", "rejected"], "enableToolbarTop": false }
        }"#,
    )
    .unwrap();
    assert_eq!(config.table_type, TableType::CertTable);
    assert_eq!(config.options.cert_states, vec!["certified", "rejected"]);

    let merged = config.options.merged(config.table_type);
    assert!(merged.cert_dropdown_enabled());
    assert!(merged.enable_toolbar_top);
}

#[test]
fn test_toolbar_stays_off_when_nothing_needs_it() {
    let options = TableOptions::from_value(json!({
        "enableToolbarTop": false,
        "enableGlobalFilter": false,
        "enableToolbarBottom": false,
        "enablePagination": false,
        "enableSelectionCounts": false
    }))
    .unwrap()
    .merged(TableType::HaiTable);
    assert!(!options.enable_toolbar_top);
    assert!(!options.enable_toolbar_bottom);
}

#[test]
fn test_options_from_camel_case_json() {
    let options = TableOptions::from_value(json!({
        "enableRowVirtualization": true,
        "selectAllMode": "all",
        "globalFilterFn": "contains",
        "rowVirtualizerOptions": { "overscan": 5 },
        "initialState": { "globalFilter": "abc", "pagination": { "pageIndex": 2 } }
    }))
    .unwrap();
    assert!(options.enable_row_virtualization);
    assert_eq!(options.select_all_mode, SelectAllMode::All);
    assert_eq!(options.global_filter_fn, GlobalFilterFn::Contains);
    assert_eq!(options.row_virtualizer_options.overscan, 5);
    assert_eq!(options.row_virtualizer_options.estimate_size, 36);
    assert_eq!(options.initial_state.global_filter, "abc");
    assert_eq!(options.initial_state.pagination.page_index, 2);
}

#[test]
fn test_unknown_option_keys_pass_through() {
    let options = TableOptions::from_value(json!({ "density": "compact" })).unwrap();
    assert_eq!(options.passthrough.get("density"), Some(&json!("compact")));
}

#[test]
fn test_invalid_options_are_rejected() {
    let zero = TableOptions::from_value(json!({ "pagination": { "pageSize": 0 } }));
    assert!(matches!(zero, Err(ConfigurationError::InvalidPageSize)));

    let bad_height = TableOptions::from_value(json!({ "rowVirtualizerOptions": { "estimateSize": 0 } }));
    assert!(matches!(bad_height, Err(ConfigurationError::InvalidOption { .. })));
}

#[test]
fn test_malformed_document_is_json_error() {
    assert!(matches!(
        TableConfig::from_json("{ not json"),
        Err(ConfigurationError::Json(_))
    ));
}

#[test]
fn test_rows_ref_takes_precedence_over_rows() {
    let config = TableConfig::from_json(
        r#"{ "columns": [], "rows": [{ "a": 1 }], "rowsRef": "x", "extraData": { "x": [] } }"#,
    )
    .unwrap();
    assert_eq!(config.source, RowSource::reference("x", json!({ "x": [] })));
}

#[test]
fn test_inline_rows() {
    let config = TableConfig::from_json(r#"{ "rows": [{ "a": 1 }] }"#).unwrap();
    assert_eq!(config.source, RowSource::Rows(vec![json!({ "a": 1 })]));
    assert!(config.columns.is_empty());
}
