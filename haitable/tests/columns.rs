//! Tests for column preparation, visibility and cell renderers.

use haitable::column::{ColumnVisibility, prepare, prepare_with};
use haitable::render::CellContent;
use haitable::{
    ColumnSpec, ColumnType, ConfigurationError, RendererRegistry, SELECT_COLUMN_ID, TableOptions,
};
use serde_json::{Value, json};

fn single_select() -> TableOptions {
    TableOptions::default().with_multi_row_selection(false)
}

fn specs() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("title", "Title"),
        ColumnSpec::new("count", "Count").with_type("counter"),
        ColumnSpec::new("notes", "Notes").hidden(),
    ]
}

#[test]
fn test_prepare_maps_fields_to_accessor_columns() {
    let columns = prepare(&single_select(), &specs()).unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].id, "title");
    assert_eq!(columns[0].accessor_key.as_deref(), Some("title"));
    assert_eq!(columns[0].header, "Title");
    assert_eq!(columns[0].column_type, ColumnType::Accessor);
    assert_eq!(columns[1].cell_type.as_deref(), Some("counter"));
    assert!(columns[2].hidden);
}

#[test]
fn test_prepare_prepends_select_column_for_multi_selection() {
    let options = TableOptions::default().with_multi_row_selection(true);
    let columns = prepare(&options, &specs()).unwrap();
    assert_eq!(columns.len(), 4);
    let select = &columns[0];
    assert_eq!(select.id, SELECT_COLUMN_ID);
    assert!(select.is_display());
    assert!(!select.can_sort());
    assert!(!select.can_filter());
    assert!(select.header_select_all);
}

#[test]
fn test_prepare_select_column_without_select_all() {
    let options = TableOptions::default()
        .with_multi_row_selection(true)
        .with_select_all(false);
    let columns = prepare(&options, &specs()).unwrap();
    assert!(!columns[0].header_select_all);
}

#[test]
fn test_prepare_missing_field_is_configuration_error() {
    let specs = vec![
        ColumnSpec::new("title", "Title"),
        ColumnSpec {
            title: "Broken".to_string(),
            ..Default::default()
        },
    ];
    let err = prepare(&single_select(), &specs).unwrap_err();
    assert!(matches!(err, ConfigurationError::MissingField { index: 1 }));
}

#[test]
fn test_prepare_blank_field_is_configuration_error() {
    let specs = vec![ColumnSpec::new("  ", "Blank")];
    let err = prepare(&single_select(), &specs).unwrap_err();
    assert!(matches!(err, ConfigurationError::MissingField { index: 0 }));
}

#[test]
fn test_prepare_rejects_duplicate_ids() {
    let specs = vec![
        ColumnSpec::new("title", "Title"),
        ColumnSpec::new("title", "Again"),
    ];
    let err = prepare(&single_select(), &specs).unwrap_err();
    assert!(matches!(err, ConfigurationError::DuplicateColumnId { ref id } if id == "title"));
}

#[test]
fn test_prepare_rejects_field_colliding_with_select_column() {
    let options = TableOptions::default().with_multi_row_selection(true);
    let specs = vec![ColumnSpec::new(SELECT_COLUMN_ID, "Oops")];
    assert!(prepare(&options, &specs).is_err());
}

#[test]
fn test_sorting_disabled_makes_columns_unsortable() {
    let mut options = TableOptions::default();
    options.enable_sorting = false;
    let columns = prepare(&options, &specs()).unwrap();
    assert!(columns.iter().all(|c| !c.can_sort()));
}

#[test]
fn test_hide_columns_is_idempotent() {
    let columns = prepare(&single_select(), &specs()).unwrap();
    let mut visibility = ColumnVisibility::new();

    visibility.hide_columns(&columns);
    let once = visibility.clone();
    visibility.hide_columns(&columns);

    assert_eq!(visibility, once);
    assert!(!visibility.is_visible("notes"));
    let visible: Vec<&str> = visibility
        .visible(&columns)
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(visible, vec!["title", "count"]);
}

#[test]
fn test_counter_renderer_groups_thousands() {
    let columns = prepare(&single_select(), &specs()).unwrap();
    let rows = haitable::source::build_rows(vec![json!({ "count": 1234567 })], None);
    assert_eq!(
        columns[1].render_cell(&rows[0]),
        CellContent::Counter("1,234,567".to_string())
    );
}

#[test]
fn test_haiperlink_renderer_reads_objects() {
    let specs = vec![ColumnSpec::new("link", "Link").with_type("haiperlink")];
    let columns = prepare(&single_select(), &specs).unwrap();
    let rows = haitable::source::build_rows(
        vec![json!({ "link": { "url": "https://example.com/t/1", "label": "Task 1" } })],
        None,
    );
    assert_eq!(
        columns[0].render_cell(&rows[0]),
        CellContent::Link {
            href: "https://example.com/t/1".to_string(),
            label: "Task 1".to_string(),
            defended: false,
        }
    );
}

#[test]
fn test_haiperlink_prefixes_scheme_and_marks_defended_rows() {
    let specs = vec![ColumnSpec::new("link", "Link").with_type("haiperlink")];
    let columns = prepare(&single_select(), &specs).unwrap();
    let rows = haitable::source::build_rows(
        vec![
            json!({ "link": "www.example.com/t/7", "info": { "defended": true } }),
            json!({ "link": "www.example.com/t/8", "info": { "defended": false } }),
        ],
        None,
    );
    assert_eq!(
        columns[0].render_cell(&rows[0]),
        CellContent::Link {
            href: "http://www.example.com/t/7".to_string(),
            label: "www.example.com/t/7".to_string(),
            defended: true,
        }
    );
    assert!(matches!(
        columns[0].render_cell(&rows[1]),
        CellContent::Link { defended: false, .. }
    ));
}

#[test]
fn test_unknown_renderer_falls_back_to_plain() {
    let specs = vec![ColumnSpec::new("title", "Title").with_type("sparkline")];
    let columns = prepare(&single_select(), &specs).unwrap();
    let rows = haitable::source::build_rows(vec![json!({ "title": "hello" })], None);
    assert_eq!(
        columns[0].render_cell(&rows[0]),
        CellContent::Text("hello".to_string())
    );
}

#[test]
fn test_custom_renderer_registration() {
    let registry = RendererRegistry::default().with("shout", |value, _row| {
        CellContent::Text(value.and_then(Value::as_str).unwrap_or("").to_uppercase())
    });
    let specs = vec![ColumnSpec::new("title", "Title").with_type("shout")];
    let columns = prepare_with(&single_select(), &specs, &registry).unwrap();
    let rows = haitable::source::build_rows(vec![json!({ "title": "hello" })], None);
    assert_eq!(
        columns[0].render_cell(&rows[0]),
        CellContent::Text("HELLO".to_string())
    );
}

#[test]
fn test_custom_renderer_sees_the_row() {
    let registry = RendererRegistry::default().with("owned", |value, row| {
        let owner = row.value("owner").and_then(Value::as_str).unwrap_or("?");
        let title = value.and_then(Value::as_str).unwrap_or("");
        CellContent::Text(format!("{} ({})", title, owner))
    });
    let specs = vec![ColumnSpec::new("title", "Title").with_type("owned")];
    let columns = prepare_with(&single_select(), &specs, &registry).unwrap();
    let rows = haitable::source::build_rows(vec![json!({ "title": "fix", "owner": "ada" })], None);
    assert_eq!(
        columns[0].render_cell(&rows[0]),
        CellContent::Text("fix (ada)".to_string())
    );
}

#[test]
fn test_missing_value_renders_empty() {
    let columns = prepare(&single_select(), &specs()).unwrap();
    let rows = haitable::source::build_rows(vec![json!({})], None);
    assert_eq!(columns[0].render_cell(&rows[0]), CellContent::Empty);
}

#[test]
fn test_column_spec_deserializes_type_tag() {
    let spec: ColumnSpec =
        serde_json::from_value(json!({ "field": "n", "title": "N", "type": "counter", "minWidth": 80 }))
            .unwrap();
    assert_eq!(spec.cell_type.as_deref(), Some("counter"));
    assert_eq!(spec.min_width, Some(80));
}
