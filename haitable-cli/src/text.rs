//! Plain-text rendering of a table view.

use haitable::TableView;
use haitable::views::{
    BodyView, CheckboxState, FooterView, HeadView, ToolbarBottomView, ToolbarTopView,
};
use haitable::sorting::SortDirection;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Pixels per terminal cell when converting column sizes.
const PX_PER_CHAR: u32 = 8;
/// Column size used when no header is drawn.
const DEFAULT_SIZE: u32 = 180;
const MIN_CHARS: usize = 3;
const MAX_CHARS: usize = 40;

fn column_chars(size: u32) -> usize {
    ((size / PX_PER_CHAR) as usize).clamp(MIN_CHARS, MAX_CHARS)
}

/// Truncate to `width` display cells with an ellipsis, then pad.
fn fit(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    if s.width() <= width {
        out.push_str(s);
        used = s.width();
    } else if width > 0 {
        for ch in s.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width - 1 {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.push('…');
        used += 1;
    }
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

fn checkbox(state: CheckboxState) -> &'static str {
    match state {
        CheckboxState::Unchecked => "[ ]",
        CheckboxState::Checked => "[x]",
        CheckboxState::Indeterminate => "[-]",
    }
}

fn toolbar_top(view: &ToolbarTopView, out: &mut Vec<String>) {
    if let Some(dropdown) = &view.cert_dropdown {
        let state = if dropdown.enabled { "" } else { " (select rows)" };
        out.push(format!("Certify: {}{}", dropdown.states.join(" / "), state));
    }
    if let Some(search) = &view.search {
        let value = if search.value.is_empty() {
            format!("<{}>", search.placeholder)
        } else {
            search.value.clone()
        };
        let pending = if search.pending { " (pending)" } else { "" };
        let clear = if search.can_clear { " [x]" } else { "" };
        out.push(format!("Search: {}{}{}", value, pending, clear));
    }
}

fn head(view: &HeadView, widths: &[usize]) -> String {
    let cells: Vec<String> = view
        .cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            if let Some(state) = cell.select_all {
                return fit(checkbox(state), width);
            }
            let arrow = match cell.sort {
                Some(SortDirection::Ascending) => " ▲",
                Some(SortDirection::Descending) => " ▼",
                None => "",
            };
            let index = cell
                .sort_index
                .map(|i| i.to_string())
                .unwrap_or_default();
            fit(&format!("{}{}{}", cell.label, arrow, index), width)
        })
        .collect();
    cells.join(" | ")
}

fn body(view: &BodyView, widths: &[usize], out: &mut Vec<String>) {
    if view.is_empty() {
        out.push("No results.".to_string());
        return;
    }
    for row in &view.rows {
        let marker = if row.selected { '*' } else { ' ' };
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(widths)
            .map(|(cell, &width)| fit(&cell.content.plain_text(), width))
            .collect();
        out.push(format!("{}{}", marker, cells.join(" | ")));
    }
}

fn footer(view: &FooterView, widths: &[usize], out: &mut Vec<String>) {
    if view.is_blank() {
        return;
    }
    let cells: Vec<String> = view
        .cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| fit(&cell.label, width))
        .collect();
    out.push(format!(" {}", cells.join(" | ")));
}

fn toolbar_bottom(view: &ToolbarBottomView, out: &mut Vec<String>) {
    if let Some(count) = &view.selection_count {
        out.push(count.clone());
    }
    if let Some(pagination) = &view.pagination {
        let first_last = pagination.show_first_last;
        out.push(format!(
            "{}  page {}/{}  size {} {:?}{}{}{}{}",
            pagination.range_label,
            pagination.page_index + 1,
            pagination.page_count,
            pagination.page_size,
            pagination.page_size_options,
            if first_last && pagination.can_previous { "  <<first" } else { "" },
            if pagination.can_previous { "  <prev" } else { "" },
            if pagination.can_next { "  next>" } else { "" },
            if first_last && pagination.can_next { "  last>>" } else { "" },
        ));
    }
}

/// Render the whole view as lines of text.
pub fn render(view: &TableView) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(top) = &view.toolbar_top {
        toolbar_top(top, &mut out);
    }

    if let Some(error) = &view.error {
        out.push(format!("Error: {}", error.message));
        return out;
    }

    let widths: Vec<usize> = match &view.head {
        Some(head) => head
            .cells
            .iter()
            .map(|c| column_chars(c.size.max(c.min_width)))
            .collect(),
        None => {
            let count = view.body.rows.first().map_or(0, |r| r.cells.len());
            vec![column_chars(DEFAULT_SIZE); count]
        }
    };
    if let Some(view_head) = &view.head {
        let header = format!(" {}", head(view_head, &widths));
        let rule = "-".repeat(header.width());
        out.push(rule.clone());
        out.push(header);
        out.push(rule);
    }

    if view.body.top_padding_px() > 0 {
        out.push(format!("  ({} px above)", view.body.top_padding_px()));
    }
    body(&view.body, &widths, &mut out);
    if view.body.bottom_padding_px() > 0 {
        out.push(format!("  ({} px below)", view.body.bottom_padding_px()));
    }
    out.push(format!(
        "  rows {}-{} of {} rendered, content {} px",
        view.body.window.start_index,
        view.body.window.end_index,
        view.body.page_row_count,
        view.body.total_height_px(),
    ));

    if let Some(view_footer) = &view.footer {
        footer(view_footer, &widths, &mut out);
    }
    if let Some(bottom) = &view.toolbar_bottom {
        toolbar_bottom(bottom, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("abc", 0), "");
    }

    fn table(options: &str) -> haitable::HaiTable {
        let json = format!(
            r#"{{
                "columns": [{{ "field": "name", "title": "Name", "footer": "Names" }}],
                "options": {},
                "rows": [{{ "name": "ada" }}, {{ "name": "grace" }}]
            }}"#,
            options
        );
        let config = haitable::TableConfig::from_json(&json).unwrap();
        haitable::HaiTable::new(config).unwrap()
    }

    #[test]
    fn test_render_sections_in_order() {
        let table = table(r#"{ "enableMultiRowSelection": false }"#);
        table.toggle_row_selection(&haitable::RowId::from(0usize));
        let lines = render(&table.render());
        assert!(lines[0].starts_with("Search: <search>"));
        assert!(lines.iter().any(|l| l.trim_end() == " Names"));
        assert_eq!(
            lines.iter().rev().nth(1).map(String::as_str),
            Some("1 of 2 total rows selected")
        );
    }

    #[test]
    fn test_render_without_head_or_toolbars() {
        let table = table(
            r#"{ "enableMultiRowSelection": false, "enableTableHead": false,
                 "enableToolbarTop": false, "enableGlobalFilter": false,
                 "enableToolbarBottom": false, "enablePagination": false,
                 "enableSelectionCounts": false, "enableTableFooter": false }"#,
        );
        let lines = render(&table.render());
        assert!(lines[0].starts_with(" ada"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_column_chars_clamped() {
        assert_eq!(column_chars(0), MIN_CHARS);
        assert_eq!(column_chars(180), 22);
        assert_eq!(column_chars(10_000), MAX_CHARS);
    }
}
