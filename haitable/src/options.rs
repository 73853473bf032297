//! Table options.
//!
//! Options arrive either from code (builder-style `with_*` setters) or from a
//! JSON document using the camelCase names the application layer speaks.
//! Keys the engine does not recognize are kept verbatim in
//! [`TableOptions::passthrough`] for the rendering layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigurationError;
use crate::sorting::SortKey;

/// Which rows "select all" applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectAllMode {
    /// Only the rows on the current page.
    #[default]
    Page,
    /// Every row that passes the global filter.
    All,
}

/// Matching strategy for the global filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalFilterFn {
    /// Fuzzy subsequence ranking.
    #[default]
    Fuzzy,
    /// Case-insensitive substring test.
    Contains,
}

/// Table flavor. Each flavor starts from its own option preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TableType {
    #[default]
    HaiTable,
    /// Adds a certification dropdown to the top toolbar.
    CertTable,
    OutreasonTable,
}

impl TableType {
    /// Whether the preset shows the certification dropdown.
    pub fn cert_dropdown(self) -> bool {
        !matches!(self, TableType::HaiTable)
    }
}

/// Pagination options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationOptions {
    /// Rows per page.
    ///
    /// Default: 5
    pub page_size: usize,
    /// Choices offered by the page size control.
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: 5,
            page_size_options: vec![5, 25, 50, 100],
        }
    }
}

/// Row virtualization tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualizerOptions {
    /// Estimated row height in pixels.
    ///
    /// Default: 36
    pub estimate_size: u32,
    /// Rows materialized above and below the viewport.
    ///
    /// Default: 15
    pub overscan: u32,
}

impl Default for VirtualizerOptions {
    fn default() -> Self {
        Self {
            estimate_size: 36,
            overscan: 15,
        }
    }
}

/// Initial pagination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InitialPagination {
    pub page_index: usize,
}

/// State applied when the table mounts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InitialState {
    pub sorting: Vec<SortKey>,
    pub global_filter: String,
    pub pagination: InitialPagination,
}

/// Options recognized by the table engine.
///
/// # Example
///
/// ```
/// use haitable::options::{SelectAllMode, TableOptions};
///
/// let options = TableOptions::default()
///     .with_multi_row_selection(true)
///     .with_select_all_mode(SelectAllMode::All)
///     .with_page_size(25);
/// assert!(options.validate().is_ok());
/// assert!(options.enable_toolbar_top);
/// ```
///
/// A flavor preset fills in whatever the caller left unset:
///
/// ```
/// use haitable::options::{TableOptions, TableType};
///
/// let options = TableOptions::default().merged(TableType::CertTable);
/// assert_eq!(options.enable_cert_dropdown, Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableOptions {
    /// Search box and certification dropdown.
    pub enable_toolbar_top: bool,
    /// Selection counter and pagination.
    pub enable_toolbar_bottom: bool,
    pub enable_table_head: bool,
    pub enable_table_footer: bool,
    pub enable_global_filter: bool,
    pub enable_pagination: bool,
    pub enable_row_virtualization: bool,
    pub enable_multi_row_selection: bool,
    pub enable_select_all: bool,
    /// Show "N of M total rows selected" in the bottom toolbar.
    pub enable_selection_counts: bool,
    /// Unset means the table flavor decides.
    pub enable_cert_dropdown: Option<bool>,
    /// Choices offered by the certification dropdown.
    pub cert_states: Vec<String>,
    pub enable_sorting: bool,
    pub enable_multi_sort: bool,
    /// Order filtered rows by relevance while no explicit sort is set.
    pub enable_global_filter_ranked_results: bool,
    pub select_all_mode: SelectAllMode,
    pub global_filter_fn: GlobalFilterFn,
    pub pagination: PaginationOptions,
    pub row_virtualizer_options: VirtualizerOptions,
    /// Field whose value becomes the row id. Row index is used otherwise.
    pub row_id_field: Option<String>,
    /// Double-click disambiguation window in milliseconds.
    ///
    /// Default: 250
    pub click_delay_ms: u64,
    /// Search box debounce in milliseconds.
    ///
    /// Default: 250
    pub search_debounce_ms: u64,
    pub initial_state: InitialState,
    /// Options the engine does not interpret.
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            enable_toolbar_top: true,
            enable_toolbar_bottom: true,
            enable_table_head: true,
            enable_table_footer: true,
            enable_global_filter: true,
            enable_pagination: true,
            enable_row_virtualization: true,
            enable_multi_row_selection: true,
            enable_select_all: true,
            enable_selection_counts: true,
            enable_cert_dropdown: None,
            cert_states: Vec::new(),
            enable_sorting: true,
            enable_multi_sort: true,
            enable_global_filter_ranked_results: false,
            select_all_mode: SelectAllMode::Page,
            global_filter_fn: GlobalFilterFn::Fuzzy,
            pagination: PaginationOptions::default(),
            row_virtualizer_options: VirtualizerOptions::default(),
            row_id_field: None,
            click_delay_ms: 250,
            search_debounce_ms: 250,
            initial_state: InitialState::default(),
            passthrough: Map::new(),
        }
    }
}

impl TableOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigurationError> {
        let options: Self = serde_json::from_value(value)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks the options for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.pagination.page_size == 0 {
            return Err(ConfigurationError::InvalidPageSize);
        }
        if self.pagination.page_size_options.contains(&0) {
            return Err(ConfigurationError::invalid_option(
                "pagination.pageSizeOptions",
                "page sizes must be greater than zero",
            ));
        }
        if self.row_virtualizer_options.estimate_size == 0 {
            return Err(ConfigurationError::invalid_option(
                "rowVirtualizerOptions.estimateSize",
                "row height must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Resolves the options against a flavor preset.
    ///
    /// An unset `enableCertDropdown` takes the flavor's value. A toolbar is
    /// switched on whenever one of its parts is enabled, even if the toolbar
    /// itself was turned off.
    pub fn merged(mut self, table_type: TableType) -> Self {
        let cert_dropdown = *self
            .enable_cert_dropdown
            .get_or_insert(table_type.cert_dropdown());
        self.enable_toolbar_top |= self.enable_global_filter || cert_dropdown;
        self.enable_toolbar_bottom |= self.enable_pagination || self.enable_selection_counts;
        self
    }

    /// Whether the certification dropdown is shown. Unset counts as off.
    pub fn cert_dropdown_enabled(&self) -> bool {
        self.enable_cert_dropdown.unwrap_or(false)
    }

    /// Disambiguation window as a duration.
    pub fn click_delay(&self) -> Duration {
        Duration::from_millis(self.click_delay_ms)
    }

    /// Search debounce as a duration.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn with_global_filter(mut self, enabled: bool) -> Self {
        self.enable_global_filter = enabled;
        self
    }

    pub fn with_pagination(mut self, enabled: bool) -> Self {
        self.enable_pagination = enabled;
        self
    }

    pub fn with_row_virtualization(mut self, enabled: bool) -> Self {
        self.enable_row_virtualization = enabled;
        self
    }

    pub fn with_multi_row_selection(mut self, enabled: bool) -> Self {
        self.enable_multi_row_selection = enabled;
        self
    }

    pub fn with_select_all(mut self, enabled: bool) -> Self {
        self.enable_select_all = enabled;
        self
    }

    pub fn with_selection_counts(mut self, enabled: bool) -> Self {
        self.enable_selection_counts = enabled;
        self
    }

    pub fn with_toolbars(mut self, top: bool, bottom: bool) -> Self {
        self.enable_toolbar_top = top;
        self.enable_toolbar_bottom = bottom;
        self
    }

    pub fn with_table_head(mut self, enabled: bool) -> Self {
        self.enable_table_head = enabled;
        self
    }

    pub fn with_table_footer(mut self, enabled: bool) -> Self {
        self.enable_table_footer = enabled;
        self
    }

    pub fn with_cert_dropdown(mut self, enabled: bool) -> Self {
        self.enable_cert_dropdown = Some(enabled);
        self
    }

    pub fn with_cert_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cert_states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_select_all_mode(mut self, mode: SelectAllMode) -> Self {
        self.select_all_mode = mode;
        self
    }

    pub fn with_global_filter_fn(mut self, filter_fn: GlobalFilterFn) -> Self {
        self.global_filter_fn = filter_fn;
        self
    }

    pub fn with_ranked_results(mut self, enabled: bool) -> Self {
        self.enable_global_filter_ranked_results = enabled;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.pagination.page_size = page_size;
        self
    }

    pub fn with_row_id_field(mut self, field: impl Into<String>) -> Self {
        self.row_id_field = Some(field.into());
        self
    }

    pub fn with_click_delay(mut self, delay: Duration) -> Self {
        self.click_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_virtualizer(mut self, estimate_size: u32, overscan: u32) -> Self {
        self.row_virtualizer_options = VirtualizerOptions {
            estimate_size,
            overscan,
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_are_passed_through() {
        let options = TableOptions::from_value(serde_json::json!({
            "enablePagination": false,
            "muiTableBodyProps": { "sx": { "height": 400 } }
        }))
        .unwrap();

        assert!(!options.enable_pagination);
        assert!(options.enable_global_filter);
        assert!(options.passthrough.contains_key("muiTableBodyProps"));
    }

    #[test]
    fn test_merge_switches_toolbars_on() {
        let options = TableOptions::default()
            .with_toolbars(false, false)
            .with_pagination(false)
            .with_selection_counts(false)
            .merged(TableType::HaiTable);
        assert!(options.enable_toolbar_top);
        assert!(!options.enable_toolbar_bottom);
        assert_eq!(options.enable_cert_dropdown, Some(false));

        let options = TableOptions::default()
            .with_toolbars(false, false)
            .with_global_filter(false)
            .merged(TableType::OutreasonTable);
        assert!(options.enable_toolbar_top);
        assert!(options.enable_toolbar_bottom);
    }

    #[test]
    fn test_explicit_cert_dropdown_wins_over_preset() {
        let options = TableOptions::default()
            .with_cert_dropdown(false)
            .merged(TableType::CertTable);
        assert!(!options.cert_dropdown_enabled());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = TableOptions::from_value(serde_json::json!({
            "pagination": { "pageSize": 0 }
        }));
        assert!(matches!(result, Err(ConfigurationError::InvalidPageSize)));
    }
}
