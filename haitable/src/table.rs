//! HaiTable: the composition root.
//!
//! Wires the column model, row source, state machine, virtualization window,
//! click disambiguation and views into one instance. `HaiTable` is cheap to
//! clone; clones share the same table.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::column::{Column, ColumnSpec, prepare_with};
use crate::config::TableConfig;
use crate::error::{ConfigurationError, TransientFetchError};
use crate::events::{Handler, PointerEvent, PointerEventKind, PointerTarget, TableHandlers};
use crate::interaction::{ClickDisambiguator, ClickOutcome, InteractionKey};
use crate::options::{SelectAllMode, TableOptions, TableType};
use crate::render::RendererRegistry;
use crate::source::{Row, RowId, RowSource, build_rows};
use crate::state::{TableState, TableStateMachine};
use crate::timer::Debouncer;
use crate::views::{self, ErrorView, TableView};
use crate::virtualize::WindowConfig;

/// Unique identifier for a table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__haitable_{}", self.0)
    }
}

/// Internal state for a table instance.
#[derive(Debug)]
struct TableInner {
    machine: TableStateMachine,
    /// Vertical scroll offset of the body, in pixels.
    scroll_top: u64,
    /// Body viewport height, in pixels.
    viewport_height: u64,
    /// Measured row heights, by row.
    measured: HashMap<RowId, u32>,
    /// Search box text, applied to the filter after the debounce.
    search_draft: String,
    fetch_error: Option<TransientFetchError>,
    mounted: bool,
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`HaiTable`].
#[derive(Debug, Default)]
pub struct HaiTableBuilder {
    config: TableConfig,
    registry: RendererRegistry,
    handlers: TableHandlers,
}

impl HaiTableBuilder {
    /// Flavor whose preset fills in unset options.
    pub fn table_type(mut self, table_type: TableType) -> Self {
        self.config.table_type = table_type;
        self
    }

    pub fn options(mut self, options: TableOptions) -> Self {
        self.config.options = options;
        self
    }

    pub fn rows(mut self, rows: Vec<Value>) -> Self {
        self.config.source = RowSource::Rows(rows);
        self
    }

    pub fn source(mut self, source: RowSource) -> Self {
        self.config.source = source;
        self
    }

    /// Renderers for custom column types.
    pub fn registry(mut self, registry: RendererRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn handlers(mut self, handlers: TableHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// Validate the configuration and mount the table.
    pub fn build(self) -> Result<HaiTable, ConfigurationError> {
        let HaiTableBuilder {
            config,
            registry,
            handlers,
        } = self;
        let options = config.options.merged(config.table_type);
        options.validate()?;

        let columns = prepare_with(&options, &config.columns, &registry)?;
        let rows = build_rows(
            config.source.resolve_or_empty(),
            options.row_id_field.as_deref(),
        );
        let clicks = ClickDisambiguator::new(options.click_delay());
        let search = Debouncer::new(options.search_debounce());
        let search_draft = options.initial_state.global_filter.clone();
        let machine = TableStateMachine::new(columns, rows, options);

        let id = TableId::new();
        log::debug!(
            "Mounted {} with {} columns and {} rows",
            id,
            machine.columns().len(),
            machine.rows().len()
        );

        Ok(HaiTable {
            id,
            inner: Arc::new(RwLock::new(TableInner {
                machine,
                scroll_top: 0,
                viewport_height: 0,
                measured: HashMap::new(),
                search_draft,
                fetch_error: None,
                mounted: true,
            })),
            dirty: Arc::new(AtomicBool::new(true)),
            clicks: Arc::new(clicks),
            search: Arc::new(search),
            handlers: Arc::new(handlers),
        })
    }
}

// =============================================================================
// HaiTable
// =============================================================================

/// A mounted table.
#[derive(Debug, Clone)]
pub struct HaiTable {
    id: TableId,
    inner: Arc<RwLock<TableInner>>,
    /// Set whenever a change needs to be re-rendered.
    dirty: Arc<AtomicBool>,
    clicks: Arc<ClickDisambiguator<InteractionKey>>,
    search: Arc<Debouncer>,
    handlers: Arc<TableHandlers>,
}

impl HaiTable {
    /// Mount a table from a configuration with the built-in renderers.
    pub fn new(config: TableConfig) -> Result<Self, ConfigurationError> {
        HaiTableBuilder {
            config,
            ..Default::default()
        }
        .build()
    }

    /// Start building a table over the given columns.
    pub fn builder(columns: Vec<ColumnSpec>) -> HaiTableBuilder {
        HaiTableBuilder {
            config: TableConfig::new(columns),
            ..Default::default()
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    fn read<R>(&self, f: impl FnOnce(&TableInner) -> R) -> Option<R> {
        self.inner.read().ok().map(|guard| f(&guard))
    }

    /// Mutate the machine, marking the table dirty when it reports a change.
    fn mutate(&self, f: impl FnOnce(&mut TableStateMachine) -> bool) -> bool {
        if let Ok(mut guard) = self.inner.write()
            && guard.mounted
            && f(&mut guard.machine)
        {
            self.dirty.store(true, Ordering::SeqCst);
            return true;
        }
        false
    }

    // -------------------------------------------------------------------------
    // State mutators
    // -------------------------------------------------------------------------

    pub fn sort_by(&self, column_id: &str, multi: bool) -> bool {
        self.mutate(|m| m.sort_by(column_id, multi))
    }

    pub fn clear_sorting(&self) -> bool {
        self.mutate(|m| m.clear_sorting())
    }

    /// See [`TableStateMachine::set_pagination`]: `page_index` is ignored
    /// when `page_size` changes.
    pub fn set_pagination(&self, page_index: usize, page_size: usize) -> bool {
        self.mutate(|m| m.set_pagination(page_index, page_size))
    }

    pub fn set_page_size(&self, page_size: usize) -> bool {
        self.mutate(|m| m.set_page_size(page_size))
    }

    pub fn next_page(&self) -> bool {
        self.mutate(|m| m.next_page())
    }

    pub fn previous_page(&self) -> bool {
        self.mutate(|m| m.previous_page())
    }

    pub fn first_page(&self) -> bool {
        self.mutate(|m| m.first_page())
    }

    pub fn last_page(&self) -> bool {
        self.mutate(|m| m.last_page())
    }

    /// Apply filter text right away, bypassing the search debounce.
    pub fn set_global_filter(&self, text: &str) -> bool {
        self.search.cancel();
        if let Ok(mut guard) = self.inner.write() {
            guard.search_draft = text.to_string();
        }
        self.mutate(|m| m.set_global_filter(text))
    }

    /// Search box clear button: empty the box and drop the filter now.
    pub fn clear_search(&self) -> bool {
        self.search.cancel();
        let had_draft = match self.inner.write() {
            Ok(mut guard) if guard.mounted => !std::mem::take(&mut guard.search_draft).is_empty(),
            _ => return false,
        };
        let changed = self.mutate(|m| m.set_global_filter(""));
        if had_draft {
            self.dirty.store(true, Ordering::SeqCst);
        }
        changed || had_draft
    }

    /// Search box keystroke: show the text now, filter after the debounce.
    pub fn search_input(&self, text: &str) {
        match self.inner.write() {
            Ok(mut guard) if guard.mounted => guard.search_draft = text.to_string(),
            _ => return,
        }
        self.dirty.store(true, Ordering::SeqCst);

        let inner = Arc::downgrade(&self.inner);
        let dirty = Arc::clone(&self.dirty);
        let text = text.to_string();
        self.search.call(move || {
            let Some(inner) = inner.upgrade() else {
                log::trace!("Search debounce fired after the table was dropped");
                return;
            };
            if let Ok(mut guard) = inner.write()
                && guard.mounted
                && guard.machine.set_global_filter(&text)
            {
                dirty.store(true, Ordering::SeqCst);
            }
        });
    }

    pub fn toggle_row_selection(&self, id: &RowId) -> bool {
        self.mutate(|m| m.toggle_row_selection(id))
    }

    pub fn toggle_all_rows_selected(&self, scope: SelectAllMode) -> bool {
        self.mutate(|m| m.toggle_all_rows_selected(scope))
    }

    /// Select-all checkbox click under the configured `selectAllMode`.
    pub fn toggle_select_all(&self) -> bool {
        self.mutate(|m| m.toggle_select_all())
    }

    pub fn reset_selection(&self) -> bool {
        self.mutate(|m| m.reset_selection())
    }

    pub fn set_column_visibility(&self, column_id: &str, visible: bool) -> bool {
        self.mutate(|m| m.set_column_visibility(column_id, visible))
    }

    pub fn hide_columns(&self) -> bool {
        self.mutate(|m| m.hide_columns())
    }

    /// Certification dropdown choice: hands `state` and the selected rows to
    /// `on_certify_change`. Returns whether a handler ran.
    pub fn certify(&self, state: &str) -> bool {
        let Some(handler) = &self.handlers.on_certify_change else {
            return false;
        };
        let enabled = self
            .read(|inner| inner.mounted && inner.machine.options().cert_dropdown_enabled())
            .unwrap_or(false);
        if !enabled {
            log::debug!("{}: certification dropdown is off", self.id);
            return false;
        }
        let rows = self.selected_rows();
        if rows.is_empty() {
            return false;
        }
        handler(state, &rows);
        true
    }

    /// Replace the rows, keeping sort, filter and surviving selection.
    pub fn set_rows(&self, rows: Vec<Value>) {
        let live: HashSet<RowId> = match self.inner.write() {
            Ok(mut guard) => {
                let inner = &mut *guard;
                let id_field = inner.machine.options().row_id_field.clone();
                inner
                    .machine
                    .set_rows(build_rows(rows, id_field.as_deref()));
                let machine = &inner.machine;
                inner.measured.retain(|id, _| machine.row(id).is_some());
                machine.rows().iter().map(|r| r.id.clone()).collect()
            }
            Err(_) => return,
        };
        self.clicks.retain(|key| live.contains(&key.row_id));
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Re-resolve rows from a source. Resolution failures give an empty table.
    pub fn set_source(&self, source: &RowSource) {
        self.set_rows(source.resolve_or_empty());
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    /// Body scroll position and viewport height, in pixels.
    pub fn set_scroll(&self, scroll_top: u64, viewport_height: u64) {
        if let Ok(mut guard) = self.inner.write()
            && (guard.scroll_top, guard.viewport_height) != (scroll_top, viewport_height)
        {
            guard.scroll_top = scroll_top;
            guard.viewport_height = viewport_height;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// Record the rendered height of a row.
    pub fn measure_row(&self, id: &RowId, height: u32) {
        if let Ok(mut guard) = self.inner.write()
            && guard.measured.get(id) != Some(&height)
        {
            guard.measured.insert(id.clone(), height);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Fetch errors
    // -------------------------------------------------------------------------

    pub fn set_fetch_error(&self, error: TransientFetchError) {
        log::warn!("{}: {}", self.id, error);
        if let Ok(mut guard) = self.inner.write() {
            guard.fetch_error = Some(error);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    pub fn clear_fetch_error(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.fetch_error.take().is_some()
        {
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Pointer events
    // -------------------------------------------------------------------------

    fn resolve_target(&self, target: &PointerTarget) -> Option<(Row, bool)> {
        self.read(|inner| {
            if !inner.mounted {
                return None;
            }
            let row = inner.machine.row(target.row_id())?.clone();
            let on_display = match target.column_id() {
                Some(column_id) => inner.machine.column(column_id)?.is_display(),
                None => false,
            };
            Some((row, on_display))
        })
        .flatten()
    }

    fn event(&self, kind: PointerEventKind, row: &Row, column_id: Option<&str>) -> PointerEvent {
        PointerEvent {
            kind,
            row_id: row.id.clone(),
            row_index: row.index,
            column_id: column_id.map(str::to_string),
        }
    }

    fn disambiguate(
        &self,
        key: InteractionKey,
        row: &Row,
        single: Option<Handler>,
        double: Option<Handler>,
    ) -> Option<ClickOutcome> {
        if single.is_none() && double.is_none() {
            return None;
        }
        let column_id = key.column_id.clone();
        let single_event = self.event(PointerEventKind::Click, row, column_id.as_deref());
        let double_event = self.event(PointerEventKind::DoubleClick, row, column_id.as_deref());
        let single_data = Arc::clone(&row.data);
        let double_data = Arc::clone(&row.data);

        Some(self.clicks.pointer_down(
            key,
            move || {
                if let Some(handler) = single {
                    handler(&single_event, &single_data);
                }
            },
            move || {
                if let Some(handler) = double {
                    handler(&double_event, &double_data);
                }
            },
        ))
    }

    /// Pointer-down on a row or cell.
    ///
    /// A cell target drives the cell handlers and the row handlers. A single
    /// click on a display column skips the cell click handler only; the row
    /// click and both double-click handlers still fire. Returns the outcome
    /// of the first disambiguation that ran.
    pub fn pointer_down(&self, target: &PointerTarget) -> Option<ClickOutcome> {
        let (row, on_display) = self.resolve_target(target)?;
        let handlers = &self.handlers;

        let cell_outcome = match target.column_id() {
            Some(column_id) => self.disambiguate(
                InteractionKey::cell(row.id.clone(), column_id),
                &row,
                handlers.on_cell_click.clone().filter(|_| !on_display),
                handlers.on_cell_double_click.clone(),
            ),
            None => None,
        };
        let row_outcome = self.disambiguate(
            InteractionKey::row(row.id.clone()),
            &row,
            handlers.on_row_click.clone(),
            handlers.on_row_double_click.clone(),
        );
        cell_outcome.or(row_outcome)
    }

    fn fire(&self, handler: &Option<Handler>, kind: PointerEventKind, row: &Row, column_id: Option<&str>) {
        if let Some(handler) = handler {
            handler(&self.event(kind, row, column_id), &row.data);
        }
    }

    /// Pointer entered a row or cell.
    pub fn pointer_enter(&self, target: &PointerTarget) {
        let Some((row, _)) = self.resolve_target(target) else {
            return;
        };
        if let Some(column_id) = target.column_id() {
            self.fire(&self.handlers.on_cell_hover, PointerEventKind::Hover, &row, Some(column_id));
        }
        self.fire(&self.handlers.on_row_hover, PointerEventKind::Hover, &row, None);
    }

    /// Pointer left a row or cell.
    pub fn pointer_leave(&self, target: &PointerTarget) {
        let Some((row, _)) = self.resolve_target(target) else {
            return;
        };
        if let Some(column_id) = target.column_id() {
            self.fire(&self.handlers.on_cell_leave, PointerEventKind::Leave, &row, Some(column_id));
        }
        self.fire(&self.handlers.on_row_leave, PointerEventKind::Leave, &row, None);
    }

    /// Click disambiguation state, for inspection.
    pub fn clicks(&self) -> &ClickDisambiguator<InteractionKey> {
        &self.clicks
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    pub fn state(&self) -> TableState {
        self.read(|inner| inner.machine.state().clone())
            .unwrap_or_else(|| TableState::initial(&TableOptions::default(), &[]))
    }

    pub fn columns(&self) -> Vec<Column> {
        self.read(|inner| inner.machine.columns().to_vec())
            .unwrap_or_default()
    }

    pub fn visible_column_ids(&self) -> Vec<String> {
        self.read(|inner| {
            inner
                .machine
                .visible_columns()
                .into_iter()
                .map(|c| c.id.clone())
                .collect()
        })
        .unwrap_or_default()
    }

    /// Rows of the current page.
    pub fn visible_rows(&self) -> Vec<Row> {
        self.read(|inner| {
            inner
                .machine
                .visible_rows()
                .into_iter()
                .cloned()
                .collect()
        })
        .unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.read(|inner| inner.machine.rows().len()).unwrap_or(0)
    }

    pub fn filtered_row_count(&self) -> usize {
        self.read(|inner| inner.machine.filtered_row_count())
            .unwrap_or(0)
    }

    pub fn page_count(&self) -> usize {
        self.read(|inner| inner.machine.page_count()).unwrap_or(1)
    }

    pub fn selected_count(&self) -> usize {
        self.read(|inner| inner.machine.selected_count()).unwrap_or(0)
    }

    pub fn selected_rows(&self) -> Vec<Row> {
        self.read(|inner| {
            inner
                .machine
                .selected_rows()
                .into_iter()
                .cloned()
                .collect()
        })
        .unwrap_or_default()
    }

    pub fn is_all_rows_selected(&self) -> bool {
        self.read(|inner| inner.machine.is_all_rows_selected())
            .unwrap_or(false)
    }

    pub fn is_some_rows_selected(&self) -> bool {
        self.read(|inner| inner.machine.is_some_rows_selected())
            .unwrap_or(false)
    }

    /// Search box text as typed.
    pub fn search_draft(&self) -> String {
        self.read(|inner| inner.search_draft.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Build the view models from the committed state.
    pub fn render(&self) -> TableView {
        let search_pending = self.search.is_pending();
        self.read(|inner| {
            let machine = &inner.machine;
            let options = machine.options();
            let window = WindowConfig {
                enabled: options.enable_row_virtualization,
                row_height: options.row_virtualizer_options.estimate_size,
                overscan: options.row_virtualizer_options.overscan,
            };
            TableView {
                toolbar_top: views::toolbar::build_top(machine, &inner.search_draft, search_pending),
                head: options
                    .enable_table_head
                    .then(|| views::head::build(machine)),
                body: views::body::build(
                    machine,
                    &window,
                    inner.scroll_top,
                    inner.viewport_height,
                    |id| inner.measured.get(id).copied(),
                ),
                footer: options
                    .enable_table_footer
                    .then(|| views::footer::build(machine)),
                toolbar_bottom: views::toolbar::build_bottom(machine),
                error: inner.fetch_error.as_ref().map(ErrorView::from),
            }
        })
        .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.read(|inner| inner.mounted).unwrap_or(false)
    }

    /// Tear the table down: pending clicks and searches never fire.
    pub fn unmount(&self) {
        self.search.cancel();
        self.clicks.teardown();
        if let Ok(mut guard) = self.inner.write() {
            guard.mounted = false;
        }
        log::debug!("Unmounted {}", self.id);
    }
}
