//! Headless view models.
//!
//! Each view is rebuilt from the committed table state and read by whatever
//! surface draws the table. Views never mutate state; controls call back into
//! the table's mutators.

pub mod body;
pub mod footer;
pub mod head;
pub mod pagination;
pub mod toolbar;

pub use body::{BodyCellView, BodyRowView, BodyView};
pub use footer::{FooterCellView, FooterView};
pub use head::{CheckboxState, HeadView, HeaderCellView};
pub use pagination::PaginationView;
pub use toolbar::{CertDropdownView, SearchBoxView, ToolbarBottomView, ToolbarTopView};

use crate::error::TransientFetchError;

/// Error region shown in place of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub message: String,
    pub retryable: bool,
}

impl From<&TransientFetchError> for ErrorView {
    fn from(error: &TransientFetchError) -> Self {
        Self {
            message: error.to_string(),
            retryable: error.retryable,
        }
    }
}

/// Everything needed to draw one table.
///
/// Sections switched off in the options are `None`. The body is always there.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableView {
    pub toolbar_top: Option<ToolbarTopView>,
    pub head: Option<HeadView>,
    pub body: BodyView,
    pub footer: Option<FooterView>,
    pub toolbar_bottom: Option<ToolbarBottomView>,
    pub error: Option<ErrorView>,
}

impl TableView {
    pub fn search(&self) -> Option<&SearchBoxView> {
        self.toolbar_top.as_ref()?.search.as_ref()
    }

    pub fn pagination(&self) -> Option<&PaginationView> {
        self.toolbar_bottom.as_ref()?.pagination.as_ref()
    }

    pub fn selection_count(&self) -> Option<&str> {
        self.toolbar_bottom.as_ref()?.selection_count.as_deref()
    }
}
