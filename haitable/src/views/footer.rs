//! Table footer: one cell per visible column.

use crate::state::TableStateMachine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterCellView {
    pub column_id: String,
    /// Empty when the column declares no footer.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FooterView {
    pub cells: Vec<FooterCellView>,
}

impl FooterView {
    /// No column declares a footer.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.label.is_empty())
    }
}

pub fn build(machine: &TableStateMachine) -> FooterView {
    FooterView {
        cells: machine
            .visible_columns()
            .into_iter()
            .map(|column| FooterCellView {
                column_id: column.id.clone(),
                label: column.footer.clone().unwrap_or_default(),
            })
            .collect(),
    }
}
