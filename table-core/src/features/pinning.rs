//! FILENAME: table-core/src/features/pinning.rs
//! Column pinning.
//!
//! Pinning splits the leaf columns into three sections. Left and right keep
//! the order ids were pinned in; the center keeps display order.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::column::Column;
use crate::feature::TableFeature;
use crate::memo::Ptr;
use crate::row::Row;
use crate::state::{ColumnPinningPosition, ColumnPinningState};
use crate::table::{Columns, Table};
use crate::updater::Updater;

/// A section of the table, as used by header families and column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnPosition {
    Left,
    Center,
    Right,
}

impl ColumnPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnPosition::Left => "left",
            ColumnPosition::Center => "center",
            ColumnPosition::Right => "right",
        }
    }
}

impl From<ColumnPinningPosition> for ColumnPosition {
    fn from(position: ColumnPinningPosition) -> Self {
        match position {
            ColumnPinningPosition::Left => ColumnPosition::Left,
            ColumnPinningPosition::Right => ColumnPosition::Right,
        }
    }
}

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("ColumnPinning").with_initial_state(|state| {
        state.column_pinning = ColumnPinningState::default();
    })
}

// ============================================================================
// COLUMN API
// ============================================================================

impl<T: 'static> Column<T> {
    /// Pins every leaf under this column to `position`, or unpins them.
    pub fn pin(self: &Rc<Self>, table: &Table<T>, position: Option<ColumnPinningPosition>) {
        let ids: Vec<String> = self
            .get_leaf_columns(table)
            .iter()
            .map(|column| column.id.clone())
            .collect();

        table.set_column_pinning(Updater::from_fn(move |old: &ColumnPinningState| {
            let keep = |list: &[String]| -> Vec<String> {
                list.iter().filter(|id| !ids.contains(id)).cloned().collect()
            };
            let mut left = keep(&old.left);
            let mut right = keep(&old.right);
            match position {
                Some(ColumnPinningPosition::Left) => left.extend(ids.iter().cloned()),
                Some(ColumnPinningPosition::Right) => right.extend(ids.iter().cloned()),
                None => {}
            }
            ColumnPinningState { left, right }
        }));
    }

    pub fn get_can_pin(self: &Rc<Self>, table: &Table<T>) -> bool {
        let options = table.options();
        let table_allows = options
            .enable_column_pinning
            .or(options.enable_pinning)
            .unwrap_or(true);
        self.get_leaf_columns(table)
            .iter()
            .any(|leaf| leaf.column_def.enable_pinning.unwrap_or(true) && table_allows)
    }

    /// The section holding any of this column's leaves.
    pub fn get_is_pinned(self: &Rc<Self>, table: &Table<T>) -> Option<ColumnPinningPosition> {
        let leaves = self.get_leaf_columns(table);
        table.with_state(|state| {
            let pinned_in = |list: &[String]| leaves.iter().any(|leaf| list.contains(&leaf.id));
            if pinned_in(&state.column_pinning.left) {
                Some(ColumnPinningPosition::Left)
            } else if pinned_in(&state.column_pinning.right) {
                Some(ColumnPinningPosition::Right)
            } else {
                None
            }
        })
    }

    pub fn get_pinned_index(self: &Rc<Self>, table: &Table<T>) -> Option<usize> {
        let position = self.get_is_pinned(table)?;
        table.with_state(|state| {
            let list = match position {
                ColumnPinningPosition::Left => &state.column_pinning.left,
                ColumnPinningPosition::Right => &state.column_pinning.right,
            };
            list.iter().position(|id| *id == self.id)
        })
    }
}

// ============================================================================
// ROW API
// ============================================================================

fn cells_in_pin_order<T: 'static>(cells: &[Rc<Cell<T>>], ids: &[String]) -> Vec<Rc<Cell<T>>> {
    ids.iter()
        .filter_map(|id| cells.iter().find(|cell| cell.column.id == *id).cloned())
        .collect()
}

/// Splits one row's visible cells into left, center and right sections.
pub(crate) fn split_pinned_cells<T: 'static>(
    cells: Vec<Rc<Cell<T>>>,
    pinning: &ColumnPinningState,
) -> (Vec<Rc<Cell<T>>>, Vec<Rc<Cell<T>>>, Vec<Rc<Cell<T>>>) {
    let left = cells_in_pin_order(&cells, &pinning.left);
    let right = cells_in_pin_order(&cells, &pinning.right);
    let center = cells
        .into_iter()
        .filter(|cell| {
            !pinning.left.contains(&cell.column.id) && !pinning.right.contains(&cell.column.id)
        })
        .collect();
    (left, center, right)
}

impl<T: 'static> Row<T> {
    pub fn get_left_visible_cells(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Cell<T>>> {
        let cells = self.get_all_visible_cells(table);
        table.with_state(|state| cells_in_pin_order(&cells, &state.column_pinning.left))
    }

    pub fn get_right_visible_cells(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Cell<T>>> {
        let cells = self.get_all_visible_cells(table);
        table.with_state(|state| cells_in_pin_order(&cells, &state.column_pinning.right))
    }

    pub fn get_center_visible_cells(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Cell<T>>> {
        let pinning = table.with_state(|state| state.column_pinning.clone());
        split_pinned_cells(self.get_all_visible_cells(table), &pinning).1
    }
}

// ============================================================================
// TABLE API
// ============================================================================

fn columns_in_pin_order<T: 'static>(leaves: &[Rc<Column<T>>], ids: &[String]) -> Columns<T> {
    Rc::new(
        ids.iter()
            .filter_map(|id| leaves.iter().find(|column| column.id == *id).cloned())
            .collect(),
    )
}

impl<T: 'static> Table<T> {
    pub fn set_column_pinning(&self, updater: impl Into<Updater<ColumnPinningState>>) {
        self.update_slice(
            "column_pinning",
            updater.into(),
            self.options().on_column_pinning_change.clone(),
            |state| &mut state.column_pinning,
        );
    }

    pub fn reset_column_pinning(&self, default_state: bool) {
        let next = if default_state {
            ColumnPinningState::default()
        } else {
            self.initial_state().column_pinning.clone()
        };
        self.set_column_pinning(next);
    }

    /// Whether anything is pinned to `position`, or to either side.
    pub fn get_is_some_columns_pinned(&self, position: Option<ColumnPinningPosition>) -> bool {
        self.with_state(|state| match position {
            Some(ColumnPinningPosition::Left) => !state.column_pinning.left.is_empty(),
            Some(ColumnPinningPosition::Right) => !state.column_pinning.right.is_empty(),
            None => !state.column_pinning.left.is_empty() || !state.column_pinning.right.is_empty(),
        })
    }

    pub fn get_left_leaf_columns(&self) -> Columns<T> {
        let leaves = self.get_all_leaf_columns();
        let deps = (Ptr::new(&leaves), self.with_state(|s| s.column_pinning.clone()));
        self.memos
            .left_leaf_columns
            .get(deps, |(leaves, pinning)| columns_in_pin_order(leaves, &pinning.left))
    }

    pub fn get_right_leaf_columns(&self) -> Columns<T> {
        let leaves = self.get_all_leaf_columns();
        let deps = (Ptr::new(&leaves), self.with_state(|s| s.column_pinning.clone()));
        self.memos
            .right_leaf_columns
            .get(deps, |(leaves, pinning)| columns_in_pin_order(leaves, &pinning.right))
    }

    pub fn get_center_leaf_columns(&self) -> Columns<T> {
        let leaves = self.get_all_leaf_columns();
        let deps = (Ptr::new(&leaves), self.with_state(|s| s.column_pinning.clone()));
        self.memos.center_leaf_columns.get(deps, |(leaves, pinning)| {
            Rc::new(
                leaves
                    .iter()
                    .filter(|column| {
                        !pinning.left.contains(&column.id) && !pinning.right.contains(&column.id)
                    })
                    .cloned()
                    .collect(),
            )
        })
    }
}
