//! FILENAME: table-core/src/features/visibility.rs
//! Column visibility.

use std::rc::Rc;

use crate::cell::Cell;
use crate::column::Column;
use crate::event::EventHandler;
use crate::feature::TableFeature;
use crate::features::pinning::{split_pinned_cells, ColumnPosition};
use crate::memo::Ptr;
use crate::row::Row;
use crate::state::ColumnVisibilityState;
use crate::table::{Columns, Table};
use crate::updater::Updater;

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("ColumnVisibility").with_initial_state(|state| {
        state.column_visibility = ColumnVisibilityState::default();
    })
}

// ============================================================================
// COLUMN API
// ============================================================================

impl<T: 'static> Column<T> {
    /// A group column is visible while any child is; a leaf column unless
    /// the visibility map hides it.
    pub fn get_is_visible(&self, table: &Table<T>) -> bool {
        if !self.columns.is_empty() {
            return self.columns.iter().any(|child| child.get_is_visible(table));
        }
        table.with_state(|state| state.column_visibility.get(&self.id).copied().unwrap_or(true))
    }

    pub fn get_can_hide(&self, table: &Table<T>) -> bool {
        self.column_def.enable_hiding.unwrap_or(true) && table.options().enable_hiding.unwrap_or(true)
    }

    /// Shows or hides the column; flips it when `value` is `None`.
    pub fn toggle_visibility(&self, table: &Table<T>, value: Option<bool>) {
        if !self.get_can_hide(table) {
            return;
        }
        let visible = value.unwrap_or_else(|| !self.get_is_visible(table));
        let id = self.id.clone();
        table.set_column_visibility(Updater::from_fn(move |old: &ColumnVisibilityState| {
            let mut next = old.clone();
            next.insert(id, visible);
            next
        }));
    }

    pub fn get_toggle_visibility_handler(self: &Rc<Self>, table: &Table<T>) -> EventHandler {
        let column = Rc::clone(self);
        let handle = table.handle();
        Box::new(move |event| {
            if let Some(table) = handle.upgrade() {
                column.toggle_visibility(&table, event.checked);
            }
        })
    }
}

// ============================================================================
// ROW API
// ============================================================================

impl<T: 'static> Row<T> {
    /// Cells of visible columns: left-pinned, center, then right-pinned.
    pub fn get_visible_cells(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Cell<T>>> {
        let pinning = table.with_state(|state| state.column_pinning.clone());
        let (mut cells, center, right) =
            split_pinned_cells(self.get_all_visible_cells(table), &pinning);
        cells.extend(center);
        cells.extend(right);
        cells
    }

    pub(crate) fn get_all_visible_cells(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Cell<T>>> {
        self.get_all_cells(table)
            .into_iter()
            .filter(|cell| cell.column.get_is_visible(table))
            .collect()
    }
}

// ============================================================================
// TABLE API
// ============================================================================

fn only_visible<T: 'static>(table: &Table<T>, columns: &[Rc<Column<T>>]) -> Columns<T> {
    Rc::new(
        columns
            .iter()
            .filter(|column| column.get_is_visible(table))
            .cloned()
            .collect(),
    )
}

impl<T: 'static> Table<T> {
    pub fn get_visible_flat_columns(&self) -> Columns<T> {
        let flat = self.get_all_flat_columns();
        let deps = (Ptr::new(&flat), self.with_state(|s| s.column_visibility.clone()));
        self.memos
            .visible_flat_columns
            .get(deps, |(flat, _)| only_visible(self, flat))
    }

    pub fn get_visible_leaf_columns(&self) -> Columns<T> {
        let leaves = self.get_all_leaf_columns();
        let deps = (Ptr::new(&leaves), self.with_state(|s| s.column_visibility.clone()));
        self.memos
            .visible_leaf_columns
            .get(deps, |(leaves, _)| only_visible(self, leaves))
    }

    pub fn get_left_visible_leaf_columns(&self) -> Columns<T> {
        let leaves = self.get_left_leaf_columns();
        let deps = (Ptr::new(&leaves), self.with_state(|s| s.column_visibility.clone()));
        self.memos
            .left_visible_leaf_columns
            .get(deps, |(leaves, _)| only_visible(self, leaves))
    }

    pub fn get_center_visible_leaf_columns(&self) -> Columns<T> {
        let leaves = self.get_center_leaf_columns();
        let deps = (Ptr::new(&leaves), self.with_state(|s| s.column_visibility.clone()));
        self.memos
            .center_visible_leaf_columns
            .get(deps, |(leaves, _)| only_visible(self, leaves))
    }

    pub fn get_right_visible_leaf_columns(&self) -> Columns<T> {
        let leaves = self.get_right_leaf_columns();
        let deps = (Ptr::new(&leaves), self.with_state(|s| s.column_visibility.clone()));
        self.memos
            .right_visible_leaf_columns
            .get(deps, |(leaves, _)| only_visible(self, leaves))
    }

    pub(crate) fn visible_leaf_columns_at(&self, position: Option<ColumnPosition>) -> Columns<T> {
        match position {
            None => self.get_visible_leaf_columns(),
            Some(ColumnPosition::Left) => self.get_left_visible_leaf_columns(),
            Some(ColumnPosition::Center) => self.get_center_visible_leaf_columns(),
            Some(ColumnPosition::Right) => self.get_right_visible_leaf_columns(),
        }
    }

    pub fn set_column_visibility(&self, updater: impl Into<Updater<ColumnVisibilityState>>) {
        self.update_slice(
            "column_visibility",
            updater.into(),
            self.options().on_column_visibility_change.clone(),
            |state| &mut state.column_visibility,
        );
    }

    pub fn reset_column_visibility(&self, default_state: bool) {
        let next = if default_state {
            ColumnVisibilityState::default()
        } else {
            self.initial_state().column_visibility.clone()
        };
        self.set_column_visibility(next);
    }

    /// Shows every leaf column, or hides every hideable one. Flips the
    /// current "all visible" state when `value` is `None`.
    pub fn toggle_all_columns_visible(&self, value: Option<bool>) {
        let value = value.unwrap_or_else(|| !self.get_is_all_columns_visible());
        let next: ColumnVisibilityState = self
            .get_all_leaf_columns()
            .iter()
            .map(|column| {
                let visible = if value { true } else { !column.get_can_hide(self) };
                (column.id.clone(), visible)
            })
            .collect();
        self.set_column_visibility(next);
    }

    pub fn get_is_all_columns_visible(&self) -> bool {
        self.get_all_leaf_columns()
            .iter()
            .all(|column| column.get_is_visible(self))
    }

    pub fn get_is_some_columns_visible(&self) -> bool {
        self.get_all_leaf_columns()
            .iter()
            .any(|column| column.get_is_visible(self))
    }

    pub fn get_toggle_all_columns_visibility_handler(&self) -> EventHandler {
        let handle = self.handle();
        Box::new(move |event| {
            if let Some(table) = handle.upgrade() {
                table.toggle_all_columns_visible(event.checked);
            }
        })
    }
}
