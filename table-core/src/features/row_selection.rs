//! FILENAME: table-core/src/features/row_selection.rs
//! Row selection.
//!
//! Selection state only ever holds `true` entries. Selecting a row selects
//! its selectable descendants too (unless told otherwise), and a parent's
//! tri-state is derived from its selectable descendants.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::event::EventHandler;
use crate::feature::TableFeature;
use crate::memo::{Memo, Ptr};
use crate::row::Row;
use crate::row_model::RowModel;
use crate::state::RowSelectionState;
use crate::table::Table;
use crate::updater::Updater;

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("RowSelection").with_initial_state(|state| {
        state.row_selection = RowSelectionState::default();
    })
}

/// How much of a row's selectable subtree is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubRowSelection {
    Unselected,
    Partial,
    All,
}

// ============================================================================
// HELPERS
// ============================================================================

fn is_row_selected<T: 'static>(row: &Row<T>, selection: &RowSelectionState) -> bool {
    selection.get(&row.id).copied().unwrap_or(false)
}

/// Walks the selectable descendants of `row`, stopping as soon as both a
/// selected and an unselected one have been seen. Unselectable descendants
/// count for neither side.
fn sub_row_selection<T: 'static>(
    row: &Row<T>,
    selection: &RowSelectionState,
    table: &Table<T>,
) -> SubRowSelection {
    fn walk<T: 'static>(
        rows: &[Rc<Row<T>>],
        selection: &RowSelectionState,
        table: &Table<T>,
        seen: &mut (bool, bool),
    ) {
        for row in rows {
            if seen.0 && seen.1 {
                return;
            }
            if row.get_can_select(table) {
                if is_row_selected(row, selection) {
                    seen.0 = true;
                } else {
                    seen.1 = true;
                }
            }
            walk(&row.sub_rows, selection, table, seen);
        }
    }

    if row.sub_rows.is_empty() {
        return SubRowSelection::Unselected;
    }
    let mut seen = (false, false);
    walk(&row.sub_rows, selection, table, &mut seen);
    match seen {
        (_, false) => SubRowSelection::All,
        (true, true) => SubRowSelection::Partial,
        (false, true) => SubRowSelection::Unselected,
    }
}

/// Writes `value` for `row` into `selection`, cascading into children when
/// `include_children` is set and the row allows it.
fn mutate_row_is_selected<T: 'static>(
    selection: &mut RowSelectionState,
    row: &Row<T>,
    value: bool,
    include_children: bool,
    table: &Table<T>,
) {
    if value {
        if !row.get_can_multi_select(table) {
            selection.clear();
        }
        if row.get_can_select(table) {
            selection.insert(row.id.clone(), true);
        }
    } else {
        selection.remove(&row.id);
    }

    if include_children && !row.sub_rows.is_empty() && row.get_can_select_sub_rows(table) {
        for sub_row in &row.sub_rows {
            mutate_row_is_selected(selection, sub_row, value, include_children, table);
        }
    }
}

/// The selected subset of `row_model`. A row survives when it is selected
/// or when any of its descendants survives.
pub fn select_rows<T: 'static>(
    table: &Table<T>,
    row_model: &RowModel<T>,
    selection: &RowSelectionState,
) -> RowModel<T> {
    fn retain<T: 'static>(
        table: &Table<T>,
        rows: &[Rc<Row<T>>],
        selection: &RowSelectionState,
    ) -> Vec<Rc<Row<T>>> {
        rows.iter()
            .filter_map(|row| {
                let sub_rows = retain(table, &row.sub_rows, selection);
                if !is_row_selected(row, selection) && sub_rows.is_empty() {
                    return None;
                }
                let unchanged = sub_rows.len() == row.sub_rows.len()
                    && sub_rows
                        .iter()
                        .zip(row.sub_rows.iter())
                        .all(|(a, b)| Rc::ptr_eq(a, b));
                if unchanged {
                    Some(Rc::clone(row))
                } else {
                    Some(table.create_row(row.with_sub_rows(sub_rows)))
                }
            })
            .collect()
    }

    RowModel::new(retain(table, &row_model.rows, selection))
}

// ============================================================================
// ROW API
// ============================================================================

impl<T: 'static> Row<T> {
    /// Selects or deselects the row; flips it when `value` is `None`.
    /// Children follow unless `select_children` is `Some(false)`.
    pub fn toggle_selected(&self, table: &Table<T>, value: Option<bool>, select_children: Option<bool>) {
        let is_selected = self.get_is_selected(table);
        let value = value.unwrap_or(!is_selected);
        if self.get_can_select(table) && is_selected == value {
            return;
        }

        let id = self.id.clone();
        let handle = table.handle();
        table.set_row_selection(Updater::from_fn(move |old: &RowSelectionState| {
            let mut next = old.clone();
            if let Some(table) = handle.upgrade() {
                if let Some(row) = table.find_row(&id) {
                    mutate_row_is_selected(&mut next, &row, value, select_children.unwrap_or(true), &table);
                }
            }
            next
        }));
    }

    pub fn get_is_selected(&self, table: &Table<T>) -> bool {
        table.with_state(|state| is_row_selected(self, &state.row_selection))
    }

    pub fn get_sub_row_selection(&self, table: &Table<T>) -> SubRowSelection {
        let selection = table.with_state(|state| state.row_selection.clone());
        sub_row_selection(self, &selection, table)
    }

    /// Some, but not all, selectable descendants are selected.
    pub fn get_is_some_selected(&self, table: &Table<T>) -> bool {
        self.get_sub_row_selection(table) == SubRowSelection::Partial
    }

    pub fn get_is_all_sub_rows_selected(&self, table: &Table<T>) -> bool {
        self.get_sub_row_selection(table) == SubRowSelection::All
    }

    pub fn get_can_select(&self, table: &Table<T>) -> bool {
        table
            .options()
            .enable_row_selection
            .as_ref()
            .map_or(true, |flag| flag.resolve(self))
    }

    pub fn get_can_select_sub_rows(&self, table: &Table<T>) -> bool {
        table
            .options()
            .enable_sub_row_selection
            .as_ref()
            .map_or(true, |flag| flag.resolve(self))
    }

    pub fn get_can_multi_select(&self, table: &Table<T>) -> bool {
        table
            .options()
            .enable_multi_row_selection
            .as_ref()
            .map_or(true, |flag| flag.resolve(self))
    }

    /// A checkbox handler: the event's checked state wins, otherwise flips.
    pub fn get_toggle_selected_handler(self: &Rc<Self>, table: &Table<T>) -> EventHandler {
        let can_select = self.get_can_select(table);
        let row = Rc::clone(self);
        let handle = table.handle();
        Box::new(move |event| {
            if !can_select {
                return;
            }
            if let Some(table) = handle.upgrade() {
                row.toggle_selected(&table, event.checked, None);
            }
        })
    }
}

// ============================================================================
// TABLE API
// ============================================================================

impl<T: 'static> Table<T> {
    pub fn set_row_selection(&self, updater: impl Into<Updater<RowSelectionState>>) {
        self.update_slice(
            "row_selection",
            updater.into(),
            self.options().on_row_selection_change.clone(),
            |state| &mut state.row_selection,
        );
    }

    pub fn reset_row_selection(&self, default_state: bool) {
        let next = if default_state {
            RowSelectionState::default()
        } else {
            self.initial_state().row_selection.clone()
        };
        self.set_row_selection(next);
    }

    /// Selects every selectable row before grouping, or deselects them all.
    pub fn toggle_all_rows_selected(&self, value: Option<bool>) {
        let value = value.unwrap_or_else(|| !self.get_is_all_rows_selected());
        let rows: Vec<(String, bool)> = self
            .get_pre_grouped_row_model()
            .flat_rows
            .iter()
            .map(|row| (row.id.clone(), row.get_can_select(self)))
            .collect();

        self.set_row_selection(Updater::from_fn(move |old: &RowSelectionState| {
            let mut next = old.clone();
            for (id, can_select) in rows {
                if !value {
                    next.remove(&id);
                } else if can_select {
                    next.insert(id, true);
                }
            }
            next
        }));
    }

    /// Selects or deselects the rendered rows and their children.
    pub fn toggle_all_page_rows_selected(&self, value: Option<bool>) {
        let value = value.unwrap_or_else(|| !self.get_is_all_page_rows_selected());
        let page = self.get_row_model();
        let handle = self.handle();

        self.set_row_selection(Updater::from_fn(move |old: &RowSelectionState| {
            let mut next = old.clone();
            if let Some(table) = handle.upgrade() {
                for row in &page.rows {
                    mutate_row_is_selected(&mut next, row, value, true, &table);
                }
            }
            next
        }));
    }

    pub fn get_pre_selected_row_model(&self) -> Rc<RowModel<T>> {
        self.get_core_row_model()
    }

    /// Selected rows out of the core row model.
    pub fn get_selected_row_model(&self) -> Rc<RowModel<T>> {
        let rows = self.get_pre_selected_row_model();
        self.selected_from(&self.memos.selected_row_model, rows)
    }

    /// Selected rows out of the filtered row model.
    pub fn get_filtered_selected_row_model(&self) -> Rc<RowModel<T>> {
        let rows = self.get_filtered_row_model();
        self.selected_from(&self.memos.filtered_selected_row_model, rows)
    }

    /// Selected rows out of the grouped and sorted row model.
    pub fn get_grouped_selected_row_model(&self) -> Rc<RowModel<T>> {
        let rows = self.get_sorted_row_model();
        self.selected_from(&self.memos.grouped_selected_row_model, rows)
    }

    fn selected_from(
        &self,
        memo: &Memo<(Ptr<RowModel<T>>, RowSelectionState), Rc<RowModel<T>>>,
        rows: Rc<RowModel<T>>,
    ) -> Rc<RowModel<T>> {
        let deps = (Ptr::new(&rows), self.with_state(|state| state.row_selection.clone()));
        memo.get(deps, |(rows, selection)| {
            if selection.is_empty() {
                return Rc::new(RowModel::empty());
            }
            Rc::new(select_rows(self, rows, selection))
        })
    }

    /// Every selectable filtered row is selected (and there is at least one
    /// selection).
    pub fn get_is_all_rows_selected(&self) -> bool {
        let rows = self.get_filtered_row_model();
        self.with_state(|state| {
            let selection = &state.row_selection;
            !rows.flat_rows.is_empty()
                && !selection.is_empty()
                && rows
                    .flat_rows
                    .iter()
                    .all(|row| !row.get_can_select(self) || is_row_selected(row, selection))
        })
    }

    pub fn get_is_all_page_rows_selected(&self) -> bool {
        let page = self.get_pagination_row_model();
        let selectable: Vec<&Rc<Row<T>>> =
            page.flat_rows.iter().filter(|row| row.get_can_select(self)).collect();
        self.with_state(|state| {
            !selectable.is_empty()
                && selectable
                    .iter()
                    .all(|row| is_row_selected(row, &state.row_selection))
        })
    }

    pub fn get_is_some_rows_selected(&self) -> bool {
        let total_selected = self.with_state(|state| state.row_selection.len());
        total_selected > 0 && total_selected < self.get_filtered_row_model().flat_rows.len()
    }

    pub fn get_is_some_page_rows_selected(&self) -> bool {
        if self.get_is_all_page_rows_selected() {
            return false;
        }
        self.get_pagination_row_model()
            .flat_rows
            .iter()
            .filter(|row| row.get_can_select(self))
            .any(|row| row.get_is_selected(self) || row.get_is_some_selected(self))
    }

    pub fn get_toggle_all_rows_selected_handler(&self) -> EventHandler {
        let handle = self.handle();
        Box::new(move |event| {
            if let Some(table) = handle.upgrade() {
                table.toggle_all_rows_selected(event.checked);
            }
        })
    }

    pub fn get_toggle_all_page_rows_selected_handler(&self) -> EventHandler {
        let handle = self.handle();
        Box::new(move |event| {
            if let Some(table) = handle.upgrade() {
                table.toggle_all_page_rows_selected(event.checked);
            }
        })
    }
}
