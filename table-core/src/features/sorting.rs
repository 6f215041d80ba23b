//! FILENAME: table-core/src/features/sorting.rs
//! Row sorting.
//!
//! Sorting state is an ordered list of `(column id, desc)` entries; earlier
//! entries take precedence. Toggling cycles a column through its first
//! direction, the opposite direction and (when removal is enabled) unsorted.

use std::rc::Rc;

use crate::column::Column;
use crate::column_def::FnRef;
use crate::event::{EventHandler, ToggleEvent};
use crate::feature::TableFeature;
use crate::fns::sorting_fns::{has_numeric_chunk, BuiltInSortingFn};
use crate::fns::SortingFn;
use crate::row_model::RowModel;
use crate::state::{ColumnSort, SortDirection, SortingState};
use crate::table::Table;
use crate::updater::Updater;
use crate::value::CellValue;

/// Rows inspected when inferring a sorting function.
const AUTO_SORT_SAMPLE_ROWS: usize = 10;

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("RowSorting")
        .with_initial_state(|state| {
            state.sorting = SortingState::default();
        })
        .with_default_options(|options| {
            if options.is_multi_sort_event.is_none() {
                options.is_multi_sort_event = Some(Rc::new(|event: &ToggleEvent| event.shift_key));
            }
        })
}

/// What a toggle does to the sorting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortAction {
    Add,
    Toggle,
    Remove,
    Replace,
}

// ============================================================================
// COLUMN API
// ============================================================================

impl<T: 'static> Column<T> {
    /// Inferred from a sample of filtered rows: dates sort as datetimes,
    /// text containing digits alphanumerically, other text as text, and
    /// everything else with `basic`.
    pub fn get_auto_sorting_fn(&self, table: &Table<T>) -> SortingFn {
        let filtered = table.get_filtered_row_model();
        let mut saw_text = false;
        for row in filtered.flat_rows.iter().take(AUTO_SORT_SAMPLE_ROWS) {
            match row.get_value(table, &self.id) {
                CellValue::Date(_) => return BuiltInSortingFn::Datetime.to_fn(),
                CellValue::Text(text) => {
                    saw_text = true;
                    if has_numeric_chunk(&text) {
                        return BuiltInSortingFn::Alphanumeric.to_fn();
                    }
                }
                _ => {}
            }
        }
        if saw_text {
            BuiltInSortingFn::Text.to_fn()
        } else {
            BuiltInSortingFn::Basic.to_fn()
        }
    }

    /// Text columns start ascending, everything else descending.
    pub fn get_auto_sort_dir(&self, table: &Table<T>) -> SortDirection {
        let first = table
            .get_filtered_row_model()
            .flat_rows
            .first()
            .map(|row| row.get_value(table, &self.id));
        match first {
            Some(CellValue::Text(_)) => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    /// `None` when the definition names a function that does not exist.
    pub fn get_sorting_fn(&self, table: &Table<T>) -> Option<SortingFn> {
        match &self.column_def.sorting_fn {
            None | Some(FnRef::Auto) => Some(self.get_auto_sorting_fn(table)),
            Some(FnRef::Custom(sorting_fn)) => Some(Rc::clone(sorting_fn)),
            Some(FnRef::Named(name)) => {
                let found = table
                    .options()
                    .sorting_fns
                    .get(name)
                    .cloned()
                    .or_else(|| BuiltInSortingFn::from_name(name).map(BuiltInSortingFn::to_fn));
                if found.is_none() {
                    log::warn!("[sorting] unknown sorting function '{}'", name);
                }
                found
            }
        }
    }

    pub fn get_first_sort_dir(&self, table: &Table<T>) -> SortDirection {
        let desc_first = self
            .column_def
            .sort_desc_first
            .or(table.options().sort_desc_first)
            .unwrap_or_else(|| self.get_auto_sort_dir(table) == SortDirection::Desc);
        if desc_first {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    /// The direction the next toggle moves to; `None` means removal.
    pub fn get_next_sorting_order(&self, table: &Table<T>, multi: bool) -> Option<SortDirection> {
        let first = self.get_first_sort_dir(table);
        let Some(current) = self.get_is_sorted(table) else {
            return Some(first);
        };

        let options = table.options();
        let removal_allowed = options.enable_sorting_removal.unwrap_or(true)
            && (!multi || options.enable_multi_remove.unwrap_or(true));
        if current != first && removal_allowed {
            return None;
        }
        match current {
            SortDirection::Desc => Some(SortDirection::Asc),
            SortDirection::Asc => Some(SortDirection::Desc),
        }
    }

    /// Sorts by this column. `desc` forces a direction; `multi` adds to the
    /// existing sort instead of replacing it when the column allows it.
    pub fn toggle_sorting(&self, table: &Table<T>, desc: Option<bool>, multi: bool) {
        let next_order = self.get_next_sorting_order(table, multi);
        let can_multi_sort = self.get_can_multi_sort(table);
        let max_sort_columns = table.options().max_multi_sort_col_count;
        let id = self.id.clone();

        table.set_sorting(Updater::from_fn(move |old: &SortingState| {
            let existing_index = old.iter().position(|sort| sort.id == id);
            let next_desc = desc.unwrap_or(next_order == Some(SortDirection::Desc));

            let mut action = if !old.is_empty() && can_multi_sort && multi {
                if existing_index.is_some() {
                    SortAction::Toggle
                } else {
                    SortAction::Add
                }
            } else if !old.is_empty() && existing_index != Some(old.len() - 1) {
                SortAction::Replace
            } else if existing_index.is_some() {
                SortAction::Toggle
            } else {
                SortAction::Replace
            };

            if action == SortAction::Toggle && desc.is_none() && next_order.is_none() {
                action = SortAction::Remove;
            }

            match action {
                SortAction::Add => {
                    let mut next = old.clone();
                    next.push(ColumnSort { id, desc: next_desc });
                    let limit = max_sort_columns.unwrap_or(usize::MAX);
                    if next.len() > limit {
                        next.drain(..next.len() - limit);
                    }
                    next
                }
                SortAction::Toggle => old
                    .iter()
                    .map(|sort| {
                        if sort.id == id {
                            ColumnSort { id: sort.id.clone(), desc: next_desc }
                        } else {
                            sort.clone()
                        }
                    })
                    .collect(),
                SortAction::Remove => old.iter().filter(|sort| sort.id != id).cloned().collect(),
                SortAction::Replace => vec![ColumnSort { id, desc: next_desc }],
            }
        }));
    }

    pub fn get_can_sort(&self, table: &Table<T>) -> bool {
        self.column_def.enable_sorting.unwrap_or(true)
            && table.options().enable_sorting.unwrap_or(true)
            && self.accessor_fn.is_some()
    }

    pub fn get_can_multi_sort(&self, table: &Table<T>) -> bool {
        self.column_def
            .enable_multi_sort
            .or(table.options().enable_multi_sort)
            .unwrap_or_else(|| self.accessor_fn.is_some())
    }

    pub fn get_is_sorted(&self, table: &Table<T>) -> Option<SortDirection> {
        table.with_state(|state| {
            state.sorting.iter().find(|sort| sort.id == self.id).map(|sort| {
                if sort.desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                }
            })
        })
    }

    pub fn get_sort_index(&self, table: &Table<T>) -> Option<usize> {
        table.with_state(|state| state.sorting.iter().position(|sort| sort.id == self.id))
    }

    pub fn clear_sorting(&self, table: &Table<T>) {
        let id = self.id.clone();
        table.set_sorting(Updater::from_fn(move |old: &SortingState| {
            old.iter().filter(|sort| sort.id != id).cloned().collect()
        }));
    }

    /// A click handler: toggles sorting, multi-sorting when the table's
    /// multi-sort event test accepts the event.
    pub fn get_toggle_sorting_handler(self: &Rc<Self>, table: &Table<T>) -> EventHandler {
        let can_sort = self.get_can_sort(table);
        let column = Rc::clone(self);
        let handle = table.handle();
        Box::new(move |event| {
            if !can_sort {
                return;
            }
            let Some(table) = handle.upgrade() else {
                return;
            };
            let multi = column.get_can_multi_sort(&table)
                && table
                    .options()
                    .is_multi_sort_event
                    .as_ref()
                    .map_or(false, |is_multi| is_multi(event));
            column.toggle_sorting(&table, None, multi);
        })
    }
}

// ============================================================================
// TABLE API
// ============================================================================

impl<T: 'static> Table<T> {
    pub fn set_sorting(&self, updater: impl Into<Updater<SortingState>>) {
        self.update_slice(
            "sorting",
            updater.into(),
            self.options().on_sorting_change.clone(),
            |state| &mut state.sorting,
        );
    }

    pub fn reset_sorting(&self, default_state: bool) {
        let next = if default_state {
            SortingState::default()
        } else {
            self.initial_state().sorting.clone()
        };
        self.set_sorting(next);
    }

    pub fn get_pre_sorted_row_model(&self) -> Rc<RowModel<T>> {
        self.get_grouped_row_model()
    }

    pub fn get_sorted_row_model(&self) -> Rc<RowModel<T>> {
        let options = self.options();
        match &options.get_sorted_row_model {
            Some(stage) if !options.manual_sorting => stage(self),
            _ => self.get_pre_sorted_row_model(),
        }
    }
}
