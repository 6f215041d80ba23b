//! FILENAME: table-core/src/features/filtering.rs
//! Column filters and the global filter.
//!
//! Filter state only stores values. The filter function for a column is
//! resolved on every derivation: an explicit function, a named one from the
//! options registry or the built-ins, or one inferred from the first row.

use std::rc::Rc;

use crate::column::Column;
use crate::column_def::FnRef;
use crate::feature::TableFeature;
use crate::fns::filter_fns::{self, BuiltInFilterFn, FilterFn};
use crate::row_model::RowModel;
use crate::state::{ColumnFilter, ColumnFiltersState};
use crate::table::Table;
use crate::updater::Updater;
use crate::value::CellValue;

pub const DEFAULT_MAX_LEAF_ROW_FILTER_DEPTH: usize = 100;

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("ColumnFiltering")
        .with_initial_state(|state| {
            state.column_filters = ColumnFiltersState::default();
            state.global_filter = None;
        })
        .with_default_options(|options| {
            if options.max_leaf_row_filter_depth.is_none() {
                options.max_leaf_row_filter_depth = Some(DEFAULT_MAX_LEAF_ROW_FILTER_DEPTH);
            }
            if options.get_column_can_global_filter.is_none() {
                options.get_column_can_global_filter = Some(Rc::new(|table, column| {
                    matches!(
                        first_core_value(table, column),
                        CellValue::Text(_) | CellValue::Number(_)
                    )
                }));
            }
        })
}

/// The column's value in the first core row, used to infer defaults.
pub(crate) fn first_core_value<T: 'static>(table: &Table<T>, column: &Column<T>) -> CellValue {
    table
        .get_core_row_model()
        .flat_rows
        .first()
        .map(|row| row.get_value(table, &column.id))
        .unwrap_or_default()
}

fn resolve_filter_fn<T: 'static>(table: &Table<T>, name: &str) -> Option<FilterFn> {
    let found = table
        .options()
        .filter_fns
        .get(name)
        .cloned()
        .or_else(|| BuiltInFilterFn::from_name(name).map(BuiltInFilterFn::to_fn));
    if found.is_none() {
        log::warn!("[filtering] unknown filter function '{}'", name);
    }
    found
}

fn should_auto_remove(filter_fn: Option<&FilterFn>, value: &CellValue) -> bool {
    match filter_fn {
        Some(filter_fn) => filter_fn.should_auto_remove(value),
        None => value.is_blank(),
    }
}

// ============================================================================
// COLUMN API
// ============================================================================

impl<T: 'static> Column<T> {
    pub fn get_auto_filter_fn(&self, table: &Table<T>) -> FilterFn {
        match first_core_value(table, self) {
            CellValue::Text(_) => filter_fns::includes_string(),
            CellValue::Number(_) => filter_fns::in_number_range(),
            CellValue::Boolean(_) | CellValue::Date(_) => filter_fns::equals(),
            CellValue::List(_) => filter_fns::arr_includes(),
            CellValue::Empty => filter_fns::weak_equals(),
        }
    }

    /// `None` when the definition names a function that does not exist.
    pub fn get_filter_fn(&self, table: &Table<T>) -> Option<FilterFn> {
        match &self.column_def.filter_fn {
            None | Some(FnRef::Auto) => Some(self.get_auto_filter_fn(table)),
            Some(FnRef::Named(name)) => resolve_filter_fn(table, name),
            Some(FnRef::Custom(filter_fn)) => Some(filter_fn.clone()),
        }
    }

    pub fn get_can_filter(&self, table: &Table<T>) -> bool {
        let options = table.options();
        self.column_def.enable_column_filter.unwrap_or(true)
            && options.enable_column_filters.unwrap_or(true)
            && options.enable_filters.unwrap_or(true)
            && self.accessor_fn.is_some()
    }

    pub fn get_can_global_filter(&self, table: &Table<T>) -> bool {
        let options = table.options();
        let column_allowed = options
            .get_column_can_global_filter
            .as_ref()
            .map_or(true, |f| f(table, self));
        self.column_def.enable_global_filter.unwrap_or(true)
            && options.enable_global_filter.unwrap_or(true)
            && options.enable_filters.unwrap_or(true)
            && column_allowed
            && self.accessor_fn.is_some()
    }

    pub fn get_is_filtered(&self, table: &Table<T>) -> bool {
        self.get_filter_index(table).is_some()
    }

    pub fn get_filter_value(&self, table: &Table<T>) -> Option<CellValue> {
        table.with_state(|state| {
            state
                .column_filters
                .iter()
                .find(|filter| filter.id == self.id)
                .map(|filter| filter.value.clone())
        })
    }

    pub fn get_filter_index(&self, table: &Table<T>) -> Option<usize> {
        table.with_state(|state| state.column_filters.iter().position(|filter| filter.id == self.id))
    }

    /// Sets this column's filter value. A value the filter function
    /// considers empty removes the filter instead.
    pub fn set_filter_value(&self, table: &Table<T>, updater: impl Into<Updater<CellValue>>) {
        let updater = updater.into();
        let filter_fn = self.get_filter_fn(table);
        let id = self.id.clone();

        table.set_column_filters(Updater::from_fn(move |old: &ColumnFiltersState| {
            let previous = old.iter().find(|filter| filter.id == id);
            let value = updater.apply(&previous.map(|f| f.value.clone()).unwrap_or_default());

            if should_auto_remove(filter_fn.as_ref(), &value) {
                return old.iter().filter(|filter| filter.id != id).cloned().collect();
            }

            let next = ColumnFilter { id: id.clone(), value };
            if previous.is_some() {
                old.iter()
                    .map(|filter| if filter.id == id { next.clone() } else { filter.clone() })
                    .collect()
            } else {
                let mut filters = old.clone();
                filters.push(next);
                filters
            }
        }));
    }
}

// ============================================================================
// TABLE API
// ============================================================================

impl<T: 'static> Table<T> {
    /// Replaces the column filters, dropping entries whose value the
    /// column's filter function would auto-remove.
    pub fn set_column_filters(&self, updater: impl Into<Updater<ColumnFiltersState>>) {
        let updater = updater.into();
        let filter_fns: Vec<(String, Option<FilterFn>)> = self
            .get_all_leaf_columns()
            .iter()
            .map(|column| (column.id.clone(), column.get_filter_fn(self)))
            .collect();

        let pruned = Updater::from_fn(move |old: &ColumnFiltersState| {
            updater
                .apply(old)
                .into_iter()
                .filter(|filter| {
                    match filter_fns.iter().find(|(id, _)| *id == filter.id) {
                        Some((_, filter_fn)) => !should_auto_remove(filter_fn.as_ref(), &filter.value),
                        None => true,
                    }
                })
                .collect()
        });

        self.update_slice(
            "column_filters",
            pruned,
            self.options().on_column_filters_change.clone(),
            |state| &mut state.column_filters,
        );
    }

    pub fn reset_column_filters(&self, default_state: bool) {
        let next = if default_state {
            ColumnFiltersState::default()
        } else {
            self.initial_state().column_filters.clone()
        };
        self.set_column_filters(next);
    }

    /// The global filter function; `includes_string` unless configured.
    pub fn get_global_filter_fn(&self) -> Option<FilterFn> {
        match &self.options().global_filter_fn {
            None | Some(FnRef::Auto) => Some(filter_fns::includes_string()),
            Some(FnRef::Named(name)) => resolve_filter_fn(self, name),
            Some(FnRef::Custom(filter_fn)) => Some(filter_fn.clone()),
        }
    }

    pub fn set_global_filter(&self, updater: impl Into<Updater<Option<CellValue>>>) {
        self.update_slice(
            "global_filter",
            updater.into(),
            self.options().on_global_filter_change.clone(),
            |state| &mut state.global_filter,
        );
    }

    pub fn reset_global_filter(&self, default_state: bool) {
        let next = if default_state {
            None
        } else {
            self.initial_state().global_filter.clone()
        };
        self.set_global_filter(next);
    }

    pub fn get_pre_filtered_row_model(&self) -> Rc<RowModel<T>> {
        self.get_core_row_model()
    }

    pub fn get_filtered_row_model(&self) -> Rc<RowModel<T>> {
        let options = self.options();
        match &options.get_filtered_row_model {
            Some(stage) if !options.manual_filtering => stage(self),
            _ => self.get_pre_filtered_row_model(),
        }
    }
}
