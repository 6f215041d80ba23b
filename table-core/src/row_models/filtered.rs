//! FILENAME: table-core/src/row_models/filtered.rs
//! The filtered row model.
//!
//! Every row of the input is tested once against each resolved column
//! filter and, when a global filter is set, against the global filter over
//! all globally filterable columns. Rows are then kept either top-down (a
//! failing parent drops its subtree) or bottom-up when
//! `filter_from_leaf_rows` is set (a parent survives if any descendant does).

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::fns::FilterFn;
use crate::memo::{Memo, Ptr};
use crate::options::RowModelFn;
use crate::row::Row;
use crate::row_model::RowModel;
use crate::state::{ColumnFilter, ColumnFiltersState};
use crate::table::Table;
use crate::value::CellValue;

type FilteredDeps<T> = (Ptr<RowModel<T>>, ColumnFiltersState, Option<CellValue>);

pub fn filtered_row_model<T: 'static>() -> RowModelFn<T> {
    let memo: Memo<FilteredDeps<T>, Rc<RowModel<T>>> = Memo::new("filtered_row_model");
    Rc::new(move |table: &Table<T>| {
        let pre = table.get_pre_filtered_row_model();
        let deps = table.with_state(|state| {
            (Ptr::new(&pre), state.column_filters.clone(), state.global_filter.clone())
        });
        memo.get(deps, |(pre, column_filters, global_filter)| {
            filter_row_model(table, &pre.0, column_filters, global_filter.as_ref())
        })
    })
}

struct ResolvedFilter {
    column_id: String,
    filter_fn: FilterFn,
    value: CellValue,
}

/// Applies `column_filters` and `global_filter` to `pre`. Returns `pre`
/// itself when there is nothing to filter.
pub(crate) fn filter_row_model<T: 'static>(
    table: &Table<T>,
    pre: &Rc<RowModel<T>>,
    column_filters: &[ColumnFilter],
    global_filter: Option<&CellValue>,
) -> Rc<RowModel<T>> {
    let global_filter = global_filter.filter(|value| !value.is_blank());
    if pre.rows.is_empty() || (column_filters.is_empty() && global_filter.is_none()) {
        return Rc::clone(pre);
    }

    let mut resolved = Vec::with_capacity(column_filters.len());
    for filter in column_filters {
        let Some(column) = table.find_column(&filter.id) else {
            continue;
        };
        let Some(filter_fn) = column.get_filter_fn(table) else {
            log::warn!("[filtering] could not find a valid filter function for column '{}'", filter.id);
            continue;
        };
        let value = filter_fn.resolve(&filter.value);
        resolved.push(ResolvedFilter {
            column_id: filter.id.clone(),
            filter_fn,
            value,
        });
    }

    let mut global = Vec::new();
    if let (Some(global_value), Some(global_fn)) = (global_filter, table.get_global_filter_fn()) {
        let value = global_fn.resolve(global_value);
        for column in table.get_all_leaf_columns().iter() {
            if column.get_can_global_filter(table) {
                global.push(ResolvedFilter {
                    column_id: column.id.clone(),
                    filter_fn: global_fn.clone(),
                    value: value.clone(),
                });
            }
        }
    }

    let passes: FxHashMap<String, bool> = pre
        .flat_rows
        .iter()
        .map(|row| {
            let columns_pass = resolved.iter().all(|filter| {
                filter
                    .filter_fn
                    .test(&row.get_value(table, &filter.column_id), &filter.value)
            });
            let global_pass = global.is_empty()
                || global.iter().any(|filter| {
                    filter
                        .filter_fn
                        .test(&row.get_value(table, &filter.column_id), &filter.value)
                });
            (row.id.clone(), columns_pass && global_pass)
        })
        .collect();

    let keep = |row: &Row<T>| passes.get(&row.id).copied().unwrap_or(true);
    let options = table.options();
    let max_depth = options
        .max_leaf_row_filter_depth
        .unwrap_or(crate::features::filtering::DEFAULT_MAX_LEAF_ROW_FILTER_DEPTH);

    let rows = if options.filter_from_leaf_rows {
        filter_from_leaves(table, &pre.rows, &keep, 0, max_depth)
    } else {
        filter_from_root(table, &pre.rows, &keep, 0, max_depth)
    };
    Rc::new(RowModel::new(rows))
}

fn filter_from_root<T: 'static>(
    table: &Table<T>,
    rows: &[Rc<Row<T>>],
    keep: &dyn Fn(&Row<T>) -> bool,
    depth: usize,
    max_depth: usize,
) -> Vec<Rc<Row<T>>> {
    rows.iter()
        .filter(|row| keep(row))
        .map(|row| {
            if !row.sub_rows.is_empty() && depth < max_depth {
                let sub_rows = filter_from_root(table, &row.sub_rows, keep, depth + 1, max_depth);
                table.create_row(row.with_sub_rows(sub_rows))
            } else {
                Rc::clone(row)
            }
        })
        .collect()
}

fn filter_from_leaves<T: 'static>(
    table: &Table<T>,
    rows: &[Rc<Row<T>>],
    keep: &dyn Fn(&Row<T>) -> bool,
    depth: usize,
    max_depth: usize,
) -> Vec<Rc<Row<T>>> {
    let mut kept = Vec::new();
    for row in rows {
        if !row.sub_rows.is_empty() && depth < max_depth {
            let sub_rows = filter_from_leaves(table, &row.sub_rows, keep, depth + 1, max_depth);
            if keep(row) || !sub_rows.is_empty() {
                kept.push(table.create_row(row.with_sub_rows(sub_rows)));
            }
        } else if keep(row) {
            // Below the depth limit children are cut off, not filtered.
            if row.sub_rows.is_empty() {
                kept.push(Rc::clone(row));
            } else {
                kept.push(table.create_row(row.with_sub_rows(Vec::new())));
            }
        }
    }
    kept
}
