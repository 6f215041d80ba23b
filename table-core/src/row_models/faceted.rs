//! FILENAME: table-core/src/row_models/faceted.rs
//! Faceting: per-column views of the rows that pass every filter except the
//! column's own, and the distinct values and numeric range within them.
//!
//! Each factory keeps one memo per column id. The global facets use the
//! reserved id `GLOBAL_FACET_ID`.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::memo::{Memo, Ptr};
use crate::options::{
    ColumnRowModelFn, FacetedMinMaxValuesFn, FacetedUniqueValues, FacetedUniqueValuesFn,
};
use crate::row_model::RowModel;
use crate::row_models::filtered::filter_row_model;
use crate::state::ColumnFiltersState;
use crate::table::Table;
use crate::value::CellValue;

pub const GLOBAL_FACET_ID: &str = "__global__";

/// Memos created lazily, one per column id.
struct PerColumn<D, R> {
    key: &'static str,
    memos: RefCell<FxHashMap<String, Rc<Memo<D, R>>>>,
}

impl<D: PartialEq, R: Clone> PerColumn<D, R> {
    fn new(key: &'static str) -> Self {
        PerColumn {
            key,
            memos: RefCell::new(FxHashMap::default()),
        }
    }

    fn for_column(&self, column_id: &str) -> Rc<Memo<D, R>> {
        Rc::clone(
            self.memos
                .borrow_mut()
                .entry(column_id.to_string())
                .or_insert_with(|| Rc::new(Memo::new(self.key))),
        )
    }
}

type FacetedDeps<T> = (Ptr<RowModel<T>>, ColumnFiltersState, Option<CellValue>);

/// Rows passing every column filter but `column_id`'s, and the global filter.
pub fn faceted_row_model<T: 'static>() -> ColumnRowModelFn<T> {
    let memos: PerColumn<FacetedDeps<T>, Rc<RowModel<T>>> = PerColumn::new("faceted_row_model");
    Rc::new(move |table: &Table<T>, column_id: &str| {
        let pre = table.get_pre_filtered_row_model();
        let deps = table.with_state(|state| {
            (Ptr::new(&pre), state.column_filters.clone(), state.global_filter.clone())
        });
        memos
            .for_column(column_id)
            .get(deps, |(pre, column_filters, global_filter)| {
                let others: ColumnFiltersState = column_filters
                    .iter()
                    .filter(|filter| filter.id != column_id)
                    .cloned()
                    .collect();
                filter_row_model(table, &pre.0, &others, global_filter.as_ref())
            })
    })
}

fn faceted_rows<T: 'static>(table: &Table<T>, column_id: &str) -> Rc<RowModel<T>> {
    match table.options().get_faceted_row_model.clone() {
        Some(faceted) => faceted(table, column_id),
        None => table.get_pre_filtered_row_model(),
    }
}

/// Distinct values of `column_id` over its faceted rows with their counts,
/// in first-seen order.
pub fn faceted_unique_values<T: 'static>() -> FacetedUniqueValuesFn<T> {
    let memos: PerColumn<Ptr<RowModel<T>>, Rc<FacetedUniqueValues>> =
        PerColumn::new("faceted_unique_values");
    Rc::new(move |table: &Table<T>, column_id: &str| {
        let rows = faceted_rows(table, column_id);
        memos.for_column(column_id).get(Ptr::new(&rows), |rows| {
            let mut index_of: FxHashMap<CellValue, usize> = FxHashMap::default();
            let mut counts: FacetedUniqueValues = Vec::new();
            for row in &rows.flat_rows {
                for value in row.get_unique_values(table, column_id).iter() {
                    match index_of.get(value) {
                        Some(&i) => counts[i].1 += 1,
                        None => {
                            index_of.insert(value.clone(), counts.len());
                            counts.push((value.clone(), 1));
                        }
                    }
                }
            }
            Rc::new(counts)
        })
    })
}

/// Smallest and largest numeric value of `column_id` over its faceted rows.
pub fn faceted_min_max_values<T: 'static>() -> FacetedMinMaxValuesFn<T> {
    let memos: PerColumn<Ptr<RowModel<T>>, Option<(f64, f64)>> =
        PerColumn::new("faceted_min_max_values");
    Rc::new(move |table: &Table<T>, column_id: &str| {
        let rows = faceted_rows(table, column_id);
        memos.for_column(column_id).get(Ptr::new(&rows), |rows| {
            rows.flat_rows
                .iter()
                .flat_map(|row| row.get_unique_values(table, column_id).to_vec())
                .filter_map(|value| value.to_number())
                .fold(None, |range, n| match range {
                    None => Some((n, n)),
                    Some((min, max)) => Some((f64::min(min, n), f64::max(max, n))),
                })
        })
    })
}
