//! FILENAME: table-core/src/row_models/sorted.rs
//! The sorted row model.
//!
//! Each sibling list is sorted on its own, recursively. Sort keys are read
//! once per row before sorting. Rows compare column by column in sorting
//! order; full ties fall back to the original row index so the result is
//! stable and deterministic.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::column_def::SortUndefined;
use crate::fns::SortingFn;
use crate::memo::{Memo, Ptr};
use crate::options::RowModelFn;
use crate::row::Row;
use crate::row_model::RowModel;
use crate::state::SortingState;
use crate::table::Table;
use crate::value::CellValue;

type SortedDeps<T> = (Ptr<RowModel<T>>, SortingState);

pub fn sorted_row_model<T: 'static>() -> RowModelFn<T> {
    let memo: Memo<SortedDeps<T>, Rc<RowModel<T>>> = Memo::new("sorted_row_model");
    Rc::new(move |table: &Table<T>| {
        let pre = table.get_pre_sorted_row_model();
        let deps = (Ptr::new(&pre), table.with_state(|state| state.sorting.clone()));
        memo.get(deps, |(pre, sorting)| sort_row_model(table, &pre.0, sorting))
    })
}

struct SortKey {
    column_id: String,
    desc: bool,
    sort_undefined: SortUndefined,
    invert: bool,
    sorting_fn: SortingFn,
}

fn sort_row_model<T: 'static>(
    table: &Table<T>,
    pre: &Rc<RowModel<T>>,
    sorting: &SortingState,
) -> Rc<RowModel<T>> {
    if pre.rows.is_empty() || sorting.is_empty() {
        return Rc::clone(pre);
    }

    let keys: Vec<SortKey> = sorting
        .iter()
        .filter_map(|sort| {
            let column = table.find_column(&sort.id)?;
            if !column.get_can_sort(table) {
                return None;
            }
            Some(SortKey {
                column_id: sort.id.clone(),
                desc: sort.desc,
                sort_undefined: column.column_def.sort_undefined.unwrap_or_default(),
                invert: column.column_def.invert_sorting.unwrap_or(false),
                sorting_fn: column.get_sorting_fn(table)?,
            })
        })
        .collect();
    if keys.is_empty() {
        return Rc::clone(pre);
    }

    Rc::new(RowModel::new(sort_rows(table, &pre.rows, &keys)))
}

fn sort_rows<T: 'static>(table: &Table<T>, rows: &[Rc<Row<T>>], keys: &[SortKey]) -> Vec<Rc<Row<T>>> {
    let mut keyed: Vec<(Vec<CellValue>, &Rc<Row<T>>)> = rows
        .iter()
        .map(|row| {
            let values = keys.iter().map(|key| row.get_value(table, &key.column_id)).collect();
            (values, row)
        })
        .collect();

    keyed.sort_by(|(a_values, a), (b_values, b)| {
        for (i, key) in keys.iter().enumerate() {
            let ordering = compare_key(key, &a_values[i], &b_values[i]);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.index.cmp(&b.index)
    });

    keyed
        .into_iter()
        .map(|(_, row)| {
            if row.sub_rows.is_empty() {
                return Rc::clone(row);
            }
            let sub_rows = sort_rows(table, &row.sub_rows, keys);
            let unchanged = sub_rows
                .iter()
                .zip(row.sub_rows.iter())
                .all(|(a, b)| Rc::ptr_eq(a, b));
            if unchanged {
                Rc::clone(row)
            } else {
                table.create_row(row.with_sub_rows(sub_rows))
            }
        })
        .collect()
}

/// One column's contribution. `First`/`Last` ignore direction; the rest
/// are flipped for descending and inverted columns.
fn compare_key(key: &SortKey, a: &CellValue, b: &CellValue) -> Ordering {
    let (a_empty, b_empty) = (a.is_empty(), b.is_empty());

    let ordering = if a_empty || b_empty {
        match key.sort_undefined {
            SortUndefined::First => return b_empty.cmp(&a_empty),
            SortUndefined::Last => return a_empty.cmp(&b_empty),
            SortUndefined::Before => b_empty.cmp(&a_empty),
            SortUndefined::After => a_empty.cmp(&b_empty),
            SortUndefined::Disabled => (key.sorting_fn)(a, b),
        }
    } else {
        (key.sorting_fn)(a, b)
    };

    let ordering = if key.desc { ordering.reverse() } else { ordering };
    if key.invert {
        ordering.reverse()
    } else {
        ordering
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fns::sorting_fns::basic;

    fn key(desc: bool, sort_undefined: SortUndefined) -> SortKey {
        SortKey {
            column_id: "a".to_string(),
            desc,
            sort_undefined,
            invert: false,
            sorting_fn: Rc::new(basic),
        }
    }

    #[test]
    fn test_last_ignores_direction() {
        let empty = CellValue::Empty;
        let one = CellValue::from(1.0);
        assert_eq!(compare_key(&key(false, SortUndefined::Last), &empty, &one), Ordering::Greater);
        assert_eq!(compare_key(&key(true, SortUndefined::Last), &empty, &one), Ordering::Greater);
    }

    #[test]
    fn test_after_flips_with_direction() {
        let empty = CellValue::Empty;
        let one = CellValue::from(1.0);
        assert_eq!(compare_key(&key(false, SortUndefined::After), &empty, &one), Ordering::Greater);
        assert_eq!(compare_key(&key(true, SortUndefined::After), &empty, &one), Ordering::Less);
    }

    #[test]
    fn test_both_empty_tie() {
        let empty = CellValue::Empty;
        assert_eq!(compare_key(&key(false, SortUndefined::First), &empty, &empty), Ordering::Equal);
    }

    #[test]
    fn test_invert_reverses() {
        let mut inverted = key(false, SortUndefined::Disabled);
        inverted.invert = true;
        let (one, two) = (CellValue::from(1.0), CellValue::from(2.0));
        assert_eq!(compare_key(&inverted, &one, &two), Ordering::Greater);
    }
}
