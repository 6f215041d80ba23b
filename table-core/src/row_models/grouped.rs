//! FILENAME: table-core/src/row_models/grouped.rs
//! The grouped row model.
//!
//! Rows are bucketed by the first grouping column, each bucket becomes a
//! synthesized group row, and the buckets are grouped again by the next
//! column. Buckets keep first-seen order. Group rows take their `original`
//! from their first leaf row and compute aggregated values on demand.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::memo::{Memo, Ptr};
use crate::options::RowModelFn;
use crate::row::{Row, RowGroup};
use crate::row_model::RowModel;
use crate::state::GroupingState;
use crate::table::Table;
use crate::value::CellValue;

type GroupedDeps<T> = (Ptr<RowModel<T>>, GroupingState);

pub fn grouped_row_model<T: 'static>() -> RowModelFn<T> {
    let memo: Memo<GroupedDeps<T>, Rc<RowModel<T>>> = Memo::new("grouped_row_model");
    Rc::new(move |table: &Table<T>| {
        let pre = table.get_pre_grouped_row_model();
        let deps = (Ptr::new(&pre), table.with_state(|state| state.grouping.clone()));
        memo.get(deps, |(pre, grouping)| group_row_model(table, &pre.0, grouping))
    })
}

fn group_row_model<T: 'static>(
    table: &Table<T>,
    pre: &Rc<RowModel<T>>,
    grouping: &[String],
) -> Rc<RowModel<T>> {
    if pre.rows.is_empty() || grouping.is_empty() {
        return Rc::clone(pre);
    }

    let existing: Vec<String> = grouping
        .iter()
        .filter(|id| table.find_column(id).is_some())
        .cloned()
        .collect();
    if existing.is_empty() {
        return Rc::clone(pre);
    }

    let grouper = Grouper {
        table,
        grouping: Rc::new(existing),
    };
    let rows = grouper.group(&pre.rows, 0, None);
    Rc::new(RowModel::new(rows))
}

struct Grouper<'a, T: 'static> {
    table: &'a Table<T>,
    grouping: Rc<Vec<String>>,
}

struct Bucket<T: 'static> {
    value: CellValue,
    rows: Vec<Rc<Row<T>>>,
}

impl<'a, T: 'static> Grouper<'a, T> {
    fn group(&self, rows: &[Rc<Row<T>>], depth: usize, parent_id: Option<&str>) -> Vec<Rc<Row<T>>> {
        let Some(column_id) = self.grouping.get(depth) else {
            return rows
                .iter()
                .map(|row| self.relink(row, depth, parent_id))
                .collect();
        };

        self.bucket(rows, column_id)
            .into_iter()
            .enumerate()
            .map(|(index, (key, bucket))| {
                let id = match parent_id {
                    Some(parent_id) => format!("{}>{}:{}", parent_id, column_id, key),
                    None => format!("{}:{}", column_id, key),
                };

                let sub_rows = self.group(&bucket.rows, depth + 1, Some(&id));
                let leaf_rows = collect_leaf_rows(&sub_rows);
                let original = leaf_rows
                    .first()
                    .map(|leaf| Rc::clone(&leaf.original))
                    .unwrap_or_else(|| Rc::clone(&bucket.rows[0].original));

                let mut row = Row::new(id, original, index, depth, parent_id.map(str::to_string));
                row.sub_rows = sub_rows;
                row.group = Some(RowGroup {
                    column_id: column_id.clone(),
                    value: bucket.value,
                    leaf_rows,
                    grouping: Rc::clone(&self.grouping),
                });
                self.table.create_row(row)
            })
            .collect()
    }

    /// Buckets keyed by the printed grouping value, in first-seen order.
    fn bucket(&self, rows: &[Rc<Row<T>>], column_id: &str) -> Vec<(String, Bucket<T>)> {
        let mut index_by_key: FxHashMap<String, usize> = FxHashMap::default();
        let mut buckets: Vec<(String, Bucket<T>)> = Vec::new();
        for row in rows {
            let value = row.get_grouping_value(self.table, column_id);
            let key = value.to_string();
            match index_by_key.get(&key) {
                Some(&i) => buckets[i].1.rows.push(Rc::clone(row)),
                None => {
                    index_by_key.insert(key.clone(), buckets.len());
                    buckets.push((
                        key,
                        Bucket {
                            value,
                            rows: vec![Rc::clone(row)],
                        },
                    ));
                }
            }
        }
        buckets
    }

    /// A source row placed under a group, with its own children moved down
    /// with it.
    fn relink(&self, row: &Rc<Row<T>>, depth: usize, parent_id: Option<&str>) -> Rc<Row<T>> {
        let sub_rows = row
            .sub_rows
            .iter()
            .map(|sub| self.relink(sub, depth + 1, Some(&row.id)))
            .collect();
        self.table
            .create_row(row.relinked(depth, parent_id.map(str::to_string), sub_rows))
    }
}

/// Every non-group row under `rows`, depth-first.
fn collect_leaf_rows<T: 'static>(rows: &[Rc<Row<T>>]) -> Vec<Rc<Row<T>>> {
    let mut leaves = Vec::new();
    for row in rows {
        if row.group.is_none() {
            leaves.push(Rc::clone(row));
        }
        leaves.extend(collect_leaf_rows(&row.sub_rows));
    }
    leaves
}
