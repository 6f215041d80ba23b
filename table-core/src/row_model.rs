//! FILENAME: table-core/src/row_model.rs
//! The output of every pipeline stage.

use std::fmt;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::row::Row;

/// Top-level rows plus two indexes over the whole tree.
///
/// `flat_rows` lists every reachable row once, parents before children;
/// `rows_by_id` maps each of those ids back to its row.
pub struct RowModel<T: 'static> {
    pub rows: Vec<Rc<Row<T>>>,
    pub flat_rows: Vec<Rc<Row<T>>>,
    pub rows_by_id: FxHashMap<String, Rc<Row<T>>>,
}

impl<T: 'static> RowModel<T> {
    /// Builds the indexes from `rows`, walking sub-rows depth-first.
    pub fn new(rows: Vec<Rc<Row<T>>>) -> Self {
        let mut flat_rows = Vec::new();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        fn walk<T: 'static>(
            rows: &[Rc<Row<T>>],
            flat: &mut Vec<Rc<Row<T>>>,
            seen: &mut FxHashSet<String>,
        ) {
            for row in rows {
                if seen.insert(row.id.clone()) {
                    flat.push(Rc::clone(row));
                }
                walk(&row.sub_rows, flat, seen);
            }
        }
        walk(&rows, &mut flat_rows, &mut seen);
        Self::from_parts(rows, flat_rows)
    }

    /// A model whose `flat_rows` were collected by the caller.
    pub(crate) fn from_parts(rows: Vec<Rc<Row<T>>>, flat_rows: Vec<Rc<Row<T>>>) -> Self {
        let rows_by_id = flat_rows
            .iter()
            .map(|row| (row.id.clone(), Rc::clone(row)))
            .collect();
        RowModel {
            rows,
            flat_rows,
            rows_by_id,
        }
    }

    pub fn empty() -> Self {
        RowModel {
            rows: Vec::new(),
            flat_rows: Vec::new(),
            rows_by_id: FxHashMap::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: 'static> fmt::Debug for RowModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowModel")
            .field("rows", &self.rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>())
            .field("flat_rows", &self.flat_rows.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, sub_rows: Vec<Rc<Row<u8>>>) -> Rc<Row<u8>> {
        let base = Row::new(id.to_string(), Rc::new(0), 0, 0, None);
        Rc::new(base.with_sub_rows(sub_rows))
    }

    #[test]
    fn test_flat_rows_are_pre_order() {
        let model = RowModel::new(vec![
            row("0", vec![row("0.0", vec![]), row("0.1", vec![])]),
            row("1", vec![]),
        ]);
        let ids: Vec<&str> = model.flat_rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "0.0", "0.1", "1"]);
        assert_eq!(model.rows.len(), 2);
        assert!(model.rows_by_id.contains_key("0.1"));
    }

    #[test]
    fn test_duplicate_ids_are_listed_once() {
        let shared = row("x", vec![]);
        let model = RowModel::new(vec![Rc::clone(&shared), shared]);
        assert_eq!(model.flat_rows.len(), 1);
        assert_eq!(model.rows.len(), 2);
    }

    #[test]
    fn test_empty() {
        let model: RowModel<u8> = RowModel::empty();
        assert!(model.is_empty());
        assert!(model.rows_by_id.is_empty());
    }
}
