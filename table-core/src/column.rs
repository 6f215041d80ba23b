//! FILENAME: table-core/src/column.rs
//! Column entities built from the column definition tree.
//!
//! Columns are built once per change of `TableOptions::columns` and owned by
//! the table. A column knows its children and (weakly) its parent; leaf
//! ordering is derived on demand through `order_columns` and memoized on the
//! ordering state.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::column_def::{AccessorFn, ColumnDef};
use crate::feature::Extensions;
use crate::features::ordering::order_columns;
use crate::memo::Memo;
use crate::options::GroupedColumnMode;
use crate::state::{ColumnOrderState, GroupingState};
use crate::table::Table;

type LeafOrderDeps = (ColumnOrderState, GroupingState, GroupedColumnMode);
type ColumnList<T> = Rc<Vec<Rc<Column<T>>>>;

pub struct Column<T: 'static> {
    pub id: String,
    /// Nesting level in the header tree; top-level columns are 0.
    pub depth: usize,
    /// Position among the siblings in the definition.
    pub index: usize,
    /// The definition with the table's default column applied.
    pub column_def: ColumnDef<T>,
    pub columns: Vec<Rc<Column<T>>>,
    pub accessor_fn: Option<AccessorFn<T>>,
    pub extensions: Extensions,
    parent: Weak<Column<T>>,
    leaf_columns: Memo<LeafOrderDeps, ColumnList<T>>,
    /// Descendants only; holding `self` here would be a reference cycle.
    descendants: Memo<(), ColumnList<T>>,
}

impl<T: 'static> Column<T> {
    pub(crate) fn new(
        id: String,
        depth: usize,
        index: usize,
        column_def: ColumnDef<T>,
        parent: Weak<Column<T>>,
    ) -> Self {
        let accessor_fn = column_def.accessor_fn.clone();
        Column {
            id,
            depth,
            index,
            column_def,
            columns: Vec::new(),
            accessor_fn,
            extensions: Extensions::default(),
            parent,
            leaf_columns: Memo::new("column.get_leaf_columns"),
            descendants: Memo::new("column.get_flat_columns"),
        }
    }

    pub fn parent(&self) -> Option<Rc<Column<T>>> {
        self.parent.upgrade()
    }

    pub fn is_leaf(&self) -> bool {
        self.columns.is_empty()
    }

    /// This column followed by all of its descendants, depth-first.
    pub fn get_flat_columns(self: &Rc<Self>) -> Vec<Rc<Column<T>>> {
        let descendants = self.descendants.get((), |_| {
            Rc::new(self.columns.iter().flat_map(|child| child.get_flat_columns()).collect())
        });
        let mut flat = Vec::with_capacity(descendants.len() + 1);
        flat.push(Rc::clone(self));
        flat.extend(descendants.iter().cloned());
        flat
    }

    /// The leaf columns under this column in display order. A leaf column
    /// returns itself.
    pub fn get_leaf_columns(self: &Rc<Self>, table: &Table<T>) -> ColumnList<T> {
        if self.columns.is_empty() {
            return Rc::new(vec![Rc::clone(self)]);
        }

        let deps = table.with_state(|state| {
            (
                state.column_order.clone(),
                state.grouping.clone(),
                table.options().grouped_column_mode,
            )
        });

        self.leaf_columns.get(deps, |(column_order, grouping, mode)| {
            let leaves: Vec<Rc<Column<T>>> = self
                .columns
                .iter()
                .flat_map(|child| child.get_leaf_columns(table).as_ref().clone())
                .collect();
            Rc::new(order_columns(leaves, column_order, grouping, *mode))
        })
    }
}

impl<T: 'static> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("depth", &self.depth)
            .field("columns", &self.columns.iter().map(|c| c.id.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TableOptions;
    use serde_json::{json, Value};

    fn table() -> Rc<Table<Value>> {
        let columns = vec![
            ColumnDef::accessor("a"),
            ColumnDef::group(
                "g",
                vec![
                    ColumnDef::accessor("b"),
                    ColumnDef::group("h", vec![ColumnDef::accessor("c"), ColumnDef::accessor("d")]),
                ],
            ),
        ];
        let data = vec![json!({"a": 1, "b": 2, "c": 3, "d": 4})];
        Table::new(TableOptions::new(data, columns)).unwrap()
    }

    #[test]
    fn test_flat_columns_are_depth_first_and_cached() {
        let table = table();
        let group = table.get_column("g").unwrap();
        let ids: Vec<String> = group.get_flat_columns().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["g", "b", "h", "c", "d"]);

        let computed = group.descendants.computations();
        let again = group.get_flat_columns();
        assert_eq!(group.descendants.computations(), computed);
        assert_eq!(again.len(), 5);
        assert!(Rc::ptr_eq(&again[0], &group));
    }

    #[test]
    fn test_parent_links() {
        let table = table();
        let c = table.get_column("c").unwrap();
        assert_eq!(c.depth, 2);
        assert_eq!(c.parent().map(|p| p.id.clone()), Some("h".to_string()));
        assert!(c.is_leaf());
        assert!(table.get_column("a").unwrap().parent().is_none());
    }
}
