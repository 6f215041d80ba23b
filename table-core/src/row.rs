//! FILENAME: table-core/src/row.rs
//! Row entities.
//!
//! A row wraps one source record. Pipeline stages never edit a row handed
//! out earlier; when a stage needs a different shape (filtered children,
//! sorted children, a new parent) it builds a new row and carries the value
//! caches over. The caches are the only interior mutability: each key is
//! written once and then only read.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::cell::Cell;
use crate::feature::Extensions;
use crate::table::Table;
use crate::value::CellValue;

/// Grouping information carried by rows synthesized by the grouped row model.
pub struct RowGroup<T: 'static> {
    pub column_id: String,
    pub value: CellValue,
    /// Every source row under this group, depth-first.
    pub leaf_rows: Vec<Rc<Row<T>>>,
    /// Column ids grouped at the time the row was built.
    pub(crate) grouping: Rc<Vec<String>>,
}

pub struct Row<T: 'static> {
    pub id: String,
    pub index: usize,
    pub depth: usize,
    pub original: Rc<T>,
    pub parent_id: Option<String>,
    pub sub_rows: Vec<Rc<Row<T>>>,
    pub original_sub_rows: Option<Vec<Rc<T>>>,
    pub group: Option<RowGroup<T>>,
    pub extensions: Extensions,
    values_cache: RefCell<FxHashMap<String, CellValue>>,
    unique_values_cache: RefCell<FxHashMap<String, Rc<[CellValue]>>>,
}

impl<T: 'static> Row<T> {
    pub(crate) fn new(
        id: String,
        original: Rc<T>,
        index: usize,
        depth: usize,
        parent_id: Option<String>,
    ) -> Self {
        Row {
            id,
            index,
            depth,
            original,
            parent_id,
            sub_rows: Vec::new(),
            original_sub_rows: None,
            group: None,
            extensions: Extensions::default(),
            values_cache: RefCell::new(FxHashMap::default()),
            unique_values_cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// A copy of this row with different children, keeping identity, position
    /// and everything cached so far.
    pub(crate) fn with_sub_rows(&self, sub_rows: Vec<Rc<Row<T>>>) -> Row<T> {
        self.relinked(self.depth, self.parent_id.clone(), sub_rows)
    }

    /// A copy of this row at a new position in the tree.
    pub(crate) fn relinked(
        &self,
        depth: usize,
        parent_id: Option<String>,
        sub_rows: Vec<Rc<Row<T>>>,
    ) -> Row<T> {
        Row {
            id: self.id.clone(),
            index: self.index,
            depth,
            original: Rc::clone(&self.original),
            parent_id,
            sub_rows,
            original_sub_rows: self.original_sub_rows.clone(),
            group: self.group.as_ref().map(|group| RowGroup {
                column_id: group.column_id.clone(),
                value: group.value.clone(),
                leaf_rows: group.leaf_rows.clone(),
                grouping: Rc::clone(&group.grouping),
            }),
            extensions: self.extensions.clone(),
            values_cache: RefCell::new(self.values_cache.borrow().clone()),
            unique_values_cache: RefCell::new(self.unique_values_cache.borrow().clone()),
        }
    }

    fn cached_value(&self, column_id: &str) -> Option<CellValue> {
        self.values_cache.borrow().get(column_id).cloned()
    }

    fn cache_value(&self, column_id: &str, value: CellValue) -> CellValue {
        self.values_cache
            .borrow_mut()
            .entry(column_id.to_string())
            .or_insert(value)
            .clone()
    }

    // ========================================================================
    // VALUES
    // ========================================================================

    /// The value of `column_id` for this row, computed once and cached.
    ///
    /// Columns without an accessor yield `Empty` and are not cached. Group
    /// rows report the first leaf's value for grouped columns and the
    /// column's aggregation for the rest.
    pub fn get_value(&self, table: &Table<T>, column_id: &str) -> CellValue {
        if let Some(value) = self.cached_value(column_id) {
            return value;
        }

        if let Some(group) = &self.group {
            if group.grouping.iter().any(|id| id == column_id) {
                let value = group
                    .leaf_rows
                    .first()
                    .map(|leaf| leaf.get_value(table, column_id))
                    .unwrap_or_default();
                return self.cache_value(column_id, value);
            }

            let Some(column) = table.get_column(column_id) else {
                return CellValue::Empty;
            };
            let Some(aggregate) = column.get_aggregation_fn(table) else {
                return CellValue::Empty;
            };
            let leaf_values: Vec<CellValue> = group
                .leaf_rows
                .iter()
                .map(|row| row.get_value(table, column_id))
                .collect();
            let child_values: Vec<CellValue> = self
                .sub_rows
                .iter()
                .map(|row| row.get_value(table, column_id))
                .collect();
            return self.cache_value(column_id, aggregate(&leaf_values[..], &child_values[..]));
        }

        let accessor = table
            .get_column(column_id)
            .and_then(|column| column.accessor_fn.clone());
        match accessor {
            Some(accessor) => {
                let value = accessor(&self.original, self.index);
                self.cache_value(column_id, value)
            }
            None => CellValue::Empty,
        }
    }

    /// Values used for faceting. Defaults to the single `get_value` result
    /// unless the column supplies its own extractor.
    pub fn get_unique_values(&self, table: &Table<T>, column_id: &str) -> Rc<[CellValue]> {
        if let Some(values) = self.unique_values_cache.borrow().get(column_id) {
            return Rc::clone(values);
        }

        let Some(column) = table.get_column(column_id) else {
            return Rc::from(Vec::new());
        };
        if column.accessor_fn.is_none() {
            return Rc::from(Vec::new());
        }

        let values: Rc<[CellValue]> = match &column.column_def.get_unique_values {
            Some(extract) => extract(&self.original, self.index).into(),
            None => Rc::from(vec![self.get_value(table, column_id)]),
        };

        Rc::clone(
            self.unique_values_cache
                .borrow_mut()
                .entry(column_id.to_string())
                .or_insert(values),
        )
    }

    /// `get_value`, with the table's fallback substituted for empty values.
    pub fn render_value(&self, table: &Table<T>, column_id: &str) -> CellValue {
        match self.get_value(table, column_id) {
            CellValue::Empty => table.options().render_fallback_value.clone(),
            value => value,
        }
    }

    // ========================================================================
    // TREE
    // ========================================================================

    /// All descendants of this row, depth-first, excluding the row itself.
    pub fn get_leaf_rows(&self) -> Vec<Rc<Row<T>>> {
        let mut leaves = Vec::new();
        fn collect<T: 'static>(rows: &[Rc<Row<T>>], out: &mut Vec<Rc<Row<T>>>) {
            for row in rows {
                out.push(Rc::clone(row));
                collect(&row.sub_rows, out);
            }
        }
        collect(&self.sub_rows, &mut leaves);
        leaves
    }

    /// The parent in the table's core (unfiltered) row model.
    pub fn get_parent_row(&self, table: &Table<T>) -> Option<Rc<Row<T>>> {
        let parent_id = self.parent_id.as_ref()?;
        table.get_core_row_model().rows_by_id.get(parent_id).cloned()
    }

    /// All ancestors, root first.
    pub fn get_parent_rows(&self, table: &Table<T>) -> Vec<Rc<Row<T>>> {
        let core = table.get_core_row_model();
        let mut ancestors: SmallVec<[Rc<Row<T>>; 4]> = SmallVec::new();
        let mut parent_id = self.parent_id.clone();
        while let Some(id) = parent_id {
            match core.rows_by_id.get(&id) {
                Some(parent) => {
                    parent_id = parent.parent_id.clone();
                    ancestors.push(Rc::clone(parent));
                }
                None => break,
            }
        }
        ancestors.into_iter().rev().collect()
    }

    // ========================================================================
    // CELLS
    // ========================================================================

    /// One cell per leaf column, in column display order.
    ///
    /// Cells hold their row, so they are created per call rather than stored
    /// on the row; their values still come from the row cache.
    pub fn get_all_cells(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Cell<T>>> {
        table
            .get_all_leaf_columns()
            .iter()
            .map(|column| table.create_cell(self, column))
            .collect()
    }

    pub fn get_all_cells_by_column_id(
        self: &Rc<Self>,
        table: &Table<T>,
    ) -> FxHashMap<String, Rc<Cell<T>>> {
        self.get_all_cells(table)
            .into_iter()
            .map(|cell| (cell.column.id.clone(), cell))
            .collect()
    }
}

impl<T: 'static> fmt::Debug for Row<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("depth", &self.depth)
            .field("sub_rows", &self.sub_rows.len())
            .finish()
    }
}
