//! FILENAME: table-core/src/cell.rs
//! Cells: the intersection of one row and one leaf column.

use std::fmt;
use std::rc::{Rc, Weak};

use once_cell::unsync::OnceCell;

use crate::column::Column;
use crate::feature::Extensions;
use crate::row::Row;
use crate::table::Table;
use crate::value::CellValue;

pub struct Cell<T: 'static> {
    /// `{row id}_{column id}`
    pub id: String,
    pub row: Rc<Row<T>>,
    pub column: Rc<Column<T>>,
    pub extensions: Extensions,
    context: OnceCell<Rc<CellContext<T>>>,
}

/// Everything a cell renderer needs, bundled once per cell.
pub struct CellContext<T: 'static> {
    pub table: Weak<Table<T>>,
    pub row: Rc<Row<T>>,
    pub column: Rc<Column<T>>,
    pub cell_id: String,
}

impl<T: 'static> Cell<T> {
    pub(crate) fn new(row: &Rc<Row<T>>, column: &Rc<Column<T>>) -> Self {
        Cell {
            id: format!("{}_{}", row.id, column.id),
            row: Rc::clone(row),
            column: Rc::clone(column),
            extensions: Extensions::default(),
            context: OnceCell::new(),
        }
    }

    pub fn get_value(&self, table: &Table<T>) -> CellValue {
        self.row.get_value(table, &self.column.id)
    }

    /// The value, or the table's fallback when it is empty. Falsy values
    /// such as `0`, `""` or `false` are returned unchanged.
    pub fn render_value(&self, table: &Table<T>) -> CellValue {
        self.row.render_value(table, &self.column.id)
    }

    pub fn get_context(&self, table: &Table<T>) -> Rc<CellContext<T>> {
        Rc::clone(self.context.get_or_init(|| {
            Rc::new(CellContext {
                table: table.handle(),
                row: Rc::clone(&self.row),
                column: Rc::clone(&self.column),
                cell_id: self.id.clone(),
            })
        }))
    }

    /// Text for display: the column's cell template, else the rendered value.
    pub fn render(&self, table: &Table<T>) -> String {
        match &self.column.column_def.cell {
            Some(renderer) => renderer.render(&self.get_context(table)),
            None => self.render_value(table).to_string(),
        }
    }
}

impl<T: 'static> CellContext<T> {
    pub fn get_value(&self) -> CellValue {
        match self.table.upgrade() {
            Some(table) => self.row.get_value(&table, &self.column.id),
            None => CellValue::Empty,
        }
    }

    pub fn render_value(&self) -> CellValue {
        match self.table.upgrade() {
            Some(table) => self.row.render_value(&table, &self.column.id),
            None => CellValue::Empty,
        }
    }
}

impl<T: 'static> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell").field("id", &self.id).finish()
    }
}
