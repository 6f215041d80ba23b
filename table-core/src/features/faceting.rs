//! FILENAME: table-core/src/features/faceting.rs
//! Column and global faceting.
//!
//! Without registered faceting functions the faceted rows are the
//! pre-filtered rows and the value summaries are empty.

use std::rc::Rc;

use crate::column::Column;
use crate::feature::TableFeature;
use crate::options::FacetedUniqueValues;
use crate::row_model::RowModel;
use crate::row_models::GLOBAL_FACET_ID;
use crate::table::Table;

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("ColumnFaceting")
}

impl<T: 'static> Table<T> {
    fn faceted_row_model_for(&self, column_id: &str) -> Rc<RowModel<T>> {
        match self.options().get_faceted_row_model.clone() {
            Some(faceted) => faceted(self, column_id),
            None => self.get_pre_filtered_row_model(),
        }
    }

    fn faceted_unique_values_for(&self, column_id: &str) -> Rc<FacetedUniqueValues> {
        match self.options().get_faceted_unique_values.clone() {
            Some(unique_values) => unique_values(self, column_id),
            None => Rc::new(FacetedUniqueValues::new()),
        }
    }

    fn faceted_min_max_values_for(&self, column_id: &str) -> Option<(f64, f64)> {
        let min_max = self.options().get_faceted_min_max_values.clone()?;
        min_max(self, column_id)
    }

    /// Rows passing every filter except the column filters.
    pub fn get_global_faceted_row_model(&self) -> Rc<RowModel<T>> {
        self.faceted_row_model_for(GLOBAL_FACET_ID)
    }

    pub fn get_global_faceted_unique_values(&self) -> Rc<FacetedUniqueValues> {
        self.faceted_unique_values_for(GLOBAL_FACET_ID)
    }

    pub fn get_global_faceted_min_max_values(&self) -> Option<(f64, f64)> {
        self.faceted_min_max_values_for(GLOBAL_FACET_ID)
    }
}

impl<T: 'static> Column<T> {
    /// Rows passing every filter except this column's own.
    pub fn get_faceted_row_model(&self, table: &Table<T>) -> Rc<RowModel<T>> {
        table.faceted_row_model_for(&self.id)
    }

    /// Distinct values in the faceted rows with their counts.
    pub fn get_faceted_unique_values(&self, table: &Table<T>) -> Rc<FacetedUniqueValues> {
        table.faceted_unique_values_for(&self.id)
    }

    /// Numeric range of the faceted rows, if any value is numeric.
    pub fn get_faceted_min_max_values(&self, table: &Table<T>) -> Option<(f64, f64)> {
        table.faceted_min_max_values_for(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_def::ColumnDef;
    use crate::options::TableOptions;
    use crate::row_models::{
        faceted_min_max_values, faceted_row_model, faceted_unique_values, filtered_row_model,
    };
    use crate::state::ColumnFilter;
    use crate::value::CellValue;
    use serde_json::{json, Value};

    fn table() -> Rc<Table<Value>> {
        let data = vec![
            json!({"color": "red", "size": 3}),
            json!({"color": "blue", "size": 9}),
            json!({"color": "red", "size": 5}),
        ];
        let options = TableOptions::new(
            data,
            vec![ColumnDef::accessor("color"), ColumnDef::accessor("size")],
        )
        .with_filtered_row_model(filtered_row_model())
        .with_faceting(faceted_row_model(), faceted_unique_values(), faceted_min_max_values());
        Table::new(options).unwrap()
    }

    #[test]
    fn test_own_filter_is_excluded() {
        let table = table();
        table.set_column_filters(vec![ColumnFilter::new("color", "red")]);
        assert_eq!(table.get_filtered_row_model().rows.len(), 2);

        let color = table.get_column("color").unwrap();
        assert_eq!(color.get_faceted_row_model(&table).rows.len(), 3);
        let counts = color.get_faceted_unique_values(&table);
        assert_eq!(
            counts.as_slice(),
            &[(CellValue::text("red"), 2), (CellValue::text("blue"), 1)]
        );

        let size = table.get_column("size").unwrap();
        assert_eq!(size.get_faceted_min_max_values(&table), Some((3.0, 5.0)));
    }

    #[test]
    fn test_without_faceting_functions() {
        let options = TableOptions::new(vec![json!({"x": 1})], vec![ColumnDef::accessor("x")]);
        let table = Table::new(options).unwrap();
        let x = table.get_column("x").unwrap();
        assert_eq!(x.get_faceted_row_model(&table).rows.len(), 1);
        assert!(x.get_faceted_unique_values(&table).is_empty());
        assert_eq!(x.get_faceted_min_max_values(&table), None);
        assert!(table.get_global_faceted_unique_values().is_empty());
    }
}
