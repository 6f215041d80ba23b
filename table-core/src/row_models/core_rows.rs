//! FILENAME: table-core/src/row_models/core_rows.rs
//! The core row model: one row per source record, nested via `get_sub_rows`.

use std::rc::Rc;

use crate::column::Column;
use crate::memo::{Memo, Ptr};
use crate::options::{RowModelFn, TableOptions};
use crate::row::Row;
use crate::row_model::RowModel;
use crate::table::Table;

type CoreDeps<T> = (Ptr<Vec<Rc<T>>>, Ptr<Vec<Rc<Column<T>>>>);

/// Builds rows from `TableOptions::data`. Recomputes when the data or the
/// column tree is replaced.
pub fn core_row_model<T: 'static>() -> RowModelFn<T> {
    let memo: Memo<CoreDeps<T>, Rc<RowModel<T>>> = Memo::new("core_row_model");
    Rc::new(move |table: &Table<T>| {
        let options = table.options();
        let deps = (Ptr::new(&options.data), Ptr::new(&table.get_all_columns()));
        memo.get(deps, |(data, _)| {
            let rows = access_rows(table, &options, data, 0, None);
            Rc::new(RowModel::new(rows))
        })
    })
}

fn access_rows<T: 'static>(
    table: &Table<T>,
    options: &TableOptions<T>,
    records: &[Rc<T>],
    depth: usize,
    parent: Option<&Row<T>>,
) -> Vec<Rc<Row<T>>> {
    records
        .iter()
        .enumerate()
        .map(|(index, original)| {
            let id = match &options.get_row_id {
                Some(get_row_id) => get_row_id(original, index, parent),
                None => match parent {
                    Some(parent) => format!("{}.{}", parent.id, index),
                    None => index.to_string(),
                },
            };

            let mut row = Row::new(
                id,
                Rc::clone(original),
                index,
                depth,
                parent.map(|p| p.id.clone()),
            );

            if let Some(get_sub_rows) = &options.get_sub_rows {
                row.original_sub_rows = get_sub_rows(original, index);
                if let Some(children) = row.original_sub_rows.clone() {
                    if !children.is_empty() {
                        let sub_rows = access_rows(table, options, &children, depth + 1, Some(&row));
                        row.sub_rows = sub_rows;
                    }
                }
            }

            table.create_row(row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_def::ColumnDef;
    use crate::options::TableOptions;
    use serde_json::{json, Value};

    fn tree_table() -> Rc<Table<Value>> {
        let data = vec![
            json!({"name": "a", "children": [{"name": "a0"}, {"name": "a1", "children": [{"name": "a10"}]}]}),
            json!({"name": "b"}),
        ];
        let options = TableOptions::new(data, vec![ColumnDef::accessor("name")]).with_sub_rows(
            |record: &Value, _| {
                record
                    .get("children")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().cloned().map(Rc::new).collect())
            },
        );
        Table::new(options).unwrap()
    }

    #[test]
    fn test_default_ids_are_index_paths() {
        let table = tree_table();
        let model = table.get_core_row_model();
        let ids: Vec<&str> = model.flat_rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "0.0", "0.1", "0.1.0", "1"]);
        let deepest = &model.rows_by_id["0.1.0"];
        assert_eq!(deepest.depth, 2);
        assert_eq!(deepest.parent_id.as_deref(), Some("0.1"));
    }

    #[test]
    fn test_original_sub_rows_are_kept() {
        let table = tree_table();
        let model = table.get_core_row_model();
        assert_eq!(model.rows[0].original_sub_rows.as_ref().map(Vec::len), Some(2));
        assert!(model.rows[1].original_sub_rows.is_none());
    }

    #[test]
    fn test_custom_row_id() {
        let data = vec![json!({"key": "x"}), json!({"key": "y"})];
        let options = TableOptions::new(data, vec![ColumnDef::accessor("key")])
            .with_row_id(|record: &Value, _, _| record["key"].as_str().unwrap_or_default().to_string());
        let table = Table::new(options).unwrap();
        assert!(table.get_core_row_model().rows_by_id.contains_key("y"));
    }

    #[test]
    fn test_core_model_is_memoized() {
        let table = tree_table();
        let first = table.get_core_row_model();
        let second = table.get_core_row_model();
        assert!(Rc::ptr_eq(&first, &second));
    }
}
