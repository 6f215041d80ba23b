//! FILENAME: table-core/src/features/grouping.rs
//! Row grouping and aggregation.

use std::rc::Rc;

use crate::cell::Cell;
use crate::column::Column;
use crate::column_def::FnRef;
use crate::event::EventHandler;
use crate::feature::TableFeature;
use crate::features::filtering::first_core_value;
use crate::fns::aggregation_fns::BuiltInAggregationFn;
use crate::fns::AggregationFn;
use crate::row::Row;
use crate::row_model::RowModel;
use crate::state::GroupingState;
use crate::table::Table;
use crate::updater::Updater;
use crate::value::CellValue;

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("ColumnGrouping").with_initial_state(|state| {
        state.grouping = GroupingState::default();
    })
}

// ============================================================================
// COLUMN API
// ============================================================================

impl<T: 'static> Column<T> {
    /// Adds the column to the end of the grouping, or removes it.
    pub fn toggle_grouping(&self, table: &Table<T>) {
        let id = self.id.clone();
        table.set_grouping(Updater::from_fn(move |old: &GroupingState| {
            if old.contains(&id) {
                old.iter().filter(|grouped| **grouped != id).cloned().collect()
            } else {
                let mut next = old.clone();
                next.push(id);
                next
            }
        }));
    }

    pub fn get_can_group(&self, table: &Table<T>) -> bool {
        self.column_def.enable_grouping.unwrap_or(true)
            && table.options().enable_grouping.unwrap_or(true)
            && (self.accessor_fn.is_some() || self.column_def.get_grouping_value.is_some())
    }

    pub fn get_is_grouped(&self, table: &Table<T>) -> bool {
        table.with_state(|state| state.grouping.contains(&self.id))
    }

    pub fn get_grouped_index(&self, table: &Table<T>) -> Option<usize> {
        table.with_state(|state| state.grouping.iter().position(|id| *id == self.id))
    }

    pub fn get_toggle_grouping_handler(self: &Rc<Self>, table: &Table<T>) -> EventHandler {
        let can_group = self.get_can_group(table);
        let column = Rc::clone(self);
        let handle = table.handle();
        Box::new(move |_| {
            if !can_group {
                return;
            }
            if let Some(table) = handle.upgrade() {
                column.toggle_grouping(&table);
            }
        })
    }

    /// Numbers sum, dates reduce to their extent, anything else has no
    /// automatic aggregation.
    pub fn get_auto_aggregation_fn(&self, table: &Table<T>) -> Option<AggregationFn> {
        match first_core_value(table, self) {
            CellValue::Number(_) => Some(BuiltInAggregationFn::Sum.to_fn()),
            CellValue::Date(_) => Some(BuiltInAggregationFn::Extent.to_fn()),
            _ => None,
        }
    }

    pub fn get_aggregation_fn(&self, table: &Table<T>) -> Option<AggregationFn> {
        match &self.column_def.aggregation_fn {
            None | Some(FnRef::Auto) => self.get_auto_aggregation_fn(table),
            Some(FnRef::Custom(aggregation_fn)) => Some(Rc::clone(aggregation_fn)),
            Some(FnRef::Named(name)) => {
                let found = table
                    .options()
                    .aggregation_fns
                    .get(name)
                    .cloned()
                    .or_else(|| BuiltInAggregationFn::from_name(name).map(BuiltInAggregationFn::to_fn));
                if found.is_none() {
                    log::warn!("[grouping] unknown aggregation function '{}'", name);
                }
                found
            }
        }
    }
}

// ============================================================================
// ROW API
// ============================================================================

impl<T: 'static> Row<T> {
    /// True for rows synthesized by the grouped row model.
    pub fn get_is_grouped(&self) -> bool {
        self.group.is_some()
    }

    pub fn grouping_column_id(&self) -> Option<&str> {
        self.group.as_ref().map(|group| group.column_id.as_str())
    }

    pub fn grouping_value(&self) -> Option<&CellValue> {
        self.group.as_ref().map(|group| &group.value)
    }

    /// The value rows are bucketed by: the column's grouping extractor when
    /// it has one, otherwise the cell value.
    pub fn get_grouping_value(&self, table: &Table<T>, column_id: &str) -> CellValue {
        let extract = table
            .find_column(column_id)
            .and_then(|column| column.column_def.get_grouping_value.clone());
        match extract {
            Some(extract) => extract(&self.original),
            None => self.get_value(table, column_id),
        }
    }
}

// ============================================================================
// CELL API
// ============================================================================

impl<T: 'static> Cell<T> {
    /// The cell of a group row in the column that row was grouped by.
    pub fn get_is_grouped(&self, table: &Table<T>) -> bool {
        self.column.get_is_grouped(table) && self.row.grouping_column_id() == Some(self.column.id.as_str())
    }

    /// A grouped column's cell on a row not grouped by that column.
    pub fn get_is_placeholder(&self, table: &Table<T>) -> bool {
        !self.get_is_grouped(table) && self.column.get_is_grouped(table)
    }

    /// A group row's cell holding an aggregate of its children.
    pub fn get_is_aggregated(&self, table: &Table<T>) -> bool {
        !self.get_is_grouped(table) && !self.get_is_placeholder(table) && !self.row.sub_rows.is_empty()
    }
}

// ============================================================================
// TABLE API
// ============================================================================

impl<T: 'static> Table<T> {
    pub fn set_grouping(&self, updater: impl Into<Updater<GroupingState>>) {
        self.update_slice(
            "grouping",
            updater.into(),
            self.options().on_grouping_change.clone(),
            |state| &mut state.grouping,
        );
    }

    pub fn reset_grouping(&self, default_state: bool) {
        let next = if default_state {
            GroupingState::default()
        } else {
            self.initial_state().grouping.clone()
        };
        self.set_grouping(next);
    }

    pub fn get_pre_grouped_row_model(&self) -> Rc<RowModel<T>> {
        self.get_filtered_row_model()
    }

    pub fn get_grouped_row_model(&self) -> Rc<RowModel<T>> {
        let options = self.options();
        match &options.get_grouped_row_model {
            Some(stage) if !options.manual_grouping => stage(self),
            _ => self.get_pre_grouped_row_model(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_def::ColumnDef;
    use crate::options::TableOptions;
    use crate::row_models::grouped_row_model;
    use serde_json::{json, Value};

    fn table() -> Rc<Table<Value>> {
        let data = vec![
            json!({"team": "red", "score": 3}),
            json!({"team": "blue", "score": 5}),
            json!({"team": "red", "score": 4}),
        ];
        let options = TableOptions::new(
            data,
            vec![ColumnDef::accessor("team"), ColumnDef::accessor("score")],
        )
        .with_grouped_row_model(grouped_row_model());
        Table::new(options).unwrap()
    }

    #[test]
    fn test_toggle_grouping_adds_and_removes() {
        let table = table();
        let team = table.get_column("team").unwrap();
        team.toggle_grouping(&table);
        assert_eq!(table.get_state().grouping, vec!["team".to_string()]);
        assert_eq!(team.get_grouped_index(&table), Some(0));
        team.toggle_grouping(&table);
        assert!(table.get_state().grouping.is_empty());
    }

    #[test]
    fn test_auto_aggregation_sums_numbers() {
        let table = table();
        table.set_grouping(vec!["team".to_string()]);
        let rows = &table.get_row_model().rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_value(&table, "score"), CellValue::Number(7.0));
        assert_eq!(rows[1].get_value(&table, "score"), CellValue::Number(5.0));
        assert!(table.get_column("team").unwrap().get_auto_aggregation_fn(&table).is_none());
    }

    #[test]
    fn test_cell_flags() {
        let table = table();
        table.set_grouping(vec!["team".to_string()]);
        let group_row = Rc::clone(&table.get_row_model().rows[0]);
        let cells = group_row.get_all_cells(&table);
        let team = cells.iter().find(|cell| cell.column.id == "team").unwrap();
        let score = cells.iter().find(|cell| cell.column.id == "score").unwrap();
        assert!(team.get_is_grouped(&table));
        assert!(score.get_is_aggregated(&table));

        let leaf = Rc::clone(&group_row.sub_rows[0]);
        let leaf_team = leaf
            .get_all_cells(&table)
            .into_iter()
            .find(|cell| cell.column.id == "team")
            .unwrap();
        assert!(leaf_team.get_is_placeholder(&table));
    }
}
