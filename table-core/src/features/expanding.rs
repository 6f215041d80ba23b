//! FILENAME: table-core/src/features/expanding.rs
//! Row expansion.
//!
//! `ExpandedState::All` expands every row. Collapsing a single row while in
//! that mode first materializes the set of expanded rows from the rows
//! currently rendered, then removes the one row.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::event::EventHandler;
use crate::feature::TableFeature;
use crate::row::Row;
use crate::row_model::RowModel;
use crate::state::ExpandedState;
use crate::table::Table;
use crate::updater::Updater;

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("RowExpanding").with_initial_state(|state| {
        state.expanded = ExpandedState::default();
    })
}

// ============================================================================
// ROW API
// ============================================================================

impl<T: 'static> Row<T> {
    /// Expands or collapses the row; flips it when `expanded` is `None`.
    pub fn toggle_expanded(&self, table: &Table<T>, expanded: Option<bool>) {
        let id = self.id.clone();
        let handle = table.handle();
        table.set_expanded(Updater::from_fn(move |old: &ExpandedState| {
            let exists = old.contains(&id);
            let expanded = expanded.unwrap_or(!exists);
            if exists == expanded {
                return old.clone();
            }

            let mut rows = match old {
                ExpandedState::Rows(rows) => rows.clone(),
                ExpandedState::All => match handle.upgrade() {
                    Some(table) => table
                        .get_row_model()
                        .rows_by_id
                        .keys()
                        .map(|row_id| (row_id.clone(), true))
                        .collect(),
                    None => BTreeMap::new(),
                },
            };
            if expanded {
                rows.insert(id, true);
            } else {
                rows.remove(&id);
            }
            ExpandedState::Rows(rows)
        }));
    }

    pub fn get_is_expanded(&self, table: &Table<T>) -> bool {
        if let Some(is_expanded) = &table.options().get_is_row_expanded {
            return is_expanded(self);
        }
        table.with_state(|state| state.expanded.contains(&self.id))
    }

    pub fn get_can_expand(&self, table: &Table<T>) -> bool {
        let options = table.options();
        match &options.get_row_can_expand {
            Some(can_expand) => can_expand(self),
            None => options.enable_expanding.unwrap_or(true) && !self.sub_rows.is_empty(),
        }
    }

    /// True when every ancestor of the row is expanded.
    pub fn get_is_all_parents_expanded(&self, table: &Table<T>) -> bool {
        let mut parent_id = self.parent_id.clone();
        while let Some(id) = parent_id {
            let Some(parent) = table.find_row(&id) else {
                break;
            };
            if !parent.get_is_expanded(table) {
                return false;
            }
            parent_id = parent.parent_id.clone();
        }
        true
    }

    pub fn get_toggle_expanded_handler(self: &Rc<Self>, table: &Table<T>) -> EventHandler {
        let can_expand = self.get_can_expand(table);
        let row = Rc::clone(self);
        let handle = table.handle();
        Box::new(move |_| {
            if !can_expand {
                return;
            }
            if let Some(table) = handle.upgrade() {
                row.toggle_expanded(&table, None);
            }
        })
    }
}

// ============================================================================
// TABLE API
// ============================================================================

impl<T: 'static> Table<T> {
    pub fn set_expanded(&self, updater: impl Into<Updater<ExpandedState>>) {
        self.update_slice(
            "expanded",
            updater.into(),
            self.options().on_expanded_change.clone(),
            |state| &mut state.expanded,
        );
    }

    pub fn reset_expanded(&self, default_state: bool) {
        let next = if default_state {
            ExpandedState::default()
        } else {
            self.initial_state().expanded.clone()
        };
        self.set_expanded(next);
    }

    /// Expands every row, or collapses all of them. Flips between the two
    /// when `expanded` is `None`.
    pub fn toggle_all_rows_expanded(&self, expanded: Option<bool>) {
        if expanded.unwrap_or_else(|| !self.get_is_all_rows_expanded()) {
            self.set_expanded(ExpandedState::All);
        } else {
            self.set_expanded(ExpandedState::default());
        }
    }

    pub fn get_can_some_rows_expand(&self) -> bool {
        self.get_pre_pagination_row_model()
            .flat_rows
            .iter()
            .any(|row| row.get_can_expand(self))
    }

    pub fn get_toggle_all_rows_expanded_handler(&self) -> EventHandler {
        let handle = self.handle();
        Box::new(move |_| {
            if let Some(table) = handle.upgrade() {
                table.toggle_all_rows_expanded(None);
            }
        })
    }

    pub fn get_is_some_rows_expanded(&self) -> bool {
        self.with_state(|state| match &state.expanded {
            ExpandedState::All => true,
            ExpandedState::Rows(rows) => rows.values().any(|expanded| *expanded),
        })
    }

    pub fn get_is_all_rows_expanded(&self) -> bool {
        let expanded = self.with_state(|state| state.expanded.clone());
        match expanded {
            ExpandedState::All => true,
            ExpandedState::Rows(rows) if rows.is_empty() => false,
            ExpandedState::Rows(_) => self
                .get_row_model()
                .flat_rows
                .iter()
                .all(|row| row.get_is_expanded(self)),
        }
    }

    /// The deepest expanded row id, counted in `.`-separated segments.
    pub fn get_expanded_depth(&self) -> usize {
        let expanded = self.with_state(|state| state.expanded.clone());
        let ids: Vec<String> = match expanded {
            ExpandedState::All => self.get_row_model().rows_by_id.keys().cloned().collect(),
            ExpandedState::Rows(rows) => rows.into_keys().collect(),
        };
        ids.iter().map(|id| id.split('.').count()).max().unwrap_or(0)
    }

    pub fn get_pre_expanded_row_model(&self) -> Rc<RowModel<T>> {
        self.get_sorted_row_model()
    }

    pub fn get_expanded_row_model(&self) -> Rc<RowModel<T>> {
        let options = self.options();
        match &options.get_expanded_row_model {
            Some(stage) if !options.manual_expanding => stage(self),
            _ => self.get_pre_expanded_row_model(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_def::ColumnDef;
    use crate::options::TableOptions;
    use crate::row_models::expanded_row_model;
    use serde_json::{json, Value};

    fn table() -> Rc<Table<Value>> {
        let data = vec![
            json!({"name": "r1", "children": [{"name": "r1a"}]}),
            json!({"name": "r2", "children": [{"name": "r2a"}]}),
            json!({"name": "r3"}),
        ];
        let options = TableOptions::new(data, vec![ColumnDef::accessor("name")])
            .with_sub_rows(|row: &Value, _| {
                row.get("children")
                    .and_then(Value::as_array)
                    .map(|children| children.iter().cloned().map(Rc::new).collect())
            })
            .with_expanded_row_model(expanded_row_model());
        Table::new(options).unwrap()
    }

    #[test]
    fn test_collapsing_one_row_from_all() {
        let table = table();
        table.toggle_all_rows_expanded(Some(true));
        assert_eq!(table.get_state().expanded, ExpandedState::All);
        assert_eq!(table.get_row_model().rows.len(), 5);

        let r2 = table.get_row("1", false).unwrap();
        r2.toggle_expanded(&table, Some(false));
        let ExpandedState::Rows(rows) = table.get_state().expanded else {
            panic!("expected an explicit row set");
        };
        assert!(!rows.contains_key("1"));
        assert!(rows.contains_key("0"));
        assert!(rows.contains_key("2"));
        assert_eq!(table.get_row_model().rows.len(), 4);
    }

    #[test]
    fn test_toggle_expanded_flips() {
        let table = table();
        let r1 = table.get_row("0", false).unwrap();
        assert!(r1.get_can_expand(&table));
        r1.toggle_expanded(&table, None);
        assert!(r1.get_is_expanded(&table));
        assert!(table.get_is_some_rows_expanded());
        assert_eq!(table.get_expanded_depth(), 1);
        r1.toggle_expanded(&table, None);
        assert!(!r1.get_is_expanded(&table));
    }

    #[test]
    fn test_all_parents_expanded() {
        let table = table();
        let child = table.get_row("0.0", true).unwrap();
        assert!(!child.get_is_all_parents_expanded(&table));
        table.set_expanded(ExpandedState::from_ids(["0"]));
        assert!(child.get_is_all_parents_expanded(&table));
    }
}
