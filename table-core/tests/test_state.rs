//! FILENAME: tests/test_state.rs
//! PURPOSE: State writes, resets, controlled slices and custom features.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use serde_json::json;
use table_core::{
    ColumnOrderState, ColumnSort, OnChangeFn, PaginationState, PartialTableState, SortingState,
    TableFeature, TableOptions, TableState, Updater,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// RESETS
// ============================================================================

#[test]
fn test_reset_column_order_round_trip() {
    let options = TableOptions::new(people(), person_columns()).with_initial_state(PartialTableState {
        column_order: Some(strings(&["age", "status"])),
        ..Default::default()
    });
    let table = table(options);
    assert_eq!(table.get_state().column_order, strings(&["age", "status"]));

    table.set_column_order(strings(&["visits"]));
    table.reset_column_order(true);
    assert!(table.get_state().column_order.is_empty());

    table.reset_column_order(false);
    assert_eq!(table.get_state().column_order, strings(&["age", "status"]));
}

#[test]
fn test_reset_restores_whole_initial_state() {
    let table = table(full_pipeline(people()));
    let initial = table.get_state();
    table.set_sorting(vec![ColumnSort::asc("age")]);
    table.set_page_size(4usize);
    table.set_grouping(strings(&["status"]));
    table.reset();
    assert_eq!(table.get_state(), initial);
}

#[test]
fn test_default_state_values() {
    let table = table(TableOptions::new(people(), person_columns()));
    let state = table.get_state();
    assert_eq!(state.pagination, PaginationState { page_index: 0, page_size: 10 });
    assert!(state.sorting.is_empty());
    assert!(state.row_selection.is_empty());
    assert_eq!(state.global_filter, None);
}

// ============================================================================
// FUNCTIONAL UPDATES
// ============================================================================

#[test]
fn test_functional_update_sees_previous_value() {
    let table = table(TableOptions::new(people(), person_columns()));
    table.set_column_order(strings(&["age"]));
    table.set_column_order(Updater::from_fn(|old: &ColumnOrderState| {
        let mut next = old.clone();
        next.push("status".to_string());
        next
    }));
    assert_eq!(table.get_state().column_order, strings(&["age", "status"]));
}

#[test]
fn test_whole_state_update() {
    let table = table(TableOptions::new(people(), person_columns()));
    table.set_state(Updater::from_fn(|old: &TableState| TableState {
        grouping: strings(&["status"]),
        ..old.clone()
    }));
    assert_eq!(table.get_state().grouping, strings(&["status"]));
}

// ============================================================================
// CONTROLLED STATE
// ============================================================================

#[test]
fn test_slice_handler_receives_writes() {
    let received: Rc<RefCell<Vec<SortingState>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    let mut options = TableOptions::new(people(), person_columns());
    options.on_sorting_change = Some(Rc::new(move |updater: Updater<SortingState>| {
        sink.borrow_mut().push(updater.apply(&Vec::new()));
    }));
    let table = table(options);

    table.set_sorting(vec![ColumnSort::desc("age")]);
    assert_eq!(received.borrow().as_slice(), &[vec![ColumnSort::desc("age")]]);
    assert!(table.get_state().sorting.is_empty());
}

#[test]
fn test_controlled_slice_wins_until_host_updates() {
    let options = TableOptions::new(people(), person_columns())
        .with_sorted_row_model(table_core::sorted_row_model())
        .with_state(PartialTableState {
            sorting: Some(vec![ColumnSort::asc("age")]),
            ..Default::default()
        });
    let table = table(options);
    assert_eq!(ids(&table.get_row_model().rows)[0], "3");

    table.apply_state(Updater::from_fn(|old: &TableState| TableState {
        sorting: vec![ColumnSort::desc("age")],
        ..old.clone()
    }));
    assert_eq!(table.get_state().sorting, vec![ColumnSort::asc("age")]);

    table
        .set_options(Updater::from_fn(|old: &TableOptions<Person>| {
            old.clone().with_state(PartialTableState {
                sorting: Some(vec![ColumnSort::desc("age")]),
                ..Default::default()
            })
        }))
        .unwrap();
    assert_eq!(ids(&table.get_row_model().rows)[0], "7");
}

#[test]
fn test_table_handler_receives_slice_writes() {
    let pending: Rc<RefCell<Vec<Updater<TableState>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&pending);
    let handler: OnChangeFn<TableState> =
        Rc::new(move |updater: Updater<TableState>| sink.borrow_mut().push(updater));
    let mut options = TableOptions::new(people(), person_columns());
    options.on_state_change = Some(handler);
    let table = table(options);

    table.set_page_index(1usize);
    assert_eq!(table.get_state().pagination.page_index, 0);

    let updater = pending.borrow_mut().pop().unwrap();
    table.apply_state(updater);
    assert_eq!(table.get_state().pagination.page_index, 1);
}

// ============================================================================
// CUSTOM FEATURES
// ============================================================================

#[test]
fn test_custom_feature_state_and_hooks() {
    let feature = TableFeature::<Person>::new("Density")
        .with_initial_state(|state| {
            state.custom.insert("density".to_string(), json!("md"));
        })
        .on_create_row(|row, _| {
            row.extensions.insert("striped".to_string(), json!(row.index % 2 == 1));
        });
    let table = table(TableOptions::new(people(), person_columns()).with_feature(feature));

    assert_eq!(table.get_state().custom.get("density"), Some(&json!("md")));
    let rows = table.get_row_model();
    assert_eq!(rows.rows[1].extensions.get("striped"), Some(&json!(true)));
    assert_eq!(table.features().last().map(|f| f.name), Some("Density"));
}

#[test]
fn test_custom_feature_defaults_do_not_override_host() {
    let feature = TableFeature::new("Defaults").with_default_options(
        |options: &mut TableOptions<Person>| {
            options.enable_sorting.get_or_insert(false);
        },
    );
    let mut options = TableOptions::new(people(), person_columns()).with_feature(feature);
    options.enable_sorting = Some(true);
    let table = table(options);
    assert_eq!(table.options().enable_sorting, Some(true));
    assert!(table.get_column("age").unwrap().get_can_sort(&table));
}

#[test]
fn test_state_serializes() {
    let table = table(TableOptions::new(people(), person_columns()));
    table.set_sorting(vec![ColumnSort::asc("age")]);
    let text = serde_json::to_string(&table.get_state()).unwrap();
    let back: TableState = serde_json::from_str(&text).unwrap();
    assert_eq!(back, table.get_state());
}
