//! FILENAME: tests/test_pipeline.rs
//! PURPOSE: End-to-end tests for the row-model pipeline.

mod common;

use std::rc::Rc;

use common::*;
use table_core::{
    CellValue, ColumnFilter, ColumnSort, ExpandedState, PaginationState, TableOptions, Updater,
};

// ============================================================================
// FILTER -> SORT -> PAGINATE
// ============================================================================

#[test]
fn test_filter_sort_paginate() {
    let table = table(full_pipeline(people()));
    table.set_column_filters(vec![ColumnFilter::new("status", "single")]);
    table.set_sorting(vec![ColumnSort::desc("age")]);
    table.set_pagination(PaginationState { page_index: 0, page_size: 2 });

    assert_eq!(ids(&table.get_filtered_row_model().rows).len(), 4);
    assert_eq!(ids(&table.get_row_model().rows), vec!["7", "2"]);
    assert_eq!(table.get_page_count(), 2);

    table.next_page();
    assert_eq!(ids(&table.get_row_model().rows), vec!["5", "0"]);
    assert!(!table.get_can_next_page());
}

#[test]
fn test_stages_pass_through_without_registration() {
    let table = table(TableOptions::new(people(), person_columns()));
    table.set_sorting(vec![ColumnSort::asc("age")]);
    table.set_column_filters(vec![ColumnFilter::new("status", "single")]);

    let core = table.get_core_row_model();
    assert!(Rc::ptr_eq(&core, &table.get_filtered_row_model()));
    assert!(Rc::ptr_eq(&core, &table.get_sorted_row_model()));
    assert!(Rc::ptr_eq(&core, &table.get_row_model()));
}

#[test]
fn test_manual_flags_skip_stages() {
    let mut options = full_pipeline(people());
    options.manual_sorting = true;
    options.manual_pagination = true;
    let table = table(options);
    table.set_sorting(vec![ColumnSort::asc("age")]);
    table.set_pagination(PaginationState { page_index: 0, page_size: 3 });

    let rows = table.get_row_model();
    assert_eq!(rows.rows.len(), 8);
    assert_eq!(rows.rows[0].id, "0");
}

// ============================================================================
// MEMOIZATION
// ============================================================================

#[test]
fn test_unchanged_inputs_return_same_model() {
    let table = table(full_pipeline(people()));
    table.set_sorting(vec![ColumnSort::asc("last_name")]);

    let first = table.get_row_model();
    let second = table.get_row_model();
    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn test_page_change_does_not_resort() {
    let table = table(full_pipeline(people()));
    table.set_sorting(vec![ColumnSort::asc("age")]);
    table.set_page_size(3usize);

    let sorted = table.get_sorted_row_model();
    let page_one = table.get_row_model();
    table.next_page();
    let page_two = table.get_row_model();

    assert!(Rc::ptr_eq(&sorted, &table.get_sorted_row_model()));
    assert!(!Rc::ptr_eq(&page_one, &page_two));
    assert_eq!(ids(&page_two.rows), vec!["0", "5", "2"]);
}

#[test]
fn test_changed_input_recomputes_once() {
    let table = table(full_pipeline(people()));
    let before = table.get_filtered_row_model();
    table.set_global_filter(Some(CellValue::text("an")));
    let after = table.get_filtered_row_model();
    assert!(!Rc::ptr_eq(&before, &after));
    assert!(Rc::ptr_eq(&after, &table.get_filtered_row_model()));
}

#[test]
fn test_new_data_rebuilds_core_rows() {
    let table = table(full_pipeline(people()));
    let before = table.get_core_row_model();
    table
        .set_options(Updater::from_fn(|old: &TableOptions<Person>| {
            old.clone().with_data(families())
        }))
        .unwrap();
    let after = table.get_core_row_model();
    assert!(!Rc::ptr_eq(&before, &after));
    assert_eq!(after.rows.len(), 3);
}

// ============================================================================
// ROW MODEL INVARIANT
// ============================================================================

#[test]
fn test_every_stage_keeps_indexes_consistent() {
    let table = table(full_pipeline(families()));
    table.set_sorting(vec![ColumnSort::asc("first_name")]);
    table.set_expanded(ExpandedState::All);
    table.set_pagination(PaginationState { page_index: 0, page_size: 4 });

    assert_row_model_consistent(&table.get_core_row_model());
    assert_row_model_consistent(&table.get_filtered_row_model());
    assert_row_model_consistent(&table.get_sorted_row_model());
    assert_row_model_consistent(&table.get_expanded_row_model());
    assert_row_model_consistent(&table.get_row_model());

    table.set_grouping(vec!["status".to_string()]);
    assert_row_model_consistent(&table.get_grouped_row_model());
    assert_row_model_consistent(&table.get_row_model());
}

#[test]
fn test_sorting_reaches_sub_rows() {
    let table = table(full_pipeline(families()));
    table.set_sorting(vec![ColumnSort::asc("first_name")]);
    let rows = table.get_sorted_row_model();
    assert_eq!(ids(&rows.rows), vec!["0", "1", "2"]);
    assert_eq!(ids(&rows.rows[0].sub_rows), vec!["0.1", "0.0"]);
}

// ============================================================================
// FILTERING HIERARCHIES
// ============================================================================

#[test]
fn test_filter_from_root_drops_children_of_failing_parents() {
    let table = table(full_pipeline(families()));
    table.set_column_filters(vec![ColumnFilter::new("last_name", "child")]);
    assert!(table.get_filtered_row_model().rows.is_empty());
}

#[test]
fn test_filter_from_leaf_rows_keeps_ancestors() {
    let mut options = full_pipeline(families());
    options.filter_from_leaf_rows = true;
    let table = table(options);
    table.set_column_filters(vec![ColumnFilter::new("first_name", "rio")]);

    let filtered = table.get_filtered_row_model();
    assert_eq!(ids(&filtered.rows), vec!["1"]);
    assert_eq!(ids(&filtered.rows[0].sub_rows), vec!["1.0"]);
    assert_row_model_consistent(&filtered);
}

// ============================================================================
// GROUPING + EXPANSION + PAGINATION
// ============================================================================

#[test]
fn test_grouped_rows_expand_into_pages() {
    let table = table(full_pipeline(people()));
    table.set_grouping(vec!["status".to_string()]);

    let grouped = table.get_row_model();
    assert_eq!(grouped.rows.len(), 3);
    assert_eq!(grouped.rows[0].grouping_value(), Some(&CellValue::text("single")));
    assert_eq!(grouped.rows[0].sub_rows.len(), 4);
    assert_eq!(grouped.rows[0].get_value(&table, "visits"), CellValue::Number(275.0));

    table.toggle_all_rows_expanded(Some(true));
    assert_eq!(table.get_row_count(), 11);
    assert_eq!(table.get_page_count(), 2);
    assert_eq!(table.get_row_model().rows.len(), 10);
}

#[test]
fn test_expanded_rows_outside_page_size() {
    let mut options = full_pipeline(families());
    options.paginate_expanded_rows = false;
    let table = table(options);
    table.set_pagination(PaginationState { page_index: 0, page_size: 1 });
    table.set_expanded(ExpandedState::All);

    let page = table.get_row_model();
    assert_eq!(ids(&page.rows), vec!["0", "0.0", "0.1"]);
    assert_eq!(table.get_page_count(), 3);
}
