//! FILENAME: table-core/src/features/pagination.rs
//! Pagination.
//!
//! Page counts are `i64` because an externally paginated table may report
//! `-1` for "unknown"; in that case paging forward is always allowed.

use std::rc::Rc;

use crate::feature::TableFeature;
use crate::row_model::RowModel;
use crate::state::{PaginationState, DEFAULT_PAGE_INDEX, DEFAULT_PAGE_SIZE};
use crate::table::Table;
use crate::updater::Updater;

/// The page count value meaning "not known".
pub const UNKNOWN_PAGE_COUNT: i64 = -1;

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("RowPagination").with_initial_state(|state| {
        state.pagination = PaginationState::default();
    })
}

impl<T: 'static> Table<T> {
    pub fn set_pagination(&self, updater: impl Into<Updater<PaginationState>>) {
        self.update_slice(
            "pagination",
            updater.into(),
            self.options().on_pagination_change.clone(),
            |state| &mut state.pagination,
        );
    }

    pub fn reset_pagination(&self, default_state: bool) {
        let next = if default_state {
            PaginationState::default()
        } else {
            self.initial_state().pagination
        };
        self.set_pagination(next);
    }

    /// Sets the page index, clamped to the last page when the page count is
    /// supplied in the options.
    pub fn set_page_index(&self, updater: impl Into<Updater<usize>>) {
        let updater = updater.into();
        let max_page_index = match self.options().page_count {
            Some(count) if count != UNKNOWN_PAGE_COUNT => (count - 1).max(0) as usize,
            _ => usize::MAX,
        };
        self.set_pagination(Updater::from_fn(move |old: &PaginationState| {
            let page_index = updater.apply(&old.page_index).min(max_page_index);
            PaginationState { page_index, ..*old }
        }));
    }

    pub fn reset_page_index(&self, default_state: bool) {
        let next = if default_state {
            DEFAULT_PAGE_INDEX
        } else {
            self.initial_state().pagination.page_index
        };
        self.set_page_index(next);
    }

    /// Sets the page size, keeping the first row of the current page on
    /// screen.
    pub fn set_page_size(&self, updater: impl Into<Updater<usize>>) {
        let updater = updater.into();
        self.set_pagination(Updater::from_fn(move |old: &PaginationState| {
            let page_size = updater.apply(&old.page_size).max(1);
            let top_row_index = old.page_size.saturating_mul(old.page_index);
            PaginationState {
                page_index: top_row_index / page_size,
                page_size,
            }
        }));
    }

    pub fn reset_page_size(&self, default_state: bool) {
        let next = if default_state {
            DEFAULT_PAGE_SIZE
        } else {
            self.initial_state().pagination.page_size
        };
        self.set_page_size(next);
    }

    /// `0..page_count`, or nothing when the count is unknown.
    pub fn get_page_options(&self) -> Vec<usize> {
        let page_count = self.get_page_count();
        if page_count > 0 {
            (0..page_count as usize).collect()
        } else {
            Vec::new()
        }
    }

    pub fn get_can_previous_page(&self) -> bool {
        self.with_state(|state| state.pagination.page_index > 0)
    }

    pub fn get_can_next_page(&self) -> bool {
        let page_index = i64::try_from(self.with_state(|state| state.pagination.page_index))
            .unwrap_or(i64::MAX);
        match self.get_page_count() {
            UNKNOWN_PAGE_COUNT => true,
            0 => false,
            page_count => page_index < page_count - 1,
        }
    }

    pub fn previous_page(&self) {
        self.set_page_index(Updater::from_fn(|old: &usize| old.saturating_sub(1)));
    }

    pub fn next_page(&self) {
        self.set_page_index(Updater::from_fn(|old: &usize| old.saturating_add(1)));
    }

    pub fn first_page(&self) {
        self.set_page_index(0);
    }

    pub fn last_page(&self) {
        let last = (self.get_page_count() - 1).max(0) as usize;
        self.set_page_index(last);
    }

    pub fn get_pre_pagination_row_model(&self) -> Rc<RowModel<T>> {
        self.get_expanded_row_model()
    }

    pub fn get_pagination_row_model(&self) -> Rc<RowModel<T>> {
        let options = self.options();
        match &options.get_pagination_row_model {
            Some(stage) if !options.manual_pagination => stage(self),
            _ => self.get_pre_pagination_row_model(),
        }
    }

    /// The supplied page count, or the row count divided into pages.
    pub fn get_page_count(&self) -> i64 {
        if let Some(page_count) = self.options().page_count {
            return page_count;
        }
        let page_size = self.with_state(|state| state.pagination.page_size).max(1);
        self.get_row_count().div_ceil(page_size) as i64
    }

    /// The supplied row count, or the number of top-level rows before
    /// pagination.
    pub fn get_row_count(&self) -> usize {
        match self.options().row_count {
            Some(row_count) => row_count,
            None => self.get_pre_pagination_row_model().rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_def::ColumnDef;
    use crate::options::TableOptions;
    use crate::row_models::pagination_row_model;
    use serde_json::{json, Value};

    fn table(rows: usize) -> Rc<Table<Value>> {
        let data = (0..rows).map(|i| json!({ "n": i })).collect();
        let options = TableOptions::new(data, vec![ColumnDef::accessor("n")])
            .with_pagination_row_model(pagination_row_model());
        Table::new(options).unwrap()
    }

    #[test]
    fn test_page_navigation() {
        let table = table(25);
        assert_eq!(table.get_page_count(), 3);
        assert_eq!(table.get_page_options(), vec![0, 1, 2]);
        assert!(!table.get_can_previous_page());
        table.next_page();
        table.next_page();
        assert_eq!(table.get_row_model().rows.len(), 5);
        assert!(!table.get_can_next_page());
        table.previous_page();
        assert_eq!(table.get_state().pagination.page_index, 1);
        table.first_page();
        assert_eq!(table.get_state().pagination.page_index, 0);
        table.last_page();
        assert_eq!(table.get_state().pagination.page_index, 2);
    }

    #[test]
    fn test_page_size_keeps_top_row() {
        let table = table(100);
        table.set_pagination(PaginationState { page_index: 3, page_size: 10 });
        table.set_page_size(25usize);
        assert_eq!(table.get_state().pagination, PaginationState { page_index: 1, page_size: 25 });
        table.set_page_size(0usize);
        assert_eq!(table.get_state().pagination.page_size, 1);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let table = table(5);
        table.set_page_index(7usize);
        assert!(table.get_row_model().rows.is_empty());
    }

    #[test]
    fn test_huge_page_index_saturates() {
        let table = table(5);
        table.set_page_index(usize::MAX);
        table.next_page();
        assert_eq!(table.get_state().pagination.page_index, usize::MAX);
        assert!(!table.get_can_next_page());
        table.set_page_size(20usize);
        assert_eq!(table.get_state().pagination.page_size, 20);
        assert!(table.get_row_model().rows.is_empty());
    }

    #[test]
    fn test_empty_table_has_no_pages() {
        let table = table(0);
        assert_eq!(table.get_page_count(), 0);
        assert!(!table.get_can_next_page());
        assert!(table.get_page_options().is_empty());
    }
}
