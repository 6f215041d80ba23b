//! FILENAME: table-core/src/row_models/paginated.rs
//! The pagination row model: one page of top-level rows.

use std::rc::Rc;

use crate::memo::{Memo, Ptr};
use crate::options::RowModelFn;
use crate::row_model::RowModel;
use crate::row_models::expanded::expand_rows;
use crate::state::{ExpandedState, PaginationState};
use crate::table::Table;

/// The expanded state only matters when the page expands its own rows.
type PaginatedDeps<T> = (Ptr<RowModel<T>>, PaginationState, Option<ExpandedState>);

pub fn pagination_row_model<T: 'static>() -> RowModelFn<T> {
    let memo: Memo<PaginatedDeps<T>, Rc<RowModel<T>>> = Memo::new("pagination_row_model");
    Rc::new(move |table: &Table<T>| {
        let pre = table.get_pre_pagination_row_model();
        let paginate_expanded_rows = table.options().paginate_expanded_rows;
        let deps = table.with_state(|state| {
            (
                Ptr::new(&pre),
                state.pagination,
                (!paginate_expanded_rows).then(|| state.expanded.clone()),
            )
        });
        memo.get(deps, |(pre, pagination, expanded)| {
            if pre.rows.is_empty() {
                return Rc::clone(&pre.0);
            }

            let start = pagination.page_size.saturating_mul(pagination.page_index);
            let page: Vec<_> = pre
                .rows
                .iter()
                .skip(start)
                .take(pagination.page_size)
                .cloned()
                .collect();

            match expanded {
                Some(_) => Rc::new(expand_rows(table, &page)),
                None => Rc::new(RowModel::new(page)),
            }
        })
    })
}
