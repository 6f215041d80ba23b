//! FILENAME: table-core/src/row_models/expanded.rs
//! The expanded row model: expanded children are spliced into the
//! top-level row list right after their parent.

use std::rc::Rc;

use crate::memo::{Memo, Ptr};
use crate::options::RowModelFn;
use crate::row::Row;
use crate::row_model::RowModel;
use crate::state::ExpandedState;
use crate::table::Table;

type ExpandedDeps<T> = (Ptr<RowModel<T>>, ExpandedState, bool);

pub fn expanded_row_model<T: 'static>() -> RowModelFn<T> {
    let memo: Memo<ExpandedDeps<T>, Rc<RowModel<T>>> = Memo::new("expanded_row_model");
    Rc::new(move |table: &Table<T>| {
        let pre = table.get_pre_expanded_row_model();
        let deps = (
            Ptr::new(&pre),
            table.with_state(|state| state.expanded.clone()),
            table.options().paginate_expanded_rows,
        );
        memo.get(deps, |(pre, expanded, paginate_expanded_rows)| {
            let nothing_expanded = match expanded {
                ExpandedState::All => false,
                ExpandedState::Rows(rows) => rows.is_empty(),
            };
            // When expanded rows are not paginated, pagination expands its page itself.
            if pre.rows.is_empty() || nothing_expanded || !*paginate_expanded_rows {
                return Rc::clone(&pre.0);
            }
            Rc::new(expand_rows(table, &pre.rows))
        })
    })
}

/// `rows` in order, each followed by its visible descendants.
pub(crate) fn expand_rows<T: 'static>(table: &Table<T>, rows: &[Rc<Row<T>>]) -> RowModel<T> {
    let mut expanded = Vec::new();
    fn visit<T: 'static>(table: &Table<T>, row: &Rc<Row<T>>, out: &mut Vec<Rc<Row<T>>>) {
        out.push(Rc::clone(row));
        if !row.sub_rows.is_empty() && row.get_is_expanded(table) {
            for sub_row in &row.sub_rows {
                visit(table, sub_row, out);
            }
        }
    }
    for row in rows {
        visit(table, row, &mut expanded);
    }
    RowModel::new(expanded)
}
