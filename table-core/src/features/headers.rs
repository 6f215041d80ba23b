//! FILENAME: table-core/src/features/headers.rs
//! Table-level header and footer groups.
//!
//! The full header groups place left-pinned leaves first and right-pinned
//! leaves last; the per-section groups are built separately so their ids
//! carry the section name.

use std::rc::Rc;

use crate::column::Column;
use crate::feature::TableFeature;
use crate::features::pinning::ColumnPosition;
use crate::header::{build_header_groups, Header, HeaderGroup};
use crate::memo::{Memo, Ptr};
use crate::state::ColumnPinningState;
use crate::table::{HeaderGroups, Headers, Table};

type HeaderGroupsMemo<T> =
    Memo<(Ptr<Vec<Rc<Column<T>>>>, Ptr<Vec<Rc<Column<T>>>>, ColumnPinningState), HeaderGroups<T>>;

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("Headers")
}

fn find_all<T: 'static>(leaves: &[Rc<Column<T>>], ids: &[String]) -> Vec<Rc<Column<T>>> {
    ids.iter()
        .filter_map(|id| leaves.iter().find(|column| column.id == *id).cloned())
        .collect()
}

fn reversed<T: 'static>(groups: &[Rc<HeaderGroup<T>>]) -> HeaderGroups<T> {
    Rc::new(groups.iter().rev().cloned().collect())
}

impl<T: 'static> Table<T> {
    fn header_groups_for(
        &self,
        memo: &HeaderGroupsMemo<T>,
        position: Option<ColumnPosition>,
    ) -> HeaderGroups<T> {
        let all = self.get_all_columns();
        let visible = self.get_visible_leaf_columns();
        let deps = (
            Ptr::new(&all),
            Ptr::new(&visible),
            self.with_state(|s| s.column_pinning.clone()),
        );
        memo.get(deps, |(all, visible, pinning)| {
            let left = find_all(visible, &pinning.left);
            let right = find_all(visible, &pinning.right);
            let columns: Vec<Rc<Column<T>>> = match position {
                Some(ColumnPosition::Left) => left,
                Some(ColumnPosition::Right) => right,
                Some(ColumnPosition::Center) | None => {
                    let center = visible
                        .iter()
                        .filter(|c| !pinning.left.contains(&c.id) && !pinning.right.contains(&c.id))
                        .cloned();
                    if position.is_some() {
                        center.collect()
                    } else {
                        let mut ordered = left;
                        ordered.extend(center);
                        ordered.extend(right);
                        ordered
                    }
                }
            };
            Rc::new(build_header_groups(self, all, &columns, position))
        })
    }

    pub fn get_header_groups(&self) -> HeaderGroups<T> {
        self.header_groups_for(&self.memos.header_groups, None)
    }

    pub fn get_left_header_groups(&self) -> HeaderGroups<T> {
        self.header_groups_for(&self.memos.left_header_groups, Some(ColumnPosition::Left))
    }

    pub fn get_center_header_groups(&self) -> HeaderGroups<T> {
        self.header_groups_for(&self.memos.center_header_groups, Some(ColumnPosition::Center))
    }

    pub fn get_right_header_groups(&self) -> HeaderGroups<T> {
        self.header_groups_for(&self.memos.right_header_groups, Some(ColumnPosition::Right))
    }

    /// Header groups bottom-up.
    pub fn get_footer_groups(&self) -> HeaderGroups<T> {
        let groups = self.get_header_groups();
        self.memos.footer_groups.get(Ptr::new(&groups), |g| reversed(g))
    }

    pub fn get_left_footer_groups(&self) -> HeaderGroups<T> {
        let groups = self.get_left_header_groups();
        self.memos.left_footer_groups.get(Ptr::new(&groups), |g| reversed(g))
    }

    pub fn get_center_footer_groups(&self) -> HeaderGroups<T> {
        let groups = self.get_center_header_groups();
        self.memos.center_footer_groups.get(Ptr::new(&groups), |g| reversed(g))
    }

    pub fn get_right_footer_groups(&self) -> HeaderGroups<T> {
        let groups = self.get_right_header_groups();
        self.memos.right_footer_groups.get(Ptr::new(&groups), |g| reversed(g))
    }

    /// Every header of every group, top level first.
    pub fn get_flat_headers(&self) -> Headers<T> {
        let groups = self.get_header_groups();
        self.memos.flat_headers.get(Ptr::new(&groups), |groups| {
            Rc::new(
                groups
                    .iter()
                    .flat_map(|group| group.headers.iter().cloned())
                    .collect(),
            )
        })
    }

    /// The bottom-level headers in left, center, right order.
    pub fn get_leaf_headers(&self) -> Headers<T> {
        let deps = (
            Ptr::new(&self.get_left_header_groups()),
            Ptr::new(&self.get_center_header_groups()),
            Ptr::new(&self.get_right_header_groups()),
        );
        self.memos.leaf_headers.get(deps, |(left, center, right)| {
            let top_headers = |groups: &[Rc<HeaderGroup<T>>]| -> Vec<Rc<Header<T>>> {
                groups.first().map(|g| g.headers.clone()).unwrap_or_default()
            };
            let mut leaves = Vec::new();
            for section in [left, center, right] {
                for header in top_headers(section.as_slice()) {
                    leaves.extend(header.get_leaf_headers());
                }
            }
            Rc::new(leaves)
        })
    }
}
