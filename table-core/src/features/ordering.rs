//! FILENAME: table-core/src/features/ordering.rs
//! Column ordering.
//!
//! `order_columns` is the single place leaf-column order is decided. Header
//! groups, visible columns, pinned sections and row cells all read leaf
//! columns through it.

use std::rc::Rc;

use crate::column::Column;
use crate::feature::TableFeature;
use crate::features::pinning::ColumnPosition;
use crate::options::GroupedColumnMode;
use crate::state::ColumnOrderState;
use crate::table::Table;
use crate::updater::Updater;

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("ColumnOrdering").with_initial_state(|state| {
        state.column_order = ColumnOrderState::default();
    })
}

// ============================================================================
// ORDERING FUNCTION
// ============================================================================

/// Orders `items` by `order`: each id in turn claims the first remaining
/// item with that id, unknown ids are skipped, and whatever is left keeps
/// its relative order at the end. An empty `order` leaves `items` as-is.
pub fn order_by_id<I>(items: Vec<I>, order: &[String], id_of: impl Fn(&I) -> &str) -> Vec<I> {
    if order.is_empty() {
        return items;
    }

    let mut remaining: Vec<Option<I>> = items.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());

    for id in order {
        let found = remaining
            .iter()
            .position(|slot| slot.as_ref().map_or(false, |item| id_of(item) == id));
        if let Some(item) = found.and_then(|index| remaining[index].take()) {
            ordered.push(item);
        }
    }

    ordered.extend(remaining.into_iter().flatten());
    ordered
}

/// Moves or drops grouped items according to `mode`. Reordered items come
/// first, in grouping order.
pub fn apply_grouped_column_mode<I>(
    items: Vec<I>,
    grouping: &[String],
    mode: GroupedColumnMode,
    id_of: impl Fn(&I) -> &str,
) -> Vec<I> {
    if grouping.is_empty() || mode == GroupedColumnMode::Keep {
        return items;
    }

    let (mut grouped, rest): (Vec<I>, Vec<I>) = items
        .into_iter()
        .partition(|item| grouping.iter().any(|id| id == id_of(item)));

    match mode {
        GroupedColumnMode::Remove => rest,
        _ => {
            grouped.sort_by_key(|item| {
                grouping
                    .iter()
                    .position(|id| id == id_of(item))
                    .unwrap_or(usize::MAX)
            });
            grouped.extend(rest);
            grouped
        }
    }
}

/// Leaf-column order: `column_order` first, then the grouped column mode.
pub fn order_columns<T: 'static>(
    columns: Vec<Rc<Column<T>>>,
    column_order: &[String],
    grouping: &[String],
    mode: GroupedColumnMode,
) -> Vec<Rc<Column<T>>> {
    let ordered = order_by_id(columns, column_order, |column| column.id.as_str());
    apply_grouped_column_mode(ordered, grouping, mode, |column| column.id.as_str())
}

// ============================================================================
// COLUMN API
// ============================================================================

impl<T: 'static> Column<T> {
    /// Position among the visible leaf columns of `position` (all of them
    /// when `None`).
    pub fn get_index(&self, table: &Table<T>, position: Option<ColumnPosition>) -> Option<usize> {
        table
            .visible_leaf_columns_at(position)
            .iter()
            .position(|column| column.id == self.id)
    }

    pub fn get_is_first_column(&self, table: &Table<T>, position: Option<ColumnPosition>) -> bool {
        table
            .visible_leaf_columns_at(position)
            .first()
            .map_or(false, |column| column.id == self.id)
    }

    pub fn get_is_last_column(&self, table: &Table<T>, position: Option<ColumnPosition>) -> bool {
        table
            .visible_leaf_columns_at(position)
            .last()
            .map_or(false, |column| column.id == self.id)
    }
}

// ============================================================================
// TABLE API
// ============================================================================

impl<T: 'static> Table<T> {
    pub fn set_column_order(&self, updater: impl Into<Updater<ColumnOrderState>>) {
        self.update_slice(
            "column_order",
            updater.into(),
            self.options().on_column_order_change.clone(),
            |state| &mut state.column_order,
        );
    }

    /// Back to the initial order, or to definition order when `default_state`.
    pub fn reset_column_order(&self, default_state: bool) {
        let next = if default_state {
            ColumnOrderState::default()
        } else {
            self.initial_state().column_order.clone()
        };
        self.set_column_order(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn order(items: &[&str], column_order: &[&str], grouping: &[&str], mode: GroupedColumnMode) -> Vec<String> {
        let ordered = order_by_id(ids(items), &ids(column_order), |s| s.as_str());
        apply_grouped_column_mode(ordered, &ids(grouping), mode, |s| s.as_str())
    }

    #[test]
    fn test_empty_order_keeps_input() {
        assert_eq!(
            order(&["a", "b", "c"], &[], &[], GroupedColumnMode::Reorder),
            ids(&["a", "b", "c"])
        );
    }

    #[test]
    fn test_partial_order_appends_leftovers() {
        assert_eq!(
            order(&["a", "b", "c", "d"], &["c", "a"], &[], GroupedColumnMode::Reorder),
            ids(&["c", "a", "b", "d"])
        );
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        assert_eq!(
            order(&["a", "b"], &["zz", "b"], &[], GroupedColumnMode::Reorder),
            ids(&["b", "a"])
        );
    }

    #[test]
    fn test_grouped_mode_reorder() {
        assert_eq!(
            order(&["a", "b", "c"], &[], &["b"], GroupedColumnMode::Reorder),
            ids(&["b", "a", "c"])
        );
    }

    #[test]
    fn test_grouped_mode_reorder_follows_grouping_order() {
        assert_eq!(
            order(&["a", "b", "c", "d"], &[], &["d", "b"], GroupedColumnMode::Reorder),
            ids(&["d", "b", "a", "c"])
        );
    }

    #[test]
    fn test_grouped_mode_remove() {
        assert_eq!(
            order(&["a", "b", "c"], &[], &["b"], GroupedColumnMode::Remove),
            ids(&["a", "c"])
        );
    }

    #[test]
    fn test_grouped_mode_keep() {
        assert_eq!(
            order(&["a", "b", "c"], &["c"], &["b"], GroupedColumnMode::Keep),
            ids(&["c", "a", "b"])
        );
    }

    #[test]
    fn test_ordering_is_idempotent() {
        let first = order(&["a", "b", "c", "d"], &["d", "b"], &["c"], GroupedColumnMode::Reorder);
        let second = order(&["a", "b", "c", "d"], &["d", "b"], &["c"], GroupedColumnMode::Reorder);
        assert_eq!(first, second);
        assert_eq!(first, ids(&["c", "d", "b", "a"]));
    }
}
