//! FILENAME: table-core/src/features/column_sizing.rs
//! Column sizing and interactive resizing.
//!
//! A resize session starts from a header, records the starting size of
//! every leaf column under it, and scales all of them by the same
//! percentage as the pointer moves. Sizes are written to state on every
//! move or only when the session ends, depending on `ColumnResizeMode`.

use std::rc::{Rc, Weak};

use crate::column::Column;
use crate::feature::TableFeature;
use crate::features::pinning::ColumnPosition;
use crate::header::Header;
use crate::options::{ColumnResizeDirection, ColumnResizeMode};
use crate::state::{ColumnSizingInfoState, ColumnSizingState};
use crate::table::{HeaderGroups, Table};
use crate::updater::Updater;

pub const DEFAULT_COLUMN_SIZE: f64 = 150.0;
pub const DEFAULT_MIN_COLUMN_SIZE: f64 = 20.0;
pub const DEFAULT_MAX_COLUMN_SIZE: f64 = f64::MAX;

/// Floor for the scale factor, so a drag never collapses a column to
/// exactly zero.
const MIN_DELTA_PERCENTAGE: f64 = -0.999999;

pub(crate) fn feature<T: 'static>() -> TableFeature<T> {
    TableFeature::new("ColumnSizing").with_initial_state(|state| {
        state.column_sizing = ColumnSizingState::default();
        state.column_sizing_info = ColumnSizingInfoState::default();
    })
}

// ============================================================================
// COLUMN API
// ============================================================================

impl<T: 'static> Column<T> {
    /// The user-set size, else the definition's size, clamped to the
    /// column's min and max.
    pub fn get_size(&self, table: &Table<T>) -> f64 {
        let def = &self.column_def;
        let size = table
            .with_state(|state| state.column_sizing.get(&self.id).copied())
            .or(def.size)
            .unwrap_or(DEFAULT_COLUMN_SIZE);
        size.max(def.min_size.unwrap_or(DEFAULT_MIN_COLUMN_SIZE))
            .min(def.max_size.unwrap_or(DEFAULT_MAX_COLUMN_SIZE))
    }

    /// Total size of the visible leaf columns before this one in `position`.
    pub fn get_start(&self, table: &Table<T>, position: Option<ColumnPosition>) -> f64 {
        let columns = table.visible_leaf_columns_at(position);
        let index = self.get_index(table, position).unwrap_or(0);
        columns[..index].iter().map(|column| column.get_size(table)).sum()
    }

    /// Total size of the visible leaf columns after this one in `position`.
    pub fn get_after(&self, table: &Table<T>, position: Option<ColumnPosition>) -> f64 {
        let columns = table.visible_leaf_columns_at(position);
        match self.get_index(table, position) {
            Some(index) => columns[index + 1..].iter().map(|column| column.get_size(table)).sum(),
            None => 0.0,
        }
    }

    pub fn reset_size(&self, table: &Table<T>) {
        let id = self.id.clone();
        table.set_column_sizing(Updater::from_fn(move |old: &ColumnSizingState| {
            let mut next = old.clone();
            next.remove(&id);
            next
        }));
    }

    pub fn get_can_resize(&self, table: &Table<T>) -> bool {
        self.column_def.enable_resizing.unwrap_or(true)
            && table.options().enable_column_resizing.unwrap_or(true)
    }

    pub fn get_is_resizing(&self, table: &Table<T>) -> bool {
        table.with_state(|state| {
            state.column_sizing_info.is_resizing_column.as_deref() == Some(self.id.as_str())
        })
    }
}

// ============================================================================
// HEADER API
// ============================================================================

impl<T: 'static> Header<T> {
    /// Sum of the sizes of the leaf columns under this header.
    pub fn get_size(self: &Rc<Self>, table: &Table<T>) -> f64 {
        self.get_leaf_headers()
            .iter()
            .map(|header| header.column.get_size(table))
            .sum()
    }

    /// Offset of the header's left edge within its section.
    pub fn get_start(self: &Rc<Self>, table: &Table<T>) -> f64 {
        match self.get_leaf_headers().first() {
            Some(first) => first.column.get_start(table, self.position),
            None => 0.0,
        }
    }

    /// Begins a resize session at pointer position `client_x`. Returns
    /// `None` when the header's column cannot be resized.
    pub fn start_resize(self: &Rc<Self>, table: &Table<T>, client_x: f64) -> Option<ColumnResize<T>> {
        let column = table.find_column(&self.column.id)?;
        if !column.get_can_resize(table) {
            return None;
        }

        let start_size = self.get_size(table);
        let column_sizing_start: Vec<(String, f64)> = self
            .get_leaf_headers()
            .iter()
            .map(|header| (header.column.id.clone(), header.column.get_size(table)))
            .collect();

        log::debug!("[sizing] resize of '{}' started at {}", column.id, client_x);
        let column_id = column.id.clone();
        table.set_column_sizing_info(Updater::from_fn(move |old: &ColumnSizingInfoState| {
            ColumnSizingInfoState {
                start_offset: Some(client_x),
                start_size: Some(start_size),
                delta_offset: Some(0.0),
                delta_percentage: Some(0.0),
                is_resizing_column: Some(column_id),
                column_sizing_start,
                ..old.clone()
            }
        }));

        Some(ColumnResize {
            table: table.handle(),
            column_id: column.id.clone(),
        })
    }
}

// ============================================================================
// RESIZE SESSION
// ============================================================================

/// An in-progress resize, driven by pointer positions.
pub struct ColumnResize<T: 'static> {
    table: Weak<Table<T>>,
    column_id: String,
}

impl<T: 'static> ColumnResize<T> {
    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    /// The pointer moved to `client_x`.
    pub fn move_to(&self, client_x: f64) {
        if let Some(table) = self.table.upgrade() {
            update_offset(&table, client_x, false);
        }
    }

    /// The pointer was released at `client_x`; commits sizes and clears the
    /// session.
    pub fn end(self, client_x: f64) {
        let Some(table) = self.table.upgrade() else {
            return;
        };
        update_offset(&table, client_x, true);
        table.set_column_sizing_info(ColumnSizingInfoState::default());
        log::debug!("[sizing] resize of '{}' ended at {}", self.column_id, client_x);
    }
}

fn update_offset<T: 'static>(table: &Table<T>, client_x: f64, is_end: bool) {
    let info = table.with_state(|state| state.column_sizing_info.clone());
    let options = table.options();

    let direction = match options.column_resize_direction {
        ColumnResizeDirection::Ltr => 1.0,
        ColumnResizeDirection::Rtl => -1.0,
    };
    let delta_offset = (client_x - info.start_offset.unwrap_or(0.0)) * direction;
    let delta_percentage = match info.start_size {
        Some(start_size) if start_size > 0.0 => (delta_offset / start_size).max(MIN_DELTA_PERCENTAGE),
        _ => 0.0,
    };

    let resized: Vec<(String, f64)> = info
        .column_sizing_start
        .iter()
        .map(|(id, size)| {
            let next = (size + size * delta_percentage).max(0.0);
            (id.clone(), (next * 100.0).round() / 100.0)
        })
        .collect();

    table.set_column_sizing_info(ColumnSizingInfoState {
        delta_offset: Some(delta_offset),
        delta_percentage: Some(delta_percentage),
        ..info
    });

    if options.column_resize_mode == ColumnResizeMode::OnChange || is_end {
        table.set_column_sizing(Updater::from_fn(move |old: &ColumnSizingState| {
            let mut next = old.clone();
            next.extend(resized);
            next
        }));
    }
}

// ============================================================================
// TABLE API
// ============================================================================

impl<T: 'static> Table<T> {
    pub fn set_column_sizing(&self, updater: impl Into<Updater<ColumnSizingState>>) {
        self.update_slice(
            "column_sizing",
            updater.into(),
            self.options().on_column_sizing_change.clone(),
            |state| &mut state.column_sizing,
        );
    }

    pub fn reset_column_sizing(&self, default_state: bool) {
        let next = if default_state {
            ColumnSizingState::default()
        } else {
            self.initial_state().column_sizing.clone()
        };
        self.set_column_sizing(next);
    }

    pub fn set_column_sizing_info(&self, updater: impl Into<Updater<ColumnSizingInfoState>>) {
        self.update_slice(
            "column_sizing_info",
            updater.into(),
            self.options().on_column_sizing_info_change.clone(),
            |state| &mut state.column_sizing_info,
        );
    }

    pub fn reset_header_size_info(&self, default_state: bool) {
        let next = if default_state {
            ColumnSizingInfoState::default()
        } else {
            self.initial_state().column_sizing_info.clone()
        };
        self.set_column_sizing_info(next);
    }

    pub fn get_total_size(&self) -> f64 {
        self.section_size(self.get_header_groups())
    }

    pub fn get_left_total_size(&self) -> f64 {
        self.section_size(self.get_left_header_groups())
    }

    pub fn get_center_total_size(&self) -> f64 {
        self.section_size(self.get_center_header_groups())
    }

    pub fn get_right_total_size(&self) -> f64 {
        self.section_size(self.get_right_header_groups())
    }

    fn section_size(&self, groups: HeaderGroups<T>) -> f64 {
        groups
            .first()
            .map(|group| group.headers.iter().map(|header| header.get_size(self)).sum())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_def::ColumnDef;
    use crate::options::TableOptions;
    use crate::state::ColumnPinningState;
    use serde_json::{json, Value};

    fn options() -> TableOptions<Value> {
        TableOptions::new(
            vec![json!({"a": 1, "b": 2, "c": 3})],
            vec![
                ColumnDef::accessor("a"),
                ColumnDef::accessor("b").with_size(100.0),
                ColumnDef::accessor("c"),
            ],
        )
    }

    #[test]
    fn test_sizes_and_offsets() {
        let table = Table::new(options()).unwrap();
        let b = table.get_column("b").unwrap();
        let c = table.get_column("c").unwrap();
        assert_eq!(b.get_size(&table), 100.0);
        assert_eq!(c.get_start(&table, None), 250.0);
        assert_eq!(b.get_after(&table, None), 150.0);
        assert_eq!(table.get_total_size(), 400.0);
    }

    #[test]
    fn test_size_is_clamped() {
        let table = Table::new(options()).unwrap();
        table.set_column_sizing(ColumnSizingState::from([("a".to_string(), 5.0)]));
        assert_eq!(table.get_column("a").unwrap().get_size(&table), DEFAULT_MIN_COLUMN_SIZE);
        table.get_column("a").unwrap().reset_size(&table);
        assert_eq!(table.get_column("a").unwrap().get_size(&table), DEFAULT_COLUMN_SIZE);
    }

    #[test]
    fn test_resize_session_commits_on_end() {
        let table = Table::new(options()).unwrap();
        let header = Rc::clone(&table.get_header_groups()[0].headers[0]);
        let resize = header.start_resize(&table, 100.0).unwrap();
        assert!(table.get_column("a").unwrap().get_is_resizing(&table));

        resize.move_to(130.0);
        assert!(table.get_state().column_sizing.is_empty());
        resize.end(130.0);

        assert_eq!(table.get_state().column_sizing.get("a"), Some(&180.0));
        assert_eq!(table.get_state().column_sizing_info, ColumnSizingInfoState::default());
    }

    #[test]
    fn test_resize_on_change_writes_every_move() {
        let mut options = options();
        options.column_resize_mode = ColumnResizeMode::OnChange;
        let table = Table::new(options).unwrap();
        let header = Rc::clone(&table.get_header_groups()[0].headers[1]);
        let resize = header.start_resize(&table, 0.0).unwrap();
        resize.move_to(-50.0);
        assert_eq!(table.get_state().column_sizing.get("b"), Some(&50.0));
    }

    #[test]
    fn test_pinned_section_sizes() {
        let table = Table::new(options()).unwrap();
        table.set_column_pinning(ColumnPinningState {
            left: vec!["c".to_string()],
            right: vec![],
        });
        assert_eq!(table.get_left_total_size(), 150.0);
        assert_eq!(table.get_center_total_size(), 250.0);
        assert_eq!(table.get_right_total_size(), 0.0);
    }
}
