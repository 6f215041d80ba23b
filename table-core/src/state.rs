//! FILENAME: table-core/src/state.rs
//! Table State - The serializable snapshot of everything a user can change.
//!
//! Every feature owns one slice of `TableState`. Slices are replaced
//! wholesale on each write, never edited in place, so memoized derivations
//! can compare the previous slice with the current one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::CellValue;

// ============================================================================
// VISIBILITY / ORDERING / PINNING
// ============================================================================

/// Column id -> visible. Columns absent from the map are visible.
pub type ColumnVisibilityState = BTreeMap<String, bool>;

/// Preferred leaf column order by id. Empty means definition order.
pub type ColumnOrderState = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnPinningPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPinningState {
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
}

// ============================================================================
// FILTERING / SORTING / GROUPING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub id: String,
    pub value: CellValue,
}

impl ColumnFilter {
    pub fn new(id: impl Into<String>, value: impl Into<CellValue>) -> Self {
        ColumnFilter {
            id: id.into(),
            value: value.into(),
        }
    }
}

pub type ColumnFiltersState = Vec<ColumnFilter>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub id: String,
    pub desc: bool,
}

impl ColumnSort {
    pub fn asc(id: impl Into<String>) -> Self {
        ColumnSort { id: id.into(), desc: false }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        ColumnSort { id: id.into(), desc: true }
    }
}

pub type SortingState = Vec<ColumnSort>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Column ids used for row grouping, outermost first.
pub type GroupingState = Vec<String>;

// ============================================================================
// EXPANDING / PAGINATION / SELECTION
// ============================================================================

/// Either every row is expanded, or exactly the listed rows are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpandedState {
    All,
    Rows(BTreeMap<String, bool>),
}

impl Default for ExpandedState {
    fn default() -> Self {
        ExpandedState::Rows(BTreeMap::new())
    }
}

impl ExpandedState {
    pub fn is_all(&self) -> bool {
        matches!(self, ExpandedState::All)
    }

    pub fn contains(&self, row_id: &str) -> bool {
        match self {
            ExpandedState::All => true,
            ExpandedState::Rows(rows) => rows.get(row_id).copied().unwrap_or(false),
        }
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExpandedState::Rows(ids.into_iter().map(|id| (id.into(), true)).collect())
    }
}

pub const DEFAULT_PAGE_INDEX: usize = 0;
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        PaginationState {
            page_index: DEFAULT_PAGE_INDEX,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Row id -> selected. Only `true` entries are ever written.
pub type RowSelectionState = BTreeMap<String, bool>;

// ============================================================================
// COLUMN SIZING
// ============================================================================

/// Column id -> width set by the user (or by a resize session).
pub type ColumnSizingState = BTreeMap<String, f64>;

/// The in-progress resize session, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnSizingInfoState {
    pub start_offset: Option<f64>,
    pub start_size: Option<f64>,
    pub delta_offset: Option<f64>,
    pub delta_percentage: Option<f64>,
    pub is_resizing_column: Option<String>,
    #[serde(default)]
    pub column_sizing_start: Vec<(String, f64)>,
}

// ============================================================================
// TABLE STATE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    #[serde(default)]
    pub column_visibility: ColumnVisibilityState,
    #[serde(default)]
    pub column_order: ColumnOrderState,
    #[serde(default)]
    pub column_pinning: ColumnPinningState,
    #[serde(default)]
    pub column_filters: ColumnFiltersState,
    #[serde(default)]
    pub global_filter: Option<CellValue>,
    #[serde(default)]
    pub sorting: SortingState,
    #[serde(default)]
    pub grouping: GroupingState,
    #[serde(default)]
    pub expanded: ExpandedState,
    #[serde(default)]
    pub pagination: PaginationState,
    #[serde(default)]
    pub row_selection: RowSelectionState,
    #[serde(default)]
    pub column_sizing: ColumnSizingState,
    #[serde(default)]
    pub column_sizing_info: ColumnSizingInfoState,
    /// State owned by custom features, keyed by feature-chosen names.
    #[serde(default)]
    pub custom: BTreeMap<String, serde_json::Value>,
}

/// A subset of `TableState`, used for initial and externally controlled state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialTableState {
    pub column_visibility: Option<ColumnVisibilityState>,
    pub column_order: Option<ColumnOrderState>,
    pub column_pinning: Option<ColumnPinningState>,
    pub column_filters: Option<ColumnFiltersState>,
    pub global_filter: Option<Option<CellValue>>,
    pub sorting: Option<SortingState>,
    pub grouping: Option<GroupingState>,
    pub expanded: Option<ExpandedState>,
    pub pagination: Option<PaginationState>,
    pub row_selection: Option<RowSelectionState>,
    pub column_sizing: Option<ColumnSizingState>,
    pub column_sizing_info: Option<ColumnSizingInfoState>,
    #[serde(default)]
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl PartialTableState {
    /// Writes every slice present here over `state`.
    pub fn overlay(&self, state: &mut TableState) {
        if let Some(v) = &self.column_visibility {
            state.column_visibility = v.clone();
        }
        if let Some(v) = &self.column_order {
            state.column_order = v.clone();
        }
        if let Some(v) = &self.column_pinning {
            state.column_pinning = v.clone();
        }
        if let Some(v) = &self.column_filters {
            state.column_filters = v.clone();
        }
        if let Some(v) = &self.global_filter {
            state.global_filter = v.clone();
        }
        if let Some(v) = &self.sorting {
            state.sorting = v.clone();
        }
        if let Some(v) = &self.grouping {
            state.grouping = v.clone();
        }
        if let Some(v) = &self.expanded {
            state.expanded = v.clone();
        }
        if let Some(v) = &self.pagination {
            state.pagination = *v;
        }
        if let Some(v) = &self.row_selection {
            state.row_selection = v.clone();
        }
        if let Some(v) = &self.column_sizing {
            state.column_sizing = v.clone();
        }
        if let Some(v) = &self.column_sizing_info {
            state.column_sizing_info = v.clone();
        }
        for (key, value) in &self.custom {
            state.custom.insert(key.clone(), value.clone());
        }
    }
}

impl From<TableState> for PartialTableState {
    fn from(state: TableState) -> Self {
        PartialTableState {
            column_visibility: Some(state.column_visibility),
            column_order: Some(state.column_order),
            column_pinning: Some(state.column_pinning),
            column_filters: Some(state.column_filters),
            global_filter: Some(state.global_filter),
            sorting: Some(state.sorting),
            grouping: Some(state.grouping),
            expanded: Some(state.expanded),
            pagination: Some(state.pagination),
            row_selection: Some(state.row_selection),
            column_sizing: Some(state.column_sizing),
            column_sizing_info: Some(state.column_sizing_info),
            custom: state.custom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = TableState::default();
        assert_eq!(state.pagination, PaginationState { page_index: 0, page_size: 10 });
        assert_eq!(state.expanded, ExpandedState::Rows(BTreeMap::new()));
        assert!(state.column_order.is_empty());
    }

    #[test]
    fn test_overlay_only_touches_present_slices() {
        let mut state = TableState::default();
        state.grouping = vec!["a".to_string()];
        let partial = PartialTableState {
            sorting: Some(vec![ColumnSort::desc("b")]),
            ..Default::default()
        };
        partial.overlay(&mut state);
        assert_eq!(state.sorting, vec![ColumnSort::desc("b")]);
        assert_eq!(state.grouping, vec!["a".to_string()]);
    }

    #[test]
    fn test_state_serializes() {
        let mut state = TableState::default();
        state.expanded = ExpandedState::All;
        state.global_filter = Some(CellValue::text("x"));
        let json = serde_json::to_string(&state).unwrap();
        let back: TableState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
