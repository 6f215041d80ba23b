//! FILENAME: table-core/src/options.rs
//! Table Options - Everything the host configures on a table.
//!
//! Feature switches left as `None` fall back to the feature default (usually
//! "enabled"). Row-model stages are registered with the factory functions in
//! `row_models`; a stage with no registration, or whose `manual_*` flag is
//! set, passes its input through unchanged.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::column_def::{ColumnDef, FnRef};
use crate::event::ToggleEvent;
use crate::feature::TableFeature;
use crate::fns::{AggregationFn, FilterFn, SortingFn};
use crate::row::Row;
use crate::row_model::RowModel;
use crate::row_models::core_row_model;
use crate::state::{
    ColumnFiltersState, ColumnOrderState, ColumnPinningState, ColumnSizingInfoState,
    ColumnSizingState, ColumnVisibilityState, ExpandedState, GroupingState, PaginationState,
    PartialTableState, RowSelectionState, SortingState, TableState,
};
use crate::table::Table;
use crate::updater::OnChangeFn;
use crate::value::CellValue;

pub type RowIdFn<T> = Rc<dyn Fn(&T, usize, Option<&Row<T>>) -> String>;
pub type SubRowsFn<T> = Rc<dyn Fn(&T, usize) -> Option<Vec<Rc<T>>>>;
pub type RowPredicate<T> = Rc<dyn Fn(&Row<T>) -> bool>;
pub type ColumnPredicate<T> = Rc<dyn Fn(&Table<T>, &Column<T>) -> bool>;
pub type MultiSortEventFn = Rc<dyn Fn(&ToggleEvent) -> bool>;

/// A table-level row-model stage.
pub type RowModelFn<T> = Rc<dyn Fn(&Table<T>) -> Rc<RowModel<T>>>;
/// A per-column derivation (faceting). The column id is the second argument.
pub type ColumnRowModelFn<T> = Rc<dyn Fn(&Table<T>, &str) -> Rc<RowModel<T>>>;
/// Distinct values with their occurrence counts, in first-seen order.
pub type FacetedUniqueValues = Vec<(CellValue, usize)>;
pub type FacetedUniqueValuesFn<T> = Rc<dyn Fn(&Table<T>, &str) -> Rc<FacetedUniqueValues>>;
pub type FacetedMinMaxValuesFn<T> = Rc<dyn Fn(&Table<T>, &str) -> Option<(f64, f64)>>;

// ============================================================================
// ENUMS
// ============================================================================

/// How construction reacts to an unusable column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorMode {
    /// Fail table construction.
    #[default]
    Strict,
    /// Log a warning and continue with a fallback id.
    Lenient,
}

/// Where columns used for row grouping go among the leaf columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroupedColumnMode {
    /// Move grouped columns to the front.
    #[default]
    Reorder,
    /// Hide grouped columns.
    Remove,
    /// Leave columns where they are.
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnResizeMode {
    /// Column sizes are written when the resize session ends.
    #[default]
    OnEnd,
    /// Column sizes are written on every move.
    OnChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnResizeDirection {
    #[default]
    Ltr,
    Rtl,
}

/// A per-row switch: fixed, or decided per row.
pub enum RowFlag<T: 'static> {
    Enabled(bool),
    When(RowPredicate<T>),
}

impl<T: 'static> RowFlag<T> {
    pub fn when(f: impl Fn(&Row<T>) -> bool + 'static) -> Self {
        RowFlag::When(Rc::new(f))
    }

    pub fn resolve(&self, row: &Row<T>) -> bool {
        match self {
            RowFlag::Enabled(enabled) => *enabled,
            RowFlag::When(f) => f(row),
        }
    }
}

impl<T: 'static> Clone for RowFlag<T> {
    fn clone(&self) -> Self {
        match self {
            RowFlag::Enabled(enabled) => RowFlag::Enabled(*enabled),
            RowFlag::When(f) => RowFlag::When(Rc::clone(f)),
        }
    }
}

impl<T: 'static> From<bool> for RowFlag<T> {
    fn from(enabled: bool) -> Self {
        RowFlag::Enabled(enabled)
    }
}

// ============================================================================
// TABLE OPTIONS
// ============================================================================

pub struct TableOptions<T: 'static> {
    pub data: Rc<Vec<Rc<T>>>,
    pub columns: Rc<Vec<ColumnDef<T>>>,
    /// Options every column definition inherits unless it sets its own.
    pub default_column: Option<Rc<ColumnDef<T>>>,
    pub get_row_id: Option<RowIdFn<T>>,
    pub get_sub_rows: Option<SubRowsFn<T>>,
    /// Controlled state: slices present here always win over internal state.
    pub state: Option<PartialTableState>,
    pub initial_state: Option<PartialTableState>,
    pub on_state_change: Option<OnChangeFn<TableState>>,
    /// Substituted by `render_value` when a cell value is empty.
    pub render_fallback_value: CellValue,
    pub error_mode: ErrorMode,
    /// Custom features, run after the built-in ones.
    pub features: Vec<Rc<TableFeature<T>>>,
    pub meta: Option<serde_json::Value>,

    // Row models
    pub get_core_row_model: RowModelFn<T>,
    pub get_filtered_row_model: Option<RowModelFn<T>>,
    pub get_grouped_row_model: Option<RowModelFn<T>>,
    pub get_sorted_row_model: Option<RowModelFn<T>>,
    pub get_expanded_row_model: Option<RowModelFn<T>>,
    pub get_pagination_row_model: Option<RowModelFn<T>>,
    pub get_faceted_row_model: Option<ColumnRowModelFn<T>>,
    pub get_faceted_unique_values: Option<FacetedUniqueValuesFn<T>>,
    pub get_faceted_min_max_values: Option<FacetedMinMaxValuesFn<T>>,

    // Visibility
    pub enable_hiding: Option<bool>,
    pub on_column_visibility_change: Option<OnChangeFn<ColumnVisibilityState>>,

    // Ordering
    pub on_column_order_change: Option<OnChangeFn<ColumnOrderState>>,

    // Pinning
    pub enable_pinning: Option<bool>,
    pub enable_column_pinning: Option<bool>,
    pub on_column_pinning_change: Option<OnChangeFn<ColumnPinningState>>,

    // Filtering
    pub enable_filters: Option<bool>,
    pub enable_column_filters: Option<bool>,
    pub enable_global_filter: Option<bool>,
    pub manual_filtering: bool,
    /// Filter leaf rows first and keep parents with passing descendants.
    pub filter_from_leaf_rows: bool,
    pub max_leaf_row_filter_depth: Option<usize>,
    pub filter_fns: FxHashMap<String, FilterFn>,
    pub global_filter_fn: Option<FnRef<FilterFn>>,
    pub get_column_can_global_filter: Option<ColumnPredicate<T>>,
    pub on_column_filters_change: Option<OnChangeFn<ColumnFiltersState>>,
    pub on_global_filter_change: Option<OnChangeFn<Option<CellValue>>>,

    // Sorting
    pub enable_sorting: Option<bool>,
    pub enable_multi_sort: Option<bool>,
    pub enable_sorting_removal: Option<bool>,
    pub enable_multi_remove: Option<bool>,
    pub sort_desc_first: Option<bool>,
    pub manual_sorting: bool,
    pub max_multi_sort_col_count: Option<usize>,
    pub is_multi_sort_event: Option<MultiSortEventFn>,
    pub sorting_fns: FxHashMap<String, SortingFn>,
    pub on_sorting_change: Option<OnChangeFn<SortingState>>,

    // Grouping
    pub enable_grouping: Option<bool>,
    pub manual_grouping: bool,
    pub grouped_column_mode: GroupedColumnMode,
    pub aggregation_fns: FxHashMap<String, AggregationFn>,
    pub on_grouping_change: Option<OnChangeFn<GroupingState>>,

    // Expanding
    pub enable_expanding: Option<bool>,
    pub manual_expanding: bool,
    /// When false, expanded children do not count toward page size.
    pub paginate_expanded_rows: bool,
    pub get_row_can_expand: Option<RowPredicate<T>>,
    pub get_is_row_expanded: Option<RowPredicate<T>>,
    pub on_expanded_change: Option<OnChangeFn<ExpandedState>>,

    // Pagination
    pub manual_pagination: bool,
    /// Known page count when paginating externally; -1 means unknown.
    pub page_count: Option<i64>,
    pub row_count: Option<usize>,
    pub on_pagination_change: Option<OnChangeFn<PaginationState>>,

    // Row selection
    pub enable_row_selection: Option<RowFlag<T>>,
    pub enable_multi_row_selection: Option<RowFlag<T>>,
    pub enable_sub_row_selection: Option<RowFlag<T>>,
    pub on_row_selection_change: Option<OnChangeFn<RowSelectionState>>,

    // Column sizing
    pub enable_column_resizing: Option<bool>,
    pub column_resize_mode: ColumnResizeMode,
    pub column_resize_direction: ColumnResizeDirection,
    pub on_column_sizing_change: Option<OnChangeFn<ColumnSizingState>>,
    pub on_column_sizing_info_change: Option<OnChangeFn<ColumnSizingInfoState>>,
}

impl<T: 'static> TableOptions<T> {
    pub fn new(data: Vec<T>, columns: Vec<ColumnDef<T>>) -> Self {
        TableOptions {
            data: Rc::new(data.into_iter().map(Rc::new).collect()),
            columns: Rc::new(columns),
            default_column: None,
            get_row_id: None,
            get_sub_rows: None,
            state: None,
            initial_state: None,
            on_state_change: None,
            render_fallback_value: CellValue::Empty,
            error_mode: ErrorMode::default(),
            features: Vec::new(),
            meta: None,
            get_core_row_model: core_row_model(),
            get_filtered_row_model: None,
            get_grouped_row_model: None,
            get_sorted_row_model: None,
            get_expanded_row_model: None,
            get_pagination_row_model: None,
            get_faceted_row_model: None,
            get_faceted_unique_values: None,
            get_faceted_min_max_values: None,
            enable_hiding: None,
            on_column_visibility_change: None,
            on_column_order_change: None,
            enable_pinning: None,
            enable_column_pinning: None,
            on_column_pinning_change: None,
            enable_filters: None,
            enable_column_filters: None,
            enable_global_filter: None,
            manual_filtering: false,
            filter_from_leaf_rows: false,
            max_leaf_row_filter_depth: None,
            filter_fns: FxHashMap::default(),
            global_filter_fn: None,
            get_column_can_global_filter: None,
            on_column_filters_change: None,
            on_global_filter_change: None,
            enable_sorting: None,
            enable_multi_sort: None,
            enable_sorting_removal: None,
            enable_multi_remove: None,
            sort_desc_first: None,
            manual_sorting: false,
            max_multi_sort_col_count: None,
            is_multi_sort_event: None,
            sorting_fns: FxHashMap::default(),
            on_sorting_change: None,
            enable_grouping: None,
            manual_grouping: false,
            grouped_column_mode: GroupedColumnMode::default(),
            aggregation_fns: FxHashMap::default(),
            on_grouping_change: None,
            enable_expanding: None,
            manual_expanding: false,
            paginate_expanded_rows: true,
            get_row_can_expand: None,
            get_is_row_expanded: None,
            on_expanded_change: None,
            manual_pagination: false,
            page_count: None,
            row_count: None,
            on_pagination_change: None,
            enable_row_selection: None,
            enable_multi_row_selection: None,
            enable_sub_row_selection: None,
            on_row_selection_change: None,
            enable_column_resizing: None,
            column_resize_mode: ColumnResizeMode::default(),
            column_resize_direction: ColumnResizeDirection::default(),
            on_column_sizing_change: None,
            on_column_sizing_info_change: None,
        }
    }

    pub fn with_data(mut self, data: Vec<T>) -> Self {
        self.data = Rc::new(data.into_iter().map(Rc::new).collect());
        self
    }

    pub fn with_row_id(mut self, f: impl Fn(&T, usize, Option<&Row<T>>) -> String + 'static) -> Self {
        self.get_row_id = Some(Rc::new(f));
        self
    }

    pub fn with_sub_rows(mut self, f: impl Fn(&T, usize) -> Option<Vec<Rc<T>>> + 'static) -> Self {
        self.get_sub_rows = Some(Rc::new(f));
        self
    }

    pub fn with_initial_state(mut self, state: PartialTableState) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn with_state(mut self, state: PartialTableState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_feature(mut self, feature: TableFeature<T>) -> Self {
        self.features.push(Rc::new(feature));
        self
    }

    pub fn with_filtered_row_model(mut self, f: RowModelFn<T>) -> Self {
        self.get_filtered_row_model = Some(f);
        self
    }

    pub fn with_grouped_row_model(mut self, f: RowModelFn<T>) -> Self {
        self.get_grouped_row_model = Some(f);
        self
    }

    pub fn with_sorted_row_model(mut self, f: RowModelFn<T>) -> Self {
        self.get_sorted_row_model = Some(f);
        self
    }

    pub fn with_expanded_row_model(mut self, f: RowModelFn<T>) -> Self {
        self.get_expanded_row_model = Some(f);
        self
    }

    pub fn with_pagination_row_model(mut self, f: RowModelFn<T>) -> Self {
        self.get_pagination_row_model = Some(f);
        self
    }

    pub fn with_faceting(
        mut self,
        row_model: ColumnRowModelFn<T>,
        unique_values: FacetedUniqueValuesFn<T>,
        min_max_values: FacetedMinMaxValuesFn<T>,
    ) -> Self {
        self.get_faceted_row_model = Some(row_model);
        self.get_faceted_unique_values = Some(unique_values);
        self.get_faceted_min_max_values = Some(min_max_values);
        self
    }
}

impl<T: 'static> Clone for TableOptions<T> {
    fn clone(&self) -> Self {
        TableOptions {
            data: Rc::clone(&self.data),
            columns: Rc::clone(&self.columns),
            default_column: self.default_column.clone(),
            get_row_id: self.get_row_id.clone(),
            get_sub_rows: self.get_sub_rows.clone(),
            state: self.state.clone(),
            initial_state: self.initial_state.clone(),
            on_state_change: self.on_state_change.clone(),
            render_fallback_value: self.render_fallback_value.clone(),
            error_mode: self.error_mode,
            features: self.features.clone(),
            meta: self.meta.clone(),
            get_core_row_model: Rc::clone(&self.get_core_row_model),
            get_filtered_row_model: self.get_filtered_row_model.clone(),
            get_grouped_row_model: self.get_grouped_row_model.clone(),
            get_sorted_row_model: self.get_sorted_row_model.clone(),
            get_expanded_row_model: self.get_expanded_row_model.clone(),
            get_pagination_row_model: self.get_pagination_row_model.clone(),
            get_faceted_row_model: self.get_faceted_row_model.clone(),
            get_faceted_unique_values: self.get_faceted_unique_values.clone(),
            get_faceted_min_max_values: self.get_faceted_min_max_values.clone(),
            enable_hiding: self.enable_hiding,
            on_column_visibility_change: self.on_column_visibility_change.clone(),
            on_column_order_change: self.on_column_order_change.clone(),
            enable_pinning: self.enable_pinning,
            enable_column_pinning: self.enable_column_pinning,
            on_column_pinning_change: self.on_column_pinning_change.clone(),
            enable_filters: self.enable_filters,
            enable_column_filters: self.enable_column_filters,
            enable_global_filter: self.enable_global_filter,
            manual_filtering: self.manual_filtering,
            filter_from_leaf_rows: self.filter_from_leaf_rows,
            max_leaf_row_filter_depth: self.max_leaf_row_filter_depth,
            filter_fns: self.filter_fns.clone(),
            global_filter_fn: self.global_filter_fn.clone(),
            get_column_can_global_filter: self.get_column_can_global_filter.clone(),
            on_column_filters_change: self.on_column_filters_change.clone(),
            on_global_filter_change: self.on_global_filter_change.clone(),
            enable_sorting: self.enable_sorting,
            enable_multi_sort: self.enable_multi_sort,
            enable_sorting_removal: self.enable_sorting_removal,
            enable_multi_remove: self.enable_multi_remove,
            sort_desc_first: self.sort_desc_first,
            manual_sorting: self.manual_sorting,
            max_multi_sort_col_count: self.max_multi_sort_col_count,
            is_multi_sort_event: self.is_multi_sort_event.clone(),
            sorting_fns: self.sorting_fns.clone(),
            on_sorting_change: self.on_sorting_change.clone(),
            enable_grouping: self.enable_grouping,
            manual_grouping: self.manual_grouping,
            grouped_column_mode: self.grouped_column_mode,
            aggregation_fns: self.aggregation_fns.clone(),
            on_grouping_change: self.on_grouping_change.clone(),
            enable_expanding: self.enable_expanding,
            manual_expanding: self.manual_expanding,
            paginate_expanded_rows: self.paginate_expanded_rows,
            get_row_can_expand: self.get_row_can_expand.clone(),
            get_is_row_expanded: self.get_is_row_expanded.clone(),
            on_expanded_change: self.on_expanded_change.clone(),
            manual_pagination: self.manual_pagination,
            page_count: self.page_count,
            row_count: self.row_count,
            on_pagination_change: self.on_pagination_change.clone(),
            enable_row_selection: self.enable_row_selection.clone(),
            enable_multi_row_selection: self.enable_multi_row_selection.clone(),
            enable_sub_row_selection: self.enable_sub_row_selection.clone(),
            on_row_selection_change: self.on_row_selection_change.clone(),
            enable_column_resizing: self.enable_column_resizing,
            column_resize_mode: self.column_resize_mode,
            column_resize_direction: self.column_resize_direction,
            on_column_sizing_change: self.on_column_sizing_change.clone(),
            on_column_sizing_info_change: self.on_column_sizing_info_change.clone(),
        }
    }
}
