//! FILENAME: table-core/src/lib.rs
//! Headless table engine.
//!
//! Turns a list of records and a tree of column definitions into the
//! structures a UI renders: header groups, ordered visible columns, and rows
//! passed through a filter, group, sort, expand and paginate pipeline. The
//! crate owns no UI; every user interaction is a state write through the
//! table's setters.
//!
//! Layers:
//! - `column_def`, `options`, `state`: what the host configures (inputs)
//! - `table`, `column`, `row`, `cell`, `header`: the live entities
//! - `features`: per-feature APIs on those entities
//! - `row_models`: the pipeline stages, registered on `TableOptions`
//! - `fns`: built-in sorting, filter and aggregation functions

pub mod cell;
pub mod column;
pub mod column_def;
pub mod error;
pub mod event;
pub mod feature;
pub mod features;
pub mod fns;
pub mod header;
pub mod memo;
pub mod options;
pub mod record;
pub mod row;
pub mod row_model;
pub mod row_models;
pub mod state;
pub mod table;
pub mod updater;
pub mod value;

pub use cell::{Cell, CellContext};
pub use column::Column;
pub use column_def::{ColumnDef, FnRef, Renderer, SortUndefined};
pub use error::{TableError, TableResult};
pub use event::{EventHandler, ToggleEvent};
pub use feature::TableFeature;
pub use features::column_sizing::ColumnResize;
pub use features::pinning::ColumnPosition;
pub use features::row_selection::SubRowSelection;
pub use fns::{AggregationFn, BuiltInAggregationFn, BuiltInFilterFn, BuiltInSortingFn, FilterFn, SortingFn};
pub use header::{Header, HeaderContext, HeaderGroup};
pub use memo::{Memo, Ptr};
pub use options::{
    ColumnResizeDirection, ColumnResizeMode, ErrorMode, GroupedColumnMode, RowFlag, TableOptions,
};
pub use record::Record;
pub use row::{Row, RowGroup};
pub use row_model::RowModel;
pub use row_models::{
    core_row_model, expanded_row_model, faceted_min_max_values, faceted_row_model,
    faceted_unique_values, filtered_row_model, grouped_row_model, pagination_row_model,
    sorted_row_model,
};
pub use state::*;
pub use table::Table;
pub use updater::{OnChangeFn, Updater};
pub use value::CellValue;
