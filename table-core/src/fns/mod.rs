//! FILENAME: table-core/src/fns/mod.rs
//! Built-in function libraries: sorting comparators, filter predicates and
//! group aggregations. Columns refer to these by name or carry their own.

pub mod aggregation_fns;
pub mod filter_fns;
pub mod sorting_fns;

pub use aggregation_fns::{AggregationFn, BuiltInAggregationFn};
pub use filter_fns::{BuiltInFilterFn, FilterFn};
pub use sorting_fns::{BuiltInSortingFn, SortingFn};
