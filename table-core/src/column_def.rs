//! FILENAME: table-core/src/column_def.rs
//! Column Definitions - The declarative column schema.
//!
//! A `ColumnDef` describes WHAT a column is: how its id is resolved, how its
//! value is read from a record, how it renders, and the per-feature switches
//! that override table-wide options. Definitions nest: a definition with
//! child `columns` becomes a header group, one without becomes a leaf.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::cell::CellContext;
use crate::fns::{AggregationFn, FilterFn, SortingFn};
use crate::header::HeaderContext;
use crate::record::Record;
use crate::value::CellValue;

/// Reads a column value from a record and its index among its siblings.
pub type AccessorFn<T> = Rc<dyn Fn(&T, usize) -> CellValue>;
pub type UniqueValuesFn<T> = Rc<dyn Fn(&T, usize) -> Vec<CellValue>>;
pub type GroupingValueFn<T> = Rc<dyn Fn(&T) -> CellValue>;

// ============================================================================
// RENDERERS & FUNCTION REFERENCES
// ============================================================================

/// A header, footer or cell template: fixed text or a function of the
/// render context.
pub enum Renderer<C> {
    Text(String),
    Fn(Rc<dyn Fn(&C) -> String>),
}

impl<C> Renderer<C> {
    pub fn render(&self, context: &C) -> String {
        match self {
            Renderer::Text(text) => text.clone(),
            Renderer::Fn(f) => f(context),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Renderer::Text(text) => Some(text),
            Renderer::Fn(_) => None,
        }
    }
}

impl<C> Clone for Renderer<C> {
    fn clone(&self) -> Self {
        match self {
            Renderer::Text(text) => Renderer::Text(text.clone()),
            Renderer::Fn(f) => Renderer::Fn(Rc::clone(f)),
        }
    }
}

/// How a column picks one of its sorting, filter or aggregation functions.
#[derive(Clone)]
pub enum FnRef<F> {
    /// Inferred from the column's data.
    Auto,
    /// Looked up in the table options' registry, then among the built-ins.
    Named(String),
    Custom(F),
}

impl<F> FnRef<F> {
    pub fn named(name: impl Into<String>) -> Self {
        FnRef::Named(name.into())
    }
}

/// Placement of empty values when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortUndefined {
    /// Empty values go through the sorting function like any other value.
    Disabled,
    /// Always first, whatever the direction.
    First,
    /// Always last, whatever the direction.
    Last,
    /// Before other values in ascending order; flipped when descending.
    Before,
    /// After other values in ascending order; flipped when descending.
    #[default]
    After,
}

// ============================================================================
// COLUMN DEFINITION
// ============================================================================

pub struct ColumnDef<T: 'static> {
    pub id: Option<String>,
    pub accessor_key: Option<String>,
    pub accessor_fn: Option<AccessorFn<T>>,
    pub header: Option<Renderer<HeaderContext<T>>>,
    pub footer: Option<Renderer<HeaderContext<T>>>,
    pub cell: Option<Renderer<CellContext<T>>>,
    /// Child definitions. Non-empty makes this a group column.
    pub columns: Vec<ColumnDef<T>>,
    pub get_unique_values: Option<UniqueValuesFn<T>>,
    pub meta: Option<serde_json::Value>,

    pub enable_hiding: Option<bool>,
    pub enable_pinning: Option<bool>,

    pub filter_fn: Option<FnRef<FilterFn>>,
    pub enable_column_filter: Option<bool>,
    pub enable_global_filter: Option<bool>,

    pub sorting_fn: Option<FnRef<SortingFn>>,
    pub enable_sorting: Option<bool>,
    pub enable_multi_sort: Option<bool>,
    pub sort_desc_first: Option<bool>,
    pub sort_undefined: Option<SortUndefined>,
    pub invert_sorting: Option<bool>,

    pub aggregation_fn: Option<FnRef<AggregationFn>>,
    pub enable_grouping: Option<bool>,
    pub get_grouping_value: Option<GroupingValueFn<T>>,

    pub size: Option<f64>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    pub enable_resizing: Option<bool>,
}

impl<T: 'static> Default for ColumnDef<T> {
    fn default() -> Self {
        ColumnDef {
            id: None,
            accessor_key: None,
            accessor_fn: None,
            header: None,
            footer: None,
            cell: None,
            columns: Vec::new(),
            get_unique_values: None,
            meta: None,
            enable_hiding: None,
            enable_pinning: None,
            filter_fn: None,
            enable_column_filter: None,
            enable_global_filter: None,
            sorting_fn: None,
            enable_sorting: None,
            enable_multi_sort: None,
            sort_desc_first: None,
            sort_undefined: None,
            invert_sorting: None,
            aggregation_fn: None,
            enable_grouping: None,
            get_grouping_value: None,
            size: None,
            min_size: None,
            max_size: None,
            enable_resizing: None,
        }
    }
}

impl<T: 'static> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        ColumnDef {
            id: self.id.clone(),
            accessor_key: self.accessor_key.clone(),
            accessor_fn: self.accessor_fn.clone(),
            header: self.header.clone(),
            footer: self.footer.clone(),
            cell: self.cell.clone(),
            columns: self.columns.clone(),
            get_unique_values: self.get_unique_values.clone(),
            meta: self.meta.clone(),
            enable_hiding: self.enable_hiding,
            enable_pinning: self.enable_pinning,
            filter_fn: self.filter_fn.clone(),
            enable_column_filter: self.enable_column_filter,
            enable_global_filter: self.enable_global_filter,
            sorting_fn: self.sorting_fn.clone(),
            enable_sorting: self.enable_sorting,
            enable_multi_sort: self.enable_multi_sort,
            sort_desc_first: self.sort_desc_first,
            sort_undefined: self.sort_undefined,
            invert_sorting: self.invert_sorting,
            aggregation_fn: self.aggregation_fn.clone(),
            enable_grouping: self.enable_grouping,
            get_grouping_value: self.get_grouping_value.clone(),
            size: self.size,
            min_size: self.min_size,
            max_size: self.max_size,
            enable_resizing: self.enable_resizing,
        }
    }
}

impl<T: Record + 'static> ColumnDef<T> {
    /// A leaf column reading `key` from each record. The key doubles as the id.
    pub fn accessor(key: impl Into<String>) -> Self {
        let key = key.into();
        let field = key.clone();
        ColumnDef {
            accessor_key: Some(key),
            accessor_fn: Some(Rc::new(move |record: &T, _| record.field(&field))),
            ..Default::default()
        }
    }
}

impl<T: 'static> ColumnDef<T> {
    /// A leaf column computing its value with `f`.
    pub fn accessor_fn<V, F>(id: impl Into<String>, f: F) -> Self
    where
        V: Into<CellValue>,
        F: Fn(&T) -> V + 'static,
    {
        ColumnDef {
            id: Some(id.into()),
            accessor_fn: Some(Rc::new(move |record: &T, _| f(record).into())),
            ..Default::default()
        }
    }

    /// A header group over `columns`.
    pub fn group(id: impl Into<String>, columns: Vec<ColumnDef<T>>) -> Self {
        ColumnDef {
            id: Some(id.into()),
            columns,
            ..Default::default()
        }
    }

    /// A leaf column with no value, e.g. for row actions.
    pub fn display(id: impl Into<String>) -> Self {
        ColumnDef {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(Renderer::Text(header.into()));
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(Renderer::Text(footer.into()));
        self
    }

    pub fn with_cell(mut self, f: impl Fn(&CellContext<T>) -> String + 'static) -> Self {
        self.cell = Some(Renderer::Fn(Rc::new(f)));
        self
    }

    pub fn with_filter_fn(mut self, filter_fn: FnRef<FilterFn>) -> Self {
        self.filter_fn = Some(filter_fn);
        self
    }

    pub fn with_sorting_fn(mut self, sorting_fn: FnRef<SortingFn>) -> Self {
        self.sorting_fn = Some(sorting_fn);
        self
    }

    pub fn with_aggregation_fn(mut self, aggregation_fn: FnRef<AggregationFn>) -> Self {
        self.aggregation_fn = Some(aggregation_fn);
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn is_group(&self) -> bool {
        !self.columns.is_empty()
    }

    /// This definition with every unset option taken from `defaults`.
    /// Identity (id, accessor, children) and the header are never inherited.
    pub fn merged_over(&self, defaults: &ColumnDef<T>) -> ColumnDef<T> {
        let mut merged = self.clone();
        macro_rules! inherit {
            ($($field:ident),* $(,)?) => {
                $(
                    if merged.$field.is_none() {
                        merged.$field = defaults.$field.clone();
                    }
                )*
            };
        }
        inherit!(
            footer,
            cell,
            get_unique_values,
            meta,
            enable_hiding,
            enable_pinning,
            filter_fn,
            enable_column_filter,
            enable_global_filter,
            sorting_fn,
            enable_sorting,
            enable_multi_sort,
            sort_desc_first,
            sort_undefined,
            invert_sorting,
            aggregation_fn,
            enable_grouping,
            get_grouping_value,
            size,
            min_size,
            max_size,
            enable_resizing,
        );
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_accessor_reads_key() {
        let def: ColumnDef<Value> = ColumnDef::accessor("name");
        let accessor = def.accessor_fn.clone().unwrap();
        assert_eq!(accessor(&json!({"name": "Ada"}), 0), CellValue::text("Ada"));
        assert_eq!(def.accessor_key.as_deref(), Some("name"));
        assert!(def.id.is_none());
    }

    #[test]
    fn test_merged_over_keeps_own_values() {
        let defaults: ColumnDef<Value> = ColumnDef {
            size: Some(80.0),
            enable_sorting: Some(false),
            ..Default::default()
        };
        let def: ColumnDef<Value> = ColumnDef::accessor("a").with_size(200.0);
        let merged = def.merged_over(&defaults);
        assert_eq!(merged.size, Some(200.0));
        assert_eq!(merged.enable_sorting, Some(false));
        assert_eq!(merged.accessor_key.as_deref(), Some("a"));
    }

    #[test]
    fn test_group_definition() {
        let def: ColumnDef<Value> =
            ColumnDef::group("name", vec![ColumnDef::accessor("first"), ColumnDef::accessor("last")]);
        assert!(def.is_group());
        assert_eq!(def.columns.len(), 2);
    }
}
