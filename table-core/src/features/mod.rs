//! FILENAME: table-core/src/features/mod.rs
//! Built-in table features.
//!
//! Each module contributes its state slice defaults and option defaults via
//! a `TableFeature`, and its API as `impl` blocks on the table entities.
//! Custom features registered in `TableOptions::features` run after these.

use std::rc::Rc;

use crate::feature::TableFeature;

pub mod column_sizing;
pub mod expanding;
pub mod faceting;
pub mod filtering;
pub mod grouping;
pub mod headers;
pub mod ordering;
pub mod pagination;
pub mod pinning;
pub mod row_selection;
pub mod sorting;
pub mod visibility;

/// The built-in features in the order their hooks run.
pub(crate) fn builtin_features<T: 'static>() -> Vec<Rc<TableFeature<T>>> {
    vec![
        Rc::new(headers::feature()),
        Rc::new(visibility::feature()),
        Rc::new(ordering::feature()),
        Rc::new(pinning::feature()),
        Rc::new(faceting::feature()),
        Rc::new(filtering::feature()),
        Rc::new(sorting::feature()),
        Rc::new(grouping::feature()),
        Rc::new(expanding::feature()),
        Rc::new(pagination::feature()),
        Rc::new(row_selection::feature()),
        Rc::new(column_sizing::feature()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_feature_names_are_unique() {
        let features = builtin_features::<()>();
        let mut names: Vec<&str> = features.iter().map(|feature| feature.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), features.len());
    }
}
