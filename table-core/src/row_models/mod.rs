//! FILENAME: table-core/src/row_models/mod.rs
//! Row-model pipeline stages.
//!
//! Stages run in a fixed order: core, filtered, grouped, sorted, expanded,
//! paginated. Each factory returns a closure holding its own memo; register
//! it on `TableOptions` to enable the stage. Faceting sits beside the
//! pipeline and is computed per column on request.

mod core_rows;
mod expanded;
mod faceted;
mod filtered;
mod grouped;
mod paginated;
mod sorted;

pub use self::core_rows::core_row_model;
pub use self::expanded::expanded_row_model;
pub use self::faceted::{
    faceted_min_max_values, faceted_row_model, faceted_unique_values, GLOBAL_FACET_ID,
};
pub use self::filtered::filtered_row_model;
pub use self::grouped::grouped_row_model;
pub use self::paginated::pagination_row_model;
pub use self::sorted::sorted_row_model;
