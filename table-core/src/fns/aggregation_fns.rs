//! FILENAME: table-core/src/fns/aggregation_fns.rs
//! Built-in aggregations for grouped rows.
//!
//! An aggregation receives the column values of the group's leaf rows and
//! of its direct child rows (which may themselves be aggregated groups).
//! `sum`, `min`, `max` and `extent` fold child values so nested groups
//! compose; the others look at leaf values.

use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::value::CellValue;

pub type AggregationFn = Rc<dyn Fn(&[CellValue], &[CellValue]) -> CellValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInAggregationFn {
    Sum,
    Min,
    Max,
    Extent,
    Mean,
    Median,
    Unique,
    UniqueCount,
    Count,
}

impl BuiltInAggregationFn {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sum" => Some(BuiltInAggregationFn::Sum),
            "min" => Some(BuiltInAggregationFn::Min),
            "max" => Some(BuiltInAggregationFn::Max),
            "extent" => Some(BuiltInAggregationFn::Extent),
            "mean" => Some(BuiltInAggregationFn::Mean),
            "median" => Some(BuiltInAggregationFn::Median),
            "unique" => Some(BuiltInAggregationFn::Unique),
            "uniqueCount" | "unique_count" => Some(BuiltInAggregationFn::UniqueCount),
            "count" => Some(BuiltInAggregationFn::Count),
            _ => None,
        }
    }

    pub fn aggregate(self, leaf_values: &[CellValue], child_values: &[CellValue]) -> CellValue {
        match self {
            BuiltInAggregationFn::Sum => sum(child_values),
            BuiltInAggregationFn::Min => min(child_values),
            BuiltInAggregationFn::Max => max(child_values),
            BuiltInAggregationFn::Extent => extent(child_values),
            BuiltInAggregationFn::Mean => mean(leaf_values),
            BuiltInAggregationFn::Median => median(leaf_values),
            BuiltInAggregationFn::Unique => unique(leaf_values),
            BuiltInAggregationFn::UniqueCount => unique_count(leaf_values),
            BuiltInAggregationFn::Count => CellValue::from(leaf_values.len()),
        }
    }

    pub fn to_fn(self) -> AggregationFn {
        Rc::new(move |leaf, child| self.aggregate(leaf, child))
    }
}

// ============================================================================
// AGGREGATIONS
// ============================================================================

/// Sum of numeric values; non-numbers count as zero.
pub fn sum(values: &[CellValue]) -> CellValue {
    CellValue::Number(values.iter().filter_map(CellValue::as_f64).sum())
}

fn extreme(values: &[CellValue], want: std::cmp::Ordering) -> CellValue {
    let mut best: Option<&CellValue> = None;
    for value in values {
        if value.is_empty() || matches!(value, CellValue::Number(n) if n.is_nan()) {
            continue;
        }
        best = match best {
            Some(current) if value.compare(current) != want => Some(current),
            _ => Some(value),
        };
    }
    best.cloned().unwrap_or_default()
}

pub fn min(values: &[CellValue]) -> CellValue {
    extreme(values, std::cmp::Ordering::Less)
}

pub fn max(values: &[CellValue]) -> CellValue {
    extreme(values, std::cmp::Ordering::Greater)
}

/// `[min, max]` over the values, or empty when there are none.
pub fn extent(values: &[CellValue]) -> CellValue {
    let lo = min(values);
    if lo.is_empty() {
        return CellValue::Empty;
    }
    CellValue::list([lo, max(values)])
}

/// Arithmetic mean of values that coerce to numbers.
pub fn mean(values: &[CellValue]) -> CellValue {
    let numbers: Vec<f64> = values.iter().filter_map(CellValue::to_number).collect();
    if numbers.is_empty() {
        return CellValue::Empty;
    }
    CellValue::Number(numbers.iter().sum::<f64>() / numbers.len() as f64)
}

/// Median of the values, only defined when every value is a number.
pub fn median(values: &[CellValue]) -> CellValue {
    if values.is_empty() {
        return CellValue::Empty;
    }
    let mut numbers = Vec::with_capacity(values.len());
    for value in values {
        match value {
            CellValue::Number(n) => numbers.push(*n),
            _ => return CellValue::Empty,
        }
    }
    numbers.sort_by(|a, b| a.total_cmp(b));
    let mid = numbers.len() / 2;
    if numbers.len() % 2 == 1 {
        CellValue::Number(numbers[mid])
    } else {
        CellValue::Number((numbers[mid - 1] + numbers[mid]) / 2.0)
    }
}

/// Distinct values in first-seen order.
pub fn unique(values: &[CellValue]) -> CellValue {
    let mut seen = FxHashSet::default();
    CellValue::list(values.iter().filter(|v| seen.insert(*v)).cloned().collect::<Vec<_>>())
}

pub fn unique_count(values: &[CellValue]) -> CellValue {
    let distinct: FxHashSet<&CellValue> = values.iter().collect();
    CellValue::from(distinct.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|n| CellValue::Number(*n)).collect()
    }

    #[test]
    fn test_sum_ignores_non_numbers() {
        let mut values = nums(&[1.0, 2.0]);
        values.push(CellValue::text("x"));
        assert_eq!(sum(&values), CellValue::Number(3.0));
    }

    #[test]
    fn test_min_max_extent() {
        let values = nums(&[3.0, -1.0, 7.0]);
        assert_eq!(min(&values), CellValue::Number(-1.0));
        assert_eq!(max(&values), CellValue::Number(7.0));
        assert_eq!(extent(&values), CellValue::list(nums(&[-1.0, 7.0])));
        assert_eq!(min(&[]), CellValue::Empty);
    }

    #[test]
    fn test_mean_and_median() {
        assert_eq!(mean(&nums(&[1.0, 2.0, 6.0])), CellValue::Number(3.0));
        assert_eq!(median(&nums(&[5.0, 1.0, 3.0])), CellValue::Number(3.0));
        assert_eq!(median(&nums(&[4.0, 1.0, 3.0, 2.0])), CellValue::Number(2.5));
        assert_eq!(median(&[CellValue::Number(1.0), CellValue::text("a")]), CellValue::Empty);
    }

    #[test]
    fn test_unique_preserves_first_seen_order() {
        let values = vec![CellValue::text("b"), CellValue::text("a"), CellValue::text("b")];
        assert_eq!(unique(&values), CellValue::list([CellValue::text("b"), CellValue::text("a")]));
        assert_eq!(unique_count(&values), CellValue::Number(2.0));
    }

    #[test]
    fn test_count_uses_leaf_values() {
        let leaf = nums(&[1.0, 1.0, 1.0]);
        assert_eq!(BuiltInAggregationFn::Count.aggregate(&leaf, &[]), CellValue::Number(3.0));
    }
}
