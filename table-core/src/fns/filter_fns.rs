//! FILENAME: table-core/src/fns/filter_fns.rs
//! Built-in filter predicates.
//!
//! A filter receives a row's cell value and the (resolved) filter value and
//! decides whether the row passes. `resolve_filter_value` normalizes the raw
//! filter value once per derivation; `auto_remove` tells the setters when a
//! filter value is meaningless and the filter entry should be dropped.

use std::fmt;
use std::rc::Rc;

use crate::value::CellValue;

pub type FilterPredicate = Rc<dyn Fn(&CellValue, &CellValue) -> bool>;
pub type FilterValueResolver = Rc<dyn Fn(&CellValue) -> CellValue>;
pub type FilterAutoRemove = Rc<dyn Fn(&CellValue) -> bool>;

#[derive(Clone)]
pub struct FilterFn {
    pub name: &'static str,
    pub filter: FilterPredicate,
    pub resolve_filter_value: Option<FilterValueResolver>,
    pub auto_remove: Option<FilterAutoRemove>,
}

impl FilterFn {
    pub fn new(name: &'static str, filter: impl Fn(&CellValue, &CellValue) -> bool + 'static) -> Self {
        FilterFn {
            name,
            filter: Rc::new(filter),
            resolve_filter_value: None,
            auto_remove: None,
        }
    }

    pub fn with_auto_remove(mut self, f: impl Fn(&CellValue) -> bool + 'static) -> Self {
        self.auto_remove = Some(Rc::new(f));
        self
    }

    pub fn with_resolver(mut self, f: impl Fn(&CellValue) -> CellValue + 'static) -> Self {
        self.resolve_filter_value = Some(Rc::new(f));
        self
    }

    pub fn resolve(&self, value: &CellValue) -> CellValue {
        match &self.resolve_filter_value {
            Some(resolve) => resolve(value),
            None => value.clone(),
        }
    }

    pub fn test(&self, cell: &CellValue, filter_value: &CellValue) -> bool {
        (self.filter)(cell, filter_value)
    }

    /// True when `value` should remove the filter rather than apply it:
    /// the function's own rule, an empty value, or empty text.
    pub fn should_auto_remove(&self, value: &CellValue) -> bool {
        self.auto_remove.as_ref().map_or(false, |f| f(value)) || value.is_blank()
    }
}

impl fmt::Debug for FilterFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterFn({})", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInFilterFn {
    IncludesString,
    IncludesStringSensitive,
    EqualsString,
    ArrIncludes,
    ArrIncludesAll,
    ArrIncludesSome,
    Equals,
    WeakEquals,
    InNumberRange,
}

impl BuiltInFilterFn {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "includesString" | "includes_string" => Some(BuiltInFilterFn::IncludesString),
            "includesStringSensitive" | "includes_string_sensitive" => {
                Some(BuiltInFilterFn::IncludesStringSensitive)
            }
            "equalsString" | "equals_string" => Some(BuiltInFilterFn::EqualsString),
            "arrIncludes" | "arr_includes" => Some(BuiltInFilterFn::ArrIncludes),
            "arrIncludesAll" | "arr_includes_all" => Some(BuiltInFilterFn::ArrIncludesAll),
            "arrIncludesSome" | "arr_includes_some" => Some(BuiltInFilterFn::ArrIncludesSome),
            "equals" => Some(BuiltInFilterFn::Equals),
            "weakEquals" | "weak_equals" => Some(BuiltInFilterFn::WeakEquals),
            "inNumberRange" | "in_number_range" => Some(BuiltInFilterFn::InNumberRange),
            _ => None,
        }
    }

    pub fn to_fn(self) -> FilterFn {
        match self {
            BuiltInFilterFn::IncludesString => includes_string(),
            BuiltInFilterFn::IncludesStringSensitive => includes_string_sensitive(),
            BuiltInFilterFn::EqualsString => equals_string(),
            BuiltInFilterFn::ArrIncludes => arr_includes(),
            BuiltInFilterFn::ArrIncludesAll => arr_includes_all(),
            BuiltInFilterFn::ArrIncludesSome => arr_includes_some(),
            BuiltInFilterFn::Equals => equals(),
            BuiltInFilterFn::WeakEquals => weak_equals(),
            BuiltInFilterFn::InNumberRange => in_number_range(),
        }
    }
}

// ============================================================================
// PREDICATES
// ============================================================================

fn filter_text(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Empty | CellValue::List(_) => None,
        other => Some(other.to_string()),
    }
}

fn blank_or_empty_list(value: &CellValue) -> bool {
    value.is_blank() || matches!(value, CellValue::List(items) if items.is_empty())
}

pub fn includes_string() -> FilterFn {
    FilterFn::new("includesString", |cell, search| {
        let search = search.to_string().to_lowercase();
        filter_text(cell).map_or(false, |text| text.to_lowercase().contains(&search))
    })
    .with_auto_remove(CellValue::is_blank)
}

pub fn includes_string_sensitive() -> FilterFn {
    FilterFn::new("includesStringSensitive", |cell, search| {
        let search = search.to_string();
        filter_text(cell).map_or(false, |text| text.contains(&search))
    })
    .with_auto_remove(CellValue::is_blank)
}

pub fn equals_string() -> FilterFn {
    FilterFn::new("equalsString", |cell, search| {
        filter_text(cell).map_or(false, |text| text.to_lowercase() == search.to_string().to_lowercase())
    })
    .with_auto_remove(CellValue::is_blank)
}

pub fn arr_includes() -> FilterFn {
    FilterFn::new("arrIncludes", |cell, needle| cell.contains(needle))
        .with_auto_remove(blank_or_empty_list)
}

pub fn arr_includes_all() -> FilterFn {
    FilterFn::new("arrIncludesAll", |cell, needles| match needles.as_list() {
        Some(needles) => needles.iter().all(|needle| cell.contains(needle)),
        None => cell.contains(needles),
    })
    .with_auto_remove(blank_or_empty_list)
}

pub fn arr_includes_some() -> FilterFn {
    FilterFn::new("arrIncludesSome", |cell, needles| match needles.as_list() {
        Some(needles) => needles.iter().any(|needle| cell.contains(needle)),
        None => cell.contains(needles),
    })
    .with_auto_remove(blank_or_empty_list)
}

pub fn equals() -> FilterFn {
    FilterFn::new("equals", |cell, value| cell == value).with_auto_remove(CellValue::is_blank)
}

pub fn weak_equals() -> FilterFn {
    FilterFn::new("weakEquals", |cell, value| cell.loosely_equals(value))
        .with_auto_remove(CellValue::is_blank)
}

/// Inclusive numeric range. The filter value is a two-element list
/// `[min, max]`; either bound may be empty (open) and bounds given in the
/// wrong order are swapped.
pub fn in_number_range() -> FilterFn {
    FilterFn::new("inNumberRange", |cell, range| {
        let (min, max) = range_bounds(range);
        match cell.to_number() {
            Some(n) => n >= min && n <= max,
            None => false,
        }
    })
    .with_resolver(|raw| {
        let (min, max) = range_bounds(raw);
        CellValue::list([CellValue::Number(min), CellValue::Number(max)])
    })
    .with_auto_remove(|value| match value.as_list() {
        Some(items) => {
            let blank = |i: usize| items.get(i).map_or(true, CellValue::is_blank);
            blank(0) && blank(1)
        }
        None => value.is_blank(),
    })
}

fn range_bounds(range: &CellValue) -> (f64, f64) {
    let items = range.as_list().unwrap_or(&[]);
    let bound = |i: usize, open: f64| {
        items
            .get(i)
            .and_then(CellValue::to_number)
            .unwrap_or(open)
    };
    let min = bound(0, f64::NEG_INFINITY);
    let max = bound(1, f64::INFINITY);
    if min > max {
        (max, min)
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> CellValue {
        CellValue::text(s)
    }

    #[test]
    fn test_includes_string() {
        let f = includes_string();
        assert!(f.test(&t("Tanner Linsley"), &t("linS")));
        assert!(f.test(&CellValue::Number(1234.0), &t("23")));
        assert!(!f.test(&CellValue::Empty, &t("")));
        assert!(f.should_auto_remove(&t("")));
        assert!(!f.should_auto_remove(&t("a")));
    }

    #[test]
    fn test_in_number_range_resolution() {
        let f = in_number_range();
        let resolved = f.resolve(&CellValue::list([CellValue::Number(10.0), CellValue::text("2")]));
        assert_eq!(
            resolved,
            CellValue::list([CellValue::Number(2.0), CellValue::Number(10.0)])
        );
        assert!(f.test(&CellValue::Number(5.0), &resolved));
        assert!(!f.test(&CellValue::Number(11.0), &resolved));

        let open = f.resolve(&CellValue::list([CellValue::Empty, CellValue::Number(3.0)]));
        assert!(f.test(&CellValue::Number(-100.0), &open));
        assert!(f.should_auto_remove(&CellValue::list([CellValue::Empty, t("")])));
    }

    #[test]
    fn test_array_filters() {
        let tags = CellValue::list([t("a"), t("b")]);
        assert!(arr_includes().test(&tags, &t("a")));
        assert!(arr_includes_all().test(&tags, &CellValue::list([t("a"), t("b")])));
        assert!(!arr_includes_all().test(&tags, &CellValue::list([t("a"), t("c")])));
        assert!(arr_includes_some().test(&tags, &CellValue::list([t("c"), t("b")])));
        assert!(arr_includes().should_auto_remove(&CellValue::list(Vec::<CellValue>::new())));
    }

    #[test]
    fn test_equality_filters() {
        assert!(equals().test(&CellValue::Number(1.0), &CellValue::Number(1.0)));
        assert!(!equals().test(&CellValue::Number(1.0), &t("1")));
        assert!(weak_equals().test(&CellValue::Number(1.0), &t("1")));
        assert!(equals_string().test(&t("ABC"), &t("abc")));
    }
}
