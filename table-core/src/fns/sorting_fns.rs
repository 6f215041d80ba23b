//! FILENAME: table-core/src/fns/sorting_fns.rs
//! Built-in comparators for the sorted row model.
//!
//! A comparator receives the two cell values of one column and must define a
//! total order. Direction, undefined-value placement and the index tie-break
//! are applied by the row model, not here.

use std::cmp::Ordering;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::CellValue;

pub type SortingFn = Rc<dyn Fn(&CellValue, &CellValue) -> Ordering>;

/// Splits text into alternating non-digit and digit runs.
pub static RE_SPLIT_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInSortingFn {
    Alphanumeric,
    AlphanumericCaseSensitive,
    Text,
    TextCaseSensitive,
    Datetime,
    Basic,
}

impl BuiltInSortingFn {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "alphanumeric" => Some(BuiltInSortingFn::Alphanumeric),
            "alphanumericCaseSensitive" | "alphanumeric_case_sensitive" => {
                Some(BuiltInSortingFn::AlphanumericCaseSensitive)
            }
            "text" => Some(BuiltInSortingFn::Text),
            "textCaseSensitive" | "text_case_sensitive" => Some(BuiltInSortingFn::TextCaseSensitive),
            "datetime" => Some(BuiltInSortingFn::Datetime),
            "basic" => Some(BuiltInSortingFn::Basic),
            _ => None,
        }
    }

    pub fn compare(self, a: &CellValue, b: &CellValue) -> Ordering {
        match self {
            BuiltInSortingFn::Alphanumeric => alphanumeric(a, b),
            BuiltInSortingFn::AlphanumericCaseSensitive => alphanumeric_case_sensitive(a, b),
            BuiltInSortingFn::Text => text(a, b),
            BuiltInSortingFn::TextCaseSensitive => text_case_sensitive(a, b),
            BuiltInSortingFn::Datetime => datetime(a, b),
            BuiltInSortingFn::Basic => basic(a, b),
        }
    }

    pub fn to_fn(self) -> SortingFn {
        Rc::new(move |a, b| self.compare(a, b))
    }
}

// ============================================================================
// COMPARATORS
// ============================================================================

pub fn alphanumeric(a: &CellValue, b: &CellValue) -> Ordering {
    compare_alphanumeric(
        &a.to_sort_string().to_lowercase(),
        &b.to_sort_string().to_lowercase(),
    )
}

pub fn alphanumeric_case_sensitive(a: &CellValue, b: &CellValue) -> Ordering {
    compare_alphanumeric(&a.to_sort_string(), &b.to_sort_string())
}

pub fn text(a: &CellValue, b: &CellValue) -> Ordering {
    a.to_sort_string()
        .to_lowercase()
        .cmp(&b.to_sort_string().to_lowercase())
}

pub fn text_case_sensitive(a: &CellValue, b: &CellValue) -> Ordering {
    a.to_sort_string().cmp(&b.to_sort_string())
}

/// Dates compare chronologically; anything that is not a date sorts first.
pub fn datetime(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Date(x), CellValue::Date(y)) => x.cmp(y),
        (CellValue::Date(_), _) => Ordering::Greater,
        (_, CellValue::Date(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

pub fn basic(a: &CellValue, b: &CellValue) -> Ordering {
    a.compare(b)
}

/// Compares strings chunk by chunk, numeric chunks by value.
/// A text chunk sorts before a numeric chunk at the same position.
pub fn compare_alphanumeric(a: &str, b: &str) -> Ordering {
    let a_chunks = split_alphanumeric(a);
    let b_chunks = split_alphanumeric(b);

    for (aa, bb) in a_chunks.iter().zip(b_chunks.iter()) {
        let an = parse_digits(aa);
        let bn = parse_digits(bb);

        let ord = match (an, bn) {
            (None, None) => aa.cmp(bb),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.total_cmp(&y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    a_chunks.len().cmp(&b_chunks.len())
}

fn split_alphanumeric(s: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut last = 0;
    for m in RE_SPLIT_ALPHANUMERIC.find_iter(s) {
        if m.start() > last {
            chunks.push(&s[last..m.start()]);
        }
        chunks.push(m.as_str());
        last = m.end();
    }
    if last < s.len() {
        chunks.push(&s[last..]);
    }
    chunks
}

fn parse_digits(chunk: &str) -> Option<f64> {
    if chunk.bytes().all(|b| b.is_ascii_digit()) {
        chunk.parse::<f64>().ok()
    } else {
        None
    }
}

/// Whether text contains a numeric run (and so sorts better alphanumerically).
pub fn has_numeric_chunk(s: &str) -> bool {
    RE_SPLIT_ALPHANUMERIC.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> CellValue {
        CellValue::text(s)
    }

    #[test]
    fn test_alphanumeric_orders_numbers_by_value() {
        let mut values = vec![t("item10"), t("item2"), t("Item1")];
        values.sort_by(alphanumeric);
        assert_eq!(values, vec![t("Item1"), t("item2"), t("item10")]);
    }

    #[test]
    fn test_alphanumeric_text_before_number() {
        assert_eq!(compare_alphanumeric("a", "1"), Ordering::Less);
        assert_eq!(compare_alphanumeric("a1", "a"), Ordering::Greater);
        assert_eq!(compare_alphanumeric("a01", "a1"), Ordering::Equal);
    }

    #[test]
    fn test_text_is_case_insensitive() {
        assert_eq!(text(&t("Apple"), &t("apple")), Ordering::Equal);
        assert_eq!(text_case_sensitive(&t("Apple"), &t("apple")), Ordering::Less);
    }

    #[test]
    fn test_numbers_sort_as_text_when_asked() {
        assert_eq!(text(&CellValue::Number(10.0), &CellValue::Number(9.0)), Ordering::Less);
        assert_eq!(basic(&CellValue::Number(10.0), &CellValue::Number(9.0)), Ordering::Greater);
    }

    #[test]
    fn test_builtin_names() {
        assert_eq!(BuiltInSortingFn::from_name("datetime"), Some(BuiltInSortingFn::Datetime));
        assert_eq!(BuiltInSortingFn::from_name("nope"), None);
    }
}
