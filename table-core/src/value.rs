//! FILENAME: table-core/src/value.rs
//! Cell values produced by column accessors.
//!
//! `CellValue` is the single value currency of the engine: accessors return
//! it, filter and sorting functions consume it, and grouping keys rows by it.
//! Equality and hashing treat NaN as equal to NaN so values can key maps.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum CellValue {
    /// No value (absent field, null, or an accessor that produced nothing).
    #[default]
    Empty,
    Boolean(bool),
    Number(f64),
    Text(Rc<str>),
    Date(NaiveDateTime),
    List(Rc<[CellValue]>),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(Rc::from(s.into()))
    }

    pub fn list(values: impl IntoIterator<Item = CellValue>) -> Self {
        CellValue::List(values.into_iter().collect::<Vec<_>>().into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[CellValue]> {
        match self {
            CellValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric coercion: numbers as-is, booleans as 0/1, numeric text parsed,
    /// dates as epoch milliseconds. Everything else is `None`.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            CellValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            CellValue::Date(d) => Some(d.and_utc().timestamp_millis() as f64),
            _ => None,
        }
    }

    /// Text used by string sorting: numbers print plainly, non-finite numbers
    /// and non-scalar values become the empty string.
    pub fn to_sort_string(&self) -> String {
        match self {
            CellValue::Number(n) if n.is_finite() => format_number(*n),
            CellValue::Text(s) => s.to_string(),
            _ => String::new(),
        }
    }

    /// "Blank" in the filter sense: empty, or empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Number(_) => 1,
            CellValue::Text(_) => 2,
            CellValue::Boolean(_) => 3,
            CellValue::Date(_) => 4,
            CellValue::List(_) => 5,
        }
    }

    /// Total order across all variants. Values of the same kind compare
    /// naturally; different kinds order Empty < Number < Text < Boolean <
    /// Date < List.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::List(a), CellValue::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.compare(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }

    /// Loose equality: identical values, or scalars that coerce to the same
    /// number, or a number and its printed text.
    pub fn loosely_equals(&self, other: &CellValue) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            (CellValue::Empty, _) | (_, CellValue::Empty) => false,
            (CellValue::List(_), _) | (_, CellValue::List(_)) => false,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            _ => match (self.to_number(), other.to_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Whether a list value contains `needle` (strict equality).
    pub fn contains(&self, needle: &CellValue) -> bool {
        match self {
            CellValue::List(items) => items.iter().any(|item| item == needle),
            CellValue::Text(s) => needle.as_str().map_or(false, |n| s.contains(n)),
            _ => false,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ============================================================================
// EQUALITY & HASHING
// ============================================================================

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Empty, CellValue::Empty) => true,
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a == b,
            (CellValue::Number(a), CellValue::Number(b)) => {
                (a.is_nan() && b.is_nan()) || a == b
            }
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::List(a), CellValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_rank().hash(state);
        match self {
            CellValue::Empty => {}
            CellValue::Boolean(b) => b.hash(state),
            CellValue::Number(n) => {
                if n.is_nan() {
                    u64::MAX.hash(state);
                } else if *n == 0.0 {
                    // 0.0 and -0.0 compare equal
                    0u64.hash(state);
                } else {
                    n.to_bits().hash(state);
                }
            }
            CellValue::Text(s) => s.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::List(items) => items.hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S")),
            CellValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(Rc::from(s))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(Rc::from(s))
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

impl<V: Into<CellValue>> From<Vec<V>> for CellValue {
    fn from(values: Vec<V>) -> Self {
        CellValue::list(values.into_iter().map(Into::into))
    }
}

impl From<&serde_json::Value> for CellValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(b) => CellValue::Boolean(*b),
            Value::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
            Value::String(s) => CellValue::text(s.as_str()),
            Value::Array(items) => CellValue::list(items.iter().map(CellValue::from)),
            Value::Object(_) => CellValue::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_nan_equals_nan() {
        let mut set = HashSet::new();
        set.insert(CellValue::Number(f64::NAN));
        set.insert(CellValue::Number(f64::NAN));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_cross_type_order() {
        let mut values = vec![
            CellValue::text("b"),
            CellValue::Boolean(true),
            CellValue::Number(2.0),
            CellValue::Empty,
            CellValue::Number(-1.0),
        ];
        values.sort_by(|a, b| a.compare(b));
        assert_eq!(
            values,
            vec![
                CellValue::Empty,
                CellValue::Number(-1.0),
                CellValue::Number(2.0),
                CellValue::text("b"),
                CellValue::Boolean(true),
            ]
        );
    }

    #[test]
    fn test_loose_equality() {
        assert!(CellValue::Number(1.0).loosely_equals(&CellValue::text("1")));
        assert!(CellValue::Boolean(true).loosely_equals(&CellValue::Number(1.0)));
        assert!(!CellValue::Empty.loosely_equals(&CellValue::Number(0.0)));
        assert!(!CellValue::text("a").loosely_equals(&CellValue::text("A")));
    }

    #[test]
    fn test_display_and_sort_string() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Number(f64::INFINITY).to_sort_string(), "");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!([1, "a", null, true]);
        assert_eq!(
            CellValue::from(&json),
            CellValue::list(vec![
                CellValue::Number(1.0),
                CellValue::text("a"),
                CellValue::Empty,
                CellValue::Boolean(true),
            ])
        );
    }
}
