//! FILENAME: table-core/src/record.rs
//! Keyed access into source records, used by accessor-key columns.

use std::collections::{BTreeMap, HashMap};

use crate::value::CellValue;

/// A source record whose fields can be read by key.
///
/// Accessor keys are taken verbatim. A key containing `.` is first looked up
/// as a literal field name; implementations that support nesting then fall
/// back to walking the dotted path.
pub trait Record {
    fn field(&self, key: &str) -> CellValue;
}

impl Record for serde_json::Value {
    fn field(&self, key: &str) -> CellValue {
        if let Some(value) = self.get(key) {
            return CellValue::from(value);
        }
        if !key.contains('.') {
            return CellValue::Empty;
        }

        let mut current = self;
        for segment in key.split('.') {
            current = match current {
                serde_json::Value::Object(map) => match map.get(segment) {
                    Some(next) => next,
                    None => return CellValue::Empty,
                },
                serde_json::Value::Array(items) => {
                    match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
                        Some(next) => next,
                        None => return CellValue::Empty,
                    }
                }
                _ => return CellValue::Empty,
            };
        }
        CellValue::from(current)
    }
}

impl<V> Record for HashMap<String, V>
where
    V: Clone + Into<CellValue>,
{
    fn field(&self, key: &str) -> CellValue {
        self.get(key).cloned().map_or(CellValue::Empty, Into::into)
    }
}

impl<V> Record for BTreeMap<String, V>
where
    V: Clone + Into<CellValue>,
{
    fn field(&self, key: &str) -> CellValue {
        self.get(key).cloned().map_or(CellValue::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_dotted_key_wins() {
        let record = json!({ "a.b": 1, "a": { "b": 2 } });
        assert_eq!(record.field("a.b"), CellValue::Number(1.0));
    }

    #[test]
    fn test_dotted_key_falls_back_to_path() {
        let record = json!({ "a": { "b": [10, 20] } });
        assert_eq!(record.field("a.b.1"), CellValue::Number(20.0));
        assert_eq!(record.field("a.c"), CellValue::Empty);
    }

    #[test]
    fn test_map_records() {
        let mut record: HashMap<String, f64> = HashMap::new();
        record.insert("age".to_string(), 31.0);
        assert_eq!(record.field("age"), CellValue::Number(31.0));
        assert_eq!(record.field("name"), CellValue::Empty);
    }
}
