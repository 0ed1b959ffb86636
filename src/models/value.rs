use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// A single cell in a dataset row.
///
/// Cells arrive from untyped sources (parsed CSV, JSON uploads), so the
/// engine represents them as a closed tagged variant rather than passing
/// `serde_json::Value` around. Conversion rules live at this boundary only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl CellValue {
    /// Whether this cell counts as absent. `null`, empty/whitespace strings
    /// and the usual missing markers ("null", "undefined", "nan", "n/a")
    /// all normalize to missing before any inference or statistics run.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => {
                let t = s.trim();
                t.is_empty()
                    || t.eq_ignore_ascii_case("null")
                    || t.eq_ignore_ascii_case("undefined")
                    || t.eq_ignore_ascii_case("nan")
                    || t.eq_ignore_ascii_case("n/a")
            }
            _ => false,
        }
    }

    /// Numeric view of the cell. Strings are parsed; booleans and dates are
    /// not coerced to numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// String view used for categorical counting and display.
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Date(d) => d.to_string(),
            CellValue::Text(s) => s.trim().to_string(),
        }
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.is_finite() => CellValue::Number(f),
                _ => CellValue::Null,
            },
            Value::String(s) => CellValue::Text(s.clone()),
            // Nested structures carry no tabular meaning here.
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// An ordered sequence of rows over a shared (growing) set of columns.
///
/// The column set is the union of keys seen across rows; column order is the
/// insertion order of first appearance. A key absent from a row is an absent
/// cell, indistinguishable from an explicit null.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<HashMap<String, CellValue>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row. Pairs are consumed in order so that previously unseen
    /// columns register in first-appearance order.
    pub fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (String, CellValue)>,
    {
        let mut row = HashMap::new();
        for (name, value) in cells {
            if !self.columns.contains(&name) {
                self.columns.push(name.clone());
            }
            row.insert(name, value);
        }
        self.rows.push(row);
    }

    /// Build a dataset from JSON objects (one per row). Key order inside
    /// each object is preserved, which fixes the column order.
    pub fn from_json_rows(rows: &[Value]) -> Self {
        let mut dataset = Self::new();
        for row in rows {
            match row.as_object() {
                Some(map) => dataset.push_row(
                    map.iter()
                        .map(|(k, v)| (k.clone(), CellValue::from_json(v))),
                ),
                None => log::warn!("Skipping non-object row in dataset input"),
            }
        }
        dataset
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in first-appearance order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All cells of one column in row order, absent keys yielding `Null`.
    pub fn column_values(&self, name: &str) -> Vec<&CellValue> {
        self.rows
            .iter()
            .map(|row| row.get(name).unwrap_or(&CellValue::Null))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_markers_normalize_to_absent() {
        assert!(CellValue::Null.is_missing());
        assert!(CellValue::Text("".into()).is_missing());
        assert!(CellValue::Text("   ".into()).is_missing());
        assert!(CellValue::Text("NULL".into()).is_missing());
        assert!(CellValue::Text("undefined".into()).is_missing());
        assert!(!CellValue::Text("0".into()).is_missing());
        assert!(!CellValue::Number(0.0).is_missing());
        assert!(!CellValue::Bool(false).is_missing());
    }

    #[test]
    fn column_order_is_first_appearance() {
        let rows = vec![
            json!({"a": 1, "b": "x"}),
            json!({"c": true, "a": 2}),
        ];
        let ds = Dataset::from_json_rows(&rows);
        assert_eq!(ds.columns(), &["a", "b", "c"]);
        assert_eq!(ds.row_count(), 2);
    }

    #[test]
    fn absent_key_reads_as_null() {
        let rows = vec![json!({"a": 1}), json!({"b": "y"})];
        let ds = Dataset::from_json_rows(&rows);
        let b = ds.column_values("b");
        assert_eq!(b[0], &CellValue::Null);
        assert_eq!(b[1], &CellValue::Text("y".into()));
    }

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(CellValue::Text(" 3.5 ".into()).as_f64(), Some(3.5));
        assert_eq!(CellValue::Text("abc".into()).as_f64(), None);
        assert_eq!(CellValue::Bool(true).as_f64(), None);
    }
}
