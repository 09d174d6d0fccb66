use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// FieldValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed table value.
/// Unique values are kept in `BTreeSet`s downstream so `FieldValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put FieldValue in BTreeSet --

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use FieldValue::*;
        fn discriminant(v: &FieldValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

impl FieldValue {
    /// Try to interpret the value as an `f64` for plotting.
    /// NaN and infinities count as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) if v.is_finite() => Some(*v),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Numeric by type, whether or not the value is plottable.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Integer(_) | FieldValue::Float(_))
    }
}

// ---------------------------------------------------------------------------
// Row – one record of the table
// ---------------------------------------------------------------------------

/// A single record. Its identity is its index in [`Dataset::rows`].
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub fields: BTreeMap<String, FieldValue>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// Numeric value of `column`, if present and numeric.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.fields.get(column).and_then(FieldValue::as_f64)
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, FieldValue)>>(iter: T) -> Self {
        Row {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed column indices.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All rows, in file order.
    pub rows: Vec<Row>,
    /// Column names in first-seen (header) order.
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<FieldValue>>,
}

impl Dataset {
    /// Build column indices from rows whose column order is already known
    /// (CSV headers, Parquet schema).
    pub fn with_columns(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<FieldValue>> = BTreeMap::new();
        for row in &rows {
            for (col, val) in &row.fields {
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        Dataset {
            rows,
            column_names,
            unique_values,
        }
    }

    /// Build column indices from rows, discovering columns in first-seen order.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut column_names = Vec::new();
        for row in &rows {
            for col in row.fields.keys() {
                if seen.insert(col.as_str()) {
                    column_names.push(col.clone());
                }
            }
        }
        Self::with_columns(column_names, rows)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Columns where every non-null value is numeric and at least one is
    /// plottable.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.column_names
            .iter()
            .filter(|col| {
                self.unique_values.get(*col).is_some_and(|vals| {
                    vals.iter().any(|v| v.as_f64().is_some())
                        && vals
                            .iter()
                            .all(|v| matches!(v, FieldValue::Null) || v.is_numeric())
                })
            })
            .cloned()
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, FieldValue)]) -> Row {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn from_rows_keeps_first_seen_column_order() {
        // BTreeMap iterates keys sorted, so first-seen order is per-row sorted
        // then appended as new keys appear.
        let ds = Dataset::from_rows(vec![
            row(&[("b", FieldValue::Integer(1))]),
            row(&[("a", FieldValue::Integer(2)), ("b", FieldValue::Integer(3))]),
        ]);
        assert_eq!(ds.column_names, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(ds.unique_values["b"].len(), 2);
    }

    #[test]
    fn numeric_columns_skip_strings_and_allow_nulls() {
        let ds = Dataset::with_columns(
            vec!["species".into(), "width".into(), "note".into()],
            vec![
                row(&[
                    ("species", FieldValue::String("setosa".into())),
                    ("width", FieldValue::Float(3.5)),
                    ("note", FieldValue::Null),
                ]),
                row(&[
                    ("species", FieldValue::String("setosa".into())),
                    ("width", FieldValue::Null),
                    ("note", FieldValue::Null),
                ]),
            ],
        );
        assert_eq!(ds.numeric_columns(), vec!["width".to_string()]);
    }

    #[test]
    fn nan_is_not_a_number_for_plotting() {
        assert_eq!(FieldValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(FieldValue::Float(f64::INFINITY).as_f64(), None);
        assert_eq!(FieldValue::Float(f64::NEG_INFINITY).as_f64(), None);
        assert_eq!(FieldValue::Integer(4).as_f64(), Some(4.0));
        assert_eq!(FieldValue::String("4".into()).as_f64(), None);
    }

    #[test]
    fn column_with_infinity_stays_numeric() {
        let ds = Dataset::with_columns(
            vec!["width".into()],
            vec![
                row(&[("width", FieldValue::Float(2.0))]),
                row(&[("width", FieldValue::Float(f64::INFINITY))]),
            ],
        );
        assert_eq!(ds.numeric_columns(), vec!["width".to_string()]);
        assert!(FieldValue::Float(f64::INFINITY).is_numeric());
    }
}
