//! Rows read back from the database.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single value in a result row.
///
/// Values are read from and written to plain JSON. JSON strings are always read as `Text`;
/// `Date` and `Timestamp` are only produced by the database, when the column type says so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::Float(_))
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Scalar::Date(_) | Scalar::Timestamp(_))
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// The string form of a value. `Null` is the empty string.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x:?}"),
            Scalar::Text(s) => write!(f, "{s}"),
            Scalar::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Scalar::Timestamp(t) => write!(f, "{t}"),
        }
    }
}

impl From<serde_json::Value> for Scalar {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Scalar::Null,
            serde_json::Value::Bool(b) => Scalar::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => n.as_f64().map_or(Scalar::Null, Scalar::Float),
            },
            serde_json::Value::String(s) => Scalar::Text(s),
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Scalar::Text(other.to_string())
            }
        }
    }
}

impl From<Scalar> for serde_json::Value {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Null => serde_json::Value::Null,
            Scalar::Bool(b) => serde_json::Value::Bool(b),
            Scalar::Int(i) => serde_json::Value::from(i),
            // JSON has no NaN or infinity
            Scalar::Float(f) => serde_json::Number::from_f64(f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Scalar::Text(s) => serde_json::Value::String(s),
            Scalar::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            Scalar::Timestamp(t) => {
                serde_json::Value::String(t.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
        }
    }
}

/// The rows produced by executing a statement.
///
/// Column names are optional: some executions (and some pre-recorded fixtures) carry no column
/// metadata, and consumers are expected to handle that case rather than fail on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    pub rows: Vec<Vec<Scalar>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        ResultSet {
            columns: Some(columns),
            rows,
        }
    }

    pub fn without_columns(rows: Vec<Vec<Scalar>>) -> Self {
        ResultSet {
            columns: None,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Render as an aligned text table, for reports.
impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Some(columns) = &self.columns else {
            return write!(
                f,
                "No columns returned. Data: {}",
                serde_json::Value::from(
                    self.rows
                        .iter()
                        .map(|row| {
                            serde_json::Value::Array(row.iter().cloned().map(Into::into).collect())
                        })
                        .collect::<Vec<_>>()
                )
            );
        };

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let header = columns
            .iter()
            .zip(&widths)
            .map(|(name, width)| format!("{name:>width$}"))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{}", header.trim_end())?;

        for row in &cells {
            let line = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let width = widths.get(i).copied().unwrap_or(0);
                    format!("{cell:>width$}")
                })
                .collect::<Vec<_>>()
                .join(" ");
            write!(f, "\n{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn scalars_load_from_plain_json() {
        let row: Vec<Scalar> =
            serde_json::from_str(r#"["Amanda Santos", 37.5, 3, null, true, "2022-05-29"]"#)
                .unwrap();

        assert_eq!(
            row,
            vec![
                Scalar::Text("Amanda Santos".to_string()),
                Scalar::Float(37.5),
                Scalar::Int(3),
                Scalar::Null,
                Scalar::Bool(true),
                Scalar::Text("2022-05-29".to_string()),
            ]
        );
    }

    #[test]
    fn dates_serialize_as_calendar_strings() {
        let date = Scalar::Date(NaiveDate::from_ymd_opt(2022, 5, 29).unwrap());
        assert_eq!(
            serde_json::to_value(&date).unwrap(),
            serde_json::json!("2022-05-29")
        );
        assert_eq!(date.to_string(), "2022-05-29");
    }

    #[test]
    fn result_set_without_columns_is_not_an_error() {
        let rs: ResultSet = serde_json::from_str(r#"{"rows": [[1, "a"]]}"#).unwrap();
        assert_eq!(rs.columns, None);
        assert_eq!(rs.to_string(), r#"No columns returned. Data: [[1,"a"]]"#);
    }

    #[test]
    fn result_set_renders_as_a_table() {
        let rs = ResultSet::new(
            vec!["company".to_string(), "n".to_string()],
            vec![
                vec![Scalar::Text("Hart Group".to_string()), Scalar::Int(7)],
                vec![Scalar::Text("Acme".to_string()), Scalar::Null],
            ],
        );
        assert_eq!(
            rs.to_string(),
            "   company n\nHart Group 7\n      Acme"
        );
    }
}
