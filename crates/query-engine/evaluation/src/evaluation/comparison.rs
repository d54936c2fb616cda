//! Result-set equivalence.
//!
//! Two result sets are equivalent when they hold the same multiset of rows over the same set of
//! columns. Row order, column order and column-name case are ignored, and values are compared
//! in a normalised form: numbers to six decimal places, dates and timestamps as calendar dates,
//! everything else as text.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use query_engine_metadata::metadata::{ResultSet, Scalar};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
    #[error("row {row} has {found} values but there are {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cannot read {value:?} in column '{column}' as a date")]
    NotADate { column: String, value: String },
}

/// Decide whether two non-empty result sets hold the same rows.
pub fn compare_result_sets(
    generated: &ResultSet,
    expected: &ResultSet,
) -> Result<bool, ComparisonError> {
    let positional = generated.columns.is_none() || expected.columns.is_none();
    let generated_names = column_names(generated, positional);
    let expected_names = column_names(expected, positional);
    check_widths(generated, generated_names.len())?;
    check_widths(expected, expected_names.len())?;

    let generated_order = sorted_positions(&generated_names);
    let expected_order = sorted_positions(&expected_names);
    let same_columns = generated_order.len() == expected_order.len()
        && generated_order
            .iter()
            .zip(&expected_order)
            .all(|(&g, &e)| generated_names[g] == expected_names[e]);
    if !same_columns {
        tracing::debug!(
            generated = ?generated_names,
            expected = ?expected_names,
            "Column set mismatch"
        );
        return Ok(false);
    }

    let mut generated_rows: Vec<Vec<Coerced>> = vec![vec![]; generated.len()];
    let mut expected_rows: Vec<Vec<Coerced>> = vec![vec![]; expected.len()];

    for (&g, &e) in generated_order.iter().zip(&expected_order) {
        let name = &generated_names[g];
        let strategy =
            Strategy::for_values(column_values(generated, g).chain(column_values(expected, e)));

        for (row, value) in generated_rows.iter_mut().zip(column_values(generated, g)) {
            row.push(strategy.coerce(name, value)?);
        }
        for (row, value) in expected_rows.iter_mut().zip(column_values(expected, e)) {
            row.push(strategy.coerce(name, value)?);
        }
    }

    generated_rows.sort();
    expected_rows.sort();
    Ok(generated_rows == expected_rows)
}

/// Lower-cased column names, or `col_0`, `col_1`, ... when names are not to be trusted.
fn column_names(result_set: &ResultSet, positional: bool) -> Vec<String> {
    match &result_set.columns {
        Some(columns) if !positional => columns.iter().map(|c| c.to_lowercase()).collect(),
        Some(columns) => positional_names(columns.len()),
        None => positional_names(result_set.rows.first().map_or(0, Vec::len)),
    }
}

fn positional_names(width: usize) -> Vec<String> {
    (0..width).map(|i| format!("col_{i}")).collect()
}

fn check_widths(result_set: &ResultSet, expected: usize) -> Result<(), ComparisonError> {
    match result_set
        .rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != expected)
    {
        Some((row, values)) => Err(ComparisonError::RowWidth {
            row,
            expected,
            found: values.len(),
        }),
        None => Ok(()),
    }
}

/// Column positions ordered by column name.
fn sorted_positions(names: &[String]) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..names.len()).collect();
    positions.sort_by(|&a, &b| names[a].cmp(&names[b]));
    positions
}

fn column_values(result_set: &ResultSet, column: usize) -> impl Iterator<Item = &Scalar> {
    result_set.rows.iter().filter_map(move |row| row.get(column))
}

/// How the values of one column are normalised. Both sides of a column use the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Numeric,
    DateLike,
    Textual,
}

impl Strategy {
    fn for_values<'a>(values: impl Iterator<Item = &'a Scalar>) -> Self {
        let mut numeric = true;
        let mut temporal = false;
        for value in values {
            numeric &= value.is_null() || value.is_numeric() || matches!(value, Scalar::Bool(_));
            temporal |= value.is_temporal();
        }
        if numeric {
            Strategy::Numeric
        } else if temporal {
            Strategy::DateLike
        } else {
            Strategy::Textual
        }
    }

    fn coerce(self, column: &str, value: &Scalar) -> Result<Coerced, ComparisonError> {
        match self {
            // booleans count as 1 and 0
            Strategy::Numeric => Ok(match value {
                Scalar::Bool(b) => Coerced::Number(f64::from(u8::from(*b))),
                other => other
                    .as_f64()
                    .map_or(Coerced::Null, |x| Coerced::Number(round_to_micros(x))),
            }),
            Strategy::DateLike => {
                calendar_date(value)
                    .map(Coerced::Text)
                    .ok_or_else(|| ComparisonError::NotADate {
                        column: column.to_string(),
                        value: value.to_string(),
                    })
            }
            Strategy::Textual => Ok(Coerced::Text(value.to_string())),
        }
    }
}

fn round_to_micros(x: f64) -> f64 {
    let rounded = (x * 1e6).round() / 1e6;
    // -0.0 and 0.0 must compare equal
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// The `YYYY-MM-DD` form of a value in a date-like column. Null and empty text are the empty
/// string; anything else that does not read as a date is `None`.
fn calendar_date(value: &Scalar) -> Option<String> {
    let date = match value {
        Scalar::Null => return Some(String::new()),
        Scalar::Date(date) => *date,
        Scalar::Timestamp(timestamp) => timestamp.date(),
        Scalar::Text(text) if text.trim().is_empty() => return Some(String::new()),
        Scalar::Text(text) => parse_date(text.trim())?,
        Scalar::Bool(_) | Scalar::Int(_) | Scalar::Float(_) => return None,
    };
    Some(date.format("%Y-%m-%d").to_string())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    const TIMESTAMP_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Some(timestamp) = TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(timestamp.date());
    }
    ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"]
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
        .map(|timestamp| timestamp.date_naive())
}

/// A value in its comparable form.
#[derive(Debug, Clone)]
enum Coerced {
    Null,
    Number(f64),
    Text(String),
}

impl Coerced {
    fn rank(&self) -> u8 {
        match self {
            Coerced::Null => 0,
            Coerced::Number(_) => 1,
            Coerced::Text(_) => 2,
        }
    }
}

impl Ord for Coerced {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Coerced::Number(a), Coerced::Number(b)) => a.total_cmp(b),
            (Coerced::Text(a), Coerced::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Coerced {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Coerced {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Coerced {}
