//! Execute a single statement and read its rows back.
//!
//! Rows are read as JSON, so that every column type Postgres can render comes back without a
//! dedicated decoder. The statement is described first, which gives us the column names and
//! types even when it returns no rows, and tells us which string values are really dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use sqlx::{Column, Executor, PgPool, Row, TypeInfo};
use tracing::{info_span, Instrument};

use query_engine_metadata::metadata::{ResultSet, Scalar};

use crate::error::ExecutionError;

/// How a column's JSON values should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Date,
    Timestamp,
    TimestampWithTimeZone,
    Other,
}

impl ColumnKind {
    /// Classify a column by its Postgres type name.
    pub fn from_type_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "DATE" => ColumnKind::Date,
            "TIMESTAMP" => ColumnKind::Timestamp,
            "TIMESTAMPTZ" => ColumnKind::TimestampWithTimeZone,
            _ => ColumnKind::Other,
        }
    }

    /// Read one value. Strings that fail to parse as the column's type are kept as text.
    pub fn decode(self, value: serde_json::Value) -> Scalar {
        let text = match value {
            serde_json::Value::String(text) => text,
            other => return Scalar::from(other),
        };
        match self {
            ColumnKind::Date => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map_or_else(|_| Scalar::Text(text), Scalar::Date),
            ColumnKind::Timestamp => NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
                .map_or_else(|_| Scalar::Text(text), Scalar::Timestamp),
            ColumnKind::TimestampWithTimeZone => {
                DateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f%#z").map_or_else(
                    |_| Scalar::Text(text),
                    |timestamp| Scalar::Timestamp(timestamp.naive_local()),
                )
            }
            ColumnKind::Other => Scalar::Text(text),
        }
    }
}

/// The name the statement's rows are collected under.
const RESULT_NAME: &str = "nl2sql_result";

/// Execute `sql` and collect every row it returns.
pub async fn execute(pool: &PgPool, sql: &str) -> Result<ResultSet, ExecutionError> {
    let statement = strip_terminator(sql);
    if statement.is_empty() {
        return Err(ExecutionError::EmptyStatement);
    }

    let description = pool
        .describe(statement)
        .instrument(info_span!("Describe statement"))
        .await?;
    let (names, kinds): (Vec<String>, Vec<ColumnKind>) = description
        .columns()
        .iter()
        .map(|column| {
            (
                column.name().to_string(),
                ColumnKind::from_type_name(column.type_info().name()),
            )
        })
        .unzip();

    // statements that return nothing cannot be collected
    if names.is_empty() {
        let result = pool
            .execute(statement)
            .instrument(info_span!("Execute statement"))
            .await?;
        tracing::info!(rows_affected = result.rows_affected(), "Statement returned no columns");
        return Ok(ResultSet::new(vec![], vec![]));
    }

    let collected = collect_rows_as_json(statement, kinds.len());
    let row = sqlx::query(&collected)
        .fetch_one(pool)
        .instrument(info_span!("Execute statement"))
        .await?;
    let value: serde_json::Value = row.try_get(0)?;

    let rows = decode_rows(&kinds, value)?;
    tracing::info!(rows = rows.len(), "Statement executed");

    Ok(ResultSet::new(names, rows))
}

/// Drop surrounding whitespace and any trailing semicolons.
pub fn strip_terminator(sql: &str) -> &str {
    sql.trim().trim_end_matches(';').trim_end()
}

/// A query returning the rows of `statement` as one JSON array of objects, keyed by column
/// position ("0", "1", ...) so that repeated column names keep their values.
///
/// The statement becomes the last common table expression of a top-level `WITH`: unlike a
/// subquery, that accepts `INSERT`, `UPDATE` and `DELETE ... RETURNING`. A statement that
/// already starts with `WITH` has its expression list extended rather than being nested, so
/// data-modifying expressions inside it stay at the top level.
pub fn collect_rows_as_json(statement: &str, width: usize) -> String {
    let aliases = (0..width)
        .map(|position| format!("\"{position}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let (prefix, body) = match split_with_clause(statement) {
        Some((expressions, body)) => (format!("{expressions},\n"), body),
        None => ("WITH ".to_string(), statement),
    };
    format!(
        "{prefix}{RESULT_NAME}({aliases}) AS (\n{body}\n)\n\
         SELECT coalesce(json_agg({RESULT_NAME}), '[]'::json) FROM {RESULT_NAME}"
    )
}

/// Split a statement starting with `WITH` after its last common table expression.
///
/// Gives back the `WITH` clause and the statement that follows it, or `None` when the statement
/// has no `WITH` clause or one we cannot find the end of.
pub fn split_with_clause(statement: &str) -> Option<(&str, &str)> {
    if !starts_with_keyword(statement, "WITH") {
        return None;
    }

    let bytes = statement.as_bytes();
    let mut depth = 0_usize;
    let mut index = "WITH".len();
    while index < bytes.len() {
        match bytes[index] {
            quote @ (b'\'' | b'"') => index = skip_quoted(bytes, index, quote),
            b'-' if bytes.get(index + 1) == Some(&b'-') => {
                index = bytes[index..]
                    .iter()
                    .position(|&byte| byte == b'\n')
                    .map_or(bytes.len(), |offset| index + offset + 1);
            }
            b'/' if bytes.get(index + 1) == Some(&b'*') => {
                index = statement[index + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |offset| index + 2 + offset + 2);
            }
            b'(' => {
                depth += 1;
                index += 1;
            }
            b')' => {
                depth = depth.checked_sub(1)?;
                index += 1;
                if depth > 0 {
                    continue;
                }
                let rest = statement[index..].trim_start();
                // a column list is followed by AS, an expression by a comma or the statement
                if rest.starts_with(',') || starts_with_keyword(rest, "AS") {
                    continue;
                }
                if rest.is_empty()
                    || starts_with_keyword(rest, "SEARCH")
                    || starts_with_keyword(rest, "CYCLE")
                {
                    return None;
                }
                return Some((&statement[..index], rest));
            }
            _ => index += 1,
        }
    }
    None
}

/// The index just past the quoted section opening at `start`.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> usize {
    bytes[start + 1..]
        .iter()
        .position(|&byte| byte == quote)
        .map_or(bytes.len(), |offset| start + 1 + offset + 1)
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    text.get(..keyword.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(keyword))
        && text[keyword.len()..]
            .chars()
            .next()
            .map_or(true, |next| !(next.is_alphanumeric() || next == '_'))
}

/// Turn a JSON array of row objects keyed by column position into rows.
pub fn decode_rows(
    kinds: &[ColumnKind],
    value: serde_json::Value,
) -> Result<Vec<Vec<Scalar>>, ExecutionError> {
    let objects = match value {
        serde_json::Value::Array(objects) => objects,
        other => {
            return Err(ExecutionError::UnexpectedResult(format!(
                "expected an array of rows, got {other}"
            )))
        }
    };

    objects
        .into_iter()
        .map(|object| {
            let mut fields = match object {
                serde_json::Value::Object(fields) => fields,
                other => {
                    return Err(ExecutionError::UnexpectedResult(format!(
                        "expected a row object, got {other}"
                    )))
                }
            };
            Ok(kinds
                .iter()
                .enumerate()
                .map(|(position, kind)| {
                    kind.decode(fields.remove(&position.to_string()).unwrap_or_default())
                })
                .collect())
        })
        .collect()
}
