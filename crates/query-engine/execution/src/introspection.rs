//! Read the schema out of `information_schema`.

use sqlx::{PgPool, Row};
use tracing::{info_span, Instrument};

use query_engine_metadata::metadata::{ColumnInfo, SchemaModel};

use crate::error::DiscoveryError;

const SCHEMA_QUERY: &str = include_str!("introspection.sql");

/// Fetch every table in `schema_name` along with its columns.
pub async fn fetch_schema(pool: &PgPool, schema_name: &str) -> Result<SchemaModel, DiscoveryError> {
    let rows = sqlx::query(SCHEMA_QUERY)
        .bind(schema_name)
        .fetch_all(pool)
        .instrument(info_span!("Introspect schema", schema = schema_name))
        .await?;

    let entries = rows
        .iter()
        .map(|row| {
            Ok((
                row.try_get::<String, _>("table_name")?,
                row.try_get::<Option<String>, _>("column_name")?,
                row.try_get::<Option<String>, _>("data_type")?,
            ))
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    let schema = group_columns(entries);
    tracing::info!(tables = schema.len(), "Discovered schema");
    Ok(schema)
}

/// Fold `(table, column, type)` rows, ordered by table, into a schema. A row with no column
/// records a table that has none.
pub fn group_columns(
    entries: impl IntoIterator<Item = (String, Option<String>, Option<String>)>,
) -> SchemaModel {
    let mut tables: Vec<(String, Vec<ColumnInfo>)> = vec![];

    for (table, column, data_type) in entries {
        if tables.last().map_or(true, |(name, _)| *name != table) {
            tables.push((table, vec![]));
        }
        if let (Some(column), Some((_, columns))) = (column, tables.last_mut()) {
            columns.push(ColumnInfo::new(column, data_type.unwrap_or_default()));
        }
    }

    tables.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn entry(table: &str, column: Option<(&str, &str)>) -> (String, Option<String>, Option<String>) {
        (
            table.to_string(),
            column.map(|(name, _)| name.to_string()),
            column.map(|(_, ty)| ty.to_string()),
        )
    }

    #[test]
    fn rows_are_grouped_per_table_in_order() {
        let schema = group_columns(vec![
            entry("companies", Some(("company_id", "integer"))),
            entry("companies", Some(("name", "text"))),
            entry("empty_table", None),
            entry("salespeople", Some(("salesperson_id", "integer"))),
        ]);

        assert_eq!(
            schema,
            SchemaModel::empty()
                .with_table(
                    "companies",
                    vec![
                        ColumnInfo::new("company_id", "integer"),
                        ColumnInfo::new("name", "text"),
                    ]
                )
                .with_table("empty_table", vec![])
                .with_table(
                    "salespeople",
                    vec![ColumnInfo::new("salesperson_id", "integer")]
                )
        );
    }

    #[test]
    fn no_rows_is_an_empty_schema() {
        assert!(group_columns(vec![]).is_empty());
    }
}
