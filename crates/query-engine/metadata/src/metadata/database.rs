//! Metadata information regarding the discovered database schema.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Information about a database column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// The declared type, as reported by the database (`integer`, `text`, ...).
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        ColumnInfo {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Mapping from a table name to its columns, in discovery order.
///
/// A `SchemaModel` is never edited in place. Every correction produces a new value, so a
/// session can always fall back to the schema it held before a correction was applied.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaModel(IndexMap<String, Vec<ColumnInfo>>);

impl SchemaModel {
    pub fn empty() -> Self {
        SchemaModel(IndexMap::new())
    }

    /// Add a table, replacing the columns of a table with the same name.
    pub fn with_table(mut self, table: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        self.0.insert(table.into(), columns);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &[ColumnInfo])> {
        self.0
            .iter()
            .map(|(name, columns)| (name.as_str(), columns.as_slice()))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn columns(&self, table: &str) -> Option<&[ColumnInfo]> {
        self.0.get(table).map(Vec::as_slice)
    }

    /// Look up the stored spelling of a table name, ignoring case.
    pub fn find_table(&self, name: &str) -> Option<&str> {
        self.0
            .get_key_value(name)
            .or_else(|| {
                self.0
                    .iter()
                    .find(|(table, _)| table.eq_ignore_ascii_case(name))
            })
            .map(|(table, _)| table.as_str())
    }

    /// A copy of this schema where the table `old` is stored under `new`.
    ///
    /// The renamed table moves to the end, unless a table called `new` already exists, in which
    /// case that table keeps its position and takes over the columns of `old`.
    /// Returns `None` if there is no table called `old`.
    pub fn with_table_renamed(&self, old: &str, new: &str) -> Option<SchemaModel> {
        let key = self.find_table(old)?.to_string();
        let mut tables = self.0.clone();
        let columns = tables.shift_remove(&key)?;
        tables.insert(new.to_string(), columns);
        Some(SchemaModel(tables))
    }

    /// A copy of this schema where every column called `old` (ignoring case), in every table, is
    /// called `new`. Column types and positions are preserved.
    ///
    /// Tables which already have a different column called `new` are left alone, so column names
    /// stay unique within a table.
    pub fn with_column_renamed(&self, old: &str, new: &str) -> SchemaModel {
        let tables = self
            .0
            .iter()
            .map(|(table, columns)| {
                let clashes = columns.iter().any(|column| {
                    column.name.eq_ignore_ascii_case(new) && !column.name.eq_ignore_ascii_case(old)
                });
                let columns = columns
                    .iter()
                    .map(|column| {
                        if !clashes && column.name.eq_ignore_ascii_case(old) {
                            ColumnInfo::new(new, column.data_type.clone())
                        } else {
                            column.clone()
                        }
                    })
                    .collect();
                (table.clone(), columns)
            })
            .collect();
        SchemaModel(tables)
    }
}

impl FromIterator<(String, Vec<ColumnInfo>)> for SchemaModel {
    fn from_iter<T: IntoIterator<Item = (String, Vec<ColumnInfo>)>>(iter: T) -> Self {
        SchemaModel(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn customers() -> SchemaModel {
        SchemaModel::empty()
            .with_table(
                "customers",
                vec![
                    ColumnInfo::new("id", "integer"),
                    ColumnInfo::new("email", "text"),
                ],
            )
            .with_table(
                "orders",
                vec![
                    ColumnInfo::new("id", "integer"),
                    ColumnInfo::new("customer_id", "integer"),
                ],
            )
    }

    #[test]
    fn renaming_a_table_moves_it_to_the_end() {
        let schema = customers();
        let renamed = schema.with_table_renamed("customers", "clients").unwrap();

        assert_eq!(
            renamed.table_names().collect::<Vec<_>>(),
            vec!["orders", "clients"]
        );
        assert_eq!(renamed.columns("clients"), schema.columns("customers"));
        assert!(renamed.columns("customers").is_none());
        // the original is untouched
        assert!(schema.columns("customers").is_some());
    }

    #[test]
    fn renaming_a_table_ignores_case() {
        let renamed = customers().with_table_renamed("CUSTOMERS", "Clients").unwrap();
        assert!(renamed.columns("Clients").is_some());
    }

    #[test]
    fn renaming_a_missing_table_is_none() {
        assert!(customers().with_table_renamed("invoices", "bills").is_none());
    }

    #[test]
    fn renaming_a_column_applies_to_every_table() {
        let renamed = customers().with_column_renamed("ID", "key");

        for (_, columns) in renamed.tables() {
            assert_eq!(columns[0], ColumnInfo::new("key", "integer"));
        }
        assert_eq!(
            renamed.columns("customers").unwrap()[1],
            ColumnInfo::new("email", "text")
        );
    }

    #[test]
    fn renaming_a_column_onto_an_existing_one_is_skipped() {
        let renamed = customers().with_column_renamed("customer_id", "id");
        assert_eq!(renamed, customers());
    }
}
