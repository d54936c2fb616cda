//! Sample schemas.

use query_engine_metadata::metadata::{ColumnInfo, SchemaModel};

/// The `customers` table the shipped evaluation cases are written against.
pub fn customers() -> SchemaModel {
    SchemaModel::empty().with_table(
        "customers",
        vec![
            ColumnInfo::new("index", "integer"),
            ColumnInfo::new("customer_alphanum_id", "text"),
            ColumnInfo::new("first_name", "text"),
            ColumnInfo::new("last_name", "text"),
            ColumnInfo::new("company", "text"),
            ColumnInfo::new("city", "text"),
            ColumnInfo::new("country", "text"),
            ColumnInfo::new("phone_1", "text"),
            ColumnInfo::new("phone_2", "text"),
            ColumnInfo::new("email", "text"),
            ColumnInfo::new("subscription_date", "date"),
            ColumnInfo::new("website", "text"),
        ],
    )
}
