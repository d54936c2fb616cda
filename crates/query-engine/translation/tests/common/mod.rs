//! Schemas shared by the translation tests.

use query_engine_metadata::metadata::{ColumnInfo, SchemaModel};

/// A small shop: customers, their orders, and a table with no visible columns.
pub fn shop_schema() -> SchemaModel {
    SchemaModel::empty()
        .with_table(
            "customers",
            vec![
                ColumnInfo::new("customer_id", "integer"),
                ColumnInfo::new("first_name", "text"),
                ColumnInfo::new("email", "character varying"),
            ],
        )
        .with_table(
            "orders",
            vec![
                ColumnInfo::new("order_id", "integer"),
                ColumnInfo::new("customer_id", "integer"),
                ColumnInfo::new("Email", "text"),
                ColumnInfo::new("placed_at", "timestamp without time zone"),
            ],
        )
        .with_table("audit_log", vec![])
}
