//! Build the prompts handed to the requester and to the model.
//!
//! Everything here is a pure function of its inputs: the same schema and query always give
//! byte-identical prompts, which keeps evaluation runs reproducible.

pub mod content;

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use query_engine_metadata::metadata::SchemaModel;

use super::corrections::CONFIRMATION_TOKEN;

/// Who a chat message is from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        PromptMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        PromptMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        PromptMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Render the schema for a person to check: each table, then its columns and their types.
pub fn format_schema_for_display(schema: &SchemaModel) -> String {
    if schema.is_empty() {
        return "No tables found in the database.".to_string();
    }

    let mut formatted = String::from("📋 **Database Schema Detected:**\n\n");
    for (table, columns) in schema.tables() {
        let _ = writeln!(formatted, "**Table: {table}**");
        for column in columns {
            let _ = writeln!(formatted, "  - {} ({})", column.name, column.data_type);
        }
        formatted.push('\n');
    }
    formatted
}

/// The prompt asking the requester to confirm or correct the discovered schema.
pub fn build_schema_confirmation_prompt(schema: &SchemaModel, nl_query: &str) -> String {
    let schema_display = format_schema_for_display(schema);

    format!(
        "I need to generate a SQL query for your request: \"{nl_query}\"

First, let me show you the database schema I detected:

{schema_display}

**Please confirm:**
1. Are all the tables and columns listed above correct?
2. Are there any missing tables or columns I should know about?
3. Are there any columns listed that don't actually exist?

If everything looks correct, please respond with \"{CONFIRMATION_TOKEN}\" and I'll generate the SQL query.

If there are any issues, please tell me specifically:
- \"Table X doesn't exist, use Table Y instead\"
- \"Column A in Table B doesn't exist, use Column C instead\"
- \"Add Table Z with columns: col1, col2, col3\"

Your response:"
    )
}

/// Render the schema for the model: table names and column names, skipping tables without
/// columns.
pub fn build_schema_context(schema: &SchemaModel) -> String {
    if schema.is_empty() {
        return "No schema information available.".to_string();
    }

    let mut context = String::new();
    for (table, columns) in schema.tables() {
        if columns.is_empty() {
            continue;
        }
        let names = columns
            .iter()
            .map(|column| column.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(context, "Table: {table}\nColumns: {names}\n\n");
    }
    context
}

/// The chat prompt asking the model for SQL: the system instruction, the worked examples, and
/// the confirmed schema with the request.
pub fn build_sql_generation_prompt(nl_query: &str, schema: &SchemaModel) -> Vec<PromptMessage> {
    let schema_context = build_schema_context(schema);

    let final_user_input = format!(
        "Given the following confirmed schema:

{schema_context}

Translate this natural language query into a PostgreSQL SQL statement:
{}

Remember to use PostgreSQL syntax (|| for concatenation, INTERVAL for dates, etc.).",
        nl_query.trim()
    );

    let mut messages = vec![PromptMessage::system(content::SYSTEM_INSTRUCTION)];
    for example in content::FEW_SHOT_EXAMPLES {
        messages.push(PromptMessage::user(example.user));
        messages.push(PromptMessage::assistant(example.assistant));
    }
    messages.push(PromptMessage::user(final_user_input));
    messages
}
