//! Handling of SQL as text: recovering statements from model output and normalizing them for
//! comparison. Nothing here parses SQL.

pub mod sql;
