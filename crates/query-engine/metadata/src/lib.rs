//! Shapes of the data the query engine passes around: the discovered database schema and the
//! rows produced by executing a statement.

pub mod metadata;
