//! Ask a Postgres database questions in plain language.
//!
//! The discovered schema is shown to the requester for confirmation or correction before any
//! SQL is generated, and generated SQL can be scored against known-correct statements.

pub mod console;
pub mod generator;
pub mod pipeline;
pub mod runner;
pub mod state;
pub mod test_cases;
