//! Scoring generated SQL against known-correct SQL.

pub mod evaluation;
