//! Metadata information regarding the database and the results read from it.

pub mod database;
pub mod result_set;

// re-export without modules
pub use database::*;
pub use result_set::*;
