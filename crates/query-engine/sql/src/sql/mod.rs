//! SQL text utilities.

pub mod extract;
pub mod keywords;
pub mod normalize;
