//! Schema confirmation and prompt construction.
//! The flow is: confirmation prompt -> user corrections -> (loop) -> generation prompt.

pub mod confirmation;
pub mod corrections;
pub mod prompt;
