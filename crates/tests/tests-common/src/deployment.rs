//! Locating files checked into the repository.

use std::path::PathBuf;

/// Find the project root via the crate root provided by `cargo test`,
/// and get a path relative to it.
/// This depends on the convention that this crate lives in `/crates/tests/<name>`
/// and will break in the unlikely case that we change this
pub fn get_path_from_project_root(relative_path: &str) -> PathBuf {
    let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push("../../../");
    d.push(relative_path);
    d
}

/// The evaluation cases that ship with the repository.
pub fn static_test_cases() -> PathBuf {
    get_path_from_project_root("static/test_cases.json")
}
