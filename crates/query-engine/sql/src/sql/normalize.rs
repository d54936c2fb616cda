//! Normalization of SQL text for exact-match comparison.

use std::sync::OnceLock;

use regex::Regex;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn spaced_punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*([,;=<>!+\-/()\\\[\]])\s*").unwrap())
}

/// Normalize a statement so that formatting differences do not matter:
/// whitespace runs collapse to one space, spaces around punctuation and operators go away,
/// trailing statement terminators are dropped and everything is lower-cased.
///
/// ```
/// use query_engine_sql::sql::normalize::normalize_sql;
///
/// assert_eq!(normalize_sql("SELECT  a ,b FROM t;"), "select a,b from t");
/// ```
pub fn normalize_sql(sql: &str) -> String {
    let collapsed = whitespace_run().replace_all(sql, " ");
    let tightened = spaced_punctuation().replace_all(collapsed.trim(), "$1");
    tightened.trim_end_matches(';').trim_end().to_lowercase()
}
