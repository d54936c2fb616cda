//! The statement keywords we recognise as the start of a SQL statement.

use enum_iterator::Sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub enum StatementKeyword {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    With,
}

impl StatementKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::With => "WITH",
        }
    }
}

impl std::fmt::Display for StatementKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Does the text mention any statement keyword anywhere, ignoring case?
///
/// This is a sanity filter, not a syntax check: `"SELECTED"` matches.
pub fn mentions_statement_keyword(text: &str) -> bool {
    let upper = text.to_uppercase();
    enum_iterator::all::<StatementKeyword>().any(|keyword| upper.contains(keyword.as_str()))
}

/// A regex alternation of every keyword, e.g. `SELECT|INSERT|...`.
pub(crate) fn alternation() -> String {
    enum_iterator::all::<StatementKeyword>()
        .map(StatementKeyword::as_str)
        .collect::<Vec<_>>()
        .join("|")
}
