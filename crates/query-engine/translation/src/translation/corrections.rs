//! Parse free-text schema corrections into structural edits.
//!
//! Parsing is best-effort and never fails: every line is classified on its own into a
//! [`CorrectionInstruction`], and lines we cannot make sense of are simply ignored.
//!
//! Recognised shapes, matched case-insensitively:
//!
//! - `Table customers doesn't exist, use clients instead`
//! - `Column email doesn't exist, use email_address instead`
//! - `Column A in Table B doesn't exist, use Column C instead`

use query_engine_metadata::metadata::SchemaModel;

/// The response which accepts the schema as shown.
pub const CONFIRMATION_TOKEN: &str = "CONFIRMED";

const DOES_NOT_EXIST: &str = "doesn't exist";

/// One parsed edit, derived from a single line of a correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionInstruction {
    TableRename { old: String, new: String },
    /// Applies to every table with a column called `old`, ignoring case.
    ColumnRename { old: String, new: String },
    Unrecognized,
}

/// The result of processing a response to the confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub schema: SchemaModel,
    pub confirmed: bool,
}

/// Apply a user's response to the current schema.
///
/// Only the literal confirmation token confirms. Anything else is read as a list of
/// corrections, applied in line order, and the corrected schema comes back unconfirmed, even
/// if nothing in the response could be applied.
pub fn parse_schema_corrections(response: &str, schema: &SchemaModel) -> Correction {
    if response.trim().to_uppercase() == CONFIRMATION_TOKEN {
        return Correction {
            schema: schema.clone(),
            confirmed: true,
        };
    }

    let schema = response
        .trim()
        .lines()
        .map(parse_correction_line)
        .fold(schema.clone(), |schema, instruction| {
            apply_instruction(&schema, &instruction).unwrap_or(schema)
        });

    Correction {
        schema,
        confirmed: false,
    }
}

/// Apply a single instruction, producing a new schema. `None` if it changes nothing we can
/// act on.
pub fn apply_instruction(
    schema: &SchemaModel,
    instruction: &CorrectionInstruction,
) -> Option<SchemaModel> {
    match instruction {
        CorrectionInstruction::TableRename { old, new } => {
            let renamed = schema.with_table_renamed(old, new);
            match &renamed {
                Some(_) => tracing::debug!("Renamed table '{old}' to '{new}'"),
                None => tracing::debug!("Ignoring rename of unknown table '{old}'"),
            }
            renamed
        }
        CorrectionInstruction::ColumnRename { old, new } => {
            tracing::debug!("Renaming column '{old}' to '{new}' in every table");
            Some(schema.with_column_renamed(old, new))
        }
        CorrectionInstruction::Unrecognized => None,
    }
}

#[derive(Clone, Copy)]
enum Subject {
    Table,
    Column,
}

impl Subject {
    fn keyword(self) -> &'static str {
        match self {
            Subject::Table => "table",
            Subject::Column => "column",
        }
    }
}

/// Classify one line of a correction.
///
/// Keywords are matched case-insensitively but the extracted names keep the casing they were
/// written with.
pub fn parse_correction_line(line: &str) -> CorrectionInstruction {
    if !line.to_lowercase().replace('\u{2019}', "'").contains(DOES_NOT_EXIST) {
        return CorrectionInstruction::Unrecognized;
    }

    let words: Vec<&str> = line.split_whitespace().map(clean_token).collect();
    let folded: Vec<String> = words.iter().map(|word| word.to_lowercase()).collect();
    let position = |keyword: &str| folded.iter().position(|word| word == keyword);

    // whichever subject is mentioned first is the one being corrected
    let (subject, at) = match (position("table"), position("column")) {
        (Some(table), Some(column)) if column < table => (Subject::Column, column),
        (Some(table), _) => (Subject::Table, table),
        (None, Some(column)) => (Subject::Column, column),
        (None, None) => return CorrectionInstruction::Unrecognized,
    };
    let Some(use_at) = position("use") else {
        return CorrectionInstruction::Unrecognized;
    };

    let old = words.get(at + 1).copied();
    // "use Column C" names the replacement after a repeated keyword
    let new_at = match folded.get(use_at + 1) {
        Some(word) if word == subject.keyword() => use_at + 2,
        _ => use_at + 1,
    };
    let new = words.get(new_at).copied();

    match (old, new) {
        (Some(old), Some(new)) if !old.is_empty() && !new.is_empty() => {
            let (old, new) = (old.to_string(), new.to_string());
            match subject {
                Subject::Table => CorrectionInstruction::TableRename { old, new },
                Subject::Column => CorrectionInstruction::ColumnRename { old, new },
            }
        }
        _ => CorrectionInstruction::Unrecognized,
    }
}

/// Strip quoting and trailing punctuation from a word.
fn clean_token(word: &str) -> &str {
    word.trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '\u{2019}'))
        .trim_end_matches(|c: char| matches!(c, ',' | '.' | ';' | ':' | '!' | '?'))
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '\u{2019}'))
}
