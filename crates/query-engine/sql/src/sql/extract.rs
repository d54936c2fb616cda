//! Recover candidate SQL statements from free-form model output.

use std::sync::OnceLock;

use regex::Regex;

use super::keywords;

/// A fenced code block, optionally tagged as sql. Captures the interior.
fn fenced_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?i:sql)?\s*(.*?)\s*```").unwrap())
}

/// A lone fence marker left over from an unterminated block.
fn fence_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```(?i:sql)?").unwrap())
}

fn statement_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"(?i)^(?:{})\b", keywords::alternation())).unwrap())
}

/// Extract candidate SQL statements from a model response, in order of appearance.
///
/// Fenced code blocks win: if there are any, their trimmed contents are the candidates.
/// Otherwise the text is split on `;` and every fragment that starts with a statement keyword
/// is kept. An empty result means the response contained no SQL; it is not an error.
pub fn extract_sql(response: &str) -> Vec<String> {
    let cleaned = response.trim();

    let mut candidates: Vec<String> = fenced_block()
        .captures_iter(cleaned)
        .filter_map(|captures| captures.get(1))
        .map(|block| block.as_str().trim().to_string())
        .filter(|block| !block.is_empty())
        .collect();

    if candidates.is_empty() {
        let without_blocks = fenced_block().replace_all(cleaned, "");
        let unfenced = fence_marker().replace_all(&without_blocks, "");

        for fragment in unfenced.split(';').map(str::trim) {
            if !fragment.is_empty()
                && statement_start().is_match(fragment)
                && !candidates.iter().any(|candidate| candidate == fragment)
            {
                candidates.push(fragment.to_string());
            }
        }
    }

    candidates.retain(|candidate| {
        !candidate.is_empty() && keywords::mentions_statement_keyword(candidate)
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn fenced_block_is_extracted_and_trimmed() {
        let response = "Here you go:\n```sql\n  SELECT 1;  \n```\nHope it helps.";
        assert_eq!(extract_sql(response), vec!["SELECT 1;".to_string()]);
    }

    #[test]
    fn untagged_and_uppercase_tagged_fences_both_count() {
        let response = "```\nSELECT a FROM t\n```\nand\n```SQL\nSELECT b FROM t\n```";
        assert_eq!(
            extract_sql(response),
            vec!["SELECT a FROM t".to_string(), "SELECT b FROM t".to_string()]
        );
    }

    #[test]
    fn bare_statement_without_fences() {
        assert_eq!(
            extract_sql("SELECT * FROM t"),
            vec!["SELECT * FROM t".to_string()]
        );
    }

    #[test]
    fn bare_statements_are_split_on_terminators() {
        let response = "select 1;\nWITH x AS (SELECT 2) SELECT * FROM x;\nselect 1;";
        assert_eq!(
            extract_sql(response),
            vec![
                "select 1".to_string(),
                "WITH x AS (SELECT 2) SELECT * FROM x".to_string()
            ]
        );
    }

    #[test]
    fn narrative_only_yields_nothing() {
        assert!(extract_sql("I am sorry, I cannot answer that question.").is_empty());
        assert!(extract_sql("The query would be: SELECT * FROM t").is_empty());
        assert!(extract_sql("").is_empty());
    }

    #[test]
    fn fenced_block_without_sql_keywords_is_dropped() {
        assert!(extract_sql("```\nno sql in here\n```").is_empty());
    }

    #[test]
    fn unterminated_fence_is_stripped() {
        assert_eq!(
            extract_sql("```sql\nDELETE FROM t WHERE id = 1;"),
            vec!["DELETE FROM t WHERE id = 1".to_string()]
        );
    }

    #[test]
    fn keyword_must_start_a_word() {
        assert!(extract_sql("Selected rows: none").is_empty());
    }
}
