//! Free-text helpers shared by the mapping functions.
//!
//! Converted prose accretes into paragraph lists joined with blank lines.
//! Lengths and truncation are measured in characters, matching the
//! destination's validators.

use chrono::DateTime;
use ls2old_domain::warning::DocWarnings;
use serde_json::Value;

/// Append a period unless the string already ends in sentence-final
/// punctuation.
pub fn punctuate_period_safe(text: &str) -> String {
    match text.chars().last() {
        Some('?') | Some('.') | Some('!') => text.to_owned(),
        _ => format!("{}.", text),
    }
}

/// Join non-empty paragraphs with blank lines.
pub fn join_paragraphs(paragraphs: &[String]) -> String {
    paragraphs
        .iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_owned()
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `limit` characters of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Render an epoch-millisecond timestamp as `YYYY-MM-DD HH:MM` (UTC).
/// Accepts a JSON number or a numeric string.
pub fn epoch_millis_to_human(value: &Value) -> Option<String> {
    let millis = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    let when = DateTime::from_timestamp_millis(millis)?;
    Some(when.format("%Y-%m-%d %H:%M").to_string())
}

/// Render a LingSync comments value as prose paragraphs.
///
/// The value is either an array of comment objects (`text`, optional
/// `username`, `dateCreated`, `timestampModified`) or a bare string.
/// Unusable entries produce a docspecific warning naming the document.
pub fn render_comments(
    value: &Value,
    kind: &str,
    doc_id: &str,
    warnings: &mut DocWarnings,
) -> Vec<String> {
    let mut paragraphs = Vec::new();
    match value {
        Value::Array(entries) => {
            for entry in entries {
                let text = entry.get("text").and_then(Value::as_str).unwrap_or("");
                if text.is_empty() {
                    warnings.doc(format!(
                        "Unable to process the following comment (from {} {}): '{}'",
                        kind, doc_id, entry
                    ));
                    continue;
                }
                let author = entry
                    .get("username")
                    .and_then(Value::as_str)
                    .map(|u| format!(" by {}", u))
                    .unwrap_or_default();
                let created = entry
                    .get("dateCreated")
                    .and_then(epoch_millis_to_human_opt)
                    .map(|d| format!(" on {}", d))
                    .unwrap_or_default();
                let modified = entry
                    .get("timestampModified")
                    .and_then(epoch_millis_to_human_opt)
                    .map(|d| format!(" (last modified {})", d))
                    .unwrap_or_default();
                paragraphs.push(format!(
                    "Comment {}{}{}: {}",
                    author,
                    created,
                    modified,
                    punctuate_period_safe(text)
                ));
            }
        }
        Value::String(s) => {
            if !s.trim().is_empty() {
                paragraphs.push(format!("Comment: {}", punctuate_period_safe(s)));
            }
        }
        _ => {}
    }
    paragraphs
}

fn epoch_millis_to_human_opt(value: &Value) -> Option<String> {
    epoch_millis_to_human(value)
}

/// Normalize a date string to `MM/DD/YYYY`; recognizes `YYYY-MM-DD` and
/// `MM/DD/YYYY` inputs only.
pub fn normalize_date(raw: &str) -> Option<String> {
    let date = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| chrono::NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()?;
    Some(date.format("%m/%d/%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn punctuation_added_only_when_missing() {
        assert_eq!(punctuate_period_safe("A goal"), "A goal.");
        assert_eq!(punctuate_period_safe("Really?"), "Really?");
        assert_eq!(punctuate_period_safe("Done!"), "Done!");
    }

    #[test]
    fn normalize_date_both_formats() {
        assert_eq!(normalize_date("2014-11-09"), Some("11/09/2014".into()));
        assert_eq!(normalize_date("1/2/2014"), Some("01/02/2014".into()));
        assert_eq!(normalize_date("Nov 9, 2014"), None);
    }

    #[test]
    fn comment_objects_render_with_metadata() {
        let mut warnings = DocWarnings::default();
        let value = json!([{
            "text": "needs checking",
            "username": "ana",
            "dateCreated": 1415586565309i64
        }]);
        let paragraphs = render_comments(&value, "datum", "d1", &mut warnings);
        assert_eq!(
            paragraphs,
            vec!["Comment  by ana on 2014-11-10 02:29: needs checking.".to_string()]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn bare_string_comment_renders() {
        let mut warnings = DocWarnings::default();
        let paragraphs =
            render_comments(&json!("see fieldnotes"), "datalist", "dl1", &mut warnings);
        assert_eq!(paragraphs, vec!["Comment: see fieldnotes.".to_string()]);
    }

    #[test]
    fn unusable_comment_entry_warns() {
        let mut warnings = DocWarnings::default();
        let paragraphs = render_comments(&json!([42]), "datum", "d1", &mut warnings);
        assert!(paragraphs.is_empty());
        assert_eq!(warnings.docspecific.len(), 1);
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(char_len("héllo"), 5);
    }
}
