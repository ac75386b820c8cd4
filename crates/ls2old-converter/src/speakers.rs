//! Speaker inference from free-form consultant strings.
//!
//! Consultant values are uncontrolled text; these heuristics cover the
//! attested shapes. Parsing is best-effort and never warns by itself; the
//! callers warn when more speakers come back than the destination field can
//! hold.

use ls2old_domain::Speaker;

/// Infer speakers from a whitespace-separated consultants string.
///
/// Exactly two capitalized tokens are read as one person's first and last
/// name. Otherwise each token is one speaker: an all-caps token is split
/// into a first-name initial and last-name initial(s); any other token
/// doubles as both names. The dialect, when known, is attached to every
/// inferred speaker.
pub fn infer_speakers(consultants: &str, dialect: Option<&str>) -> Vec<Speaker> {
    let tokens: Vec<&str> = consultants.split_whitespace().collect();
    let dialect = dialect.unwrap_or("").to_owned();
    if let [first, last] = tokens[..] {
        if is_capitalized(first) && is_capitalized(last) {
            return vec![Speaker {
                first_name: first.to_owned(),
                last_name: last.to_owned(),
                dialect,
                ..Default::default()
            }];
        }
    }
    tokens
        .into_iter()
        .map(|token| {
            let (first_name, last_name) = if is_all_caps(token) {
                let mut chars = token.chars();
                let first = chars.next().map(String::from).unwrap_or_default();
                (first, chars.collect())
            } else {
                (token.to_owned(), token.to_owned())
            };
            Speaker { first_name, last_name, dialect: dialect.clone(), ..Default::default() }
        })
        .collect()
}

fn is_capitalized(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.is_uppercase() && chars.all(|c| !c.is_uppercase()),
        None => false,
    }
}

fn is_all_caps(token: &str) -> bool {
    !token.chars().any(|c| c.is_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_capitalized_tokens_are_one_speaker() {
        let speakers = infer_speakers("Dave Smith", None);
        assert_eq!(speakers.len(), 1);
        assert_eq!(speakers[0].first_name, "Dave");
        assert_eq!(speakers[0].last_name, "Smith");
    }

    #[test]
    fn all_caps_token_splits_into_initials() {
        let speakers = infer_speakers("DS", None);
        assert_eq!(speakers.len(), 1);
        assert_eq!(speakers[0].first_name, "D");
        assert_eq!(speakers[0].last_name, "S");
    }

    #[test]
    fn multiple_initials_each_become_a_speaker() {
        let speakers = infer_speakers("DS MB", Some("northern"));
        assert_eq!(speakers.len(), 2);
        assert_eq!(speakers[1].first_name, "M");
        assert_eq!(speakers[1].last_name, "B");
        assert!(speakers.iter().all(|s| s.dialect == "northern"));
    }

    #[test]
    fn lowercase_token_doubles_as_both_names() {
        let speakers = infer_speakers("ana", None);
        assert_eq!(speakers.len(), 1);
        assert_eq!(speakers[0].first_name, "ana");
        assert_eq!(speakers[0].last_name, "ana");
    }

    #[test]
    fn empty_string_yields_no_speakers() {
        assert!(infer_speakers("  ", None).is_empty());
    }
}
