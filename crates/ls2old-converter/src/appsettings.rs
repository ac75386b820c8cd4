//! Application settings synthesized from the converted corpus.

use ls2old_domain::{ApplicationSettings, Form, Warnings};

/// Synthesize the destination application settings from the session
/// languages and form grammaticalities observed during conversion.
///
/// The first language observed wins; any runners-up are reported, since
/// the destination has a single object language.
pub fn synthesize(
    languages: &[String],
    forms: &[Form],
    warnings: &mut Warnings,
) -> ApplicationSettings {
    let object_language_name = match languages.first() {
        Some(language) => {
            if languages.len() > 1 {
                warnings.add_general(format!(
                    "Arbitrarily chose '{}' as the OLD object language when the following \
                     languages were listed in the LingSync corpus: '{}'.",
                    language,
                    languages.join("', '")
                ));
            }
            language.clone()
        }
        None => String::new(),
    };

    let mut grammaticalities: Vec<&str> = Vec::new();
    for form in forms {
        let g = form.grammaticality.as_str();
        if !g.is_empty() && !grammaticalities.contains(&g) {
            grammaticalities.push(g);
        }
    }

    ApplicationSettings {
        object_language_name,
        grammaticalities: grammaticalities.join(","),
    }
}
