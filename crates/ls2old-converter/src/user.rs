//! Mapping of LingSync users to OLD users.

use crate::text::{join_paragraphs, punctuate_period_safe};
use ls2old_domain::document::SourceDocument;
use ls2old_domain::warning::DocWarnings;
use ls2old_domain::{ConversionOutcome, PrimaryPayload, User, PLACEHOLDER_EMAIL};

const KNOWN_ATTRS: [&str; 15] = [
    "_id",
    "_rev",
    "authUrl",
    "collection",
    "gravatar",
    "id",
    "username",
    "firstname",
    "lastname",
    "description",
    "markAsNeedsToBeSaved",
    "researchInterest",
    "email",
    "subtitle",
    "affiliation",
];

/// Convert a user document to an OLD user.
///
/// A user document without a username cannot become a destination user:
/// the outcome then carries warnings only. Names fall back to the
/// username and a missing email gets the placeholder, with a warning
/// telling the operator to fix it.
pub fn convert_user(doc: &SourceDocument) -> ConversionOutcome {
    let mut warnings = DocWarnings::default();

    for attr in doc.unknown_attrs(&KNOWN_ATTRS) {
        warnings.doc(format!(
            "'{}' not a recognized attribute in user {}",
            attr, doc.id
        ));
    }

    let username = match doc.attr("username") {
        Some(username) => username,
        None => return ConversionOutcome::empty(doc.kind, &doc.id, warnings),
    };

    let email = match doc.attr("email") {
        Some(email) => email,
        None => {
            warnings.general(format!(
                "Created a user (with username {}) with a fake email: {}. Please fix \
                 manually, i.e., from within the Dative/OLD interface.",
                username, PLACEHOLDER_EMAIL
            ));
            PLACEHOLDER_EMAIL.to_owned()
        }
    };

    let mut page_content = Vec::new();
    if let Some(description) = doc.attr("description") {
        page_content.push(description);
    }
    if let Some(interest) = doc.attr("researchInterest") {
        page_content.push(format!("Research interest: {}", punctuate_period_safe(&interest)));
    }
    if let Some(affiliation) = doc.attr("affiliation") {
        page_content.push(format!("Affiliation: {}", punctuate_period_safe(&affiliation)));
    }

    let user = User {
        first_name: doc.attr("firstname").unwrap_or_else(|| username.clone()),
        last_name: doc.attr("lastname").unwrap_or_else(|| username.clone()),
        username,
        email,
        role: "administrator".to_owned(),
        page_content: join_paragraphs(&page_content),
        ..Default::default()
    };

    ConversionOutcome {
        kind: doc.kind,
        source_id: doc.id.clone(),
        primary: Some(PrimaryPayload::User(user)),
        auxiliary: Default::default(),
        warnings,
        language: None,
    }
}
