//! Duplicate-resource consolidation.
//!
//! Many source documents imply the same user, speaker or tag. After all
//! documents are converted, duplicates are merged by their natural key and
//! any discarded field values are reported as general warnings. First
//! occurrence wins, both for the surviving resource and for each merged
//! field value.

use ls2old_domain::{Speaker, StagingStore, Tag, User, Warnings};

/// Merge duplicate users, speakers and tags in place.
pub fn consolidate(store: &mut StagingStore, warnings: &mut Warnings) {
    store.users = consolidate_users(std::mem::take(&mut store.users), warnings);
    store.speakers = consolidate_speakers(std::mem::take(&mut store.speakers), warnings);
    store.tags = consolidate_tags(std::mem::take(&mut store.tags), warnings);
}

fn consolidate_users(users: Vec<User>, warnings: &mut Warnings) -> Vec<User> {
    let mut out: Vec<User> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for user in &users {
        if seen.contains(&user.username) {
            continue;
        }
        seen.push(user.username.clone());
        let duplicates: Vec<&User> =
            users.iter().filter(|u| u.username == user.username).collect();
        if duplicates.len() == 1 {
            out.push(user.clone());
            continue;
        }
        out.push(User {
            username: user.username.clone(),
            first_name: merge_field(
                duplicates.iter().map(|u| u.first_name.as_str()),
                "users",
                "first_name",
                warnings,
            ),
            last_name: merge_field(
                duplicates.iter().map(|u| u.last_name.as_str()),
                "users",
                "last_name",
                warnings,
            ),
            email: merge_field(
                duplicates.iter().map(|u| u.email.as_str()),
                "users",
                "email",
                warnings,
            ),
            affiliation: merge_field(
                duplicates.iter().map(|u| u.affiliation.as_str()),
                "users",
                "affiliation",
                warnings,
            ),
            role: merge_field(
                duplicates.iter().map(|u| u.role.as_str()),
                "users",
                "role",
                warnings,
            ),
            page_content: merge_field(
                duplicates.iter().map(|u| u.page_content.as_str()),
                "users",
                "page_content",
                warnings,
            ),
        });
    }
    out
}

fn consolidate_speakers(speakers: Vec<Speaker>, warnings: &mut Warnings) -> Vec<Speaker> {
    let mut out: Vec<Speaker> = Vec::new();
    let mut seen: Vec<(String, String)> = Vec::new();
    for speaker in &speakers {
        let key = (speaker.first_name.clone(), speaker.last_name.clone());
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        let duplicates: Vec<&Speaker> = speakers
            .iter()
            .filter(|s| {
                s.first_name == speaker.first_name && s.last_name == speaker.last_name
            })
            .collect();
        if duplicates.len() == 1 {
            out.push(speaker.clone());
            continue;
        }
        out.push(Speaker {
            first_name: speaker.first_name.clone(),
            last_name: speaker.last_name.clone(),
            dialect: merge_field(
                duplicates.iter().map(|s| s.dialect.as_str()),
                "speakers",
                "dialect",
                warnings,
            ),
            page_content: merge_field(
                duplicates.iter().map(|s| s.page_content.as_str()),
                "speakers",
                "page_content",
                warnings,
            ),
        });
    }
    out
}

fn consolidate_tags(tags: Vec<Tag>, warnings: &mut Warnings) -> Vec<Tag> {
    let mut out: Vec<Tag> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for tag in &tags {
        if seen.contains(&tag.name) {
            continue;
        }
        seen.push(tag.name.clone());
        let duplicates: Vec<&Tag> = tags.iter().filter(|t| t.name == tag.name).collect();
        if duplicates.len() > 1 {
            let combined: Vec<&str> = duplicates
                .iter()
                .map(|t| t.description.as_str())
                .filter(|d| !d.is_empty())
                .collect();
            let combined = combined.join("\n\n");
            if combined != tag.description {
                warnings.add_general(format!(
                    "Changed description of tag '{}' from '{}' to '{}'",
                    tag.name, tag.description, combined
                ));
            }
        }
        out.push(tag.clone());
    }
    out
}

/// The surviving value for one field of a duplicate set: the first distinct
/// non-empty value. Discarded values are reported.
fn merge_field<'a>(
    values: impl Iterator<Item = &'a str>,
    resource: &str,
    field: &str,
    warnings: &mut Warnings,
) -> String {
    let mut distinct: Vec<&str> = Vec::new();
    for value in values {
        if !value.is_empty() && !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    if distinct.len() > 1 {
        warnings.add_general(format!(
            "Lost data when consolidating {}: we chose '{}' as the val for '{}' and the \
             following values were discarded: '{}'.",
            resource,
            distinct[0],
            field,
            distinct[1..].join("', '")
        ));
    }
    distinct.first().map(|v| (*v).to_owned()).unwrap_or_default()
}
