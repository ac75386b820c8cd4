//! The upload tally and its human-readable rendering.

use ls2old_domain::relmap::DestinationId;
use ls2old_domain::{DEFAULT_PASSWORD, PLACEHOLDER_EMAIL};

/// What an upload run created, updated and deleted, per resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Whether the application settings were created.
    pub applicationsettings_created: bool,
    /// Usernames of created users (original source usernames).
    pub users_created: Vec<String>,
    /// Usernames of pre-existing users that were updated.
    pub users_updated: Vec<String>,
    /// Ids of created speakers.
    pub speakers_created: Vec<DestinationId>,
    /// Ids of pre-existing speakers that were updated.
    pub speakers_updated: Vec<DestinationId>,
    /// Ids of created tags (including the migration tag).
    pub tags_created: Vec<DestinationId>,
    /// Ids of created files.
    pub files_created: Vec<DestinationId>,
    /// Ids of created forms (including forms deleted afterwards).
    pub forms_created: Vec<DestinationId>,
    /// Ids of forms created and then deleted to replay source trashing.
    pub forms_deleted: Vec<DestinationId>,
    /// Ids of created corpora.
    pub corpora_created: Vec<DestinationId>,
    /// Ids of created collections.
    pub collections_created: Vec<DestinationId>,
}

impl UploadReport {
    /// Render the run summary.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        if !self.users_created.is_empty() {
            lines.push(counted(self.users_created.len(), "user"));
            lines.push(format!(
                "All created OLD users are administrators and have the password '{}'; \
                 some may also have the fake email address {}.",
                DEFAULT_PASSWORD, PLACEHOLDER_EMAIL
            ));
        }
        if !self.users_updated.is_empty() {
            lines.push(updated(self.users_updated.len(), "user"));
        }
        if !self.speakers_created.is_empty() {
            lines.push(counted(self.speakers_created.len(), "speaker"));
        }
        if !self.speakers_updated.is_empty() {
            lines.push(updated(self.speakers_updated.len(), "speaker"));
        }
        if !self.tags_created.is_empty() {
            lines.push(counted(self.tags_created.len(), "tag"));
        }
        if !self.files_created.is_empty() {
            lines.push(counted(self.files_created.len(), "file"));
        }
        if !self.forms_created.is_empty() {
            lines.push(counted(self.forms_created.len(), "form"));
        }
        if !self.forms_deleted.is_empty() {
            lines.push(format!(
                "{} OLD {} created and then deleted (to simulate trashed LingSync forms).",
                self.forms_deleted.len(),
                pluralize_by_count("form", self.forms_deleted.len())
            ));
        }
        if !self.corpora_created.is_empty() {
            lines.push(counted(self.corpora_created.len(), "corpus"));
        }
        if !self.collections_created.is_empty() {
            lines.push(counted(self.collections_created.len(), "collection"));
        }
        lines.join("\n")
    }
}

fn counted(count: usize, noun: &str) -> String {
    format!("{} OLD {} created.", count, pluralize_by_count(noun, count))
}

fn updated(count: usize, noun: &str) -> String {
    format!(
        "{} pre-existing and LingSync-matching OLD {} updated or left unaltered.",
        count,
        pluralize_by_count(noun, count)
    )
}

fn pluralize_by_count(noun: &str, count: usize) -> String {
    if count == 1 {
        noun.to_owned()
    } else if let Some(stem) = noun.strip_suffix("us") {
        format!("{}ora", stem)
    } else {
        format!("{}s", noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_pluralizes_to_corpora() {
        assert_eq!(pluralize_by_count("corpus", 1), "corpus");
        assert_eq!(pluralize_by_count("corpus", 2), "corpora");
        assert_eq!(pluralize_by_count("form", 2), "forms");
    }

    #[test]
    fn render_mentions_default_password_for_created_users() {
        let report = UploadReport {
            users_created: vec!["ana".to_owned()],
            ..Default::default()
        };
        let rendered = report.render();
        assert!(rendered.starts_with("1 OLD user created."));
        assert!(rendered.contains(DEFAULT_PASSWORD));
        assert!(rendered.contains(PLACEHOLDER_EMAIL));
    }

    #[test]
    fn render_counts_deleted_forms_separately() {
        let report = UploadReport {
            forms_created: vec![1, 2, 3],
            forms_deleted: vec![3],
            ..Default::default()
        };
        let rendered = report.render();
        assert!(rendered.contains("3 OLD forms created."));
        assert!(rendered
            .contains("1 OLD form created and then deleted (to simulate trashed LingSync forms)."));
    }
}
