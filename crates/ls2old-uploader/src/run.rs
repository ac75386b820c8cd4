//! Per-run upload state.

use crate::error::UploadError;
use crate::report::UploadReport;
use chrono::{DateTime, Utc};
use ls2old_domain::relmap::DestinationId;
use ls2old_domain::RelationalMap;

/// State accumulated across one upload run: the migration tag identifying
/// the run, the relational map wiring source keys to destination ids, and
/// the tally of what was created.
///
/// Each run gets its own instance; nothing here outlives the run.
#[derive(Debug)]
pub struct UploadRun {
    /// Name of this run's migration tag; carries the corpus name and the
    /// run's UTC start time, so repeated migrations stay distinguishable.
    pub migration_tag_name: String,
    /// Description of the migration tag.
    pub migration_tag_description: String,
    /// Destination id of the migration tag, once created.
    pub migration_tag_id: Option<DestinationId>,
    /// Source-key to destination-id lookup tables.
    pub map: RelationalMap,
    /// Tally of created, updated and deleted resources.
    pub report: UploadReport,
}

impl UploadRun {
    /// A fresh run for the named corpus, stamped with the current time.
    pub fn new(corpus: &str) -> UploadRun {
        UploadRun::starting_at(corpus, Utc::now())
    }

    /// A fresh run with an explicit start time.
    pub fn starting_at(corpus: &str, when: DateTime<Utc>) -> UploadRun {
        UploadRun {
            migration_tag_name: format!(
                "Migrated from LingSync corpus {} on {}",
                corpus,
                when.format("%Y-%m-%dT%H:%M:%S%.6f")
            ),
            migration_tag_description: format!(
                "This resource was generated during an automated migration from the \
                 LingSync corpus {}.",
                corpus
            ),
            migration_tag_id: None,
            map: RelationalMap::new(),
            report: UploadReport::default(),
        }
    }

    /// The migration tag's destination id, required by every tagged
    /// resource type.
    pub fn migration_tag_id(&self) -> Result<DestinationId, UploadError> {
        self.migration_tag_id.ok_or(UploadError::MigrationTagUnresolved)
    }
}
