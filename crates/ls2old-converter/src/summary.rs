//! Summary reports: what was downloaded, what will be created.

use ls2old_domain::document::DocKind;
use ls2old_domain::StagingStore;
use serde_json::Value;
use std::collections::BTreeMap;

/// Summarize the raw source documents by collection, counting the
/// unclassifiable ones under `NOT DATA`.
pub fn source_summary(docs: &[Value]) -> String {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for doc in docs {
        let collection = match DocKind::classify(doc) {
            Some(DocKind::Session) => "sessions",
            Some(DocKind::Datum) => "datums",
            Some(DocKind::User) => "users",
            Some(DocKind::Datalist) => "datalists",
            None => "NOT DATA",
        };
        *counts.entry(collection).or_default() += 1;
    }
    let mut lines = vec!["\nLingSync documents downloaded.".to_owned()];
    for (collection, count) in counts {
        lines.push(format!("  {}: {}", collection, count));
    }
    lines.join("\n")
}

/// Summarize the staged destination resources, alphabetically by type.
pub fn destination_summary(store: &StagingStore) -> String {
    let mut counts: Vec<(&'static str, usize)> = store.counts();
    counts.sort_by_key(|(name, _)| *name);
    let mut lines = vec!["\nOLD resources to be created.".to_owned()];
    for (name, count) in counts {
        lines.push(format!("  {}: {}", name, count));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls2old_domain::Form;
    use serde_json::json;

    #[test]
    fn source_summary_sorts_and_buckets_non_data() {
        let docs = vec![
            json!({"_id": "s1", "collection": "sessions"}),
            json!({"_id": "d1", "collection": "datums"}),
            json!({"_id": "d2", "collection": "datums"}),
            json!({"_id": "_design/pages", "views": {}}),
        ];
        let summary = source_summary(&docs);
        assert_eq!(
            summary,
            "\nLingSync documents downloaded.\n  NOT DATA: 1\n  datums: 2\n  sessions: 1"
        );
    }

    #[test]
    fn destination_summary_is_alphabetical() {
        let mut store = StagingStore::new();
        store.forms = vec![Form::default()];
        let summary = destination_summary(&store);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "OLD resources to be created.");
        assert_eq!(lines[2], "  applicationsettings: 0");
        assert!(summary.contains("  forms: 1"));
    }
}
