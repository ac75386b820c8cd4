//! The migration's warning taxonomy.
//!
//! Warnings never abort the pipeline; they are accumulated, deduplicated and
//! reported at the end of the conversion run. Two scopes exist: **general**
//! warnings describe migration-wide caveats, **per-document** warnings are
//! keyed by a synthetic string naming the destination resource kind and the
//! originating source document.

use crate::document::DocKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Warnings gathered while converting a single source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocWarnings {
    /// Migration-wide caveats discovered via this document.
    pub general: Vec<String>,
    /// Caveats scoped to this document alone.
    pub docspecific: Vec<String>,
}

impl DocWarnings {
    /// Record a warning scoped to the originating document.
    pub fn doc(&mut self, message: impl Into<String>) {
        self.docspecific.push(message.into());
    }

    /// Record a migration-wide warning.
    pub fn general(&mut self, message: impl Into<String>) {
        self.general.push(message.into());
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.docspecific.is_empty()
    }
}

/// All warnings accrued across a migration, partitioned by scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Warnings {
    general: Vec<String>,
    per_doc: BTreeMap<String, Vec<String>>,
}

impl Warnings {
    /// New, empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a migration-wide warning, skipping exact duplicates.
    pub fn add_general(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.general.contains(&message) {
            self.general.push(message);
        }
    }

    /// Record a warning under a per-document key, skipping exact duplicates.
    pub fn add_doc(&mut self, key: &str, message: impl Into<String>) {
        let message = message.into();
        let entry = self.per_doc.entry(key.to_owned()).or_default();
        if !entry.contains(&message) {
            entry.push(message);
        }
    }

    /// Fold one document's warnings in, deriving the per-document key from
    /// the destination resource kind and the originating document.
    pub fn absorb(&mut self, kind: DocKind, doc_id: &str, warnings: DocWarnings) {
        let key = doc_key(kind, doc_id);
        for w in warnings.docspecific {
            self.add_doc(&key, w);
        }
        for w in warnings.general {
            self.add_general(w);
        }
    }

    /// Migration-wide warnings, in arrival order.
    pub fn general(&self) -> &[String] {
        &self.general
    }

    /// Per-document warnings, keyed and sorted by key.
    pub fn per_doc(&self) -> &BTreeMap<String, Vec<String>> {
        &self.per_doc
    }

    /// Total number of recorded warnings.
    pub fn count(&self) -> usize {
        self.general.len() + self.per_doc.values().map(Vec::len).sum::<usize>()
    }

    /// Render the human-readable warnings report.
    pub fn render(&self) -> String {
        if self.count() == 0 {
            return "No warnings.".to_owned();
        }
        let noun = if self.count() == 1 { "Warning" } else { "Warnings" };
        let mut out = vec![format!("{} Conversion {}.", self.count(), noun)];
        let mut index = 0;
        if !self.general.is_empty() {
            out.push(String::new());
            out.push("  General warnings:".to_owned());
            for w in &self.general {
                index += 1;
                out.push(format!("    {}. {}", index, w));
            }
        }
        for (key, warnings) in &self.per_doc {
            out.push(String::new());
            out.push(format!("  Warning(s) for {}:", key));
            for w in warnings {
                index += 1;
                out.push(format!("    {}. {}", index, w));
            }
        }
        out.join("\n")
    }
}

/// The synthetic per-document warning key.
pub fn doc_key(kind: DocKind, doc_id: &str) -> String {
    format!(
        "OLD {} resource generated from LingSync {} {}",
        kind.destination(),
        kind.source_name(),
        doc_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_warnings_deduplicate() {
        let mut w = Warnings::new();
        w.add_general("multiple languages present");
        w.add_general("multiple languages present");
        assert_eq!(w.count(), 1);
    }

    #[test]
    fn absorb_keys_by_resource_and_doc() {
        let mut w = Warnings::new();
        let mut dw = DocWarnings::default();
        dw.doc("'surprise' not a recognized attribute in datum d1");
        w.absorb(DocKind::Datum, "d1", dw);
        let key = "OLD forms resource generated from LingSync datum d1";
        assert_eq!(w.per_doc().get(key).map(Vec::len), Some(1));
    }

    #[test]
    fn render_counts_and_sections() {
        let mut w = Warnings::new();
        w.add_general("a");
        w.add_doc("OLD users resource generated from LingSync user u1", "b");
        let report = w.render();
        assert!(report.starts_with("2 Conversion Warnings."));
        assert!(report.contains("General warnings:"));
        assert!(report.contains("user u1"));
    }

    #[test]
    fn render_no_warnings() {
        assert_eq!(Warnings::new().render(), "No warnings.");
    }
}
