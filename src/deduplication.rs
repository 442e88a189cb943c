// 🔍 Deduplication Engine - Merge near-duplicate company keys
// Containment match: "acme" absorbs "acme asia" and "acme asia pacific"

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

// ============================================================================
// DUPLICATE MATCH RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// The shorter name that survives
    pub kept: String,

    /// The longer name that contains `kept` and is dropped
    pub removed: String,
}

impl DuplicateMatch {
    /// Human-readable reason
    pub fn reason(&self) -> String {
        format!("Containment match: \"{}\" ⊂ \"{}\"", self.kept, self.removed)
    }
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

/// Fuzzy deduplicator over cleaned company names.
///
/// Two names are duplicates when one is a substring of the other; the shorter
/// one is kept. Names are visited by (character length, lexicographic) order
/// and a name is dropped as soon as it contains a name already kept. The
/// outcome is the set of names that contain no other input name, which does
/// not depend on input order.
///
/// Two distinct names of equal length can never contain each other, so the
/// lexicographic part of the order only fixes which survivor is reported as
/// absorbing a dropped name.
#[derive(Debug, Clone, Default)]
pub struct DeduplicationEngine;

impl DeduplicationEngine {
    pub fn new() -> Self {
        DeduplicationEngine
    }

    /// Find every name that should be dropped, paired with the survivor that
    /// absorbs it.
    pub fn find_duplicates(&self, names: &BTreeSet<String>) -> Vec<DuplicateMatch> {
        let mut ordered: Vec<&String> = names.iter().filter(|n| !n.is_empty()).collect();
        ordered.sort_by(|a, b| {
            a.chars()
                .count()
                .cmp(&b.chars().count())
                .then_with(|| a.cmp(b))
        });

        let mut kept: Vec<&String> = Vec::new();
        let mut matches = Vec::new();

        for candidate in ordered {
            // Survivors are never longer than the candidate, so only one
            // direction of containment can hold.
            match kept.iter().find(|k| candidate.contains(k.as_str())) {
                Some(survivor) => {
                    let m = DuplicateMatch {
                        kept: (*survivor).clone(),
                        removed: candidate.clone(),
                    };
                    debug!("{}", m.reason());
                    matches.push(m);
                }
                None => kept.push(candidate),
            }
        }

        matches
    }

    /// Reduce a set of cleaned names, returning the survivors and the matches
    /// that justified each removal.
    pub fn dedup_with_matches(
        &self,
        names: &BTreeSet<String>,
    ) -> (BTreeSet<String>, Vec<DuplicateMatch>) {
        let matches = self.find_duplicates(names);
        let removed: BTreeSet<&str> = matches.iter().map(|m| m.removed.as_str()).collect();

        let survivors = names
            .iter()
            .filter(|n| !removed.contains(n.as_str()))
            .cloned()
            .collect();

        (survivors, matches)
    }

    /// Reduce a set of cleaned names to its distinct representatives.
    pub fn deduplicate(&self, names: &BTreeSet<String>) -> BTreeSet<String> {
        self.dedup_with_matches(names).0
    }
}

// ============================================================================
// TESTS
// ============================================================================
