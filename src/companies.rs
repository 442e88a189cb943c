// 🏢 Company Index - CompanySet + OriginalNameIndex as one explicit value
//
// "The cleaned name is IDENTITY, the raw spelling is a VALUE"
//
// - Keys are canonical names (never empty)
// - Each key remembers the FIRST raw spelling seen for it
// - The index is passed in and returned, never mutated behind the caller's back

use crate::canonical::clean_company_name;
use crate::deduplication::{DeduplicationEngine, DuplicateMatch};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

// ============================================================================
// COMPANY INDEX
// ============================================================================

/// Accumulated companies for one run.
///
/// One ordered map holds both the set of cleaned names and the first raw
/// spelling for each, so the two can never drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyIndex {
    names: BTreeMap<String, String>,
}

impl CompanyIndex {
    pub fn new() -> Self {
        CompanyIndex::default()
    }

    /// Canonicalize `raw` and add it (first-seen-wins).
    ///
    /// Names that canonicalize to "" are ignored.
    pub fn absorb(mut self, raw: &str) -> Self {
        let cleaned = clean_company_name(raw);
        if cleaned.is_empty() {
            debug!("No canonical name for {:?}, skipping", raw);
            return self;
        }

        self.names.entry(cleaned).or_insert_with(|| raw.to_string());
        self
    }

    /// First raw spelling recorded for a cleaned name
    pub fn original(&self, cleaned: &str) -> Option<&str> {
        self.names.get(cleaned).map(|s| s.as_str())
    }

    pub fn contains(&self, cleaned: &str) -> bool {
        self.names.contains_key(cleaned)
    }

    /// The CompanySet
    pub fn cleaned_names(&self) -> BTreeSet<String> {
        self.names.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Fuzzy-deduplicate and pair every survivor with its original spelling
    pub fn distinct(&self, engine: &DeduplicationEngine) -> DistinctCompanies {
        let (survivors, merges) = engine.dedup_with_matches(&self.cleaned_names());

        let entries = survivors
            .into_iter()
            .map(|cleaned| {
                let original = self.original(&cleaned).unwrap_or(&cleaned).to_string();
                DistinctCompany { cleaned, original }
            })
            .collect();

        DistinctCompanies { entries, merges }
    }
}

// ============================================================================
// DISTINCT COMPANIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinctCompany {
    pub cleaned: String,
    pub original: String,
}

/// Final company list, sorted by cleaned name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinctCompanies {
    pub entries: Vec<DistinctCompany>,

    /// Which names were folded into which survivor
    pub merges: Vec<DuplicateMatch>,
}

impl DistinctCompanies {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
