// 🔄 Pipeline - one full run over a message source
//
// 1. List ids for the applied query, fetch, extract, absorb companies
// 2. Same for the rejected query
// 3. Sort both record lists newest first
// 4. Fuzzy-deduplicate the company set
// 5. Write the four reports

use crate::companies::{CompanyIndex, DistinctCompanies};
use crate::config::Config;
use crate::deduplication::DeduplicationEngine;
use crate::mailbox::{message_ids, MessageSource};
use crate::report::{ReportWriter, RunSummary};
use crate::signals::{
    get_extractor, ApplicationRecord, RejectionRecord, Signal, SignalExtractor, SignalKind,
};
use anyhow::Result;
use tracing::{debug, info};

/// Everything gathered from the mailbox in one run
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    pub applied: Vec<ApplicationRecord>,
    pub rejected: Vec<RejectionRecord>,
    pub companies: CompanyIndex,
}

impl Harvest {
    /// Sort both record lists newest first. Ties keep discovery order.
    pub fn sort_newest_first(&mut self) {
        self.applied.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        self.rejected.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
    }
}

/// Fetch every message matching `query` and run it through `extractor`.
///
/// Takes the company index by value and returns it with every extracted
/// company absorbed. Any listing or fetch error aborts the whole collection.
pub fn collect(
    source: &dyn MessageSource,
    query: &str,
    extractor: &dyn SignalExtractor,
    companies: CompanyIndex,
) -> Result<(Vec<Signal>, CompanyIndex)> {
    let mut signals = Vec::new();
    let mut companies = companies;
    let mut seen = 0usize;

    for id in message_ids(source, query) {
        let id = id?;
        seen += 1;

        let message = source.get_message(&id)?;
        match extractor.extract(&message) {
            Some(signal) => {
                companies = companies.absorb(signal.company());
                signals.push(signal);
            }
            None => debug!("Message {} has no {} signal, skipping", id, extractor.kind().name()),
        }
    }

    info!(
        "Found {} {} signals in {} messages",
        signals.len(),
        extractor.kind().name(),
        seen
    );
    Ok((signals, companies))
}

/// Gather both streams into one harvest (records sorted newest first)
pub fn harvest(source: &dyn MessageSource, config: &Config) -> Result<Harvest> {
    let mut harvest = Harvest::default();
    let mut companies = CompanyIndex::new();

    for kind in [SignalKind::Applied, SignalKind::Rejected] {
        let extractor = get_extractor(kind);
        let (signals, next) = collect(source, config.query_for(kind), extractor.as_ref(), companies)?;
        companies = next;

        for signal in signals {
            match signal {
                Signal::Applied(record) => harvest.applied.push(record),
                Signal::Rejected(record) => harvest.rejected.push(record),
            }
        }
    }

    harvest.companies = companies;
    harvest.sort_newest_first();
    Ok(harvest)
}

/// Deduplicate companies and log what was merged
pub fn distinct_companies(harvest: &Harvest, engine: &DeduplicationEngine) -> DistinctCompanies {
    let distinct = harvest.companies.distinct(engine);
    info!(
        "{} cleaned companies reduced to {} distinct ({} merged)",
        harvest.companies.len(),
        distinct.len(),
        distinct.merges.len()
    );
    distinct
}

/// Run the whole pipeline and write the reports
pub fn run(source: &dyn MessageSource, config: &Config) -> Result<RunSummary> {
    let harvest = harvest(source, config)?;
    let distinct = distinct_companies(&harvest, &DeduplicationEngine::new());

    let writer = ReportWriter::new(&config.output_dir);
    writer.write_applied(&harvest.applied)?;
    writer.write_rejected(&harvest.rejected)?;
    writer.write_distinct(&distinct)?;

    Ok(RunSummary {
        applied: harvest.applied.len(),
        rejected: harvest.rejected.len(),
        distinct: distinct.len(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
