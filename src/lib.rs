// Application Tracker - Core Library
// Job-application signals from a mailbox → deduplicated company reports

pub mod canonical;      // Name Canonicalizer
pub mod deduplication;  // Fuzzy Deduplicator
pub mod dates;          // Message Date Extractor
pub mod mailbox;        // Message Source trait + pagination
pub mod signals;        // Applied / rejected extractors
pub mod companies;      // CompanySet + OriginalNameIndex
pub mod report;         // Text reports
pub mod config;
pub mod pipeline;

#[cfg(feature = "gmail")]
pub mod gmail;

// Re-export commonly used types
pub use canonical::{clean_company_name, is_invisible, strip_suffix, LEGAL_SUFFIXES};
pub use deduplication::{DeduplicationEngine, DuplicateMatch};
pub use dates::{message_date, parse_date_header, MessageDate};
pub use mailbox::{message_ids, Header, InMemoryMailbox, Message, MessageIds, MessagePage, MessageSource};
pub use signals::{
    get_extractor, AppliedExtractor, ApplicationRecord, RejectedExtractor, RejectionRecord,
    Signal, SignalExtractor, SignalKind,
};
pub use companies::{CompanyIndex, DistinctCompanies, DistinctCompany};
pub use report::{ReportWriter, RunSummary};
pub use config::Config;
pub use pipeline::{collect, harvest, run, Harvest};

#[cfg(feature = "gmail")]
pub use gmail::GmailClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
