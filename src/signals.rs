// 🏗️ Signal Extractors - Message → application / rejection record
//
// Each signal kind has its own search query and its own extraction regex.
// A message that does not match, or has no parseable send date, yields
// nothing; that is a skip, not an error.

use crate::dates::message_date;
use crate::mailbox::Message;
use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// ============================================================================
// CORE TYPES
// ============================================================================

/// SignalKind - which job-application event a message reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Applied,
    Rejected,
}

impl SignalKind {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            SignalKind::Applied => "applied",
            SignalKind::Rejected => "rejected",
        }
    }

    /// Provider search query used when none is configured
    pub fn default_query(&self) -> &'static str {
        match self {
            SignalKind::Applied => r#"from:linkedin.com "application was sent to""#,
            SignalKind::Rejected => r#"subject:"Your application to""#,
        }
    }
}

/// ApplicationRecord - an "applied" event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub sent_at: NaiveDateTime,
    pub company: String,
}

/// RejectionRecord - a "rejected" event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub sent_at: NaiveDateTime,
    pub position: String,
    pub company: String,
}

impl RejectionRecord {
    /// "<position> @ <company>"
    pub fn details(&self) -> String {
        format!("{} @ {}", self.position, self.company)
    }
}

/// Output of an extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Applied(ApplicationRecord),
    Rejected(RejectionRecord),
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::Applied(_) => SignalKind::Applied,
            Signal::Rejected(_) => SignalKind::Rejected,
        }
    }

    /// Raw company name as written in the message
    pub fn company(&self) -> &str {
        match self {
            Signal::Applied(r) => &r.company,
            Signal::Rejected(r) => &r.company,
        }
    }

    pub fn sent_at(&self) -> NaiveDateTime {
        match self {
            Signal::Applied(r) => r.sent_at,
            Signal::Rejected(r) => r.sent_at,
        }
    }
}

// ============================================================================
// EXTRACTOR TRAIT
// ============================================================================

/// SignalExtractor - one implementation per signal kind
pub trait SignalExtractor {
    fn kind(&self) -> SignalKind;

    /// Extract a record, or None when the message does not carry this signal
    fn extract(&self, message: &Message) -> Option<Signal>;
}

/// Factory: extractor for a signal kind
pub fn get_extractor(kind: SignalKind) -> Box<dyn SignalExtractor> {
    match kind {
        SignalKind::Applied => Box::new(AppliedExtractor::new()),
        SignalKind::Rejected => Box::new(RejectedExtractor::new()),
    }
}

// ============================================================================
// EXTRACTORS
// ============================================================================

static APPLIED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sent to (.+)").expect("applied pattern must compile"));

static REJECTED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Your application to (.+) at (.+)").expect("rejected pattern must compile")
});

/// LinkedIn "Your application was sent to <company>" confirmations.
/// Reads the snippet.
pub struct AppliedExtractor;

impl AppliedExtractor {
    pub fn new() -> Self {
        AppliedExtractor
    }

    /// Company named in a snippet, if any
    pub fn extract_company(&self, snippet: &str) -> Option<String> {
        let caps = APPLIED_PATTERN.captures(snippet)?;
        Some(caps[1].trim().to_string())
    }
}

impl Default for AppliedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalExtractor for AppliedExtractor {
    fn kind(&self) -> SignalKind {
        SignalKind::Applied
    }

    fn extract(&self, message: &Message) -> Option<Signal> {
        let company = self.extract_company(&message.snippet)?;
        let sent_at = message_date(&message.headers).as_datetime()?;

        Some(Signal::Applied(ApplicationRecord { sent_at, company }))
    }
}

/// "Your application to <position> at <company>" replies.
/// Reads the Subject header.
pub struct RejectedExtractor;

impl RejectedExtractor {
    pub fn new() -> Self {
        RejectedExtractor
    }

    /// (position, company) named in a subject, if any.
    ///
    /// The position capture is greedy, so the split happens at the last " at ".
    pub fn extract_position(&self, subject: &str) -> Option<(String, String)> {
        let caps = REJECTED_PATTERN.captures(subject)?;
        Some((caps[1].trim().to_string(), caps[2].trim().to_string()))
    }
}

impl Default for RejectedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalExtractor for RejectedExtractor {
    fn kind(&self) -> SignalKind {
        SignalKind::Rejected
    }

    fn extract(&self, message: &Message) -> Option<Signal> {
        let (position, company) = self.extract_position(message.subject())?;
        let sent_at = message_date(&message.headers).as_datetime()?;

        Some(Signal::Rejected(RejectionRecord {
            sent_at,
            position,
            company,
        }))
    }
}

// ============================================================================
// TESTS
// ============================================================================
