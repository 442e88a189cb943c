use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::signals::SignalKind;

/// Default Gmail REST endpoint
pub const DEFAULT_GMAIL_API_URL: &str = "https://gmail.googleapis.com";

/// Default number of ids requested per list call
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. There are no CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory the four reports are written into
    pub output_dir: PathBuf,
    /// JSON mailbox export. When set, the run is offline and Gmail is not used.
    pub mailbox_file: Option<PathBuf>,
    /// Authorized-user token artifact written by the external consent flow
    pub token_path: PathBuf,
    pub gmail_api_url: String,
    pub applied_query: String,
    pub rejected_query: String,
    pub page_size: usize,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Treat empty values the same as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let page_size = match get("TRACKER_PAGE_SIZE") {
            Some(raw) => {
                let size = raw
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("TRACKER_PAGE_SIZE is not a number: {}", raw))?;
                if size == 0 {
                    anyhow::bail!("TRACKER_PAGE_SIZE must be at least 1");
                }
                size
            }
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            output_dir: get("TRACKER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            mailbox_file: get("TRACKER_MAILBOX_FILE").map(PathBuf::from),
            token_path: get("GMAIL_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("token.json")),
            gmail_api_url: get("GMAIL_API_URL")
                .unwrap_or_else(|| DEFAULT_GMAIL_API_URL.to_string()),
            applied_query: get("TRACKER_APPLIED_QUERY")
                .unwrap_or_else(|| SignalKind::Applied.default_query().to_string()),
            rejected_query: get("TRACKER_REJECTED_QUERY")
                .unwrap_or_else(|| SignalKind::Rejected.default_query().to_string()),
            page_size,
        })
    }

    /// Search query for a signal kind
    pub fn query_for(&self, kind: SignalKind) -> &str {
        match kind {
            SignalKind::Applied => &self.applied_query,
            SignalKind::Rejected => &self.rejected_query,
        }
    }
}
