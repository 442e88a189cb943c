// ✉️ Gmail REST client - MessageSource over the Gmail v1 API
//
// Authentication is external: this client only reads the access token from
// the authorized-user JSON artifact that the consent flow leaves behind.
// No retries and no timeouts of its own; any failure aborts the run.

use crate::mailbox::{Header, Message, MessagePage, MessageSource};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

// ============================================================================
// WIRE TYPES
// ============================================================================

/// The subset of the authorized-user token file we read
#[derive(Debug, Deserialize)]
struct AuthorizedUser {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMessagesResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GetMessageResponse {
    id: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    payload: Payload,
}

#[derive(Debug, Default, Deserialize)]
struct Payload {
    #[serde(default)]
    headers: Vec<Header>,
}

impl From<ListMessagesResponse> for MessagePage {
    fn from(response: ListMessagesResponse) -> Self {
        MessagePage {
            ids: response.messages.into_iter().map(|m| m.id).collect(),
            next_page_token: response.next_page_token,
        }
    }
}

impl From<GetMessageResponse> for Message {
    fn from(response: GetMessageResponse) -> Self {
        Message {
            id: response.id,
            snippet: response.snippet,
            headers: response.payload.headers,
        }
    }
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct GmailClient {
    http: Client,
    base_url: String,
    access_token: String,
    page_size: usize,
}

impl GmailClient {
    pub fn new(base_url: &str, access_token: String, page_size: usize) -> Self {
        GmailClient {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            page_size,
        }
    }

    /// Build a client from the token artifact at `token_path`
    pub fn from_token_file(token_path: &Path, base_url: &str, page_size: usize) -> Result<Self> {
        let access_token = read_access_token(token_path)?;
        Ok(Self::new(base_url, access_token, page_size))
    }

    fn messages_url(&self) -> String {
        format!("{}/gmail/v1/users/me/messages", self.base_url)
    }
}

/// Read the access token from an authorized-user JSON file
pub fn read_access_token(token_path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(token_path).with_context(|| {
        format!(
            "Failed to read token file {} (run the OAuth consent flow first)",
            token_path.display()
        )
    })?;

    let user: AuthorizedUser = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse token file: {}", token_path.display()))?;

    user.token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow::anyhow!("No access token in {}", token_path.display()))
}

impl MessageSource for GmailClient {
    fn list_messages(&self, query: &str, page_token: Option<&str>) -> Result<MessagePage> {
        let mut params = vec![
            ("q", query.to_string()),
            ("maxResults", self.page_size.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let response: ListMessagesResponse = self
            .http
            .get(self.messages_url())
            .bearer_auth(&self.access_token)
            .query(&params)
            .send()
            .context("Gmail list request failed")?
            .error_for_status()
            .context("Gmail list request was rejected")?
            .json()
            .context("Malformed Gmail list response")?;

        debug!(
            "Listed {} messages (more: {})",
            response.messages.len(),
            response.next_page_token.is_some()
        );
        Ok(response.into())
    }

    fn get_message(&self, id: &str) -> Result<Message> {
        let response: GetMessageResponse = self
            .http
            .get(format!("{}/{}", self.messages_url(), id))
            .bearer_auth(&self.access_token)
            .send()
            .with_context(|| format!("Gmail get request failed for message {}", id))?
            .error_for_status()
            .with_context(|| format!("Gmail get request was rejected for message {}", id))?
            .json()
            .with_context(|| format!("Malformed Gmail response for message {}", id))?;

        Ok(response.into())
    }
}

// ============================================================================
// TESTS
// ============================================================================
