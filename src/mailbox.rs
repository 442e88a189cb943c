// 📬 Message Source - Provider mailbox behind a trait
//
// The pipeline only needs two operations from a mail provider:
// - list message ids matching a query, one page at a time
// - fetch one message (snippet + headers) by id
//
// Pagination is hidden behind `MessageIds`, a lazy iterator that can be
// restarted from scratch by calling `message_ids` again.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

// ============================================================================
// CORE TYPES
// ============================================================================

/// One message header (name, value) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: &str, value: &str) -> Self {
        Header {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// A fetched message, reduced to the fields the pipeline reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,

    /// Provider-generated plain-text preview of the body
    #[serde(default)]
    pub snippet: String,

    #[serde(default)]
    pub headers: Vec<Header>,
}

impl Message {
    /// First header with exactly this name (case-sensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }

    /// Subject header, or "" when absent
    pub fn subject(&self) -> &str {
        self.header("Subject").unwrap_or("")
    }
}

/// One page of a "list messages" call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    pub ids: Vec<String>,

    /// Opaque continuation token; None on the last page
    pub next_page_token: Option<String>,
}

// ============================================================================
// MESSAGE SOURCE TRAIT
// ============================================================================

/// MessageSource - mail provider collaborator
///
/// Implementations own transport and authentication. Errors are fatal for
/// the run; nothing here retries.
pub trait MessageSource {
    /// List message ids matching `query`, continuing from `page_token`
    fn list_messages(&self, query: &str, page_token: Option<&str>) -> Result<MessagePage>;

    /// Fetch one message by id
    fn get_message(&self, id: &str) -> Result<Message>;
}

// ============================================================================
// LAZY PAGINATION
// ============================================================================

/// Lazy, finite sequence of message ids for one query.
///
/// Pages are fetched on demand. A failed page fetch is yielded once as `Err`
/// and ends the sequence.
pub struct MessageIds<'a> {
    source: &'a dyn MessageSource,
    query: String,
    buffer: VecDeque<String>,
    next_page_token: Option<String>,
    started: bool,
    finished: bool,
}

/// Start listing ids for `query` from the first page
pub fn message_ids<'a>(source: &'a dyn MessageSource, query: &str) -> MessageIds<'a> {
    MessageIds {
        source,
        query: query.to_string(),
        buffer: VecDeque::new(),
        next_page_token: None,
        started: false,
        finished: false,
    }
}

impl MessageIds<'_> {
    fn fetch_next_page(&mut self) -> Result<()> {
        let page = self
            .source
            .list_messages(&self.query, self.next_page_token.as_deref())
            .with_context(|| format!("Failed to list messages for query: {}", self.query))?;

        self.started = true;
        self.buffer.extend(page.ids);
        self.next_page_token = page.next_page_token.filter(|t| !t.is_empty());
        Ok(())
    }
}

impl Iterator for MessageIds<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.buffer.pop_front() {
                return Some(Ok(id));
            }

            if self.finished || (self.started && self.next_page_token.is_none()) {
                return None;
            }

            if let Err(e) = self.fetch_next_page() {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}

// ============================================================================
// IN-MEMORY MAILBOX
// ============================================================================

/// JSON export format: `{ "messages": [ { "id", "snippet", "headers" } ] }`
#[derive(Debug, Deserialize)]
struct MailboxExport {
    messages: Vec<Message>,
}

/// Offline mailbox backed by a list of messages.
///
/// Supports a small subset of Gmail search syntax, all case-insensitive:
/// - `from:<text>` → From header contains text
/// - `subject:"<phrase>"` → Subject contains phrase
/// - `"<phrase>"` or a bare word → snippet or Subject contains it
pub struct InMemoryMailbox {
    messages: Vec<Message>,
    page_size: usize,
}

impl InMemoryMailbox {
    pub fn new(messages: Vec<Message>, page_size: usize) -> Self {
        InMemoryMailbox {
            messages,
            page_size: page_size.max(1),
        }
    }

    /// Load a JSON mailbox export
    pub fn from_json_file(path: &Path, page_size: usize) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mailbox export: {}", path.display()))?;
        let export: MailboxExport = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse mailbox export: {}", path.display()))?;

        Ok(Self::new(export.messages, page_size))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn matching_ids(&self, query: &str) -> Vec<String> {
        let terms = parse_query(query);
        self.messages
            .iter()
            .filter(|m| terms.iter().all(|t| t.matches(m)))
            .map(|m| m.id.clone())
            .collect()
    }
}

impl MessageSource for InMemoryMailbox {
    fn list_messages(&self, query: &str, page_token: Option<&str>) -> Result<MessagePage> {
        let offset = match page_token {
            Some(token) => token
                .parse::<usize>()
                .with_context(|| format!("Invalid page token: {}", token))?,
            None => 0,
        };

        let ids = self.matching_ids(query);
        let end = (offset + self.page_size).min(ids.len());
        let page: Vec<String> = ids.get(offset..end).map(|s| s.to_vec()).unwrap_or_default();

        Ok(MessagePage {
            ids: page,
            next_page_token: (end < ids.len()).then(|| end.to_string()),
        })
    }

    fn get_message(&self, id: &str) -> Result<Message> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Message not found: {}", id))
    }
}

// ============================================================================
// QUERY SUBSET
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum QueryTerm {
    From(String),
    Subject(String),
    Text(String),
}

impl QueryTerm {
    fn matches(&self, message: &Message) -> bool {
        match self {
            QueryTerm::From(needle) => contains_ci(message.header("From").unwrap_or(""), needle),
            QueryTerm::Subject(needle) => contains_ci(message.subject(), needle),
            QueryTerm::Text(needle) => {
                contains_ci(&message.snippet, needle) || contains_ci(message.subject(), needle)
            }
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Split a query into terms, honoring double quotes
fn parse_query(query: &str) -> Vec<QueryTerm> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in query.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
        .into_iter()
        .map(|token| {
            if let Some(rest) = token.strip_prefix("from:") {
                QueryTerm::From(rest.to_string())
            } else if let Some(rest) = token.strip_prefix("subject:") {
                QueryTerm::Subject(rest.to_string())
            } else {
                QueryTerm::Text(token)
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;

    fn message(id: &str, from: &str, subject: &str, snippet: &str) -> Message {
        Message {
            id: id.to_string(),
            snippet: snippet.to_string(),
            headers: vec![Header::new("From", from), Header::new("Subject", subject)],
        }
    }

    fn numbered(count: usize) -> Vec<Message> {
        (0..count)
            .map(|i| message(&format!("m{}", i), "jobs@linkedin.com", "Hi", "application was sent to X"))
            .collect()
    }

    #[test]
    fn test_header_lookup_is_case_sensitive() {
        let m = message("1", "a@b.c", "Hello", "");
        assert_eq!(m.header("Subject"), Some("Hello"));
        assert_eq!(m.header("subject"), None);
        assert_eq!(Message::default().subject(), "");
    }

    #[test]
    fn test_parse_query_terms() {
        let terms = parse_query(r#"from:linkedin.com "application was sent to""#);
        assert_eq!(
            terms,
            vec![
                QueryTerm::From("linkedin.com".to_string()),
                QueryTerm::Text("application was sent to".to_string()),
            ]
        );

        let terms = parse_query(r#"subject:"Your application to""#);
        assert_eq!(terms, vec![QueryTerm::Subject("Your application to".to_string())]);
    }

    #[test]
    fn test_query_filters_messages() {
        let mailbox = InMemoryMailbox::new(
            vec![
                message("a", "jobs-noreply@linkedin.com", "Sent", "Your application was sent to Acme"),
                message("b", "hr@globex.com", "Your application to Engineer at Globex", "Thanks"),
                message("c", "friend@example.com", "Lunch?", "application was sent to nobody"),
            ],
            10,
        );

        let applied = mailbox
            .list_messages(r#"from:linkedin.com "application was sent to""#, None)
            .unwrap();
        assert_eq!(applied.ids, vec!["a"]);

        let rejected = mailbox.list_messages(r#"subject:"your application to""#, None).unwrap();
        assert_eq!(rejected.ids, vec!["b"]);
    }

    #[test]
    fn test_pagination_visits_every_page() {
        let mailbox = InMemoryMailbox::new(numbered(5), 2);

        let first = mailbox.list_messages("", None).unwrap();
        assert_eq!(first.ids, vec!["m0", "m1"]);
        assert_eq!(first.next_page_token.as_deref(), Some("2"));

        let ids: Vec<String> = message_ids(&mailbox, "").collect::<Result<_>>().unwrap();
        assert_eq!(ids, vec!["m0", "m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn test_message_ids_is_restartable() {
        let mailbox = InMemoryMailbox::new(numbered(3), 2);

        let first: Vec<String> = message_ids(&mailbox, "").collect::<Result<_>>().unwrap();
        let second: Vec<String> = message_ids(&mailbox, "").collect::<Result<_>>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_message_ids_empty_result() {
        let mailbox = InMemoryMailbox::new(Vec::new(), 2);
        assert!(mailbox.is_empty());
        assert_eq!(message_ids(&mailbox, "anything").count(), 0);
    }

    struct FailingSecondPage {
        calls: Cell<usize>,
    }

    impl MessageSource for FailingSecondPage {
        fn list_messages(&self, _query: &str, page_token: Option<&str>) -> Result<MessagePage> {
            self.calls.set(self.calls.get() + 1);
            match page_token {
                None => Ok(MessagePage {
                    ids: vec!["first".to_string()],
                    next_page_token: Some("next".to_string()),
                }),
                Some(_) => Err(anyhow::anyhow!("connection reset")),
            }
        }

        fn get_message(&self, id: &str) -> Result<Message> {
            Err(anyhow::anyhow!("unexpected fetch of {}", id))
        }
    }

    #[test]
    fn test_failed_page_is_yielded_once_then_ends() {
        let source = FailingSecondPage { calls: Cell::new(0) };
        let mut ids = message_ids(&source, "q");

        assert_eq!(ids.next().unwrap().unwrap(), "first");
        assert!(ids.next().unwrap().is_err());
        assert!(ids.next().is_none());
        assert_eq!(source.calls.get(), 2);
    }

    #[test]
    fn test_get_message_not_found() {
        let mailbox = InMemoryMailbox::new(numbered(1), 10);
        assert!(mailbox.get_message("m0").is_ok());
        assert!(mailbox.get_message("missing").is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"messages": [
                {{"id": "1", "snippet": "application was sent to Acme",
                  "headers": [{{"name": "Date", "value": "Mon, 13 Jan 2025 10:22:33 +0000"}}]}},
                {{"id": "2"}}
            ]}}"#
        )
        .unwrap();

        let mailbox = InMemoryMailbox::from_json_file(file.path(), 200).unwrap();
        assert_eq!(mailbox.len(), 2);
        assert!(!mailbox.is_empty());
        assert_eq!(mailbox.get_message("2").unwrap().snippet, "");
        assert_eq!(
            mailbox.get_message("1").unwrap().header("Date"),
            Some("Mon, 13 Jan 2025 10:22:33 +0000")
        );
    }

    #[test]
    fn test_from_json_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(InMemoryMailbox::from_json_file(file.path(), 200).is_err());
    }
}
