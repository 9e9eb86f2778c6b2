//! Record types held by the conversation store

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Registered user. Not touched by the anonymous chat flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// Fields needed to register a user
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// One recorded chat turn, inbound or outbound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    /// `None` for anonymous senders
    pub user_id: Option<i64>,
    pub message: String,
    pub is_bot: bool,
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
}

/// Fields supplied when recording a chat message
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub user_id: Option<i64>,
    pub message: String,
    pub is_bot: bool,
    pub timestamp: String,
}

impl NewChatMessage {
    /// Anonymous message stamped with the current time
    pub fn anonymous(message: impl Into<String>, is_bot: bool) -> Self {
        Self {
            user_id: None,
            message: message.into(),
            is_bot,
            timestamp: format_timestamp(Utc::now()),
        }
    }
}

/// Canned reply keyed by a keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: i64,
    pub keyword: String,
    pub response: String,
}

/// Keyword/response pair without an identifier; also the seed file row format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChatResponse {
    pub keyword: String,
    pub response: String,
}

impl NewChatResponse {
    pub fn new(keyword: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            response: response.into(),
        }
    }
}

/// How a stored keyword is compared against a lookup term.
///
/// Both modes ignore ASCII and Unicode case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeywordMatch {
    /// Stored keyword equals the term
    #[default]
    Exact,
    /// Stored keyword contains the term as a substring
    Contains,
}

impl KeywordMatch {
    /// Parse a configuration value (`exact` / `contains`)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" => Some(Self::Exact),
            "contains" | "substring" => Some(Self::Contains),
            _ => None,
        }
    }

    /// Compare an already lower-cased stored keyword with a lower-cased term
    pub fn matches(self, keyword_lower: &str, term_lower: &str) -> bool {
        match self {
            Self::Exact => keyword_lower == term_lower,
            Self::Contains => keyword_lower.contains(term_lower),
        }
    }
}

/// Millisecond-precision RFC 3339 string, e.g. `2024-05-01T12:00:00.000Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
