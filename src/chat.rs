//! Chat resolver
//!
//! Turns one utterance into one canned reply by scanning its tokens against
//! the keyword table, and records both sides of the turn.

use crate::store::{
    ChatMessage, ConversationStore, NewChatMessage, StoreError, DEFAULT_KEYWORD,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Tokens shorter than this (in chars) never take part in matching
pub const MIN_TOKEN_CHARS: usize = 3;

/// Reply used when even the `"default"` entry is missing
pub const FALLBACK_RESPONSE: &str =
    "I'm not sure how to answer that. Could you ask something else?";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Invalid message: {0}")]
    Validation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Both recorded sides of one exchange
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub user_message: ChatMessage,
    pub bot_message: ChatMessage,
}

/// Stateless resolver over a conversation store
pub struct ChatResolver {
    store: Arc<dyn ConversationStore>,
}

impl ChatResolver {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Record `utterance`, pick a reply, record the reply.
    ///
    /// Blank input is rejected before anything is written. Only a failure to
    /// record either message is returned as an error.
    pub async fn handle_chat_turn(&self, utterance: &str) -> Result<ChatTurn, ChatError> {
        if utterance.trim().is_empty() {
            return Err(ChatError::Validation("message must not be empty"));
        }

        let user_message = self
            .store
            .create_chat_message(NewChatMessage::anonymous(utterance, false))
            .await?;

        let reply = self.resolve_reply(utterance).await;

        let bot_message = self
            .store
            .create_chat_message(NewChatMessage::anonymous(reply, true))
            .await?;

        Ok(ChatTurn {
            user_message,
            bot_message,
        })
    }

    /// Pick the reply text. Lookup failures degrade to the built-in fallback
    /// so the turn is still completed.
    async fn resolve_reply(&self, utterance: &str) -> String {
        match self.lookup_reply(utterance).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                tracing::warn!("Default chat response missing, using built-in fallback");
                FALLBACK_RESPONSE.to_string()
            }
            Err(err) => {
                tracing::error!(error = %err, "Chat response lookup failed, using built-in fallback");
                FALLBACK_RESPONSE.to_string()
            }
        }
    }

    /// First token with a matching keyword wins; otherwise the `"default"` entry
    async fn lookup_reply(&self, utterance: &str) -> Result<Option<String>, StoreError> {
        for token in candidate_tokens(utterance) {
            if let Some(found) = self.store.get_chat_response_by_keyword(&token).await? {
                tracing::debug!(token = %token, keyword = %found.keyword, "Keyword matched");
                return Ok(Some(found.response));
            }
        }

        // Exact match regardless of the store's keyword mode
        let default = self
            .store
            .get_all_chat_responses()
            .await?
            .into_iter()
            .find(|r| r.keyword.eq_ignore_ascii_case(DEFAULT_KEYWORD));
        if default.is_some() {
            tracing::debug!("No keyword matched, using default response");
        }
        Ok(default.map(|r| r.response))
    }
}

/// Lower-cased whitespace tokens long enough to match, in utterance order
pub fn candidate_tokens(utterance: &str) -> impl Iterator<Item = String> + '_ {
    utterance
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
}
