//! Conversation store
//!
//! In-memory keeping of users, chat messages and keyword responses for the
//! lifetime of the process. Nothing survives a restart; the response table is
//! rebuilt from the seed list on construction.

mod schema;
mod seed;
mod traits;

pub use schema::*;
pub use seed::{SeedError, SeedList, DEFAULT_KEYWORD};
pub use traits::ConversationStore;

use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Rows of one record kind plus its identifier counter.
///
/// The counter lives under the same lock as the rows so that assigning an id
/// and inserting the row happen in one critical section.
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.push(row.clone());
        row
    }
}

impl Table<ChatResponse> {
    /// Replace all rows with the seed list. Ids keep counting up.
    fn reseed(&mut self, seeds: &SeedList) {
        self.rows.clear();
        for entry in seeds.entries() {
            self.insert_with(|id| ChatResponse {
                id,
                keyword: entry.keyword.clone(),
                response: entry.response.clone(),
            });
        }
    }
}

/// Thread-safe in-memory store
#[derive(Debug)]
pub struct MemoryStore {
    users: RwLock<Table<User>>,
    messages: RwLock<Table<ChatMessage>>,
    responses: RwLock<Table<ChatResponse>>,
    seeds: SeedList,
    keyword_match: KeywordMatch,
}

impl MemoryStore {
    /// Create a store whose response table is loaded from `seeds`
    pub fn new(seeds: SeedList) -> Self {
        let mut responses = Table::default();
        responses.reseed(&seeds);

        Self {
            users: RwLock::new(Table::default()),
            messages: RwLock::new(Table::default()),
            responses: RwLock::new(responses),
            seeds,
            keyword_match: KeywordMatch::default(),
        }
    }

    /// Select how keyword lookups compare stored keywords
    #[must_use]
    pub fn with_keyword_match(mut self, keyword_match: KeywordMatch) -> Self {
        self.keyword_match = keyword_match;
        self
    }

    pub fn keyword_match(&self) -> KeywordMatch {
        self.keyword_match
    }
}

#[cfg(test)]
impl MemoryStore {
    /// Drop response rows directly, bypassing seed validation
    pub(crate) fn retain_chat_responses(&self, keep: impl Fn(&ChatResponse) -> bool) {
        let mut responses = self.responses.write().unwrap();
        responses.rows.retain(|r| keep(r));
    }

    /// Poison the message table lock so every later access fails
    pub(crate) fn poison_messages(&self) {
        poison(&self.messages);
    }

    /// Poison the response table lock so every keyword lookup fails
    pub(crate) fn poison_responses(&self) {
        poison(&self.responses);
    }
}

#[cfg(test)]
fn poison<T: Send + Sync>(lock: &RwLock<T>) {
    std::thread::scope(|s| {
        let _ = s
            .spawn(|| {
                let _guard = lock.write().unwrap();
                panic!("poisoning table lock");
            })
            .join();
    });
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(SeedList::builtin())
    }
}

fn read<'a, T>(lock: &'a RwLock<T>, table: &'static str) -> StoreResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| StoreError::LockPoisoned(table))
}

fn write<'a, T>(
    lock: &'a RwLock<T>,
    table: &'static str,
) -> StoreResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| StoreError::LockPoisoned(table))
}

#[async_trait]
impl ConversationStore for MemoryStore {
    // ==================== Users ====================

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        let users = read(&self.users, "users")?;
        Ok(users.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = read(&self.users, "users")?;
        Ok(users.rows.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut users = write(&self.users, "users")?;
        Ok(users.insert_with(|id| User {
            id,
            username: user.username,
            password: user.password,
        }))
    }

    // ==================== Chat Messages ====================

    async fn get_chat_messages(&self, user_id: Option<i64>) -> StoreResult<Vec<ChatMessage>> {
        let messages = read(&self.messages, "messages")?;
        Ok(match user_id {
            Some(filter) => messages
                .rows
                .iter()
                .filter(|m| m.user_id == Some(filter))
                .cloned()
                .collect(),
            None => messages.rows.clone(),
        })
    }

    async fn create_chat_message(&self, message: NewChatMessage) -> StoreResult<ChatMessage> {
        let mut messages = write(&self.messages, "messages")?;
        Ok(messages.insert_with(|id| ChatMessage {
            id,
            user_id: message.user_id,
            message: message.message,
            is_bot: message.is_bot,
            timestamp: message.timestamp,
        }))
    }

    // ==================== Chat Responses ====================

    async fn get_all_chat_responses(&self) -> StoreResult<Vec<ChatResponse>> {
        let responses = read(&self.responses, "responses")?;
        Ok(responses.rows.clone())
    }

    async fn get_chat_response_by_keyword(
        &self,
        keyword: &str,
    ) -> StoreResult<Option<ChatResponse>> {
        let term = keyword.to_lowercase();
        let responses = read(&self.responses, "responses")?;
        Ok(responses
            .rows
            .iter()
            .find(|r| self.keyword_match.matches(&r.keyword.to_lowercase(), &term))
            .cloned())
    }

    async fn create_chat_response(&self, response: NewChatResponse) -> StoreResult<ChatResponse> {
        let mut responses = write(&self.responses, "responses")?;
        Ok(responses.insert_with(|id| ChatResponse {
            id,
            keyword: response.keyword,
            response: response.response,
        }))
    }

    async fn initialize_chat_responses(&self) -> StoreResult<()> {
        let mut responses = write(&self.responses, "responses")?;
        responses.reseed(&self.seeds);
        tracing::debug!(count = responses.rows.len(), "Chat responses initialized");
        Ok(())
    }
}
