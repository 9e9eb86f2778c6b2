//! Repository trait for the conversation store
//!
//! The resolver and handlers depend only on this trait, so a table-backed
//! adapter can replace [`super::MemoryStore`] without touching them.

use super::schema::{
    ChatMessage, ChatResponse, NewChatMessage, NewChatResponse, NewUser, User,
};
use super::StoreResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Users, chat messages and keyword responses
#[async_trait]
pub trait ConversationStore: Send + Sync {
    // ==================== Users ====================

    #[allow(dead_code)] // API completeness
    async fn get_user(&self, id: i64) -> StoreResult<Option<User>>;

    /// Exact, case-sensitive username lookup
    #[allow(dead_code)] // API completeness
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Register a user. Username uniqueness is the caller's concern.
    #[allow(dead_code)] // API completeness
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    // ==================== Chat Messages ====================

    /// All messages in insertion order, or only those tagged with `user_id`
    async fn get_chat_messages(&self, user_id: Option<i64>) -> StoreResult<Vec<ChatMessage>>;

    async fn create_chat_message(&self, message: NewChatMessage) -> StoreResult<ChatMessage>;

    // ==================== Chat Responses ====================

    async fn get_all_chat_responses(&self) -> StoreResult<Vec<ChatResponse>>;

    /// Case-insensitive lookup; the earliest inserted match wins
    async fn get_chat_response_by_keyword(&self, keyword: &str)
        -> StoreResult<Option<ChatResponse>>;

    #[allow(dead_code)] // Runtime insertion is allowed but unused by the server
    async fn create_chat_response(&self, response: NewChatResponse) -> StoreResult<ChatResponse>;

    /// Clear the response table and reload it from the seed list
    #[allow(dead_code)] // The constructor seeds directly
    async fn initialize_chat_responses(&self) -> StoreResult<()>;
}

// ============================================================================
// Arc implementation for trait objects
// ============================================================================

#[async_trait]
impl<T: ConversationStore + ?Sized> ConversationStore for Arc<T> {
    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        (**self).get_user(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        (**self).get_user_by_username(username).await
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        (**self).create_user(user).await
    }

    async fn get_chat_messages(&self, user_id: Option<i64>) -> StoreResult<Vec<ChatMessage>> {
        (**self).get_chat_messages(user_id).await
    }

    async fn create_chat_message(&self, message: NewChatMessage) -> StoreResult<ChatMessage> {
        (**self).create_chat_message(message).await
    }

    async fn get_all_chat_responses(&self) -> StoreResult<Vec<ChatResponse>> {
        (**self).get_all_chat_responses().await
    }

    async fn get_chat_response_by_keyword(
        &self,
        keyword: &str,
    ) -> StoreResult<Option<ChatResponse>> {
        (**self).get_chat_response_by_keyword(keyword).await
    }

    async fn create_chat_response(&self, response: NewChatResponse) -> StoreResult<ChatResponse> {
        (**self).create_chat_response(response).await
    }

    async fn initialize_chat_responses(&self) -> StoreResult<()> {
        (**self).initialize_chat_responses().await
    }
}
