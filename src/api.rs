//! HTTP API for the portfolio chatbot

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::chat::ChatResolver;
use crate::store::ConversationStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ConversationStore>,
    pub resolver: Arc<ChatResolver>,
}

impl AppState {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self {
            resolver: Arc::new(ChatResolver::new(store.clone())),
            store,
        }
    }
}
