//! Portfolio chat server
//!
//! Backs the portfolio site's chatbot widget: a keyword-matching resolver
//! over an in-memory conversation store, exposed over HTTP.

mod api;
mod chat;
mod config;
mod shutdown;
mod store;

use api::{create_router, AppState};
use config::Config;
use std::sync::Arc;
use store::{ConversationStore, MemoryStore, SeedList};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    // Initialize logging
    let json_layer = config.log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
    });
    let text_layer = (!config.log_json).then(tracing_subscriber::fmt::layer);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_chat=info,tower_http=debug".into()),
        )
        .with(json_layer)
        .with(text_layer)
        .init();

    for key in &config.ignored {
        tracing::warn!(key = %key, "Ignoring invalid configuration value, using default");
    }

    // Load the keyword table
    let seeds = match &config.seed_file {
        Some(path) => {
            let seeds = SeedList::load(path)?;
            tracing::info!(path = %path.display(), entries = seeds.len(), "Loaded seed file");
            seeds
        }
        None => SeedList::builtin(),
    };
    let store = MemoryStore::new(seeds).with_keyword_match(config.keyword_match);
    let responses = store.get_all_chat_responses().await?.len();
    tracing::info!(
        responses,
        keyword_match = ?store.keyword_match(),
        "Conversation store initialized"
    );

    // Create application state
    let state = AppState::new(Arc::new(store));

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(compression),
    );

    // Start server
    let addr = config.addr();
    tracing::info!("Portfolio chat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
