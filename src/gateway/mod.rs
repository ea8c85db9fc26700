//! HTTP gateway
//!
//! Thin axum surface over the transfer core: submit a transfer, read a bank
//! ref's history, read its category buckets, check health. All responses use
//! the `ApiResponse { code, data, msg }` envelope.

pub mod handlers;
pub mod state;
pub mod types;

pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/transfers", post(handlers::create_transfer))
        .route(
            "/v1/banks/{bank_ref}/transactions",
            get(handlers::list_bank_transactions),
        )
        .route(
            "/v1/banks/{bank_ref}/categories",
            get(handlers::bank_categories),
        )
        .with_state(state)
}
