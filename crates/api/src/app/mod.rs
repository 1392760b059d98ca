//! HTTP API application wiring (Axum router + shared state).
//!
//! Layout:
//! - `routes/`: HTTP routes + handlers, grouped by adapter chain
//! - `resolvers.rs`: operations behind the soft-fail `/query` endpoint
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use tollgate_auth::{AuthService, Directory};

use crate::middleware::AuthState;

pub mod dto;
pub mod errors;
pub mod resolvers;
pub mod routes;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub directory: Arc<dyn Directory>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, directory: Arc<dyn Directory>) -> Self {
        Self { auth, directory }
    }
}

/// Run blocking work (argon2 hashing and verification) on the blocking pool.
pub async fn run_blocking<T, F>(f: F) -> Result<T, axum::response::Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "blocking task failed");
        errors::json_error(
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "internal error",
        )
    })
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: AppState) -> Router {
    let auth_state = AuthState {
        auth: state.auth.clone(),
    };

    Router::new()
        .merge(routes::public_router())
        .merge(routes::protected_router(auth_state.clone()))
        .merge(routes::optional_router(auth_state))
        .layer(ServiceBuilder::new().layer(Extension(state)))
}
