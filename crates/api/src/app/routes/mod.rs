use axum::{
    Router,
    routing::{get, post},
};

use tollgate_auth::RoleCode;

use crate::middleware::{self, AuthState, RequiredRoles};

pub mod auth;
pub mod query;
pub mod system;
pub mod users;

/// Routes that need no credentials at all.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
}

/// Hard-fail chain: every route answers `401` without a valid token.
pub fn protected_router(auth_state: AuthState) -> Router {
    let admin = Router::new()
        .route("/admin/users", get(users::list_users))
        .route("/admin/users/:id", get(users::get_user))
        .route_layer(axum::middleware::from_fn_with_state(
            RequiredRoles::new([RoleCode::ADMIN]),
            middleware::require_role,
        ));

    Router::new()
        .route("/users/profile", get(users::profile).put(users::update_profile))
        .route("/users/change-password", post(users::change_password))
        .route("/auth/logout", post(auth::logout))
        .merge(admin)
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::require_auth,
        ))
}

/// Soft-fail chain: anonymous callers are let through and resolvers decide.
pub fn optional_router(auth_state: AuthState) -> Router {
    Router::new()
        .route("/query", post(query::execute))
        .route("/whoami", get(system::whoami))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::optional_auth,
        ))
}
