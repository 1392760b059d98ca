use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use tollgate_auth::{Directory, RoleCode};

use crate::app::{AppState, dto, errors, run_blocking};
use crate::context::Authenticated;

pub async fn login(
    Extension(state): Extension<AppState>,
    Json(body): Json<dto::LoginRequest>,
) -> Response {
    let result = run_blocking(move || {
        state
            .auth
            .login(state.directory.as_ref(), &body.email, &body.password)
    })
    .await;

    match result {
        Err(resp) => resp,
        Ok(Ok(grant)) => (StatusCode::OK, Json(grant)).into_response(),
        Ok(Err(e)) => errors::login_error_to_response(e),
    }
}

/// Self-service sign-up. New accounts always get the `CUSTOMER` role.
pub async fn register(
    Extension(state): Extension<AppState>,
    Json(body): Json<dto::RegisterRequest>,
) -> Response {
    let result = run_blocking(move || {
        state.directory.register(
            &body.email,
            &body.full_name,
            &body.password,
            &RoleCode::CUSTOMER,
        )
    })
    .await;

    match result {
        Err(resp) => resp,
        Ok(Ok(user)) => {
            tracing::info!(user_id = %user.id, "user registered");
            (StatusCode::CREATED, Json(user)).into_response()
        }
        Ok(Err(e)) => errors::user_error_to_response(e),
    }
}

/// Revoke the token that authenticated this request.
pub async fn logout(
    Extension(state): Extension<AppState>,
    Authenticated(identity): Authenticated,
) -> Response {
    state.auth.revoke(identity.token());
    tracing::info!(user_id = %identity.user_id(), "user logged out");
    (StatusCode::OK, Json(json!({ "message": "logged out" }))).into_response()
}
