use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use tollgate_auth::{AuthzError, LoginError, UserError};
use tollgate_core::LookupError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    match err {
        AuthzError::NotAuthenticated => crate::middleware::unauthorized(),
        AuthzError::Forbidden { .. } => json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string()),
    }
}

pub fn login_error_to_response(err: LoginError) -> axum::response::Response {
    match err {
        LoginError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", err.to_string())
        }
        LoginError::Lookup(e) => lookup_error_to_response(e),
        LoginError::Token(e) => {
            tracing::error!(error = %e, "token issuance failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                "failed to issue token",
            )
        }
    }
}

pub fn lookup_error_to_response(err: LookupError) -> axum::response::Response {
    match err {
        LookupError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        LookupError::Store(msg) => {
            tracing::error!(error = %msg, "directory lookup failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "directory unavailable")
        }
    }
}

pub fn user_error_to_response(err: UserError) -> axum::response::Response {
    match err {
        UserError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        UserError::WrongPassword => {
            json_error(StatusCode::BAD_REQUEST, "wrong_password", err.to_string())
        }
        UserError::Password(e) => {
            tracing::error!(error = %e, "password hashing failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "password_error",
                "failed to process password",
            )
        }
    }
}
