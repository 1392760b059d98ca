//! Bearer-token adapters.
//!
//! Two pipelines share one extraction routine:
//! - `require_auth` (hard-fail): any credential problem ends the request with `401`
//! - `optional_auth` (soft-fail): any credential problem publishes `Anonymous`
//!   and the request continues
//!
//! Both publish a [`RequestIdentity`] in the request extensions.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use tollgate_auth::{AuthService, AuthzError, RequestIdentity, RoleCode, require_any_role};

use crate::app::errors::{authz_error_to_response, json_error};
use crate::context::IdentitySlot;

#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
}

/// Roles accepted by a `require_role` layer.
#[derive(Debug, Clone)]
pub struct RequiredRoles(pub Arc<[RoleCode]>);

impl RequiredRoles {
    pub fn new(roles: impl IntoIterator<Item = RoleCode>) -> Self {
        Self(roles.into_iter().collect())
    }
}

/// Why no bearer token could be read from the headers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BearerError {
    #[error("authorization header missing")]
    Missing,

    #[error("authorization header is not valid UTF-8")]
    NotUtf8,

    #[error("authorization scheme is not Bearer")]
    WrongScheme,

    #[error("bearer token is empty")]
    EmptyToken,
}

pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, BearerError> {
    let header = headers.get(AUTHORIZATION).ok_or(BearerError::Missing)?;

    let header = header.to_str().map_err(|_| BearerError::NotUtf8)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(BearerError::WrongScheme)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(BearerError::EmptyToken);
    }

    Ok(token)
}

/// Uniform rejection of the hard-fail chain. The failure kind is never exposed.
pub fn unauthorized() -> Response {
    json_error(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "invalid or missing credentials",
    )
}

pub async fn require_auth(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token.to_owned(),
        Err(e) => {
            tracing::debug!(reason = %e, "rejecting request without usable credentials");
            return unauthorized();
        }
    };

    let claims = match state.auth.validate(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(reason = %e, "rejecting request with invalid token");
            return unauthorized();
        }
    };

    req.extensions_mut()
        .insert(RequestIdentity::authenticated(claims, token));

    next.run(req).await
}

pub async fn optional_auth(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let identity = match extract_bearer(req.headers()) {
        Err(BearerError::Missing) => RequestIdentity::anonymous(),
        Err(e) => {
            tracing::debug!(reason = %e, "continuing anonymously");
            RequestIdentity::anonymous()
        }
        Ok(token) => match state.auth.validate(token) {
            Ok(claims) => RequestIdentity::authenticated(claims, token),
            Err(e) => {
                tracing::debug!(reason = %e, "continuing anonymously");
                RequestIdentity::anonymous()
            }
        },
    };

    req.extensions_mut().insert(identity);

    next.run(req).await
}

/// Role guard for the hard-fail chain. Must run after `require_auth`.
pub async fn require_role(
    State(roles): State<RequiredRoles>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let IdentitySlot::Present(identity) = IdentitySlot::from_extensions(req.extensions()) else {
        return unauthorized();
    };

    let outcome = require_any_role(identity, &roles.0).map(|_| ());
    match outcome {
        Ok(()) => next.run(req).await,
        Err(e) => {
            if let AuthzError::Forbidden { .. } = e {
                tracing::info!(error = %e, path = %req.uri().path(), "role check failed");
            }
            authz_error_to_response(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &'static [u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted_and_trimmed() {
        assert_eq!(extract_bearer(&headers(b"Bearer abc.def.ghi ")), Ok("abc.def.ghi"));
    }

    #[test]
    fn missing_header_is_reported() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(BearerError::Missing));
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert_eq!(extract_bearer(&headers(b"Basic abc")), Err(BearerError::WrongScheme));
        assert_eq!(extract_bearer(&headers(b"bearer abc")), Err(BearerError::WrongScheme));
        assert_eq!(extract_bearer(&headers(b"abc")), Err(BearerError::WrongScheme));
    }

    #[test]
    fn empty_token_is_rejected() {
        assert_eq!(extract_bearer(&headers(b"Bearer    ")), Err(BearerError::EmptyToken));
    }

    #[test]
    fn non_utf8_header_is_rejected() {
        assert_eq!(
            extract_bearer(&headers(b"Bearer \xff\xfe")),
            Err(BearerError::NotUtf8)
        );
    }

    #[test]
    fn required_roles_collects_codes() {
        let roles = RequiredRoles::new([RoleCode::ADMIN, RoleCode::CUSTOMER]);
        assert_eq!(roles.0.len(), 2);
    }
}
