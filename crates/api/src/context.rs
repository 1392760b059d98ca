//! Typed access to the identity published by the auth adapters.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{Extensions, StatusCode, request::Parts},
    response::Response,
};

use tollgate_auth::{AuthenticatedIdentity, RequestIdentity};

use crate::app::errors::json_error;

/// Whether an adapter has published an identity for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySlot<'a> {
    Present(&'a RequestIdentity),
    Absent,
}

impl<'a> IdentitySlot<'a> {
    pub fn from_extensions(extensions: &'a Extensions) -> Self {
        match extensions.get::<RequestIdentity>() {
            Some(identity) => Self::Present(identity),
            None => Self::Absent,
        }
    }
}

/// The request identity, authenticated or anonymous.
///
/// Rejects with `500` when no adapter ran for the route: that is a wiring
/// bug, not a client error.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub RequestIdentity);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentIdentity {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match IdentitySlot::from_extensions(&parts.extensions) {
            IdentitySlot::Present(identity) => Ok(Self(identity.clone())),
            IdentitySlot::Absent => {
                tracing::error!(path = %parts.uri.path(), "no identity adapter installed for route");
                Err(json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "identity context unavailable",
                ))
            }
        }
    }
}

/// An authenticated identity; anonymous requests are rejected with `401`.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedIdentity);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Authenticated {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentIdentity(identity) = CurrentIdentity::from_request_parts(parts, state).await?;
        match identity {
            RequestIdentity::Authenticated(auth) => Ok(Self(auth)),
            RequestIdentity::Anonymous => Err(crate::middleware::unauthorized()),
        }
    }
}
