use thiserror::Error;

use crate::{AuthenticatedIdentity, RequestIdentity, RoleCode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("permission denied: {required} role required")]
    Forbidden { required: String },
}

/// Require that the request carries a validated identity.
///
/// - No IO
/// - No panics
/// - Pure check on the published identity
pub fn require_authenticated(
    identity: &RequestIdentity,
) -> Result<&AuthenticatedIdentity, AuthzError> {
    identity.as_authenticated().ok_or(AuthzError::NotAuthenticated)
}

/// Require authentication and an exact role-code match.
pub fn require_role<'a>(
    identity: &'a RequestIdentity,
    required: &RoleCode,
) -> Result<&'a AuthenticatedIdentity, AuthzError> {
    let auth = require_authenticated(identity)?;
    if auth.role_code() == required {
        Ok(auth)
    } else {
        Err(AuthzError::Forbidden {
            required: required.to_string(),
        })
    }
}

/// Require authentication and a role equal to one of `allowed`.
pub fn require_any_role<'a>(
    identity: &'a RequestIdentity,
    allowed: &[RoleCode],
) -> Result<&'a AuthenticatedIdentity, AuthzError> {
    let auth = require_authenticated(identity)?;
    if allowed.iter().any(|role| role == auth.role_code()) {
        return Ok(auth);
    }

    let required = allowed
        .iter()
        .map(RoleCode::as_str)
        .collect::<Vec<_>>()
        .join("|");
    Err(AuthzError::Forbidden { required })
}
