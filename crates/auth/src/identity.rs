//! Typed per-request identity shared by both adapter styles.

use serde::Serialize;

use tollgate_core::{RoleId, UserId};

use crate::{IdentityClaims, RoleCode};

/// The identity published for one request.
///
/// Both the hard-fail and the soft-fail adapter produce this same shape, so
/// authorization checks do not care which pipeline a request came through.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestIdentity {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedIdentity),
}

impl RequestIdentity {
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    pub fn authenticated(claims: IdentityClaims, token: impl Into<String>) -> Self {
        Self::Authenticated(AuthenticatedIdentity::from_claims(claims, token))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn as_authenticated(&self) -> Option<&AuthenticatedIdentity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Anonymous => None,
        }
    }

    /// Client-safe view (never includes the raw token).
    pub fn summary(&self) -> IdentitySummary {
        match self {
            Self::Anonymous => IdentitySummary {
                authenticated: false,
                user_id: None,
                email: None,
                role_id: None,
                role_code: None,
            },
            Self::Authenticated(id) => IdentitySummary {
                authenticated: true,
                user_id: Some(id.user_id),
                email: Some(id.email.clone()),
                role_id: Some(id.role_id),
                role_code: Some(id.role_code.clone()),
            },
        }
    }
}

/// A validated identity plus the raw token it was read from.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    user_id: UserId,
    email: String,
    role_id: RoleId,
    role_code: RoleCode,
    token: String,
}

impl AuthenticatedIdentity {
    pub fn from_claims(claims: IdentityClaims, token: impl Into<String>) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role_id: claims.role_id,
            role_code: claims.role_code,
            token: token.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    pub fn role_code(&self) -> &RoleCode {
        &self.role_code
    }

    /// The bearer token this identity was validated from (needed for logout).
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl core::fmt::Debug for AuthenticatedIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthenticatedIdentity")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("role_id", &self.role_id)
            .field("role_code", &self.role_code)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentitySummary {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_code: Option<RoleCode>,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::{Role, User};

    fn claims() -> IdentityClaims {
        let user = User::with_password_hash(
            UserId::new(42),
            "admin@example.com",
            "Admin",
            "",
            Role::new(RoleId::new(1), "Administrator", RoleCode::ADMIN),
        );
        IdentityClaims::for_user(&user, Utc::now(), Duration::hours(1))
    }

    #[test]
    fn anonymous_summary_is_just_the_flag() {
        let json = serde_json::to_value(RequestIdentity::anonymous().summary()).unwrap();
        assert_eq!(json, serde_json::json!({ "authenticated": false }));
    }

    #[test]
    fn authenticated_identity_exposes_claims_but_hides_token() {
        let identity = RequestIdentity::authenticated(claims(), "raw.jwt.value");
        let auth = identity.as_authenticated().unwrap();
        assert_eq!(auth.user_id(), UserId::new(42));
        assert_eq!(auth.role_code(), &RoleCode::ADMIN);
        assert_eq!(auth.token(), "raw.jwt.value");

        assert!(!format!("{identity:?}").contains("raw.jwt.value"));
        let json = serde_json::to_string(&identity.summary()).unwrap();
        assert!(!json.contains("raw.jwt.value"));
        assert!(json.contains("\"authenticated\":true"));
    }
}
