use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tollgate_core::{RoleId, UserId};

use crate::{AuthError, RoleCode, User};

/// Identity claims embedded in every issued token.
///
/// Standard JWT names are used on the wire (`sub`, `iat`, `exp`, `jti`);
/// timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject: the user id rendered as a string.
    pub sub: String,

    pub user_id: UserId,

    pub email: String,

    pub role_id: RoleId,

    pub role_code: RoleCode,

    /// Unique per issuance, so two tokens minted in the same second differ.
    pub jti: Uuid,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl IdentityClaims {
    /// Claims for `user`, valid for `ttl` from `now` (truncated to whole seconds).
    pub fn for_user(user: &User, now: DateTime<Utc>, ttl: Duration) -> Self {
        let issued_at = now.trunc_subsecs(0);
        Self {
            sub: user.id.to_string(),
            user_id: user.id,
            email: user.email.clone(),
            role_id: user.role.id,
            role_code: user.role.code.clone(),
            jti: Uuid::now_v7(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }
}

/// Tolerated clock skew between the issuer and the validating host.
pub const ISSUED_AT_LEEWAY: Duration = Duration::seconds(5);

/// Deterministically validate the claims' time window and internal consistency.
///
/// Signature verification happens in the codec before this is called.
pub fn validate_claims(claims: &IdentityClaims, now: DateTime<Utc>) -> Result<(), AuthError> {
    if claims.expires_at <= claims.issued_at {
        return Err(AuthError::MalformedToken);
    }
    if claims.sub != claims.user_id.to_string() {
        return Err(AuthError::MalformedToken);
    }
    if now + ISSUED_AT_LEEWAY < claims.issued_at {
        return Err(AuthError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(AuthError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn user() -> User {
        User::with_password_hash(
            UserId::new(42),
            "admin@example.com",
            "Admin",
            "",
            Role::new(RoleId::new(1), "Administrator", RoleCode::ADMIN),
        )
    }

    #[test]
    fn claims_carry_user_and_role() {
        let now = Utc::now();
        let claims = IdentityClaims::for_user(&user(), now, Duration::hours(24));
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id, UserId::new(42));
        assert_eq!(claims.role_code, RoleCode::ADMIN);
        assert_eq!(claims.expires_at - claims.issued_at, Duration::hours(24));
        assert!(claims.issued_at <= now);
    }

    #[test]
    fn time_window_is_enforced() {
        let now = Utc::now();
        let claims = IdentityClaims::for_user(&user(), now, Duration::minutes(10));

        assert_eq!(validate_claims(&claims, now), Ok(()));
        assert_eq!(
            validate_claims(&claims, claims.issued_at - Duration::seconds(1)),
            Ok(())
        );
        assert_eq!(
            validate_claims(&claims, claims.issued_at - Duration::minutes(1)),
            Err(AuthError::NotYetValid)
        );
        assert_eq!(
            validate_claims(&claims, claims.expires_at),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn inverted_window_is_malformed() {
        let now = Utc::now();
        let mut claims = IdentityClaims::for_user(&user(), now, Duration::minutes(10));
        claims.expires_at = claims.issued_at;
        assert_eq!(validate_claims(&claims, now), Err(AuthError::MalformedToken));
    }

    #[test]
    fn wire_format_uses_standard_names() {
        let claims = IdentityClaims::for_user(&user(), Utc::now(), Duration::hours(1));
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "42");
        assert_eq!(json["user_id"], 42);
        assert_eq!(json["role_id"], 1);
        assert_eq!(json["role_code"], "ADMIN");
        assert_eq!(json["iat"], claims.issued_at.timestamp());
        assert_eq!(json["exp"], claims.expires_at.timestamp());
    }
}
