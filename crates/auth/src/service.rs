//! Auth service: issue, validate and revoke bearer tokens.

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;

use tollgate_core::UserId;

use crate::user::normalize_email;
use crate::{
    AuthConfig, AuthError, Clock, Hs256Codec, IdentityClaims, LoginError, RevocationStore,
    SystemClock, TokenCodec, User, UserLookup,
};

/// Composes the token codec and the revocation store.
///
/// Constructed once and shared by `Arc`; independent instances (e.g. one per
/// test) never observe each other's revocations.
pub struct AuthService {
    codec: Arc<dyn TokenCodec>,
    revocations: Arc<RevocationStore>,
    clock: Arc<dyn Clock>,
    token_ttl: Duration,
}

/// Result of a successful credential login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginGrant {
    pub token: String,
    pub user: User,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let codec = Arc::new(Hs256Codec::new(config.secret().as_bytes()));
        let revocations = Arc::new(RevocationStore::new(
            config.revocation_retention(),
            config.sweep_interval(),
            clock.clone(),
        ));
        Self::from_parts(codec, revocations, clock, config.token_ttl())
    }

    pub fn from_parts(
        codec: Arc<dyn TokenCodec>,
        revocations: Arc<RevocationStore>,
        clock: Arc<dyn Clock>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            codec,
            revocations,
            clock,
            token_ttl,
        }
    }

    pub fn revocations(&self) -> &Arc<RevocationStore> {
        &self.revocations
    }

    /// Issue a token for a resolved subject. `None` (an unresolved lookup)
    /// is rejected with [`AuthError::NilSubject`].
    pub fn issue(&self, subject: Option<&User>) -> Result<String, AuthError> {
        let user = subject.ok_or(AuthError::NilSubject)?;
        let claims = IdentityClaims::for_user(user, self.clock.now(), self.token_ttl);
        let token = self.codec.issue(&claims)?;
        tracing::debug!(user_id = %user.id, role = %user.role.code, "issued token");
        Ok(token)
    }

    /// Validate a token. A revoked token is rejected before any signature work.
    pub fn validate(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        if self.revocations.is_revoked(token) {
            return Err(AuthError::Revoked);
        }
        self.codec.decode(token, self.clock.now())
    }

    /// Revoke a token. Idempotent; unknown or already-revoked tokens are fine.
    pub fn revoke(&self, token: &str) {
        if self.revocations.revoke(token) {
            tracing::debug!(revoked = self.revocations.len(), "token revoked");
        }
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.revocations.is_revoked(token)
    }

    pub fn extract_subject_id(&self, token: &str) -> Result<UserId, AuthError> {
        self.validate(token).map(|claims| claims.user_id)
    }

    /// Verify email/password against the user directory and issue a token.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub fn login<U: UserLookup + ?Sized>(
        &self,
        users: &U,
        email: &str,
        password: &str,
    ) -> Result<LoginGrant, LoginError> {
        let email = normalize_email(email).map_err(|_| LoginError::InvalidCredentials)?;

        let user = match users.user_by_email(&email) {
            Ok(user) => user,
            Err(e) if e.is_not_found() => return Err(LoginError::InvalidCredentials),
            Err(e) => {
                tracing::error!(error = %e, "user lookup failed during login");
                return Err(LoginError::Lookup(e));
            }
        };

        if !user.verify_password(password) {
            tracing::info!(user_id = %user.id, "login rejected: wrong password");
            return Err(LoginError::InvalidCredentials);
        }

        let token = self.issue(Some(&user))?;
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(LoginGrant { token, user })
    }
}
