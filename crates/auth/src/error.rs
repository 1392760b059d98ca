use thiserror::Error;

use tollgate_core::LookupError;

/// Token issuance and validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed token")]
    MalformedToken,

    #[error("token signature mismatch")]
    SignatureMismatch,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("token has been revoked")]
    Revoked,

    #[error("unexpected signing algorithm '{found}'")]
    WrongAlgorithm { found: String },

    #[error("cannot issue a token for an unresolved subject")]
    NilSubject,

    #[error("failed to sign token: {0}")]
    SigningFailure(String),
}

/// Credential login failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Unknown email or wrong password; the two are not distinguished.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user lookup failed: {0}")]
    Lookup(LookupError),

    #[error(transparent)]
    Token(#[from] AuthError),
}
