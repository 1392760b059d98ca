//! Signed token encoding and decoding (HS256 JWT).

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;

use crate::{AuthError, IdentityClaims, validate_claims};

/// Stateless codec between identity claims and signed token strings.
pub trait TokenCodec: Send + Sync {
    fn issue(&self, claims: &IdentityClaims) -> Result<String, AuthError>;

    /// Verify algorithm, signature and time window; no side effects.
    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaims, AuthError>;
}

const ALGORITHM: Algorithm = Algorithm::HS256;
const ALGORITHM_NAME: &str = "HS256";

/// HMAC-SHA256 codec. Accepts nothing but HS256 tokens.
pub struct Hs256Codec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256Codec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against the injected clock in `validate_claims`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl core::fmt::Debug for Hs256Codec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Codec").finish_non_exhaustive()
    }
}

impl TokenCodec for Hs256Codec {
    fn issue(&self, claims: &IdentityClaims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::new(ALGORITHM), claims, &self.encoding)
            .map_err(|e| AuthError::SigningFailure(e.to_string()))
    }

    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaims, AuthError> {
        // `none` and asymmetric algorithms never reach the verifier.
        let alg = header_algorithm(token)?;
        if alg != ALGORITHM_NAME {
            return Err(AuthError::WrongAlgorithm { found: alg });
        }

        let data = jsonwebtoken::decode::<IdentityClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::SignatureMismatch,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    AuthError::WrongAlgorithm { found: alg.clone() }
                }
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::MalformedToken,
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Read the `alg` field of a compact JWS without trusting anything else.
fn header_algorithm(token: &str) -> Result<String, AuthError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::MalformedToken);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| AuthError::MalformedToken)?;
    let raw: RawHeader = serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)?;
    Ok(raw.alg)
}
