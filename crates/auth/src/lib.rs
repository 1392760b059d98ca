//! `tollgate-auth`: bearer-token authentication core.
//!
//! Issuance, validation and revocation of signed tokens, plus the typed
//! request identity and the authorization checks that consume it.
//! This crate has no knowledge of HTTP or storage engines.

pub mod authorize;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod config;
pub mod directory;
pub mod error;
pub mod identity;
pub mod password;
pub mod revocation;
pub mod roles;
pub mod service;
pub mod user;

pub use authorize::{AuthzError, require_any_role, require_authenticated, require_role};
pub use claims::{IdentityClaims, validate_claims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{Hs256Codec, TokenCodec};
pub use config::AuthConfig;
pub use directory::{Directory, InMemoryDirectory, Page, PageRequest, RoleLookup, UserLookup};
pub use error::{AuthError, LoginError};
pub use identity::{AuthenticatedIdentity, RequestIdentity};
pub use revocation::RevocationStore;
pub use roles::{Role, RoleCode};
pub use service::{AuthService, LoginGrant};
pub use user::{User, UserError};
