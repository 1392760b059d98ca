//! `tollgate-core`: shared identifiers and collaborator error types.
//!
//! This crate has no knowledge of tokens, HTTP or storage engines.

pub mod error;
pub mod id;

pub use error::{LookupError, LookupResult};
pub use id::{InvalidId, RoleId, UserId};
