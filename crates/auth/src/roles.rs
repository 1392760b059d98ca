use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use tollgate_core::RoleId;

/// Role code carried in tokens and compared by authorization checks.
///
/// Codes are opaque strings compared for exact equality; there is no
/// hierarchy between them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCode(Cow<'static, str>);

impl RoleCode {
    pub const ADMIN: RoleCode = RoleCode(Cow::Borrowed("ADMIN"));
    pub const CUSTOMER: RoleCode = RoleCode(Cow::Borrowed("CUSTOMER"));

    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A role record as returned by the role-lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub code: RoleCode,
}

impl Role {
    pub fn new(id: RoleId, name: impl Into<String>, code: RoleCode) -> Self {
        Self {
            id,
            name: name.into(),
            code,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.code == RoleCode::ADMIN
    }

    pub fn is_customer(&self) -> bool {
        self.code == RoleCode::CUSTOMER
    }
}
