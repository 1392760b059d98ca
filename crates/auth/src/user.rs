//! User record as returned by the user-lookup collaborator.

use serde::Serialize;
use thiserror::Error;

use tollgate_core::UserId;

use crate::Role;
use crate::password::{self, PasswordError};

/// A resolved user: the subject of issued tokens.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("current password is incorrect")]
    WrongPassword,

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl User {
    /// Build a new user from a plaintext password (hashed with argon2).
    pub fn register(
        id: UserId,
        email: &str,
        full_name: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, UserError> {
        let email = normalize_email(email)?;
        if full_name.trim().is_empty() {
            return Err(UserError::Validation("full name cannot be empty".into()));
        }
        ensure_password(password)?;

        Ok(Self {
            id,
            email,
            full_name: full_name.trim().to_string(),
            password_hash: password::hash_password(password)?,
            role,
        })
    }

    /// Rehydrate a user from stored fields.
    pub fn with_password_hash(
        id: UserId,
        email: impl Into<String>,
        full_name: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            full_name: full_name.into(),
            password_hash: password_hash.into(),
            role,
        }
    }

    pub fn verify_password(&self, password: &str) -> bool {
        password::verify_password(&self.password_hash, password)
    }

    pub fn update_profile(&mut self, full_name: &str) -> Result<(), UserError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(UserError::Validation("full name cannot be empty".into()));
        }
        self.full_name = full_name.to_string();
        Ok(())
    }

    pub fn change_password(&mut self, current: &str, new: &str) -> Result<(), UserError> {
        if !self.verify_password(current) {
            return Err(UserError::WrongPassword);
        }
        ensure_password(new)?;
        self.password_hash = password::hash_password(new)?;
        Ok(())
    }
}

/// Trim and lowercase an email, rejecting obviously malformed input.
pub fn normalize_email(email: &str) -> Result<String, UserError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(UserError::Validation("invalid email format".into()));
    }
    Ok(email.to_lowercase())
}

fn ensure_password(password: &str) -> Result<(), UserError> {
    if password.chars().count() < 6 {
        return Err(UserError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoleCode;
    use tollgate_core::RoleId;

    fn customer() -> Role {
        Role::new(RoleId::new(2), "Customer", RoleCode::CUSTOMER)
    }

    #[test]
    fn register_normalizes_email_and_hashes_password() {
        let user = User::register(
            UserId::new(1),
            "  Alice@Example.com ",
            "Alice Smith",
            "hunter22",
            customer(),
        )
        .unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.password_hash, "hunter22");
        assert!(user.verify_password("hunter22"));
        assert!(!user.verify_password("hunter23"));
    }

    #[test]
    fn register_rejects_invalid_email() {
        let result = User::register(UserId::new(1), "invalid-email", "A", "hunter22", customer());
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[test]
    fn register_rejects_short_password() {
        let result = User::register(UserId::new(1), "a@b.c", "A", "abc", customer());
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[test]
    fn change_password_requires_current_password() {
        let mut user =
            User::register(UserId::new(1), "bob@example.com", "Bob", "first-pass", customer())
                .unwrap();

        assert_eq!(
            user.change_password("nope", "second-pass"),
            Err(UserError::WrongPassword)
        );

        user.change_password("first-pass", "second-pass").unwrap();
        assert!(user.verify_password("second-pass"));
        assert!(!user.verify_password("first-pass"));
    }

    #[test]
    fn update_profile_trims_and_rejects_blank_names() {
        let mut user = User::with_password_hash(UserId::new(3), "d@example.com", "Dan", "", customer());
        user.update_profile("  Daniel  ").unwrap();
        assert_eq!(user.full_name, "Daniel");
        assert!(matches!(user.update_profile("   "), Err(UserError::Validation(_))));
        assert_eq!(user.full_name, "Daniel");
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User::with_password_hash(
            UserId::new(9),
            "c@example.com",
            "Carol",
            "$argon2id$secret",
            customer(),
        );
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"]["code"], "CUSTOMER");
    }
}
