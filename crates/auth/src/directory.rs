//! Collaborator interfaces for resolving users and roles, plus an in-memory
//! implementation for development and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;
use serde::Serialize;

use tollgate_core::{LookupError, LookupResult, RoleId, UserId};

use crate::user::normalize_email;
use crate::{Role, RoleCode, User, UserError};

/// User lookup capability. Implementations must return
/// [`LookupError::NotFound`] for a missing user and [`LookupError::Store`]
/// when the backing store fails.
pub trait UserLookup: Send + Sync {
    fn user_by_id(&self, id: UserId) -> LookupResult<User>;

    fn user_by_email(&self, email: &str) -> LookupResult<User>;

    fn list_users(&self, page: PageRequest) -> LookupResult<Page<User>>;
}

/// Role lookup capability.
pub trait RoleLookup: Send + Sync {
    fn role_by_id(&self, id: RoleId) -> LookupResult<Role>;

    fn role_by_code(&self, code: &RoleCode) -> LookupResult<Role>;
}

/// Full user directory: both lookups plus self-service registration.
pub trait Directory: UserLookup + RoleLookup {
    /// Create a user holding `role_code`. Duplicate emails and unknown roles
    /// are validation failures.
    fn register(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
        role_code: &RoleCode,
    ) -> Result<User, UserError>;

    /// Replace an existing user record. Unknown ids are `NotFound`.
    fn save_user(&self, user: User) -> LookupResult<()>;
}

/// Normalized pagination parameters (1-based page, size in 1..=100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: usize = 10;
    pub const MAX_PAGE_SIZE: usize = 100;

    /// Out-of-range values fall back to page 1 / the default size.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p as usize,
            _ => 1,
        };
        let page_size = match page_size {
            Some(s) if s >= 1 && s as usize <= Self::MAX_PAGE_SIZE => s as usize,
            _ => Self::DEFAULT_PAGE_SIZE,
        };
        Self { page, page_size }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// In-memory user and role directory.
pub struct InMemoryDirectory {
    users: RwLock<HashMap<UserId, User>>,
    roles: RwLock<HashMap<RoleId, Role>>,
    next_user_id: AtomicI64,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            roles: RwLock::new(HashMap::new()),
            next_user_id: AtomicI64::new(1),
        }
    }

    /// A directory pre-seeded with the `ADMIN` (id 1) and `CUSTOMER` (id 2) roles.
    pub fn with_default_roles() -> Self {
        let directory = Self::new();
        directory.insert_role(Role::new(RoleId::new(1), "Administrator", RoleCode::ADMIN));
        directory.insert_role(Role::new(RoleId::new(2), "Customer", RoleCode::CUSTOMER));
        directory
    }

    pub fn insert_role(&self, role: Role) {
        self.roles.write().insert(role.id, role);
    }

    /// Insert or replace a user record as-is.
    pub fn insert_user(&self, user: User) {
        self.next_user_id
            .fetch_max(user.id.get() + 1, Ordering::SeqCst);
        self.users.write().insert(user.id, user);
    }

    /// Create a user with a fresh id and the role named by `role_code`.
    pub fn register(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
        role_code: &RoleCode,
    ) -> Result<User, UserError> {
        let role = self
            .role_by_code(role_code)
            .map_err(|_| UserError::Validation(format!("unknown role '{role_code}'")))?;

        let email = normalize_email(email)?;
        if self.user_by_email(&email).is_ok() {
            return Err(UserError::Validation("email already exists".into()));
        }

        // Hash outside the lock; the id is assigned once the email is claimed.
        let mut user = User::register(UserId::new(0), &email, full_name, password, role)?;

        let mut users = self.users.write();
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::Validation("email already exists".into()));
        }
        user.id = UserId::new(self.next_user_id.fetch_add(1, Ordering::SeqCst));
        users.insert(user.id, user.clone());
        drop(users);

        tracing::debug!(user_id = %user.id, "registered user");
        Ok(user)
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserLookup for InMemoryDirectory {
    fn user_by_id(&self, id: UserId) -> LookupResult<User> {
        self.users.read().get(&id).cloned().ok_or(LookupError::NotFound)
    }

    fn user_by_email(&self, email: &str) -> LookupResult<User> {
        let email = email.trim().to_lowercase();
        self.users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(LookupError::NotFound)
    }

    fn list_users(&self, page: PageRequest) -> LookupResult<Page<User>> {
        let users = self.users.read();
        let mut all: Vec<&User> = users.values().collect();
        all.sort_by_key(|u| u.id);

        let total_pages = all.len().div_ceil(page.page_size());
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.page_size())
            .cloned()
            .collect();

        Ok(Page {
            items,
            page: page.page(),
            page_size: page.page_size(),
            total_pages,
        })
    }
}

impl RoleLookup for InMemoryDirectory {
    fn role_by_id(&self, id: RoleId) -> LookupResult<Role> {
        self.roles.read().get(&id).cloned().ok_or(LookupError::NotFound)
    }

    fn role_by_code(&self, code: &RoleCode) -> LookupResult<Role> {
        self.roles
            .read()
            .values()
            .find(|r| &r.code == code)
            .cloned()
            .ok_or(LookupError::NotFound)
    }
}

impl Directory for InMemoryDirectory {
    fn register(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
        role_code: &RoleCode,
    ) -> Result<User, UserError> {
        InMemoryDirectory::register(self, email, full_name, password, role_code)
    }

    fn save_user(&self, user: User) -> LookupResult<()> {
        let mut users = self.users.write();
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user;
                Ok(())
            }
            None => Err(LookupError::NotFound),
        }
    }
}
