use serde::{Deserialize, Serialize};

use tollgate_auth::{Page, User};

// ───────────────────────────────
// Request DTOs
// ───────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Body of `POST /query`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub operation: String,
    #[serde(default)]
    pub variables: serde_json::Value,
}

// ───────────────────────────────
// Response DTOs
// ───────────────────────────────

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl From<Page<User>> for UserListResponse {
    fn from(page: Page<User>) -> Self {
        Self {
            users: page.items,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryErrorBody {
    pub message: String,
    pub code: &'static str,
}

/// Envelope of every `POST /query` answer. Exactly one of the two fields is set.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<QueryErrorBody>>,
}

impl QueryResponse {
    pub fn data(value: serde_json::Value) -> Self {
        Self {
            data: Some(value),
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>, code: &'static str) -> Self {
        Self {
            data: None,
            errors: Some(vec![QueryErrorBody {
                message: message.into(),
                code,
            }]),
        }
    }
}
