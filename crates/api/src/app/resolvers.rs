//! Resolvers behind `POST /query`.
//!
//! Every resolver receives the identity published by the soft-fail adapter
//! and performs its own authorization check, so an anonymous caller gets a
//! `NOT_AUTHENTICATED` error body rather than an HTTP status.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

use tollgate_auth::{
    AuthzError, Directory, LoginError, PageRequest, RequestIdentity, RoleCode, UserError,
    UserLookup, require_authenticated, require_role,
};
use tollgate_core::{LookupError, UserId};

use crate::app::AppState;
use crate::app::dto::UserListResponse;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolverError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("{0}")]
    BadInput(String),

    #[error("not found")]
    NotFound,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("internal error")]
    Internal,
}

impl ResolverError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::BadInput(_) => "BAD_USER_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UnknownOperation(_) => "UNKNOWN_OPERATION",
            Self::Internal => "INTERNAL",
        }
    }
}

impl From<AuthzError> for ResolverError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotAuthenticated => Self::NotAuthenticated,
            AuthzError::Forbidden { .. } => Self::Forbidden,
        }
    }
}

impl From<LookupError> for ResolverError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound => Self::NotFound,
            LookupError::Store(msg) => {
                tracing::error!(error = %msg, "directory lookup failed");
                Self::Internal
            }
        }
    }
}

impl From<UserError> for ResolverError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(msg) => Self::BadInput(msg),
            UserError::WrongPassword => Self::BadInput(err.to_string()),
            UserError::Password(e) => {
                tracing::error!(error = %e, "password hashing failed");
                Self::Internal
            }
        }
    }
}

impl From<LoginError> for ResolverError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials => Self::InvalidCredentials,
            LoginError::Lookup(e) => e.into(),
            LoginError::Token(e) => {
                tracing::error!(error = %e, "token issuance failed");
                Self::Internal
            }
        }
    }
}

type ResolverResult = Result<Value, ResolverError>;

/// Dispatch one operation by name.
pub fn execute(
    state: &AppState,
    identity: &RequestIdentity,
    operation: &str,
    variables: Value,
) -> ResolverResult {
    match operation {
        "viewer" => viewer(identity),
        "me" => me(state, identity),
        "user" => user(state, identity, variables),
        "users" => users(state, identity, variables),
        "login" => login(state, variables),
        "register" => register(state, variables),
        "logout" => logout(state, identity),
        "updateProfile" => update_profile(state, identity, variables),
        "changePassword" => change_password(state, identity, variables),
        other => Err(ResolverError::UnknownOperation(other.to_string())),
    }
}

fn variables<T: DeserializeOwned>(value: Value) -> Result<T, ResolverError> {
    let value = if value.is_null() { json!({}) } else { value };
    serde_json::from_value(value).map_err(|e| ResolverError::BadInput(e.to_string()))
}

fn to_value<T: serde::Serialize>(value: T) -> ResolverResult {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize resolver output");
        ResolverError::Internal
    })
}

fn parse_user_id(value: &Value) -> Result<UserId, ResolverError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(UserId::new)
            .ok_or_else(|| ResolverError::BadInput(format!("invalid user id: {n}"))),
        Value::String(s) => s.parse().map_err(|e: tollgate_core::InvalidId| {
            ResolverError::BadInput(e.to_string())
        }),
        other => Err(ResolverError::BadInput(format!("invalid user id: {other}"))),
    }
}

// ─── queries ────────────────────────────────────────────────────────────────

fn viewer(identity: &RequestIdentity) -> ResolverResult {
    to_value(identity.summary())
}

fn me(state: &AppState, identity: &RequestIdentity) -> ResolverResult {
    let auth = require_authenticated(identity)?;
    to_value(state.directory.user_by_id(auth.user_id())?)
}

#[derive(Deserialize)]
struct UserVars {
    id: Value,
}

fn user(state: &AppState, identity: &RequestIdentity, vars: Value) -> ResolverResult {
    require_role(identity, &RoleCode::ADMIN)?;
    let vars: UserVars = variables(vars)?;
    let id = parse_user_id(&vars.id)?;
    to_value(state.directory.user_by_id(id)?)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsersVars {
    page: Option<i64>,
    #[serde(alias = "page_size")]
    page_size: Option<i64>,
}

fn users(state: &AppState, identity: &RequestIdentity, vars: Value) -> ResolverResult {
    require_role(identity, &RoleCode::ADMIN)?;
    let vars: UsersVars = variables(vars)?;
    let page = state
        .directory
        .list_users(PageRequest::new(vars.page, vars.page_size))?;
    to_value(UserListResponse::from(page))
}

// ─── mutations ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LoginVars {
    email: String,
    password: String,
}

fn login(state: &AppState, vars: Value) -> ResolverResult {
    let vars: LoginVars = variables(vars)?;
    let grant = state
        .auth
        .login(state.directory.as_ref(), &vars.email, &vars.password)?;
    to_value(grant)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterVars {
    email: String,
    password: String,
    #[serde(alias = "full_name")]
    full_name: String,
}

fn register(state: &AppState, vars: Value) -> ResolverResult {
    let vars: RegisterVars = variables(vars)?;
    let user = state.directory.register(
        &vars.email,
        &vars.full_name,
        &vars.password,
        &RoleCode::CUSTOMER,
    )?;
    tracing::info!(user_id = %user.id, "user registered");
    to_value(user)
}

fn logout(state: &AppState, identity: &RequestIdentity) -> ResolverResult {
    let auth = require_authenticated(identity)?;
    state.auth.revoke(auth.token());
    tracing::info!(user_id = %auth.user_id(), "user logged out");
    Ok(json!(true))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfileVars {
    #[serde(alias = "full_name")]
    full_name: String,
}

fn update_profile(state: &AppState, identity: &RequestIdentity, vars: Value) -> ResolverResult {
    let auth = require_authenticated(identity)?;
    let vars: UpdateProfileVars = variables(vars)?;

    let mut user = state.directory.user_by_id(auth.user_id())?;
    user.update_profile(&vars.full_name)?;
    state.directory.save_user(user.clone())?;
    to_value(user)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordVars {
    #[serde(alias = "current_password")]
    current_password: String,
    #[serde(alias = "new_password")]
    new_password: String,
}

fn change_password(state: &AppState, identity: &RequestIdentity, vars: Value) -> ResolverResult {
    let auth = require_authenticated(identity)?;
    let vars: ChangePasswordVars = variables(vars)?;

    let mut user = state.directory.user_by_id(auth.user_id())?;
    user.change_password(&vars.current_password, &vars.new_password)?;
    state.directory.save_user(user)?;
    tracing::info!(user_id = %auth.user_id(), "password changed");
    Ok(json!(true))
}
