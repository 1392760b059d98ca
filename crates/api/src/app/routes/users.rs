use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use tollgate_auth::{Directory, PageRequest, UserLookup};
use tollgate_core::UserId;

use crate::app::{AppState, dto, errors, run_blocking};
use crate::context::Authenticated;

pub async fn profile(
    Extension(state): Extension<AppState>,
    Authenticated(identity): Authenticated,
) -> Response {
    match state.directory.user_by_id(identity.user_id()) {
        Ok(user) => Json(user).into_response(),
        Err(e) => errors::lookup_error_to_response(e),
    }
}

pub async fn update_profile(
    Extension(state): Extension<AppState>,
    Authenticated(identity): Authenticated,
    Json(body): Json<dto::UpdateProfileRequest>,
) -> Response {
    let mut user = match state.directory.user_by_id(identity.user_id()) {
        Ok(user) => user,
        Err(e) => return errors::lookup_error_to_response(e),
    };
    if let Err(e) = user.update_profile(&body.full_name) {
        return errors::user_error_to_response(e);
    }
    if let Err(e) = state.directory.save_user(user.clone()) {
        return errors::lookup_error_to_response(e);
    }

    Json(user).into_response()
}

pub async fn change_password(
    Extension(state): Extension<AppState>,
    Authenticated(identity): Authenticated,
    Json(body): Json<dto::ChangePasswordRequest>,
) -> Response {
    let user_id = identity.user_id();
    let result = run_blocking(move || {
        let mut user = state
            .directory
            .user_by_id(user_id)
            .map_err(errors::lookup_error_to_response)?;
        user.change_password(&body.current_password, &body.new_password)
            .map_err(errors::user_error_to_response)?;
        state
            .directory
            .save_user(user)
            .map_err(errors::lookup_error_to_response)
    })
    .await;

    match result {
        Ok(Ok(())) => {}
        Ok(Err(resp)) | Err(resp) => return resp,
    }

    tracing::info!(user_id = %identity.user_id(), "password changed");
    (StatusCode::OK, Json(json!({ "message": "password changed" }))).into_response()
}

pub async fn list_users(
    Extension(state): Extension<AppState>,
    Query(query): Query<dto::ListUsersQuery>,
) -> Response {
    match state
        .directory
        .list_users(PageRequest::new(query.page, query.page_size))
    {
        Ok(page) => Json(dto::UserListResponse::from(page)).into_response(),
        Err(e) => errors::lookup_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id: UserId = match id.parse() {
        Ok(id) => id,
        Err(e) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                format!("{e}"),
            );
        }
    };

    match state.directory.user_by_id(id) {
        Ok(user) => Json(user).into_response(),
        Err(e) => errors::lookup_error_to_response(e),
    }
}
