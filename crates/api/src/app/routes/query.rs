use axum::{Json, extract::Extension, response::Response};

use crate::app::dto::{QueryRequest, QueryResponse};
use crate::app::{AppState, resolvers, run_blocking};
use crate::context::CurrentIdentity;

/// Single JSON endpoint for all resolver operations.
///
/// Answers `200` whenever a resolver ran; resolver failures are carried in
/// `errors`.
pub async fn execute(
    Extension(state): Extension<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(body): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, Response> {
    let authenticated = identity.is_authenticated();
    let QueryRequest { operation, variables } = body;

    // Resolvers may hash or verify passwords.
    let response = run_blocking(move || {
        match resolvers::execute(&state, &identity, &operation, variables) {
            Ok(data) => QueryResponse::data(data),
            Err(e) => {
                tracing::debug!(%operation, authenticated, code = e.code(), "resolver error");
                QueryResponse::error(e.to_string(), e.code())
            }
        }
    })
    .await?;

    Ok(Json(response))
}
