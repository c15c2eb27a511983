use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::error;

use crate::api::{session::clear_session_cookie, state::AdminState};

#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 204, description = "Admin cookie cleared")
    ),
    tag = "admin"
)]
pub async fn logout(state: Extension<Arc<AdminState>>) -> impl IntoResponse {
    // The token is self-contained; clearing the cookie is all there is to do.
    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(state.config().secure_cookie()) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build cleared admin cookie: {err}"),
    }
    (StatusCode::NO_CONTENT, response_headers)
}
