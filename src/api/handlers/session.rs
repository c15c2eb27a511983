use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::{session::require_admin, state::AdminState};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub authenticated: bool,
}

#[utoipa::path(
    get,
    path = "/api/admin/session",
    responses(
        (status = 200, description = "Admin session is valid", body = SessionResponse),
        (status = 401, description = "Missing, malformed or forged admin cookie", body = SessionResponse)
    ),
    tag = "admin"
)]
pub async fn session(headers: HeaderMap, state: Extension<Arc<AdminState>>) -> impl IntoResponse {
    let authenticated = require_admin(&headers, state.codec());
    let status = if authenticated {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(SessionResponse { authenticated }))
}
