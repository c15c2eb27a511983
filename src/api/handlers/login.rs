//! Admin login: throttle, compare the shared password, issue the signed cookie.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::{error_response, ErrorResponse};
use crate::{
    api::{
        session::{extract_client_ip, session_cookie, UNKNOWN_CLIENT},
        state::AdminState,
    },
    auth::{constant_time_eq, SESSION_MARKER},
};

// No Debug: the body holds the plaintext password.
#[derive(ToSchema, Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub success: bool,
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Password accepted, admin cookie set", body = LoginResponse),
        (status = 400, description = "Missing password", body = ErrorResponse),
        (status = 401, description = "Invalid password", body = ErrorResponse),
        (status = 429, description = "Too many attempts from this client", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn login(
    headers: HeaderMap,
    state: Extension<Arc<AdminState>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let client = extract_client_ip(&headers).unwrap_or_else(|| UNKNOWN_CLIENT.to_string());
    let config = state.config();

    if !state
        .limiter()
        .allow(&client, config.login_max_attempts(), config.login_window())
    {
        warn!(client = %client, "Admin login rate limited");
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many attempts. Try again later.",
        );
    }

    let password = match payload {
        Some(Json(LoginRequest { password })) if !password.is_empty() => password,
        _ => return error_response(StatusCode::BAD_REQUEST, "Password is required"),
    };

    if !constant_time_eq(&password, config.admin_password()) {
        warn!(client = %client, "Admin login rejected");
        return error_response(StatusCode::UNAUTHORIZED, "Invalid password");
    }

    let token = state.codec().sign(SESSION_MARKER);
    let cookie = match session_cookie(&token, config.session_ttl(), config.secure_cookie()) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to build admin cookie: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    info!(client = %client, "Admin login succeeded");

    let mut response_headers = HeaderMap::new();
    response_headers.insert(SET_COOKIE, cookie);
    (
        StatusCode::OK,
        response_headers,
        Json(LoginResponse { success: true }),
    )
        .into_response()
}
