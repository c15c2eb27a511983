pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::login;

pub mod logout;
pub use self::logout::logout;

pub mod session;
pub use self::session::session;

// common types for the handlers
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
