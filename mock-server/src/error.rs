use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// One entry of a 422 body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(path: &str, msg: &str) -> Self {
        Self {
            path: path.to_string(),
            msg: msg.to_string(),
        }
    }
}

/// Error responses in the shapes the real backend uses: `{errors:[...]}` for
/// validation, `{message}` for everything else.
#[derive(Debug)]
pub enum Failure {
    Validation(Vec<FieldError>),
    Unauthorized(&'static str),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        match self {
            Failure::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": errors }))).into_response()
            }
            Failure::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
            }
            Failure::NotFound(message) => (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response(),
            Failure::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            Failure::Conflict(message) => (StatusCode::CONFLICT, Json(json!({ "message": message }))).into_response(),
        }
    }
}
