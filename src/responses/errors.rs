use crate::errors::AppError;
use crate::responses::json::build_json;
use astra::Response;
use serde_json::json;

pub type ResultResp = Result<Response, AppError>;

/// Convert an AppError into a JSON error response. Everything the
/// client can fix maps to a 4xx; anything else is a 500 with the cause
/// in the body, never a crash.
pub fn error_to_response(err: AppError) -> Response {
    match err {
        AppError::NotFound => json_error_response(404, "Not Found"),
        AppError::BadRequest(msg) => json_error_response(400, &msg),
        AppError::DbError(msg) | AppError::InternalError(msg) | AppError::TrainError(msg) => {
            json_error_response(500, &format!("An error occurred during prediction: {msg}"))
        }
        other => json_error_response(500, &other.to_string()),
    }
}

/// Build a JSON error body in the `{"detail": ...}` shape.
pub fn json_error_response(status: u16, message: &str) -> Response {
    build_json(status, &json!({ "detail": message }))
}
