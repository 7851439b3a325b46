use crate::responses::ResultResp;
use astra::{Body, Response, ResponseBuilder};
use serde_json::Value;

/// JSON response with an explicit status code.
pub fn json_response(status: u16, value: &Value) -> ResultResp {
    Ok(build_json(status, value))
}

pub fn build_json(status: u16, value: &Value) -> Response {
    let body = value.to_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8")
        .body(Body::from(body))
        .unwrap()
}
