use crate::db::models::{list_models, load_best_artifact};
use crate::db::Database;
use crate::domain::request::PredictRequest;
use crate::errors::AppError;
use crate::responses::{json_error_response, json_response, ResultResp};
use astra::Request;
use serde_json::json;
use std::io::Read;

pub fn handle(mut req: Request, db: &Database) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => json_response(
            200,
            &json!({
                "message": "Welcome to the real estate prediction API! \
                    POST the property details to /predict to get a price estimate."
            }),
        ),

        ("GET", "/models") => {
            let rows = list_models(db)?;
            let value =
                serde_json::to_value(rows).map_err(|e| AppError::InternalError(e.to_string()))?;
            json_response(200, &value)
        }

        ("POST", "/predict") => {
            let request = parse_body(&mut req)?;
            request.validate()?;
            predict(db, &request)
        }

        _ => Err(AppError::NotFound),
    }
}

fn parse_body(req: &mut Request) -> Result<PredictRequest, AppError> {
    let mut bytes = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut bytes)
        .map_err(|e| AppError::BadRequest(format!("cannot read body: {e}")))?;

    serde_json::from_slice(&bytes).map_err(|e| AppError::BadRequest(format!("invalid body: {e}")))
}

fn predict(db: &Database, request: &PredictRequest) -> ResultResp {
    let segment = request.segment();

    let Some(artifact) = load_best_artifact(db, &segment)? else {
        // A missing model is the caller's problem (unknown segment), not
        // an internal failure.
        return Ok(json_error_response(
            404,
            &format!(
                "No model found for property type '{}' and region '{}'. \
                Please ensure that you have selected a valid region and property type.",
                segment.property_type, segment.region
            ),
        ));
    };

    let prediction = artifact.predict(request)?;
    json_response(201, &json!({ "prediction": prediction }))
}
