use crate::domain::restrictions::Restrictions;
use crate::errors::AppError;
use crate::model::trainer::TrainConfig;
use crate::pipeline::run_training;
use crate::router::handle;
use crate::tests::utils::{antwerp_houses, init_test_db};
use astra::Body;
use serde_json::Value;
use std::io::Read;

fn json_request(method: &str, path: &str, body: &str) -> astra::Request {
    http::Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn read_json(resp: &mut astra::Response) -> Value {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn predict_body(living_area: f64) -> String {
    serde_json::json!({
        "type_of_property": "house",
        "number_of_bedrooms": 3.0,
        "living_area": living_area,
        "terrace_area": 16.0,
        "garden_area": 30.0,
        "surface_of_land": 250.0,
        "number_of_facades": 3.0,
        "region": "Antwerp",
    })
    .to_string()
}

#[test]
fn root_greets() {
    let db = init_test_db("router_root");
    let mut resp = handle(json_request("GET", "/", ""), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let body = read_json(&mut resp);
    assert!(body["message"].as_str().unwrap().contains("Welcome"));
}

#[test]
fn unknown_route_is_not_found() {
    let db = init_test_db("router_404");
    let err = handle(json_request("GET", "/nope", ""), &db).unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[test]
fn predict_without_a_model_is_client_visible_not_found() {
    let db = init_test_db("router_no_model");
    let mut resp = handle(
        json_request("POST", "/predict", &predict_body(150.0)),
        &db,
    )
    .unwrap();
    assert_eq!(resp.status(), 404);
    let body = read_json(&mut resp);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("No model found for property type 'house' and region 'Antwerp'"));
}

#[test]
fn predict_serves_the_trained_segment() {
    let db = init_test_db("router_predict");
    run_training(
        &db,
        &antwerp_houses(60),
        &Restrictions::builtin(),
        &TrainConfig::default(),
    )
    .unwrap();

    let mut resp = handle(
        json_request("POST", "/predict", &predict_body(200.0)),
        &db,
    )
    .unwrap();
    assert_eq!(resp.status(), 201);

    // The training relation is exact: 1500 * 200 + 200000 * 3 = 900000.
    // The linear model has the lower test MSE, so it serves.
    let body = read_json(&mut resp);
    let prediction = body["prediction"].as_f64().unwrap();
    assert!(
        (prediction - 900_000.0).abs() < 5_000.0,
        "prediction {prediction}"
    );
}

#[test]
fn malformed_body_is_a_bad_request() {
    let db = init_test_db("router_bad_body");
    let err = handle(json_request("POST", "/predict", "{not json"), &db).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[test]
fn negative_magnitudes_are_rejected() {
    let db = init_test_db("router_negative");
    let body = predict_body(150.0).replace("250.0", "-1.0");
    let err = handle(json_request("POST", "/predict", &body), &db).unwrap_err();
    let AppError::BadRequest(msg) = err else {
        panic!("expected BadRequest");
    };
    assert!(msg.contains("surface_of_land"));
}

#[test]
fn models_listing_shows_trained_segments() {
    let db = init_test_db("router_models");
    run_training(
        &db,
        &antwerp_houses(40),
        &Restrictions::builtin(),
        &TrainConfig::default(),
    )
    .unwrap();

    let mut resp = handle(json_request("GET", "/models", ""), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let body = read_json(&mut resp);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row["property_type"], "house");
        assert_eq!(row["region"], "Antwerp");
    }
}
