//! HTTP API tests
//!
//! Drives the router end to end through the writer queue:
//! - Resource creation and the landed-cost figures it reports
//! - Error envelope codes and statuses

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::dec;
use landed_cost_backend::{create_app, AppState, Config, Ledger, LedgerSettings, LedgerWorker};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tower::ServiceExt;

fn app() -> Router {
    let config = Config::default();
    let ledger = LedgerWorker::spawn(
        Ledger::new(LedgerSettings::from_config(&config)),
        config.ledger.queue_capacity,
    );
    create_app(AppState {
        ledger,
        config: Arc::new(config),
    })
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn as_dec(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

/// Registers a producer, farm and client; returns (farm_id, client_id)
async fn seed(app: &Router) -> (String, String) {
    let (status, producer) = call(
        app,
        "POST",
        "/api/v1/producers",
        Some(json!({ "name": "Asociacion Chirinos", "country": "Peru" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, farm) = call(
        app,
        "POST",
        "/api/v1/farms",
        Some(json!({
            "producer_id": producer["id"],
            "name": "Finca El Mirador",
            "region": "Cajamarca",
            "altitude_m": 1850,
            "location": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, client) = call(
        app,
        "POST",
        "/api/v1/clients",
        Some(json!({ "name": "Square Mile", "country": "United Kingdom" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (
        farm["id"].as_str().unwrap().to_string(),
        client["id"].as_str().unwrap().to_string(),
    )
}

async fn buy(app: &Router, farm_id: &str, weight: &str, base: &str) -> Value {
    let (status, lot) = call(
        app,
        "POST",
        "/api/v1/lots",
        Some(json!({
            "farm_id": farm_id,
            "variety": "Bourbon",
            "process_method": "washed",
            "total_weight_kg": weight,
            "base_farm_cost_per_kg": base,
            "bag_weight_kg": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    lot
}

#[tokio::test]
async fn test_health_reports_running_writer() {
    let app = app();
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "development");
    assert_eq!(body["ledger_writer"], "running");
}

#[tokio::test]
async fn test_health_reports_configured_environment() {
    let mut config = Config::default();
    config.environment = "production".to_string();
    let ledger = LedgerWorker::spawn(
        Ledger::new(LedgerSettings::from_config(&config)),
        config.ledger.queue_capacity,
    );
    let app = create_app(AppState {
        ledger,
        config: Arc::new(config),
    });

    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["environment"], "production");
}

#[tokio::test]
async fn test_cost_flows_into_inventory() {
    let app = app();
    let (farm_id, _) = seed(&app).await;
    let lot = buy(&app, &farm_id, "1000", "10").await;
    assert_eq!(lot["num_bags"], 15);

    let (status, result) = call(
        &app,
        "POST",
        "/api/v1/costs",
        Some(json!({
            "lot_id": lot["lot_id"],
            "cost_type": "milling",
            "amount_usd": "500",
            "date_incurred": "2026-03-14",
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(result["bags_recomputed"], 15);

    let (status, rows) = call(&app, "GET", "/api/v1/inventory/available", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 15);
    assert!(rows
        .iter()
        .all(|row| as_dec(&row["landed_cost_per_kg"]) == dec("10.5")));
}

#[tokio::test]
async fn test_contract_lifecycle_over_http() {
    let app = app();
    let (farm_id, client_id) = seed(&app).await;
    let lot = buy(&app, &farm_id, "138", "10").await;

    let (status, contract) = call(
        &app,
        "POST",
        "/api/v1/contracts",
        Some(json!({
            "client_id": client_id,
            "sale_price_per_kg": "14",
            "bag_ids": lot["bag_ids"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(contract["status"], "Processing");
    let advance_uri = format!("/api/v1/contracts/{}/advance", contract["id"].as_str().unwrap());

    let (status, step) = call(&app, "POST", &advance_uri, Some(json!({ "cost_amount": "50" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(step["previous_stage"], "Farm");
    assert_eq!(step["next_stage"], "Cora");
    assert_eq!(as_dec(&step["cost_per_kg"]).round_dp(4), dec("0.3623"));

    for expected in ["Port-Export", "Port-Import", "Final Destination"] {
        let (status, step) =
            call(&app, "POST", &advance_uri, Some(json!({ "cost_amount": "0" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(step["next_stage"], expected);
    }

    let (status, error) = call(&app, "POST", &advance_uri, Some(json!({ "cost_amount": "1" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"]["code"], "ALREADY_TERMINAL");

    let (status, journey) = call(
        &app,
        "GET",
        &format!("/api/v1/contracts/{}", contract["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(journey["status"], "Fulfilled");
    assert_eq!(journey["current_stage"], "Final Destination");
    assert_eq!(journey["client_name"], "Square Mile");

    let (status, audit) = call(
        &app,
        "GET",
        &format!("/api/v1/audit/contracts/{}", contract["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audit["is_match"], true);
    assert_eq!(audit["per_bag"]["isMatch"], true);
}

#[tokio::test]
async fn test_error_envelopes() {
    let app = app();
    let (farm_id, _) = seed(&app).await;

    let (status, error) = call(
        &app,
        "POST",
        "/api/v1/costs",
        Some(json!({
            "lot_id": uuid::Uuid::new_v4(),
            "cost_type": "storage",
            "amount_usd": "10",
            "date_incurred": "2026-03-14",
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"]["code"], "REFERENTIAL_INTEGRITY");
    assert_eq!(error["error"]["field"], "Lot");

    let (status, error) = call(
        &app,
        "POST",
        "/api/v1/lots",
        Some(json!({
            "farm_id": farm_id,
            "variety": "  ",
            "process_method": "natural",
            "total_weight_kg": "100",
            "base_farm_cost_per_kg": "10",
            "bag_weight_kg": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(error["error"]["field"], "variety");

    let (status, error) = call(
        &app,
        "POST",
        "/api/v1/lots",
        Some(json!({
            "farm_id": farm_id,
            "variety": "Bourbon",
            "process_method": "natural",
            "total_weight_kg": "1000000",
            "base_farm_cost_per_kg": "10",
            "bag_weight_kg": "0.000001"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["field"], "bag_weight_kg");

    let (status, error) = call(
        &app,
        "DELETE",
        &format!("/api/v1/costs/{}", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_recompute_and_audit_sweep() {
    let app = app();
    let (farm_id, _) = seed(&app).await;
    buy(&app, &farm_id, "276", "9.5").await;

    let (status, body) = call(&app, "POST", "/api/v1/maintenance/recompute", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["repriced"], 4);

    let (status, sweep) = call(&app, "GET", "/api/v1/audit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sweep["bags_checked"], 4);
    assert_eq!(sweep["bag_findings"].as_array().unwrap().len(), 0);
}
