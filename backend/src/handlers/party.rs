//! Producer, farm and client registration handlers

use axum::{extract::State, http::StatusCode, Json};
use shared::{
    Client, Farm, Producer, RegisterClientInput, RegisterFarmInput, RegisterProducerInput,
};

use crate::error::AppResult;
use crate::AppState;

/// Register a producer
pub async fn register_producer(
    State(state): State<AppState>,
    Json(input): Json<RegisterProducerInput>,
) -> AppResult<(StatusCode, Json<Producer>)> {
    let producer = state.ledger.register_producer(input).await?;
    Ok((StatusCode::CREATED, Json(producer)))
}

/// Register a farm under an existing producer
pub async fn register_farm(
    State(state): State<AppState>,
    Json(input): Json<RegisterFarmInput>,
) -> AppResult<(StatusCode, Json<Farm>)> {
    let farm = state.ledger.register_farm(input).await?;
    Ok((StatusCode::CREATED, Json(farm)))
}

/// Register a client
pub async fn register_client(
    State(state): State<AppState>,
    Json(input): Json<RegisterClientInput>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let client = state.ledger.register_client(input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}
