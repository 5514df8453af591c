//! Producers, farms and clients: the parties at either end of a lot's journey

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::GpsCoordinates;

/// A coffee producer (cooperative, estate owner, smallholder)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Producer {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

/// A farm owned by a producer; lots are purchased from farms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Farm {
    pub id: Uuid,
    pub producer_id: Uuid,
    pub name: String,
    pub region: Option<String>,
    pub altitude_m: Option<u32>,
    pub location: Option<GpsCoordinates>,
    pub created_at: DateTime<Utc>,
}

/// A buyer that contracts bags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

/// Input for registering a producer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterProducerInput {
    pub name: String,
    pub country: String,
}

/// Input for registering a farm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterFarmInput {
    pub producer_id: Uuid,
    pub name: String,
    pub region: Option<String>,
    pub altitude_m: Option<u32>,
    pub location: Option<GpsCoordinates>,
}

/// Input for registering a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterClientInput {
    pub name: String,
    pub country: String,
}
