//! Producer, farm and client registration

use chrono::Utc;
use shared::{
    validate_name, Client, Farm, Producer, RegisterClientInput, RegisterFarmInput,
    RegisterProducerInput,
};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::Tables;

pub fn register_producer(tx: &mut Tables, input: RegisterProducerInput) -> AppResult<Producer> {
    validate_name("name", &input.name)?;
    validate_name("country", &input.country)?;

    let producer = Producer {
        id: Uuid::new_v4(),
        name: input.name,
        country: input.country,
        created_at: Utc::now(),
    };
    tx.producers.insert(producer.id, producer.clone());
    info!(producer_id = %producer.id, name = %producer.name, "registered producer");
    Ok(producer)
}

pub fn register_farm(tx: &mut Tables, input: RegisterFarmInput) -> AppResult<Farm> {
    validate_name("name", &input.name)?;
    if !tx.producers.contains_key(&input.producer_id) {
        return Err(AppError::missing("Producer", input.producer_id));
    }

    let farm = Farm {
        id: Uuid::new_v4(),
        producer_id: input.producer_id,
        name: input.name,
        region: input.region,
        altitude_m: input.altitude_m,
        location: input.location,
        created_at: Utc::now(),
    };
    tx.farms.insert(farm.id, farm.clone());
    info!(farm_id = %farm.id, producer_id = %farm.producer_id, "registered farm");
    Ok(farm)
}

pub fn register_client(tx: &mut Tables, input: RegisterClientInput) -> AppResult<Client> {
    validate_name("name", &input.name)?;
    validate_name("country", &input.country)?;

    let client = Client {
        id: Uuid::new_v4(),
        name: input.name,
        country: input.country,
        created_at: Utc::now(),
    };
    tx.clients.insert(client.id, client.clone());
    info!(client_id = %client.id, name = %client.name, "registered client");
    Ok(client)
}
