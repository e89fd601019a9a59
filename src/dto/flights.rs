use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Flight;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFlightRequest {
    pub origin: Uuid,
    pub destination: Uuid,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub price_cents: i64,
    pub capacity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FlightList {
    pub flights: Vec<Flight>,
}

/// Departure window, `YYYY-MM-DD` bounds. Defaults to today through +7 days.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DepartureWindowQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RoutePairQuery {
    pub origin: Uuid,
    pub destination: Uuid,
}
