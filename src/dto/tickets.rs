use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Ticket;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookTicketRequest {
    pub flight_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookTicketQuery {
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketList {
    pub tickets: Vec<Ticket>,
}
