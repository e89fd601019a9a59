use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Route;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRouteRequest {
    pub city: String,
    pub country: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RouteList {
    pub routes: Vec<Route>,
}
