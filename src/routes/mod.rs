use axum::{Router, routing::get};

use crate::state::AppState;

pub mod doc;
pub mod flights;
pub mod health;
pub mod routes;
pub mod tickets;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health::healthz))
        .nest("/users", users::router())
        .nest("/routes", routes::router())
        .nest("/flights", flights::router())
        .nest("/tickets", tickets::router())
}
