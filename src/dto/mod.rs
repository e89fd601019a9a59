pub mod auth;
pub mod flights;
pub mod routes;
pub mod tickets;
