pub mod auth_service;
pub mod flight_service;
pub mod photo_service;
pub mod route_service;
pub mod ticket_service;
