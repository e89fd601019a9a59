use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        flights::{CreateFlightRequest, FlightList},
        routes::{CreateRouteRequest, RouteList},
        tickets::{BookTicketRequest, TicketList},
    },
    models::{Flight, PhotoMeta, Route, Ticket, User},
    response::{ApiResponse, Meta},
    routes::{flights, health, routes as route_endpoints, tickets, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        users::register,
        users::login,
        users::upload_photo,
        users::download_photo,
        route_endpoints::create_route,
        route_endpoints::list_routes,
        flights::create_flight,
        flights::list_flights,
        flights::list_by_route,
        flights::list_by_origin,
        flights::list_by_destination,
        tickets::book,
        tickets::get_mine,
        tickets::get_by_user,
        tickets::cancel,
    ),
    components(
        schemas(
            User,
            Route,
            Flight,
            Ticket,
            PhotoMeta,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateRouteRequest,
            CreateFlightRequest,
            BookTicketRequest,
            RouteList,
            FlightList,
            TicketList,
            health::HealthData,
            Meta,
            ApiResponse<User>,
            ApiResponse<LoginResponse>,
            ApiResponse<Route>,
            ApiResponse<Flight>,
            ApiResponse<Ticket>,
            ApiResponse<RouteList>,
            ApiResponse<FlightList>,
            ApiResponse<TicketList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "Registration, login and profile photos"),
        (name = "Routes", description = "Airport/location catalog"),
        (name = "Flights", description = "Flight catalog and search"),
        (name = "Tickets", description = "Booking and cancellation"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
