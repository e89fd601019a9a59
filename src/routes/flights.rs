use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::flights::{CreateFlightRequest, DepartureWindowQuery, FlightList, RoutePairQuery},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Flight,
    response::ApiResponse,
    services::flight_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_flight))
        .route("/", get(list_flights))
        .route("/route", get(list_by_route))
        .route("/origin/{id}", get(list_by_origin))
        .route("/destination/{id}", get(list_by_destination))
}

#[utoipa::path(
    post,
    path = "/api/flights",
    request_body = CreateFlightRequest,
    responses(
        (status = 201, description = "Flight created", body = ApiResponse<Flight>),
        (status = 403, description = "Not an admin"),
        (status = 422, description = "Invalid route pair or times"),
    ),
    security(("bearer_auth" = [])),
    tag = "Flights"
)]
pub async fn create_flight(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateFlightRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Flight>>)> {
    let resp = flight_service::create_flight(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/flights",
    params(
        ("from" = Option<String>, Query, description = "Window start, YYYY-MM-DD; defaults to today"),
        ("to" = Option<String>, Query, description = "Window end, YYYY-MM-DD; defaults to from + 7 days"),
    ),
    responses(
        (status = 200, description = "Flights departing in the window", body = ApiResponse<FlightList>),
        (status = 422, description = "Unparsable date"),
    ),
    security(("bearer_auth" = [])),
    tag = "Flights"
)]
pub async fn list_flights(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<DepartureWindowQuery>,
) -> AppResult<Json<ApiResponse<FlightList>>> {
    let resp = flight_service::list_flights(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/flights/route",
    params(
        ("origin" = Uuid, Query, description = "Origin route ID"),
        ("destination" = Uuid, Query, description = "Destination route ID"),
    ),
    responses(
        (status = 200, description = "Flights on the route", body = ApiResponse<FlightList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Flights"
)]
pub async fn list_by_route(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<RoutePairQuery>,
) -> AppResult<Json<ApiResponse<FlightList>>> {
    let resp = flight_service::list_by_route(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/flights/origin/{id}",
    params(("id" = Uuid, Path, description = "Origin route ID")),
    responses(
        (status = 200, description = "Flights departing from the route", body = ApiResponse<FlightList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Flights"
)]
pub async fn list_by_origin(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FlightList>>> {
    let resp = flight_service::list_by_origin(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/flights/destination/{id}",
    params(("id" = Uuid, Path, description = "Destination route ID")),
    responses(
        (status = 200, description = "Flights arriving at the route", body = ApiResponse<FlightList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Flights"
)]
pub async fn list_by_destination(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FlightList>>> {
    let resp = flight_service::list_by_destination(&state, id).await?;
    Ok(Json(resp))
}
