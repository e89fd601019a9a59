use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    cache::parse_use_cache,
    dto::tickets::{BookTicketQuery, BookTicketRequest, TicketList},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::Ticket,
    response::ApiResponse,
    services::ticket_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/book", post(book))
        .route("/mine", get(get_mine))
        .route("/{user_id}", get(get_by_user))
        .route("/cancel/{id}", delete(cancel))
}

#[utoipa::path(
    post,
    path = "/api/tickets/book",
    params(
        ("payment_method" = Option<String>, Query, description = "Payment method; 'card' settles immediately"),
    ),
    request_body = BookTicketRequest,
    responses(
        (status = 201, description = "Ticket booked", body = ApiResponse<Ticket>),
        (status = 404, description = "Flight not found"),
        (status = 409, description = "Flight fully booked"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn book(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<BookTicketQuery>,
    Json(payload): Json<BookTicketRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Ticket>>)> {
    let payment_method = query.payment_method.as_deref().unwrap_or("card");
    let resp = ticket_service::book_ticket(&state, &user, payload, payment_method).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/tickets/mine",
    params(
        ("use-cache" = Option<bool>, Header, description = "Opt in to the memo cache"),
    ),
    responses(
        (status = 200, description = "Tickets booked by the caller", body = ApiResponse<TicketList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn get_mine(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    let use_cache = parse_use_cache(&headers);
    let resp = ticket_service::list_for_user(&state, user.user_id, use_cache).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tickets/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Booking user ID"),
        ("use-cache" = Option<bool>, Header, description = "Opt in to the memo cache"),
    ),
    responses(
        (status = 200, description = "Tickets booked by the user", body = ApiResponse<TicketList>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn get_by_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
    headers: HeaderMap,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    ensure_admin(&user)?;
    let use_cache = parse_use_cache(&headers);
    let resp = ticket_service::list_for_user(&state, user_id, use_cache).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/tickets/cancel/{id}",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket cancelled"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "Ticket not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = ticket_service::cancel_ticket(&state, &user, id).await?;
    Ok(Json(resp))
}
