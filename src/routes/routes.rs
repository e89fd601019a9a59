use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::routes::{CreateRouteRequest, RouteList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Route,
    response::ApiResponse,
    services::route_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_route))
        .route("/", get(list_routes))
}

#[utoipa::path(
    post,
    path = "/api/routes",
    request_body = CreateRouteRequest,
    responses(
        (status = 201, description = "Route created", body = ApiResponse<Route>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Routes"
)]
pub async fn create_route(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRouteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Route>>)> {
    let resp = route_service::create_route(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/routes",
    responses(
        (status = 200, description = "List routes", body = ApiResponse<RouteList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Routes"
)]
pub async fn list_routes(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<RouteList>>> {
    let resp = route_service::list_routes(&state).await?;
    Ok(Json(resp))
}
