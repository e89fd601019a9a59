use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::routes::{CreateRouteRequest, RouteList},
    entity::routes::{ActiveModel, Column, Entity as Routes, Model as RouteModel},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::Route,
    response::{ApiResponse, Meta},
    state::AppState,
};

// Duplicate city/country pairs are permitted; routes have no natural key.
pub async fn create_route(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRouteRequest,
) -> AppResult<ApiResponse<Route>> {
    ensure_admin(user)?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        city: Set(payload.city),
        country: Set(payload.country),
        created_at: NotSet,
    };
    let route = active.insert(&state.orm).await?;

    tracing::info!(route_id = %route.id, "route created");

    Ok(ApiResponse::success(
        "Route successfully added.",
        route_from_entity(route),
        Some(Meta::empty()),
    ))
}

pub async fn list_routes(state: &AppState) -> AppResult<ApiResponse<RouteList>> {
    let routes: Vec<Route> = Routes::find()
        .order_by_asc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(route_from_entity)
        .collect();

    let total = routes.len() as i64;
    let meta = Meta::new(1, total, total);
    Ok(ApiResponse::success(
        "Routes",
        RouteList { routes },
        Some(meta),
    ))
}

fn route_from_entity(model: RouteModel) -> Route {
    Route {
        id: model.id,
        city: model.city,
        country: model.country,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
