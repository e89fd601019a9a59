use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{PhotoMeta, User},
    response::ApiResponse,
    services::{auth_service, photo_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/photo/upload", post(upload_photo))
        .route("/photo/download", get(download_photo))
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = ApiResponse<User>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Malformed email or weak password"),
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = auth_service::register_user(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth_service::login_user(&state.pool, &state.jwt_secret, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/users/photo/upload",
    responses(
        (status = 201, description = "Photo uploaded", body = ApiResponse<PhotoMeta>),
        (status = 422, description = "Unsupported content type"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn upload_photo(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<PhotoMeta>>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("Malformed multipart body".into()))?
    {
        if field.name() != Some("data") {
            continue;
        }

        let name = field.file_name().unwrap_or("photo").to_string();
        let content_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Missing content type".into()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::Validation("Malformed multipart body".into()))?;

        let resp =
            photo_service::upload_photo(&state.pool, &user, name, content_type, bytes.to_vec())
                .await?;
        return Ok((StatusCode::CREATED, Json(resp)));
    }

    Err(AppError::Validation("Missing 'data' file field".into()))
}

#[utoipa::path(
    get,
    path = "/api/users/photo/download",
    responses(
        (status = 200, description = "Latest uploaded photo", content_type = "image/jpeg"),
        (status = 404, description = "No photo uploaded"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn download_photo(State(state): State<AppState>, user: AuthUser) -> AppResult<Response> {
    let photo = photo_service::download_latest(&state.pool, &user).await?;

    let headers = [
        (header::CONTENT_TYPE, photo.content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", photo.name),
        ),
    ];
    Ok((headers, photo.data).into_response())
}
