use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::PhotoMeta,
    response::{ApiResponse, Meta},
};

const ALLOWED_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

pub fn validate_content_type(content_type: &str) -> Result<(), AppError> {
    if ALLOWED_CONTENT_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Unsupported content type '{content_type}': expected image/jpeg or image/png"
        )))
    }
}

pub async fn upload_photo(
    pool: &DbPool,
    user: &AuthUser,
    name: String,
    content_type: String,
    data: Vec<u8>,
) -> AppResult<ApiResponse<PhotoMeta>> {
    validate_content_type(&content_type)?;
    if data.is_empty() {
        return Err(AppError::Validation("Empty photo upload".into()));
    }

    let photo: PhotoMeta = sqlx::query_as(
        r#"
        INSERT INTO photos (id, name, content_type, data, uploaded_by)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, content_type, uploaded_by, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name.as_str())
    .bind(content_type.as_str())
    .bind(data)
    .bind(user.user_id)
    .fetch_one(pool)
    .await?;

    tracing::info!(photo_id = %photo.id, user_id = %user.user_id, "photo uploaded");

    Ok(ApiResponse::success(
        format!("Photo {name} successfully uploaded."),
        photo,
        Some(Meta::empty()),
    ))
}

#[derive(Debug, sqlx::FromRow)]
pub struct PhotoDownload {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Latest-wins retrieval: the most recently created photo for the actor.
pub async fn download_latest(pool: &DbPool, user: &AuthUser) -> AppResult<PhotoDownload> {
    let photo: Option<PhotoDownload> = sqlx::query_as(
        r#"
        SELECT name, content_type, data FROM photos
        WHERE uploaded_by = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user.user_id)
    .fetch_optional(pool)
    .await?;

    photo.ok_or(AppError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_and_png_are_allowed() {
        assert!(validate_content_type("image/jpeg").is_ok());
        assert!(validate_content_type("image/png").is_ok());
    }

    #[test]
    fn other_types_are_rejected() {
        assert!(validate_content_type("image/gif").is_err());
        assert!(validate_content_type("application/pdf").is_err());
        assert!(validate_content_type("").is_err());
    }
}
