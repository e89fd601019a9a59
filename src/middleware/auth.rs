use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, state::AppState};

const TOKEN_TTL_HOURS: i64 = 24;

/// Identity resolved from the request's bearer credential. Lives only for
/// the request; nothing is shared across requests.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub is_admin: bool,
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if !user.is_admin {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Sign a 24-hour credential binding the subject id and admin flag.
pub fn issue_token(secret: &str, user_id: Uuid, is_admin: bool) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("failed to compute expiry")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        admin: is_admin,
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Verify a token and return its claims. Expiry and structural failures are
/// reported with distinct messages, both as 401.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Expired token. Please login to get a new token".into())
        }
        _ => AppError::Unauthorized("Invalid token. Please register or login".into()),
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        // Both `Authorization: <token>` and `Authorization: Bearer <token>`
        // are accepted.
        let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized("Missing Authorization header".into()));
        }

        let state = AppState::from_ref(state);
        let claims = verify_token(&state.jwt_secret, token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token. Please register or login".into()))?;

        Ok(AuthUser {
            user_id,
            is_admin: claims.admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_to_the_same_subject() {
        let user_id = Uuid::new_v4();
        let token = issue_token(SECRET, user_id, false).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert!(!claims.admin);
    }

    #[test]
    fn admin_flag_survives_the_round_trip() {
        let token = issue_token(SECRET, Uuid::new_v4(), true).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert!(claims.admin);
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = verify_token(SECRET, "not-a-token").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg.contains("Invalid token")));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = issue_token("other-secret", Uuid::new_v4(), false).unwrap();
        let err = verify_token(SECRET, &token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg.contains("Invalid token")));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let past = Utc::now() - Duration::hours(48);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            admin: false,
            iat: (past.timestamp()) as usize,
            exp: (past + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = verify_token(SECRET, &token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg.contains("Expired token")));
    }

    #[test]
    fn ensure_admin_rejects_regular_users() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            is_admin: false,
        };
        assert!(matches!(ensure_admin(&user), Err(AppError::Forbidden)));

        let admin = AuthUser {
            user_id: Uuid::new_v4(),
            is_admin: true,
        };
        assert!(ensure_admin(&admin).is_ok());
    }
}
