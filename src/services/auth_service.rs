use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::issue_token,
    models::User,
    response::{ApiResponse, Meta},
};

const UNIFORM_LOGIN_ERROR: &str = "Invalid email or password. Please try again";

/// Minimal shape check: `local@domain.tld`.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        return Err(AppError::Validation("No email provided".into()));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation(
            "Provided email is not an email address".into(),
        ));
    }
    Ok(())
}

/// At least six characters with one digit, one lowercase and one uppercase
/// letter.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    let long_enough = password.chars().count() >= 6;
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());

    if long_enough && has_digit && has_lower && has_upper {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Your password should contain at least one number, one lowercase, \
             one uppercase letter and at least six characters"
                .into(),
        ))
    }
}

pub async fn register_user(pool: &DbPool, payload: RegisterRequest) -> AppResult<ApiResponse<User>> {
    let RegisterRequest { email, password } = payload;
    validate_email(&email)?;
    validate_password(&password)?;

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::Conflict("User already exists.".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();

    let user: User = sqlx::query_as(
        "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(id)
    .bind(email.as_str())
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|err| match err {
        // Pre-check raced with a concurrent registration.
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            AppError::Conflict("User already exists.".to_string())
        }
        other => other.into(),
    })?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(ApiResponse::success(
        "You registered successfully. Please log in.",
        user,
        None,
    ))
}

pub async fn login_user(
    pool: &DbPool,
    jwt_secret: &str,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    // Unknown email and wrong password fail identically so callers cannot
    // enumerate registered addresses.
    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized(UNIFORM_LOGIN_ERROR.into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized(UNIFORM_LOGIN_ERROR.into()));
    }

    let access_token = issue_token(jwt_secret, user.id, user.is_admin)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(ApiResponse::success(
        "You logged in successfully.",
        LoginResponse { access_token },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user@dot.").is_err());
    }

    #[test]
    fn password_needs_all_character_classes() {
        assert!(validate_password("Passw0rd").is_ok());
        assert!(validate_password("passw0rd").is_err()); // no uppercase
        assert!(validate_password("PASSW0RD").is_err()); // no lowercase
        assert!(validate_password("Password").is_err()); // no digit
    }

    #[test]
    fn password_needs_six_characters() {
        assert!(validate_password("Pw1ab").is_err());
        assert!(validate_password("Pw1abc").is_ok());
    }
}
