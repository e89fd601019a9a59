use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use flights_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "Admin123", true).await?;
    let user_id = ensure_user(&pool, "user@example.com", "User1234", false).await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, is_admin)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET is_admin = EXCLUDED.is_admin
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (admin={is_admin})");
    Ok(user_id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let cities = [
        ("Nairobi", "Kenya"),
        ("Amsterdam", "Netherlands"),
        ("Cape Town", "South Africa"),
        ("Lisbon", "Portugal"),
    ];

    let mut route_ids = Vec::new();
    for (city, country) in cities {
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM routes WHERE city = $1 AND country = $2 LIMIT 1")
                .bind(city)
                .bind(country)
                .fetch_optional(pool)
                .await?;
        let id = match existing {
            Some((id,)) => id,
            None => {
                let (id,): (Uuid,) = sqlx::query_as(
                    "INSERT INTO routes (id, city, country) VALUES ($1, $2, $3) RETURNING id",
                )
                .bind(Uuid::new_v4())
                .bind(city)
                .bind(country)
                .fetch_one(pool)
                .await?;
                id
            }
        };
        route_ids.push(id);
    }

    let (flights,): (i64,) = sqlx::query_as("SELECT count(*) FROM flights")
        .fetch_one(pool)
        .await?;
    if flights > 0 {
        println!("Flights already seeded");
        return Ok(());
    }

    for (i, pair) in route_ids.windows(2).enumerate() {
        let departure = Utc::now() + Duration::days(i as i64 + 1);
        sqlx::query(
            r#"
            INSERT INTO flights (id, origin_id, destination_id, departure, arrival, price_cents, capacity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pair[0])
        .bind(pair[1])
        .bind(departure)
        .bind(departure + Duration::hours(8))
        .bind(45_000_i64)
        .bind(180_i32)
        .execute(pool)
        .await?;
    }

    println!("Seeded routes and flights");
    Ok(())
}
