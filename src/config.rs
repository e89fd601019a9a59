use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub redis_url: Option<String>,
    pub cache_ttl_secs: u64,
    pub smtp: Option<SmtpConfig>,
}

/// Mail settings for the departure-reminder task. The task is only
/// spawned when all of these are present in the environment.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        // No fallback secret: a guessable signing key makes every token forgeable.
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let redis_url = env::var("REDIS_URL").ok();
        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(300);
        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            redis_url,
            cache_ttl_secs,
            smtp: SmtpConfig::from_env(),
        })
    }
}

impl SmtpConfig {
    fn from_env() -> Option<Self> {
        let server = env::var("SMTP_SERVER").ok()?;
        let username = env::var("SMTP_USERNAME").ok()?;
        let password = env::var("SMTP_PASSWORD").ok()?;
        let from = env::var("MAIL_FROM").ok()?;
        let port = env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(587);
        Some(Self {
            server,
            port,
            username,
            password,
            from,
        })
    }
}
