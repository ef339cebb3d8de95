use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// S3-compatible bucket that hosts uploaded media.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub public_base_url: String,
}

/// Outgoing SMTP relay for password-reset mail. Absent when `SMTP_HOST` is
/// not set.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    fn from_env() -> Option<Self> {
        let host = non_empty_env("SMTP_HOST")?;
        Some(Self {
            host,
            port: parse_env("SMTP_PORT").unwrap_or(587),
            from: non_empty_env("SMTP_FROM").unwrap_or_else(|| "noreply@folio.local".into()),
            user: non_empty_env("SMTP_USER"),
            password: non_empty_env("SMTP_PASSWORD"),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub media: MediaConfig,
    pub smtp: Option<SmtpConfig>,
    pub cookie_ttl_days: i64,
    pub portfolio_url: Option<String>,
    pub dashboard_url: Option<String>,
    pub production: bool,
    pub keepalive_minutes: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "folio".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "folio-dashboard".into()),
            ttl_minutes: parse_env("JWT_TTL_MINUTES").unwrap_or(60 * 24 * 7),
        };

        let endpoint = std::env::var("MEDIA_ENDPOINT").context("MEDIA_ENDPOINT is not set")?;
        let bucket = std::env::var("MEDIA_BUCKET").context("MEDIA_BUCKET is not set")?;
        let public_base_url = std::env::var("MEDIA_PUBLIC_URL")
            .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));
        let media = MediaConfig {
            access_key: std::env::var("MEDIA_ACCESS_KEY").context("MEDIA_ACCESS_KEY is not set")?,
            secret_key: std::env::var("MEDIA_SECRET_KEY").context("MEDIA_SECRET_KEY is not set")?,
            region: std::env::var("MEDIA_REGION").unwrap_or_else(|_| "us-east-1".into()),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            endpoint,
            bucket,
        };

        Ok(Self {
            database_url,
            jwt,
            media,
            smtp: SmtpConfig::from_env(),
            cookie_ttl_days: parse_env("COOKIE_EXPIRES_DAYS").unwrap_or(7),
            portfolio_url: non_empty_env("PORTFOLIO_URL"),
            dashboard_url: non_empty_env("DASHBOARD_URL"),
            production: std::env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            keepalive_minutes: parse_env("KEEPALIVE_MINUTES").unwrap_or(14),
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
