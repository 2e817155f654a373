//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `JWT_SECRET` - access token signing secret
//! - `JWT_REFRESH_SECRET` - refresh token signing secret
//!
//! ## Optional
//! - `HOST` / `PORT` - bind address (default: 127.0.0.1:5000)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 10)
//! - `FRONTEND_URL` - base URL for CORS and email links (default: http://localhost:3000)
//! - `JWT_EXPIRE` / `JWT_REFRESH_EXPIRE` - token lifetimes (default: 7d / 30d)
//! - `DELIVERY_CHARGE` - flat charge added to every order (default: 50)
//! - `RAZORPAY_KEY_ID` / `RAZORPAY_KEY_SECRET` - payment gateway credentials
//! - `SENDGRID_API_KEY` / `SENDGRID_FROM_EMAIL` / `SENDGRID_FROM_NAME` - email delivery

use std::env;
use std::str::FromStr;

use chrono::Duration;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: SecretString,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub frontend_url: String,
    pub jwt: JwtConfig,
    pub delivery_charge: Decimal,
    pub razorpay: Option<RazorpayConfig>,
    pub email: EmailConfig,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: SecretString,
    pub access_ttl: Duration,
    pub refresh_secret: SecretString,
    pub refresh_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: SecretString,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Delivery is disabled (logged only) when absent
    pub sendgrid_api_key: Option<SecretString>,
    pub from_email: String,
    pub from_name: String,
}

impl AppConfig {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let jwt = JwtConfig {
            access_secret: SecretString::from(required("JWT_SECRET")?),
            access_ttl: parse_ttl("JWT_EXPIRE", &get("JWT_EXPIRE").unwrap_or_else(|| "7d".into()))?,
            refresh_secret: SecretString::from(required("JWT_REFRESH_SECRET")?),
            refresh_ttl: parse_ttl(
                "JWT_REFRESH_EXPIRE",
                &get("JWT_REFRESH_EXPIRE").unwrap_or_else(|| "30d".into()),
            )?,
        };

        let razorpay = match (get("RAZORPAY_KEY_ID"), get("RAZORPAY_KEY_SECRET")) {
            (Some(key_id), Some(secret)) => Some(RazorpayConfig {
                key_id,
                key_secret: SecretString::from(secret),
            }),
            _ => None,
        };

        let email = EmailConfig {
            sendgrid_api_key: get("SENDGRID_API_KEY").map(SecretString::from),
            from_email: get("SENDGRID_FROM_EMAIL").unwrap_or_else(|| "noreply@electronicshub.com".into()),
            from_name: get("SENDGRID_FROM_NAME").unwrap_or_else(|| "Electronics Hub".into()),
        };

        Ok(Self {
            database_url: SecretString::from(required("DATABASE_URL")?),
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port: parse_or("PORT", get("PORT"), 5000)?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 10)?,
            frontend_url: get("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".into())
                .trim_end_matches('/')
                .to_string(),
            jwt,
            delivery_charge: parse_or("DELIVERY_CHARGE", get("DELIVERY_CHARGE"), Decimal::from(50))?,
            razorpay,
            email,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(key.to_string(), raw)),
        None => Ok(default),
    }
}

/// Parse a lifetime such as `7d`, `12h`, `30m` or `3600` (seconds).
fn parse_ttl(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidEnvVar(key.to_string(), raw.to_string());
    let raw = raw.trim();

    let (number, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], c),
        Some(_) => (raw, 's'),
        None => return Err(invalid()),
    };
    let n: i64 = number.parse().map_err(|_| invalid())?;
    if n <= 0 {
        return Err(invalid());
    }

    match unit {
        's' => Ok(Duration::seconds(n)),
        'm' => Ok(Duration::minutes(n)),
        'h' => Ok(Duration::hours(n)),
        'd' => Ok(Duration::days(n)),
        _ => Err(invalid()),
    }
}
