/**
 * Server Configuration
 *
 * This module loads server configuration from the environment (after
 * `dotenv` has read `.env`) and opens the optional PostgreSQL pool.
 *
 * # Configuration Sources
 *
 * | Variable                 | Default                  |
 * |--------------------------|--------------------------|
 * | `SERVER_PORT`            | `5000`                   |
 * | `JWT_SECRET`             | development secret       |
 * | `TOKEN_TTL_HOURS`        | `168`                    |
 * | `DATABASE_URL`           | unset: in-memory store   |
 * | `SMTP_HOST` and friends  | unset: logging notifier  |
 * | `FRONTEND_URL`           | `http://localhost:3000`  |
 * | `SESSION_QUEUE_CAPACITY` | `256`                    |
 * | `BCRYPT_COST`            | `bcrypt::DEFAULT_COST`   |
 *
 * # Error Handling
 *
 * Configuration errors are logged but do not prevent server startup.
 * Invalid numbers fall back to their defaults, and a database that cannot be
 * reached leaves the server on the in-memory store.
 */

use sqlx::PgPool;
use std::str::FromStr;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 168;
const DEFAULT_SESSION_QUEUE_CAPACITY: usize = 256;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEVELOPMENT_JWT_SECRET: &str = "editsync-development-secret";

/// SMTP relay settings
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

/// Runtime configuration
#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub database_url: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub frontend_url: String,
    /// Outbound events buffered per realtime session before drops
    pub session_queue_capacity: usize,
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("database", &self.database_url.is_some())
            .field("smtp", &self.smtp)
            .field("frontend_url", &self.frontend_url)
            .field("session_queue_capacity", &self.session_queue_capacity)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            database_url: None,
            smtp: None,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            session_queue_capacity: DEFAULT_SESSION_QUEUE_CAPACITY,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set. Using the development secret; do not run like this in production.");
            defaults.jwt_secret.clone()
        });

        let smtp = match (get("SMTP_HOST"), get("SMTP_USERNAME"), get("SMTP_PASSWORD")) {
            (Some(host), Some(username), Some(password)) => {
                let from = get("MAIL_FROM").unwrap_or_else(|| username.clone());
                Some(SmtpConfig {
                    host,
                    username,
                    password,
                    from,
                })
            }
            (None, None, None) => None,
            _ => {
                tracing::warn!("SMTP settings incomplete. Mail will be logged instead of sent.");
                None
            }
        };

        Self {
            port: parse_or(get("SERVER_PORT"), "SERVER_PORT", defaults.port),
            jwt_secret,
            token_ttl_hours: parse_or(get("TOKEN_TTL_HOURS"), "TOKEN_TTL_HOURS", defaults.token_ttl_hours),
            database_url: get("DATABASE_URL"),
            smtp,
            frontend_url: get("FRONTEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.frontend_url),
            session_queue_capacity: parse_or(
                get("SESSION_QUEUE_CAPACITY"),
                "SESSION_QUEUE_CAPACITY",
                defaults.session_queue_capacity,
            )
            .max(1),
            bcrypt_cost: parse_or(get("BCRYPT_COST"), "BCRYPT_COST", defaults.bcrypt_cost),
        }
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match value {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {} value {:?}, using default {}", key, raw, default);
            default
        }),
    }
}

/// Connect to PostgreSQL and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if the connection fails; the caller falls back to memory
///
/// Migration failures are logged and the pool is still returned.
pub async fn load_database(database_url: &str) -> Option<PgPool> {
    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to the in-memory store.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
