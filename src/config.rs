use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub app: AppConfig,
    pub booking: BookingPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
}

/// Tunable booking-path policy. These are policy knobs, not invariants;
/// the conflict predicate itself is not configurable.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingPolicy {
    /// Allowed mismatch between a requested slot's duration and the event
    /// type's configured duration, in seconds.
    pub duration_tolerance_secs: i64,
    /// Fixed rate-limit window for the public booking endpoint, in seconds.
    pub rate_limit_window_secs: u64,
    /// Maximum requests per (client IP, event type slug) per window.
    pub rate_limit_max_requests: u32,
    /// Upper bound on any single storage operation in the admission path,
    /// in seconds. Exceeding it fails the request closed.
    pub storage_timeout_secs: u64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            duration_tolerance_secs: 60,
            rate_limit_window_secs: 60,
            rate_limit_max_requests: 5,
            storage_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Server configuration
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // Database configuration
        let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => Some(
                val.parse()
                    .context("Failed to parse DATABASE_MAX_CONNECTIONS")?,
            ),
            Err(_) => Some(10),
        };
        let db_min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
            Ok(val) => Some(
                val.parse()
                    .context("Failed to parse DATABASE_MIN_CONNECTIONS")?,
            ),
            Err(_) => Some(1),
        };

        // App configuration
        let environment_str =
            env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let environment = match environment_str.to_lowercase().as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "Shutterbook".to_string());

        // Booking policy, env-overridable with sensible defaults
        let defaults = BookingPolicy::default();
        let booking = BookingPolicy {
            duration_tolerance_secs: match env::var("BOOKING_DURATION_TOLERANCE_SECS") {
                Ok(val) => val
                    .parse()
                    .context("Failed to parse BOOKING_DURATION_TOLERANCE_SECS")?,
                Err(_) => defaults.duration_tolerance_secs,
            },
            rate_limit_window_secs: match env::var("BOOKING_RATE_LIMIT_WINDOW_SECS") {
                Ok(val) => val
                    .parse()
                    .context("Failed to parse BOOKING_RATE_LIMIT_WINDOW_SECS")?,
                Err(_) => defaults.rate_limit_window_secs,
            },
            rate_limit_max_requests: match env::var("BOOKING_RATE_LIMIT_MAX_REQUESTS") {
                Ok(val) => val
                    .parse()
                    .context("Failed to parse BOOKING_RATE_LIMIT_MAX_REQUESTS")?,
                Err(_) => defaults.rate_limit_max_requests,
            },
            storage_timeout_secs: match env::var("BOOKING_STORAGE_TIMEOUT_SECS") {
                Ok(val) => val
                    .parse()
                    .context("Failed to parse BOOKING_STORAGE_TIMEOUT_SECS")?,
                Err(_) => defaults.storage_timeout_secs,
            },
        };

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            app: AppConfig {
                name: app_name,
                environment,
            },
            booking,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    #[allow(unused)]
    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }
}

// Use once_cell for a global config instance that's initialized once
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

pub fn get() -> &'static Config {
    CONFIG.get().expect("Config is not initialized")
}
