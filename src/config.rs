//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Apply pending migrations on startup
    pub run_migrations: bool,

    /// Superuser seeded at startup when both email and password are set
    pub first_superuser: Option<FirstSuperuser>,

    /// Allowed CORS origins (empty disables the CORS layer)
    pub cors_origins: Vec<String>,
}

/// Credentials of the superuser created on first start
#[derive(Clone)]
pub struct FirstSuperuser {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for FirstSuperuser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstSuperuser")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let run_migrations = parse_bool(
            &env::var("RUN_MIGRATIONS").unwrap_or_else(|_| "true".to_string()),
        )
        .ok_or(ConfigError::InvalidValue("RUN_MIGRATIONS"))?;

        let first_superuser = match (env::var("FIRST_SUPERUSER"), env::var("FIRST_SUPERUSER_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(FirstSuperuser { email, password }),
            (Ok(_), Err(_)) => return Err(ConfigError::MissingEnv("FIRST_SUPERUSER_PASSWORD")),
            (Err(_), Ok(_)) => return Err(ConfigError::MissingEnv("FIRST_SUPERUSER")),
            (Err(_), Err(_)) => None,
        };

        let cors_origins = env::var("BACKEND_CORS_ORIGINS")
            .map(|raw| split_origins(&raw))
            .unwrap_or_default();

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            run_migrations,
            first_superuser,
            cors_origins,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
