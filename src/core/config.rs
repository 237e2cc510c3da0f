//! Configuration - environment-backed settings

use std::env;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string, e.g. `sqlite://huddle.db?mode=rwc`.
    pub database_url: String,
    /// Secret for verifying the session provider's bearer tokens.
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// When set, creating a direct room with a user you already share one
    /// with returns the existing room instead of a new one.
    pub reuse_direct_rooms: bool,
}

impl Config {
    /// Loads configuration from the environment. `DATABASE_URL` and
    /// `JWT_SECRET` are required; the rest have defaults.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            reuse_direct_rooms: env::var("REUSE_DIRECT_ROOMS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}
