//! Startup configuration read from the environment
//!
//! `.env` is loaded first (if present), then:
//!
//! - `PORT` - companion service port (default: 8080)
//! - `DATABASE_URL` - history database file (default: `history.db`)
//! - `PUBLIC_ORIGIN` - origin used for synthesized short URLs
//!   (default: `http://localhost:{PORT}`)
//! - `SHORTENER_API_URL` - base address of the shortening service. Falls back to the
//!   value present at build time, then to the public origin.
//!
//! Values are read once; changing them requires a restart.

use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE: &str = "history.db";

/// Base address baked in when the crate was built, if any
const BUILD_API_URL: Option<&str> = option_env!("SHORTENER_API_URL");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub public_origin: String,
    pub api_base: String,
}

impl Config {
    /// Reads the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = var("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_url = var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let public_origin = var("PUBLIC_ORIGIN")
            .map(|o| strip_trailing_slash(o.trim()))
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        let api_base = var("SHORTENER_API_URL")
            .or_else(|| BUILD_API_URL.map(str::to_string).filter(|v| !v.trim().is_empty()))
            .map(|base| strip_trailing_slash(base.trim()))
            .unwrap_or_else(|| public_origin.clone());

        Self {
            port,
            database_url,
            public_origin,
            api_base,
        }
    }
}

/// Drops a single trailing `/`
pub fn strip_trailing_slash(value: &str) -> String {
    value.strip_suffix('/').unwrap_or(value).to_string()
}
