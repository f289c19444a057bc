//! Server configuration loaded from environment variables.

use std::env;

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (default: 0.0.0.0)
    pub host: String,
    /// Bind port (default: 4000)
    pub port: u16,
    /// Deployment environment name, reported by the health endpoint
    pub environment: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST` (optional, default: 0.0.0.0): bind address
    /// - `PORT` (optional, default: 4000): bind port; invalid values fall back
    /// - `APP_ENV` (optional, default: development): environment label
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(4000);
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Self {
            host,
            port,
            environment,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            environment: "development".to_string(),
        }
    }
}
