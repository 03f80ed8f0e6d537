//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `JWT_SECRET` (required): HMAC secret used to sign and verify session tokens
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `JWT_ISSUER` / `JWT_AUDIENCE` (optional): expected `iss` / `aud` claims
/// - `JWT_TTL_MINUTES` (optional): token lifetime, defaults to 60
/// - `ALIAS_WORDS_PATH` (optional): replacement dictionary for alias generation
/// - `LOG_FORMAT` (optional): `json` or `pretty`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    pub jwt_secret: String,

    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,

    #[serde(default = "default_audience")]
    pub jwt_audience: String,

    #[serde(default = "default_ttl_minutes")]
    pub jwt_ttl_minutes: u64,

    #[serde(default)]
    pub alias_words_path: Option<String>,

    #[serde(default)]
    pub log_format: LogFormat,
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

fn default_issuer() -> String {
    "digital-money-house".to_string()
}

fn default_audience() -> String {
    "dmh-clients".to_string()
}

fn default_ttl_minutes() -> u64 {
    60
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first when present.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable (`DATABASE_URL`, `JWT_SECRET`) is
    /// missing or a value cannot be parsed into its expected type.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        // Field names are converted automatically: jwt_secret -> JWT_SECRET
        envy::from_env::<Config>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_optional_variables() {
        let vars = vec![
            ("DATABASE_URL".to_string(), "postgres://localhost/dmh".to_string()),
            ("JWT_SECRET".to_string(), "secret".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.jwt_issuer, "digital-money-house");
        assert_eq!(config.jwt_ttl_minutes, 60);
        assert_eq!(config.alias_words_path, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn missing_secret_is_rejected() {
        let vars = vec![("DATABASE_URL".to_string(), "postgres://localhost/dmh".to_string())];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }

    #[test]
    fn json_log_format_is_parsed() {
        let vars = vec![
            ("DATABASE_URL".to_string(), "postgres://localhost/dmh".to_string()),
            ("JWT_SECRET".to_string(), "secret".to_string()),
            ("LOG_FORMAT".to_string(), "json".to_string()),
            ("SERVER_PORT".to_string(), "8080".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.server_port, 8080);
    }
}
