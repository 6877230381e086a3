use std::path::PathBuf;

use thiserror::Error;

/// Signing secrets that must never reach production.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "dev-secret-change-me", "secret"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SECRET is unset, blank or still a placeholder")]
    MissingSecret,
    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub secret: String,
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("SECRET").unwrap_or_default();
        if secret.trim().is_empty() || PLACEHOLDER_SECRETS.contains(&secret.as_str()) {
            return Err(ConfigError::MissingSecret);
        }

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 3344,
        };

        Ok(Self {
            secret,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: lookup("DATABASE_PATH")
                .unwrap_or_else(|| "eventboard.db".into())
                .into(),
        })
    }
}
