use std::env;
use std::net::SocketAddr;

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_DATABASE_NAME: &str = "fitwell";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Connection string that selects the in-process store instead of MongoDB.
pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// How the multi-step registration form is checked before moving on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepValidation {
    /// Report problems but always let the user advance; the final submit decides.
    Deferred,
    /// Refuse to advance while the current step has errors.
    Strict,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub environment: Environment,
    pub bind_addr: SocketAddr,
    pub step_validation: StepValidation,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = required(&lookup, "DATABASE_URL")?;
        let jwt_secret = required(&lookup, "JWT_SECRET")?;

        let database_name = lookup("DATABASE_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());

        let environment = match lookup("APP_ENV").as_deref().map(str::trim) {
            None | Some("") | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => {
                warn!("APP_ENV '{}' not recognised, using development", other);
                Environment::Development
            }
        };

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("BIND_ADDR '{}' is not a socket address, using {}", raw, DEFAULT_BIND_ADDR);
                default_bind_addr()
            }),
            None => default_bind_addr(),
        };

        let step_validation = match lookup("REGISTRATION_STEP_VALIDATION").as_deref().map(str::trim) {
            None | Some("") | Some("deferred") => StepValidation::Deferred,
            Some("strict") => StepValidation::Strict,
            Some(other) => {
                warn!("REGISTRATION_STEP_VALIDATION '{}' not recognised, using deferred", other);
                StepValidation::Deferred
            }
        };

        Ok(Self {
            database_url,
            database_name,
            jwt_secret,
            environment,
            bind_addr,
            step_validation,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }

    /// Session cookies only carry `Secure` in production.
    pub fn secure_cookies(&self) -> bool {
        self.environment.is_production()
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Err(ConfigError::Missing(key)),
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(key)),
        Some(value) => Ok(value.trim().to_string()),
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_required_values_have_no_fallback() {
        let result = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("DATABASE_URL"));

        let result = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "mongodb://localhost")]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET"));

        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://localhost"),
            ("JWT_SECRET", "   "),
        ]));
        assert_eq!(result.unwrap_err(), ConfigError::Empty("JWT_SECRET"));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://localhost:27017"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.database_name, DEFAULT_DATABASE_NAME);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.bind_addr, default_bind_addr());
        assert_eq!(config.step_validation, StepValidation::Deferred);
        assert!(!config.secure_cookies());
        assert!(!config.uses_memory_store());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_NAME", "fitwell_test"),
            ("APP_ENV", "production"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("REGISTRATION_STEP_VALIDATION", "strict"),
        ]))
        .unwrap();

        assert_eq!(config.database_name, "fitwell_test");
        assert!(config.secure_cookies());
        assert!(config.uses_memory_store());
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.step_validation, StepValidation::Strict);
    }

    #[test]
    fn test_unparseable_optionals_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("JWT_SECRET", "s3cret"),
            ("APP_ENV", "staging"),
            ("BIND_ADDR", "not-an-address"),
            ("REGISTRATION_STEP_VALIDATION", "sometimes"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.bind_addr, default_bind_addr());
        assert_eq!(config.step_validation, StepValidation::Deferred);
    }
}
