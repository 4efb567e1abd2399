use thiserror::Error;

use crate::{
    domain::{
        error::DomainError,
        services::account_lifecycle::{AccountLifecycle, DEFAULT_AVATAR_REFERENCE},
    },
    infrastructure::argon2_password_hasher::{Argon2Cost, Argon2PasswordHasher},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub default_avatar: String,
    pub argon2_cost: Argon2Cost,
}

impl AppConfig {
    /// Read settings from the process environment, loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // a missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Argon2Cost::default();
        let argon2_cost = Argon2Cost {
            memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL"),
            default_avatar: lookup("DEFAULT_AVATAR")
                .unwrap_or_else(|| DEFAULT_AVATAR_REFERENCE.to_string()),
            argon2_cost,
        })
    }

    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }

    pub fn account_lifecycle(&self) -> Result<AccountLifecycle<Argon2PasswordHasher>, DomainError> {
        let hasher = Argon2PasswordHasher::with_cost(self.argon2_cost)?;
        Ok(AccountLifecycle::new(hasher, self.default_avatar.clone()))
    }
}

fn parse_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.default_avatar, "/img/default_user_pic.jpg");
        assert_eq!(config.argon2_cost, Argon2Cost::default());
        assert!(matches!(
            config.require_database_url(),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("DEFAULT_AVATAR", "/img/placeholder.png"),
            ("ARGON2_MEMORY_KIB", "65536"),
            ("ARGON2_ITERATIONS", " 3 "),
        ]))
        .unwrap();

        assert_eq!(config.require_database_url().unwrap(), "sqlite::memory:");
        assert_eq!(config.default_avatar, "/img/placeholder.png");
        assert_eq!(config.argon2_cost.memory_kib, 65536);
        assert_eq!(config.argon2_cost.iterations, 3);
        assert_eq!(config.argon2_cost.parallelism, 1);
    }

    #[test]
    fn unparseable_cost_is_rejected() {
        let result = AppConfig::from_lookup(lookup(&[("ARGON2_ITERATIONS", "many")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "ARGON2_ITERATIONS", .. })
        ));
    }

    #[test]
    fn out_of_range_cost_fails_when_building_the_hasher() {
        let config = AppConfig::from_lookup(lookup(&[("ARGON2_MEMORY_KIB", "1")])).unwrap();
        assert!(matches!(
            config.account_lifecycle(),
            Err(DomainError::Hashing(_))
        ));
    }
}
