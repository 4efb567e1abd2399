pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod usecase;

pub use config::{AppConfig, ConfigError};
pub use domain::{
    error::{DomainError, RepositoryError},
    models::account::{Account, Identifier, Profile},
};

/// Install the stderr `tracing` subscriber, honouring `RUST_LOG`.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}
