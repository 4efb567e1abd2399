use account_credentials::{
    AppConfig, init_tracing, infrastructure::account_repository::SeaOrmAccountRepository,
};
use sea_orm::{ConnectOptions, Database};
use tracing::info;

/// Prepares the account store: checks the hashing configuration and creates
/// the `accounts` table if it is missing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info");

    let config = AppConfig::from_env()?;
    // fail early on a bad cost setting
    config.account_lifecycle()?;

    let mut opt = ConnectOptions::new(config.require_database_url()?);
    opt.max_connections(10)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opt).await?;

    let repository = SeaOrmAccountRepository::new(db);
    repository.ensure_schema().await?;

    info!(
        memory_kib = config.argon2_cost.memory_kib,
        iterations = config.argon2_cost.iterations,
        parallelism = config.argon2_cost.parallelism,
        "account store ready"
    );
    Ok(())
}
