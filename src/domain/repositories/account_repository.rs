use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::account::{Account, Identifier},
};

/// Durable store for accounts keyed by identifier.
///
/// Implementations only ever receive persistable accounts (credential hash in
/// place of the cleartext password).
#[async_trait]
pub trait AccountRepository {
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Account>, RepositoryError>;

    /// Fails with `RepositoryError::DuplicateIdentifier` when the key is taken.
    async fn insert(&self, account: &Account) -> Result<(), RepositoryError>;

    /// Fails with `RepositoryError::NotFound` when no row has the key.
    async fn update(&self, account: &Account) -> Result<(), RepositoryError>;
}
