use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    error::RepositoryError,
    models::account::{Account, Identifier},
    repositories::account_repository::AccountRepository,
};

/// Process-local account store. Writes are serialized by the lock.
#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Identifier, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.read().await.get(identifier).cloned())
    }

    async fn insert(&self, account: &Account) -> Result<(), RepositoryError> {
        if !account.is_persistable() {
            return Err(RepositoryError::DatabaseError(
                "refusing to store an unhashed password".to_string(),
            ));
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(account.identifier()) {
            return Err(RepositoryError::DuplicateIdentifier);
        }
        accounts.insert(account.identifier().clone(), account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<(), RepositoryError> {
        if !account.is_persistable() {
            return Err(RepositoryError::DatabaseError(
                "refusing to store an unhashed password".to_string(),
            ));
        }

        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(account.identifier()) {
            Some(existing) => {
                *existing = account.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}
