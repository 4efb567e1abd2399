use tracing::debug;

use crate::domain::{
    error::{DomainError, RepositoryError},
    models::account::{Account, Identifier},
    repositories::account_repository::AccountRepository,
    services::{account_lifecycle::AccountLifecycle, password_service::PasswordHasher},
};

/// Run a hashing call on tokio's blocking pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, DomainError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DomainError::Hashing(format!("hashing task failed: {}", e)))?
}

/// Repository wrapper that runs the pre-persist hook before every write.
#[derive(Clone)]
pub struct AccountStore<R: AccountRepository, P: PasswordHasher> {
    repository: R,
    lifecycle: AccountLifecycle<P>,
}

impl<R, P> AccountStore<R, P>
where
    R: AccountRepository + Send + Sync,
    P: PasswordHasher + Send + Sync + 'static,
{
    pub fn new(repository: R, lifecycle: AccountLifecycle<P>) -> Self {
        Self {
            repository,
            lifecycle,
        }
    }

    pub fn lifecycle(&self) -> &AccountLifecycle<P> {
        &self.lifecycle
    }

    pub async fn find(&self, identifier: &Identifier) -> Result<Option<Account>, DomainError> {
        Ok(self.repository.find_by_identifier(identifier).await?)
    }

    /// Persist a new account. The store reports a taken identifier.
    pub async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let prepared = self.prepare(account, None).await?;
        self.repository.insert(&prepared).await?;
        Ok(prepared)
    }

    /// Persist changes to an existing account, hashing only a changed password.
    pub async fn save(&self, account: Account) -> Result<Account, DomainError> {
        let previous = self
            .repository
            .find_by_identifier(account.identifier())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let prepared = self.prepare(account, Some(previous)).await?;
        self.repository.update(&prepared).await?;
        debug!(identifier = %prepared.identifier(), "account saved");
        Ok(prepared)
    }

    pub async fn prepare(
        &self,
        account: Account,
        previous: Option<Account>,
    ) -> Result<Account, DomainError> {
        let lifecycle = self.lifecycle.clone();
        run_blocking(move || lifecycle.prepare_for_save(account, previous.as_ref())).await
    }

    pub async fn check_password(&self, account: &Account, candidate: &str) -> Result<bool, DomainError> {
        let lifecycle = self.lifecycle.clone();
        let account = account.clone();
        let candidate = candidate.to_string();
        run_blocking(move || lifecycle.check_password(&account, &candidate)).await
    }
}
