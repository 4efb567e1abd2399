use tokio::sync::OnceCell;
use tracing::debug;

use crate::{
    domain::{
        error::DomainError,
        models::{account::Identifier, credential::HashedPassword},
        repositories::account_repository::AccountRepository,
        services::password_service::PasswordHasher,
    },
    usecase::account_store::{AccountStore, run_blocking},
};

const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

pub struct LoginUsecase<R: AccountRepository, P: PasswordHasher> {
    account_store: AccountStore<R, P>,
    dummy_hash: OnceCell<HashedPassword>,
}

impl<R, P> LoginUsecase<R, P>
where
    R: AccountRepository + Send + Sync,
    P: PasswordHasher + Send + Sync + 'static,
{
    pub fn new(account_store: AccountStore<R, P>) -> Self {
        Self {
            account_store,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Check a candidate password for an identifier.
    ///
    /// An unknown identifier and a wrong password both return `Ok(false)` and
    /// both pay for one full verification. Errors are reserved for broken
    /// stored hashes and store failures.
    pub async fn authenticate(&self, identifier: String, password: String) -> Result<bool, DomainError> {
        let account = match Identifier::new(identifier) {
            Ok(identifier) => self.account_store.find(&identifier).await?,
            Err(_) => None,
        };

        match account {
            Some(account) => {
                let matched = self.account_store.check_password(&account, &password).await?;
                debug!(identifier = %account.identifier(), matched, "password checked");
                Ok(matched)
            }
            None => {
                self.verify_dummy(password).await?;
                debug!("password checked for unknown account");
                Ok(false)
            }
        }
    }

    async fn verify_dummy(&self, password: String) -> Result<(), DomainError> {
        let hasher = self.account_store.lifecycle().password_hasher().clone();
        let dummy_hash = self
            .dummy_hash
            .get_or_try_init(|| {
                let hasher = hasher.clone();
                run_blocking(move || hasher.hash(DUMMY_PASSWORD))
            })
            .await?
            .clone();

        run_blocking(move || hasher.verify(&password, &dummy_hash)).await?;
        Ok(())
    }
}
