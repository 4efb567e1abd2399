use tracing::{info, warn};

use crate::{
    domain::{
        error::DomainError,
        models::account::{Account, Identifier, Profile},
        repositories::account_repository::AccountRepository,
        services::password_service::PasswordHasher,
    },
    usecase::account_store::AccountStore,
};

pub struct RegisterAccountUsecase<R: AccountRepository, P: PasswordHasher> {
    account_store: AccountStore<R, P>,
}

impl<R, P> RegisterAccountUsecase<R, P>
where
    R: AccountRepository + Send + Sync,
    P: PasswordHasher + Send + Sync + 'static,
{
    pub fn new(account_store: AccountStore<R, P>) -> Self {
        Self { account_store }
    }

    pub async fn register(
        &self,
        identifier: String,
        password: String,
        profile: Profile,
    ) -> Result<Account, DomainError> {
        let identifier = Identifier::new(identifier)?;
        if password.is_empty() {
            return Err(DomainError::Validation("password is required".to_string()));
        }

        let account = Account::new(identifier, password, profile);
        match self.account_store.create(account).await {
            Ok(account) => {
                info!(identifier = %account.identifier(), "account registered");
                Ok(account)
            }
            Err(DomainError::DuplicateIdentifier) => {
                warn!("registration rejected, identifier already taken");
                Err(DomainError::DuplicateIdentifier)
            }
            Err(e) => Err(e),
        }
    }
}
