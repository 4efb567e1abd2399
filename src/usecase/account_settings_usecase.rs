use tracing::info;

use crate::{
    domain::{
        error::{DomainError, RepositoryError},
        models::account::{Account, AvatarReference, DisplayName, Identifier},
        repositories::account_repository::AccountRepository,
        services::password_service::PasswordHasher,
    },
    usecase::account_store::AccountStore,
};

/// Mutations of an existing account.
pub struct AccountSettingsUsecase<R: AccountRepository, P: PasswordHasher> {
    account_store: AccountStore<R, P>,
}

impl<R, P> AccountSettingsUsecase<R, P>
where
    R: AccountRepository + Send + Sync,
    P: PasswordHasher + Send + Sync + 'static,
{
    pub fn new(account_store: AccountStore<R, P>) -> Self {
        Self { account_store }
    }

    async fn load(&self, identifier: String) -> Result<Account, DomainError> {
        let identifier = Identifier::new(identifier)?;
        let account = self
            .account_store
            .find(&identifier)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok(account)
    }

    pub async fn change_password(
        &self,
        identifier: String,
        new_password: String,
    ) -> Result<Account, DomainError> {
        if new_password.is_empty() {
            return Err(DomainError::Validation("password is required".to_string()));
        }

        let mut account = self.load(identifier).await?;
        account.set_password(new_password);
        let account = self.account_store.save(account).await?;

        info!(identifier = %account.identifier(), "password changed");
        Ok(account)
    }

    /// Replace profile fields; `None` for the avatar falls back to the default.
    pub async fn update_profile(
        &self,
        identifier: String,
        display_name: Option<DisplayName>,
        avatar_reference: Option<AvatarReference>,
    ) -> Result<Account, DomainError> {
        let mut account = self.load(identifier).await?;
        account.set_display_name(display_name);
        account.set_avatar_reference(avatar_reference);
        self.account_store.save(account).await
    }
}
