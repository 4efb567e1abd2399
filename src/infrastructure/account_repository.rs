use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Schema,
    SqlErr,
};

use crate::domain::{
    error::RepositoryError,
    models::{
        account::{Account, Identifier},
        credential::HashedPassword,
    },
    repositories::account_repository::AccountRepository,
};
use crate::infrastructure::entity::accounts;

#[derive(Clone)]
pub struct SeaOrmAccountRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the `accounts` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        let backend = self.db.get_database_backend();
        let mut statement = Schema::new(backend).create_table_from_entity(accounts::Entity);
        statement.if_not_exists();

        self.db
            .execute(backend.build(&statement))
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

fn to_active_model(account: &Account) -> Result<accounts::ActiveModel, RepositoryError> {
    let password_hash = account.credential_hash().ok_or_else(|| {
        RepositoryError::DatabaseError("refusing to store an unhashed password".to_string())
    })?;
    let avatar_reference = account
        .avatar_reference()
        .ok_or_else(|| RepositoryError::DatabaseError("avatar reference missing".to_string()))?;

    Ok(accounts::ActiveModel {
        identifier: Set(account.identifier().as_str().to_string()),
        password_hash: Set(password_hash.as_str().to_string()),
        display_name: Set(account.display_name().map(str::to_string)),
        avatar_reference: Set(avatar_reference.to_string()),
        created_at: Set(account.created_at().fixed_offset()),
        updated_at: Set(account.updated_at().fixed_offset()),
    })
}

fn to_domain(model: accounts::Model) -> Result<Account, RepositoryError> {
    let identifier = Identifier::new(model.identifier)
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

    // stored hash is handed back verbatim
    Ok(Account::reconstruct(
        identifier,
        HashedPassword::new(model.password_hash),
        model.display_name,
        Some(model.avatar_reference),
        model.created_at.with_timezone(&Utc),
        model.updated_at.with_timezone(&Utc),
    ))
}

fn map_write_error(error: DbErr) -> RepositoryError {
    match error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => RepositoryError::DuplicateIdentifier,
        _ => RepositoryError::DatabaseError(error.to_string()),
    }
}

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Account>, RepositoryError> {
        let account = accounts::Entity::find_by_id(identifier.as_str().to_string())
            .one(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        account.map(to_domain).transpose()
    }

    async fn insert(&self, account: &Account) -> Result<(), RepositoryError> {
        let model = to_active_model(account)?;
        accounts::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<(), RepositoryError> {
        let mut model = to_active_model(account)?;
        model.created_at = NotSet;

        let result = accounts::Entity::update_many()
            .set(model)
            .filter(accounts::Column::Identifier.eq(account.identifier().as_str()))
            .exec(&self.db)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
