use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Hashing failed: {0}")]
    Hashing(String),

    #[error("Account already exists")]
    DuplicateIdentifier,

    #[error("Account not found")]
    NotFound,
}

impl From<RepositoryError> for DomainError {
    fn from(error: RepositoryError) -> Self {
        // keep the two caller-facing store failures as distinct variants
        match error {
            RepositoryError::NotFound => DomainError::NotFound,
            RepositoryError::DuplicateIdentifier => DomainError::DuplicateIdentifier,
            other => DomainError::Repository(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found")]
    NotFound,

    #[error("Identifier already taken")]
    DuplicateIdentifier,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
