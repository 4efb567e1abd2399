use crate::domain::{error::DomainError, models::credential::HashedPassword};

/// Service for hashing and verifying passwords
///
/// Both operations are deliberately slow; async callers should run them on a
/// blocking thread.
pub trait PasswordHasher: Clone {
    /// Hash a plain text password with a fresh random salt
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError>;

    /// Verify a plain text password against a hashed password
    ///
    /// `Ok(false)` is a mismatch; a malformed hash is `DomainError::Hashing`.
    fn verify(&self, plain_password: &str, hashed_password: &HashedPassword) -> Result<bool, DomainError>;

    /// Check that a stored hash parses without running the hash function
    fn check_format(&self, hashed_password: &HashedPassword) -> Result<(), DomainError>;
}
