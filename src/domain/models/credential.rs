use serde::{Deserialize, Serialize};

/// Value object representing a hashed password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Create a new HashedPassword from an already hashed string
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Get the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Password slot of an account.
///
/// `Cleartext` only lives in memory between the caller setting it and the
/// pre-persist hook replacing it; `Hashed` is the only form a store ever sees.
#[derive(Clone, PartialEq, Eq)]
pub enum PasswordField {
    Cleartext(String),
    Hashed(HashedPassword),
}

impl PasswordField {
    pub fn cleartext(password: impl Into<String>) -> Self {
        Self::Cleartext(password.into())
    }

    pub fn hashed(&self) -> Option<&HashedPassword> {
        match self {
            Self::Hashed(hash) => Some(hash),
            Self::Cleartext(_) => None,
        }
    }

    pub fn is_cleartext(&self) -> bool {
        matches!(self, Self::Cleartext(_))
    }
}

// never print cleartext
impl std::fmt::Debug for PasswordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cleartext(_) => f.write_str("Cleartext(***)"),
            Self::Hashed(hash) => f.debug_tuple("Hashed").field(hash).finish(),
        }
    }
}
