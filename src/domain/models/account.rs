use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    models::credential::{HashedPassword, PasswordField},
};

pub type DisplayName = String;
pub type AvatarReference = String;

/// Unique account key, usually an email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier(String);
impl Identifier {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::Validation("identifier is required".to_string()));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(DomainError::Validation(
                "identifier must not contain whitespace".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional profile fields supplied at registration.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub display_name: Option<DisplayName>,
    pub avatar_reference: Option<AvatarReference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    identifier: Identifier,
    password: PasswordField,
    display_name: Option<DisplayName>,
    avatar_reference: Option<AvatarReference>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Account {
    /// A transient account holding the caller's cleartext password.
    pub fn new(identifier: Identifier, password: String, profile: Profile) -> Self {
        let now = Utc::now();
        Self {
            identifier,
            password: PasswordField::Cleartext(password),
            display_name: profile.display_name,
            avatar_reference: profile.avatar_reference,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a persisted account from stored fields.
    pub fn reconstruct(
        identifier: Identifier,
        password_hash: HashedPassword,
        display_name: Option<DisplayName>,
        avatar_reference: Option<AvatarReference>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identifier,
            password: PasswordField::Hashed(password_hash),
            display_name,
            avatar_reference,
            created_at,
            updated_at,
        }
    }

    /// Put a new cleartext password in place; the next save hashes it.
    pub fn set_password(&mut self, password: String) {
        self.password = PasswordField::Cleartext(password);
        self.updated_at = Utc::now();
    }

    pub fn set_display_name(&mut self, display_name: Option<DisplayName>) {
        self.display_name = display_name;
        self.updated_at = Utc::now();
    }

    pub fn set_avatar_reference(&mut self, avatar_reference: Option<AvatarReference>) {
        self.avatar_reference = avatar_reference;
        self.updated_at = Utc::now();
    }

    pub(crate) fn replace_password(&mut self, password: PasswordField) {
        self.password = password;
    }

    pub(crate) fn fill_avatar_reference(&mut self, avatar_reference: AvatarReference) {
        self.avatar_reference = Some(avatar_reference);
    }

    /// True when the password slot differs from the previously stored version.
    pub fn is_password_modified(&self, previous: Option<&Account>) -> bool {
        match previous {
            Some(previous) => previous.password != self.password,
            None => true,
        }
    }

    pub fn is_persistable(&self) -> bool {
        !self.password.is_cleartext()
    }

    // getters
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }
    pub fn password(&self) -> &PasswordField {
        &self.password
    }
    pub fn credential_hash(&self) -> Option<&HashedPassword> {
        self.password.hashed()
    }
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
    pub fn avatar_reference(&self) -> Option<&str> {
        self.avatar_reference.as_deref()
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
