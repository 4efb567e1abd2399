use std::time::Instant;

use tracing::{debug, warn};

use crate::domain::{
    error::DomainError,
    models::{account::Account, credential::PasswordField},
    services::password_service::PasswordHasher,
};

pub const DEFAULT_AVATAR_REFERENCE: &str = "/img/default_user_pic.jpg";

/// Pre-persist hook and password check for accounts.
///
/// Everything here blocks for as long as the hasher does.
#[derive(Clone)]
pub struct AccountLifecycle<P: PasswordHasher> {
    password_hasher: P,
    default_avatar: String,
}

impl<P: PasswordHasher> AccountLifecycle<P> {
    pub fn new(password_hasher: P, default_avatar: String) -> Self {
        Self {
            password_hasher,
            default_avatar,
        }
    }

    pub fn password_hasher(&self) -> &P {
        &self.password_hasher
    }

    /// Turn an account into its storable form.
    ///
    /// The password is hashed only when it differs from `previous`; a new
    /// account (`previous == None`) always counts as changed. A value that is
    /// already a credential hash is checked for shape but never hashed again,
    /// so running this twice on the same record is harmless.
    pub fn prepare_for_save(
        &self,
        mut account: Account,
        previous: Option<&Account>,
    ) -> Result<Account, DomainError> {
        if account.avatar_reference().is_none_or(str::is_empty) {
            account.fill_avatar_reference(self.default_avatar.clone());
        }

        if !account.is_password_modified(previous) {
            debug!(identifier = %account.identifier(), "password unchanged, skipping hash");
            return Ok(account);
        }

        let hashed = match account.password() {
            PasswordField::Cleartext(plain) => {
                if plain.is_empty() {
                    return Err(DomainError::Validation("password is required".to_string()));
                }
                let started = Instant::now();
                let hashed = self.password_hasher.hash(plain)?;
                debug!(
                    identifier = %account.identifier(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "password hashed"
                );
                hashed
            }
            PasswordField::Hashed(hashed) => {
                self.password_hasher.check_format(hashed)?;
                debug!(identifier = %account.identifier(), "password already hashed, not rehashing");
                return Ok(account);
            }
        };

        account.replace_password(PasswordField::Hashed(hashed));
        Ok(account)
    }

    /// Compare a candidate password with the account's stored hash.
    pub fn check_password(&self, account: &Account, candidate: &str) -> Result<bool, DomainError> {
        let Some(hashed) = account.credential_hash() else {
            return Err(DomainError::Validation(
                "account has not been saved yet".to_string(),
            ));
        };

        self.password_hasher.verify(candidate, hashed).inspect_err(|e| {
            warn!(identifier = %account.identifier(), error = %e, "stored credential hash is unusable");
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use chrono::Utc;
    use rstest::*;

    use super::*;
    use crate::domain::models::{
        account::{Identifier, Profile},
        credential::HashedPassword,
    };

    /// Reversible stand-in that counts calls, so tests can see when hashing ran.
    #[derive(Clone, Default)]
    struct CountingHasher {
        hashed: Arc<AtomicUsize>,
    }

    impl PasswordHasher for CountingHasher {
        fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
            let n = self.hashed.fetch_add(1, Ordering::SeqCst);
            Ok(HashedPassword::new(format!("$mock${n}${plain_password}")))
        }

        fn verify(
            &self,
            plain_password: &str,
            hashed_password: &HashedPassword,
        ) -> Result<bool, DomainError> {
            self.check_format(hashed_password)?;
            Ok(hashed_password
                .as_str()
                .rsplit('$')
                .next()
                .is_some_and(|p| p == plain_password))
        }

        fn check_format(&self, hashed_password: &HashedPassword) -> Result<(), DomainError> {
            if hashed_password.as_str().starts_with("$mock$") {
                Ok(())
            } else {
                Err(DomainError::Hashing("unknown format".to_string()))
            }
        }
    }

    #[fixture]
    fn hasher() -> CountingHasher {
        CountingHasher::default()
    }

    fn transient(password: &str) -> Account {
        Account::new(
            Identifier::new("a@x.com".to_string()).unwrap(),
            password.to_string(),
            Profile::default(),
        )
    }

    #[rstest]
    fn new_account_gets_hashed_and_default_avatar(hasher: CountingHasher) {
        let lifecycle = AccountLifecycle::new(hasher.clone(), "/img/default.jpg".to_string());

        let saved = lifecycle.prepare_for_save(transient("Secr3t!"), None).unwrap();

        assert!(saved.is_persistable());
        assert_ne!(saved.credential_hash().unwrap().as_str(), "Secr3t!");
        assert_eq!(saved.avatar_reference(), Some("/img/default.jpg"));
        assert_eq!(hasher.hashed.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn explicit_avatar_is_kept(hasher: CountingHasher) {
        let lifecycle = AccountLifecycle::new(hasher, "/img/default.jpg".to_string());
        let account = Account::new(
            Identifier::new("a@x.com".to_string()).unwrap(),
            "Secr3t!".to_string(),
            Profile {
                display_name: None,
                avatar_reference: Some("/img/me.png".to_string()),
            },
        );

        let saved = lifecycle.prepare_for_save(account, None).unwrap();
        assert_eq!(saved.avatar_reference(), Some("/img/me.png"));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn unset_avatar_is_filled_without_touching_updated_at(
        hasher: CountingHasher,
        #[case] avatar: Option<&str>,
    ) {
        let lifecycle = AccountLifecycle::new(hasher, "/img/default.jpg".to_string());
        let stored = Account::reconstruct(
            Identifier::new("a@x.com".to_string()).unwrap(),
            HashedPassword::new("$mock$0$Secr3t!".to_string()),
            None,
            avatar.map(str::to_string),
            Utc::now(),
            Utc::now(),
        );

        let saved = lifecycle.prepare_for_save(stored.clone(), Some(&stored)).unwrap();

        assert_eq!(saved.avatar_reference(), Some("/img/default.jpg"));
        assert_eq!(saved.updated_at(), stored.updated_at());
        assert_eq!(saved.credential_hash(), stored.credential_hash());
    }

    #[rstest]
    fn unchanged_password_is_not_rehashed(hasher: CountingHasher) {
        let lifecycle = AccountLifecycle::new(hasher.clone(), DEFAULT_AVATAR_REFERENCE.to_string());
        let stored = lifecycle.prepare_for_save(transient("Secr3t!"), None).unwrap();

        let mut edited = stored.clone();
        edited.set_display_name(Some("Alice".to_string()));
        let saved = lifecycle.prepare_for_save(edited, Some(&stored)).unwrap();

        assert_eq!(
            saved.credential_hash().unwrap().as_str(),
            stored.credential_hash().unwrap().as_str()
        );
        assert_eq!(hasher.hashed.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn retried_save_of_hashed_record_is_idempotent(hasher: CountingHasher) {
        let lifecycle = AccountLifecycle::new(hasher.clone(), DEFAULT_AVATAR_REFERENCE.to_string());
        let prepared = lifecycle.prepare_for_save(transient("Secr3t!"), None).unwrap();

        // the first write failed, so the store still has no previous version
        let retried = lifecycle.prepare_for_save(prepared.clone(), None).unwrap();

        assert_eq!(retried.credential_hash(), prepared.credential_hash());
        assert_eq!(hasher.hashed.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn carried_hash_must_be_well_formed(hasher: CountingHasher) {
        let lifecycle = AccountLifecycle::new(hasher, DEFAULT_AVATAR_REFERENCE.to_string());
        let account = Account::reconstruct(
            Identifier::new("a@x.com".to_string()).unwrap(),
            HashedPassword::new("plaintext-pretending".to_string()),
            None,
            None,
            Utc::now(),
            Utc::now(),
        );

        assert!(matches!(
            lifecycle.prepare_for_save(account, None),
            Err(DomainError::Hashing(_))
        ));
    }

    #[rstest]
    fn changed_password_is_rehashed(hasher: CountingHasher) {
        let lifecycle = AccountLifecycle::new(hasher.clone(), DEFAULT_AVATAR_REFERENCE.to_string());
        let stored = lifecycle.prepare_for_save(transient("Secr3t!"), None).unwrap();

        let mut edited = stored.clone();
        edited.set_password("N3w-secret".to_string());
        let saved = lifecycle.prepare_for_save(edited, Some(&stored)).unwrap();

        assert_ne!(saved.credential_hash(), stored.credential_hash());
        assert!(lifecycle.check_password(&saved, "N3w-secret").unwrap());
        assert!(!lifecycle.check_password(&saved, "Secr3t!").unwrap());
        assert_eq!(hasher.hashed.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    fn empty_password_is_rejected(hasher: CountingHasher) {
        let lifecycle = AccountLifecycle::new(hasher.clone(), DEFAULT_AVATAR_REFERENCE.to_string());

        let result = lifecycle.prepare_for_save(transient(""), None);

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(hasher.hashed.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    fn check_password_on_transient_account_fails(hasher: CountingHasher) {
        let lifecycle = AccountLifecycle::new(hasher, DEFAULT_AVATAR_REFERENCE.to_string());
        assert!(matches!(
            lifecycle.check_password(&transient("Secr3t!"), "Secr3t!"),
            Err(DomainError::Validation(_))
        ));
    }
}
