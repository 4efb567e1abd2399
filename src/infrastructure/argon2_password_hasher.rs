use argon2::{
    Algorithm, Argon2, Params, PasswordHash as Argon2Hash, Version,
    password_hash::{self, PasswordHasher as Argon2Hasher, PasswordVerifier, SaltString},
};
use rand_core::{OsRng, TryRngCore};

use crate::domain::{
    error::DomainError,
    models::credential::HashedPassword,
    services::password_service::PasswordHasher,
};

const SALT_LEN: usize = 16;

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Cost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Cost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id hasher producing PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`).
///
/// Verification reads the cost from the stored string, so raising the cost
/// only affects newly hashed passwords.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    pub fn with_cost(cost: Argon2Cost) -> Result<Self, DomainError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| DomainError::Hashing(format!("invalid argon2 cost: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn parse<'a>(&self, hashed_password: &'a HashedPassword) -> Result<Argon2Hash<'a>, DomainError> {
        let parsed = Argon2Hash::new(hashed_password.as_str())
            .map_err(|e| DomainError::Hashing(format!("malformed credential hash: {}", e)))?;

        Algorithm::try_from(parsed.algorithm)
            .map_err(|_| DomainError::Hashing(format!("unsupported algorithm {}", parsed.algorithm)))?;

        if parsed.salt.is_none() || parsed.hash.is_none() {
            return Err(DomainError::Hashing(
                "malformed credential hash: missing salt or digest".to_string(),
            ));
        }

        Params::try_from(&parsed)
            .map_err(|e| DomainError::Hashing(format!("malformed credential hash: {}", e)))?;

        Ok(parsed)
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| DomainError::Hashing(format!("random source unavailable: {}", e)))?;
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| DomainError::Hashing(e.to_string()))?;

        let hash = self
            .argon2()
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| DomainError::Hashing(e.to_string()))?
            .to_string();

        Ok(HashedPassword::new(hash))
    }

    fn verify(&self, plain_password: &str, hashed_password: &HashedPassword) -> Result<bool, DomainError> {
        let parsed_hash = self.parse(hashed_password)?;

        // digest comparison inside password_hash is constant-time
        match self.argon2().verify_password(plain_password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DomainError::Hashing(e.to_string())),
        }
    }

    fn check_format(&self, hashed_password: &HashedPassword) -> Result<(), DomainError> {
        self.parse(hashed_password).map(|_| ())
    }
}
