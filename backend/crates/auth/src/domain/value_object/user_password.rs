//! User Password Value Object
//!
//! Domain wrapper around the platform Argon2id hash.

use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicy};

use crate::error::AuthResult;

/// Stored password hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Validate `raw` against `policy`, then hash it
    pub fn from_raw(raw: String, policy: &PasswordPolicy, pepper: Option<&[u8]>) -> AuthResult<Self> {
        let clear = ClearTextPassword::new(raw, policy)?;
        Ok(Self(clear.hash(pepper)?))
    }

    /// Value read back from `users.password`
    pub fn from_phc(phc: impl Into<String>) -> AuthResult<Self> {
        Ok(Self(HashedPassword::from_phc_string(phc)?))
    }

    pub fn verify(&self, candidate: String, pepper: Option<&[u8]>) -> bool {
        self.0
            .verify(&ClearTextPassword::for_verification(candidate), pepper)
    }

    pub fn as_phc(&self) -> &str {
        self.0.as_phc_string()
    }
}
