use std::fmt::{Debug, Formatter};

use argon2::{Config, Error as Argon2Error};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An argon2-encoded password hash. Plaintext passwords are hashed as soon
/// as they enter the store and are never kept.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    pub fn new<T: AsRef<[u8]>>(password: T) -> Result<Self, Argon2Error> {
        // 16 bytes is recommended for password hashing:
        //  https://en.wikipedia.org/wiki/Argon2
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let encoded = argon2::hash_encoded(password.as_ref(), &salt, &Config::default())?;
        Ok(Self(encoded))
    }

    /// Check whether the given password is correct.
    pub fn verify<T: AsRef<[u8]>>(&self, password: T) -> Result<bool, Argon2Error> {
        argon2::verify_encoded(&self.0, password.as_ref())
    }

    /// The encoded form, including algorithm parameters and salt.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}
