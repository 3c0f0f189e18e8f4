use std::ops::Deref;

use argon2::Error as Argon2Error;
use serde::{Deserialize, Serialize};

use crate::model::{auth::PasswordHash, common::AdminId};

/// Core admin user data, as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCore {
    pub username: String,
    pub password_hash: PasswordHash,
}

impl AdminCore {
    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> Result<bool, Argon2Error> {
        self.password_hash.verify(password)
    }
}

/// An admin without an ID.
pub type NewAdmin = AdminCore;

/// An admin user from the store, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: AdminId,
    #[serde(flatten)]
    pub admin: AdminCore,
}

impl Deref for Admin {
    type Target = AdminCore;

    fn deref(&self) -> &Self::Target {
        &self.admin
    }
}

/// Raw admin credentials, received from a user. These are never stored directly,
/// since the password is in plaintext.
#[derive(Clone, Deserialize, Serialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl TryFrom<AdminCredentials> for AdminCore {
    type Error = Argon2Error;

    /// Convert [`AdminCredentials`] to a new [`AdminCore`] by hashing the password.
    fn try_from(cred: AdminCredentials) -> Result<Self, Self::Error> {
        Ok(Self {
            password_hash: PasswordHash::new(&cred.password)?,
            username: cred.username,
        })
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl AdminCredentials {
        pub fn example() -> Self {
            Self {
                username: "coordinator".into(),
                password: "coordinator".into(),
            }
        }

        pub fn empty() -> Self {
            Self {
                username: "".into(),
                password: "".into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_hashed() {
        let admin: NewAdmin = AdminCredentials::example().try_into().unwrap();
        assert_eq!(admin.username, "coordinator");
        assert_ne!(admin.password_hash.as_str(), "coordinator");
        assert!(admin.verify_password("coordinator").unwrap());
        assert!(!admin.verify_password("coordinator2").unwrap());
    }

    #[test]
    fn empty_password_still_hashes() {
        let admin: NewAdmin = AdminCredentials::empty().try_into().unwrap();
        assert!(admin.verify_password("").unwrap());
        assert!(!admin.verify_password("x").unwrap());
    }

    #[test]
    fn admin_serialization_is_flat() {
        let admin = Admin {
            id: 4,
            admin: AdminCredentials::example().try_into().unwrap(),
        };
        let json = serde_json::to_value(&admin).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["username"], "coordinator");
        assert!(json["passwordHash"].as_str().unwrap().starts_with("$argon2"));
    }
}
