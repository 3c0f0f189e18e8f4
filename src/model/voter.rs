use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    auth::PasswordHash,
    common::{is_blank, ElectionId, VoterId},
};

/// Core voter user data, as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterCore {
    /// Login handle, unique across the store.
    pub voter_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: PasswordHash,
    /// Set by the first successful vote and never cleared.
    pub has_voted: bool,
    /// The election most recently voted in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voted_election_id: Option<ElectionId>,
}

impl VoterCore {
    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> Result<bool> {
        Ok(self.password_hash.verify(password)?)
    }
}

/// A voter without an ID.
pub type NewVoter = VoterCore;

/// A voter user from the store, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub id: VoterId,
    #[serde(flatten)]
    pub voter: VoterCore,
}

impl Deref for Voter {
    type Target = VoterCore;

    fn deref(&self) -> &Self::Target {
        &self.voter
    }
}

impl DerefMut for Voter {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.voter
    }
}

/// A voter registration, as submitted by an admin. The password is plaintext
/// and is hashed on conversion to a [`NewVoter`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterSpec {
    pub voter_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl VoterSpec {
    pub fn new(
        voter_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            voter_id: voter_id.into(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Every field is required.
    pub fn validate(&self) -> Result<()> {
        if [&self.voter_id, &self.name, &self.email, &self.password]
            .iter()
            .any(|field| is_blank(field))
        {
            return Err(Error::bad_request("Please fill in all required voter fields"));
        }
        Ok(())
    }
}

impl TryFrom<VoterSpec> for NewVoter {
    type Error = Error;

    fn try_from(spec: VoterSpec) -> Result<Self> {
        Ok(Self {
            password_hash: PasswordHash::new(&spec.password)?,
            voter_id: spec.voter_id,
            name: spec.name,
            email: spec.email,
            has_voted: false,
            voted_election_id: None,
        })
    }
}

/// A partial update of a voter's profile. Voting status is not editable.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl VoterPatch {
    /// Reject any present field that is blank.
    pub fn validate(&self) -> Result<()> {
        let present = [&self.voter_id, &self.name, &self.email, &self.password];
        if present.iter().flat_map(|f| f.as_deref()).any(is_blank) {
            return Err(Error::bad_request("Voter fields cannot be blank"));
        }
        Ok(())
    }

    /// Merge into a copy of `voter`, hashing any new password.
    pub fn merged(self, voter: &VoterCore) -> Result<VoterCore> {
        let password_hash = match self.password {
            Some(password) => PasswordHash::new(password)?,
            None => voter.password_hash.clone(),
        };
        Ok(VoterCore {
            voter_id: self.voter_id.unwrap_or_else(|| voter.voter_id.clone()),
            name: self.name.unwrap_or_else(|| voter.name.clone()),
            email: self.email.unwrap_or_else(|| voter.email.clone()),
            password_hash,
            has_voted: voter.has_voted,
            voted_election_id: voter.voted_election_id,
        })
    }
}

/// A voter as shown to views, with no credential data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterDescription {
    pub id: VoterId,
    pub voter_id: String,
    pub name: String,
    pub email: String,
    pub has_voted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voted_election_id: Option<ElectionId>,
}

impl From<&Voter> for VoterDescription {
    fn from(voter: &Voter) -> Self {
        Self {
            id: voter.id,
            voter_id: voter.voter_id.clone(),
            name: voter.name.clone(),
            email: voter.email.clone(),
            has_voted: voter.has_voted,
            voted_election_id: voter.voted_election_id,
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl VoterSpec {
        pub fn example() -> Self {
            Self::new("V100", "Harry Potter", "harry@example.com", "alohomora")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_voter() -> Voter {
        Voter {
            id: 9,
            voter: VoterSpec::example().try_into().unwrap(),
        }
    }

    #[test]
    fn registration_hashes_password() {
        let voter = example_voter();
        assert!(!voter.has_voted);
        assert_eq!(voter.voted_election_id, None);
        assert!(voter.verify_password("alohomora").unwrap());
        assert!(!voter.verify_password("Alohomora").unwrap());
    }

    #[test]
    fn spec_requires_every_field() {
        assert!(VoterSpec::example().validate().is_ok());
        let mut spec = VoterSpec::example();
        spec.email = " ".to_string();
        assert!(matches!(spec.validate(), Err(Error::BadRequest(_))));
    }

    #[test]
    fn patch_keeps_voting_status() {
        let mut voter = example_voter();
        voter.has_voted = true;
        voter.voted_election_id = Some(1);
        let patch = VoterPatch {
            name: Some("Harry J. Potter".to_string()),
            password: Some("expelliarmus".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
        let merged = patch.merged(&voter).unwrap();
        assert_eq!(merged.name, "Harry J. Potter");
        assert_eq!(merged.voter_id, "V100");
        assert!(merged.has_voted);
        assert_eq!(merged.voted_election_id, Some(1));
        assert!(merged.verify_password("expelliarmus").unwrap());
        assert!(!merged.verify_password("alohomora").unwrap());
    }

    #[test]
    fn patch_rejects_blank_fields() {
        let patch = VoterPatch {
            voter_id: Some("".to_string()),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(Error::BadRequest(_))));
        assert!(VoterPatch::default().validate().is_ok());
    }

    #[test]
    fn description_has_no_credentials() {
        let description = VoterDescription::from(&example_voter());
        let json = serde_json::to_value(&description).unwrap();
        assert_eq!(json["voterId"], "V100");
        assert_eq!(json["hasVoted"], false);
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("votedElectionId").is_none());
    }
}
