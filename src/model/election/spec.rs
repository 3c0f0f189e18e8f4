use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::common::{is_blank, CandidateId};

use super::election_core::{Candidate, ElectionMetadata};

/// Image used when a candidate is entered without one.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Fewest candidates a new election may be created with.
pub const MIN_CANDIDATES: usize = 2;

fn placeholder_image() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

/// A candidate as entered by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSpec {
    pub name: String,
    pub party: String,
    #[serde(default = "placeholder_image")]
    pub image: String,
}

impl CandidateSpec {
    pub fn new(name: impl Into<String>, party: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            party: party.into(),
            image: placeholder_image(),
        }
    }

    /// A candidate needs both a name and a party.
    pub fn is_complete(&self) -> bool {
        !is_blank(&self.name) && !is_blank(&self.party)
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(Error::bad_request("Candidate name and party are required"))
        }
    }

    pub(crate) fn into_candidate(self, id: CandidateId) -> Candidate {
        Candidate {
            id,
            name: self.name,
            party: self.party,
            image: self.image,
            votes: 0,
        }
    }
}

/// A new election, as submitted by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSpec {
    /// Top-level metadata.
    #[serde(flatten)]
    pub metadata: ElectionMetadata,
    /// Candidates, in ballot order.
    pub candidates: Vec<CandidateSpec>,
}

impl ElectionSpec {
    /// Drop incomplete candidate rows, then check what is left is a real
    /// contest.
    pub fn validated(mut self) -> Result<Self> {
        self.metadata.validate()?;
        self.candidates.retain(CandidateSpec::is_complete);
        if self.candidates.len() < MIN_CANDIDATES {
            return Err(Error::bad_request(format!(
                "At least {MIN_CANDIDATES} candidates are required"
            )));
        }
        Ok(self)
    }
}

/// A partial update of an election's metadata. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl ElectionPatch {
    /// Merge into a copy of `metadata`; the caller decides whether to keep it.
    pub fn merged(self, metadata: &ElectionMetadata) -> ElectionMetadata {
        ElectionMetadata {
            title: self.title.unwrap_or_else(|| metadata.title.clone()),
            description: self
                .description
                .unwrap_or_else(|| metadata.description.clone()),
            is_active: self.is_active.unwrap_or(metadata.is_active),
            start_date: self.start_date.unwrap_or(metadata.start_date),
            end_date: self.end_date.unwrap_or(metadata.end_date),
        }
    }
}
