use std::ops::{Deref, DerefMut};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::common::{is_blank, CandidateId, Counter, ElectionId};

use super::spec::{CandidateSpec, ElectionSpec};

/// A single candidate, owned by exactly one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique within the owning election only.
    pub id: CandidateId,
    pub name: String,
    pub party: String,
    /// Image reference, e.g. a URL path.
    pub image: String,
    /// Running vote count.
    pub votes: u64,
}

/// A view on just the election's top-level metadata: everything an admin
/// may edit after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionMetadata {
    /// Election title.
    pub title: String,
    /// Election description.
    pub description: String,
    /// Whether voters can currently see and vote in the election.
    pub is_active: bool,
    /// First day of voting, as a UTC calendar day.
    pub start_date: NaiveDate,
    /// Last day of voting, inclusive, as a UTC calendar day.
    pub end_date: NaiveDate,
}

impl ElectionMetadata {
    /// Reject blank text and a window that ends before it starts.
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.title) || is_blank(&self.description) {
            return Err(Error::bad_request("Election title and description are required"));
        }
        if self.end_date < self.start_date {
            return Err(Error::bad_request(format!(
                "Election ends ({}) before it starts ({})",
                self.end_date, self.start_date
            )));
        }
        Ok(())
    }

    /// Is `date` within the inclusive voting window?
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Core election data, as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionCore {
    /// Top-level metadata.
    #[serde(flatten)]
    pub metadata: ElectionMetadata,
    /// Candidates, in the order they were entered.
    pub candidates: Vec<Candidate>,
    /// Always the sum of the candidates' votes.
    pub total_votes: u64,
}

impl ElectionCore {
    /// Create a new election with zeroed tallies, drawing candidate IDs
    /// from the election's own counter.
    pub fn new(spec: ElectionSpec, candidate_ids: &mut Counter) -> Self {
        Self {
            metadata: spec.metadata,
            candidates: spec
                .candidates
                .into_iter()
                .map(|candidate| candidate.into_candidate(candidate_ids.next()))
                .collect(),
            total_votes: 0,
        }
    }

    pub fn candidate(&self, candidate_id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == candidate_id)
    }

    pub fn candidate_mut(&mut self, candidate_id: CandidateId) -> Option<&mut Candidate> {
        self.candidates.iter_mut().find(|c| c.id == candidate_id)
    }

    /// Append a new zero-vote candidate.
    pub fn add_candidate(&mut self, spec: CandidateSpec, id: CandidateId) -> &Candidate {
        self.candidates.push(spec.into_candidate(id));
        // Just pushed, so the list is non-empty.
        &self.candidates[self.candidates.len() - 1]
    }

    /// Count one vote for the candidate, keeping the total in step.
    /// Returns `false` if no such candidate stands.
    pub fn add_vote(&mut self, candidate_id: CandidateId) -> bool {
        match self.candidate_mut(candidate_id) {
            Some(candidate) => {
                candidate.votes += 1;
                self.total_votes += 1;
                true
            }
            None => false,
        }
    }

    /// Does the stored total agree with the per-candidate counts?
    pub fn tally_is_consistent(&self) -> bool {
        self.total_votes == self.candidates.iter().map(|c| c.votes).sum::<u64>()
    }
}

/// An election from the store, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    pub id: ElectionId,
    #[serde(flatten)]
    pub election: ElectionCore,
}

impl Deref for Election {
    type Target = ElectionCore;

    fn deref(&self) -> &Self::Target {
        &self.election
    }
}

impl DerefMut for Election {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.election
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_election() -> Election {
        let mut ids = Counter::default();
        Election {
            id: 1,
            election: ElectionCore::new(ElectionSpec::example(), &mut ids),
        }
    }

    #[test]
    fn new_election_is_zeroed() {
        let election = example_election();
        assert_eq!(election.total_votes, 0);
        assert_eq!(
            election.candidates.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(election.candidates.iter().all(|c| c.votes == 0));
        assert!(election.tally_is_consistent());
    }

    #[test]
    fn votes_keep_total_in_step() {
        let mut election = example_election();
        assert!(election.add_vote(2));
        assert!(election.add_vote(2));
        assert!(election.add_vote(3));
        assert!(!election.add_vote(99));
        assert_eq!(election.candidate(2).unwrap().votes, 2);
        assert_eq!(election.total_votes, 3);
        assert!(election.tally_is_consistent());
    }

    #[test]
    fn voting_window_is_inclusive() {
        let metadata = &example_election().election.metadata;
        let day = |d: &str| d.parse::<NaiveDate>().unwrap();
        assert!(metadata.is_open_on(day("2024-01-01")));
        assert!(metadata.is_open_on(day("2024-12-31")));
        assert!(!metadata.is_open_on(day("2023-12-31")));
        assert!(!metadata.is_open_on(day("2025-01-01")));
    }

    #[test]
    fn metadata_validation() {
        let mut metadata = example_election().election.metadata;
        assert!(metadata.validate().is_ok());

        metadata.title = "   ".to_string();
        assert!(matches!(metadata.validate(), Err(Error::BadRequest(_))));

        metadata.title = "Title".to_string();
        metadata.end_date = metadata.start_date.pred_opt().unwrap();
        assert!(matches!(metadata.validate(), Err(Error::BadRequest(_))));

        metadata.end_date = metadata.start_date;
        assert!(metadata.validate().is_ok());
    }

    #[test]
    fn serializes_camel_case_and_flat() {
        let json = serde_json::to_value(example_election()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Presidential Election 2024");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["totalVotes"], 0);
        assert_eq!(json["candidates"][1]["name"], "Jane Doe");
    }
}
