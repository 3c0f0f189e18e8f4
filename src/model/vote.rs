use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{CandidateId, ElectionId, VoterId};

/// An immutable fact: this voter chose this candidate in this election at
/// this instant. The store keeps at most one per (voter, election) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub voter_id: VoterId,
    pub candidate_id: CandidateId,
    pub election_id: ElectionId,
    pub timestamp: DateTime<Utc>,
}

impl VoteRecord {
    pub fn new(voter_id: VoterId, candidate_id: CandidateId, election_id: ElectionId) -> Self {
        Self {
            voter_id,
            candidate_id,
            election_id,
            timestamp: Utc::now(),
        }
    }

    /// Does this record belong to the given (voter, election) pair?
    pub fn is_for(&self, voter_id: VoterId, election_id: ElectionId) -> bool {
        self.voter_id == voter_id && self.election_id == election_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_matching() {
        let record = VoteRecord::new(1, 2, 3);
        assert!(record.is_for(1, 3));
        assert!(!record.is_for(1, 2));
        assert!(!record.is_for(2, 3));
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let record = VoteRecord::new(1, 2, 3);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["voterId"], 1);
        assert_eq!(json["candidateId"], 2);
        assert_eq!(json["electionId"], 3);
        let timestamp: DateTime<Utc> = json["timestamp"].as_str().unwrap().parse().unwrap();
        assert_eq!(timestamp, record.timestamp);
    }
}
