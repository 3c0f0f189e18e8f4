use serde::{Deserialize, Serialize};

use crate::model::common::{CandidateId, ElectionId, VoterId};

/// Published to subscribers after every successful mutation, so views know
/// to re-render from a fresh snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum StoreEvent {
    /// Someone logged in or out.
    SessionChanged,
    ElectionCreated {
        election_id: ElectionId,
    },
    ElectionUpdated {
        election_id: ElectionId,
    },
    ElectionDeleted {
        election_id: ElectionId,
    },
    CandidateAdded {
        election_id: ElectionId,
        candidate_id: CandidateId,
    },
    CandidateRemoved {
        election_id: ElectionId,
        candidate_id: CandidateId,
    },
    VoterRegistered {
        voter_id: VoterId,
    },
    VoterUpdated {
        voter_id: VoterId,
    },
    VoterDeleted {
        voter_id: VoterId,
    },
    VoteCast {
        election_id: ElectionId,
        candidate_id: CandidateId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_serialization() {
        let json = serde_json::to_string(&StoreEvent::VoteCast {
            election_id: 1,
            candidate_id: 2,
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"voteCast","election_id":1,"candidate_id":2}"#);
        assert_eq!(
            serde_json::to_string(&StoreEvent::SessionChanged).unwrap(),
            r#"{"event":"sessionChanged"}"#
        );
    }
}
