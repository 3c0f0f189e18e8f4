use argon2::Error as Argon2Error;
use figment::Error as ConfigError;
use thiserror::Error;

use crate::model::common::{CandidateId, ElectionId, VoterId};

pub type Result<T> = std::result::Result<T, Error>;

/// Everything a store operation can refuse with. An `Err` never leaves a
/// partial mutation behind.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Argon2(#[from] Argon2Error),
    #[error(transparent)]
    Config(#[from] Box<ConfigError>),
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("A voter must be logged in")]
    SessionRequired,
    #[error("Voter {voter_id} has already voted in election {election_id}")]
    AlreadyVoted {
        voter_id: VoterId,
        election_id: ElectionId,
    },
    #[error("Voter ID already exists: {0}")]
    DuplicateVoterId(String),
    #[error("Candidate {candidate_id} does not stand in election {election_id}")]
    InvalidCandidateForElection {
        candidate_id: CandidateId,
        election_id: ElectionId,
    },
    #[error("Candidate {candidate_id} of election {election_id} already holds {votes} vote(s)")]
    CandidateHasVotes {
        candidate_id: CandidateId,
        election_id: ElectionId,
        votes: u64,
    },
    #[error("Election {0} is not active")]
    ElectionInactive(ElectionId),
    #[error("Election {0} is not open for voting today")]
    OutsideVotingWindow(ElectionId),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn bad_request(why: impl Into<String>) -> Self {
        Self::BadRequest(why.into())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(Box::new(err))
    }
}
