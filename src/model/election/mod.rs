pub use election_core::{Candidate, Election, ElectionCore, ElectionMetadata};
pub use spec::{CandidateSpec, ElectionPatch, ElectionSpec, MIN_CANDIDATES, PLACEHOLDER_IMAGE};

mod election_core;
mod spec;

/// A new election ready for insertion is just an [`Election`] without an ID, i.e. an `ElectionCore`.
pub type NewElection = ElectionCore;
