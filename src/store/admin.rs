use crate::error::{Error, Result};
use crate::logging::OperationId;
use crate::model::{
    common::{CandidateId, ElectionId, VoterId},
    election::{Candidate, CandidateSpec, Election, ElectionCore, ElectionPatch, ElectionSpec},
    vote::VoteRecord,
    voter::{NewVoter, VoterDescription, VoterPatch, VoterSpec},
};

use super::{require_admin, ElectionStore, StoreEvent, StoreStats};

/// Election management.
impl ElectionStore {
    /// Create an election from an admin's spec. Incomplete candidate rows
    /// are dropped; at least two complete candidates must remain.
    pub fn create_election(&self, spec: ElectionSpec) -> Result<Election> {
        let op = OperationId::next();
        let spec = spec.validated()?;
        let election = {
            let mut state = self.lock();
            require_admin(&state)?;
            let id = state.next_election_id();
            let election = ElectionCore::new(spec, state.candidate_ids(id));
            state.insert_election(id, election).clone()
        };
        info!(
            "op{op} created election {} \"{}\" with {} candidate(s)",
            election.id,
            election.metadata.title,
            election.candidates.len()
        );
        self.publish(StoreEvent::ElectionCreated {
            election_id: election.id,
        });
        Ok(election)
    }

    /// Merge the given fields into an election's metadata.
    pub fn update_election(
        &self,
        election_id: ElectionId,
        patch: ElectionPatch,
    ) -> Result<Election> {
        let op = OperationId::next();
        let election = {
            let mut state = self.lock();
            require_admin(&state)?;
            let election = state.election_mut(election_id)?;
            let metadata = patch.merged(&election.metadata);
            metadata.validate()?;
            election.metadata = metadata;
            election.clone()
        };
        info!("op{op} updated election {election_id}");
        self.publish(StoreEvent::ElectionUpdated { election_id });
        Ok(election)
    }

    /// Remove an election. Its vote records stay in the log.
    pub fn delete_election(&self, election_id: ElectionId) -> Result<()> {
        let op = OperationId::next();
        {
            let mut state = self.lock();
            require_admin(&state)?;
            let election = state.remove_election(election_id)?;
            info!(
                "op{op} deleted election {election_id} \"{}\" ({} vote(s) kept in the log)",
                election.metadata.title, election.total_votes
            );
        }
        self.publish(StoreEvent::ElectionDeleted { election_id });
        Ok(())
    }

    /// Flip whether an election is open to voters, returning the new value.
    pub fn toggle_election_status(&self, election_id: ElectionId) -> Result<bool> {
        let op = OperationId::next();
        let is_active = {
            let mut state = self.lock();
            require_admin(&state)?;
            let election = state.election_mut(election_id)?;
            election.metadata.is_active = !election.metadata.is_active;
            election.metadata.is_active
        };
        let status = if is_active { "active" } else { "inactive" };
        info!("op{op} election {election_id} is now {status}");
        self.publish(StoreEvent::ElectionUpdated { election_id });
        Ok(is_active)
    }

    /// Append a zero-vote candidate to an election.
    pub fn add_candidate(&self, election_id: ElectionId, spec: CandidateSpec) -> Result<Candidate> {
        let op = OperationId::next();
        spec.validate()?;
        let candidate = {
            let mut state = self.lock();
            require_admin(&state)?;
            // Check presence before allocating, so a bad ID leaves no counter behind.
            state.election(election_id)?;
            let candidate_id = state.candidate_ids(election_id).next();
            state
                .election_mut(election_id)?
                .add_candidate(spec, candidate_id)
                .clone()
        };
        info!(
            "op{op} added candidate {} \"{}\" to election {election_id}",
            candidate.id, candidate.name
        );
        self.publish(StoreEvent::CandidateAdded {
            election_id,
            candidate_id: candidate.id,
        });
        Ok(candidate)
    }

    /// Remove a candidate who has not received any votes. Candidates with
    /// votes are kept, so the election's total always matches its tallies.
    pub fn remove_candidate(
        &self,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<()> {
        let op = OperationId::next();
        {
            let mut state = self.lock();
            require_admin(&state)?;
            let election = state.election_mut(election_id)?;
            let candidate = election.candidate(candidate_id).ok_or_else(|| {
                Error::not_found(format!("Candidate {candidate_id} in election {election_id}"))
            })?;
            if candidate.votes > 0 {
                warn!(
                    "op{op} refused to remove candidate {candidate_id} of election {election_id}"
                );
                return Err(Error::CandidateHasVotes {
                    candidate_id,
                    election_id,
                    votes: candidate.votes,
                });
            }
            election.candidates.retain(|c| c.id != candidate_id);
        }
        info!("op{op} removed candidate {candidate_id} from election {election_id}");
        self.publish(StoreEvent::CandidateRemoved {
            election_id,
            candidate_id,
        });
        Ok(())
    }
}

/// Voter management.
impl ElectionStore {
    /// Register a new voter. The login handle must not already be in use.
    pub fn register_voter(&self, spec: VoterSpec) -> Result<VoterDescription> {
        let op = OperationId::next();
        spec.validate()?;
        {
            let state = self.lock();
            require_admin(&state)?;
        }
        // Hash outside the lock; it is by far the slowest step.
        let new_voter: NewVoter = spec.try_into()?;
        let voter = {
            let mut state = self.lock();
            require_admin(&state)?;
            if state.voter_id_taken(&new_voter.voter_id, None) {
                return Err(Error::DuplicateVoterId(new_voter.voter_id));
            }
            VoterDescription::from(state.insert_voter(new_voter))
        };
        info!("op{op} registered voter {} ({})", voter.id, voter.voter_id);
        self.publish(StoreEvent::VoterRegistered { voter_id: voter.id });
        Ok(voter)
    }

    /// Merge the given fields into a voter's profile.
    pub fn update_voter(&self, id: VoterId, patch: VoterPatch) -> Result<VoterDescription> {
        let op = OperationId::next();
        patch.validate()?;
        let voter = {
            let mut state = self.lock();
            require_admin(&state)?;
            if let Some(voter_id) = &patch.voter_id {
                if state.voter_id_taken(voter_id, Some(id)) {
                    return Err(Error::DuplicateVoterId(voter_id.clone()));
                }
            }
            let voter = state.voter_mut(id)?;
            voter.voter = patch.merged(&voter.voter)?;
            VoterDescription::from(&*voter)
        };
        info!("op{op} updated voter {id}");
        self.publish(StoreEvent::VoterUpdated { voter_id: id });
        Ok(voter)
    }

    /// Remove a voter. Their vote records stay in the log.
    pub fn delete_voter(&self, id: VoterId) -> Result<()> {
        let op = OperationId::next();
        {
            let mut state = self.lock();
            require_admin(&state)?;
            let voter = state.remove_voter(id)?;
            info!("op{op} deleted voter {id} ({})", voter.voter_id);
        }
        self.publish(StoreEvent::VoterDeleted { voter_id: id });
        Ok(())
    }

    /// Every voter, without credentials.
    pub fn voters(&self) -> Result<Vec<VoterDescription>> {
        let state = self.lock();
        require_admin(&state)?;
        Ok(state.voters.iter().map(VoterDescription::from).collect())
    }

    /// Every admin username.
    pub fn admins(&self) -> Result<Vec<String>> {
        let state = self.lock();
        require_admin(&state)?;
        Ok(state.admins.iter().map(|a| a.username.clone()).collect())
    }

    /// The full vote log, oldest first.
    pub fn vote_records(&self) -> Result<Vec<VoteRecord>> {
        let state = self.lock();
        require_admin(&state)?;
        Ok(state.vote_records.clone())
    }

    /// Counts shown on the admin dashboard.
    pub fn stats(&self) -> Result<StoreStats> {
        let state = self.lock();
        require_admin(&state)?;
        Ok(StoreStats {
            total_elections: state.elections.len(),
            active_elections: state
                .elections
                .iter()
                .filter(|e| e.metadata.is_active)
                .count(),
            total_voters: state.voters.len(),
            total_votes: state.vote_records.len(),
        })
    }
}
