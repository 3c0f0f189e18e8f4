use std::collections::HashMap;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    admin::{Admin, NewAdmin},
    auth::Session,
    common::{Counter, ElectionId, VoterId},
    election::{Election, NewElection},
    vote::VoteRecord,
    voter::{NewVoter, Voter},
};

/// Every collection the store owns. Only reachable through the store's
/// lock, so each operation sees and leaves a consistent whole.
#[derive(Debug)]
pub(crate) struct State {
    pub config: Config,
    pub elections: Vec<Election>,
    pub voters: Vec<Voter>,
    pub admins: Vec<Admin>,
    pub vote_records: Vec<VoteRecord>,
    pub session: Session,
    election_ids: Counter,
    voter_ids: Counter,
    admin_ids: Counter,
    /// One candidate ID counter per election.
    candidate_ids: HashMap<ElectionId, Counter>,
}

impl State {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            elections: Vec::new(),
            voters: Vec::new(),
            admins: Vec::new(),
            vote_records: Vec::new(),
            session: Session::Anonymous,
            election_ids: Counter::default(),
            voter_ids: Counter::default(),
            admin_ids: Counter::default(),
            candidate_ids: HashMap::new(),
        }
    }

    pub fn election(&self, id: ElectionId) -> Result<&Election> {
        self.elections
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::not_found(format!("Election {id}")))
    }

    pub fn election_mut(&mut self, id: ElectionId) -> Result<&mut Election> {
        self.elections
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::not_found(format!("Election {id}")))
    }

    pub fn voter(&self, id: VoterId) -> Result<&Voter> {
        self.voters
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| Error::not_found(format!("Voter {id}")))
    }

    pub fn voter_mut(&mut self, id: VoterId) -> Result<&mut Voter> {
        self.voters
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| Error::not_found(format!("Voter {id}")))
    }

    /// Is the login handle taken by any voter other than `except`?
    pub fn voter_id_taken(&self, voter_id: &str, except: Option<VoterId>) -> bool {
        self.voters
            .iter()
            .any(|v| v.voter_id == voter_id && Some(v.id) != except)
    }

    pub fn has_voted(&self, voter_id: VoterId, election_id: ElectionId) -> bool {
        self.vote_records
            .iter()
            .any(|record| record.is_for(voter_id, election_id))
    }

    /// Allocate the next election ID.
    pub fn next_election_id(&mut self) -> ElectionId {
        self.election_ids.next()
    }

    /// The candidate counter of the given election, created on first use.
    pub fn candidate_ids(&mut self, election_id: ElectionId) -> &mut Counter {
        self.candidate_ids.entry(election_id).or_default()
    }

    pub fn insert_election(&mut self, id: ElectionId, election: NewElection) -> &Election {
        self.elections.push(Election { id, election });
        // Just pushed, so the list is non-empty.
        &self.elections[self.elections.len() - 1]
    }

    pub fn remove_election(&mut self, id: ElectionId) -> Result<Election> {
        let index = self
            .elections
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::not_found(format!("Election {id}")))?;
        self.candidate_ids.remove(&id);
        Ok(self.elections.remove(index))
    }

    pub fn insert_voter(&mut self, voter: NewVoter) -> &Voter {
        let id = self.voter_ids.next();
        self.voters.push(Voter { id, voter });
        &self.voters[self.voters.len() - 1]
    }

    pub fn remove_voter(&mut self, id: VoterId) -> Result<Voter> {
        let index = self
            .voters
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| Error::not_found(format!("Voter {id}")))?;
        Ok(self.voters.remove(index))
    }

    pub fn insert_admin(&mut self, admin: NewAdmin) -> Result<&Admin> {
        if self.admins.iter().any(|a| a.username == admin.username) {
            return Err(Error::bad_request(format!(
                "Admin username already in use: {}",
                admin.username
            )));
        }
        let id = self.admin_ids.next();
        self.admins.push(Admin { id, admin });
        Ok(&self.admins[self.admins.len() - 1])
    }
}
