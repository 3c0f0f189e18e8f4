use chrono::{NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::logging::OperationId;
use crate::model::{
    common::{CandidateId, ElectionId},
    election::Election,
    vote::VoteRecord,
};

use super::{ElectionStore, StoreEvent};

impl ElectionStore {
    /// Record a vote by the logged-in voter.
    ///
    /// The already-voted check and the commit happen under one lock guard,
    /// so concurrent calls for the same voter and election produce exactly
    /// one record. On any error, nothing changes.
    pub fn cast_vote(
        &self,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<VoteRecord> {
        let op = OperationId::next();
        let record = {
            let mut state = self.lock();
            let voter_id = state.session.voter().ok_or(Error::SessionRequired)?;
            // The session may outlive the voter it names.
            state.voter(voter_id)?;

            if state.has_voted(voter_id, election_id) {
                warn!("op{op} voter {voter_id} tried to vote twice in election {election_id}");
                return Err(Error::AlreadyVoted {
                    voter_id,
                    election_id,
                });
            }

            let enforce_window = state.config.enforce_voting_window();
            let election = state.election(election_id)?;
            if election.candidate(candidate_id).is_none() {
                return Err(Error::InvalidCandidateForElection {
                    candidate_id,
                    election_id,
                });
            }
            if !election.metadata.is_active {
                return Err(Error::ElectionInactive(election_id));
            }
            if enforce_window && !election.metadata.is_open_on(voting_day()) {
                return Err(Error::OutsideVotingWindow(election_id));
            }

            let record = VoteRecord::new(voter_id, candidate_id, election_id);
            state.election_mut(election_id)?.add_vote(candidate_id);
            let voter = state.voter_mut(voter_id)?;
            voter.has_voted = true;
            voter.voted_election_id = Some(election_id);
            state.vote_records.push(record.clone());
            record
        };
        info!("op{op} voter {} voted in election {election_id}", record.voter_id);
        debug!("op{op} vote recorded for candidate {candidate_id}");
        self.publish(StoreEvent::VoteCast {
            election_id,
            candidate_id,
        });
        Ok(record)
    }

    /// Has the logged-in voter voted in this election? False when no voter
    /// is logged in.
    pub fn has_voter_voted(&self, election_id: ElectionId) -> bool {
        let state = self.lock();
        state
            .session
            .voter()
            .map_or(false, |voter_id| state.has_voted(voter_id, election_id))
    }

    /// Active elections, for the voter's ballot list.
    pub fn voter_elections(&self) -> Vec<Election> {
        self.lock()
            .elections
            .iter()
            .filter(|e| e.metadata.is_active)
            .cloned()
            .collect()
    }

    /// Every election, in creation order.
    pub fn elections(&self) -> Vec<Election> {
        self.lock().elections.clone()
    }

    pub fn election(&self, id: ElectionId) -> Result<Election> {
        self.lock().election(id).cloned()
    }
}

/// The calendar day voting windows are checked against. Election dates
/// carry no time zone and are read as UTC days, so the day rolls over at
/// midnight UTC whatever the voter's local time.
pub fn voting_day() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use std::thread;

    use tokio::sync::broadcast::Receiver;

    use crate::config::Config;
    use crate::error::Error;
    use crate::model::{auth::Session, election::ElectionSpec};
    use super::voting_day;
    use crate::store::{
        seed::{DEMO_ADMIN_PASSWORD, DEMO_ADMIN_USERNAME, DEMO_VOTER_ID, DEMO_VOTER_PASSWORD},
        ElectionStore, StoreEvent,
    };

    fn tallies(store: &ElectionStore) -> Vec<u64> {
        store
            .election(1)
            .unwrap()
            .candidates
            .iter()
            .map(|c| c.votes)
            .collect()
    }

    #[store_test(voter)]
    fn vote_once(store: ElectionStore) {
        let record = store.cast_vote(1, 2).unwrap();
        assert_eq!(
            (record.voter_id, record.election_id, record.candidate_id),
            (1, 1, 2)
        );

        let election = store.election(1).unwrap();
        assert_eq!(election.candidate(2).unwrap().name, "Jane Doe");
        assert_eq!(tallies(&store), vec![0, 1, 0]);
        assert_eq!(election.total_votes, 1);
        assert!(store.has_voter_voted(1));

        assert!(matches!(
            store.cast_vote(1, 1),
            Err(Error::AlreadyVoted {
                voter_id: 1,
                election_id: 1
            })
        ));
        assert_eq!(tallies(&store), vec![0, 1, 0]);
        assert_eq!(store.election(1).unwrap().total_votes, 1);
    }

    #[store_test(voter)]
    fn voter_is_marked(store: ElectionStore, mut events: Receiver<StoreEvent>) {
        store.cast_vote(1, 3).unwrap();
        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::VoteCast {
                election_id: 1,
                candidate_id: 3
            }
        );

        store.login_admin(DEMO_ADMIN_USERNAME, DEMO_ADMIN_PASSWORD).unwrap();
        let voters = store.voters().unwrap();
        assert!(voters[0].has_voted);
        assert_eq!(voters[0].voted_election_id, Some(1));
        assert!(!voters[1].has_voted);
        assert_eq!(store.vote_records().unwrap().len(), 1);
    }

    #[store_test]
    fn anonymous_cannot_vote(store: ElectionStore) {
        assert!(matches!(store.cast_vote(1, 1), Err(Error::SessionRequired)));
        assert!(!store.has_voter_voted(1));

        store.login_admin(DEMO_ADMIN_USERNAME, DEMO_ADMIN_PASSWORD).unwrap();
        assert!(matches!(store.cast_vote(1, 1), Err(Error::SessionRequired)));
        assert_eq!(tallies(&store), vec![0, 0, 0]);
    }

    #[store_test(voter)]
    fn unknown_targets(store: ElectionStore) {
        assert!(matches!(store.cast_vote(5, 1), Err(Error::NotFound(_))));
        assert!(matches!(
            store.cast_vote(1, 99),
            Err(Error::InvalidCandidateForElection {
                candidate_id: 99,
                election_id: 1
            })
        ));
        assert!(!store.has_voter_voted(1));
        assert_eq!(store.election(1).unwrap().total_votes, 0);
    }

    #[store_test(admin)]
    fn candidate_must_belong_to_election(store: ElectionStore) {
        let club = store.create_election(ElectionSpec::club_example()).unwrap();
        store.toggle_election_status(club.id).unwrap();
        store.login_voter(DEMO_VOTER_ID, DEMO_VOTER_PASSWORD).unwrap();

        // Candidate 3 exists in election 1 but not in the two-candidate club election.
        assert!(matches!(
            store.cast_vote(club.id, 3),
            Err(Error::InvalidCandidateForElection { .. })
        ));
        store.cast_vote(club.id, 2).unwrap();
        // One vote per election, not one overall.
        store.cast_vote(1, 3).unwrap();
        assert!(store.has_voter_voted(club.id));
        assert!(store.has_voter_voted(1));
    }

    #[store_test(admin)]
    fn inactive_elections_refuse_votes(store: ElectionStore) {
        store.toggle_election_status(1).unwrap();
        store.login_voter(DEMO_VOTER_ID, DEMO_VOTER_PASSWORD).unwrap();
        assert!(store.voter_elections().is_empty());
        assert!(matches!(store.cast_vote(1, 1), Err(Error::ElectionInactive(1))));
        assert!(!store.has_voter_voted(1));
    }

    #[test]
    fn voting_window_enforced_when_configured() {
        let store = ElectionStore::new(Config::default().with_voting_window(true)).unwrap();
        store.login_voter(DEMO_VOTER_ID, DEMO_VOTER_PASSWORD).unwrap();
        // The demo election ran through 2024.
        assert!(matches!(
            store.cast_vote(1, 1),
            Err(Error::OutsideVotingWindow(1))
        ));
        assert_eq!(store.election(1).unwrap().total_votes, 0);
    }

    #[test]
    fn voting_window_uses_utc_day() {
        let store = ElectionStore::new(Config::default().with_voting_window(true)).unwrap();
        store.login_admin(DEMO_ADMIN_USERNAME, DEMO_ADMIN_PASSWORD).unwrap();
        let mut spec = ElectionSpec::club_example();
        spec.metadata.is_active = true;
        spec.metadata.start_date = voting_day();
        spec.metadata.end_date = voting_day();
        let today_only = store.create_election(spec).unwrap();

        store.login_voter(DEMO_VOTER_ID, DEMO_VOTER_PASSWORD).unwrap();
        store.cast_vote(today_only.id, 1).unwrap();
        assert!(store.has_voter_voted(today_only.id));
    }

    #[store_test(admin)]
    fn ballot_list_keeps_creation_order(store: ElectionStore) {
        let mut second = ElectionSpec::club_example();
        second.metadata.title = "Prefect Election".to_string();
        let second = store.create_election(second).unwrap();
        let mut third = ElectionSpec::club_example();
        third.metadata.is_active = true;
        let third = store.create_election(third).unwrap();
        assert!(!second.metadata.is_active);

        let ids = store
            .voter_elections()
            .iter()
            .map(|e| e.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(third.id, 3);
        assert_eq!(store.elections().len(), 3);
    }

    #[store_test(voter)]
    fn has_voted_is_per_voter(store: ElectionStore) {
        store.cast_vote(1, 1).unwrap();
        store.login_voter("V002", DEMO_VOTER_PASSWORD).unwrap();
        assert!(!store.has_voter_voted(1));
        store.cast_vote(1, 1).unwrap();
        assert_eq!(tallies(&store), vec![2, 0, 0]);

        store.logout();
        assert!(!store.has_voter_voted(1));
    }

    #[store_test(voter)]
    fn concurrent_votes_count_once(store: ElectionStore) {
        let handles = (0..8)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || store.cast_vote(1, i % 3 + 1))
            })
            .collect::<Vec<_>>();
        let results = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, Error::AlreadyVoted { .. })));

        let election = store.election(1).unwrap();
        assert_eq!(election.total_votes, 1);
        assert!(election.tally_is_consistent());
        assert_eq!(store.session(), Session::Voter(1));
    }

    #[store_test]
    fn listings(store: ElectionStore) {
        assert_eq!(store.elections().len(), 1);
        assert_eq!(store.voter_elections(), store.elections());
        assert!(matches!(store.election(2), Err(Error::NotFound(_))));
    }
}
