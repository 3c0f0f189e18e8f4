//! The election store: one owned instance holding every entity, exposing
//! only the operations views may perform.
//!
//! Operations are grouped by concern into [`auth`], [`admin`], [`voting`]
//! and [`results`], all as methods on [`ElectionStore`].

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    auth::{Principal, Rights, Session},
    common::AdminId,
    election::Election,
    vote::VoteRecord,
    voter::VoterDescription,
};

pub mod admin;
pub mod auth;
pub mod events;
pub mod results;
pub mod seed;
mod state;
pub mod voting;

pub use events::StoreEvent;

use state::State;

/// Handle to the store. Clones share the same state, and every operation
/// runs to completion under a single lock, so no caller ever observes a
/// half-applied mutation.
#[derive(Clone)]
pub struct ElectionStore {
    state: Arc<Mutex<State>>,
    events: broadcast::Sender<StoreEvent>,
}

/// An owned copy of what views render. Admin-only collections are empty
/// unless an admin is logged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub principal: Principal,
    pub elections: Vec<Election>,
    pub voters: Vec<VoterDescription>,
    pub admins: Vec<String>,
    pub vote_records: Vec<VoteRecord>,
}

/// Headline counts for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_elections: usize,
    pub active_elections: usize,
    pub total_voters: usize,
    /// Length of the vote log, so votes in deleted elections still count.
    pub total_votes: usize,
}

impl ElectionStore {
    /// Create a store, seeding the demo data if the config asks for it.
    pub fn new(config: Config) -> Result<Self> {
        let (events, _) = broadcast::channel(config.event_capacity());
        let seed_demo_data = config.seed_demo_data();
        let mut state = State::new(config);
        if seed_demo_data {
            seed::seed(&mut state)?;
        }
        info!("Election store ready");
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            events,
        })
    }

    /// Create a store from `Election.toml` and `ELECTION_*` variables.
    pub fn from_config_file() -> Result<Self> {
        Self::new(Config::load()?)
    }

    /// Receive a [`StoreEvent`] for every mutation made from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// The configuration this store was created with.
    pub fn config(&self) -> Config {
        self.lock().config.clone()
    }

    /// Copy out everything the current user may see.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.lock();
        let principal = principal(&state);
        let (voters, admins, vote_records) = if state.session.permits(Rights::Admin) {
            (
                state.voters.iter().map(VoterDescription::from).collect(),
                state.admins.iter().map(|a| a.username.clone()).collect(),
                state.vote_records.clone(),
            )
        } else {
            (Vec::new(), Vec::new(), Vec::new())
        };
        StoreSnapshot {
            principal,
            elections: state.elections.clone(),
            voters,
            admins,
            vote_records,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock()
    }

    /// Notify subscribers. Must be called after the state lock is released.
    fn publish(&self, event: StoreEvent) {
        if self.events.send(event).is_err() {
            trace!("No subscribers for {event:?}");
        }
    }
}

/// Resolve the session into something renderable. A session whose user has
/// since been deleted renders as anonymous.
fn principal(state: &State) -> Principal {
    match state.session {
        Session::Anonymous => Principal::Anonymous,
        Session::Voter(id) => state
            .voter(id)
            .map(|voter| Principal::Voter(voter.into()))
            .unwrap_or(Principal::Anonymous),
        Session::Admin(id) => state
            .admins
            .iter()
            .find(|admin| admin.id == id)
            .map(|admin| Principal::Admin {
                id,
                username: admin.username.clone(),
            })
            .unwrap_or(Principal::Anonymous),
    }
}

/// Guard for admin-only operations.
fn require_admin(state: &State) -> Result<AdminId> {
    state
        .session
        .admin()
        .ok_or_else(|| Error::Unauthorized("Admin rights required".to_string()))
}
