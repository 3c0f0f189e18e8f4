use crate::error::{Error, Result};
use crate::logging::OperationId;
use crate::model::auth::{Principal, Session};

use super::{principal, ElectionStore, StoreEvent};

impl ElectionStore {
    /// Log in as the first voter whose handle matches and whose password
    /// verifies. On failure the current session is left as it was.
    pub fn login_voter(&self, voter_id: &str, password: &str) -> Result<()> {
        let op = OperationId::next();
        {
            let mut state = self.lock();
            let mut found = None;
            for voter in state.voters.iter().filter(|v| v.voter_id == voter_id) {
                if voter.verify_password(password)? {
                    found = Some(voter.id);
                    break;
                }
            }
            let id = found.ok_or_else(|| {
                warn!("op{op} rejected voter login for {voter_id:?}");
                Error::Unauthorized(
                    "No voter found with the provided voter ID and password combination."
                        .to_string(),
                )
            })?;
            state.session = Session::Voter(id);
            info!("op{op} voter {id} ({voter_id}) logged in");
        }
        self.publish(StoreEvent::SessionChanged);
        Ok(())
    }

    /// Log in as the admin with this username, if the password verifies.
    /// On failure the current session is left as it was.
    pub fn login_admin(&self, username: &str, password: &str) -> Result<()> {
        let op = OperationId::next();
        {
            let mut state = self.lock();
            let verified = match state.admins.iter().find(|a| a.username == username) {
                Some(admin) => admin.verify_password(password)?.then_some(admin.id),
                None => None,
            };
            let id = verified.ok_or_else(|| {
                warn!("op{op} rejected admin login for {username:?}");
                Error::Unauthorized(
                    "No admin found with the provided username and password combination."
                        .to_string(),
                )
            })?;
            state.session = Session::Admin(id);
            info!("op{op} admin {id} ({username}) logged in");
        }
        self.publish(StoreEvent::SessionChanged);
        Ok(())
    }

    /// End the session. Always succeeds, even if nobody was logged in.
    pub fn logout(&self) {
        let op = OperationId::next();
        let previous = std::mem::take(&mut self.lock().session);
        if !previous.is_anonymous() {
            info!("op{op} logged out {previous:?}");
        }
        self.publish(StoreEvent::SessionChanged);
    }

    /// The raw session.
    pub fn session(&self) -> Session {
        self.lock().session
    }

    /// The logged-in user, in a form views can render.
    pub fn current_user(&self) -> Principal {
        principal(&self.lock())
    }
}
