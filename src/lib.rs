//! An in-memory election store: elections with candidates and live tallies,
//! registered voters, admins, a single login session, an append-only vote
//! log, and ranked results with a downloadable text report.
//!
//! Everything goes through an [`ElectionStore`] handle:
//!
//! ```no_run
//! # fn main() -> election_store::Result<()> {
//! let store = election_store::ElectionStore::from_config_file()?;
//! store.login_voter("V001", "password123")?;
//! store.cast_vote(1, 2)?;
//! println!("{}", store.report(1)?);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate store_test;

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use store::{ElectionStore, StoreEvent, StoreSnapshot, StoreStats};
