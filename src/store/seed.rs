//! Demo data a fresh store starts with when `seed_demo_data` is set.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::model::{
    admin::AdminCredentials,
    election::{CandidateSpec, ElectionCore, ElectionMetadata, ElectionSpec},
    voter::VoterSpec,
};

use super::state::State;

pub const DEMO_ADMIN_USERNAME: &str = "admin";
pub const DEMO_ADMIN_PASSWORD: &str = "admin123";
pub const DEMO_VOTER_ID: &str = "V001";
pub const DEMO_VOTER_PASSWORD: &str = "password123";

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::bad_request(format!("Invalid date {year}-{month}-{day}")))
}

/// The presidential election with its three candidates.
pub fn demo_election() -> Result<ElectionSpec> {
    Ok(ElectionSpec {
        metadata: ElectionMetadata {
            title: "Presidential Election 2024".to_string(),
            description: "Election for President of the Republic".to_string(),
            is_active: true,
            start_date: date(2024, 1, 1)?,
            end_date: date(2024, 12, 31)?,
        },
        candidates: vec![
            CandidateSpec::new("John Smith", "Democratic Party"),
            CandidateSpec::new("Jane Doe", "Republican Party"),
            CandidateSpec::new("Bob Johnson", "Independent"),
        ],
    })
}

pub fn demo_voters() -> Vec<VoterSpec> {
    vec![
        VoterSpec::new(
            DEMO_VOTER_ID,
            "Alice Cooper",
            "alice@example.com",
            DEMO_VOTER_PASSWORD,
        ),
        VoterSpec::new(
            "V002",
            "Charlie Brown",
            "charlie@example.com",
            DEMO_VOTER_PASSWORD,
        ),
    ]
}

pub fn demo_admin() -> AdminCredentials {
    AdminCredentials {
        username: DEMO_ADMIN_USERNAME.to_string(),
        password: DEMO_ADMIN_PASSWORD.to_string(),
    }
}

/// Populate an empty state: election 1, admin 1, voters 1 and 2, no votes.
pub(crate) fn seed(state: &mut State) -> Result<()> {
    let id = state.next_election_id();
    let election = ElectionCore::new(demo_election()?, state.candidate_ids(id));
    state.insert_election(id, election);

    state.insert_admin(demo_admin().try_into()?)?;
    for voter in demo_voters() {
        state.insert_voter(voter.try_into()?);
    }

    info!(
        "Seeded demo data: {} election(s), {} admin(s), {} voter(s)",
        state.elections.len(),
        state.admins.len(),
        state.voters.len()
    );
    Ok(())
}
