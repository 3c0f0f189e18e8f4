use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{CandidateId, ElectionId},
    election::Election,
};

/// One candidate's standing within an election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResult {
    /// 1-based position after ranking.
    pub rank: usize,
    pub candidate_id: CandidateId,
    pub name: String,
    pub party: String,
    pub votes: u64,
    /// Share of the total, in percent. Zero when nobody has voted.
    pub percentage: f64,
}

/// Ranked results of one election, computed from a snapshot of its tallies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResults {
    pub election_id: ElectionId,
    pub title: String,
    pub is_active: bool,
    pub total_votes: u64,
    /// Candidates by votes descending; ties keep ballot order.
    pub standings: Vec<CandidateResult>,
}

impl ElectionResults {
    /// Rank the election's candidates.
    pub fn tally(election: &Election) -> Self {
        let total_votes = election.total_votes;
        let mut ranked = election.candidates.iter().collect::<Vec<_>>();
        // `sort_by` is stable, so equal counts stay in ballot order.
        ranked.sort_by(|a, b| b.votes.cmp(&a.votes));

        let standings = ranked
            .into_iter()
            .enumerate()
            .map(|(i, candidate)| CandidateResult {
                rank: i + 1,
                candidate_id: candidate.id,
                name: candidate.name.clone(),
                party: candidate.party.clone(),
                votes: candidate.votes,
                percentage: percentage(candidate.votes, total_votes),
            })
            .collect();

        Self {
            election_id: election.id,
            title: election.metadata.title.clone(),
            is_active: election.metadata.is_active,
            total_votes,
            standings,
        }
    }

    /// The leading candidate, or `None` if no votes have been cast.
    pub fn winner(&self) -> Option<&CandidateResult> {
        if self.total_votes == 0 {
            return None;
        }
        self.standings.first()
    }
}

fn percentage(votes: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (votes as f64 / total as f64) * 100.0
    }
}

/// Format to one decimal place, rounding exact ties up rather than to even.
///
/// A non-negative `f64` sits exactly halfway between two one-decimal values
/// only when it is an odd number of quarters (x.25 or x.75); everything else
/// is already rounded to nearest by `{:.1}`.
fn one_decimal(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        format!("{:.1}", (value * 10.0).ceil() / 10.0)
    } else {
        format!("{value:.1}")
    }
}

/// The plain-text results report offered for download. Rendering is a pure
/// function of the results and the generation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionReport {
    results: ElectionResults,
    generated_at: DateTime<Utc>,
    time_format: String,
}

impl ElectionReport {
    /// Default `strftime` format of the "Generated" line.
    pub const DEFAULT_TIME_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    pub fn new(election: &Election, generated_at: DateTime<Utc>) -> Self {
        Self::from_results(ElectionResults::tally(election), generated_at)
    }

    pub fn from_results(results: ElectionResults, generated_at: DateTime<Utc>) -> Self {
        Self {
            results,
            generated_at,
            time_format: Self::DEFAULT_TIME_FORMAT.to_string(),
        }
    }

    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    pub fn results(&self) -> &ElectionResults {
        &self.results
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Suggested download name.
    pub fn file_name(&self) -> String {
        format!("election-report-{}.txt", self.results.election_id)
    }
}

impl Display for ElectionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "ELECTION RESULTS REPORT")?;
        writeln!(f, "======================")?;
        writeln!(f)?;
        writeln!(f, "Election: {}", self.results.title)?;
        writeln!(
            f,
            "Generated: {}",
            self.generated_at.format(&self.time_format)
        )?;
        writeln!(f, "Total Votes: {}", self.results.total_votes)?;
        writeln!(f)?;
        writeln!(f, "RESULTS:")?;
        let lines = self
            .results
            .standings
            .iter()
            .map(|c| {
                format!(
                    "{}. {} ({}) - {} votes ({}%)",
                    c.rank,
                    c.name,
                    c.party,
                    c.votes,
                    one_decimal(c.percentage)
                )
            })
            .collect::<Vec<_>>();
        writeln!(f, "{}", lines.join("\n"))?;
        writeln!(f)?;
        match self.results.winner() {
            Some(winner) => writeln!(f, "Winner: {}", winner.name),
            None => writeln!(f, "Winner: No votes cast"),
        }
    }
}
