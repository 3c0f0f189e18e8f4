use chrono::Utc;

use crate::error::Result;
use crate::model::{
    common::ElectionId,
    results::{ElectionReport, ElectionResults},
};

use super::ElectionStore;

impl ElectionStore {
    /// Ranked results of one election.
    pub fn results(&self, election_id: ElectionId) -> Result<ElectionResults> {
        Ok(ElectionResults::tally(self.lock().election(election_id)?))
    }

    /// Ranked results of every election, in creation order.
    pub fn all_results(&self) -> Vec<ElectionResults> {
        self.lock()
            .elections
            .iter()
            .map(ElectionResults::tally)
            .collect()
    }

    /// A downloadable report of one election's results as of now.
    pub fn report(&self, election_id: ElectionId) -> Result<ElectionReport> {
        let state = self.lock();
        let report = ElectionReport::new(state.election(election_id)?, Utc::now())
            .with_time_format(state.config.report_time_format());
        debug!("Generated report {}", report.file_name());
        Ok(report)
    }
}
