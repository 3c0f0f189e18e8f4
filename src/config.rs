use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default config file, looked up relative to the working directory.
pub const CONFIG_FILE: &str = "Election.toml";

/// Environment variable prefix, e.g. `ELECTION_SEED_DEMO_DATA=false`.
pub const ENV_PREFIX: &str = "ELECTION_";

/// Store configuration, derived from compiled defaults, `Election.toml`
/// and `ELECTION_*` environment variables, in increasing precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    seed_demo_data: bool,
    enforce_voting_window: bool,
    event_capacity: usize,
    report_time_format: String,
}

impl Config {
    /// Load from [`CONFIG_FILE`] and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from the given TOML file and the environment. A missing file
    /// is not an error; the compiled defaults are used instead.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        } else {
            debug!("Config file {} missing; using defaults", path.display());
        }
        let config: Config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        config.validate()?;
        info!("Loaded store config: {config:?}");
        Ok(config)
    }

    /// Reject settings that would only fail later, e.g. when a report is rendered.
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.report_time_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::bad_request(format!(
                "Invalid report_time_format: {:?}",
                self.report_time_format
            )));
        }
        Ok(())
    }

    /// Whether a fresh store starts with the demo election, admin and voters.
    pub fn seed_demo_data(&self) -> bool {
        self.seed_demo_data
    }

    /// Whether votes are refused outside an election's start/end dates.
    pub fn enforce_voting_window(&self) -> bool {
        self.enforce_voting_window
    }

    /// Capacity of the subscriber broadcast channel.
    pub fn event_capacity(&self) -> usize {
        self.event_capacity.max(1)
    }

    /// `strftime` format of the report's "Generated" line.
    pub fn report_time_format(&self) -> &str {
        &self.report_time_format
    }

    pub fn with_seed_demo_data(mut self, seed: bool) -> Self {
        self.seed_demo_data = seed;
        self
    }

    pub fn with_voting_window(mut self, enforce: bool) -> Self {
        self.enforce_voting_window = enforce;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
            enforce_voting_window: false,
            event_capacity: 64,
            report_time_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from("does-not-exist.toml").unwrap();
            assert_eq!(config, Config::default());
            assert!(config.seed_demo_data());
            assert!(!config.enforce_voting_window());
            Ok(())
        });
    }

    #[test]
    fn file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    seed_demo_data = false
                    event_capacity = 8
                "#,
            )?;
            let config = Config::load().unwrap();
            assert!(!config.seed_demo_data());
            assert_eq!(config.event_capacity(), 8);

            jail.set_env("ELECTION_EVENT_CAPACITY", 16);
            jail.set_env("ELECTION_ENFORCE_VOTING_WINDOW", true);
            let config = Config::load().unwrap();
            assert!(!config.seed_demo_data());
            assert!(config.enforce_voting_window());
            assert_eq!(config.event_capacity(), 16);
            Ok(())
        });
    }

    #[test]
    fn malformed_file() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "seed_demo_data = \"maybe\"")?;
            assert!(matches!(Config::load(), Err(Error::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn bad_time_format() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "report_time_format = \"%Q\"")?;
            assert!(matches!(Config::load(), Err(Error::BadRequest(_))));
            Ok(())
        });
    }
}
