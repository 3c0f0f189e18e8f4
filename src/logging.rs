use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::LevelFilter;

use crate::error::{Error, Result};

/// Default logging config, looked up relative to the working directory.
pub const LOG_CONFIG_FILE: &str = "log4rs.yaml";

/// A unique identifier for a particular store operation, so that the log
/// lines of one mutation can be told apart from another's.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct OperationId(pub usize);

impl Display for OperationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OperationId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> OperationId {
        static OPERATION_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        OperationId(OPERATION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Initialise `log4rs` from the given YAML file, with the dynamic filter
/// deserializers registered so individual targets can be muted at runtime.
pub fn init(path: impl AsRef<Path>) -> Result<()> {
    log4rs::init_file(path, log4rs_dynamic_filters::default_deserializers())
        .map_err(|e| Error::Logging(e.to_string()))?;
    info!("Initialised logging");
    Ok(())
}

/// Initialise logging from [`LOG_CONFIG_FILE`].
pub fn init_default() -> Result<()> {
    init(LOG_CONFIG_FILE)
}

/// Name of the dynamic filter on the console appender in [`LOG_CONFIG_FILE`].
pub const CONSOLE_FILTER: &str = "console";

/// Change how much reaches the console, e.g. `LevelFilter::Off` while an
/// interactive view owns the terminal. The log file is unaffected.
pub fn set_console_level(level: LevelFilter) {
    log4rs_dynamic_filters::DynamicLevelFilter::set(CONSOLE_FILTER, level);
}
