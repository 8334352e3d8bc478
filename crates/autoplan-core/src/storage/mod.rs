mod config;
pub mod store;

pub use config::{CaptureConfig, Config, PlanningConfig};
pub use store::{BusyEvent, Store, StoreSnapshot};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `AUTOPLAN_HOME` overrides the location outright. Otherwise this is
/// `~/.config/autoplan[-dev]/`, with the `-dev` suffix when `AUTOPLAN_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("AUTOPLAN_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("AUTOPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("autoplan-dev")
            } else {
                base_dir.join("autoplan")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
