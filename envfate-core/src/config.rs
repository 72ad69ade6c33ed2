//! Scenario configuration.
//!
//! A scenario file names the chemical class, the simulation window, and the
//! compartment toggles, in TOML:
//!
//! ```toml
//! name = "harbor-baseline"
//! class = "organic"
//! start = "2015-01-01"
//! end = "2015-12-31"
//!
//! [toggles]
//! fresh_water = false
//! ```
//!
//! Omitted toggles default to present.

use crate::errors::{FateError, FateResult};
use crate::params::ChemicalClass;
use crate::presence::Toggles;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub class: ChemicalClass,
    /// First simulated day, inclusive.
    pub start: NaiveDate,
    /// Last simulated day, inclusive.
    pub end: NaiveDate,
    #[serde(default)]
    pub toggles: Toggles,
}

impl ScenarioConfig {
    pub fn from_toml_str(raw: &str) -> FateResult<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| FateError::Config(format!("scenario file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> FateResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            FateError::Config(format!("reading {}: {e}", path.as_ref().display()))
        })?;
        let config = Self::from_toml_str(&raw)?;
        log::info!(
            "scenario '{}' ({:?}): {} days from {}",
            config.name,
            config.class,
            config.days(),
            config.start
        );
        Ok(config)
    }

    fn validate(&self) -> FateResult<()> {
        if self.end < self.start {
            return Err(FateError::Config(format!(
                "window end {} precedes start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }

    /// Number of simulated days, inclusive of both endpoints.
    pub fn days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }
}
