//! Core building blocks of the multimedia fate engine: compartment
//! layouts and presence resolution, daily climate forcing, chemical and
//! environment parameter records, phase partitioning, and the process
//! calculators the chemistry-specific assemblers are built from.

pub mod climate;
pub mod compartment;
pub mod config;
pub mod errors;
pub mod numeric;
pub mod params;
pub mod partition;
pub mod presence;
pub mod processes;

pub use climate::{ClimateDay, ClimateSeries};
pub use compartment::{Medium, SoilKind, R_GAS, SECONDS_PER_DAY};
pub use config::ScenarioConfig;
pub use errors::{FateError, FateResult};
pub use numeric::safe_div;
pub use presence::{Presence, Toggles};
