//! Day-stepping multimedia fate engine.
//!
//! A scenario couples a chemical, a regional environment, daily climate
//! forcing, and a release schedule. Each simulated day the engine rebuilds
//! the process tables from that day's forcing, integrates the resulting
//! linear (plus, for nanomaterials, mildly nonlinear) system across the day,
//! and records a priced flux ledger. `envfate_core` holds parameters,
//! partitioning, and the process formulas; `envfate_models` holds the three
//! per-chemistry assemblers; this crate drives them through time.

pub mod sim;

pub use envfate_core::{
    ClimateDay, ClimateSeries, FateError, FateResult, Medium, Presence, ScenarioConfig, SoilKind,
    Toggles,
};
pub use envfate_models::{
    AquivalenceChemical, AquivalenceModel, FluxLedger, FluxRecord, NanoModel, OrganicModel,
    TransportNetwork,
};
pub use sim::{DayResult, FateModel, Simulation, SimulationRun};
