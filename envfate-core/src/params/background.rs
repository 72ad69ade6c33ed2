//! Upwind and upstream ambient concentrations.
//!
//! Advective inflow into air and the flowing waters carries the background
//! concentration of the neighboring region. For speciating chemistries the
//! inflow is split per species, so the record keeps separate particulate,
//! colloidal, and truly dissolved values alongside the bulk figure used by
//! single-species chemistries.

use serde::{Deserialize, Serialize};

/// Per-species background split of a water inflow, kg/m³.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpeciesBackground {
    pub particulate: f64,
    pub colloidal: f64,
    pub dissolved: f64,
}

impl SpeciesBackground {
    pub fn total(&self) -> f64 {
        self.particulate + self.colloidal + self.dissolved
    }
}

/// Background concentrations at the domain boundary, kg/m³.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Background {
    /// Bulk gas-plus-aerosol concentration of the inflowing air.
    pub air: f64,
    /// Bulk concentration of the river headwater inflow.
    pub river: f64,
    /// Bulk concentration of the freshwater inflow.
    pub fresh: f64,
    /// Species split of the river inflow. Zero for non-speciating classes.
    #[serde(default)]
    pub river_species: SpeciesBackground,
    /// Species split of the freshwater inflow.
    #[serde(default)]
    pub fresh_species: SpeciesBackground,
}

impl Background {
    /// A clean boundary with no inflowing chemical.
    pub fn clean() -> Self {
        Self::default()
    }
}
