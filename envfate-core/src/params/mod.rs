//! Scenario parameters: chemical properties, environment geometry,
//! emission releases, and domain-boundary backgrounds.

pub mod background;
pub mod chemical;
pub mod environment;
pub mod release;

pub use background::{Background, SpeciesBackground};
pub use chemical::{
    ChemicalClass, DegradationHalfLives, DegradationRates, DissolutionFit, DissolutionParams,
    IonizableChemical, MetalChemical, NanoChemical, OrganicChemical,
};
pub use environment::{
    AerosolEnv, AirEnv, Environment, Geometry, SedimentEnv, SoilEnv, SoilVolumes, WaterBodyEnv,
    WaterVolumes, WindErosionEnv,
};
pub use release::{ReleaseDay, ReleaseSeries};
