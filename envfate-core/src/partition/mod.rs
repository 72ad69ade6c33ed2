//! Phase partitioning: fugacity capacities for neutral organics and
//! species fractions for metals and ionizable organics.

pub mod fractions;
pub mod fugacity;

pub use fractions::{
    ion_fractions, metal_solid_fractions, metal_water_fractions, IonFractions, SpeciesFractions,
};
pub use fugacity::FugacityTable;
