//! Compartment naming and state-vector layouts.
//!
//! Compartments are referred to by name everywhere inside the engine; a flat
//! numeric ordering exists only at the integrator boundary, fixed by the
//! layout modules below so serialized state lines up day after day.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ideal gas constant, Pa m³/(mol K).
pub const R_GAS: f64 = 8.314;

/// Seconds per simulated day, for converting per-second forcing rates.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// The four modeled land-use soil types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilKind {
    Undeveloped,
    Urban,
    Agricultural,
    /// Agricultural soil amended with biosolids.
    Biosolid,
}

impl SoilKind {
    pub const ALL: [SoilKind; 4] = [
        SoilKind::Undeveloped,
        SoilKind::Urban,
        SoilKind::Agricultural,
        SoilKind::Biosolid,
    ];

    pub fn index(self) -> usize {
        match self {
            SoilKind::Undeveloped => 0,
            SoilKind::Urban => 1,
            SoilKind::Agricultural => 2,
            SoilKind::Biosolid => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SoilKind::Undeveloped => "undeveloped",
            SoilKind::Urban => "urban",
            SoilKind::Agricultural => "agricultural",
            SoilKind::Biosolid => "agricultural-biosolid",
        }
    }
}

/// A named node of the transport network.
///
/// Soil variants carry their [`SoilKind`]; water bodies split into the bulk
/// water column, its suspended sediment, and the bed sediment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medium {
    Air,
    Aerosol,
    RiverWater,
    RiverSusSed,
    RiverSediment,
    FreshWater,
    FreshSusSed,
    FreshSediment,
    SeaWater,
    SeaSusSed,
    SeaSediment,
    SoilSolid(SoilKind),
    SoilWater(SoilKind),
    DeepSoil(SoilKind),
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Medium::Air => write!(f, "air"),
            Medium::Aerosol => write!(f, "aerosol"),
            Medium::RiverWater => write!(f, "river water"),
            Medium::RiverSusSed => write!(f, "river suspended sediment"),
            Medium::RiverSediment => write!(f, "river sediment"),
            Medium::FreshWater => write!(f, "freshwater"),
            Medium::FreshSusSed => write!(f, "freshwater suspended sediment"),
            Medium::FreshSediment => write!(f, "freshwater sediment"),
            Medium::SeaWater => write!(f, "seawater"),
            Medium::SeaSusSed => write!(f, "seawater suspended sediment"),
            Medium::SeaSediment => write!(f, "seawater sediment"),
            Medium::SoilSolid(k) => write!(f, "{} soil solid", k.label()),
            Medium::SoilWater(k) => write!(f, "{} soil water", k.label()),
            Medium::DeepSoil(k) => write!(f, "{} deep soil", k.label()),
        }
    }
}

/// State ordering for the 15-state fugacity and aquivalence families.
///
/// Bulk air carries its aerosol sub-phase; each water body carries its
/// suspended sediment. Surface and deep soil alternate per soil type.
pub mod organic_layout {
    use super::SoilKind;

    pub const N: usize = 15;

    pub const AIR: usize = 0;
    pub const RIVER_WATER: usize = 1;
    pub const RIVER_SEDIMENT: usize = 2;
    pub const FRESH_WATER: usize = 3;
    pub const FRESH_SEDIMENT: usize = 4;
    pub const SEA_WATER: usize = 5;
    pub const SEA_SEDIMENT: usize = 6;

    pub fn soil_surface(kind: SoilKind) -> usize {
        7 + 2 * kind.index()
    }

    pub fn soil_deep(kind: SoilKind) -> usize {
        8 + 2 * kind.index()
    }

    pub const NAMES: [&str; N] = [
        "air",
        "river water",
        "river sediment",
        "freshwater",
        "freshwater sediment",
        "seawater",
        "seawater sediment",
        "undeveloped soil surface",
        "undeveloped deep soil",
        "urban soil surface",
        "urban deep soil",
        "agricultural soil surface",
        "agricultural deep soil",
        "agricultural-biosolid soil surface",
        "agricultural-biosolid deep soil",
    ];
}

/// State ordering for the 33-state particle-mass (nanomaterial) family.
///
/// Positions 0..=18 hold particulate mass; 19..=28 the dissolved-phase mass
/// per water body, bed sediment, and soil water; 29..=32 the deep-soil mass
/// fed by infiltration.
pub mod nano_layout {
    use super::SoilKind;

    pub const N: usize = 33;

    pub const AIR: usize = 0;
    pub const AEROSOL: usize = 1;
    pub const RIVER_WATER: usize = 2;
    pub const RIVER_SUS_SED: usize = 3;
    pub const RIVER_SEDIMENT: usize = 4;
    pub const FRESH_WATER: usize = 5;
    pub const FRESH_SUS_SED: usize = 6;
    pub const FRESH_SEDIMENT: usize = 7;
    pub const SEA_WATER: usize = 8;
    pub const SEA_SUS_SED: usize = 9;
    pub const SEA_SEDIMENT: usize = 10;

    pub fn soil_solid(kind: SoilKind) -> usize {
        11 + 2 * kind.index()
    }

    pub fn soil_water(kind: SoilKind) -> usize {
        12 + 2 * kind.index()
    }

    pub const DISSOLVED_RIVER: usize = 19;
    pub const DISSOLVED_RIVER_SED: usize = 20;
    pub const DISSOLVED_FRESH: usize = 21;
    pub const DISSOLVED_FRESH_SED: usize = 22;
    pub const DISSOLVED_SEA: usize = 23;
    pub const DISSOLVED_SEA_SED: usize = 24;

    pub fn dissolved_soil_water(kind: SoilKind) -> usize {
        25 + kind.index()
    }

    pub fn deep_soil(kind: SoilKind) -> usize {
        29 + kind.index()
    }

    pub const NAMES: [&str; N] = [
        "air",
        "aerosol",
        "river water",
        "river suspended sediment",
        "river sediment",
        "freshwater",
        "freshwater suspended sediment",
        "freshwater sediment",
        "seawater",
        "seawater suspended sediment",
        "seawater sediment",
        "undeveloped soil solid",
        "undeveloped soil water",
        "urban soil solid",
        "urban soil water",
        "agricultural soil solid",
        "agricultural soil water",
        "agricultural-biosolid soil solid",
        "agricultural-biosolid soil water",
        "river water dissolved",
        "river sediment dissolved",
        "freshwater dissolved",
        "freshwater sediment dissolved",
        "seawater dissolved",
        "seawater sediment dissolved",
        "undeveloped soil water dissolved",
        "urban soil water dissolved",
        "agricultural soil water dissolved",
        "agricultural-biosolid soil water dissolved",
        "undeveloped deep soil",
        "urban deep soil",
        "agricultural deep soil",
        "agricultural-biosolid deep soil",
    ];
}
