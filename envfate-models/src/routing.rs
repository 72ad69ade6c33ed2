//! Presence-aware flux routing.
//!
//! When a process's natural destination is toggled off, its flux falls
//! through an ordered chain of substitutes; a flux whose whole chain is
//! absent is dropped, never silently sent to a missing compartment. The
//! chains are fixed tables, one per process family, so the complete
//! rerouting behavior is readable in one place.

use envfate_core::{Medium, Presence, SoilKind};

/// Where a routed flux ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Deliver(Medium),
    /// Every candidate is absent; the flux does not occur.
    Drop,
}

/// An ordered fallback chain: the first present candidate receives the flux.
#[derive(Debug, Clone, Copy)]
pub struct RouteChain {
    pub process: &'static str,
    pub candidates: &'static [Medium],
}

impl RouteChain {
    pub fn resolve(&self, presence: &Presence) -> RouteOutcome {
        self.candidates
            .iter()
            .find(|m| presence.has(**m))
            .map_or(RouteOutcome::Drop, |m| RouteOutcome::Deliver(*m))
    }
}

/// Wind-blown and sea-spray particles join the aerosol phase, or mix into
/// bulk air when no aerosol is modeled.
pub const WIND_EROSION: RouteChain = RouteChain {
    process: "wind erosion",
    candidates: &[Medium::Aerosol, Medium::Air],
};

pub const SEA_SPRAY: RouteChain = RouteChain {
    process: "sea spray aerosolization",
    candidates: &[Medium::Aerosol, Medium::Air],
};

/// Eroded soil solids travel with the river's suspended load; without it
/// they drop straight into the river column, and with the whole river
/// absent the freshwater side takes the full load.
pub const SOIL_EROSION_RIVER: RouteChain = RouteChain {
    process: "soil erosion",
    candidates: &[Medium::RiverSusSed, Medium::RiverWater],
};

pub const SOIL_EROSION_FRESH: RouteChain = RouteChain {
    process: "soil erosion",
    candidates: &[
        Medium::FreshSusSed,
        Medium::FreshWater,
        Medium::SeaSusSed,
        Medium::SeaWater,
    ],
};

/// Soil runoff water: the freshwater share passes downstream to the sea
/// when the lake is absent.
pub const RUNOFF_RIVER: RouteChain = RouteChain {
    process: "soil runoff",
    candidates: &[Medium::RiverWater],
};

pub const RUNOFF_FRESH: RouteChain = RouteChain {
    process: "soil runoff",
    candidates: &[Medium::FreshWater, Medium::SeaWater],
};

/// Resuspended bed solids rejoin the suspended load, or the water column
/// directly when no suspended sediment is modeled.
pub const RESUSPENSION_RIVER: RouteChain = RouteChain {
    process: "resuspension",
    candidates: &[Medium::RiverSusSed, Medium::RiverWater],
};

pub const RESUSPENSION_FRESH: RouteChain = RouteChain {
    process: "resuspension",
    candidates: &[Medium::FreshSusSed, Medium::FreshWater],
};

pub const RESUSPENSION_SEA: RouteChain = RouteChain {
    process: "resuspension",
    candidates: &[Medium::SeaSusSed, Medium::SeaWater],
};

/// Deep-soil leachate exits the domain; runoff from an absent surface soil
/// never reaches it, so the chain is per-soil and empty-capable.
pub fn soil_water_runoff(kind: SoilKind, presence: &Presence) -> RouteOutcome {
    if presence.soil_water[kind.index()] {
        RouteOutcome::Deliver(Medium::SoilWater(kind))
    } else {
        RouteOutcome::Drop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envfate_core::Toggles;

    #[test]
    fn first_present_candidate_wins() {
        let all = Presence::all();
        assert_eq!(
            SOIL_EROSION_FRESH.resolve(&all),
            RouteOutcome::Deliver(Medium::FreshSusSed)
        );
        let no_fresh = Presence::resolve(&Toggles {
            fresh_water: false,
            ..Toggles::default()
        });
        assert_eq!(
            SOIL_EROSION_FRESH.resolve(&no_fresh),
            RouteOutcome::Deliver(Medium::SeaSusSed)
        );
    }

    #[test]
    fn exhausted_chain_drops() {
        let bare = Presence::resolve(&Toggles {
            fresh_water: false,
            sea_water: false,
            ..Toggles::default()
        });
        assert_eq!(RUNOFF_FRESH.resolve(&bare), RouteOutcome::Drop);
    }

    #[test]
    fn aerosol_chains_fall_back_to_air() {
        let no_aer = Presence::resolve(&Toggles {
            aerosol: false,
            ..Toggles::default()
        });
        assert_eq!(WIND_EROSION.resolve(&no_aer), RouteOutcome::Deliver(Medium::Air));
        let no_air = Presence::resolve(&Toggles {
            air: false,
            ..Toggles::default()
        });
        assert_eq!(SEA_SPRAY.resolve(&no_air), RouteOutcome::Drop);
    }
}
