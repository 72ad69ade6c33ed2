//! Presence resolver.
//!
//! A scenario declares which compartments exist through a small set of coarse
//! toggles. The resolver expands them into one flag per sub-compartment with
//! a single one-directional rule: an absent parent forces all of its children
//! absent. A child switched off on its own (say, suspended sediment in an
//! otherwise present river) leaves the parent untouched; the assemblers
//! reroute or drop the affected edges.
//!
//! Resolution happens once at scenario setup. Resolving a resolved flag set
//! again is a no-op.

use crate::compartment::{Medium, SoilKind};
use serde::{Deserialize, Serialize};

/// Coarse per-compartment switches as a scenario states them.
///
/// Sub-compartment toggles default to present; they only matter when their
/// parent is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggles {
    pub air: bool,
    pub aerosol: bool,
    pub river_water: bool,
    pub river_sus_sed: bool,
    pub river_sediment: bool,
    pub fresh_water: bool,
    pub fresh_sus_sed: bool,
    pub fresh_sediment: bool,
    pub sea_water: bool,
    pub sea_sus_sed: bool,
    pub sea_sediment: bool,
    pub soil: [bool; 4],
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            air: true,
            aerosol: true,
            river_water: true,
            river_sus_sed: true,
            river_sediment: true,
            fresh_water: true,
            fresh_sus_sed: true,
            fresh_sediment: true,
            sea_water: true,
            sea_sus_sed: true,
            sea_sediment: true,
            soil: [true; 4],
        }
    }
}

/// Fully resolved presence flags, one per sub-compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub air: bool,
    pub aerosol: bool,
    pub river_water: bool,
    pub river_sus_sed: bool,
    pub river_sediment: bool,
    pub fresh_water: bool,
    pub fresh_sus_sed: bool,
    pub fresh_sediment: bool,
    pub sea_water: bool,
    pub sea_sus_sed: bool,
    pub sea_sediment: bool,
    pub soil_solid: [bool; 4],
    pub soil_water: [bool; 4],
    pub deep_soil: [bool; 4],
}

impl Presence {
    /// Expand coarse toggles into the full flag set.
    pub fn resolve(toggles: &Toggles) -> Self {
        Self {
            air: toggles.air,
            aerosol: toggles.air && toggles.aerosol,
            river_water: toggles.river_water,
            river_sus_sed: toggles.river_water && toggles.river_sus_sed,
            river_sediment: toggles.river_water && toggles.river_sediment,
            fresh_water: toggles.fresh_water,
            fresh_sus_sed: toggles.fresh_water && toggles.fresh_sus_sed,
            fresh_sediment: toggles.fresh_water && toggles.fresh_sediment,
            sea_water: toggles.sea_water,
            sea_sus_sed: toggles.sea_water && toggles.sea_sus_sed,
            sea_sediment: toggles.sea_water && toggles.sea_sediment,
            soil_solid: toggles.soil,
            soil_water: toggles.soil,
            deep_soil: toggles.soil,
        }
    }

    /// Everything present; the common fully-populated scenario.
    pub fn all() -> Self {
        Self::resolve(&Toggles::default())
    }

    /// Re-apply the parent propagation rules to an already-resolved set.
    /// Resolution is idempotent, so this returns `self` unchanged for any
    /// output of [`Presence::resolve`].
    pub fn normalized(&self) -> Self {
        Self {
            air: self.air,
            aerosol: self.air && self.aerosol,
            river_water: self.river_water,
            river_sus_sed: self.river_water && self.river_sus_sed,
            river_sediment: self.river_water && self.river_sediment,
            fresh_water: self.fresh_water,
            fresh_sus_sed: self.fresh_water && self.fresh_sus_sed,
            fresh_sediment: self.fresh_water && self.fresh_sediment,
            sea_water: self.sea_water,
            sea_sus_sed: self.sea_water && self.sea_sus_sed,
            sea_sediment: self.sea_water && self.sea_sediment,
            soil_solid: self.soil_solid,
            soil_water: [
                self.soil_solid[0] && self.soil_water[0],
                self.soil_solid[1] && self.soil_water[1],
                self.soil_solid[2] && self.soil_water[2],
                self.soil_solid[3] && self.soil_water[3],
            ],
            deep_soil: [
                self.soil_solid[0] && self.deep_soil[0],
                self.soil_solid[1] && self.deep_soil[1],
                self.soil_solid[2] && self.deep_soil[2],
                self.soil_solid[3] && self.deep_soil[3],
            ],
        }
    }

    /// Is the given medium present in this scenario?
    pub fn has(&self, medium: Medium) -> bool {
        match medium {
            Medium::Air => self.air,
            Medium::Aerosol => self.aerosol,
            Medium::RiverWater => self.river_water,
            Medium::RiverSusSed => self.river_sus_sed,
            Medium::RiverSediment => self.river_sediment,
            Medium::FreshWater => self.fresh_water,
            Medium::FreshSusSed => self.fresh_sus_sed,
            Medium::FreshSediment => self.fresh_sediment,
            Medium::SeaWater => self.sea_water,
            Medium::SeaSusSed => self.sea_sus_sed,
            Medium::SeaSediment => self.sea_sediment,
            Medium::SoilSolid(k) => self.soil_solid[k.index()],
            Medium::SoilWater(k) => self.soil_water[k.index()],
            Medium::DeepSoil(k) => self.deep_soil[k.index()],
        }
    }

    /// Is the given soil type present?
    pub fn has_soil(&self, kind: SoilKind) -> bool {
        self.soil_solid[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_parent_forces_children_absent() {
        let toggles = Toggles {
            river_water: false,
            ..Toggles::default()
        };
        let p = Presence::resolve(&toggles);
        assert!(!p.river_water);
        assert!(!p.river_sus_sed, "no river water means no suspended sediment");
        assert!(!p.river_sediment, "no river water means no bed sediment");
        assert!(p.fresh_water, "other compartments untouched");
    }

    #[test]
    fn absent_child_leaves_parent_present() {
        let toggles = Toggles {
            fresh_sus_sed: false,
            ..Toggles::default()
        };
        let p = Presence::resolve(&toggles);
        assert!(p.fresh_water);
        assert!(!p.fresh_sus_sed);
        assert!(p.fresh_sediment);
    }

    #[test]
    fn absent_air_removes_aerosol() {
        let toggles = Toggles {
            air: false,
            ..Toggles::default()
        };
        let p = Presence::resolve(&toggles);
        assert!(!p.aerosol);
    }

    #[test]
    fn soil_toggle_covers_solid_water_and_deep_layers() {
        let toggles = Toggles {
            soil: [true, true, false, true],
            ..Toggles::default()
        };
        let p = Presence::resolve(&toggles);
        assert!(!p.has(Medium::SoilSolid(SoilKind::Agricultural)));
        assert!(!p.has(Medium::SoilWater(SoilKind::Agricultural)));
        assert!(!p.has(Medium::DeepSoil(SoilKind::Agricultural)));
        assert!(p.has(Medium::SoilSolid(SoilKind::Biosolid)));
    }

    #[test]
    fn resolution_is_idempotent() {
        let configs = [
            Toggles::default(),
            Toggles {
                air: false,
                river_water: false,
                ..Toggles::default()
            },
            Toggles {
                aerosol: false,
                fresh_sus_sed: false,
                sea_water: false,
                soil: [false, true, false, true],
                ..Toggles::default()
            },
        ];
        for toggles in configs {
            let once = Presence::resolve(&toggles);
            assert_eq!(once.normalized(), once);
        }
    }
}
