//! Fugacity capacities for neutral organic chemicals.
//!
//! Each phase has a capacity $Z$ in mol/(m³·Pa); the product $V Z$ converts a
//! compartment fugacity into moles. Pure phases:
//!
//! $$ Z_{air} = \frac{1}{R T} \qquad Z_{water} = \frac{Z_{air}}{K_{aw}} \qquad
//!    Z_{solid} = Z_{water} K_d \rho_p $$
//!
//! and the aerosol uses the gas-particle coefficient $K_p$ on top of the air
//! phase. Bulk capacities are volume-fraction weighted sums of their phases,
//! so the weighted sum over a compartment's phases always reproduces the bulk
//! value exactly.

use crate::compartment::{organic_layout as lay, R_GAS, SoilKind};
use crate::params::{Environment, Geometry, OrganicChemical};

/// Pure-phase and bulk Z values for one chemical at one temperature.
#[derive(Debug, Clone)]
pub struct FugacityTable {
    /// Gas phase, mol/(m³·Pa).
    pub air: f64,
    pub aerosol: f64,
    /// Truly dissolved phase, shared by all water columns.
    pub water: f64,
    pub river_sus_sed: f64,
    pub fresh_sus_sed: f64,
    pub sea_sus_sed: f64,
    pub river_sed_solid: f64,
    pub fresh_sed_solid: f64,
    pub sea_sed_solid: f64,
    pub soil_solid: [f64; 4],
    pub deep_soil: [f64; 4],

    pub air_bulk: f64,
    pub river_bulk: f64,
    pub fresh_bulk: f64,
    pub sea_bulk: f64,
    pub river_sed_bulk: f64,
    pub fresh_sed_bulk: f64,
    pub sea_sed_bulk: f64,
    pub soil_bulk: [f64; 4],
}

impl FugacityTable {
    pub fn new(
        chem: &OrganicChemical,
        env: &Environment,
        geom: &Geometry,
        temp_k: f64,
    ) -> Self {
        let air = 1.0 / (R_GAS * temp_k);
        let aerosol = air
            * chem.kp_aerosol(env.air.aerosol.oc_fraction, env.air.aerosol.particle_density);
        let water = air / chem.kaw;

        let solid = |oc: f64, density: f64| water * chem.kd_unitless(oc, density);
        let river_sus_sed = solid(env.river.ss_oc_fraction, env.river.ss_density);
        let fresh_sus_sed = solid(env.fresh.ss_oc_fraction, env.fresh.ss_density);
        let sea_sus_sed = solid(env.sea.ss_oc_fraction, env.sea.ss_density);
        let river_sed_solid = solid(env.river.sediment.oc_fraction, env.river.sediment.solid_density);
        let fresh_sed_solid = solid(env.fresh.sediment.oc_fraction, env.fresh.sediment.solid_density);
        let sea_sed_solid = solid(env.sea.sediment.oc_fraction, env.sea.sediment.solid_density);
        let soil_solid =
            SoilKind::ALL.map(|k| solid(env.soils[k.index()].oc_fraction, env.soils[k.index()].solid_density));
        let deep_soil = SoilKind::ALL
            .map(|k| solid(env.soils[k.index()].deep_oc_fraction, env.soils[k.index()].solid_density));

        let water_bulk = |body: &crate::params::WaterVolumes, ss: f64| {
            (1.0 - body.sus_sed_fraction) * water + body.sus_sed_fraction * ss
        };
        let sed_bulk = |sed: &crate::params::SedimentEnv, solid_z: f64| {
            (1.0 - sed.solid_fraction) * water + sed.solid_fraction * solid_z
        };
        let soil_bulk = SoilKind::ALL.map(|k| {
            let s = &env.soils[k.index()];
            s.air_content * air + s.water_content * water
                + (1.0 - s.air_content - s.water_content) * soil_solid[k.index()]
        });

        Self {
            air,
            aerosol,
            water,
            river_sus_sed,
            fresh_sus_sed,
            sea_sus_sed,
            river_sed_solid,
            fresh_sed_solid,
            sea_sed_solid,
            soil_solid,
            deep_soil,
            air_bulk: (1.0 - geom.aerosol_fraction) * air + geom.aerosol_fraction * aerosol,
            river_bulk: water_bulk(&geom.river, river_sus_sed),
            fresh_bulk: water_bulk(&geom.fresh, fresh_sus_sed),
            sea_bulk: water_bulk(&geom.sea, sea_sus_sed),
            river_sed_bulk: sed_bulk(&env.river.sediment, river_sed_solid),
            fresh_sed_bulk: sed_bulk(&env.fresh.sediment, fresh_sed_solid),
            sea_sed_bulk: sed_bulk(&env.sea.sediment, sea_sed_solid),
            soil_bulk,
        }
    }

    /// Per-state $V Z$ capacities in the 15-state layout, mol/Pa.
    /// Zero for absent or zero-volume compartments.
    pub fn capacities(&self, geom: &Geometry) -> [f64; lay::N] {
        let mut vz = [0.0; lay::N];
        vz[lay::AIR] = geom.air_total * self.air_bulk;
        vz[lay::RIVER_WATER] = (geom.river.water + geom.river.sus_sed) * self.river_bulk;
        vz[lay::RIVER_SEDIMENT] = geom.river.sediment_total * self.river_sed_bulk;
        vz[lay::FRESH_WATER] = (geom.fresh.water + geom.fresh.sus_sed) * self.fresh_bulk;
        vz[lay::FRESH_SEDIMENT] = geom.fresh.sediment_total * self.fresh_sed_bulk;
        vz[lay::SEA_WATER] = (geom.sea.water + geom.sea.sus_sed) * self.sea_bulk;
        vz[lay::SEA_SEDIMENT] = geom.sea.sediment_total * self.sea_sed_bulk;
        for kind in SoilKind::ALL {
            let i = kind.index();
            vz[lay::soil_surface(kind)] = geom.soils[i].total * self.soil_bulk[i];
            vz[lay::soil_deep(kind)] = geom.soils[i].deep * self.deep_soil[i];
        }
        vz
    }
}
