//! Environment geometry and physical properties.
//!
//! The raw record carries primary fields (areas, depths, densities,
//! composition fractions); [`Environment::geometry`] computes the derived
//! quantities the assemblers consume: compartment volumes from area × depth,
//! suspended-sediment volumes from concentration over particle density, bulk
//! soil densities from composition-weighted component densities, and the
//! curve-number retention transform $S = 1000/CN - 10$.
//!
//! River water volume is the one time-varying geometry: cross-section times
//! reach length tracks the daily flow, so it is exposed as a method of the
//! derived geometry rather than a precomputed field.

use crate::compartment::SoilKind;
use crate::errors::{FateError, FateResult};
use crate::numeric::safe_div;
use crate::presence::Presence;
use serde::{Deserialize, Serialize};

/// Aerosol phase suspended in the air column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AerosolEnv {
    /// Aerosol mass concentration in air
    /// unit: kg/m³
    pub concentration: f64,
    /// Aerosol particle density
    /// unit: kg/m³
    pub particle_density: f64,
    /// Aerosol particle radius
    /// unit: m
    pub particle_radius: f64,
    /// Organic carbon mass fraction of the aerosol
    pub oc_fraction: f64,
    /// Precipitation scavenging ratio, dimensionless
    pub scavenging_ratio: f64,
}

/// The air column over the whole modeled area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AirEnv {
    /// Mixing height
    /// unit: m
    pub height: f64,
    /// Air density
    /// unit: kg/m³
    pub density: f64,
    /// Dynamic viscosity of air
    /// unit: kg/(m·s)
    pub dyn_viscosity: f64,
    pub aerosol: AerosolEnv,
}

/// Bed sediment under a water body. Area equals the water body's area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SedimentEnv {
    /// Active sediment depth
    /// unit: m
    pub depth: f64,
    /// Solid volume fraction of the bed; the rest is pore water.
    pub solid_fraction: f64,
    /// Sediment solid particle density
    /// unit: kg/m³
    pub solid_density: f64,
    /// Organic carbon fraction of the sediment solid
    pub oc_fraction: f64,
    /// Burial rate
    /// unit: m/day
    pub burial_rate: f64,
    /// Resuspension rate
    /// unit: m/day
    pub resuspension_rate: f64,
    /// Fraction of the water body's flow that advects through the bed.
    pub advective_fraction: f64,
}

/// One water body (river, freshwater, or coastal sea).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaterBodyEnv {
    /// Surface area
    /// unit: m²
    pub area: f64,
    /// Water depth (maximum for the river)
    /// unit: m
    pub depth: f64,
    /// Water density
    /// unit: kg/m³
    pub density: f64,
    /// Dynamic viscosity
    /// unit: kg/(m·s)
    pub dyn_viscosity: f64,
    /// pH of the water column.
    pub ph: f64,
    /// Suspended sediment mass concentration
    /// unit: kg/m³
    pub ss_concentration: f64,
    /// Colloid mass concentration, carrier of the colloidal metal species
    /// unit: kg/m³
    pub colloid_concentration: f64,
    /// Suspended sediment particle density
    /// unit: kg/m³
    pub ss_density: f64,
    /// Suspended sediment particle radius
    /// unit: m
    pub ss_radius: f64,
    /// Organic carbon fraction of the suspended sediment
    pub ss_oc_fraction: f64,
    pub sediment: SedimentEnv,
}

/// Empirical wind-erosion fitting constants for one soil type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindErosionEnv {
    /// Surface roughness height, m.
    pub roughness: f64,
    /// Empirical proportionality constant of the flux law.
    pub k_constant: f64,
    /// Empirical area constant.
    pub a_constant: f64,
    /// Threshold shear velocity, m/s.
    pub tsv: f64,
    /// Minimum threshold shear velocity, m/s.
    pub tsv_min: f64,
    /// Anemometer reference height, m.
    pub z_wind: f64,
    /// Fraction of time the wind blows over this soil.
    pub perc_wind: f64,
    /// Empirical wind constant of the log profile.
    pub wind_constant: f64,
    /// Fraction of the surface bare to the wind.
    pub perc_uncovered: f64,
    /// Fraction of mobilized grains that stay suspended.
    pub perc_suspended: f64,
}

/// One of the four land-use soils, surface layer plus a deep layer below.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SoilEnv {
    /// Surface area
    /// unit: m²
    pub area: f64,
    /// Surface layer depth
    /// unit: m
    pub depth: f64,
    /// Deep layer depth
    /// unit: m
    pub deep_depth: f64,
    /// Volumetric air content of the surface layer
    pub air_content: f64,
    /// Volumetric water content of the surface layer
    pub water_content: f64,
    /// Organic carbon fraction of the soil solid
    pub oc_fraction: f64,
    /// Organic carbon fraction of the deep soil solid
    pub deep_oc_fraction: f64,
    /// Dry solid particle density
    /// unit: kg/m³
    pub solid_density: f64,
    /// SCS runoff curve number, 30..=100
    pub curve_number: f64,
    /// Field capacity, volumetric fraction
    pub field_capacity: f64,
    /// USLE soil erodibility factor K
    pub erodibility: f64,
    /// USLE slope length-gradient factor LS
    pub slope_factor: f64,
    /// USLE crop management factor C
    pub cover_factor: f64,
    /// USLE support practice factor P
    pub practice_factor: f64,
    pub wind: WindErosionEnv,
}

/// Full raw environment record for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub air: AirEnv,
    /// River reach length
    /// unit: m
    pub river_length: f64,
    /// Mean river width
    /// unit: m
    pub river_width: f64,
    pub river: WaterBodyEnv,
    pub fresh: WaterBodyEnv,
    pub sea: WaterBodyEnv,
    /// Coastal strip area generating sea spray
    /// unit: m²
    pub coastal_area: f64,
    pub soils: [SoilEnv; 4],
}

/// Per-water-body derived volumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterVolumes {
    pub area: f64,
    pub water: f64,
    pub sus_sed: f64,
    pub sus_sed_fraction: f64,
    pub sediment_total: f64,
    pub sediment_solid: f64,
    pub sediment_water: f64,
}

/// Per-soil derived volumes and bulk density.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoilVolumes {
    pub area: f64,
    pub total: f64,
    pub air: f64,
    pub water: f64,
    pub solid: f64,
    pub solid_fraction: f64,
    pub deep: f64,
    /// Composition-weighted bulk density, kg/m³.
    pub bulk_density: f64,
    /// Curve-number retention S = 1000/CN - 10, inches.
    pub retention: f64,
}

/// Derived geometry, presence-masked: absent compartments have zero area and
/// volume and therefore contribute no flux anywhere downstream.
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Total modeled surface area (water plus soil), also the air area.
    pub total_area: f64,
    pub air_total: f64,
    pub air: f64,
    pub aerosol: f64,
    pub aerosol_fraction: f64,
    pub river: WaterVolumes,
    pub fresh: WaterVolumes,
    pub sea: WaterVolumes,
    pub coastal_area: f64,
    pub soils: [SoilVolumes; 4],
}

impl Environment {
    fn validate(&self) -> FateResult<()> {
        for (label, soil) in ["undeveloped", "urban", "agricultural", "agricultural-biosolid"]
            .iter()
            .zip(self.soils.iter())
        {
            if soil.area > 0.0 && !(30.0..=100.0).contains(&soil.curve_number) {
                return Err(FateError::Config(format!(
                    "curve number {} for {label} soil outside 30..=100",
                    soil.curve_number
                )));
            }
            if soil.air_content + soil.water_content > 1.0 {
                return Err(FateError::Config(format!(
                    "{label} soil air+water content exceeds 1"
                )));
            }
        }
        Ok(())
    }

    fn water_volumes(body: &WaterBodyEnv, volume: f64, present: bool) -> WaterVolumes {
        if !present {
            return WaterVolumes::default();
        }
        let sus_sed = safe_div(body.ss_concentration * volume, body.ss_density);
        let sediment_total = body.area * body.sediment.depth;
        WaterVolumes {
            area: body.area,
            water: volume - sus_sed,
            sus_sed,
            sus_sed_fraction: safe_div(sus_sed, volume),
            sediment_total,
            sediment_solid: sediment_total * body.sediment.solid_fraction,
            sediment_water: sediment_total * (1.0 - body.sediment.solid_fraction),
        }
    }

    /// Resolve the derived geometry for a scenario.
    ///
    /// `river_flow_m3_s` fixes the river volume for the day (cross-section
    /// area × reach length tracks flow); callers re-derive the river block
    /// daily via [`Geometry::with_river_flow`].
    pub fn geometry(&self, presence: &Presence, river_flow_m3_s: f64) -> FateResult<Geometry> {
        self.validate()?;

        let soil_area: f64 = SoilKind::ALL
            .iter()
            .filter(|k| presence.has_soil(**k))
            .map(|k| self.soils[k.index()].area)
            .sum();
        let water_area = [
            (presence.river_water, self.river.area),
            (presence.fresh_water, self.fresh.area),
            (presence.sea_water, self.sea.area),
        ]
        .iter()
        .filter(|(p, _)| *p)
        .map(|(_, a)| a)
        .sum::<f64>();
        let total_area = soil_area + water_area;

        let air_total = if presence.air {
            total_area * self.air.height
        } else {
            0.0
        };
        let aerosol = if presence.aerosol {
            safe_div(self.air.aerosol.concentration * air_total, self.air.aerosol.particle_density)
        } else {
            0.0
        };

        let river_volume = river_flow_m3_s * self.river_length;
        let soils = SoilKind::ALL.map(|kind| {
            let soil = &self.soils[kind.index()];
            if !presence.has_soil(kind) {
                return SoilVolumes::default();
            }
            let total = soil.area * soil.depth;
            let solid_fraction = 1.0 - soil.air_content - soil.water_content;
            SoilVolumes {
                area: soil.area,
                total,
                air: total * soil.air_content,
                water: total * soil.water_content,
                solid: total * solid_fraction,
                solid_fraction,
                deep: soil.area * soil.deep_depth,
                bulk_density: soil.solid_density * solid_fraction
                    + self.fresh.density * soil.water_content
                    + self.air.density * soil.air_content,
                retention: 1000.0 / soil.curve_number - 10.0,
            }
        });

        Ok(Geometry {
            total_area,
            air_total,
            air: air_total - aerosol,
            aerosol,
            aerosol_fraction: safe_div(aerosol, air_total),
            river: Self::water_volumes(&self.river, river_volume, presence.river_water),
            fresh: Self::water_volumes(
                &self.fresh,
                self.fresh.area * self.fresh.depth,
                presence.fresh_water,
            ),
            sea: Self::water_volumes(&self.sea, self.sea.area * self.sea.depth, presence.sea_water),
            coastal_area: if presence.sea_water { self.coastal_area } else { 0.0 },
            soils,
        })
    }
}

impl Geometry {
    /// Re-derive the river block for a new day's flow. The other volumes are
    /// flow-independent.
    pub fn with_river_flow(&self, env: &Environment, presence: &Presence, flow_m3_s: f64) -> Self {
        let mut out = self.clone();
        out.river = Environment::water_volumes(
            &env.river,
            flow_m3_s * env.river_length,
            presence.river_water,
        );
        out
    }

    pub fn soil(&self, kind: SoilKind) -> &SoilVolumes {
        &self.soils[kind.index()]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::presence::{Presence, Toggles};
    use approx::assert_relative_eq;

    pub(crate) fn test_environment() -> Environment {
        let sediment = SedimentEnv {
            depth: 0.05,
            solid_fraction: 0.8,
            solid_density: 2400.0,
            oc_fraction: 0.04,
            burial_rate: 1.1e-6,
            resuspension_rate: 6.0e-7,
            advective_fraction: 0.01,
        };
        let water = |area: f64, depth: f64| WaterBodyEnv {
            area,
            depth,
            density: 998.0,
            dyn_viscosity: 1.0e-3,
            ph: 7.0,
            ss_concentration: 0.05,
            colloid_concentration: 2.0e-3,
            ss_density: 2400.0,
            ss_radius: 2.5e-6,
            ss_oc_fraction: 0.05,
            sediment,
        };
        let wind = WindErosionEnv {
            roughness: 0.005,
            k_constant: 0.0015,
            a_constant: 1.0,
            tsv: 7.0,
            tsv_min: 5.0,
            z_wind: 10.0,
            perc_wind: 0.4,
            wind_constant: 5.4,
            perc_uncovered: 0.2,
            perc_suspended: 0.1,
        };
        let soil = |area: f64| SoilEnv {
            area,
            depth: 0.1,
            deep_depth: 1.0,
            air_content: 0.25,
            water_content: 0.25,
            oc_fraction: 0.02,
            deep_oc_fraction: 0.01,
            solid_density: 2600.0,
            curve_number: 74.0,
            field_capacity: 0.3,
            erodibility: 0.28,
            slope_factor: 1.3,
            cover_factor: 0.2,
            practice_factor: 0.7,
            wind,
        };
        Environment {
            air: AirEnv {
                height: 800.0,
                density: 1.2,
                dyn_viscosity: 1.8e-5,
                aerosol: AerosolEnv {
                    concentration: 4.0e-8,
                    particle_density: 1500.0,
                    particle_radius: 5.0e-7,
                    oc_fraction: 0.2,
                    scavenging_ratio: 2.0e5,
                },
            },
            river_length: 60_000.0,
            river_width: 50.0,
            river: water(3.0e6, 4.0),
            fresh: water(2.0e7, 10.0),
            sea: water(8.0e7, 20.0),
            coastal_area: 1.0e6,
            soils: [soil(4.0e8), soil(1.0e8), soil(2.0e8), soil(5.0e7)],
        }
    }

    #[test]
    fn total_area_sums_water_and_soil() {
        let env = test_environment();
        let geom = env.geometry(&Presence::all(), 50.0).unwrap();
        let expected = 3.0e6 + 2.0e7 + 8.0e7 + 4.0e8 + 1.0e8 + 2.0e8 + 5.0e7;
        assert_relative_eq!(geom.total_area, expected);
        assert_relative_eq!(geom.air_total, expected * 800.0);
    }

    #[test]
    fn river_volume_tracks_flow() {
        let env = test_environment();
        let geom = env.geometry(&Presence::all(), 50.0).unwrap();
        let total = 50.0 * 60_000.0;
        assert_relative_eq!(geom.river.water + geom.river.sus_sed, total);
        let doubled = geom.with_river_flow(&env, &Presence::all(), 100.0);
        assert_relative_eq!(doubled.river.water + doubled.river.sus_sed, 2.0 * total);
    }

    #[test]
    fn absent_compartment_has_zero_volume() {
        let env = test_environment();
        let presence = Presence::resolve(&Toggles {
            fresh_water: false,
            soil: [true, true, false, true],
            ..Toggles::default()
        });
        let geom = env.geometry(&presence, 50.0).unwrap();
        assert_eq!(geom.fresh.water, 0.0);
        assert_eq!(geom.fresh.sediment_solid, 0.0);
        assert_eq!(geom.soil(SoilKind::Agricultural).total, 0.0);
        // removed compartments also leave the total area
        assert_relative_eq!(
            geom.total_area,
            3.0e6 + 8.0e7 + 4.0e8 + 1.0e8 + 5.0e7
        );
    }

    #[test]
    fn soil_bulk_density_is_composition_weighted() {
        let env = test_environment();
        let geom = env.geometry(&Presence::all(), 50.0).unwrap();
        let s = geom.soil(SoilKind::Undeveloped);
        let expected = 2600.0 * 0.5 + 998.0 * 0.25 + 1.2 * 0.25;
        assert_relative_eq!(s.bulk_density, expected);
        assert_relative_eq!(s.retention, 1000.0 / 74.0 - 10.0);
    }

    #[test]
    fn invalid_curve_number_is_a_setup_error() {
        let mut env = test_environment();
        env.soils[1].curve_number = 400.0;
        assert!(env.geometry(&Presence::all(), 50.0).is_err());
    }
}
