//! Chemical property records.
//!
//! Half-lives arrive in hours per compartment; the engine works with
//! first-order rate constants per day, $k = 24 \ln 2 / t_{1/2}$. Partition
//! coefficients arrive as the laboratory quantities (Kow, Kaw, Koc) and are
//! turned into per-compartment solid/water distribution coefficients using
//! each compartment's organic-carbon content and particle density.

use serde::{Deserialize, Serialize};

/// Which formalism a scenario runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChemicalClass {
    #[serde(alias = "organic")]
    NonionizableOrganic,
    #[serde(alias = "ionizable")]
    IonizableOrganic,
    Metal,
    #[serde(alias = "nano")]
    Nanomaterial,
}

/// Degradation half-lives per compartment, hours.
///
/// Soil entries are shared across the four soil types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DegradationHalfLives {
    pub air: f64,
    pub aerosol: f64,
    pub river_water: f64,
    pub river_sus_sed: f64,
    pub river_sed_water: f64,
    pub river_sed_solid: f64,
    pub fresh_water: f64,
    pub fresh_sus_sed: f64,
    pub fresh_sed_water: f64,
    pub fresh_sed_solid: f64,
    pub sea_water: f64,
    pub sea_sus_sed: f64,
    pub sea_sed_water: f64,
    pub sea_sed_solid: f64,
    pub soil_air: f64,
    pub soil_water: f64,
    pub soil_solid: f64,
    pub deep_soil: f64,
}

/// First-order degradation rate constants, per day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DegradationRates {
    pub air: f64,
    pub aerosol: f64,
    pub river_water: f64,
    pub river_sus_sed: f64,
    pub river_sed_water: f64,
    pub river_sed_solid: f64,
    pub fresh_water: f64,
    pub fresh_sus_sed: f64,
    pub fresh_sed_water: f64,
    pub fresh_sed_solid: f64,
    pub sea_water: f64,
    pub sea_sus_sed: f64,
    pub sea_sed_water: f64,
    pub sea_sed_solid: f64,
    pub soil_air: f64,
    pub soil_water: f64,
    pub soil_solid: f64,
    pub deep_soil: f64,
}

/// Rate constant (per day) from a half-life in hours. A non-positive
/// half-life means "does not degrade" and maps to a zero rate.
pub fn rate_from_half_life_hours(half_life_hours: f64) -> f64 {
    if half_life_hours <= 0.0 {
        0.0
    } else {
        24.0 * std::f64::consts::LN_2 / half_life_hours
    }
}

impl DegradationHalfLives {
    /// No degradation anywhere; the metal formalism uses this.
    pub fn none() -> Self {
        Self {
            air: 0.0,
            aerosol: 0.0,
            river_water: 0.0,
            river_sus_sed: 0.0,
            river_sed_water: 0.0,
            river_sed_solid: 0.0,
            fresh_water: 0.0,
            fresh_sus_sed: 0.0,
            fresh_sed_water: 0.0,
            fresh_sed_solid: 0.0,
            sea_water: 0.0,
            sea_sus_sed: 0.0,
            sea_sed_water: 0.0,
            sea_sed_solid: 0.0,
            soil_air: 0.0,
            soil_water: 0.0,
            soil_solid: 0.0,
            deep_soil: 0.0,
        }
    }

    /// Convert every half-life to a per-day rate constant.
    pub fn rates(&self) -> DegradationRates {
        DegradationRates {
            air: rate_from_half_life_hours(self.air),
            aerosol: rate_from_half_life_hours(self.aerosol),
            river_water: rate_from_half_life_hours(self.river_water),
            river_sus_sed: rate_from_half_life_hours(self.river_sus_sed),
            river_sed_water: rate_from_half_life_hours(self.river_sed_water),
            river_sed_solid: rate_from_half_life_hours(self.river_sed_solid),
            fresh_water: rate_from_half_life_hours(self.fresh_water),
            fresh_sus_sed: rate_from_half_life_hours(self.fresh_sus_sed),
            fresh_sed_water: rate_from_half_life_hours(self.fresh_sed_water),
            fresh_sed_solid: rate_from_half_life_hours(self.fresh_sed_solid),
            sea_water: rate_from_half_life_hours(self.sea_water),
            sea_sus_sed: rate_from_half_life_hours(self.sea_sus_sed),
            sea_sed_water: rate_from_half_life_hours(self.sea_sed_water),
            sea_sed_solid: rate_from_half_life_hours(self.sea_sed_solid),
            soil_air: rate_from_half_life_hours(self.soil_air),
            soil_water: rate_from_half_life_hours(self.soil_water),
            soil_solid: rate_from_half_life_hours(self.soil_solid),
            deep_soil: rate_from_half_life_hours(self.deep_soil),
        }
    }
}

/// Properties of a (non-)ionizable organic chemical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganicChemical {
    pub name: String,
    /// Molar mass
    /// unit: kg/mol
    pub molar_mass: f64,
    /// Le Bas molar volume, used for molecular diffusivity estimates
    /// unit: cm³/mol
    pub molar_volume: f64,
    /// Octanol-water partition coefficient, dimensionless
    pub kow: f64,
    /// Air-water partition coefficient (dimensionless Henry constant)
    pub kaw: f64,
    /// Organic carbon-water partition coefficient
    /// unit: L/kg
    pub koc: f64,
    pub half_lives: DegradationHalfLives,
}

impl OrganicChemical {
    /// Solid-water distribution coefficient from the compartment's organic
    /// carbon fraction, m³/kg: $K_d = K_{oc} f_{oc} / 1000$.
    pub fn kd(&self, oc_fraction: f64) -> f64 {
        self.koc * oc_fraction / 1000.0
    }

    /// Dimensionless solid-water distribution coefficient, `kd` (m³/kg)
    /// scaled by the solid's particle density in kg/m³.
    pub fn kd_unitless(&self, oc_fraction: f64, particle_density: f64) -> f64 {
        self.kd(oc_fraction) * particle_density
    }

    /// Aerosol-air partition coefficient, dimensionless, from the aerosol
    /// organic-carbon fraction and particle density (kg/m³):
    /// $K_p = 0.54 (K_{ow}/K_{aw}) f_{oc} \rho_{aer} / 1000$.
    pub fn kp_aerosol(&self, aerosol_oc_fraction: f64, aerosol_density: f64) -> f64 {
        0.54 * (self.kow / self.kaw) * aerosol_oc_fraction * aerosol_density / 1000.0
    }

    pub fn rates(&self) -> DegradationRates {
        self.half_lives.rates()
    }
}

/// Ionizable organic: the neutral species plus an acid dissociation constant
/// and an ion-specific organic-carbon coefficient looked up by structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IonizableChemical {
    pub neutral: OrganicChemical,
    pub pka: f64,
    /// True for acids (neutral below pKa), false for bases.
    pub is_acid: bool,
    /// Organic carbon-water partition coefficient of the ionic species
    /// unit: L/kg
    pub koc_ion: f64,
}

impl IonizableChemical {
    /// Fraction of the chemical in the neutral species at the given pH
    /// (Henderson-Hasselbalch).
    pub fn neutral_fraction(&self, ph: f64) -> f64 {
        let exponent = if self.is_acid {
            ph - self.pka
        } else {
            self.pka - ph
        };
        1.0 / (1.0 + 10f64.powf(exponent))
    }
}

/// Metal species distribution coefficients per sorbent, m³/kg.
/// Metals do not degrade; they move between particulate, colloidal, and
/// truly dissolved (ionic) species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetalChemical {
    pub name: String,
    /// unit: kg/mol
    pub molar_mass: f64,
    /// Solid-water distribution coefficient of the suspended sediment,
    /// shared by the aerosol
    /// unit: m³/kg
    pub kd_sus_sed: f64,
    pub kd_sediment: f64,
    pub kd_soil: f64,
    /// Colloid-water distribution coefficient
    /// unit: m³/kg
    pub kd_colloid: f64,
}

/// Two-parameter empirical dissolution fit for one receiving medium:
/// the dissolvable fraction saturates at `max_fraction` with first-order
/// approach governed by the medium's dissolution rate constant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DissolutionFit {
    /// Saturating dissolvable fraction, 0..=1.
    pub max_fraction: f64,
    /// Shape parameter of the empirical fit, dimensionless.
    pub shape: f64,
}

/// Nanomaterial-only dissolution fits, one per water body and soil.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DissolutionParams {
    pub river: DissolutionFit,
    pub river_sediment: DissolutionFit,
    pub fresh: DissolutionFit,
    pub fresh_sediment: DissolutionFit,
    pub sea: DissolutionFit,
    pub sea_sediment: DissolutionFit,
    pub soil: [DissolutionFit; 4],
}

/// Engineered nanomaterial properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NanoChemical {
    pub name: String,
    /// Particle density
    /// unit: kg/m³
    pub density: f64,
    /// Radius of the environmental agglomerate
    /// unit: m
    pub radius_agg: f64,
    /// Heteroaggregation rate constants per medium
    /// unit: m³/(kg·day)
    pub khet_air: f64,
    pub khet_river: f64,
    pub khet_fresh: f64,
    pub khet_sea: f64,
    /// Free-particle sedimentation velocities per water body
    /// unit: m/day
    pub ksed_river: f64,
    pub ksed_fresh: f64,
    pub ksed_sea: f64,
    /// Dissolution rate constants per medium
    /// unit: 1/day
    pub kdis_river: f64,
    pub kdis_river_sed: f64,
    pub kdis_fresh: f64,
    pub kdis_fresh_sed: f64,
    pub kdis_sea: f64,
    pub kdis_sea_sed: f64,
    pub kdis_soil: [f64; 4],
    /// Soil solid to soil water elution coefficient per soil, 0..=1 fraction
    /// exchanged per day.
    pub elution: [f64; 4],
    /// Sea-spray enrichment factor for aerosolization.
    pub enrichment_factor: f64,
    pub dissolution: DissolutionParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rate_from_half_life_matches_ln2() {
        // 24-hour half-life decays at ln 2 per day.
        assert_relative_eq!(rate_from_half_life_hours(24.0), std::f64::consts::LN_2);
        assert_eq!(rate_from_half_life_hours(0.0), 0.0);
        assert_eq!(rate_from_half_life_hours(-5.0), 0.0);
    }

    #[test]
    fn neutral_fraction_at_pka_is_half() {
        let chem = IonizableChemical {
            neutral: OrganicChemical {
                name: "test-acid".into(),
                molar_mass: 0.2,
                molar_volume: 150.0,
                kow: 1e3,
                kaw: 1e-4,
                koc: 500.0,
                half_lives: DegradationHalfLives::none(),
            },
            pka: 4.5,
            is_acid: true,
            koc_ion: 30.0,
        };
        assert_relative_eq!(chem.neutral_fraction(4.5), 0.5);
        assert!(chem.neutral_fraction(2.0) > 0.99, "mostly neutral well below pKa");
        assert!(chem.neutral_fraction(7.0) < 0.01, "mostly ionized well above pKa");
    }

    #[test]
    fn base_ionization_mirrors_acid() {
        let base = IonizableChemical {
            neutral: OrganicChemical {
                name: "test-base".into(),
                molar_mass: 0.2,
                molar_volume: 150.0,
                kow: 1e3,
                kaw: 1e-4,
                koc: 500.0,
                half_lives: DegradationHalfLives::none(),
            },
            pka: 9.0,
            is_acid: false,
            koc_ion: 30.0,
        };
        assert!(base.neutral_fraction(11.0) > 0.99);
        assert!(base.neutral_fraction(7.0) < 0.01);
    }

    #[test]
    fn kd_scales_with_organic_carbon() {
        let chem = OrganicChemical {
            name: "pcb".into(),
            molar_mass: 0.3266,
            molar_volume: 289.0,
            kow: 10f64.powf(6.8),
            kaw: 0.011,
            koc: 10f64.powf(5.9),
            half_lives: DegradationHalfLives::none(),
        };
        assert_relative_eq!(chem.kd(0.04), chem.koc * 0.04 / 1000.0);
        assert_relative_eq!(chem.kd(0.0), 0.0);
    }
}
