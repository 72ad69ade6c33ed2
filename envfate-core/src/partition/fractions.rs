//! Species fractions for speciating chemistries.
//!
//! Metals distribute over particulate, colloidal, and truly dissolved
//! species; at equilibrium the fractions follow from the distribution
//! coefficients and the sorbent concentrations,
//!
//! $$ Y_d = \frac{1}{1 + K_p C_p + K_c C_c} $$
//!
//! with the sorbed fractions proportional to their $K C$ terms. Ionizable
//! organics split into neutral and ionic species from pH and pKa. Every
//! fraction set sums to one by construction.

use crate::numeric::safe_div;
use crate::params::{IonizableChemical, MetalChemical};
use serde::{Deserialize, Serialize};

/// Equilibrium species split of a metal in one compartment. Sums to 1.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpeciesFractions {
    pub particulate: f64,
    pub colloidal: f64,
    pub dissolved: f64,
}

impl SpeciesFractions {
    pub fn sum(&self) -> f64 {
        self.particulate + self.colloidal + self.dissolved
    }

    /// The split accounts for the whole burden.
    pub fn is_closed(&self) -> bool {
        is_close::is_close!(self.sum(), 1.0)
    }
}

/// Neutral/ionic split of an ionizable organic. Sums to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IonFractions {
    pub neutral: f64,
    pub ionic: f64,
}

/// Metal species fractions in a water column.
///
/// `ss_conc` and `colloid_conc` are sorbent concentrations in kg/m³; the
/// distribution coefficients on the chemical are in m³/kg. With no sorbent
/// everything is dissolved.
pub fn metal_water_fractions(
    chem: &MetalChemical,
    ss_conc: f64,
    colloid_conc: f64,
) -> SpeciesFractions {
    let particulate_term = chem.kd_sus_sed * ss_conc;
    let colloidal_term = chem.kd_colloid * colloid_conc;
    let denom = 1.0 + particulate_term + colloidal_term;
    SpeciesFractions {
        particulate: particulate_term / denom,
        colloidal: colloidal_term / denom,
        dissolved: 1.0 / denom,
    }
}

/// Metal species fractions in a sediment bed or soil.
///
/// The solid concentration seen by the pore water is
/// $\phi_s \rho_s / \phi_w$ for solid fraction $\phi_s$ and pore-water
/// fraction $\phi_w$. A fully solid bed sorbs everything.
pub fn metal_solid_fractions(
    kd: f64,
    solid_fraction: f64,
    solid_density: f64,
) -> SpeciesFractions {
    let pore = 1.0 - solid_fraction;
    if pore <= 0.0 {
        return SpeciesFractions {
            particulate: 1.0,
            colloidal: 0.0,
            dissolved: 0.0,
        };
    }
    let solid_conc = safe_div(solid_fraction * solid_density, pore);
    let term = kd * solid_conc;
    SpeciesFractions {
        particulate: term / (1.0 + term),
        colloidal: 0.0,
        dissolved: 1.0 / (1.0 + term),
    }
}

/// Neutral/ionic split of an ionizable organic at the compartment's pH.
pub fn ion_fractions(chem: &IonizableChemical, ph: f64) -> IonFractions {
    let neutral = chem.neutral_fraction(ph);
    IonFractions {
        neutral,
        ionic: 1.0 - neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DegradationHalfLives, OrganicChemical};
    use approx::assert_relative_eq;

    fn test_metal() -> MetalChemical {
        MetalChemical {
            name: "zinc".into(),
            molar_mass: 0.0654,
            kd_sus_sed: 110.0,
            kd_sediment: 75.0,
            kd_soil: 40.0,
            kd_colloid: 250.0,
        }
    }

    #[test]
    fn water_fractions_sum_to_one() {
        let y = metal_water_fractions(&test_metal(), 0.05, 0.002);
        assert!(y.is_closed());
        assert!(y.particulate > y.colloidal, "suspended solids dominate here");
    }

    #[test]
    fn no_sorbent_means_fully_dissolved() {
        let y = metal_water_fractions(&test_metal(), 0.0, 0.0);
        assert_relative_eq!(y.dissolved, 1.0);
        assert_eq!(y.particulate, 0.0);
    }

    #[test]
    fn solid_fractions_sum_to_one() {
        let y = metal_solid_fractions(75.0, 0.8, 2400.0);
        assert_relative_eq!(y.sum(), 1.0, max_relative = 1e-12);
        assert!(y.particulate > 0.99, "strongly sorbing bed");
    }

    #[test]
    fn acid_ionizes_above_its_pka() {
        let chem = IonizableChemical {
            neutral: OrganicChemical {
                name: "naproxen".into(),
                molar_mass: 0.2303,
                molar_volume: 192.0,
                kow: 5.0e3,
                kaw: 1.0e-8,
                koc: 600.0,
                half_lives: DegradationHalfLives::none(),
            },
            pka: 4.2,
            is_acid: true,
            koc_ion: 30.0,
        };
        let f = ion_fractions(&chem, 7.0);
        assert!(f.ionic > 0.99);
        assert_relative_eq!(f.neutral + f.ionic, 1.0, max_relative = 1e-12);
        let f_low = ion_fractions(&chem, 2.0);
        assert!(f_low.neutral > 0.99);
    }
}
