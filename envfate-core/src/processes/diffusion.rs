//! Diffusive exchange across the air-water, air-soil, and sediment-water
//! interfaces.
//!
//! Molecular diffusivities come from molar-mass correlations
//! (Schwarzenbach-style, $D_{air} = 1.55 / M^{0.65}$ cm²/s and
//! $D_{water} = 2.7 \times 10^{-4} / M^{0.71}$ cm²/s with $M$ in g/mol),
//! mass-transfer coefficients are diffusivity over film thickness, soil-side
//! coefficients apply the Millington-Quirk tortuosity $\phi^{10/3}/\theta^2$,
//! and interfaces combine the film conductances in series:
//!
//! $$ D_{AW} = \frac{A}{\dfrac{1}{k_A Z_{air}} + \dfrac{1}{k_W Z_{water}}} $$
//!
//! A side with zero conductance shuts the whole interface.

use crate::numeric::safe_div;

/// cm²/s to m²/day.
const CM2_S_TO_M2_DAY: f64 = 8.64;

/// Stagnant air film over water and soil surfaces, m.
pub const AIR_FILM_M: f64 = 4.75e-3;
/// Stagnant water film at the water surface, m.
pub const WATER_FILM_M: f64 = 4.75e-4;
/// Diffusion path into the sediment bed, m.
pub const SEDIMENT_FILM_M: f64 = 5.0e-3;

/// Molecular diffusivity in air, m²/day, with a $ (T/298)^{1.75} $
/// temperature correction.
pub fn diffusivity_air(molar_mass_kg: f64, temp_k: f64) -> f64 {
    let mw_g = molar_mass_kg * 1000.0;
    if mw_g <= 0.0 {
        return 0.0;
    }
    1.55 / mw_g.powf(0.65) * (temp_k / 298.15).powf(1.75) * CM2_S_TO_M2_DAY
}

/// Molecular diffusivity in water, m²/day.
pub fn diffusivity_water(molar_mass_kg: f64) -> f64 {
    let mw_g = molar_mass_kg * 1000.0;
    if mw_g <= 0.0 {
        return 0.0;
    }
    2.7e-4 / mw_g.powf(0.71) * CM2_S_TO_M2_DAY
}

/// Film mass-transfer coefficient, m/day.
pub fn mtc(diffusivity_m2_day: f64, film_m: f64) -> f64 {
    safe_div(diffusivity_m2_day, film_m)
}

/// Air-phase MTC through the soil pore network, m/day, with Millington-Quirk
/// tortuosity for air content `ac` and water content `wc` over a diffusion
/// path of half the surface-layer depth.
pub fn soil_air_mtc(d_air: f64, ac: f64, wc: f64, layer_depth_m: f64) -> f64 {
    let porosity = ac + wc;
    if porosity <= 0.0 {
        return 0.0;
    }
    let effective = d_air * ac.powf(10.0 / 3.0) / (porosity * porosity);
    safe_div(effective, layer_depth_m / 2.0)
}

/// Water-phase MTC through the soil pore network, m/day.
pub fn soil_water_mtc(d_water: f64, ac: f64, wc: f64, layer_depth_m: f64) -> f64 {
    let porosity = ac + wc;
    if porosity <= 0.0 {
        return 0.0;
    }
    let effective = d_water * wc.powf(10.0 / 3.0) / (porosity * porosity);
    safe_div(effective, layer_depth_m / 2.0)
}

/// Two-film air-water D value, mol/(Pa·day).
pub fn d_air_water(area: f64, k_air: f64, z_air: f64, k_water: f64, z_water: f64) -> f64 {
    let air_side = k_air * z_air;
    let water_side = k_water * z_water;
    if air_side <= 0.0 || water_side <= 0.0 {
        return 0.0;
    }
    area / (1.0 / air_side + 1.0 / water_side)
}

/// Two-film air-soil D value, mol/(Pa·day). The soil side conducts through
/// its air and water pore phases in parallel.
pub fn d_air_soil(
    area: f64,
    k_air: f64,
    z_air: f64,
    k_soil_air: f64,
    k_soil_water: f64,
    z_water: f64,
) -> f64 {
    let air_side = k_air * z_air;
    let soil_side = k_soil_air * z_air + k_soil_water * z_water;
    if air_side <= 0.0 || soil_side <= 0.0 {
        return 0.0;
    }
    area / (1.0 / air_side + 1.0 / soil_side)
}

/// One-film sediment-water D value, mol/(Pa·day): pore-water diffusion over
/// the bed's diffusion path.
pub fn d_sediment_water(area: f64, k_sed: f64, z_water: f64) -> f64 {
    area * k_sed * z_water
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn heavier_molecules_diffuse_slower() {
        let light = diffusivity_air(0.05, 288.15);
        let heavy = diffusivity_air(0.4, 288.15);
        assert!(light > heavy && heavy > 0.0);
        assert!(diffusivity_water(0.05) > diffusivity_water(0.4));
    }

    #[test]
    fn interface_is_limited_by_the_slower_film() {
        let z_air = 4.0e-4;
        let z_water = 0.8;
        let d = d_air_water(1.0e6, 500.0, z_air, 0.5, z_water);
        // the water-side conductance dominates the series resistance
        assert!(d < 1.0e6 * 500.0 * z_air);
        assert!(d < 1.0e6 * 0.5 * z_water);
        assert!(d > 0.0);
    }

    #[test]
    fn dead_film_shuts_the_interface() {
        assert_eq!(d_air_water(1.0e6, 0.0, 4.0e-4, 0.5, 0.8), 0.0);
        assert_eq!(d_air_soil(1.0e6, 500.0, 4.0e-4, 0.0, 0.0, 0.8), 0.0);
    }

    #[test]
    fn soil_mtc_honors_tortuosity() {
        let d_air = diffusivity_air(0.2, 288.15);
        let open = soil_air_mtc(d_air, 0.4, 0.1, 0.1);
        let wet = soil_air_mtc(d_air, 0.05, 0.45, 0.1);
        assert!(open > wet, "air-filled pores conduct the gas phase");
        assert_eq!(soil_air_mtc(d_air, 0.0, 0.0, 0.1), 0.0);
    }
}
