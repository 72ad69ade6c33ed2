//! Soil surface hydrology and erosion.
//!
//! Runoff uses the SCS curve-number method: with retention
//! $S = 1000/CN - 10$ (inches), the runoff depth for a daily rain $P$ (mm) is
//!
//! $$ Q = \frac{(P - 0.2 S)^2}{P + 0.8 S} \quad \text{for } P > 0.2 S $$
//!
//! and zero otherwise. Water not run off or evaporated percolates into the
//! deep layer. Water erosion follows USLE with a daily rainfall erosivity;
//! wind erosion is the threshold shear-velocity flux law. Both erosion
//! processes yield a solid volume per day so each chemistry applies its own
//! phase capacity or concentration.

use crate::numeric::safe_div;
use crate::params::{SoilEnv, WindErosionEnv};

const MM_PER_INCH: f64 = 25.4;
const GRAVITY: f64 = 9.81;
const VON_KARMAN: f64 = 0.41;

/// SCS runoff depth, mm/day. `retention_in` is $1000/CN - 10$ in inches.
pub fn runoff_depth_mm(precip_mm: f64, retention_in: f64) -> f64 {
    let s = retention_in * MM_PER_INCH;
    if precip_mm <= 0.2 * s {
        return 0.0;
    }
    let excess = precip_mm - 0.2 * s;
    excess * excess / (precip_mm + 0.8 * s)
}

/// Runoff water volume leaving a soil surface, m³/day.
pub fn runoff_volume(precip_mm: f64, retention_in: f64, area: f64) -> f64 {
    runoff_depth_mm(precip_mm, retention_in) / 1000.0 * area
}

/// Fugacity-space runoff D value, mol/(Pa·day).
pub fn d_runoff(precip_mm: f64, retention_in: f64, area: f64, z_water: f64) -> f64 {
    runoff_volume(precip_mm, retention_in, area) * z_water
}

/// Percolation from the surface layer into the deep layer, m³/day.
///
/// Rain that neither runs off nor evaporates infiltrates; a soil drier than
/// field capacity retains part of it, scaling percolation by the moisture
/// ratio.
pub fn infiltration_volume(
    precip_mm: f64,
    retention_in: f64,
    evap_mm: f64,
    field_capacity: f64,
    water_content: f64,
    area: f64,
) -> f64 {
    let surplus_mm = (precip_mm - runoff_depth_mm(precip_mm, retention_in) - evap_mm).max(0.0);
    let moisture = safe_div(water_content, field_capacity).min(1.0);
    surplus_mm / 1000.0 * area * moisture
}

/// Fugacity-space infiltration: the D value and the water flow it rides on.
/// The flow feeds [`d_leach`] out of the deep layer.
pub fn d_infiltration(
    precip_mm: f64,
    retention_in: f64,
    evap_mm: f64,
    field_capacity: f64,
    water_content: f64,
    area: f64,
    z_water: f64,
) -> (f64, f64) {
    let flow = infiltration_volume(
        precip_mm,
        retention_in,
        evap_mm,
        field_capacity,
        water_content,
        area,
    );
    (flow * z_water, flow)
}

/// Leaching out of the deep layer, mol/(Pa·day): the percolating water
/// continues downward at the infiltration flow.
pub fn d_leach(infiltration_m3_day: f64, z_water: f64) -> f64 {
    infiltration_m3_day * z_water
}

/// Daily USLE rainfall erosivity, MJ·mm/(ha·h), from the daily rain depth.
fn erosivity(precip_mm: f64) -> f64 {
    if precip_mm <= 0.0 {
        return 0.0;
    }
    0.29 * (1.0 - 0.72 * (-0.05 * precip_mm).exp()) * precip_mm
}

/// Solid volume washed off a soil surface, m³/day.
///
/// USLE: loss = R K LS C P in t/(ha·day), converted through the soil's solid
/// particle density.
pub fn erosion_volume(precip_mm: f64, soil: &SoilEnv) -> f64 {
    let loss_t_per_ha = erosivity(precip_mm)
        * soil.erodibility
        * soil.slope_factor
        * soil.cover_factor
        * soil.practice_factor;
    // t/ha × area -> kg: 1000 kg/t over 10^4 m²/ha
    let mass_kg = loss_t_per_ha * 0.1 * soil.area;
    safe_div(mass_kg, soil.solid_density)
}

/// Fugacity-space soil erosion D value, mol/(Pa·day).
pub fn d_erosion(precip_mm: f64, soil: &SoilEnv, z_solid: f64) -> f64 {
    erosion_volume(precip_mm, soil) * z_solid
}

/// Solid volume lifted off a soil surface by wind, m³/day.
///
/// The log-profile friction velocity $u_* = \kappa u / \ln(z/z_0)$ is tested
/// against the threshold shear velocity; above it the vertical dust flux is
///
/// $$ F = K a \frac{\rho_{air}}{g} u_*^3 \left(1 - \frac{u_t^2}{u_*^2}\right) $$
///
/// applied over the bare, windward share of the surface, with only the
/// suspendable grain fraction leaving the soil.
pub fn wind_erosion_volume(
    wind_m_s: f64,
    air_density: f64,
    soil_area: f64,
    solid_density: f64,
    wind: &WindErosionEnv,
) -> f64 {
    if wind_m_s <= 0.0 || soil_area <= 0.0 {
        return 0.0;
    }
    let profile = (wind.z_wind / wind.roughness).ln();
    if profile <= 0.0 {
        return 0.0;
    }
    let friction = VON_KARMAN * wind.wind_constant * wind_m_s / profile;
    let threshold = wind.tsv.max(wind.tsv_min);
    if friction <= threshold {
        return 0.0;
    }
    let flux_kg_m2_s = wind.k_constant * wind.a_constant * air_density / GRAVITY
        * friction.powi(3)
        * (1.0 - (threshold * threshold) / (friction * friction));
    let mass_kg_day = flux_kg_m2_s
        * 86_400.0
        * soil_area
        * wind.perc_uncovered
        * wind.perc_wind
        * wind.perc_suspended;
    safe_div(mass_kg_day, solid_density)
}

/// Fugacity-space wind-erosion D value, mol/(Pa·day).
pub fn d_wind_erosion(
    wind_m_s: f64,
    air_density: f64,
    soil: &SoilEnv,
    z_solid: f64,
) -> f64 {
    wind_erosion_volume(wind_m_s, air_density, soil.area, soil.solid_density, &soil.wind)
        * z_solid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::environment::tests::test_environment;
    use approx::assert_relative_eq;

    #[test]
    fn light_rain_below_initial_abstraction_runs_off_nothing() {
        let retention = 1000.0 / 74.0 - 10.0;
        let ia_mm = 0.2 * retention * MM_PER_INCH;
        assert_eq!(runoff_depth_mm(ia_mm * 0.9, retention), 0.0);
        assert!(runoff_depth_mm(ia_mm * 3.0, retention) > 0.0);
    }

    #[test]
    fn runoff_depth_never_exceeds_rainfall() {
        let retention = 1000.0 / 74.0 - 10.0;
        for p in [1.0, 5.0, 20.0, 80.0, 200.0] {
            let q = runoff_depth_mm(p, retention);
            assert!(q >= 0.0 && q < p, "Q={q} for P={p}");
        }
    }

    #[test]
    fn infiltration_balances_runoff_and_evaporation() {
        let retention = 1000.0 / 74.0 - 10.0;
        let area = 1.0e6;
        let flow = infiltration_volume(30.0, retention, 3.0, 0.3, 0.3, area);
        let expected_mm = 30.0 - runoff_depth_mm(30.0, retention) - 3.0;
        assert_relative_eq!(flow, expected_mm / 1000.0 * area, max_relative = 1e-12);
        // an arid day percolates nothing
        assert_eq!(infiltration_volume(0.0, retention, 4.0, 0.3, 0.3, area), 0.0);
    }

    #[test]
    fn erosion_needs_rain() {
        let soil = test_environment().soils[0];
        assert_eq!(erosion_volume(0.0, &soil), 0.0);
        assert!(erosion_volume(40.0, &soil) > erosion_volume(10.0, &soil));
    }

    #[test]
    fn wind_erosion_has_a_threshold() {
        let soil = test_environment().soils[0];
        let calm = wind_erosion_volume(1.0, 1.2, soil.area, soil.solid_density, &soil.wind);
        assert_eq!(calm, 0.0);
        let storm = wind_erosion_volume(30.0, 1.2, soil.area, soil.solid_density, &soil.wind);
        assert!(storm > 0.0);
    }
}
