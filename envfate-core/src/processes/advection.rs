//! Bulk-flow transport: air and water advection, background inflows, and
//! rain dissolution of the gas phase.
//!
//! Air throughflow is wind speed times the crosswind face of the air column,
//! $G_{air} = u \sqrt{A} h$ in m³/day. Water throughflow is the daily river
//! or lake discharge. A fugacity D value is $G Z$; a mass-space rate divides
//! the throughflow by the compartment volume to get a first-order constant.

use crate::numeric::safe_div;

/// Air throughflow, m³/day, from wind speed in m/day over a square footprint
/// of `area` m² mixed to `height` m.
pub fn g_air(wind_m_per_day: f64, area: f64, height: f64) -> f64 {
    wind_m_per_day * area.sqrt() * height
}

/// Fugacity-space advection D value, mol/(Pa·day).
pub fn d_advection(g_m3_per_day: f64, z: f64) -> f64 {
    g_m3_per_day * z
}

/// Advective inflow of background chemical, mol/day.
pub fn inflow_mol(g_m3_per_day: f64, background_kg_m3: f64, molar_mass_kg: f64) -> f64 {
    safe_div(g_m3_per_day * background_kg_m3, molar_mass_kg)
}

/// Advective inflow of background chemical, kg/day.
pub fn inflow_kg(g_m3_per_day: f64, background_kg_m3: f64) -> f64 {
    g_m3_per_day * background_kg_m3
}

/// Mass-space advection rate constant, 1/day: throughflow over volume.
/// A zero-volume compartment advects nothing.
pub fn advection_rate(flow_m3_per_day: f64, volume_m3: f64) -> f64 {
    safe_div(flow_m3_per_day, volume_m3)
}

/// Rain dissolution of the gas phase, mol/(Pa·day): falling rain equilibrates
/// with air and carries the dissolved chemical to the surface below.
pub fn d_rain_dissolution(precip_m_per_day: f64, area: f64, z_water: f64) -> f64 {
    precip_m_per_day * area * z_water
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn air_throughflow_scales_with_wind() {
        let g = g_air(4.0 * 86_400.0, 1.0e8, 800.0);
        assert_relative_eq!(g, 4.0 * 86_400.0 * 1.0e4 * 800.0);
        assert_eq!(g_air(0.0, 1.0e8, 800.0), 0.0);
    }

    #[test]
    fn zero_volume_advects_nothing() {
        assert_eq!(advection_rate(5.0e4, 0.0), 0.0);
        assert_relative_eq!(advection_rate(5.0e4, 1.0e6), 0.05);
    }

    #[test]
    fn inflow_converts_units() {
        assert_relative_eq!(inflow_mol(1000.0, 2.0e-6, 0.1), 0.02);
        assert_eq!(inflow_mol(1000.0, 2.0e-6, 0.0), 0.0);
        assert_relative_eq!(inflow_kg(1000.0, 2.0e-6), 2.0e-3);
    }

    #[test]
    fn dry_day_dissolves_nothing() {
        assert_eq!(d_rain_dissolution(0.0, 1.0e8, 400.0), 0.0);
    }
}
