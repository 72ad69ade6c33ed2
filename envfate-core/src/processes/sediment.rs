//! Sediment bed exchange: burial below the active layer, resuspension back
//! into the water column, and pore-water advection through the bed.
//!
//! Burial and resuspension are solid fluxes given as velocities (m/day) over
//! the bed area. Bed advection carries the configured fraction of the water
//! body's flow through the bulk bed.

use crate::numeric::safe_div;

/// Fugacity-space burial D value, mol/(Pa·day).
pub fn d_burial(area: f64, burial_m_per_day: f64, z_sed_solid: f64) -> f64 {
    area * burial_m_per_day * z_sed_solid
}

/// Fugacity-space resuspension D value, mol/(Pa·day).
pub fn d_resuspension(area: f64, resuspension_m_per_day: f64, z_sed_solid: f64) -> f64 {
    area * resuspension_m_per_day * z_sed_solid
}

/// Fugacity-space bed advection D value, mol/(Pa·day).
pub fn d_sediment_advection(flow_m3_per_day: f64, advective_fraction: f64, z_bulk: f64) -> f64 {
    flow_m3_per_day * advective_fraction * z_bulk
}

/// Mass-space rate constant, 1/day, for a solid-flux velocity acting on a
/// bed of depth `depth_m`.
pub fn bed_rate(velocity_m_per_day: f64, depth_m: f64) -> f64 {
    safe_div(velocity_m_per_day, depth_m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn d_values_are_linear() {
        assert_relative_eq!(d_burial(3.0e6, 1.1e-6, 500.0), 3.0e6 * 1.1e-6 * 500.0);
        assert_eq!(d_resuspension(0.0, 6.0e-7, 500.0), 0.0);
        assert_relative_eq!(
            d_sediment_advection(4.3e6, 0.01, 400.0),
            4.3e6 * 0.01 * 400.0
        );
    }

    #[test]
    fn bed_rate_guards_zero_depth() {
        assert_eq!(bed_rate(1.1e-6, 0.0), 0.0);
        assert_relative_eq!(bed_rate(1.1e-6, 0.05), 2.2e-5);
    }
}
