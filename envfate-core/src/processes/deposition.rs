//! Particle deposition: gravitational settling and rain scavenging.
//!
//! Settling follows Stokes' law,
//!
//! $$ v = \frac{2 r^2 (\rho_p - \rho_f) g}{9 \mu} $$
//!
//! converted to m/day. The same velocity serves aerosol dry deposition from
//! air and suspended-sediment settling onto the beds. Wet deposition sweeps
//! the aerosol phase out with rain scaled by the scavenging ratio.

use crate::compartment::SECONDS_PER_DAY;

const GRAVITY: f64 = 9.81;

/// Stokes settling velocity, m/day. Negative buoyancy settles at zero.
pub fn settling_velocity(
    radius: f64,
    particle_density: f64,
    fluid_density: f64,
    dyn_viscosity: f64,
) -> f64 {
    let v = 2.0 * radius * radius * (particle_density - fluid_density) * GRAVITY
        / (9.0 * dyn_viscosity);
    (v * SECONDS_PER_DAY).max(0.0)
}

/// Fugacity-space deposition D value, mol/(Pa·day). `z` is the particle
/// phase capacity already weighted by its volume fraction in the column.
pub fn d_deposition(velocity_m_per_day: f64, area: f64, z: f64) -> f64 {
    velocity_m_per_day * area * z
}

/// Mass-space deposition rate constant, 1/day, for particles settling out of
/// a column of depth `depth_m`.
pub fn deposition_rate(velocity_m_per_day: f64, depth_m: f64) -> f64 {
    crate::numeric::safe_div(velocity_m_per_day, depth_m)
}

/// Wet scavenging D value, mol/(Pa·day): rain volume times the scavenging
/// ratio acting on the aerosol phase.
pub fn d_wet_deposition(
    precip_m_per_day: f64,
    scavenging_ratio: f64,
    area: f64,
    z_aerosol: f64,
    aerosol_fraction: f64,
) -> f64 {
    precip_m_per_day * scavenging_ratio * area * z_aerosol * aerosol_fraction
}

/// Mass-space wet scavenging rate constant, 1/day, for an air column of
/// height `air_height_m`.
pub fn wet_deposition_rate(
    precip_m_per_day: f64,
    scavenging_ratio: f64,
    air_height_m: f64,
) -> f64 {
    crate::numeric::safe_div(precip_m_per_day * scavenging_ratio, air_height_m)
}
