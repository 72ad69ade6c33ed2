//! Processes specific to particulate (nano) chemistry.
//!
//! Nanomaterial states are tracked as mass, so every process here is a
//! first-order rate in 1/day applied to the compartment inventory, or a
//! paired gain/loss flux for dissolution. Heteroaggregation attaches free
//! particles to ambient solids, sedimentation settles them, dissolution
//! transfers mass into the co-located dissolved pool until the dissolvable
//! fraction is exhausted, sea spray aerosolizes the surface film, and
//! elution cycles particles between soil solid and soil pore water.

use crate::numeric::safe_div;
use crate::params::DissolutionFit;

/// Settling loss rate out of a column, 1/day, from the settling velocity.
pub fn sedimentation_rate(ksed_m_per_day: f64, depth_m: f64) -> f64 {
    safe_div(ksed_m_per_day, depth_m)
}

/// Heteroaggregation rate, 1/day: attachment to ambient particles at
/// concentration `particle_conc` (kg/m³) with affinity `khet` (m³/(kg·day)).
pub fn heteroaggregation_rate(khet: f64, particle_conc: f64) -> f64 {
    khet * particle_conc
}

/// Dissolution flux, kg/day, from a particle pool of `mass` into its
/// co-located dissolved pool holding `dissolved_mass`.
///
/// Only the fit's `max_fraction` of the combined inventory can ever
/// dissolve; the flux slows as the dissolved pool approaches that ceiling,
/// shaped by the fit exponent. The same figure is the particle pool's loss
/// and the dissolved pool's gain.
pub fn dissolution_flux(
    fit: &DissolutionFit,
    kdis_per_day: f64,
    mass: f64,
    dissolved_mass: f64,
) -> f64 {
    let total = mass + dissolved_mass;
    if total <= 0.0 || mass <= 0.0 || fit.max_fraction <= 0.0 {
        return 0.0;
    }
    let ceiling = fit.max_fraction * total;
    if dissolved_mass >= ceiling {
        return 0.0;
    }
    let headroom = 1.0 - dissolved_mass / ceiling;
    kdis_per_day * mass * headroom.powf(fit.shape)
}

/// Sea-spray aerosolization rate, 1/day, for the seawater column.
///
/// The Monahan whitecap fraction $3.84 \times 10^{-6} u^{3.41}$ over the
/// coastal strip entrains surface water, enriched in floating particles by
/// `enrichment`, out of the column.
pub fn aerosolization_rate(
    wind_m_s: f64,
    coastal_area: f64,
    enrichment: f64,
    sea_volume: f64,
) -> f64 {
    if wind_m_s <= 0.0 {
        return 0.0;
    }
    let entrained_m3_day = 3.84e-6 * wind_m_s.powf(3.41) * coastal_area;
    safe_div(entrained_m3_day * enrichment, sea_volume)
}

/// Elution exchange rates between soil solid and soil pore water, 1/day,
/// returned as (solid to water, water to solid). The exchange splits by the
/// phase volume shares of the layer.
pub fn elution_exchange(
    elution_per_day: f64,
    solid_fraction: f64,
    water_fraction: f64,
) -> (f64, f64) {
    let porous = solid_fraction + water_fraction;
    if porous <= 0.0 {
        return (0.0, 0.0);
    }
    (
        elution_per_day * water_fraction / porous,
        elution_per_day * solid_fraction / porous,
    )
}
