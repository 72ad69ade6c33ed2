//! First-order degradation.
//!
//! Fugacity form: $D_{deg} = V k Z$ in mol/(Pa·day) for a phase of volume
//! $V$, rate constant $k$ (1/day), and capacity $Z$. Mass form for nano and
//! aquivalence chemistries: loss rate $k M$ in kg/day.

/// Fugacity-space degradation D value, mol/(Pa·day).
pub fn d_degradation(volume: f64, rate_per_day: f64, z: f64) -> f64 {
    volume * rate_per_day * z
}

/// Mass-space first-order loss, kg/day.
pub fn first_order_loss(rate_per_day: f64, mass_kg: f64) -> f64 {
    rate_per_day * mass_kg
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn d_value_is_linear_in_each_factor() {
        assert_relative_eq!(d_degradation(2.0, 0.5, 3.0), 3.0);
        assert_eq!(d_degradation(0.0, 0.5, 3.0), 0.0);
        assert_eq!(d_degradation(2.0, 0.0, 3.0), 0.0);
    }

    #[test]
    fn mass_loss_scales_with_inventory() {
        assert_relative_eq!(first_order_loss(0.1, 50.0), 5.0);
        assert_eq!(first_order_loss(0.1, 0.0), 0.0);
    }
}
