//! Baryonic (Newtonian) acceleration from the enclosed particle mass.
//!
//! For a bin `[low, high)`:
//!
//! ```text
//! M_enc  = Σ M  over particles with r < low
//! g_bar  = < G · M_enc / r² >  over particles with low <= r < high
//! ```
//!
//! The enclosed mass is taken at the bin's inner edge for every particle of the bin, so the
//! particles of a bin never contribute to their own numerator. An empty bin yields NaN even when
//! `M_enc > 0`.
use super::{nan_mean, AccelerationModel, RadialBin, RadialShells};
use crate::constants::{Acceleration, GRAV_CONSTANT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaryonicAcceleration {
    /// Gravitational constant in km² · kpc / (M_sun · s²).
    pub grav_constant: f64,
}

impl Default for BaryonicAcceleration {
    fn default() -> Self {
        BaryonicAcceleration {
            grav_constant: GRAV_CONSTANT,
        }
    }
}

impl AccelerationModel for BaryonicAcceleration {
    fn name(&self) -> &'static str {
        "g_bar"
    }

    fn bin_value(&self, shells: &RadialShells, bin: &RadialBin) -> Acceleration {
        let gm_enc = self.grav_constant * shells.enclosed_mass(bin.low);
        nan_mean(
            shells
                .radii_in(shells.bin_range(bin))
                .iter()
                .map(|r| gm_enc / (r * r)),
        )
    }
}

#[cfg(test)]
mod baryonic_test {
    use approx::assert_relative_eq;

    use super::*;
    use crate::particles::{Particle, ParticleTable, ParticleType};

    fn shells() -> RadialShells {
        let table: ParticleTable = [
            Particle::new(3.0, 1e8, 30.0, ParticleType::Gas),
            Particle::new(1.0, 1e8, 10.0, ParticleType::Gas),
            Particle::new(2.0, 1e8, 20.0, ParticleType::Star),
        ]
        .into_iter()
        .collect();
        RadialShells::new(&table)
    }

    #[test]
    fn test_no_enclosed_mass_gives_zero() {
        let value = BaryonicAcceleration::default().bin_value(&shells(), &RadialBin::new(1.5, 1.0));
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_inner_edge_enclosed_mass() {
        let model = BaryonicAcceleration::default();
        // bin [2, 4): M_enc = 1e8 (r=1 only), particles r=2 and r=3
        let expected = 0.5 * (GRAV_CONSTANT * 1e8 / 4.0 + GRAV_CONSTANT * 1e8 / 9.0);
        assert_relative_eq!(
            model.bin_value(&shells(), &RadialBin::new(3.0, 2.0)),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_empty_bin_is_nan_despite_mass() {
        let value =
            BaryonicAcceleration::default().bin_value(&shells(), &RadialBin::new(10.0, 1.0));
        assert!(value.is_nan());
    }
}
