//! Observed (kinematic) acceleration, `g_obs(r) = <v² / r>` over the particles of a bin.
use super::{nan_mean, AccelerationModel, RadialBin, RadialShells};
use crate::constants::Acceleration;

/// Mean of `v² / r` over the particles with `low <= r < high`.
///
/// An empty bin yields NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObservedAcceleration;

impl AccelerationModel for ObservedAcceleration {
    fn name(&self) -> &'static str {
        "g_obs"
    }

    fn bin_value(&self, shells: &RadialShells, bin: &RadialBin) -> Acceleration {
        nan_mean(shells.v2_over_r_in(shells.bin_range(bin)).iter().copied())
    }
}
