//! Radius-sorted view of one particle table.
//!
//! The profile engine evaluates many bins against the same subhalo. Sorting the particles once
//! by radius turns every bin filter into two binary searches, and a cumulative mass column makes
//! the enclosed mass `M(< r)` a single lookup.
//!
//! Rows whose radius is NaN never satisfy a bin or enclosed-region predicate and are left out of
//! the view. NaN terms inside a bin are skipped when averaging, as are NaN masses when
//! accumulating.
use std::ops::Range;

use super::radial_bins::RadialBin;
use crate::{
    constants::{Kpc, SolarMass},
    particles::ParticleTable,
};

#[derive(Debug, Clone, Default)]
pub struct RadialShells {
    /// Radii in ascending order.
    r: Vec<Kpc>,
    /// `v² / r` per particle, same order as `r`.
    v2_over_r: Vec<f64>,
    /// `cumulative_mass[i]` = mass of the first `i` particles; one entry longer than `r`.
    cumulative_mass: Vec<SolarMass>,
}

impl RadialShells {
    pub fn new(table: &ParticleTable) -> Self {
        let radii = table.radii();
        let masses = table.masses();
        let speeds = table.speeds();

        let mut order: Vec<usize> = (0..table.len()).filter(|&i| !radii[i].is_nan()).collect();
        order.sort_unstable_by(|&a, &b| radii[a].total_cmp(&radii[b]));

        let r: Vec<Kpc> = order.iter().map(|&i| radii[i]).collect();
        let v2_over_r = order
            .iter()
            .map(|&i| speeds[i] * speeds[i] / radii[i])
            .collect();

        let mut cumulative_mass = Vec::with_capacity(order.len() + 1);
        let mut running = 0.0;
        cumulative_mass.push(running);
        for &i in &order {
            if !masses[i].is_nan() {
                running += masses[i];
            }
            cumulative_mass.push(running);
        }

        RadialShells {
            r,
            v2_over_r,
            cumulative_mass,
        }
    }

    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Number of particles with radius strictly below `radius`.
    #[inline]
    fn count_below(&self, radius: Kpc) -> usize {
        self.r.partition_point(|&x| x < radius)
    }

    /// Sorted-index range of the particles inside `bin`.
    pub fn bin_range(&self, bin: &RadialBin) -> Range<usize> {
        let start = self.count_below(bin.low);
        let end = self.count_below(bin.high).max(start);
        start..end
    }

    /// Total mass of the particles strictly inside `radius`.
    pub fn enclosed_mass(&self, radius: Kpc) -> SolarMass {
        self.cumulative_mass[self.count_below(radius)]
    }

    /// Radii of the particles in `range` (from [`Self::bin_range`]).
    pub fn radii_in(&self, range: Range<usize>) -> &[Kpc] {
        &self.r[range]
    }

    /// `v² / r` of the particles in `range` (from [`Self::bin_range`]).
    pub fn v2_over_r_in(&self, range: Range<usize>) -> &[f64] {
        &self.v2_over_r[range]
    }
}

/// Arithmetic mean ignoring NaN terms; NaN when no term remains.
pub(crate) fn nan_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(sum, count), x| (sum + x, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}
