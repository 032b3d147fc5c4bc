//! # Radial acceleration profiles
//!
//! Binned acceleration profiles of many subhalos, evaluated at requested radii.
//!
//! ## Overview
//! -----------------
//! A profile request is a list of bin centers `r_i` with widths `w_i` and an optional subhalo
//! selection. The engine:
//!
//! 1. validates the bins ([`RadialBins::new`]),
//! 2. loads the manifest and resolves the selection ([`Manifest::resolve`]),
//! 3. allocates a NaN-filled [`AccelerationTable`] (rows = radii, columns = subhalos),
//! 4. for each subhalo, loads its particle table once, builds a [`RadialShells`] view and fills
//!    its column with one [`AccelerationModel::bin_value`] per bin.
//!
//! Validation always completes before the first particle table is read, and any failure aborts
//! the whole call: no partial table is ever returned.
//!
//! ## Models
//! -----------------
//! * [`ObservedAcceleration`] – `g_obs = < v² / r >` over the bin.
//! * [`BaryonicAcceleration`] – `g_bar = < G · M(< low) / r² >` over the bin.
//!
//! Bins are half-open `[r - w/2, r + w/2)`; an empty bin is NaN, never an error.
//!
//! ## Example
//! -----------------
//! ```no_run
//! use camino::Utf8Path;
//! use mond_profile::profile::calc_gobs;
//!
//! let manifest = Utf8Path::new("snapshot_dir/subhalo_list.parquet");
//! let g_obs = calc_gobs([1.0, 2.0, 5.0], 0.5, manifest, Some(&[5, 9])).unwrap();
//! println!("{g_obs}");
//! ```
//!
//! ## See also
//! ------------
//! * [`crate::manifest`] – Subhalo resolution.
//! * [`crate::particles`] – Particle table layout.
use camino::Utf8Path;
use tracing::{debug, info};

use crate::{
    constants::{Acceleration, SubhaloId},
    manifest::Manifest,
    mond_errors::MondError,
    particles::ParticleTable,
};

pub mod acceleration_table;
pub mod baryonic;
pub mod display;
pub mod observed;
mod progress_bar;
pub mod radial_bins;
pub mod radial_shells;

pub use acceleration_table::AccelerationTable;
pub use baryonic::BaryonicAcceleration;
pub use display::AccelerationTableDisplay;
pub use observed::ObservedAcceleration;
pub use radial_bins::{BinWidths, RadialBin, RadialBins};
pub use radial_shells::RadialShells;

pub(crate) use radial_shells::nan_mean;

use progress_bar::SubhaloProgress;

/// Per-bin reduction of a radius-sorted particle view.
///
/// Implementors see one subhalo at a time; the engine handles bins, resolution and storage.
pub trait AccelerationModel {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Acceleration of `bin`, or NaN if the bin holds no particle.
    fn bin_value(&self, shells: &RadialShells, bin: &RadialBin) -> Acceleration;
}

/// Compute a profile for `model` over the subhalos listed in a manifest.
///
/// Arguments
/// -----------------
/// * `model` – Per-bin reduction ([`ObservedAcceleration`], [`BaryonicAcceleration`], ...).
/// * `radii` – Bin centers (kpc), in output row order.
/// * `widths` – A scalar width or one width per center.
/// * `manifest_location` – Path to the dataset manifest.
/// * `requested_ids` – Optional subhalo selection; `None` means every subhalo in manifest order.
///
/// Return
/// ----------
/// * The filled table, or the first validation / I/O error encountered.
pub fn compute_profile<M, R, W>(
    model: &M,
    radii: R,
    widths: W,
    manifest_location: &Utf8Path,
    requested_ids: Option<&[SubhaloId]>,
) -> Result<AccelerationTable, MondError>
where
    M: AccelerationModel + ?Sized,
    R: IntoIterator<Item = f64>,
    W: Into<BinWidths>,
{
    let bins = RadialBins::new(radii, widths)?;
    let manifest = Manifest::load(manifest_location)?;
    compute_binned_profile(model, &bins, &manifest, requested_ids)
}

/// Same as [`compute_profile`] with already validated bins and an already loaded manifest.
pub fn compute_binned_profile<M>(
    model: &M,
    bins: &RadialBins,
    manifest: &Manifest,
    requested_ids: Option<&[SubhaloId]>,
) -> Result<AccelerationTable, MondError>
where
    M: AccelerationModel + ?Sized,
{
    let resolved = manifest.resolve(requested_ids)?;
    info!(
        model = model.name(),
        radii = bins.len(),
        subhalos = resolved.len(),
        manifest = %manifest.location(),
        "computing radial profile"
    );

    let mut table = AccelerationTable::nan_filled(
        bins.centers(),
        resolved.iter().map(|s| s.id).collect(),
    );

    let mut progress = SubhaloProgress::new(resolved.len(), model.name());
    for (subhalo, (id, column)) in resolved.iter().zip(table.columns_mut()) {
        debug_assert_eq!(subhalo.id, id);

        let particles = ParticleTable::from_parquet(&subhalo.path)?;
        let shells = RadialShells::new(&particles);
        for (cell, bin) in column.iter_mut().zip(bins) {
            *cell = model.bin_value(&shells, bin);
        }

        debug!(
            subhalo = id,
            particles = shells.len(),
            path = %subhalo.path,
            "subhalo profile filled"
        );
        progress.done(id);
    }
    progress.finish();

    Ok(table)
}

/// Observed acceleration profile `g_obs(r) = < v² / r >`, in (km/s)² / kpc.
///
/// See [`compute_profile`] for the arguments and failure conditions.
pub fn calc_gobs<R, W>(
    radii: R,
    widths: W,
    manifest_location: &Utf8Path,
    requested_ids: Option<&[SubhaloId]>,
) -> Result<AccelerationTable, MondError>
where
    R: IntoIterator<Item = f64>,
    W: Into<BinWidths>,
{
    compute_profile(
        &ObservedAcceleration,
        radii,
        widths,
        manifest_location,
        requested_ids,
    )
}

/// Baryonic acceleration profile `g_bar(r) = < G · M(< low) / r² >`, in (km/s)² / kpc.
///
/// See [`compute_profile`] for the arguments and failure conditions.
pub fn calc_gbar<R, W>(
    radii: R,
    widths: W,
    manifest_location: &Utf8Path,
    requested_ids: Option<&[SubhaloId]>,
) -> Result<AccelerationTable, MondError>
where
    R: IntoIterator<Item = f64>,
    W: Into<BinWidths>,
{
    compute_profile(
        &BaryonicAcceleration::default(),
        radii,
        widths,
        manifest_location,
        requested_ids,
    )
}

#[cfg(test)]
mod profile_test {
    use camino::Utf8PathBuf;

    use super::*;
    use crate::{
        manifest::{subhalo_file_name, write_manifest},
        particles::{Particle, ParticleType},
    };

    struct ParticleCount;

    impl AccelerationModel for ParticleCount {
        fn name(&self) -> &'static str {
            "count"
        }

        fn bin_value(&self, shells: &RadialShells, bin: &RadialBin) -> Acceleration {
            shells.bin_range(bin).len() as f64
        }
    }

    fn dataset(dir: &Utf8Path) -> Utf8PathBuf {
        let base = "TNG_z=0.0_";
        let mut names = Vec::new();
        for id in [3u64, 1] {
            let table: ParticleTable = (1..=id + 1)
                .map(|k| Particle::new(k as f64, 1.0, 1.0, ParticleType::Star))
                .collect();
            let name = subhalo_file_name(base, id);
            table.write_parquet(&dir.join(&name)).unwrap();
            names.push(name);
        }
        let manifest = dir.join("subhalo_list.parquet");
        write_manifest(&names, &manifest).unwrap();
        manifest
    }

    #[test]
    fn test_custom_model_through_engine() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let manifest = dataset(dir);

        let table = compute_profile(&ParticleCount, [2.0, 10.0], 3.0, &manifest, None).unwrap();
        assert_eq!(table.subhalo_ids(), &[3, 1]);
        // subhalo 3 has radii 1..=4, subhalo 1 has radii 1..=2; bin [0.5, 3.5)
        assert_eq!(table.column(3).unwrap(), &[3.0, 0.0]);
        assert_eq!(table.column(1).unwrap(), &[2.0, 0.0]);
    }

    #[test]
    fn test_bins_validated_before_manifest() {
        let missing = Utf8Path::new("/definitely/not/here/subhalo_list.parquet");
        assert_eq!(
            calc_gobs([1.0, 2.0], vec![0.1, 0.2, 0.3], missing, None),
            Err(MondError::BinWidthLengthMismatch {
                radii: 2,
                widths: 3
            })
        );
    }

    #[test]
    fn test_empty_selection_gives_empty_columns() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let manifest = dataset(dir);

        let table = calc_gbar([1.0], 1.0, &manifest, Some(&[])).unwrap();
        assert_eq!(table.shape(), (1, 0));
    }
}
