//! # Snapshot ingestion
//!
//! Builds an on-disk dataset (one particle table per subhalo plus a manifest, see
//! [`crate::manifest`]) from an Illustris snapshot.
//!
//! ## Unit conversion
//! -----------------
//! Cutouts come in comoving code units. With scale factor `a = 1/(1+z)` and Hubble parameter
//! `h`, every particle is converted relative to its subhalo:
//!
//! ```text
//! r = |x - x_sub| · a / h          (ckpc/h → kpc)
//! M = m · 1e10 / h                 (1e10 M_sun/h → M_sun)
//! v = |u · √a - v_sub|             (km/s, relative to the bulk motion)
//! ```
//!
//! ## Sources
//! -----------------
//! [`save_halos`] is written against two seams:
//!
//! * [`SubhaloCatalog`] – snapshot / subhalo metadata and cutout retrieval, implemented by
//!   [`IllustrisClient`],
//! * [`CutoutDecoder`] – turns a downloaded cutout file into [`DecodedCutout`]. The cutout file
//!   format (HDF5 for the public API) is left to the caller.
use camino::{Utf8Path, Utf8PathBuf};
use nalgebra::Vector3;
use tracing::{debug, info, warn};

use crate::{
    config::IllustrisConfig,
    constants::{SubhaloId, ILLUSTRIS_MASS_UNIT, MANIFEST_FILE_NAME},
    illustris::{
        api::{Snapshot, SubhaloDetail},
        IllustrisClient, SimulationName, SnapshotQuery,
    },
    manifest::{subhalo_file_name, write_manifest},
    mond_errors::MondError,
    particles::{ParticleTable, ParticleType},
};

/// Fields requested for each particle species of a cutout.
const CUTOUT_FIELDS: &str = "Coordinates,Masses,Velocities";

/// One particle species of a cutout, in code units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParticles {
    /// Comoving positions (ckpc/h).
    pub coordinates: Vec<Vector3<f64>>,
    /// Peculiar velocities, without the `√a` factor.
    pub velocities: Vec<Vector3<f64>>,
    /// Masses (1e10 M_sun/h).
    pub masses: Vec<f64>,
}

impl RawParticles {
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}

/// Gas (`PartType0`) and star (`PartType4`) particles of one cutout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedCutout {
    pub gas: RawParticles,
    pub stars: RawParticles,
}

/// Reads a downloaded cutout file.
///
/// Implementors report unreadable or malformed files as [`MondError::CutoutDecodeError`]
/// (I/O failures may also come back as [`MondError::IoError`]). [`save_halos`] removes the
/// cutout before propagating either.
pub trait CutoutDecoder {
    fn decode(&self, path: &Utf8Path) -> Result<DecodedCutout, MondError>;
}

/// Metadata and cutout access for one simulation.
pub trait SubhaloCatalog {
    fn config(&self) -> &IllustrisConfig;

    fn snapshot(
        &self,
        simulation: &SimulationName,
        query: SnapshotQuery,
    ) -> Result<Snapshot, MondError>;

    fn subhalo(&self, snapshot: &Snapshot, id: SubhaloId) -> Result<SubhaloDetail, MondError>;

    /// Download the particle cutout of `subhalo` into `dest_dir`, returning the file path.
    fn fetch_cutout(
        &self,
        subhalo: &SubhaloDetail,
        dest_dir: &Utf8Path,
    ) -> Result<Utf8PathBuf, MondError>;
}

impl SubhaloCatalog for IllustrisClient {
    fn config(&self) -> &IllustrisConfig {
        IllustrisClient::config(self)
    }

    fn snapshot(
        &self,
        simulation: &SimulationName,
        query: SnapshotQuery,
    ) -> Result<Snapshot, MondError> {
        let simulation = self.simulation(simulation)?;
        IllustrisClient::snapshot(self, &simulation, query)
    }

    fn subhalo(&self, snapshot: &Snapshot, id: SubhaloId) -> Result<SubhaloDetail, MondError> {
        IllustrisClient::subhalo(self, snapshot, id)
    }

    fn fetch_cutout(
        &self,
        subhalo: &SubhaloDetail,
        dest_dir: &Utf8Path,
    ) -> Result<Utf8PathBuf, MondError> {
        self.download(
            &subhalo.cutouts.subhalo,
            &[("gas", CUTOUT_FIELDS), ("stars", CUTOUT_FIELDS)],
            dest_dir,
        )
    }
}

/// Convert one species of a cutout to physical units relative to `subhalo`.
///
/// Arguments
/// -----------------
/// * `raw` – Particles in code units.
/// * `subhalo` – Owner subhalo (position and bulk velocity).
/// * `scale_factor` – `a = 1/(1+z)` of the snapshot.
/// * `hubble_param` – `h`.
/// * `kind` – Species tag written in the `type` column.
///
/// Return
/// ----------
/// * The converted rows, or [`MondError::ParticleColumnLength`] if the three raw columns
///   differ in length.
pub fn physical_particles(
    raw: &RawParticles,
    subhalo: &SubhaloDetail,
    scale_factor: f64,
    hubble_param: f64,
    kind: ParticleType,
) -> Result<ParticleTable, MondError> {
    let n = raw.masses.len();
    if raw.coordinates.len() != n || raw.velocities.len() != n {
        return Err(MondError::ParticleColumnLength(format!(
            "Coordinates={}, Velocities={}, Masses={}",
            raw.coordinates.len(),
            raw.velocities.len(),
            n
        )));
    }

    let center = subhalo.position();
    let bulk = subhalo.velocity();
    let length_factor = scale_factor / hubble_param;
    let mass_factor = ILLUSTRIS_MASS_UNIT / hubble_param;
    let sqrt_a = scale_factor.sqrt();

    let r = raw
        .coordinates
        .iter()
        .map(|x| (x - center).norm() * length_factor)
        .collect();
    let v = raw
        .velocities
        .iter()
        .map(|u| (u * sqrt_a - bulk).norm())
        .collect();
    let mass = raw.masses.iter().map(|m| m * mass_factor).collect();

    ParticleTable::from_columns(r, mass, v, vec![kind; n])
}

/// Gas rows followed by star rows of one cutout, in physical units.
pub fn cutout_to_table(
    cutout: &DecodedCutout,
    subhalo: &SubhaloDetail,
    scale_factor: f64,
    hubble_param: f64,
) -> Result<ParticleTable, MondError> {
    let mut table = physical_particles(
        &cutout.gas,
        subhalo,
        scale_factor,
        hubble_param,
        ParticleType::Gas,
    )?;
    table.append(physical_particles(
        &cutout.stars,
        subhalo,
        scale_factor,
        hubble_param,
        ParticleType::Star,
    )?);
    Ok(table)
}

/// Save the particle table of every subhalo above the mass cut, then the manifest.
///
/// Subhalos `0..count` of the selected snapshot are visited in order; those with
/// `mass > hubble_param · mass_cut` get their cutout downloaded into `save_dir`, decoded,
/// converted and written as `<Simulation>_<z=..|snapnum=..>_subhalo<ID>.parquet.snappy`.
/// The downloaded cutout is removed afterwards.
///
/// Arguments
/// -----------------
/// * `catalog` – Metadata and cutout source, usually an [`IllustrisClient`].
/// * `decoder` – Cutout file reader.
/// * `simulation` – Simulation name, or `n` for `Illustris-n`.
/// * `save_dir` – Existing output directory.
/// * `query` – Snapshot selector; `None` fails with [`MondError::MissingSnapshotSelector`].
///
/// Return
/// ----------
/// * Path of the written manifest (`<save_dir>/subhalo_list.parquet`).
pub fn save_halos<C, D>(
    catalog: &C,
    decoder: &D,
    simulation: impl Into<SimulationName>,
    save_dir: &Utf8Path,
    query: Option<SnapshotQuery>,
) -> Result<Utf8PathBuf, MondError>
where
    C: SubhaloCatalog + ?Sized,
    D: CutoutDecoder + ?Sized,
{
    let query = query.ok_or(MondError::MissingSnapshotSelector)?;
    let simulation = simulation.into();
    let config = catalog.config();
    let hubble_param = config.hubble_param;
    let threshold = config.mass_threshold();

    let snapshot = catalog.snapshot(&simulation, query)?;
    let scale_factor = snapshot.scale_factor();
    let base = format!("{simulation}_{}_", query.label());
    info!(
        simulation = %simulation,
        snapshot = snapshot.number,
        redshift = snapshot.redshift,
        subhalos = snapshot.count,
        save_dir = %save_dir,
        "ingesting snapshot"
    );

    let mut file_names = Vec::new();
    for id in 0..snapshot.count {
        let subhalo = catalog.subhalo(&snapshot, id)?;
        if !(subhalo.mass > threshold) {
            debug!(subhalo = id, mass = subhalo.mass, threshold, "below mass cut");
            continue;
        }

        let cutout_path = catalog.fetch_cutout(&subhalo, save_dir)?;
        let table = decoder
            .decode(&cutout_path)
            .and_then(|cutout| cutout_to_table(&cutout, &subhalo, scale_factor, hubble_param));
        std::fs::remove_file(&cutout_path)?;
        let table = table?;

        let file_name = subhalo_file_name(&base, id);
        table.write_parquet(&save_dir.join(&file_name))?;
        debug!(subhalo = id, particles = table.len(), file = %file_name, "particle table saved");
        file_names.push(file_name);
    }

    if file_names.is_empty() {
        warn!(simulation = %simulation, threshold, "no subhalo above the mass cut");
    }

    let manifest = save_dir.join(MANIFEST_FILE_NAME);
    write_manifest(&file_names, &manifest)?;
    info!(manifest = %manifest, subhalos = file_names.len(), "snapshot ingested");
    Ok(manifest)
}
