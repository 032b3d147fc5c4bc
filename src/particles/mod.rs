//! # Per-subhalo particle tables
//!
//! A [`ParticleTable`] holds the gas and star particles of one subhalo, already converted to
//! physical units (see [`crate::constants`]). It is stored column-wise, mirroring the on-disk
//! Parquet layout:
//!
//! | column | Arrow type | meaning |
//! |--------|------------|---------|
//! | `r`    | `Float64`  | galactocentric radius (kpc) |
//! | `M`    | `Float64`  | particle mass (M_sun) |
//! | `v`    | `Float64`  | speed relative to the subhalo bulk velocity (km/s) |
//! | `type` | `Utf8`     | species tag, `"gas"` or `"star"` when written by ingestion |
//!
//! The `type` column is carried verbatim and never read by the acceleration models, so tags
//! other than `gas`/`star` are kept as [`ParticleType::Other`].
//!
//! Rows carry no ordering guarantee. Consumers that need radius order build their own sorted
//! view (see [`crate::profile::radial_shells`]).
//!
//! Modules
//! -----------------
//! * [`parquet_reader`] – Column-projected Parquet ingestion.
//! * [`parquet_writer`] – Snappy-compressed Parquet output.
use std::{convert::Infallible, fmt, str::FromStr};

use camino::Utf8Path;

use crate::{
    constants::{Kpc, KmPerSec, SolarMass},
    mond_errors::MondError,
};

pub mod parquet_reader;
pub mod parquet_writer;

pub use parquet_writer::write_particle_table;

/// Column holding the galactocentric radius
pub const RADIUS_COLUMN: &str = "r";
/// Column holding the particle mass
pub const MASS_COLUMN: &str = "M";
/// Column holding the particle speed
pub const SPEED_COLUMN: &str = "v";
/// Column holding the particle species tag
pub const TYPE_COLUMN: &str = "type";

/// Species of a baryonic particle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParticleType {
    /// Illustris `PartType0`
    Gas,
    /// Illustris `PartType4`
    Star,
    /// Any other tag found in a particle file, kept as written (a null tag reads as `""`).
    Other(String),
}

impl ParticleType {
    pub fn as_str(&self) -> &str {
        match self {
            ParticleType::Gas => "gas",
            ParticleType::Star => "star",
            ParticleType::Other(tag) => tag,
        }
    }
}

impl From<&str> for ParticleType {
    fn from(tag: &str) -> Self {
        match tag {
            "gas" => ParticleType::Gas,
            "star" => ParticleType::Star,
            other => ParticleType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ParticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticleType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ParticleType::from(s))
    }
}

/// One row of a [`ParticleTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub r: Kpc,
    pub mass: SolarMass,
    pub v: KmPerSec,
    pub kind: ParticleType,
}

impl Particle {
    pub fn new(r: Kpc, mass: SolarMass, v: KmPerSec, kind: ParticleType) -> Self {
        Particle { r, mass, v, kind }
    }
}

/// Column-oriented particle table of a single subhalo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleTable {
    r: Vec<Kpc>,
    mass: Vec<SolarMass>,
    v: Vec<KmPerSec>,
    kind: Vec<ParticleType>,
}

impl ParticleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ParticleTable {
            r: Vec::with_capacity(capacity),
            mass: Vec::with_capacity(capacity),
            v: Vec::with_capacity(capacity),
            kind: Vec::with_capacity(capacity),
        }
    }

    /// Build a table from already materialized columns.
    ///
    /// Arguments
    /// -----------------
    /// * `r`, `mass`, `v`, `kind`: the four columns, all of the same length.
    ///
    /// Return
    /// ----------
    /// * The table, or [`MondError::ParticleColumnLength`] when the lengths differ.
    pub fn from_columns(
        r: Vec<Kpc>,
        mass: Vec<SolarMass>,
        v: Vec<KmPerSec>,
        kind: Vec<ParticleType>,
    ) -> Result<Self, MondError> {
        let n = r.len();
        if mass.len() != n || v.len() != n || kind.len() != n {
            return Err(MondError::ParticleColumnLength(format!(
                "r={}, M={}, v={}, type={}",
                n,
                mass.len(),
                v.len(),
                kind.len()
            )));
        }
        Ok(ParticleTable { r, mass, v, kind })
    }

    pub fn push(&mut self, particle: Particle) {
        self.r.push(particle.r);
        self.mass.push(particle.mass);
        self.v.push(particle.v);
        self.kind.push(particle.kind);
    }

    /// Append every row of `other`, keeping its order after the existing rows.
    pub fn append(&mut self, mut other: ParticleTable) {
        self.r.append(&mut other.r);
        self.mass.append(&mut other.mass);
        self.v.append(&mut other.v);
        self.kind.append(&mut other.kind);
    }

    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    pub fn radii(&self) -> &[Kpc] {
        &self.r
    }

    pub fn masses(&self) -> &[SolarMass] {
        &self.mass
    }

    pub fn speeds(&self) -> &[KmPerSec] {
        &self.v
    }

    pub fn kinds(&self) -> &[ParticleType] {
        &self.kind
    }

    /// Row `index`, if present.
    pub fn get(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            r: *self.r.get(index)?,
            mass: self.mass[index],
            v: self.v[index],
            kind: self.kind[index].clone(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        (0..self.len()).map(|i| Particle {
            r: self.r[i],
            mass: self.mass[i],
            v: self.v[i],
            kind: self.kind[i].clone(),
        })
    }

    /// Number of particles of the given species.
    pub fn count_of(&self, kind: &ParticleType) -> usize {
        self.kind.iter().filter(|k| *k == kind).count()
    }

    /// Total mass of the table (M_sun), skipping NaN masses.
    pub fn total_mass(&self) -> SolarMass {
        self.mass.iter().filter(|m| !m.is_nan()).sum()
    }

    /// Load a table from a Parquet particle file.
    ///
    /// See [`parquet_reader::read_particle_table`] for the schema and null-handling policy.
    pub fn from_parquet(path: &Utf8Path) -> Result<Self, MondError> {
        parquet_reader::read_particle_table(path, None)
    }

    /// Persist the table as a Snappy-compressed Parquet file.
    pub fn write_parquet(&self, path: &Utf8Path) -> Result<(), MondError> {
        write_particle_table(self, path)
    }
}

impl FromIterator<Particle> for ParticleTable {
    fn from_iter<I: IntoIterator<Item = Particle>>(iter: I) -> Self {
        let mut table = ParticleTable::new();
        for particle in iter {
            table.push(particle);
        }
        table
    }
}
