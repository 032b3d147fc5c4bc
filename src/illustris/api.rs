//! JSON records of the Illustris web API, limited to the fields the ingestion path reads.
//!
//! Unknown fields are ignored so the records stay valid as the API grows.
use std::{fmt, str::FromStr};

use nalgebra::Vector3;
use serde::Deserialize;

use crate::constants::SubhaloId;

/// API root: `GET <base_url>`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationIndex {
    pub simulations: Vec<SimulationEntry>,
}

impl SimulationIndex {
    /// Entry whose name matches `name` exactly.
    pub fn find(&self, name: &str) -> Option<&SimulationEntry> {
        self.simulations.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationEntry {
    pub name: String,
    #[serde(default)]
    pub num_snapshots: u32,
    pub url: String,
}

/// Simulation detail page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Simulation {
    pub name: String,
    /// URL of the snapshot list.
    pub snapshots: String,
}

/// One item of a simulation's snapshot list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SnapshotEntry {
    pub number: u32,
    pub redshift: f64,
    pub url: String,
}

/// Snapshot detail page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Snapshot {
    pub number: u32,
    pub redshift: f64,
    /// URL prefix of the subhalo pages; subhalo `i` lives at `<subhalos><i>/`.
    pub subhalos: String,
    /// Number of subhalos in the snapshot.
    #[serde(alias = "num_groups_subfind")]
    pub count: u64,
}

impl Snapshot {
    /// Cosmological scale factor `a = 1 / (1 + z)`.
    pub fn scale_factor(&self) -> f64 {
        1.0 / (1.0 + self.redshift)
    }

    pub fn subhalo_url(&self, id: SubhaloId) -> String {
        format!("{}{}/", self.subhalos, id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubhaloCutouts {
    /// Particle cutout of the subhalo itself.
    pub subhalo: String,
}

/// Subhalo detail page. Positions are comoving ckpc/h, velocities peculiar km/s.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubhaloDetail {
    pub id: SubhaloId,
    /// Total mass in code units (1e10 M_sun / h).
    pub mass: f64,
    pub pos_x: f64,
    pub pos_y: f64,
    pub pos_z: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub vel_z: f64,
    pub cutouts: SubhaloCutouts,
}

impl SubhaloDetail {
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.pos_x, self.pos_y, self.pos_z)
    }

    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.vel_x, self.vel_y, self.vel_z)
    }
}

/// Name of an Illustris run. A bare integer `n` stands for `Illustris-n`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationName(String);

impl SimulationName {
    pub fn new(name: impl Into<String>) -> Self {
        SimulationName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u32> for SimulationName {
    fn from(n: u32) -> Self {
        SimulationName(format!("Illustris-{n}"))
    }
}

impl From<&str> for SimulationName {
    fn from(name: &str) -> Self {
        match name.trim().parse::<u32>() {
            Ok(n) => n.into(),
            Err(_) => SimulationName(name.to_string()),
        }
    }
}

impl FromStr for SimulationName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl fmt::Display for SimulationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot selector. When both are known, prefer the redshift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapshotQuery {
    /// Closest snapshot to redshift `z`.
    Redshift(f64),
    /// Exact snapshot number, validated against the simulation's list.
    Number(u32),
}

impl SnapshotQuery {
    /// Build a selector from optional inputs; the redshift wins when both are given.
    pub fn from_options(z: Option<f64>, snapnum: Option<u32>) -> Option<Self> {
        match (z, snapnum) {
            (Some(z), _) => Some(SnapshotQuery::Redshift(z)),
            (None, Some(n)) => Some(SnapshotQuery::Number(n)),
            (None, None) => None,
        }
    }

    /// `z=<z>` or `snapnum=<n>`, as used in particle table file names.
    pub fn label(&self) -> String {
        match self {
            SnapshotQuery::Redshift(z) => format!("z={z:?}"),
            SnapshotQuery::Number(n) => format!("snapnum={n}"),
        }
    }
}
