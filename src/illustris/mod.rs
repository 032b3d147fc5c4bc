//! # Illustris web API access
//!
//! Minimal client of the [Illustris API](http://www.illustris-project.org/data/docs/api/) used by
//! [`crate::ingest::save_halos`] to walk a snapshot and fetch particle cutouts.
//!
//! ```text
//! <base_url>                      SimulationIndex
//! └── <simulation url>            Simulation
//!     └── <snapshots>             [SnapshotEntry]
//!         ├── z=<z>/              Snapshot (closest to z)
//!         └── <number>/           Snapshot
//!             └── subhalos/<id>/  SubhaloDetail ── cutouts.subhalo (binary)
//! ```
//!
//! Modules
//! -----------------
//! * [`api`] – Serde records of the pages above, simulation and snapshot selectors.
//! * [`client`] – [`IllustrisClient`]: authenticated JSON requests and cutout downloads.
//! * [`download`] – Streaming binary download and `content-disposition` parsing.
pub mod api;
pub mod client;
pub mod download;

pub use api::{SimulationName, SnapshotQuery};
pub use client::IllustrisClient;
