//! Observed and baryonic radial acceleration profiles of simulated galaxies.
//!
//! A dataset is a directory of per-subhalo particle tables plus a manifest ([`manifest`]).
//! [`profile::calc_gobs`] and [`profile::calc_gbar`] turn it into dense
//! (radius × subhalo) [`profile::AccelerationTable`]s; [`ingest::save_halos`] builds such a
//! dataset from the Illustris web API.
pub mod config;
pub mod constants;
pub mod illustris;
pub mod ingest;
pub mod manifest;
pub mod mond_errors;
pub mod particles;
pub mod profile;

pub use config::IllustrisConfig;
pub use mond_errors::MondError;
pub use profile::{calc_gbar, calc_gobs, AccelerationTable};
