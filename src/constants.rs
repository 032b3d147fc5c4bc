//! # Constants and type definitions for mond-profile
//!
//! This module centralizes the **physical constants**, **unit conventions**, and **common type
//! definitions** shared by the dataset readers, the profile engine and the ingestion path.
//!
//! ## Overview
//!
//! - Gravitational constant in the galactic unit system used by the particle tables
//! - Unit conversions applied when turning Illustris code units into physical units
//! - Naming conventions of the on-disk dataset (marker token, extensions, manifest name)
//! - Core type aliases
//!
//! ## Units
//!
//! | Quantity | Unit |
//! |----------|------|
//! | radius   | kpc (physical) |
//! | mass     | M_sun |
//! | velocity | km/s |
//! | acceleration | km² / (kpc · s²) |

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Newtonian gravitational constant in km² · kpc / (M_sun · s²)
pub const GRAV_CONSTANT: f64 = 4.301e-6;

/// Illustris mass code unit → M_sun (before dividing by the Hubble parameter)
pub const ILLUSTRIS_MASS_UNIT: f64 = 1.0e10;

/// Default subhalo mass cut (code units), scaled by the Hubble parameter at ingestion time
pub const DEFAULT_MASS_CUT: f64 = 1.0e-5;

/// Default dimensionless Hubble parameter of the Illustris runs
pub const DEFAULT_HUBBLE_PARAM: f64 = 0.704;

/// Root of the public Illustris web API
pub const ILLUSTRIS_API_URL: &str = "http://www.illustris-project.org/api/";

// -------------------------------------------------------------------------------------------------
// Dataset naming conventions
// -------------------------------------------------------------------------------------------------

/// Token preceding the subhalo ID in every particle table file name
pub const SUBHALO_MARKER: &str = "subhalo";

/// Two-part extension of particle table files (`<format>.<compression>`)
pub const PARTICLE_TABLE_EXTENSION: &str = "parquet.snappy";

/// File name of the manifest written by the ingestion routine
pub const MANIFEST_FILE_NAME: &str = "subhalo_list.parquet";

/// Name of the single column of a Parquet manifest
pub const MANIFEST_COLUMN: &str = "file_name";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Distance in kiloparsecs
pub type Kpc = f64;
/// Mass in solar masses
pub type SolarMass = f64;
/// Speed in km/s
pub type KmPerSec = f64;
/// Acceleration in km² / (kpc · s²)
pub type Acceleration = f64;

/// Identifier of a subhalo inside one simulation snapshot
pub type SubhaloId = u64;
