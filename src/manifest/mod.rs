//! # Dataset manifest and subhalo resolution
//!
//! A snapshot dataset on disk is a directory holding one Parquet particle file per subhalo and
//! a **manifest** listing those files in order:
//!
//! ```text
//! snapshot_dir/
//! ├── subhalo_list.parquet                        (manifest)
//! ├── Illustris-1_z=0.0_subhalo0.parquet.snappy
//! ├── Illustris-1_z=0.0_subhalo5.parquet.snappy
//! └── ...
//! ```
//!
//! [`Manifest::load`] reads the list, extracts each entry's subhalo ID and the shared file-name
//! base, and checks the dataset invariants:
//!
//! * every entry carries a parseable ID ([`file_name::parse_subhalo_id`]),
//! * every entry shares the base of the first entry,
//! * IDs are unique.
//!
//! [`Manifest::resolve`] then turns an optional ID selection into ordered
//! [`ResolvedSubhalo`]s (ID + particle file path), failing as a whole if any requested ID is
//! unknown. Resolution never touches the particle files themselves.
//!
//! An empty manifest is valid (ingestion writes one when no subhalo passes the mass cut). Its
//! base is `""` and it resolves to no subhalo.
//!
//! ## See also
//! ------------
//! * [`manifest_io`] – Parquet / plain-text manifest layouts.
//! * [`crate::profile`] – Consumer of the resolved pairs.
use std::collections::{HashMap, HashSet};

use ahash::RandomState;
use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use tracing::{debug, warn};

use crate::{constants::SubhaloId, mond_errors::MondError};

pub mod file_name;
pub mod manifest_io;

pub use file_name::{file_name_base, parse_subhalo_id, subhalo_file_name};
pub use manifest_io::write_manifest;

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

/// One manifest line with its decoded subhalo ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: SubhaloId,
    pub file_name: String,
}

/// A requested subhalo paired with the particle file that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSubhalo {
    pub id: SubhaloId,
    pub path: Utf8PathBuf,
}

/// In-memory view of a snapshot manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    location: Utf8PathBuf,
    directory: Utf8PathBuf,
    file_base: String,
    entries: Vec<ManifestEntry>,
    index: FastHashMap<SubhaloId, usize>,
}

impl Manifest {
    /// Read and validate the manifest stored at `location`.
    ///
    /// Arguments
    /// -----------------
    /// * `location` – Path to the manifest file. Particle files are looked up in the same
    ///   directory.
    ///
    /// Return
    /// ----------
    /// * The validated [`Manifest`], or a [`MondError`] if the file cannot be read or violates
    ///   one of the dataset invariants.
    pub fn load(location: &Utf8Path) -> Result<Self, MondError> {
        let names = manifest_io::read_manifest_entries(location)?;
        let manifest = Self::from_file_names(location, names)?;
        debug!(
            manifest = %location,
            entries = manifest.len(),
            base = %manifest.file_base,
            "manifest loaded"
        );
        Ok(manifest)
    }

    /// Build a manifest from already loaded file names.
    ///
    /// `location` only anchors the directory used to build particle file paths; nothing is
    /// read from disk.
    pub fn from_file_names<I, S>(location: &Utf8Path, names: I) -> Result<Self, MondError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let file_base = match names.first() {
            Some(first) => file_name_base(first)?.to_string(),
            None => String::new(),
        };

        let mut index = FastHashMap::with_capacity_and_hasher(names.len(), RandomState::default());
        let mut entries = Vec::with_capacity(names.len());

        for file_name in names {
            if file_name_base(&file_name)? != file_base {
                return Err(MondError::InconsistentFileBase {
                    entry: file_name,
                    expected: file_base,
                });
            }
            let id = parse_subhalo_id(&file_name)?;
            if index.insert(id, entries.len()).is_some() {
                return Err(MondError::DuplicateSubhaloId(id));
            }
            entries.push(ManifestEntry { id, file_name });
        }

        let directory = location
            .parent()
            .map(Utf8Path::to_path_buf)
            .unwrap_or_default();

        Ok(Manifest {
            location: location.to_path_buf(),
            directory,
            file_base,
            entries,
            index,
        })
    }

    pub fn location(&self) -> &Utf8Path {
        &self.location
    }

    /// Directory the particle files are resolved against.
    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }

    /// Text preceding the `subhalo` marker, common to every entry (`""` for an empty manifest).
    pub fn file_base(&self) -> &str {
        &self.file_base
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subhalo IDs in manifest order.
    pub fn ids(&self) -> impl Iterator<Item = SubhaloId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn contains(&self, id: SubhaloId) -> bool {
        self.index.contains_key(&id)
    }

    /// Full path of the particle file holding subhalo `id`.
    pub fn path_of(&self, id: SubhaloId) -> Option<Utf8PathBuf> {
        self.index
            .get(&id)
            .map(|&i| self.directory.join(&self.entries[i].file_name))
    }

    /// Resolve a subhalo selection into ordered `(id, path)` pairs.
    ///
    /// Arguments
    /// -----------------
    /// * `requested` – `None` selects every subhalo in manifest order. `Some(ids)` keeps the
    ///   given order; repeated IDs are collapsed to their first occurrence.
    ///
    /// Return
    /// ----------
    /// * The resolved pairs, or [`MondError::SubhaloNotFound`] if any requested ID is absent
    ///   from the manifest (no partial result).
    pub fn resolve(
        &self,
        requested: Option<&[SubhaloId]>,
    ) -> Result<Vec<ResolvedSubhalo>, MondError> {
        let Some(requested) = requested else {
            return Ok(self
                .entries
                .iter()
                .map(|e| ResolvedSubhalo {
                    id: e.id,
                    path: self.directory.join(&e.file_name),
                })
                .collect());
        };

        let missing: Vec<SubhaloId> = requested
            .iter()
            .copied()
            .filter(|id| !self.contains(*id))
            .unique()
            .collect();
        if !missing.is_empty() {
            warn!(
                manifest = %self.location,
                missing = %missing.iter().join(","),
                "requested subhalos absent from manifest"
            );
            return Err(MondError::SubhaloNotFound(self.location.to_string()));
        }

        let mut seen: HashSet<SubhaloId, RandomState> =
            HashSet::with_capacity_and_hasher(requested.len(), RandomState::default());
        Ok(requested
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .map(|id| ResolvedSubhalo {
                id,
                path: self.directory.join(&self.entries[self.index[&id]].file_name),
            })
            .collect())
    }
}

/// Load the manifest at `location` and resolve `requested` against it.
///
/// Convenience wrapper around [`Manifest::load`] + [`Manifest::resolve`].
pub fn resolve(
    location: &Utf8Path,
    requested: Option<&[SubhaloId]>,
) -> Result<Vec<ResolvedSubhalo>, MondError> {
    Manifest::load(location)?.resolve(requested)
}
