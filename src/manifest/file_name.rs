//! File-name conventions of the per-subhalo particle files.
//!
//! Every particle file is named `<base>subhalo<ID>.<format>.<compression>`, e.g.
//! `Illustris-1_z=0.0_subhalo1030.parquet.snappy`. The subhalo ID is the decimal text between
//! the first `subhalo` marker and the two trailing extensions; the base is everything before
//! the marker.
use crate::{
    constants::{SubhaloId, PARTICLE_TABLE_EXTENSION, SUBHALO_MARKER},
    mond_errors::MondError,
};

/// Drop the last extension of `name`, if any.
///
/// A dot that only starts the name (hidden-file style, `".cache"`) is not an extension.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => &name[..idx],
        _ => name,
    }
}

/// Remove the two-part extension (`.parquet.snappy`) from a file name.
pub(crate) fn file_stem(name: &str) -> &str {
    strip_extension(strip_extension(name))
}

fn split_marker(name: &str) -> Result<(&str, &str), MondError> {
    file_stem(name).split_once(SUBHALO_MARKER).ok_or_else(|| {
        MondError::InvalidManifestEntry(format!("{name}: missing '{SUBHALO_MARKER}' marker"))
    })
}

/// Extract the subhalo ID embedded in a particle file name.
///
/// Arguments
/// -----------------
/// * `name`: a manifest entry such as `"Illustris-1_z=0.0_subhalo42.parquet.snappy"`.
///
/// Return
/// ----------
/// * The ID (`42`), or [`MondError::InvalidManifestEntry`] when the marker is absent or the
///   trailing part is not a decimal integer.
pub fn parse_subhalo_id(name: &str) -> Result<SubhaloId, MondError> {
    let (_, id) = split_marker(name)?;
    id.parse::<SubhaloId>().map_err(|e| {
        MondError::InvalidManifestEntry(format!("{name}: subhalo ID '{id}' is not an integer ({e})"))
    })
}

/// Text preceding the subhalo marker, shared by every entry of one manifest.
pub fn file_name_base(name: &str) -> Result<&str, MondError> {
    split_marker(name).map(|(base, _)| base)
}

/// Build the particle file name of subhalo `id` for a given base.
///
/// ```
/// use mond_profile::manifest::subhalo_file_name;
/// assert_eq!(
///     subhalo_file_name("Illustris-1_snapnum=135_", 7),
///     "Illustris-1_snapnum=135_subhalo7.parquet.snappy"
/// );
/// ```
pub fn subhalo_file_name(base: &str, id: SubhaloId) -> String {
    format!("{base}{SUBHALO_MARKER}{id}.{PARTICLE_TABLE_EXTENSION}")
}

#[cfg(test)]
mod file_name_test {
    use super::*;

    #[test]
    fn test_parse_id_and_base() {
        let name = "Illustris-1_z=0.0_subhalo1030.parquet.snappy";
        assert_eq!(parse_subhalo_id(name).unwrap(), 1030);
        assert_eq!(file_name_base(name).unwrap(), "Illustris-1_z=0.0_");

        // Dots inside the base do not confuse the double-extension strip.
        let name = "Illustris-3_z=0.5_subhalo7.pickle.gz";
        assert_eq!(parse_subhalo_id(name).unwrap(), 7);
        assert_eq!(file_name_base(name).unwrap(), "Illustris-3_z=0.5_");
    }

    #[test]
    fn test_marker_split_is_first_occurrence() {
        let name = "subhalo_run_subhalo12.parquet.snappy";
        assert_eq!(file_name_base(name).unwrap(), "");
        assert!(parse_subhalo_id(name).is_err());
    }

    #[test]
    fn test_invalid_entries() {
        assert!(matches!(
            parse_subhalo_id("halo12.parquet.snappy"),
            Err(MondError::InvalidManifestEntry(_))
        ));
        assert!(matches!(
            parse_subhalo_id("x_subhalo12a.parquet.snappy"),
            Err(MondError::InvalidManifestEntry(_))
        ));
    }

    #[test]
    fn test_round_trip_name() {
        let name = subhalo_file_name("TNG100_z=1.0_", 99);
        assert_eq!(parse_subhalo_id(&name).unwrap(), 99);
        assert_eq!(file_name_base(&name).unwrap(), "TNG100_z=1.0_");
        assert_eq!(file_stem(".hidden"), ".hidden");
    }
}
