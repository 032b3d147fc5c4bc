//! Manifest storage formats.
//!
//! Two layouts are understood, selected by the manifest's extension:
//!
//! * **Parquet** (`*.parquet`): one non-null `Utf8` column named `file_name`.
//! * **Plain text** (anything else): one file name per line; blank lines are ignored and
//!   surrounding whitespace is trimmed.
//!
//! The ingestion routine always writes the Parquet flavour
//! ([`MANIFEST_FILE_NAME`](crate::constants::MANIFEST_FILE_NAME)); the text flavour exists
//! for hand-assembled datasets.
use std::{fs::File, sync::Arc};

use arrow_array::{Array, ArrayRef, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use camino::Utf8Path;
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    basic::Compression,
    file::properties::WriterProperties,
};

use crate::{constants::MANIFEST_COLUMN, mond_errors::MondError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ManifestFormat {
    Parquet,
    Text,
}

impl ManifestFormat {
    pub(crate) fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => ManifestFormat::Parquet,
            _ => ManifestFormat::Text,
        }
    }
}

fn read_parquet_entries(path: &Utf8Path) -> Result<Vec<String>, MondError> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut entries = Vec::new();
    for maybe_batch in reader {
        let batch = maybe_batch?;
        let names = batch
            .column_by_name(MANIFEST_COLUMN)
            .ok_or_else(|| MondError::MissingColumn(MANIFEST_COLUMN.to_string()))?
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| MondError::InvalidColumnType {
                column: MANIFEST_COLUMN.to_string(),
                expected: "Utf8",
            })?;
        if names.null_count() > 0 {
            return Err(MondError::InvalidManifestEntry(format!(
                "{path}: null file name in column '{MANIFEST_COLUMN}'"
            )));
        }
        entries.extend(names.iter().flatten().map(str::to_string));
    }
    Ok(entries)
}

fn read_text_entries(path: &Utf8Path) -> Result<Vec<String>, MondError> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Read the ordered list of particle file names stored in a manifest.
pub(crate) fn read_manifest_entries(path: &Utf8Path) -> Result<Vec<String>, MondError> {
    match ManifestFormat::from_path(path) {
        ManifestFormat::Parquet => read_parquet_entries(path),
        ManifestFormat::Text => read_text_entries(path),
    }
}

/// Persist an ordered list of particle file names as a manifest.
///
/// Arguments
/// -----------------
/// * `file_names` – Entries in the order consumers should see them.
/// * `path` – Destination; `*.parquet` selects the Parquet layout, any other extension the
///   plain-text layout.
///
/// Return
/// ----------
/// * `Ok(())`, or a [`MondError`] on I/O / encoding failures.
pub fn write_manifest<S: AsRef<str>>(file_names: &[S], path: &Utf8Path) -> Result<(), MondError> {
    match ManifestFormat::from_path(path) {
        ManifestFormat::Parquet => {
            let schema = Arc::new(Schema::new(vec![Field::new(
                MANIFEST_COLUMN,
                DataType::Utf8,
                false,
            )]));
            let names: ArrayRef = Arc::new(StringArray::from_iter_values(
                file_names.iter().map(|s| s.as_ref()),
            ));
            let batch = RecordBatch::try_new(schema.clone(), vec![names])?;

            let props = WriterProperties::builder()
                .set_compression(Compression::SNAPPY)
                .build();
            let mut writer = ArrowWriter::try_new(File::create(path)?, schema, Some(props))?;
            writer.write(&batch)?;
            writer.close()?;
        }
        ManifestFormat::Text => {
            let mut content = String::new();
            for name in file_names {
                content.push_str(name.as_ref());
                content.push('\n');
            }
            std::fs::write(path, content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod manifest_io_test {
    use camino::Utf8PathBuf;

    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ManifestFormat::from_path(Utf8Path::new("snap/subhalo_list.parquet")),
            ManifestFormat::Parquet
        );
        assert_eq!(
            ManifestFormat::from_path(Utf8Path::new("snap/subhalo_list.txt")),
            ManifestFormat::Text
        );
    }

    #[test]
    fn test_both_layouts_preserve_order() {
        let dir = tempfile::tempdir().unwrap();
        let names = [
            "A_z=0_subhalo9.parquet.snappy",
            "A_z=0_subhalo5.parquet.snappy",
            "A_z=0_subhalo12.parquet.snappy",
        ];

        for file in ["list.parquet", "list.txt"] {
            let path = Utf8PathBuf::from_path_buf(dir.path().join(file)).unwrap();
            write_manifest(&names, &path).unwrap();
            assert_eq!(read_manifest_entries(&path).unwrap(), names);
        }
    }

    #[test]
    fn test_text_layout_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("list.txt")).unwrap();
        std::fs::write(&path, "  a_subhalo1.parquet.snappy \n\n b_subhalo2.parquet.snappy\n")
            .unwrap();
        assert_eq!(
            read_manifest_entries(&path).unwrap(),
            vec!["a_subhalo1.parquet.snappy", "b_subhalo2.parquet.snappy"]
        );
    }
}
