#![allow(dead_code)]

use std::{fs::File, sync::Arc};

use arrow_array::{ArrayRef, Float64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use camino::{Utf8Path, Utf8PathBuf};
use mond_profile::{
    manifest::{subhalo_file_name, write_manifest},
    particles::{Particle, ParticleTable, ParticleType},
};
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

pub const FILE_BASE: &str = "Illustris-1_z=0.0_";

/// A dataset directory that lives as long as the value.
pub struct Dataset {
    _dir: TempDir,
    pub root: Utf8PathBuf,
    pub manifest: Utf8PathBuf,
}

/// Write one particle table per `(id, table)` in `subhalos` and a Parquet manifest listing
/// them in the given order.
pub fn write_dataset(subhalos: &[(u64, ParticleTable)]) -> Dataset {
    write_dataset_with_manifest(subhalos, "subhalo_list.parquet")
}

/// Same as [`write_dataset`] with a custom manifest name (`.txt` gives a plain-text manifest).
pub fn write_dataset_with_manifest(subhalos: &[(u64, ParticleTable)], manifest_name: &str) -> Dataset {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap().to_path_buf();

    let mut names = Vec::with_capacity(subhalos.len());
    for (id, table) in subhalos {
        let name = subhalo_file_name(FILE_BASE, *id);
        table.write_parquet(&root.join(&name)).unwrap();
        names.push(name);
    }

    let manifest = root.join(manifest_name);
    write_manifest(&names, &manifest).unwrap();

    Dataset {
        _dir: dir,
        root,
        manifest,
    }
}

pub fn table(rows: &[(f64, f64, f64)]) -> ParticleTable {
    rows.iter()
        .enumerate()
        .map(|(i, &(r, m, v))| {
            let kind = if i % 2 == 0 {
                ParticleType::Gas
            } else {
                ParticleType::Star
            };
            Particle::new(r, m, v, kind)
        })
        .collect()
}

/// Subhalo 5: `r = [1, 2, 3]`, `v = [10, 20, 30]`, `M = 1e8` each.
pub fn subhalo_5() -> ParticleTable {
    table(&[(1.0, 1e8, 10.0), (2.0, 1e8, 20.0), (3.0, 1e8, 30.0)])
}

/// Subhalo 9: a wider, heavier disc.
pub fn subhalo_9() -> ParticleTable {
    table(&[
        (0.5, 5e8, 40.0),
        (1.2, 2e8, 60.0),
        (2.5, 1e9, 80.0),
        (4.0, 3e8, 90.0),
        (7.5, 1e8, 95.0),
    ])
}

/// The two-subhalo dataset, manifest order `[5, 9]`.
pub fn two_subhalos() -> Dataset {
    write_dataset(&[(5, subhalo_5()), (9, subhalo_9())])
}

/// Nullable columns of a particle file, written as-is (no [`ParticleTable`] round trip).
pub struct RawColumns {
    pub r: Vec<Option<f64>>,
    pub mass: Vec<Option<f64>>,
    pub v: Vec<Option<f64>>,
    pub kind: Vec<Option<&'static str>>,
}

/// Single-subhalo dataset whose particle file holds exactly `columns`.
pub fn write_raw_dataset(id: u64, columns: RawColumns) -> Dataset {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8Path::from_path(dir.path()).unwrap().to_path_buf();

    let schema = Arc::new(Schema::new(vec![
        Field::new("r", DataType::Float64, true),
        Field::new("M", DataType::Float64, true),
        Field::new("v", DataType::Float64, true),
        Field::new("type", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(columns.r)) as ArrayRef,
            Arc::new(Float64Array::from(columns.mass)),
            Arc::new(Float64Array::from(columns.v)),
            Arc::new(StringArray::from(columns.kind)),
        ],
    )
    .unwrap();

    let name = subhalo_file_name(FILE_BASE, id);
    let file = File::create(root.join(&name)).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let manifest = root.join("subhalo_list.parquet");
    write_manifest(&[name], &manifest).unwrap();

    Dataset {
        _dir: dir,
        root,
        manifest,
    }
}
