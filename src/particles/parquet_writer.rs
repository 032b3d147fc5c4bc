//! Snappy-compressed Parquet output for [`ParticleTable`]s.
//!
//! This is the producer side of the particle-file contract read by
//! [`read_particle_table`](super::parquet_reader::read_particle_table). The ingestion routine
//! writes one file per subhalo with it; tests use it to build synthetic datasets.
use std::{fs::File, sync::Arc};

use arrow_array::{ArrayRef, Float64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use camino::Utf8Path;
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};

use super::{ParticleTable, MASS_COLUMN, RADIUS_COLUMN, SPEED_COLUMN, TYPE_COLUMN};
use crate::mond_errors::MondError;

fn particle_schema() -> Schema {
    Schema::new(vec![
        Field::new(RADIUS_COLUMN, DataType::Float64, false),
        Field::new(MASS_COLUMN, DataType::Float64, false),
        Field::new(SPEED_COLUMN, DataType::Float64, false),
        Field::new(TYPE_COLUMN, DataType::Utf8, false),
    ])
}

/// Write `table` to `path` as a single-row-group Parquet file.
///
/// Arguments
/// -----------------
/// * `table` – The particles to persist, in row order.
/// * `path` – Destination file; created or truncated.
///
/// Return
/// ----------
/// * `Ok(())`, or a [`MondError`] wrapping the I/O, Arrow or Parquet failure.
pub fn write_particle_table(table: &ParticleTable, path: &Utf8Path) -> Result<(), MondError> {
    let schema = Arc::new(particle_schema());

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(table.radii().to_vec())),
        Arc::new(Float64Array::from(table.masses().to_vec())),
        Arc::new(Float64Array::from(table.speeds().to_vec())),
        Arc::new(StringArray::from_iter_values(
            table.kinds().iter().map(|k| k.as_str()),
        )),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}
