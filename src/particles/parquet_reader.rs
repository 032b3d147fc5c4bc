//! # Parquet reader for particle tables
//!
//! Column-projected ingestion of one subhalo particle file into a [`ParticleTable`].
//!
//! ## Expected Parquet schema
//! -----------------
//! - `r: Float64`: radius in **kpc**.
//! - `M: Float64`: mass in **M_sun**.
//! - `v: Float64`: speed in **km/s**.
//! - `type: Utf8`: species tag, carried verbatim (see [`ParticleType`]).
//!
//! Extra columns are ignored (only the four leaves above are materialized). A missing column
//! surfaces as [`MondError::MissingColumn`] before any batch is decoded.
//!
//! ## Null handling policy
//! -----------------
//! - **No nulls** (fast path): raw slice iteration.
//! - **With nulls** (fallback): per-row checks. Rows are never dropped: a null `r`, `M` or `v`
//!   reads as `NaN`, a null `type` as an empty tag. The null cells are counted and a single
//!   warning is logged per file.
//!
//! The `NaN` rules of [`RadialShells`](crate::profile::RadialShells) then apply: a `NaN` radius
//! falls in no bin, a `NaN` mass adds nothing to the enclosed mass.
use arrow_array::{Array, Float64Array, RecordBatch, StringArray};
use camino::Utf8Path;
use parquet::arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ProjectionMask};
use tracing::{debug, warn};

use super::{
    Particle, ParticleTable, ParticleType, MASS_COLUMN, RADIUS_COLUMN, SPEED_COLUMN, TYPE_COLUMN,
};
use crate::mond_errors::MondError;

const PARTICLE_COLUMNS: [&str; 4] = [RADIUS_COLUMN, MASS_COLUMN, SPEED_COLUMN, TYPE_COLUMN];

fn f64_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array, MondError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| MondError::MissingColumn(name.to_string()))?
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| MondError::InvalidColumnType {
            column: name.to_string(),
            expected: "Float64",
        })
}

fn str_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, MondError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| MondError::MissingColumn(name.to_string()))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| MondError::InvalidColumnType {
            column: name.to_string(),
            expected: "Utf8",
        })
}

/// Load one particle table from a Parquet file.
///
/// Arguments
/// -----------------
/// * `path` – Path to the particle file (`<base>subhalo<ID>.parquet.snappy`).
/// * `batch_size` – Optional Arrow reader batch size (default: 8192 rows).
///
/// Return
/// ----------
/// * The [`ParticleTable`] in file row order, or a [`MondError`] on I/O or schema failures.
pub fn read_particle_table(
    path: &Utf8Path,
    batch_size: Option<usize>,
) -> Result<ParticleTable, MondError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let parquet_metadata = builder.metadata();
    let schema_descr = parquet_metadata.file_metadata().schema_descr();
    let n_rows = parquet_metadata.file_metadata().num_rows().max(0) as usize;

    let all_fields = schema_descr.columns();
    let projection_indices: Vec<usize> = PARTICLE_COLUMNS
        .iter()
        .map(|name| {
            all_fields
                .iter()
                .position(|f| f.name() == *name)
                .ok_or_else(|| MondError::MissingColumn(name.to_string()))
        })
        .collect::<Result<_, _>>()?;
    let mask = ProjectionMask::leaves(schema_descr, projection_indices);

    let reader = builder
        .with_projection(mask)
        .with_batch_size(batch_size.unwrap_or(8192))
        .build()?;

    let mut table = ParticleTable::with_capacity(n_rows);
    let mut null_cells = 0usize;

    for maybe_batch in reader {
        let batch = maybe_batch?;

        // Projected leaves come back in file schema order, so look columns up by name.
        let r_arr = f64_column(&batch, RADIUS_COLUMN)?;
        let m_arr = f64_column(&batch, MASS_COLUMN)?;
        let v_arr = f64_column(&batch, SPEED_COLUMN)?;
        let t_arr = str_column(&batch, TYPE_COLUMN)?;

        let no_nulls = r_arr.nulls().is_none()
            && m_arr.nulls().is_none()
            && v_arr.nulls().is_none()
            && t_arr.nulls().is_none();

        if no_nulls {
            let r_vals: &[f64] = r_arr.values();
            let m_vals: &[f64] = m_arr.values();
            let v_vals: &[f64] = v_arr.values();

            for (i, ((r, m), v)) in r_vals.iter().zip(m_vals).zip(v_vals).enumerate() {
                table.push(Particle::new(*r, *m, *v, ParticleType::from(t_arr.value(i))));
            }
        } else {
            let or_nan = |arr: &Float64Array, i: usize| {
                if arr.is_null(i) {
                    f64::NAN
                } else {
                    arr.value(i)
                }
            };
            for i in 0..batch.num_rows() {
                null_cells += [
                    r_arr.is_null(i),
                    m_arr.is_null(i),
                    v_arr.is_null(i),
                    t_arr.is_null(i),
                ]
                .iter()
                .filter(|null| **null)
                .count();
                let kind = if t_arr.is_null(i) {
                    ParticleType::from("")
                } else {
                    ParticleType::from(t_arr.value(i))
                };
                table.push(Particle::new(
                    or_nan(r_arr, i),
                    or_nan(m_arr, i),
                    or_nan(v_arr, i),
                    kind,
                ));
            }
        }
    }

    if null_cells > 0 {
        warn!(%path, null_cells, "null particle values read as NaN");
    }
    debug!(%path, particles = table.len(), "particle table loaded");

    Ok(table)
}
