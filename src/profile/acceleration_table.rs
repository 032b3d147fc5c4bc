//! Dense (radius × subhalo) result table of a profile computation.
//!
//! Values are stored **column-major**: the column of one subhalo is a contiguous slice, so the
//! engine fills one subhalo at a time through [`AccelerationTable::columns_mut`] without any
//! label lookup. Cells start as NaN, which is also the value of an empty bin.
use std::io;

use camino::Utf8Path;

use crate::{
    constants::{Acceleration, Kpc, SubhaloId},
    mond_errors::MondError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct AccelerationTable {
    radii: Vec<Kpc>,
    subhalo_ids: Vec<SubhaloId>,
    values: Vec<Acceleration>,
}

impl AccelerationTable {
    /// Allocate a NaN-filled table with one row per radius and one column per subhalo.
    pub fn nan_filled(radii: Vec<Kpc>, subhalo_ids: Vec<SubhaloId>) -> Self {
        let values = vec![f64::NAN; radii.len() * subhalo_ids.len()];
        AccelerationTable {
            radii,
            subhalo_ids,
            values,
        }
    }

    /// Row labels (bin centers), in request order.
    pub fn radii(&self) -> &[Kpc] {
        &self.radii
    }

    /// Column labels, in resolution order.
    pub fn subhalo_ids(&self) -> &[SubhaloId] {
        &self.subhalo_ids
    }

    pub fn n_radii(&self) -> usize {
        self.radii.len()
    }

    pub fn n_subhalos(&self) -> usize {
        self.subhalo_ids.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_radii(), self.n_subhalos())
    }

    /// Cell at (`row`, `col`).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Acceleration> {
        if row < self.n_radii() && col < self.n_subhalos() {
            Some(self.values[col * self.n_radii() + row])
        } else {
            None
        }
    }

    /// Position of subhalo `id` among the columns.
    pub fn column_index(&self, id: SubhaloId) -> Option<usize> {
        self.subhalo_ids.iter().position(|&s| s == id)
    }

    /// Cell at radius row `row` for subhalo `id`.
    pub fn value(&self, row: usize, id: SubhaloId) -> Option<Acceleration> {
        self.get(row, self.column_index(id)?)
    }

    /// Every radius of one subhalo, in row order.
    pub fn column(&self, id: SubhaloId) -> Option<&[Acceleration]> {
        let col = self.column_index(id)?;
        let n = self.n_radii();
        Some(&self.values[col * n..(col + 1) * n])
    }

    /// Every subhalo at one radius row, in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Acceleration> + '_ {
        let n = self.n_radii();
        let in_range = row < n;
        (0..self.n_subhalos())
            .filter(move |_| in_range)
            .map(move |col| self.values[col * n + row])
    }

    /// Mutable column slices paired with their subhalo ID.
    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = (SubhaloId, &mut [Acceleration])> {
        let n = self.radii.len().max(1);
        self.subhalo_ids
            .iter()
            .copied()
            .zip(self.values.chunks_mut(n))
    }

    /// Write the table as CSV: header `r,<id>,<id>,...`, then one line per radius.
    pub fn to_csv_writer<W: io::Write>(&self, writer: W) -> Result<(), MondError> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.n_subhalos() + 1);
        header.push("r".to_string());
        header.extend(self.subhalo_ids.iter().map(|id| id.to_string()));
        wtr.write_record(&header)?;

        for (row, r) in self.radii.iter().enumerate() {
            let mut record = Vec::with_capacity(self.n_subhalos() + 1);
            record.push(r.to_string());
            record.extend(self.row(row).map(|v| v.to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the table to a CSV file (see [`Self::to_csv_writer`]).
    pub fn write_csv(&self, path: &Utf8Path) -> Result<(), MondError> {
        self.to_csv_writer(std::fs::File::create(path)?)
    }
}

#[cfg(test)]
mod acceleration_table_test {
    use super::*;

    fn filled() -> AccelerationTable {
        let mut table = AccelerationTable::nan_filled(vec![1.0, 2.0, 3.0], vec![5, 9]);
        for (id, column) in table.columns_mut() {
            for (row, cell) in column.iter_mut().enumerate() {
                *cell = id as f64 * 10.0 + row as f64;
            }
        }
        table
    }

    #[test]
    fn test_shape_and_access() {
        let table = filled();
        assert_eq!(table.shape(), (3, 2));
        assert_eq!(table.get(2, 0), Some(52.0));
        assert_eq!(table.value(1, 9), Some(91.0));
        assert_eq!(table.column(9).unwrap(), &[90.0, 91.0, 92.0]);
        assert_eq!(table.row(0).collect::<Vec<_>>(), vec![50.0, 90.0]);
        assert_eq!(table.get(3, 0), None);
        assert_eq!(table.value(0, 7), None);
        assert_eq!(table.row(5).count(), 0);
    }

    #[test]
    fn test_nan_filled_by_default() {
        let table = AccelerationTable::nan_filled(vec![1.0], vec![1, 2]);
        assert!(table.row(0).all(f64::is_nan));
    }

    #[test]
    fn test_csv_layout() {
        let mut buffer = Vec::new();
        filled().to_csv_writer(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("r,5,9"));
        assert_eq!(lines.next(), Some("1,50,90"));
        assert_eq!(text.lines().count(), 4);
    }
}
