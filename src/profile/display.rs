//! Table rendering of [`AccelerationTable`]s with [`comfy-table`].
//!
//! ```text
//! ┌─────────┬────────────┬────────────┐
//! │ r [kpc] ┆ ID 5       ┆ ID 9       │
//! ╞═════════╪════════════╪════════════╡
//! │ 1.500   ┆ 1.000e2    ┆ NaN        │
//! └─────────┴────────────┴────────────┘
//! ```
//!
//! [`comfy-table`]: https://crates.io/crates/comfy-table
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use super::acceleration_table::AccelerationTable;

/// Display adaptor for an [`AccelerationTable`].
///
/// * `radius_prec` – fixed-point digits of the radius column (default 3).
/// * `value_prec` – mantissa digits of the scientific-notation cells (default 3).
pub struct AccelerationTableDisplay<'a> {
    table: &'a AccelerationTable,
    radius_prec: usize,
    value_prec: usize,
}

impl<'a> AccelerationTableDisplay<'a> {
    pub fn new(table: &'a AccelerationTable) -> Self {
        Self {
            table,
            radius_prec: 3,
            value_prec: 3,
        }
    }

    pub fn radius_precision(mut self, prec: usize) -> Self {
        self.radius_prec = prec;
        self
    }

    pub fn value_precision(mut self, prec: usize) -> Self {
        self.value_prec = prec;
        self
    }

    fn render(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let mut header = vec![Cell::new("r [kpc]")];
        header.extend(
            self.table
                .subhalo_ids()
                .iter()
                .map(|id| Cell::new(format!("ID {id}"))),
        );
        table.set_header(header);

        for (row, r) in self.table.radii().iter().enumerate() {
            let mut cells = vec![Cell::new(format!("{r:.prec$}", prec = self.radius_prec))
                .set_alignment(CellAlignment::Right)];
            cells.extend(self.table.row(row).map(|g| {
                let text = if g.is_nan() {
                    "NaN".to_string()
                } else {
                    format!("{g:.prec$e}", prec = self.value_prec)
                };
                Cell::new(text).set_alignment(CellAlignment::Right)
            }));
            table.add_row(Row::from(cells));
        }
        table
    }
}

impl fmt::Display for AccelerationTableDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl AccelerationTable {
    /// Configurable table renderer; `format!("{table}")` uses the defaults.
    pub fn display(&self) -> AccelerationTableDisplay<'_> {
        AccelerationTableDisplay::new(self)
    }
}

impl fmt::Display for AccelerationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        AccelerationTableDisplay::new(self).fmt(f)
    }
}
