//! Radius requests and their half-open bins.
//!
//! A request is a list of bin centers `r_i` with widths `w_i`; bin `i` covers
//! `[r_i - w_i/2, r_i + w_i/2)`. A single width is broadcast to every center, a width list must
//! match the center count exactly.
use crate::{constants::Kpc, mond_errors::MondError};

/// Bin widths of a radius request.
#[derive(Debug, Clone, PartialEq)]
pub enum BinWidths {
    /// One width shared by every bin.
    Uniform(Kpc),
    /// One width per bin, same length as the radii.
    PerBin(Vec<Kpc>),
}

impl From<f64> for BinWidths {
    fn from(width: f64) -> Self {
        BinWidths::Uniform(width)
    }
}

impl From<Vec<f64>> for BinWidths {
    fn from(widths: Vec<f64>) -> Self {
        BinWidths::PerBin(widths)
    }
}

impl From<&[f64]> for BinWidths {
    fn from(widths: &[f64]) -> Self {
        BinWidths::PerBin(widths.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for BinWidths {
    fn from(widths: [f64; N]) -> Self {
        BinWidths::PerBin(widths.to_vec())
    }
}

/// A single radial bin `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialBin {
    pub center: Kpc,
    pub width: Kpc,
    pub low: Kpc,
    pub high: Kpc,
}

impl RadialBin {
    pub fn new(center: Kpc, width: Kpc) -> Self {
        RadialBin {
            center,
            width,
            low: center - 0.5 * width,
            high: center + 0.5 * width,
        }
    }

    /// Half-open membership test.
    #[inline]
    pub fn contains(&self, r: Kpc) -> bool {
        r >= self.low && r < self.high
    }
}

/// Validated, ordered list of radial bins.
///
/// Duplicated centers are kept: each one is a separate row of the resulting
/// [`AccelerationTable`](super::acceleration_table::AccelerationTable).
#[derive(Debug, Clone, PartialEq)]
pub struct RadialBins {
    bins: Vec<RadialBin>,
}

impl RadialBins {
    /// Validate a radius request and build its bins.
    ///
    /// Arguments
    /// -----------------
    /// * `radii` – Bin centers (kpc), in output row order.
    /// * `widths` – A scalar width or one width per center.
    ///
    /// Return
    /// ----------
    /// * The bins, or a validation error:
    ///   [`MondError::EmptyRadii`], [`MondError::BinWidthLengthMismatch`],
    ///   [`MondError::InvalidRadius`] (negative / non-finite),
    ///   [`MondError::InvalidBinWidth`] (negative / non-finite).
    pub fn new<R, W>(radii: R, widths: W) -> Result<Self, MondError>
    where
        R: IntoIterator<Item = f64>,
        W: Into<BinWidths>,
    {
        let radii: Vec<f64> = radii.into_iter().collect();
        if radii.is_empty() {
            return Err(MondError::EmptyRadii);
        }

        let widths = match widths.into() {
            BinWidths::Uniform(w) => vec![w; radii.len()],
            BinWidths::PerBin(w) if w.len() == radii.len() => w,
            BinWidths::PerBin(w) => {
                return Err(MondError::BinWidthLengthMismatch {
                    radii: radii.len(),
                    widths: w.len(),
                })
            }
        };

        if let Some((index, &value)) = radii
            .iter()
            .enumerate()
            .find(|(_, r)| !r.is_finite() || **r < 0.0)
        {
            return Err(MondError::InvalidRadius { index, value });
        }
        if let Some((index, &value)) = widths
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(MondError::InvalidBinWidth { index, value });
        }

        Ok(RadialBins {
            bins: radii
                .into_iter()
                .zip(widths)
                .map(|(r, w)| RadialBin::new(r, w))
                .collect(),
        })
    }

    /// Same as [`RadialBins::new`] for nested radius input, flattened in row-major order.
    ///
    /// ```
    /// use mond_profile::profile::RadialBins;
    /// let bins = RadialBins::from_nested([[1.0, 2.0], [3.0, 4.0]], 0.5).unwrap();
    /// assert_eq!(bins.centers(), vec![1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn from_nested<R, I, W>(radii: R, widths: W) -> Result<Self, MondError>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = f64>,
        W: Into<BinWidths>,
    {
        Self::new(radii.into_iter().flatten(), widths)
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RadialBin> {
        self.bins.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RadialBin> {
        self.bins.iter()
    }

    /// Bin centers in request order.
    pub fn centers(&self) -> Vec<Kpc> {
        self.bins.iter().map(|b| b.center).collect()
    }
}

impl<'a> IntoIterator for &'a RadialBins {
    type Item = &'a RadialBin;
    type IntoIter = std::slice::Iter<'a, RadialBin>;

    fn into_iter(self) -> Self::IntoIter {
        self.bins.iter()
    }
}
