//! Vegetation indices over masked reflectance

use crate::error::Result;
use crate::grid::MaskedGrid;

/// Indices outside this range are discarded
pub const VALID_RANGE: (f64, f64) = (0.0, 1.0);

pub fn ndvi_value(red: f64, nir: f64) -> f64 {
    (nir - red) / (nir + red)
}

pub fn evi_value(red: f64, nir: f64, blue: f64) -> f64 {
    2.5 * (nir - red) / (nir + 6.0 * red - 7.5 * blue + 1.0)
}

fn keep_in_range(grid: &mut MaskedGrid) {
    let (lo, hi) = VALID_RANGE;
    grid.mask_values(|v| v.is_finite() && (lo..=hi).contains(&v));
}

/// Normalized difference vegetation index
pub fn ndvi(red: &MaskedGrid, nir: &MaskedGrid) -> Result<MaskedGrid> {
    let mut out = MaskedGrid::combine(&[red, nir], |c| ndvi_value(c[0], c[1]))?;
    keep_in_range(&mut out);
    Ok(out)
}

/// Enhanced vegetation index
pub fn evi(red: &MaskedGrid, nir: &MaskedGrid, blue: &MaskedGrid) -> Result<MaskedGrid> {
    let mut out = MaskedGrid::combine(&[red, nir, blue], |c| evi_value(c[0], c[1], c[2]))?;
    keep_in_range(&mut out);
    Ok(out)
}
