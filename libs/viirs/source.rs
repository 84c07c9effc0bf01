//! Where grids come from

use crate::error::{Result, ViirsError};
use crate::grid::{Grid, MaskedGrid};
use crate::product::{Band, QualityFlag};
use std::collections::HashMap;

/// A reflectance band as stored: raw integers plus scaling attributes
#[derive(Debug, Clone, PartialEq)]
pub struct RawBand {
    pub data: Grid<i16>,
    pub scale: f64,
    pub fill_value: i16,
}

impl RawBand {
    /// Scaled reflectance with fill cells set to zero
    pub fn reflectance(&self) -> Grid<f64> {
        let scale = self.scale;
        let fill = self.fill_value;
        self.data
            .map(|&raw| if raw == fill { 0.0 } else { f64::from(raw) * scale })
    }

    /// Scaled reflectance with fill cells masked out
    pub fn masked_reflectance(&self) -> Result<MaskedGrid> {
        let scale = self.scale;
        let fill = self.fill_value;
        let mut grid = MaskedGrid::from_grid(self.data.map(|&raw| f64::from(raw) * scale));
        grid.mask_where(&self.data, |raw| raw != fill)?;
        Ok(grid)
    }
}

/// Read access to the datasets of a granule
pub trait GridSource {
    fn read_band(&self, band: Band) -> Result<RawBand>;
    fn read_flags(&self, flag: QualityFlag) -> Result<Grid<u8>>;
}

/// Grids held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bands: HashMap<Band, RawBand>,
    flags: HashMap<QualityFlag, Grid<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_band(mut self, band: Band, raw: RawBand) -> Self {
        self.bands.insert(band, raw);
        self
    }

    pub fn with_flags(mut self, flag: QualityFlag, grid: Grid<u8>) -> Self {
        self.flags.insert(flag, grid);
        self
    }
}

impl GridSource for MemorySource {
    fn read_band(&self, band: Band) -> Result<RawBand> {
        self.bands
            .get(&band)
            .cloned()
            .ok_or_else(|| ViirsError::MissingDataset(band.dataset_path()))
    }

    fn read_flags(&self, flag: QualityFlag) -> Result<Grid<u8>> {
        self.flags
            .get(&flag)
            .cloned()
            .ok_or_else(|| ViirsError::MissingDataset(flag.dataset_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILL: i16 = -28672;

    #[test]
    fn test_reflectance_scales_and_zeroes_fill() {
        let raw = RawBand {
            data: Grid::new(1, 3, vec![5000, -28672, 1234]).unwrap(),
            scale: 0.0001,
            fill_value: -28672,
        };
        let refl = raw.reflectance();
        assert!((refl.data()[0] - 0.5).abs() < 1e-12);
        assert_eq!(refl.data()[1], 0.0);
        assert!((refl.data()[2] - 0.1234).abs() < 1e-12);
    }

    #[test]
    fn test_masked_reflectance_masks_fill() {
        let raw = RawBand {
            data: Grid::new(1, 2, vec![FILL, 3000]).unwrap(),
            scale: 0.0001,
            fill_value: FILL,
        };
        let masked = raw.masked_reflectance().unwrap();
        assert_eq!(masked.get(0, 0), None);
        assert!((masked.get(0, 1).unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(masked.valid_count(), 1);
    }

    #[test]
    fn test_memory_source_missing_dataset() {
        let source = MemorySource::new();
        match source.read_band(Band::M5) {
            Err(ViirsError::MissingDataset(path)) => assert!(path.ends_with("SurfReflect_M5_1")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
