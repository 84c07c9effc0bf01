//! Reading VNP09GA granules from `.h5` files

use crate::error::{Result, ViirsError};
use crate::grid::Grid;
use crate::product::{Band, QualityFlag, FILL_VALUE_ATTR, SCALE_ATTR};
use crate::source::{GridSource, RawBand};
use hdf5::{Dataset, File, H5Type};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Hdf5Source {
    path: PathBuf,
    file: File,
}

impl Hdf5Source {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        debug!("Opened {}", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dataset(&self, path: &str) -> Result<Dataset> {
        if !self.file.link_exists(path) {
            return Err(ViirsError::MissingDataset(path.to_string()));
        }
        Ok(self.file.dataset(path)?)
    }

    fn read_grid<T: H5Type>(&self, path: &str) -> Result<Grid<T>> {
        let ds = self.dataset(path)?;
        let shape = ds.shape();
        let (rows, cols) = match shape.as_slice() {
            [rows, cols] => (*rows, *cols),
            _ => {
                return Err(ViirsError::MissingDataset(format!(
                    "{} (expected 2D, found {:?})",
                    path, shape
                )))
            }
        };
        Grid::new(rows, cols, ds.read_raw::<T>()?)
    }

    /// First element of an attribute
    fn attr_first<T: H5Type + Copy>(&self, path: &str, name: &str) -> Result<T> {
        let ds = self.dataset(path)?;
        let missing = || ViirsError::MissingAttribute {
            dataset: path.to_string(),
            attribute: name.to_string(),
        };
        if !ds.attr_names()?.iter().any(|n| n == name) {
            return Err(missing());
        }
        let values = ds.attr(name)?.read_raw::<T>()?;
        values.first().copied().ok_or_else(missing)
    }
}

impl GridSource for Hdf5Source {
    fn read_band(&self, band: Band) -> Result<RawBand> {
        let path = band.dataset_path();
        let data = self.read_grid::<i16>(&path)?;
        let scale = self.attr_first::<f64>(&path, SCALE_ATTR)?;
        let fill_value = self.attr_first::<i16>(&path, FILL_VALUE_ATTR)?;
        debug!(
            "Read {} {:?} scale={} fill={}",
            band,
            data.shape(),
            scale,
            fill_value
        );
        Ok(RawBand {
            data,
            scale,
            fill_value,
        })
    }

    fn read_flags(&self, flag: QualityFlag) -> Result<Grid<u8>> {
        self.read_grid::<u8>(&flag.dataset_path())
    }
}
