//! Granule analysis use cases
//!
//! Each function reads what it needs from a [`GridSource`], so the same
//! code runs against an HDF5 file or synthetic grids.

use crate::error::Result;
use crate::grid::{Grid, MaskedGrid, Stats};
use crate::indices;
use crate::product::{Band, QualityFlag};
use crate::quality;
use crate::render;
use crate::source::GridSource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const RGB_FILE: &str = "image.jpeg";
pub const NDVI_FILE: &str = "ndvi.jpeg";
pub const EVI_FILE: &str = "evi.jpeg";
pub const VIS_FILE: &str = "image_VIIRS_VIs.jpeg";

pub const RED: Band = Band::M5;
pub const GREEN: Band = Band::M4;
pub const BLUE: Band = Band::M3;
pub const NIR: Band = Band::M7;

fn reflectance(source: &dyn GridSource, band: Band) -> Result<Grid<f64>> {
    Ok(source.read_band(band)?.reflectance())
}

/// Natural colour image from M5/M4/M3, written to `out_dir/image.jpeg`
pub fn generate_rgb_image(source: &dyn GridSource, out_dir: &Path) -> Result<PathBuf> {
    let red = reflectance(source, RED)?;
    let green = reflectance(source, GREEN)?;
    let blue = reflectance(source, BLUE)?;

    let img = render::natural_color(&red, &green, &blue)?;
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(RGB_FILE);
    render::save(&img, &path)?;

    info!(
        "RGB image {}x{} written to {}",
        img.width(),
        img.height(),
        path.display()
    );
    Ok(path)
}

/// NDVI and EVI over quality-filtered land pixels
#[derive(Debug, Clone)]
pub struct VegetationIndices {
    pub ndvi: MaskedGrid,
    pub evi: MaskedGrid,
}

/// Reflectance masked by fill, QF5 (band quality) and QF2 (land only)
fn filtered_reflectance(
    source: &dyn GridSource,
    band: Band,
    qf5: &Grid<u8>,
    qf2: &Grid<u8>,
) -> Result<MaskedGrid> {
    let mut grid = source.read_band(band)?.masked_reflectance()?;
    grid.mask_where(qf5, quality::qf5_good)?;
    grid.mask_where(qf2, quality::qf2_land)?;
    Ok(grid)
}

pub fn vegetation_indices(source: &dyn GridSource) -> Result<VegetationIndices> {
    let qf5 = source.read_flags(QualityFlag::QF5)?;
    let qf2 = source.read_flags(QualityFlag::QF2)?;

    let red = filtered_reflectance(source, RED, &qf5, &qf2)?;
    let nir = filtered_reflectance(source, NIR, &qf5, &qf2)?;
    let blue = filtered_reflectance(source, BLUE, &qf5, &qf2)?;

    info!(
        "Quality filtering kept {}/{} pixels ({} good QF5 values, {} land QF2 values)",
        red.valid_count(),
        red.values().len(),
        quality::good_values(quality::qf5_good).len(),
        quality::good_values(quality::qf2_land).len()
    );

    Ok(VegetationIndices {
        ndvi: indices::ndvi(&red, &nir)?,
        evi: indices::evi(&red, &nir, &blue)?,
    })
}

#[derive(Debug, Clone)]
pub struct QualityReport {
    pub ndvi: Stats,
    pub evi: Stats,
    pub outputs: Vec<PathBuf>,
}

/// Quality-filtered vegetation indices rendered to `ndvi.jpeg`,
/// `evi.jpeg` and the side-by-side `image_VIIRS_VIs.jpeg`
pub fn quality_filtering(source: &dyn GridSource, out_dir: &Path) -> Result<QualityReport> {
    let vis = vegetation_indices(source)?;

    let ndvi_img = render::index_image(&vis.ndvi)?;
    let evi_img = render::index_image(&vis.evi)?;
    let combined = render::side_by_side(&[&ndvi_img, &evi_img], render::PANEL_GUTTER)?;

    fs::create_dir_all(out_dir)?;
    let mut outputs = Vec::with_capacity(3);
    for (img, name) in [(&ndvi_img, NDVI_FILE), (&evi_img, EVI_FILE), (&combined, VIS_FILE)] {
        let path = out_dir.join(name);
        render::save(img, &path)?;
        outputs.push(path);
    }

    let report = QualityReport {
        ndvi: vis.ndvi.stats(),
        evi: vis.evi.stats(),
        outputs,
    };
    info!(
        "NDVI valid={} mean={:?} | EVI valid={} mean={:?}",
        report.ndvi.valid, report.ndvi.mean, report.evi.valid, report.evi.mean
    );
    Ok(report)
}

#[derive(Debug, Clone)]
pub struct ReflectanceReport {
    pub unmasked: Stats,
    pub masked: Stats,
    pub reflectance: MaskedGrid,
}

/// I3 surface reflectance with the 1 km QF6 mask laid over the 500 m grid
pub fn surface_reflectance(source: &dyn GridSource) -> Result<ReflectanceReport> {
    let i3 = Band::I3;
    let mut grid = MaskedGrid::from_grid(reflectance(source, i3)?);
    let unmasked = grid.stats();

    let qf6 = source
        .read_flags(QualityFlag::QF6)?
        .upsample(i3.resolution().cells_per_km());
    grid.mask_where(&qf6, quality::qf6_i3_good)?;
    let masked = grid.stats();

    info!(
        "I3 reflectance: {} cells, {} pass QF6 ({} good values), mean {:?} -> {:?}",
        unmasked.count,
        masked.valid,
        quality::good_values(quality::qf6_i3_good).len(),
        unmasked.mean,
        masked.mean
    );

    Ok(ReflectanceReport {
        unmasked,
        masked,
        reflectance: grid,
    })
}
