//! VIIRS surface reflectance analysis
//!
//! Works on VNP09GA daily granules (HDF-EOS5): scaling reflectance bands,
//! decoding quality flag bits, vegetation indices and image rendering.
//!
//! Grids are read through [`GridSource`]; the `hdf5` feature adds
//! [`Hdf5Source`] for `.h5` files on disk.

pub mod analysis;
pub mod error;
pub mod grid;
pub mod indices;
pub mod product;
pub mod quality;
pub mod render;
pub mod source;

#[cfg(feature = "hdf5")]
pub mod hdf5_source;

pub use analysis::{
    generate_rgb_image, quality_filtering, surface_reflectance, vegetation_indices,
    QualityReport, ReflectanceReport, VegetationIndices,
};
pub use error::{Result, ViirsError};
pub use grid::{percentile, Grid, MaskedGrid, Stats};
pub use product::{Band, QualityFlag, Resolution};
pub use source::{GridSource, MemorySource, RawBand};

#[cfg(feature = "hdf5")]
pub use hdf5_source::Hdf5Source;
