use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViirsError {
    #[error("Grid shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Grid data length {len} does not fit {rows}x{cols}")]
    BadLength { rows: usize, cols: usize, len: usize },

    #[error("Dataset not found: {0}")]
    MissingDataset(String),

    #[error("Attribute {attribute} missing on {dataset}")]
    MissingAttribute { dataset: String, attribute: String },

    #[error("No valid pixels to render")]
    EmptyData,

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
}

pub type Result<T> = std::result::Result<T, ViirsError>;
