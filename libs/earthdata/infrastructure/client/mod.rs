//! Earthdata API clients
//!
//! Provides the CMR search client and the authenticated download session.

pub mod cmr;
pub mod download;

pub use cmr::{CmrClient, CmrError, GranuleCatalog};
pub use download::{DownloadError, DownloadOptions, EarthdataSession};
