//! Domain Layer
//!
//! Plain data types shared by the clients and use cases. No I/O here
//! except writing the download manifest.

pub mod download;
pub mod granule;

pub use download::{DownloadOutcome, DownloadReport, FailedDownload, MANIFEST_FILE};
pub use granule::{DataLink, GranuleQuery, QueryError, TemporalRange, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
