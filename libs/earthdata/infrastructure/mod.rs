//! Infrastructure Layer
//!
//! Contains implementations of external interfaces (CMR, Earthdata Login,
//! file downloads, configuration, logging).
//! This layer depends on the domain layer but not on the application layer.

pub mod auth;
pub mod client;
pub mod config;
pub mod logging;
pub mod shutdown;

// Re-export commonly used types from client
pub use client::{
    cmr::{CmrClient, CmrError, GranuleCatalog, CMR_OPS},
    download::{DownloadError, DownloadOptions, EarthdataSession},
};

// Re-export auth types
pub use auth::{netrc_path, Credentials, Netrc, NetrcError, URS_HOST};

// Re-export config types
pub use config::{ConfigError, FetchConfig};

// Re-export infrastructure services
pub use logging::{init_tracing, init_tracing_with_level};
pub use shutdown::ShutdownManager;
