//! Earthdata VIIRS toolkit - Main Library
//!
//! Fetches VIIRS VNP09GA granules from NASA Earthdata and analyzes them.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **earthdata**: CMR search, Earthdata Login, downloads (re-exported from workspace)
//! - **viirs**: Reflectance, quality flags, vegetation indices (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use earthdata_viirs::bin_common::{load_config_from_env, ConfigType};
//! use earthdata_viirs::earthdata::FetchService;
//! ```

// Re-export workspace libraries for convenience
pub use earthdata;
pub use viirs;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables
    //!
    //! Provides shared functionality for the presentation layer (binaries).

    pub mod cli;
    pub mod runner;

    pub use cli::{
        load_config_from_env, parse_analyze_args, parse_args, AnalysisSelection, AnalyzeArgs,
        ConfigType,
    };
    pub use runner::{BinaryRunner, RunConfig};
}
