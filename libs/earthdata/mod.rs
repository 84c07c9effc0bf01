//! NASA Earthdata access
//!
//! Granule search against the Common Metadata Repository (CMR), Earthdata
//! Login credentials kept in `~/.netrc`, and authenticated bulk downloads.
//!
//! ## Architecture
//!
//! - **domain**: query, link and download report types
//! - **infrastructure**: CMR client, download session, netrc, config, logging
//! - **application**: fetch and login use cases driven by the binaries

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used items
pub use application::{
    CredentialSource, FetchPlan, FetchService, FetchSummary, LoginOutcome, LoginService, Prompter,
    TerminalPrompter,
};
pub use domain::{DataLink, DownloadOutcome, DownloadReport, GranuleQuery, TemporalRange};
pub use infrastructure::{
    init_tracing, init_tracing_with_level, netrc_path, CmrClient, CmrError, ConfigError, Credentials,
    DownloadError, DownloadOptions, EarthdataSession, FetchConfig, GranuleCatalog, Netrc,
    NetrcError, ShutdownManager, CMR_OPS, URS_HOST,
};
