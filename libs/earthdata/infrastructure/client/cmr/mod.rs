//! CMR search client and types
//!
//! The Common Metadata Repository indexes every Earthdata granule. Only the
//! granule search endpoint is used here.

pub mod client;
pub mod types;

pub use client::{CmrClient, CmrError, GranuleCatalog, Result, CMR_OPS};
pub use types::{Feed, GranuleEntry, GranuleFeedResponse, Link};
