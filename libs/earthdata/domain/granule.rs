//! Granule search query and result link types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// CMR page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size CMR accepts
pub const MAX_PAGE_SIZE: usize = 2000;

const CMR_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    #[error("temporal range ends before it starts ({start} > {end})")]
    InvertedRange { start: String, end: String },

    #[error("at least one collection concept id is required")]
    NoCollections,

    #[error("page_size must be between 1 and 2000, got {0}")]
    InvalidPageSize(usize),
}

/// Closed time interval used for the CMR `temporal` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TemporalRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, QueryError> {
        if end < start {
            return Err(QueryError::InvertedRange {
                start: start.format(CMR_TIME_FORMAT).to_string(),
                end: end.format(CMR_TIME_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Format as `start,end` the way CMR expects it
    pub fn to_cmr_param(&self) -> String {
        format!(
            "{},{}",
            self.start.format(CMR_TIME_FORMAT),
            self.end.format(CMR_TIME_FORMAT)
        )
    }
}

/// Granule search over one or more collections within a time range
#[derive(Debug, Clone, PartialEq)]
pub struct GranuleQuery {
    pub collections: Vec<String>,
    pub temporal: TemporalRange,
    pub page_size: usize,
}

impl GranuleQuery {
    /// Create a query with the default page size
    pub fn new(collections: Vec<String>, temporal: TemporalRange) -> Result<Self, QueryError> {
        Self::with_page_size(collections, temporal, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(
        collections: Vec<String>,
        temporal: TemporalRange,
        page_size: usize,
    ) -> Result<Self, QueryError> {
        if collections.is_empty() {
            return Err(QueryError::NoCollections);
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(QueryError::InvalidPageSize(page_size));
        }
        Ok(Self {
            collections,
            temporal,
            page_size,
        })
    }

    /// Build query parameters for HTTP request
    ///
    /// Each collection becomes its own `concept_id` pair, in order.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .collections
            .iter()
            .map(|c| ("concept_id".to_string(), c.clone()))
            .collect();

        params.push(("temporal".to_string(), self.temporal.to_cmr_param()));
        params.push(("page_size".to_string(), self.page_size.to_string()));

        params
    }

    /// Number of pages needed to cover `hits` results
    pub fn page_count(&self, hits: usize) -> usize {
        hits.div_ceil(self.page_size)
    }
}

/// A link attached to a granule in the CMR feed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataLink {
    pub href: String,
}

impl DataLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    /// True for HTTPS links to HDF5 data files
    pub fn is_h5_data(&self) -> bool {
        self.href.contains("https") && self.href.ends_with(".h5")
    }

    /// Last path segment of the href, used as the local file name
    pub fn file_name(&self) -> &str {
        let path = self.href.split(['?', '#']).next().unwrap_or(&self.href);
        path.rsplit('/').next().unwrap_or(path)
    }
}

impl fmt::Display for DataLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href)
    }
}
