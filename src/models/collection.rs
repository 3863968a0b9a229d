//! Collection domain models
//!
//! This module defines the collection record reported to the user and the
//! wire types of the Automation Hub collection index API.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::FetchError;

use super::Repository;

/// One collection as listed by a repository index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRecord {
    /// Collection namespace
    pub namespace: String,

    /// Collection name
    pub name: String,

    /// Repository the collection was listed in
    pub repository: Repository,

    /// Last update of the collection, normalized to UTC
    pub updated_at: DateTime<Utc>,

    /// Highest published version
    pub version: String,

    /// API path of the highest version's detail document
    pub version_href: Option<String>,
}

impl CollectionRecord {
    /// Fully qualified collection name (`namespace.name`)
    pub fn fqcn(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// Build a record from an index entry
    pub fn from_entry(entry: CollectionEntry, repository: Repository) -> Result<Self, FetchError> {
        let updated_at = parse_timestamp(&entry.updated_at)?;
        Ok(Self {
            namespace: entry.namespace,
            name: entry.name,
            repository,
            updated_at,
            version: entry.highest_version.version,
            version_href: entry.highest_version.href,
        })
    }
}

/// One page of the collection index
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionPage {
    #[serde(default)]
    pub data: Vec<CollectionEntry>,

    #[serde(default)]
    pub links: PageLinks,
}

/// Pagination links of an index page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    /// Absolute URL or path of the next page, `None` on the last page
    #[serde(default)]
    pub next: Option<String>,
}

/// Collection entry of an index page
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionEntry {
    pub namespace: String,
    pub name: String,
    pub updated_at: String,
    pub highest_version: HighestVersion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighestVersion {
    pub version: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Collection version detail document
#[derive(Debug, Clone, Deserialize)]
pub struct VersionDetail {
    pub updated_at: String,
}

/// Parse an API timestamp into UTC
///
/// Offset-carrying RFC 3339 values are converted; naive values are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, FetchError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .map_err(|_| FetchError::InvalidData(format!("invalid timestamp: {}", value)))
}
