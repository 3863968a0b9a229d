//! Collection source trait definition
//!
//! The report is built against this trait so the network side can be swapped
//! out in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::FetchError;
use crate::models::{CollectionRecord, Repository};

/// Source of collection listings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// List every collection of a repository, following pagination, in API order
    async fn fetch_collections(
        &self,
        repository: Repository,
    ) -> Result<Vec<CollectionRecord>, FetchError>;

    /// Last update of a single collection version, from its detail document
    async fn fetch_version_updated_at(&self, href: &str) -> Result<DateTime<Utc>, FetchError>;
}
