//! Allow-list filtering of collections
//!
//! A record passes when, for every non-empty dimension (namespaces,
//! repositories, collections), its value is in the configured set. Empty
//! dimensions impose no restriction.

use std::collections::HashSet;

use crate::config::Config;
use crate::models::{CollectionRecord, Repository};

/// Allow-lists built from the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionFilter {
    namespaces: HashSet<String>,
    repositories: HashSet<Repository>,
    collections: HashSet<String>,
}

impl CollectionFilter {
    /// Build the filter from a validated configuration
    ///
    /// Unknown repository names are dropped; [`Config::validate`] rejects them.
    pub fn from_config(config: &Config) -> Self {
        Self {
            namespaces: config.namespaces.iter().cloned().collect(),
            repositories: config
                .repositories
                .iter()
                .filter_map(|r| r.parse().ok())
                .collect(),
            collections: config.collections.iter().cloned().collect(),
        }
    }

    /// Restrict to the given namespaces
    pub fn with_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to the given repositories
    pub fn with_repositories<I>(mut self, repositories: I) -> Self
    where
        I: IntoIterator<Item = Repository>,
    {
        self.repositories = repositories.into_iter().collect();
        self
    }

    /// Restrict to the given collections (name or FQCN)
    pub fn with_collections<I, S>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections = collections.into_iter().map(Into::into).collect();
        self
    }

    /// Whether any record of `repository` can pass
    pub fn includes_repository(&self, repository: Repository) -> bool {
        self.repositories.is_empty() || self.repositories.contains(&repository)
    }

    /// Whether the record passes every configured dimension
    pub fn matches(&self, record: &CollectionRecord) -> bool {
        if !self.namespaces.is_empty() && !self.namespaces.contains(&record.namespace) {
            return false;
        }

        if !self.includes_repository(record.repository) {
            return false;
        }

        if !self.collections.is_empty()
            && !self.collections.contains(&record.name)
            && !self.collections.contains(&record.fqcn())
        {
            return false;
        }

        true
    }
}

/// Decide whether `record` is included under `config`'s allow-lists
pub fn matches(record: &CollectionRecord, config: &Config) -> bool {
    CollectionFilter::from_config(config).matches(record)
}
