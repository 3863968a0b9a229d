//! Domain models for collection-watch
//!
//! This module contains the core domain models used throughout the application.

pub mod collection;
pub mod repository;

// Re-export commonly used types
pub use collection::{
    parse_timestamp, CollectionEntry, CollectionPage, CollectionRecord, HighestVersion, PageLinks,
    VersionDetail,
};
pub use repository::Repository;
