//! Automation Hub access
//!
//! - [`traits`]: the [`CollectionSource`] seam the report is built against
//! - [`client`]: reqwest-based implementation with basic or token auth

pub mod client;
pub mod traits;

pub use client::HubClient;
pub use traits::CollectionSource;

#[cfg(test)]
pub use traits::MockCollectionSource;
