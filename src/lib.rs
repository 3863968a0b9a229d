//! collection-watch - Reports recently updated Ansible collections
//!
//! This crate lists the validated and certified collections published on
//! Ansible Automation Hub, narrows them down with configured allow-lists and
//! reports those updated within the last N days.

pub mod app;
pub mod config;
pub mod error;
pub mod filter;
pub mod hub;
pub mod logging;
pub mod models;
pub mod report;
pub mod window;

pub use app::{run, run_at, RunSummary};
