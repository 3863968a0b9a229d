//! One report run: fetch, filter, window, print
//!
//! Both repositories are fetched completely before anything is written, so a
//! failed fetch never leaves a partial report behind.

use chrono::{DateTime, Utc};
use std::io::Write;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::AppError;
use crate::filter::CollectionFilter;
use crate::hub::CollectionSource;
use crate::models::{CollectionRecord, Repository};
use crate::report::Reporter;
use crate::window::TimeWindow;

/// Counters of a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records listed by the API
    pub fetched: usize,
    /// Records passing the allow-lists
    pub matched: usize,
    /// Records inside the window, i.e. lines written
    pub reported: usize,
}

/// Run the report as of the current time
pub async fn run<S, W>(
    config: &Config,
    source: &S,
    window: TimeWindow,
    out: &mut W,
) -> Result<RunSummary, AppError>
where
    S: CollectionSource + ?Sized,
    W: Write,
{
    run_at(config, source, window, Utc::now(), out).await
}

/// Run the report as seen at `now`
pub async fn run_at<S, W>(
    config: &Config,
    source: &S,
    window: TimeWindow,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<RunSummary, AppError>
where
    S: CollectionSource + ?Sized,
    W: Write,
{
    let filter = CollectionFilter::from_config(config);

    let mut records = Vec::new();
    for repository in Repository::ALL {
        if !filter.includes_repository(repository) {
            debug!(repository = %repository, "Repository not configured, skipping");
            continue;
        }
        records.extend(source.fetch_collections(repository).await?);
    }
    let fetched = records.len();

    // Each matched record paired with the timestamp the window is checked against
    let mut matched: Vec<(CollectionRecord, DateTime<Utc>)> = Vec::new();
    for record in records.into_iter().filter(|r| filter.matches(r)) {
        let mut window_at = record.updated_at;
        if config.resolve_version_dates {
            if let Some(href) = record.version_href.as_deref() {
                window_at = source.fetch_version_updated_at(href).await?;
            }
        }
        matched.push((record, window_at));
    }

    let cutoff = window.cutoff(now);
    let reported: Vec<CollectionRecord> = matched
        .iter()
        .filter(|(_, window_at)| window.contains_at(*window_at, now))
        .map(|(record, window_at)| {
            debug!(
                collection = %record.fqcn(),
                version = %record.version,
                updated_at = %window_at,
                "Collection updated inside window"
            );
            record.clone()
        })
        .collect();

    let written = Reporter::new(config.output_date_format.as_str()).write(out, &reported)?;

    let summary = RunSummary {
        fetched,
        matched: matched.len(),
        reported: written,
    };

    info!(
        fetched = summary.fetched,
        matched = summary.matched,
        reported = summary.reported,
        cutoff = %cutoff,
        "Report complete"
    );

    Ok(summary)
}
