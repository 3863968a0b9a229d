//! Plain-text report of updated collections

use std::io::Write;

use crate::models::CollectionRecord;

/// Writes one line per reported collection
#[derive(Debug, Clone)]
pub struct Reporter {
    date_format: String,
}

impl Reporter {
    /// Create a reporter rendering dates with a strftime pattern
    ///
    /// The pattern must already be validated, see [`crate::config::Config::validate`].
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    /// Render a single report line
    pub fn format_line(&self, record: &CollectionRecord) -> String {
        format!(
            "{}: {} has new version {} released on {}",
            record.repository,
            record.fqcn(),
            record.version,
            record.updated_at.format(&self.date_format)
        )
    }

    /// Write every record in the given order
    pub fn write<'a, W, I>(&self, out: &mut W, records: I) -> std::io::Result<usize>
    where
        W: Write,
        I: IntoIterator<Item = &'a CollectionRecord>,
    {
        let mut written = 0;
        for record in records {
            writeln!(out, "{}", self.format_line(record))?;
            written += 1;
        }
        out.flush()?;
        Ok(written)
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new("%Y-%m-%d")
    }
}
