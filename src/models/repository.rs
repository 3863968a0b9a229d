//! Content repositories published on Automation Hub

use std::fmt;
use std::str::FromStr;

/// Content-quality tier of a collection, each with its own listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repository {
    /// Red Hat validated content
    Validated,
    /// Red Hat certified content (served from the `published` repository)
    Certified,
}

impl Repository {
    /// All repositories, in the order they are queried and reported
    pub const ALL: [Repository; 2] = [Repository::Validated, Repository::Certified];

    /// Name used in the configuration and the report
    pub fn as_str(&self) -> &'static str {
        match self {
            Repository::Validated => "validated",
            Repository::Certified => "certified",
        }
    }

    /// API path of the collection index for this repository
    pub fn index_path(&self) -> &'static str {
        match self {
            Repository::Validated => {
                "/api/automation-hub/v3/plugin/ansible/content/validated/collections/index/"
            }
            Repository::Certified => {
                "/api/automation-hub/v3/plugin/ansible/content/published/collections/index/"
            }
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Repository {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "validated" => Ok(Repository::Validated),
            "certified" => Ok(Repository::Certified),
            other => Err(format!("unknown repository: {}", other)),
        }
    }
}
