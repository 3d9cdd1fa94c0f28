//! Typed records decoded from the Bitbucket 2.0 API.
//!
//! Only the fields the sweep needs are modelled. Unknown fields are ignored,
//! missing required ones (including the `values` array itself) fail decoding
//! of the page.

use serde::Deserialize;

/// Collection envelope returned by every list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub values: Vec<T>,
    /// Link to the following page, present when the listing was truncated
    #[serde(default)]
    pub next: Option<String>,
    /// Total number of items across all pages, when the API reports it
    #[serde(default)]
    pub size: Option<u64>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub slug: String,
}

impl Repository {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub target: Option<BranchTarget>,
}

impl Branch {
    /// Build a branch whose head commit carries the given RFC 3339 date.
    pub fn with_commit_date(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: Some(BranchTarget {
                date: Some(date.into()),
            }),
        }
    }

    /// Raw commit timestamp of the branch head, if the API sent one
    pub fn commit_date(&self) -> Option<&str> {
        self.target.as_ref().and_then(|t| t.date.as_deref())
    }
}

/// Head commit of a branch.
///
/// The date stays a raw string so that one malformed timestamp is handled by
/// the staleness evaluator instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchTarget {
    #[serde(default)]
    pub date: Option<String>,
}
