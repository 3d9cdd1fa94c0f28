//! Access to the source-control hosting API.
//!
//! The orchestrator talks to a [`BranchHost`] so it can run against the real
//! Bitbucket client or an in-memory host.

pub mod client;

pub use client::{BitbucketClient, DEFAULT_BASE_URL};

use crate::error::Result;
use crate::models::{Branch, Page, Repository};

/// Operations the sweep needs from a hosting service.
///
/// Listing calls return the first page only; callers check
/// [`Page::has_more`] to learn whether the listing is complete.
pub trait BranchHost {
    /// List the repositories of a workspace
    fn list_repositories(&self, workspace: &str) -> Result<Page<Repository>>;

    /// List the branches of one repository
    fn list_branches(&self, workspace: &str, repo_slug: &str) -> Result<Page<Branch>>;

    /// Delete a branch. Only mutating call exposed.
    fn delete_branch(&self, workspace: &str, repo_slug: &str, branch_name: &str) -> Result<()>;
}
