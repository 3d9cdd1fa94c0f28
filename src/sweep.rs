//! Sequential walk over a workspace: repositories, then branches.
//!
//! ## Phases
//!
//! 1. List repositories. A failure here ends the run.
//! 2. For each repository, list its branches. A failure skips that repository.
//! 3. For each branch, evaluate staleness and report stale ones.
//! 4. When deletion is enabled, delete stale branches that are not protected.
//!
//! Nothing is retried. Every call's first outcome is final.

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::api::BranchHost;
use crate::error::Result;
use crate::guard::ProtectedBranches;
use crate::staleness::StalenessEvaluator;

/// Knobs for one sweep
#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    /// Delete stale, unprotected branches instead of only reporting them
    pub delete: bool,
}

/// A branch found stale during the sweep
#[derive(Debug, Clone, PartialEq)]
pub struct StaleBranch {
    pub repo: String,
    pub branch: String,
    pub age_days: f64,
}

/// A deletion that the API refused or that never reached it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDeletion {
    pub repo: String,
    pub branch: String,
    pub error: String,
}

/// A repository whose branches could not be listed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRepo {
    pub repo: String,
    pub error: String,
}

/// Everything that happened during a completed sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Repositories whose branches were listed and evaluated
    pub repositories_checked: usize,
    pub stale: Vec<StaleBranch>,
    /// `(repo, branch)` pairs removed from the host
    pub deleted: Vec<(String, String)>,
    /// `(repo, branch)` pairs left alone because they are protected
    pub protected: Vec<(String, String)>,
    pub failed_deletions: Vec<FailedDeletion>,
    pub skipped_repos: Vec<SkippedRepo>,
    /// A listing had more pages than were read
    pub incomplete: bool,
}

impl SweepReport {
    /// True when every repository was listed and every deletion went through
    pub fn is_clean(&self) -> bool {
        self.skipped_repos.is_empty() && self.failed_deletions.is_empty() && !self.incomplete
    }
}

/// Run one sweep over `workspace`.
///
/// Returns `Err` only when the repository list cannot be fetched. All other
/// failures are printed, recorded in the report, and the walk continues.
pub fn run<H: BranchHost>(
    host: &H,
    workspace: &str,
    evaluator: &StalenessEvaluator,
    guard: &ProtectedBranches,
    options: &SweepOptions,
    now: DateTime<Utc>,
) -> Result<SweepReport> {
    let mut report = SweepReport::default();

    let repos = host.list_repositories(workspace)?;
    if repos.has_more() {
        report.incomplete = true;
        println!(
            "{} Workspace {} has more repositories than the first page; only {} will be checked",
            "!".yellow().bold(),
            workspace,
            repos.values.len()
        );
    }

    for repo in &repos.values {
        let slug = repo.slug.as_str();
        println!("Checking branches for repository: {}", slug.bold());

        let branches = match host.list_branches(workspace, slug) {
            Ok(page) => page,
            Err(e) => {
                println!("  {} Error fetching branches for repo {slug}: {e}", "✗".red());
                report.skipped_repos.push(SkippedRepo {
                    repo: slug.to_string(),
                    error: e.to_string(),
                });
                continue;
            }
        };
        report.repositories_checked += 1;

        if branches.has_more() {
            report.incomplete = true;
            println!(
                "  {} Repository {slug} has more branches than the first page; only {} will be checked",
                "!".yellow().bold(),
                branches.values.len()
            );
        }

        for branch in &branches.values {
            let staleness = evaluator.evaluate(branch, now);
            tracing::debug!(
                repo = slug,
                branch = %branch.name,
                stale = staleness.is_stale,
                age_days = staleness.age_days(),
                "evaluated branch"
            );
            if !staleness.is_stale {
                continue;
            }

            println!(
                "  {} Stale branch found: {} in repo {slug}, non-interacted for approximately {} days",
                "•".yellow(),
                branch.name.yellow(),
                staleness.display_days()
            );
            report.stale.push(StaleBranch {
                repo: slug.to_string(),
                branch: branch.name.clone(),
                age_days: staleness.age_days(),
            });

            if !options.delete {
                continue;
            }

            if guard.is_protected(&branch.name) {
                println!(
                    "    {} Branch {} is protected and will not be deleted",
                    "ℹ".blue(),
                    branch.name
                );
                report.protected.push((slug.to_string(), branch.name.clone()));
                continue;
            }

            match host.delete_branch(workspace, slug, &branch.name) {
                Ok(()) => {
                    println!(
                        "    {} Branch {} deleted in repository {slug}",
                        "✓".green(),
                        branch.name
                    );
                    report.deleted.push((slug.to_string(), branch.name.clone()));
                }
                Err(e) => {
                    println!(
                        "    {} Error deleting branch {}: {e}",
                        "✗".red(),
                        branch.name
                    );
                    report.failed_deletions.push(FailedDeletion {
                        repo: slug.to_string(),
                        branch: branch.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    Ok(report)
}
