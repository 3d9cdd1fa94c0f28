//! End-to-end sweeps over an in-memory host

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::cell::RefCell;
use sweep::api::BranchHost;
use sweep::guard::ProtectedBranches;
use sweep::models::{Branch, Page, Repository};
use sweep::staleness::StalenessEvaluator;
use sweep::sweep::{run, SweepOptions};
use sweep::{Result, SweepError};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 15, 8, 30, 0).unwrap()
}

fn aged(name: &str, days: i64) -> Branch {
    Branch::with_commit_date(name, (now() - TimeDelta::days(days)).to_rfc3339())
}

fn page<T>(values: Vec<T>, next: Option<&str>) -> Page<T> {
    Page {
        values,
        next: next.map(str::to_string),
        size: None,
    }
}

/// Workspace with `repo-a` (master 1d, feature-x 200d) and `repo-b` (old-stuff 91d)
#[derive(Default)]
struct Workspace {
    unauthorized: bool,
    repo_next: Option<&'static str>,
    calls: RefCell<Vec<String>>,
}

impl BranchHost for Workspace {
    fn list_repositories(&self, workspace: &str) -> Result<Page<Repository>> {
        self.calls.borrow_mut().push(format!("repos {workspace}"));
        if self.unauthorized {
            return Err(SweepError::Api {
                context: "Failed to fetch repositories".to_string(),
                status: 401,
                reason: "Unauthorized".to_string(),
            });
        }
        Ok(page(
            vec![Repository::new("repo-a"), Repository::new("repo-b")],
            self.repo_next,
        ))
    }

    fn list_branches(&self, workspace: &str, repo_slug: &str) -> Result<Page<Branch>> {
        self.calls
            .borrow_mut()
            .push(format!("branches {workspace}/{repo_slug}"));
        let branches = match repo_slug {
            "repo-a" => vec![aged("master", 1), aged("feature-x", 200)],
            "repo-b" => vec![aged("old-stuff", 91)],
            _ => Vec::new(),
        };
        Ok(page(branches, None))
    }

    fn delete_branch(&self, workspace: &str, repo_slug: &str, branch_name: &str) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("delete {workspace}/{repo_slug}/{branch_name}"));
        Ok(())
    }
}

impl Workspace {
    fn deletes(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with("delete"))
            .cloned()
            .collect()
    }
}

fn sweep_workspace(host: &Workspace, delete: bool) -> Result<sweep::sweep::SweepReport> {
    run(
        host,
        "acme",
        &StalenessEvaluator::from_days(90),
        &ProtectedBranches::default(),
        &SweepOptions { delete },
        now(),
    )
}

#[test]
fn test_reports_stale_branches_without_deleting() {
    let host = Workspace::default();
    let report = sweep_workspace(&host, false).unwrap();

    let stale: Vec<_> = report
        .stale
        .iter()
        .map(|s| (s.repo.as_str(), s.branch.as_str()))
        .collect();
    assert_eq!(stale, vec![("repo-a", "feature-x"), ("repo-b", "old-stuff")]);
    assert!((report.stale[0].age_days - 200.0).abs() < 1e-9);
    assert!(host.deletes().is_empty());
    assert!(report.is_clean());
}

#[test]
fn test_deletes_stale_branches_when_enabled() {
    let host = Workspace::default();
    let report = sweep_workspace(&host, true).unwrap();

    assert_eq!(
        host.deletes(),
        vec![
            "delete acme/repo-a/feature-x".to_string(),
            "delete acme/repo-b/old-stuff".to_string(),
        ]
    );
    assert_eq!(report.deleted.len(), 2);
    assert!(report.protected.is_empty());
}

#[test]
fn test_protected_branch_is_never_targeted_even_with_custom_set() {
    let host = Workspace::default();
    let report = run(
        &host,
        "acme",
        &StalenessEvaluator::from_days(90),
        &ProtectedBranches::new(["feature-x"]),
        &SweepOptions { delete: true },
        now(),
    )
    .unwrap();

    assert_eq!(host.deletes(), vec!["delete acme/repo-b/old-stuff".to_string()]);
    assert_eq!(
        report.protected,
        vec![("repo-a".to_string(), "feature-x".to_string())]
    );
}

#[test]
fn test_unauthorized_repository_listing_stops_the_run() {
    let host = Workspace {
        unauthorized: true,
        ..Workspace::default()
    };

    let err = sweep_workspace(&host, true).unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(*host.calls.borrow(), vec!["repos acme".to_string()]);
}

#[test]
fn test_truncated_repository_listing_is_flagged() {
    let host = Workspace {
        repo_next: Some("https://api.bitbucket.org/2.0/repositories/acme?page=2"),
        ..Workspace::default()
    };

    let report = sweep_workspace(&host, false).unwrap();
    assert!(report.incomplete);
    assert!(!report.is_clean());
    assert_eq!(report.repositories_checked, 2);
}
