//! `sweep scan`: report stale branches across the workspace, optionally
//! deleting the unprotected ones.

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use std::path::PathBuf;

use crate::api::BitbucketClient;
use crate::config::{load_dotenv, CliOverrides, Credentials, FileConfig, Settings};
use crate::sweep::{self, SweepOptions, SweepReport};

/// Execute the scan command.
pub fn execute(config_path: Option<PathBuf>, overrides: CliOverrides) -> Result<()> {
    // Credentials first: a missing variable must stop the run before any network I/O
    load_dotenv();
    let credentials = Credentials::from_env()?;
    let file = FileConfig::load(config_path.as_deref())?;
    let settings = Settings::resolve(file, &overrides)?;
    tracing::debug!(?settings, workspace = %credentials.workspace, "resolved settings");

    let client = BitbucketClient::with_base_url(&settings.base_url, credentials.token)?;

    println!(
        "Scanning workspace {} for branches idle more than {} days{}",
        credentials.workspace.bold(),
        settings.threshold_days,
        if settings.delete {
            " (deleting)".red().to_string()
        } else {
            String::new()
        }
    );
    if settings.delete {
        let protected: Vec<&str> = settings.protected.names().collect();
        println!(
            "  {} Protected branches: {}",
            "ℹ".blue(),
            protected.join(", ")
        );
    }

    let report = sweep::run(
        &client,
        &credentials.workspace,
        &settings.evaluator(),
        &settings.protected,
        &SweepOptions {
            delete: settings.delete,
        },
        Utc::now(),
    )
    .with_context(|| format!("Error fetching repositories for workspace {}", credentials.workspace))?;

    print_summary(&report, settings.delete);
    Ok(())
}

fn print_summary(report: &SweepReport, delete: bool) {
    println!();
    let mut line = format!(
        "{} repositories checked, {} stale branches",
        report.repositories_checked,
        report.stale.len()
    );
    if delete {
        line.push_str(&format!(
            ", {} deleted, {} protected, {} failed",
            report.deleted.len(),
            report.protected.len(),
            report.failed_deletions.len()
        ));
    }
    if !report.skipped_repos.is_empty() {
        line.push_str(&format!(", {} repositories skipped", report.skipped_repos.len()));
    }

    if report.is_clean() {
        println!("{} {line}", "✓".green().bold());
    } else {
        println!("{} {line}", "!".yellow().bold());
        if report.incomplete {
            println!(
                "  {} Some listings were truncated to their first page",
                "ℹ".blue()
            );
        }
    }
}
