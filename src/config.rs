//! Run configuration.
//!
//! Credentials come from the environment, optionally seeded from a `.env`
//! file in the working directory. Tuning knobs come from an optional TOML
//! file, then from command-line flags:
//!
//! ```toml
//! threshold_days = 120
//! delete = false
//! protected_branches = ["main", "master", "develop", "release"]
//! base_url = "https://api.bitbucket.org/2.0"
//! ```

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;
use crate::error::{Result, SweepError};
use crate::guard::ProtectedBranches;
use crate::staleness::{StalenessEvaluator, DEFAULT_THRESHOLD_DAYS};

pub const TOKEN_VAR: &str = "BITBUCKET_TOKEN";
pub const WORKSPACE_VAR: &str = "BITBUCKET_WORKSPACE";

const CONFIG_DIR_NAME: &str = "sweep";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Bearer token and target workspace.
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
    pub workspace: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("workspace", &self.workspace)
            .finish()
    }
}

impl Credentials {
    /// Read both required variables, trimmed. An empty value counts as unset.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            token: required_var(TOKEN_VAR)?,
            workspace: required_var(WORKSPACE_VAR)?,
        })
    }
}

/// Seed the environment from `./.env`, if there is one.
///
/// Variables already set in the process environment win over the file. A
/// missing or unreadable file is logged and otherwise ignored.
pub fn load_dotenv() -> bool {
    report_dotenv(dotenvy::dotenv())
}

/// Same as [`load_dotenv`] for an explicit file
pub fn load_dotenv_from(path: &Path) -> bool {
    report_dotenv(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

fn report_dotenv(result: dotenvy::Result<PathBuf>) -> bool {
    match result {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded environment file");
            true
        }
        Err(e) if e.not_found() => {
            tracing::debug!("no .env file found");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "Error loading .env file");
            false
        }
    }
}

fn required_var(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(SweepError::config(format!(
            "{name} environment variable is not set"
        ))),
    }
}

/// Contents of the optional config file. Every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub threshold_days: Option<u32>,
    pub delete: Option<bool>,
    pub protected_branches: Option<Vec<String>>,
    pub base_url: Option<String>,
}

impl FileConfig {
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            SweepError::config(format!("Failed to parse {}: {e}", origin.display()))
        })
    }

    /// Load the file at `explicit`, or the default location if none given.
    ///
    /// A missing default file yields an empty config; a missing explicit one
    /// is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path).map_err(|e| {
            SweepError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::parse(&content, &path)
    }
}

/// `<config dir>/sweep/config.toml`, when the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Values given on the command line. `None` leaves the file/default value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub threshold_days: Option<u32>,
    pub delete: bool,
    pub protect: Vec<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub threshold_days: u32,
    pub delete: bool,
    pub protected: ProtectedBranches,
    pub base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold_days: DEFAULT_THRESHOLD_DAYS,
            delete: false,
            protected: ProtectedBranches::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Merge defaults, then the file, then command-line flags.
    pub fn resolve(file: FileConfig, cli: &CliOverrides) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(days) = file.threshold_days {
            settings.threshold_days = days;
        }
        if let Some(delete) = file.delete {
            settings.delete = delete;
        }
        if let Some(names) = file.protected_branches {
            settings.protected = ProtectedBranches::new(names);
        }
        if let Some(base_url) = file.base_url {
            settings.base_url = base_url;
        }

        if let Some(days) = cli.threshold_days {
            settings.threshold_days = days;
        }
        settings.delete |= cli.delete;
        settings.protected.extend(cli.protect.iter().cloned());

        if settings.threshold_days == 0 {
            return Err(SweepError::config("threshold_days must be greater than zero"));
        }
        Ok(settings)
    }

    pub fn evaluator(&self) -> StalenessEvaluator {
        StalenessEvaluator::from_days(self.threshold_days)
    }
}
