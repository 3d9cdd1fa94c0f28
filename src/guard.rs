//! Branches that must never be deleted, whatever their age.

use std::collections::BTreeSet;

/// Branch names protected when nothing else is configured.
pub const DEFAULT_PROTECTED_BRANCHES: &[&str] = &["main", "master", "develop"];

/// Exact, case-sensitive set of protected branch names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedBranches {
    names: BTreeSet<String>,
}

impl Default for ProtectedBranches {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_BRANCHES.iter().copied())
    }
}

impl ProtectedBranches {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add more protected names, keeping the existing ones
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }

    pub fn is_protected(&self, branch_name: &str) -> bool {
        self.names.contains(branch_name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
