//! Git commit message buffer recognition.
//!
//! Editors open commit messages as ordinary files (`.git/COMMIT_EDITMSG`) or
//! as temporary buffers. The host only knows the buffer's name, so the check
//! is a plain name match.

use imectx_config::GitCommitConfig;

/// Name rules identifying commit message buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommitRules {
    file_names: Vec<String>,
    suffixes: Vec<String>,
}

impl GitCommitRules {
    pub fn new(file_names: Vec<String>, suffixes: Vec<String>) -> Self {
        Self {
            file_names,
            suffixes,
        }
    }

    pub fn from_config(config: &GitCommitConfig) -> Self {
        Self::new(config.file_names.clone(), config.suffixes.clone())
    }

    /// Whether a buffer named `name` holds a commit message.
    pub fn is_commit_buffer(&self, name: &str) -> bool {
        self.file_names.iter().any(|f| name.contains(f.as_str()))
            || self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}

impl Default for GitCommitRules {
    fn default() -> Self {
        Self::from_config(&GitCommitConfig::default())
    }
}

/// Check `name` against the default rules: contains `COMMIT_EDITMSG` or
/// ends with `.tmp`.
pub fn is_git_commit_file(name: &str) -> bool {
    GitCommitRules::default().is_commit_buffer(name)
}
