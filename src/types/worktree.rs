//! types::worktree
//!
//! Working tree dirtiness.

use serde::{Deserialize, Serialize};

use super::{Redact, Validate, ValidationError};

/// Which kinds of uncommitted changes a working tree has.
///
/// Every combination of flags is valid; the default (all false) is a clean
/// tree.
///
/// # Example
///
/// ```
/// use gitdomain::types::WorktreeStatus;
///
/// let status = WorktreeStatus::from_porcelain("?? notes.txt\n");
/// assert!(!status.is_clean());
/// assert_eq!(status.to_string(), "untracked");
///
/// assert!(WorktreeStatus::default().is_clean());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorktreeStatus {
    /// Tracked files modified but not staged
    pub has_unstaged: bool,
    /// Changes staged in the index
    pub has_staged: bool,
    /// Files Git does not track (ignored files excluded)
    pub has_untracked: bool,
}

impl WorktreeStatus {
    /// Whether the tree has no changes of any kind.
    pub fn is_clean(&self) -> bool {
        !self.has_unstaged && !self.has_staged && !self.has_untracked
    }

    /// Summarize `git status --porcelain` (v1) output.
    ///
    /// Each entry is `XY path`, where `X` is the index status and `Y` the
    /// worktree status. `??` is untracked and `!!` ignored. Branch header
    /// lines (`## ...`) are skipped.
    pub fn from_porcelain(output: &str) -> Self {
        let mut status = Self::default();
        for line in output.lines() {
            let mut codes = line.chars();
            let (Some(x), Some(y)) = (codes.next(), codes.next()) else {
                continue;
            };
            match (x, y) {
                ('#', '#') | ('!', '!') => {}
                ('?', '?') => status.has_untracked = true,
                (x, y) => {
                    if x != ' ' {
                        status.has_staged = true;
                    }
                    if y != ' ' {
                        status.has_unstaged = true;
                    }
                }
            }
        }
        status
    }
}

impl Validate for WorktreeStatus {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_clean()
    }
}

impl Redact for WorktreeStatus {
    fn redacted(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for WorktreeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            return write!(f, "clean");
        }
        let flags: Vec<&str> = [
            (self.has_unstaged, "unstaged"),
            (self.has_staged, "staged"),
            (self.has_untracked, "untracked"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect();
        write!(f, "{}", flags.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_clean() {
        let status = WorktreeStatus::default();
        assert!(status.is_clean());
        assert!(status.is_zero());
        assert!(status.validate().is_ok());
        assert_eq!(status.to_string(), "clean");
    }

    #[test]
    fn untracked_only() {
        let status = WorktreeStatus {
            has_untracked: true,
            ..Default::default()
        };
        assert!(!status.is_clean());
        assert_eq!(status.to_string(), "untracked");
    }

    #[test]
    fn all_flags_display() {
        let status = WorktreeStatus {
            has_unstaged: true,
            has_staged: true,
            has_untracked: true,
        };
        assert_eq!(status.to_string(), "unstaged, staged, untracked");
        assert_eq!(status.redacted(), status.to_string());
    }

    #[test]
    fn porcelain_staged_and_unstaged() {
        let status = WorktreeStatus::from_porcelain("M  staged.rs\n M unstaged.rs\n");
        assert!(status.has_staged);
        assert!(status.has_unstaged);
        assert!(!status.has_untracked);
    }

    #[test]
    fn porcelain_both_columns() {
        let status = WorktreeStatus::from_porcelain("MM both.rs");
        assert!(status.has_staged && status.has_unstaged);
    }

    #[test]
    fn porcelain_ignores_headers_and_ignored() {
        let status = WorktreeStatus::from_porcelain("## main...origin/main\n!! target/\n\n");
        assert!(status.is_clean());
    }

    #[test]
    fn porcelain_rename_is_staged() {
        let status = WorktreeStatus::from_porcelain("R  old.rs -> new.rs\n");
        assert!(status.has_staged);
        assert!(!status.has_unstaged);
    }

    #[test]
    fn zero_status_serializes() {
        let json = serde_json::to_string(&WorktreeStatus::default()).unwrap();
        assert_eq!(
            json,
            r#"{"has_unstaged":false,"has_staged":false,"has_untracked":false}"#
        );
    }

    #[test]
    fn deserialize_fills_missing_flags() {
        let status: WorktreeStatus = serde_json::from_str(r#"{"has_staged":true}"#).unwrap();
        assert_eq!(
            status,
            WorktreeStatus {
                has_staged: true,
                ..Default::default()
            }
        );
    }
}
