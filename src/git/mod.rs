//! git
//!
//! Read-only bridge from a `git2` repository to the value types.
//!
//! # Architecture
//!
//! This module is the only place that imports `git2`. Everything it
//! returns is built through the validating constructors in [`crate::types`],
//! so values read from a repository satisfy the same invariants as values
//! decoded from JSON or YAML.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Ref resolution (`HEAD`, branches, tags, remotes)
//! - Commit lookup, including the files changed against the first parent
//! - Tag lookup (lightweight and annotated)
//! - Working tree status
//!
//! Lookups are single-object: there is no history walking here.
//!
//! # Example
//!
//! ```ignore
//! use gitdomain::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let head = git.head()?;
//! let commit = git.commit(&head.hash)?;
//! println!("{}", commit.redacted());
//! ```

mod interface;

pub use interface::{Git, GitError};
