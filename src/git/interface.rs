//! git::interface
//!
//! The git2-backed reader.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::types::{
    Commit, FileChange, FileChangeKind, Hash, Ref, RefKind, RefName, Signature, Tag, TagName,
    ValidationError, WorktreeStatus,
};

/// Errors from Git reads.
#[derive(Debug, Error)]
pub enum GitError {
    /// Path is not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched from
        path: PathBuf,
    },

    /// Reference does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The missing ref
        refname: String,
    },

    /// Object does not exist.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The missing object id
        oid: String,
    },

    /// Repository data did not form a valid value.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Any other git2 failure.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with the ref or oid being read.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound if context.starts_with("refs/") || context == "HEAD" => {
                GitError::RefNotFound {
                    refname: context.to_string(),
                }
            }
            git2::ErrorCode::NotFound => GitError::ObjectNotFound {
                oid: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<git2::Delta> for FileChangeKind {
    fn from(delta: git2::Delta) -> Self {
        match delta {
            git2::Delta::Added => FileChangeKind::Added,
            git2::Delta::Modified => FileChangeKind::Modified,
            git2::Delta::Deleted => FileChangeKind::Deleted,
            git2::Delta::Renamed => FileChangeKind::Renamed,
            git2::Delta::Copied => FileChangeKind::Copied,
            git2::Delta::Typechange => FileChangeKind::TypeChanged,
            _ => FileChangeKind::Unknown,
        }
    }
}

fn hash_of(oid: git2::Oid) -> Result<Hash, ValidationError> {
    Hash::new(oid.to_string())
}

fn oid_of(hash: &Hash) -> Result<git2::Oid, GitError> {
    git2::Oid::from_str(hash.as_str()).map_err(|e| GitError::from_git2(e, hash.as_str()))
}

fn signature_of(sig: &git2::Signature<'_>) -> Result<Signature, ValidationError> {
    let time = sig.when();
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
        .ok_or_else(|| ValidationError::new("Signature", "when", "timezone offset out of range"))?;
    let when = DateTime::from_timestamp(time.seconds(), 0)
        .ok_or_else(|| ValidationError::new("Signature", "when", "timestamp out of range"))?
        .with_timezone(&offset);
    Signature::new(
        &String::from_utf8_lossy(sig.name_bytes()),
        &String::from_utf8_lossy(sig.email_bytes()),
        when,
    )
}

fn path_of(file: git2::DiffFile<'_>) -> String {
    file.path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read access to a Git repository.
///
/// # Example
///
/// ```ignore
/// use gitdomain::git::Git;
/// use gitdomain::types::TagName;
///
/// let git = Git::open(std::path::Path::new("."))?;
/// let tag = git.tag(&TagName::new("v1.0.0")?)?;
/// if !git.worktree_status()?.is_clean() {
///     eprintln!("refusing to release from a dirty tree");
/// }
/// ```
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open the repository containing `path`.
    ///
    /// Searches parent directories like `git` does.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotARepo`] if no repository is found.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        tracing::trace!(git_dir = %repo.path().display(), "opened repository");
        Ok(Self { repo })
    }

    /// The `HEAD` ref, resolved to its commit.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if HEAD is unborn.
    pub fn head(&self) -> Result<Ref, GitError> {
        let commit = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;
        Ok(Ref::head(hash_of(commit.id())?))
    }

    /// Resolve a full ref name (e.g. `refs/heads/main`) to a [`Ref`].
    ///
    /// The kind is inferred from the name.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if the ref does not exist.
    pub fn resolve_ref(&self, name: &RefName) -> Result<Ref, GitError> {
        let commit = self
            .repo
            .find_reference(name.as_str())
            .and_then(|r| r.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, name.as_str()))?;
        let hash = hash_of(commit.id())?;
        tracing::trace!(refname = %name, hash = %hash.short(), "resolved ref");
        Ok(Ref::new(name.clone(), RefKind::infer(name), hash)?)
    }

    /// Look up a commit and the files it changed against its first parent.
    ///
    /// Root commits report every file as added. Renames are detected.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ObjectNotFound`] if the commit does not exist,
    /// or [`GitError::Invalid`] if its data fails validation (for example a
    /// CRLF message).
    pub fn commit(&self, hash: &Hash) -> Result<Commit, GitError> {
        let commit = self
            .repo
            .find_commit(oid_of(hash)?)
            .map_err(|e| GitError::from_git2(e, hash.as_str()))?;

        let parents = commit
            .parent_ids()
            .map(hash_of)
            .collect::<Result<Vec<_>, _>>()?;
        let author = signature_of(&commit.author()).map_err(|e| e.within("Commit", "author"))?;
        let committer =
            signature_of(&commit.committer()).map_err(|e| e.within("Commit", "committer"))?;
        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let changes = self.changes(&commit)?;

        tracing::trace!(hash = %hash.short(), changes = changes.len(), "read commit");
        Ok(Commit::new(
            hash.clone(),
            parents,
            author,
            committer,
            &message,
            "",
            changes,
        )?)
    }

    fn changes(&self, commit: &git2::Commit<'_>) -> Result<Vec<FileChange>, GitError> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?.tree()?),
        };

        let mut diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        let mut find = git2::DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find))?;

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let kind = FileChangeKind::from(delta.status());
            let old_path = if kind.has_source() {
                path_of(delta.old_file())
            } else {
                String::new()
            };
            changes.push(FileChange::new(path_of(delta.new_file()), old_path, kind)?);
        }
        Ok(changes)
    }

    /// Look up a tag by name.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if the tag does not exist.
    pub fn tag(&self, name: &TagName) -> Result<Tag, GitError> {
        let refname = format!("refs/tags/{}", name.as_str());
        let reference = self
            .repo
            .find_reference(&refname)
            .map_err(|e| GitError::from_git2(e, &refname))?;
        let commit = hash_of(
            reference
                .peel_to_commit()
                .map_err(|e| GitError::from_git2(e, &refname))?
                .id(),
        )?;
        let target = reference.target().ok_or_else(|| GitError::RefNotFound {
            refname: refname.clone(),
        })?;

        let object = self
            .repo
            .find_object(target, None)
            .map_err(|e| GitError::from_git2(e, &target.to_string()))?;
        let tag = match object.into_tag() {
            Ok(annotation) => {
                let message =
                    String::from_utf8_lossy(annotation.message_bytes().unwrap_or_default())
                        .into_owned();
                Tag::annotated(name.clone(), hash_of(target)?, commit, &message)?
            }
            Err(_) => Tag::lightweight(name.clone(), commit)?,
        };
        tracing::trace!(tag = %name, annotated = tag.annotated, "read tag");
        Ok(tag)
    }

    /// Summarize working tree changes, including untracked files.
    ///
    /// # Errors
    ///
    /// Fails for bare repositories.
    pub fn worktree_status(&self) -> Result<WorktreeStatus, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;

        let mut result = WorktreeStatus::default();
        for entry in statuses.iter() {
            let status = entry.status();

            if status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_index_renamed()
                || status.is_index_typechange()
            {
                result.has_staged = true;
            }

            if status.is_wt_modified()
                || status.is_wt_deleted()
                || status.is_wt_renamed()
                || status.is_wt_typechange()
                || status.is_conflicted()
            {
                result.has_unstaged = true;
            }

            if status.is_wt_new() {
                result.has_untracked = true;
            }
        }

        Ok(result)
    }
}
