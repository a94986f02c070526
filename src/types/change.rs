//! types::change
//!
//! Paths touched by a commit.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::limits::MAX_PATH_LEN;
use super::{checked, ensure_serializable, Redact, Validate, ValidationError};

/// How a file changed.
///
/// Serializes to its lowercase name; the type-change variant is written as
/// `type-changed` and also read from `type_changed` or `typechanged`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileChangeKind {
    /// Unknown or unmerged
    #[default]
    Unknown,
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    /// File type changed (e.g. regular file to symlink)
    #[serde(alias = "type_changed", alias = "typechanged")]
    TypeChanged,
}

impl FileChangeKind {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileChangeKind::Unknown => "unknown",
            FileChangeKind::Added => "added",
            FileChangeKind::Modified => "modified",
            FileChangeKind::Deleted => "deleted",
            FileChangeKind::Renamed => "renamed",
            FileChangeKind::Copied => "copied",
            FileChangeKind::TypeChanged => "type-changed",
        }
    }

    /// The `git diff --name-status` letter for this kind.
    pub fn status_letter(&self) -> char {
        match self {
            FileChangeKind::Unknown => 'X',
            FileChangeKind::Added => 'A',
            FileChangeKind::Modified => 'M',
            FileChangeKind::Deleted => 'D',
            FileChangeKind::Renamed => 'R',
            FileChangeKind::Copied => 'C',
            FileChangeKind::TypeChanged => 'T',
        }
    }

    /// Map a `git diff --name-status` letter to a kind.
    ///
    /// `U` (unmerged) and `X` (unknown) map to [`FileChangeKind::Unknown`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for letters Git does not emit.
    pub fn from_status_letter(letter: char) -> Result<Self, ValidationError> {
        match letter {
            'A' => Ok(FileChangeKind::Added),
            'M' => Ok(FileChangeKind::Modified),
            'D' => Ok(FileChangeKind::Deleted),
            'R' => Ok(FileChangeKind::Renamed),
            'C' => Ok(FileChangeKind::Copied),
            'T' => Ok(FileChangeKind::TypeChanged),
            'U' | 'X' => Ok(FileChangeKind::Unknown),
            other => Err(ValidationError::new(
                "FileChangeKind",
                "value",
                format!("unknown status letter {other:?}"),
            )),
        }
    }

    /// Whether this kind carries a source path (`old_path`).
    pub fn has_source(&self) -> bool {
        matches!(self, FileChangeKind::Renamed | FileChangeKind::Copied)
    }
}

impl std::str::FromStr for FileChangeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unknown" => Ok(FileChangeKind::Unknown),
            "added" => Ok(FileChangeKind::Added),
            "modified" => Ok(FileChangeKind::Modified),
            "deleted" => Ok(FileChangeKind::Deleted),
            "renamed" => Ok(FileChangeKind::Renamed),
            "copied" => Ok(FileChangeKind::Copied),
            "type-changed" | "type_changed" | "typechanged" => Ok(FileChangeKind::TypeChanged),
            other => Err(ValidationError::new(
                "FileChangeKind",
                "value",
                format!("unknown file change kind '{other}'"),
            )),
        }
    }
}

impl std::fmt::Display for FileChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn check_path(field: &'static str, path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("FileChange", field, "is required"));
    }
    if path.len() > MAX_PATH_LEN {
        return Err(ValidationError::new(
            "FileChange",
            field,
            format!("must be at most {MAX_PATH_LEN} bytes, got {}", path.len()),
        ));
    }
    if path.starts_with('/') {
        return Err(ValidationError::new(
            "FileChange",
            field,
            "must be relative to the repository root",
        ));
    }
    Ok(())
}

/// A single path changed by a commit.
///
/// `old_path` is only allowed for renames and copies. A rename or copy
/// without `old_path` is still accepted, as partial data.
///
/// # Example
///
/// ```
/// use gitdomain::types::{FileChange, FileChangeKind, Validate};
///
/// let rename = FileChange::parse_name_status("R087\tsrc/old.rs\tsrc/new.rs").unwrap();
/// assert_eq!(rename.kind, FileChangeKind::Renamed);
/// assert_eq!(rename.old_path, "src/old.rs");
/// assert_eq!(rename.to_string(), "R src/old.rs -> src/new.rs");
///
/// let bogus = FileChange { kind: FileChangeKind::Modified, ..rename };
/// assert!(bogus.validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "FileChangeRepr")]
pub struct FileChange {
    /// Path after the change, relative to the repository root
    pub path: String,
    /// Source path for renames and copies
    pub old_path: String,
    /// Kind of change
    pub kind: FileChangeKind,
}

impl FileChange {
    /// Create a validated file change. Paths are taken verbatim.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a path is malformed or `old_path` is
    /// set for a kind other than rename/copy.
    pub fn new(
        path: impl Into<String>,
        old_path: impl Into<String>,
        kind: FileChangeKind,
    ) -> Result<Self, ValidationError> {
        let change = Self {
            path: path.into(),
            old_path: old_path.into(),
            kind,
        };
        change.validate()?;
        Ok(change)
    }

    /// Parse one line of `git diff --name-status` output.
    ///
    /// Renames and copies carry a similarity score (`R100`) and two paths;
    /// everything else has one path.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the line is malformed.
    pub fn parse_name_status(line: &str) -> Result<Self, ValidationError> {
        let malformed = |reason: String| ValidationError::new("FileChange", "", reason);

        let mut fields = line.trim_end_matches(['\n', '\r']).split('\t');
        let status = fields.next().unwrap_or_default();
        let letter = status
            .chars()
            .next()
            .ok_or_else(|| malformed("missing status".to_string()))?;
        let kind = FileChangeKind::from_status_letter(letter)
            .map_err(|e| e.within("FileChange", "kind"))?;

        let rest: Vec<&str> = fields.collect();
        let (old_path, path) = match (kind.has_source(), rest.as_slice()) {
            (true, [old, new]) => (*old, *new),
            (false, [path]) => ("", *path),
            (_, parts) => {
                return Err(malformed(format!(
                    "expected {} path(s) for status {status}, got {}",
                    if kind.has_source() { 2 } else { 1 },
                    parts.len()
                )))
            }
        };
        Self::new(path, old_path, kind)
    }
}

impl Validate for FileChange {
    fn validate(&self) -> Result<(), ValidationError> {
        check_path("path", &self.path)?;
        if !self.old_path.is_empty() {
            if !self.kind.has_source() {
                return Err(ValidationError::new(
                    "FileChange",
                    "old_path",
                    format!("is only allowed for renamed or copied files, not {}", self.kind),
                ));
            }
            check_path("old_path", &self.old_path)?;
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.path.is_empty() && self.old_path.is_empty() && self.kind == FileChangeKind::Unknown
    }
}

impl Redact for FileChange {
    fn redacted(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for FileChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.old_path.is_empty() {
            write!(f, "{} {}", self.kind.status_letter(), self.path)
        } else {
            write!(
                f,
                "{} {} -> {}",
                self.kind.status_letter(),
                self.old_path,
                self.path
            )
        }
    }
}

impl Serialize for FileChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ensure_serializable::<_, S::Error>(self)?;
        let mut state = serializer.serialize_struct("FileChange", 3)?;
        state.serialize_field("path", &self.path)?;
        if self.old_path.is_empty() {
            state.skip_field("old_path")?;
        } else {
            state.serialize_field("old_path", &self.old_path)?;
        }
        state.serialize_field("kind", &self.kind)?;
        state.end()
    }
}

/// Wire form of [`FileChange`].
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileChangeRepr {
    path: String,
    old_path: String,
    kind: FileChangeKind,
}

impl TryFrom<FileChangeRepr> for FileChange {
    type Error = ValidationError;

    fn try_from(repr: FileChangeRepr) -> Result<Self, Self::Error> {
        checked(FileChange {
            path: repr.path,
            old_path: repr.old_path,
            kind: repr.kind,
        })
    }
}
