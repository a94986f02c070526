//! types
//!
//! Validated value types for Git metadata.
//!
//! # Types
//!
//! - [`Hash`] - Commit/object hash (SHA-1 or SHA-256 hex)
//! - [`RefName`] / [`TagName`] - Reference and tag names
//! - [`Ref`] / [`RefKind`] - A named pointer to a commit, with its syntactic kind
//! - [`CommitRange`] / [`CommitRangeSpec`] - `A..B` history intervals
//! - [`Signature`] - Author/committer identity
//! - [`FileChange`] / [`FileChangeKind`] - A path touched by a commit
//! - [`Commit`] - Commit metadata aggregate
//! - [`Tag`] - Lightweight or annotated tag
//! - [`WorktreeStatus`] - Dirty flags for a working tree
//!
//! # Validation
//!
//! Scalar types ([`Hash`], [`RefName`], [`TagName`]) keep their field
//! private, so a value that exists is a value that passed validation.
//! Aggregates have public fields and are checked with [`Validate::validate`].
//! Serialization of an invalid aggregate fails and produces no output;
//! deserialization validates before handing anything back.
//!
//! # Example
//!
//! ```
//! use gitdomain::types::{Hash, Ref, RefKind, RefName, Validate};
//!
//! let hash = Hash::parse("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
//! let main = Ref {
//!     name: RefName::new("refs/heads/main").unwrap(),
//!     kind: RefKind::Branch,
//!     hash,
//! };
//! assert!(main.validate().is_ok());
//!
//! let wrong = Ref { kind: RefKind::Tag, ..main };
//! assert!(wrong.validate().is_err());
//! ```

pub mod change;
pub mod commit;
mod email;
pub mod hash;
pub mod limits;
pub mod names;
pub mod range;
pub mod reference;
pub mod signature;
pub mod tag;
pub mod worktree;

pub use change::{FileChange, FileChangeKind};
pub use commit::Commit;
pub use hash::Hash;
pub use names::{RefName, TagName};
pub use range::{CommitRange, CommitRangeSpec};
pub use reference::{Ref, RefKind};
pub use signature::Signature;
pub use tag::Tag;
pub use worktree::WorktreeStatus;

use thiserror::Error;

/// A value failed validation.
///
/// Carries the type that rejected the value, the offending field (a dotted
/// path for nested values, `value` for scalar types) and a reason.
///
/// # Example
///
/// ```
/// use gitdomain::types::{FileChange, FileChangeKind, Validate};
///
/// let change = FileChange {
///     path: "a.go".into(),
///     old_path: "b.go".into(),
///     kind: FileChangeKind::Modified,
/// };
/// let err = change.validate().unwrap_err();
/// assert_eq!(err.type_name(), "FileChange");
/// assert_eq!(err.field(), "old_path");
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {type_name}.{field}: {reason}")]
pub struct ValidationError {
    type_name: &'static str,
    field: String,
    reason: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(
        type_name: &'static str,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            type_name,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Re-root an error raised by a nested value under `prefix`.
    ///
    /// ```
    /// use gitdomain::types::ValidationError;
    ///
    /// let inner = ValidationError::new("Signature", "email", "is required");
    /// let outer = inner.within("Commit", "author");
    /// assert_eq!(outer.to_string(), "invalid Commit.author.email: is required");
    /// ```
    pub fn within(self, type_name: &'static str, prefix: &str) -> Self {
        let field = if self.field.is_empty() {
            prefix.to_string()
        } else {
            format!("{prefix}.{}", self.field)
        };
        Self {
            type_name,
            field,
            reason: self.reason,
        }
    }

    /// The type that rejected the value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The offending field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Why the value was rejected.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Invariant checks shared by every value type.
pub trait Validate {
    /// Check the value's invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first violated field.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Whether every field holds its zero value.
    fn is_zero(&self) -> bool;
}

/// Privacy-reduced rendering for production logs.
///
/// Hashes are shortened and email local parts masked; everything else
/// renders as its `Display` form.
pub trait Redact {
    /// Render the value with sensitive parts reduced.
    fn redacted(&self) -> String;
}

/// Fail serialization of an invalid value before any bytes are written.
pub(crate) fn ensure_serializable<T, E>(value: &T) -> Result<(), E>
where
    T: Validate + Redact,
    E: serde::ser::Error,
{
    value.validate().map_err(|err| {
        tracing::debug!(
            value = %value.redacted(),
            error = %err,
            "refusing to serialize invalid value"
        );
        E::custom(err)
    })
}

/// Validate a freshly decoded value, discarding it on failure.
pub(crate) fn checked<T>(value: T) -> Result<T, ValidationError>
where
    T: Validate + Redact,
{
    match value.validate() {
        Ok(()) => Ok(value),
        Err(err) => {
            tracing::debug!(value = %value.redacted(), error = %err, "rejected decoded value");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_type_field_and_reason() {
        let err = ValidationError::new("Hash", "value", "must be lowercase");
        assert_eq!(err.to_string(), "invalid Hash.value: must be lowercase");
    }

    #[test]
    fn within_prefixes_nested_field() {
        let err = ValidationError::new("Ref", "kind", "mismatch").within("CommitRange", "to");
        assert_eq!(err.type_name(), "CommitRange");
        assert_eq!(err.field(), "to.kind");
        assert_eq!(err.reason(), "mismatch");
    }

    #[test]
    fn within_empty_field_uses_prefix() {
        let err = ValidationError::new("Signature", "", "is required").within("Commit", "author");
        assert_eq!(err.field(), "author");
    }
}
