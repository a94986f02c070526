//! types::commit
//!
//! Commit metadata.
//!
//! # Message and summary
//!
//! `summary` must equal the trimmed first line of `message`. [`Commit::new`]
//! derives it when given an empty summary; struct literals do not, and fail
//! validation if the two disagree. Messages must use LF line endings. CR
//! is rejected rather than normalized so that encoding bugs upstream stay
//! visible.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::change::FileChange;
use super::hash::Hash;
use super::limits::{MAX_CHANGES, MAX_MESSAGE_LEN, MAX_PARENTS, MAX_SUMMARY_LEN};
use super::signature::Signature;
use super::{checked, ensure_serializable, Redact, Validate, ValidationError};

/// The trimmed first line of a commit message.
fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("").trim()
}

/// A commit and the files it touched.
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use gitdomain::types::{Commit, Hash, Signature, Validate};
///
/// let when = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap();
/// let jane = Signature::new("Jane", "jane@example.com", when).unwrap();
/// let commit = Commit::new(
///     Hash::new("abc123def4567890abc123def4567890abc12345").unwrap(),
///     vec![],
///     jane.clone(),
///     jane,
///     "feat: add widgets\n\nLonger body.\n",
///     "",
///     vec![],
/// )
/// .unwrap();
///
/// assert_eq!(commit.summary, "feat: add widgets");
/// assert!(commit.is_root());
///
/// let diverged = gitdomain::types::Commit { summary: "wrong".into(), ..commit };
/// assert!(diverged.validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "CommitRepr")]
pub struct Commit {
    /// Commit hash
    pub hash: Hash,
    /// Parent hashes, first parent first
    pub parents: Vec<Hash>,
    /// Who wrote the change
    pub author: Signature,
    /// Who recorded the commit
    pub committer: Signature,
    /// Full message, LF line endings
    pub message: String,
    /// First line of `message`
    pub summary: String,
    /// Files touched, relative to the first parent
    pub changes: Vec<FileChange>,
}

impl Commit {
    /// Create a validated commit.
    ///
    /// Surrounding whitespace other than CR is trimmed from the message. An
    /// empty `summary` is derived from the first line of the message.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first invalid field.
    pub fn new(
        hash: Hash,
        parents: Vec<Hash>,
        author: Signature,
        committer: Signature,
        message: &str,
        summary: &str,
        changes: Vec<FileChange>,
    ) -> Result<Self, ValidationError> {
        // CR survives the trim so validation still reports it.
        let message = message
            .trim_matches(|c: char| c.is_whitespace() && c != '\r')
            .to_string();
        let summary = match summary.trim() {
            "" => first_line(&message).to_string(),
            given => given.to_string(),
        };
        let commit = Self {
            hash,
            parents,
            author,
            committer,
            message,
            summary,
            changes,
        };
        commit.validate()?;
        Ok(commit)
    }

    /// Whether the commit has no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Whether the commit has more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Message body: everything after the summary line and its blank separator.
    pub fn body(&self) -> &str {
        match self.message.split_once('\n') {
            Some((_, rest)) => rest.trim_start_matches('\n'),
            None => "",
        }
    }

    fn validate_message(&self) -> Result<(), ValidationError> {
        if self.message.is_empty() {
            return Err(ValidationError::new("Commit", "message", "is required"));
        }
        if self.message.len() > MAX_MESSAGE_LEN {
            return Err(ValidationError::new(
                "Commit",
                "message",
                format!(
                    "must be at most {MAX_MESSAGE_LEN} bytes, got {}",
                    self.message.len()
                ),
            ));
        }
        if self.message.contains('\r') {
            return Err(ValidationError::new(
                "Commit",
                "message",
                "must use LF line endings (found CR)",
            ));
        }

        if self.summary.is_empty() {
            return Err(ValidationError::new("Commit", "summary", "is required"));
        }
        if self.summary.len() > MAX_SUMMARY_LEN {
            return Err(ValidationError::new(
                "Commit",
                "summary",
                format!(
                    "must be at most {MAX_SUMMARY_LEN} bytes, got {}",
                    self.summary.len()
                ),
            ));
        }
        if self.summary.contains(['\n', '\r']) {
            return Err(ValidationError::new(
                "Commit",
                "summary",
                "must be a single line",
            ));
        }
        if self.summary != first_line(&self.message) {
            return Err(ValidationError::new(
                "Commit",
                "summary",
                "must equal the first line of message",
            ));
        }
        Ok(())
    }
}

impl Validate for Commit {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.hash.is_zero() {
            return Err(ValidationError::new("Commit", "hash", "is required"));
        }
        self.hash
            .validate()
            .map_err(|e| e.within("Commit", "hash"))?;

        if self.parents.len() > MAX_PARENTS {
            return Err(ValidationError::new(
                "Commit",
                "parents",
                format!(
                    "at most {MAX_PARENTS} parents allowed, got {}",
                    self.parents.len()
                ),
            ));
        }
        for (i, parent) in self.parents.iter().enumerate() {
            let field = format!("parents[{i}]");
            if parent.is_zero() {
                return Err(ValidationError::new("Commit", field, "is required"));
            }
            parent.validate().map_err(|e| e.within("Commit", &field))?;
        }

        for (field, sig) in [("author", &self.author), ("committer", &self.committer)] {
            if sig.is_zero() {
                return Err(ValidationError::new("Commit", field, "is required"));
            }
            sig.validate().map_err(|e| e.within("Commit", field))?;
        }

        self.validate_message()?;

        if self.changes.len() > MAX_CHANGES {
            return Err(ValidationError::new(
                "Commit",
                "changes",
                format!(
                    "at most {MAX_CHANGES} changes allowed, got {}",
                    self.changes.len()
                ),
            ));
        }
        for (i, change) in self.changes.iter().enumerate() {
            change
                .validate()
                .map_err(|e| e.within("Commit", &format!("changes[{i}]")))?;
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.hash.is_zero()
            && self.parents.is_empty()
            && self.author.is_zero()
            && self.committer.is_zero()
            && self.message.is_empty()
            && self.summary.is_empty()
            && self.changes.is_empty()
    }
}

impl Redact for Commit {
    fn redacted(&self) -> String {
        format!(
            "{} {} ({})",
            self.hash.short(),
            self.summary,
            self.author.redacted()
        )
    }
}

impl std::fmt::Display for Commit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.hash, self.summary, self.author)
    }
}

impl Serialize for Commit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ensure_serializable::<_, S::Error>(self)?;
        let mut state = serializer.serialize_struct("Commit", 7)?;
        state.serialize_field("hash", &self.hash)?;
        state.serialize_field("parents", &self.parents)?;
        state.serialize_field("author", &self.author)?;
        state.serialize_field("committer", &self.committer)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("summary", &self.summary)?;
        state.serialize_field("changes", &self.changes)?;
        state.end()
    }
}

/// Wire form of [`Commit`].
///
/// A missing author or committer decodes as the zero signature so it is
/// reported against the commit field.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CommitRepr {
    #[serde(default)]
    hash: Hash,
    #[serde(default)]
    parents: Vec<Hash>,
    #[serde(default)]
    author: Option<Signature>,
    #[serde(default)]
    committer: Option<Signature>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    changes: Vec<FileChange>,
}

impl TryFrom<CommitRepr> for Commit {
    type Error = ValidationError;

    fn try_from(repr: CommitRepr) -> Result<Self, Self::Error> {
        checked(Commit {
            hash: repr.hash,
            parents: repr.parents,
            author: repr.author.unwrap_or_default(),
            committer: repr.committer.unwrap_or_default(),
            message: repr.message,
            summary: repr.summary,
            changes: repr.changes,
        })
    }
}
