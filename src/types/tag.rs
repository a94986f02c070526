//! types::tag
//!
//! Lightweight and annotated tags.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::hash::Hash;
use super::limits::MAX_TAG_MESSAGE_LEN;
use super::names::TagName;
use super::{checked, ensure_serializable, Redact, Validate, ValidationError};

/// A tag pointing at a commit.
///
/// For an annotated tag, `object` is the tag object's own hash and `commit`
/// the commit it peels to. For a lightweight tag both are the commit hash
/// and `message` must be empty.
///
/// # Example
///
/// ```
/// use gitdomain::types::{Hash, Tag, TagName};
///
/// let commit = Hash::new("abc123def4567890abc123def4567890abc12345").unwrap();
/// let tag = Tag::lightweight(TagName::new("v1.0.0").unwrap(), commit).unwrap();
/// assert!(!tag.annotated);
/// assert_eq!(tag.object, tag.commit);
/// assert_eq!(tag.to_string(), "v1.0.0 -> abc123def4567890abc123def4567890abc12345 (lightweight)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "TagRepr")]
pub struct Tag {
    /// Tag name
    pub name: TagName,
    /// Object the tag ref points at (tag object or commit)
    pub object: Hash,
    /// Commit the tag peels to
    pub commit: Hash,
    /// Whether this is an annotated tag
    pub annotated: bool,
    /// Annotation message (annotated tags only)
    pub message: String,
}

impl Tag {
    /// A lightweight tag: a ref pointing straight at `commit`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name or commit is zero.
    pub fn lightweight(name: TagName, commit: Hash) -> Result<Self, ValidationError> {
        let tag = Self {
            name,
            object: commit.clone(),
            commit,
            annotated: false,
            message: String::new(),
        };
        tag.validate()?;
        Ok(tag)
    }

    /// An annotated tag. The message is trimmed.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a required field is zero or the
    /// message is too large.
    pub fn annotated(
        name: TagName,
        object: Hash,
        commit: Hash,
        message: &str,
    ) -> Result<Self, ValidationError> {
        let tag = Self {
            name,
            object,
            commit,
            annotated: true,
            message: message.trim().to_string(),
        };
        tag.validate()?;
        Ok(tag)
    }

    fn render(&self, commit: &str) -> String {
        let kind = if self.annotated {
            "annotated"
        } else {
            "lightweight"
        };
        format!("{} -> {} ({kind})", self.name, commit)
    }
}

impl Validate for Tag {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_zero() {
            return Err(ValidationError::new("Tag", "name", "is required"));
        }
        self.name.validate().map_err(|e| e.within("Tag", "name"))?;
        for (field, hash) in [("object", &self.object), ("commit", &self.commit)] {
            if hash.is_zero() {
                return Err(ValidationError::new("Tag", field, "is required"));
            }
            hash.validate().map_err(|e| e.within("Tag", field))?;
        }
        if !self.annotated && !self.message.is_empty() {
            return Err(ValidationError::new(
                "Tag",
                "message",
                "only annotated tags carry a message",
            ));
        }
        if self.message.len() > MAX_TAG_MESSAGE_LEN {
            return Err(ValidationError::new(
                "Tag",
                "message",
                format!(
                    "must be at most {MAX_TAG_MESSAGE_LEN} bytes, got {}",
                    self.message.len()
                ),
            ));
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.name.is_zero()
            && self.object.is_zero()
            && self.commit.is_zero()
            && !self.annotated
            && self.message.is_empty()
    }
}

impl Redact for Tag {
    fn redacted(&self) -> String {
        self.render(self.commit.short())
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(self.commit.as_str()))
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ensure_serializable::<_, S::Error>(self)?;
        let mut state = serializer.serialize_struct("Tag", 5)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("object", &self.object)?;
        state.serialize_field("commit", &self.commit)?;
        state.serialize_field("annotated", &self.annotated)?;
        if self.message.is_empty() {
            state.skip_field("message")?;
        } else {
            state.serialize_field("message", &self.message)?;
        }
        state.end()
    }
}

/// Wire form of [`Tag`].
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TagRepr {
    name: TagName,
    object: Hash,
    commit: Hash,
    annotated: bool,
    message: String,
}

impl TryFrom<TagRepr> for Tag {
    type Error = ValidationError;

    fn try_from(repr: TagRepr) -> Result<Self, Self::Error> {
        checked(Tag {
            name: repr.name,
            object: repr.object,
            commit: repr.commit,
            annotated: repr.annotated,
            message: repr.message,
        })
    }
}
