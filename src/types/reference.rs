//! types::reference
//!
//! Refs: a name, its syntactic kind and the commit it points at.
//!
//! # Kind/name consistency
//!
//! When a ref's kind is anything but [`RefKind::Unknown`], its name must
//! agree with the kind:
//!
//! | name | kind |
//! |---|---|
//! | `refs/heads/*` | [`RefKind::Branch`] |
//! | `refs/remotes/*` | [`RefKind::RemoteBranch`] |
//! | `refs/tags/*` | [`RefKind::Tag`] |
//! | `HEAD` | [`RefKind::Head`] |
//! | 40/64 lowercase hex | [`RefKind::Hash`] |
//! | anything else | any kind |
//!
//! Short names like `v1.0.0` or `main` are ambiguous without a repository,
//! so they are accepted with any kind.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::hash::{is_canonical_hash, Hash};
use super::names::RefName;
use super::{checked, ensure_serializable, Redact, Validate, ValidationError};

/// The syntactic kind of a ref.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefKind {
    /// Kind not known; skips the kind/name consistency check.
    #[default]
    Unknown,
    /// Local branch (`refs/heads/*`)
    Branch,
    /// Remote-tracking branch (`refs/remotes/*`)
    #[serde(alias = "remote_branch", alias = "remotebranch")]
    RemoteBranch,
    /// Tag (`refs/tags/*`)
    Tag,
    /// The `HEAD` symbolic ref
    Head,
    /// A raw commit hash used as a ref
    Hash,
}

impl RefKind {
    /// The kind a name requires, if the name is unambiguous.
    ///
    /// # Example
    ///
    /// ```
    /// use gitdomain::types::{RefKind, RefName};
    ///
    /// let name = RefName::new("refs/tags/v1.0.0").unwrap();
    /// assert_eq!(RefKind::implied_by(&name), Some(RefKind::Tag));
    ///
    /// let short = RefName::new("v1.0.0").unwrap();
    /// assert_eq!(RefKind::implied_by(&short), None);
    /// ```
    pub fn implied_by(name: &RefName) -> Option<RefKind> {
        let name = name.as_str();
        if name.starts_with("refs/heads/") {
            Some(RefKind::Branch)
        } else if name.starts_with("refs/remotes/") {
            Some(RefKind::RemoteBranch)
        } else if name.starts_with("refs/tags/") {
            Some(RefKind::Tag)
        } else if name == "HEAD" {
            Some(RefKind::Head)
        } else if is_canonical_hash(name) {
            Some(RefKind::Hash)
        } else {
            None
        }
    }

    /// Infer a kind from a name, falling back to [`RefKind::Unknown`].
    pub fn infer(name: &RefName) -> RefKind {
        Self::implied_by(name).unwrap_or_default()
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::Unknown => "unknown",
            RefKind::Branch => "branch",
            RefKind::RemoteBranch => "remote-branch",
            RefKind::Tag => "tag",
            RefKind::Head => "head",
            RefKind::Hash => "hash",
        }
    }
}

impl std::str::FromStr for RefKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unknown" | "" => Ok(RefKind::Unknown),
            "branch" => Ok(RefKind::Branch),
            "remote-branch" | "remote_branch" | "remotebranch" => Ok(RefKind::RemoteBranch),
            "tag" => Ok(RefKind::Tag),
            "head" => Ok(RefKind::Head),
            "hash" => Ok(RefKind::Hash),
            other => Err(ValidationError::new(
                "RefKind",
                "value",
                format!("unknown ref kind '{other}'"),
            )),
        }
    }
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named pointer to a commit.
///
/// The zero `Ref` (all fields zero) is valid and stands for "no ref", e.g.
/// the open lower bound of a [`CommitRange`](super::CommitRange).
///
/// # Example
///
/// ```
/// use gitdomain::types::{Hash, Ref, RefKind, Validate};
///
/// let hash = Hash::new("abc123def4567890abc123def4567890abc12345").unwrap();
/// let main = Ref::branch("main", hash).unwrap();
/// assert_eq!(main.name.as_str(), "refs/heads/main");
/// assert_eq!(main.kind, RefKind::Branch);
/// assert_eq!(main.label(), "refs/heads/main (abc123d)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RefRepr")]
pub struct Ref {
    /// Reference name (may be empty for a bare hash)
    pub name: RefName,
    /// Syntactic kind
    pub kind: RefKind,
    /// Commit the ref points at (may be zero if unresolved)
    pub hash: Hash,
}

impl Ref {
    /// Create a validated ref.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the kind disagrees with the name.
    pub fn new(name: RefName, kind: RefKind, hash: Hash) -> Result<Self, ValidationError> {
        let r = Self { name, kind, hash };
        r.validate()?;
        Ok(r)
    }

    /// Parse a name and hash from Git output, inferring the kind from the name.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name or hash is malformed.
    ///
    /// # Example
    ///
    /// ```
    /// use gitdomain::types::{Ref, RefKind};
    ///
    /// let r = Ref::parse("refs/remotes/origin/main", "ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
    /// assert_eq!(r.kind, RefKind::RemoteBranch);
    /// assert_eq!(r.hash.as_str(), "abc123def4567890abc123def4567890abc12345");
    ///
    /// let ambiguous = Ref::parse("v1.0.0", "").unwrap();
    /// assert_eq!(ambiguous.kind, RefKind::Unknown);
    /// ```
    pub fn parse(name: &str, hash: &str) -> Result<Self, ValidationError> {
        let name = RefName::parse(name).map_err(|e| e.within("Ref", "name"))?;
        let hash = Hash::parse(hash).map_err(|e| e.within("Ref", "hash"))?;
        let kind = RefKind::infer(&name);
        Self::new(name, kind, hash)
    }

    /// A local branch ref (`refs/heads/<branch>`).
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the branch name is not a valid ref name.
    pub fn branch(branch: &str, hash: Hash) -> Result<Self, ValidationError> {
        let name = RefName::new(format!("refs/heads/{}", branch.trim()))
            .map_err(|e| e.within("Ref", "name"))?;
        Self::new(name, RefKind::Branch, hash)
    }

    /// A tag ref (`refs/tags/<tag>`).
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the tag is not a valid ref name.
    pub fn tag(tag: &str, hash: Hash) -> Result<Self, ValidationError> {
        let name = RefName::new(format!("refs/tags/{}", tag.trim()))
            .map_err(|e| e.within("Ref", "name"))?;
        Self::new(name, RefKind::Tag, hash)
    }

    /// The `HEAD` ref.
    pub fn head(hash: Hash) -> Self {
        Self {
            name: RefName(String::from("HEAD")),
            kind: RefKind::Head,
            hash,
        }
    }

    /// A ref naming a commit directly by its hash.
    pub fn from_hash(hash: Hash) -> Self {
        Self {
            name: RefName(hash.as_str().to_string()),
            kind: RefKind::Hash,
            hash,
        }
    }

    /// Compact `name (short)` label used in range renderings.
    ///
    /// Falls back to whichever half is present, or `(zero)`.
    pub fn label(&self) -> String {
        match (self.name.is_zero(), self.hash.is_zero()) {
            (true, true) => "(zero)".to_string(),
            (false, true) => self.name.to_string(),
            (true, false) => self.hash.short().to_string(),
            (false, false) if self.name.as_str() == self.hash.as_str() => {
                self.hash.short().to_string()
            }
            (false, false) => format!("{} ({})", self.name, self.hash.short()),
        }
    }

    fn render(&self, hash: &str) -> String {
        if self.is_zero() {
            return "(zero)".to_string();
        }
        let mut out = String::new();
        if !self.name.is_zero() {
            out.push_str(self.name.as_str());
            out.push(' ');
        }
        out.push('[');
        out.push_str(self.kind.as_str());
        out.push(']');
        if !hash.is_empty() {
            out.push(' ');
            out.push_str(hash);
        }
        out
    }
}

impl Validate for Ref {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.is_zero() {
            return Ok(());
        }
        self.name.validate().map_err(|e| e.within("Ref", "name"))?;
        self.hash.validate().map_err(|e| e.within("Ref", "hash"))?;

        if self.kind == RefKind::Unknown {
            return Ok(());
        }
        match RefKind::implied_by(&self.name) {
            Some(expected) if expected != self.kind => Err(ValidationError::new(
                "Ref",
                "kind",
                format!(
                    "name '{}' implies kind '{}', got '{}'",
                    self.name, expected, self.kind
                ),
            )),
            _ => Ok(()),
        }
    }

    fn is_zero(&self) -> bool {
        self.name.is_zero() && self.kind == RefKind::Unknown && self.hash.is_zero()
    }
}

impl Redact for Ref {
    fn redacted(&self) -> String {
        self.render(self.hash.short())
    }
}

impl std::fmt::Display for Ref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(self.hash.as_str()))
    }
}

impl Serialize for Ref {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ensure_serializable::<_, S::Error>(self)?;
        let mut state = serializer.serialize_struct("Ref", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("hash", &self.hash)?;
        state.end()
    }
}

/// Wire form of [`Ref`].
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RefRepr {
    name: RefName,
    kind: RefKind,
    hash: Hash,
}

impl TryFrom<RefRepr> for Ref {
    type Error = ValidationError;

    fn try_from(repr: RefRepr) -> Result<Self, Self::Error> {
        checked(Ref {
            name: repr.name,
            kind: repr.kind,
            hash: repr.hash,
        })
    }
}
