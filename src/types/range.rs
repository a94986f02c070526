//! types::range
//!
//! Commit ranges in `A..B` form.
//!
//! `from` is the exclusive lower bound and may be zero, meaning "since the
//! start of history". `to` is the inclusive upper bound and is required.
//! Ancestry between the bounds is not checked here; that needs a live
//! repository and belongs to the caller.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::names::RefName;
use super::reference::Ref;
use super::{checked, ensure_serializable, Redact, Validate, ValidationError};

/// A resolved commit range: `from..to`.
///
/// # Example
///
/// ```
/// use gitdomain::types::{CommitRange, Hash, Ref, Validate};
///
/// let head = Ref::head(Hash::new("abc123def4567890abc123def4567890abc12345").unwrap());
///
/// // Whole history up to HEAD
/// let range = CommitRange::since_beginning(head.clone()).unwrap();
/// assert_eq!(range.to_string(), "(zero)..HEAD (abc123d)");
///
/// // Missing upper bound is rejected
/// let open = CommitRange { from: head, to: Ref::default() };
/// assert!(open.validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "CommitRangeRepr")]
pub struct CommitRange {
    /// Exclusive lower bound (zero = start of history)
    pub from: Ref,
    /// Inclusive upper bound
    pub to: Ref,
}

impl CommitRange {
    /// Create a validated range.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `to` is zero or either bound is invalid.
    pub fn new(from: Ref, to: Ref) -> Result<Self, ValidationError> {
        let range = Self { from, to };
        range.validate()?;
        Ok(range)
    }

    /// A range covering all history up to and including `to`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `to` is zero or invalid.
    pub fn since_beginning(to: Ref) -> Result<Self, ValidationError> {
        Self::new(Ref::default(), to)
    }

    /// Whether the range starts at the beginning of history.
    pub fn is_from_beginning(&self) -> bool {
        self.from.is_zero()
    }
}

impl Validate for CommitRange {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.to.is_zero() {
            return Err(ValidationError::new(
                "CommitRange",
                "to",
                "upper bound is required",
            ));
        }
        self.to
            .validate()
            .map_err(|e| e.within("CommitRange", "to"))?;
        self.from
            .validate()
            .map_err(|e| e.within("CommitRange", "from"))
    }

    fn is_zero(&self) -> bool {
        self.from.is_zero() && self.to.is_zero()
    }
}

impl Redact for CommitRange {
    fn redacted(&self) -> String {
        // Labels already carry short hashes only.
        self.to_string()
    }
}

impl std::fmt::Display for CommitRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.from.label(), self.to.label())
    }
}

impl Serialize for CommitRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ensure_serializable::<_, S::Error>(self)?;
        let mut state = serializer.serialize_struct("CommitRange", 2)?;
        state.serialize_field("from", &self.from)?;
        state.serialize_field("to", &self.to)?;
        state.end()
    }
}

/// Wire form of [`CommitRange`].
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CommitRangeRepr {
    from: Ref,
    to: Ref,
}

impl TryFrom<CommitRangeRepr> for CommitRange {
    type Error = ValidationError;

    fn try_from(repr: CommitRangeRepr) -> Result<Self, Self::Error> {
        checked(CommitRange {
            from: repr.from,
            to: repr.to,
        })
    }
}

/// An unresolved commit range, as a user or config file writes it.
///
/// Resolve both names against a repository to get a [`CommitRange`].
///
/// # Example
///
/// ```
/// use gitdomain::types::CommitRangeSpec;
///
/// let spec = CommitRangeSpec::parse("v1.0.0..main").unwrap();
/// assert_eq!(spec.from.as_str(), "v1.0.0");
/// assert_eq!(spec.to.as_str(), "main");
///
/// let all = CommitRangeSpec::parse("main").unwrap();
/// assert!(all.from.as_str().is_empty());
///
/// assert!(CommitRangeSpec::parse("a...b").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "CommitRangeSpecRepr")]
pub struct CommitRangeSpec {
    /// Exclusive lower bound (empty = start of history)
    pub from: RefName,
    /// Inclusive upper bound
    pub to: RefName,
}

impl CommitRangeSpec {
    /// Create a validated range spec.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `to` is empty.
    pub fn new(from: RefName, to: RefName) -> Result<Self, ValidationError> {
        let spec = Self { from, to };
        spec.validate()?;
        Ok(spec)
    }

    /// Parse `from..to`, or a lone `to` meaning "all history up to `to`".
    ///
    /// The symmetric-difference form `a...b` is not a range and is rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if either side is not a valid ref name
    /// or the upper bound is missing.
    pub fn parse(spec: &str) -> Result<Self, ValidationError> {
        let spec = spec.trim();
        if spec.contains("...") {
            return Err(ValidationError::new(
                "CommitRangeSpec",
                "",
                "symmetric difference ('...') is not a commit range",
            ));
        }
        let (from, to) = spec.split_once("..").unwrap_or(("", spec));
        let from = RefName::parse(from).map_err(|e| e.within("CommitRangeSpec", "from"))?;
        let to = RefName::parse(to).map_err(|e| e.within("CommitRangeSpec", "to"))?;
        Self::new(from, to)
    }

    /// Whether the range starts at the beginning of history.
    pub fn is_from_beginning(&self) -> bool {
        self.from.is_zero()
    }
}

impl Validate for CommitRangeSpec {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.to.is_zero() {
            return Err(ValidationError::new(
                "CommitRangeSpec",
                "to",
                "upper bound is required",
            ));
        }
        self.to
            .validate()
            .map_err(|e| e.within("CommitRangeSpec", "to"))?;
        self.from
            .validate()
            .map_err(|e| e.within("CommitRangeSpec", "from"))
    }

    fn is_zero(&self) -> bool {
        self.from.is_zero() && self.to.is_zero()
    }
}

impl Redact for CommitRangeSpec {
    fn redacted(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for CommitRangeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.from.is_zero() {
            write!(f, "{}", self.to)
        } else {
            write!(f, "{}..{}", self.from, self.to)
        }
    }
}

impl Serialize for CommitRangeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ensure_serializable::<_, S::Error>(self)?;
        let mut state = serializer.serialize_struct("CommitRangeSpec", 2)?;
        state.serialize_field("from", &self.from)?;
        state.serialize_field("to", &self.to)?;
        state.end()
    }
}

/// Wire form of [`CommitRangeSpec`].
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CommitRangeSpecRepr {
    from: RefName,
    to: RefName,
}

impl TryFrom<CommitRangeSpecRepr> for CommitRangeSpec {
    type Error = ValidationError;

    fn try_from(repr: CommitRangeSpecRepr) -> Result<Self, Self::Error> {
        checked(CommitRangeSpec {
            from: repr.from,
            to: repr.to,
        })
    }
}
