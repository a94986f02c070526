//! types::names
//!
//! Reference and tag names.
//!
//! Both are deliberately permissive compared to `git check-ref-format`:
//! they only bound length and charset, so names taken from Git output,
//! config files and CLI flags can be carried without re-implementing Git's
//! full refname grammar.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::limits::MAX_REF_NAME_LEN;
use super::{Redact, Validate, ValidationError};

fn ref_name_charset() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._/-]+$").expect("ref name pattern is a valid regex")
    })
}

fn tag_name_charset() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._/@{}^~:+-]+$").expect("tag name pattern is a valid regex")
    })
}

/// Shared length/charset/whitespace check for name types.
fn check_name(
    type_name: &'static str,
    name: &str,
    charset: &Regex,
    allowed: &str,
) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Ok(());
    }
    if name.trim() != name {
        return Err(ValidationError::new(
            type_name,
            "value",
            "must not have leading or trailing whitespace",
        ));
    }
    let len = name.chars().count();
    if len > MAX_REF_NAME_LEN {
        return Err(ValidationError::new(
            type_name,
            "value",
            format!("must be at most {MAX_REF_NAME_LEN} characters, got {len}"),
        ));
    }
    if !charset.is_match(name) {
        return Err(ValidationError::new(
            type_name,
            "value",
            format!("may only contain {allowed}"),
        ));
    }
    Ok(())
}

/// A Git reference name such as `refs/heads/main`, `origin/main` or `HEAD`.
///
/// Empty is the zero value. Otherwise 1-256 characters from
/// `[A-Za-z0-9._/-]` with no surrounding whitespace.
///
/// # Example
///
/// ```
/// use gitdomain::types::RefName;
///
/// let name = RefName::parse("  refs/heads/main ").unwrap();
/// assert_eq!(name.as_str(), "refs/heads/main");
/// assert_eq!(name.short_name(), "main");
///
/// assert!(RefName::new("has space").is_err());
/// assert!(RefName::new("HEAD~1").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RefName(pub(crate) String);

impl RefName {
    const ALLOWED: &'static str = "letters, digits, '.', '_', '/' and '-'";

    /// Create a ref name from the string as given.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name violates length, charset or
    /// whitespace rules.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        check_name("RefName", &name, ref_name_charset(), Self::ALLOWED)?;
        Ok(Self(name))
    }

    /// Parse a ref name, trimming surrounding whitespace first.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the trimmed name is invalid.
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        Self::new(name.trim())
    }

    /// Get the ref name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without its `refs/heads/`, `refs/tags/` or `refs/remotes/`
    /// namespace. Other names are returned unchanged.
    pub fn short_name(&self) -> &str {
        ["refs/heads/", "refs/tags/", "refs/remotes/"]
            .iter()
            .find_map(|prefix| self.0.strip_prefix(prefix))
            .unwrap_or(&self.0)
    }
}

impl Validate for RefName {
    fn validate(&self) -> Result<(), ValidationError> {
        check_name("RefName", &self.0, ref_name_charset(), Self::ALLOWED)
    }

    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl Redact for RefName {
    fn redacted(&self) -> String {
        self.0.clone()
    }
}

impl TryFrom<String> for RefName {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RefName> for String {
    fn from(name: RefName) -> Self {
        name.0
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for RefName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tag name such as `v1.2.3` or `release/2024-01+build.5`.
///
/// Same rules as [`RefName`], except the charset additionally allows
/// `@ { } ^ ~ : +` (common in version tags and build metadata).
///
/// # Example
///
/// ```
/// use gitdomain::types::TagName;
///
/// let tag = TagName::new("v1.0.0").unwrap();
/// assert_eq!(tag.to_ref_name().unwrap().as_str(), "refs/tags/v1.0.0");
///
/// // Build metadata is fine in a tag name, but has no RefName form
/// let build = TagName::new("v1.0.0+build.7").unwrap();
/// assert!(build.to_ref_name().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    const ALLOWED: &'static str = "letters, digits and any of ._/-@{}^~:+";

    /// Create a tag name from the string as given.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name violates length, charset or
    /// whitespace rules.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        check_name("TagName", &name, tag_name_charset(), Self::ALLOWED)?;
        Ok(Self(name))
    }

    /// Parse a tag name, trimming surrounding whitespace first.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the trimmed name is invalid.
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        Self::new(name.trim())
    }

    /// Get the tag name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full `refs/tags/<name>` reference for this tag.
    ///
    /// # Errors
    ///
    /// Fails when the tag uses characters a [`RefName`] cannot hold, or the
    /// prefixed name is too long.
    pub fn to_ref_name(&self) -> Result<RefName, ValidationError> {
        if self.0.starts_with("refs/tags/") {
            RefName::new(self.0.clone())
        } else {
            RefName::new(format!("refs/tags/{}", self.0))
        }
    }
}

impl Validate for TagName {
    fn validate(&self) -> Result<(), ValidationError> {
        check_name("TagName", &self.0, tag_name_charset(), Self::ALLOWED)
    }

    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl Redact for TagName {
    fn redacted(&self) -> String {
        self.0.clone()
    }
}

impl TryFrom<String> for TagName {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TagName> for String {
    fn from(name: TagName) -> Self {
        name.0
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for TagName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
