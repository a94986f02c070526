//! types::hash
//!
//! Git object hashes.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::limits::SHORT_HASH_LEN;
use super::{Redact, Validate, ValidationError};

fn canonical_hash_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[0-9a-f]{40}|[0-9a-f]{64})$").expect("hash pattern is a valid regex")
    })
}

/// Whether `s` is a canonical (lowercase, 40 or 64 char) hex hash.
pub(crate) fn is_canonical_hash(s: &str) -> bool {
    canonical_hash_pattern().is_match(s)
}

/// A Git object hash (SHA-1 or SHA-256).
///
/// The empty hash is the zero value and means "no object". Any other value
/// is exactly 40 or 64 lowercase hex characters.
///
/// # Example
///
/// ```
/// use gitdomain::types::Hash;
///
/// // parse() trims and lowercases before validating
/// let hash = Hash::parse(" ABC123DEF4567890ABC123DEF4567890ABC12345 ").unwrap();
/// assert_eq!(hash.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(hash.short(), "abc123d");
///
/// // new() takes the string as-is, so uppercase hex is rejected
/// assert!(Hash::new("ABC123DEF4567890ABC123DEF4567890ABC12345").is_err());
///
/// // Zero hash
/// assert!(Hash::zero().as_str().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hash(String);

impl Hash {
    /// Create a hash from an already-canonical string.
    ///
    /// No normalization is applied. Use [`Hash::parse`] for Git output.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] unless `hash` is empty or 40/64
    /// lowercase hex characters.
    pub fn new(hash: impl Into<String>) -> Result<Self, ValidationError> {
        let hash = hash.into();
        Self::check(&hash)?;
        Ok(Self(hash))
    }

    /// Parse a hash, trimming whitespace and lowercasing first.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the normalized string is not a valid hash.
    pub fn parse(hash: &str) -> Result<Self, ValidationError> {
        Self::new(hash.trim().to_ascii_lowercase())
    }

    /// The zero hash.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Get the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form: the first [`SHORT_HASH_LEN`] characters.
    ///
    /// The zero hash abbreviates to the empty string.
    pub fn short(&self) -> &str {
        let end = SHORT_HASH_LEN.min(self.0.len());
        &self.0[..end]
    }

    /// Whether this is a 64-character SHA-256 hash.
    pub fn is_sha256(&self) -> bool {
        self.0.len() == 64
    }

    /// Decode into raw bytes (20 for SHA-1, 32 for SHA-256, 0 for zero).
    pub fn to_bytes(&self) -> Vec<u8> {
        // Validated hex always decodes.
        hex::decode(&self.0).unwrap_or_default()
    }

    fn check(hash: &str) -> Result<(), ValidationError> {
        if hash.is_empty() || is_canonical_hash(hash) {
            return Ok(());
        }
        let reason = if hash.len() != 40 && hash.len() != 64 {
            format!("expected 40 or 64 hex characters, got {}", hash.len())
        } else if hash.chars().all(|c| c.is_ascii_hexdigit()) {
            "must be lowercase hex".to_string()
        } else {
            "must be hexadecimal".to_string()
        };
        Err(ValidationError::new("Hash", "value", reason))
    }
}

impl Validate for Hash {
    fn validate(&self) -> Result<(), ValidationError> {
        Self::check(&self.0)
    }

    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl Redact for Hash {
    fn redacted(&self) -> String {
        self.short().to_string()
    }
}

impl TryFrom<String> for Hash {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Hash> for String {
    fn from(hash: Hash) -> Self {
        hash.0
    }
}

impl AsRef<str> for Hash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Hash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
