//! types::limits
//!
//! Size limits enforced by validation. These are the crate's only tunables;
//! callers that need to pre-check input can compare against them directly.

/// Maximum length of a [`RefName`](super::RefName) or [`TagName`](super::TagName), in characters.
pub const MAX_REF_NAME_LEN: usize = 256;

/// Maximum length of a file path, in bytes.
pub const MAX_PATH_LEN: usize = 4096;

/// Maximum number of parents on a commit.
pub const MAX_PARENTS: usize = 64;

/// Maximum number of file changes recorded on a commit.
pub const MAX_CHANGES: usize = 10_000;

/// Maximum commit message size, in bytes (1 MiB).
pub const MAX_MESSAGE_LEN: usize = 1 << 20;

/// Maximum commit summary size, in bytes.
pub const MAX_SUMMARY_LEN: usize = 512;

/// Maximum annotated tag message size, in bytes (64 KiB).
pub const MAX_TAG_MESSAGE_LEN: usize = 64 << 10;

/// Maximum signature name length, in bytes.
pub const MAX_SIGNATURE_NAME_LEN: usize = 256;

/// Maximum email length, in bytes.
pub const MAX_EMAIL_LEN: usize = 254;

/// Number of hex characters shown by redacted and short hash renderings.
pub const SHORT_HASH_LEN: usize = 7;
