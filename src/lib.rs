//! gitdomain - Validated value types for Git data
//!
//! A small vocabulary of Git concepts (hashes, refs, commit ranges,
//! signatures, file changes, commits, tags and working tree status) with
//! one contract shared by every type:
//!
//! - construction and decoding validate, so an invalid value is never
//!   produced by this crate
//! - encoding validates too, so an invalid value is never written out
//! - every type has a zero value, a human `Display` form and a
//!   [`Redact`](types::Redact) form safe for logs
//!
//! # Architecture
//!
//! - [`types`] - The value types, their validation and serde impls
//! - [`codec`] - JSON and YAML helpers with typed errors
//! - [`git`] - Optional read-only bridge from a repository (feature `git2`)
//!
//! # Example
//!
//! ```
//! use gitdomain::types::{CommitRangeSpec, Hash, Redact, Ref, Validate};
//!
//! let spec = CommitRangeSpec::parse("v1.0.0..main").unwrap();
//! assert_eq!(spec.to_string(), "v1.0.0..main");
//!
//! let hash = Hash::parse("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
//! let head = Ref::branch("main", hash).unwrap();
//! assert!(head.validate().is_ok());
//! assert_eq!(head.redacted(), "refs/heads/main [branch] abc123d");
//! ```

pub mod codec;
#[cfg(feature = "git2")]
pub mod git;
pub mod types;
