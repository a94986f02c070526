//! codec
//!
//! JSON and YAML encoding for the value types.
//!
//! Every type already validates inside its `Serialize`/`Deserialize`
//! impls, so plain `serde_json`/`serde_yaml` calls are safe. These helpers
//! add a typed [`CodecError::Validation`] for invalid values (instead of a
//! stringly serde error) and a single place where encoding is logged.
//!
//! # Example
//!
//! ```
//! use gitdomain::codec::{from_yaml, to_yaml, CodecError};
//! use gitdomain::types::{CommitRange, WorktreeStatus};
//!
//! let status = WorktreeStatus { has_staged: true, ..Default::default() };
//! let yaml = to_yaml(&status).unwrap();
//! assert_eq!(from_yaml::<WorktreeStatus>(&yaml).unwrap(), status);
//!
//! // An invalid value produces no output
//! let err = to_yaml(&CommitRange::default()).unwrap_err();
//! assert!(matches!(err, CodecError::Validation(_)));
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::types::{Redact, Validate, ValidationError};

/// Errors from encoding or decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value (or the decoded value) failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// JSON syntax or shape error.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML syntax or shape error.
    #[error("YAML codec error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn precheck<T: Validate + Redact>(value: &T, format: &'static str) -> Result<(), CodecError> {
    value.validate().map_err(|err| {
        tracing::debug!(
            format,
            value = %value.redacted(),
            error = %err,
            "refusing to encode invalid value"
        );
        CodecError::from(err)
    })
}

/// Encode a value as compact JSON.
///
/// # Errors
///
/// Returns [`CodecError::Validation`] if the value is invalid; nothing is
/// encoded in that case.
pub fn to_json<T>(value: &T) -> Result<String, CodecError>
where
    T: Serialize + Validate + Redact,
{
    precheck(value, "json")?;
    Ok(serde_json::to_string(value)?)
}

/// Encode a value as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`CodecError::Validation`] if the value is invalid.
pub fn to_json_pretty<T>(value: &T) -> Result<String, CodecError>
where
    T: Serialize + Validate + Redact,
{
    precheck(value, "json")?;
    Ok(serde_json::to_string_pretty(value)?)
}

/// Decode and validate a value from JSON.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed input or values that fail
/// validation during decoding.
pub fn from_json<T: DeserializeOwned>(input: &str) -> Result<T, CodecError> {
    serde_json::from_str(input).map_err(|err| {
        tracing::debug!(format = "json", error = %err, "decode failed");
        CodecError::from(err)
    })
}

/// Encode a value as YAML.
///
/// # Errors
///
/// Returns [`CodecError::Validation`] if the value is invalid.
pub fn to_yaml<T>(value: &T) -> Result<String, CodecError>
where
    T: Serialize + Validate + Redact,
{
    precheck(value, "yaml")?;
    Ok(serde_yaml::to_string(value)?)
}

/// Decode and validate a value from YAML.
///
/// # Errors
///
/// Returns [`CodecError::Yaml`] for malformed input or values that fail
/// validation during decoding.
pub fn from_yaml<T: DeserializeOwned>(input: &str) -> Result<T, CodecError> {
    serde_yaml::from_str(input).map_err(|err| {
        tracing::debug!(format = "yaml", error = %err, "decode failed");
        CodecError::from(err)
    })
}
