//! types::signature
//!
//! Author and committer identities.

use chrono::{DateTime, FixedOffset};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::email;
use super::limits::{MAX_EMAIL_LEN, MAX_SIGNATURE_NAME_LEN};
use super::{checked, ensure_serializable, Redact, Validate, ValidationError};

/// Who made a commit or tag, and when.
///
/// Unlike the scalar types, the zero signature is invalid: a signature is
/// only meaningful when all three parts are present.
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use gitdomain::types::{Redact, Signature};
///
/// let when = DateTime::parse_from_rfc3339("2024-03-01T09:30:00+01:00").unwrap();
/// let sig = Signature::new("Jane Doe", "jane@example.com", when).unwrap();
///
/// assert_eq!(sig.to_string(), "Jane Doe <jane@example.com> 2024-03-01T09:30:00+01:00");
/// assert_eq!(sig.redacted(), "Jane Doe <j***@example.com> 2024-03-01T09:30:00+01:00");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "SignatureRepr")]
pub struct Signature {
    /// Display name
    pub name: String,
    /// Bare RFC 5322 address
    ///
    /// The `Name <addr>` display-name form is refused; pass only the addr-spec.
    pub email: String,
    /// Timestamp with the signer's UTC offset (`None` is the zero value)
    pub when: Option<DateTime<FixedOffset>>,
}

impl Signature {
    /// Create a validated signature, trimming name and email.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name or email is empty, too long,
    /// or the email is not a valid address.
    pub fn new(
        name: &str,
        email: &str,
        when: DateTime<FixedOffset>,
    ) -> Result<Self, ValidationError> {
        let sig = Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            when: Some(when),
        };
        sig.validate()?;
        Ok(sig)
    }

    /// Parse a raw Git ident line: `Name <email> <unix-seconds> <+hhmm>`.
    ///
    /// This is the format found in commit and tag object headers and in
    /// `git var GIT_AUTHOR_IDENT`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the line is malformed or the parsed
    /// signature is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use gitdomain::types::Signature;
    ///
    /// let sig = Signature::parse_ident("Jane Doe <jane@example.com> 1700000000 +0200").unwrap();
    /// assert_eq!(sig.name, "Jane Doe");
    /// assert_eq!(sig.when.unwrap().to_rfc3339(), "2023-11-15T00:13:20+02:00");
    /// ```
    pub fn parse_ident(line: &str) -> Result<Self, ValidationError> {
        let malformed = |reason: &str| ValidationError::new("Signature", "ident", reason);

        let open = line.rfind('<').ok_or_else(|| malformed("missing '<'"))?;
        let close = line[open..]
            .find('>')
            .map(|i| open + i)
            .ok_or_else(|| malformed("missing '>'"))?;

        let name = &line[..open];
        let email = &line[open + 1..close];

        let mut rest = line[close + 1..].split_whitespace();
        let seconds: i64 = rest
            .next()
            .ok_or_else(|| malformed("missing timestamp"))?
            .parse()
            .map_err(|_| malformed("timestamp is not an integer"))?;
        let offset = match rest.next() {
            Some(tz) => parse_tz_offset(tz).ok_or_else(|| malformed("invalid timezone offset"))?,
            None => FixedOffset::east_opt(0).ok_or_else(|| malformed("invalid timezone offset"))?,
        };
        let when = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| malformed("timestamp out of range"))?
            .with_timezone(&offset);

        Self::new(name, email, when)
    }

    fn render(&self, email: &str) -> String {
        if self.is_zero() {
            return "(zero)".to_string();
        }
        let when = self.when.map(|w| w.to_rfc3339()).unwrap_or_default();
        format!("{} <{}> {}", self.name, email, when)
    }
}

/// Parse a Git `+hhmm` / `-hhmm` offset.
fn parse_tz_offset(tz: &str) -> Option<FixedOffset> {
    let (sign, digits) = match tz.as_bytes().first()? {
        b'+' => (1, &tz[1..]),
        b'-' => (-1, &tz[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl Validate for Signature {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::new("Signature", "name", "is required"));
        }
        if self.name.len() > MAX_SIGNATURE_NAME_LEN {
            return Err(ValidationError::new(
                "Signature",
                "name",
                format!(
                    "must be at most {MAX_SIGNATURE_NAME_LEN} bytes, got {}",
                    self.name.len()
                ),
            ));
        }
        if self.email.is_empty() {
            return Err(ValidationError::new("Signature", "email", "is required"));
        }
        if self.email.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::new(
                "Signature",
                "email",
                format!(
                    "must be at most {MAX_EMAIL_LEN} bytes, got {}",
                    self.email.len()
                ),
            ));
        }
        email::check_addr_spec(&self.email).map_err(|reason| {
            ValidationError::new(
                "Signature",
                "email",
                format!("is not a valid RFC 5322 address: {reason}"),
            )
        })?;
        if self.when.is_none() {
            return Err(ValidationError::new("Signature", "when", "is required"));
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.when.is_none()
    }
}

impl Redact for Signature {
    fn redacted(&self) -> String {
        self.render(&email::redact(&self.email))
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(&self.email))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ensure_serializable::<_, S::Error>(self)?;
        let mut state = serializer.serialize_struct("Signature", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("email", &self.email)?;
        state.serialize_field("when", &self.when.map(|w| w.to_rfc3339()))?;
        state.end()
    }
}

/// Wire form of [`Signature`]; `when` travels as an RFC 3339 string.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SignatureRepr {
    name: String,
    email: String,
    when: Option<String>,
}

impl TryFrom<SignatureRepr> for Signature {
    type Error = ValidationError;

    fn try_from(repr: SignatureRepr) -> Result<Self, Self::Error> {
        let when = repr
            .when
            .as_deref()
            .map(DateTime::parse_from_rfc3339)
            .transpose()
            .map_err(|e| {
                ValidationError::new("Signature", "when", format!("is not RFC 3339: {e}"))
            })?;
        checked(Signature {
            name: repr.name,
            email: repr.email,
            when,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn when() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z").unwrap()
    }

    fn jane() -> Signature {
        Signature::new("Jane Doe", "jane@example.com", when()).unwrap()
    }

    #[test]
    fn new_trims() {
        let sig = Signature::new("  Jane Doe ", " jane@example.com\n", when()).unwrap();
        assert_eq!(sig, jane());
    }

    #[test]
    fn zero_is_invalid() {
        let zero = Signature::default();
        assert!(zero.is_zero());
        let err = zero.validate().unwrap_err();
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn name_limits() {
        assert!(Signature::new(&"n".repeat(256), "a@b.c", when()).is_ok());
        let err = Signature::new(&"n".repeat(257), "a@b.c", when()).unwrap_err();
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn email_limits() {
        let local = "a".repeat(64);
        let domain = format!("{}.com", "d".repeat(254 - 64 - 1 - 4));
        let max = format!("{local}@{domain}");
        assert_eq!(max.len(), 254);
        assert!(Signature::new("Jane", &max, when()).is_ok());

        let too_long = format!("a{max}");
        let err = Signature::new("Jane", &too_long, when()).unwrap_err();
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn email_must_parse() {
        let err = Signature::new("Jane", "not-an-email", when()).unwrap_err();
        assert_eq!(err.field(), "email");
        assert!(err.reason().contains("RFC 5322"));
    }

    #[test]
    fn when_required() {
        let sig = Signature {
            when: None,
            ..jane()
        };
        assert_eq!(sig.validate().unwrap_err().field(), "when");
    }

    #[test]
    fn display_and_redacted() {
        let sig = jane();
        assert_eq!(
            sig.to_string(),
            "Jane Doe <jane@example.com> 2024-01-02T03:04:05+00:00"
        );
        assert_eq!(
            sig.redacted(),
            "Jane Doe <j***@example.com> 2024-01-02T03:04:05+00:00"
        );
        assert_eq!(Signature::default().to_string(), "(zero)");
    }

    #[test]
    fn parse_ident_line() {
        let sig = Signature::parse_ident("Jane Doe <jane@example.com> 1704164645 -0130").unwrap();
        assert_eq!(sig.name, "Jane Doe");
        assert_eq!(sig.email, "jane@example.com");
        let when = sig.when.unwrap();
        assert_eq!(when.timestamp(), 1_704_164_645);
        assert_eq!(when.offset().local_minus_utc(), -(90 * 60));
    }

    #[test]
    fn parse_ident_without_offset_is_utc() {
        let sig = Signature::parse_ident("Jane <jane@example.com> 0").unwrap();
        assert_eq!(sig.when.unwrap().to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn parse_ident_rejects_malformed() {
        assert!(Signature::parse_ident("Jane jane@example.com 0 +0000").is_err());
        assert!(Signature::parse_ident("Jane <jane@example.com>").is_err());
        assert!(Signature::parse_ident("Jane <jane@example.com> abc +0000").is_err());
        assert!(Signature::parse_ident("Jane <jane@example.com> 0 0200").is_err());
        assert!(Signature::parse_ident("<jane@example.com> 0 +0000").is_err());
    }

    #[test]
    fn serializes_when_as_rfc3339() {
        let json = serde_json::to_string(&jane()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Jane Doe","email":"jane@example.com","when":"2024-01-02T03:04:05+00:00"}"#
        );
        let parsed: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, jane());
    }

    #[test]
    fn serialize_zero_fails() {
        assert!(serde_json::to_string(&Signature::default()).is_err());
    }

    #[test]
    fn deserialize_rejects_bad_timestamp() {
        let json = r#"{"name":"Jane","email":"jane@example.com","when":"yesterday"}"#;
        assert!(serde_json::from_str::<Signature>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_bad_email() {
        let json = r#"{"name":"Jane","email":"jane","when":"2024-01-02T03:04:05Z"}"#;
        assert!(serde_json::from_str::<Signature>(json).is_err());
    }
}
