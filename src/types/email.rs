//! types::email
//!
//! RFC 5322 `addr-spec` checking and email redaction.
//!
//! Accepts `local-part@domain` where the local part is a dot-atom or a
//! quoted string, and the domain is a dot-atom or a bracketed domain
//! literal. Display names, angle brackets, comments and folding
//! whitespace are not accepted: a signature stores a bare address.
//! UTF-8 is allowed in atoms (RFC 6532).

/// `atext` from RFC 5322 section 3.2.3, extended with non-ASCII.
fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c) || !c.is_ascii()
}

fn check_dot_atom(s: &str, what: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err(format!("{what} is empty"));
    }
    for atom in s.split('.') {
        if atom.is_empty() {
            return Err(format!("{what} has an empty dot-separated atom"));
        }
        if let Some(c) = atom.chars().find(|&c| !is_atext(c)) {
            return Err(format!("{what} contains invalid character {c:?}"));
        }
    }
    Ok(())
}

/// Split a quoted local part off the front of `s`, returning the remainder.
fn split_quoted(s: &str) -> Result<&str, String> {
    let mut chars = s.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok(&s[i + 1..]),
            '\\' => match chars.next() {
                Some((_, escaped))
                    if escaped == ' ' || escaped == '\t' || escaped.is_ascii_graphic() => {}
                _ => return Err("invalid escape in quoted local part".to_string()),
            },
            c if c == ' ' || c.is_ascii_graphic() || !c.is_ascii() => {}
            c => return Err(format!("quoted local part contains invalid character {c:?}")),
        }
    }
    Err("unterminated quoted local part".to_string())
}

fn check_domain(domain: &str) -> Result<(), String> {
    if let Some(literal) = domain.strip_prefix('[') {
        let inner = literal
            .strip_suffix(']')
            .ok_or_else(|| "unterminated domain literal".to_string())?;
        if let Some(c) = inner
            .chars()
            .find(|&c| !c.is_ascii_graphic() || matches!(c, '[' | ']' | '\\'))
        {
            return Err(format!("domain literal contains invalid character {c:?}"));
        }
        return Ok(());
    }
    check_dot_atom(domain, "domain")
}

/// Check that `email` is a bare RFC 5322 address.
pub(crate) fn check_addr_spec(email: &str) -> Result<(), String> {
    let domain = if email.starts_with('"') {
        let rest = split_quoted(email)?;
        rest.strip_prefix('@')
            .ok_or_else(|| "expected '@' after quoted local part".to_string())?
    } else {
        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| "missing '@'".to_string())?;
        check_dot_atom(local, "local part")?;
        domain
    };
    check_domain(domain)
}

/// Mask an address down to the first local-part character and the domain.
///
/// Addresses without a usable `@` are masked entirely.
pub(crate) fn redact(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        _ if email.is_empty() => String::new(),
        _ => "***".to_string(),
    }
}
