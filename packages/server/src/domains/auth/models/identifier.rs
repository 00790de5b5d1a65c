/// Returned when an email address cannot be used as an OTP key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid email address: {reason}")]
pub struct InvalidEmailError {
    pub reason: &'static str,
}

impl InvalidEmailError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Normalize an email address into an OTP registry key.
///
/// Trims surrounding whitespace and lowercases the address so that the same
/// mailbox always maps to the same registry entry. Performs only a basic
/// shape check: one `@`, a non-empty local part, and a dotted domain.
pub fn normalize_email(raw: &str) -> Result<String, InvalidEmailError> {
    let email = raw.trim().to_lowercase();

    if email.is_empty() {
        return Err(InvalidEmailError::new("email is required"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(InvalidEmailError::new("email must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| InvalidEmailError::new("email must contain '@'"))?;

    if local.is_empty() {
        return Err(InvalidEmailError::new("missing local part"));
    }
    if domain.contains('@') {
        return Err(InvalidEmailError::new("email must contain a single '@'"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(InvalidEmailError::new("invalid domain"));
    }

    Ok(email)
}

/// Mask an email for logs: `ana@example.com` -> `a***@example.com`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{}***@{}", first, domain),
            None => format!("***@{}", domain),
        },
        None => "***@***.***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(
            normalize_email("  Ana.Perez@Example.COM ").unwrap(),
            "ana.perez@example.com"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_email("User@Example.com").unwrap();
        let twice = normalize_email(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(normalize_email("").is_err());
        assert!(normalize_email("   ").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "no-at-sign.com",
            "@example.com",
            "a@b@example.com",
            "user@localhost",
            "user@.example.com",
            "user@example.com.",
            "us er@example.com",
        ] {
            assert!(normalize_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_error_message() {
        let err = normalize_email("nope").unwrap_err();
        assert_eq!(err.to_string(), "Invalid email address: email must contain '@'");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("ana.perez@example.com"), "a***@example.com");
        assert_eq!(mask_email("@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***@***.***");
    }
}
