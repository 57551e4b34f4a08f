//! Email address checks used by submissions and the allow-list.
//!
//! Addresses are only checked syntactically (they must contain `@`); proving
//! ownership is the identity provider's job.

/// Canonical form of an address: trimmed and lower-cased.
///
/// Recipient addresses and allow-list entries are stored in this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Whether a submitted value is acceptable as an email address.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.contains('@')
}

/// Case-insensitive address comparison.
pub fn emails_match(a: &str, b: &str) -> bool {
    normalize_email(a) == normalize_email(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plausible_email_requires_at_sign() {
        assert!(is_plausible_email("user@example.com"));
        assert!(is_plausible_email("  user@example.com "));
        assert!(!is_plausible_email("not-an-email"));
        assert!(!is_plausible_email(""));
        assert!(!is_plausible_email("   "));
    }

    #[test]
    fn test_normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Friend@Example.COM "), "friend@example.com");
        assert_eq!(normalize_email("user@example.com"), "user@example.com");
    }

    #[test]
    fn test_emails_match_ignores_case_and_whitespace() {
        assert!(emails_match("user@example.com", "USER@EXAMPLE.COM"));
        assert!(emails_match(" user@example.com", "user@example.com "));
        assert!(emails_match("jürgen@example.com", "JÜRGEN@EXAMPLE.COM"));
        assert!(!emails_match("user@example.com", "other@example.com"));
    }
}
