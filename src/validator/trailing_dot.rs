//! Trailing-dot carve-out.
//!
//! `alice.@example.com` is rejected by RFC 5322 (`dot-atom` cannot end with a
//! dot) yet several real mail systems hand out such addresses. When the
//! grammar fails on exactly that point, the address is re-extracted with a
//! lenient pattern and accepted if it keeps the basic `local.@domain` shape.
//! The domain is only checked structurally here, not re-parsed.

use std::sync::LazyLock;

use regex::Regex;

use super::parse::display_name;
use super::types::Mailbox;

static ANGLE_ADDR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*<([^<>]*)>$").expect("angle-addr pattern"));

/// Exactly one `@`, a `.` right before it, something other than `.` right
/// after it, and a non-empty stem before the dot that does not start with `.`.
pub fn has_trailing_dot_pattern(address: &str) -> bool {
    let mut parts = address.split('@');
    let (Some(before), Some(after), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let Some(stem) = before.strip_suffix('.') else {
        return false;
    };
    if stem.is_empty() || stem.starts_with('.') {
        return false;
    }
    matches!(after.chars().next(), Some(c) if c != '.')
}

/// Bare `local.@domain` that the fallback is willing to accept.
pub fn is_valid_trailing_dot_address(address: &str) -> bool {
    if !has_trailing_dot_pattern(address) {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.contains("..")
        && !domain.contains("..")
        && !domain.ends_with('.')
        && !address.chars().any(|c| c.is_whitespace() || c == '<' || c == '>')
}

/// `Display <local.@domain>` or bare `local.@domain` → mailbox, sans revalider
/// la grammaire complète.
pub fn extract_trailing_dot_mailbox(field: &str) -> Option<Mailbox> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (display, candidate) = match ANGLE_ADDR.captures(trimmed) {
        Some(caps) => (
            caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default(),
            caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default(),
        ),
        None => ("", trimmed),
    };

    if candidate.is_empty() || !is_valid_trailing_dot_address(candidate) {
        return None;
    }
    let (local, domain) = candidate.split_once('@')?;

    Some(Mailbox {
        display_name: display_name(display),
        local: local.to_string(),
        domain: domain.to_string(),
    })
}

pub fn parse_address_with_trailing_dot(field: &str) -> Option<String> {
    extract_trailing_dot_mailbox(field).map(|mailbox| mailbox.address())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_detection() {
        assert!(has_trailing_dot_pattern("alice.@example.com"));
        assert!(has_trailing_dot_pattern("Bob Smith <bob.@company.org>"));
        assert!(has_trailing_dot_pattern("user.@domain.co.uk"));
        assert!(!has_trailing_dot_pattern("normal@example.com"));
        assert!(!has_trailing_dot_pattern("test.name@domain.org"));
        assert!(!has_trailing_dot_pattern("invalid.email"));
        assert!(!has_trailing_dot_pattern("test@@example.com"));
        assert!(!has_trailing_dot_pattern("invalid.@"));
        assert!(!has_trailing_dot_pattern(".@example.com"));
        assert!(!has_trailing_dot_pattern(""));
    }

    #[test]
    fn accepted_addresses() {
        for address in [
            "alice.@example.com",
            "user.name.@domain.org",
            "test.@localhost",
            "a.@b.co",
        ] {
            assert!(is_valid_trailing_dot_address(address), "{address}");
        }
    }

    #[test]
    fn rejected_addresses() {
        for address in [
            "invalid.@",
            ".@example.com",
            "test@.",
            "@example.com",
            "test@",
            "test.@example.com.",
            "test.@.example.com",
            "test.@example..com",
            "a..b.@example.com",
            "",
            "test@@example.com",
        ] {
            assert!(!is_valid_trailing_dot_address(address), "{address}");
        }
    }

    #[test]
    fn extraction() {
        assert_eq!(
            parse_address_with_trailing_dot("alice.@example.com").as_deref(),
            Some("alice.@example.com")
        );
        assert_eq!(
            parse_address_with_trailing_dot("Bob Smith <bob.@company.org>").as_deref(),
            Some("bob.@company.org")
        );
        assert_eq!(
            parse_address_with_trailing_dot("  John Doe  <  john.@test.net  >  ").as_deref(),
            Some("john.@test.net")
        );
        assert_eq!(parse_address_with_trailing_dot("invalid.@"), None);
        assert_eq!(parse_address_with_trailing_dot("Name <invalid@>"), None);
        assert_eq!(parse_address_with_trailing_dot("Name <>"), None);
        assert_eq!(parse_address_with_trailing_dot(""), None);
        assert_eq!(parse_address_with_trailing_dot("not-an-email"), None);
    }

    #[test]
    fn extraction_keeps_display_name() {
        let mailbox = extract_trailing_dot_mailbox("\"Smith, Bob\" <bob.@company.org>").unwrap();
        assert_eq!(mailbox.display_name.as_deref(), Some("Smith, Bob"));
        assert_eq!(mailbox.local, "bob.");
        assert_eq!(mailbox.domain, "company.org");
    }
}
