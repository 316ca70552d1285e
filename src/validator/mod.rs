mod domain;
mod local;
mod parse;
mod trailing_dot;
mod types;

pub use parse::parse_mailbox;
pub use trailing_dot::{
    extract_trailing_dot_mailbox, has_trailing_dot_pattern, is_valid_trailing_dot_address,
    parse_address_with_trailing_dot,
};
pub use types::{AddressError, Mailbox, ParseError, ValidationMode, ValidationReport};

use tracing::{debug, warn};

use domain::check_hostname;
use local::check_local_strict;

/// `true` when `address` is an acceptable recipient under the RFC 5322
/// grammar, including the trailing-dot carve-out.
pub fn is_valid_address(address: &str) -> bool {
    validate_address(address, ValidationMode::Relaxed).ok
}

pub fn validate_address(address: &str, mode: ValidationMode) -> ValidationReport {
    let input = address.trim();
    if input.is_empty() {
        return ValidationReport::rejected("empty address");
    }

    let (mailbox, trailing_dot) = match parse_mailbox(input) {
        Ok(mailbox) => (mailbox, false),
        Err(err) if err.may_be_trailing_dot() => match extract_trailing_dot_mailbox(input) {
            Some(mailbox) => {
                warn!(address = input, "accepting address with trailing dot in local part");
                (mailbox, true)
            }
            None => {
                debug!(address = input, error = %err, "trailing-dot fallback did not apply");
                return ValidationReport::rejected(err.to_string());
            }
        },
        Err(err) => return ValidationReport::rejected(err.to_string()),
    };

    let mut reasons = Vec::new();
    if mode == ValidationMode::Strict {
        let bare_len = mailbox.local.len() + 1 + mailbox.domain.len();
        // RFC 5321: 254 max avec '@'
        if bare_len > 254 {
            reasons.push(format!("total length {bare_len} > 254"));
        }
        check_local_strict(&mailbox.local, &mut reasons);
        check_hostname(&mailbox.domain, &mut reasons);
    }

    ValidationReport {
        ok: reasons.is_empty(),
        address: Some(mailbox.address()),
        display_name: mailbox.display_name,
        trailing_dot,
        reasons,
    }
}

/// Valide et renvoie la mailbox découpée (display name, local, domaine).
pub fn normalize_address(address: &str, mode: ValidationMode) -> Result<Mailbox, AddressError> {
    let report = validate_address(address, mode);
    if !report.ok {
        return Err(AddressError::Invalid {
            address: address.to_string(),
            reasons: report.reasons,
        });
    }
    let bare = report.address.unwrap_or_default();
    let (local, domain) = bare.rsplit_once('@').ok_or_else(|| AddressError::Invalid {
        address: address.to_string(),
        reasons: vec!["missing '@'".to_string()],
    })?;
    Ok(Mailbox {
        display_name: report.display_name,
        local: local.to_string(),
        domain: domain.to_string(),
    })
}
