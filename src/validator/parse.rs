//! RFC 5322 mailbox parsing through `email_address`: `addr-spec`,
//! `Display Name <addr-spec>` and `"Display Name" <addr-spec>`.
//!
//! The crate only exposes the raw display text; it is unquoted here. A bare
//! `<addr-spec>` is unwrapped before parsing since the crate requires a
//! display name in front of the angle brackets.

use email_address::{EmailAddress, Options};

use super::types::{Mailbox, ParseError};

pub fn parse_mailbox(input: &str) -> Result<Mailbox, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let candidate = trimmed
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .map(str::trim)
        .unwrap_or(trimmed);
    let parsed = EmailAddress::parse_with_options(candidate, Options::default())?;

    Ok(Mailbox {
        display_name: display_name(parsed.display_part()),
        local: parsed.local_part().to_string(),
        domain: parsed.domain().to_string(),
    })
}

/// Texte brut avant `<...>` → nom affiché, guillemets et échappements retirés.
pub(crate) fn display_name(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(quoted) => Some(unquote(quoted)),
        None => Some(raw.to_string()),
    }
}

fn unquote(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
