//! Recipient specification parsing.
//!
//! A specification is a separator-delimited string such as
//! `alen@example.com,cc:bob@example.com`. Fields prefixed with `cc:` go to
//! the Cc bucket, everything else to To. Both buckets are deduplicated and
//! an address present in To is removed from Cc.

mod filter;
mod types;
mod validation;

pub use filter::{matches_filter, parse_filter, render_recipients};
pub use types::{AddressList, RecipientLists};
pub use validation::{
    ValidationSummary, parse_recipients_with_validation, validate_recipients,
    validate_recipients_with,
};

use tracing::debug;

pub const CC_PREFIX: &str = "cc:";
pub const DEFAULT_SEPARATOR: &str = ",";

/// Splits `spec` on `separator`, trimming each field and skipping empty ones.
/// An empty separator falls back to [`DEFAULT_SEPARATOR`].
pub fn split_fields<'a>(spec: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let separator = if separator.is_empty() {
        DEFAULT_SEPARATOR
    } else {
        separator
    };
    spec.split(separator)
        .map(str::trim)
        .filter(|field| !field.is_empty())
}

pub fn normalize_recipients(spec: &str, separator: &str) -> RecipientLists {
    let mut to = Vec::new();
    let mut cc = Vec::new();

    for field in split_fields(spec, separator) {
        match field.strip_prefix(CC_PREFIX) {
            Some(rest) => {
                let rest = rest.trim();
                if rest.is_empty() {
                    debug!(field, "skipping empty cc entry");
                } else {
                    cc.push(rest);
                }
            }
            None => to.push(field),
        }
    }

    RecipientLists::new(to.into_iter().collect(), cc.into_iter().collect())
}
