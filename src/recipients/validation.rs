use tracing::warn;

use super::{AddressList, RecipientLists, normalize_recipients};
use crate::validator::{ValidationMode, validate_address};

/// Dry-run report: what would be sent, what was dropped.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub valid_addresses: Vec<String>,
    pub invalid_addresses: Vec<String>,
    pub cc_addresses: Vec<String>,
    pub to_addresses: Vec<String>,
    pub total_count: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
}

/// Drops invalid entries from both buckets, keeping the To/Cc split.
pub fn validate_recipients(
    lists: &RecipientLists,
    mode: ValidationMode,
) -> (RecipientLists, ValidationSummary) {
    validate_recipients_with(lists, mode, |_| true)
}

/// Like [`validate_recipients`], with an extra check applied to addresses
/// that pass validation. `accept` refusing an address counts it as invalid.
pub fn validate_recipients_with<F>(
    lists: &RecipientLists,
    mode: ValidationMode,
    accept: F,
) -> (RecipientLists, ValidationSummary)
where
    F: Fn(&str) -> bool,
{
    let mut summary = ValidationSummary {
        total_count: lists.total(),
        ..ValidationSummary::default()
    };

    let mut keep = |list: &AddressList| -> AddressList {
        let mut kept = AddressList::new();
        for address in list.iter() {
            let report = validate_address(address, mode);
            if !report.ok {
                warn!(address, reasons = ?report.reasons, "invalid recipient dropped");
                summary.invalid_addresses.push(address.to_string());
            } else if !accept(address) {
                warn!(address, "recipient cannot be addressed, dropped");
                summary.invalid_addresses.push(address.to_string());
            } else {
                summary.valid_addresses.push(address.to_string());
                kept.push(address);
            }
        }
        kept
    };

    let to = keep(&lists.to);
    let cc = keep(&lists.cc);

    summary.to_addresses = to.as_slice().to_vec();
    summary.cc_addresses = cc.as_slice().to_vec();
    summary.valid_count = summary.valid_addresses.len();
    summary.invalid_count = summary.invalid_addresses.len();

    (RecipientLists::new(to, cc), summary)
}

pub fn parse_recipients_with_validation(
    spec: &str,
    separator: &str,
    mode: ValidationMode,
) -> (RecipientLists, ValidationSummary) {
    validate_recipients(&normalize_recipients(spec, separator), mode)
}
