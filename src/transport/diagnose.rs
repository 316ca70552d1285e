use tracing::{debug, warn};

use super::{MailTransport, OutgoingMail, ProbeOutcome};
use crate::validator::is_valid_address;

/// Outcome of probing every recipient after a rejected send. Heuristic only:
/// relays answer `RCPT TO` differently from a full transaction, and an
/// inconclusive probe never blames the recipient.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientDiagnosis {
    pub rejected: Vec<String>,
    pub inconclusive: Vec<String>,
}

impl RecipientDiagnosis {
    pub fn has_culprits(&self) -> bool {
        !self.rejected.is_empty()
    }
}

pub fn diagnose_recipients<T>(transport: &T, mail: &OutgoingMail) -> RecipientDiagnosis
where
    T: MailTransport + ?Sized,
{
    let mut diagnosis = RecipientDiagnosis::default();
    for recipient in mail.all_recipients() {
        if !is_valid_address(recipient) {
            warn!(recipient, "recipient has an invalid format");
            diagnosis.rejected.push(recipient.to_string());
            continue;
        }

        match transport.probe_recipient(&mail.from.address, recipient) {
            Ok(ProbeOutcome::Accepted) => debug!(recipient, "recipient accepted by relay"),
            Ok(ProbeOutcome::Rejected { code, message }) => {
                warn!(recipient, code, message = message.as_str(), "recipient rejected by relay");
                diagnosis.rejected.push(recipient.to_string());
            }
            Ok(ProbeOutcome::Inconclusive(reason)) => {
                debug!(recipient, reason = reason.as_str(), "probe inconclusive");
                diagnosis.inconclusive.push(recipient.to_string());
            }
            Err(err) => {
                debug!(recipient, error = %err, "probe failed");
                diagnosis.inconclusive.push(recipient.to_string());
            }
        }
    }
    diagnosis
}
