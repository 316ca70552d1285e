use anyhow::{Context, Result};
use recipient_lib::{MailTransport, OutgoingMail, diagnose_recipients};
use tracing::{info, warn};

use crate::output;

/// Sends `mail`; on a permanent rejection, probes each recipient to point at
/// the likely culprits before failing.
pub fn deliver<T>(transport: &T, mail: &OutgoingMail) -> Result<()>
where
    T: MailTransport + ?Sized,
{
    match transport.send(mail) {
        Ok(()) => {
            info!(
                to = mail.recipients.to.len(),
                cc = mail.recipients.cc.len(),
                "mail delivered"
            );
            Ok(())
        }
        Err(err) if err.is_recipient_rejection() => {
            warn!(error = %err, "relay rejected the message, probing recipients");
            let diagnosis = diagnose_recipients(transport, mail);
            output::report_diagnosis(&diagnosis);
            Err(err).context("message rejected")
        }
        Err(err) => Err(err).context("send failed"),
    }
}
