//! Outgoing mail: the [`MailTransport`] contract, the mail model and the
//! best-effort recipient diagnosis run after a rejected send.
//!
//! [`SmtpMailer`] (`with-smtp` feature) sends through `lettre` and probes
//! recipients with a minimal SMTP dialogue of its own.

mod diagnose;
mod error;
#[cfg(feature = "with-smtp")]
mod smtp;
mod types;

pub use diagnose::{RecipientDiagnosis, diagnose_recipients};
pub use error::TransportError;
#[cfg(feature = "with-smtp")]
pub use smtp::{SmtpMailer, SmtpSettings, is_deliverable};
pub use types::{ContentKind, OutgoingMail, ProbeOutcome, Sender};

pub trait MailTransport {
    /// Sends one message to all of its To and Cc recipients.
    fn send(&self, mail: &OutgoingMail) -> Result<(), TransportError>;

    /// Asks the relay whether it would accept `recipient` from `from`,
    /// without transmitting any message.
    fn probe_recipient(&self, from: &str, recipient: &str) -> Result<ProbeOutcome, TransportError>;
}

impl<T: MailTransport + ?Sized> MailTransport for &T {
    fn send(&self, mail: &OutgoingMail) -> Result<(), TransportError> {
        (**self).send(mail)
    }

    fn probe_recipient(&self, from: &str, recipient: &str) -> Result<ProbeOutcome, TransportError> {
        (**self).probe_recipient(from, recipient)
    }
}
