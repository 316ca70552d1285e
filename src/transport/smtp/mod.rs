mod message;
mod probe;
mod session;

use std::time::Duration;

use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::{SmtpTransport, Transport};
use tracing::info;

pub use message::is_deliverable;

use super::{MailTransport, OutgoingMail, ProbeOutcome, TransportError};

/// Port sur lequel TLS est implicite (SMTPS).
pub(crate) const IMPLICIT_TLS_PORT: u16 = 465;

/// Relay parameters shared by sending and probing.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub tls_verify: bool,
    /// 0 disables connection and read deadlines.
    pub timeout_ms: u64,
    pub helo_domain: String,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            user: String::new(),
            pass: String::new(),
            tls_verify: false,
            timeout_ms: 30_000,
            helo_domain: "localhost".to_string(),
        }
    }
}

impl SmtpSettings {
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }

    pub fn helo_name(&self) -> &str {
        let helo = self.helo_domain.trim();
        if helo.is_empty() { "localhost" } else { helo }
    }

    fn has_credentials(&self) -> bool {
        !self.user.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SmtpSettings {
        &self.settings
    }

    fn transport(&self) -> Result<SmtpTransport, TransportError> {
        let settings = &self.settings;
        let parameters = TlsParameters::builder(settings.host.clone())
            .dangerous_accept_invalid_certs(!settings.tls_verify)
            .build()
            .map_err(TransportError::build)?;
        let tls = if settings.port == IMPLICIT_TLS_PORT {
            Tls::Wrapper(parameters)
        } else {
            Tls::Opportunistic(parameters)
        };

        let mut builder = SmtpTransport::builder_dangerous(settings.host.as_str())
            .port(settings.port)
            .tls(tls)
            .hello_name(ClientId::Domain(settings.helo_name().to_string()))
            .timeout(settings.timeout());
        if settings.has_credentials() {
            builder = builder.credentials(Credentials::new(
                settings.user.clone(),
                settings.pass.clone(),
            ));
        }
        Ok(builder.build())
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), TransportError> {
        if mail.recipients.is_empty() {
            return Err(TransportError::NoRecipients);
        }
        let message = message::build_message(mail)?;
        let transport = self.transport()?;
        let host = self.settings.host.clone();

        let response = transport.send(&message).map_err(|err| {
            if err.is_permanent() {
                TransportError::Rejected {
                    host: host.clone(),
                    message: err.to_string(),
                }
            } else {
                TransportError::Send {
                    host: host.clone(),
                    message: err.to_string(),
                }
            }
        })?;
        info!(
            host = host.as_str(),
            code = %response.code(),
            recipients = mail.recipients.total(),
            "message sent"
        );
        Ok(())
    }

    fn probe_recipient(&self, from: &str, recipient: &str) -> Result<ProbeOutcome, TransportError> {
        probe::probe_recipient(&self.settings, from, recipient)
    }
}
