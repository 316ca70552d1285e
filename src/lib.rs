#![forbid(unsafe_code)]
//! recipient_lib — listes de destinataires To/Cc : parsing, validation RFC 5322,
//! résolution d'identifiants via annuaire, envoi SMTP.

pub mod directory;
pub mod recipients;
pub mod transport;
pub mod validator;

#[cfg(feature = "with-tracing")]
pub mod logging;

pub use directory::{DirectoryError, DirectoryLookup, parse_id, resolve_recipients, resolve_tokens};
#[cfg(feature = "with-ldap")]
pub use directory::{LdapDirectory, LdapSettings};
pub use recipients::{
    AddressList, CC_PREFIX, DEFAULT_SEPARATOR, RecipientLists, ValidationSummary,
    matches_filter, normalize_recipients, parse_filter, parse_recipients_with_validation,
    render_recipients, validate_recipients, validate_recipients_with,
};
pub use transport::{
    ContentKind, MailTransport, OutgoingMail, ProbeOutcome, RecipientDiagnosis, Sender,
    TransportError, diagnose_recipients,
};
#[cfg(feature = "with-smtp")]
pub use transport::{SmtpMailer, SmtpSettings, is_deliverable};
pub use validator::{
    AddressError, Mailbox, ParseError, ValidationMode, ValidationReport, is_valid_address,
    normalize_address, parse_address_with_trailing_dot, validate_address,
};
