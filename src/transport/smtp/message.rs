use std::fs;
use std::path::Path;

use lettre::address::Envelope;
use lettre::message::header::{self, ContentType};
use lettre::message::{Attachment, Mailbox, Mailboxes, MultiPart, SinglePart};
use lettre::{Address, Message};

use crate::transport::{ContentKind, OutgoingMail, TransportError};
use crate::validator::{ValidationMode, normalize_address};

const ATTACHMENT_MIME: &str = "application/octet-stream";

/// The envelope is built from the validated recipients; lettre would
/// otherwise re-parse the To/Cc headers, which its grammar does not always
/// accept (quoted local parts, domain literals, trailing dots).
pub(crate) fn build_message(mail: &OutgoingMail) -> Result<Message, TransportError> {
    let from = mailbox(&mail.from.address, mail.from.display_name.as_deref())?;
    let to = mailboxes(mail.recipients.to.iter())?;
    let cc = mailboxes(mail.recipients.cc.iter())?;

    let forward_path: Vec<Address> = to.iter().chain(cc.iter()).map(|m| m.email.clone()).collect();
    let envelope =
        Envelope::new(Some(from.email.clone()), forward_path).map_err(TransportError::build)?;

    let mut builder = Message::builder()
        .from(from)
        .subject(mail.subject.as_str())
        .envelope(envelope);
    if to.iter().next().is_some() {
        builder = builder.header(header::To::from(to));
    }
    if cc.iter().next().is_some() {
        builder = builder.header(header::Cc::from(cc));
    }

    let body = body_part(mail);
    if mail.attachments.is_empty() {
        return builder.singlepart(body).map_err(TransportError::build);
    }

    let mut parts = MultiPart::mixed().singlepart(body);
    for path in &mail.attachments {
        parts = parts.singlepart(attachment_part(path)?);
    }
    builder.multipart(parts).map_err(TransportError::build)
}

/// Whether `address` can be carried as an envelope recipient. Addresses the
/// validator accepts but lettre refuses are dropped before building.
pub fn is_deliverable(address: &str) -> bool {
    mailbox(address, None).is_ok()
}

fn mailboxes<'a>(addresses: impl Iterator<Item = &'a str>) -> Result<Mailboxes, TransportError> {
    addresses.map(|address| mailbox(address, None)).collect()
}

/// `Display <local@domain>` or a bare address; `display_name` overrides the
/// one carried by the text.
fn mailbox(text: &str, display_name: Option<&str>) -> Result<Mailbox, TransportError> {
    let parsed = normalize_address(text, ValidationMode::Relaxed)
        .map_err(|source| TransportError::address(text, source))?;
    let address = envelope_address(&parsed.local, &parsed.domain)?;
    let name = display_name.map(str::to_string).or(parsed.display_name);
    Ok(Mailbox::new(name, address))
}

/// lettre refuse `alice.@example.com` : on vérifie le radical puis on garde
/// la forme d'origine.
fn envelope_address(local: &str, domain: &str) -> Result<Address, TransportError> {
    match Address::new(local, domain) {
        Ok(address) => Ok(address),
        Err(err) => match local.strip_suffix('.') {
            Some(stem) if Address::new(stem, domain).is_ok() => {
                Ok(Address::new_dangerous(local, domain))
            }
            _ => Err(TransportError::build(err)),
        },
    }
}

fn body_part(mail: &OutgoingMail) -> SinglePart {
    let content_type = match mail.content_kind {
        ContentKind::Html => ContentType::TEXT_HTML,
        ContentKind::PlainText => ContentType::TEXT_PLAIN,
    };
    SinglePart::builder()
        .header(content_type)
        .body(mail.body.clone())
}

fn attachment_part(path: &Path) -> Result<SinglePart, TransportError> {
    let content = fs::read(path).map_err(|source| TransportError::attachment(path, source))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    let content_type = ContentType::parse(ATTACHMENT_MIME).map_err(TransportError::build)?;
    Ok(Attachment::new(filename).body(content, content_type))
}
