use native_tls::TlsConnector;
use tracing::debug;

use super::session::{SmtpReply, SmtpSession};
use super::{IMPLICIT_TLS_PORT, SmtpSettings};
use crate::transport::{ProbeOutcome, TransportError};

/// Connects to the relay and stops after `RCPT TO`, then `RSET` and `QUIT`.
pub(crate) fn probe_recipient(
    settings: &SmtpSettings,
    from: &str,
    recipient: &str,
) -> Result<ProbeOutcome, TransportError> {
    let connector = TlsConnector::builder()
        .danger_accept_invalid_certs(!settings.tls_verify)
        .build()
        .map_err(|source| TransportError::Tls { source })?;
    let timeout = settings.timeout();

    let mut session = SmtpSession::connect(&settings.host, settings.port, timeout)?;
    if settings.port == IMPLICIT_TLS_PORT {
        session.upgrade_tls(&connector, timeout)?;
    }
    let outcome = run_dialogue(&mut session, settings, &connector, from, recipient);
    session.quit().ok();

    if let Ok(outcome) = &outcome {
        debug!(recipient, ?outcome, "recipient probed");
    }
    outcome
}

fn run_dialogue(
    session: &mut SmtpSession,
    settings: &SmtpSettings,
    connector: &TlsConnector,
    from: &str,
    recipient: &str,
) -> Result<ProbeOutcome, TransportError> {
    let banner = session.read_banner()?;
    if !banner.is_positive_completion() {
        return Ok(inconclusive("greeting refused", &banner));
    }

    let ehlo_cmd = format!("EHLO {}", settings.helo_name());
    let mut ehlo = session.send_command(&ehlo_cmd)?;
    if !ehlo.is_positive_completion() {
        return Ok(inconclusive("EHLO refused", &ehlo));
    }

    if !session.is_tls() && ehlo.has_capability("STARTTLS") {
        let reply = session.starttls(connector, settings.timeout())?;
        if !reply.is_positive_completion() {
            return Ok(inconclusive("STARTTLS refused", &reply));
        }
        ehlo = session.send_command(&ehlo_cmd)?;
    }

    if settings.has_credentials() {
        if !ehlo.has_capability("AUTH") {
            return Ok(ProbeOutcome::Inconclusive(
                "AUTH not advertised by relay".to_string(),
            ));
        }
        let reply = session.auth_plain(&settings.user, &settings.pass)?;
        if !reply.is_positive_completion() {
            return Ok(inconclusive("authentication refused", &reply));
        }
    }

    let mail = session.send_command(&format!("MAIL FROM:<{from}>"))?;
    if !mail.is_positive_completion() {
        return Ok(inconclusive("MAIL FROM refused", &mail));
    }

    let rcpt = session.send_command(&format!("RCPT TO:<{recipient}>"))?;
    session.send_command("RSET").ok();
    Ok(classify_recipient(&rcpt))
}

fn inconclusive(step: &str, reply: &SmtpReply) -> ProbeOutcome {
    ProbeOutcome::Inconclusive(format!("{step} ({} {})", reply.code, reply.text()))
}

pub(crate) fn classify_recipient(reply: &SmtpReply) -> ProbeOutcome {
    if reply.is_positive_completion() {
        return ProbeOutcome::Accepted;
    }
    if is_permanent_no_mailbox(reply) {
        return ProbeOutcome::Rejected {
            code: reply.code,
            message: reply.text(),
        };
    }
    if reply.is_transient_failure() {
        return inconclusive("temporary failure", reply);
    }
    inconclusive("unexpected response", reply)
}

fn is_permanent_no_mailbox(reply: &SmtpReply) -> bool {
    matches!(reply.code, 550 | 551 | 553)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(line: &str) -> SmtpReply {
        SmtpReply::parse([line]).unwrap()
    }

    #[test]
    fn accepted_recipients() {
        assert_eq!(classify_recipient(&reply("250 2.1.5 Ok")), ProbeOutcome::Accepted);
        assert_eq!(
            classify_recipient(&reply("251 2.1.5 will forward")),
            ProbeOutcome::Accepted
        );
    }

    #[test]
    fn mailbox_rejections() {
        for (line, code) in [
            ("550 5.1.1 user unknown", 550),
            ("551 user not local", 551),
            ("553 mailbox name not allowed", 553),
        ] {
            match classify_recipient(&reply(line)) {
                ProbeOutcome::Rejected { code: got, .. } => assert_eq!(got, code),
                other => panic!("{line}: {other:?}"),
            }
        }
    }

    #[test]
    fn other_failures_are_inconclusive() {
        for line in [
            "450 4.2.0 mailbox busy",
            "454 4.7.1 relay access denied",
            "530 5.7.0 authentication required",
            "554 5.7.1 relay denied",
        ] {
            assert!(
                matches!(classify_recipient(&reply(line)), ProbeOutcome::Inconclusive(_)),
                "{line}"
            );
        }
    }
}
