use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use native_tls::{HandshakeError, TlsConnector, TlsStream};
use tracing::trace;

use crate::transport::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn has_capability(&self, cap: &str) -> bool {
        self.lines.iter().any(|line| {
            line.split_whitespace()
                .next()
                .is_some_and(|token| token.eq_ignore_ascii_case(cap))
        })
    }

    pub fn text(&self) -> String {
        self.lines.join(" ")
    }

    /// Parses the lines of one (possibly multi-line) reply.
    pub fn parse<I, S>(lines: I) -> Result<Self, TransportError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        let mut code = None;
        for line in lines {
            let (line_code, is_last, text) = parse_line(line.as_ref())?;
            match code {
                Some(existing) if existing != line_code => {
                    return Err(TransportError::Protocol(format!(
                        "inconsistent reply codes: {existing} vs {line_code}"
                    )));
                }
                _ => code = Some(line_code),
            }
            parsed.push(text);
            if is_last {
                break;
            }
        }
        let code = code.ok_or_else(|| TransportError::Protocol("empty reply".into()))?;
        Ok(Self {
            code,
            lines: parsed,
        })
    }
}

/// `250-text` / `250 text` → (code, is_last, text)
fn parse_line(line: &str) -> Result<(u16, bool, String), TransportError> {
    let code = line
        .get(..3)
        .and_then(|digits| digits.parse::<u16>().ok())
        .ok_or_else(|| TransportError::Protocol(format!("invalid reply: {line}")))?;
    let is_last = line.as_bytes().get(3) != Some(&b'-');
    let text = line.get(4..).unwrap_or_default().to_string();
    Ok((code, is_last, text))
}

#[derive(Debug)]
enum StreamState {
    Plain(TcpStream),
    Tls(TlsStream<TcpStream>),
    Invalid,
}

#[derive(Debug)]
struct SmtpStream {
    state: StreamState,
    buffer: Vec<u8>,
}

impl SmtpStream {
    fn connect(addr: &SocketAddr, host: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let connected = match timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        };
        let stream = connected.map_err(|source| TransportError::Connect {
            host: host.to_string(),
            source,
        })?;
        stream.set_read_timeout(timeout).map_err(TransportError::io)?;
        stream.set_write_timeout(timeout).map_err(TransportError::io)?;
        Ok(Self {
            state: StreamState::Plain(stream),
            buffer: Vec::new(),
        })
    }

    fn is_tls(&self) -> bool {
        matches!(self.state, StreamState::Tls(_))
    }

    fn upgrade_tls(
        &mut self,
        domain: &str,
        connector: &TlsConnector,
        timeout: Option<Duration>,
    ) -> Result<(), TransportError> {
        let plain = match std::mem::replace(&mut self.state, StreamState::Invalid) {
            StreamState::Plain(stream) => stream,
            StreamState::Tls(stream) => {
                self.state = StreamState::Tls(stream);
                return Ok(());
            }
            StreamState::Invalid => {
                return Err(TransportError::Protocol("invalid stream state".into()));
            }
        };

        // STARTTLS repart d'un tampon vide
        self.buffer.clear();
        let mut tls = complete_handshake(connector, domain, plain)?;
        if let Some(timeout) = timeout {
            tls.get_mut()
                .set_read_timeout(Some(timeout))
                .map_err(TransportError::io)?;
            tls.get_mut()
                .set_write_timeout(Some(timeout))
                .map_err(TransportError::io)?;
        }
        self.state = StreamState::Tls(tls);
        Ok(())
    }

    fn send_command(&mut self, command: &str) -> Result<(), TransportError> {
        let mut data = command.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        let written = match &mut self.state {
            StreamState::Plain(stream) => stream.write_all(&data).and_then(|()| stream.flush()),
            StreamState::Tls(stream) => stream.write_all(&data).and_then(|()| stream.flush()),
            StreamState::Invalid => {
                return Err(TransportError::Protocol("invalid stream state".into()));
            }
        };
        written.map_err(TransportError::io)
    }

    fn read_reply(&mut self) -> Result<SmtpReply, TransportError> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line()?;
            let is_last = line.as_bytes().get(3) != Some(&b'-');
            lines.push(line);
            if is_last {
                break;
            }
        }
        SmtpReply::parse(lines)
    }

    fn read_line(&mut self) -> Result<String, TransportError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
                let mut line = self.buffer.drain(..=pos).collect::<Vec<_>>();
                if line.ends_with(b"\r\n") {
                    line.truncate(line.len() - 2);
                } else {
                    line.truncate(line.len() - 1);
                }
                return String::from_utf8(line)
                    .map_err(|err| TransportError::Protocol(format!("utf8 error: {err}")));
            }

            let mut buf = [0u8; 512];
            let read = match &mut self.state {
                StreamState::Plain(stream) => stream.read(&mut buf),
                StreamState::Tls(stream) => stream.read(&mut buf),
                StreamState::Invalid => {
                    return Err(TransportError::Protocol("invalid stream state".into()));
                }
            };
            let read = read.map_err(TransportError::io)?;
            if read == 0 {
                return Err(TransportError::io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed",
                )));
            }
            self.buffer.extend_from_slice(&buf[..read]);
        }
    }
}

fn complete_handshake(
    connector: &TlsConnector,
    domain: &str,
    stream: TcpStream,
) -> Result<TlsStream<TcpStream>, TransportError> {
    match connector.connect(domain, stream) {
        Ok(tls) => Ok(tls),
        Err(HandshakeError::Failure(source)) => Err(TransportError::Tls { source }),
        Err(HandshakeError::WouldBlock(mut mid)) => loop {
            match mid.handshake() {
                Ok(tls) => break Ok(tls),
                Err(HandshakeError::Failure(source)) => break Err(TransportError::Tls { source }),
                Err(HandshakeError::WouldBlock(next)) => mid = next,
            }
        },
    }
}

/// One SMTP conversation with the relay. Every exchange is traced.
pub(crate) struct SmtpSession {
    host: String,
    stream: SmtpStream,
}

impl SmtpSession {
    pub fn connect(host: &str, port: u16, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let addresses = (host, port)
            .to_socket_addrs()
            .map_err(|source| TransportError::Connect {
                host: host.to_string(),
                source,
            })?;

        let mut last_err = None;
        for addr in addresses {
            match SmtpStream::connect(&addr, host, timeout) {
                Ok(stream) => {
                    return Ok(Self {
                        host: host.to_string(),
                        stream,
                    });
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| TransportError::Unresolved {
            host: host.to_string(),
        }))
    }

    pub fn is_tls(&self) -> bool {
        self.stream.is_tls()
    }

    pub fn upgrade_tls(
        &mut self,
        connector: &TlsConnector,
        timeout: Option<Duration>,
    ) -> Result<(), TransportError> {
        let host = self.host.clone();
        self.stream.upgrade_tls(&host, connector, timeout)
    }

    pub fn read_banner(&mut self) -> Result<SmtpReply, TransportError> {
        let reply = self.stream.read_reply()?;
        self.trace_reply(&reply);
        Ok(reply)
    }

    pub fn send_command(&mut self, command: &str) -> Result<SmtpReply, TransportError> {
        trace!(host = self.host.as_str(), "C: {command}");
        self.exchange(command)
    }

    pub fn starttls(
        &mut self,
        connector: &TlsConnector,
        timeout: Option<Duration>,
    ) -> Result<SmtpReply, TransportError> {
        let reply = self.send_command("STARTTLS")?;
        if reply.is_positive_completion() {
            self.upgrade_tls(connector, timeout)?;
        }
        Ok(reply)
    }

    /// `AUTH PLAIN` en une seule ligne (RFC 4616).
    pub fn auth_plain(&mut self, user: &str, pass: &str) -> Result<SmtpReply, TransportError> {
        trace!(host = self.host.as_str(), "C: AUTH PLAIN ****");
        self.exchange(&format!("AUTH PLAIN {}", plain_credentials(user, pass)))
    }

    pub fn quit(&mut self) -> Result<(), TransportError> {
        trace!(host = self.host.as_str(), "C: QUIT");
        self.stream.send_command("QUIT")?;
        if let Ok(reply) = self.stream.read_reply() {
            self.trace_reply(&reply);
        }
        Ok(())
    }

    fn exchange(&mut self, command: &str) -> Result<SmtpReply, TransportError> {
        self.stream.send_command(command)?;
        let reply = self.stream.read_reply()?;
        self.trace_reply(&reply);
        Ok(reply)
    }

    fn trace_reply(&self, reply: &SmtpReply) {
        for line in &reply.lines {
            trace!(host = self.host.as_str(), "S: {} {line}", reply.code);
        }
    }
}

pub(crate) fn plain_credentials(user: &str, pass: &str) -> String {
    STANDARD.encode(format!("\0{user}\0{pass}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiline_ehlo() {
        let reply = SmtpReply::parse([
            "250-mail.example.com Hello",
            "250-SIZE 35882577",
            "250-STARTTLS",
            "250 AUTH PLAIN LOGIN",
        ])
        .unwrap();
        assert_eq!(reply.code, 250);
        assert_eq!(reply.lines.len(), 4);
        assert!(reply.is_positive_completion());
        assert!(reply.has_capability("starttls"));
        assert!(reply.has_capability("AUTH"));
        assert!(!reply.has_capability("PIPELINING"));
    }

    #[test]
    fn single_line_without_text() {
        let reply = SmtpReply::parse(["221"]).unwrap();
        assert_eq!(reply.code, 221);
        assert_eq!(reply.lines, [""]);
    }

    #[test]
    fn rejects_inconsistent_codes() {
        let err = SmtpReply::parse(["250-first", "251 second"]).unwrap_err();
        assert!(matches!(err, TransportError::Protocol(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(SmtpReply::parse(["hello"]).is_err());
        assert!(SmtpReply::parse(Vec::<String>::new()).is_err());
    }

    #[test]
    fn transient_codes() {
        let reply = SmtpReply::parse(["451 4.3.0 try again later"]).unwrap();
        assert!(reply.is_transient_failure());
        assert_eq!(reply.text(), "4.3.0 try again later");
    }

    #[test]
    fn auth_plain_encoding() {
        assert_eq!(plain_credentials("user", "pass"), "AHVzZXIAcGFzcw==");
    }
}
