use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::validator::AddressError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cannot use address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: AddressError,
    },
    #[error("cannot read attachment {}: {source}", path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("message construction failed: {0}")]
    Build(String),
    #[error("no recipient to send to")]
    NoRecipients,
    /// Réponse 5xx du relais.
    #[error("{host} rejected the message: {message}")]
    Rejected { host: String, message: String },
    #[error("sending through {host} failed: {message}")]
    Send { host: String, message: String },
    #[error("cannot resolve {host}")]
    Unresolved { host: String },
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "with-smtp")]
    #[error("TLS handshake failed: {source}")]
    Tls {
        #[source]
        source: native_tls::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl TransportError {
    /// Permanent refusal by the relay, the only case worth diagnosing
    /// recipient by recipient.
    pub fn is_recipient_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub(crate) fn address(address: impl Into<String>, source: AddressError) -> Self {
        Self::Address {
            address: address.into(),
            source,
        }
    }

    pub(crate) fn attachment(path: &Path, source: std::io::Error) -> Self {
        Self::Attachment {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn build<T: std::fmt::Display>(err: T) -> Self {
        Self::Build(err.to_string())
    }

    pub(crate) fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}
