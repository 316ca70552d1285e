use thiserror::Error;

/// `Relaxed` suit la grammaire RFC 5322 (addr-spec, quoted-string, display name).
/// `Strict` ajoute les contraintes d'un nom d'hôte réel (IDNA, labels, longueurs).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    Strict,
    #[default]
    Relaxed,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub ok: bool,
    /// Bare `local@domain`, present as soon as the mailbox could be split.
    pub address: Option<String>,
    pub display_name: Option<String>,
    /// The address was only accepted through the trailing-dot fallback.
    pub trailing_dot: bool,
    pub reasons: Vec<String>,
}

impl ValidationReport {
    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            address: None,
            display_name: None,
            trailing_dot: false,
            reasons: vec![reason.into()],
        }
    }
}

/// A mailbox split into its parts. `local` keeps its quotes when it was a
/// quoted-string.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub display_name: Option<String>,
    pub local: String,
    pub domain: String,
}

impl Mailbox {
    pub fn address(&self) -> String {
        format!("{}@{}", self.local, self.domain)
    }
}

/// Failures reported by the RFC 5322 mailbox grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty address")]
    Empty,
    #[error("{0}")]
    Syntax(#[from] email_address::Error),
}

impl ParseError {
    /// `alice.@example.com` is reported as an invalid character; the
    /// trailing-dot fallback only second-guesses that error.
    pub fn may_be_trailing_dot(&self) -> bool {
        matches!(self, Self::Syntax(email_address::Error::InvalidCharacter))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid address {address:?}: {}", .reasons.join("; "))]
    Invalid {
        address: String,
        reasons: Vec<String>,
    },
}
