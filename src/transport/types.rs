use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::recipients::RecipientLists;

/// Body MIME type, named the way the command line spells it.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentKind {
    #[cfg_attr(feature = "with-serde", serde(rename = "HTML"))]
    Html,
    #[default]
    #[cfg_attr(feature = "with-serde", serde(rename = "PLAIN_TEXT"))]
    PlainText,
}

impl ContentKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::PlainText => "text/plain",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::PlainText => "PLAIN_TEXT",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HTML" => Ok(Self::Html),
            "PLAIN_TEXT" => Ok(Self::PlainText),
            other => Err(format!("unknown content type {other:?} (HTML, PLAIN_TEXT)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub address: String,
    pub display_name: Option<String>,
}

impl Sender {
    /// A blank display name is treated as absent.
    pub fn new(address: impl Into<String>, display_name: Option<&str>) -> Self {
        Self {
            address: address.into(),
            display_name: display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: Sender,
    pub recipients: RecipientLists,
    pub subject: String,
    pub body: String,
    pub content_kind: ContentKind,
    pub attachments: Vec<PathBuf>,
}

impl OutgoingMail {
    /// To recipients first, then Cc.
    pub fn all_recipients(&self) -> impl Iterator<Item = &str> {
        self.recipients.to.iter().chain(self.recipients.cc.iter())
    }
}

/// Relay verdict on a single `RCPT TO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Accepted,
    /// 550, 551 or 553: the mailbox is refused.
    Rejected { code: u16, message: String },
    Inconclusive(String),
}
