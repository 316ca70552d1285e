use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use recipient_lib::{DEFAULT_SEPARATOR, SmtpSettings};
use serde::Deserialize;

/// `{"host", "port", "user", "pass", "sender", "sep"}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    pub sep: String,
    /// adresse From
    pub sender: String,
    #[serde(flatten)]
    pub smtp: SmtpSettings,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            sep: DEFAULT_SEPARATOR.to_string(),
            sender: String::new(),
            smtp: SmtpSettings::default(),
        }
    }
}

impl SenderConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
