use std::path::PathBuf;

use clap::Parser;
use recipient_lib::{ContentKind, ValidationMode};

/// Envoie un message aux destinataires To/Cc via le relais SMTP configuré.
#[derive(Parser, Debug)]
#[command(name = "mail-sender")]
pub struct Cli {
    /// pièces jointes, séparées par `sep`
    #[arg(short = 'a', long, default_value = "")]
    pub attachment: String,

    /// corps du message, ou chemin d'un fichier contenant le corps
    #[arg(short = 'b', long, default_value = "")]
    pub body: String,

    /// fichier de configuration JSON (relais + expéditeur)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// HTML|PLAIN_TEXT
    #[arg(short = 'e', long = "content_type", default_value = "PLAIN_TEXT")]
    pub content_type: ContentKind,

    /// nom affiché de l'expéditeur
    #[arg(short = 'r', long, default_value = "")]
    pub header: String,

    /// destinataires, ex. `alen@example.com,cc:bob@example.com`
    #[arg(short = 'p', long)]
    pub recipients: String,

    /// sujet
    #[arg(short = 't', long, default_value = "")]
    pub title: String,

    /// valide les destinataires et affiche le rapport JSON sans envoyer
    #[arg(short = 'd', long = "dry_run")]
    pub dry_run: bool,

    /// mode: strict|relaxed
    #[arg(long, default_value = "relaxed", value_parser = ["strict", "relaxed"])]
    pub mode: String,

    /// logs debug sur stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn parsed_mode(&self) -> ValidationMode {
        match self.mode.as_str() {
            "strict" => ValidationMode::Strict,
            _ => ValidationMode::Relaxed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from([
            "mail-sender",
            "-c",
            "sender.json",
            "-p",
            "a@example.com,cc:b@example.com",
            "-e",
            "HTML",
            "-r",
            "Ops",
            "-t",
            "Report",
            "-d",
        ])
        .unwrap();
        assert_eq!(cli.content_type, ContentKind::Html);
        assert_eq!(cli.header, "Ops");
        assert_eq!(cli.title, "Report");
        assert!(cli.dry_run);
        assert_eq!(cli.parsed_mode(), ValidationMode::Relaxed);
    }

    #[test]
    fn long_flags_keep_underscores() {
        let cli = Cli::try_parse_from([
            "mail-sender",
            "--recipients",
            "a@example.com",
            "--content_type",
            "PLAIN_TEXT",
            "--dry_run",
            "--mode",
            "strict",
        ])
        .unwrap();
        assert_eq!(cli.content_type, ContentKind::PlainText);
        assert!(cli.dry_run);
        assert_eq!(cli.parsed_mode(), ValidationMode::Strict);
        assert!(cli.config.is_none());
    }

    #[test]
    fn rejects_unknown_content_type() {
        assert!(
            Cli::try_parse_from(["mail-sender", "-p", "a@example.com", "-e", "MARKDOWN"]).is_err()
        );
    }
}
