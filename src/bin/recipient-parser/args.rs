use std::path::PathBuf;

use clap::Parser;
use recipient_lib::ValidationMode;

/// Normalise une liste de destinataires To/Cc, résout les identifiants via
/// l'annuaire et affiche les adresses retenues.
#[derive(Parser, Debug)]
#[command(name = "recipient-parser")]
pub struct Cli {
    /// fichier de configuration JSON (annuaire + séparateur)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// suffixes de domaine acceptés, ex. `@example1.com,@example2.com`
    #[arg(short = 'f', long, default_value = "")]
    pub filter: String,

    /// destinataires, ex. `alen10000001,cc:bob@example.com`
    #[arg(short = 'r', long)]
    pub recipients: String,

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
        mode_from_str(&self.mode)
    }
}

pub fn mode_from_str(s: &str) -> ValidationMode {
    match s {
        "strict" => ValidationMode::Strict,
        _ => ValidationMode::Relaxed,
    }
}
