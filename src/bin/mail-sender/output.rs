use std::io::{self, Write};

use anyhow::{Context, Result};
use recipient_lib::{RecipientDiagnosis, ValidationSummary};

/// Rapport dry-run sur stdout.
pub fn print_summary(summary: &ValidationSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serialize summary")?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("write stdout")?;
    Ok(())
}

pub fn format_diagnosis(diagnosis: &RecipientDiagnosis) -> String {
    let mut lines = Vec::new();
    if diagnosis.has_culprits() {
        lines.push(format!(
            "recipients likely rejected: {}",
            diagnosis.rejected.join(", ")
        ));
    } else {
        lines.push("no recipient could be identified as the cause".to_string());
    }
    if !diagnosis.inconclusive.is_empty() {
        lines.push(format!(
            "recipients not verified: {}",
            diagnosis.inconclusive.join(", ")
        ));
    }
    lines.join("\n")
}

/// Diagnostic sur stderr ; stdout reste réservé au rapport.
pub fn report_diagnosis(diagnosis: &RecipientDiagnosis) {
    eprintln!("{}", format_diagnosis(diagnosis));
}
