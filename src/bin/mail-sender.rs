#[path = "mail-sender/args.rs"]
mod args;
#[path = "mail-sender/config.rs"]
mod config;
#[path = "mail-sender/deliver.rs"]
mod deliver;
#[path = "mail-sender/input.rs"]
mod input;
#[path = "mail-sender/output.rs"]
mod output;

use anyhow::{Result, bail};
use recipient_lib::{
    OutgoingMail, Sender, SmtpMailer, is_deliverable, normalize_recipients, validate_recipients_with,
};

use crate::args::Cli;
use crate::config::SenderConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    recipient_lib::logging::install(cli.verbose);

    let Some(path) = cli.config.as_deref() else {
        bail!("missing --config");
    };
    let config = SenderConfig::load(path)?;

    // lettre n'accepte pas toutes les adresses RFC 5322 valides
    let (recipients, summary) = validate_recipients_with(
        &normalize_recipients(&cli.recipients, &config.sep),
        cli.parsed_mode(),
        is_deliverable,
    );

    if cli.dry_run {
        output::print_summary(&summary)?;
        if summary.valid_count == 0 {
            bail!("no valid recipient in {:?}", cli.recipients);
        }
        return Ok(());
    }

    if recipients.is_empty() {
        bail!("no valid recipient in {:?}", cli.recipients);
    }

    let mail = OutgoingMail {
        from: Sender::new(config.sender.as_str(), Some(cli.header.as_str())),
        recipients,
        subject: cli.title.clone(),
        body: input::parse_body(&cli.body)?,
        content_kind: cli.content_type,
        attachments: input::parse_attachments(&cli.attachment, &config.sep)?,
    };

    let mailer = SmtpMailer::new(config.smtp.clone());
    deliver::deliver(&mailer, &mail)
}
