#[path = "recipient-parser/args.rs"]
mod args;
#[path = "recipient-parser/config.rs"]
mod config;
#[path = "recipient-parser/pipeline.rs"]
mod pipeline;

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use recipient_lib::LdapDirectory;

use crate::args::Cli;
use crate::config::ParserConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    recipient_lib::logging::install(cli.verbose);

    let Some(path) = cli.config.as_deref() else {
        bail!("missing --config");
    };
    let config = ParserConfig::load(path)?;
    let directory = LdapDirectory::new(config.ldap.clone());

    let line = pipeline::run(&cli, &config, &directory)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(line.as_bytes()).context("write stdout")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}
