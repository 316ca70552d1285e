use anyhow::{Context, Result, bail};
use recipient_lib::{
    DirectoryLookup, normalize_recipients, parse_filter, render_recipients, resolve_recipients,
    validate_recipients,
};
use tracing::debug;

use crate::args::Cli;
use crate::config::ParserConfig;

/// normalize → resolve → validate → filter, returns the output line.
pub fn run<D>(cli: &Cli, config: &ParserConfig, directory: &D) -> Result<String>
where
    D: DirectoryLookup + ?Sized,
{
    let lists = normalize_recipients(&cli.recipients, &config.sep);
    if lists.is_empty() {
        bail!("no recipient in {:?}", cli.recipients);
    }
    debug!(to = lists.to.len(), cc = lists.cc.len(), "recipients parsed");

    let resolved = resolve_recipients(&lists, directory).context("directory resolution failed")?;
    let (valid, summary) = validate_recipients(&resolved, cli.parsed_mode());
    debug!(
        valid = summary.valid_count,
        invalid = summary.invalid_count,
        "recipients validated"
    );
    if valid.is_empty() {
        bail!("no valid recipient in {:?}", cli.recipients);
    }

    let filter = parse_filter(&cli.filter, &config.sep);
    Ok(render_recipients(&valid, &filter))
}
