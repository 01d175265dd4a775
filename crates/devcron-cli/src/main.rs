use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use devcron_core::{parse_crontab, text, Cron};
use tracing::debug;

/// Run a crontab against the local clock — cron for development trees.
#[derive(Debug, Parser)]
#[command(name = "devcron", version)]
struct Args {
    /// Log schedule parsing and tick pacing at debug verbosity.
    #[arg(short, long)]
    verbose: bool,

    /// Path to the crontab file to run.
    crontab: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "devcron=debug,devcron_core=debug"
    } else {
        "devcron=warn,devcron_core=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let raw = std::fs::read_to_string(&args.crontab)
        .with_context(|| format!("reading crontab {}", args.crontab.display()))?;
    let data = text::apply_deletions(&text::fold_lines(&raw));
    debug!("edited crontab:\n{data}");

    // A parse error aborts here — the loop never starts on a partial schedule.
    let entries = parse_crontab(&data)?;
    for entry in &entries {
        debug!(%entry, "scheduled");
    }

    Cron::new(entries).run().await;
    Ok(())
}
