use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use mermaid_hydrate_cli::{Args, ResolvedConfig, run};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mermaid_hydrate=info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "parsed arguments");

    let cwd = Utf8PathBuf::try_from(std::env::current_dir()?).map_err(|e| {
        eyre!(
            "Current directory is not valid UTF-8: {}",
            e.as_path().display()
        )
    })?;
    let config = ResolvedConfig::resolve(&args, &cwd)?;

    let summary = run(&config, args.check)?;
    tracing::info!(
        "{} file(s) scanned, {} changed, {} diagram(s)",
        summary.files_scanned,
        summary.files_changed,
        summary.diagrams
    );

    if summary.files_failed > 0 {
        tracing::error!("{} file(s) failed", summary.files_failed);
        return Ok(ExitCode::FAILURE);
    }
    if args.check && summary.files_changed > 0 {
        tracing::error!("{} file(s) need converting", summary.files_changed);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
