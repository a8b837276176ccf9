//! requp - Update pinned package versions in pip requirements files
//!
//! Reads a requirements file (and every file it includes), asks the package
//! index for newer releases and rewrites only the version tokens that change.

use clap::Parser;
use requp::cli::{CliArgs, EXIT_NOTHING_UPDATED, EXIT_UPDATED};
use requp::error::AppError;
use requp::orchestrator::Orchestrator;
use requp::output::{create_formatter, OutputConfig};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            ExitCode::from(code)
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "requp=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    args.validate().map_err(AppError::from)?;
    tracing::debug!("requp v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Requirements: {}", args.requirement.display());

    let mut orchestrator = Orchestrator::from_cli(&args)?;
    let result = orchestrator.run().await?;

    let output_config = OutputConfig::from_cli(
        args.json,
        args.verbose,
        args.quiet,
        args.dry_run,
        args.dry_run_changed,
    )
    .with_color(io::stdout().is_terminal());
    let formatter = create_formatter(output_config);

    let mut stderr = io::stderr().lock();
    formatter.format_warnings(&result.warnings, &mut stderr)?;
    stderr.flush()?;

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if !args.nonzero_exit_code {
        return Ok(ExitCode::SUCCESS);
    }
    if result.report.has_updates() {
        Ok(ExitCode::from(EXIT_UPDATED))
    } else {
        Ok(ExitCode::from(EXIT_NOTHING_UPDATED))
    }
}
