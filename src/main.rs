use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use infragraph::cli::{Cli, CliRunner, CommandOutcome};
use infragraph::logging::init_logging;
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(CommandOutcome::Success) => ExitCode::SUCCESS,
        Ok(CommandOutcome::Failed) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<CommandOutcome> {
    let runner = CliRunner::new(&cli)?;

    if let Err(err) = init_logging(&runner.config().logging) {
        eprintln!("{} {}", "warning:".yellow(), err);
    }
    debug!(version = infragraph::VERSION, "starting");

    Ok(runner.run(cli.command).await?)
}
