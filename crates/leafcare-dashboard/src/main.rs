#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use leafcare_core::Config;
use leafcare_dashboard::{execute, Cli, Command, DashboardContext};

/// Exit code for actions rejected because of invalid input.
const EXIT_REJECTED: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    leafcare_core::init(cli.verbose)?;

    let (config, _) =
        Config::load_validated(cli.config.as_deref()).context("Failed to load configuration")?;

    let ctx = DashboardContext::new(config).context("Failed to start LeafCare")?;
    let command = cli.command.unwrap_or(Command::Dashboard);

    match execute(&ctx, command, cli.json, Utc::now()).await {
        Ok(rendered) if rendered.rejected => {
            println!("{}", rendered.text);
            Ok(ExitCode::from(EXIT_REJECTED))
        }
        Ok(rendered) => {
            println!("{}", rendered.text);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
