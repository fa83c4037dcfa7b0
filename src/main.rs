use std::process::ExitCode;

use clap::Parser;
use console::style;

use pantry::cli::Cli;

fn main() -> ExitCode {
    pantry::logging::init();
    let cli = Cli::parse();

    match pantry::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{} {err:#}", style("Error:").red().bold());
            ExitCode::FAILURE
        }
    }
}
