use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

mod cli;
mod config;
mod download;
mod error;
mod index;
mod logging;
mod presenter;
#[cfg(test)]
mod test_server;
mod ui;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("{:#}", err).red());
            ExitCode::FAILURE
        }
    }
}
