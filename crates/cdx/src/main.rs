//! cdx - look up and fetch web-archive records from CDX indexes.
//!
//! Records and URLs go to stdout, logs to stderr.

use std::process::ExitCode;

use clap::Parser;

mod commands;
mod config;
mod logging;

use config::{App, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with status 2 here.
    let app = App::parse();
    logging::init(&app.global.log_level);

    let outcome = match app.command {
        Command::Lookup(args) => commands::lookup::run(&app.global, args).await,
        Command::Fetch(args) => commands::fetch::run(&app.global, args).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
