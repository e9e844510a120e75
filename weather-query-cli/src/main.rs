//! Binary crate for the `weather-query` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and setting up logging
//! - Prompting for the API key
//! - Printing the reading or the error line

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod prompt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
