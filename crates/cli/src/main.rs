use std::process::ExitCode;

use clap::Parser;
use env_logger::init;
use noto_fonts_cli::cli::Cli;

fn main() -> ExitCode {
    init();
    match Cli::parse().command.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
