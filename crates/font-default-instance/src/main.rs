use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use font_default_instance::{AxisOverrides, set_file_defaults};
use font_model::{open, save};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Model(#[from] font_model::Error),
    #[error("{0}")]
    DefaultInstance(#[from] font_default_instance::Error),
    #[error("missing output path")]
    MissingOutput,
}

#[derive(Parser)]
#[command(name = "font-default-instance", version)]
#[command(about = "Set the default instance of a variable font or collection to wght=400")]
struct Cli {
    /// Input variable font or collection
    input: PathBuf,

    /// Output file
    output: Option<PathBuf>,

    /// Extra axis defaults as TAG=VALUE (e.g., wdth=100)
    overrides: Vec<String>,

    /// Quiet output
    #[arg(short, long)]
    quiet: bool,

    /// Show font axes info
    #[arg(long)]
    info: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = if cli.info { show_info(&cli.input) } else { run(cli) };
    exit_code(result)
}

/// Fatal errors print one `Error: ...` line and exit with status 1.
fn exit_code(result: Result<(), CliError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let output = cli.output.ok_or(CliError::MissingOutput)?;
    let overrides = AxisOverrides::parse_all(&cli.overrides)?;

    let mut file = open(&cli.input)?;
    set_file_defaults(&mut file, &overrides)?;
    save(&file, &output)?;

    if !cli.quiet {
        println!("Wrote {}", output.display());
    }
    Ok(())
}

fn show_info(path: &Path) -> Result<(), CliError> {
    let file = open(path)?;
    for (index, font) in file.fonts().iter().enumerate() {
        if file.is_collection() {
            println!("Font {index}:");
        }
        let Some(axes) = font.variation_axes() else {
            println!("Not a variable font");
            continue;
        };
        println!("Variable font axes:");
        for axis in axes.borrow().axes() {
            println!(
                "  {:4}  {:6.0} .. {:6.0} (default: {:6.0})",
                axis.tag, axis.min_value, axis.max_value, axis.default_value,
            );
        }
    }
    Ok(())
}
