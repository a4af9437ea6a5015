use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use font_model::{FontFile, open, save};
use font_watermark::{
    NEW_CODE_POINT, NEW_GLYPH_NAME, REFERENCE_CODE_POINT, WatermarkOptions, inject,
    parse_code_point,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Model(#[from] font_model::Error),
    #[error("{0}")]
    Watermark(#[from] font_watermark::Error),
    #[error("collections are not supported ({0} fonts in input)")]
    Collection(usize),
}

#[derive(Parser)]
#[command(name = "font-watermark", version)]
#[command(about = "Add a glyph that renders the font version via ccmp")]
struct Cli {
    /// Input font file
    input: PathBuf,

    /// Output font file
    output: PathBuf,

    /// Code point whose glyph metrics are copied (default: U+1F1E6)
    #[arg(long, value_parser = code_point)]
    reference: Option<u32>,

    /// Code point the new glyph is mapped to (default: U+10FF00)
    #[arg(long, value_parser = code_point)]
    code_point: Option<u32>,

    /// Name of the new glyph
    #[arg(long, default_value = NEW_GLYPH_NAME)]
    glyph_name: String,

    /// Quiet output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    exit_code(run(Cli::parse()))
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
    let mut font = match open(&cli.input)? {
        FontFile::Single(font) => font,
        FontFile::Collection(fonts) => return Err(CliError::Collection(fonts.len())),
    };

    let options = WatermarkOptions {
        reference_code_point: cli.reference.unwrap_or(REFERENCE_CODE_POINT),
        new_code_point: cli.code_point.unwrap_or(NEW_CODE_POINT),
        glyph_name: cli.glyph_name,
    };
    let injection = inject(&mut font, &options)?;
    save(&font.into(), &cli.output)?;

    if !cli.quiet {
        println!(
            "Wrote {} ('{}' spells {})",
            cli.output.display(),
            injection.glyph_name,
            injection.version
        );
    }
    Ok(())
}

fn code_point(s: &str) -> Result<u32, String> {
    parse_code_point(s).ok_or_else(|| format!("not a code point: {s}"))
}
