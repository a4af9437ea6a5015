//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use font_default_instance::AxisOverrides;
use font_model::open;
use font_watermark::{
    NEW_CODE_POINT, NEW_GLYPH_NAME, REFERENCE_CODE_POINT, WatermarkOptions, parse_code_point,
};

use crate::{describe, set_default_instance, watermark};

#[derive(Parser)]
#[command(name = "noto-fonts", version)]
#[command(about = "Post-process Noto font builds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a glyph at U+10FF00 that ccmp expands into the font version digits
    Watermark {
        input: PathBuf,
        output: PathBuf,
        /// Code point whose glyph metrics are copied (default: U+1F1E6)
        #[arg(long, value_parser = code_point)]
        reference: Option<u32>,
        /// Code point the new glyph is mapped to (default: U+10FF00)
        #[arg(long, value_parser = code_point)]
        code_point: Option<u32>,
        #[arg(long, default_value = NEW_GLYPH_NAME)]
        glyph_name: String,
    },
    /// Set wght=400 (and any TAG=VALUE overrides) as the default instance
    SetDefaultInstance {
        input: PathBuf,
        output: PathBuf,
        /// Extra axis defaults as TAG=VALUE (e.g., wdth=100)
        overrides: Vec<String>,
    },
    /// Show version, glyph count, GSUB features and axes
    Info { input: PathBuf },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Watermark { input, output, reference, code_point, glyph_name } => {
                let options = WatermarkOptions {
                    reference_code_point: reference.unwrap_or(REFERENCE_CODE_POINT),
                    new_code_point: code_point.unwrap_or(NEW_CODE_POINT),
                    glyph_name,
                };
                let injection = watermark(&input, &output, &options)?;
                println!(
                    "Watermarked {} -> {} ('{}' spells {})",
                    input.display(),
                    output.display(),
                    injection.glyph_name,
                    injection.version
                );
            }
            Commands::SetDefaultInstance { input, output, overrides } => {
                let overrides = AxisOverrides::parse_all(&overrides)?;
                set_default_instance(&input, &output, &overrides)?;
                println!("Set default instance: {} -> {}", input.display(), output.display());
            }
            Commands::Info { input } => {
                let file =
                    open(&input).with_context(|| format!("Failed to load {}", input.display()))?;
                println!("{}:", input.display());
                print!("{}", describe(&file));
            }
        }
        Ok(())
    }
}

fn code_point(s: &str) -> Result<u32, String> {
    parse_code_point(s).ok_or_else(|| format!("not a code point: {s}"))
}
