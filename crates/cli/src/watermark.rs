use std::path::Path;

use anyhow::{Context, Result};
use font_model::{open, save};
use font_watermark::{Injection, WatermarkOptions, inject};

/// Watermark the single font at `input` and write it to `output`.
pub fn watermark(input: &Path, output: &Path, options: &WatermarkOptions) -> Result<Injection> {
    let mut font = open(input)
        .and_then(|file| file.into_single())
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let injection = inject(&mut font, options)
        .with_context(|| format!("Failed to watermark {}", input.display()))?;

    save(&font.into(), output).with_context(|| format!("Failed to save {}", output.display()))?;
    Ok(injection)
}
