use std::path::Path;

use anyhow::{Context, Result};
use font_default_instance::{AxisOverrides, set_file_defaults};
use font_model::{open, save};
use log::info;

/// Rewrite the default instance of every font in `input` and write the
/// result to `output`.
pub fn set_default_instance(input: &Path, output: &Path, overrides: &AxisOverrides) -> Result<()> {
    let mut file = open(input).with_context(|| format!("Failed to load {}", input.display()))?;
    info!("Setting default instance of {} font(s)", file.fonts().len());

    set_file_defaults(&mut file, overrides)
        .with_context(|| format!("Failed to set default instance of {}", input.display()))?;

    save(&file, output).with_context(|| format!("Failed to save {}", output.display()))
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use font_model::{FontFile, test_fonts::TestFont};

    use super::*;

    #[test]
    fn missing_weight_axis_writes_nothing() {
        let dir = env::temp_dir();
        let input = dir.join(format!("noto-fonts-cli-{}-static.ttf", process::id()));
        let output = dir.join(format!("noto-fonts-cli-{}-static-out.ttf", process::id()));
        fs::write(&input, TestFont::new().axis(b"wdth", 50.0, 75.0, 100.0).build()).unwrap();

        let error = set_default_instance(&input, &output, &AxisOverrides::new()).unwrap_err();
        assert!(format!("{error:#}").contains("wght"));
        assert!(!output.exists());
        fs::remove_file(input).ok();
    }

    #[test]
    fn default_instance_is_saved() {
        let dir = env::temp_dir();
        let input = dir.join(format!("noto-fonts-cli-{}-vf.ttf", process::id()));
        let output = dir.join(format!("noto-fonts-cli-{}-vf-out.ttf", process::id()));
        fs::write(&input, TestFont::new().axis(b"wght", 100.0, 700.0, 900.0).build()).unwrap();

        set_default_instance(&input, &output, &AxisOverrides::new()).unwrap();
        let file = FontFile::from_bytes(&fs::read(&output).unwrap()).unwrap();
        let axes = file.fonts()[0].variation_axes().unwrap().borrow();
        assert_eq!(axes.default_value(font_default_instance::WEIGHT), Some(400.0));
        fs::remove_file(input).ok();
        fs::remove_file(output).ok();
    }
}
