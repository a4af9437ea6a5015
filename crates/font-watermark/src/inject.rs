use font_model::{
    Direction, Font, GlyphName, Lookup, Metric, MultipleSubstitutionLookup,
};
use log::{debug, info, warn};
use read_fonts::types::{GlyphId16, Tag};

use crate::{Error, FontVersion, Result};

/// Code point whose glyph lends its metrics to the watermark glyph
/// (REGIONAL INDICATOR SYMBOL LETTER A).
pub const REFERENCE_CODE_POINT: u32 = 0x1F1E6;

/// Private-use code point the watermark glyph is mapped to.
pub const NEW_CODE_POINT: u32 = 0x10FF00;

pub const NEW_GLYPH_NAME: &str = "u10FF00";

/// Glyph composition feature the substitution is registered under.
pub const CCMP: Tag = Tag::new(b"ccmp");

/// Where the watermark glyph goes and what it borrows from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkOptions {
    pub reference_code_point: u32,
    pub new_code_point: u32,
    pub glyph_name: String,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            reference_code_point: REFERENCE_CODE_POINT,
            new_code_point: NEW_CODE_POINT,
            glyph_name: NEW_GLYPH_NAME.to_owned(),
        }
    }
}

/// What [`inject`] added to the font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub version: FontVersion,
    pub glyph_name: GlyphName,
    pub glyph_id: GlyphId16,
    pub lookup_index: u16,
    pub sequence: Vec<GlyphName>,
}

/// Add a glyph that `ccmp` expands into the digits of the font version.
///
/// The version is read from the `name` table, its digits are mapped through
/// the character map, and a new glyph with the metrics of the reference
/// glyph is mapped to the new code point. A multiple substitution lookup
/// from the new glyph to the digit glyphs is appended to GSUB and its index
/// appended to the `ccmp` feature.
///
/// Every lookup happens before the first edit, so on error the font is left
/// as it was. Injecting twice adds a second glyph (named `u10FF00#1`), lookup
/// and feature entry; nothing is deduplicated.
pub fn inject(font: &mut Font, options: &WatermarkOptions) -> Result<Injection> {
    let version = FontVersion::parse(font.version_string().ok_or(Error::MissingVersion)?)?;
    let sequence = glyph_sequence(font, &version.display_string())?;

    let reference = mapped_glyph(font, options.reference_code_point)?;
    let horizontal = reference_metric(font, &reference, Direction::Horizontal)?
        .ok_or(font_model::Error::MissingTable(Direction::Horizontal.metrics_tag()))?;
    let vertical = reference_metric(font, &reference, Direction::Vertical)?;

    let gsub = font.substitution_table().ok_or(Error::FeatureNotFound(CCMP))?;
    if gsub.feature_lookup_indices(CCMP).is_none() {
        return Err(Error::FeatureNotFound(CCMP));
    }
    if gsub.lookup_count() >= u16::MAX as usize {
        return Err(font_model::Error::TooManyLookups(gsub.lookup_count()).into());
    }
    if font.glyph_order().remaining_capacity() == 0 {
        return Err(font_model::Error::TooManyGlyphs(font.glyph_order().len()).into());
    }

    let glyph_name = font.glyph_order().unique_name(&options.glyph_name);
    if glyph_name != options.glyph_name.as_str() {
        warn!("Glyph '{}' already exists, adding '{glyph_name}'", options.glyph_name);
    }
    let glyph_id = font.glyph_order_mut().push(glyph_name.clone())?;

    if let Some(metrics) = font.metrics_mut(Direction::Horizontal) {
        metrics.insert(glyph_name.clone(), horizontal);
    }
    if let (Some(metric), Some(metrics)) = (vertical, font.metrics_mut(Direction::Vertical)) {
        metrics.insert(glyph_name.clone(), metric);
    }

    let previous = font.character_map_mut().insert(options.new_code_point, glyph_name.clone());
    if let Some(previous) = previous {
        debug!("U+{:04X} was mapped to '{previous}'", options.new_code_point);
    }

    let lookup = MultipleSubstitutionLookup::single(glyph_name.clone(), sequence.clone());
    let gsub = font.substitution_table_mut().ok_or(Error::FeatureNotFound(CCMP))?;
    let lookup_index = gsub.push_lookup(Lookup::MultipleSubstitution(lookup))?;
    gsub.feature_lookup_indices_mut(CCMP)
        .ok_or(Error::FeatureNotFound(CCMP))?
        .push(lookup_index);

    info!(
        "Added '{glyph_name}' (gid {}) for version {version} as lookup {lookup_index}",
        glyph_id.to_u16()
    );
    Ok(Injection { version, glyph_name, glyph_id, lookup_index, sequence })
}

fn glyph_sequence(font: &Font, text: &str) -> Result<Vec<GlyphName>> {
    text.chars().map(|c| mapped_glyph(font, c as u32)).collect()
}

fn mapped_glyph(font: &Font, code_point: u32) -> Result<GlyphName> {
    font.character_map()
        .get(code_point)
        .cloned()
        .ok_or(Error::MissingGlyph { code_point })
}

/// `None` when the font has no metrics table for `direction`.
fn reference_metric(font: &Font, glyph: &GlyphName, direction: Direction) -> Result<Option<Metric>> {
    let Some(metrics) = font.metrics(direction) else {
        return Ok(None);
    };
    metrics
        .get(glyph)
        .map(Some)
        .ok_or_else(|| font_model::Error::MissingMetrics(glyph.clone(), direction).into())
}
