//! # Font Default Instance
//!
//! Move the default instance of a variable font to Regular (`wght=400`),
//! optionally together with other axes.
//!
//! Only the `fvar` axis defaults change; outlines and variation data are not
//! touched. Members of a collection can share one `fvar` table, in which case
//! rewriting one member changes the defaults reported by the others.
//!
//! ## Example
//!
//! ```no_run
//! use font_default_instance::{AxisOverrides, set_file_defaults};
//! use font_model::{open, save};
//!
//! let mut file = open("NotoSansCJK-VF.ttc")?;
//! set_file_defaults(&mut file, &AxisOverrides::from([(b"wdth", 100.0)]))?;
//! save(&file, "NotoSansCJK-VF.regular.ttc")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod overrides;

use font_model::{Collection, Font, FontFile, VariationAxisTable};
use log::{debug, info, warn};
use read_fonts::types::Tag;

pub use error::{Error, Result};
pub use overrides::{AxisOverride, AxisOverrides};

/// The weight axis, always reset to [`REGULAR_WEIGHT`].
pub const WEIGHT: Tag = Tag::new(b"wght");

pub const REGULAR_WEIGHT: f64 = 400.0;

/// Set `wght` to 400 and apply `overrides` to the font's axis defaults.
///
/// Every tag is checked before anything is written, so a font without a
/// `wght` axis (or without one of the overridden axes) is left unchanged.
/// Overrides are applied after the forced weight, so an explicit `wght`
/// override takes precedence. Values outside an axis range are applied
/// as given, with a warning.
pub fn set_defaults(font: &mut Font, overrides: &AxisOverrides) -> Result<()> {
    let axes = font.variation_axes().ok_or(Error::UnknownAxis(WEIGHT))?;
    let mut axes = axes.borrow_mut();
    check_axes(&axes, overrides)?;

    set_default(&mut axes, WEIGHT, REGULAR_WEIGHT);
    for (tag, value) in overrides.iter() {
        set_default(&mut axes, tag, value);
    }
    Ok(())
}

/// [`set_defaults`] on every member, in order.
///
/// All members are checked first, so a failure leaves the whole collection
/// unchanged.
pub fn set_collection_defaults(fonts: &mut Collection, overrides: &AxisOverrides) -> Result<()> {
    for group in fonts.shared_axis_groups() {
        info!("Fonts {group:?} share one 'fvar' table");
    }

    for (index, font) in fonts.members().iter().enumerate() {
        let axes = font.variation_axes().ok_or(Error::UnknownAxis(WEIGHT));
        axes.and_then(|axes| check_axes(&axes.borrow(), overrides))
            .map_err(|source| Error::Member { index, source: Box::new(source) })?;
    }

    for (index, font) in fonts.members_mut().iter_mut().enumerate() {
        debug!("Setting defaults of font {index}");
        set_defaults(font, overrides)
            .map_err(|source| Error::Member { index, source: Box::new(source) })?;
    }
    Ok(())
}

/// Dispatch to [`set_defaults`] or [`set_collection_defaults`].
pub fn set_file_defaults(file: &mut FontFile, overrides: &AxisOverrides) -> Result<()> {
    match file {
        FontFile::Single(font) => set_defaults(font, overrides),
        FontFile::Collection(fonts) => set_collection_defaults(fonts, overrides),
    }
}

fn check_axes(axes: &VariationAxisTable, overrides: &AxisOverrides) -> Result<()> {
    std::iter::once(WEIGHT)
        .chain(overrides.iter().map(|(tag, _)| tag))
        .find(|tag| axes.axis(*tag).is_none())
        .map_or(Ok(()), |tag| Err(Error::UnknownAxis(tag)))
}

fn set_default(axes: &mut VariationAxisTable, tag: Tag, value: f64) {
    let Some(axis) = axes.axis(tag) else {
        return;
    };
    if !axis.contains(value) {
        warn!(
            "'{tag}' default {value} is outside the axis range {}..{}",
            axis.min_value, axis.max_value
        );
    }
    if axis.default_value != value {
        info!("'{tag}' default: {} -> {value}", axis.default_value);
    }
    axes.set_default_value(tag, value);
}
