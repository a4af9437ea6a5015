//! Typed, editable font tables for post-processing fonts.
//!
//! A [`Font`] decodes the handful of tables that post-processing steps edit
//! (glyph order, character map, metrics, GSUB, `fvar`) and keeps every other
//! table as raw bytes. [`open`] and [`save`] move fonts and collections
//! between files and the model:
//!
//! ```no_run
//! use font_model::{Direction, open, save};
//!
//! let file = open("NotoSans.ttf")?;
//! let font = file.into_single()?;
//! let advance = font.metrics(Direction::Horizontal).and_then(|m| m.get("A"));
//! println!("advance of A: {advance:?}");
//! save(&font.into(), "NotoSans-out.ttf")?;
//! # Ok::<(), font_model::Error>(())
//! ```

mod axes;
mod cmap;
mod collection;
mod container;
mod error;
mod font;
mod glyph_order;
mod gsub;
mod metrics;
#[cfg(any(test, feature = "test-fonts"))]
pub mod test_fonts;

pub use axes::{SharedAxisTable, VariationAxis, VariationAxisTable};
pub use cmap::CharacterMap;
pub use collection::{Collection, FontFile};
pub use container::{open, save};
pub use error::{Error, Result};
pub use font::Font;
pub use glyph_order::{GlyphName, GlyphOrder, MAX_GLYPHS};
pub use gsub::{Lookup, MultipleSubstitutionLookup, SubstitutionTable};
pub use metrics::{Direction, Metric, MetricsTable};
