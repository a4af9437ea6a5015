//! A single font: typed tables plus the raw tables of its source.

use std::rc::Rc;

use read_fonts::types::Tag;

use crate::{
    axes::SharedAxisTable,
    cmap::CharacterMap,
    glyph_order::GlyphOrder,
    gsub::SubstitutionTable,
    metrics::{Direction, MetricsTable},
};

/// A table copied byte-for-byte from the source file.
///
/// Within a collection two members share a table when they hold the same
/// allocation; the collection writer stores such tables once.
#[derive(Debug, Clone)]
pub(crate) struct RawTable {
    pub(crate) tag: Tag,
    pub(crate) data: Rc<[u8]>,
}

/// What the font looked like when it was loaded.
#[derive(Debug, Clone, Default)]
pub(crate) struct Source {
    pub(crate) sfnt_version: u32,
    pub(crate) tables: Vec<RawTable>,
    pub(crate) glyph_count: usize,
    pub(crate) long_loca: bool,
}

/// Tables handed out through a `_mut` accessor, and therefore re-encoded on save.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Edits {
    pub(crate) character_map: bool,
    pub(crate) horizontal_metrics: bool,
    pub(crate) vertical_metrics: bool,
    pub(crate) substitution: bool,
}

/// An in-memory font.
///
/// The glyph order, character map, metrics, GSUB lookups and variation axes
/// are decoded into editable form. Every other table is kept as raw bytes
/// and written back unchanged.
#[derive(Debug, Clone)]
pub struct Font {
    pub(crate) glyph_order: GlyphOrder,
    pub(crate) character_map: CharacterMap,
    pub(crate) horizontal_metrics: Option<MetricsTable>,
    pub(crate) vertical_metrics: Option<MetricsTable>,
    pub(crate) substitution: Option<SubstitutionTable>,
    pub(crate) axes: Option<SharedAxisTable>,
    pub(crate) version: Option<String>,
    pub(crate) source: Source,
    pub(crate) edits: Edits,
}

impl Font {
    pub fn glyph_order(&self) -> &GlyphOrder {
        &self.glyph_order
    }

    /// Glyphs may only be appended; see [`GlyphOrder::push`].
    pub fn glyph_order_mut(&mut self) -> &mut GlyphOrder {
        &mut self.glyph_order
    }

    pub fn character_map(&self) -> &CharacterMap {
        &self.character_map
    }

    pub fn character_map_mut(&mut self) -> &mut CharacterMap {
        self.edits.character_map = true;
        &mut self.character_map
    }

    pub fn metrics(&self, direction: Direction) -> Option<&MetricsTable> {
        match direction {
            Direction::Horizontal => self.horizontal_metrics.as_ref(),
            Direction::Vertical => self.vertical_metrics.as_ref(),
        }
    }

    pub fn metrics_mut(&mut self, direction: Direction) -> Option<&mut MetricsTable> {
        match direction {
            Direction::Horizontal => {
                self.edits.horizontal_metrics = true;
                self.horizontal_metrics.as_mut()
            }
            Direction::Vertical => {
                self.edits.vertical_metrics = true;
                self.vertical_metrics.as_mut()
            }
        }
    }

    pub fn has_metrics(&self, direction: Direction) -> bool {
        self.metrics(direction).is_some()
    }

    pub fn substitution_table(&self) -> Option<&SubstitutionTable> {
        self.substitution.as_ref()
    }

    pub fn substitution_table_mut(&mut self) -> Option<&mut SubstitutionTable> {
        self.edits.substitution = true;
        self.substitution.as_mut()
    }

    /// The `fvar` axes, if this is a variable font.
    ///
    /// The handle may be shared with other members of the same collection.
    pub fn variation_axes(&self) -> Option<&SharedAxisTable> {
        self.axes.as_ref()
    }

    /// Whether both fonts reference the same axis table.
    pub fn shares_axes_with(&self, other: &Font) -> bool {
        match (&self.axes, &other.axes) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// English (or first) version string from the `name` table.
    pub fn version_string(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The sfnt version tag of the source (`0x00010000` or `OTTO`).
    pub fn sfnt_version(&self) -> u32 {
        self.source.sfnt_version
    }

    /// Tags of the tables in the source, in directory order.
    pub fn table_tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.source.tables.iter().map(|table| table.tag)
    }

    pub fn has_table(&self, tag: Tag) -> bool {
        self.source.tables.iter().any(|table| table.tag == tag)
    }

    /// Source bytes of table `tag`, ignoring any in-memory edits.
    pub fn raw_table(&self, tag: Tag) -> Option<&[u8]> {
        self.source.tables.iter().find(|table| table.tag == tag).map(|table| &*table.data)
    }

    /// Number of glyphs added since the font was loaded.
    pub fn added_glyph_count(&self) -> usize {
        self.glyph_order.len().saturating_sub(self.source.glyph_count)
    }
}
