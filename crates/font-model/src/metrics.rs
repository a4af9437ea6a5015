//! Horizontal and vertical glyph metrics.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use read_fonts::types::Tag;

use crate::{Error, Result, glyph_order::GlyphName, glyph_order::GlyphOrder};

/// Layout direction of a metrics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Tag of the per-glyph metrics table (`hmtx` or `vmtx`).
    pub fn metrics_tag(self) -> Tag {
        match self {
            Self::Horizontal => Tag::new(b"hmtx"),
            Self::Vertical => Tag::new(b"vmtx"),
        }
    }

    /// Tag of the header table holding the long metric count (`hhea` or `vhea`).
    pub fn header_tag(self) -> Tag {
        match self {
            Self::Horizontal => Tag::new(b"hhea"),
            Self::Vertical => Tag::new(b"vhea"),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

/// Advance and side bearing of one glyph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metric {
    pub advance: u16,
    pub side_bearing: i16,
}

impl Metric {
    pub const fn new(advance: u16, side_bearing: i16) -> Self {
        Self { advance, side_bearing }
    }
}

/// Per-glyph metrics for one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsTable {
    direction: Direction,
    metrics: IndexMap<GlyphName, Metric>,
}

impl MetricsTable {
    pub fn new(direction: Direction) -> Self {
        Self { direction, metrics: IndexMap::new() }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn get(&self, glyph: &str) -> Option<Metric> {
        self.metrics.get(glyph).copied()
    }

    pub fn insert(&mut self, glyph: GlyphName, metric: Metric) -> Option<Metric> {
        self.metrics.insert(glyph, metric)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GlyphName, &Metric)> + '_ {
        self.metrics.iter()
    }

    /// Lay the metrics out in glyph order as `(long metrics, trailing bearings)`.
    ///
    /// Trailing glyphs that repeat the last advance are folded into the
    /// bearing-only array, the way hmtx/vmtx expect.
    pub(crate) fn compile(&self, order: &GlyphOrder) -> Result<(Vec<Metric>, Vec<i16>)> {
        let mut all = order
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| Error::MissingMetrics(name.clone(), self.direction()))
            })
            .collect::<Result<Vec<_>>>()?;

        let Some(last) = all.last().map(|m| m.advance) else {
            return Ok((all, Vec::new()));
        };
        let mut long_count = all.len();
        while long_count > 1 && all[long_count - 2].advance == last {
            long_count -= 1;
        }
        let bearings = all.split_off(long_count).iter().map(|m| m.side_bearing).collect();
        Ok((all, bearings))
    }
}
