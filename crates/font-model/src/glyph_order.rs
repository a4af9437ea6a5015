//! Glyph names and the canonical glyph order of a font.
//!
//! Glyph identifiers are names rather than numeric ids so that tables can
//! refer to glyphs independent of where they sit in the order. The numeric
//! id of a glyph is its position in [`GlyphOrder`], resolved only when a
//! table is compiled.

use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::{Display, Formatter, Result as FmtResult},
    ops::Deref,
};

use read_fonts::types::GlyphId16;

use crate::{Error, Result};

/// Largest number of glyphs an sfnt can address (`maxp.numGlyphs` is a u16).
pub const MAX_GLYPHS: usize = u16::MAX as usize;

/// A glyph identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphName(String);

impl GlyphName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for GlyphName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GlyphName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GlyphName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for GlyphName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GlyphName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for GlyphName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for GlyphName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GlyphName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Ordered, duplicate-free sequence of glyph names.
///
/// Glyphs can only be appended; existing positions never move, so numeric
/// glyph ids held by tables that are not re-encoded stay valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphOrder {
    names: Vec<GlyphName>,
    positions: HashMap<GlyphName, u16>,
}

impl GlyphOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an order from names, failing on the first duplicate.
    pub fn from_names<I, N>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<GlyphName>,
    {
        let mut order = Self::new();
        for name in names {
            order.push(name.into())?;
        }
        Ok(order)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// The glyph id of `name`, if present.
    pub fn position(&self, name: &str) -> Option<GlyphId16> {
        self.positions.get(name).copied().map(GlyphId16::new)
    }

    pub fn get(&self, gid: GlyphId16) -> Option<&GlyphName> {
        self.names.get(gid.to_u16() as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlyphName> + '_ {
        self.names.iter()
    }

    /// Number of glyphs that can still be appended.
    pub fn remaining_capacity(&self) -> usize {
        MAX_GLYPHS - self.names.len()
    }

    /// Append a glyph and return its id.
    pub fn push(&mut self, name: GlyphName) -> Result<GlyphId16> {
        if self.positions.contains_key(&name) {
            return Err(Error::DuplicateGlyph(name));
        }
        if self.remaining_capacity() == 0 {
            return Err(Error::TooManyGlyphs(self.names.len()));
        }
        let gid = self.names.len() as u16;
        self.positions.insert(name.clone(), gid);
        self.names.push(name);
        Ok(GlyphId16::new(gid))
    }

    /// First name of `base`, `base#1`, `base#2`, ... not yet in the order.
    pub fn unique_name(&self, base: &str) -> GlyphName {
        if !self.contains(base) {
            return GlyphName::new(base);
        }
        (1..)
            .map(|n| format!("{base}#{n}"))
            .find(|candidate| !self.contains(candidate))
            .map(GlyphName::new)
            .unwrap_or_else(|| GlyphName::new(base))
    }
}

impl<'a> IntoIterator for &'a GlyphOrder {
    type Item = &'a GlyphName;
    type IntoIter = std::slice::Iter<'a, GlyphName>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
