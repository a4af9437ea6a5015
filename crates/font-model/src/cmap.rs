//! Unicode character map.

use std::collections::BTreeMap;

use crate::glyph_order::GlyphName;

/// Mapping from Unicode code point to glyph name, one glyph per code point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterMap(BTreeMap<u32, GlyphName>);

impl CharacterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code_point: u32) -> Option<&GlyphName> {
        self.0.get(&code_point)
    }

    /// Map `code_point` to `glyph`, returning the glyph it mapped to before.
    pub fn insert(&mut self, code_point: u32, glyph: GlyphName) -> Option<GlyphName> {
        self.0.insert(code_point, glyph)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mappings in ascending code point order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &GlyphName)> + '_ {
        self.0.iter().map(|(cp, name)| (*cp, name))
    }
}

impl FromIterator<(u32, GlyphName)> for CharacterMap {
    fn from_iter<T: IntoIterator<Item = (u32, GlyphName)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
