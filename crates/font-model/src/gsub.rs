//! Glyph substitution (GSUB) lookups and features.

use indexmap::IndexMap;
use read_fonts::types::{GlyphId16, Tag};
use write_fonts::{
    OffsetMarker,
    tables::{
        gsub::{
            Gsub, MultipleSubstFormat1, Sequence, SubstitutionLookup, SubstitutionLookupList,
        },
        layout::{CoverageTable, Feature, FeatureList, FeatureRecord, Lookup as LayoutLookup,
            LookupFlag, ScriptList},
    },
};

use crate::{Error, Result, glyph_order::GlyphName, glyph_order::GlyphOrder};

/// One entry of the lookup list.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// A lookup carried over from the source font, addressed by glyph id.
    Compiled(SubstitutionLookup),
    /// A multiple substitution addressed by glyph name.
    MultipleSubstitution(MultipleSubstitutionLookup),
}

/// Maps one glyph to an ordered sequence of replacement glyphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipleSubstitutionLookup {
    mapping: IndexMap<GlyphName, Vec<GlyphName>>,
}

impl MultipleSubstitutionLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lookup with a single `glyph -> sequence` rule.
    pub fn single(glyph: GlyphName, sequence: Vec<GlyphName>) -> Self {
        let mut lookup = Self::new();
        lookup.insert(glyph, sequence);
        lookup
    }

    pub fn insert(&mut self, glyph: GlyphName, sequence: Vec<GlyphName>) -> Option<Vec<GlyphName>> {
        self.mapping.insert(glyph, sequence)
    }

    pub fn get(&self, glyph: &str) -> Option<&[GlyphName]> {
        self.mapping.get(glyph).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    fn compile(&self, order: &GlyphOrder) -> Result<SubstitutionLookup> {
        let resolve = |name: &GlyphName| {
            order.position(name).ok_or_else(|| Error::UnknownGlyph(name.clone()))
        };

        // Coverage must be sorted by glyph id, sequences follow coverage order.
        let mut rules = self
            .mapping
            .iter()
            .map(|(glyph, sequence)| {
                let substitutes = sequence.iter().map(resolve).collect::<Result<Vec<_>>>()?;
                Ok((resolve(glyph)?, substitutes))
            })
            .collect::<Result<Vec<(GlyphId16, Vec<GlyphId16>)>>>()?;
        rules.sort_by_key(|(gid, _)| *gid);

        let coverage = CoverageTable::format_1(rules.iter().map(|(gid, _)| *gid).collect());
        let sequences = rules.into_iter().map(|(_, substitutes)| Sequence::new(substitutes)).collect();
        let subtable = MultipleSubstFormat1::new(coverage, sequences);
        Ok(SubstitutionLookup::Multiple(LayoutLookup::new(LookupFlag::empty(), vec![subtable])))
    }
}

/// The lookup list and feature list of a GSUB table.
///
/// Lookups are referenced by position, so the list is append-only: existing
/// lookups are never reordered or removed. Script list and feature
/// variations travel through unchanged.
#[derive(Debug, Clone)]
pub struct SubstitutionTable {
    lookups: Vec<Lookup>,
    // lookup list is always empty here; `lookups` is the source of truth
    header: Gsub,
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SubstitutionTable {
    /// An empty table with no scripts, features or lookups.
    pub fn new() -> Self {
        Self {
            lookups: Vec::new(),
            header: Gsub::new(
                ScriptList::new(Vec::new()),
                FeatureList::new(Vec::new()),
                SubstitutionLookupList::new(Vec::new()),
            ),
        }
    }

    pub(crate) fn from_gsub(mut gsub: Gsub) -> Self {
        let lookups = std::mem::take(&mut gsub.lookup_list.lookups)
            .into_iter()
            .map(|lookup| Lookup::Compiled((*lookup).clone()))
            .collect();
        Self { lookups, header: gsub }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.len()
    }

    pub fn lookups(&self) -> &[Lookup] {
        &self.lookups
    }

    /// Append a lookup and return its index.
    pub fn push_lookup(&mut self, lookup: Lookup) -> Result<u16> {
        if self.lookups.len() >= u16::MAX as usize {
            return Err(Error::TooManyLookups(self.lookups.len()));
        }
        self.lookups.push(lookup);
        Ok((self.lookups.len() - 1) as u16)
    }

    /// Feature tags in feature list order; a tag may repeat.
    pub fn feature_tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.header.feature_list.feature_records.iter().map(|record| record.feature_tag)
    }

    /// Lookup indices of the first feature record tagged `tag`.
    pub fn feature_lookup_indices(&self, tag: Tag) -> Option<&[u16]> {
        self.header
            .feature_list
            .feature_records
            .iter()
            .find(|record| record.feature_tag == tag)
            .map(|record| record.feature.lookup_list_indices.as_slice())
    }

    pub fn feature_lookup_indices_mut(&mut self, tag: Tag) -> Option<&mut Vec<u16>> {
        self.header
            .feature_list
            .feature_records
            .iter_mut()
            .find(|record| record.feature_tag == tag)
            .map(|record| &mut record.feature.lookup_list_indices)
    }

    /// Append a feature record. Script language systems are not updated.
    pub fn add_feature(&mut self, tag: Tag, lookup_indices: Vec<u16>) {
        self.header
            .feature_list
            .feature_records
            .push(FeatureRecord::new(tag, Feature::new(None, lookup_indices)));
    }

    pub(crate) fn compile(&self, order: &GlyphOrder) -> Result<Gsub> {
        let lookups = self
            .lookups
            .iter()
            .map(|lookup| match lookup {
                Lookup::Compiled(compiled) => Ok(compiled.clone()),
                Lookup::MultipleSubstitution(multiple) => multiple.compile(order),
            })
            .collect::<Result<Vec<_>>>()?;

        let mut gsub = self.header.clone();
        gsub.lookup_list = OffsetMarker::new(SubstitutionLookupList::new(lookups));
        Ok(gsub)
    }
}
