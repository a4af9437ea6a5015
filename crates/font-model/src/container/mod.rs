//! Loading fonts from, and saving them to, sfnt and collection files.

mod read;
pub(crate) mod sfnt;
mod write;

use std::{fs, path::Path};

use log::info;

use crate::{
    Error, Result,
    collection::FontFile,
    font::Font,
};

use self::{
    sfnt::SfntTables,
    write::{CompileCache, compile_font},
};

/// Read a font or collection file.
pub fn open(path: impl AsRef<Path>) -> Result<FontFile> {
    let path = path.as_ref();
    let data =
        fs::read(path).map_err(|source| Error::ReadFile { path: path.to_path_buf(), source })?;
    let file = FontFile::from_bytes(&data)?;
    info!("Loaded {} font(s) from {}", file.fonts().len(), path.display());
    Ok(file)
}

/// Write `file` to `path`.
///
/// Nothing is written unless the whole file could be encoded.
pub fn save(file: &FontFile, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let data = file.to_bytes()?;
    fs::write(path, &data)
        .map_err(|source| Error::WriteFile { path: path.to_path_buf(), source })?;
    info!("Saved {} ({} bytes)", path.display(), data.len());
    Ok(())
}

impl FontFile {
    /// Parse a single font or a `ttcf` collection, detected from the data.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        read::read_file(data)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Single(font) => font.to_bytes(),
            Self::Collection(collection) => {
                let mut cache = CompileCache::default();
                let members = collection
                    .members()
                    .iter()
                    .map(|font| sfnt_tables(font, &mut cache))
                    .collect::<Result<Vec<_>>>()?;
                Ok(sfnt::build_collection(&members))
            }
        }
    }
}

impl Font {
    /// Parse a single font; collections are rejected.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        FontFile::from_bytes(data)?.into_single()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        sfnt::build_font(&sfnt_tables(self, &mut CompileCache::default())?)
    }
}

fn sfnt_tables(font: &Font, cache: &mut CompileCache) -> Result<SfntTables> {
    Ok(SfntTables { sfnt_version: font.sfnt_version(), tables: compile_font(font, cache)? })
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use read_fonts::{
        FontRef, TableProvider,
        tables::compute_checksum,
        types::{GlyphId16, Tag},
    };
    use write_fonts::FontBuilder;

    use super::*;
    use crate::{
        Direction, GlyphName, Lookup, Metric, MultipleSubstitutionLookup, test_fonts::TestFont,
        test_fonts::collection,
    };

    const CCMP: Tag = Tag::new(b"ccmp");
    const WGHT: Tag = Tag::new(b"wght");
    const FVAR: Tag = Tag::new(b"fvar");

    fn digits_font() -> TestFont {
        TestFont::new()
            .mapped_glyph(0x20, "space", 250, 0)
            .mapped_glyph(0x31, "one", 550, 40)
            .mapped_glyph(0x32, "two", 560, 30)
            .mapped_glyph(0x1F1E6, "u1F1E6", 1275, 0)
            .version("Version 2.1; ttfautohint")
            .gsub(1, &[(b"ccmp", &[0]), (b"liga", &[0])])
    }

    #[test]
    fn test_load_decodes_tables() {
        let font = Font::from_bytes(&digits_font().build()).unwrap();

        let names: Vec<&str> = font.glyph_order().iter().map(GlyphName::as_str).collect();
        assert_eq!(names, vec![".notdef", "space", "one", "two", "u1F1E6"]);
        assert_eq!(font.character_map().get(0x32), Some(&GlyphName::new("two")));
        assert_eq!(font.character_map().len(), 4);
        assert_eq!(
            font.metrics(Direction::Horizontal).unwrap().get("one"),
            Some(Metric::new(550, 40))
        );
        assert!(font.metrics(Direction::Vertical).is_none());
        assert_eq!(font.version_string(), Some("Version 2.1; ttfautohint"));

        let gsub = font.substitution_table().unwrap();
        assert_eq!(gsub.lookup_count(), 1);
        assert_eq!(gsub.feature_lookup_indices(CCMP), Some(&[0u16][..]));
        assert!(font.variation_axes().is_none());
    }

    #[test]
    fn test_missing_post_names_are_synthesised() {
        let data = TestFont::new().glyph("a", 500, 0).without_glyph_names().build();
        let font = Font::from_bytes(&data).unwrap();
        let names: Vec<&str> = font.glyph_order().iter().map(GlyphName::as_str).collect();
        assert_eq!(names, vec!["glyph00000", "glyph00001"]);
    }

    #[test]
    fn test_unedited_font_keeps_table_bytes() {
        let data = digits_font().vertical_metrics().build();
        let font = Font::from_bytes(&data).unwrap();
        let saved = font.to_bytes().unwrap();

        let before = FontRef::new(&data).unwrap();
        let after = FontRef::new(&saved).unwrap();
        for record in before.table_directory.table_records() {
            let tag = record.tag();
            if tag == Tag::new(b"head") {
                continue;
            }
            assert_eq!(
                before.table_data(tag).unwrap().as_bytes(),
                after.table_data(tag).unwrap().as_bytes(),
                "'{tag}' changed"
            );
        }
        assert_eq!(after.head().unwrap().modified(), before.head().unwrap().modified());
        assert_eq!(compute_checksum(&saved), 0xB1B0_AFBA);
    }

    #[test]
    fn test_added_glyph_round_trip() {
        let data = digits_font().vertical_metrics().axis(b"wght", 100.0, 400.0, 900.0).with_gvar().build();
        let mut font = Font::from_bytes(&data).unwrap();

        let name = GlyphName::new("u10FF00");
        font.glyph_order_mut().push(name.clone()).unwrap();
        font.character_map_mut().insert(0x10FF00, name.clone());
        font.metrics_mut(Direction::Horizontal).unwrap().insert(name.clone(), Metric::new(1275, 0));
        font.metrics_mut(Direction::Vertical).unwrap().insert(name.clone(), Metric::new(1000, 50));
        assert_eq!(font.added_glyph_count(), 1);

        let saved = font.to_bytes().unwrap();
        let reloaded = Font::from_bytes(&saved).unwrap();
        assert_eq!(reloaded.glyph_order().len(), 6);
        assert_eq!(reloaded.glyph_order().position("u10FF00"), Some(GlyphId16::new(5)));
        assert_eq!(reloaded.character_map().get(0x10FF00), Some(&name));
        assert_eq!(reloaded.character_map().get(0x31), Some(&GlyphName::new("one")));
        assert_eq!(
            reloaded.metrics(Direction::Horizontal).unwrap().get("u10FF00"),
            Some(Metric::new(1275, 0))
        );
        assert_eq!(
            reloaded.metrics(Direction::Vertical).unwrap().get("u10FF00"),
            Some(Metric::new(1000, 50))
        );

        let raw = FontRef::new(&saved).unwrap();
        assert_eq!(raw.maxp().unwrap().num_glyphs(), 6);
        let loca_entry = if raw.head().unwrap().index_to_loc_format() == 1 { 4 } else { 2 };
        assert_eq!(raw.table_data(Tag::new(b"loca")).unwrap().len(), 7 * loca_entry);
        let gvar = raw.table_data(Tag::new(b"gvar")).unwrap();
        assert_eq!(gvar.read_at::<u16>(12).unwrap(), 6);
    }

    #[test]
    fn test_appended_lookup_round_trip() {
        let mut font = Font::from_bytes(&digits_font().build()).unwrap();
        let gsub = font.substitution_table_mut().unwrap();
        let lookup = MultipleSubstitutionLookup::single(
            GlyphName::new("u1F1E6"),
            vec![GlyphName::new("two"), GlyphName::new("space"), GlyphName::new("one")],
        );
        let index = gsub.push_lookup(Lookup::MultipleSubstitution(lookup)).unwrap();
        gsub.feature_lookup_indices_mut(CCMP).unwrap().push(index);

        let reloaded = Font::from_bytes(&font.to_bytes().unwrap()).unwrap();
        let gsub = reloaded.substitution_table().unwrap();
        assert_eq!(gsub.lookup_count(), 2);
        assert_eq!(gsub.feature_lookup_indices(CCMP), Some(&[0u16, 1][..]));
        assert_eq!(gsub.feature_lookup_indices(Tag::new(b"liga")), Some(&[0u16][..]));
    }

    #[test]
    fn test_glyph_growth_rejects_unsupported_tables() {
        let data = digits_font().build();
        let source = FontRef::new(&data).unwrap();
        let mut builder = FontBuilder::new();
        builder.copy_missing_tables(source);
        builder.add_raw(Tag::new(b"hdmx"), vec![0u8; 8]);
        let data = builder.build();

        let mut font = Font::from_bytes(&data).unwrap();
        font.glyph_order_mut().push(GlyphName::new("extra")).unwrap();
        assert!(matches!(font.to_bytes(), Err(Error::UnsupportedTable(tag)) if tag == Tag::new(b"hdmx")));
    }

    #[test]
    fn test_missing_metrics_fail_save() {
        let mut font = Font::from_bytes(&digits_font().build()).unwrap();
        font.glyph_order_mut().push(GlyphName::new("extra")).unwrap();
        assert!(matches!(font.to_bytes(), Err(Error::MissingMetrics(_, Direction::Horizontal))));
    }

    fn variable_member(wdth_default: f64) -> Vec<u8> {
        digits_font()
            .axis(b"wght", 100.0, 700.0, 900.0)
            .axis(b"wdth", 62.5, wdth_default, 100.0)
            .build()
    }

    #[test]
    fn test_collection_shares_axes() {
        let data = collection(&[variable_member(100.0), variable_member(100.0)], &[FVAR]);
        let mut file = FontFile::from_bytes(&data).unwrap();
        let FontFile::Collection(fonts) = &mut file else {
            panic!("expected a collection");
        };
        assert_eq!(fonts.len(), 2);
        assert!(fonts.axes_shared(0, 1));
        assert_eq!(fonts.shared_axis_groups(), vec![vec![0, 1]]);

        let axes = Rc::clone(fonts.members()[0].variation_axes().unwrap());
        axes.borrow_mut().set_default_value(WGHT, 400.0);
        assert_eq!(
            fonts.members()[1].variation_axes().unwrap().borrow().default_value(WGHT),
            Some(400.0)
        );

        let saved = file.to_bytes().unwrap();
        let reloaded = FontFile::from_bytes(&saved).unwrap();
        let FontFile::Collection(reloaded) = reloaded else {
            panic!("expected a collection");
        };
        assert!(reloaded.axes_shared(0, 1));
        let wght = reloaded.members()[1].variation_axes().unwrap().borrow().default_value(WGHT);
        assert_eq!(wght, Some(400.0));
    }

    #[test]
    fn test_collection_without_shared_axes() {
        let data = collection(&[variable_member(100.0), variable_member(87.5)], &[]);
        let file = FontFile::from_bytes(&data).unwrap();
        let FontFile::Collection(fonts) = &file else {
            panic!("expected a collection");
        };
        assert!(!fonts.axes_shared(0, 1));
        assert!(fonts.shared_axis_groups().is_empty());
        assert!(matches!(file.clone().into_single(), Err(Error::ExpectedSingleFont(2))));
    }

    #[test]
    fn test_variable_font_default_round_trip() {
        let mut font = Font::from_bytes(font_test_data::VAZIRMATN_VAR).unwrap();
        let axes = Rc::clone(font.variation_axes().unwrap());
        let wght = axes.borrow().axis(WGHT).unwrap();
        assert_eq!((wght.min_value, wght.max_value), (100.0, 900.0));

        axes.borrow_mut().set_default_value(WGHT, 700.0);
        font = Font::from_bytes(&font.to_bytes().unwrap()).unwrap();
        let reloaded = font.variation_axes().unwrap().borrow();
        assert_eq!(reloaded.default_value(WGHT), Some(700.0));
    }
}
