//! Watermark injection on synthetic fonts, checked through saved bytes.

use font_model::{
    Direction, Font, GlyphName, Lookup, Metric,
    test_fonts::{ITALIC_ANGLE, TestFont, UNDERLINE_POSITION, UNDERLINE_THICKNESS},
};
use font_watermark::{CCMP, Error, WatermarkOptions, inject};
use read_fonts::{
    FontRef, TableProvider,
    tables::gsub::{MultipleSubstFormat1, SubstitutionSubtables},
    types::{GlyphId16, Tag, Version16Dot16},
};

const DIGITS: [(u32, &str); 10] = [
    (0x30, "zero"),
    (0x31, "one"),
    (0x32, "two"),
    (0x33, "three"),
    (0x34, "four"),
    (0x35, "five"),
    (0x36, "six"),
    (0x37, "seven"),
    (0x38, "eight"),
    (0x39, "nine"),
];

fn font_with_version(version: &str) -> TestFont {
    let mut font = TestFont::new().mapped_glyph(0x20, "space", 260, 0);
    for (code_point, name) in DIGITS {
        font = font.mapped_glyph(code_point, name, 560, 45);
    }
    font.glyph_with_vertical("u1F1E6", Metric::new(1275, 12), Metric::new(1100, 80))
        .map(0x1F1E6, "u1F1E6")
        .version(version)
        .gsub(2, &[(b"ccmp", &[1]), (b"liga", &[0, 1])])
}

fn load(font: &TestFont) -> Font {
    Font::from_bytes(&font.build()).unwrap()
}

fn names(glyphs: &[GlyphName]) -> Vec<&str> {
    glyphs.iter().map(GlyphName::as_str).collect()
}

#[test]
fn sequence_spells_version() {
    let mut font = load(&font_with_version("Version 2.39"));
    let injection = inject(&mut font, &WatermarkOptions::default()).unwrap();

    assert_eq!(names(&injection.sequence), vec!["two", "space", "three", "nine"]);
    let Lookup::MultipleSubstitution(lookup) = &font.substitution_table().unwrap().lookups()[2]
    else {
        panic!("expected a multiple substitution lookup");
    };
    assert_eq!(lookup.len(), 1);
    assert_eq!(names(lookup.get("u10FF00").unwrap()), vec!["two", "space", "three", "nine"]);
}

#[test]
fn new_glyph_is_mapped_with_reference_metrics() {
    let mut font = load(&font_with_version("Version 1.0").vertical_metrics());
    let before = font.glyph_order().len();
    let injection = inject(&mut font, &WatermarkOptions::default()).unwrap();

    assert_eq!(injection.glyph_name, "u10FF00");
    assert_eq!(injection.glyph_id, GlyphId16::new(before as u16));
    assert_eq!(font.glyph_order().len(), before + 1);
    assert_eq!(font.character_map().get(0x10FF00), Some(&injection.glyph_name));
    assert_eq!(
        font.metrics(Direction::Horizontal).unwrap().get("u10FF00"),
        Some(Metric::new(1275, 12))
    );
    assert_eq!(
        font.metrics(Direction::Vertical).unwrap().get("u10FF00"),
        Some(Metric::new(1100, 80))
    );
}

#[test]
fn font_without_vertical_metrics_gets_horizontal_only() {
    let mut font = load(&font_with_version("Version 1.0"));
    inject(&mut font, &WatermarkOptions::default()).unwrap();

    assert!(font.metrics(Direction::Vertical).is_none());
    let saved = font.to_bytes().unwrap();
    let raw = FontRef::new(&saved).unwrap();
    assert!(raw.vmtx().is_err());
    assert_eq!(raw.hmtx().unwrap().advance(GlyphId16::new(13).into()), Some(1275));
}

#[test]
fn ccmp_gains_exactly_the_new_lookup() {
    let mut font = load(&font_with_version("Version 3.1"));
    let lookups_before = font.substitution_table().unwrap().lookup_count();
    let injection = inject(&mut font, &WatermarkOptions::default()).unwrap();

    let gsub = font.substitution_table().unwrap();
    assert_eq!(injection.lookup_index as usize, lookups_before);
    assert_eq!(gsub.lookup_count(), lookups_before + 1);
    assert_eq!(gsub.feature_lookup_indices(CCMP), Some(&[1u16, 2][..]));
    assert_eq!(gsub.feature_lookup_indices(Tag::new(b"liga")), Some(&[0u16, 1][..]));
}

#[test]
fn injecting_twice_appends_twice() {
    let mut font = load(&font_with_version("Version 2.5"));
    let first = inject(&mut font, &WatermarkOptions::default()).unwrap();
    let second = inject(&mut font, &WatermarkOptions::default()).unwrap();

    assert_eq!(first.glyph_name, "u10FF00");
    assert_eq!(second.glyph_name, "u10FF00#1");
    assert_eq!(second.glyph_id.to_u16(), first.glyph_id.to_u16() + 1);
    assert_eq!(font.character_map().get(0x10FF00), Some(&second.glyph_name));

    let gsub = font.substitution_table().unwrap();
    assert_eq!(gsub.lookup_count(), 4);
    assert_eq!(gsub.feature_lookup_indices(CCMP), Some(&[1u16, 2, 3][..]));
}

#[test]
fn invalid_version_leaves_font_untouched() {
    let mut font = load(&font_with_version("v2.0"));
    let glyphs = font.glyph_order().len();

    let result = inject(&mut font, &WatermarkOptions::default());
    assert!(matches!(result, Err(Error::VersionFormat(s)) if s == "v2.0"));
    assert_eq!(font.glyph_order().len(), glyphs);
    assert_eq!(font.substitution_table().unwrap().lookup_count(), 2);
    assert!(font.character_map().get(0x10FF00).is_none());
}

#[test]
fn unmapped_digit_is_reported() {
    let data = TestFont::new()
        .mapped_glyph(0x20, "space", 260, 0)
        .mapped_glyph(0x31, "one", 560, 45)
        .mapped_glyph(0x1F1E6, "u1F1E6", 1275, 0)
        .version("Version 1.7")
        .gsub(0, &[(b"ccmp", &[])])
        .build();
    let mut font = Font::from_bytes(&data).unwrap();

    let result = inject(&mut font, &WatermarkOptions::default());
    assert!(matches!(result, Err(Error::MissingGlyph { code_point: 0x37 })));
    assert_eq!(font.glyph_order().len(), 4);
}

#[test]
fn unmapped_reference_is_reported() {
    let data = TestFont::new()
        .mapped_glyph(0x20, "space", 260, 0)
        .mapped_glyph(0x31, "one", 560, 45)
        .version("Version 1.1")
        .gsub(0, &[(b"ccmp", &[])])
        .build();
    let mut font = Font::from_bytes(&data).unwrap();

    let result = inject(&mut font, &WatermarkOptions::default());
    assert!(matches!(result, Err(Error::MissingGlyph { code_point: 0x1F1E6 })));
}

#[test]
fn missing_ccmp_is_reported_before_any_edit() {
    let mut font = load(&font_with_version("Version 1.0").gsub(1, &[(b"liga", &[0])]));
    let glyphs = font.glyph_order().len();

    let result = inject(&mut font, &WatermarkOptions::default());
    assert!(matches!(result, Err(Error::FeatureNotFound(tag)) if tag == CCMP));
    assert_eq!(font.glyph_order().len(), glyphs);
    assert_eq!(font.substitution_table().unwrap().lookup_count(), 1);
}

#[test]
fn existing_mapping_is_overwritten() {
    let mut font = load(&font_with_version("Version 1.0").mapped_glyph(0x10FF00, "old", 100, 0));
    inject(&mut font, &WatermarkOptions::default()).unwrap();

    assert_eq!(font.character_map().get(0x10FF00).unwrap(), "u10FF00");
    assert!(font.glyph_order().contains("old"));
}

#[test]
fn custom_options_are_honoured() {
    let mut font = load(&font_with_version("Version 4.2"));
    let options = WatermarkOptions {
        reference_code_point: 0x30,
        new_code_point: 0xF0000,
        glyph_name: "version".to_owned(),
    };
    let injection = inject(&mut font, &options).unwrap();

    assert_eq!(injection.glyph_name, "version");
    assert_eq!(font.character_map().get(0xF0000).unwrap(), "version");
    assert_eq!(
        font.metrics(Direction::Horizontal).unwrap().get("version"),
        Some(Metric::new(560, 45))
    );
}

#[test]
fn saved_font_carries_the_substitution() {
    let mut font = load(&font_with_version("Version 2.39").vertical_metrics());
    let injection = inject(&mut font, &WatermarkOptions::default()).unwrap();
    let saved = font.to_bytes().unwrap();

    let raw = FontRef::new(&saved).unwrap();
    let new_gid = injection.glyph_id;
    assert_eq!(raw.maxp().unwrap().num_glyphs(), new_gid.to_u16() + 1);
    let cmap = raw.cmap().unwrap();
    assert_eq!(cmap.map_codepoint(0x10FF00u32), Some(new_gid.into()));
    assert_eq!(raw.post().unwrap().glyph_name(new_gid), Some("u10FF00"));

    let gsub = raw.gsub().unwrap();
    let lookups = gsub.lookup_list().unwrap();
    assert_eq!(lookups.lookup_count(), 3);
    let lookup = lookups.lookups().get(2).unwrap();
    let SubstitutionSubtables::Multiple(subtables) = lookup.subtables().unwrap() else {
        panic!("expected a multiple substitution lookup");
    };
    let subtable: MultipleSubstFormat1 = subtables.get(0).unwrap();
    let coverage: Vec<GlyphId16> = subtable.coverage().unwrap().iter().collect();
    assert_eq!(coverage, vec![new_gid]);
    let sequence = subtable.sequences().get(0).unwrap();
    let gids: Vec<u16> = sequence.substitute_glyph_ids().iter().map(|g| g.get().to_u16()).collect();
    // two, space, three, nine
    assert_eq!(gids, vec![4, 1, 5, 11]);

    let features = gsub.feature_list().unwrap();
    let ccmp = features
        .feature_records()
        .iter()
        .find(|record| record.feature_tag() == CCMP)
        .unwrap()
        .feature(features.offset_data())
        .unwrap();
    let indices: Vec<u16> = ccmp.lookup_list_indices().iter().map(|i| i.get()).collect();
    assert_eq!(indices, vec![1, 2]);
}

#[test]
fn post_header_survives_glyph_names_rewrite() {
    let mut font = load(&font_with_version("Version 1.0"));
    let injection = inject(&mut font, &WatermarkOptions::default()).unwrap();
    let saved = font.to_bytes().unwrap();

    let post = FontRef::new(&saved).unwrap().post().unwrap();
    assert_eq!(post.version(), Version16Dot16::VERSION_2_0);
    assert_eq!(post.italic_angle().to_f64(), ITALIC_ANGLE);
    assert_eq!(post.underline_position().to_i16(), UNDERLINE_POSITION);
    assert_eq!(post.underline_thickness().to_i16(), UNDERLINE_THICKNESS);
    assert_eq!(post.glyph_name(injection.glyph_id), Some("u10FF00"));
    assert_eq!(post.glyph_name(GlyphId16::new(4)), Some("two"));
}
