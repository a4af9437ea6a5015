//! Small synthetic fonts for tests.
//!
//! Fonts are compiled with write-fonts into real sfnt bytes so tests exercise
//! the same loading and saving paths as fonts from disk.

use std::{collections::HashMap, rc::Rc};

use read_fonts::{FontRef, types::Tag};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        fvar::{Fvar, VariationAxisRecord},
        glyf::{Bbox, GlyfLocaBuilder, Glyph, SimpleGlyph},
        gsub::{Gsub, SingleSubst, SubstitutionLookup, SubstitutionLookupList},
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{self, Hmtx},
        layout::{
            CoverageTable, Feature, FeatureList, FeatureRecord, LangSys, Lookup, LookupFlag,
            Script, ScriptList, ScriptRecord,
        },
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        post::Post,
        vhea::Vhea,
        vmtx::{self, Vmtx},
    },
    types::{
        FWord, Fixed, GlyphId, GlyphId16, LongDateTime, NameId, UfWord,
        Version16Dot16,
    },
};

use crate::{
    axes::VariationAxis,
    container::sfnt::{SfntTables, build_collection},
    metrics::Metric,
};

const UNITS_PER_EM: u16 = 1000;
const DEFAULT_VERTICAL: Metric = Metric::new(1000, 100);

/// `post` header values written into every test font.
pub const ITALIC_ANGLE: f64 = -12.0;
pub const UNDERLINE_POSITION: i16 = -100;
pub const UNDERLINE_THICKNESS: i16 = 50;

struct TestGlyph {
    name: String,
    horizontal: Metric,
    vertical: Metric,
}

/// Builder for a minimal TrueType font.
///
/// Every glyph is an empty outline. Glyph names are stored in a version 2
/// `post` table unless [`TestFont::without_glyph_names`] is used.
pub struct TestFont {
    glyphs: Vec<TestGlyph>,
    cmap: Vec<(u32, String)>,
    version: Option<String>,
    vertical: bool,
    gsub: Option<(u16, Vec<(Tag, Vec<u16>)>)>,
    axes: Vec<VariationAxis>,
    gvar: bool,
    glyph_names: bool,
}

impl Default for TestFont {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFont {
    /// A font holding only `.notdef`.
    pub fn new() -> Self {
        Self {
            glyphs: Vec::new(),
            cmap: Vec::new(),
            version: None,
            vertical: false,
            gsub: None,
            axes: Vec::new(),
            gvar: false,
            glyph_names: true,
        }
        .glyph(".notdef", 500, 0)
    }

    pub fn glyph(self, name: &str, advance: u16, side_bearing: i16) -> Self {
        self.glyph_with_vertical(name, Metric::new(advance, side_bearing), DEFAULT_VERTICAL)
    }

    pub fn glyph_with_vertical(mut self, name: &str, horizontal: Metric, vertical: Metric) -> Self {
        self.glyphs.push(TestGlyph { name: name.to_string(), horizontal, vertical });
        self
    }

    /// Add a glyph and map `code_point` to it.
    pub fn mapped_glyph(self, code_point: u32, name: &str, advance: u16, side_bearing: i16) -> Self {
        self.glyph(name, advance, side_bearing).map(code_point, name)
    }

    pub fn map(mut self, code_point: u32, name: &str) -> Self {
        self.cmap.push((code_point, name.to_string()));
        self
    }

    /// Set name ID 5.
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Emit `vhea` and `vmtx`.
    pub fn vertical_metrics(mut self) -> Self {
        self.vertical = true;
        self
    }

    /// Emit a GSUB with `lookup_count` placeholder lookups and the given
    /// features, all registered for the default script.
    pub fn gsub(mut self, lookup_count: u16, features: &[(&[u8; 4], &[u16])]) -> Self {
        let features =
            features.iter().map(|(tag, indices)| (Tag::new(tag), indices.to_vec())).collect();
        self.gsub = Some((lookup_count, features));
        self
    }

    pub fn axis(mut self, tag: &[u8; 4], min: f64, default: f64, max: f64) -> Self {
        self.axes.push(VariationAxis::new(Tag::new(tag), min, default, max));
        self
    }

    /// Emit a `gvar` with no variation data.
    pub fn with_gvar(mut self) -> Self {
        self.gvar = true;
        self
    }

    /// Emit a version 3 `post` table.
    pub fn without_glyph_names(mut self) -> Self {
        self.glyph_names = false;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let num_glyphs = self.glyphs.len() as u16;
        let gids: HashMap<&str, u16> =
            self.glyphs.iter().enumerate().map(|(gid, g)| (g.name.as_str(), gid as u16)).collect();

        let mut glyf_builder = GlyfLocaBuilder::new();
        for _ in &self.glyphs {
            let empty = SimpleGlyph {
                bbox: Bbox { x_min: 0, y_min: 0, x_max: 0, y_max: 0 },
                contours: vec![],
                instructions: vec![],
            };
            glyf_builder.add_glyph(&Glyph::Simple(empty)).unwrap();
        }
        let (glyf, loca, loca_format) = glyf_builder.build();

        let mappings = self.cmap.iter().map(|(code_point, name)| {
            (char::from_u32(*code_point).unwrap(), GlyphId::new(gids[name.as_str()] as u32))
        });
        let cmap = Cmap::from_mappings(mappings).unwrap();

        let head = Head {
            font_revision: Fixed::from_f64(1.0),
            checksum_adjustment: 0,
            magic_number: 0x5F0F3CF5,
            flags: Flags::empty(),
            units_per_em: UNITS_PER_EM,
            created: LongDateTime::new(1),
            modified: LongDateTime::new(2),
            x_min: 0,
            y_min: 0,
            x_max: 0,
            y_max: 0,
            mac_style: MacStyle::empty(),
            lowest_rec_ppem: 8,
            font_direction_hint: 2,
            index_to_loc_format: match loca_format {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            },
        };
        let hhea = Hhea {
            ascender: FWord::new(800),
            descender: FWord::new(-200),
            line_gap: FWord::new(0),
            advance_width_max: UfWord::new(
                self.glyphs.iter().map(|g| g.horizontal.advance).max().unwrap_or(0),
            ),
            min_left_side_bearing: FWord::new(0),
            min_right_side_bearing: FWord::new(0),
            x_max_extent: FWord::new(0),
            caret_slope_rise: 1,
            caret_slope_run: 0,
            caret_offset: 0,
            number_of_h_metrics: num_glyphs,
        };
        let hmtx = Hmtx::new(
            self.glyphs
                .iter()
                .map(|g| hmtx::LongMetric {
                    advance: g.horizontal.advance,
                    side_bearing: g.horizontal.side_bearing,
                })
                .collect(),
            vec![],
        );
        let maxp = Maxp {
            num_glyphs,
            max_points: Some(0),
            max_contours: Some(0),
            max_composite_points: Some(0),
            max_composite_contours: Some(0),
            max_zones: Some(1),
            max_twilight_points: Some(0),
            max_storage: Some(0),
            max_function_defs: Some(0),
            max_instruction_defs: Some(0),
            max_stack_elements: Some(0),
            max_size_of_instructions: Some(0),
            max_component_elements: Some(0),
            max_component_depth: Some(0),
        };
        let mut post = if self.glyph_names {
            Post::new_v2(self.glyphs.iter().map(|g| g.name.as_str()))
        } else {
            Post { version: Version16Dot16::VERSION_3_0, ..Default::default() }
        };
        post.italic_angle = Fixed::from_f64(ITALIC_ANGLE);
        post.underline_position = FWord::new(UNDERLINE_POSITION);
        post.underline_thickness = FWord::new(UNDERLINE_THICKNESS);

        let mut builder = FontBuilder::new();
        builder.add_table(&head).unwrap();
        builder.add_table(&hhea).unwrap();
        builder.add_table(&hmtx).unwrap();
        builder.add_table(&maxp).unwrap();
        builder.add_table(&cmap).unwrap();
        builder.add_table(&post).unwrap();
        builder.add_table(&glyf).unwrap();
        builder.add_table(&loca).unwrap();

        if let Some(version) = &self.version {
            let record = NameRecord::new(3, 1, 0x409, NameId::VERSION_STRING, version.clone().into());
            builder.add_table(&Name::new(vec![record])).unwrap();
        }

        if self.vertical {
            let vhea = Vhea { number_of_long_ver_metrics: num_glyphs, ..Default::default() };
            let vmtx = Vmtx {
                v_metrics: self
                    .glyphs
                    .iter()
                    .map(|g| vmtx::LongMetric {
                        advance: g.vertical.advance,
                        side_bearing: g.vertical.side_bearing,
                    })
                    .collect(),
                top_side_bearings: vec![],
            };
            builder.add_table(&vhea).unwrap();
            builder.add_table(&vmtx).unwrap();
        }

        if let Some((lookup_count, features)) = &self.gsub {
            builder.add_table(&build_gsub(*lookup_count, features)).unwrap();
        }

        if !self.axes.is_empty() {
            builder.add_table(&build_fvar(&self.axes)).unwrap();
            if self.gvar {
                builder.add_raw(Tag::new(b"gvar"), build_gvar(self.axes.len() as u16, num_glyphs));
            }
        }

        builder.build()
    }
}

fn build_gsub(lookup_count: u16, features: &[(Tag, Vec<u16>)]) -> Gsub {
    let lookups = (0..lookup_count)
        .map(|_| {
            let subtable = SingleSubst::format_2(
                CoverageTable::format_1(vec![GlyphId16::NOTDEF]),
                vec![GlyphId16::NOTDEF],
            );
            SubstitutionLookup::Single(Lookup::new(LookupFlag::empty(), vec![subtable]))
        })
        .collect();
    let feature_records = features
        .iter()
        .map(|(tag, indices)| FeatureRecord::new(*tag, Feature::new(None, indices.clone())))
        .collect();
    let lang_sys = LangSys::new((0..features.len() as u16).collect());
    let script = Script::new(Some(lang_sys), vec![]);
    Gsub::new(
        ScriptList::new(vec![ScriptRecord::new(Tag::new(b"DFLT"), script)]),
        FeatureList::new(feature_records),
        SubstitutionLookupList::new(lookups),
    )
}

fn build_fvar(axes: &[VariationAxis]) -> Fvar {
    let mut fvar = Fvar::default();
    for (index, axis) in axes.iter().enumerate() {
        fvar.axis_instance_arrays.axes.push(VariationAxisRecord {
            axis_tag: axis.tag,
            min_value: Fixed::from_f64(axis.min_value),
            default_value: Fixed::from_f64(axis.default_value),
            max_value: Fixed::from_f64(axis.max_value),
            axis_name_id: NameId::new(256 + index as u16),
            ..Default::default()
        });
    }
    fvar
}

/// A version 1.0 `gvar` with short offsets and no data for any glyph.
fn build_gvar(axis_count: u16, glyph_count: u16) -> Vec<u8> {
    let offsets_end = 20 + (glyph_count as u32 + 1) * 2;
    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_be_bytes());
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(&axis_count.to_be_bytes());
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(&offsets_end.to_be_bytes());
    data.extend_from_slice(&glyph_count.to_be_bytes());
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(&offsets_end.to_be_bytes());
    data.resize(offsets_end as usize, 0);
    data
}

/// Pack `members` into a collection.
///
/// Tables tagged in `shared` are stored once and referenced by every member,
/// the way collection build tools share identical tables.
pub fn collection(members: &[Vec<u8>], shared: &[Tag]) -> Vec<u8> {
    let mut first_seen: HashMap<Tag, Rc<[u8]>> = HashMap::new();
    let members: Vec<SfntTables> = members
        .iter()
        .map(|data| {
            let font = FontRef::new(data).unwrap();
            let tables = font
                .table_directory
                .table_records()
                .iter()
                .map(|record| {
                    let tag = record.tag();
                    let bytes: Rc<[u8]> = Rc::from(font.table_data(tag).unwrap().as_bytes());
                    let bytes = if shared.contains(&tag) {
                        first_seen.entry(tag).or_insert(bytes).clone()
                    } else {
                        bytes
                    };
                    (tag, bytes)
                })
                .collect();
            SfntTables { sfnt_version: font.table_directory.sfnt_version(), tables }
        })
        .collect();
    build_collection(&members)
}
