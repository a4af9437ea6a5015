//! Decoding binary fonts into the model.

use std::{collections::HashMap, rc::Rc};

use log::{debug, warn};
use read_fonts::{
    FileRef, FontRef, ReadError, TableProvider,
    tables::post::Post,
    types::{GlyphId16, Tag},
};
use skrifa::{MetadataProvider, string::StringId};
use write_fonts::from_obj::ToOwnedTable;

use crate::{
    Result,
    axes::{SharedAxisTable, VariationAxisTable},
    cmap::CharacterMap,
    collection::{Collection, FontFile},
    font::{Edits, Font, RawTable, Source},
    glyph_order::{GlyphName, GlyphOrder},
    gsub::SubstitutionTable,
    metrics::{Direction, Metric, MetricsTable},
};

const FVAR: Tag = Tag::new(b"fvar");

/// Tables already decoded from one file, keyed by their position in it.
///
/// Collection members whose directories point at the same bytes end up with
/// the same `Rc`, which is what makes sharing observable after loading.
#[derive(Default)]
struct TableCache {
    tables: HashMap<(u32, u32), Rc<[u8]>>,
    axes: HashMap<u32, SharedAxisTable>,
}

pub(crate) fn read_file(data: &[u8]) -> Result<FontFile> {
    let mut cache = TableCache::default();
    match FileRef::new(data)? {
        FileRef::Font(font) => Ok(FontFile::Single(read_font(&font, &mut cache)?)),
        FileRef::Collection(collection) => {
            let members = (0..collection.len())
                .map(|index| {
                    let font = collection.get(index)?;
                    debug!("reading collection member {index}");
                    read_font(&font, &mut cache)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(FontFile::Collection(Collection::new(members)))
        }
    }
}

fn read_font(font: &FontRef, cache: &mut TableCache) -> Result<Font> {
    let mut tables = Vec::new();
    let mut fvar_offset = None;
    for record in font.table_directory.table_records() {
        let tag = record.tag();
        let Some(data) = font.table_data(tag) else {
            warn!("data for '{tag}' is malformed");
            continue;
        };
        if tag == FVAR {
            fvar_offset = Some(record.offset());
        }
        let data = cache
            .tables
            .entry((record.offset(), record.length()))
            .or_insert_with(|| Rc::from(data.as_bytes()))
            .clone();
        tables.push(RawTable { tag, data });
    }

    let glyph_order = read_glyph_order(font)?;
    let character_map = read_character_map(font, &glyph_order);
    let horizontal_metrics = read_horizontal_metrics(font, &glyph_order)?;
    let vertical_metrics = read_vertical_metrics(font, &glyph_order)?;
    let substitution = match font.gsub() {
        Ok(gsub) => Some(SubstitutionTable::from_gsub(gsub.to_owned_table())),
        Err(ReadError::TableIsMissing(_)) => None,
        Err(e) => return Err(e.into()),
    };
    let axes = match (font.fvar(), fvar_offset) {
        (Ok(fvar), Some(offset)) => Some(
            cache
                .axes
                .entry(offset)
                .or_insert_with(|| VariationAxisTable::from_fvar(fvar.to_owned_table()).into_shared())
                .clone(),
        ),
        (Err(ReadError::TableIsMissing(_)), _) | (_, None) => None,
        (Err(e), _) => return Err(e.into()),
    };
    let version = font
        .localized_strings(StringId::VERSION_STRING)
        .english_or_first()
        .map(|s| s.to_string());
    let long_loca = font.head().map(|head| head.index_to_loc_format() == 1).unwrap_or(false);

    debug!(
        "loaded font with {} glyphs, {} mappings and {} tables",
        glyph_order.len(),
        character_map.len(),
        tables.len()
    );

    Ok(Font {
        source: Source {
            sfnt_version: font.table_directory.sfnt_version(),
            tables,
            glyph_count: glyph_order.len(),
            long_loca,
        },
        glyph_order,
        character_map,
        horizontal_metrics,
        vertical_metrics,
        substitution,
        axes,
        version,
        edits: Edits::default(),
    })
}

/// Glyph names from `post`, or `glyphNNNNN` where it has none.
///
/// Repeated names get a `#n` suffix so every glyph stays addressable.
fn read_glyph_order(font: &FontRef) -> Result<GlyphOrder> {
    let num_glyphs = font.maxp()?.num_glyphs();
    let post = font.post().ok();

    let mut order = GlyphOrder::new();
    for gid in 0..num_glyphs {
        let name = post
            .as_ref()
            .and_then(|post| glyph_name_from_post(post, gid))
            .unwrap_or_else(|| format!("glyph{gid:05}"));
        let name = if order.contains(&name) {
            let unique = order.unique_name(&name);
            debug!("glyph {gid} repeats the name '{name}', renamed to '{unique}'");
            unique
        } else {
            GlyphName::new(name)
        };
        order.push(name)?;
    }
    Ok(order)
}

fn glyph_name_from_post(post: &Post, gid: u16) -> Option<String> {
    post.glyph_name(GlyphId16::new(gid))
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
}

fn read_character_map(font: &FontRef, order: &GlyphOrder) -> CharacterMap {
    font.charmap()
        .mappings()
        .filter_map(|(code_point, gid)| {
            let name = u16::try_from(gid.to_u32())
                .ok()
                .and_then(|gid| order.get(GlyphId16::new(gid)));
            if name.is_none() {
                warn!("U+{code_point:04X} maps to glyph {gid}, which does not exist");
            }
            name.map(|name| (code_point, name.clone()))
        })
        .collect()
}

fn read_horizontal_metrics(font: &FontRef, order: &GlyphOrder) -> Result<Option<MetricsTable>> {
    let hmtx = match font.hmtx() {
        Ok(hmtx) => hmtx,
        Err(ReadError::TableIsMissing(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let long_metrics = hmtx.h_metrics().iter().map(|m| (m.advance.get(), m.side_bearing.get()));
    let bearings = hmtx.left_side_bearings().iter().map(|b| b.get());
    Ok(Some(collect_metrics(Direction::Horizontal, order, long_metrics, bearings)))
}

fn read_vertical_metrics(font: &FontRef, order: &GlyphOrder) -> Result<Option<MetricsTable>> {
    let vmtx = match font.vmtx() {
        Ok(vmtx) => vmtx,
        Err(ReadError::TableIsMissing(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let long_metrics = vmtx.v_metrics().iter().map(|m| (m.advance.get(), m.side_bearing.get()));
    let bearings = vmtx.top_side_bearings().iter().map(|b| b.get());
    Ok(Some(collect_metrics(Direction::Vertical, order, long_metrics, bearings)))
}

/// Expand long metrics plus trailing bearings to one metric per glyph.
fn collect_metrics(
    direction: Direction,
    order: &GlyphOrder,
    long_metrics: impl Iterator<Item = (u16, i16)>,
    bearings: impl Iterator<Item = i16>,
) -> MetricsTable {
    let long_metrics: Vec<_> = long_metrics.collect();
    let last_advance = long_metrics.last().map(|(advance, _)| *advance).unwrap_or(0);
    let mut bearings = bearings;
    let mut table = MetricsTable::new(direction);
    for (gid, name) in order.iter().enumerate() {
        let metric = match long_metrics.get(gid) {
            Some(&(advance, side_bearing)) => Metric::new(advance, side_bearing),
            None => Metric::new(last_advance, bearings.next().unwrap_or(0)),
        };
        table.insert(name.clone(), metric);
    }
    table
}
