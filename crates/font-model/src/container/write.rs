//! Encoding the model back into binary tables.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use log::{debug, warn};
use read_fonts::{FontData, FontRead, TopLevelTable, types::Tag};
use write_fonts::{
    FontWrite,
    from_obj::ToOwnedTable,
    tables::{
        cmap::{Cmap, CmapSubtable},
        hhea::Hhea,
        hmtx::{self, Hmtx},
        maxp::Maxp,
        post::Post,
        vhea::Vhea,
        vmtx::{self, Vmtx},
    },
    types::{GlyphId, Version16Dot16},
    validate::Validate,
};

use crate::{
    Error, Result,
    axes::VariationAxisTable,
    cmap::CharacterMap,
    font::{Font, RawTable},
    glyph_order::GlyphOrder,
    metrics::Metric,
};

const CMAP: Tag = Tag::new(b"cmap");
const FVAR: Tag = Tag::new(b"fvar");
const GSUB: Tag = Tag::new(b"GSUB");
const GVAR: Tag = Tag::new(b"gvar");
const HHEA: Tag = Tag::new(b"hhea");
const HMTX: Tag = Tag::new(b"hmtx");
const LOCA: Tag = Tag::new(b"loca");
const MAXP: Tag = Tag::new(b"maxp");
const POST: Tag = Tag::new(b"post");
const VHEA: Tag = Tag::new(b"vhea");
const VMTX: Tag = Tag::new(b"vmtx");

/// Tables holding per-glyph data this crate cannot extend.
const GLYPH_BOUND_TABLES: [Tag; 5] = [
    Tag::new(b"CFF "),
    Tag::new(b"CFF2"),
    Tag::new(b"sbix"),
    Tag::new(b"hdmx"),
    Tag::new(b"LTSH"),
];

const GVAR_HEADER_LEN: usize = 20;

/// A table ready to be placed in a file.
pub(crate) type CompiledTable = (Tag, Rc<[u8]>);

/// Tables compiled once per save and reused by every font that shares them.
#[derive(Default)]
pub(crate) struct CompileCache {
    axes: HashMap<*const RefCell<VariationAxisTable>, Rc<[u8]>>,
}

/// Produce the final table list of `font`.
///
/// Tables that were not edited, and are not affected by added glyphs, keep
/// their source allocation.
pub(crate) fn compile_font(font: &Font, cache: &mut CompileCache) -> Result<Vec<CompiledTable>> {
    let added = font.added_glyph_count();
    if added > 0 {
        if let Some(tag) = font.table_tags().find(|tag| GLYPH_BOUND_TABLES.contains(tag)) {
            return Err(Error::UnsupportedTable(tag));
        }
        debug!("extending glyph-indexed tables by {added} glyphs");
    }

    let order = &font.glyph_order;
    let horizontal = match &font.horizontal_metrics {
        Some(metrics) if added > 0 || font.edits.horizontal_metrics => Some(metrics.compile(order)?),
        _ => None,
    };
    let vertical = match &font.vertical_metrics {
        Some(metrics) if added > 0 || font.edits.vertical_metrics => Some(metrics.compile(order)?),
        _ => None,
    };

    let mut tables = Vec::with_capacity(font.source.tables.len());
    for RawTable { tag, data } in &font.source.tables {
        let compiled = match (*tag, &horizontal, &vertical) {
            (MAXP, ..) if added > 0 => Some(compile_maxp(data, order.len())?),
            (HHEA, Some((long, _)), _) => Some(compile_hhea(data, long.len())?),
            (HMTX, Some((long, bearings)), _) => Some(compile_hmtx(long, bearings)?),
            (VHEA, _, Some((long, _))) => Some(compile_vhea(data, long.len())?),
            (VMTX, _, Some((long, bearings))) => Some(compile_vmtx(long, bearings)?),
            (LOCA, ..) if added > 0 => {
                Some(extend_loca(data, font.source.glyph_count, added, font.source.long_loca)?)
            }
            (GVAR, ..) if added > 0 => Some(extend_gvar(data, added)?),
            (POST, ..) if added > 0 => compile_post(data, order)?,
            (CMAP, ..) if font.edits.character_map => {
                Some(compile_cmap(data, &font.character_map, order)?)
            }
            (GSUB, ..) if font.edits.substitution => match &font.substitution {
                Some(substitution) => Some(compile_table(&substitution.compile(order)?)?),
                None => None,
            },
            (FVAR, ..) => match &font.axes {
                Some(axes) if axes.borrow().is_modified() => {
                    let key = Rc::as_ptr(axes);
                    let compiled = match cache.axes.get(&key) {
                        Some(compiled) => compiled.clone(),
                        None => {
                            let compiled = compile_table(axes.borrow().fvar())?;
                            cache.axes.insert(key, compiled.clone());
                            compiled
                        }
                    };
                    Some(compiled)
                }
                _ => None,
            },
            _ => None,
        };
        if compiled.is_some() {
            debug!("re-encoded '{tag}'");
        }
        tables.push((*tag, compiled.unwrap_or_else(|| data.clone())));
    }
    Ok(tables)
}

fn compile_table<T>(table: &T) -> Result<Rc<[u8]>>
where
    T: FontWrite + Validate + TopLevelTable,
{
    write_fonts::dump_table(table)
        .map(Rc::from)
        .map_err(|e| Error::Compile { tag: T::TAG, message: e.to_string() })
}

fn compile_maxp(data: &[u8], num_glyphs: usize) -> Result<Rc<[u8]>> {
    let mut maxp: Maxp = read_fonts::tables::maxp::Maxp::read(FontData::new(data))?.to_owned_table();
    maxp.num_glyphs = num_glyphs as u16;
    compile_table(&maxp)
}

fn compile_hhea(data: &[u8], long_metric_count: usize) -> Result<Rc<[u8]>> {
    let mut hhea: Hhea = read_fonts::tables::hhea::Hhea::read(FontData::new(data))?.to_owned_table();
    hhea.number_of_h_metrics = long_metric_count as u16;
    compile_table(&hhea)
}

fn compile_vhea(data: &[u8], long_metric_count: usize) -> Result<Rc<[u8]>> {
    let mut vhea: Vhea = read_fonts::tables::vhea::Vhea::read(FontData::new(data))?.to_owned_table();
    vhea.number_of_long_ver_metrics = long_metric_count as u16;
    compile_table(&vhea)
}

fn compile_hmtx(long: &[Metric], bearings: &[i16]) -> Result<Rc<[u8]>> {
    let h_metrics = long
        .iter()
        .map(|m| hmtx::LongMetric { advance: m.advance, side_bearing: m.side_bearing })
        .collect();
    compile_table(&Hmtx::new(h_metrics, bearings.to_vec()))
}

fn compile_vmtx(long: &[Metric], bearings: &[i16]) -> Result<Rc<[u8]>> {
    let v_metrics = long
        .iter()
        .map(|m| vmtx::LongMetric { advance: m.advance, side_bearing: m.side_bearing })
        .collect();
    compile_table(&Vmtx { v_metrics, top_side_bearings: bearings.to_vec() })
}

/// Rebuild the Unicode subtables from `map`, keeping any format 14
/// (variation sequence) subtable of the source.
fn compile_cmap(source: &[u8], map: &CharacterMap, order: &GlyphOrder) -> Result<Rc<[u8]>> {
    let mut mappings = Vec::with_capacity(map.len());
    for (code_point, name) in map.iter() {
        let gid = order.position(name).ok_or_else(|| Error::UnknownGlyph(name.clone()))?;
        match char::from_u32(code_point) {
            Some(ch) => mappings.push((ch, GlyphId::new(gid.to_u16() as u32))),
            None => warn!("dropping mapping for U+{code_point:04X}, not a Unicode scalar value"),
        }
    }
    let mut cmap = Cmap::from_mappings(mappings).map_err(|e| Error::CmapConflict(e.to_string()))?;

    let source: Cmap = read_fonts::tables::cmap::Cmap::read(FontData::new(source))?.to_owned_table();
    cmap.encoding_records.extend(
        source
            .encoding_records
            .into_iter()
            .filter(|record| matches!(&*record.subtable, CmapSubtable::Format14(_))),
    );
    cmap.encoding_records.sort_by_key(|record| (record.platform_id as u16, record.encoding_id));
    compile_table(&cmap)
}

/// Version 2 names are rewritten for the whole glyph order; other versions
/// carry no names and are left alone.
fn compile_post(data: &[u8], order: &GlyphOrder) -> Result<Option<Rc<[u8]>>> {
    let source = read_fonts::tables::post::Post::read(FontData::new(data))?;
    if source.version() != Version16Dot16::VERSION_2_0 {
        return Ok(None);
    }
    let header: Post = source.to_owned_table();
    let mut post = Post::new_v2(order.iter().map(|name| name.as_str()));
    post.italic_angle = header.italic_angle;
    post.underline_position = header.underline_position;
    post.underline_thickness = header.underline_thickness;
    post.is_fixed_pitch = header.is_fixed_pitch;
    post.min_mem_type42 = header.min_mem_type42;
    post.max_mem_type42 = header.max_mem_type42;
    post.min_mem_type1 = header.min_mem_type1;
    post.max_mem_type1 = header.max_mem_type1;
    compile_table(&post).map(Some)
}

/// Append an empty outline for each added glyph by repeating the final offset.
fn extend_loca(data: &[u8], glyph_count: usize, added: usize, long: bool) -> Result<Rc<[u8]>> {
    let entry = if long { 4 } else { 2 };
    let end = (glyph_count + 1) * entry;
    let Some(last) = data.get(end - entry..end) else {
        return Err(Error::MalformedTable(LOCA));
    };
    let mut out = Vec::with_capacity(end + added * entry);
    out.extend_from_slice(&data[..end]);
    for _ in 0..added {
        out.extend_from_slice(last);
    }
    Ok(out.into())
}

/// Append empty variation data for each added glyph.
///
/// The offsets array grows by one entry per glyph, so the shared tuples and
/// the variation data array move back by the same amount.
fn extend_gvar(data: &[u8], added: usize) -> Result<Rc<[u8]>> {
    let font_data = FontData::new(data);
    let shared_tuples_offset: u32 = font_data.read_at(8)?;
    let glyph_count: u16 = font_data.read_at(12)?;
    let flags: u16 = font_data.read_at(14)?;
    let data_array_offset: u32 = font_data.read_at(16)?;

    let entry = if flags & 1 == 1 { 4 } else { 2 };
    let offsets_end = GVAR_HEADER_LEN + (glyph_count as usize + 1) * entry;
    let Some(last) = data.get(offsets_end - entry..offsets_end) else {
        return Err(Error::MalformedTable(GVAR));
    };
    let new_count = u16::try_from(glyph_count as usize + added)
        .map_err(|_| Error::TooManyGlyphs(glyph_count as usize + added))?;
    let shift = (added * entry) as u32;
    let shared_tuples_offset = if shared_tuples_offset as usize >= offsets_end {
        shared_tuples_offset + shift
    } else {
        shared_tuples_offset
    };

    let mut out = Vec::with_capacity(data.len() + shift as usize);
    out.extend_from_slice(&data[..8]);
    out.extend_from_slice(&shared_tuples_offset.to_be_bytes());
    out.extend_from_slice(&new_count.to_be_bytes());
    out.extend_from_slice(&flags.to_be_bytes());
    out.extend_from_slice(&(data_array_offset + shift).to_be_bytes());
    out.extend_from_slice(&data[GVAR_HEADER_LEN..offsets_end]);
    for _ in 0..added {
        out.extend_from_slice(last);
    }
    out.extend_from_slice(&data[offsets_end..]);
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_short_loca() {
        let loca = [0u8, 0, 0, 10, 0, 20];
        let extended = extend_loca(&loca, 2, 2, false).unwrap();
        assert_eq!(&*extended, &[0, 0, 0, 10, 0, 20, 0, 20, 0, 20]);
    }

    #[test]
    fn test_extend_loca_drops_padding() {
        let loca = [0u8, 0, 0, 0, 0, 0, 0, 8, 0xFF, 0xFF, 0xFF, 0xFF];
        let extended = extend_loca(&loca, 1, 1, true).unwrap();
        assert_eq!(&*extended, &[0, 0, 0, 0, 0, 0, 0, 8, 0, 0, 0, 8]);
    }

    #[test]
    fn test_extend_loca_rejects_truncated_table() {
        assert!(matches!(extend_loca(&[0, 0], 1, 1, false), Err(Error::MalformedTable(LOCA))));
    }

    fn gvar(glyph_count: u16, offsets: &[u16], shared_tuples: &[u8], variation_data: &[u8]) -> Vec<u8> {
        let offsets_end = GVAR_HEADER_LEN + offsets.len() * 2;
        let mut data = Vec::new();
        data.extend_from_slice(&[0, 1, 0, 0, 0, 1, 0, 1]);
        data.extend_from_slice(&(offsets_end as u32).to_be_bytes());
        data.extend_from_slice(&glyph_count.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&((offsets_end + shared_tuples.len()) as u32).to_be_bytes());
        for offset in offsets {
            data.extend_from_slice(&offset.to_be_bytes());
        }
        data.extend_from_slice(shared_tuples);
        data.extend_from_slice(variation_data);
        data
    }

    #[test]
    fn test_extend_gvar_shifts_trailing_data() {
        let source = gvar(2, &[0, 0, 2], &[0x40, 0x00], &[0xAB, 0xCD, 0xEF, 0x01]);
        let extended = extend_gvar(&source, 1).unwrap();
        let font_data = FontData::new(&extended);

        assert_eq!(font_data.read_at::<u16>(12).unwrap(), 3);
        assert_eq!(font_data.read_at::<u32>(8).unwrap(), 28);
        assert_eq!(font_data.read_at::<u32>(16).unwrap(), 30);
        assert_eq!(font_data.read_at::<u16>(26).unwrap(), 2);
        assert_eq!(&extended[28..30], &[0x40, 0x00]);
        assert_eq!(&extended[30..], &[0xAB, 0xCD, 0xEF, 0x01]);
    }
}
