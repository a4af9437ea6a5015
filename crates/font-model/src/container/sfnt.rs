//! Assembling compiled tables into font and collection files.

use std::collections::HashMap;

use read_fonts::{
    FontRef,
    tables::compute_checksum,
    types::{TT_SFNT_VERSION, Tag},
};
use write_fonts::FontBuilder;

use super::write::CompiledTable;
use crate::Result;

const HEAD: Tag = Tag::new(b"head");
const TTC_TAG: &[u8; 4] = b"ttcf";
const TTC_VERSION_1_0: u32 = 0x0001_0000;
const TABLE_DIRECTORY_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

/// A member of the file being written.
pub(crate) struct SfntTables {
    pub(crate) sfnt_version: u32,
    pub(crate) tables: Vec<CompiledTable>,
}

/// Write a single font.
///
/// `head.checkSumAdjustment` is the only field of `head` that is recomputed.
pub(crate) fn build_font(font: &SfntTables) -> Result<Vec<u8>> {
    let mut builder = FontBuilder::new();
    for (tag, data) in &font.tables {
        builder.add_raw(*tag, &data[..]);
    }
    let mut bytes = builder.build();
    if font.sfnt_version != TT_SFNT_VERSION {
        bytes[..4].copy_from_slice(&font.sfnt_version.to_be_bytes());
    }

    let field = FontRef::new(&bytes)?
        .table_directory
        .table_records()
        .iter()
        .find(|record| record.tag() == HEAD)
        .map(|record| record.offset() as usize + CHECKSUM_ADJUSTMENT_OFFSET)
        .filter(|field| field + 4 <= bytes.len());
    if let Some(field) = field {
        // the adjustment is computed over the file with the field zeroed
        bytes[field..field + 4].fill(0);
        let adjustment = CHECKSUM_MAGIC.wrapping_sub(compute_checksum(&bytes));
        bytes[field..field + 4].copy_from_slice(&adjustment.to_be_bytes());
    }
    Ok(bytes)
}

/// Write a `ttcf` version 1.0 collection.
///
/// A table is stored once per allocation: members that held the same table
/// on load (or the same compiled axis table) keep pointing at one copy, while
/// equal bytes from different allocations are stored separately.
pub(crate) fn build_collection(members: &[SfntTables]) -> Vec<u8> {
    let header_len = 12 + 4 * members.len();
    let directories_len: usize = members
        .iter()
        .map(|member| TABLE_DIRECTORY_HEADER_LEN + TABLE_RECORD_LEN * member.tables.len())
        .sum();

    let mut position = header_len + directories_len;
    let mut placed: HashMap<*const u8, u32> = HashMap::new();
    let mut blobs: Vec<&[u8]> = Vec::new();
    let mut directories = Vec::with_capacity(members.len());
    for member in members {
        let mut records: Vec<(Tag, &[u8], u32)> = Vec::with_capacity(member.tables.len());
        for (tag, data) in &member.tables {
            let key = data.as_ptr();
            let offset = *placed.entry(key).or_insert_with(|| {
                let offset = position as u32;
                position += round4(data.len());
                blobs.push(&data[..]);
                offset
            });
            records.push((*tag, &data[..], offset));
        }
        records.sort_by_key(|(tag, ..)| *tag);
        directories.push((member.sfnt_version, records));
    }

    let mut out = Vec::with_capacity(position);
    out.extend_from_slice(TTC_TAG);
    out.extend_from_slice(&TTC_VERSION_1_0.to_be_bytes());
    out.extend_from_slice(&(members.len() as u32).to_be_bytes());
    let mut directory_offset = header_len;
    for (_, records) in &directories {
        out.extend_from_slice(&(directory_offset as u32).to_be_bytes());
        directory_offset += TABLE_DIRECTORY_HEADER_LEN + TABLE_RECORD_LEN * records.len();
    }

    for (sfnt_version, records) in &directories {
        write_directory_header(&mut out, *sfnt_version, records.len());
        for (tag, data, offset) in records {
            out.extend_from_slice(&tag.to_be_bytes());
            out.extend_from_slice(&compute_checksum(data).to_be_bytes());
            out.extend_from_slice(&offset.to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        }
    }

    for blob in blobs {
        out.extend_from_slice(blob);
        out.resize(round4(out.len()), 0);
    }
    out
}

fn write_directory_header(out: &mut Vec<u8>, sfnt_version: u32, num_tables: usize) {
    let mut power = 1usize;
    let mut entry_selector = 0u16;
    while power * 2 <= num_tables {
        power *= 2;
        entry_selector += 1;
    }
    let search_range = power * TABLE_RECORD_LEN;
    let range_shift = (num_tables * TABLE_RECORD_LEN).saturating_sub(search_range);

    out.extend_from_slice(&sfnt_version.to_be_bytes());
    out.extend_from_slice(&(num_tables as u16).to_be_bytes());
    out.extend_from_slice(&(search_range as u16).to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&(range_shift as u16).to_be_bytes());
}

fn round4(len: usize) -> usize {
    (len + 3) & !3
}
