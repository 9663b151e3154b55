//! WOFF 1.0 wrapping of a TrueType font (zlib-compressed tables).

use std::io::Write;

use anyhow::{Context, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use read_fonts::FontRef;

const WOFF_SIGNATURE: u32 = 0x774F_4646;
const WOFF_HEADER_LEN: usize = 44;
const WOFF_DIRECTORY_ENTRY_LEN: usize = 20;
pub(super) const SFNT_HEADER_LEN: usize = 12;
pub(super) const SFNT_DIRECTORY_ENTRY_LEN: usize = 16;

/// One table of an sfnt file, in directory order.
#[derive(Debug, Clone)]
pub(super) struct SfntTable<'a> {
    pub tag: [u8; 4],
    pub data: &'a [u8],
}

impl SfntTable<'_> {
    pub fn checksum(&self) -> u32 {
        checksum(self.data)
    }
}

/// Split a TrueType file into its tables, returning the sfnt version too.
pub(super) fn sfnt_tables(ttf: &[u8]) -> Result<(u32, Vec<SfntTable<'_>>)> {
    let font = FontRef::new(ttf).context("reading generated TrueType data")?;
    let flavor = font.table_directory.sfnt_version();
    let tables = font
        .table_directory
        .table_records()
        .iter()
        .filter_map(|record| {
            let tag = record.tag();
            font.table_data(tag).map(|data| SfntTable {
                tag: tag.to_be_bytes(),
                data: data.as_bytes(),
            })
        })
        .collect();
    Ok((flavor, tables))
}

/// Sum of big-endian u32 words, the final partial word zero-padded.
pub(super) fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

pub(super) fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

pub(super) fn write_u16(writer: &mut Vec<u8>, value: u16) {
    writer.extend_from_slice(&value.to_be_bytes());
}

pub(super) fn write_u32(writer: &mut Vec<u8>, value: u32) {
    writer.extend_from_slice(&value.to_be_bytes());
}

/// Convert `ttf` to WOFF. Tables that do not shrink are stored uncompressed.
pub fn ttf_to_woff(ttf: &[u8]) -> Result<Vec<u8>> {
    let (flavor, tables) = sfnt_tables(ttf)?;

    let mut payloads = Vec::with_capacity(tables.len());
    for table in &tables {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(table.data)?;
        let compressed = encoder.finish()?;
        if compressed.len() < table.data.len() {
            payloads.push(compressed);
        } else {
            payloads.push(table.data.to_vec());
        }
    }

    let total_sfnt_size = SFNT_HEADER_LEN
        + SFNT_DIRECTORY_ENTRY_LEN * tables.len()
        + tables.iter().map(|t| padded_len(t.data.len())).sum::<usize>();
    let data_start = WOFF_HEADER_LEN + WOFF_DIRECTORY_ENTRY_LEN * tables.len();
    let mut offsets = Vec::with_capacity(tables.len());
    let mut cursor = data_start;
    for payload in &payloads {
        offsets.push(cursor);
        cursor += padded_len(payload.len());
    }
    let file_len = cursor;

    let mut out = Vec::with_capacity(file_len);
    write_u32(&mut out, WOFF_SIGNATURE);
    write_u32(&mut out, flavor);
    write_u32(&mut out, u32::try_from(file_len)?);
    write_u16(&mut out, u16::try_from(tables.len())?);
    write_u16(&mut out, 0); // reserved
    write_u32(&mut out, u32::try_from(total_sfnt_size)?);
    write_u16(&mut out, 1); // major version
    write_u16(&mut out, 0); // minor version
    for _ in 0..5 {
        write_u32(&mut out, 0); // no metadata or private block
    }
    debug_assert_eq!(out.len(), WOFF_HEADER_LEN);

    for ((table, payload), offset) in tables.iter().zip(&payloads).zip(&offsets) {
        out.extend_from_slice(&table.tag);
        write_u32(&mut out, u32::try_from(*offset)?);
        write_u32(&mut out, u32::try_from(payload.len())?);
        write_u32(&mut out, u32::try_from(table.data.len())?);
        write_u32(&mut out, table.checksum());
    }

    for payload in &payloads {
        out.extend_from_slice(payload);
        out.resize(padded_len(out.len()), 0);
    }
    debug_assert_eq!(out.len(), file_len);
    Ok(out)
}
