//! WOFF2 wrapping of a TrueType font.
//!
//! Tables keep their sfnt form (null transform for `glyf` and `loca`) and are
//! concatenated into a single brotli stream. Decoders expect the `loca` entry
//! immediately after `glyf`.

use anyhow::{Context, Result};
use brotli::enc::BrotliEncoderParams;

use super::woff::{sfnt_tables, write_u16, write_u32, SfntTable, SFNT_DIRECTORY_ENTRY_LEN, SFNT_HEADER_LEN};

const WOFF2_SIGNATURE: u32 = 0x774F_4632;
const WOFF2_HEADER_LEN: usize = 48;
const NULL_TRANSFORM: u8 = 0b1100_0000;
const ARBITRARY_TAG: u8 = 63;

const KNOWN_TAGS: [&[u8; 4]; 13] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ", b"fpgm",
    b"glyf", b"loca", b"prep",
];

fn uint_base128_len(val: u32) -> usize {
    if val == 0 {
        1
    } else {
        val.ilog2() as usize / 7 + 1
    }
}

fn write_uint_base128(buffer: &mut Vec<u8>, val: u32) {
    for shift in [28, 21, 14, 7] {
        if val >= 1 << shift {
            buffer.push(0x80 | (val >> shift) as u8);
        }
    }
    buffer.push((val & 0x7F) as u8);
}

fn write_directory_entry(buffer: &mut Vec<u8>, table: &SfntTable<'_>) {
    match KNOWN_TAGS.iter().position(|known| **known == table.tag) {
        Some(index) => {
            let mut flags = index as u8;
            if &table.tag == b"glyf" || &table.tag == b"loca" {
                flags |= NULL_TRANSFORM;
            }
            buffer.push(flags);
        }
        None => {
            buffer.push(ARBITRARY_TAG);
            buffer.extend_from_slice(&table.tag);
        }
    }
    write_uint_base128(buffer, table.data.len() as u32);
}

/// Sfnt tables in WOFF2 directory order: by tag, with `loca` directly after `glyf`.
fn directory_order(mut tables: Vec<SfntTable<'_>>) -> Vec<SfntTable<'_>> {
    tables.sort_by_key(|t| t.tag);
    if let Some(loca) = tables.iter().position(|t| &t.tag == b"loca") {
        let loca = tables.remove(loca);
        match tables.iter().position(|t| &t.tag == b"glyf") {
            Some(glyf) => tables.insert(glyf + 1, loca),
            None => tables.push(loca),
        }
    }
    tables
}

/// Convert `ttf` to WOFF2.
pub fn ttf_to_woff2(ttf: &[u8]) -> Result<Vec<u8>> {
    let (flavor, tables) = sfnt_tables(ttf)?;
    let tables = directory_order(tables);

    let stream: Vec<u8> = tables.iter().flat_map(|t| t.data.iter().copied()).collect();
    let mut compressed = Vec::new();
    brotli::enc::BrotliCompress(
        &mut stream.as_slice(),
        &mut compressed,
        &BrotliEncoderParams::default(),
    )
    .context("brotli compression failed")?;

    let mut directory = Vec::new();
    for table in &tables {
        write_directory_entry(&mut directory, table);
    }

    let total_sfnt_size = SFNT_HEADER_LEN
        + SFNT_DIRECTORY_ENTRY_LEN * tables.len()
        + tables
            .iter()
            .map(|t| super::woff::padded_len(t.data.len()))
            .sum::<usize>();
    let unpadded = WOFF2_HEADER_LEN + directory.len() + compressed.len();
    let file_len = super::woff::padded_len(unpadded);

    let mut out = Vec::with_capacity(file_len);
    write_u32(&mut out, WOFF2_SIGNATURE);
    write_u32(&mut out, flavor);
    write_u32(&mut out, u32::try_from(file_len)?);
    write_u16(&mut out, u16::try_from(tables.len())?);
    write_u16(&mut out, 0); // reserved
    write_u32(&mut out, u32::try_from(total_sfnt_size)?);
    write_u32(&mut out, u32::try_from(compressed.len())?);
    write_u32(&mut out, 0); // major and minor version
    for _ in 0..5 {
        write_u32(&mut out, 0); // no metadata or private block
    }
    debug_assert_eq!(out.len(), WOFF2_HEADER_LEN);

    out.extend_from_slice(&directory);
    out.extend_from_slice(&compressed);
    out.resize(file_len, 0);
    Ok(out)
}
