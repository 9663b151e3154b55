//! Embedded OpenType (EOT 2.1) wrapping of a TrueType font.

use anyhow::{Context, Result};
use read_fonts::{FontRef, TableProvider};

const EOT_VERSION: u32 = 0x0002_0001;
const EOT_MAGIC: u16 = 0x504C;
const DEFAULT_CHARSET: u8 = 1;

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Length-prefixed UTF-16LE string followed by the two-byte padding field.
fn put_name(out: &mut Vec<u8>, name: &str) -> Result<()> {
    let encoded: Vec<u8> = name.encode_utf16().flat_map(u16::to_le_bytes).collect();
    put_u16(out, u16::try_from(encoded.len())?);
    out.extend_from_slice(&encoded);
    put_u16(out, 0);
    Ok(())
}

/// Prefix `ttf` with an EOT header. Style metadata is read from its OS/2 and head tables.
pub fn ttf_to_eot(ttf: &[u8], family: &str) -> Result<Vec<u8>> {
    let font = FontRef::new(ttf).context("reading generated TrueType data")?;
    let os2 = font.os2().context("reading OS/2 table")?;
    let head = font.head().context("reading head table")?;

    let mut panose = [0u8; 10];
    for (dst, src) in panose.iter_mut().zip(os2.panose_10()) {
        *dst = *src;
    }

    let mut body = Vec::new();
    put_u32(&mut body, u32::try_from(ttf.len())?); // FontDataSize
    put_u32(&mut body, EOT_VERSION);
    put_u32(&mut body, 0); // Flags
    body.extend_from_slice(&panose);
    body.push(DEFAULT_CHARSET);
    body.push(u8::from(os2.fs_selection().bits() & 1 == 1)); // Italic
    put_u32(&mut body, u32::from(os2.us_weight_class()));
    put_u16(&mut body, os2.fs_type());
    put_u16(&mut body, EOT_MAGIC);
    put_u32(&mut body, os2.ul_unicode_range_1());
    put_u32(&mut body, os2.ul_unicode_range_2());
    put_u32(&mut body, os2.ul_unicode_range_3());
    put_u32(&mut body, os2.ul_unicode_range_4());
    put_u32(&mut body, os2.ul_code_page_range_1().unwrap_or(0));
    put_u32(&mut body, os2.ul_code_page_range_2().unwrap_or(0));
    put_u32(&mut body, head.checksum_adjustment());
    for _ in 0..4 {
        put_u32(&mut body, 0); // Reserved1-4
    }
    put_u16(&mut body, 0); // Padding1
    put_name(&mut body, family)?;
    put_name(&mut body, "Regular")?;
    put_name(&mut body, "Version 1.0")?;
    put_name(&mut body, family)?;
    put_u16(&mut body, 0); // RootStringSize

    let total = 4 + body.len() + ttf.len();
    let mut out = Vec::with_capacity(total);
    put_u32(&mut out, u32::try_from(total)?); // EOTSize
    out.extend_from_slice(&body);
    out.extend_from_slice(ttf);
    Ok(out)
}
