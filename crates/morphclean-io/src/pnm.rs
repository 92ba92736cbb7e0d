//! PNM (portable graymap) format support
//!
//! Reads PGM in both the ASCII (P2) and binary (P5) encodings, with any
//! `maxval` up to 65535; samples are rescaled to 0..=255. Writes binary
//! P5 with `maxval` 255.

use crate::{IoError, IoResult};
use morphclean_core::Image;
use std::io::{BufRead, Read, Write};

/// Read a PGM image (P2/P5) from a reader.
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<Image> {
    let magic = next_token(&mut reader)?;
    let binary = match magic.as_str() {
        "P2" => false,
        "P5" => true,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM variant '{}' is not a graymap",
                other
            )));
        }
    };
    let width = parse_header_value(&mut reader, "width")?;
    let height = parse_header_value(&mut reader, "height")?;
    let maxval = parse_header_value(&mut reader, "maxval")?;
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!("maxval {} out of range", maxval)));
    }

    let count = u64::from(width) * u64::from(height);
    let raw: Vec<u32> = if binary {
        // Grow with the bytes actually present, never with the header's claim.
        let wide = maxval > 255;
        let expected = count.saturating_mul(if wide { 2 } else { 1 });
        let mut bytes = Vec::new();
        reader.by_ref().take(expected).read_to_end(&mut bytes)?;
        if bytes.len() as u64 != expected {
            return Err(IoError::InvalidData(format!(
                "truncated P5 pixel data: {} of {} bytes",
                bytes.len(),
                expected
            )));
        }
        if wide {
            bytes
                .chunks_exact(2)
                .map(|c| (u32::from(c[0]) << 8) | u32::from(c[1]))
                .collect()
        } else {
            bytes.into_iter().map(u32::from).collect()
        }
    } else {
        (0..count)
            .map(|_| parse_header_value(&mut reader, "sample"))
            .collect::<IoResult<_>>()?
    };

    let mut data = Vec::with_capacity(raw.len());
    for v in raw {
        if v > maxval {
            return Err(IoError::InvalidData(format!(
                "sample {} exceeds maxval {}",
                v, maxval
            )));
        }
        data.push(((v * 255 + maxval / 2) / maxval) as u8);
    }

    Ok(Image::from_data(width, height, data)?)
}

/// Write an image as binary PGM (P5, maxval 255).
pub fn write_pnm<W: Write>(image: &Image, mut writer: W) -> IoResult<()> {
    write!(writer, "P5\n{} {}\n255\n", image.width(), image.height())?;
    writer.write_all(image.data())?;
    Ok(())
}

/// Next whitespace-delimited token, skipping `#` comments.
///
/// Consumes exactly one whitespace byte after the token, which is what
/// separates the P5 header from the pixel data.
fn next_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            break;
        }
        let c = byte[0];
        if c == b'#' && token.is_empty() {
            let mut comment = Vec::new();
            reader.read_until(b'\n', &mut comment)?;
            continue;
        }
        if c.is_ascii_whitespace() {
            if token.is_empty() {
                continue;
            }
            break;
        }
        token.push(c);
    }
    if token.is_empty() {
        return Err(IoError::InvalidData("unexpected end of PNM header".to_string()));
    }
    String::from_utf8(token).map_err(|_| IoError::InvalidData("non-ASCII PNM header".to_string()))
}

fn parse_header_value<R: BufRead>(reader: &mut R, what: &str) -> IoResult<u32> {
    let token = next_token(reader)?;
    token
        .parse()
        .map_err(|_| IoError::InvalidData(format!("invalid PNM {} '{}'", what, token)))
}
