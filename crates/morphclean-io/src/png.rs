//! PNG image format support
//!
//! Every PNG color type decodes to 8-bit grayscale: low bit depths are
//! scaled to the full range (so a 1-bit image reads as 0/255), 16-bit
//! samples keep their high byte, color is reduced to luma, and alpha is
//! dropped.

use crate::{IoError, IoResult};
use morphclean_color::{ColorImage, rgb_to_gray};
use morphclean_core::Image;
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image as 8-bit grayscale
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::IDENTITY);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let palette: Option<Vec<u8>> = reader.info().palette.as_ref().map(|p| p.to_vec());

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let color_type = output_info.color_type;
    let bit_depth = output_info.bit_depth;
    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    let bits = bit_depth as u32;
    let wide = bit_depth == BitDepth::Sixteen;
    // Bytes per sample of the 8/16-bit formats; the high byte comes first.
    let step = if wide { 2 } else { 1 };

    let mut out = Image::new(width, height)?.into_mut();
    for y in 0..height {
        let row = &data[y as usize * bytes_per_row..(y as usize + 1) * bytes_per_row];
        let dst = out.row_mut(y);
        match color_type {
            ColorType::Grayscale => {
                for (x, d) in dst.iter_mut().enumerate() {
                    *d = if bits < 8 {
                        scale_low_depth(packed_sample(row, x, bits), bits)
                    } else {
                        row[x * step]
                    };
                }
            }
            ColorType::GrayscaleAlpha => {
                for (x, d) in dst.iter_mut().enumerate() {
                    *d = row[x * 2 * step];
                }
            }
            ColorType::Rgb => {
                for (x, d) in dst.iter_mut().enumerate() {
                    let i = x * 3 * step;
                    *d = rgb_to_gray(row[i], row[i + step], row[i + 2 * step]);
                }
            }
            ColorType::Rgba => {
                for (x, d) in dst.iter_mut().enumerate() {
                    let i = x * 4 * step;
                    *d = rgb_to_gray(row[i], row[i + step], row[i + 2 * step]);
                }
            }
            ColorType::Indexed => {
                let palette = palette
                    .as_deref()
                    .ok_or_else(|| IoError::InvalidData("indexed PNG without palette".to_string()))?;
                for (x, d) in dst.iter_mut().enumerate() {
                    let idx = packed_sample(row, x, bits) as usize * 3;
                    let rgb = palette.get(idx..idx + 3).ok_or_else(|| {
                        IoError::InvalidData(format!("palette index {} out of range", idx / 3))
                    })?;
                    *d = rgb_to_gray(rgb[0], rgb[1], rgb[2]);
                }
            }
            #[allow(unreachable_patterns)]
            other => {
                return Err(IoError::UnsupportedFormat(format!(
                    "unsupported PNG format: {:?} {:?}",
                    other, bit_depth
                )));
            }
        }
    }

    Ok(out.into())
}

/// Sample `x` of a row packed at `bits` per sample (1, 2, 4 or 8), MSB first.
fn packed_sample(row: &[u8], x: usize, bits: u32) -> u8 {
    if bits == 8 {
        return row[x];
    }
    let per_byte = 8 / bits as usize;
    let byte = row[x / per_byte];
    let shift = 8 - bits as usize * (x % per_byte + 1);
    (byte >> shift) & ((1u16 << bits) - 1) as u8
}

fn scale_low_depth(v: u8, bits: u32) -> u8 {
    let max = (1u32 << bits) - 1;
    (v as u32 * 255 / max) as u8
}

/// Write an 8-bit grayscale PNG
pub fn write_png<W: Write>(image: &Image, writer: W) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(image.data())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}

/// Write an 8-bit RGB PNG
pub fn write_png_rgb<W: Write>(image: &ColorImage, writer: W) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(image.data())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(width: u32, height: u32, color: ColorType, depth: BitDepth, data: &[u8]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buffer
    }

    #[test]
    fn test_png_roundtrip_grayscale() {
        let image = Image::from_fn(10, 10, |x, y| ((x + y) * 10) as u8).unwrap();
        let mut buffer = Vec::new();
        write_png(&image, &mut buffer).unwrap();
        let decoded = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_read_1bit_scales_to_255() {
        // 0b1010_0000: pixels 0 and 2 set
        let buffer = encode(4, 1, ColorType::Grayscale, BitDepth::One, &[0b1010_0000]);
        let decoded = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(decoded.data(), &[255, 0, 255, 0]);
    }

    #[test]
    fn test_read_rgb_as_luma() {
        let buffer = encode(2, 1, ColorType::Rgb, BitDepth::Eight, &[255, 255, 255, 255, 0, 0]);
        let decoded = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(decoded.data(), &[255, 76]);
    }

    #[test]
    fn test_read_16bit_keeps_high_byte() {
        let buffer = encode(2, 1, ColorType::Grayscale, BitDepth::Sixteen, &[0x12, 0x34, 0xff, 0x00]);
        let decoded = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(decoded.data(), &[0x12, 0xff]);
    }

    #[test]
    fn test_write_rgb() {
        let mut color = ColorImage::new(2, 2).unwrap();
        color.set_rgb(1, 1, (10, 20, 30));
        let mut buffer = Vec::new();
        write_png_rgb(&color, &mut buffer).unwrap();
        let decoded = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(decoded.get_pixel(1, 1), Some(rgb_to_gray(10, 20, 30)));
        assert_eq!(decoded.get_pixel(0, 0), Some(0));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = read_png(Cursor::new(vec![1, 2, 3, 4])).unwrap_err();
        assert!(matches!(err, IoError::DecodeError(_)));
    }
}
