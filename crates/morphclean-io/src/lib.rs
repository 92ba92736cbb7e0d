//! morphclean-io - Image I/O for morphclean
//!
//! Reads PNG (any color type and bit depth) and PGM (P2/P5) files into
//! 8-bit grayscale [`Image`]s, and writes grayscale PNG or P5. Colorized
//! label maps are written as RGB PNG.
//!
//! # Examples
//!
//! ```no_run
//! use morphclean_io::{ImageFormat, read_image, write_image};
//!
//! let image = read_image("input.png").unwrap();
//! write_image(&image, "copy.pgm", ImageFormat::Pnm).unwrap();
//! ```

pub mod error;
pub mod format;
pub mod png;
pub mod pnm;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use morphclean_color::ColorImage;
use morphclean_core::Image;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Read an image file, detecting the format from its header
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let reader = BufReader::new(File::open(path)?);
    match format {
        ImageFormat::Png => png::read_png(reader),
        ImageFormat::Pnm => pnm::read_pnm(reader),
    }
}

/// Decode an image held in memory
pub fn read_image_mem(data: &[u8]) -> IoResult<Image> {
    match detect_format_from_bytes(data)? {
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        ImageFormat::Pnm => pnm::read_pnm(Cursor::new(data)),
    }
}

/// Write an image file in the given format
pub fn write_image<P: AsRef<Path>>(image: &Image, path: P, format: ImageFormat) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_image_to(image, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Encode an image into memory
pub fn write_image_mem(image: &Image, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_image_to(image, &mut buffer, format)?;
    Ok(buffer)
}

fn write_image_to<W: Write>(image: &Image, writer: W, format: ImageFormat) -> IoResult<()> {
    match format {
        ImageFormat::Png => png::write_png(image, writer),
        ImageFormat::Pnm => pnm::write_pnm(image, writer),
    }
}

/// Write a color image as RGB PNG
pub fn write_color_png<P: AsRef<Path>>(image: &ColorImage, path: P) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    png::write_png_rgb(image, &mut writer)?;
    writer.flush()?;
    Ok(())
}
