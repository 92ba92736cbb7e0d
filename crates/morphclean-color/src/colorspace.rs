//! Color space conversion
//!
//! Integer HSV used by the label palette, and RGB to luma for reading
//! color files as grayscale.

/// HSV color values.
///
/// Ranges: h [0..239] (h=240 wraps to 0), s [0..255], v [0..255].
///
/// Hue correspondence:
/// - 0: red
/// - 40: yellow
/// - 80: green
/// - 120: cyan
/// - 160: blue
/// - 200: magenta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: i32,
    pub s: i32,
    pub v: i32,
}

/// Convert HSV to RGB.
pub fn hsv_to_rgb(hsv: Hsv) -> (u8, u8, u8) {
    let Hsv {
        mut h,
        s: sval,
        v: vval,
    } = hsv;

    if sval == 0 {
        return (vval as u8, vval as u8, vval as u8);
    }

    if h == 240 {
        h = 0;
    }
    let hf = h as f32 / 40.0;
    let sector = hf as i32;
    let frac = hf - sector as f32;
    let s = sval as f32 / 255.0;
    let x = (vval as f32 * (1.0 - s) + 0.5) as i32;
    let y = (vval as f32 * (1.0 - s * frac) + 0.5) as i32;
    let z = (vval as f32 * (1.0 - s * (1.0 - frac)) + 0.5) as i32;

    let (r, g, b) = match sector {
        0 => (vval, z, x),
        1 => (y, vval, x),
        2 => (x, vval, z),
        3 => (x, y, vval),
        4 => (z, x, vval),
        5 => (vval, x, y),
        _ => (0, 0, 0),
    };

    (r as u8, g as u8, b as u8)
}

/// Luma of an RGB triple using integer BT.601 weights.
#[inline]
pub fn rgb_to_gray(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}
