//! Binarization
//!
//! Every cleanup stage expects samples in {0, 255}. These helpers turn a
//! grayscale image into that domain: `v > threshold` becomes foreground.

use morphclean_core::Image;

/// Default fixed threshold: mid-gray, `v > 127` is foreground.
pub const DEFAULT_THRESHOLD: u8 = 127;

/// Binarize with a fixed threshold (`v > threshold` -> 255, else 0)
pub fn threshold_to_binary(image: &Image, threshold: u8) -> Image {
    image.threshold(threshold)
}

/// Compute Otsu's threshold from the 256-bin histogram
///
/// Returns the level `t` maximizing the between-class variance of
/// `{v <= t}` and `{v > t}`. The smallest such `t` wins ties. A constant
/// image returns its own value, so binarizing it yields all background.
pub fn compute_otsu_threshold(image: &Image) -> u8 {
    let mut hist = [0u64; 256];
    for &v in image.data() {
        hist[v as usize] += 1;
    }

    let total = image.pixel_count() as f64;
    let sum_all: f64 = hist.iter().enumerate().map(|(i, &c)| i as f64 * c as f64).sum();

    let mut best = (0u8, -1.0f64);
    let mut w0 = 0.0f64;
    let mut sum0 = 0.0f64;
    for t in 0..255usize {
        w0 += hist[t] as f64;
        sum0 += t as f64 * hist[t] as f64;
        let w1 = total - w0;
        if w0 == 0.0 || w1 == 0.0 {
            continue;
        }
        let mu0 = sum0 / w0;
        let mu1 = (sum_all - sum0) / w1;
        let between = w0 * w1 * (mu0 - mu1) * (mu0 - mu1);
        if between > best.1 {
            best = (t as u8, between);
        }
    }

    if best.1 < 0.0 {
        // Single gray level
        return image.data()[0];
    }
    best.0
}

/// Binarize with Otsu's threshold
pub fn threshold_otsu(image: &Image) -> Image {
    image.threshold(compute_otsu_threshold(image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_threshold() {
        let image = Image::from_data(4, 1, vec![0, 127, 128, 255]).unwrap();
        assert_eq!(threshold_to_binary(&image, DEFAULT_THRESHOLD).data(), &[0, 0, 255, 255]);
    }

    #[test]
    fn test_otsu_bimodal() {
        let image = Image::from_fn(10, 10, |x, _| if x < 4 { 20 } else { 200 }).unwrap();
        let t = compute_otsu_threshold(&image);
        assert!((20..200).contains(&t));
        let binary = threshold_otsu(&image);
        assert_eq!(binary.count_foreground(), 60);
    }

    #[test]
    fn test_otsu_constant() {
        let image = Image::new_with_value(3, 3, 90).unwrap();
        assert_eq!(compute_otsu_threshold(&image), 90);
        assert_eq!(threshold_otsu(&image).count_foreground(), 0);
    }
}
