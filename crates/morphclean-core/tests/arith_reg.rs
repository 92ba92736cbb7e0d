//! Pointwise arithmetic and label map regression test
//!
//! Checks the lattice identities the morphology crates rely on, and the
//! label map conversions used to render separation results.
//!
//! Run with:
//! ```
//! cargo test -p morphclean-core --test arith_reg
//! ```

use morphclean_core::{FloatImage, Image, LabelMap};
use morphclean_test::RegParams;

fn ramp(w: u32, h: u32, k: u32) -> Image {
    Image::from_fn(w, h, |x, y| ((x * k + y * 31) % 256) as u8).unwrap()
}

#[test]
fn arith_reg() {
    let mut rp = RegParams::new("arith");

    let a = ramp(37, 23, 7);
    let b = ramp(37, 23, 13);

    // --- Lattice identities ---
    eprintln!("  min/max/subtract");
    let lo = a.arith_min(&b).unwrap();
    let hi = a.arith_max(&b).unwrap();
    rp.compare_values(1.0, lo.all_le(&a).unwrap() as u8 as f64, 0.0);
    rp.compare_values(1.0, b.all_le(&hi).unwrap() as u8 as f64, 0.0);
    rp.compare_images(&a.invert().invert(), &a);
    rp.compare_images(&hi.invert(), &a.invert().arith_min(&b.invert()).unwrap());

    // (a - b) + min(a, b) == a under saturating subtraction
    let diff = a.arith_subtract(&b).unwrap();
    let sum = diff.zip_with(&lo, |d, m| d + m).unwrap();
    rp.compare_images(&sum, &a);

    let both = a.count_pixel_diffs(&b).unwrap();
    let changed = diff.data().iter().filter(|&&v| v > 0).count()
        + b.arith_subtract(&a).unwrap().data().iter().filter(|&&v| v > 0).count();
    rp.compare_values(both as f64, changed as f64, 0.0);

    // --- Thresholding ---
    eprintln!("  threshold");
    let bin = a.threshold(127);
    rp.compare_values(1.0, bin.is_binary() as u8 as f64, 0.0);
    let above = a.data().iter().filter(|&&v| v > 127).count();
    rp.compare_values(above as f64, bin.count_foreground() as f64, 0.0);
    let mismatched = Image::new(5, 5).unwrap();
    rp.compare_values(1.0, a.arith_min(&mismatched).is_err() as u8 as f64, 0.0);

    // --- Label maps ---
    eprintln!("  label maps");
    let data: Vec<u32> = (0..12 * 8)
        .map(|i| {
            let (x, y) = (i % 12, i / 12);
            match (x, y) {
                (1..=3, 1..=3) => 1,
                (6..=10, 2..=5) => 2,
                _ => 0,
            }
        })
        .collect();
    let labels = LabelMap::from_data(12, 8, data).unwrap();
    rp.compare_values(2.0, labels.max_label() as f64, 0.0);
    rp.compare_values(1.0, labels.is_contiguous() as u8 as f64, 0.0);

    let areas = labels.compute_areas();
    rp.compare_values(9.0, areas.area(1).unwrap() as f64, 0.0);
    rp.compare_values(20.0, areas.area(2).unwrap() as f64, 0.0);
    rp.compare_values(29.0, areas.total() as f64, 0.0);

    let union = labels
        .label_mask(1)
        .arith_max(&labels.label_mask(2))
        .unwrap();
    rp.compare_images(&labels.to_mask(), &union);
    rp.compare_values(29.0, labels.to_mask().count_foreground() as f64, 0.0);

    let (cx, cy) = labels.centroid(2).unwrap();
    rp.compare_values(8.0, cx, 1e-9);
    rp.compare_values(3.5, cy, 1e-9);
    rp.compare_values(1.0, labels.centroid(3).is_none() as u8 as f64, 0.0);

    // --- Float images ---
    eprintln!("  float images");
    let f = FloatImage::from_data(4, 1, vec![0.0, 1.5, 3.0, f32::INFINITY]).unwrap();
    rp.compare_values(3.0, f.max_finite_value().unwrap() as f64, 0.0);
    rp.compare_values(0.0, f.min_value().unwrap() as f64, 0.0);
    let neg = f.negate();
    rp.compare_values(-3.0, neg.data()[2] as f64, 0.0);
    rp.compare_values(0.0, neg.max_finite_value().unwrap() as f64, 0.0);
    rp.compare_values(1.0, (neg.min_value() == Some(f32::NEG_INFINITY)) as u8 as f64, 0.0);
    rp.compare_images(
        &f.threshold_ge(1.5),
        &Image::from_data(4, 1, vec![0, 255, 255, 255]).unwrap(),
    );

    assert!(rp.cleanup());
}
