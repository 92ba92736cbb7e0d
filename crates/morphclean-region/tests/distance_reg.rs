//! Distance transform regression test
//!
//! Checks the separable transform against a brute-force oracle on small
//! grids, and against the analytic profile of a disk on a large one.
//!
//! Run with:
//! ```
//! cargo test -p morphclean-region --test distance_reg
//! ```

use morphclean_core::Image;
use morphclean_region::{
    DistanceBoundary, SyntheticOptions, disk_image, distance_transform,
    distance_transform_with_boundary, generate_random_blobs,
};
use morphclean_test::RegParams;

fn brute_force(image: &Image) -> Vec<f32> {
    let (w, h) = image.dimensions();
    let mut background = Vec::new();
    for y in 0..h {
        for x in 0..w {
            if image.get_pixel_unchecked(x, y) == 0 {
                background.push((x as i64, y as i64));
            }
        }
    }
    let mut out = Vec::with_capacity((w * h) as usize);
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let d2 = background
                .iter()
                .map(|&(bx, by)| ((bx - x).pow(2) + (by - y).pow(2)) as f64)
                .fold(f64::INFINITY, f64::min);
            out.push(d2.sqrt() as f32);
        }
    }
    out
}

#[test]
fn distance_reg() {
    let mut rp = RegParams::new("distance");

    // --- Single background pixel in the middle of an 11x11 grid ---
    let center = Image::from_fn(11, 11, |x, y| if x == 5 && y == 5 { 0 } else { 255 }).unwrap();
    let dist = distance_transform(&center).unwrap();
    for (x, y) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
        rp.compare_values(1.0, dist.get_pixel(x, y).unwrap() as f64, 0.0);
    }
    rp.compare_values(0.0, dist.get_pixel(5, 5).unwrap() as f64, 0.0);

    // --- Random fields up to 32x32 against the oracle ---
    for (i, (w, h)) in [(32u32, 32u32), (17, 29), (32, 5), (3, 32)].into_iter().enumerate() {
        let options = SyntheticOptions::new()
            .with_seed(100 + i as u64)
            .with_num_blobs(3)
            .with_radius_range(2, 6)
            .with_num_specks(4);
        let image = generate_random_blobs(w, h, &options).unwrap();
        let fast = distance_transform(&image).unwrap();
        let slow = brute_force(&image);
        let mismatches = fast.data().iter().zip(&slow).filter(|(a, b)| a != b).count();
        eprintln!("  {}x{}: {} mismatches", w, h, mismatches);
        rp.compare_values(0.0, mismatches as f64, 0.0);
    }

    // --- Disk: the center sits about one radius from the background ---
    let disk = disk_image(201, 201, 100, 100, 80).unwrap();
    let dist = distance_transform(&disk).unwrap();
    let max = dist.max_value().unwrap();
    eprintln!("  disk r=80: max distance {}", max);
    rp.compare_values(80.0, max as f64, 1.0);
    rp.compare_values(max as f64, dist.get_pixel(100, 100).unwrap() as f64, 0.0);

    // --- Edge policy ---
    let full = Image::new_with_value(7, 5, 255).unwrap();
    let inf = distance_transform(&full).unwrap();
    rp.compare_values(1.0, inf.data().iter().all(|v| v.is_infinite()) as u8 as f64, 0.0);
    let framed = distance_transform_with_boundary(&full, DistanceBoundary::Background).unwrap();
    rp.compare_values(3.0, framed.get_pixel(3, 2).unwrap() as f64, 0.0);
    rp.compare_values(1.0, framed.get_pixel(6, 4).unwrap() as f64, 0.0);

    assert!(rp.cleanup());
}
