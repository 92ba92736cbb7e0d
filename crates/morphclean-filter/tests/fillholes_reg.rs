//! Hole filling regression test
//!
//! Fills an annulus, a solid disk and a random blob field, and checks that
//! the fill is idempotent.
//!
//! Run with:
//! ```
//! cargo test -p morphclean-filter --test fillholes_reg
//! ```

use morphclean_filter::fill_holes;
use morphclean_io::ImageFormat;
use morphclean_morph::Sel;
use morphclean_region::{SyntheticOptions, annulus_image, disk_image, generate_random_blobs};
use morphclean_test::RegParams;

#[test]
fn fillholes_reg() {
    let mut rp = RegParams::new("fillholes");
    let sel = Sel::create_square(3).unwrap();

    // --- Annulus fills to a solid disk of the outer radius ---
    eprintln!("  Annulus r=30..60 in 200x200");
    let annulus = annulus_image(200, 200, 100, 100, 30, 60).unwrap();
    let disk = disk_image(200, 200, 100, 100, 60).unwrap();
    let filled = fill_holes(&annulus, &sel).unwrap();
    rp.compare_images(&disk, &filled);
    rp.compare_values(
        disk.count_foreground() as f64,
        filled.count_foreground() as f64,
        0.0,
    );
    rp.write_image_and_check(&filled, ImageFormat::Png)
        .expect("write filled annulus");

    // --- Idempotence ---
    let twice = fill_holes(&filled, &sel).unwrap();
    rp.compare_images(&filled, &twice);

    // --- A solid disk has nothing to fill ---
    eprintln!("  Solid disk");
    let unchanged = fill_holes(&disk, &sel).unwrap();
    rp.compare_images(&disk, &unchanged);

    // --- Random field: filling only ever adds foreground ---
    eprintln!("  Random blobs");
    let blobs = generate_random_blobs(200, 150, &SyntheticOptions::new().with_seed(3)).unwrap();
    let filled = fill_holes(&blobs, &sel).unwrap();
    rp.compare_values(1.0, blobs.all_le(&filled).unwrap() as u8 as f64, 0.0);
    rp.compare_images(&filled, &fill_holes(&filled, &sel).unwrap());

    // A cross connects background only 4-way, so it can fill more.
    let cross = Sel::create_cross(3).unwrap();
    let filled4 = fill_holes(&blobs, &cross).unwrap();
    rp.compare_values(1.0, filled.all_le(&filled4).unwrap() as u8 as f64, 0.0);
    rp.write_image_and_check(&filled4, ImageFormat::Png)
        .expect("write filled blobs");

    assert!(rp.cleanup());
}
