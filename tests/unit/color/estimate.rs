use super::*;
use crate::region::model::create_default_region;

const A: [u8; 4] = [200, 30, 30, 255];
const B: [u8; 4] = [20, 40, 220, 255];

fn banded(width: u32, height: u32, a_rows: u32) -> Raster {
    let mut r = Raster::transparent(width, height);
    for y in 0..height {
        for x in 0..width {
            let i = r.index(x, y);
            let px = if y < a_rows { A } else { B };
            r.data[i..i + 4].copy_from_slice(&px);
        }
    }
    r
}

#[test]
fn sample_uniform_window() {
    let frame = Raster::filled(30, 30, [10, 20, 30, 255]);
    assert_eq!(
        sample_color(&frame, 15, 15, DEFAULT_SAMPLE_SIZE),
        Some(RgbColor::new(10, 20, 30))
    );
}

#[test]
fn sample_window_is_clamped_to_frame() {
    let frame = banded(4, 4, 2);
    assert_eq!(sample_color(&frame, 1, 1, 2), Some(RgbColor::new(200, 30, 30)));
    assert_eq!(sample_color(&frame, 0, 0, 10).map(|c| c.g), Some(35));
    assert_eq!(sample_color(&frame, -50, -50, 10), None);
}

#[test]
fn dominant_color_picks_majority_cluster() {
    let frame = banded(20, 20, 16);
    let region = create_default_region(0.0, 0.0, 100.0, 100.0);
    let got = detect_dominant_color(
        &frame,
        &region,
        DominantColorOpts::default().with_clusters(2),
    );
    assert_eq!(got, Some(RgbColor::new(A[0], A[1], A[2])));
}

#[test]
fn dominant_color_restricted_to_region() {
    let frame = banded(20, 20, 16);
    let bottom = create_default_region(0.0, 80.0, 100.0, 20.0);
    let got = detect_dominant_color(
        &frame,
        &bottom,
        DominantColorOpts::default().with_sample_density(1.0),
    );
    assert_eq!(got, Some(RgbColor::new(B[0], B[1], B[2])));
}

#[test]
fn few_samples_fall_back_to_average() {
    let mut frame = Raster::transparent(2, 1);
    frame.data.copy_from_slice(&[255, 0, 0, 255, 0, 0, 255, 255]);
    let region = create_default_region(0.0, 0.0, 100.0, 100.0);
    let got = detect_dominant_color(
        &frame,
        &region,
        DominantColorOpts::default().with_sample_density(1.0),
    );
    assert_eq!(got, Some(RgbColor::new(128, 0, 128)));
}

#[test]
fn empty_frame_has_no_dominant_color() {
    let frame = Raster::transparent(0, 0);
    assert_eq!(
        detect_dominant_color(&frame, &WallRegion::default(), DominantColorOpts::default()),
        None
    );
}

#[test]
fn kmeans_keeps_centroid_of_empty_cluster() {
    let samples = vec![[0.0, 0.0, 0.0]; 4];
    let (centroids, counts) = kmeans(&samples, 2, KMEANS_ITERATIONS);
    assert_eq!(counts, vec![4, 0]);
    assert_eq!(centroids[1], [0.0, 0.0, 0.0]);
}
