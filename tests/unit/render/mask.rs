use super::*;

fn coverage_raster(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> Raster {
    let mut r = Raster::transparent(width, height);
    for y in 0..height {
        for x in 0..width {
            let i = r.index(x, y);
            let a = f(x, y);
            r.data[i..i + 4].copy_from_slice(&[a, a, a, a]);
        }
    }
    r
}

#[test]
fn full_coverage_clears_layer_even_when_feathered() {
    let mask = OcclusionMask::prepare(&Raster::filled(8, 8, [255; 4]), 8, 8, 3.0).unwrap();
    let mut layer = Raster::filled(8, 8, [200, 100, 50, 255]);
    mask.cut(&mut layer).unwrap();
    assert!(layer.data.iter().all(|&v| v == 0));
}

#[test]
fn empty_coverage_keeps_layer() {
    let mask = OcclusionMask::prepare(&Raster::transparent(4, 4), 4, 4, 2.0).unwrap();
    let mut layer = Raster::filled(4, 4, [200, 100, 50, 255]);
    let before = layer.clone();
    mask.cut(&mut layer).unwrap();
    assert_eq!(layer, before);
}

#[test]
fn hard_mask_only_clears_above_half_coverage() {
    let mask = OcclusionMask::prepare(
        &coverage_raster(3, 1, |x, _| [64, 127, 128][x as usize]),
        3,
        1,
        0.0,
    )
    .unwrap();
    let mut layer = Raster::filled(3, 1, [255, 255, 255, 255]);
    mask.cut(&mut layer).unwrap();
    assert_eq!(layer.px(0, 0), [255, 255, 255, 255]);
    assert_eq!(layer.px(1, 0), [255, 255, 255, 255]);
    assert_eq!(layer.px(2, 0), [0, 0, 0, 0]);
}

#[test]
fn low_confidence_feathered_mask_keeps_layer() {
    let mask = OcclusionMask::prepare(&coverage_raster(6, 6, |_, _| 51), 6, 6, 2.0).unwrap();
    let mut layer = Raster::filled(6, 6, [200, 100, 50, 255]);
    let before = layer.clone();
    mask.cut(&mut layer).unwrap();
    assert_eq!(layer, before);
}

#[test]
fn feathered_mask_fades_between_quarter_and_half_coverage() {
    let mask = OcclusionMask::prepare(&coverage_raster(6, 6, |_, _| 96), 6, 6, 1.0).unwrap();
    assert_eq!(mask.coverage_at(3, 3), 96);
    let mut layer = Raster::filled(6, 6, [255, 255, 255, 255]);
    mask.cut(&mut layer).unwrap();
    assert_eq!(layer.px(3, 3), [127, 127, 127, 127]);
}

#[test]
fn feathering_spreads_coverage() {
    let hard = coverage_raster(9, 1, |x, _| if x == 4 { 255 } else { 0 });
    let soft = OcclusionMask::prepare(&hard, 9, 1, 1.0).unwrap();
    assert!(soft.coverage_at(3, 0) > 0);
    assert!(soft.coverage_at(4, 0) < 255);
    assert_eq!(soft.coverage_at(3, 0), soft.coverage_at(5, 0));

    let sharp = OcclusionMask::prepare(&hard, 9, 1, 0.0).unwrap();
    assert_eq!(sharp.coverage_at(3, 0), 0);
    assert_eq!(sharp.coverage_at(4, 0), 255);
}

#[test]
fn mask_is_scaled_to_layer_size() {
    let small = coverage_raster(2, 2, |x, _| if x == 1 { 255 } else { 0 });
    let mask = OcclusionMask::prepare(&small, 4, 4, 0.0).unwrap();
    assert_eq!((mask.width(), mask.height()), (4, 4));
    assert_eq!(mask.coverage_at(0, 0), 0);
    assert_eq!(mask.coverage_at(3, 3), 255);
}

#[test]
fn cut_rejects_size_mismatch_and_empty_masks() {
    let mask = OcclusionMask::prepare(&Raster::transparent(2, 2), 2, 2, 0.0).unwrap();
    let mut layer = Raster::transparent(3, 3);
    assert!(mask.cut(&mut layer).is_err());
    assert!(OcclusionMask::prepare(&Raster::transparent(0, 0), 2, 2, 0.0).is_err());
}

#[test]
fn kernel_weights_sum_to_one_in_q16() {
    let k = gaussian_kernel_q16(6, 2.0).unwrap();
    assert_eq!(k.len(), 13);
    assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);
    assert_eq!(k[0], k[12]);
    assert!(k[6] > k[5]);
    assert_eq!(gaussian_kernel_q16(0, 1.0).unwrap(), vec![65536]);
}
