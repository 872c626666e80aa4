use super::*;
use serde_json::json;

#[test]
fn point_deserializes_from_object_and_array() {
    let p: Point = serde_json::from_value(json!({"x": 12.5, "y": 40.0})).unwrap();
    assert_eq!(p, Point::new(12.5, 40.0));

    let p: Point = serde_json::from_value(json!([3.0, 4.0])).unwrap();
    assert_eq!(p, Point::new(3.0, 4.0));
}

#[test]
fn point_clamp_percent_is_per_axis() {
    assert_eq!(
        Point::new(150.0, -20.0).clamp_percent(),
        Point::new(100.0, 0.0)
    );
    assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
}

#[test]
fn raster_from_premul_checks_length() {
    assert!(Raster::from_premul(2, 2, vec![0; 16]).is_ok());
    assert!(Raster::from_premul(2, 2, vec![0; 15]).is_err());
}

#[test]
fn raster_from_straight_premultiplies() {
    let r = Raster::from_straight(1, 1, vec![100, 50, 200, 128]).unwrap();
    assert_eq!(
        r.px(0, 0),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn rgb_at_unpremultiplies() {
    let r = Raster::from_premul(1, 1, vec![64, 0, 128, 128]).unwrap();
    let [red, green, blue] = r.rgb_at(0, 0);
    assert!((i32::from(red) - 128).abs() <= 1);
    assert_eq!(green, 0);
    assert_eq!(blue, 255);
}

#[test]
fn resized_nearest_keeps_quadrants() {
    let mut src = Raster::transparent(2, 2);
    let i = src.index(1, 1);
    src.data[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);

    let big = src.resized(4, 4);
    assert_eq!(big.px(0, 0), [0, 0, 0, 0]);
    assert_eq!(big.px(3, 3), [255, 255, 255, 255]);
    assert_eq!(big.px(2, 2), [255, 255, 255, 255]);
    assert_eq!(big.px(1, 2), [0, 0, 0, 0]);
}

#[test]
fn straight_readback_undoes_premultiplication() {
    let r = Raster::from_premul(2, 1, vec![64, 32, 0, 128, 10, 20, 30, 0]).unwrap();
    assert_eq!(r.to_straight_rgba8(), vec![128, 64, 0, 128, 0, 0, 0, 0]);
}
