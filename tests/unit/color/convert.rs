use super::*;

#[test]
fn parses_long_and_short_hex() {
    assert_eq!(hex_to_rgb("#ff8000"), Some(RgbColor::new(255, 128, 0)));
    assert_eq!(hex_to_rgb("FF8000"), Some(RgbColor::new(255, 128, 0)));
    assert_eq!(hex_to_rgb("#f80"), Some(RgbColor::new(255, 136, 0)));
    assert_eq!(hex_to_rgb("#12345"), None);
    assert_eq!(hex_to_rgb("#gg0000"), None);
}

#[test]
fn hex_output_is_lower_case_and_padded() {
    assert_eq!(rgb_to_hex(RgbColor::new(1, 171, 255)), "#01abff");
    assert_eq!(hex_to_rgb(&rgb_to_hex(RgbColor::new(9, 8, 7))), Some(RgbColor::new(9, 8, 7)));
}

#[test]
fn hsl_of_primaries() {
    let red = rgb_to_hsl(RgbColor::new(255, 0, 0));
    assert_eq!((red.h, red.s, red.l), (0.0, 1.0, 0.5));

    let blue = rgb_to_hsl(RgbColor::new(0, 0, 255));
    assert!((blue.h - 240.0).abs() < 1e-9);

    let gray = rgb_to_hsl(RgbColor::new(128, 128, 128));
    assert_eq!(gray.s, 0.0);
}

#[test]
fn hsl_back_to_rgb() {
    for c in [
        RgbColor::new(255, 0, 0),
        RgbColor::new(12, 200, 99),
        RgbColor::new(128, 128, 128),
        RgbColor::new(250, 240, 10),
    ] {
        let back = hsl_to_rgb(rgb_to_hsl(c));
        assert!((i32::from(back.r) - i32::from(c.r)).abs() <= 1);
        assert!((i32::from(back.g) - i32::from(c.g)).abs() <= 1);
        assert!((i32::from(back.b) - i32::from(c.b)).abs() <= 1);
    }
}

#[test]
fn contrasting_text_follows_luminance() {
    assert_eq!(contrasting_text_color(RgbColor::WHITE), RgbColor::BLACK);
    assert_eq!(contrasting_text_color(RgbColor::new(20, 20, 60)), RgbColor::WHITE);
    assert_eq!(contrasting_text_color(RgbColor::new(255, 255, 0)), RgbColor::BLACK);
}

#[test]
fn brightness_scales_and_clamps() {
    assert_eq!(
        adjust_brightness(RgbColor::new(100, 200, 0), 1.5),
        RgbColor::new(150, 255, 0)
    );
    assert_eq!(
        adjust_brightness(RgbColor::new(100, 200, 0), -1.0),
        RgbColor::BLACK
    );
}

#[test]
fn premul_pixel_scales_channels() {
    assert_eq!(RgbColor::new(255, 0, 128).to_premul_rgba8(255), [255, 0, 128, 255]);
    assert_eq!(RgbColor::new(255, 0, 0).to_premul_rgba8(128), [128, 0, 0, 128]);
}
