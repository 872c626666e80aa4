use serde::{Deserialize, Serialize};

/// An opaque sRGB color, channels in `[0, 255]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl RgbColor {
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct a color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Premultiplied RGBA8 pixel with alpha `a`.
    pub fn to_premul_rgba8(self, a: u8) -> [u8; 4] {
        let premul = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
        [premul(self.r), premul(self.g), premul(self.b), a]
    }
}

/// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue, degrees.
    pub h: f64,
    /// Saturation.
    pub s: f64,
    /// Lightness.
    pub l: f64,
}

/// Parse `#RRGGBB` or `#RGB` (the `#` is optional, case-insensitive).
pub fn hex_to_rgb(hex: &str) -> Option<RgbColor> {
    let s = hex.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.is_ascii() {
        return None;
    }

    fn hex_byte(pair: &str) -> Option<u8> {
        u8::from_str_radix(pair, 16).ok()
    }

    match s.len() {
        6 => Some(RgbColor::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        3 => {
            let nib = |i: usize| hex_byte(&s[i..i + 1]).map(|v| v * 17);
            Some(RgbColor::new(nib(0)?, nib(1)?, nib(2)?))
        }
        _ => None,
    }
}

/// Lower-case `#rrggbb`.
pub fn rgb_to_hex(c: RgbColor) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Standard sRGB to HSL conversion.
pub fn rgb_to_hsl(c: RgbColor) -> Hsl {
    let r = f64::from(c.r) / 255.0;
    let g = f64::from(c.g) / 255.0;
    let b = f64::from(c.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    Hsl { h: h * 60.0, s, l }
}

/// Standard HSL to sRGB conversion. Hue wraps; saturation and lightness clamp.
pub fn hsl_to_rgb(hsl: Hsl) -> RgbColor {
    let h = (hsl.h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = hsl.s.clamp(0.0, 1.0);
    let l = hsl.l.clamp(0.0, 1.0);

    fn to_u8(x: f64) -> u8 {
        (x.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    if s == 0.0 {
        let v = to_u8(l);
        return RgbColor::new(v, v, v);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    RgbColor::new(
        to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_u8(hue_to_rgb(p, q, h)),
        to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

/// Relative luminance in `[0, 1]` (Rec. 601 weights).
pub fn luminance(c: RgbColor) -> f64 {
    (0.299 * f64::from(c.r) + 0.587 * f64::from(c.g) + 0.114 * f64::from(c.b)) / 255.0
}

/// Black text on light colors, white text on dark ones.
pub fn contrasting_text_color(c: RgbColor) -> RgbColor {
    if luminance(c) > 0.5 {
        RgbColor::BLACK
    } else {
        RgbColor::WHITE
    }
}

/// Scale every channel by `factor`, clamped to `[0, 255]`.
pub fn adjust_brightness(c: RgbColor, factor: f64) -> RgbColor {
    let scale = |v: u8| (f64::from(v) * factor).round().clamp(0.0, 255.0) as u8;
    RgbColor::new(scale(c.r), scale(c.g), scale(c.b))
}

#[cfg(test)]
#[path = "../../tests/unit/color/convert.rs"]
mod tests;
