use crate::foundation::error::{WallArtError, WallArtResult};
use serde::{Deserialize, Serialize};

pub use kurbo::Affine;

/// A position in percentage units, `x` and `y` in `[0, 100]` relative to frame width/height.
///
/// Deserializes from either `{ "x": .., "y": .. }` or `[x, y]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal position (percent of frame width).
    pub x: f64,
    /// Vertical position (percent of frame height).
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Clamp both axes independently into `[0, 100]`.
    pub fn clamp_percent(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 100.0),
            y: self.y.clamp(0.0, 100.0),
        }
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 2]),
            Obj { x: f64, y: f64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

/// An RGBA8 raster, tightly packed and row-major.
///
/// Pixels are **premultiplied alpha** throughout the compositor. Camera frames are opaque, so
/// for them premultiplied and straight bytes coincide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl Raster {
    /// A fully transparent raster.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// A raster where every pixel is `px` (premultiplied).
    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> Self {
        Self {
            width,
            height,
            data: px.repeat((width as usize) * (height as usize)),
        }
    }

    /// Wrap premultiplied bytes, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> WallArtResult<Self> {
        let expected = expected_len(width, height)?;
        if data.len() != expected {
            return Err(WallArtError::validation(format!(
                "raster expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap straight-alpha bytes, premultiplying in place.
    pub fn from_straight(width: u32, height: u32, mut data: Vec<u8>) -> WallArtResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul(width, height, data)
    }

    /// Return `true` when the raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied pixel at `(x, y)`. Panics when out of bounds.
    pub fn px(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Straight (un-premultiplied) RGB at `(x, y)`.
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let [r, g, b, _] = unpremultiply(self.px(x, y));
        [r, g, b]
    }

    /// Straight-alpha copy of the pixel data, e.g. for PNG encoding.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        out
    }

    /// Nearest-neighbour resample to `width x height`.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        if self.width == width && self.height == height {
            return self.clone();
        }
        let mut out = Self::transparent(width, height);
        if self.is_empty() {
            return out;
        }
        for y in 0..height {
            let sy = ((u64::from(y) * u64::from(self.height)) / u64::from(height.max(1))) as u32;
            for x in 0..width {
                let sx = ((u64::from(x) * u64::from(self.width)) / u64::from(width.max(1))) as u32;
                let i = out.index(x, y);
                out.data[i..i + 4].copy_from_slice(&self.px(sx, sy));
            }
        }
        out
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    pub(crate) fn stride(&self) -> usize {
        (self.width as usize) * 4
    }
}

fn expected_len(width: u32, height: u32) -> WallArtResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| WallArtError::validation("raster buffer size overflow"))
}

fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    match a {
        0 => [0, 0, 0, 0],
        255 => [r, g, b, a],
        _ => {
            let a32 = u32::from(a);
            let un = |c: u8| ((u32::from(c) * 255 + a32 / 2) / a32).min(255) as u8;
            [un(r), un(g), un(b), a]
        }
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
