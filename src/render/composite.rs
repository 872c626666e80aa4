use crate::foundation::error::{WallArtError, WallArtResult};
use crate::foundation::math::{mul_div255_u8, unit_to_u8};
use rayon::prelude::*;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over with a uniform opacity multiplier applied to the whole source pixel.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = u16::from(unit_to_u8(opacity));
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Blend `src` over `dst` pixel-wise. Both buffers are premultiplied RGBA8 of equal length.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> WallArtResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(WallArtError::evaluation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    if unit_to_u8(opacity) == 0 {
        return Ok(());
    }
    dst.par_chunks_exact_mut(4)
        .zip(src.par_chunks_exact(4))
        .for_each(|(d, s)| {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
            d.copy_from_slice(&out);
        });
    Ok(())
}

/// Scale color channels by `factor`, keeping each channel within its pixel's alpha.
pub fn scale_brightness_in_place(buf: &mut [u8], factor: f32) {
    if (factor - 1.0).abs() < f32::EPSILON {
        return;
    }
    let factor = factor.max(0.0);
    buf.par_chunks_exact_mut(4).for_each(|px| {
        let a = f32::from(px[3]);
        for c in &mut px[..3] {
            *c = (f32::from(*c) * factor).round().clamp(0.0, a) as u8;
        }
    });
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
