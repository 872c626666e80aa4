//! Foreground-mask preparation and occlusion cutout.
//!
//! The mask's alpha channel is person coverage. It is resized to the layer, feathered with a
//! separable Gaussian and then subtracted from each layer before that layer is blended.

use crate::foundation::core::Raster;
use crate::foundation::error::{WallArtError, WallArtResult};
use crate::foundation::math::mul_div255_u8;
use rayon::prelude::*;

/// Per-pixel coverage (`0..=255`) at layer resolution, ready to cut layers with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OcclusionMask {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
    feathered: bool,
}

/// Coverage at or above this clears a layer pixel (just over 50%).
const CLEAR_AT: u8 = 128;

/// Feathered coverage at or below this leaves a layer pixel untouched (25%).
const RAMP_FROM: u8 = 64;

impl OcclusionMask {
    /// Resize `mask` to `width x height` and feather it by `feather_radius` pixels (Gaussian
    /// standard deviation). A radius of zero keeps hard edges.
    pub fn prepare(
        mask: &Raster,
        width: u32,
        height: u32,
        feather_radius: f32,
    ) -> WallArtResult<Self> {
        if mask.is_empty() {
            return Err(WallArtError::validation("occlusion mask has no pixels"));
        }
        let scaled = mask.resized(width, height);
        let alpha: Vec<u8> = scaled.data.chunks_exact(4).map(|px| px[3]).collect();
        let feathered = feather_radius.is_finite() && feather_radius > 0.0;
        let coverage = feather_coverage(&alpha, width, height, feather_radius)?;
        Ok(Self {
            width,
            height,
            coverage,
            feathered,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Coverage at `(x, y)`.
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        self.coverage[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Clear layer pixels whose coverage exceeds 50%.
    ///
    /// A hard mask leaves everything else untouched. A feathered mask fades pixels linearly
    /// between 25% and 50% coverage so the cut edge stays soft.
    pub fn cut(&self, layer: &mut Raster) -> WallArtResult<()> {
        if layer.width != self.width || layer.height != self.height {
            return Err(WallArtError::evaluation(format!(
                "mask is {}x{} but layer is {}x{}",
                self.width, self.height, layer.width, layer.height
            )));
        }
        let feathered = self.feathered;
        layer
            .data
            .par_chunks_exact_mut(4)
            .zip(self.coverage.par_iter())
            .for_each(|(px, &m)| {
                let keep = keep_weight(m, feathered);
                if keep == 255 {
                    return;
                }
                for c in px.iter_mut() {
                    *c = mul_div255_u8(u16::from(*c), keep);
                }
            });
        Ok(())
    }
}

fn keep_weight(m: u8, feathered: bool) -> u16 {
    if m >= CLEAR_AT {
        0
    } else if !feathered || m <= RAMP_FROM {
        255
    } else {
        u16::from(CLEAR_AT - m) * 255 / u16::from(CLEAR_AT - RAMP_FROM)
    }
}

fn feather_coverage(alpha: &[u8], width: u32, height: u32, sigma: f32) -> WallArtResult<Vec<u8>> {
    if width == 0 || height == 0 || !sigma.is_finite() || sigma <= 0.0 {
        return Ok(alpha.to_vec());
    }
    let radius = (sigma * 3.0).ceil() as u32;
    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; alpha.len()];
    let mut out = vec![0u8; alpha.len()];
    horizontal_pass(alpha, &mut tmp, width, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

const Q16_ONE: u32 = 1 << 16;

/// Normalized Gaussian taps in Q16; rounding drift is folded into the center tap.
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> WallArtResult<Vec<u32>> {
    let r = i64::from(radius);
    let two_var = 2.0 * f64::from(sigma).powi(2);
    let taps: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / two_var).exp()
        })
        .collect();
    let total: f64 = taps.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(WallArtError::evaluation("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = taps
        .iter()
        .map(|t| (t / total * f64::from(Q16_ONE)).round() as u32)
        .collect();
    let quantized: u32 = weights.iter().sum();
    let mid = weights.len() / 2;
    weights[mid] = (weights[mid] + Q16_ONE).saturating_sub(quantized);
    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    dst.par_chunks_exact_mut(width as usize)
        .zip(src.par_chunks_exact(width as usize))
        .for_each(|(out_row, in_row)| {
            for x in 0..w {
                let mut acc = 0u64;
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                    acc += u64::from(kw) * u64::from(in_row[sx as usize]);
                }
                out_row[x as usize] = q16_to_u8(acc);
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as usize;
    let h = height as i32;
    dst.par_chunks_exact_mut(w)
        .enumerate()
        .for_each(|(y, out_row)| {
            for (x, out) in out_row.iter_mut().enumerate() {
                let mut acc = 0u64;
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = (y as i32 + ki as i32 - radius).clamp(0, h - 1);
                    acc += u64::from(kw) * u64::from(src[(sy as usize) * w + x]);
                }
                *out = q16_to_u8(acc);
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
