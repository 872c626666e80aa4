//! Eyedropper sampling and dominant-color detection over frame rasters.

use crate::color::convert::RgbColor;
use crate::foundation::core::Raster;
use crate::region::model::{WallRegion, bounding_box, to_pixel_space};

/// Default eyedropper window edge, in pixels.
pub const DEFAULT_SAMPLE_SIZE: u32 = 10;

/// Fixed k-means iteration count; bounds worst-case latency regardless of input size.
pub const KMEANS_ITERATIONS: usize = 10;

/// Options for [`detect_dominant_color`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DominantColorOpts {
    /// Fraction of pixels sampled; every `round(1 / density)`-th pixel is taken.
    pub sample_density: f64,
    /// Number of k-means centroids.
    pub clusters: usize,
}

impl Default for DominantColorOpts {
    fn default() -> Self {
        Self {
            sample_density: 0.1,
            clusters: 5,
        }
    }
}

impl DominantColorOpts {
    /// Return options with a different cluster count.
    pub fn with_clusters(mut self, clusters: usize) -> Self {
        self.clusters = clusters;
        self
    }

    /// Return options with a different sample density.
    pub fn with_sample_density(mut self, density: f64) -> Self {
        self.sample_density = density;
        self
    }
}

/// Mean color of the `sample_size x sample_size` window centered at pixel `(x, y)`.
///
/// The window is clamped to the frame; `None` when nothing of it lies on the frame.
pub fn sample_color(frame: &Raster, x: i64, y: i64, sample_size: u32) -> Option<RgbColor> {
    let size = i64::from(sample_size.max(1));
    let half = size / 2;
    let x0 = (x - half).clamp(0, i64::from(frame.width));
    let y0 = (y - half).clamp(0, i64::from(frame.height));
    let x1 = (x - half + size).clamp(0, i64::from(frame.width));
    let y1 = (y - half + size).clamp(0, i64::from(frame.height));

    let mut sum = [0u64; 3];
    let mut n = 0u64;
    for py in y0..y1 {
        for px in x0..x1 {
            let rgb = frame.rgb_at(px as u32, py as u32);
            for c in 0..3 {
                sum[c] += u64::from(rgb[c]);
            }
            n += 1;
        }
    }
    if n == 0 {
        return None;
    }
    let avg = |s: u64| ((s + n / 2) / n) as u8;
    Some(RgbColor::new(avg(sum[0]), avg(sum[1]), avg(sum[2])))
}

/// Most representative color inside the region's bounding box.
///
/// Samples are clustered with deterministic k-means; the centroid with the most members wins.
/// Falls back to the plain average when there are fewer samples than clusters, and returns
/// `None` when the region covers no pixels.
#[tracing::instrument(skip_all, fields(width = frame.width, height = frame.height, clusters = opts.clusters))]
pub fn detect_dominant_color(
    frame: &Raster,
    region: &WallRegion,
    opts: DominantColorOpts,
) -> Option<RgbColor> {
    let samples = collect_samples(frame, region, opts.sample_density);
    if samples.is_empty() {
        tracing::debug!("region covers no pixels");
        return None;
    }
    if opts.clusters == 0 || samples.len() < opts.clusters {
        return Some(to_rgb(mean(&samples)));
    }

    let (centroids, counts) = kmeans(&samples, opts.clusters, KMEANS_ITERATIONS);
    let mut best = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = i;
        }
    }
    tracing::trace!(samples = samples.len(), winner_count = counts[best]);
    Some(to_rgb(centroids[best]))
}

fn collect_samples(frame: &Raster, region: &WallRegion, density: f64) -> Vec<[f64; 3]> {
    let px = to_pixel_space(region, f64::from(frame.width), f64::from(frame.height));
    let bb = bounding_box(&px);
    let clamp_x = |v: f64| v.clamp(0.0, f64::from(frame.width)) as u32;
    let clamp_y = |v: f64| v.clamp(0.0, f64::from(frame.height)) as u32;
    let (x0, x1) = (clamp_x(bb.min_x.floor()), clamp_x(bb.max_x.ceil()));
    let (y0, y1) = (clamp_y(bb.min_y.floor()), clamp_y(bb.max_y.ceil()));

    let step = if density.is_finite() && density > 0.0 {
        ((1.0 / density).round() as usize).max(1)
    } else {
        1
    };

    let mut samples = Vec::new();
    let mut i = 0usize;
    for y in y0..y1 {
        for x in x0..x1 {
            if i % step == 0 {
                let [r, g, b] = frame.rgb_at(x, y);
                samples.push([f64::from(r), f64::from(g), f64::from(b)]);
            }
            i += 1;
        }
    }
    samples
}

/// Lloyd iterations with evenly spaced seeds. Empty clusters keep their previous centroid.
fn kmeans(samples: &[[f64; 3]], k: usize, iterations: usize) -> (Vec<[f64; 3]>, Vec<usize>) {
    let mut centroids: Vec<[f64; 3]> = (0..k).map(|i| samples[i * samples.len() / k]).collect();
    let mut assignment = vec![0usize; samples.len()];
    let mut counts = vec![0usize; k];

    for _ in 0..iterations {
        for (slot, s) in assignment.iter_mut().zip(samples) {
            *slot = nearest(&centroids, s);
        }

        let mut sums = vec![[0.0f64; 3]; k];
        counts.iter_mut().for_each(|c| *c = 0);
        for (&cluster, s) in assignment.iter().zip(samples) {
            for c in 0..3 {
                sums[cluster][c] += s[c];
            }
            counts[cluster] += 1;
        }
        for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
            if count > 0 {
                let n = count as f64;
                *centroid = [sum[0] / n, sum[1] / n, sum[2] / n];
            }
        }
    }
    (centroids, counts)
}

fn nearest(centroids: &[[f64; 3]], s: &[f64; 3]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = (0..3).map(|j| (c[j] - s[j]).powi(2)).sum::<f64>();
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

fn mean(samples: &[[f64; 3]]) -> [f64; 3] {
    let n = samples.len() as f64;
    let mut acc = [0.0; 3];
    for s in samples {
        for c in 0..3 {
            acc[c] += s[c];
        }
    }
    [acc[0] / n, acc[1] / n, acc[2] / n]
}

fn to_rgb(c: [f64; 3]) -> RgbColor {
    let q = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    RgbColor::new(q(c[0]), q(c[1]), q(c[2]))
}

#[cfg(test)]
#[path = "../../tests/unit/color/estimate.rs"]
mod tests;
