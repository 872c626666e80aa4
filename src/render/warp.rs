//! Perspective warp of a source raster into a destination quadrilateral.
//!
//! The unit square is split into an `N x N` grid. Each cell's destination corners come from
//! bilinear interpolation of the quad; each cell is drawn as two textured triangles, each with
//! the exact affine map of its source triangle onto its destination triangle.

use crate::foundation::core::{Affine, Raster};
use crate::overlay::model::AspectRatioMode;
use crate::region::model::{WallRegion, bounding_box};
use kurbo::{Point, Rect};

/// Determinant magnitude below which a triangle is treated as degenerate.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// Default grid subdivision per axis.
pub const DEFAULT_SUBDIVISIONS: u32 = 8;

/// Triangle counts from one warp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WarpStats {
    /// Triangles rasterized.
    pub drawn: u32,
    /// Triangles skipped as degenerate.
    pub skipped: u32,
}

/// Part of the source used for the warp, in source pixels.
///
/// `Fit` currently matches `Stretch`: the whole source, no letterboxing.
pub fn source_rect(mode: AspectRatioMode, src_w: u32, src_h: u32, dst: &WallRegion) -> Rect {
    let (sw, sh) = (f64::from(src_w), f64::from(src_h));
    let full = Rect::new(0.0, 0.0, sw, sh);
    match mode {
        AspectRatioMode::Stretch | AspectRatioMode::Fit => full,
        AspectRatioMode::Crop => {
            let bb = bounding_box(dst);
            if sw <= 0.0 || sh <= 0.0 || bb.width <= 0.0 || bb.height <= 0.0 {
                return full;
            }
            let src_aspect = sw / sh;
            let dst_aspect = bb.width / bb.height;
            if src_aspect > dst_aspect {
                let w = sh * dst_aspect;
                let x0 = (sw - w) / 2.0;
                Rect::new(x0, 0.0, x0 + w, sh)
            } else {
                let h = sw / dst_aspect;
                let y0 = (sh - h) / 2.0;
                Rect::new(0.0, y0, sw, y0 + h)
            }
        }
    }
}

/// The affine map taking triangle `src` onto triangle `dst`, or `None` when `src` is degenerate.
pub fn solve_affine(src: [Point; 3], dst: [Point; 3]) -> Option<Affine> {
    let (du1, dv1) = (src[1].x - src[0].x, src[1].y - src[0].y);
    let (du2, dv2) = (src[2].x - src[0].x, src[2].y - src[0].y);
    let det = du1 * dv2 - du2 * dv1;
    if !det.is_finite() || det.abs() < DEGENERATE_EPSILON {
        return None;
    }

    let (dx1, dy1) = (dst[1].x - dst[0].x, dst[1].y - dst[0].y);
    let (dx2, dy2) = (dst[2].x - dst[0].x, dst[2].y - dst[0].y);

    let a = (dx1 * dv2 - dx2 * dv1) / det;
    let c = (du1 * dx2 - du2 * dx1) / det;
    let b = (dy1 * dv2 - dy2 * dv1) / det;
    let d = (du1 * dy2 - du2 * dy1) / det;
    let e = dst[0].x - a * src[0].x - c * src[0].y;
    let f = dst[0].y - b * src[0].x - d * src[0].y;
    Some(Affine::new([a, b, c, d, e, f]))
}

fn bilinear(q: &WallRegion, u: f64, v: f64) -> Point {
    let w_tl = (1.0 - u) * (1.0 - v);
    let w_tr = u * (1.0 - v);
    let w_bl = (1.0 - u) * v;
    let w_br = u * v;
    Point::new(
        w_tl * q.top_left.x
            + w_tr * q.top_right.x
            + w_bl * q.bottom_left.x
            + w_br * q.bottom_right.x,
        w_tl * q.top_left.y
            + w_tr * q.top_right.y
            + w_bl * q.bottom_left.y
            + w_br * q.bottom_right.y,
    )
}

/// Warp `src` (restricted to `src_rect`) into the pixel-space quad `dst` on `layer`.
pub fn warp_into_quad(
    layer: &mut Raster,
    src: &Raster,
    src_rect: Rect,
    dst: &WallRegion,
    subdivisions: u32,
) -> WarpStats {
    let n = subdivisions.max(1);
    let mut stats = WarpStats::default();

    for j in 0..n {
        let v0 = f64::from(j) / f64::from(n);
        let v1 = f64::from(j + 1) / f64::from(n);
        for i in 0..n {
            let u0 = f64::from(i) / f64::from(n);
            let u1 = f64::from(i + 1) / f64::from(n);

            let s = |u: f64, v: f64| {
                Point::new(
                    src_rect.x0 + u * src_rect.width(),
                    src_rect.y0 + v * src_rect.height(),
                )
            };
            let (s00, s10, s01, s11) = (s(u0, v0), s(u1, v0), s(u0, v1), s(u1, v1));
            let (d00, d10, d01, d11) = (
                bilinear(dst, u0, v0),
                bilinear(dst, u1, v0),
                bilinear(dst, u0, v1),
                bilinear(dst, u1, v1),
            );

            for (st, dt) in [
                ([s00, s10, s11], [d00, d10, d11]),
                ([s00, s11, s01], [d00, d11, d01]),
            ] {
                if draw_textured_triangle(layer, src, src_rect, st, dt) {
                    stats.drawn += 1;
                } else {
                    stats.skipped += 1;
                }
            }
        }
    }
    stats
}

/// Rasterize destination triangle `dst` with texels from `src`, clipped to the triangle and the
/// layer. Returns `false` when the triangle was skipped as degenerate.
pub fn draw_textured_triangle(
    layer: &mut Raster,
    src: &Raster,
    src_rect: Rect,
    src_tri: [Point; 3],
    dst: [Point; 3],
) -> bool {
    let Some(fwd) = solve_affine(src_tri, dst) else {
        return false;
    };
    if fwd.determinant().abs() < DEGENERATE_EPSILON {
        return false;
    }
    let inv = fwd.inverse();

    let area2 = cross(dst[0], dst[1], dst[2]);
    if area2.abs() < DEGENERATE_EPSILON {
        return false;
    }
    if layer.is_empty() || src.is_empty() {
        return true;
    }

    let min_x = dst.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = dst.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = dst.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = dst.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(layer.width);
    let y1 = (max_y.ceil().max(0.0) as u32).min(layer.height);

    let tol = -1e-9 * area2.abs();
    for y in y0..y1 {
        for x in x0..x1 {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let w0 = cross(dst[1], dst[2], p) * area2.signum();
            let w1 = cross(dst[2], dst[0], p) * area2.signum();
            let w2 = cross(dst[0], dst[1], p) * area2.signum();
            if w0 < tol || w1 < tol || w2 < tol {
                continue;
            }
            let px = sample_bilinear(src, src_rect, inv * p);
            let i = layer.index(x, y);
            layer.data[i..i + 4].copy_from_slice(&px);
        }
    }
    true
}

fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Bilinear texel fetch at `p` (pixel-center convention), clamped to `rect`.
fn sample_bilinear(src: &Raster, rect: Rect, p: Point) -> [u8; 4] {
    let lo_x = rect.x0.floor().max(0.0);
    let lo_y = rect.y0.floor().max(0.0);
    let hi_x = (rect.x1.ceil() - 1.0).min(f64::from(src.width) - 1.0).max(lo_x);
    let hi_y = (rect.y1.ceil() - 1.0).min(f64::from(src.height) - 1.0).max(lo_y);

    let fx = (p.x - 0.5).clamp(lo_x, hi_x);
    let fy = (p.y - 0.5).clamp(lo_y, hi_y);
    let (ix, iy) = (fx.floor(), fy.floor());
    let (tx, ty) = (fx - ix, fy - iy);
    let (ix, iy) = (ix as u32, iy as u32);
    let ix1 = (ix + 1).min(hi_x as u32);
    let iy1 = (iy + 1).min(hi_y as u32);

    let p00 = src.px(ix, iy);
    let p10 = src.px(ix1, iy);
    let p01 = src.px(ix, iy1);
    let p11 = src.px(ix1, iy1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - tx) + f64::from(p10[c]) * tx;
        let bottom = f64::from(p01[c]) * (1.0 - tx) + f64::from(p11[c]) * tx;
        out[c] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/warp.rs"]
mod tests;
