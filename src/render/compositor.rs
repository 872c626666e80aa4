//! Overlay compositor: paint fill, perspective-warped art, occlusion and opacity blend.
//!
//! Each overlay renders up to two temporary layers the size of the output frame (paint, then
//! art). Every layer is cut by the occlusion mask before it is blended onto the output, so a
//! person in front of the wall occludes paint and art consistently.

use crate::assets::source::ContentSource;
use crate::color::convert::{adjust_brightness, hex_to_rgb};
use crate::foundation::core::Raster;
use crate::foundation::error::WallArtResult;
use crate::overlay::model::{ArtConfig, PaintConfig, WallArtOverlay};
use crate::region::model::{WallRegion, bounding_box, polygon_contains, to_pixel_space};
use crate::render::composite::{over_in_place, scale_brightness_in_place};
use crate::render::mask::OcclusionMask;
use crate::render::warp::{DEFAULT_SUBDIVISIONS, WarpStats, source_rect, warp_into_quad};
use rayon::prelude::*;
use std::collections::HashMap;

/// Regions whose pixel-space bounding box is thinner than this render nothing.
const MIN_PIXEL_EXTENT: f64 = 1e-6;

/// Compositor settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositorOpts {
    /// Warp grid subdivisions per axis.
    pub subdivisions: u32,
    /// Gaussian feather applied to the occlusion mask, in pixels.
    pub feather_radius: f32,
    /// Multiplier on paint and art color channels.
    pub brightness: f32,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            subdivisions: DEFAULT_SUBDIVISIONS,
            feather_radius: 0.0,
            brightness: 1.0,
        }
    }
}

impl CompositorOpts {
    /// Return options with a different warp subdivision.
    pub fn with_subdivisions(mut self, subdivisions: u32) -> Self {
        self.subdivisions = subdivisions;
        self
    }

    /// Return options with a different mask feather radius.
    pub fn with_feather_radius(mut self, radius: f32) -> Self {
        self.feather_radius = radius;
        self
    }

    /// Return options with a different brightness multiplier.
    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }
}

/// Counters from one render call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Overlays that passed the activity/content filter.
    pub overlays_rendered: u32,
    /// Paint and art layers that covered at least one pixel.
    pub layers_drawn: u32,
    /// Warp triangles rasterized.
    pub triangles_drawn: u32,
    /// Warp triangles skipped as degenerate.
    pub triangles_skipped: u32,
}

impl RenderStats {
    fn absorb(&mut self, other: RenderStats) {
        self.overlays_rendered += other.overlays_rendered;
        self.layers_drawn += other.layers_drawn;
        self.triangles_drawn += other.triangles_drawn;
        self.triangles_skipped += other.triangles_skipped;
    }
}

/// Renders overlays onto frame rasters.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    opts: CompositorOpts,
}

impl Compositor {
    /// Create a compositor with `opts`.
    pub fn new(opts: CompositorOpts) -> Self {
        Self { opts }
    }

    /// Active settings.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Flat fill of the pixel-space quad `region`, at full alpha.
    ///
    /// Returns `None` when the paint color is not a valid hex string.
    pub fn render_paint_layer(
        &self,
        paint: &PaintConfig,
        region: &WallRegion,
        width: u32,
        height: u32,
    ) -> Option<Raster> {
        let Some(color) = hex_to_rgb(&paint.color) else {
            tracing::debug!(color = %paint.color, "unparseable paint color");
            return None;
        };
        let color = adjust_brightness(color, f64::from(self.opts.brightness));
        let px = color.to_premul_rgba8(255);

        let mut layer = Raster::transparent(width, height);
        if layer.is_empty() || is_degenerate(region) {
            return Some(layer);
        }
        let poly = region.corners_clockwise();
        let stride = layer.stride();
        layer
            .data
            .par_chunks_exact_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                let cy = y as f64 + 0.5;
                for (x, dst) in row.chunks_exact_mut(4).enumerate() {
                    if polygon_contains(&poly, x as f64 + 0.5, cy) {
                        dst.copy_from_slice(&px);
                    }
                }
            });
        Some(layer)
    }

    /// Warp the current frame of `source` into the pixel-space quad `region`.
    ///
    /// `None` when the source has no frame ready or has zero size. A degenerate region yields a
    /// transparent layer.
    pub fn render_art_layer(
        &self,
        art: &ArtConfig,
        source: &dyn ContentSource,
        region: &WallRegion,
        width: u32,
        height: u32,
        time_s: f64,
    ) -> Option<(Raster, WarpStats)> {
        let Some(frame) = source.frame_at(time_s) else {
            tracing::debug!(src = %art.src, "source not ready");
            return None;
        };
        if frame.is_empty() {
            tracing::debug!(src = %art.src, "zero-size source");
            return None;
        }

        let mut layer = Raster::transparent(width, height);
        if layer.is_empty() || is_degenerate(region) {
            tracing::debug!(src = %art.src, "degenerate region");
            return Some((layer, WarpStats::default()));
        }

        let rect = source_rect(art.aspect_ratio_mode, frame.width, frame.height, region);
        let stats = warp_into_quad(&mut layer, frame, rect, region, self.opts.subdivisions);
        tracing::trace!(
            src = %art.src,
            drawn = stats.drawn,
            skipped = stats.skipped,
            "art warped"
        );
        scale_brightness_in_place(&mut layer.data, self.opts.brightness);
        Some((layer, stats))
    }

    /// Render one overlay (paint, then art) onto `output`.
    pub fn composite_overlay(
        &self,
        output: &mut Raster,
        overlay: &WallArtOverlay,
        source: Option<&dyn ContentSource>,
        mask: Option<&OcclusionMask>,
        time_s: f64,
    ) -> WallArtResult<RenderStats> {
        let mut stats = RenderStats::default();
        let (w, h) = (output.width, output.height);
        let region = to_pixel_space(&overlay.region, f64::from(w), f64::from(h));

        if let Some(paint) = overlay.enabled_paint()
            && let Some(layer) = self.render_paint_layer(paint, &region, w, h)
        {
            if layer.data.chunks_exact(4).any(|px| px[3] != 0) {
                blend_layer(output, layer, mask, paint.opacity)?;
                stats.layers_drawn += 1;
            } else {
                tracing::debug!(id = %overlay.id, "paint layer covers no pixels");
            }
        }

        if let Some(art) = overlay.renderable_art() {
            match source {
                Some(source) => {
                    if let Some((layer, warp)) =
                        self.render_art_layer(art, source, &region, w, h, time_s)
                    {
                        stats.triangles_drawn += warp.drawn;
                        stats.triangles_skipped += warp.skipped;
                        if warp.drawn > 0 {
                            blend_layer(output, layer, mask, art.opacity)?;
                            stats.layers_drawn += 1;
                        }
                    }
                }
                None => tracing::debug!(id = %overlay.id, "no source loaded for art"),
            }
        }
        Ok(stats)
    }

    /// Render `overlays` onto `output` in list order; later overlays draw on top.
    ///
    /// `sources` maps overlay ids to their loaded content. `mask` is the foreground coverage
    /// (alpha channel) at any resolution; it is scaled to the output and feathered once.
    #[tracing::instrument(skip_all, fields(count = overlays.len()))]
    pub fn render_overlays(
        &self,
        output: &mut Raster,
        overlays: &[WallArtOverlay],
        sources: &HashMap<String, Box<dyn ContentSource>>,
        mask: Option<&Raster>,
        time_s: f64,
    ) -> WallArtResult<RenderStats> {
        let mask = match mask {
            Some(m) if !m.is_empty() => Some(OcclusionMask::prepare(
                m,
                output.width,
                output.height,
                self.opts.feather_radius,
            )?),
            Some(_) => {
                tracing::debug!("empty occlusion mask ignored");
                None
            }
            None => None,
        };

        let mut stats = RenderStats::default();
        for overlay in overlays {
            if !overlay.has_renderable_content() {
                tracing::debug!(id = %overlay.id, active = overlay.active, "overlay skipped");
                continue;
            }
            let source = sources.get(&overlay.id).map(|s| s.as_ref());
            let one = self.composite_overlay(output, overlay, source, mask.as_ref(), time_s)?;
            stats.absorb(RenderStats {
                overlays_rendered: 1,
                ..one
            });
        }
        tracing::debug!(
            rendered = stats.overlays_rendered,
            layers = stats.layers_drawn,
            "overlays composited"
        );
        Ok(stats)
    }
}

fn blend_layer(
    output: &mut Raster,
    mut layer: Raster,
    mask: Option<&OcclusionMask>,
    opacity: f32,
) -> WallArtResult<()> {
    if let Some(mask) = mask {
        mask.cut(&mut layer)?;
    }
    over_in_place(&mut output.data, &layer.data, opacity)
}

/// Collapsed or non-finite quads. Self-intersecting quads are not degenerate even when their
/// signed area cancels out.
fn is_degenerate(region: &WallRegion) -> bool {
    let bb = bounding_box(region);
    !(bb.width.is_finite() && bb.height.is_finite())
        || bb.width < MIN_PIXEL_EXTENT
        || bb.height < MIN_PIXEL_EXTENT
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
