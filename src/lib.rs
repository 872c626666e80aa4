//! Wallart places flat paint and perspective-warped artwork onto wall regions of camera frames.
//!
//! The engine is headless and frame-oriented:
//!
//! - Describe placements as [`WallArtOverlay`]s over percentage-space [`WallRegion`]s
//! - Edit corners with the [`SnapEngine`]
//! - Render a frame with a [`Compositor`], optionally occluded by a foreground mask
//! - Sample or estimate wall colors with [`sample_color`] and [`detect_dominant_color`]
//!
//! All rasters are premultiplied RGBA8 ([`Raster`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod color;
mod foundation;
mod overlay;
mod region;
mod render;
mod snap;

pub use crate::foundation::core::{Affine, Point, Raster};
pub use crate::foundation::error::{WallArtError, WallArtResult};

pub use crate::region::model::{
    BoundingBox, Corner, MIN_REGION_SIZE, ValidationReport, WallRegion, area, bounding_box,
    center, create_default_region, find_corner_at_point, move_corner, move_region,
    point_in_region, to_percent_space, to_pixel_space, validate, validate_value,
};

pub use crate::overlay::model::{
    ArtConfig, AspectRatioMode, ColorSource, ContentType, DEFAULT_PAINT_COLOR, PaintConfig,
    WallArtOverlay, load_overlays_json, parse_overlays_json,
};

pub use crate::color::convert::{
    Hsl, RgbColor, adjust_brightness, contrasting_text_color, hex_to_rgb, hsl_to_rgb, luminance,
    rgb_to_hex, rgb_to_hsl,
};
pub use crate::color::estimate::{
    DEFAULT_SAMPLE_SIZE, DominantColorOpts, KMEANS_ITERATIONS, detect_dominant_color,
    sample_color,
};

pub use crate::snap::engine::{
    EdgeHit, EdgeSource, SnapCandidate, SnapCandidates, SnapConfig, SnapEngine, SnapGuide,
    SnapKind, SnapResult,
};

pub use crate::assets::decode::{decode_gif_frames, decode_image, load_source};
pub use crate::assets::source::{ContentSource, FrameSequence, PendingSource, StillImage};

pub use crate::render::composite::{PremulRgba8, over, over_in_place, scale_brightness_in_place};
pub use crate::render::compositor::{Compositor, CompositorOpts, RenderStats};
pub use crate::render::mask::OcclusionMask;
pub use crate::render::warp::{DEFAULT_SUBDIVISIONS, DEGENERATE_EPSILON, WarpStats};
