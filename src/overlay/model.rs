use crate::foundation::error::WallArtResult;
use crate::region::model::WallRegion;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Paint color used when a paint config is first created.
pub const DEFAULT_PAINT_COLOR: &str = "#808080";

/// Where a paint color came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSource {
    /// Sampled from the frame with the eyedropper.
    Eyedropper,
    /// Chosen in a color picker.
    #[default]
    Picker,
    /// Produced by dominant-color detection.
    AiDetected,
}

/// Flat color fill rendered beneath the art layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintConfig {
    /// Whether the paint layer renders.
    pub enabled: bool,
    /// `#RRGGBB` hex color.
    pub color: String,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f32,
    /// Provenance of `color`.
    #[serde(default)]
    pub color_source: ColorSource,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color: DEFAULT_PAINT_COLOR.to_owned(),
            opacity: 1.0,
            color_source: ColorSource::Picker,
        }
    }
}

/// Kind of content behind an [`ArtConfig::src`] handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    /// Still image.
    #[default]
    Image,
    /// Animated frame sequence.
    Gif,
    /// Video stream.
    Video,
}

/// How source content is fitted into the region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AspectRatioMode {
    /// Use the whole source, distorting it to the region.
    #[default]
    Stretch,
    /// Currently renders exactly like `Stretch` (no letterboxing).
    Fit,
    /// Center-crop the source to the region's bounding-box aspect ratio.
    Crop,
}

/// Image/animation/video content rendered on top of the paint layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtConfig {
    /// Opaque handle for the content; an empty handle means "no art".
    pub src: String,
    /// Content kind.
    #[serde(default)]
    pub content_type: ContentType,
    /// Fitting mode.
    #[serde(default)]
    pub aspect_ratio_mode: AspectRatioMode,
    /// Layer opacity in `[0, 1]`.
    #[serde(default = "one")]
    pub opacity: f32,
}

fn one() -> f32 {
    1.0
}

/// One user-placed region with its paint and art configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallArtOverlay {
    /// Stable identifier; also the key for loaded sources.
    pub id: String,
    /// Placement in percentage space.
    pub region: WallRegion,
    /// Optional color fill.
    #[serde(default)]
    pub paint: Option<PaintConfig>,
    /// Optional content layer.
    #[serde(default)]
    pub art: Option<ArtConfig>,
    /// Inactive overlays are skipped by the renderer.
    #[serde(default = "yes")]
    pub active: bool,
    /// Creation time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: u64,
    /// Last mutation time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub updated_at: u64,
}

fn yes() -> bool {
    true
}

impl WallArtOverlay {
    /// New active overlay with the default region and no layers.
    pub fn new(id: impl Into<String>, now_ms: u64) -> Self {
        Self {
            id: id.into(),
            region: WallRegion::default(),
            paint: None,
            art: None,
            active: true,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Mutable paint config, created with the defaults on first use.
    pub fn paint_mut(&mut self, now_ms: u64) -> &mut PaintConfig {
        self.updated_at = now_ms;
        self.paint.get_or_insert_with(PaintConfig::default)
    }

    /// Replace the region.
    pub fn set_region(&mut self, region: WallRegion, now_ms: u64) {
        self.region = region;
        self.updated_at = now_ms;
    }

    /// Replace the art layer.
    pub fn set_art(&mut self, art: ArtConfig, now_ms: u64) {
        self.art = Some(art);
        self.updated_at = now_ms;
    }

    /// Remove the art layer.
    pub fn clear_art(&mut self, now_ms: u64) {
        self.art = None;
        self.updated_at = now_ms;
    }

    /// Toggle rendering.
    pub fn set_active(&mut self, active: bool, now_ms: u64) {
        self.active = active;
        self.updated_at = now_ms;
    }

    /// Enabled paint layer, if any.
    pub fn enabled_paint(&self) -> Option<&PaintConfig> {
        self.paint.as_ref().filter(|p| p.enabled)
    }

    /// Art layer with a non-empty source handle, if any.
    pub fn renderable_art(&self) -> Option<&ArtConfig> {
        self.art.as_ref().filter(|a| !a.src.trim().is_empty())
    }

    /// Active and carrying at least one renderable layer.
    pub fn has_renderable_content(&self) -> bool {
        self.active && (self.enabled_paint().is_some() || self.renderable_art().is_some())
    }
}

/// Parse an overlay list from JSON text.
pub fn parse_overlays_json(text: &str) -> WallArtResult<Vec<WallArtOverlay>> {
    Ok(serde_json::from_str(text)?)
}

/// Read and parse an overlay list from a JSON file.
pub fn load_overlays_json(path: impl AsRef<Path>) -> WallArtResult<Vec<WallArtOverlay>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        anyhow::Error::new(e).context(format!("read overlays '{}'", path.display()))
    })?;
    parse_overlays_json(&text)
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/model.rs"]
mod tests;
