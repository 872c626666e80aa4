use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use image::AnimationDecoder;

use crate::assets::source::{ContentSource, FrameSequence, StillImage};
use crate::foundation::core::Raster;
use crate::foundation::error::WallArtResult;

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> WallArtResult<Raster> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_straight(width, height, rgba.into_raw())
}

/// Decode every frame of an animated GIF, keeping per-frame delays.
pub fn decode_gif_frames(bytes: &[u8]) -> WallArtResult<FrameSequence> {
    let decoder =
        image::codecs::gif::GifDecoder::new(Cursor::new(bytes)).context("open gif decoder")?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .context("decode gif frames")?;

    let mut seq = FrameSequence::new();
    for frame in frames {
        let (num, den) = frame.delay().numer_denom_ms();
        let delay_s = if den == 0 {
            0.0
        } else {
            f64::from(num) / f64::from(den) / 1000.0
        };
        let buf = frame.into_buffer();
        let (width, height) = buf.dimensions();
        seq.push(Raster::from_straight(width, height, buf.into_raw())?, delay_s);
    }
    Ok(seq)
}

/// Read a content file, picking a frame sequence for `.gif` and a still image otherwise.
pub fn load_source(path: &Path) -> WallArtResult<Box<dyn ContentSource>> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    let is_gif = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"));

    if is_gif {
        let seq = decode_gif_frames(&bytes)?;
        tracing::debug!(path = %path.display(), frames = seq.len(), "loaded frame sequence");
        return Ok(Box::new(seq));
    }
    Ok(Box::new(StillImage::new(decode_image(&bytes)?)))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
