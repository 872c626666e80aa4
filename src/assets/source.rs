use crate::foundation::core::Raster;

/// Anything that can be warped into a region: still images, animations, video.
///
/// `frame_at` returns `None` while the content is not ready (e.g. a video that has not decoded
/// its first frame); the compositor then skips the art layer for that render.
pub trait ContentSource {
    /// Intrinsic width in pixels.
    fn width(&self) -> u32;
    /// Intrinsic height in pixels.
    fn height(&self) -> u32;
    /// Raster to show at `time_s` seconds.
    fn frame_at(&self, time_s: f64) -> Option<&Raster>;
}

/// A single decoded image.
#[derive(Clone, Debug)]
pub struct StillImage {
    raster: Raster,
}

impl StillImage {
    /// Wrap a decoded raster.
    pub fn new(raster: Raster) -> Self {
        Self { raster }
    }
}

impl ContentSource for StillImage {
    fn width(&self) -> u32 {
        self.raster.width
    }

    fn height(&self) -> u32 {
        self.raster.height
    }

    fn frame_at(&self, _time_s: f64) -> Option<&Raster> {
        Some(&self.raster)
    }
}

/// Timed frames played on a loop (animated GIF/APNG style).
#[derive(Clone, Debug, Default)]
pub struct FrameSequence {
    frames: Vec<(Raster, f64)>,
    total_s: f64,
}

impl FrameSequence {
    /// Empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame shown for `delay_s` seconds. Negative or non-finite delays count as zero.
    pub fn push(&mut self, raster: Raster, delay_s: f64) {
        let delay_s = if delay_s.is_finite() { delay_s.max(0.0) } else { 0.0 };
        self.total_s += delay_s;
        self.frames.push((raster, delay_s));
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Loop length in seconds.
    pub fn duration_s(&self) -> f64 {
        self.total_s
    }

    /// Index of the frame visible at `time_s`.
    pub fn index_at(&self, time_s: f64) -> Option<usize> {
        if self.frames.is_empty() {
            return None;
        }
        if self.total_s <= 0.0 || !time_s.is_finite() {
            return Some(0);
        }
        let mut t = time_s.rem_euclid(self.total_s);
        for (i, (_, delay)) in self.frames.iter().enumerate() {
            if t < *delay {
                return Some(i);
            }
            t -= delay;
        }
        Some(self.frames.len() - 1)
    }
}

impl ContentSource for FrameSequence {
    fn width(&self) -> u32 {
        self.frames.first().map_or(0, |(r, _)| r.width)
    }

    fn height(&self) -> u32 {
        self.frames.first().map_or(0, |(r, _)| r.height)
    }

    fn frame_at(&self, time_s: f64) -> Option<&Raster> {
        self.index_at(time_s).map(|i| &self.frames[i].0)
    }
}

/// Content with known dimensions whose frames are not available yet.
#[derive(Clone, Copy, Debug)]
pub struct PendingSource {
    /// Announced width.
    pub width: u32,
    /// Announced height.
    pub height: u32,
}

impl ContentSource for PendingSource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn frame_at(&self, _time_s: f64) -> Option<&Raster> {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
