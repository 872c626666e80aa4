//! Snap assist for dragged region corners.
//!
//! Candidates come from three places: an optional edge detector, alignment with the region's
//! other corners, and a fixed grid. Each is ranked by `weight * (1 - distance / threshold)`.

use crate::foundation::core::Point;
use crate::region::model::{Corner, WallRegion};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Candidate list; one edge, two per other corner and one grid hit fit inline.
pub type SnapCandidates = SmallVec<[SnapCandidate; 8]>;

/// Snap tuning. Distances are in percentage units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapConfig {
    /// Maximum distance at which any candidate is offered.
    pub snap_threshold: f64,
    /// Grid spacing.
    pub grid_size: f64,
    /// Priority weight for detected edges.
    pub edge_weight: f64,
    /// Priority weight for corner alignment.
    pub align_weight: f64,
    /// Priority weight for grid intersections.
    pub grid_weight: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 3.0,
            grid_size: 5.0,
            edge_weight: 1.0,
            align_weight: 0.8,
            grid_weight: 0.5,
        }
    }
}

impl SnapConfig {
    /// Return a config with a different threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.snap_threshold = threshold;
        self
    }

    /// Return a config with a different grid spacing.
    pub fn with_grid_size(mut self, grid_size: f64) -> Self {
        self.grid_size = grid_size;
        self
    }
}

/// Nearest-edge answer from an edge detector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeHit {
    /// Closest point on the edge, percentage space.
    pub point: Point,
    /// Distance from the query point.
    pub distance: f64,
    /// Detector confidence.
    pub strength: f64,
}

/// Edge-detection collaborator. Optional: the engine works without one.
pub trait EdgeSource {
    /// Closest detected edge to `point`, if any.
    fn nearest_edge(&self, point: Point) -> Option<EdgeHit>;
}

/// Why a candidate was proposed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SnapKind {
    /// A detected edge.
    Edge {
        /// Detector confidence.
        strength: f64,
    },
    /// Same `x` as another corner.
    AlignVertical {
        /// The corner aligned with.
        with: Point,
    },
    /// Same `y` as another corner.
    AlignHorizontal {
        /// The corner aligned with.
        with: Point,
    },
    /// Nearest grid intersection.
    Grid,
}

impl SnapKind {
    /// Stable kebab-case label.
    pub fn label(&self) -> &'static str {
        match self {
            SnapKind::Edge { .. } => "edge",
            SnapKind::AlignVertical { .. } => "align-vertical",
            SnapKind::AlignHorizontal { .. } => "align-horizontal",
            SnapKind::Grid => "grid",
        }
    }
}

/// A proposed corrected position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapCandidate {
    /// Source of the proposal.
    pub kind: SnapKind,
    /// Position after snapping.
    pub point: Point,
    /// Rank in `[0, weight]`; higher wins.
    pub priority: f64,
    /// Distance from the raw point.
    pub distance: f64,
}

/// Result of applying a snap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    /// Final position.
    pub point: Point,
    /// Whether a candidate was used.
    pub snapped: bool,
    /// The winning candidate's kind.
    pub kind: Option<SnapKind>,
    /// Whether the region with `point` in place is structurally valid.
    pub valid: bool,
}

/// Renderable feedback for a candidate. Drawing is up to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum SnapGuide {
    /// A line segment in percentage space.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Candidate kind label.
        kind: &'static str,
    },
    /// A point marker.
    Marker {
        /// Marker position.
        at: Point,
        /// Candidate kind label.
        kind: &'static str,
    },
}

/// Stateless snap engine over a [`SnapConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapEngine {
    config: SnapConfig,
}

impl SnapEngine {
    /// Engine with the given tuning.
    pub fn new(config: SnapConfig) -> Self {
        Self { config }
    }

    /// Active tuning.
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    fn priority(&self, weight: f64, distance: f64) -> f64 {
        weight * (1.0 - distance / self.config.snap_threshold)
    }

    fn within(&self, distance: f64) -> bool {
        distance.is_finite() && distance <= self.config.snap_threshold
    }

    /// All candidates within the threshold, sorted by descending priority.
    pub fn get_snap_candidates(
        &self,
        point: Point,
        edges: Option<&dyn EdgeSource>,
        other_corners: &[Point],
    ) -> SnapCandidates {
        let cfg = &self.config;
        let mut out = SnapCandidates::new();
        if cfg.snap_threshold.is_nan() || cfg.snap_threshold <= 0.0 {
            return out;
        }

        if let Some(hit) = edges.and_then(|e| e.nearest_edge(point))
            && self.within(hit.distance)
        {
            out.push(SnapCandidate {
                kind: SnapKind::Edge {
                    strength: hit.strength,
                },
                point: hit.point,
                priority: self.priority(cfg.edge_weight, hit.distance),
                distance: hit.distance,
            });
        }

        for &corner in other_corners {
            let dx = (point.x - corner.x).abs();
            if self.within(dx) {
                out.push(SnapCandidate {
                    kind: SnapKind::AlignVertical { with: corner },
                    point: Point::new(corner.x, point.y),
                    priority: self.priority(cfg.align_weight, dx),
                    distance: dx,
                });
            }
            let dy = (point.y - corner.y).abs();
            if self.within(dy) {
                out.push(SnapCandidate {
                    kind: SnapKind::AlignHorizontal { with: corner },
                    point: Point::new(point.x, corner.y),
                    priority: self.priority(cfg.align_weight, dy),
                    distance: dy,
                });
            }
        }

        if cfg.grid_size > 0.0 {
            let g = cfg.grid_size;
            let grid = Point::new((point.x / g).round() * g, (point.y / g).round() * g);
            let d = point.distance(grid);
            if self.within(d) {
                out.push(SnapCandidate {
                    kind: SnapKind::Grid,
                    point: grid,
                    priority: self.priority(cfg.grid_weight, d),
                    distance: d,
                });
            }
        }

        out.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        out
    }

    /// Take the head of a sorted candidate list, or keep the raw point.
    pub fn apply_best_snap(&self, point: Point, candidates: &[SnapCandidate]) -> SnapResult {
        match candidates.first() {
            Some(best) => SnapResult {
                point: best.point,
                snapped: true,
                kind: Some(best.kind),
                valid: true,
            },
            None => SnapResult {
                point,
                snapped: false,
                kind: None,
                valid: true,
            },
        }
    }

    /// First candidate (in priority order) whose region passes [`crate::validate`].
    ///
    /// Falls back to the raw point with `snapped = false`; `valid` then reports whether the raw
    /// point itself passes. Further clamping is the caller's job.
    pub fn apply_snap_with_validation(
        &self,
        point: Point,
        candidates: &[SnapCandidate],
        region: &WallRegion,
        corner: Corner,
    ) -> SnapResult {
        for c in candidates {
            if region.with_corner(corner, c.point).is_structurally_valid() {
                return SnapResult {
                    point: c.point,
                    snapped: true,
                    kind: Some(c.kind),
                    valid: true,
                };
            }
        }
        SnapResult {
            point,
            snapped: false,
            kind: None,
            valid: region.with_corner(corner, point).is_structurally_valid(),
        }
    }

    /// Candidate list, snap and validation in one call for a dragged corner.
    pub fn snap_corner(
        &self,
        point: Point,
        region: &WallRegion,
        corner: Corner,
        edges: Option<&dyn EdgeSource>,
    ) -> SnapResult {
        let others = region.other_corners(corner);
        let candidates = self.get_snap_candidates(point, edges, &others);
        self.apply_snap_with_validation(point, &candidates, region, corner)
    }

    /// Guide primitives describing each candidate.
    pub fn get_snap_guides(&self, point: Point, candidates: &[SnapCandidate]) -> Vec<SnapGuide> {
        let mut guides = Vec::with_capacity(candidates.len() * 2);
        for c in candidates {
            let kind = c.kind.label();
            match c.kind {
                SnapKind::AlignVertical { with } => {
                    guides.push(SnapGuide::Line {
                        from: Point::new(with.x, 0.0),
                        to: Point::new(with.x, 100.0),
                        kind,
                    });
                    guides.push(SnapGuide::Marker { at: with, kind });
                }
                SnapKind::AlignHorizontal { with } => {
                    guides.push(SnapGuide::Line {
                        from: Point::new(0.0, with.y),
                        to: Point::new(100.0, with.y),
                        kind,
                    });
                    guides.push(SnapGuide::Marker { at: with, kind });
                }
                SnapKind::Edge { .. } => {
                    guides.push(SnapGuide::Line {
                        from: point,
                        to: c.point,
                        kind,
                    });
                    guides.push(SnapGuide::Marker { at: c.point, kind });
                }
                SnapKind::Grid => guides.push(SnapGuide::Marker { at: c.point, kind }),
            }
        }
        guides
    }
}

#[cfg(test)]
#[path = "../../tests/unit/snap/engine.rs"]
mod tests;
