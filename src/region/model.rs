//! Quadrilateral regions in percentage space.
//!
//! Regions are plain values: every operation takes a region by value or reference and returns a
//! new one. Corner ordering for polygon queries is `[topLeft, topRight, bottomRight, bottomLeft]`.

use crate::foundation::core::Point;
use serde::{Deserialize, Serialize};

/// Smallest allowed region extent, in percentage units.
pub const MIN_REGION_SIZE: f64 = 5.0;

/// One of the four named corners of a [`WallRegion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Corner {
    /// Upper-left corner.
    TopLeft,
    /// Upper-right corner.
    TopRight,
    /// Lower-left corner.
    BottomLeft,
    /// Lower-right corner.
    BottomRight,
}

impl Corner {
    /// Hit-test order used by [`find_corner_at_point`].
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// The camelCase name used in serialized regions.
    pub fn name(self) -> &'static str {
        match self {
            Corner::TopLeft => "topLeft",
            Corner::TopRight => "topRight",
            Corner::BottomLeft => "bottomLeft",
            Corner::BottomRight => "bottomRight",
        }
    }
}

/// A four-corner quadrilateral.
///
/// Shape invariants are checked by [`validate`], not by construction: editing can produce
/// inverted or self-crossing quads.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallRegion {
    /// Upper-left corner.
    pub top_left: Point,
    /// Upper-right corner.
    pub top_right: Point,
    /// Lower-left corner.
    pub bottom_left: Point,
    /// Lower-right corner.
    pub bottom_right: Point,
}

impl Default for WallRegion {
    fn default() -> Self {
        create_default_region(25.0, 25.0, 50.0, 50.0)
    }
}

impl WallRegion {
    /// Read one corner.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }

    /// Copy of this region with `corner` replaced (no clamping).
    pub fn with_corner(mut self, corner: Corner, p: Point) -> Self {
        match corner {
            Corner::TopLeft => self.top_left = p,
            Corner::TopRight => self.top_right = p,
            Corner::BottomLeft => self.bottom_left = p,
            Corner::BottomRight => self.bottom_right = p,
        }
        self
    }

    /// Corners in polygon order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners_clockwise(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Every corner except `corner`, in [`Corner::ALL`] order.
    pub fn other_corners(&self, corner: Corner) -> Vec<Point> {
        Corner::ALL
            .into_iter()
            .filter(|c| *c != corner)
            .map(|c| self.corner(c))
            .collect()
    }

    fn map_points(self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_left: f(self.bottom_left),
            bottom_right: f(self.bottom_right),
        }
    }

    /// Return `true` when two opposite edges of the polygon cross.
    ///
    /// Containment, area and the perspective warp accept such quads and return whatever the
    /// fixed corner ordering yields; editors can use this to reject them instead.
    pub fn is_self_intersecting(&self) -> bool {
        let [a, b, c, d] = self.corners_clockwise();
        segments_cross(a, b, c, d) || segments_cross(b, c, d, a)
    }

    /// Same rules as [`validate`]: finite in-bounds corners, minimum bounding-box extent, and
    /// every edge ordered and at least [`MIN_REGION_SIZE`] long.
    pub fn is_structurally_valid(&self) -> bool {
        shape_errors(self).is_empty()
    }
}

/// Axis-aligned bounds of a region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Smallest x over the corners.
    pub min_x: f64,
    /// Smallest y over the corners.
    pub min_y: f64,
    /// Largest x over the corners.
    pub max_x: f64,
    /// Largest y over the corners.
    pub max_y: f64,
    /// `max_x - min_x`.
    pub width: f64,
    /// `max_y - min_y`.
    pub height: f64,
}

/// Outcome of [`validate`]: never an error, always a list of findings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `true` when `errors` is empty.
    pub valid: bool,
    /// Human-readable findings, one per violated rule.
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Axis-aligned rectangle with its top-left at `(x, y)`.
pub fn create_default_region(x: f64, y: f64, width: f64, height: f64) -> WallRegion {
    WallRegion {
        top_left: Point::new(x, y),
        top_right: Point::new(x + width, y),
        bottom_left: Point::new(x, y + height),
        bottom_right: Point::new(x + width, y + height),
    }
}

/// Check coordinate type, bounds and minimum extents.
pub fn validate(region: &WallRegion) -> ValidationReport {
    ValidationReport::from_errors(shape_errors(region))
}

fn shape_errors(region: &WallRegion) -> Vec<String> {
    let mut errors = Vec::new();

    for corner in Corner::ALL {
        let p = region.corner(corner);
        if !p.x.is_finite() || !p.y.is_finite() {
            errors.push(format!("{} must have finite numeric coordinates", corner.name()));
            continue;
        }
        if !(0.0..=100.0).contains(&p.x) || !(0.0..=100.0).contains(&p.y) {
            errors.push(format!(
                "{} is out of bounds ({:.2}, {:.2}); coordinates must be within 0-100",
                corner.name(),
                p.x,
                p.y
            ));
        }
    }
    if !errors.is_empty() {
        return errors;
    }

    let bb = bounding_box(region);
    if bb.width < MIN_REGION_SIZE {
        errors.push(format!(
            "region width {:.2} is below the minimum of {MIN_REGION_SIZE}",
            bb.width
        ));
    }
    if bb.height < MIN_REGION_SIZE {
        errors.push(format!(
            "region height {:.2} is below the minimum of {MIN_REGION_SIZE}",
            bb.height
        ));
    }

    let edges = [
        ("top", region.top_right.x - region.top_left.x),
        ("bottom", region.bottom_right.x - region.bottom_left.x),
        ("left", region.bottom_left.y - region.top_left.y),
        ("right", region.bottom_right.y - region.top_right.y),
    ];
    for (edge, span) in edges {
        if span < MIN_REGION_SIZE {
            errors.push(format!(
                "{edge} edge spans {span:.2}; corners must be ordered and at least {MIN_REGION_SIZE} apart"
            ));
        }
    }

    errors
}

/// Validate untyped input, reporting missing or non-numeric corners before shape checks.
pub fn validate_value(value: &serde_json::Value) -> ValidationReport {
    let Some(obj) = value.as_object() else {
        return ValidationReport::from_errors(vec!["region must be an object".to_owned()]);
    };

    let mut errors = Vec::new();
    for corner in Corner::ALL {
        match obj.get(corner.name()) {
            None | Some(serde_json::Value::Null) => {
                errors.push(format!("missing corner {}", corner.name()));
            }
            Some(v) => {
                let numeric = |k: &serde_json::Value| k.is_number();
                let ok = match v {
                    serde_json::Value::Array(xy) => xy.len() == 2 && xy.iter().all(numeric),
                    _ => v.get("x").is_some_and(numeric) && v.get("y").is_some_and(numeric),
                };
                if !ok {
                    errors.push(format!("{} must have numeric x and y", corner.name()));
                }
            }
        }
    }
    if !errors.is_empty() {
        return ValidationReport::from_errors(errors);
    }

    match serde_json::from_value::<WallRegion>(value.clone()) {
        Ok(region) => validate(&region),
        Err(e) => ValidationReport::from_errors(vec![format!("malformed region: {e}")]),
    }
}

/// Scale percentage coordinates to pixels.
pub fn to_pixel_space(region: &WallRegion, width: f64, height: f64) -> WallRegion {
    region.map_points(|p| Point::new(p.x / 100.0 * width, p.y / 100.0 * height))
}

/// Scale pixel coordinates back to percentages. Inverse of [`to_pixel_space`].
pub fn to_percent_space(region: &WallRegion, width: f64, height: f64) -> WallRegion {
    region.map_points(|p| Point::new(p.x / width * 100.0, p.y / height * 100.0))
}

/// Min/max over the four corners.
pub fn bounding_box(region: &WallRegion) -> BoundingBox {
    let pts = region.corners_clockwise();
    let min_x = pts.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = pts.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = pts.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

/// Even-odd containment test.
pub fn point_in_region(point: Point, region: &WallRegion) -> bool {
    polygon_contains(&region.corners_clockwise(), point.x, point.y)
}

pub(crate) fn polygon_contains(poly: &[Point], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (pi, pj) = (poly[i], poly[j]);
        if (pi.y > y) != (pj.y > y) && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// First corner (in [`Corner::ALL`] order) within `threshold` of `point`.
pub fn find_corner_at_point(point: Point, region: &WallRegion, threshold: f64) -> Option<Corner> {
    Corner::ALL
        .into_iter()
        .find(|c| region.corner(*c).distance(point) <= threshold)
}

/// Move one corner, clamping each axis into `[0, 100]`. Shape is not re-validated.
pub fn move_corner(region: &WallRegion, corner: Corner, new_position: Point) -> WallRegion {
    region.with_corner(corner, new_position.clamp_percent())
}

/// Translate the whole region, limiting the delta so the bounding box stays on-frame.
pub fn move_region(region: &WallRegion, dx: f64, dy: f64) -> WallRegion {
    let bb = bounding_box(region);
    let dx = clamp_delta(dx, bb.min_x, bb.max_x);
    let dy = clamp_delta(dy, bb.min_y, bb.max_y);
    region.map_points(|p| Point::new(p.x + dx, p.y + dy))
}

fn clamp_delta(d: f64, min: f64, max: f64) -> f64 {
    if min + d < 0.0 {
        -min
    } else if max + d > 100.0 {
        100.0 - max
    } else {
        d
    }
}

/// Absolute shoelace area, in the square of the region's units.
pub fn area(region: &WallRegion) -> f64 {
    let pts = region.corners_clockwise();
    let mut sum = 0.0;
    for i in 0..pts.len() {
        let (a, b) = (pts[i], pts[(i + 1) % pts.len()]);
        sum += a.x * b.y - b.x * a.y;
    }
    (sum / 2.0).abs()
}

/// Bounding-box midpoint.
pub fn center(region: &WallRegion) -> Point {
    let bb = bounding_box(region);
    Point::new((bb.min_x + bb.max_x) / 2.0, (bb.min_y + bb.max_y) / 2.0)
}

fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
    fn orient(p: Point, q: Point, r: Point) -> f64 {
        (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
    }
    let (o1, o2) = (orient(a, b, c), orient(a, b, d));
    let (o3, o4) = (orient(c, d, a), orient(c, d, b));
    o1 * o2 < 0.0 && o3 * o4 < 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/region/model.rs"]
mod tests;
