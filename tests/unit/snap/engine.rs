use super::*;
use crate::region::model::{create_default_region, validate};
use serde_json::json;

struct FixedEdge(EdgeHit);

impl EdgeSource for FixedEdge {
    fn nearest_edge(&self, _point: Point) -> Option<EdgeHit> {
        Some(self.0)
    }
}

fn cand(x: f64, y: f64, priority: f64) -> SnapCandidate {
    SnapCandidate {
        kind: SnapKind::Grid,
        point: Point::new(x, y),
        priority,
        distance: 0.0,
    }
}

#[test]
fn grid_beats_farther_alignment_at_defaults() {
    let engine = SnapEngine::default();
    let cfg = *engine.config();
    let got = engine.get_snap_candidates(Point::new(6.0, 5.0), None, &[Point::new(8.0, 40.0)]);

    assert_eq!(got.len(), 2);
    let align = cfg.align_weight * (1.0 - 2.0 / cfg.snap_threshold);
    let grid = cfg.grid_weight * (1.0 - 1.0 / cfg.snap_threshold);
    assert!(align < grid);
    assert_eq!(got[0].kind, SnapKind::Grid);
    assert!((got[0].priority - grid).abs() < 1e-12);
    assert!((got[1].priority - align).abs() < 1e-12);
    assert_eq!(got[1].point, Point::new(8.0, 5.0));
}

#[test]
fn close_alignment_beats_grid() {
    let engine = SnapEngine::default();
    let got = engine.get_snap_candidates(Point::new(6.0, 5.0), None, &[Point::new(6.5, 40.0)]);
    assert!(matches!(got[0].kind, SnapKind::AlignVertical { .. }));
    assert!((got[0].priority - 0.8 * (1.0 - 0.5 / 3.0)).abs() < 1e-12);
    assert!(got.windows(2).all(|w| w[0].priority >= w[1].priority));
}

#[test]
fn candidates_beyond_threshold_are_dropped() {
    let engine = SnapEngine::new(SnapConfig::default().with_grid_size(50.0));
    let got = engine.get_snap_candidates(Point::new(20.0, 20.0), None, &[Point::new(80.0, 90.0)]);
    assert!(got.is_empty());
}

#[test]
fn edge_candidate_uses_detector_hit() {
    let engine = SnapEngine::new(SnapConfig::default().with_grid_size(50.0));
    let near = FixedEdge(EdgeHit {
        point: Point::new(32.5, 20.0),
        distance: 2.5,
        strength: 0.9,
    });
    let got = engine.get_snap_candidates(Point::new(30.0, 20.0), Some(&near), &[]);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].kind, SnapKind::Edge { strength: 0.9 });
    assert!((got[0].priority - (1.0 - 2.5 / 3.0)).abs() < 1e-12);

    let far = FixedEdge(EdgeHit {
        point: Point::new(34.0, 20.0),
        distance: 4.0,
        strength: 1.0,
    });
    assert!(
        engine
            .get_snap_candidates(Point::new(30.0, 20.0), Some(&far), &[])
            .is_empty()
    );
}

#[test]
fn best_snap_on_empty_list_keeps_point() {
    let engine = SnapEngine::default();
    let r = engine.apply_best_snap(Point::new(1.0, 2.0), &[]);
    assert_eq!(r.point, Point::new(1.0, 2.0));
    assert!(!r.snapped);
    assert_eq!(r.kind, None);

    let r = engine.apply_best_snap(Point::new(1.0, 2.0), &[cand(0.0, 0.0, 0.5)]);
    assert!(r.snapped);
    assert_eq!(r.point, Point::new(0.0, 0.0));
}

#[test]
fn validation_skips_candidates_that_break_the_region() {
    let engine = SnapEngine::default();
    let region = WallRegion::default();
    let candidates = [cand(80.0, 24.0, 0.9), cand(25.0, 25.0, 0.4)];
    let r = engine.apply_snap_with_validation(
        Point::new(24.0, 24.0),
        &candidates,
        &region,
        Corner::TopLeft,
    );
    assert!(r.snapped);
    assert!(r.valid);
    assert_eq!(r.point, Point::new(25.0, 25.0));
}

#[test]
fn validation_falls_back_to_raw_point() {
    let engine = SnapEngine::default();
    let region = WallRegion::default();

    let r = engine.apply_snap_with_validation(
        Point::new(24.0, 24.0),
        &[cand(80.0, 24.0, 0.9)],
        &region,
        Corner::TopLeft,
    );
    assert_eq!(r.point, Point::new(24.0, 24.0));
    assert!(!r.snapped);
    assert!(r.valid);

    let r = engine.apply_snap_with_validation(
        Point::new(90.0, 24.0),
        &[cand(80.0, 24.0, 0.9)],
        &region,
        Corner::TopLeft,
    );
    assert_eq!(r.point, Point::new(90.0, 24.0));
    assert!(!r.snapped);
    assert!(!r.valid);
}

#[test]
fn alignment_that_shortens_an_edge_is_refused() {
    let engine = SnapEngine::default();
    let region = create_default_region(10.0, 10.0, 50.0, 50.0);
    let r = engine.snap_corner(Point::new(10.0, 13.5), &region, Corner::BottomLeft, None);
    assert!(r.snapped);
    assert!(r.valid);
    assert_eq!(r.kind, Some(SnapKind::Grid));
    assert_eq!(r.point, Point::new(10.0, 15.0));
    assert!(validate(&region.with_corner(Corner::BottomLeft, r.point)).valid);
}

#[test]
fn snap_corner_aligns_with_nearest_corner() {
    let engine = SnapEngine::default();
    let r = engine.snap_corner(
        Point::new(26.0, 23.5),
        &WallRegion::default(),
        Corner::TopLeft,
        None,
    );
    assert!(r.snapped);
    assert_eq!(r.point, Point::new(25.0, 23.5));
    assert_eq!(
        r.kind,
        Some(SnapKind::AlignVertical {
            with: Point::new(25.0, 75.0)
        })
    );
}

#[test]
fn guides_describe_each_candidate() {
    let engine = SnapEngine::default();
    let point = Point::new(26.0, 23.5);
    let candidates =
        engine.get_snap_candidates(point, None, &WallRegion::default().other_corners(Corner::TopLeft));
    let guides = engine.get_snap_guides(point, &candidates);

    assert!(guides.contains(&SnapGuide::Line {
        from: Point::new(25.0, 0.0),
        to: Point::new(25.0, 100.0),
        kind: "align-vertical",
    }));
    assert!(guides.contains(&SnapGuide::Marker {
        at: Point::new(25.0, 25.0),
        kind: "grid",
    }));
}

#[test]
fn snap_kind_serializes_with_type_tag() {
    let v = serde_json::to_value(SnapKind::AlignHorizontal {
        with: Point::new(1.0, 2.0),
    })
    .unwrap();
    assert_eq!(v, json!({"type": "align-horizontal", "with": {"x": 1.0, "y": 2.0}}));
}
