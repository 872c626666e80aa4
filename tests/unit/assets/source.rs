use super::*;

fn solid(v: u8) -> Raster {
    Raster::filled(2, 1, [v, v, v, 255])
}

#[test]
fn still_image_is_always_ready() {
    let img = StillImage::new(solid(7));
    assert_eq!((img.width(), img.height()), (2, 1));
    assert_eq!(img.frame_at(123.0).map(|r| r.data[0]), Some(7));
}

#[test]
fn sequence_picks_frame_by_time_and_loops() {
    let mut seq = FrameSequence::new();
    seq.push(solid(1), 0.1);
    seq.push(solid(2), 0.2);
    seq.push(solid(3), 0.1);
    assert!((seq.duration_s() - 0.4).abs() < 1e-12);

    assert_eq!(seq.index_at(0.0), Some(0));
    assert_eq!(seq.index_at(0.15), Some(1));
    assert_eq!(seq.index_at(0.35), Some(2));
    assert_eq!(seq.index_at(0.45), Some(0));
    assert_eq!(seq.frame_at(0.75).map(|r| r.data[0]), Some(3));
}

#[test]
fn zero_duration_sequence_shows_first_frame() {
    let mut seq = FrameSequence::new();
    seq.push(solid(9), 0.0);
    seq.push(solid(4), -1.0);
    assert_eq!(seq.index_at(5.0), Some(0));
    assert_eq!(FrameSequence::new().frame_at(0.0), None);
    assert_eq!(FrameSequence::new().width(), 0);
}

#[test]
fn pending_source_has_size_but_no_frame() {
    let p = PendingSource {
        width: 640,
        height: 360,
    };
    assert_eq!(p.width(), 640);
    assert!(p.frame_at(0.0).is_none());
}
