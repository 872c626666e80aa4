use super::*;
use serde_json::json;

#[test]
fn paint_is_created_lazily_with_gray_defaults() {
    let mut ov = WallArtOverlay::new("a", 10);
    assert!(ov.paint.is_none());

    let paint = ov.paint_mut(20);
    assert_eq!(paint.color, "#808080");
    assert_eq!(paint.opacity, 1.0);
    paint.enabled = true;

    assert_eq!(ov.updated_at, 20);
    assert_eq!(ov.created_at, 10);
    assert!(ov.enabled_paint().is_some());
}

#[test]
fn renderable_content_requires_active_and_non_empty_layer() {
    let mut ov = WallArtOverlay::new("a", 0);
    assert!(!ov.has_renderable_content());

    ov.set_art(
        ArtConfig {
            src: "  ".to_owned(),
            content_type: ContentType::Image,
            aspect_ratio_mode: AspectRatioMode::Stretch,
            opacity: 1.0,
        },
        1,
    );
    assert!(!ov.has_renderable_content());

    ov.art.as_mut().unwrap().src = "poster.png".to_owned();
    assert!(ov.has_renderable_content());

    ov.set_active(false, 2);
    assert!(!ov.has_renderable_content());
}

#[test]
fn disabled_paint_is_not_renderable() {
    let mut ov = WallArtOverlay::new("a", 0);
    ov.paint_mut(1);
    assert!(!ov.has_renderable_content());
}

#[test]
fn overlay_json_uses_camel_case_and_kebab_enums() {
    let v = json!([{
        "id": "wall-1",
        "region": {
            "topLeft": [10, 10], "topRight": [60, 12],
            "bottomLeft": [10, 70], "bottomRight": [62, 68]
        },
        "paint": {"enabled": true, "color": "#112233", "opacity": 0.5, "colorSource": "ai-detected"},
        "art": {"src": "clip.gif", "contentType": "gif", "aspectRatioMode": "crop"},
        "createdAt": 5
    }]);
    let list = parse_overlays_json(&v.to_string()).unwrap();
    let ov = &list[0];
    assert!(ov.active);
    assert_eq!(ov.paint.as_ref().unwrap().color_source, ColorSource::AiDetected);
    let art = ov.art.as_ref().unwrap();
    assert_eq!(art.content_type, ContentType::Gif);
    assert_eq!(art.aspect_ratio_mode, AspectRatioMode::Crop);
    assert_eq!(art.opacity, 1.0);

    let back = serde_json::to_value(ov).unwrap();
    assert_eq!(back["paint"]["colorSource"], json!("ai-detected"));
    assert_eq!(back["createdAt"], json!(5));
}

#[test]
fn malformed_overlay_json_is_a_serde_error() {
    let err = parse_overlays_json("[{\"id\": 1}]").unwrap_err();
    assert!(err.to_string().contains("serialization error"));
}
