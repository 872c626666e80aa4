use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WallArtError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WallArtError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        WallArtError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WallArtError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = WallArtError::from(parse);
    assert!(matches!(err, WallArtError::Serde(_)));
}
