use proxy_layout::*;

#[test]
fn test_default_options_validate() {
    assert!(RenderOptions::default().validate().is_ok());
}

#[test]
fn test_validation_rejects_empty_layout() {
    let mut options = RenderOptions::default();
    options.columns = 0;
    match options.validate() {
        Err(LayoutError::Config(msg)) => assert!(msg.contains("column")),
        _ => panic!("expected Config error"),
    }
}

#[test]
fn test_validation_rejects_nonpositive_card_size() {
    let mut options = RenderOptions::default();
    options.card_height_mm = 0.0;
    assert!(options.validate().is_err());
}

#[test]
fn test_validation_rejects_negative_bleed_and_spacing() {
    let mut options = RenderOptions::default();
    options.bleed_mm = -1.0;
    assert!(options.validate().is_err());

    let mut options = RenderOptions::default();
    options.column_spacing_mm = -0.5;
    assert!(options.validate().is_err());
}

#[test]
fn test_validation_rejects_oversized_grid() {
    let mut options = RenderOptions::default();
    options.rows = 4; // 4 * 88.9 mm > A4 height
    match options.validate() {
        Err(LayoutError::Config(msg)) => assert!(msg.contains("does not fit")),
        _ => panic!("expected Config error"),
    }
}

#[test]
fn test_landscape_page_can_fit_a_wider_grid() {
    let mut options = RenderOptions::default();
    options.columns = 4;
    options.rows = 2;
    assert!(options.validate().is_err());

    options.orientation = Orientation::Landscape;
    assert!(options.validate().is_ok());
}

#[test]
fn test_linked_spacing_uses_the_column_value() {
    let mut options = RenderOptions::default();
    options.column_spacing_mm = 2.0;
    options.row_spacing_mm = 9.0;

    options.spacing_linked = true;
    assert_eq!(options.spacing_mm(), (2.0, 2.0));

    options.spacing_linked = false;
    assert_eq!(options.spacing_mm(), (2.0, 9.0));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.json");

    let mut options = RenderOptions::default();
    options.columns = 2;
    options.bleed_mm = 3.0;
    options.backside.enabled = true;
    options.backside.flip_edge = FlipEdge::Top;
    options.guides.extended_guides = true;
    options.cards.push(CardEntry::new("angel.png", 4));
    options.cards[0].backside_short_edge = true;

    options.save(&path).await.unwrap();
    let loaded = RenderOptions::load(&path).await.unwrap();
    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_rejects_malformed_project() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    tokio::fs::write(&path, b"{ not json").await.unwrap();

    let result = RenderOptions::load(&path).await;
    assert!(matches!(result, Err(LayoutError::Config(_))));
}
