use partydeck_core::{CardType, EventBus, Phase, PointThreshold, ResolutionMode, Session};
use partydeck_data::{load_catalog, load_catalog_dir, load_config};
use std::fs;
use std::path::PathBuf;

fn assets_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets")
}

#[test]
fn bundled_catalog_covers_every_type() {
    let cards = load_catalog_dir(&assets_root()).expect("load catalog");
    assert_eq!(cards.len(), 28);
    for kind in CardType::ALL {
        assert!(cards.iter().any(|card| card.kind == kind), "{kind} missing");
    }
    assert!(cards
        .iter()
        .any(|card| card.kind == CardType::ActOut && card.requires_spinner));
    assert!(cards
        .iter()
        .any(|card| card.kind == CardType::Mind && card.countdown().is_some()));
}

#[test]
fn bundled_config_starts_a_game() {
    let config = load_config(&assets_root().join("config.json")).expect("load config");
    assert_eq!(config.point_threshold, PointThreshold::Fifteen);
    assert_eq!(config.resolution, ResolutionMode::Manual);
    assert_eq!(config.couples, vec![(0, 1), (2, 3)]);

    let cards = load_catalog_dir(&assets_root()).expect("load catalog");
    let total = cards.len();
    let mut session = Session::new(cards, 1);
    let mut events = EventBus::default();
    session.start(config, &mut events).expect("start");
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.deck().remaining(), total);
    assert_eq!(session.roster().couples().len(), 2);
}

#[test]
fn config_with_empty_selection_fails_validation() {
    let dir = std::env::temp_dir().join(format!("partydeck-config-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("config.json");
    fs::write(&path, r#"{ "players": ["Solo"], "selected_types": [] }"#).expect("write");
    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("card type"));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_catalog_is_not_an_empty_deck() {
    let dir = std::env::temp_dir().join(format!("partydeck-catalog-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("cards.json");
    fs::write(&path, "{ not json").expect("write");
    let err = load_catalog(&path).unwrap_err();
    assert!(format!("{err:#}").contains("parse"));
    fs::remove_dir_all(&dir).ok();
}
