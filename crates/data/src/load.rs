use crate::schema::{Card, CatalogFile, GameConfig};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::info;

pub const CATALOG_FILE: &str = "cards.json";

pub fn load_catalog(path: &Path) -> anyhow::Result<Vec<Card>> {
    let file: CatalogFile = load_json(path)?;
    let cards = file.into_cards();
    validate_catalog(&cards).with_context(|| format!("validate {}", path.display()))?;
    info!(cards = cards.len(), path = %path.display(), "catalog loaded");
    Ok(cards)
}

pub fn load_catalog_dir(dir: &Path) -> anyhow::Result<Vec<Card>> {
    load_catalog(&dir.join(CATALOG_FILE))
}

pub fn parse_catalog(raw: &str) -> anyhow::Result<Vec<Card>> {
    let file: CatalogFile = serde_json::from_str(raw).context("parse catalog")?;
    let cards = file.into_cards();
    validate_catalog(&cards)?;
    Ok(cards)
}

pub fn validate_catalog(cards: &[Card]) -> anyhow::Result<()> {
    if cards.is_empty() {
        bail!("catalog has no cards");
    }
    for (idx, card) in cards.iter().enumerate() {
        if card.text.trim().is_empty() {
            bail!("card {idx} ({}) has no text", card.kind);
        }
    }
    Ok(())
}

pub fn load_config(path: &Path) -> anyhow::Result<GameConfig> {
    let config: GameConfig = load_json(path)?;
    config
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CardType;

    #[test]
    fn parses_bare_and_wrapped_catalogs() {
        let bare = r#"[{ "type": "Heart", "text": "Compliment someone", "points": 1 }]"#;
        let wrapped = r#"{ "cards": [{ "type": "Ego", "text": "Brag", "points": 2 }] }"#;
        assert_eq!(parse_catalog(bare).expect("bare")[0].kind, CardType::Heart);
        assert_eq!(parse_catalog(wrapped).expect("wrapped")[0].points, 2);
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let err = parse_catalog("[]").unwrap_err();
        assert!(err.to_string().contains("no cards"));
    }

    #[test]
    fn unknown_card_type_is_an_error() {
        let raw = r#"[{ "type": "Joker", "text": "?", "points": 1 }]"#;
        assert!(parse_catalog(raw).is_err());
    }

    #[test]
    fn blank_text_is_an_error() {
        let raw = r#"[{ "type": "Soul", "text": "  ", "points": 1 }]"#;
        let err = parse_catalog(raw).unwrap_err();
        assert!(err.to_string().contains("card 0"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_catalog(Path::new("does/not/exist.json")).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.json"));
    }
}
