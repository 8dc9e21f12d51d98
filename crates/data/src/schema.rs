use serde::{Deserialize, Serialize};

pub use partydeck_core::{Card, CardType, GameConfig, PointThreshold, ResolutionMode, WinCondition};

/// A catalog file is either a bare list of cards or an object with a
/// `cards` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogFile {
    Bare(Vec<Card>),
    Pack { cards: Vec<Card> },
}

impl CatalogFile {
    pub fn into_cards(self) -> Vec<Card> {
        match self {
            CatalogFile::Bare(cards) => cards,
            CatalogFile::Pack { cards } => cards,
        }
    }
}
