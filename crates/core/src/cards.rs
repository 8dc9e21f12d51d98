use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardType {
    Heart,
    Mind,
    Soul,
    Ego,
    ActOut,
    Penalty,
    Wildcard,
}

impl CardType {
    pub const ALL: [CardType; 7] = [
        CardType::Heart,
        CardType::Mind,
        CardType::Soul,
        CardType::Ego,
        CardType::ActOut,
        CardType::Penalty,
        CardType::Wildcard,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CardType::Heart => "Heart",
            CardType::Mind => "Mind",
            CardType::Soul => "Soul",
            CardType::Ego => "Ego",
            CardType::ActOut => "ActOut",
            CardType::Penalty => "Penalty",
            CardType::Wildcard => "Wildcard",
        }
    }

    pub fn from_id(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().to_ascii_lowercase() == normalized)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A single catalog entry. Cards are never mutated once loaded; play only
/// moves them between piles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: CardType,
    pub text: String,
    pub points: i64,
    #[serde(default)]
    pub category_description: String,
    #[serde(default)]
    pub requires_spinner: bool,
    #[serde(default)]
    pub time_limit: Option<u32>,
}

impl Card {
    pub fn new(kind: CardType, text: impl Into<String>, points: i64) -> Self {
        Self {
            kind,
            text: text.into(),
            points,
            category_description: String::new(),
            requires_spinner: false,
            time_limit: None,
        }
    }

    pub fn with_spinner(mut self) -> Self {
        self.requires_spinner = true;
        self
    }

    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Seconds on the countdown, if this card runs one at all.
    pub fn countdown(&self) -> Option<u32> {
        self.time_limit.filter(|seconds| *seconds > 0)
    }
}
