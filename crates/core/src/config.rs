use crate::{all_types, ResolutionMode, TypeFilter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one player name is required")]
    NoPlayers,
    #[error("at least one card type must be selected")]
    EmptyTypeSelection,
    #[error("unsupported point threshold {0} (expected 10, 15, 20 or 30)")]
    UnsupportedThreshold(i64),
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "i64", into = "i64")]
pub enum PointThreshold {
    #[default]
    Ten,
    Fifteen,
    Twenty,
    Thirty,
}

impl PointThreshold {
    pub const ALL: [PointThreshold; 4] = [
        PointThreshold::Ten,
        PointThreshold::Fifteen,
        PointThreshold::Twenty,
        PointThreshold::Thirty,
    ];

    pub fn points(self) -> i64 {
        match self {
            PointThreshold::Ten => 10,
            PointThreshold::Fifteen => 15,
            PointThreshold::Twenty => 20,
            PointThreshold::Thirty => 30,
        }
    }
}

impl TryFrom<i64> for PointThreshold {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|threshold| threshold.points() == value)
            .ok_or(ConfigError::UnsupportedThreshold(value))
    }
}

impl From<PointThreshold> for i64 {
    fn from(value: PointThreshold) -> Self {
        value.points()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum WinCondition {
    #[default]
    Individual,
    /// Partnered players win together once their combined score reaches the
    /// threshold. Any player whose own score reaches it still wins alone.
    CoupleTotal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    #[serde(default)]
    pub point_threshold: PointThreshold,
    #[serde(default = "all_types")]
    pub selected_types: TypeFilter,
    pub players: Vec<String>,
    #[serde(default)]
    pub couples: Vec<(usize, usize)>,
    #[serde(default)]
    pub resolution: ResolutionMode,
    #[serde(default)]
    pub win_condition: WinCondition,
}

impl GameConfig {
    pub fn new(players: Vec<String>) -> Self {
        Self {
            point_threshold: PointThreshold::default(),
            selected_types: all_types(),
            players,
            couples: Vec::new(),
            resolution: ResolutionMode::default(),
            win_condition: WinCondition::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        if self.selected_types.is_empty() {
            return Err(ConfigError::EmptyTypeSelection);
        }
        Ok(())
    }
}
