use crate::{Card, CardType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Per-type handlers score the card as soon as it is drawn.
    Automatic,
    /// The card waits for a complete/incomplete verdict, then the turn passes.
    #[default]
    Manual,
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionMode::Automatic => f.write_str("automatic"),
            ResolutionMode::Manual => f.write_str("manual"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    Incomplete,
}

impl Outcome {
    pub fn delta(self, card: &Card) -> i64 {
        match self {
            Outcome::Complete => card.points,
            Outcome::Incomplete => card.points.saturating_abs().saturating_neg(),
        }
    }
}

/// What the session has to do with a freshly drawn card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardPlan {
    /// Points applied to the drawing player right away.
    pub immediate: Option<i64>,
    pub countdown: Option<u32>,
    pub reveal: bool,
    /// Points applied once the reveal picks a participant.
    pub after_reveal: Option<i64>,
    pub await_verdict: bool,
}

pub fn plan_card(card: &Card, mode: ResolutionMode) -> CardPlan {
    match mode {
        ResolutionMode::Automatic => automatic_plan(card),
        ResolutionMode::Manual => CardPlan {
            countdown: timed_countdown(card),
            reveal: needs_reveal(card),
            await_verdict: true,
            ..CardPlan::default()
        },
    }
}

fn automatic_plan(card: &Card) -> CardPlan {
    match card.kind {
        CardType::Heart
        | CardType::Soul
        | CardType::Ego
        | CardType::Penalty
        | CardType::Wildcard => CardPlan {
            immediate: Some(card.points),
            ..CardPlan::default()
        },
        CardType::Mind => CardPlan {
            immediate: Some(card.points),
            countdown: timed_countdown(card),
            ..CardPlan::default()
        },
        CardType::ActOut if card.requires_spinner => CardPlan {
            reveal: true,
            after_reveal: Some(card.points),
            ..CardPlan::default()
        },
        CardType::ActOut => CardPlan {
            immediate: Some(card.points),
            ..CardPlan::default()
        },
    }
}

fn timed_countdown(card: &Card) -> Option<u32> {
    match card.kind {
        CardType::Mind => card.countdown(),
        _ => None,
    }
}

fn needs_reveal(card: &Card) -> bool {
    card.kind == CardType::ActOut && card.requires_spinner
}
