use crate::{Card, CardType, RngState};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

pub type TypeFilter = BTreeSet<CardType>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("no drawable card matches the selected card types")]
    Depleted,
}

/// What a successful draw did to the piles besides yielding a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawReport {
    pub reshuffled: Option<usize>,
    pub excluded: usize,
}

/// Undrawn cards live in `draw`, drawn cards in `discard`. Cards the type
/// filter has taken out of play sit in `excluded` until the deck is rebuilt.
#[derive(Debug, Default, Clone)]
pub struct Deck {
    pub draw: Vec<Card>,
    pub discard: Vec<Card>,
    pub excluded: Vec<Card>,
}

impl Deck {
    pub fn load(cards: Vec<Card>, rng: &mut RngState) -> Self {
        let mut deck = Self {
            draw: cards,
            discard: Vec::new(),
            excluded: Vec::new(),
        };
        deck.shuffle(rng);
        debug!(cards = deck.draw.len(), "deck loaded");
        deck
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.draw);
    }

    pub fn remaining(&self) -> usize {
        self.draw.len()
    }

    pub fn discarded(&self) -> usize {
        self.discard.len()
    }

    pub fn in_play(&self) -> usize {
        self.draw.len() + self.discard.len()
    }

    pub fn total(&self) -> usize {
        self.in_play() + self.excluded.len()
    }

    /// The card most recently drawn, if it has not been reshuffled away.
    pub fn last_drawn(&self) -> Option<&Card> {
        self.discard.last()
    }

    pub fn draw(
        &mut self,
        selected: &TypeFilter,
        rng: &mut RngState,
    ) -> Result<(Card, DrawReport), DeckError> {
        let mut report = DrawReport::default();
        if self.draw.is_empty() {
            report.reshuffled = Some(self.reshuffle_discard(selected, rng)?);
        }
        while let Some(card) = self.draw.pop() {
            if selected.contains(&card.kind) {
                self.discard.push(card.clone());
                debug!(kind = %card.kind, remaining = self.draw.len(), "card drawn");
                return Ok((card, report));
            }
            report.excluded += 1;
            self.excluded.push(card);
        }
        debug!(excluded = report.excluded, "no selected card left in deck");
        Err(DeckError::Depleted)
    }

    /// Moves discarded cards of the selected types back into the draw pile.
    /// Discards of other types leave play.
    pub fn reshuffle_discard(
        &mut self,
        selected: &TypeFilter,
        rng: &mut RngState,
    ) -> Result<usize, DeckError> {
        let (keep, drop): (Vec<Card>, Vec<Card>) = self
            .discard
            .drain(..)
            .partition(|card| selected.contains(&card.kind));
        self.excluded.extend(drop);
        if keep.is_empty() {
            return Err(DeckError::Depleted);
        }
        self.draw.extend(keep);
        self.shuffle(rng);
        debug!(cards = self.draw.len(), "discard pile reshuffled into deck");
        Ok(self.draw.len())
    }

    /// Purges undrawn cards whose type is no longer selected. Returns how many
    /// were removed.
    pub fn retain_types(&mut self, selected: &TypeFilter) -> usize {
        let before = self.draw.len();
        let (keep, drop): (Vec<Card>, Vec<Card>) = self
            .draw
            .drain(..)
            .partition(|card| selected.contains(&card.kind));
        self.draw = keep;
        self.excluded.extend(drop);
        before - self.draw.len()
    }

    /// Gathers every card back into the draw pile and shuffles.
    pub fn recombine(&mut self, rng: &mut RngState) {
        self.draw.append(&mut self.discard);
        self.draw.append(&mut self.excluded);
        self.shuffle(rng);
    }
}

pub fn all_types() -> TypeFilter {
    CardType::ALL.into_iter().collect()
}
