use crate::{Card, CardType, Couple, PlayerId, Ticket};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Winner {
    Player(PlayerId),
    Couple(Couple),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    GameStarted {
        players: usize,
        threshold: i64,
        deck: usize,
    },
    CardDrawn { card: Card },
    DeckReshuffled { cards: usize },
    CardsExcluded { count: usize },
    ScoreChanged {
        player: PlayerId,
        new_score: i64,
        delta: i64,
    },
    TurnAdvanced { player: PlayerId },
    CountdownStarted { ticket: Ticket, seconds: u32 },
    TimeUp { player: PlayerId },
    RevealStarted { ticket: Ticket },
    ParticipantSelected { player: PlayerId },
    SelectionChanged { types: Vec<CardType>, purged: usize },
    GameEnded { winner: Winner },
    GameRestarted,
    GameAbandoned,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.queue.iter()
    }
}
