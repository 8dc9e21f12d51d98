use crate::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Presentation delay before a reveal resolves: spin, then show the result.
pub const REVEAL_DELAY: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub ticket: Ticket,
    pub seconds: u32,
    pub player: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    pub ticket: Ticket,
    pub exclude: PlayerId,
    pub points: Option<i64>,
}

/// At most one countdown and one reveal are outstanding. Starting another
/// replaces the previous one, whose ticket then goes stale.
#[derive(Debug, Clone, Default)]
pub struct PendingWaits {
    next_ticket: u64,
    countdown: Option<Countdown>,
    reveal: Option<Reveal>,
}

impl PendingWaits {
    fn issue(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    pub fn countdown(&self) -> Option<Countdown> {
        self.countdown
    }

    pub fn reveal(&self) -> Option<Reveal> {
        self.reveal
    }

    pub fn start_countdown(&mut self, seconds: u32, player: PlayerId) -> Countdown {
        let countdown = Countdown {
            ticket: self.issue(),
            seconds,
            player,
        };
        self.countdown = Some(countdown);
        countdown
    }

    pub fn start_reveal(&mut self, exclude: PlayerId, points: Option<i64>) -> Reveal {
        let reveal = Reveal {
            ticket: self.issue(),
            exclude,
            points,
        };
        self.reveal = Some(reveal);
        reveal
    }

    /// Takes the countdown if `ticket` is still the live one.
    pub fn take_countdown(&mut self, ticket: Ticket) -> Option<Countdown> {
        match self.countdown {
            Some(countdown) if countdown.ticket == ticket => self.countdown.take(),
            _ => None,
        }
    }

    pub fn take_reveal(&mut self, ticket: Ticket) -> Option<Reveal> {
        match self.reveal {
            Some(reveal) if reveal.ticket == ticket => self.reveal.take(),
            _ => None,
        }
    }

    pub fn cancel_countdown(&mut self) -> Option<Countdown> {
        self.countdown.take()
    }

    pub fn cancel_all(&mut self) {
        self.countdown = None;
        self.reveal = None;
    }
}
