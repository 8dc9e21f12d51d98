use super::*;
use crate::*;
use tracing::{debug, warn};

impl Session {
    pub fn current_player(&self) -> Option<&Player> {
        self.roster.at(self.turn.current())
    }

    fn current_player_id(&self) -> Result<PlayerId, SessionError> {
        self.current_player()
            .map(|player| player.id)
            .ok_or(SessionError::InvalidPhase(self.phase))
    }

    pub fn draw(&mut self, events: &mut EventBus) -> Result<Card, SessionError> {
        self.ensure_playing()?;
        if self.is_resolution_pending() {
            return Err(SessionError::ResolutionPending);
        }
        let player = self.current_player_id()?;
        let (card, report) = match self.deck.draw(&self.selected_types, &mut self.rng) {
            Ok(drawn) => drawn,
            Err(err) => {
                warn!(player = %player, "draw failed: {err}");
                return Err(err.into());
            }
        };
        if let Some(cards) = report.reshuffled {
            events.push(Event::DeckReshuffled { cards });
        }
        if report.excluded > 0 {
            events.push(Event::CardsExcluded {
                count: report.excluded,
            });
        }
        self.current_card = Some(card.clone());
        events.push(Event::CardDrawn { card: card.clone() });

        let plan = plan_card(&card, self.resolution);
        self.waits.cancel_countdown();
        if let Some(seconds) = plan.countdown {
            let countdown = self.waits.start_countdown(seconds, player);
            events.push(Event::CountdownStarted {
                ticket: countdown.ticket,
                seconds,
            });
        }
        if plan.reveal {
            let reveal = self.waits.start_reveal(player, plan.after_reveal);
            events.push(Event::RevealStarted {
                ticket: reveal.ticket,
            });
        }
        self.awaiting_verdict = plan.await_verdict;
        if let Some(delta) = plan.immediate {
            self.update_score(player, delta, events)?;
        }
        Ok(card)
    }

    /// Scores the current card by verdict and passes the turn.
    pub fn resolve(&mut self, outcome: Outcome, events: &mut EventBus) -> Result<i64, SessionError> {
        self.ensure_playing()?;
        if self.resolution != ResolutionMode::Manual {
            return Err(SessionError::WrongMode(self.resolution));
        }
        if !self.awaiting_verdict {
            return Err(SessionError::NoPendingResolution);
        }
        if self.waits.reveal().is_some() {
            return Err(SessionError::ResolutionPending);
        }
        let card = self
            .current_card
            .clone()
            .ok_or(SessionError::NoPendingResolution)?;
        let player = self.current_player_id()?;
        self.awaiting_verdict = false;
        self.waits.cancel_countdown();
        debug!(player = %player, ?outcome, "card resolved");
        let score = self.update_score(player, outcome.delta(&card), events)?;
        if self.phase == Phase::Playing {
            self.pass_turn(events);
        }
        Ok(score)
    }

    pub fn advance(&mut self, events: &mut EventBus) -> Result<PlayerId, SessionError> {
        self.ensure_playing()?;
        if self.is_resolution_pending() {
            return Err(SessionError::ResolutionPending);
        }
        self.waits.cancel_countdown();
        Ok(self.pass_turn(events))
    }

    fn pass_turn(&mut self, events: &mut EventBus) -> PlayerId {
        let index = self.turn.advance(self.roster.len());
        let player = self.roster.players()[index].id;
        debug!(player = %player, index, "turn advanced");
        events.push(Event::TurnAdvanced { player });
        player
    }

    pub fn update_score(
        &mut self,
        player: PlayerId,
        delta: i64,
        events: &mut EventBus,
    ) -> Result<i64, SessionError> {
        self.ensure_playing()?;
        let new_score = self.roster.update_score(player, delta)?;
        debug!(player = %player, delta, new_score, "score changed");
        events.push(Event::ScoreChanged {
            player,
            new_score,
            delta,
        });
        self.end_if_winner(player, events);
        Ok(new_score)
    }

    /// Replaces the active card-type selection. Undrawn cards of types that
    /// are no longer selected leave play for good.
    pub fn change_selected_types(
        &mut self,
        types: TypeFilter,
        events: &mut EventBus,
    ) -> Result<usize, SessionError> {
        if types.is_empty() {
            return Err(ConfigError::EmptyTypeSelection.into());
        }
        let purged = self.deck.retain_types(&types);
        debug!(purged, types = types.len(), "card type selection changed");
        events.push(Event::SelectionChanged {
            types: types.iter().copied().collect(),
            purged,
        });
        self.selected_types = types;
        Ok(purged)
    }
}
