use super::*;
use crate::*;
use tracing::info;

impl Session {
    pub fn start(&mut self, config: GameConfig, events: &mut EventBus) -> Result<(), SessionError> {
        if self.phase != Phase::Setup {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        config.validate()?;
        self.roster = Roster::setup(&config.players, &config.couples)?;
        self.reset_wheel();

        self.deck.recombine(&mut self.rng);
        self.turn.reset();
        self.clear_round();
        self.winner = None;
        self.threshold = config.point_threshold;
        self.selected_types = config.selected_types;
        self.resolution = config.resolution;
        self.win_condition = config.win_condition;
        self.phase = Phase::Playing;

        info!(
            players = self.roster.len(),
            couples = self.roster.couples().len(),
            threshold = self.threshold.points(),
            mode = %self.resolution,
            "game started"
        );
        events.push(Event::GameStarted {
            players: self.roster.len(),
            threshold: self.threshold.points(),
            deck: self.deck.remaining(),
        });
        Ok(())
    }

    /// Ends the game if `player`'s latest score change crossed the threshold.
    pub fn end_if_winner(&mut self, player: PlayerId, events: &mut EventBus) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(score) = self.roster.get(player).map(|p| p.score) else {
            return false;
        };
        let threshold = self.threshold.points();
        let couple_win = match (self.win_condition, self.roster.couple_of(player)) {
            (WinCondition::CoupleTotal, Some(couple)) => self
                .roster
                .couple_total(couple)
                .filter(|total| *total >= threshold)
                .map(|_| Winner::Couple(couple)),
            _ => None,
        };
        // a player at the threshold wins even when the partner drags the total down
        let winner =
            couple_win.or_else(|| (score >= threshold).then_some(Winner::Player(player)));
        let Some(winner) = winner else {
            return false;
        };
        self.phase = Phase::Ended;
        self.winner = Some(winner);
        self.awaiting_verdict = false;
        self.waits.cancel_all();
        info!(?winner, "game ended");
        events.push(Event::GameEnded { winner });
        true
    }

    pub fn restart(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        if self.phase == Phase::Setup {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        self.roster.reset_scores();
        self.deck.recombine(&mut self.rng);
        self.turn.reset();
        self.clear_round();
        self.winner = None;
        self.phase = Phase::Setup;
        info!(deck = self.deck.remaining(), "game restarted");
        events.push(Event::GameRestarted);
        Ok(())
    }

    pub fn abandon(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        if self.phase != Phase::Playing {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        self.clear_round();
        self.phase = Phase::Setup;
        info!("game abandoned");
        events.push(Event::GameAbandoned);
        Ok(())
    }

    fn clear_round(&mut self) {
        self.current_card = None;
        self.awaiting_verdict = false;
        self.waits.cancel_all();
    }
}
