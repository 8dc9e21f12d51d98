use super::*;
use crate::*;
use tracing::{debug, warn};

impl Session {
    /// Reports that the countdown behind `ticket` ran out. Stale tickets are
    /// ignored and return `false`.
    pub fn countdown_elapsed(&mut self, ticket: Ticket, events: &mut EventBus) -> bool {
        let Some(countdown) = self.waits.take_countdown(ticket) else {
            debug!(%ticket, "stale countdown ignored");
            return false;
        };
        events.push(Event::TimeUp {
            player: countdown.player,
        });
        true
    }

    pub fn stop_countdown(&mut self) -> bool {
        self.waits.cancel_countdown().is_some()
    }

    /// Resolves the reveal behind `ticket`: picks a random wheel participant
    /// other than the drawing player. Returns `Ok(None)` for stale tickets.
    ///
    /// When nobody is eligible the reveal is still consumed and any points it
    /// carried are applied, so the turn can go on; the error reports the
    /// missing participant.
    pub fn reveal_participant(
        &mut self,
        ticket: Ticket,
        events: &mut EventBus,
    ) -> Result<Option<PlayerId>, SessionError> {
        self.ensure_playing()?;
        let Some(reveal) = self.waits.take_reveal(ticket) else {
            debug!(%ticket, "stale reveal ignored");
            return Ok(None);
        };
        let picked = self
            .roster
            .pick_participant(&self.wheel, reveal.exclude, &mut self.rng);
        if let Ok(chosen) = &picked {
            events.push(Event::ParticipantSelected { player: *chosen });
        }
        if let Some(points) = reveal.points {
            self.update_score(reveal.exclude, points, events)?;
        }
        match picked {
            Ok(chosen) => Ok(Some(chosen)),
            Err(err) => {
                warn!(player = %reveal.exclude, "reveal had nobody to pick");
                Err(err.into())
            }
        }
    }

    pub fn set_wheel_participants(&mut self, ids: Vec<PlayerId>) -> Result<(), SessionError> {
        if ids.is_empty() {
            return Err(RosterError::InvalidSetup(
                "at least one player must be on the wheel".into(),
            )
            .into());
        }
        for id in &ids {
            self.roster.player(*id)?;
        }
        self.wheel = ids;
        Ok(())
    }

    pub(crate) fn reset_wheel(&mut self) {
        self.wheel = self.roster.ids();
    }
}
