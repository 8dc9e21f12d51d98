use crate::{
    Card, ConfigError, Deck, DeckError, PendingWaits, Phase, PlayerId, PointThreshold,
    ResolutionMode, RngState, Roster, RosterError, TurnCycle, TypeFilter, WinCondition, Winner,
};
use thiserror::Error;

mod lifecycle;
mod play;
mod waits;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid phase: {0:?}")]
    InvalidPhase(Phase),
    #[error("the game is over")]
    GameOver,
    #[error("the drawn card is still being resolved")]
    ResolutionPending,
    #[error("no card is waiting to be resolved")]
    NoPendingResolution,
    #[error("not available in {0} resolution mode")]
    WrongMode(ResolutionMode),
}

impl SessionError {
    pub fn is_invalid_setup(&self) -> bool {
        matches!(
            self,
            SessionError::Config(_) | SessionError::Roster(RosterError::InvalidSetup(_))
        )
    }
}

/// One table's game, from setup through play to the win.
#[derive(Debug)]
pub struct Session {
    rng: RngState,
    deck: Deck,
    roster: Roster,
    turn: TurnCycle,
    phase: Phase,
    threshold: PointThreshold,
    selected_types: TypeFilter,
    resolution: ResolutionMode,
    win_condition: WinCondition,
    current_card: Option<Card>,
    winner: Option<Winner>,
    awaiting_verdict: bool,
    waits: PendingWaits,
    wheel: Vec<PlayerId>,
}

impl Session {
    pub fn new(catalog: Vec<Card>, seed: u64) -> Self {
        let mut rng = RngState::from_seed(seed);
        let deck = Deck::load(catalog, &mut rng);
        Self {
            rng,
            deck,
            roster: Roster::default(),
            turn: TurnCycle::default(),
            phase: Phase::Setup,
            threshold: PointThreshold::default(),
            selected_types: crate::all_types(),
            resolution: ResolutionMode::default(),
            win_condition: WinCondition::default(),
            current_card: None,
            winner: None,
            awaiting_verdict: false,
            waits: PendingWaits::default(),
            wheel: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Scores change only through [`Session::update_score`].
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn turn(&self) -> &TurnCycle {
        &self.turn
    }

    pub fn threshold(&self) -> PointThreshold {
        self.threshold
    }

    pub fn selected_types(&self) -> &TypeFilter {
        &self.selected_types
    }

    pub fn resolution(&self) -> ResolutionMode {
        self.resolution
    }

    pub fn win_condition(&self) -> WinCondition {
        self.win_condition
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current_card.as_ref()
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    /// Replaces the undrawn pile and empties the rest, so a test can fix the
    /// draw order. The last card listed is drawn first.
    #[doc(hidden)]
    pub fn stack_deck(&mut self, draw: Vec<Card>) {
        self.deck = Deck {
            draw,
            ..Deck::default()
        };
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn awaiting_verdict(&self) -> bool {
        self.awaiting_verdict
    }

    /// True while a draw's resolution is outstanding; further draws and turn
    /// advances are refused until it settles.
    pub fn is_resolution_pending(&self) -> bool {
        self.awaiting_verdict || self.waits.reveal().is_some()
    }

    pub fn waits(&self) -> &PendingWaits {
        &self.waits
    }

    pub fn wheel_participants(&self) -> &[PlayerId] {
        &self.wheel
    }

    pub fn standing(&self) -> crate::Standing {
        self.roster.standing()
    }

    pub(crate) fn ensure_playing(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Playing => Ok(()),
            Phase::Ended => Err(SessionError::GameOver),
            Phase::Setup => Err(SessionError::InvalidPhase(Phase::Setup)),
        }
    }
}
