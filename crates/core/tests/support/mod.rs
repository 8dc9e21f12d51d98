#![allow(dead_code)]

use once_cell::sync::OnceCell;
use partydeck_core::{
    Card, CardType, EventBus, GameConfig, PlayerId, ResolutionMode, Session,
};
use tracing_subscriber::{fmt, EnvFilter};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Idempotent test subscriber. `TEST_LOG` wins over `RUST_LOG`; default is quiet.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub const A: PlayerId = PlayerId(1);
pub const B: PlayerId = PlayerId(2);
pub const C: PlayerId = PlayerId(3);

pub fn card(kind: CardType, points: i64) -> Card {
    Card::new(kind, format!("{kind} prompt"), points)
}

/// Three zero-point cards of every type.
pub fn catalog() -> Vec<Card> {
    CardType::ALL
        .into_iter()
        .flat_map(|kind| (0..3).map(move |_| card(kind, 0)))
        .collect()
}

pub fn config(players: &[&str], mode: ResolutionMode) -> GameConfig {
    let mut config = GameConfig::new(players.iter().map(|name| name.to_string()).collect());
    config.resolution = mode;
    config
}

pub fn started(players: &[&str], mode: ResolutionMode) -> (Session, EventBus) {
    init_logging();
    let mut session = Session::new(catalog(), 7);
    let mut events = EventBus::default();
    session
        .start(config(players, mode), &mut events)
        .expect("start game");
    (session, events)
}

/// Replaces the draw pile; the last card listed is drawn first.
pub fn stack_deck(session: &mut Session, draw: Vec<Card>) {
    session.stack_deck(draw);
}

pub fn score(session: &Session, id: PlayerId) -> i64 {
    session.roster().get(id).expect("player").score
}
