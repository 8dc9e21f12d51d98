//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod config;
pub mod deck;
pub mod events;
pub mod pending;
pub mod resolution;
pub mod rng;
pub mod roster;
pub mod session;
pub mod state;
pub mod turn;

pub use cards::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use pending::*;
pub use resolution::*;
pub use rng::*;
pub use roster::*;
pub use session::*;
pub use state::*;
pub use turn::*;
