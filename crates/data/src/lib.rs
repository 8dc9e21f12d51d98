//! Loading and validation of the card catalog and game config files.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
