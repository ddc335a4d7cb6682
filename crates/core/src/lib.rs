//! Core game logic for the card-line wager game. Keep this crate free of IO
//! and platform concerns.

pub mod cards;
pub mod catalog;
pub mod category;
pub mod config;
pub mod deck;
pub mod events;
pub mod grid;
pub mod ledger;
pub mod matcher;
pub mod method;
pub mod pricing;
pub mod probability;
pub mod rng;
pub mod roster;
pub mod round;
pub mod schedule;
pub mod selection;
pub mod state;

pub use cards::*;
pub use catalog::*;
pub use category::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use grid::*;
pub use ledger::*;
pub use matcher::*;
pub use method::*;
pub use pricing::*;
pub use probability::*;
pub use rng::*;
pub use roster::*;
pub use round::*;
pub use schedule::*;
pub use selection::*;
pub use state::*;
