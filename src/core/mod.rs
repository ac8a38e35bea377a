//! Core protocol types: players, commands, responses, errors.

pub mod command;
pub mod error;
pub mod player;

pub use command::{Command, GridStats, Response, RoundOutcome, TargetList};
pub use error::GameError;
pub use player::{PlayerId, PlayerMap, Roster};
