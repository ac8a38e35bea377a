//! # memgrid
//!
//! Authoritative rules engine for a synchronous, round-based contest
//! over a fixed grid of memory-like cells.
//!
//! ## Design Principles
//!
//! 1. **Rounds are atomic**: every command in a batch resolves against
//!    the same round, in two phases: speculative writes first, then
//!    responses read from the settled grid.
//!
//! 2. **Conflicts are outcomes, not errors**: a cell takes at most one
//!    write per round; competing writers corrupt the cell, and a failed
//!    swap corrupts every swap chained to it through this round's
//!    attempts. Nothing is retried.
//!
//! 3. **Ownership is private**: only the owner is told a cell is
//!    theirs; every other viewer sees the unmasked state.
//!
//! ## Modules
//!
//! - `core`: players, commands, responses, errors
//! - `grid`: the cell state machine and the arena it lives in
//! - `engine`: validation, the swap conflict graph, the round
//!   orchestrator
//! - `score`: ownership-relative scoring

pub mod core;
pub mod engine;
pub mod grid;
pub mod score;

// Re-export commonly used types
pub use crate::core::{
    Command, GameError, GridStats, PlayerId, PlayerMap, Response, Roster, RoundOutcome, TargetList,
};

pub use crate::engine::{Game, SwapGraph};

pub use crate::grid::{block_of, Cell, CellState, Grid, BLOCK_CELLS};

pub use crate::score::{PlayerScore, BLOCK_BONUS};
