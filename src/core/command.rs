//! Commands and responses: the per-round protocol surface.
//!
//! Both sides of the protocol are closed tagged variants: the validator
//! and the responder dispatch exhaustively, and an unrecognized command
//! kind is unrepresentable by construction.
//!
//! Write commands carry up to two optional target indices; `None`
//! entries are permitted and ignored. `Swap` always carries exactly two
//! indices. Commands are submitted in one unordered batch per round;
//! responses come back in the engine's own ordering with scan results
//! appended last, so callers correlate by player identity.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::grid::CellState;

/// Target list for the block-scoped write commands.
///
/// Inline capacity matches the two-cell command limit; `None` entries
/// are no-ops.
pub type TargetList = SmallVec<[Option<usize>; 2]>;

/// A player intent submitted for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Claim free cells within one block.
    Allocate { player: PlayerId, cells: TargetList },
    /// Release owned or corrupt cells within one block.
    Free { player: PlayerId, cells: TargetList },
    /// Repair corrupt cells. Recovering a healthy cell corrupts it.
    Recover { player: PlayerId, cells: TargetList },
    /// Request write-immunity for allocated cells, resolved at settle.
    Fortify { player: PlayerId, cells: TargetList },
    /// Exchange two grid positions.
    Swap { player: PlayerId, a: usize, b: usize },
    /// Read one block, owner-relative.
    Scan { player: PlayerId, cell: usize },
    /// Read grid-wide counters.
    Stats { player: PlayerId },
}

impl Command {
    /// Build an allocate command.
    pub fn allocate(player: PlayerId, cells: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self::Allocate { player, cells: cells.into_iter().collect() }
    }

    /// Build a free command.
    pub fn free(player: PlayerId, cells: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self::Free { player, cells: cells.into_iter().collect() }
    }

    /// Build a recover command.
    pub fn recover(player: PlayerId, cells: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self::Recover { player, cells: cells.into_iter().collect() }
    }

    /// Build a fortify command.
    pub fn fortify(player: PlayerId, cells: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self::Fortify { player, cells: cells.into_iter().collect() }
    }

    /// Build a swap command.
    #[must_use]
    pub fn swap(player: PlayerId, a: usize, b: usize) -> Self {
        Self::Swap { player, a, b }
    }

    /// Build a scan command.
    #[must_use]
    pub fn scan(player: PlayerId, cell: usize) -> Self {
        Self::Scan { player, cell }
    }

    /// Build a stats command.
    #[must_use]
    pub fn stats(player: PlayerId) -> Self {
        Self::Stats { player }
    }

    /// The submitting player.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            Command::Allocate { player, .. }
            | Command::Free { player, .. }
            | Command::Recover { player, .. }
            | Command::Fortify { player, .. }
            | Command::Swap { player, .. }
            | Command::Scan { player, .. }
            | Command::Stats { player } => *player,
        }
    }

    /// Write commands contend for the one-move-per-round gate; reads
    /// pass freely.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Command::Scan { .. } | Command::Stats { .. })
    }
}

/// Grid-wide state counts plus the remaining-rounds counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStats {
    pub free: usize,
    pub allocated: usize,
    pub fortified: usize,
    pub system: usize,
    pub corrupt: usize,
    pub rounds_left: u32,
}

/// Per-command outcome, correlated back to the submitting player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Subset of target indices on which a write command took hold.
    Success { player: PlayerId, cells: Vec<usize> },
    /// Owner-relative states of one block. `block_start` is `None` and
    /// `states` empty when the scan was rejected.
    Scan {
        player: PlayerId,
        block_start: Option<usize>,
        states: Vec<CellState>,
    },
    /// Snapshot of the settled grid.
    Stats { player: PlayerId, stats: GridStats },
}

impl Response {
    /// The player this response belongs to.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            Response::Success { player, .. }
            | Response::Scan { player, .. }
            | Response::Stats { player, .. } => *player,
        }
    }
}

/// Result of a round call: one response per submitted command, or the
/// terminal game-over signal once the round budget is spent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Responses(Vec<Response>),
    GameOver,
}

impl RoundOutcome {
    /// The response batch, if the game was still running.
    #[must_use]
    pub fn responses(self) -> Option<Vec<Response>> {
        match self {
            RoundOutcome::Responses(responses) => Some(responses),
            RoundOutcome::GameOver => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_player() {
        let p = PlayerId::new(3);

        assert_eq!(Command::allocate(p, [Some(0), Some(1)]).player(), p);
        assert_eq!(Command::swap(p, 2, 9).player(), p);
        assert_eq!(Command::stats(p).player(), p);
    }

    #[test]
    fn test_command_mutating_kinds() {
        let p = PlayerId::new(0);

        assert!(Command::allocate(p, [Some(0)]).is_mutating());
        assert!(Command::free(p, [Some(0)]).is_mutating());
        assert!(Command::recover(p, [Some(0)]).is_mutating());
        assert!(Command::fortify(p, [Some(0)]).is_mutating());
        assert!(Command::swap(p, 0, 1).is_mutating());
        assert!(!Command::scan(p, 0).is_mutating());
        assert!(!Command::stats(p).is_mutating());
    }

    #[test]
    fn test_target_list_keeps_none_entries() {
        let command = Command::allocate(PlayerId::new(0), [None, Some(2)]);
        match command {
            Command::Allocate { cells, .. } => {
                assert_eq!(cells.as_slice(), &[None, Some(2)]);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::fortify(PlayerId::new(1), [Some(4), None]);
        let json = serde_json::to_string(&command).unwrap();
        let deserialized: Command = serde_json::from_str(&json).unwrap();

        assert_eq!(command, deserialized);
    }

    #[test]
    fn test_response_serialization() {
        let response = Response::Scan {
            player: PlayerId::new(2),
            block_start: Some(4),
            states: vec![CellState::Free, CellState::OwnedAllocated],
        };
        let json = serde_json::to_string(&response).unwrap();
        let deserialized: Response = serde_json::from_str(&json).unwrap();

        assert_eq!(response, deserialized);
        assert_eq!(response.player(), PlayerId::new(2));
    }

    #[test]
    fn test_round_outcome_responses() {
        let outcome = RoundOutcome::Responses(vec![]);
        assert_eq!(outcome.responses(), Some(vec![]));
        assert_eq!(RoundOutcome::GameOver.responses(), None);
    }
}
